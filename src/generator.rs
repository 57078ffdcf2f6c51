//! Deterministic chunk population.
//!
//! Every chunk is a pure function of `(world_seed, cx, cz)`. The world seed
//! and chunk coordinate are mixed into a per-chunk base seed; each placement
//! attempt derives its own leaf seed from that base and draws from a fresh
//! PCG stream, so one rejected attempt never shifts the draws of another.
//!
//! Density is a soft target: an obstacle or target that cannot find a free
//! spot within [`MAX_ATTEMPTS`] is skipped and the chunk comes out sparser.

use crate::collision::circles_overlap;
use crate::types::{
    ChunkCoord, ChunkData, Obstacle, ObstacleKind, Target, TargetKind, Vec3, CHUNK_SIZE,
};
use log::trace;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

/// Placement attempts per entity before it is skipped.
pub const MAX_ATTEMPTS: u64 = 10;

pub const MIN_OBSTACLES: usize = 20;
pub const OBSTACLE_SPREAD: usize = 20;
pub const MIN_TARGETS: usize = 3;
pub const TARGET_SPREAD: usize = 5;

/// Obstacle-free radius around the world origin in chunk (0, 0).
pub const OBSTACLE_DEAD_ZONE: f32 = 8.0;
/// Target-free radius around the world origin in chunk (0, 0).
pub const TARGET_DEAD_ZONE: f32 = 6.0;

/// Extra gap kept between a target and any obstacle.
pub const TARGET_OBSTACLE_CLEARANCE: f32 = 1.0;
/// Extra gap kept between two targets, on top of both radii.
pub const TARGET_SPACING: f32 = 2.0;

/// Rocks smaller than this base scale are pebbles the tank drives over.
pub const PEBBLE_SCALE: f32 = 1.5;

const X_AXIS_MULTIPLIER: i64 = 15_485_863;
const Z_AXIS_MULTIPLIER: i64 = 2_038_074_743;

const OBSTACLE_INDEX_STRIDE: u64 = 1327;
const OBSTACLE_ATTEMPT_STRIDE: u64 = 7919;
const TARGET_BASE_OFFSET: u64 = 1000;
const TARGET_ATTEMPT_STRIDE: u64 = 997;
const TARGET_COUNT_OFFSET: u64 = 9382;

// ---------------------------------------------------------------------------
// Seeds
// ---------------------------------------------------------------------------

/// Mix a chunk coordinate into the world seed.
///
/// The axes use different odd multipliers, so `(a, b)` and `(b, a)` differ and
/// sign-flipped coordinates land on unrelated bases.
pub fn chunk_seed_base(cx: i32, cz: i32, world_seed: u64) -> u64 {
    let x = (cx as i64).wrapping_mul(X_AXIS_MULTIPLIER) as u64;
    let z = (cz as i64).wrapping_mul(Z_AXIS_MULTIPLIER) as u64;
    x ^ z ^ world_seed
}

fn obstacle_leaf_seed(base: u64, index: usize, attempt: u64) -> u64 {
    base.wrapping_add((index as u64).wrapping_mul(OBSTACLE_INDEX_STRIDE))
        .wrapping_add(attempt.wrapping_mul(OBSTACLE_ATTEMPT_STRIDE))
}

fn target_leaf_seed(base: u64, index: usize, attempt: u64) -> u64 {
    base.wrapping_add(TARGET_BASE_OFFSET)
        .wrapping_add(index as u64)
        .wrapping_add(attempt.wrapping_mul(TARGET_ATTEMPT_STRIDE))
}

/// One deterministic random stream per leaf seed.
struct LeafRng(Pcg32);

impl LeafRng {
    fn new(seed: u64) -> Self {
        Self(Pcg32::seed_from_u64(seed))
    }

    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }

    /// Uniform draw in `[lo, lo + span)`.
    fn span(&mut self, lo: f32, span: f32) -> f32 {
        lo + self.unit() * span
    }

    fn count(&mut self, min: usize, spread: usize) -> usize {
        min + ((self.unit() * spread as f32) as usize).min(spread.saturating_sub(1))
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Populates chunks for one world seed.
#[derive(Debug, Clone)]
pub struct ChunkGenerator {
    pub world_seed: u64,
    pub chunk_size: f32,
}

impl ChunkGenerator {
    pub fn new(world_seed: u64, chunk_size: f32) -> Self {
        Self {
            world_seed,
            chunk_size,
        }
    }

    pub fn generate(&self, coord: ChunkCoord) -> ChunkData {
        let base = chunk_seed_base(coord.cx, coord.cz, self.world_seed);

        let obstacles = self.place_obstacles(coord, base);
        let targets = self.place_targets(coord, base, &obstacles);

        trace!(
            "Generated chunk {} ({} obstacles, {} targets)",
            coord,
            obstacles.len(),
            targets.len()
        );

        ChunkData {
            key: coord.key(),
            cx: coord.cx,
            cz: coord.cz,
            obstacles,
            targets,
        }
    }

    /// Uniform point inside the chunk square, centred on the chunk centre.
    fn draw_position(&self, coord: ChunkCoord, rng: &mut LeafRng) -> Vec3 {
        let size = self.chunk_size;
        let x = (rng.unit() - 0.5) * size + coord.cx as f32 * size;
        let z = (rng.unit() - 0.5) * size + coord.cz as f32 * size;
        Vec3::new(x, 0.0, z)
    }

    fn in_dead_zone(coord: ChunkCoord, position: Vec3, radius: f32) -> bool {
        coord.cx == 0 && coord.cz == 0 && position.horizontal_distance(&Vec3::zero()) < radius
    }

    // -----------------------------------------------------------------------
    // Obstacles
    // -----------------------------------------------------------------------

    fn place_obstacles(&self, coord: ChunkCoord, base: u64) -> Vec<Obstacle> {
        let count = LeafRng::new(base).count(MIN_OBSTACLES, OBSTACLE_SPREAD);
        let mut obstacles: Vec<Obstacle> = Vec::with_capacity(count);

        for index in 0..count {
            for attempt in 0..MAX_ATTEMPTS {
                let mut rng = LeafRng::new(obstacle_leaf_seed(base, index, attempt));
                let position = self.draw_position(coord, &mut rng);
                if Self::in_dead_zone(coord, position, OBSTACLE_DEAD_ZONE) {
                    continue;
                }

                let candidate = draw_obstacle(&mut rng, coord, index, position);
                if obstacle_fits(&candidate, &obstacles) {
                    obstacles.push(candidate);
                    break;
                }
            }
        }

        obstacles
    }

    // -----------------------------------------------------------------------
    // Targets
    // -----------------------------------------------------------------------

    fn place_targets(&self, coord: ChunkCoord, base: u64, obstacles: &[Obstacle]) -> Vec<Target> {
        let count =
            LeafRng::new(base.wrapping_add(TARGET_COUNT_OFFSET)).count(MIN_TARGETS, TARGET_SPREAD);
        let mut targets: Vec<Target> = Vec::with_capacity(count);

        for index in 0..count {
            for attempt in 0..MAX_ATTEMPTS {
                let mut rng = LeafRng::new(target_leaf_seed(base, index, attempt));
                let position = self.draw_position(coord, &mut rng);
                if Self::in_dead_zone(coord, position, TARGET_DEAD_ZONE) {
                    continue;
                }
                if !target_fits(position, obstacles, &targets) {
                    continue;
                }

                let kind = match rng.unit() {
                    u if u < 0.5 => TargetKind::Wood,
                    u if u < 0.8 => TargetKind::Tire,
                    _ => TargetKind::Metal,
                };
                targets.push(Target {
                    id: format!("target-{}-{}-{}", coord.cx, coord.cz, index),
                    position,
                    kind,
                    rotation_y: rng.unit() * TAU,
                });
                break;
            }
        }

        targets
    }
}

impl Default for ChunkGenerator {
    fn default() -> Self {
        Self::new(0, CHUNK_SIZE)
    }
}

/// Generate chunk `(cx, cz)` of the world `world_seed` at the default chunk size.
pub fn generate_chunk(cx: i32, cz: i32, world_seed: u64) -> ChunkData {
    ChunkGenerator::new(world_seed, CHUNK_SIZE).generate(ChunkCoord::new(cx, cz))
}

// ---------------------------------------------------------------------------
// Placement helpers
// ---------------------------------------------------------------------------

fn draw_obstacle(rng: &mut LeafRng, coord: ChunkCoord, index: usize, position: Vec3) -> Obstacle {
    let kind = match rng.unit() {
        u if u < 0.5 => ObstacleKind::Rock,
        u if u < 0.85 => ObstacleKind::Cactus,
        _ => ObstacleKind::Scrap,
    };
    let rotation_y = rng.unit() * TAU;

    let (scale, collision_radius, collidable) = match kind {
        ObstacleKind::Rock => {
            let base = rng.span(1.0, 5.0);
            let scale = Vec3::new(
                base * rng.span(0.8, 0.4),
                base * rng.span(0.6, 0.6),
                base * rng.span(0.8, 0.4),
            );
            (scale, scale.x.max(scale.z), base >= PEBBLE_SCALE)
        }
        ObstacleKind::Cactus => {
            let s = rng.span(0.8, 0.4);
            (Vec3::new(s, s, s), 1.0, true)
        }
        ObstacleKind::Scrap => {
            let scale = Vec3::new(rng.span(1.5, 2.0), rng.span(0.5, 1.5), rng.span(1.5, 2.0));
            (scale, 0.75 * scale.x.max(scale.z), true)
        }
    };

    Obstacle {
        id: format!("obs-{}-{}-{}", coord.cx, coord.cz, index),
        position,
        kind,
        rotation_y,
        scale,
        collision_radius,
        generator_seed: rng.0.random::<u32>(),
        collidable,
    }
}

/// Rock-on-rock overlap is allowed; every other overlapping pair is rejected.
fn obstacle_fits(candidate: &Obstacle, placed: &[Obstacle]) -> bool {
    placed.iter().all(|existing| {
        let both_rocks =
            candidate.kind == ObstacleKind::Rock && existing.kind == ObstacleKind::Rock;
        both_rocks
            || !circles_overlap(
                candidate.position,
                candidate.collision_radius,
                existing.position,
                existing.collision_radius,
            )
    })
}

fn target_fits(position: Vec3, obstacles: &[Obstacle], targets: &[Target]) -> bool {
    let clear_of_obstacles = obstacles.iter().all(|obs| {
        !circles_overlap(
            position,
            Target::RADIUS + TARGET_OBSTACLE_CLEARANCE,
            obs.position,
            obs.collision_radius,
        )
    });
    let clear_of_targets = targets.iter().all(|t| {
        !circles_overlap(
            position,
            Target::RADIUS + TARGET_SPACING,
            t.position,
            Target::RADIUS,
        )
    });
    clear_of_obstacles && clear_of_targets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_base_is_not_symmetric_in_axes() {
        assert_ne!(chunk_seed_base(1, 2, 7), chunk_seed_base(2, 1, 7));
        assert_ne!(chunk_seed_base(3, 0, 7), chunk_seed_base(-3, 0, 7));
    }

    #[test]
    fn leaf_seeds_differ_per_attempt_and_index() {
        let base = chunk_seed_base(0, 0, 42);
        assert_ne!(obstacle_leaf_seed(base, 0, 0), obstacle_leaf_seed(base, 0, 1));
        assert_ne!(obstacle_leaf_seed(base, 0, 0), obstacle_leaf_seed(base, 1, 0));
        assert_ne!(target_leaf_seed(base, 0, 0), target_leaf_seed(base, 0, 1));
    }

    #[test]
    fn counts_stay_in_range() {
        for seed in 0..200u64 {
            let n = LeafRng::new(seed).count(MIN_OBSTACLES, OBSTACLE_SPREAD);
            assert!((MIN_OBSTACLES..MIN_OBSTACLES + OBSTACLE_SPREAD).contains(&n));
        }
    }
}
