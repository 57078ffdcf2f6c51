//! WorldService – chunk streaming around the observer and target lifecycle.
//!
//! The service owns every resident [`ChunkData`]. After each call to
//! [`WorldService::stream_around`] the resident key set is exactly the square
//! window of Chebyshev radius `view_distance` around the observer's chunk.

use crate::generator::ChunkGenerator;
use crate::protocol::WorldSnapshot;
use crate::types::{ChunkCoord, ChunkData, Obstacle, Target, Vec3, WorldServiceConfig};
use log::debug;
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Stream result
// ---------------------------------------------------------------------------

/// Chunk set changes produced by a single [`WorldService::stream_around`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamUpdate {
    /// The observer's chunk after this update.
    pub center: Option<ChunkCoord>,
    /// Chunks generated this update, in window scan order.
    pub activated: Vec<ChunkCoord>,
    /// Chunks evicted this update, sorted.
    pub deactivated: Vec<ChunkCoord>,
}

impl StreamUpdate {
    pub fn is_empty(&self) -> bool {
        self.activated.is_empty() && self.deactivated.is_empty()
    }
}

pub struct WorldService {
    config: WorldServiceConfig,
    generator: ChunkGenerator,
    chunks: HashMap<ChunkCoord, ChunkData>,
    center: Option<ChunkCoord>,
    chunks_generated: u64,
    chunks_evicted: u64,
}

impl WorldService {
    pub fn new(config: WorldServiceConfig) -> Self {
        let generator = ChunkGenerator::new(config.world_seed, config.chunk_size);
        Self {
            config,
            generator,
            chunks: HashMap::new(),
            center: None,
            chunks_generated: 0,
            chunks_evicted: 0,
        }
    }

    pub fn config(&self) -> &WorldServiceConfig {
        &self.config
    }

    /// Observer chunk, clamped so its whole view window has valid coordinates.
    pub fn chunk_coord_of(&self, position: Vec3) -> ChunkCoord {
        ChunkCoord::from_world(position, self.config.chunk_size)
            .clamp_to_margin(self.config.view_distance)
    }

    /// Last chunk the observer was streamed around.
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    // -----------------------------------------------------------------------
    // Streaming
    // -----------------------------------------------------------------------

    /// Make the resident set match the window around `observer` and return it.
    pub fn ensure_around(&mut self, observer: Vec3) -> &HashMap<ChunkCoord, ChunkData> {
        self.stream_around(observer);
        &self.chunks
    }

    /// Like [`ensure_around`](Self::ensure_around) but reports what changed.
    ///
    /// A call while the observer stays inside the same chunk does no work.
    pub fn stream_around(&mut self, observer: Vec3) -> StreamUpdate {
        let center = self.chunk_coord_of(observer);
        if self.center == Some(center) {
            return StreamUpdate {
                center: Some(center),
                ..Default::default()
            };
        }

        let required = self.window(center);
        let mut update = StreamUpdate {
            center: Some(center),
            ..Default::default()
        };

        for coord in &required {
            if self.chunks.contains_key(coord) {
                continue;
            }
            let chunk = self.generator.generate(*coord);
            debug!(
                "Activated chunk {} ({} obstacles, {} targets)",
                coord,
                chunk.obstacles.len(),
                chunk.targets.len()
            );
            self.chunks.insert(*coord, chunk);
            self.chunks_generated += 1;
            update.activated.push(*coord);
        }

        let required: HashSet<ChunkCoord> = required.into_iter().collect();
        let mut stale: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|c| !required.contains(c))
            .cloned()
            .collect();
        stale.sort();
        for coord in stale {
            self.chunks.remove(&coord);
            self.chunks_evicted += 1;
            debug!("Evicted chunk {}", coord);
            update.deactivated.push(coord);
        }

        self.center = Some(center);
        update
    }

    /// Every chunk within `view_distance` of `center`, row by row.
    fn window(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let r = self.config.view_distance.max(0);
        let side = (2 * r + 1) as usize;
        let mut coords = Vec::with_capacity(side * side);
        for dz in -r..=r {
            for dx in -r..=r {
                coords.push(ChunkCoord::new(center.cx + dx, center.cz + dz));
            }
        }
        coords
    }

    // -----------------------------------------------------------------------
    // Targets
    // -----------------------------------------------------------------------

    /// Remove a target from whichever resident chunk holds it.
    ///
    /// Returns `None` when no resident chunk has the id (already hit or
    /// evicted); that is normal control flow.
    pub fn remove_target(&mut self, target_id: &str) -> Option<Target> {
        for chunk in self.chunks.values_mut() {
            if let Some(idx) = chunk.targets.iter().position(|t| t.id == target_id) {
                debug!("Removed target {} from chunk {}", target_id, chunk.key);
                return Some(chunk.targets.remove(idx));
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn chunk(&self, coord: &ChunkCoord) -> Option<&ChunkData> {
        self.chunks.get(coord)
    }

    pub fn chunk_by_key(&self, key: &str) -> Option<&ChunkData> {
        self.chunks.values().find(|c| c.key == key)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &ChunkData> {
        self.chunks.values()
    }

    /// Resident chunk keys, sorted by coordinate.
    pub fn active_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.keys().cloned().collect();
        coords.sort();
        coords
    }

    pub fn active_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.chunks.values().flat_map(|c| c.obstacles.iter())
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.chunks.values().flat_map(|c| c.targets.iter())
    }

    pub fn chunks_generated(&self) -> u64 {
        self.chunks_generated
    }

    pub fn chunks_evicted(&self) -> u64 {
        self.chunks_evicted
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Full copy of the resident world, sorted by chunk coordinate.
    pub fn build_snapshot(&self, score: u32) -> WorldSnapshot {
        let chunks = self
            .active_coords()
            .iter()
            .filter_map(|c| self.chunks.get(c).cloned())
            .collect();

        WorldSnapshot {
            world_seed: self.config.world_seed,
            chunk_size: self.config.chunk_size,
            center: self.center,
            chunks,
            score,
        }
    }
}
