//! Core world types shared across all modules.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

// ---------------------------------------------------------------------------
// World constants
// ---------------------------------------------------------------------------

/// World-space side length of one streaming chunk.
pub const CHUNK_SIZE: f32 = 100.0;

/// Chebyshev radius (in chunks) kept resident around the observer.
pub const VIEW_DISTANCE: i32 = 1;

// ---------------------------------------------------------------------------
// Basic math
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn up() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance between two points projected onto the XZ plane.
    pub fn horizontal_distance(&self, other: &Vec3) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Unit vector in the same direction; a zero-length vector becomes `up`.
    pub fn normalize_or_up(&self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON {
            return Vec3::up();
        }
        Vec3::new(self.x / len, self.y / len, self.z / len)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Spatial chunking
// ---------------------------------------------------------------------------

/// Integer chunk coordinate on the XZ plane.
///
/// Chunk `(0, 0)` is centred on the world origin.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    pub fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk containing a world position, using centred floor division.
    pub fn from_world(position: Vec3, chunk_size: f32) -> Self {
        let half = chunk_size / 2.0;
        Self {
            cx: ((position.x + half) / chunk_size).floor() as i32,
            cz: ((position.z + half) / chunk_size).floor() as i32,
        }
    }

    /// Pull the coordinate in so every chunk within `margin` of it is
    /// representable. Only matters for observers near the `i32` limits.
    pub fn clamp_to_margin(self, margin: i32) -> Self {
        let margin = margin.max(0);
        let (lo, hi) = (i32::MIN + margin, i32::MAX - margin);
        Self {
            cx: self.cx.clamp(lo, hi),
            cz: self.cz.clamp(lo, hi),
        }
    }

    /// Canonical lookup key, `"cx,cz"`.
    pub fn key(&self) -> String {
        format!("{},{}", self.cx, self.cz)
    }

    /// World-space centre of the chunk.
    pub fn center(&self, chunk_size: f32) -> Vec3 {
        Vec3::new(
            self.cx as f32 * chunk_size,
            0.0,
            self.cz as f32 * chunk_size,
        )
    }

    pub fn chebyshev_distance(&self, other: &ChunkCoord) -> i32 {
        (self.cx - other.cx).abs().max((self.cz - other.cz).abs())
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.cx, self.cz)
    }
}

// ---------------------------------------------------------------------------
// World objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Cactus,
    Rock,
    Scrap,
}

/// A static prop placed by the generator. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Obstacle {
    pub id: String,
    /// World-space position; `y` is always 0, elevation is resolved by consumers.
    pub position: Vec3,
    pub kind: ObstacleKind,
    pub rotation_y: f32,
    pub scale: Vec3,
    pub collision_radius: f32,
    /// Seed for downstream procedural mesh variation.
    pub generator_seed: u32,
    pub collidable: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Wood,
    Metal,
    Tire,
}

impl TargetKind {
    /// Points awarded for destroying a target of this kind.
    pub fn score_value(&self) -> u32 {
        match self {
            TargetKind::Wood => 100,
            TargetKind::Tire => 150,
            TargetKind::Metal => 200,
        }
    }
}

/// A destructible target. Removed on hit or when its chunk is evicted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Target {
    pub id: String,
    pub position: Vec3,
    pub kind: TargetKind,
    pub rotation_y: f32,
}

impl Target {
    /// Placement / hit radius shared by every target.
    pub const RADIUS: f32 = 1.0;
}

/// Everything generated for one chunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkData {
    pub key: String,
    pub cx: i32,
    pub cz: i32,
    pub obstacles: Vec<Obstacle>,
    pub targets: Vec<Target>,
}

impl ChunkData {
    pub fn coord(&self) -> ChunkCoord {
        ChunkCoord::new(self.cx, self.cz)
    }
}

// ---------------------------------------------------------------------------
// Stats & config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldStats {
    pub active_chunks: usize,
    pub resident_obstacles: usize,
    pub resident_targets: usize,
    pub chunks_generated: u64,
    pub chunks_evicted: u64,
    pub total_frames: u64,
    pub projectiles_in_flight: usize,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldServiceConfig {
    /// Width/height of a single streaming chunk in world units.
    pub chunk_size: f32,
    /// How many chunks to keep around the observer (Chebyshev radius).
    pub view_distance: i32,
    /// Deterministic world seed.
    pub world_seed: u64,
}

impl Default for WorldServiceConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            view_distance: VIEW_DISTANCE,
            world_seed: 42,
        }
    }
}

/// Gameplay tuning for the artillery weapon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArtilleryConfig {
    /// Radius of the aiming circle around the firer (XZ).
    pub max_range: f32,
    /// Horizontal projectile speed in world units per second.
    pub projectile_speed: f32,
    pub gravity: f32,
    /// Cosmetic arc height per unit of horizontal distance.
    pub arc_height_factor: f32,
    /// Number of segments in the precomputed trajectory curve.
    pub trajectory_points: usize,
    /// Maximum XZ distance from an impact for a target to count as hit.
    pub splash_radius: f32,
}

impl Default for ArtilleryConfig {
    fn default() -> Self {
        Self {
            max_range: 50.0,
            projectile_speed: 25.0,
            gravity: 9.8,
            arc_height_factor: 0.25,
            trajectory_points: 30,
            splash_radius: 3.0,
        }
    }
}
