//! `world.*` event payloads.
//!
//! Everything a renderer, HUD or recorder needs to mirror the simulation is
//! emitted as one of these messages, wrapped in a [`WorldEvent`] envelope.
//!
//! ## Subjects
//!
//! | Subject                      | Payload              |
//! |------------------------------|----------------------|
//! | `world.chunk.activated`      | [`ChunkActivated`]   |
//! | `world.chunk.deactivated`    | [`ChunkDeactivated`] |
//! | `world.projectile.fired`     | [`ProjectileFired`]  |
//! | `world.projectile.impact`    | [`ProjectileImpact`] |
//! | `world.target.destroyed`     | [`TargetDestroyed`]  |
//! | `world.score`                | [`ScoreChanged`]     |
//! | `world.snapshot`             | [`WorldSnapshot`]    |
//!
//! ## Design rules
//!
//! 1. Every struct is `Serialize + Deserialize` with snake_case JSON.
//! 2. Chunk activation carries the seed and coordinate, not the obstacle list;
//!    consumers regenerate or ask for a snapshot.
//! 3. Every outbound event includes `frame: u64` and `session: String`.

use crate::types::{ChunkCoord, ChunkData, TargetKind, Vec3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Common envelope
// ---------------------------------------------------------------------------

/// Every outbound message is wrapped in this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldEvent<T> {
    pub session: String,
    pub frame: u64,
    pub payload: T,
}

impl<T> WorldEvent<T> {
    pub fn new(session: impl Into<String>, frame: u64, payload: T) -> Self {
        Self {
            session: session.into(),
            frame,
            payload,
        }
    }
}

// ---------------------------------------------------------------------------
// Chunk events  (subjects: world.chunk.*)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkActivated {
    /// Canonical `"cx,cz"` key.
    pub chunk_key: String,
    pub cx: i32,
    pub cz: i32,
    /// World seed; enough to regenerate the chunk locally.
    pub world_seed: u64,
    pub chunk_size: f32,
    pub obstacle_count: usize,
    pub target_count: usize,
}

impl ChunkActivated {
    pub fn from_chunk(chunk: &ChunkData, world_seed: u64, chunk_size: f32) -> Self {
        Self {
            chunk_key: chunk.key.clone(),
            cx: chunk.cx,
            cz: chunk.cz,
            world_seed,
            chunk_size,
            obstacle_count: chunk.obstacles.len(),
            target_count: chunk.targets.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkDeactivated {
    pub chunk_key: String,
}

impl From<ChunkCoord> for ChunkDeactivated {
    fn from(coord: ChunkCoord) -> Self {
        Self {
            chunk_key: coord.key(),
        }
    }
}

// ---------------------------------------------------------------------------
// Projectile events  (subjects: world.projectile.*)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectileFired {
    pub projectile_id: u64,
    pub origin: Vec3,
    pub target: Vec3,
    pub duration: f32,
    pub arc_height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectileImpact {
    pub projectile_id: u64,
    pub point: Vec3,
    /// Targets destroyed by this impact; empty on a miss.
    pub hit_target_ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Target / score events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetDestroyed {
    pub target_id: String,
    pub kind: TargetKind,
    pub points: u32,
    pub by_projectile: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreChanged {
    pub total: u32,
    pub hits: u32,
    pub shots: u32,
}

// ---------------------------------------------------------------------------
// Snapshot  (subject: world.snapshot)
// ---------------------------------------------------------------------------

/// Full resident world, for a consumer joining mid-session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    pub world_seed: u64,
    pub chunk_size: f32,
    pub center: Option<ChunkCoord>,
    pub chunks: Vec<ChunkData>,
    pub score: u32,
}

// ---------------------------------------------------------------------------
// Subject helpers
// ---------------------------------------------------------------------------

pub mod subjects {
    pub const CHUNK_ACTIVATED: &str = "world.chunk.activated";
    pub const CHUNK_DEACTIVATED: &str = "world.chunk.deactivated";

    pub const PROJECTILE_FIRED: &str = "world.projectile.fired";
    pub const PROJECTILE_IMPACT: &str = "world.projectile.impact";

    pub const TARGET_DESTROYED: &str = "world.target.destroyed";
    pub const SCORE: &str = "world.score";

    pub const SNAPSHOT: &str = "world.snapshot";
}
