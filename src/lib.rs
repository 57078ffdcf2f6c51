//! Dune World Engine
//!
//! Procedurally streams an endless desert around a moving observer and
//! computes closed-form artillery trajectories across it.
//!
//! ## Architecture
//!
//! ```text
//! WorldAgent  (agent.rs)          ← tokio tick loop, JSON event publishing
//!   └── GameSession  (session.rs) ← frame update, projectiles, score
//!         ├── WorldService  (service.rs)     ← chunk streaming, target removal
//!         │     └── ChunkGenerator  (generator.rs)
//!         ├── TerrainSource  (terrain.rs)    ← height + normal
//!         └── ShootingStrategy  (ballistics.rs)
//! ```
//!
//! Everything below `WorldAgent` is synchronous and deterministic for a
//! given world seed.

pub mod aiming;
pub mod ballistics;
pub mod collision;
pub mod generator;
pub mod projectile;
pub mod protocol;
pub mod service;
pub mod session;
pub mod settings;
pub mod terrain;
pub mod types;

// The headless driver requires the `server` feature.
#[cfg(feature = "server")]
pub mod agent;

// Convenience re-exports
#[cfg(feature = "server")]
pub use agent::{Autopilot, WorldAgent};
pub use aiming::{AimSolution, Ray};
pub use ballistics::{
    calculate_trajectory, ParabolicStrategy, ShootingStrategy, Trajectory, TrajectoryConfig,
};
pub use generator::{generate_chunk, ChunkGenerator};
pub use service::{StreamUpdate, WorldService};
pub use session::{GameSession, ScoreBoard, TickEvents};
pub use settings::{Settings, SettingsError};
pub use terrain::{DuneTerrain, FlatTerrain, TerrainSource};
pub use types::{
    ArtilleryConfig, ChunkCoord, ChunkData, Obstacle, ObstacleKind, Target, TargetKind, Vec3,
    WorldServiceConfig, WorldStats,
};
