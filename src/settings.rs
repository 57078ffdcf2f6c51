//! Layered configuration: defaults ← TOML file ← `DUNE_*` environment.
//!
//! ```toml
//! [world]
//! world_seed = 7
//! view_distance = 2
//!
//! [artillery]
//! projectile_speed = 30.0
//!
//! [agent]
//! tick_rate_hz = 60.0
//! ```
//!
//! Environment keys use `__` between section and field, e.g.
//! `DUNE_WORLD__WORLD_SEED=7`.

use crate::types::{ArtilleryConfig, WorldServiceConfig};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Headless driver tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentSettings {
    /// Session name stamped on every event.
    pub session: String,
    pub tick_rate_hz: f32,
    /// Autopilot ground speed in world units per second.
    pub observer_speed: f32,
    /// Seconds between autopilot shots.
    pub fire_interval: f32,
    /// Collision radius of the observer's vehicle.
    pub observer_radius: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            session: "default".into(),
            tick_rate_hz: 30.0,
            observer_speed: 10.0,
            fire_interval: 1.5,
            observer_radius: 1.1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub world: WorldServiceConfig,
    pub artillery: ArtilleryConfig,
    pub agent: AgentSettings,
}

impl Settings {
    pub const ENV_PREFIX: &'static str = "DUNE";

    /// Load from an optional TOML file plus the environment, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: &str| Err(SettingsError::Invalid(msg.to_string()));

        if !(self.world.chunk_size > 0.0) {
            return invalid("world.chunk_size must be positive");
        }
        if self.world.view_distance < 0 {
            return invalid("world.view_distance must not be negative");
        }
        if !(self.artillery.projectile_speed > 0.0) {
            return invalid("artillery.projectile_speed must be positive");
        }
        if self.artillery.trajectory_points == 0 {
            return invalid("artillery.trajectory_points must be at least 1");
        }
        if self.artillery.max_range < 0.0 || self.artillery.splash_radius < 0.0 {
            return invalid("artillery ranges must not be negative");
        }
        if !(self.agent.tick_rate_hz > 0.0) {
            return invalid("agent.tick_rate_hz must be positive");
        }
        Ok(())
    }
}
