//! GameSession – one frame-driven play session.
//!
//! Owns the streaming [`WorldService`], the terrain, in-flight projectiles
//! and the score. The caller drives it with [`GameSession::update`] once per
//! frame; nothing here blocks or spawns work.

use crate::aiming::{resolve_aim, AimSolution, Ray};
use crate::ballistics::{ParabolicStrategy, ShootingStrategy, TrajectoryConfig};
use crate::collision::first_blocking;
use crate::projectile::{targets_in_splash, Projectile, ProjectileStep};
use crate::protocol::{
    ChunkActivated, ChunkDeactivated, ProjectileFired, ProjectileImpact, ScoreChanged,
    TargetDestroyed, WorldSnapshot,
};
use crate::service::WorldService;
use crate::terrain::TerrainSource;
use crate::types::{ArtilleryConfig, Obstacle, TargetKind, Vec3, WorldServiceConfig, WorldStats};
use log::{debug, info};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    pub total: u32,
    pub hits: u32,
    pub shots: u32,
}

impl ScoreBoard {
    pub fn record_shot(&mut self) {
        self.shots += 1;
    }

    /// Credit a destroyed target; returns the points awarded.
    pub fn record_hit(&mut self, kind: TargetKind) -> u32 {
        let points = kind.score_value();
        self.total += points;
        self.hits += 1;
        points
    }

    fn as_event(&self) -> ScoreChanged {
        ScoreChanged {
            total: self.total,
            hits: self.hits,
            shots: self.shots,
        }
    }
}

// ---------------------------------------------------------------------------
// Tick result
// ---------------------------------------------------------------------------

/// Events produced by a single [`GameSession::update`] call.
#[derive(Debug, Clone, Default)]
pub struct TickEvents {
    /// The frame counter that produced this set of events.
    pub frame: u64,
    pub activated: Vec<ChunkActivated>,
    pub deactivated: Vec<ChunkDeactivated>,
    pub impacts: Vec<ProjectileImpact>,
    pub destroyed: Vec<TargetDestroyed>,
    /// Set when the score changed this frame.
    pub score: Option<ScoreChanged>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct GameSession {
    service: WorldService,
    terrain: Arc<dyn TerrainSource>,
    strategy: Box<dyn ShootingStrategy>,
    artillery: ArtilleryConfig,
    observer: Vec3,
    projectiles: Vec<Projectile>,
    next_projectile_id: u64,
    score: ScoreBoard,
    frame: u64,
}

impl GameSession {
    pub fn new(
        world: WorldServiceConfig,
        artillery: ArtilleryConfig,
        terrain: Arc<dyn TerrainSource>,
    ) -> Self {
        info!(
            "Starting session (seed={}, chunk_size={}, view_distance={})",
            world.world_seed, world.chunk_size, world.view_distance
        );
        Self {
            service: WorldService::new(world),
            terrain,
            strategy: Box::new(ParabolicStrategy),
            artillery,
            observer: Vec3::zero(),
            projectiles: Vec::new(),
            next_projectile_id: 1,
            score: ScoreBoard::default(),
            frame: 0,
        }
    }

    pub fn with_strategy(mut self, strategy: Box<dyn ShootingStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn world(&self) -> &WorldService {
        &self.service
    }

    pub fn world_mut(&mut self) -> &mut WorldService {
        &mut self.service
    }

    pub fn terrain(&self) -> &dyn TerrainSource {
        self.terrain.as_ref()
    }

    pub fn artillery(&self) -> &ArtilleryConfig {
        &self.artillery
    }

    pub fn score(&self) -> ScoreBoard {
        self.score
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn observer(&self) -> Vec3 {
        self.observer
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    // -----------------------------------------------------------------------
    // Observer
    // -----------------------------------------------------------------------

    /// Move the observer; streaming catches up on the next `update`.
    pub fn set_observer(&mut self, position: Vec3) {
        self.observer = position;
    }

    /// First collidable obstacle a circle of `radius` at `position` touches.
    pub fn blocking_obstacle(&self, position: Vec3, radius: f32) -> Option<&Obstacle> {
        first_blocking(position, radius, self.service.obstacles())
    }

    pub fn blocked(&self, position: Vec3, radius: f32) -> bool {
        self.blocking_obstacle(position, radius).is_some()
    }

    // -----------------------------------------------------------------------
    // Firing
    // -----------------------------------------------------------------------

    /// Resolve a camera ray into an aim point around the observer.
    pub fn aim(&self, ray: &Ray) -> Option<AimSolution> {
        resolve_aim(
            ray,
            self.observer,
            self.artillery.max_range,
            self.terrain.as_ref(),
        )
    }

    /// Launch a projectile from `origin` to `aim_point`.
    ///
    /// `aim_point` is expected to be clamped already; no range check is done.
    pub fn fire(&mut self, origin: Vec3, aim_point: Vec3) -> ProjectileFired {
        let config = TrajectoryConfig::from(&self.artillery);
        let trajectory = self
            .strategy
            .calculate_trajectory(origin, aim_point, &config);

        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        self.score.record_shot();

        debug!(
            "Fired projectile {} from {} to {} ({:.2}s)",
            id, origin, aim_point, trajectory.duration
        );

        let event = ProjectileFired {
            projectile_id: id,
            origin,
            target: aim_point,
            duration: trajectory.duration,
            arc_height: trajectory.arc_height,
        };
        self.projectiles.push(Projectile::new(id, trajectory));
        event
    }

    // -----------------------------------------------------------------------
    // Main tick
    // -----------------------------------------------------------------------

    /// Advance the session by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> TickEvents {
        self.frame += 1;
        let mut events = TickEvents {
            frame: self.frame,
            ..Default::default()
        };

        let streamed = self.service.stream_around(self.observer);
        let (seed, size) = (
            self.service.config().world_seed,
            self.service.config().chunk_size,
        );
        events.activated = streamed
            .activated
            .iter()
            .filter_map(|c| self.service.chunk(c))
            .map(|chunk| ChunkActivated::from_chunk(chunk, seed, size))
            .collect();
        events.deactivated = streamed
            .deactivated
            .into_iter()
            .map(ChunkDeactivated::from)
            .collect();

        let mut impacts = Vec::new();
        for projectile in &mut self.projectiles {
            if let ProjectileStep::Impact { point } = projectile.advance(dt, self.terrain.as_ref()) {
                impacts.push((projectile.id, point));
            }
        }
        self.projectiles.retain(|p| !p.is_spent());

        for (projectile_id, point) in impacts {
            let impact = self.resolve_impact(projectile_id, point, &mut events.destroyed);
            events.impacts.push(impact);
        }

        if !events.destroyed.is_empty() {
            events.score = Some(self.score.as_event());
        }

        events
    }

    /// Remove and score every target inside the splash radius of `point`.
    fn resolve_impact(
        &mut self,
        projectile_id: u64,
        point: Vec3,
        destroyed: &mut Vec<TargetDestroyed>,
    ) -> ProjectileImpact {
        let hit_ids: Vec<String> =
            targets_in_splash(point, self.artillery.splash_radius, self.service.targets())
                .into_iter()
                .map(|t| t.id.clone())
                .collect();

        let mut hit_target_ids = Vec::with_capacity(hit_ids.len());
        for id in hit_ids {
            // A target can only be removed once; a second removal is a miss.
            let Some(target) = self.service.remove_target(&id) else {
                continue;
            };
            let points = self.score.record_hit(target.kind);
            debug!(
                "Projectile {} destroyed {} (+{} points)",
                projectile_id, target.id, points
            );
            destroyed.push(TargetDestroyed {
                target_id: target.id.clone(),
                kind: target.kind,
                points,
                by_projectile: projectile_id,
            });
            hit_target_ids.push(target.id);
        }

        ProjectileImpact {
            projectile_id,
            point,
            hit_target_ids,
        }
    }

    // -----------------------------------------------------------------------
    // Snapshot & stats
    // -----------------------------------------------------------------------

    pub fn build_snapshot(&self) -> WorldSnapshot {
        self.service.build_snapshot(self.score.total)
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            active_chunks: self.service.active_count(),
            resident_obstacles: self.service.obstacles().count(),
            resident_targets: self.service.targets().count(),
            chunks_generated: self.service.chunks_generated(),
            chunks_evicted: self.service.chunks_evicted(),
            total_frames: self.frame,
            projectiles_in_flight: self.projectiles.len(),
            score: self.score.total,
        }
    }
}
