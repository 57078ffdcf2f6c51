//! WorldAgent – drives a [`GameSession`] from a fixed-rate tokio tick loop.
//!
//! ## Role
//!
//! The agent stands in for the input and rendering layers of a client: an
//! [`Autopilot`] steers the observer across the dunes and fires at the
//! nearest target, and every state change is published as a JSON
//! [`WorldEvent`] on an mpsc channel.
//!
//! ## Event contract (outbound)
//!
//! | Subject                      | Payload type                          |
//! |------------------------------|---------------------------------------|
//! | `world.chunk.activated`      | `WorldEvent<ChunkActivated>`          |
//! | `world.chunk.deactivated`    | `WorldEvent<ChunkDeactivated>`        |
//! | `world.projectile.fired`     | `WorldEvent<ProjectileFired>`         |
//! | `world.projectile.impact`    | `WorldEvent<ProjectileImpact>`        |
//! | `world.target.destroyed`     | `WorldEvent<TargetDestroyed>`         |
//! | `world.score`                | `WorldEvent<ScoreChanged>`            |
//! | `world.snapshot` (on exit)   | `WorldEvent<WorldSnapshot>`           |
//!
//! The session sits behind a `parking_lot::Mutex`; the lock is held for one
//! tick at a time and released before anything is published.

use crate::aiming::clamp_to_range;
use crate::protocol::{subjects, ProjectileFired, WorldEvent};
use crate::session::{GameSession, TickEvents};
use crate::settings::AgentSettings;
use crate::types::{Vec3, WorldStats};
use anyhow::{ensure, Result};
use bytes::Bytes;
use log::{info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Height above the terrain where shells leave the barrel.
pub const MUZZLE_HEIGHT: f32 = 1.5;

// ---------------------------------------------------------------------------
// Wire envelope
// ---------------------------------------------------------------------------

/// One published message: the subject plus its enveloped payload.
#[derive(Debug, Serialize)]
pub struct OutboundMessage<'a, T> {
    pub subject: &'a str,
    pub event: WorldEvent<T>,
}

// ---------------------------------------------------------------------------
// Autopilot
// ---------------------------------------------------------------------------

/// Scripted observer: drives straight, turns on obstacles, shoots on a timer.
#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Heading on the XZ plane, radians from +X.
    pub heading: f32,
    since_last_shot: f32,
}

impl Autopilot {
    pub fn new(heading: f32) -> Self {
        Self {
            heading,
            since_last_shot: 0.0,
        }
    }

    /// Move the observer one step and fire if the timer elapsed.
    pub fn drive(
        &mut self,
        session: &mut GameSession,
        settings: &AgentSettings,
        dt: f32,
    ) -> Option<ProjectileFired> {
        let pos = session.observer();
        let step = settings.observer_speed * dt;
        let mut next = Vec3::new(
            pos.x + self.heading.cos() * step,
            0.0,
            pos.z + self.heading.sin() * step,
        );
        if session.blocked(next, settings.observer_radius) {
            self.heading += FRAC_PI_2;
            next = pos;
        }
        next.y = session.terrain().height_at(next.x, next.z);
        session.set_observer(next);

        self.since_last_shot += dt;
        if self.since_last_shot < settings.fire_interval {
            return None;
        }

        let target = session
            .world()
            .targets()
            .min_by(|a, b| {
                let da = a.position.horizontal_distance(&next);
                let db = b.position.horizontal_distance(&next);
                da.total_cmp(&db)
            })?
            .position;
        self.since_last_shot = 0.0;

        let ground = session.terrain().height_at(target.x, target.z);
        let aim = clamp_to_range(
            Vec3::new(target.x, ground, target.z),
            next,
            session.artillery().max_range,
            session.terrain(),
        );
        let muzzle = Vec3::new(next.x, next.y + MUZZLE_HEIGHT, next.z);
        Some(session.fire(muzzle, aim.clamped_point))
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(0.0)
    }
}

// ---------------------------------------------------------------------------
// WorldAgent
// ---------------------------------------------------------------------------

/// Final state reported when the tick loop stops.
#[derive(Debug, Clone)]
pub struct AgentSummary {
    pub ticks: u64,
    pub stats: WorldStats,
}

pub struct WorldAgent {
    settings: AgentSettings,
    session: Arc<Mutex<GameSession>>,
    autopilot: Autopilot,
}

impl WorldAgent {
    pub fn new(settings: AgentSettings, session: Arc<Mutex<GameSession>>) -> Self {
        Self {
            settings,
            session,
            autopilot: Autopilot::default(),
        }
    }

    pub fn with_autopilot(mut self, autopilot: Autopilot) -> Self {
        self.autopilot = autopilot;
        self
    }

    /// Tick until `max_ticks` is reached or Ctrl-C is pressed.
    pub async fn run(self, sink: mpsc::Sender<Bytes>, max_ticks: Option<u64>) -> Result<AgentSummary> {
        self.run_until(sink, max_ticks, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Tick until `max_ticks` is reached or `shutdown` resolves.
    pub async fn run_until<F>(
        self,
        sink: mpsc::Sender<Bytes>,
        max_ticks: Option<u64>,
        shutdown: F,
    ) -> Result<AgentSummary>
    where
        F: Future<Output = ()>,
    {
        ensure!(
            self.settings.tick_rate_hz > 0.0,
            "tick rate must be positive, got {}",
            self.settings.tick_rate_hz
        );

        let Self {
            settings,
            session,
            mut autopilot,
        } = self;
        let dt = 1.0 / settings.tick_rate_hz;

        info!(
            "WorldAgent '{}' ticking at {:.0}Hz",
            settings.session, settings.tick_rate_hz
        );

        let mut timer = tokio::time::interval(std::time::Duration::from_secs_f32(dt));
        tokio::pin!(shutdown);
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("WorldAgent shutting down after {} ticks", ticks);
                    break;
                }
                _ = timer.tick() => {}
            }

            // Hold the lock only long enough to tick, then release before publishing.
            let outbound = {
                let span = tracing::debug_span!("tick", n = ticks + 1);
                let _entered = span.enter();
                let mut session = session.lock();
                let fired = autopilot.drive(&mut session, &settings, dt);
                let events = session.update(dt);
                encode_tick(&settings.session, fired, events)
            };

            for payload in outbound {
                publish(&sink, payload).await;
            }

            ticks += 1;
            if max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
        }

        let (snapshot, frame, stats) = {
            let session = session.lock();
            (session.build_snapshot(), session.frame(), session.stats())
        };
        if let Some(payload) = encode(subjects::SNAPSHOT, &settings.session, frame, snapshot) {
            publish(&sink, payload).await;
        }

        Ok(AgentSummary { ticks, stats })
    }
}

// ---------------------------------------------------------------------------
// Publish helpers
// ---------------------------------------------------------------------------

fn encode_tick(session: &str, fired: Option<ProjectileFired>, events: TickEvents) -> Vec<Bytes> {
    let frame = events.frame;
    let mut out = Vec::new();

    for chunk in events.activated {
        out.extend(encode(subjects::CHUNK_ACTIVATED, session, frame, chunk));
    }
    for chunk in events.deactivated {
        out.extend(encode(subjects::CHUNK_DEACTIVATED, session, frame, chunk));
    }
    if let Some(shot) = fired {
        out.extend(encode(subjects::PROJECTILE_FIRED, session, frame, shot));
    }
    for impact in events.impacts {
        out.extend(encode(subjects::PROJECTILE_IMPACT, session, frame, impact));
    }
    for target in events.destroyed {
        out.extend(encode(subjects::TARGET_DESTROYED, session, frame, target));
    }
    if let Some(score) = events.score {
        out.extend(encode(subjects::SCORE, session, frame, score));
    }

    out
}

/// Serialise one event; failures are logged and the event dropped.
fn encode<T: Serialize>(subject: &str, session: &str, frame: u64, payload: T) -> Option<Bytes> {
    let message = OutboundMessage {
        subject,
        event: WorldEvent::new(session, frame, payload),
    };
    match serde_json::to_vec(&message) {
        Ok(bytes) => Some(Bytes::from(bytes)),
        Err(e) => {
            warn!("Failed to serialise event for {}: {}", subject, e);
            None
        }
    }
}

/// Errors are logged and swallowed; a closed sink does not stop the loop.
async fn publish(sink: &mpsc::Sender<Bytes>, payload: Bytes) {
    if let Err(e) = sink.send(payload).await {
        warn!("Failed to publish event: {}", e);
    }
}
