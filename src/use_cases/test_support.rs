use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    AuthorityError, BulletId, BulletSnapshot, EnemySnapshot, GameAuthority, GlobalConfig,
    Navigator, PlayerSnapshot, Position, SegmentId, UserId,
};

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub players: bool,
    pub enemies: bool,
    pub bullets: bool,
    pub config: bool,
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub(crate) struct CallCounts {
    pub players: usize,
    pub enemies: usize,
    pub bullets: usize,
    pub config: usize,
}

#[derive(Default)]
struct ScriptedWorld {
    players: Vec<PlayerSnapshot>,
    enemies: Vec<EnemySnapshot>,
    bullets: Vec<BulletSnapshot>,
    total_segments: u32,
    failures: FailureFlags,
    enemy_latency: Duration,
    queued_enemy_latencies: VecDeque<Duration>,
    calls: CallCounts,
    requested_segments: Vec<SegmentId>,
}

// In-memory authority whose world the test rewrites between rounds.
#[derive(Clone)]
pub(crate) struct ScriptedAuthority {
    world: Arc<Mutex<ScriptedWorld>>,
}

impl ScriptedAuthority {
    pub(crate) fn new(total_segments: u32) -> Self {
        Self {
            world: Arc::new(Mutex::new(ScriptedWorld {
                total_segments,
                ..ScriptedWorld::default()
            })),
        }
    }

    fn with_world<R>(&self, f: impl FnOnce(&mut ScriptedWorld) -> R) -> R {
        let mut guard = self.world.lock().expect("world mutex poisoned");
        f(&mut guard)
    }

    pub(crate) fn set_players(&self, players: Vec<PlayerSnapshot>) {
        self.with_world(|w| w.players = players);
    }

    pub(crate) fn set_enemies(&self, enemies: Vec<EnemySnapshot>) {
        self.with_world(|w| w.enemies = enemies);
    }

    pub(crate) fn set_total_segments(&self, total_segments: u32) {
        self.with_world(|w| w.total_segments = total_segments);
    }

    pub(crate) fn set_failures(&self, failures: FailureFlags) {
        self.with_world(|w| w.failures = failures);
    }

    pub(crate) fn set_enemy_latency(&self, latency: Duration) {
        self.with_world(|w| w.enemy_latency = latency);
    }

    /// Latency for the next enemy fetch only; later fetches fall back to the default.
    pub(crate) fn queue_enemy_latency(&self, latency: Duration) {
        self.with_world(|w| w.queued_enemy_latencies.push_back(latency));
    }

    pub(crate) fn calls(&self) -> CallCounts {
        self.with_world(|w| w.calls)
    }

    pub(crate) fn requested_segments(&self) -> Vec<SegmentId> {
        self.with_world(|w| w.requested_segments.clone())
    }
}

fn unavailable() -> AuthorityError {
    AuthorityError::Upstream {
        status: 503,
        message: Some("scripted failure".to_string()),
    }
}

#[async_trait]
impl GameAuthority for ScriptedAuthority {
    async fn fetch_players(
        &self,
        segment: SegmentId,
    ) -> Result<Vec<PlayerSnapshot>, AuthorityError> {
        self.with_world(|w| {
            w.calls.players += 1;
            w.requested_segments.push(segment);
            if w.failures.players {
                return Err(unavailable());
            }
            Ok(w.players.clone())
        })
    }

    async fn fetch_enemies(&self) -> Result<Vec<EnemySnapshot>, AuthorityError> {
        // The response reflects the world when the request was made, not when it lands.
        let (latency, response) = self.with_world(|w| {
            w.calls.enemies += 1;
            let latency = w
                .queued_enemy_latencies
                .pop_front()
                .unwrap_or(w.enemy_latency);
            let response = if w.failures.enemies {
                Err(unavailable())
            } else {
                Ok(w.enemies.clone())
            };
            (latency, response)
        });
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        response
    }

    async fn fetch_bullets(
        &self,
        segment: SegmentId,
    ) -> Result<Vec<BulletSnapshot>, AuthorityError> {
        self.with_world(|w| {
            w.calls.bullets += 1;
            w.requested_segments.push(segment);
            if w.failures.bullets {
                return Err(unavailable());
            }
            Ok(w.bullets.clone())
        })
    }

    async fn fetch_config(&self) -> Result<GlobalConfig, AuthorityError> {
        self.with_world(|w| {
            w.calls.config += 1;
            if w.failures.config {
                return Err(unavailable());
            }
            Ok(GlobalConfig {
                total_segments: w.total_segments,
            })
        })
    }

    async fn create_bullet(
        &self,
        user_id: &UserId,
    ) -> Result<Option<BulletSnapshot>, AuthorityError> {
        self.with_world(|w| {
            let bullet = BulletSnapshot {
                bullet_id: BulletId(format!("{user_id}-{}", w.bullets.len())),
                position: Position::default(),
                attributes: Default::default(),
            };
            w.bullets.push(bullet.clone());
            Ok(Some(bullet))
        })
    }
}

// Navigator that remembers every route it was asked to open.
#[derive(Clone, Default)]
pub(crate) struct RecordingNavigator {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub(crate) fn routes(&self) -> Vec<String> {
        self.routes.lock().expect("routes mutex poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to(&self, route: &str) {
        self.routes
            .lock()
            .expect("routes mutex poisoned")
            .push(route.to_string());
    }
}
