// Segment view: the synchronization loop behind one display.
//
// A single task owns every piece of view state. Fetch rounds, guard checks and effect
// deadlines are pending futures polled from one `select!`, so a slow round never holds up
// resize, route or teardown handling, and dropping the task cancels all of them.

use crate::domain::segment::{GuardDecision, RouteSegment, effective_segment, parse_route};
use crate::domain::tuning::DisplayTuning;
use crate::domain::{
    AuthorityError, BulletSnapshot, EnemySnapshot, GameAuthority, GlobalConfig, Navigator,
    PlayerSnapshot, SegmentId, ViewportGeometry, WindowSize,
};
use crate::use_cases::effects::EffectQueue;
use crate::use_cases::guard::check_segment;
use crate::use_cases::inference::{effect_origin, infer_events};
use crate::use_cases::types::{Frame, RouteParams, SegmentSettings, ViewEvent};

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::{Notify, broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{Instrument, debug, info, info_span, warn};

const VIEW_EVENT_CAPACITY: usize = 64;

/// Result of one round of the three entity fetches.
///
/// `seq` is the issue order of the round; rounds may complete out of that order.
#[derive(Debug)]
pub struct FetchRound {
    pub seq: u64,
    pub segment: SegmentId,
    pub players: Result<Vec<PlayerSnapshot>, AuthorityError>,
    pub enemies: Result<Vec<EnemySnapshot>, AuthorityError>,
    pub bullets: Result<Vec<BulletSnapshot>, AuthorityError>,
}

impl FetchRound {
    fn log_failures(&self) {
        let failures = [
            ("players", self.players.as_ref().err()),
            ("enemies", self.enemies.as_ref().err()),
            ("bullets", self.bullets.as_ref().err()),
        ];
        for (collection, error) in failures {
            if let Some(error) = error {
                warn!(collection, %error, "fetch failed; keeping last rendered state");
            }
        }
    }
}

/// Everything the view renders. Only the segment task mutates it.
#[derive(Debug)]
pub struct SegmentState {
    tuning: DisplayTuning,
    segment: Option<SegmentId>,
    players: Vec<PlayerSnapshot>,
    enemies: Vec<EnemySnapshot>,
    bullets: Vec<BulletSnapshot>,
    effects: EffectQueue,
    viewport: ViewportGeometry,
    applied_rounds: u64,
    last_applied_seq: Option<u64>,
}

impl SegmentState {
    pub fn new(tuning: DisplayTuning, segment: Option<SegmentId>, window: WindowSize) -> Self {
        Self {
            tuning,
            segment,
            players: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            effects: EffectQueue::new(tuning.effect_lifetime),
            viewport: ViewportGeometry::compute(
                window,
                tuning.logical_width,
                tuning.logical_height,
            ),
            applied_rounds: 0,
            last_applied_seq: None,
        }
    }

    pub fn draw_segment(&self) -> SegmentId {
        effective_segment(self.segment)
    }

    pub fn set_segment(&mut self, segment: Option<SegmentId>) {
        self.segment = segment;
    }

    pub fn resize(&mut self, window: WindowSize) {
        self.viewport = ViewportGeometry::compute(
            window,
            self.tuning.logical_width,
            self.tuning.logical_height,
        );
    }

    /// True when the round was fetched for another segment, or was issued before a round
    /// that has already been applied.
    pub fn is_stale(&self, round: &FetchRound) -> bool {
        round.segment != self.draw_segment()
            || self.last_applied_seq.is_some_and(|last| round.seq <= last)
    }

    /// Reconciles a completed round against the last rendered state.
    ///
    /// Each collection is applied only if its own fetch succeeded; a failed fetch leaves the
    /// previous snapshot in place and so cannot produce events.
    pub fn apply_round(&mut self, round: FetchRound, now: Instant) -> Vec<ViewEvent> {
        let current_enemies = match &round.enemies {
            Ok(enemies) => enemies.as_slice(),
            Err(_) => self.enemies.as_slice(),
        };
        let current_bullets = match &round.bullets {
            Ok(bullets) => bullets.as_slice(),
            Err(_) => self.bullets.as_slice(),
        };
        let inferred = infer_events(
            &self.enemies,
            current_enemies,
            self.bullets.len(),
            current_bullets,
        );

        let mut events = Vec::with_capacity(inferred.destroyed.len() + 1);
        for enemy in inferred.destroyed {
            let origin = effect_origin(&enemy, self.tuning.enemy_half_width);
            self.effects.spawn(origin, now);
            events.push(ViewEvent::EnemyDestroyed {
                enemy_id: enemy.enemy_id,
                effect_origin: origin,
            });
        }
        if inferred.shot_fired {
            events.push(ViewEvent::ShotFired {
                segment: round.segment,
            });
        }

        if let Ok(players) = round.players {
            self.players = players;
        }
        if let Ok(enemies) = round.enemies {
            self.enemies = enemies;
        }
        if let Ok(bullets) = round.bullets {
            self.bullets = bullets;
        }
        self.applied_rounds += 1;
        self.last_applied_seq = Some(round.seq);
        events
    }

    pub fn next_effect_expiry(&self) -> Option<Instant> {
        self.effects.next_expiry()
    }

    pub fn expire_effects(&mut self, now: Instant) -> usize {
        self.effects.expire(now)
    }

    pub fn frame(&self) -> Frame {
        Frame {
            tick: self.applied_rounds,
            segment: self.segment,
            draw_segment: self.draw_segment(),
            players: self.players.clone(),
            enemies: self.enemies.clone(),
            bullets: self.bullets.clone(),
            effects: self.effects.origins(),
            viewport: self.viewport,
        }
    }
}

/// Owner-side handle of a running segment view.
pub struct SegmentHandle {
    frame_rx: watch::Receiver<Frame>,
    events_tx: broadcast::Sender<ViewEvent>,
    route_tx: watch::Sender<RouteParams>,
    window_tx: watch::Sender<WindowSize>,
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

impl SegmentHandle {
    /// Mounts the view: spawns its task and starts fetching on the next frame.
    pub fn spawn(
        authority: Arc<dyn GameAuthority>,
        navigator: Arc<dyn Navigator>,
        settings: SegmentSettings,
        route: RouteParams,
        window: WindowSize,
    ) -> Self {
        let route_segment = parse_route(route.display_position.as_deref());
        let state = SegmentState::new(settings.tuning, route_segment.segment(), window);
        let span = info_span!("segment", segment = state.draw_segment());

        let (frame_tx, frame_rx) = watch::channel(state.frame());
        let (events_tx, _events_rx) = broadcast::channel(VIEW_EVENT_CAPACITY);
        let (route_tx, route_rx) = watch::channel(route);
        let (window_tx, window_rx) = watch::channel(window);
        let shutdown = Arc::new(Notify::new());

        let task = SegmentTask {
            authority,
            navigator,
            settings,
            state,
            route: route_segment,
            route_rx,
            window_rx,
            frame_tx,
            events_tx: events_tx.clone(),
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(task.run().instrument(span));

        Self {
            frame_rx,
            events_tx,
            route_tx,
            window_tx,
            shutdown,
            task,
        }
    }

    /// Latest reconciled frame, updated after every state change.
    pub fn frames(&self) -> watch::Receiver<Frame> {
        self.frame_rx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events_tx.subscribe()
    }

    /// Reports a new window size; the viewport is recomputed from scratch.
    pub fn resize(&self, window: WindowSize) {
        self.window_tx.send_replace(window);
    }

    /// Reports a route change; the segment is re-resolved and the guard re-runs.
    pub fn navigate(&self, route: RouteParams) {
        self.route_tx.send_replace(route);
    }

    /// True once the view has left (torn down or redirected).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Unmounts the view, cancelling pending fetches, guard checks and effect timers.
    pub async fn teardown(self) {
        self.shutdown.notify_one();
        if let Err(error) = self.task.await {
            warn!(%error, "segment task ended abnormally");
        }
    }
}

type GuardCheck = (RouteSegment, Result<GuardDecision, AuthorityError>);

struct SegmentTask {
    authority: Arc<dyn GameAuthority>,
    navigator: Arc<dyn Navigator>,
    settings: SegmentSettings,
    state: SegmentState,
    route: RouteSegment,
    route_rx: watch::Receiver<RouteParams>,
    window_rx: watch::Receiver<WindowSize>,
    frame_tx: watch::Sender<Frame>,
    events_tx: broadcast::Sender<ViewEvent>,
    shutdown: Arc<Notify>,
}

impl SegmentTask {
    async fn run(self) {
        let SegmentTask {
            authority,
            navigator,
            settings,
            mut state,
            route,
            mut route_rx,
            mut window_rx,
            frame_tx,
            events_tx,
            shutdown,
        } = self;

        let mut frames = tokio::time::interval(settings.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut rounds: FuturesUnordered<BoxFuture<'static, FetchRound>> =
            FuturesUnordered::new();
        let mut guard_checks: FuturesUnordered<BoxFuture<'static, GuardCheck>> =
            FuturesUnordered::new();
        guard_checks.push(guard_check(authority.clone(), route));
        let mut issued_rounds: u64 = 0;

        info!("segment view mounted");

        loop {
            let next_expiry = state.next_effect_expiry();
            tokio::select! {
                _ = shutdown.notified() => {
                    info!(in_flight = rounds.len(), "segment view torn down");
                    break;
                }
                _ = frames.tick() => {
                    if rounds.len() < settings.max_in_flight_ticks {
                        issued_rounds += 1;
                        let segment = state.draw_segment();
                        rounds.push(fetch_round(authority.clone(), issued_rounds, segment));
                    } else {
                        let in_flight = rounds.len();
                        debug!(in_flight, "fetch rounds still pending; frame skipped");
                    }
                }
                Some(round) = rounds.next() => {
                    if state.is_stale(&round) {
                        debug!(
                            seq = round.seq,
                            round_segment = round.segment,
                            "dropping stale fetch round"
                        );
                        continue;
                    }
                    round.log_failures();
                    for event in state.apply_round(round, Instant::now()) {
                        match &event {
                            ViewEvent::ShotFired { .. } => debug!("shot cue"),
                            ViewEvent::EnemyDestroyed { enemy_id, .. } => {
                                debug!(%enemy_id, "enemy destroyed")
                            }
                            ViewEvent::RedirectedToLobby { .. } => {}
                        }
                        // No subscribers is fine; the frame still carries the state.
                        let _ = events_tx.send(event);
                    }
                    frame_tx.send_replace(state.frame());
                }
                _ = wait_for_expiry(next_expiry) => {
                    let expired = state.expire_effects(Instant::now());
                    debug!(expired, "effects expired");
                    frame_tx.send_replace(state.frame());
                }
                changed = window_rx.changed() => {
                    if changed.is_err() {
                        debug!("window handle dropped; unmounting");
                        break;
                    }
                    let window = *window_rx.borrow_and_update();
                    state.resize(window);
                    debug!(width = window.width, height = window.height, "viewport recomputed");
                    frame_tx.send_replace(state.frame());
                }
                changed = route_rx.changed() => {
                    if changed.is_err() {
                        debug!("route handle dropped; unmounting");
                        break;
                    }
                    let params = route_rx.borrow_and_update().clone();
                    let route = parse_route(params.display_position.as_deref());
                    let segment = route.segment();
                    info!(?segment, "route changed");
                    state.set_segment(segment);
                    tracing::Span::current().record("segment", state.draw_segment());
                    // A check still pending for the old route no longer applies.
                    guard_checks = FuturesUnordered::new();
                    guard_checks.push(guard_check(authority.clone(), route));
                    frame_tx.send_replace(state.frame());
                }
                Some((route, result)) = guard_checks.next() => {
                    match result {
                        Ok(GuardDecision::Stay) => {}
                        Ok(GuardDecision::RedirectToLobby { total_segments }) => {
                            let segment = route.segment();
                            info!(
                                route_value = route.guard_value(),
                                ?segment,
                                total_segments,
                                route = %settings.lobby_route,
                                "segment out of range; redirecting to lobby"
                            );
                            navigator.redirect_to(&settings.lobby_route);
                            let _ = events_tx.send(ViewEvent::RedirectedToLobby {
                                segment,
                                total_segments,
                            });
                            break;
                        }
                        Err(error) => {
                            warn!(%error, "segment guard check failed; staying on segment");
                        }
                    }
                }
            }
        }
    }
}

fn fetch_round(
    authority: Arc<dyn GameAuthority>,
    seq: u64,
    segment: SegmentId,
) -> BoxFuture<'static, FetchRound> {
    async move {
        let (players, enemies, bullets) = tokio::join!(
            authority.fetch_players(segment),
            authority.fetch_enemies(),
            authority.fetch_bullets(segment),
        );
        FetchRound {
            seq,
            segment,
            players,
            enemies,
            bullets,
        }
    }
    .boxed()
}

fn guard_check(
    authority: Arc<dyn GameAuthority>,
    route: RouteSegment,
) -> BoxFuture<'static, GuardCheck> {
    async move {
        let result = check_segment(authority.as_ref(), route).await;
        (route, result)
    }
    .boxed()
}

async fn wait_for_expiry(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Fetches the config once, outside any view. Used by hosts that want to list segments.
pub async fn fetch_total_segments(authority: &dyn GameAuthority) -> Result<u32, AuthorityError> {
    authority
        .fetch_config()
        .await
        .map(|config: GlobalConfig| config.total_segments)
}
