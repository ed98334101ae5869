// Use-case level inputs/outputs of a running segment view.

use crate::domain::tuning::DisplayTuning;
use crate::domain::{
    BulletSnapshot, EnemyId, EnemySnapshot, PlayerSnapshot, Position, SegmentId, ViewportGeometry,
};
use std::time::Duration;

/// Route state of the page hosting the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    /// Raw `displayPosition` parameter, unparsed.
    pub display_position: Option<String>,
}

impl RouteParams {
    pub fn display(raw: impl Into<String>) -> Self {
        Self {
            display_position: Some(raw.into()),
        }
    }
}

/// Reconciled state the presentation layer draws for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Number of fetch rounds applied so far.
    pub tick: u64,
    /// Segment parsed from the route, if it parsed.
    pub segment: Option<SegmentId>,
    /// Segment used for drawing and data requests.
    pub draw_segment: SegmentId,
    pub players: Vec<PlayerSnapshot>,
    pub enemies: Vec<EnemySnapshot>,
    pub bullets: Vec<BulletSnapshot>,
    /// Live destruction effects, oldest first.
    pub effects: Vec<Position>,
    pub viewport: ViewportGeometry,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    // Bullet count grew since the last rendered round.
    ShotFired {
        segment: SegmentId,
    },
    // Enemy vanished since the last rendered round.
    EnemyDestroyed {
        enemy_id: EnemyId,
        effect_origin: Position,
    },
    // Guard found the segment out of range and left the view.
    RedirectedToLobby {
        segment: Option<SegmentId>,
        total_segments: u32,
    },
}

/// Settings for spawning a segment view.
#[derive(Debug, Clone)]
pub struct SegmentSettings {
    /// Cadence of fetch opportunities, the stand-in for the display refresh.
    pub frame_interval: Duration,
    /// Upper bound on fetch rounds pending at the same time.
    pub max_in_flight_ticks: usize,
    /// Route the guard navigates to when the segment is out of range.
    pub lobby_route: String,
    pub tuning: DisplayTuning,
}

impl Default for SegmentSettings {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(1000 / 60),
            max_in_flight_ticks: 4,
            lobby_route: "/game".to_string(),
            tuning: DisplayTuning::default(),
        }
    }
}
