use crate::domain::WindowSize;
use crate::domain::tuning::DisplayTuning;
use crate::use_cases::{RouteParams, SegmentSettings};
use std::{env, time::Duration};

// Runtime knobs read from the environment (not display tuning).

pub fn authority_url() -> String {
    env::var("AUTHORITY_URL").unwrap_or_else(|_| "http://127.0.0.1:31577/api".to_string())
}

pub fn authority_timeout() -> Duration {
    let millis = env::var("AUTHORITY_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(1000);
    Duration::from_millis(millis)
}

// Stand-in for the `displayPosition` route parameter; left unparsed on purpose.
pub fn route() -> RouteParams {
    RouteParams {
        display_position: env::var("DISPLAY_POSITION").ok(),
    }
}

pub fn frame_interval() -> Duration {
    let rate = env::var("FRAME_RATE")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|rate| *rate > 0)
        .unwrap_or(60);
    Duration::from_millis((1000 / rate).max(1))
}

pub fn max_in_flight_ticks() -> usize {
    env::var("MAX_IN_FLIGHT_TICKS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|max| *max > 0)
        .unwrap_or(4)
}

pub fn window_size(tuning: &DisplayTuning) -> WindowSize {
    let read = |key: &str, default: f64| {
        env::var(key)
            .ok()
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|value| *value > 0.0)
            .unwrap_or(default)
    };
    WindowSize {
        width: read("WINDOW_WIDTH", tuning.logical_width),
        height: read("WINDOW_HEIGHT", tuning.logical_height),
    }
}

// Lobby route and tuning are not environment knobs; they come from the settings defaults.
pub fn segment_settings() -> SegmentSettings {
    SegmentSettings {
        frame_interval: frame_interval(),
        max_in_flight_ticks: max_in_flight_ticks(),
        ..SegmentSettings::default()
    }
}
