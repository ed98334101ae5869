/// Presentation tuning shared by every display segment.
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTuning {
    /// Width of the fixed logical canvas in pixels.
    pub logical_width: f64,

    /// Height of the fixed logical canvas in pixels.
    pub logical_height: f64,

    /// Half the enemy sprite width; centers destruction effects on the sprite.
    pub enemy_half_width: f64,

    /// How long a destruction effect stays on screen.
    pub effect_lifetime: Duration,
}

impl Default for DisplayTuning {
    fn default() -> Self {
        Self {
            logical_width: 1920.0,
            logical_height: 1080.0,
            enemy_half_width: 40.0,
            effect_lifetime: Duration::from_millis(1000),
        }
    }
}
