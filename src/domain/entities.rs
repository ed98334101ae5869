// Snapshot entities as served by the game authority for one display segment.

use serde_json::{Map, Value};
use std::fmt;

/// Index of one physical display in the mosaic.
pub type SegmentId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shifts the position up and left by the same amount on both axes.
    pub fn offset_by(self, amount: f64) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
        }
    }
}

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(UserId);
string_id!(EnemyId);
string_id!(BulletId);

// Player state is replaced wholesale each tick; extra authority fields ride along untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub user_id: UserId,
    pub position: Position,
    pub attributes: Map<String, Value>,
}

// An enemy missing from the next snapshot is the only destruction signal.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySnapshot {
    pub enemy_id: EnemyId,
    pub position: Position,
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletSnapshot {
    pub bullet_id: BulletId,
    pub position: Position,
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalConfig {
    pub total_segments: u32,
}

impl Default for GlobalConfig {
    // An authority without a configured count runs a single display.
    fn default() -> Self {
        Self { total_segments: 1 }
    }
}

#[cfg(test)]
impl EnemySnapshot {
    pub(crate) fn at(id: &str, x: f64, y: f64) -> Self {
        Self {
            enemy_id: EnemyId::from(id),
            position: Position::new(x, y),
            attributes: Map::new(),
        }
    }
}

#[cfg(test)]
impl BulletSnapshot {
    pub(crate) fn at(id: &str, x: f64, y: f64) -> Self {
        Self {
            bullet_id: BulletId::from(id),
            position: Position::new(x, y),
            attributes: Map::new(),
        }
    }
}

#[cfg(test)]
impl PlayerSnapshot {
    pub(crate) fn at(id: &str, x: f64, y: f64) -> Self {
        Self {
            user_id: UserId::from(id),
            position: Position::new(x, y),
            attributes: Map::new(),
        }
    }
}
