// Event inference from successive snapshots. The authority never announces kills or shots;
// they are derived here by comparing what was rendered last with what just arrived.

use crate::domain::{BulletSnapshot, EnemySnapshot, Position};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferredEvents {
    /// Enemies rendered last tick that are gone now, in previous-snapshot order.
    pub destroyed: Vec<EnemySnapshot>,
    /// At most one shot cue per tick, however many bullets appeared.
    pub shot_fired: bool,
}

/// Enemies present in `previous` whose id no longer appears in `current`.
pub fn destroyed_enemies<'a>(
    previous: &'a [EnemySnapshot],
    current: &[EnemySnapshot],
) -> Vec<&'a EnemySnapshot> {
    let alive: HashSet<_> = current.iter().map(|e| &e.enemy_id).collect();
    previous
        .iter()
        .filter(|e| !alive.contains(&e.enemy_id))
        .collect()
}

/// Bullet count growth against the client's own last rendered count.
pub fn shot_fired(previous_count: usize, current: &[BulletSnapshot]) -> bool {
    current.len() > previous_count
}

/// Destruction effects are drawn from the sprite's corner, so shift the center by half a sprite.
pub fn effect_origin(enemy: &EnemySnapshot, enemy_half_width: f64) -> Position {
    enemy.position.offset_by(enemy_half_width)
}

pub fn infer_events(
    previous_enemies: &[EnemySnapshot],
    current_enemies: &[EnemySnapshot],
    previous_bullet_count: usize,
    current_bullets: &[BulletSnapshot],
) -> InferredEvents {
    InferredEvents {
        destroyed: destroyed_enemies(previous_enemies, current_enemies)
            .into_iter()
            .cloned()
            .collect(),
        shot_fired: shot_fired(previous_bullet_count, current_bullets),
    }
}
