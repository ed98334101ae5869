// Domain layer: display segment entities, pure rules and ports.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod segment;
pub mod tuning;
pub mod viewport;

pub use entities::{
    BulletId, BulletSnapshot, EnemyId, EnemySnapshot, GlobalConfig, PlayerSnapshot, Position,
    SegmentId, UserId,
};
pub use errors::AuthorityError;
pub use ports::{GameAuthority, Navigator};
pub use viewport::{ViewportGeometry, WindowSize};
