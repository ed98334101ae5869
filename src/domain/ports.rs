use async_trait::async_trait;

use crate::domain::entities::{
    BulletSnapshot, EnemySnapshot, GlobalConfig, PlayerSnapshot, SegmentId, UserId,
};
use crate::domain::errors::AuthorityError;

// Port for the remote authority that owns all simulation state.
// Each call is an independent round-trip; nothing is atomic across calls.
#[async_trait]
pub trait GameAuthority: Send + Sync {
    async fn fetch_players(&self, segment: SegmentId)
    -> Result<Vec<PlayerSnapshot>, AuthorityError>;
    // Enemies are global: every segment sees the same set.
    async fn fetch_enemies(&self) -> Result<Vec<EnemySnapshot>, AuthorityError>;
    async fn fetch_bullets(&self, segment: SegmentId)
    -> Result<Vec<BulletSnapshot>, AuthorityError>;
    async fn fetch_config(&self) -> Result<GlobalConfig, AuthorityError>;
    // `None` means no bullet was created (rate limited or unknown user).
    async fn create_bullet(&self, user_id: &UserId)
    -> Result<Option<BulletSnapshot>, AuthorityError>;
}

// Port for leaving the segment view.
pub trait Navigator: Send + Sync {
    fn redirect_to(&self, route: &str);
}
