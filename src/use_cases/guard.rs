// Segment guard: keeps a view on its display only while the authority still has that many
// displays.

use crate::domain::segment::{GuardDecision, RouteSegment, evaluate_guard};
use crate::domain::{AuthorityError, GameAuthority};

/// Fetches the authoritative segment count and decides whether the view may stay.
#[tracing::instrument(
    name = "segment_guard",
    skip_all,
    fields(route_value = route.guard_value())
)]
pub async fn check_segment(
    authority: &dyn GameAuthority,
    route: RouteSegment,
) -> Result<GuardDecision, AuthorityError> {
    let config = authority.fetch_config().await?;
    let decision = evaluate_guard(route, config);
    tracing::debug!(
        total_segments = config.total_segments,
        ?decision,
        "segment guard evaluated"
    );
    Ok(decision)
}
