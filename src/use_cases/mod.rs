// Use cases layer: reconciling authority snapshots into what one display draws.

pub mod effects;
pub mod guard;
pub mod inference;
pub mod segment_view;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use segment_view::{SegmentHandle, SegmentState, fetch_total_segments};
pub use types::{Frame, RouteParams, SegmentSettings, ViewEvent};
