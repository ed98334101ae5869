// Resolving which segment this view renders, and whether it may stay on it.

use crate::domain::entities::{GlobalConfig, SegmentId};

/// Numeric value of the `displayPosition` route parameter.
///
/// The guard compares the full number against the segment count, while drawing and data
/// requests only use it when it names a valid segment index.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteSegment {
    value: Option<f64>,
}

impl RouteSegment {
    /// Segment index, when the value is a non-negative integer that fits one.
    pub fn segment(&self) -> Option<SegmentId> {
        self.value
            .filter(|value| value.fract() == 0.0 && *value >= 0.0)
            .filter(|value| *value <= f64::from(SegmentId::MAX))
            .map(|value| value as SegmentId)
    }

    /// Value the guard checks; an absent value is checked as segment 0.
    pub fn guard_value(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

/// Parses the raw route parameter as a number (`"2"`, `"2.0"`, `"1e1"`).
///
/// Empty, non-numeric and non-finite values are treated as absent.
pub fn parse_route(raw: Option<&str>) -> RouteSegment {
    let value = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite());
    RouteSegment { value }
}

/// Segment used for data requests and drawing when the route value is absent.
pub fn effective_segment(segment: Option<SegmentId>) -> SegmentId {
    segment.unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Stay,
    RedirectToLobby { total_segments: u32 },
}

/// Out-of-range segments leave for the lobby; the authority's count is the only source of truth.
pub fn evaluate_guard(route: RouteSegment, config: GlobalConfig) -> GuardDecision {
    if route.guard_value() >= f64::from(config.total_segments) {
        GuardDecision::RedirectToLobby {
            total_segments: config.total_segments,
        }
    } else {
        GuardDecision::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard(raw: &str, total_segments: u32) -> GuardDecision {
        evaluate_guard(parse_route(Some(raw)), GlobalConfig { total_segments })
    }

    #[test]
    fn integer_routes_name_their_segment() {
        assert_eq!(parse_route(Some("0")).segment(), Some(0));
        assert_eq!(parse_route(Some("3")).segment(), Some(3));
        assert_eq!(parse_route(Some(" 2 ")).segment(), Some(2));
        assert_eq!(parse_route(Some("2.0")).segment(), Some(2));
        assert_eq!(parse_route(Some("1e1")).segment(), Some(10));
    }

    #[test]
    fn non_segment_values_draw_nothing_specific() {
        assert_eq!(parse_route(None).segment(), None);
        assert_eq!(parse_route(Some("")).segment(), None);
        assert_eq!(parse_route(Some("abc")).segment(), None);
        assert_eq!(parse_route(Some("-1")).segment(), None);
        assert_eq!(parse_route(Some("1.5")).segment(), None);
        assert_eq!(parse_route(Some("4294967296")).segment(), None);
    }

    #[test]
    fn non_finite_values_are_absent() {
        assert_eq!(parse_route(Some("NaN")), RouteSegment::default());
        assert_eq!(parse_route(Some("inf")), RouteSegment::default());
    }

    #[test]
    fn absent_segment_falls_back_to_zero() {
        assert_eq!(effective_segment(None), 0);
        assert_eq!(effective_segment(Some(4)), 4);
        assert_eq!(parse_route(Some("abc")).guard_value(), 0.0);
    }

    #[test]
    fn segment_equal_to_total_redirects() {
        let redirect = GuardDecision::RedirectToLobby { total_segments: 2 };
        assert_eq!(guard("2", 2), redirect);
        assert_eq!(guard("7", 2), redirect);
    }

    #[test]
    fn numeric_routes_outside_integer_form_still_redirect() {
        let redirect = GuardDecision::RedirectToLobby { total_segments: 2 };
        assert_eq!(guard("2.0", 2), redirect);
        assert_eq!(guard("1e1", 2), redirect);
        assert_eq!(guard("4294967296", 2), redirect);
        assert_eq!(guard("1.5", 1), GuardDecision::RedirectToLobby { total_segments: 1 });
    }

    #[test]
    fn segment_below_total_stays() {
        assert_eq!(guard("1", 2), GuardDecision::Stay);
        assert_eq!(guard("0", 2), GuardDecision::Stay);
        assert_eq!(guard("1.5", 2), GuardDecision::Stay);
        assert_eq!(guard("-1", 2), GuardDecision::Stay);
    }

    #[test]
    fn absent_segment_is_checked_as_zero() {
        assert_eq!(guard("abc", 1), GuardDecision::Stay);
        assert_eq!(
            evaluate_guard(RouteSegment::default(), GlobalConfig { total_segments: 0 }),
            GuardDecision::RedirectToLobby { total_segments: 0 }
        );
    }
}
