//! Availability gate.
//!
//! Pure read-side admission logic: given the item, its owning event, the
//! event's active flag and the current time, decide whether a claim may
//! proceed. No mutation, no I/O — the flag is read by the caller and
//! passed in.

use chrono::{DateTime, Utc};
use flashdrop_core::error::Result;
use flashdrop_core::{Event, IssueError, Item};

/// Check whether a claim against `item` is admissible at `now`.
///
/// Checks run in order: the event's active flag must be present, then
/// `now` must fall inside the event's `[starts_at, ends_at]` window.
/// Before-start and after-end are reported as distinct reasons so
/// operators can tell a queue-jumper from a latecomer; both classify as
/// the same conflict kind for callers.
///
/// The item's own application window participates only when
/// `gate_on_item_window` is set; by default it is display metadata and the
/// shared event window is the single gate.
///
/// # Errors
///
/// [`IssueError::EventInactive`], [`IssueError::EventNotStarted`],
/// [`IssueError::EventEnded`] or [`IssueError::ItemWindowClosed`] when the
/// corresponding check refuses the claim.
pub fn check_claim_window(
    item: &Item,
    event: &Event,
    event_active: bool,
    gate_on_item_window: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    if !event_active {
        return Err(IssueError::EventInactive { event_id: event.event_id });
    }
    if now < event.starts_at {
        return Err(IssueError::EventNotStarted {
            event_id: event.event_id,
            starts_at: event.starts_at,
        });
    }
    if now > event.ends_at {
        return Err(IssueError::EventEnded {
            event_id: event.event_id,
            ends_at: event.ends_at,
        });
    }
    if gate_on_item_window && (now < item.apply_starts_at || now > item.apply_ends_at) {
        return Err(IssueError::ItemWindowClosed { item_id: item.item_id });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use flashdrop_core::{EventId, ItemId};

    fn event_window(starts: DateTime<Utc>, ends: DateTime<Utc>) -> Event {
        Event {
            event_id: EventId(1),
            name: "drop".to_string(),
            detail: None,
            starts_at: starts,
            ends_at: ends,
        }
    }

    fn item_in(event: &Event, apply_starts: DateTime<Utc>, apply_ends: DateTime<Utc>) -> Item {
        Item {
            item_id: ItemId(10),
            event_id: event.event_id,
            name: "coupon".to_string(),
            detail: None,
            apply_starts_at: apply_starts,
            apply_ends_at: apply_ends,
            total_supply: 5,
        }
    }

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).single().unwrap()
    }

    #[test]
    fn admits_inside_window_with_flag() {
        let event = event_window(t(9), t(17));
        let item = item_in(&event, t(9), t(17));
        assert!(check_claim_window(&item, &event, true, false, t(12)).is_ok());
    }

    #[test]
    fn refuses_when_flag_absent() {
        let event = event_window(t(9), t(17));
        let item = item_in(&event, t(9), t(17));
        let err = check_claim_window(&item, &event, false, false, t(12)).unwrap_err();
        assert!(matches!(err, IssueError::EventInactive { .. }));
    }

    #[test]
    fn before_and_after_are_distinct_reasons() {
        let event = event_window(t(9), t(17));
        let item = item_in(&event, t(9), t(17));

        let early = check_claim_window(&item, &event, true, false, t(8)).unwrap_err();
        let late = check_claim_window(&item, &event, true, false, t(18)).unwrap_err();

        assert!(matches!(early, IssueError::EventNotStarted { .. }));
        assert!(matches!(late, IssueError::EventEnded { .. }));
        // Same kind for callers, different reason for diagnostics.
        assert_eq!(early.kind(), late.kind());
    }

    #[test]
    fn window_edges_are_inclusive() {
        let event = event_window(t(9), t(17));
        let item = item_in(&event, t(9), t(17));
        assert!(check_claim_window(&item, &event, true, false, t(9)).is_ok());
        assert!(check_claim_window(&item, &event, true, false, t(17)).is_ok());
    }

    #[test]
    fn item_window_ignored_by_default() {
        let event = event_window(t(9), t(17));
        // Item window closed hours ago; event window still open.
        let item = item_in(&event, t(9), t(10));
        assert!(check_claim_window(&item, &event, true, false, t(12)).is_ok());
    }

    #[test]
    fn item_window_gates_when_configured() {
        let event = event_window(t(9), t(17));
        let item = item_in(&event, t(9), t(10));
        let err = check_claim_window(&item, &event, true, true, t(12)).unwrap_err();
        assert!(matches!(err, IssueError::ItemWindowClosed { .. }));

        // Inside both windows it still admits.
        let open_item = item_in(&event, t(9), t(17));
        assert!(check_claim_window(&open_item, &event, true, true, t(12)).is_ok());
    }

    #[test]
    fn event_flag_checked_before_window() {
        // Flag absent AND window over: the flag refusal wins, matching the
        // check order on the claim path.
        let event = event_window(t(9), t(10));
        let item = item_in(&event, t(9), t(10));
        let err = check_claim_window(&item, &event, false, false, t(12)).unwrap_err();
        assert!(matches!(err, IssueError::EventInactive { .. }));
    }
}
