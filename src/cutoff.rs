//! Time-based betting cutoff evaluation.
//!
//! Every write path re-evaluates these predicates server-side against the
//! stored kickoff time; a client-supplied "still open" flag is never
//! trusted.

use time::{Duration, OffsetDateTime};

/// Whether a bet on a game kicking off at `kickoff` may still be written
/// at `now`.
///
/// Betting closes `lock_window` before kickoff; exactly at the boundary
/// the game counts as closed.
pub fn is_open(now: OffsetDateTime, kickoff: OffsetDateTime, lock_window: Duration) -> bool {
    now < kickoff - lock_window
}

/// Whether the "cutoff approaching" reminder window is active for a game.
///
/// The reminder fires in the span starting `reminder_lead` before kickoff
/// and ending when betting closes, so recipients still have time to act.
pub fn reminder_due(
    now: OffsetDateTime,
    kickoff: OffsetDateTime,
    lock_window: Duration,
    reminder_lead: Duration,
) -> bool {
    now >= kickoff - reminder_lead && is_open(now, kickoff, lock_window)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    const LOCK_WINDOW: Duration = Duration::minutes(30);
    const REMINDER_LEAD: Duration = Duration::minutes(60);

    #[test]
    fn open_strictly_before_cutoff() {
        let kickoff = datetime!(2026-03-01 16:00 UTC);
        assert!(is_open(
            datetime!(2026-03-01 15:29:59 UTC),
            kickoff,
            LOCK_WINDOW
        ));
    }

    #[test]
    fn closed_exactly_at_cutoff() {
        let kickoff = datetime!(2026-03-01 16:00 UTC);
        assert!(!is_open(datetime!(2026-03-01 15:30 UTC), kickoff, LOCK_WINDOW));
    }

    #[test]
    fn closed_after_kickoff() {
        let kickoff = datetime!(2026-03-01 16:00 UTC);
        assert!(!is_open(datetime!(2026-03-01 17:00 UTC), kickoff, LOCK_WINDOW));
    }

    #[test]
    fn reminder_spans_lead_until_cutoff() {
        let kickoff = datetime!(2026-03-01 16:00 UTC);

        // Too early: more than the lead before kickoff.
        assert!(!reminder_due(
            datetime!(2026-03-01 14:59 UTC),
            kickoff,
            LOCK_WINDOW,
            REMINDER_LEAD
        ));
        // Inside the window.
        assert!(reminder_due(
            datetime!(2026-03-01 15:00 UTC),
            kickoff,
            LOCK_WINDOW,
            REMINDER_LEAD
        ));
        assert!(reminder_due(
            datetime!(2026-03-01 15:29 UTC),
            kickoff,
            LOCK_WINDOW,
            REMINDER_LEAD
        ));
        // Betting already closed: no point reminding.
        assert!(!reminder_due(
            datetime!(2026-03-01 15:30 UTC),
            kickoff,
            LOCK_WINDOW,
            REMINDER_LEAD
        ));
    }
}
