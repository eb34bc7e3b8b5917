use serde::Serialize;
use utoipa::ToSchema;

use crate::services::scheduler::TickReport;

/// Counts returned by an externally triggered scheduler tick.
#[derive(Debug, Serialize, ToSchema)]
pub struct TickResponse {
    /// Games whose bets were newly locked.
    pub games_locked: usize,
    /// Bets newly locked.
    pub bets_locked: usize,
    /// Games whose cutoff reminder went out.
    pub reminders_sent: usize,
    /// Successful reminder deliveries.
    pub notifications_sent: usize,
    /// Failed reminder deliveries.
    pub notifications_failed: usize,
}

impl From<TickReport> for TickResponse {
    fn from(report: TickReport) -> Self {
        Self {
            games_locked: report.games_locked,
            bets_locked: report.bets_locked,
            reminders_sent: report.reminders_sent,
            notifications_sent: report.notifications_sent,
            notifications_failed: report.notifications_failed,
        }
    }
}
