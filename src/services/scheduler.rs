//! Periodic bet locking and reminder fan-out.
//!
//! The scheduler enforces that no bet stays writable past its game's
//! cutoff even when no user interaction occurs. Every pass is built on
//! conditional store writes, so ticks may be skipped, delayed, or overlap
//! without double-processing anything.

use time::OffsetDateTime;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::{
    dao::pool_store::PoolStore, services::notification_service, state::SharedState,
};

/// Counts produced by one scheduler pass, for observability only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Games whose bets were newly locked this tick.
    pub games_locked: usize,
    /// Bets newly locked this tick.
    pub bets_locked: usize,
    /// Games whose cutoff reminder went out this tick.
    pub reminders_sent: usize,
    /// Successful reminder deliveries.
    pub notifications_sent: usize,
    /// Failed reminder deliveries.
    pub notifications_failed: usize,
}

/// Drive [`tick`] forever on the configured interval.
pub async fn run(state: SharedState) {
    let mut ticker = tokio::time::interval(state.config().tick_interval);
    // A late tick catches up on the next pass; firing a burst of missed
    // ticks would only re-run no-ops.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(interval = ?state.config().tick_interval, "bet locking scheduler started");

    loop {
        ticker.tick().await;
        let report = tick(&state, OffsetDateTime::now_utc()).await;
        if report != TickReport::default() {
            info!(
                games_locked = report.games_locked,
                bets_locked = report.bets_locked,
                reminders_sent = report.reminders_sent,
                "scheduler tick completed"
            );
        }
    }
}

/// Run one scheduler pass at `now`.
///
/// First locks every open bet on games past their cutoff, then sends the
/// "cutoff approaching" reminder for games inside their reminder window.
/// A failure on one game is logged and never aborts the rest of the pass.
pub async fn tick(state: &SharedState, now: OffsetDateTime) -> TickReport {
    let mut report = TickReport::default();
    let store = state.store();

    match store.lockable_games(now).await {
        Ok(games) => {
            for game in games {
                match store.lock_bets(game.id).await {
                    Ok(0) => {}
                    Ok(newly_locked) => {
                        report.games_locked += 1;
                        report.bets_locked += newly_locked;
                        info!(game = %game.id, bets = newly_locked, "locked bets past cutoff");
                    }
                    Err(err) => warn!(game = %game.id, error = %err, "failed to lock bets"),
                }
            }
        }
        Err(err) => warn!(error = %err, "failed to query lockable games"),
    }

    match store.reminder_due_games(now).await {
        Ok(games) => {
            for game in games {
                // The conditional marker flip picks a single winner among
                // overlapping ticks.
                match store.mark_reminder_sent(game.id).await {
                    Ok(true) => {
                        let audience = match store.users_without_bet(game.id).await {
                            Ok(audience) => audience,
                            Err(err) => {
                                warn!(game = %game.id, error = %err, "failed to resolve reminder audience");
                                continue;
                            }
                        };
                        let delivery = notification_service::notify(
                            state,
                            audience,
                            notification_service::game_reminder(&game),
                        )
                        .await;
                        report.reminders_sent += 1;
                        report.notifications_sent += delivery.sent;
                        report.notifications_failed += delivery.failed;
                    }
                    Ok(false) => {}
                    Err(err) => warn!(game = %game.id, error = %err, "failed to mark reminder sent"),
                }
            }
        }
        Err(err) => warn!(error = %err, "failed to query reminder-due games"),
    }

    report
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime, macros::datetime};
    use uuid::Uuid;

    use super::*;
    use crate::{
        dao::{
            models::{GameEntity, Role, UserEntity},
            pool_store::PoolStore,
        },
        services::test_support,
        state::SharedState,
    };

    const KICKOFF: OffsetDateTime = datetime!(2026-03-01 16:00 UTC);

    async fn seed_game(state: &SharedState) -> GameEntity {
        let store = state.store();
        let round = store.create_round("Round 1".into()).await.unwrap();
        store
            .create_game(round.id, "Reds".into(), "Blues".into(), KICKOFF)
            .await
            .unwrap()
    }

    async fn seed_player(state: &SharedState, nickname: &str) -> UserEntity {
        state
            .store()
            .create_user(nickname.to_owned(), Role::Player)
            .await
            .unwrap()
    }

    async fn place_bet(state: &SharedState, user: Uuid, game: Uuid) {
        state
            .store()
            .upsert_bet(user, game, 1, 0, KICKOFF - Duration::minutes(40))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn tick_locks_once_and_is_idempotent() {
        let (state, _) = test_support::test_state();
        let game = seed_game(&state).await;
        let ana = seed_player(&state, "ana").await;
        let bob = seed_player(&state, "bob").await;
        place_bet(&state, ana.id, game.id).await;
        place_bet(&state, bob.id, game.id).await;

        let after_cutoff = KICKOFF - Duration::minutes(25);
        let first = tick(&state, after_cutoff).await;
        assert_eq!(first.games_locked, 1);
        assert_eq!(first.bets_locked, 2);

        let second = tick(&state, after_cutoff).await;
        assert_eq!(second.bets_locked, 0);
        assert_eq!(second.games_locked, 0);
    }

    #[tokio::test]
    async fn reminder_targets_only_users_without_bet() {
        let (state, sender) = test_support::test_state();
        let game = seed_game(&state).await;
        let ana = seed_player(&state, "ana").await;
        let bob = seed_player(&state, "bob").await;
        place_bet(&state, ana.id, game.id).await;

        let store = state.store();
        store
            .put_subscription(ana.id, "https://push.example/ana".into())
            .await
            .unwrap();
        store
            .put_subscription(bob.id, "https://push.example/bob".into())
            .await
            .unwrap();

        let in_window = KICKOFF - Duration::minutes(50);
        let report = tick(&state, in_window).await;
        assert_eq!(report.reminders_sent, 1);
        assert_eq!(report.notifications_sent, 1);

        let deliveries = sender.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].0, "https://push.example/bob");
    }

    #[tokio::test]
    async fn reminder_fires_at_most_once_per_game() {
        let (state, sender) = test_support::test_state();
        seed_game(&state).await;
        let bob = seed_player(&state, "bob").await;
        state
            .store()
            .put_subscription(bob.id, "https://push.example/bob".into())
            .await
            .unwrap();

        let in_window = KICKOFF - Duration::minutes(50);
        assert_eq!(tick(&state, in_window).await.reminders_sent, 1);
        // Delayed or repeated ticks must not re-send.
        assert_eq!(
            tick(&state, in_window + Duration::minutes(5)).await.reminders_sent,
            0
        );
        assert_eq!(sender.deliveries().len(), 1);
    }

    #[tokio::test]
    async fn no_reminder_once_betting_closed() {
        let (state, sender) = test_support::test_state();
        let game = seed_game(&state).await;
        let ana = seed_player(&state, "ana").await;
        place_bet(&state, ana.id, game.id).await;

        // First tick runs only after the cutoff: the lock still happens,
        // but the reminder window is over and nothing is sent.
        let report = tick(&state, KICKOFF - Duration::minutes(20)).await;
        assert_eq!(report.bets_locked, 1);
        assert_eq!(report.reminders_sent, 0);
        assert!(sender.deliveries().is_empty());
    }

    #[tokio::test]
    async fn delivery_failures_are_counted_not_fatal() {
        let (state, sender) = test_support::test_state();
        seed_game(&state).await;
        let bob = seed_player(&state, "bob").await;
        sender.fail_endpoint("https://push.example/bob");
        state
            .store()
            .put_subscription(bob.id, "https://push.example/bob".into())
            .await
            .unwrap();

        let report = tick(&state, KICKOFF - Duration::minutes(50)).await;
        assert_eq!(report.reminders_sent, 1);
        assert_eq!(report.notifications_sent, 0);
        assert_eq!(report.notifications_failed, 1);
    }

    #[tokio::test]
    async fn finished_games_are_left_alone() {
        let (state, _) = test_support::test_state();
        let game = seed_game(&state).await;
        let ana = seed_player(&state, "ana").await;
        place_bet(&state, ana.id, game.id).await;
        state.store().finalize_game(game.id, 2, 1).await.unwrap();

        let report = tick(&state, KICKOFF + Duration::hours(2)).await;
        assert_eq!(report, TickReport::default());
    }
}
