use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{models::Role, pool_store::PoolStore},
    dto::{
        game::{CreateGameRequest, FinalizationSummary, FinalizeGameRequest, GameSummary},
        round::{CreateRoundRequest, RoundSummary},
    },
    error::ServiceError,
    services::notification_service,
    state::SharedState,
};

/// Resolve the caller and require the admin role.
async fn require_admin(store: &Arc<dyn PoolStore>, admin_id: Uuid) -> Result<(), ServiceError> {
    let user = store
        .find_user(admin_id)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized(format!("unknown user `{admin_id}`")))?;

    if user.role != Role::Admin {
        return Err(ServiceError::Forbidden("admin role required".into()));
    }
    Ok(())
}

/// Open a new round.
pub async fn create_round(
    state: &SharedState,
    admin_id: Uuid,
    request: CreateRoundRequest,
) -> Result<RoundSummary, ServiceError> {
    let store = state.store();
    require_admin(&store, admin_id).await?;

    let round = store.create_round(request.name).await?;
    info!(admin = %admin_id, round = %round.id, "round created");
    Ok(round.into())
}

/// Archive a round.
pub async fn close_round(
    state: &SharedState,
    admin_id: Uuid,
    round_id: Uuid,
) -> Result<RoundSummary, ServiceError> {
    let store = state.store();
    require_admin(&store, admin_id).await?;

    let round = store.close_round(round_id).await?;
    info!(admin = %admin_id, round = %round.id, "round closed");
    Ok(round.into())
}

/// Schedule a game inside an open round.
pub async fn create_game(
    state: &SharedState,
    admin_id: Uuid,
    request: CreateGameRequest,
) -> Result<GameSummary, ServiceError> {
    let store = state.store();
    require_admin(&store, admin_id).await?;

    let game = store
        .create_game(
            request.round_id,
            request.team_a,
            request.team_b,
            request.kickoff_time,
        )
        .await?;
    info!(admin = %admin_id, game = %game.id, kickoff = %game.kickoff_time, "game created");
    Ok(game.into())
}

/// Record a game's final score.
///
/// The store performs the lock-finish-score sequence as one atomic unit;
/// a repeat call surfaces [`ServiceError::AlreadyFinalized`] and changes
/// nothing. On success the round's bettors are notified that results are
/// in, deduplicated per round and never blocking this call.
pub async fn finalize_game(
    state: &SharedState,
    admin_id: Uuid,
    game_id: Uuid,
    request: FinalizeGameRequest,
) -> Result<FinalizationSummary, ServiceError> {
    let store = state.store();
    require_admin(&store, admin_id).await?;

    let outcome = store
        .finalize_game(game_id, request.score_a, request.score_b)
        .await?;
    info!(
        admin = %admin_id,
        game = %game_id,
        bets_scored = outcome.scored.len(),
        "game finalized"
    );

    notification_service::announce_results(state, &outcome.game);
    Ok(outcome.into())
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime};

    use super::*;
    use crate::{
        dao::models::UserEntity,
        dto::bet::SubmitBetRequest,
        services::{bet_service, scheduler, test_support},
    };

    async fn seed_admin(state: &SharedState) -> UserEntity {
        state
            .store()
            .create_user("boss".into(), Role::Admin)
            .await
            .unwrap()
    }

    fn create_game_request(round_id: Uuid, kickoff: OffsetDateTime) -> CreateGameRequest {
        CreateGameRequest {
            round_id,
            team_a: "Reds".into(),
            team_b: "Blues".into(),
            kickoff_time: kickoff,
        }
    }

    #[tokio::test]
    async fn player_cannot_use_admin_operations() {
        let (state, _) = test_support::test_state();
        let player = state
            .store()
            .create_user("ana".into(), Role::Player)
            .await
            .unwrap();

        let err = create_round(
            &state,
            player.id,
            CreateRoundRequest {
                name: "Round 1".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = create_round(
            &state,
            Uuid::new_v4(),
            CreateRoundRequest {
                name: "Round 1".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn finalize_twice_fails_and_keeps_totals() {
        let (state, _) = test_support::test_state();
        let admin = seed_admin(&state).await;
        let store = state.store();
        let ana = store.create_user("ana".into(), Role::Player).await.unwrap();
        let round = create_round(
            &state,
            admin.id,
            CreateRoundRequest {
                name: "Round 1".into(),
            },
        )
        .await
        .unwrap();
        let game = create_game(
            &state,
            admin.id,
            create_game_request(round.id, OffsetDateTime::now_utc() + Duration::hours(2)),
        )
        .await
        .unwrap();

        bet_service::submit_bet(
            &state,
            ana.id,
            game.id,
            SubmitBetRequest {
                guess_a: 2,
                guess_b: 1,
            },
        )
        .await
        .unwrap();

        let summary = finalize_game(
            &state,
            admin.id,
            game.id,
            FinalizeGameRequest {
                score_a: 2,
                score_b: 1,
            },
        )
        .await
        .unwrap();
        assert_eq!(summary.scored.len(), 1);
        assert_eq!(summary.scored[0].points, 10);

        let err = finalize_game(
            &state,
            admin.id,
            game.id,
            FinalizeGameRequest {
                score_a: 0,
                score_b: 0,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyFinalized));

        let ana = store.find_user(ana.id).await.unwrap().unwrap();
        assert_eq!(ana.points_total, 10);
    }

    /// Full lifecycle: open round, bet before the cutoff, scheduler lock,
    /// admin result, points credited.
    #[tokio::test]
    async fn bet_lock_finalize_end_to_end() {
        let (state, _) = test_support::test_state();
        let admin = seed_admin(&state).await;
        let store = state.store();
        let ana = store.create_user("ana".into(), Role::Player).await.unwrap();

        let round = create_round(
            &state,
            admin.id,
            CreateRoundRequest { name: "R1".into() },
        )
        .await
        .unwrap();
        // Kickoff 40 minutes out: betting is open right now.
        let kickoff = OffsetDateTime::now_utc() + Duration::minutes(40);
        let game = create_game(&state, admin.id, create_game_request(round.id, kickoff))
            .await
            .unwrap();

        bet_service::submit_bet(
            &state,
            ana.id,
            game.id,
            SubmitBetRequest {
                guess_a: 2,
                guess_b: 1,
            },
        )
        .await
        .unwrap();

        // Tick 25 minutes before kickoff: past the cutoff, the bet locks.
        let report = scheduler::tick(&state, kickoff - Duration::minutes(25)).await;
        assert_eq!(report.bets_locked, 1);

        let late = bet_service::submit_bet(
            &state,
            ana.id,
            game.id,
            SubmitBetRequest {
                guess_a: 9,
                guess_b: 9,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(late, ServiceError::CutoffClosed));

        let summary = finalize_game(
            &state,
            admin.id,
            game.id,
            FinalizeGameRequest {
                score_a: 2,
                score_b: 1,
            },
        )
        .await
        .unwrap();
        assert!(summary.game.finished);

        let ana = store.find_user(ana.id).await.unwrap().unwrap();
        assert_eq!(ana.points_total, 10);
    }

    #[tokio::test]
    async fn game_creation_requires_open_round() {
        let (state, _) = test_support::test_state();
        let admin = seed_admin(&state).await;
        let round = create_round(
            &state,
            admin.id,
            CreateRoundRequest {
                name: "Round 1".into(),
            },
        )
        .await
        .unwrap();
        close_round(&state, admin.id, round.id).await.unwrap();

        let err = create_game(
            &state,
            admin.id,
            create_game_request(round.id, OffsetDateTime::now_utc() + Duration::hours(2)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
