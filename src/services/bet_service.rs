use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::{
    cutoff,
    dao::pool_store::PoolStore,
    dto::{
        bet::{BetView, SubmitBetRequest},
        game::GameWithBet,
    },
    error::ServiceError,
    state::SharedState,
};

/// Create or replace the caller's bet on a game.
///
/// The cutoff and the bet's locked state are re-evaluated inside the
/// store at write time; whatever the client believed about the game being
/// open is irrelevant here.
pub async fn submit_bet(
    state: &SharedState,
    user_id: Uuid,
    game_id: Uuid,
    request: SubmitBetRequest,
) -> Result<BetView, ServiceError> {
    let store = state.store();
    if store.find_user(user_id).await?.is_none() {
        return Err(ServiceError::Unauthorized(format!(
            "unknown user `{user_id}`"
        )));
    }

    let bet = store
        .upsert_bet(
            user_id,
            game_id,
            request.guess_a,
            request.guess_b,
            OffsetDateTime::now_utc(),
        )
        .await?;

    info!(
        user = %user_id,
        game = %game_id,
        guess_a = bet.guess_a,
        guess_b = bet.guess_b,
        "bet stored"
    );
    Ok(bet.into())
}

/// Games of a round with the viewer's own bet attached and a
/// server-computed `can_edit` flag.
pub async fn list_games_for_round(
    state: &SharedState,
    round_id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Vec<GameWithBet>, ServiceError> {
    let store = state.store();
    if store.find_round(round_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!(
            "round `{round_id}` not found"
        )));
    }

    let now = OffsetDateTime::now_utc();
    let lock_window = state.config().lock_window;
    let games = store.games_for_round(round_id).await?;

    let mut views = Vec::with_capacity(games.len());
    for game in games {
        let my_bet = match viewer {
            Some(viewer) => store.bet_for(game.id, viewer).await?,
            None => None,
        };
        let can_edit = !game.finished()
            && cutoff::is_open(now, game.kickoff_time, lock_window)
            && my_bet.as_ref().is_none_or(|bet| !bet.state.locked());

        views.push(GameWithBet {
            game: game.into(),
            my_bet: my_bet.map(Into::into),
            can_edit,
        });
    }

    Ok(views)
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;
    use crate::{
        dao::{models::Role, pool_store::PoolStore},
        services::test_support,
    };

    fn guess(a: u32, b: u32) -> SubmitBetRequest {
        SubmitBetRequest {
            guess_a: a,
            guess_b: b,
        }
    }

    #[tokio::test]
    async fn submit_and_replace_while_open() {
        let (state, _) = test_support::test_state();
        let store = state.store();
        let user = store.create_user("ana".into(), Role::Player).await.unwrap();
        let round = store.create_round("Round 1".into()).await.unwrap();
        let game = store
            .create_game(
                round.id,
                "Reds".into(),
                "Blues".into(),
                OffsetDateTime::now_utc() + Duration::hours(2),
            )
            .await
            .unwrap();

        let first = submit_bet(&state, user.id, game.id, guess(1, 0)).await.unwrap();
        let second = submit_bet(&state, user.id, game.id, guess(2, 1)).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!((second.guess_a, second.guess_b), (2, 1));
    }

    #[tokio::test]
    async fn late_submit_is_cutoff_closed() {
        let (state, _) = test_support::test_state();
        let store = state.store();
        let user = store.create_user("ana".into(), Role::Player).await.unwrap();
        let round = store.create_round("Round 1".into()).await.unwrap();
        // Kickoff in ten minutes: inside the 30-minute lock window.
        let game = store
            .create_game(
                round.id,
                "Reds".into(),
                "Blues".into(),
                OffsetDateTime::now_utc() + Duration::minutes(10),
            )
            .await
            .unwrap();

        let err = submit_bet(&state, user.id, game.id, guess(1, 0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::CutoffClosed));
    }

    #[tokio::test]
    async fn unknown_caller_is_unauthorized() {
        let (state, _) = test_support::test_state();
        let err = submit_bet(&state, Uuid::new_v4(), Uuid::new_v4(), guess(1, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn listing_attaches_only_the_viewers_bet() {
        let (state, _) = test_support::test_state();
        let store = state.store();
        let ana = store.create_user("ana".into(), Role::Player).await.unwrap();
        let bob = store.create_user("bob".into(), Role::Player).await.unwrap();
        let round = store.create_round("Round 1".into()).await.unwrap();
        let game = store
            .create_game(
                round.id,
                "Reds".into(),
                "Blues".into(),
                OffsetDateTime::now_utc() + Duration::hours(2),
            )
            .await
            .unwrap();

        submit_bet(&state, ana.id, game.id, guess(1, 0)).await.unwrap();
        submit_bet(&state, bob.id, game.id, guess(0, 2)).await.unwrap();

        let views = list_games_for_round(&state, round.id, Some(ana.id)).await.unwrap();
        assert_eq!(views.len(), 1);
        let bet = views[0].my_bet.as_ref().unwrap();
        assert_eq!((bet.guess_a, bet.guess_b), (1, 0));
        assert!(views[0].can_edit);
    }

    #[tokio::test]
    async fn can_edit_is_false_past_cutoff() {
        let (state, _) = test_support::test_state();
        let store = state.store();
        let ana = store.create_user("ana".into(), Role::Player).await.unwrap();
        let round = store.create_round("Round 1".into()).await.unwrap();
        store
            .create_game(
                round.id,
                "Reds".into(),
                "Blues".into(),
                OffsetDateTime::now_utc() + Duration::minutes(10),
            )
            .await
            .unwrap();

        let views = list_games_for_round(&state, round.id, Some(ana.id)).await.unwrap();
        assert!(!views[0].can_edit);
        assert!(views[0].my_bet.is_none());
    }

    #[tokio::test]
    async fn anonymous_viewer_gets_no_bet_and_no_edit_rights() {
        let (state, _) = test_support::test_state();
        let store = state.store();
        let round = store.create_round("Round 1".into()).await.unwrap();
        store
            .create_game(
                round.id,
                "Reds".into(),
                "Blues".into(),
                OffsetDateTime::now_utc() + Duration::hours(2),
            )
            .await
            .unwrap();

        let views = list_games_for_round(&state, round.id, None).await.unwrap();
        assert!(views[0].my_bet.is_none());
        // No viewer still sees the game as editable-in-principle.
        assert!(views[0].can_edit);
    }
}
