use crate::{
    dao::pool_store::PoolStore,
    dto::{ranking::RankingEntry, round::RoundSummary},
    error::ServiceError,
    state::SharedState,
};

/// All rounds, newest first.
pub async fn list_rounds(state: &SharedState) -> Result<Vec<RoundSummary>, ServiceError> {
    let rounds = state.store().list_rounds().await?;
    Ok(rounds.into_iter().map(Into::into).collect())
}

/// The round shown on the dashboard: the newest open round, or the newest
/// round overall when everything is closed.
pub async fn current_round(state: &SharedState) -> Result<RoundSummary, ServiceError> {
    state
        .store()
        .current_round()
        .await?
        .map(Into::into)
        .ok_or_else(|| ServiceError::NotFound("no round exists yet".into()))
}

/// Standings ordered by total points with positions attached.
///
/// Ties keep a deterministic order (nickname, then id), so repeated calls
/// over unchanged data never reorder.
pub async fn ranking(state: &SharedState, limit: usize) -> Result<Vec<RankingEntry>, ServiceError> {
    let users = state.store().ranking(limit).await?;
    Ok(users
        .into_iter()
        .enumerate()
        .map(|(index, user)| RankingEntry {
            position: index + 1,
            id: user.id,
            nickname: user.nickname,
            points_total: user.points_total,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::{models::Role, pool_store::PoolStore},
        services::test_support,
    };

    #[tokio::test]
    async fn ranking_positions_are_one_based_and_stable() {
        let (state, _) = test_support::test_state();
        let store = state.store();
        store.create_user("bob".into(), Role::Player).await.unwrap();
        store.create_user("ana".into(), Role::Player).await.unwrap();

        let standings = ranking(&state, 10).await.unwrap();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].position, 1);
        // Equal points: nickname breaks the tie.
        assert_eq!(standings[0].nickname, "ana");
        assert_eq!(standings[1].nickname, "bob");

        assert_eq!(ranking(&state, 10).await.unwrap(), standings);
    }

    #[tokio::test]
    async fn current_round_missing_is_not_found() {
        let (state, _) = test_support::test_state();
        let err = current_round(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
