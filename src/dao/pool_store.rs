use futures::future::BoxFuture;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dao::models::{
    BetEntity, FinalizedGame, GameEntity, PushSubscriptionEntity, Role, RoundEntity, UserEntity,
};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for users, rounds, games, bets,
/// and push subscriptions.
///
/// Every state transition that matters for correctness (bet locking, game
/// finalization, reminder markers) is expressed as a conditional write
/// executed atomically inside the backend, so racing callers both succeed
/// harmlessly and only one effects the transition.
pub trait PoolStore: Send + Sync {
    /// Insert a new user profile. Fails when the nickname is taken.
    fn create_user(
        &self,
        nickname: String,
        role: Role,
    ) -> BoxFuture<'static, StorageResult<UserEntity>>;

    /// Look a user up by id.
    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;

    /// Users ordered for the ranking: `points_total` descending, nickname
    /// ascending, id ascending. The ordering is fully deterministic so
    /// repeated calls over unchanged data never reorder ties.
    fn ranking(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>>;

    /// Insert a new open round.
    fn create_round(&self, name: String) -> BoxFuture<'static, StorageResult<RoundEntity>>;

    /// Archive a round. Idempotent on an already-closed round.
    fn close_round(&self, id: Uuid) -> BoxFuture<'static, StorageResult<RoundEntity>>;

    /// All rounds, newest first.
    fn list_rounds(&self) -> BoxFuture<'static, StorageResult<Vec<RoundEntity>>>;

    /// Look a round up by id.
    fn find_round(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>>;

    /// The most recently created open round, falling back to the most
    /// recently created round when none is open. Derived, never stored.
    fn current_round(&self) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>>;

    /// Insert a game into an open round.
    fn create_game(
        &self,
        round_id: Uuid,
        team_a: String,
        team_b: String,
        kickoff_time: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<GameEntity>>;

    /// Look a game up by id.
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;

    /// Games of a round ordered by kickoff time.
    fn games_for_round(&self, round_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;

    /// Create or replace the caller's bet on a game.
    ///
    /// The cutoff and the bet's locked state are re-evaluated against
    /// `now` under the store lock, closing the race where a client holds
    /// a stale "still open" view. At most one bet exists per
    /// `(game, user)` pair.
    fn upsert_bet(
        &self,
        user_id: Uuid,
        game_id: Uuid,
        guess_a: u32,
        guess_b: u32,
        now: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<BetEntity>>;

    /// The caller's bet on a game, if any.
    fn bet_for(
        &self,
        game_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<BetEntity>>>;

    /// All bets on a game.
    fn bets_for_game(&self, game_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<BetEntity>>>;

    /// Unfinished games past their cutoff that still carry open bets.
    fn lockable_games(
        &self,
        now: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;

    /// Flip every open bet on a game to locked. Only open bets are
    /// touched, so re-running against an already-locked game is a no-op.
    /// Returns the number of newly locked bets.
    fn lock_bets(&self, game_id: Uuid) -> BoxFuture<'static, StorageResult<usize>>;

    /// Unfinished games inside their reminder window whose reminder has
    /// not been sent yet.
    fn reminder_due_games(
        &self,
        now: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;

    /// Conditionally flip a game's reminder marker. Returns `true` for
    /// the single caller that wins the flip; overlapping ticks lose and
    /// must not send.
    fn mark_reminder_sent(&self, game_id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    /// Users holding no bet at all on a game (reminder audience).
    fn users_without_bet(&self, game_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<Uuid>>>;

    /// Distinct users holding a bet on any game of a round (results
    /// audience).
    fn bettors_of_round(&self, round_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<Uuid>>>;

    /// Finalize a game as one atomic unit: force-lock remaining open
    /// bets, record the final score, score every bet, and credit each
    /// owner's `points_total`. Fails with
    /// [`StorageError::AlreadyFinalized`](crate::dao::storage::StorageError::AlreadyFinalized)
    /// and performs no mutation when the game is already finished.
    fn finalize_game(
        &self,
        game_id: Uuid,
        final_a: u32,
        final_b: u32,
    ) -> BoxFuture<'static, StorageResult<FinalizedGame>>;

    /// Register (or refresh) a push endpoint for a user.
    fn put_subscription(
        &self,
        user_id: Uuid,
        endpoint: String,
    ) -> BoxFuture<'static, StorageResult<PushSubscriptionEntity>>;

    /// Push endpoints registered by any of the given users.
    fn subscriptions_for(
        &self,
        user_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<PushSubscriptionEntity>>>;

    /// Drop a push endpoint wherever it is registered. Returns whether
    /// anything was removed.
    fn remove_subscription(&self, endpoint: String) -> BoxFuture<'static, StorageResult<bool>>;

    /// Cheap liveness probe of the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
