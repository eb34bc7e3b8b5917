use std::{collections::HashSet, sync::Arc};

use futures::future::BoxFuture;
use indexmap::{IndexMap, IndexSet};
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    cutoff,
    dao::{
        models::{
            BetEntity, BetState, FinalizedGame, GameEntity, GameStatus, PushSubscriptionEntity,
            Role, RoundEntity, RoundStatus, ScoredBet, UserEntity,
        },
        pool_store::PoolStore,
        storage::{StorageError, StorageResult},
    },
    scoring,
};

/// In-memory [`PoolStore`] backend.
///
/// All tables live behind a single `RwLock`, which makes every
/// multi-row transition (bet locking, finalization with point credits)
/// genuinely atomic: a writer observes and mutates a consistent snapshot,
/// and concurrent callers serialize on the guard.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    lock_window: Duration,
    reminder_lead: Duration,
}

#[derive(Default)]
struct Inner {
    users: IndexMap<Uuid, UserEntity>,
    rounds: IndexMap<Uuid, RoundEntity>,
    games: IndexMap<Uuid, GameEntity>,
    bets: IndexMap<Uuid, BetEntity>,
    /// Uniqueness index: one bet per `(game, user)`.
    bets_by_key: IndexMap<(Uuid, Uuid), Uuid>,
    /// Push endpoints keyed by their URL.
    subscriptions: IndexMap<String, PushSubscriptionEntity>,
}

impl MemoryStore {
    /// Create an empty store evaluating cutoffs with the given windows.
    pub fn new(lock_window: Duration, reminder_lead: Duration) -> Self {
        Self {
            inner: Arc::default(),
            lock_window,
            reminder_lead,
        }
    }
}

/// Flip every open bet of `game_id` to locked, returning the count.
fn lock_open_bets(bets: &mut IndexMap<Uuid, BetEntity>, game_id: Uuid) -> usize {
    let now = OffsetDateTime::now_utc();
    let mut locked = 0;
    for bet in bets.values_mut() {
        if bet.game_id == game_id && bet.state == BetState::Open {
            bet.state = BetState::Locked;
            bet.updated_at = now;
            locked += 1;
        }
    }
    locked
}

impl PoolStore for MemoryStore {
    fn create_user(
        &self,
        nickname: String,
        role: Role,
    ) -> BoxFuture<'static, StorageResult<UserEntity>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut guard = inner.write().await;
            if guard.users.values().any(|user| user.nickname == nickname) {
                return Err(StorageError::NicknameTaken(nickname));
            }

            let user = UserEntity {
                id: Uuid::new_v4(),
                nickname,
                role,
                points_total: 0,
                created_at: OffsetDateTime::now_utc(),
            };
            guard.users.insert(user.id, user.clone());
            Ok(user)
        })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move { Ok(inner.read().await.users.get(&id).cloned()) })
    }

    fn ranking(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let guard = inner.read().await;
            let mut users = guard.users.values().cloned().collect::<Vec<_>>();
            users.sort_by(|a, b| {
                b.points_total
                    .cmp(&a.points_total)
                    .then_with(|| a.nickname.cmp(&b.nickname))
                    .then_with(|| a.id.cmp(&b.id))
            });
            users.truncate(limit);
            Ok(users)
        })
    }

    fn create_round(&self, name: String) -> BoxFuture<'static, StorageResult<RoundEntity>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut guard = inner.write().await;
            let round = RoundEntity {
                id: Uuid::new_v4(),
                name,
                status: RoundStatus::Open,
                created_at: OffsetDateTime::now_utc(),
            };
            guard.rounds.insert(round.id, round.clone());
            Ok(round)
        })
    }

    fn close_round(&self, id: Uuid) -> BoxFuture<'static, StorageResult<RoundEntity>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut guard = inner.write().await;
            let round = guard.rounds.get_mut(&id).ok_or(StorageError::NotFound {
                entity: "round",
                id,
            })?;
            round.status = RoundStatus::Closed;
            Ok(round.clone())
        })
    }

    fn list_rounds(&self) -> BoxFuture<'static, StorageResult<Vec<RoundEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let guard = inner.read().await;
            let mut rounds = guard.rounds.values().cloned().collect::<Vec<_>>();
            rounds.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rounds)
        })
    }

    fn find_round(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move { Ok(inner.read().await.rounds.get(&id).cloned()) })
    }

    fn current_round(&self) -> BoxFuture<'static, StorageResult<Option<RoundEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let guard = inner.read().await;
            // Later insertions win created_at ties, so `>=` keeps the
            // derived choice stable.
            let pick = |status: Option<RoundStatus>| {
                let mut best: Option<&RoundEntity> = None;
                for round in guard.rounds.values() {
                    if status.is_some_and(|wanted| round.status != wanted) {
                        continue;
                    }
                    if best.is_none_or(|current| round.created_at >= current.created_at) {
                        best = Some(round);
                    }
                }
                best.cloned()
            };

            Ok(pick(Some(RoundStatus::Open)).or_else(|| pick(None)))
        })
    }

    fn create_game(
        &self,
        round_id: Uuid,
        team_a: String,
        team_b: String,
        kickoff_time: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut guard = inner.write().await;
            let round = guard.rounds.get(&round_id).ok_or(StorageError::NotFound {
                entity: "round",
                id: round_id,
            })?;
            if round.status != RoundStatus::Open {
                return Err(StorageError::RoundClosed);
            }

            let now = OffsetDateTime::now_utc();
            let game = GameEntity {
                id: Uuid::new_v4(),
                round_id,
                team_a,
                team_b,
                kickoff_time,
                status: GameStatus::Scheduled,
                reminder_sent: false,
                created_at: now,
                updated_at: now,
            };
            guard.games.insert(game.id, game.clone());
            Ok(game)
        })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move { Ok(inner.read().await.games.get(&id).cloned()) })
    }

    fn games_for_round(&self, round_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let guard = inner.read().await;
            let mut games = guard
                .games
                .values()
                .filter(|game| game.round_id == round_id)
                .cloned()
                .collect::<Vec<_>>();
            games.sort_by(|a, b| a.kickoff_time.cmp(&b.kickoff_time));
            Ok(games)
        })
    }

    fn upsert_bet(
        &self,
        user_id: Uuid,
        game_id: Uuid,
        guess_a: u32,
        guess_b: u32,
        now: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<BetEntity>> {
        let inner = Arc::clone(&self.inner);
        let lock_window = self.lock_window;
        Box::pin(async move {
            let mut guard = inner.write().await;

            if !guard.users.contains_key(&user_id) {
                return Err(StorageError::NotFound {
                    entity: "user",
                    id: user_id,
                });
            }
            let game = guard.games.get(&game_id).ok_or(StorageError::NotFound {
                entity: "game",
                id: game_id,
            })?;
            // Authoritative re-check under the write guard: a stale client
            // view or a racing lock tick cannot slip a late write through.
            if game.finished() || !cutoff::is_open(now, game.kickoff_time, lock_window) {
                return Err(StorageError::CutoffClosed);
            }

            if let Some(bet_id) = guard.bets_by_key.get(&(game_id, user_id)).copied() {
                let bet = guard
                    .bets
                    .get_mut(&bet_id)
                    .expect("bet index points at a stored bet");
                if bet.state.locked() {
                    return Err(StorageError::BetLocked);
                }
                bet.guess_a = guess_a;
                bet.guess_b = guess_b;
                bet.updated_at = now;
                return Ok(bet.clone());
            }

            let bet = BetEntity {
                id: Uuid::new_v4(),
                game_id,
                user_id,
                guess_a,
                guess_b,
                state: BetState::Open,
                created_at: now,
                updated_at: now,
            };
            guard.bets.insert(bet.id, bet.clone());
            guard.bets_by_key.insert((game_id, user_id), bet.id);
            Ok(bet)
        })
    }

    fn bet_for(
        &self,
        game_id: Uuid,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<BetEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(guard
                .bets_by_key
                .get(&(game_id, user_id))
                .and_then(|bet_id| guard.bets.get(bet_id))
                .cloned())
        })
    }

    fn bets_for_game(&self, game_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<BetEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(guard
                .bets
                .values()
                .filter(|bet| bet.game_id == game_id)
                .cloned()
                .collect())
        })
    }

    fn lockable_games(
        &self,
        now: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let inner = Arc::clone(&self.inner);
        let lock_window = self.lock_window;
        Box::pin(async move {
            let guard = inner.read().await;
            let games_with_open_bets = guard
                .bets
                .values()
                .filter(|bet| bet.state == BetState::Open)
                .map(|bet| bet.game_id)
                .collect::<HashSet<_>>();

            Ok(guard
                .games
                .values()
                .filter(|game| {
                    !game.finished()
                        && !cutoff::is_open(now, game.kickoff_time, lock_window)
                        && games_with_open_bets.contains(&game.id)
                })
                .cloned()
                .collect())
        })
    }

    fn lock_bets(&self, game_id: Uuid) -> BoxFuture<'static, StorageResult<usize>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut guard = inner.write().await;
            if !guard.games.contains_key(&game_id) {
                return Err(StorageError::NotFound {
                    entity: "game",
                    id: game_id,
                });
            }
            Ok(lock_open_bets(&mut guard.bets, game_id))
        })
    }

    fn reminder_due_games(
        &self,
        now: OffsetDateTime,
    ) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let inner = Arc::clone(&self.inner);
        let lock_window = self.lock_window;
        let reminder_lead = self.reminder_lead;
        Box::pin(async move {
            let guard = inner.read().await;
            Ok(guard
                .games
                .values()
                .filter(|game| {
                    !game.finished()
                        && !game.reminder_sent
                        && cutoff::reminder_due(now, game.kickoff_time, lock_window, reminder_lead)
                })
                .cloned()
                .collect())
        })
    }

    fn mark_reminder_sent(&self, game_id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut guard = inner.write().await;
            let game = guard.games.get_mut(&game_id).ok_or(StorageError::NotFound {
                entity: "game",
                id: game_id,
            })?;
            if game.reminder_sent {
                return Ok(false);
            }
            game.reminder_sent = true;
            Ok(true)
        })
    }

    fn users_without_bet(&self, game_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<Uuid>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let guard = inner.read().await;
            let bettors = guard
                .bets
                .values()
                .filter(|bet| bet.game_id == game_id)
                .map(|bet| bet.user_id)
                .collect::<HashSet<_>>();

            Ok(guard
                .users
                .keys()
                .filter(|user_id| !bettors.contains(user_id))
                .copied()
                .collect())
        })
    }

    fn bettors_of_round(&self, round_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<Uuid>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let guard = inner.read().await;
            let round_games = guard
                .games
                .values()
                .filter(|game| game.round_id == round_id)
                .map(|game| game.id)
                .collect::<HashSet<_>>();

            let bettors = guard
                .bets
                .values()
                .filter(|bet| round_games.contains(&bet.game_id))
                .map(|bet| bet.user_id)
                .collect::<IndexSet<_>>();

            Ok(bettors.into_iter().collect())
        })
    }

    fn finalize_game(
        &self,
        game_id: Uuid,
        final_a: u32,
        final_b: u32,
    ) -> BoxFuture<'static, StorageResult<FinalizedGame>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut guard = inner.write().await;
            let Inner {
                users,
                games,
                bets,
                ..
            } = &mut *guard;

            let game = games.get_mut(&game_id).ok_or(StorageError::NotFound {
                entity: "game",
                id: game_id,
            })?;
            if game.finished() {
                return Err(StorageError::AlreadyFinalized);
            }

            // Lock before scoring: after this point no racing writer can
            // touch a guess, even if the periodic tick has not run yet.
            let bets_locked = lock_open_bets(bets, game_id);

            let now = OffsetDateTime::now_utc();
            game.status = GameStatus::Finished {
                score_a: final_a,
                score_b: final_b,
            };
            game.updated_at = now;

            let mut scored = Vec::new();
            for bet in bets.values_mut() {
                if bet.game_id != game_id || bet.state != BetState::Locked {
                    continue;
                }
                let points = scoring::score(bet.guess_a, bet.guess_b, final_a, final_b);
                bet.state = BetState::Scored { points };
                bet.updated_at = now;
                if let Some(user) = users.get_mut(&bet.user_id) {
                    user.points_total += i64::from(points);
                }
                scored.push(ScoredBet {
                    bet_id: bet.id,
                    user_id: bet.user_id,
                    points,
                });
            }

            Ok(FinalizedGame {
                game: game.clone(),
                bets_locked,
                scored,
            })
        })
    }

    fn put_subscription(
        &self,
        user_id: Uuid,
        endpoint: String,
    ) -> BoxFuture<'static, StorageResult<PushSubscriptionEntity>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut guard = inner.write().await;
            if !guard.users.contains_key(&user_id) {
                return Err(StorageError::NotFound {
                    entity: "user",
                    id: user_id,
                });
            }
            let subscription = PushSubscriptionEntity {
                user_id,
                endpoint: endpoint.clone(),
                created_at: OffsetDateTime::now_utc(),
            };
            guard.subscriptions.insert(endpoint, subscription.clone());
            Ok(subscription)
        })
    }

    fn subscriptions_for(
        &self,
        user_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<PushSubscriptionEntity>>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let wanted = user_ids.into_iter().collect::<HashSet<_>>();
            let guard = inner.read().await;
            Ok(guard
                .subscriptions
                .values()
                .filter(|subscription| wanted.contains(&subscription.user_id))
                .cloned()
                .collect())
        })
    }

    fn remove_subscription(&self, endpoint: String) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            let mut guard = inner.write().await;
            Ok(guard.subscriptions.shift_remove(&endpoint).is_some())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
