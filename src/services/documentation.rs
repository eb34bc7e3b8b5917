use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the prediction-pool backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::users::register_user,
        crate::routes::rounds::list_rounds,
        crate::routes::rounds::current_round,
        crate::routes::rounds::list_games,
        crate::routes::bets::submit_bet,
        crate::routes::ranking::ranking,
        crate::routes::push::subscribe,
        crate::routes::push::unsubscribe,
        crate::routes::scheduler::trigger_tick,
        crate::routes::admin::create_round,
        crate::routes::admin::close_round,
        crate::routes::admin::create_game,
        crate::routes::admin::finalize_game,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::user::RegisterUserRequest,
            crate::dto::user::UserSummary,
            crate::dto::round::CreateRoundRequest,
            crate::dto::round::RoundSummary,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::FinalizeGameRequest,
            crate::dto::game::GameSummary,
            crate::dto::game::GameWithBet,
            crate::dto::game::FinalizationSummary,
            crate::dto::game::ScoredBetView,
            crate::dto::bet::SubmitBetRequest,
            crate::dto::bet::BetView,
            crate::dto::ranking::RankingEntry,
            crate::dto::push::SubscriptionRequest,
            crate::dto::scheduler::TickResponse,
            crate::dao::models::Role,
            crate::dao::models::RoundStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User profile management"),
        (name = "rounds", description = "Round and game listings"),
        (name = "bets", description = "Bet submission"),
        (name = "ranking", description = "Standings"),
        (name = "push", description = "Push subscription registry"),
        (name = "scheduler", description = "Externally triggered lifecycle passes"),
        (name = "admin", description = "Round, game, and result administration"),
    )
)]
pub struct ApiDoc;
