use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{models::Role, pool_store::PoolStore},
    dto::{
        push::SubscriptionRequest,
        user::{RegisterUserRequest, UserSummary},
    },
    error::ServiceError,
    state::SharedState,
};

/// Create a user profile.
///
/// The role is trusted as provided: authentication and role assignment
/// happen upstream, this service only stores the profile.
pub async fn register_user(
    state: &SharedState,
    request: RegisterUserRequest,
) -> Result<UserSummary, ServiceError> {
    let role = request.role.unwrap_or(Role::Player);
    let user = state.store().create_user(request.nickname, role).await?;
    info!(user = %user.id, role = ?user.role, "user registered");
    Ok(user.into())
}

/// Register (or refresh) a push endpoint for the caller.
pub async fn subscribe_push(
    state: &SharedState,
    user_id: Uuid,
    request: SubscriptionRequest,
) -> Result<(), ServiceError> {
    let store = state.store();
    if store.find_user(user_id).await?.is_none() {
        return Err(ServiceError::Unauthorized(format!(
            "unknown user `{user_id}`"
        )));
    }

    store.put_subscription(user_id, request.endpoint).await?;
    Ok(())
}

/// Drop a push endpoint. Removing an unknown endpoint is a no-op.
pub async fn unsubscribe_push(
    state: &SharedState,
    request: SubscriptionRequest,
) -> Result<(), ServiceError> {
    state.store().remove_subscription(request.endpoint).await?;
    Ok(())
}
