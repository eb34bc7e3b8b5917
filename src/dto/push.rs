use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Payload carrying a push endpoint to register or drop.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubscriptionRequest {
    /// Opaque addressable endpoint URL.
    #[validate(url)]
    pub endpoint: String,
}
