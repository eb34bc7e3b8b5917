use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod bet;
pub mod game;
pub mod health;
pub mod push;
pub mod ranking;
pub mod round;
pub mod scheduler;
pub mod user;
pub mod validation;

fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
