//! Document identifiers: 24 lowercase hex characters, time-prefixed.

use chrono::Utc;
use uuid::Uuid;

use super::StoreError;

/// Length of a document id.
pub const ID_LEN: usize = 24;

/// Generate a new id: 8 hex digits of epoch seconds followed by 16 random
/// hex digits, so ids sort roughly by creation time.
pub fn new_id() -> String {
    let seconds = Utc::now().timestamp().max(0) as u32;
    let random = Uuid::new_v4().simple().to_string();
    format!("{:08x}{}", seconds, &random[..ID_LEN - 8])
}

/// Reject ids that are not 24 lowercase hex characters.
pub fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.len() == ID_LEN && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}
