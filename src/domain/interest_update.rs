//! The push message carried to every live connection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Current interest count, serialized as `{"count": <integer>}`.
///
/// Sent once when a connection opens and again after every recorded
/// interest event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InterestUpdate {
    /// Total number of recorded interest events.
    pub count: u64,
}

impl InterestUpdate {
    /// Wraps a count.
    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self { count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_bare_count() {
        let json = serde_json::to_string(&InterestUpdate::new(42)).ok();
        assert_eq!(json.as_deref(), Some(r#"{"count":42}"#));
    }
}
