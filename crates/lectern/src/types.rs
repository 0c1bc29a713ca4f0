//! Shared response types

use serde::{Deserialize, Serialize};

/// Success envelope returned by the lecture and chat endpoints.
///
/// The status code is mirrored into the body because the frontend reads
/// it from there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: u16,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: 200,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_shape() {
        let response = MessageResponse::ok("## Notes");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], 200);
        assert_eq!(json["message"], "## Notes");
    }
}
