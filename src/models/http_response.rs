use crate::utils::errors::DeckRequestError;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct SaveDeckResponse {
    pub success: bool,
    #[serde(default)]
    pub deck_name: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SaveDeckResponse {
    /// Resolves the response to the stored deck name, falling back to the requested one.
    pub fn into_result(self, requested: &str) -> Result<String, DeckRequestError> {
        if self.success {
            Ok(self.deck_name.unwrap_or_else(|| requested.to_string()))
        } else {
            Err(DeckRequestError::Rejected(
                self.error.unwrap_or_else(|| "NO MESSAGE".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_returns_stored_name() {
        let response: SaveDeckResponse =
            serde_json::from_str(r#"{"success": true, "deck_name": "goat.ydk"}"#).unwrap();
        assert_eq!(response.into_result("goat").unwrap(), "goat.ydk");
    }

    #[test]
    fn test_failure_carries_server_error() {
        let response: SaveDeckResponse =
            serde_json::from_str(r#"{"success": false, "error": "Deck name taken"}"#).unwrap();
        match response.into_result("goat") {
            Err(DeckRequestError::Rejected(message)) => assert_eq!(message, "Deck name taken"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
