use crate::logger;
use crate::models::deck::{DeckList, SaveDeckRequest};
use crate::models::http_response::SaveDeckResponse;
use crate::utils::errors::DeckRequestError;
use reqwest::StatusCode;

fn endpoint(http_base: &str, path: &str) -> String {
    format!("{}/{}", http_base.trim_end_matches('/'), path)
}

impl DeckList {
    /// Requests a stored deck by name from the deck server.
    ///
    /// # Returns
    /// - `Ok(DeckList)` with the three sections (missing ones are empty).
    /// - `Err(DeckRequestError::DeckNotFound)` when the server answers 404.
    pub async fn load(http_base: &str, name: &str) -> Result<DeckList, DeckRequestError> {
        let name = name.trim_end_matches(".ydk");
        let api_url = endpoint(http_base, &format!("load_ydk/{name}"));
        match reqwest::get(api_url).await {
            Err(error) => Err(DeckRequestError::UnexpectedDeckError(error.to_string())),
            Ok(response) => match response.status() {
                StatusCode::NOT_FOUND => Err(DeckRequestError::DeckNotFound(name.to_string())),
                StatusCode::OK => {
                    let deck = response
                        .json::<DeckList>()
                        .await
                        .map_err(|_| DeckRequestError::InvalidResponseBody(name.to_string()))?;
                    logger!(INFO, "[DECK] Loaded `{name}` ({} cards)", deck.len());
                    Ok(deck)
                }
                _ => {
                    let response_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "NO MESSAGE".to_string());
                    Err(DeckRequestError::UnexpectedDeckError(response_body))
                }
            },
        }
    }
}

impl SaveDeckRequest {
    /// Stores the deck on the server and returns the name it was saved under.
    pub async fn submit(&self, http_base: &str) -> Result<String, DeckRequestError> {
        let api_url = endpoint(http_base, "deckbuilder");
        let client = reqwest::Client::new();

        match client.post(api_url).json(self).send().await {
            Err(error) => Err(DeckRequestError::UnexpectedDeckError(error.to_string())),
            Ok(response) => match response.status() {
                StatusCode::OK => {
                    let body = response
                        .json::<SaveDeckResponse>()
                        .await
                        .map_err(|_| DeckRequestError::InvalidResponseBody(self.deck_name.clone()))?;
                    let stored = body.into_result(&self.deck_name)?;
                    logger!(INFO, "[DECK] Saved deck as `{stored}`");
                    Ok(stored)
                }
                _ => {
                    let response_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "NO MESSAGE".to_string());
                    Err(DeckRequestError::UnexpectedDeckError(response_body))
                }
            },
        }
    }
}
