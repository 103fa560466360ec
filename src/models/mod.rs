pub mod card;
pub mod messages;
pub mod deck;
pub mod http_response;
pub mod settings;
