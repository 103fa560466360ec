use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid header: {0}")]
    InvalidHeaderError(String),
    #[error("Invalid packet: {0}")]
    InvalidPacketError(String),
    #[error("Unknown header type {0:#04x}")]
    UnknownHeaderType(u8),
    #[error("Payload of {0} bytes exceeds the limit")]
    PayloadTooLarge(u32),
    #[error("Invalid checksum (expected {expected:#06x}, computed {computed:#06x})")]
    InvalidChecksum { expected: u16, computed: u16 },
    #[error("Could not decode `{0}` payload: {1}")]
    InvalidPayload(String, String),
    #[error("Could not encode payload: {0}")]
    EncodeError(String),
    #[error("Invalid game state: {0}")]
    InvalidGameState(String),
}

impl ProtocolError {
    /// Whether the stream is still aligned on a packet boundary after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ProtocolError::InvalidHeaderError(_) | ProtocolError::InvalidPacketError(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Unable to connect to `{0}`: {1}")]
    ConnectionFailed(String, String),
    #[error("Unable to send package through the stream: {0}")]
    PackageWriteError(String),
    #[error("Connection is closed")]
    Closed,
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Image request failed: {0}")]
    RequestFailed(String),
    #[error("Image `{0}` answered with status {1}")]
    UnexpectedStatus(String, u16),
    #[error("Could not read image body: {0}")]
    InvalidBody(String),
}

#[derive(Debug, Error)]
pub enum DeckRequestError {
    #[error("Deck `{0}` was not found")]
    DeckNotFound(String),
    #[error("Deck was rejected: {0}")]
    Rejected(String),
    #[error("Invalid response body for `{0}`")]
    InvalidResponseBody(String),
    #[error("Unexpected deck request error: {0}")]
    UnexpectedDeckError(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum DeckBuilderError {
    #[error("Card `{0}` is not in the catalog")]
    UnknownCard(String),
    #[error("The {0} deck is full")]
    SectionFull(String),
    #[error("Already holding the maximum copies of `{0}`")]
    TooManyCopies(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unable to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unable to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command `{0}`")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("It's not your turn")]
    NotYourTurn,
    #[error(transparent)]
    Network(#[from] NetworkError),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
