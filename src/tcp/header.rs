use crate::utils::checksum::CheckSum;
use crate::utils::errors::ProtocolError;
use std::fmt::Display;

pub const HEADER_LENGTH: usize = 8;
const DELIMITER: u8 = 0x0A;

/// Represents the type of message in a protocol packet.
///
/// ### Client to server:
/// - `Join` - Join a game with a name and deck.
/// - `PlayCard` - Play a card from hand.
/// - `EndTurn` - Pass the turn.
///
/// ### Server to client:
/// - `GameState` - Full snapshot of the game.
/// - `ERROR` - Non-fatal error message.
///
/// ### Rejections (0xF1–0xFD):
/// Sent by the server when a client packet could not be processed.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderType {
    Disconnect = 0x00,
    Join = 0x01,

    GameState = 0x10,
    PlayCard = 0x11,
    EndTurn = 0x13,

    InvalidPacketPayload = 0xF1,
    InvalidHeader = 0xFA,
    InvalidChecksum = 0xFD,
    ERROR = 0xFE,
}

impl Display for HeaderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            HeaderType::Disconnect => "DISCONNECT",
            HeaderType::Join => "JOIN",

            HeaderType::GameState => "GAME_STATE",
            HeaderType::PlayCard => "PLAY_CARD",
            HeaderType::EndTurn => "END_TURN",

            HeaderType::InvalidPacketPayload => "INVALID_PACKET_PAYLOAD",
            HeaderType::InvalidHeader => "INVALID_HEADER",
            HeaderType::InvalidChecksum => "INVALID_CHECKSUM",
            HeaderType::ERROR => "ERROR",
        };

        write!(f, "{}", str)
    }
}

impl TryFrom<u8> for HeaderType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, ProtocolError> {
        match value {
            0x00 => Ok(HeaderType::Disconnect),
            0x01 => Ok(HeaderType::Join),

            0x10 => Ok(HeaderType::GameState),
            0x11 => Ok(HeaderType::PlayCard),
            0x13 => Ok(HeaderType::EndTurn),

            0xF1 => Ok(HeaderType::InvalidPacketPayload),
            0xFA => Ok(HeaderType::InvalidHeader),
            0xFD => Ok(HeaderType::InvalidChecksum),
            0xFE => Ok(HeaderType::ERROR),
            other => Err(ProtocolError::UnknownHeaderType(other)),
        }
    }
}

/// Fixed-size packet header.
///
/// Format: `[type, payload_len (4 bytes BE), checksum (2 bytes BE), 0x0A]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub checksum: u16,
    pub payload_length: u32,
    pub header_type: HeaderType,
}

impl Header {
    /// Creates a header for the payload, computing its length and checksum.
    pub fn new(header_type: HeaderType, payload: &[u8]) -> Self {
        Self {
            checksum: CheckSum::new(payload),
            payload_length: payload.len() as u32,
            header_type,
        }
    }

    pub fn wrap_header(&self) -> [u8; HEADER_LENGTH] {
        let length = self.payload_length.to_be_bytes();
        let checksum = self.checksum.to_be_bytes();

        [
            self.header_type as u8,
            length[0],
            length[1],
            length[2],
            length[3],
            checksum[0],
            checksum[1],
            DELIMITER,
        ]
    }

    /// Reads only the framing fields: delimiter and payload length.
    ///
    /// Used before the payload is read so that a packet with an unknown type
    /// can still be skipped whole.
    pub fn frame_length(bytes: &[u8]) -> Result<u32, ProtocolError> {
        if bytes.len() != HEADER_LENGTH || bytes[HEADER_LENGTH - 1] != DELIMITER {
            return Err(ProtocolError::InvalidHeaderError(format!(
                "Format invalid: {:?}",
                bytes
            )));
        }

        Ok(u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]))
    }

    /// Parses a header from exactly `HEADER_LENGTH` bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let payload_length = Header::frame_length(bytes)?;
        let header_type = HeaderType::try_from(bytes[0])?;
        let checksum = u16::from_be_bytes([bytes[5], bytes[6]]);

        Ok(Self {
            header_type,
            payload_length,
            checksum,
        })
    }
}
