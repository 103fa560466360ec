use crate::game::state::GameStateSnapshot;
use crate::models::messages::{EndTurnRequest, ErrorMessage, JoinRequest, PlayCardRequest};
use crate::tcp::header::HeaderType;
use crate::tcp::packet::Packet;
use crate::utils::errors::ProtocolError;
use serde::Serialize;

/// Messages the client sends to the game server.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Join(JoinRequest),
    PlayCard(PlayCardRequest),
    EndTurn(EndTurnRequest),
    Disconnect,
}

impl ClientMessage {
    pub fn header_type(&self) -> HeaderType {
        match self {
            ClientMessage::Join(_) => HeaderType::Join,
            ClientMessage::PlayCard(_) => HeaderType::PlayCard,
            ClientMessage::EndTurn(_) => HeaderType::EndTurn,
            ClientMessage::Disconnect => HeaderType::Disconnect,
        }
    }

    /// Encodes the message body as CBOR and frames it.
    pub fn to_packet(&self) -> Result<Packet, ProtocolError> {
        let payload = match self {
            ClientMessage::Join(request) => encode(request)?,
            ClientMessage::PlayCard(request) => encode(request)?,
            ClientMessage::EndTurn(request) => encode(request)?,
            ClientMessage::Disconnect => Vec::new(),
        };

        Ok(Packet::new(self.header_type(), &payload))
    }
}

/// Messages pushed by the game server.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    GameState(GameStateSnapshot),
    Error(ErrorMessage),
    Disconnect,
    /// The server refused one of our packets.
    Rejected(HeaderType, String),
}

impl ServerMessage {
    /// Decodes a packet received from the server.
    ///
    /// Game state snapshots are validated here so the rest of the client
    /// never sees a malformed one.
    pub fn from_packet(packet: &Packet) -> Result<Self, ProtocolError> {
        let header_type = packet.header.header_type;
        match header_type {
            HeaderType::GameState => {
                let snapshot = GameStateSnapshot::from_payload(&packet.payload)?;
                Ok(ServerMessage::GameState(snapshot))
            }
            HeaderType::ERROR => {
                let message: ErrorMessage = serde_cbor::from_slice(&packet.payload)
                    .map_err(|e| ProtocolError::InvalidPayload(header_type.to_string(), e.to_string()))?;
                Ok(ServerMessage::Error(message))
            }
            HeaderType::Disconnect => Ok(ServerMessage::Disconnect),
            HeaderType::InvalidPacketPayload
            | HeaderType::InvalidHeader
            | HeaderType::InvalidChecksum => {
                let reason = String::from_utf8_lossy(&packet.payload).into_owned();
                Ok(ServerMessage::Rejected(header_type, reason))
            }
            HeaderType::Join | HeaderType::PlayCard | HeaderType::EndTurn => {
                Err(ProtocolError::InvalidPayload(
                    header_type.to_string(),
                    "client message received from server".to_string(),
                ))
            }
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    serde_cbor::to_vec(value).map_err(|e| ProtocolError::EncodeError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::deck::DeckList;

    #[test]
    fn test_join_is_cbor_framed() {
        let message = ClientMessage::Join(JoinRequest {
            game_id: "g-1".to_string(),
            name: "yugi".to_string(),
            deck: DeckList {
                main: vec!["Sangan".to_string()],
                ..Default::default()
            },
        });

        let packet = message.to_packet().unwrap();
        assert_eq!(packet.header.header_type, HeaderType::Join);

        let decoded: JoinRequest = serde_cbor::from_slice(&packet.payload).unwrap();
        assert_eq!(decoded.name, "yugi");
        assert_eq!(decoded.deck.main, vec!["Sangan"]);
    }

    #[test]
    fn test_disconnect_has_empty_payload() {
        let packet = ClientMessage::Disconnect.to_packet().unwrap();
        assert_eq!(packet.header.payload_length, 0);
    }

    #[test]
    fn test_error_message_decodes() {
        let payload = serde_cbor::to_vec(&ErrorMessage {
            error: "Game is full".to_string(),
        })
        .unwrap();
        let packet = Packet::new(HeaderType::ERROR, &payload);

        assert_eq!(
            ServerMessage::from_packet(&packet).unwrap(),
            ServerMessage::Error(ErrorMessage {
                error: "Game is full".to_string()
            })
        );
    }

    #[test]
    fn test_rejection_keeps_reason() {
        let packet = Packet::new(HeaderType::InvalidPacketPayload, b"Could not parse request.");
        match ServerMessage::from_packet(&packet).unwrap() {
            ServerMessage::Rejected(kind, reason) => {
                assert_eq!(kind, HeaderType::InvalidPacketPayload);
                assert_eq!(reason, "Could not parse request.");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_client_only_type_is_refused() {
        let packet = Packet::new(HeaderType::EndTurn, b"");
        assert!(matches!(
            ServerMessage::from_packet(&packet),
            Err(ProtocolError::InvalidPayload(_, _))
        ));
    }
}
