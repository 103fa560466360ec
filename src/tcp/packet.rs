use crate::logger;
use crate::tcp::header::{Header, HeaderType, HEADER_LENGTH};
use crate::utils::checksum::CheckSum;
use crate::utils::errors::ProtocolError;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Largest payload accepted from the wire.
pub const MAX_PAYLOAD: u32 = 1 << 20;

/// Represents a complete network packet with a protocol header and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub header: Header,
    pub payload: Box<[u8]>,
}

impl Packet {
    /// Creates a new `Packet`, building the header from the payload.
    pub fn new(header_type: HeaderType, payload: &[u8]) -> Self {
        let header = Header::new(header_type, payload);
        let payload = payload.to_vec().into_boxed_slice();
        Self { header, payload }
    }

    /// Parses one complete packet from a byte slice.
    ///
    /// The slice must hold the header followed by exactly `payload_length`
    /// bytes, and the payload must match the header checksum.
    pub fn parse(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() < HEADER_LENGTH {
            return Err(ProtocolError::InvalidPacketError(
                "Not enough bytes for a valid packet".to_string(),
            ));
        }

        let header = Header::from_bytes(&bytes[..HEADER_LENGTH])?;
        let payload = &bytes[HEADER_LENGTH..];
        if payload.len() != header.payload_length as usize {
            return Err(ProtocolError::InvalidPacketError(format!(
                "Expected {} payload bytes, got {}",
                header.payload_length,
                payload.len()
            )));
        }

        if !CheckSum::check(header.checksum, payload) {
            return Err(ProtocolError::InvalidChecksum {
                expected: header.checksum,
                computed: CheckSum::new(payload),
            });
        }

        Ok(Self {
            header,
            payload: payload.to_vec().into_boxed_slice(),
        })
    }

    /// Serializes the packet into a single buffer for transmission.
    pub fn wrap_packet(&self) -> Box<[u8]> {
        let header = self.header.wrap_header();
        let mut packet = Vec::with_capacity(header.len() + self.payload.len());

        packet.extend_from_slice(&header);
        packet.extend_from_slice(&self.payload);

        packet.into_boxed_slice()
    }

    /// Reads the next packet from a stream.
    ///
    /// # Returns
    /// - `Ok(None)` when the stream ends or fails.
    /// - `Err(ProtocolError)` when the frame is malformed. Recoverable errors
    ///   (unknown type, bad checksum, oversized payload) leave the stream on
    ///   the next packet boundary.
    pub async fn read_from<R>(reader: &mut R) -> Result<Option<Packet>, ProtocolError>
    where
        R: AsyncRead + Unpin,
    {
        let mut header = [0u8; HEADER_LENGTH];
        if let Err(error) = reader.read_exact(&mut header).await {
            if error.kind() != ErrorKind::UnexpectedEof {
                logger!(DEBUG, "[PROTOCOL] Read failed ({error})");
            }
            return Ok(None);
        }

        let length = Header::frame_length(&header)?;
        if length > MAX_PAYLOAD {
            let mut rest = (&mut *reader).take(length as u64);
            let skipped = tokio::io::copy(&mut rest, &mut tokio::io::sink())
                .await
                .unwrap_or(0);
            if skipped < length as u64 {
                logger!(DEBUG, "[PROTOCOL] Stream ended inside an oversized packet");
                return Ok(None);
            }
            return Err(ProtocolError::PayloadTooLarge(length));
        }

        let mut frame = Vec::with_capacity(HEADER_LENGTH + length as usize);
        frame.extend_from_slice(&header);
        frame.resize(HEADER_LENGTH + length as usize, 0);
        if let Err(error) = reader.read_exact(&mut frame[HEADER_LENGTH..]).await {
            logger!(DEBUG, "[PROTOCOL] Stream ended mid-packet ({error})");
            return Ok(None);
        }

        Packet::parse(&frame).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn test_parse_rejects_short_buffer() {
        assert!(matches!(
            Packet::parse(&[0x10, 0x00]),
            Err(ProtocolError::InvalidPacketError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_tampered_payload() {
        let mut bytes = Packet::new(HeaderType::GameState, b"state").wrap_packet().to_vec();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;

        let error = Packet::parse(&bytes).unwrap_err();
        assert!(matches!(error, ProtocolError::InvalidChecksum { .. }));
        assert!(error.is_recoverable());
    }

    #[tokio::test]
    async fn test_read_from_skips_past_bad_packet() {
        let (mut client, mut server) = tokio::io::duplex(256);
        let mut bad = Packet::new(HeaderType::ERROR, b"oops").wrap_packet().to_vec();
        bad[0] = 0x42;
        server.write_all(&bad).await.unwrap();
        server
            .write_all(&Packet::new(HeaderType::Disconnect, b"").wrap_packet())
            .await
            .unwrap();
        drop(server);

        let first = Packet::read_from(&mut client).await;
        assert!(matches!(first, Err(ProtocolError::UnknownHeaderType(0x42))));

        let second = Packet::read_from(&mut client).await.unwrap().unwrap();
        assert_eq!(second.header.header_type, HeaderType::Disconnect);

        assert!(Packet::read_from(&mut client).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_oversized_packet_is_discarded() {
        let (mut client, mut server) = tokio::io::duplex(64 * 1024);
        let length = MAX_PAYLOAD + 1;
        let mut header = Packet::new(HeaderType::GameState, b"").header.wrap_header().to_vec();
        header[1..5].copy_from_slice(&length.to_be_bytes());

        let writer = tokio::spawn(async move {
            server.write_all(&header).await.unwrap();
            server.write_all(&vec![0u8; length as usize]).await.unwrap();
            server
                .write_all(&Packet::new(HeaderType::Disconnect, b"").wrap_packet())
                .await
                .unwrap();
        });

        let error = Packet::read_from(&mut client).await.unwrap_err();
        assert!(matches!(error, ProtocolError::PayloadTooLarge(len) if len == length));
        assert!(error.is_recoverable());

        let next = Packet::read_from(&mut client).await.unwrap().unwrap();
        assert_eq!(next.header.header_type, HeaderType::Disconnect);
        writer.await.unwrap();
    }
}
