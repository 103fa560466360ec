use crate::logger;
use crate::tcp::packet::Packet;
use crate::tcp::protocol::{ClientMessage, ServerMessage};
use crate::utils::errors::NetworkError;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex, RwLock};

const SEND_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);
const INBOUND_CAPACITY: usize = 64;

type WriteHalf = Box<dyn AsyncWrite + Send + Unpin>;

/// Client side of the game server connection.
///
/// Owns the write half of the stream. The read half lives in a background
/// task that decodes packets in arrival order and forwards them through the
/// channel returned by [`Connection::connect`].
pub struct Connection {
    pub peer: String,
    connected: Arc<RwLock<bool>>,
    write_stream: Mutex<WriteHalf>,
}

impl Connection {
    /// Opens a TCP connection to the game server.
    ///
    /// # Returns
    /// The connection and the receiver of decoded server messages.
    pub async fn connect(
        address: &str,
    ) -> Result<(Self, mpsc::Receiver<ServerMessage>), NetworkError> {
        let stream = TcpStream::connect(address)
            .await
            .map_err(|e| NetworkError::ConnectionFailed(address.to_string(), e.to_string()))?;
        let (read_stream, write_stream) = stream.into_split();

        logger!(INFO, "[CONNECTION] Connected to `{address}`");
        Ok(Self::from_parts(address, read_stream, write_stream))
    }

    /// Builds a connection over an already open stream pair and starts listening.
    pub fn from_parts<R, W>(
        peer: &str,
        read_stream: R,
        write_stream: W,
    ) -> (Self, mpsc::Receiver<ServerMessage>)
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(INBOUND_CAPACITY);
        let connected = Arc::new(RwLock::new(true));

        tokio::spawn(listen(
            peer.to_string(),
            read_stream,
            tx,
            Arc::clone(&connected),
        ));

        let connection = Self {
            peer: peer.to_string(),
            connected,
            write_stream: Mutex::new(Box::new(write_stream)),
        };

        (connection, rx)
    }

    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }

    /// Sends a message, retrying failed writes before giving up.
    ///
    /// After the last failed attempt the connection is marked as disconnected.
    pub async fn send(&self, message: &ClientMessage) -> Result<(), NetworkError> {
        if !self.is_connected().await {
            return Err(NetworkError::Closed);
        }

        let packet = message.to_packet()?;
        let packet_data = packet.wrap_packet();
        let mut tries = 0;
        while tries < SEND_ATTEMPTS {
            let mut stream_guard = self.write_stream.lock().await;
            let written = match stream_guard.write_all(&packet_data).await {
                Ok(()) => stream_guard.flush().await,
                Err(error) => Err(error),
            };
            drop(stream_guard);

            if let Err(error) = written {
                logger!(
                    ERROR,
                    "[CONNECTION] Failed to send packet to `{}` ({error}). Retrying... [{}/{SEND_ATTEMPTS}]",
                    self.peer,
                    tries + 1
                );
                tokio::time::sleep(RETRY_DELAY).await;
                tries += 1;
                continue;
            }

            logger!(
                DEBUG,
                "[CONNECTION] Sent packet {{ type: {}, size: {} }} to `{}`",
                packet.header.header_type,
                packet_data.len(),
                self.peer
            );
            return Ok(());
        }

        self.mark_disconnected().await;
        Err(NetworkError::PackageWriteError(format!(
            "gave up after {SEND_ATTEMPTS} attempts"
        )))
    }

    /// Says goodbye to the server and closes the write half.
    pub async fn disconnect(&self) {
        if self.is_connected().await {
            let _ = self.send(&ClientMessage::Disconnect).await;
        }

        let _ = self.write_stream.lock().await.shutdown().await;
        self.mark_disconnected().await;
    }

    async fn mark_disconnected(&self) {
        let mut connected = self.connected.write().await;
        if *connected {
            logger!(INFO, "[CONNECTION] Disconnected from `{}`", self.peer);
        }
        *connected = false;
    }
}

/// Reads packets until the stream closes or loses framing.
///
/// Undecodable payloads are skipped; only errors that leave the stream
/// misaligned end the loop.
async fn listen<R>(
    peer: String,
    mut read_stream: R,
    tx: mpsc::Sender<ServerMessage>,
    connected: Arc<RwLock<bool>>,
) where
    R: AsyncRead + Unpin,
{
    logger!(DEBUG, "[CONNECTION] Listening to `{peer}`");

    loop {
        let packet = match Packet::read_from(&mut read_stream).await {
            Ok(Some(packet)) => packet,
            Ok(None) => break,
            Err(error) if error.is_recoverable() => {
                logger!(WARN, "[PROTOCOL] Skipping packet from `{peer}` ({error})");
                continue;
            }
            Err(error) => {
                logger!(ERROR, "[PROTOCOL] Lost framing with `{peer}` ({error})");
                break;
            }
        };

        logger!(
            DEBUG,
            "[PROTOCOL] Received packet: {{ type: {}, size: {} }}",
            packet.header.header_type,
            packet.payload.len()
        );

        let message = match ServerMessage::from_packet(&packet) {
            Ok(message) => message,
            Err(error) => {
                logger!(WARN, "[PROTOCOL] Skipping packet from `{peer}` ({error})");
                continue;
            }
        };

        let closing = message == ServerMessage::Disconnect;
        if tx.send(message).await.is_err() || closing {
            break;
        }
    }

    *connected.write().await = false;
    logger!(DEBUG, "[CONNECTION] Stopped listening to `{peer}`");
}
