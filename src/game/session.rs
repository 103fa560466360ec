use crate::assets::cache::AssetCache;
use crate::assets::fetcher::ImageFetcher;
use crate::board::descriptor::BoardDescriptor;
use crate::board::geometry::Viewport;
use crate::board::layout::{compute_layout, BoardLayout};
use crate::board::placement::PlacedCard;
use crate::game::state::GameStateSnapshot;
use crate::logger;
use crate::models::deck::DeckList;
use crate::models::messages::{EndTurnRequest, JoinRequest, PlayCardRequest};
use crate::models::settings::Settings;
use crate::render::backend::RenderBackend;
use crate::render::board_view::{needed_images, BoardView};
use crate::tcp::connection::Connection;
use crate::tcp::protocol::{ClientMessage, ServerMessage};
use crate::utils::errors::SessionError;
use std::sync::Arc;

/// One player's view of one duel.
///
/// Holds the connection, the latest snapshot pushed by the server and the
/// current layout. Every frame is drawn from scratch out of these.
pub struct Session<F> {
    settings: Settings,
    connection: Connection,
    assets: Arc<AssetCache<F>>,
    descriptor: BoardDescriptor,
    viewport: Viewport,
    layout: BoardLayout,
    state: Option<GameStateSnapshot>,
    notice: Option<String>,
}

impl<F: ImageFetcher + 'static> Session<F> {
    pub fn new(settings: Settings, connection: Connection, assets: Arc<AssetCache<F>>) -> Self {
        let descriptor = BoardDescriptor::standard();
        let viewport = Viewport::new(settings.render.width, settings.render.height);
        let layout = compute_layout(viewport, &descriptor, &settings.layout);

        Self {
            settings,
            connection,
            assets,
            descriptor,
            viewport,
            layout,
            state: None,
            notice: None,
        }
    }

    pub fn state(&self) -> Option<&GameStateSnapshot> {
        self.state.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// The id of the running game, or the configured one before the first snapshot.
    pub fn game_id(&self) -> String {
        match &self.state {
            Some(state) => state.id.clone(),
            None => self.settings.player.game_id.to_string(),
        }
    }

    /// Loads the configured deck and joins the game with it.
    ///
    /// A deck that cannot be loaded is replaced by an empty one; the server
    /// decides what to do with it.
    pub async fn join(&self) -> Result<(), SessionError> {
        let deck = match &self.settings.player.deck {
            Some(name) => match DeckList::load(&self.settings.server.http_base, name).await {
                Ok(deck) => deck,
                Err(error) => {
                    logger!(WARN, "[SESSION] Joining with an empty deck ({error})");
                    DeckList::default()
                }
            },
            None => DeckList::default(),
        };

        self.join_with(deck).await
    }

    pub async fn join_with(&self, deck: DeckList) -> Result<(), SessionError> {
        let request = JoinRequest {
            game_id: self.settings.player.game_id.to_string(),
            name: self.settings.player.username.clone(),
            deck,
        };

        logger!(
            INFO,
            "[SESSION] Joining game `{}` as `{}` ({} cards)",
            request.game_id,
            request.name,
            request.deck.len()
        );
        self.connection.send(&ClientMessage::Join(request)).await?;
        Ok(())
    }

    pub fn is_my_turn(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|state| state.is_turn_of(&self.settings.player.username))
    }

    /// Asks the server to play a card. Only sent on the local player's turn.
    pub async fn play_card(&self, card_id: &str) -> Result<(), SessionError> {
        if !self.is_my_turn() {
            return Err(SessionError::NotYourTurn);
        }

        let request = PlayCardRequest {
            game_id: self.game_id(),
            card_id: card_id.to_string(),
        };
        self.connection.send(&ClientMessage::PlayCard(request)).await?;
        Ok(())
    }

    pub async fn end_turn(&self) -> Result<(), SessionError> {
        let request = EndTurnRequest {
            game_id: self.game_id(),
        };
        self.connection.send(&ClientMessage::EndTurn(request)).await?;
        Ok(())
    }

    /// Applies one inbound message. Returns whether the board needs a redraw.
    pub fn handle_message(&mut self, message: ServerMessage) -> bool {
        match message {
            ServerMessage::GameState(snapshot) => {
                logger!(
                    DEBUG,
                    "[SESSION] Game state for `{}` ({} players, started: {})",
                    snapshot.id,
                    snapshot.players.len(),
                    snapshot.started
                );
                self.state = Some(snapshot);
                self.notice = None;
                true
            }
            ServerMessage::Error(error) => {
                logger!(WARN, "[SESSION] Server error: {}", error.error);
                self.notice = Some(error.error);
                true
            }
            ServerMessage::Disconnect => {
                logger!(INFO, "[SESSION] Server closed the game");
                self.notice = Some("Disconnected from server".to_string());
                true
            }
            ServerMessage::Rejected(kind, reason) => {
                logger!(WARN, "[SESSION] Request rejected: {kind} ({reason})");
                false
            }
        }
    }

    /// Recomputes the layout for a new viewport. Cards follow on the next frame.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout = compute_layout(viewport, &self.descriptor, &self.settings.layout);
    }

    pub fn placed_cards(&self) -> Vec<PlacedCard> {
        match &self.state {
            Some(state) => state.placed_cards(&self.settings.player.username, &self.settings.assets),
            None => Vec::new(),
        }
    }

    pub fn needed_images(&self) -> Vec<String> {
        needed_images(
            self.state.as_ref(),
            &self.settings.player.username,
            &self.settings.assets,
        )
    }

    /// Resolves every image the frame needs, then draws it in one pass.
    pub async fn render<B: RenderBackend>(&self, backend: &mut B) {
        let textures = self.assets.resolve_all(&self.needed_images()).await;

        let view = BoardView {
            viewport: self.viewport,
            layout: &self.layout,
            config: &self.settings.layout,
            state: self.state.as_ref(),
            username: &self.settings.player.username,
            assets: &self.settings.assets,
            textures: &textures,
            notice: self.notice.as_deref(),
        };
        view.draw(backend);

        logger!(
            DEBUG,
            "[RENDER] Frame drawn at {}x{} with {} textures",
            self.viewport.width,
            self.viewport.height,
            textures.len()
        );
    }

    pub async fn disconnect(&self) {
        self.connection.disconnect().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::cache::tests::CountingFetcher;
    use crate::board::descriptor::{PlayerSide, ZoneId, ZoneName};
    use crate::game::state::tests::two_player_state;
    use crate::models::messages::ErrorMessage;
    use crate::render::recorder::FrameRecorder;
    use crate::tcp::header::HeaderType;
    use crate::tcp::packet::Packet;
    use tokio::io::DuplexStream;

    const SETTINGS: &str = r#"
        [server]
        address = "127.0.0.1:8000"
        http_base = "http://127.0.0.1:1"

        [player]
        username = "yugi"
        game_id = "6f1c7a3e-2b8d-4c55-9a0e-1d2f3b4c5d6e"
    "#;

    fn session() -> (Session<CountingFetcher>, DuplexStream) {
        let settings = Settings::from_toml(SETTINGS).unwrap();
        let (client, server) = tokio::io::duplex(8192);
        let (read_half, write_half) = tokio::io::split(client);
        let (connection, _rx) = Connection::from_parts("test-server", read_half, write_half);
        let assets = Arc::new(AssetCache::new(CountingFetcher::default()));
        (Session::new(settings, connection, assets), server)
    }

    #[tokio::test]
    async fn test_join_without_deck_sends_empty_deck() {
        let (session, mut server) = session();
        session.join().await.unwrap();

        let packet = Packet::read_from(&mut server).await.unwrap().unwrap();
        assert_eq!(packet.header.header_type, HeaderType::Join);
        let request: JoinRequest = serde_cbor::from_slice(&packet.payload).unwrap();
        assert_eq!(request.name, "yugi");
        assert_eq!(request.game_id, "6f1c7a3e-2b8d-4c55-9a0e-1d2f3b4c5d6e");
        assert!(request.deck.is_empty());
    }

    #[tokio::test]
    async fn test_play_card_is_guarded_by_turn() {
        let (mut session, mut server) = session();
        assert!(matches!(
            session.play_card("h1").await,
            Err(SessionError::NotYourTurn)
        ));

        let mut state = two_player_state();
        state.turn = Some("sid-b".to_string());
        session.handle_message(ServerMessage::GameState(state));
        assert!(matches!(
            session.play_card("h1").await,
            Err(SessionError::NotYourTurn)
        ));

        session.handle_message(ServerMessage::GameState(two_player_state()));
        session.play_card("h1").await.unwrap();

        let packet = Packet::read_from(&mut server).await.unwrap().unwrap();
        assert_eq!(packet.header.header_type, HeaderType::PlayCard);
        let request: PlayCardRequest = serde_cbor::from_slice(&packet.payload).unwrap();
        assert_eq!(request.game_id, "game-1");
        assert_eq!(request.card_id, "h1");
    }

    #[tokio::test]
    async fn test_end_turn_uses_configured_game_before_first_state() {
        let (session, mut server) = session();
        session.end_turn().await.unwrap();

        let packet = Packet::read_from(&mut server).await.unwrap().unwrap();
        let request: EndTurnRequest = serde_cbor::from_slice(&packet.payload).unwrap();
        assert_eq!(request.game_id, "6f1c7a3e-2b8d-4c55-9a0e-1d2f3b4c5d6e");
    }

    #[tokio::test]
    async fn test_error_notice_until_next_state() {
        let (mut session, _server) = session();

        assert!(session.handle_message(ServerMessage::Error(ErrorMessage {
            error: "Game is full".to_string()
        })));
        assert_eq!(session.notice(), Some("Game is full"));

        assert!(!session.handle_message(ServerMessage::Rejected(
            HeaderType::InvalidChecksum,
            String::new()
        )));
        assert_eq!(session.notice(), Some("Game is full"));

        session.handle_message(ServerMessage::GameState(two_player_state()));
        assert!(session.notice().is_none());
        assert_eq!(session.placed_cards().len(), 7);
    }

    #[tokio::test]
    async fn test_resize_recomputes_layout() {
        let (mut session, _server) = session();
        let field = ZoneId::new(PlayerSide::Own, ZoneName::Field);
        let before = *session.layout().get(&field).unwrap();

        session.resize(Viewport::new(600, 400));
        let after = *session.layout().get(&field).unwrap();

        assert_eq!(session.viewport(), Viewport::new(600, 400));
        assert!(after.width < before.width);
    }

    #[tokio::test]
    async fn test_render_draws_resolved_frame() {
        let (mut session, _server) = session();
        session.handle_message(ServerMessage::GameState(two_player_state()));

        let mut recorder = FrameRecorder::new();
        session.render(&mut recorder).await;

        assert_eq!(recorder.frames, 1);
        assert!(recorder.labels().contains(&"Current Turn: yugi"));
        assert!(recorder
            .sprites()
            .iter()
            .any(|(url, _)| *url == "/img/dm.jpg"));
    }
}
