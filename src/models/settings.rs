use crate::board::layout::LayoutConfig;
use crate::utils::logger::LogLevel;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub player: PlayerSettings,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub assets: CommonAssets,
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub log_level: LogLevel,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    /// Game server socket address, e.g. `127.0.0.1:8000`.
    pub address: String,
    /// Base URL for deck persistence and static images.
    pub http_base: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlayerSettings {
    pub username: String,
    /// Game to join. A fresh id opens a new game.
    #[serde(default = "Uuid::new_v4")]
    pub game_id: Uuid,
    #[serde(default)]
    pub deck: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            output: PathBuf::from("board.svg"),
        }
    }
}

/// Well-known images every duel needs.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CommonAssets {
    pub mat: String,
    pub default_card: String,
    pub card_back: String,
}

impl Default for CommonAssets {
    fn default() -> Self {
        Self {
            mat: "/static/images/mats/scapegoat.png".to_string(),
            default_card: "/static/images/default_card.png".to_string(),
            card_back: "/static/images/card_back.png".to_string(),
        }
    }
}

impl Settings {
    /// Loads `<name>.toml` (optional) and `DUEL__*` environment overrides.
    pub fn load(name: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(
                Environment::with_prefix("DUEL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [server]
        address = "127.0.0.1:8000"
        http_base = "http://127.0.0.1:5000"

        [player]
        username = "yugi"
        game_id = "6f1c7a3e-2b8d-4c55-9a0e-1d2f3b4c5d6e"
    "#;

    #[test]
    fn test_minimal_settings_fill_defaults() {
        let settings = Settings::from_toml(MINIMAL).unwrap();
        assert_eq!(settings.player.username, "yugi");
        assert_eq!(settings.player.deck, None);
        assert_eq!(settings.layout, LayoutConfig::default());
        assert_eq!(settings.render.width, 1200);
        assert_eq!(settings.assets.card_back, "/static/images/card_back.png");
        assert_eq!(settings.log_level, LogLevel::Info);
    }

    #[test]
    fn test_layout_and_log_level_overrides() {
        let source = format!("log_level = \"debug\"\n{MINIMAL}\n[layout]\ngap = 8.0\n");
        let settings = Settings::from_toml(&source).unwrap();
        assert_eq!(settings.layout.gap, 8.0);
        assert_eq!(settings.layout.padding, 24.0);
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_missing_game_id_opens_new_game() {
        let source = MINIMAL.replace("game_id = \"6f1c7a3e-2b8d-4c55-9a0e-1d2f3b4c5d6e\"", "");
        let first = Settings::from_toml(&source).unwrap();
        let second = Settings::from_toml(&source).unwrap();
        assert_ne!(first.player.game_id, second.player.game_id);
    }

    #[test]
    fn test_rejects_malformed_game_id() {
        let source = MINIMAL.replace("6f1c7a3e-2b8d-4c55-9a0e-1d2f3b4c5d6e", "not-a-uuid");
        assert!(Settings::from_toml(&source).is_err());
    }
}
