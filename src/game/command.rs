use crate::board::geometry::Viewport;
use crate::deck::builder::DeckSection;
use crate::utils::errors::CommandError;
use std::str::FromStr;

/// A line typed on the client's standard input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play(String),
    EndTurn,
    Resize(Viewport),
    Quit,

    Search(String),
    NextPage,
    PrevPage,
    Add(DeckSection, String),
    Remove(DeckSection, usize),
    ShowDeck,
    LoadDeck(String),
    SaveDeck(String),
}

const PLAY_USAGE: &str = "play <card_id>";
const RESIZE_USAGE: &str = "resize <width> <height>";
const ADD_USAGE: &str = "add <main|extra|side> <card name>";
const REMOVE_USAGE: &str = "remove <main|extra|side> <index>";
const LOAD_USAGE: &str = "load <deck name>";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "play" if !rest.is_empty() => Ok(Command::Play(rest.to_string())),
            "play" => Err(CommandError::Usage(PLAY_USAGE)),
            "end" => Ok(Command::EndTurn),
            "resize" => parse_viewport(rest).map(Command::Resize),
            "quit" | "exit" => Ok(Command::Quit),

            "search" => Ok(Command::Search(rest.to_string())),
            "next" => Ok(Command::NextPage),
            "prev" => Ok(Command::PrevPage),
            "add" => {
                let (section, name) = section_and_rest(rest).ok_or(CommandError::Usage(ADD_USAGE))?;
                Ok(Command::Add(section, name.to_string()))
            }
            "remove" => {
                let (section, index) =
                    section_and_rest(rest).ok_or(CommandError::Usage(REMOVE_USAGE))?;
                let index = index
                    .parse::<usize>()
                    .map_err(|_| CommandError::Usage(REMOVE_USAGE))?;
                Ok(Command::Remove(section, index))
            }
            "deck" => Ok(Command::ShowDeck),
            "load" if !rest.is_empty() => Ok(Command::LoadDeck(rest.to_string())),
            "load" => Err(CommandError::Usage(LOAD_USAGE)),
            "save" => Ok(Command::SaveDeck(rest.to_string())),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

fn parse_viewport(rest: &str) -> Result<Viewport, CommandError> {
    let mut parts = rest.split_whitespace().map(str::parse::<u32>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(width)), Some(Ok(height)), None) if width > 0 && height > 0 => {
            Ok(Viewport::new(width, height))
        }
        _ => Err(CommandError::Usage(RESIZE_USAGE)),
    }
}

fn section_and_rest(rest: &str) -> Option<(DeckSection, &str)> {
    let (section, rest) = rest.split_once(char::is_whitespace)?;
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    Some((section.parse().ok()?, rest))
}
