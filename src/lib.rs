pub mod assets;
pub mod board;
pub mod deck;
pub mod game;
pub mod models;
pub mod render;
pub mod tcp;
pub mod utils;
