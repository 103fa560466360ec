pub mod backend;
pub mod board_view;
pub mod recorder;
pub mod svg;
