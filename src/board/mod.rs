pub mod descriptor;
pub mod geometry;
pub mod hand;
pub mod layout;
pub mod placement;
