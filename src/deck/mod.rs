pub mod builder;
pub mod catalog;
pub mod persistence;
