pub mod cache;
pub mod fetcher;
