pub mod connection;
pub mod header;
pub mod packet;
pub mod protocol;
