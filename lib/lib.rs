/// Chess domain types.
pub mod chess;
/// Transmission of positions to a remote server.
pub mod relay;
