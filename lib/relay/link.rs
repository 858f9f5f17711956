use async_trait::async_trait;
use std::io;

/// Trait for outbound connections that carry positions to a remote peer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Link {
    /// Sends a payload as is, without framing or delimiters.
    async fn send(&mut self, payload: &str) -> io::Result<()>;

    /// Closes the connection.
    async fn close(&mut self) -> io::Result<()>;
}
