use super::{Link, RelayError};
use async_trait::async_trait;
use derive_more::DebugCustom;
use std::{fmt::Debug, io, net::SocketAddr};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::instrument;

/// An implementation of trait [`Link`] as a tcp stream.
#[derive(DebugCustom)]
#[debug(fmt = "Tcp({})", address)]
pub struct Tcp {
    address: SocketAddr,
    stream: TcpStream,
}

impl Tcp {
    /// Connects to a remote TCP server.
    ///
    /// Nagle's algorithm is disabled, so that every payload is sent right away.
    #[instrument(level = "debug", err)]
    pub async fn connect<A>(address: A) -> Result<Self, RelayError>
    where
        A: ToSocketAddrs + Debug,
    {
        let stream = TcpStream::connect(address)
            .await
            .map_err(RelayError::Connect)?;

        stream.set_nodelay(true).map_err(RelayError::Connect)?;
        let address = stream.peer_addr().map_err(RelayError::Connect)?;

        Ok(Tcp { address, stream })
    }

    /// The address of the remote peer.
    pub fn peer_addr(&self) -> SocketAddr {
        self.address
    }
}

#[async_trait]
impl Link for Tcp {
    #[instrument(level = "trace", skip(self, payload), err, fields(%payload))]
    async fn send(&mut self, payload: &str) -> io::Result<()> {
        self.stream.write_all(payload.as_bytes()).await
    }

    #[instrument(level = "trace", err)]
    async fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{collection::vec, prelude::*};
    use test_strategy::proptest;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::runtime;

    #[proptest(cases = 10)]
    fn send_writes_payloads_without_delimiters(
        #[strategy(vec(any::<String>(), 0..=8))] payloads: Vec<String>,
    ) {
        let rt = runtime::Builder::new_current_thread().enable_io().build()?;

        let received = rt.block_on(async {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let mut tcp = Tcp::connect(listener.local_addr().unwrap()).await.unwrap();
            let (mut peer, _) = listener.accept().await.unwrap();

            for payload in &payloads {
                tcp.send(payload).await.unwrap();
            }

            tcp.close().await.unwrap();

            let mut received = String::new();
            peer.read_to_string(&mut received).await.unwrap();
            received
        });

        assert_eq!(received, payloads.concat());
    }

    #[tokio::test]
    async fn connect_reports_peer_address() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let tcp = Tcp::connect(address).await.unwrap();
        assert_eq!(tcp.peer_addr(), address);
    }

    #[tokio::test]
    async fn connect_fails_if_connection_is_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        assert!(matches!(
            Tcp::connect(address).await,
            Err(RelayError::Connect(_))
        ));
    }
}
