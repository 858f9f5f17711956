mod link;
mod options;
mod tcp;

pub use link::*;
pub use options::*;
pub use tcp::*;

use crate::chess::Game;
use derive_more::{Constructor, Display, Error};
use std::io;
use tokio::time::sleep;
use tracing::{info, instrument};

/// The reason why relaying a game failed.
#[derive(Debug, Display, Error)]
pub enum RelayError {
    #[display(fmt = "failed to connect to the remote server")]
    Connect(io::Error),

    #[display(fmt = "failed to send the position after {} plies", ply)]
    Send { ply: usize, source: io::Error },

    #[display(fmt = "failed to close the connection")]
    Close(io::Error),
}

/// Relays the main line of a [`Game`] over a [`Link`], one position at a time.
#[derive(Debug, Default, Clone, Eq, PartialEq, Constructor)]
pub struct Relay {
    options: Options,
}

impl Relay {
    /// Sends the FEN of every position in the main line, then closes the link.
    ///
    /// The starting position is sent first, the position after the last move is not.
    /// Every send is followed by a pause of [`Options::interval`], the last one included.
    /// Returns the number of positions sent.
    #[instrument(level = "debug", skip(self, game, link), fields(plies = game.len()), err)]
    pub async fn run<L: Link + Send>(&self, game: &Game, mut link: L) -> Result<usize, RelayError> {
        for (ply, fen) in game.mainline().enumerate() {
            let payload = fen.to_string();

            link.send(&payload)
                .await
                .map_err(|source| RelayError::Send { ply, source })?;

            info!(ply, fen = %payload);
            sleep(self.options.interval).await;
        }

        link.close().await.map_err(RelayError::Close)?;

        Ok(game.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use std::time::Duration;
    use tokio::time::Instant;

    fn game(pgn: &str) -> Game {
        Game::read(pgn.as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn sends_every_position_in_order_then_closes_once() {
        let game = game("1. e4 e5 2. Nf3 *");
        let mut link = MockLink::new();
        let mut seq = Sequence::new();

        for fen in game.mainline() {
            let expected = fen.to_string();
            link.expect_send()
                .once()
                .in_sequence(&mut seq)
                .withf(move |payload| payload == expected)
                .returning(|_| Ok(()));
        }

        link.expect_close()
            .once()
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let relay = Relay::new(Options { interval: Duration::ZERO });
        assert_eq!(relay.run(&game, link).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn first_position_sent_is_the_starting_position() {
        let game = game("1. e4 e5 *");
        let mut link = MockLink::new();
        let mut seq = Sequence::new();

        link.expect_send()
            .once()
            .in_sequence(&mut seq)
            .withf(|payload| payload == "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .returning(|_| Ok(()));

        link.expect_send()
            .once()
            .in_sequence(&mut seq)
            .withf(|payload| payload == "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
            .returning(|_| Ok(()));

        link.expect_close()
            .once()
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let relay = Relay::new(Options { interval: Duration::ZERO });
        assert_eq!(relay.run(&game, link).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn game_without_moves_only_closes() {
        let game = game("*");
        let mut link = MockLink::new();
        link.expect_send().never();
        link.expect_close().once().returning(|| Ok(()));

        assert_eq!(Relay::default().run(&game, link).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn send_failure_aborts_without_closing() {
        let game = game("1. e4 e5 2. Nf3 *");
        let mut link = MockLink::new();

        link.expect_send()
            .times(2)
            .returning({
                let mut calls = 0;
                move |_| {
                    calls += 1;
                    match calls {
                        1 => Ok(()),
                        _ => Err(io::ErrorKind::BrokenPipe.into()),
                    }
                }
            });

        link.expect_close().never();

        let relay = Relay::new(Options { interval: Duration::ZERO });
        assert!(matches!(
            relay.run(&game, link).await,
            Err(RelayError::Send { ply: 1, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn close_failure_is_an_error() {
        let game = game("1. d4 *");
        let mut link = MockLink::new();
        link.expect_send().once().returning(|_| Ok(()));
        link.expect_close()
            .once()
            .returning(|| Err(io::ErrorKind::ConnectionReset.into()));

        assert!(matches!(
            Relay::default().run(&game, link).await,
            Err(RelayError::Close(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn positions_are_an_interval_apart() {
        let game = game("1. e4 e5 2. Nf3 Nc6 *");
        let interval = Duration::from_secs(1);
        let start = Instant::now();

        let mut link = MockLink::new();
        let mut seq = Sequence::new();

        for n in 0..4u32 {
            link.expect_send()
                .once()
                .in_sequence(&mut seq)
                .returning(move |_| {
                    assert!(start.elapsed() >= interval * n);
                    assert!(start.elapsed() < interval * (n + 1));
                    Ok(())
                });
        }

        link.expect_close()
            .once()
            .in_sequence(&mut seq)
            .returning(move || {
                assert!(start.elapsed() >= interval * 4);
                assert!(start.elapsed() < interval * 5);
                Ok(())
            });

        let relay = Relay::new(Options { interval });
        assert_eq!(relay.run(&game, link).await.unwrap(), 4);
        assert!(start.elapsed() >= interval * 4);
        assert!(start.elapsed() < interval * 5);
    }
}
