use super::{Fen, IllegalMove, ParsePositionError, Position};
use derive_more::{Display, Error, From};
use pgn_reader::{BufferedReader, RawHeader, Skip, Visitor};
use shakmaty as sm;
use std::{fs::File, io, io::Read, iter::FusedIterator, mem::take, path::Path, slice};
use tracing::{debug, instrument};

/// The reason why a game record could not be loaded.
#[derive(Debug, Display, Error, From)]
pub enum LoadError {
    #[display(fmt = "failed to read the game record")]
    Io(io::Error),

    #[display(fmt = "no game record found")]
    #[from(ignore)]
    Empty,

    #[display(fmt = "invalid FEN tag")]
    #[from(ignore)]
    InvalidFen(ParsePositionError),

    #[display(fmt = "illegal move at ply {}", ply)]
    #[from(ignore)]
    IllegalMove { ply: usize, source: IllegalMove },
}

/// A chess game record reduced to its main line.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Game {
    headers: Vec<(String, String)>,
    start: Position,
    moves: Vec<sm::Move>,
}

impl Game {
    /// Loads the first game recorded in a [PGN] file.
    ///
    /// [PGN]: https://www.chessprogramming.org/Portable_Game_Notation
    #[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()), err)]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let game = Game::read(File::open(path)?)?;

        for (key, value) in game.headers() {
            debug!(%key, %value);
        }

        Ok(game)
    }

    /// Reads the first game recorded in [PGN] from an arbitrary source.
    ///
    /// [PGN]: https://www.chessprogramming.org/Portable_Game_Notation
    pub fn read<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = BufferedReader::new(reader);
        reader.read_game(&mut Loader::default())?.ok_or(LoadError::Empty)?
    }

    /// The tag pairs in order of appearance.
    pub fn headers(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The value of a tag pair, if present.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers().find_map(|(k, v)| (k == key).then_some(v))
    }

    /// The position the main line starts from.
    pub fn start(&self) -> &Position {
        &self.start
    }

    /// The number of half-moves in the main line.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the main line has no moves.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Walks the main line, one ply at a time.
    pub fn mainline(&self) -> MainLine<'_> {
        MainLine {
            position: self.start.clone(),
            moves: self.moves.iter(),
        }
    }
}

/// A cursor over the main line of a [`Game`].
///
/// Yields the [`Fen`] of the position the cursor points to, then advances it by one move.
/// The starting position comes first and the position after the last move is never yielded.
#[derive(Debug, Clone)]
pub struct MainLine<'a> {
    position: Position,
    moves: slice::Iter<'a, sm::Move>,
}

impl<'a> Iterator for MainLine<'a> {
    type Item = Fen;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.moves.next()?;
        let fen = Fen::from(&self.position);
        self.position.replay(m);
        Some(fen)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.moves.size_hint()
    }
}

impl<'a> ExactSizeIterator for MainLine<'a> {}
impl<'a> FusedIterator for MainLine<'a> {}

#[derive(Default)]
struct Loader {
    game: Game,
    position: Position,
    fen: Option<String>,
    chess960: bool,
    error: Option<LoadError>,
}

impl Visitor for Loader {
    type Result = Result<Game, LoadError>;

    fn begin_game(&mut self) {
        *self = Loader::default();
    }

    fn header(&mut self, key: &[u8], value: RawHeader<'_>) {
        let key = String::from_utf8_lossy(key).into_owned();
        let value = String::from_utf8_lossy(&value.decode()).into_owned();

        if key.eq_ignore_ascii_case("FEN") {
            self.fen = Some(value.clone());
        } else if key.eq_ignore_ascii_case("Variant") {
            let variant = value.to_ascii_lowercase();
            self.chess960 = variant.contains("960") || variant.contains("fischerandom");
        }

        self.game.headers.push((key, value));
    }

    fn end_headers(&mut self) -> Skip {
        if let Some(fen) = self.fen.take() {
            let mode = match self.chess960 {
                true => sm::CastlingMode::Chess960,
                false => sm::CastlingMode::Standard,
            };

            match Position::from_fen(&fen, mode) {
                Ok(pos) => {
                    self.game.start = pos.clone();
                    self.position = pos;
                }

                Err(e) => self.error = Some(LoadError::InvalidFen(e)),
            }
        }

        Skip(self.error.is_some())
    }

    fn san(&mut self, san: sm::san::SanPlus) {
        if self.error.is_some() {
            return;
        }

        match self.position.play(&san.san) {
            Ok(m) => self.game.moves.push(m),
            Err(e) => {
                self.error = Some(LoadError::IllegalMove {
                    ply: self.game.moves.len() + 1,
                    source: e,
                })
            }
        }
    }

    fn begin_variation(&mut self) -> Skip {
        Skip(true)
    }

    fn end_game(&mut self) -> Self::Result {
        let Loader { game, error, .. } = take(self);

        match error {
            None => Ok(game),
            Some(e) => Err(e),
        }
    }
}
