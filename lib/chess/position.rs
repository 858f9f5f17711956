use super::{Fen, InvalidFen};
use derive_more::{DebugCustom, Display, Error, From};
use shakmaty as sm;
use std::str::FromStr;

/// Represents an illegal move in a given [`Position`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display(fmt = "move `{}` is illegal in position `{}`", _0, _1)]
pub struct IllegalMove(#[error(not(source))] pub String, #[error(not(source))] pub Fen);

/// The current position on the chess board.
///
/// This type guarantees that it only holds valid positions.
#[derive(DebugCustom, Display, Default, Clone, Eq, PartialEq)]
#[debug(fmt = "Position({})", self)]
#[display(fmt = "{}", "Fen::from(self)")]
pub struct Position(sm::Chess);

impl Position {
    /// Plays a move in [standard algebraic notation].
    ///
    /// Null moves are never legal.
    ///
    /// [standard algebraic notation]: https://www.chessprogramming.org/Algebraic_Chess_Notation
    pub fn play(&mut self, san: &sm::san::San) -> Result<sm::Move, IllegalMove> {
        match san.to_move(&self.0) {
            Ok(m) => {
                sm::Position::play_unchecked(&mut self.0, &m);
                Ok(m)
            }

            Err(_) => Err(IllegalMove(san.to_string(), Fen::from(&*self))),
        }
    }

    /// Parses a FEN string, interpreting castling rights according to `mode`.
    pub fn from_fen(s: &str, mode: sm::CastlingMode) -> Result<Self, ParsePositionError> {
        let chess: sm::Chess = sm::Setup::from(s.parse::<Fen>()?)
            .position(mode)
            .map_err(IllegalPosition::from)?;

        Ok(Position(chess))
    }

    /// Replays a move previously validated by [`Position::play`].
    pub(crate) fn replay(&mut self, m: &sm::Move) {
        sm::Position::play_unchecked(&mut self.0, m);
    }
}

#[doc(hidden)]
impl AsRef<sm::Chess> for Position {
    fn as_ref(&self) -> &sm::Chess {
        &self.0
    }
}

/// The reason why the position represented by the FEN string is illegal.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum IllegalPosition {
    #[display(fmt = "at least one side has no king")]
    MissingKing,
    #[display(fmt = "at least one side has multiple kings")]
    TooManyKings,
    #[display(fmt = "there are pawns on the back-rank")]
    PawnsOnBackRank,
    #[display(fmt = "the player in check is not to move")]
    OppositeCheck,
    #[display(fmt = "invalid en passant square; wrong rank, occupied, or missing pushed pawn")]
    InvalidEnPassantSquare,
    #[display(fmt = "invalid castling rights")]
    InvalidCastlingRights,
    #[display(fmt = "no sequence of legal moves can reach this position")]
    Other,
}

#[doc(hidden)]
impl From<sm::PositionError<sm::Chess>> for IllegalPosition {
    fn from(e: sm::PositionError<sm::Chess>) -> Self {
        let kinds = e.kinds();

        if kinds.contains(sm::PositionErrorKinds::MISSING_KING) {
            IllegalPosition::MissingKing
        } else if kinds.contains(sm::PositionErrorKinds::TOO_MANY_KINGS) {
            IllegalPosition::TooManyKings
        } else if kinds.contains(sm::PositionErrorKinds::PAWNS_ON_BACKRANK) {
            IllegalPosition::PawnsOnBackRank
        } else if kinds.contains(sm::PositionErrorKinds::OPPOSITE_CHECK) {
            IllegalPosition::OppositeCheck
        } else if kinds.contains(sm::PositionErrorKinds::INVALID_EP_SQUARE) {
            IllegalPosition::InvalidEnPassantSquare
        } else if kinds.contains(sm::PositionErrorKinds::INVALID_CASTLING_RIGHTS) {
            IllegalPosition::InvalidCastlingRights
        } else {
            IllegalPosition::Other
        }
    }
}

impl TryFrom<Fen> for Position {
    type Error = IllegalPosition;

    fn try_from(fen: Fen) -> Result<Self, Self::Error> {
        let chess: sm::Chess = sm::Setup::from(fen).position(sm::CastlingMode::Standard)?;
        Ok(Position(chess))
    }
}

/// The reason why parsing the FEN string failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParsePositionError {
    #[display(fmt = "failed to parse FEN")]
    InvalidFen(InvalidFen),
    #[display(fmt = "illegal FEN")]
    IllegalPosition(IllegalPosition),
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s, sm::CastlingMode::Standard)
    }
}
