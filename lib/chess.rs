mod fen;
mod game;
mod position;

pub use fen::*;
pub use game::*;
pub use position::*;
