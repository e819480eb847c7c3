//! The opening book provider contract.

use eco_graph::{apply_move, MoveTokenError};
use serde::{Serialize, Serializer};
use shakmaty::{CastlingMode, Chess, Move, Position};

use crate::options::BookOptions;

/// A suggested move with its selection weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookEntry {
    #[serde(rename = "move", serialize_with = "serialize_uci")]
    pub mv: Move,
    pub weight: u32,
}

impl BookEntry {
    #[must_use]
    pub fn new(mv: Move, weight: u32) -> Self {
        Self { mv, weight }
    }

    /// The move in UCI notation.
    #[must_use]
    pub fn uci(&self) -> String {
        self.mv.to_uci(CastlingMode::Standard).to_string()
    }
}

fn serialize_uci<S: Serializer>(mv: &Move, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&mv.to_uci(CastlingMode::Standard))
}

/// Anything a book can read the current position from.
pub trait BookPosInput {
    /// The position to suggest moves for.
    fn curr_pos(&self) -> Chess;

    /// Plies played so far in the game.
    ///
    /// Derived from the move counters of the current position unless the
    /// input knows its own history.
    fn ply(&self) -> u32 {
        let pos = self.curr_pos();
        let full_moves = pos.fullmoves().get().saturating_sub(1);
        full_moves * 2 + u32::from(pos.turn().is_black())
    }
}

impl BookPosInput for Chess {
    fn curr_pos(&self) -> Chess {
        self.clone()
    }
}

/// A game in progress: a start position and the moves played from it.
#[derive(Debug, Clone, Default)]
pub struct BookGame {
    start: Chess,
    moves: Vec<Move>,
    current: Chess,
}

impl BookGame {
    /// A new game from the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A new game from an arbitrary position.
    #[must_use]
    pub fn from_position(start: Chess) -> Self {
        Self {
            current: start.clone(),
            start,
            moves: Vec::new(),
        }
    }

    /// Plays a move given in SAN or UCI notation.
    ///
    /// # Errors
    ///
    /// Returns a [`MoveTokenError`] and leaves the game unchanged if the
    /// token does not name a legal move.
    pub fn play(&mut self, token: &str) -> Result<Move, MoveTokenError> {
        let (mv, next) = apply_move(&self.current, token)?;
        self.moves.push(mv);
        self.current = next;
        Ok(mv)
    }

    /// Plays an already resolved move.
    ///
    /// # Errors
    ///
    /// Returns [`MoveTokenError::Illegal`] if the move is not legal in the
    /// current position.
    pub fn push(&mut self, mv: Move) -> Result<(), MoveTokenError> {
        if !self.current.is_legal(mv) {
            return Err(MoveTokenError::Illegal);
        }
        self.current.play_unchecked(mv);
        self.moves.push(mv);
        Ok(())
    }

    #[must_use]
    pub fn start(&self) -> &Chess {
        &self.start
    }

    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[must_use]
    pub fn position(&self) -> &Chess {
        &self.current
    }
}

impl BookPosInput for BookGame {
    fn curr_pos(&self) -> Chess {
        self.current.clone()
    }

    fn ply(&self) -> u32 {
        u32::try_from(self.moves.len()).unwrap_or(u32::MAX)
    }
}

/// An opening book that suggests weighted moves for a position.
///
/// Providers start disabled; only [`OpeningBook::set_options`] changes that.
pub trait OpeningBook: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Whether the current options select this book.
    fn enabled(&self) -> bool;

    /// Applies new options. Never fails; unrecognized options leave the
    /// book disabled.
    fn set_options(&mut self, options: &BookOptions);

    /// Suggested moves for the current position, highest weight first.
    ///
    /// Returns an empty list when the book knows nothing about the position.
    fn book_entries(&self, input: &dyn BookPosInput) -> Vec<BookEntry>;

    /// Whether the book's backing data could be loaded.
    fn is_available(&self) -> bool {
        true
    }
}
