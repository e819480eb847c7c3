//! Zobrist keys identifying positions in the classification graph.
//!
//! Keys come from shakmaty's Polyglot-compatible Zobrist tables and cover
//! piece placement, side to move, castling rights and the en passant file
//! (only when an en passant capture is legal). Move counters are not part of
//! the key, so the same board reached through different move orders (a
//! transposition) always maps to the same key.

use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::zobrist::Zobrist64;
use shakmaty::{EnPassantMode, Position};

/// Canonical identity of a chess position inside the classification graph.
///
/// Two positions with the same piece placement, side to move, castling
/// rights and legal en passant square have equal keys, regardless of the
/// move order that produced them or of the halfmove/fullmove counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionKey(u64);

impl PositionKey {
    /// Computes the key of a position.
    #[must_use]
    pub fn of<P: Position>(pos: &P) -> Self {
        let Zobrist64(hash) = pos.zobrist_hash::<Zobrist64>(EnPassantMode::Legal);
        PositionKey(hash)
    }

    /// Wraps a raw 64-bit key.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        PositionKey(raw)
    }

    /// Returns the raw 64-bit key.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
