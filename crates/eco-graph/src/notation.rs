//! Move tokens in the opening dataset.
//!
//! Tokens are either UCI (`e2e4`, `e7e8q`) or SAN (`e4`, `Nf3`, `O-O`,
//! `exd5+`). A token is read as UCI only when it has the exact coordinate
//! shape; everything else goes through the SAN parser.

use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, Move, Position};
use thiserror::Error;

/// Why a move token could not be applied to a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveTokenError {
    /// The token is neither valid SAN nor valid UCI.
    #[error("unparsable move notation")]
    Unparsable,
    /// The token parses but names no legal move in the position.
    #[error("move is not legal in this position")]
    Illegal,
    /// The SAN token matches more than one legal move.
    #[error("move is ambiguous in this position")]
    Ambiguous,
}

/// Returns true if the token has UCI coordinate shape, e.g. `g1f3` or `a7a8q`.
#[must_use]
pub fn is_uci_token(token: &str) -> bool {
    let b = token.as_bytes();
    let square = |file: u8, rank: u8| (b'a'..=b'h').contains(&file) && (b'1'..=b'8').contains(&rank);
    match b.len() {
        4 => square(b[0], b[1]) && square(b[2], b[3]),
        5 => square(b[0], b[1]) && square(b[2], b[3]) && matches!(b[4], b'n' | b'b' | b'r' | b'q'),
        _ => false,
    }
}

/// Resolves a token to a legal move in `pos`.
///
/// # Errors
///
/// Returns a [`MoveTokenError`] if the token cannot be parsed or does not
/// name exactly one legal move.
pub fn parse_move(pos: &Chess, token: &str) -> Result<Move, MoveTokenError> {
    let token = token.trim_end_matches(['!', '?']);

    if is_uci_token(token) {
        let uci: UciMove = token.parse().map_err(|_| MoveTokenError::Unparsable)?;
        return uci.to_move(pos).map_err(|_| MoveTokenError::Illegal);
    }

    let san: San = token.parse().map_err(|_| MoveTokenError::Unparsable)?;
    san.to_move(pos).map_err(|e| match e {
        shakmaty::san::SanError::AmbiguousSan => MoveTokenError::Ambiguous,
        shakmaty::san::SanError::IllegalSan => MoveTokenError::Illegal,
    })
}

/// Resolves a token and plays it, returning the move and the new position.
///
/// # Errors
///
/// Same as [`parse_move`].
pub fn apply_move(pos: &Chess, token: &str) -> Result<(Move, Chess), MoveTokenError> {
    let m = parse_move(pos, token)?;
    let next = pos.clone().play(m).map_err(|_| MoveTokenError::Illegal)?;
    Ok((m, next))
}

/// Splits PGN-style movetext into move tokens.
///
/// Move numbers (`1.`, `12...`), numbers glued to a move (`1.e4`), and game
/// results (`1-0`, `0-1`, `1/2-1/2`, `*`) are dropped.
#[must_use]
pub fn movetext_tokens(movetext: &str) -> Vec<String> {
    movetext
        .split_whitespace()
        .filter_map(|raw| {
            if matches!(raw, "1-0" | "0-1" | "1/2-1/2" | "*") {
                return None;
            }
            let token = match raw.find('.') {
                Some(dot) if raw[..dot].bytes().all(|b| b.is_ascii_digit()) => {
                    raw[dot..].trim_start_matches('.')
                }
                _ => raw,
            };
            if token.is_empty() || token.bytes().all(|b| b.is_ascii_digit()) {
                None
            } else if token.starts_with("0-0") {
                Some(token.replace('0', "O"))
            } else {
                Some(token.to_string())
            }
        })
        .collect()
}
