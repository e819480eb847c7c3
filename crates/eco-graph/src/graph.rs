//! The ECO classification graph.
//!
//! Every dataset line is replayed from the starting position. At each
//! position passed through, the move that continues the line is recorded as
//! a [`ClassificationEntry`]. Entries of one position are ranked in the order
//! they are first met while walking the dataset, so the first line through a
//! position decides the preferred continuation. Positions are identified by
//! [`PositionKey`], which merges transpositions into a single node.

use std::collections::HashMap;

use serde::Serialize;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Move, Position};

use crate::dataset::Dataset;
use crate::error::{DatasetError, LineError, LineErrorKind};
use crate::notation::apply_move;
use crate::opening::{EcoCode, OpeningLine, OpeningName};
use crate::zobrist::PositionKey;

/// One classified move out of a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationEntry {
    /// The position the move is played from.
    pub from: PositionKey,
    pub mv: Move,
    /// ECO code of the first line that played this move here.
    pub eco: EcoCode,
    /// Discovery rank among the moves out of `from`; dense from 0.
    pub rank: u16,
}

/// The deepest named position reached while replaying a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameClassification {
    pub name: OpeningName,
    /// Plies played after the named position (0 if the game is still there).
    pub plies_since: usize,
}

/// Immutable index from position to its ranked classified successors.
#[derive(Debug, Clone)]
pub struct ClassificationGraph {
    root: PositionKey,
    nodes: HashMap<PositionKey, Vec<ClassificationEntry>>,
    names: HashMap<PositionKey, OpeningName>,
}

/// A line that replayed cleanly.
struct ReplayedLine {
    eco: EcoCode,
    steps: Vec<(PositionKey, Move)>,
    last: PositionKey,
}

impl ClassificationGraph {
    /// Builds the graph from a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Malformed`] listing every line that could not
    /// be replayed. No partial graph is produced.
    pub fn build(dataset: &Dataset) -> Result<Self, DatasetError> {
        let start = Chess::default();
        let root = PositionKey::of(&start);
        let mut graph = ClassificationGraph {
            root,
            nodes: HashMap::new(),
            names: HashMap::new(),
        };
        let mut errors = Vec::new();

        for (index, line) in dataset.lines().iter().enumerate() {
            match replay_line(&start, index, line) {
                Ok(replayed) => graph.insert(&replayed, &line.name),
                Err(err) => {
                    tracing::debug!("Rejected opening line {}", err);
                    errors.push(err);
                }
            }
        }

        if !errors.is_empty() {
            tracing::warn!(
                "ECO graph construction aborted: {} of {} lines malformed",
                errors.len(),
                dataset.len()
            );
            return Err(DatasetError::Malformed { errors });
        }

        tracing::info!(
            "Built ECO classification graph: {} lines, {} positions, {} moves, {} named",
            dataset.len(),
            graph.len(),
            graph.edge_count(),
            graph.named_count()
        );
        Ok(graph)
    }

    fn insert(&mut self, line: &ReplayedLine, name: &str) {
        for &(from, mv) in &line.steps {
            let entries = self.nodes.entry(from).or_default();
            if entries.iter().any(|e| e.mv == mv) {
                continue;
            }
            // A position has at most 218 legal moves.
            let rank = entries.len() as u16;
            entries.push(ClassificationEntry {
                from,
                mv,
                eco: line.eco,
                rank,
            });
        }
        self.names
            .entry(line.last)
            .or_insert_with(|| OpeningName::from_line_name(line.eco, name));
    }

    /// Returns the classified moves out of `pos`, best rank first.
    ///
    /// Unknown positions yield an empty slice. If a stored move is not legal
    /// in `pos`, the key belongs to a different position (a hash collision)
    /// and the result is empty as well.
    #[must_use]
    pub fn successors(&self, pos: &Chess) -> &[ClassificationEntry] {
        let Some(entries) = self.nodes.get(&PositionKey::of(pos)) else {
            return &[];
        };
        let legal = pos.legal_moves();
        if entries.iter().all(|e| legal.contains(&e.mv)) {
            entries.as_slice()
        } else {
            &[]
        }
    }

    /// Returns the classified moves out of the position with the given key,
    /// without a legality check.
    #[must_use]
    pub fn successors_by_key(&self, key: PositionKey) -> &[ClassificationEntry] {
        self.nodes.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns just the moves out of `pos`, best rank first.
    #[must_use]
    pub fn moves(&self, pos: &Chess) -> Vec<Move> {
        self.successors(pos).iter().map(|e| e.mv).collect()
    }

    /// Returns true if `pos` lies on a classified line, either with
    /// classified continuations or as the end of a line.
    #[must_use]
    pub fn contains(&self, pos: &Chess) -> bool {
        let key = PositionKey::of(pos);
        self.nodes.contains_key(&key) || self.names.contains_key(&key)
    }

    /// Returns the opening name of `pos` if a dataset line ends there.
    #[must_use]
    pub fn name_of(&self, pos: &Chess) -> Option<&OpeningName> {
        self.names.get(&PositionKey::of(pos))
    }

    /// Replays `moves` from `start` and returns the deepest named position
    /// reached, with the number of plies played after it.
    ///
    /// Replay stops at the first illegal move.
    #[must_use]
    pub fn classify_game(&self, start: &Chess, moves: &[Move]) -> Option<GameClassification> {
        let mut pos = start.clone();
        let mut best = self.name_of(&pos).map(|name| (name, 0));
        let mut played = 0;

        for &mv in moves {
            pos = match pos.play(mv) {
                Ok(next) => next,
                Err(_) => break,
            };
            played += 1;
            if let Some(name) = self.name_of(&pos) {
                best = Some((name, played));
            }
        }

        best.map(|(name, ply)| GameClassification {
            name: name.clone(),
            plies_since: played - ply,
        })
    }

    /// Key of the starting position.
    #[must_use]
    pub fn root(&self) -> PositionKey {
        self.root
    }

    /// Number of positions with classified continuations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no classified positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of classified moves.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }

    /// Number of positions where a dataset line ends.
    #[must_use]
    pub fn named_count(&self) -> usize {
        self.names.len()
    }

    /// Iterates over the keys of all positions with classified continuations.
    pub fn positions(&self) -> impl Iterator<Item = PositionKey> + '_ {
        self.nodes.keys().copied()
    }
}

fn replay_line(start: &Chess, index: usize, line: &OpeningLine) -> Result<ReplayedLine, LineError> {
    let fail = |ply: Option<usize>, token: Option<&str>, kind: LineErrorKind| LineError {
        index,
        eco: line.eco.clone(),
        ply,
        token: token.map(String::from),
        kind,
    };

    let eco: EcoCode = line
        .eco
        .parse()
        .map_err(|_| fail(None, Some(line.eco.as_str()), LineErrorKind::InvalidEco))?;
    if line.moves.is_empty() {
        return Err(fail(None, None, LineErrorKind::Empty));
    }

    let mut pos = start.clone();
    let mut steps = Vec::with_capacity(line.moves.len());
    for (ply, token) in line.moves.iter().enumerate() {
        let from = PositionKey::of(&pos);
        let (mv, next) = apply_move(&pos, token).map_err(|e| fail(Some(ply), Some(token.as_str()), e.into()))?;
        steps.push((from, mv));
        pos = next;
    }
    let last = PositionKey::of(&pos);

    if let Some(fen) = &line.fen {
        let expected: Chess = fen
            .parse::<Fen>()
            .ok()
            .and_then(|f| f.into_position(CastlingMode::Standard).ok())
            .ok_or_else(|| fail(None, Some(fen.as_str()), LineErrorKind::InvalidFen))?;
        if PositionKey::of(&expected) != last {
            return Err(fail(None, Some(fen.as_str()), LineErrorKind::FenMismatch));
        }
    }

    Ok(ReplayedLine { eco, steps, last })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::MoveTokenError;

    fn dataset(lines: &[(&str, &str, &str)]) -> Dataset {
        lines
            .iter()
            .map(|(eco, name, moves)| OpeningLine::new(*eco, *name, moves.split_whitespace().collect()))
            .collect()
    }

    fn play(sans: &str) -> Chess {
        sans.split_whitespace()
            .fold(Chess::default(), |pos, token| apply_move(&pos, token).unwrap().1)
    }

    fn sans(graph: &ClassificationGraph, pos: &Chess) -> Vec<String> {
        graph
            .successors(pos)
            .iter()
            .map(|e| shakmaty::san::San::from_move(pos, e.mv).to_string())
            .collect()
    }

    fn sample() -> ClassificationGraph {
        ClassificationGraph::build(&dataset(&[
            ("C20", "King's Pawn Game", "e4 e5 Nf3"),
            ("B20", "Sicilian Defense", "e4 c5"),
        ]))
        .unwrap()
    }

    #[test]
    fn test_shared_prefix_is_one_successor() {
        let graph = sample();
        let entries = graph.successors(&Chess::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].rank, 0);
        assert_eq!(entries[0].eco.as_str(), "C20");
        assert_eq!(sans(&graph, &Chess::default()), vec!["e4"]);
    }

    #[test]
    fn test_rank_follows_dataset_order() {
        let graph = sample();
        let pos = play("e4");
        assert_eq!(sans(&graph, &pos), vec!["e5", "c5"]);
        let ranks: Vec<u16> = graph.successors(&pos).iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![0, 1]);
        assert_eq!(graph.successors(&pos)[1].eco.as_str(), "B20");
    }

    #[test]
    fn test_deeper_node() {
        let graph = sample();
        assert_eq!(sans(&graph, &play("e4 e5")), vec!["Nf3"]);
        assert!(graph.successors(&play("e4 e5 Nf3")).is_empty());
    }

    #[test]
    fn test_unknown_position_is_empty() {
        let graph = sample();
        assert!(graph.successors(&play("e4 e5 Qh5")).is_empty());
        assert!(graph.successors(&play("d4")).is_empty());
        assert!(graph.moves(&play("d4")).is_empty());
        assert!(!graph.contains(&play("d4")));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let graph = ClassificationGraph::build(&dataset(&[
            ("C20", "King's Pawn Game", "e4 e5"),
            ("B20", "Sicilian Defense", "e4 c5"),
            ("C40", "King's Knight Opening", "e4 e5 Nf3"),
            ("B27", "Sicilian Defense: Hungarian Variation", "e4 c5 Nf3 g6"),
        ]))
        .unwrap();
        let root = graph.successors(&Chess::default());
        assert_eq!(root.len(), 1);
        assert_eq!(root[0].eco.as_str(), "C20");
        assert_eq!(graph.edge_count(), 6);
    }

    #[test]
    fn test_transpositions_merge() {
        let graph = ClassificationGraph::build(&dataset(&[
            ("E00", "Indian Defense: East Indian Defense", "d4 Nf6 c4 e6 Nc3"),
            ("A13", "English Opening: Agincourt Defense", "c4 e6 d4 Nf6 g3"),
        ]))
        .unwrap();
        let via_d4 = play("d4 Nf6 c4 e6");
        let via_c4 = play("c4 e6 d4 Nf6");
        assert_eq!(graph.successors(&via_d4), graph.successors(&via_c4));
        assert_eq!(sans(&graph, &via_d4), vec!["Nc3", "g3"]);
    }

    #[test]
    fn test_names_and_first_name_wins() {
        let graph = ClassificationGraph::build(&dataset(&[
            ("B20", "Sicilian Defense", "e4 c5"),
            ("B21", "Sicilian Defense: Duplicate", "e4 c5"),
        ]))
        .unwrap();
        let name = graph.name_of(&play("e4 c5")).unwrap();
        assert_eq!(name.eco.as_str(), "B20");
        assert_eq!(name.opening, "Sicilian Defense");
        assert_eq!(graph.named_count(), 1);
        assert!(graph.name_of(&play("e4")).is_none());
        assert!(graph.contains(&play("e4 c5")));
    }

    #[test]
    fn test_classify_game() {
        let graph = sample();
        let pos = Chess::default();
        let moves: Vec<Move> = ["e4", "c5", "Nf3", "d6"]
            .iter()
            .scan(pos.clone(), |p, token| {
                let (mv, next) = apply_move(p, token).unwrap();
                *p = next;
                Some(mv)
            })
            .collect();

        let result = graph.classify_game(&pos, &moves).unwrap();
        assert_eq!(result.name.eco.as_str(), "B20");
        assert_eq!(result.plies_since, 2);

        let exact = graph.classify_game(&pos, &moves[..2]).unwrap();
        assert_eq!(exact.plies_since, 0);

        assert!(graph.classify_game(&pos, &moves[..1]).is_none());
    }

    #[test]
    fn test_malformed_lines_abort_with_all_errors() {
        let result = ClassificationGraph::build(&dataset(&[
            ("C20", "King's Pawn Game", "e4 e5 Nf3"),
            ("B20", "Broken", "e4 e4"),
            ("Q99", "Bad Code", "d4"),
            ("A00", "Empty", ""),
            ("A01", "Garbage", "b3 ???"),
        ]));
        let Err(DatasetError::Malformed { errors }) = result else {
            panic!("expected malformed dataset error");
        };
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0].index, 1);
        assert_eq!(errors[0].ply, Some(1));
        assert_eq!(errors[0].token.as_deref(), Some("e4"));
        assert_eq!(errors[0].kind, LineErrorKind::Move(MoveTokenError::Illegal));
        assert_eq!(errors[1].kind, LineErrorKind::InvalidEco);
        assert_eq!(errors[2].kind, LineErrorKind::Empty);
        assert_eq!(errors[3].kind, LineErrorKind::Move(MoveTokenError::Unparsable));
    }

    #[test]
    fn test_fen_is_verified() {
        let good = OpeningLine::new("B20", "Sicilian Defense", vec!["e4", "c5"])
            .with_fen("rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2");
        assert!(ClassificationGraph::build(&Dataset::with_lines(vec![good])).is_ok());

        let wrong = OpeningLine::new("B20", "Sicilian Defense", vec!["e4", "c5"])
            .with_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let invalid = OpeningLine::new("B20", "Sicilian Defense", vec!["e4", "c5"]).with_fen("not a fen");
        let Err(DatasetError::Malformed { errors }) =
            ClassificationGraph::build(&Dataset::with_lines(vec![wrong, invalid]))
        else {
            panic!("expected malformed dataset error");
        };
        assert_eq!(errors[0].kind, LineErrorKind::FenMismatch);
        assert_eq!(errors[1].kind, LineErrorKind::InvalidFen);
    }

    #[test]
    fn test_empty_dataset_builds_empty_graph() {
        let graph = ClassificationGraph::build(&Dataset::new()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.root(), PositionKey::of(&Chess::default()));
        assert!(graph.successors(&Chess::default()).is_empty());
    }

    #[test]
    fn test_collision_guard_rejects_illegal_entries() {
        let mut graph = sample();
        let bare_kings: Chess = "4k3/8/8/8/8/8/8/4K3 w - - 0 1"
            .parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap();
        let key = PositionKey::of(&bare_kings);

        // Pretend the bare-kings key collided with a node whose move is e2e4.
        let mut entry = graph.successors(&Chess::default())[0].clone();
        entry.from = key;
        graph.nodes.insert(key, vec![entry]);

        assert_eq!(graph.successors_by_key(key).len(), 1);
        assert!(graph.successors(&bare_kings).is_empty());
    }
}
