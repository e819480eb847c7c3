//! Text and JSON rendering of book queries.

use eco_graph::{ClassificationGraph, GameClassification, OpeningName};
use opening_book::BookEntry;
use serde::Serialize;
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{Chess, EnPassantMode};

/// One suggested move with its share of the selection weight.
#[derive(Debug, Serialize)]
pub struct MoveLine {
    pub san: String,
    #[serde(flatten)]
    pub entry: BookEntry,
    /// Percentage of the scaled weight total.
    pub share: f64,
}

/// Book suggestions for a single position.
#[derive(Debug, Serialize)]
pub struct MovesReport<'a> {
    pub fen: String,
    pub ply: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening: Option<&'a OpeningName>,
    pub moves: Vec<MoveLine>,
}

impl<'a> MovesReport<'a> {
    pub fn new(pos: &Chess, ply: u32, opening: Option<&'a OpeningName>, shares: Vec<(BookEntry, f64)>) -> Self {
        let moves = shares
            .into_iter()
            .map(|(entry, share)| MoveLine {
                san: San::from_move(pos, entry.mv).to_string(),
                entry,
                share,
            })
            .collect();
        Self {
            fen: Fen::from_position(pos, EnPassantMode::Legal).to_string(),
            ply,
            opening,
            moves,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = format!("Position: {}\n", self.fen);
        if let Some(name) = self.opening {
            out.push_str(&format!("Opening:  {}\n", name));
        }
        if self.moves.is_empty() {
            out.push_str("No book moves\n");
            return out;
        }
        for (rank, line) in self.moves.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {:<7} {:<6} weight {:>5}  {:>5.1}%\n",
                rank + 1,
                line.san,
                line.entry.uci(),
                line.entry.weight,
                line.share
            ));
        }
        out
    }
}

/// Renders a classification result, or a placeholder if none was found.
pub fn classification_text(result: Option<&GameClassification>) -> String {
    match result {
        Some(c) if c.plies_since == 0 => format!("{}\n", c.name),
        Some(c) => format!("{} (left book {} plies ago)\n", c.name, c.plies_since),
        None => "Unclassified\n".to_string(),
    }
}

pub fn stats_text(graph: &ClassificationGraph) -> String {
    format!(
        "Positions: {}\nMoves:     {}\nNamed:     {}\n",
        graph.len(),
        graph.edge_count(),
        graph.named_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_graph::{parse_move, EcoCode};

    fn name() -> OpeningName {
        OpeningName::from_line_name("B20".parse::<EcoCode>().unwrap(), "Sicilian Defense")
    }

    #[test]
    fn test_moves_report_text() {
        let pos = Chess::default();
        let e4 = parse_move(&pos, "e4").unwrap();
        let d4 = parse_move(&pos, "d4").unwrap();
        let report = MovesReport::new(
            &pos,
            0,
            None,
            vec![(BookEntry::new(e4, 10000), 50.0), (BookEntry::new(d4, 9999), 50.0)],
        );
        let text = report.to_text();
        assert!(text.starts_with("Position: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1\n"));
        assert!(text.contains("  1. e4      e2e4   weight 10000   50.0%"));
        assert!(text.contains("  2. d4"));
    }

    #[test]
    fn test_moves_report_empty() {
        let name = name();
        let report = MovesReport::new(&Chess::default(), 0, Some(&name), Vec::new());
        let text = report.to_text();
        assert!(text.contains("Opening:  B20 Sicilian Defense"));
        assert!(text.ends_with("No book moves\n"));
    }

    #[test]
    fn test_moves_report_json() {
        let pos = Chess::default();
        let nf3 = parse_move(&pos, "Nf3").unwrap();
        let report = MovesReport::new(&pos, 0, None, vec![(BookEntry::new(nf3, 10000), 100.0)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["moves"][0]["san"], "Nf3");
        assert_eq!(json["moves"][0]["move"], "g1f3");
        assert_eq!(json["moves"][0]["weight"], 10000);
        assert!(json.get("opening").is_none());
    }

    #[test]
    fn test_classification_text() {
        let exact = GameClassification {
            name: name(),
            plies_since: 0,
        };
        assert_eq!(classification_text(Some(&exact)), "B20 Sicilian Defense\n");

        let later = GameClassification {
            name: name(),
            plies_since: 3,
        };
        assert_eq!(
            classification_text(Some(&later)),
            "B20 Sicilian Defense (left book 3 plies ago)\n"
        );
        assert_eq!(classification_text(None), "Unclassified\n");
    }
}
