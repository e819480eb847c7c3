//! Book selection across providers.

use rand::Rng;
use shakmaty::{Move, Position};

use crate::book::{BookEntry, BookPosInput, OpeningBook};
use crate::options::BookOptions;

/// Holds the available opening books and picks moves from the active one.
///
/// The active book is the first registered provider that is both enabled by
/// the current options and able to load its data.
#[derive(Default)]
pub struct BookRegistry {
    books: Vec<Box<dyn OpeningBook>>,
    options: BookOptions,
}

impl BookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider. Earlier providers take precedence.
    pub fn register(&mut self, mut book: Box<dyn OpeningBook>) {
        book.set_options(&self.options);
        self.books.push(book);
    }

    /// Builder form of [`Self::register`].
    #[must_use]
    pub fn with_book(mut self, book: Box<dyn OpeningBook>) -> Self {
        self.register(book);
        self
    }

    /// Applies `options` to every registered provider.
    pub fn set_options(&mut self, options: BookOptions) {
        for book in &mut self.books {
            book.set_options(&options);
        }
        self.options = options;
    }

    #[must_use]
    pub fn options(&self) -> &BookOptions {
        &self.options
    }

    /// The provider currently used for suggestions, if any.
    #[must_use]
    pub fn active_book(&self) -> Option<&dyn OpeningBook> {
        self.books
            .iter()
            .map(|book| &**book)
            .find(|book| book.enabled() && book.is_available())
    }

    /// Entries from the active book, or nothing if no book applies.
    ///
    /// The list is dropped entirely if the game is past `max_length` plies or
    /// if any suggested move is illegal in the current position.
    #[must_use]
    pub fn book_entries(&self, input: &dyn BookPosInput) -> Vec<BookEntry> {
        let Some(book) = self.active_book() else {
            return Vec::new();
        };
        if input.ply() > self.options.max_length {
            return Vec::new();
        }

        let entries = book.book_entries(input);
        let legal = input.curr_pos().legal_moves();
        if let Some(bad) = entries.iter().find(|e| !legal.contains(&e.mv)) {
            tracing::warn!("Book '{}' suggested illegal move {}", book.name(), bad.uci());
            return Vec::new();
        }
        entries
    }

    /// Picks a book move at random, in proportion to the scaled weights.
    pub fn book_move<R: Rng + ?Sized>(&self, input: &dyn BookPosInput, rng: &mut R) -> Option<Move> {
        let entries = self.book_entries(input);
        let weights: Vec<f64> = entries.iter().map(|e| self.scaled_weight(e.weight)).collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }

        let mut remaining = rng.random::<f64>() * total;
        for (entry, weight) in entries.iter().zip(&weights) {
            if remaining < *weight {
                return Some(entry.mv);
            }
            remaining -= weight;
        }
        // Rounding can leave a sliver past the last bucket.
        entries.iter().zip(&weights).rev().find(|(_, w)| **w > 0.0).map(|(e, _)| e.mv)
    }

    /// Every entry with its share of the scaled weight total, in percent.
    #[must_use]
    pub fn all_book_moves(&self, input: &dyn BookPosInput) -> Vec<(BookEntry, f64)> {
        let entries = self.book_entries(input);
        let weights: Vec<f64> = entries.iter().map(|e| self.scaled_weight(e.weight)).collect();
        let total: f64 = weights.iter().sum();
        entries
            .into_iter()
            .zip(weights)
            .map(|(entry, weight)| {
                let share = if total > 0.0 { weight / total * 100.0 } else { 0.0 };
                (entry, share)
            })
            .collect()
    }

    fn scaled_weight(&self, weight: u32) -> f64 {
        if weight == 0 {
            return 0.0;
        }
        f64::from(weight).powf((-self.options.random).exp())
    }
}

impl std::fmt::Debug for BookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.books.iter().map(|b| b.name()).collect();
        f.debug_struct("BookRegistry")
            .field("books", &names)
            .field("options", &self.options)
            .finish()
    }
}
