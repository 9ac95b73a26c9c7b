//! An ordered, optionally pre-shuffled list of media references with a cursor.
//!
//! The list itself never changes after construction, only the cursor moves.
//! Rebuilding means constructing a brand new [`Playlist`].

use rand::seq::SliceRandom;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Playlist {
    items: Vec<String>,
    index: usize,
}

impl Playlist {
    /// Creates a playlist. With `randomize`, the items are shuffled once here.
    pub fn new(mut items: Vec<String>, randomize: bool) -> Self {
        if randomize {
            items.shuffle(&mut rand::rng());
        }
        Self { items, index: 0 }
    }

    /// Returns the next item, going back to the beginning after the last one.
    pub fn get_next(&mut self) -> Option<&str> {
        if self.items.is_empty() {
            return None;
        }
        if self.index >= self.items.len() {
            self.index = 0;
        }
        let item = &self.items[self.index];
        self.index += 1;
        Some(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}
