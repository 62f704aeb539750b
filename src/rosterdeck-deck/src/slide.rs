//! Slide and deck model.

use std::path::{Path, PathBuf};

use crate::{pptx, DeckError, DeckResult};

/// Heading of the fixed title slide.
pub const DECK_TITLE: &str = "Team Directory";

/// One slide of the deck.
#[derive(Debug, Clone)]
pub enum Slide {
    /// The opening slide: a single centered heading, no image, no facts.
    Title {
        /// Heading text.
        heading: String,
    },
    /// One person: name, optional photo, and contact facts.
    Member {
        /// Display name used as the slide title.
        heading: String,
        /// Local path of the photo to embed, if one was acquired.
        image: Option<PathBuf>,
        /// `"Label: value"` lines, already filtered to non-empty fields.
        facts: Vec<String>,
    },
}

impl Slide {
    /// The slide's heading text.
    pub fn heading(&self) -> &str {
        match self {
            Slide::Title { heading } | Slide::Member { heading, .. } => heading,
        }
    }
}

/// An ordered deck of slides, title slide first.
#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Slide>,
}

impl Deck {
    /// Create a deck holding the title slide.
    pub fn new() -> Self {
        Self {
            slides: vec![Slide::Title {
                heading: DECK_TITLE.to_string(),
            }],
        }
    }

    /// Append one member slide.
    ///
    /// Fails with [`DeckError::EmptyTitle`] when the heading is blank; the
    /// caller decides whether that skips the slide or aborts.
    pub fn add_member(
        &mut self,
        heading: impl Into<String>,
        image: Option<PathBuf>,
        facts: Vec<String>,
    ) -> DeckResult<()> {
        let heading = heading.into();
        if heading.trim().is_empty() {
            return Err(DeckError::EmptyTitle);
        }
        self.slides.push(Slide::Member {
            heading,
            image,
            facts,
        });
        Ok(())
    }

    /// All slides in presentation order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides, title slide included.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Persist the deck as a `.pptx` file, overwriting any existing file.
    pub fn save(&self, path: &Path) -> DeckResult<()> {
        pptx::write_package(self, path)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_deck_has_title_slide() {
        let deck = Deck::new();
        assert_eq!(deck.slide_count(), 1);
        assert!(matches!(deck.slides()[0], Slide::Title { .. }));
        assert_eq!(deck.slides()[0].heading(), DECK_TITLE);
    }

    #[test]
    fn test_add_member_appends_in_order() {
        let mut deck = Deck::new();
        deck.add_member("Ada Lovelace", None, vec!["Title: Engineer".to_string()])
            .expect("add ada");
        deck.add_member("Grace Hopper", None, vec![]).expect("add grace");

        assert_eq!(deck.slide_count(), 3);
        assert_eq!(deck.slides()[1].heading(), "Ada Lovelace");
        assert_eq!(deck.slides()[2].heading(), "Grace Hopper");
    }

    #[test]
    fn test_add_member_rejects_blank_heading() {
        let mut deck = Deck::new();
        let err = deck.add_member("   ", None, vec![]).unwrap_err();
        assert!(matches!(err, DeckError::EmptyTitle));
        assert_eq!(deck.slide_count(), 1);
    }
}
