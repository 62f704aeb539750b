//! Deck model and PPTX writer for rosterdeck.
//!
//! A [`Deck`] is an ordered list of slides: a fixed title slide first, then
//! one slide per person. [`Deck::save`] persists it as a PowerPoint file,
//! an OPC package (ZIP archive of XML parts) written directly without going
//! through an Office library.

mod pptx;
mod slide;

pub use slide::{Deck, Slide, DECK_TITLE};

/// Errors that can occur while building or persisting a deck.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    /// A slide was submitted without a usable title.
    #[error("slide title is empty")]
    EmptyTitle,

    /// Reading an embedded image or writing the output file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Assembling the package archive failed.
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result type for deck operations.
pub type DeckResult<T> = std::result::Result<T, DeckError>;
