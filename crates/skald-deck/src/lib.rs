pub mod markup;
pub mod slide;

pub use markup::serialize_deck;
pub use slide::{SlideDeck, SlideLayout, SlideRecord, ValidationResult};
