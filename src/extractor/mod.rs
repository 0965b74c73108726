//! Sub-extractors.
//!
//! Each sub-extractor turns the chosen content root (or the whole document)
//! into typed data with its own guarded traversal.
//!
//! # Module Structure
//!
//! - `text`: plain text with block line breaks and inline image rendering
//! - `title`: document title with `h1` fallback
//! - `media`: image, video and audio records
//! - `links`: anchor records with external / nofollow flags

pub mod links;
pub mod media;
pub mod text;
pub mod title;

pub use links::extract_links;
pub use media::{extract_media, Media, MediaOptions};
pub use text::{count_words, extract_text, TextOptions};
pub use title::{extract_title, first_heading};
