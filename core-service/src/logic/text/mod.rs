//! Text Module - Social post preprocessing

pub mod cleaner;
pub mod stopwords;

pub use cleaner::{clean_text, clean_value};
pub use stopwords::{is_stopword, ENGLISH_STOPWORDS};
