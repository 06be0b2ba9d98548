//! Version domain model
//!
//! Parsing, rendering and ordering for the strict release version grammar
//! `major.minor.patch[(a|b|rc)N]`.

pub mod model;
pub mod ordering;
pub mod parser;

pub use model::{Prerelease, PrereleaseType, Version};
pub use ordering::{SortKey, sort_key};
pub use parser::{TAG_PREFIX, parse, parse_tag};
