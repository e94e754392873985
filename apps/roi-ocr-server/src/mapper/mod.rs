//! Pattern Mapper
//!
//! Turns raw OCR text into a flat `class_N -> value` map using an ordered
//! list of regular expressions loaded once at startup.

mod map;
mod patterns;

pub use map::{field_key, PatternMap, KEY_PREFIX};
pub use patterns::{FieldPattern, PatternSet};
