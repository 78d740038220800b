pub mod narrator;

pub use narrator::{describe_range, Narrator, NarratorConfig};
