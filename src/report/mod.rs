pub mod generator;

pub use generator::{facts_as_json, fallback_summary};
