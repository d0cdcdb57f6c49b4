pub mod config;
pub mod error;

// Text understanding
pub mod text;

// Matching and search
pub mod matcher;
pub mod recipe;

pub mod cli;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use matcher::{lexical_hit, MatchEngine, MatchMode, MatchResult};
pub use recipe::{MatchTarget, RecipeRow};
