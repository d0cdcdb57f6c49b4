use crate::error::{Error, Result};
use crate::text::decode_ingredient_field;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// One stored recipe. Missing or `null` columns read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRow {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub method: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl RecipeRow {
    pub fn match_target(&self) -> MatchTarget {
        MatchTarget::new(&self.name, &self.ingredients, &self.method)
    }

    /// Ingredients column as display lines
    pub fn ingredient_lines(&self) -> Vec<String> {
        decode_ingredient_field(&self.ingredients)
    }
}

/// Text a query is matched against: name, ingredients and method joined by spaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTarget {
    text: String,
}

impl MatchTarget {
    pub fn new(name: &str, ingredients: &str, method: &str) -> Self {
        Self {
            text: [name, ingredients, method].join(" "),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<&RecipeRow> for MatchTarget {
    fn from(row: &RecipeRow) -> Self {
        row.match_target()
    }
}

/// Load recipes from a JSON array file
pub fn load_recipes<P: AsRef<Path>>(path: P) -> Result<Vec<RecipeRow>> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        Error::Config(format!(
            "Failed to read recipes from {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;

    let recipes: Vec<RecipeRow> = serde_json::from_str(&content).map_err(|e| {
        Error::Validation(format!(
            "Failed to parse recipes from {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;

    Ok(recipes)
}
