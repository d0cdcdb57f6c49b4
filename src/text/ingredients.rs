use crate::text::normalize::replace_fraction_glyphs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Units recognized after an amount. Plural spellings are listed explicitly.
pub const DEFAULT_UNITS: &[&str] = &[
    "g", "kg", "mg", "ml", "l", "tbsp", "tsp", "cup", "cups", "oz", "fl oz", "lb", "lbs", "pound",
    "pounds", "clove", "cloves", "slice", "slices", "can", "cans", "tin", "tins", "pack", "packs",
];

// amount: mixed number | fraction | decimal | integer, longest form first
const LINE_PATTERN: &str = r"(?s)^(?:(?P<amount>[0-9]+\s+[0-9]+/[0-9]+|[0-9]+/[0-9]+|[0-9]+(?:\.[0-9]+)?)\s*)?(?:(?P<unit>[A-Za-z]+(?:\s*oz)?)(?:\s+|$))?(?P<rest>.*)$";

/// One parsed ingredient line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Raw amount literal, e.g. "1 1/2"
    pub amount: String,
    /// Lowercase vocabulary unit or empty
    pub unit: String,
    pub item: String,
    /// Text after the first comma
    pub note: String,
}

impl IngredientLine {
    fn item_only(item: &str) -> Self {
        Self {
            item: item.to_string(),
            ..Default::default()
        }
    }
}

impl fmt::Display for IngredientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = [&self.amount, &self.unit, &self.item]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&head)?;
        if !self.note.is_empty() {
            write!(f, ", {}", self.note)?;
        }
        Ok(())
    }
}

/// Fixed set of known units, matched case-insensitively
#[derive(Debug, Clone)]
pub struct UnitVocabulary {
    units: HashSet<String>,
}

impl UnitVocabulary {
    pub fn new<I, S>(units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            units: units
                .into_iter()
                .map(|u| canonical_unit(u.as_ref()))
                .filter(|u| !u.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.units.contains(&canonical_unit(unit))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Default for UnitVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_UNITS)
    }
}

/// Lowercase with inner whitespace collapsed, so "Fl  Oz" looks up as "fl oz"
fn canonical_unit(unit: &str) -> String {
    unit.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Ingredient line parser bound to a unit vocabulary
#[derive(Debug, Clone)]
pub struct IngredientParser {
    pattern: Regex,
    units: UnitVocabulary,
}

impl Default for IngredientParser {
    fn default() -> Self {
        Self::new(UnitVocabulary::default())
    }
}

impl IngredientParser {
    pub fn new(units: UnitVocabulary) -> Self {
        let pattern = Regex::new(LINE_PATTERN).expect("ingredient line pattern is valid");
        Self { pattern, units }
    }

    pub fn units(&self) -> &UnitVocabulary {
        &self.units
    }

    /// Parse one line. Returns `None` only for blank lines.
    pub fn parse_line(&self, line: &str) -> Option<IngredientLine> {
        let original = line.trim();
        if original.is_empty() {
            return None;
        }

        let s = replace_fraction_glyphs(original);

        let Some(caps) = self.pattern.captures(&s) else {
            debug!("Ingredient pattern did not match, keeping whole line: {}", original);
            return Some(IngredientLine::item_only(original));
        };

        let amount = caps
            .name("amount")
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        let unit_raw = caps.name("unit").map(|m| m.as_str().trim()).unwrap_or("");
        let mut rest = caps
            .name("rest")
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        let mut unit = String::new();
        if !unit_raw.is_empty() {
            if self.units.contains(unit_raw) && !rest.is_empty() {
                unit = canonical_unit(unit_raw);
            } else {
                // Not a unit ("2 eggs") or nothing follows it: the word belongs to the item
                rest = format!("{unit_raw} {rest}").trim().to_string();
            }
        }

        let (item, note) = match rest.split_once(',') {
            Some((item, note)) => (item.trim().to_string(), note.trim().to_string()),
            None => (rest, String::new()),
        };

        if item.is_empty() {
            debug!("No item left after parsing, keeping whole line: {}", original);
            return Some(IngredientLine::item_only(original));
        }

        Some(IngredientLine {
            amount,
            unit,
            item,
            note,
        })
    }

    /// Parse every non-blank line of a block, keeping input order.
    pub fn parse_block(&self, text: &str) -> Vec<IngredientLine> {
        text.split(['\n', '\r'])
            .filter_map(|ln| self.parse_line(ln))
            .collect()
    }
}

static DEFAULT_PARSER: LazyLock<IngredientParser> = LazyLock::new(IngredientParser::default);

/// Parse one line with the default unit vocabulary.
pub fn parse_line(line: &str) -> Option<IngredientLine> {
    DEFAULT_PARSER.parse_line(line)
}

/// Parse a block of lines with the default unit vocabulary.
pub fn parse_block(text: &str) -> Vec<IngredientLine> {
    DEFAULT_PARSER.parse_block(text)
}

/// Decode a stored ingredients column into display lines.
///
/// Accepts a JSON list, a JSON string holding a JSON list, or plain text
/// separated by commas and line breaks.
pub fn decode_ingredient_field(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('"') {
        match decode_json_ingredients(trimmed) {
            Ok(lines) => return lines,
            Err(e) => {
                debug!("Ingredients field is not valid JSON ({}), splitting as text", e);
                let stripped: String = raw
                    .chars()
                    .filter(|&c| !matches!(c, '[' | ']' | '"'))
                    .collect();
                return split_ingredient_text(&stripped);
            }
        }
    }
    split_ingredient_text(raw)
}

fn decode_json_ingredients(text: &str) -> serde_json::Result<Vec<String>> {
    let mut value: Value = serde_json::from_str(text)?;
    if let Value::String(inner) = &value {
        if inner.trim_start().starts_with('[') {
            value = serde_json::from_str(inner)?;
        }
    }

    Ok(match value {
        Value::Array(items) => items.iter().map(|v| json_text(v).trim().to_string()).collect(),
        other => vec![json_text(&other).trim().to_string()],
    })
}

fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn split_ingredient_text(text: &str) -> Vec<String> {
    text.split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
