use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;
use tracing::debug;

/// Built-in synonyms. The singularized spellings (`pasta dishe`, `currie`) are
/// what the plural stripping step leaves behind, so they are mapped too.
pub const DEFAULT_SYNONYMS: &[(&str, &str)] = &[
    ("soups", "soup"),
    ("salads", "salad"),
    ("fish & seafood", "seafood"),
    ("seafood & fish", "seafood"),
    ("pasta dishes", "pasta"),
    ("curries", "curry"),
    ("desserts", "dessert"),
    ("cakes", "cake"),
    ("cookies", "cookie"),
    ("breads", "bread"),
    ("pasta dishe", "pasta"),
    ("currie", "curry"),
];

/// A canonical tag with the number of times it was seen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Read-only synonym lookup
#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: HashMap<String, String>,
}

impl SynonymTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries.get(tag).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::new(DEFAULT_SYNONYMS.iter().copied())
    }
}

/// Turns raw tag fields into canonical tags
#[derive(Debug, Clone, Default)]
pub struct TagCanonicalizer {
    synonyms: SynonymTable,
}

impl TagCanonicalizer {
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    /// Canonicalize one recipe's tags field. Duplicates are kept.
    pub fn canonicalize_tags(&self, raw_field: &str) -> Vec<String> {
        split_tag_field(raw_field)
            .iter()
            .filter_map(|candidate| self.canonicalize(candidate))
            .collect()
    }

    /// Canonicalize a single label, `None` when nothing usable is left.
    pub fn canonicalize(&self, label: &str) -> Option<String> {
        let mut tag: String = label
            .chars()
            .filter(|&c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '&' | '-'))
            .collect::<String>()
            .trim()
            .to_lowercase();

        if tag.is_empty() {
            return None;
        }

        // naive singular, wrong for words like "hummus"
        if tag.ends_with('s') && tag.len() > 3 {
            tag.pop();
        }

        if let Some(synonym) = self.synonyms.get(&tag) {
            tag = synonym.to_string();
        }

        Some(tag)
    }

    /// Count canonical tags across all fields, sorted by tag text.
    pub fn build_tag_cloud<I, S>(&self, fields: I) -> Vec<TagCount>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for field in fields {
            for tag in self.canonicalize_tags(field.as_ref()) {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }

        counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect()
    }
}

static DEFAULT_CANONICALIZER: LazyLock<TagCanonicalizer> =
    LazyLock::new(TagCanonicalizer::default);

/// Canonicalize with the default synonym table.
pub fn canonicalize_tags(raw_field: &str) -> Vec<String> {
    DEFAULT_CANONICALIZER.canonicalize_tags(raw_field)
}

/// Tag cloud with the default synonym table.
pub fn build_tag_cloud<I, S>(fields: I) -> Vec<TagCount>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    DEFAULT_CANONICALIZER.build_tag_cloud(fields)
}

/// Split a raw tags field into candidate labels.
///
/// Order matters on malformed data: JSON list, then JSON string, then
/// bracket/quote stripping plus delimiter split, then plain delimiter split.
pub fn split_tag_field(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if !trimmed.starts_with('[') {
        return split_delimited(raw);
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items.iter().filter_map(json_label).collect(),
        Ok(Value::String(s)) => vec![s],
        Ok(_) => Vec::new(),
        Err(e) => {
            debug!("Tags field is not valid JSON ({}), splitting as text", e);
            let cleaned = raw.trim_matches(|c: char| matches!(c, '[' | ']' | '\'' | '"' | ' '));
            split_delimited(cleaned)
        }
    }
}

fn json_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn split_delimited(text: &str) -> Vec<String> {
    text.split([',', ';']).map(str::to_string).collect()
}

/// Build the stored tags column from checkbox choices plus a free-text field.
pub fn join_tag_field(chosen: &[String], extras: &str) -> String {
    chosen
        .iter()
        .map(|t| t.as_str())
        .chain(extras.split(',').map(str::trim).filter(|t| !t.is_empty()))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_list_plural_and_synonyms() {
        assert_eq!(canonicalize_tags(r#"["Soups","Salads"]"#), vec!["soup", "salad"]);
        assert_eq!(
            canonicalize_tags(r#"["Curries", "Pasta Dishes", "Fish & Seafood"]"#),
            vec!["curry", "pasta", "seafood"]
        );
    }

    #[test]
    fn test_delimited_field_keeps_duplicates() {
        assert_eq!(canonicalize_tags("Curry, Curry"), vec!["curry", "curry"]);
        assert_eq!(
            canonicalize_tags("Quick;Vegetarian , Easy Lunch"),
            vec!["quick", "vegetarian", "easy lunch"]
        );
    }

    #[test]
    fn test_cleaning_drops_empty_and_symbols() {
        assert_eq!(canonicalize_tags("  ,;, !!! ,"), Vec::<String>::new());
        assert_eq!(canonicalize_tags("Mac 'n' Cheese!"), vec!["mac n cheese"]);
        assert_eq!(canonicalize_tags("Café"), vec!["caf"]);
    }

    #[test]
    fn test_singularization_is_naive() {
        let canon = TagCanonicalizer::default();
        assert_eq!(canon.canonicalize("bus").as_deref(), Some("bus"));
        assert_eq!(canon.canonicalize("Buses").as_deref(), Some("buse"));
        assert_eq!(canon.canonicalize("Hummus").as_deref(), Some("hummu"));
        assert_eq!(canon.canonicalize("Peas").as_deref(), Some("pea"));
    }

    #[test]
    fn test_broken_json_falls_back_to_split() {
        assert_eq!(
            canonicalize_tags(r#"['Soups', 'Quick']"#),
            vec!["soup", "quick"]
        );
        assert_eq!(canonicalize_tags(r#"["Dinner", "#), vec!["dinner"]);
    }

    #[test]
    fn test_json_non_string_elements() {
        assert_eq!(
            split_tag_field(r#"["a", 30, true, null, ["x"], {"k": 1}]"#),
            vec!["a", "30", "true"]
        );
    }

    #[test]
    fn test_custom_synonyms() {
        let canon = TagCanonicalizer::new(SynonymTable::new([("veggie", "vegetarian")]));
        assert_eq!(canon.canonicalize_tags("Veggies"), vec!["vegetarian"]);
        // default table not consulted
        assert_eq!(canon.canonicalize_tags("Pasta Dishes"), vec!["pasta dishe"]);
    }

    #[test]
    fn test_tag_cloud_counts_and_order() {
        let cloud = build_tag_cloud(["Curry", "Curry"]);
        assert_eq!(
            cloud,
            vec![TagCount {
                tag: "curry".to_string(),
                count: 2
            }]
        );

        let cloud = build_tag_cloud([r#"["Soups","Quick"]"#, "soup; Dessert", "", "Desserts"]);
        let flat: Vec<(&str, usize)> = cloud.iter().map(|t| (t.tag.as_str(), t.count)).collect();
        assert_eq!(flat, vec![("dessert", 2), ("quick", 1), ("soup", 2)]);
    }

    #[test]
    fn test_free_functions_use_default_synonyms() {
        assert_eq!(DEFAULT_CANONICALIZER.synonyms.len(), DEFAULT_SYNONYMS.len());
        let explicit = TagCanonicalizer::default();
        for field in ["Curries, Cakes", r#"["Pasta Dishes"]"#, "Fish & Seafood"] {
            assert_eq!(canonicalize_tags(field), explicit.canonicalize_tags(field));
        }
    }

    #[test]
    fn test_join_tag_field() {
        let chosen = vec!["Favourites".to_string(), "Easy Lunch".to_string()];
        assert_eq!(
            join_tag_field(&chosen, " spicy , ,vegan"),
            "Favourites,Easy Lunch,spicy,vegan"
        );
        assert_eq!(join_tag_field(&[], ""), "");
    }
}
