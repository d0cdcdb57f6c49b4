use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const QUICK_ACCESS_GROUP: &str = "Quick Access";
pub const DEFAULT_QUICK_ACCESS: &[&str] = &["Favourites", "Easy Lunch"];

const FORM_GROUP_PREFIX: &str = "group_";

/// Groups keep their file order. Non-list values are preserved on save but
/// contribute no tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagVocabulary {
    groups: Map<String, Value>,
}

impl TagVocabulary {
    /// Load a vocabulary from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read tag vocabulary from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let vocabulary: TagVocabulary = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse tag vocabulary from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(vocabulary)
    }

    /// Load the vocabulary, never failing.
    ///
    /// A missing file yields the default Quick Access group; an unreadable
    /// or invalid one yields an empty vocabulary.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!(
                "No tag vocabulary at {}, using default Quick Access tags",
                path.display()
            );
            let mut vocabulary = Self::default();
            vocabulary.set_group(
                QUICK_ACCESS_GROUP,
                DEFAULT_QUICK_ACCESS.iter().map(|t| t.to_string()).collect(),
            );
            return vocabulary;
        }

        match Self::from_file(path) {
            Ok(vocabulary) => vocabulary,
            Err(e) => {
                warn!("Error loading tag vocabulary: {}", e.log_safe());
                Self::default()
            }
        }
    }

    /// Rebuild a vocabulary from admin form fields.
    ///
    /// Only `group_<Name>` fields count; underscores in the name become
    /// spaces. A non-blank `new_group` is added empty unless already present.
    pub fn from_form_fields<I, K, V>(fields: I, new_group: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut vocabulary = Self::default();
        for (key, value) in fields {
            if let Some(name) = key.as_ref().strip_prefix(FORM_GROUP_PREFIX) {
                vocabulary.set_group_from_text(&name.replace('_', " "), value.as_ref());
            }
        }
        vocabulary.add_group(new_group);
        vocabulary
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Labels of a list-valued group
    pub fn group(&self, name: &str) -> Option<Vec<String>> {
        match self.groups.get(name)? {
            Value::Array(items) => Some(string_items(items).collect()),
            _ => None,
        }
    }

    pub fn quick_access(&self) -> Vec<String> {
        self.group(QUICK_ACCESS_GROUP).unwrap_or_default()
    }

    /// Every label across list-valued groups, sorted and unique
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .groups
            .values()
            .filter_map(|value| match value {
                Value::Array(items) => Some(string_items(items)),
                _ => None,
            })
            .flatten()
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Replace (or append) a group with the given labels
    pub fn set_group(&mut self, name: &str, tags: Vec<String>) {
        self.groups.insert(
            name.to_string(),
            Value::Array(tags.into_iter().map(Value::String).collect()),
        );
    }

    /// Set a group from comma or newline separated text, trimming blanks
    /// and dropping repeats after their first occurrence.
    pub fn set_group_from_text(&mut self, name: &str, text: &str) {
        let mut tags: Vec<String> = Vec::new();
        for tag in text.split([',', '\n', '\r']).map(str::trim) {
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        self.set_group(name, tags);
    }

    /// Add an empty group. Returns false if the name is blank or taken.
    pub fn add_group(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.groups.contains_key(name) {
            return false;
        }
        self.groups.insert(name.to_string(), Value::Array(Vec::new()));
        true
    }

    /// Write as pretty JSON (two-space indent, UTF-8 kept as is)
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.groups)?;
        fs::write(path.as_ref(), json)?;
        info!(
            "Saved {} tag groups to {}",
            self.groups.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}

fn string_items(items: &[Value]) -> impl Iterator<Item = String> + '_ {
    items.iter().filter_map(|v| v.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let vocabulary = TagVocabulary::load_or_default(dir.path().join("tags.json"));

        assert_eq!(vocabulary.quick_access(), vec!["Favourites", "Easy Lunch"]);
        assert_eq!(vocabulary.all_tags(), vec!["Easy Lunch", "Favourites"]);
    }

    #[test]
    fn test_load_invalid_file_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let vocabulary = TagVocabulary::load_or_default(file.path());
        assert!(vocabulary.is_empty());
        assert!(vocabulary.quick_access().is_empty());

        assert!(matches!(
            TagVocabulary::from_file(file.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_all_tags_sorted_unique_lists_only() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "Quick Access": ["Favourites", "Soup"],
                "Ingredients": ["Chicken", "Soup", 3],
                "notes": "not a group"
            }}"#
        )
        .unwrap();

        let vocabulary = TagVocabulary::from_file(file.path()).unwrap();
        assert_eq!(vocabulary.len(), 3);
        assert_eq!(vocabulary.quick_access(), vec!["Favourites", "Soup"]);
        assert_eq!(vocabulary.all_tags(), vec!["Chicken", "Favourites", "Soup"]);
        assert_eq!(vocabulary.group("notes"), None);
        assert_eq!(
            vocabulary.group_names().collect::<Vec<_>>(),
            vec!["Quick Access", "Ingredients", "notes"]
        );
    }

    #[test]
    fn test_quick_access_absent_group() {
        let mut vocabulary = TagVocabulary::default();
        vocabulary.set_group("Ingredients", vec!["Beef".to_string()]);
        assert!(vocabulary.quick_access().is_empty());
    }

    #[test]
    fn test_set_group_from_text() {
        let mut vocabulary = TagVocabulary::default();
        vocabulary.set_group_from_text("Meals", "Lunch, Dinner\n\n  Lunch ,Breakfast\r\n");
        assert_eq!(
            vocabulary.group("Meals").unwrap(),
            vec!["Lunch", "Dinner", "Breakfast"]
        );
    }

    #[test]
    fn test_add_group_only_when_absent() {
        let mut vocabulary = TagVocabulary::default();
        vocabulary.set_group("Meals", vec!["Lunch".to_string()]);

        assert!(!vocabulary.add_group("Meals"));
        assert!(!vocabulary.add_group("   "));
        assert!(vocabulary.add_group(" Cuisine "));

        assert_eq!(vocabulary.group("Meals").unwrap(), vec!["Lunch"]);
        assert_eq!(vocabulary.group("Cuisine").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_from_form_fields() {
        let fields = [
            ("group_Quick_Access", "Favourites, Easy Lunch"),
            ("csrf_token", "abc"),
            ("group_Ingredients", "Chicken\nBeef\nChicken"),
        ];
        let vocabulary = TagVocabulary::from_form_fields(fields, "Cuisine");

        assert_eq!(
            vocabulary.group_names().collect::<Vec<_>>(),
            vec!["Quick Access", "Ingredients", "Cuisine"]
        );
        assert_eq!(vocabulary.quick_access(), vec!["Favourites", "Easy Lunch"]);
        assert_eq!(vocabulary.group("Ingredients").unwrap(), vec!["Chicken", "Beef"]);

        let unchanged = TagVocabulary::from_form_fields(fields, "Ingredients");
        assert_eq!(unchanged.group("Ingredients").unwrap(), vec!["Chicken", "Beef"]);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tags.json");

        let mut vocabulary = TagVocabulary::default();
        vocabulary.set_group("Quick Access", vec!["Crème brûlée".to_string()]);
        vocabulary.add_group("Empty");
        vocabulary.save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  \"Quick Access\": [\n    \"Crème brûlée\"\n  ]"));

        assert_eq!(TagVocabulary::from_file(&path).unwrap(), vocabulary);
    }
}
