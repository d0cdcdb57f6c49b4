use crate::config::vocabulary::TagVocabulary;
use crate::config::Settings;
use crate::matcher::search::{search_recipes, SearchHit, SearchOptions};
use crate::matcher::{MatchEngine, MatchMode, MatchResult};
use crate::recipe::load_recipes;
use crate::text::{build_tag_cloud, decode_ingredient_field, parse_block};
use crate::Result;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Parse an ingredient block from a file or stdin
pub fn parse(input: Option<&Path>) -> Result<()> {
    let text = read_input(input)?;
    let lines = parse_block(&text);
    info!("Parsed {} ingredient lines", lines.len());
    print_json(&lines)
}

/// Decode a stored ingredients field
pub fn decode(field: &str) -> Result<()> {
    print_json(&decode_ingredient_field(field))
}

/// Tag cloud over a recipes file
pub fn tags(recipes_path: &Path) -> Result<()> {
    let recipes = load_recipes(recipes_path)?;
    let cloud = build_tag_cloud(recipes.iter().map(|r| r.tags.as_str()));

    if cloud.is_empty() {
        println!("No tags found");
        return Ok(());
    }

    println!("{:<30} {:>5}", "Tag", "Count");
    println!("{}", "-".repeat(36));
    for entry in &cloud {
        println!("{:<30} {:>5}", truncate(&entry.tag, 28), entry.count);
    }
    Ok(())
}

/// Search a recipes file
pub async fn search(
    settings: &Settings,
    query: &str,
    recipes_path: &Path,
    mode: MatchMode,
    options: SearchOptions,
) -> Result<()> {
    let recipes = load_recipes(recipes_path)?;
    let engine = MatchEngine::from_config(&settings.oracle)?;

    if mode == MatchMode::Semantic && !engine.has_oracle() {
        warn!("No ORACLE_URL configured, semantic scores fall back to lexical matching");
    }

    let hits = search_recipes(&engine, query, &recipes, mode, &options).await;
    print_search_results(&hits);
    Ok(())
}

#[derive(Serialize)]
struct Comparison<'a> {
    query: &'a str,
    target: &'a str,
    result: MatchResult,
}

/// Compare a single query and text
pub async fn compare(settings: &Settings, query: &str, target: &str, mode: MatchMode) -> Result<()> {
    let engine = MatchEngine::from_config(&settings.oracle)?;
    let result = engine.evaluate(query, target, mode).await;
    print_json(&Comparison {
        query,
        target,
        result,
    })
}

/// Show Quick Access and the full tag list
pub fn vocab(path: &Path) -> Result<()> {
    let vocabulary = TagVocabulary::load_or_default(path);

    println!("Quick Access: {}", vocabulary.quick_access().join(", "));
    println!("\nGroups:");
    for name in vocabulary.group_names() {
        let count = vocabulary.group(name).map(|g| g.len()).unwrap_or(0);
        println!("  {:<28} {:>4} tags", truncate(name, 28), count);
    }

    let all = vocabulary.all_tags();
    println!("\nAll tags ({}):", all.len());
    for tag in &all {
        println!("  - {}", tag);
    }
    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_search_results(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No recipes found");
        return;
    }

    println!("\nFound {} recipes:\n", hits.len());
    println!("{:<6} {:<50} {:>6}", "#", "Name", "Score");
    println!("{}", "-".repeat(64));

    for hit in hits {
        println!(
            "{:<6} {:<50} {:>6.2}",
            hit.index,
            truncate(&hit.name, 48),
            hit.result.score()
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("soup", 10), "soup");
        assert_eq!(truncate("crème brûlée tart", 8), "crème...");
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "200 g penne\n1 egg").unwrap();
        assert_eq!(read_input(Some(file.path())).unwrap(), "200 g penne\n1 egg");
    }

    #[test]
    fn test_tags_missing_file_is_error() {
        assert!(tags(Path::new("/nonexistent/recipes.json")).is_err());
    }
}
