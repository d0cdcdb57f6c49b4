use larder::recipe::load_recipes;
use larder::text::{decode_ingredient_field, parse_block, parse_line, IngredientLine, IngredientParser};

fn line(amount: &str, unit: &str, item: &str, note: &str) -> IngredientLine {
    IngredientLine {
        amount: amount.to_string(),
        unit: unit.to_string(),
        item: item.to_string(),
        note: note.to_string(),
    }
}

#[test]
fn test_reference_lines() {
    assert_eq!(parse_line("200 g penne"), Some(line("200", "g", "penne", "")));
    assert_eq!(
        parse_line("1 1/2 cups milk"),
        Some(line("1 1/2", "cups", "milk", ""))
    );
    assert_eq!(
        parse_line("2 cloves garlic, crushed"),
        Some(line("2", "cloves", "garlic", "crushed"))
    );
    assert_eq!(parse_line("penne"), Some(line("", "", "penne", "")));
    assert_eq!(parse_line("   "), None);
}

#[test]
fn test_block_reparse_is_stable() {
    let block = "200 g penne\n1 1/2 cups milk\n2 cloves garlic, crushed\n\n3 eggs\nSalt, to taste\n";
    let first = parse_block(block);
    assert_eq!(first.len(), 5);

    let rejoined = first
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(parse_block(&rejoined), first);
}

#[test]
fn test_stored_fields_decode_then_parse() {
    let recipes = load_recipes("tests/fixtures/recipes.json").unwrap();
    let parser = IngredientParser::default();

    let pasta: Vec<IngredientLine> = decode_ingredient_field(&recipes[0].ingredients)
        .iter()
        .filter_map(|l| parser.parse_line(l))
        .collect();
    assert_eq!(
        pasta,
        vec![
            line("200", "g", "penne", ""),
            line("1", "tin", "tomatoes", ""),
            line("100", "ml", "cream", ""),
        ]
    );

    // double-encoded JSON column
    assert_eq!(
        recipes[3].ingredient_lines(),
        vec!["500 g chicken thighs", "2 tbsp curry paste"]
    );

    // plain text column with a fraction glyph
    let salad = parser.parse_block(&recipes[2].ingredients);
    assert_eq!(salad[1], line("1/2", "", "cucumber", ""));
}
