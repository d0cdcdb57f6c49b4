pub mod ingredients;
pub mod normalize;
pub mod tags;

pub use ingredients::{
    decode_ingredient_field, parse_block, parse_line, IngredientLine, IngredientParser,
    UnitVocabulary,
};
pub use normalize::{normalize, replace_fraction_glyphs, tokenize};
pub use tags::{
    build_tag_cloud, canonicalize_tags, join_tag_field, SynonymTable, TagCanonicalizer, TagCount,
};
