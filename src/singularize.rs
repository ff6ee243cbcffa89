//! # Singularization Module
//!
//! Rule-based plural to singular conversion for ingredient entity names.
//! `singular_noun` answers `None` when the word does not look plural, so callers
//! can keep the original word unchanged.

use lazy_static::lazy_static;
use log::trace;
use std::collections::{HashMap, HashSet};

lazy_static! {
    /// Plurals that do not follow a suffix rule
    static ref IRREGULAR_PLURALS: HashMap<&'static str, &'static str> = [
        ("leaves", "leaf"),
        ("loaves", "loaf"),
        ("halves", "half"),
        ("calves", "calf"),
        ("knives", "knife"),
        ("shelves", "shelf"),
        ("wolves", "wolf"),
        ("geese", "goose"),
        ("mice", "mouse"),
        ("teeth", "tooth"),
        ("feet", "foot"),
        ("children", "child"),
        ("people", "person"),
        ("men", "man"),
        ("women", "woman"),
        ("oxen", "ox"),
    ]
    .into_iter()
    .collect();

    /// Words ending in `s` that are singular or uncountable
    static ref INVARIANT_WORDS: HashSet<&'static str> = [
        "molasses", "couscous", "hummus", "asparagus", "citrus", "swiss", "series",
        "species", "grits", "schnapps", "bitters", "brussels", "gas", "lens",
        "christmas", "pancreas", "octopus", "cactus", "hibiscus", "ras", "tamis",
    ]
    .into_iter()
    .collect();

    /// Singular forms ending in `ie`, so `-ies` only drops the `s`
    static ref IE_SINGULARS: HashSet<&'static str> = [
        "cookie", "brownie", "smoothie", "veggie", "movie", "rookie", "calorie",
        "pie", "tie", "pixie", "sortie", "genie", "hippie", "birdie", "goalie",
        "prairie", "zombie", "bootie", "lassie",
    ]
    .into_iter()
    .collect();

    /// Singular forms ending in `che`, so `-ches` only drops the `s`
    static ref CHE_SINGULARS: HashSet<&'static str> = [
        "quiche", "brioche", "ganache", "panache", "niche", "cliche", "creche",
        "cloche", "moustache", "mustache", "ache", "headache", "avalanche", "tranche",
    ]
    .into_iter()
    .collect();

    /// Singular forms ending in `oe`, so `-oes` only drops the `s`
    static ref OE_SINGULARS: HashSet<&'static str> = [
        "shoe", "toe", "canoe", "oboe", "floe", "hoe", "sloe", "roe", "doe", "aloe",
    ]
    .into_iter()
    .collect();
}

/// Return the singular form of a plural noun, or `None` if the word is not plural
///
/// Multi-word entities are singularized on their last word.
///
/// # Examples
///
/// ```rust
/// use recipe_corpus::singularize::singular_noun;
///
/// assert_eq!(singular_noun("berries").as_deref(), Some("berry"));
/// assert_eq!(singular_noun("green onions").as_deref(), Some("green onion"));
/// assert_eq!(singular_noun("bread"), None);
/// ```
pub fn singular_noun(word: &str) -> Option<String> {
    let trimmed = word.trim_end();
    let split_at = trimmed.rfind(' ').map(|i| i + 1).unwrap_or(0);
    let (head, last) = trimmed.split_at(split_at);

    let singular = singular_word(last)?;
    trace!("Singularized '{word}' -> '{head}{singular}'");
    Some(format!("{head}{singular}"))
}

fn singular_word(word: &str) -> Option<String> {
    let lower = word.to_lowercase();
    if lower.len() < 3 || INVARIANT_WORDS.contains(lower.as_str()) {
        return None;
    }
    if let Some(singular) = IRREGULAR_PLURALS.get(lower.as_str()) {
        return Some(singular.to_string());
    }
    if !lower.ends_with('s')
        || lower.ends_with("ss")
        || lower.ends_with("us")
        || lower.ends_with("is")
    {
        return None;
    }

    // Suffix rules are matched on `lower`; the original casing is kept when
    // both forms have the same byte layout.
    let keep = |drop: usize| -> String { strip_suffix_bytes(word, &lower, drop) };

    if let Some(stem) = lower.strip_suffix("ies") {
        let ie_form = format!("{stem}ie");
        if IE_SINGULARS.contains(ie_form.as_str()) || stem.len() < 2 {
            return Some(keep(1));
        }
        return Some(format!("{}y", strip_suffix_bytes(word, &lower, 3)));
    }
    if lower.ends_with("sses") || lower.ends_with("xes") || lower.ends_with("shes") {
        return Some(keep(2));
    }
    if lower.ends_with("ches") {
        let che_form = &lower[..lower.len() - 1];
        if CHE_SINGULARS.contains(che_form) {
            return Some(keep(1));
        }
        return Some(keep(2));
    }
    if lower.ends_with("oes") {
        let oe_form = &lower[..lower.len() - 1];
        if OE_SINGULARS.contains(oe_form) {
            return Some(keep(1));
        }
        return Some(keep(2));
    }
    Some(keep(1))
}

fn strip_suffix_bytes(word: &str, lower: &str, drop: usize) -> String {
    let end = lower.len() - drop;
    if word.len() == lower.len() {
        if let Some(stem) = word.get(..end) {
            return stem.to_string();
        }
    }
    lower[..end].to_string()
}

/// Singularize every word, keeping words with no singular form unchanged
///
/// ```rust
/// use recipe_corpus::singularize::to_singular;
///
/// let words = vec!["apples".to_string(), "bread".to_string()];
/// assert_eq!(to_singular(&words), vec!["apple", "bread"]);
/// ```
pub fn to_singular(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|word| singular_noun(word).unwrap_or_else(|| word.clone()))
        .collect()
}
