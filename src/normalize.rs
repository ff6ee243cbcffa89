//! # Record Normalizer Module
//!
//! Per-record cleanup shared by both source loaders.
//!
//! ## Features
//!
//! - Decoding of string-encoded list columns (JSON arrays, Python-style
//!   single-quoted lists and R-style `c("a", "b")` vectors)
//! - Instruction/direction cleanup into one sentence per step
//! - Outlier rejection on calories and servings
//!
//! Decoding failures and empty lists are reported as `None` ("missing"); the
//! loaders drop such records instead of defaulting them to empty lists.

use log::trace;

use crate::config::OutlierBounds;

/// Decode a string-encoded list literal
///
/// A bare non-list string becomes a one-element list. Unparsable input and
/// empty lists are `None`.
///
/// # Examples
///
/// ```rust
/// use recipe_corpus::normalize::parse_list_literal;
///
/// assert_eq!(
///     parse_list_literal(r#"["flour", "sugar"]"#),
///     Some(vec!["flour".to_string(), "sugar".to_string()])
/// );
/// assert_eq!(parse_list_literal("['it''s']"), None);
/// assert_eq!(parse_list_literal("[]"), None);
/// ```
pub fn parse_list_literal(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let items = if trimmed.starts_with('[') && trimmed.ends_with(']') {
        serde_json::from_str::<Vec<Option<String>>>(trimmed)
            .map(|items| items.into_iter().flatten().collect())
            .ok()
            .or_else(|| scan_items(&trimmed[1..trimmed.len() - 1]))
    } else if trimmed.starts_with("c(") && trimmed.ends_with(')') {
        scan_items(&trimmed[2..trimmed.len() - 1])
    } else if trimmed.starts_with('[') || trimmed.starts_with("c(") || trimmed == "character(0)" {
        None
    } else {
        Some(vec![trimmed.to_string()])
    };

    trace!(
        "Decoded list literal of {} bytes -> {:?} items",
        raw.len(),
        items.as_ref().map(Vec::len)
    );
    non_empty(items?)
}

/// `None` for an empty list, so empty values count as missing
pub fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

// Comma-separated items, each either quoted (single or double) or bare.
// Bare `None`/`NA`/`nan`/`null` items are skipped.
fn scan_items(inner: &str) -> Option<Vec<String>> {
    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        if first == '\'' || first == '"' {
            chars.next();
            let mut item = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.next()? {
                        'n' => item.push('\n'),
                        't' => item.push('\t'),
                        other => item.push(other),
                    },
                    c if c == first => {
                        closed = true;
                        break;
                    }
                    c => item.push(c),
                }
            }
            if !closed {
                return None;
            }
            items.push(item);
        } else {
            let mut token = String::new();
            while let Some(c) = chars.next_if(|c| *c != ',') {
                token.push(c);
            }
            let token = token.trim();
            if token.is_empty() {
                return None;
            }
            if !matches!(token, "None" | "NA" | "nan" | "NaN" | "null") {
                items.push(token.to_string());
            }
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(items)
}

/// Rebuild instruction steps as one trimmed, period-terminated sentence each
///
/// ```rust
/// use recipe_corpus::normalize::clean_steps;
///
/// let steps = vec!["Mix the flour. Add eggs".to_string(), "Bake.".to_string()];
/// assert_eq!(clean_steps(&steps), Some(vec![
///     "Mix the flour.".to_string(),
///     "Add eggs Bake.".to_string(),
/// ]));
/// ```
pub fn clean_steps(steps: &[String]) -> Option<Vec<String>> {
    let joined = steps.join(" ");
    let sentences = joined
        .split('.')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("{fragment}."))
        .collect();
    non_empty(sentences)
}

/// Whether calories and servings fall inside the representative range
///
/// Servings are compared as read, so `72.5` is outside a bound of `72`.
pub fn is_representative(
    calories: Option<f64>,
    servings: Option<f64>,
    bounds: &OutlierBounds,
) -> bool {
    match (calories, servings) {
        (Some(calories), Some(servings)) => {
            calories > 0.0
                && calories <= bounds.max_calories
                && servings <= bounds.max_servings as f64
        }
        _ => false,
    }
}

/// A whole serving count, or `None` for fractional or non-finite values
pub fn whole_servings(servings: f64) -> Option<i64> {
    (servings.is_finite() && servings.fract() == 0.0).then_some(servings as i64)
}

/// Trimmed, non-empty text or `None`
pub fn required_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == v.len() {
            Some(v)
        } else {
            Some(trimmed.to_string())
        }
    })
}
