//! Helpers for normalizing request values.

use std::collections::HashSet;

/// Sanitize arbitrary string input by trimming whitespace and dropping empties.
pub(crate) fn sanitize_string(value: Option<String>) -> Option<String> {
    value.and_then(|input| {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Trim keywords and drop empties so the OR expression has no blank terms.
pub fn sanitize_keywords(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|keyword| sanitize_string(Some(keyword)))
        .collect()
}

/// Trim language tags, drop empties, and remove repeats while keeping the first position.
pub fn sanitize_languages(values: Vec<String>) -> Vec<String> {
    let mut unique = HashSet::new();
    let mut sanitized = Vec::new();

    for language in values {
        let Some(trimmed) = sanitize_string(Some(language)) else {
            continue;
        };
        if unique.insert(trimmed.clone()) {
            sanitized.push(trimmed);
        }
    }

    sanitized
}

/// Return the first value that has non-blank content.
pub(crate) fn first_non_blank<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}
