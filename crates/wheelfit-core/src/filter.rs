//! The catalog fitment filter.
//!
//! A pure, synchronous fold over an in-memory item list. Three independent
//! rule families apply, AND-ed together:
//!
//! - **Bolt pattern**: exact token match (never substring), case-insensitive,
//!   with the `-bolt` facet suffix stripped from both sides before comparison.
//! - **Central bore**: `CB <mm>` tokens; the item qualifies when any parsed
//!   bore is at least the requested minimum.
//! - **Offset**: `ET <mm>[unit]` tokens; the item qualifies when the parsed
//!   offset is at most one of the requested maxima (OR within the list).
//!
//! A rule with no criterion supplied is vacuously true. A tag token that looks
//! like a `CB`/`ET` facet but carries an unparseable numeric field is simply
//! non-matching for that rule, never an error. All numeric comparison happens
//! on parsed values, never on the raw strings.

use std::collections::HashSet;

use thiserror::Error;

use crate::catalog::{tag_tokens, CatalogItem};

/// A malformed query value, identifying the offending field.
#[derive(Debug, Error)]
#[error("invalid value for {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

/// One query's matching parameters, parsed and validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive exact-match bolt pattern, e.g. `5X112`.
    pub bolt_pattern: Option<String>,
    /// Minimum acceptable central bore in millimeters.
    pub central_bore_min: Option<f64>,
    /// Maximum acceptable offsets in millimeters; an item qualifies against
    /// any one of them.
    pub offsets: Vec<f64>,
}

impl FilterCriteria {
    /// Builds criteria from raw query-string values.
    ///
    /// Empty or whitespace-only values count as absent. `offset` accepts a
    /// comma-separated list of numbers.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the offending field when
    /// `central_bore` or any `offset` entry is not a number.
    pub fn from_raw(
        bolt_pattern: Option<&str>,
        central_bore: Option<&str>,
        offset: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let bolt_pattern = bolt_pattern
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let central_bore_min = central_bore
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f64>().map_err(|_| ValidationError {
                    field: "central_bore",
                    reason: format!("\"{s}\" is not a number"),
                })
            })
            .transpose()?;

        let offsets = offset
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        s.parse::<f64>().map_err(|_| ValidationError {
                            field: "offset",
                            reason: format!("\"{s}\" is not a number"),
                        })
                    })
                    .collect::<Result<Vec<f64>, ValidationError>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            bolt_pattern,
            central_bore_min,
            offsets,
        })
    }

    /// True when no rule is active. Filtering with empty criteria returns
    /// the full input list (deduplicated) rather than an empty set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bolt_pattern.is_none() && self.central_bore_min.is_none() && self.offsets.is_empty()
    }
}

/// Filters `items` down to those satisfying every active rule in `criteria`,
/// deduplicated by item id (first occurrence wins, input order preserved).
///
/// Pure and deterministic; safe to call concurrently across requests since
/// each invocation owns its input and output.
#[must_use]
pub fn filter_catalog(items: Vec<CatalogItem>, criteria: &FilterCriteria) -> Vec<CatalogItem> {
    let mut seen: HashSet<i64> = HashSet::new();
    items
        .into_iter()
        .filter(|item| criteria.is_empty() || matches_criteria(item, criteria))
        .filter(|item| seen.insert(item.id))
        .collect()
}

/// True when `item` passes every active rule. An item with no tags fails any
/// active rule; a missing facet family counts as non-matching when the
/// corresponding rule is active.
fn matches_criteria(item: &CatalogItem, criteria: &FilterCriteria) -> bool {
    let Some(tags) = item.tags.as_deref() else {
        return false;
    };
    let tokens = tag_tokens(tags);

    if let Some(pattern) = criteria.bolt_pattern.as_deref() {
        if !bolt_pattern_matches(&tokens, pattern) {
            return false;
        }
    }

    if let Some(min_bore) = criteria.central_bore_min {
        if !bore_values(&tokens).any(|bore| bore >= min_bore) {
            return false;
        }
    }

    if !criteria.offsets.is_empty() {
        let qualifies = offset_values(&tokens)
            .any(|et| criteria.offsets.iter().any(|max| et <= *max));
        if !qualifies {
            return false;
        }
    }

    true
}

/// Exact bolt-pattern comparison against each token.
///
/// Both sides are uppercased and a trailing `-BOLT` facet marker is stripped,
/// so criterion `5X112` matches tag `5X112-bolt` while `5X112` still does not
/// match `5X1120-bolt`.
fn bolt_pattern_matches(tokens: &[&str], pattern: &str) -> bool {
    let want = normalize_bolt(pattern);
    tokens.iter().any(|token| normalize_bolt(token) == want)
}

fn normalize_bolt(raw: &str) -> String {
    let upper = raw.trim().to_ascii_uppercase();
    match upper.strip_suffix("-BOLT") {
        Some(stripped) => stripped.to_owned(),
        None => upper,
    }
}

/// Parsed central-bore values from `CB <mm>` tokens. Tokens whose second
/// whitespace field does not parse as a float are skipped.
fn bore_values<'a>(tokens: &'a [&'a str]) -> impl Iterator<Item = f64> + 'a {
    tokens
        .iter()
        .filter(|t| t.to_ascii_uppercase().starts_with("CB"))
        .filter_map(|t| t.split_whitespace().nth(1))
        .filter_map(|field| field.parse::<f64>().ok())
}

/// Parsed offset values from `ET <mm>[unit]` tokens. The unit suffix (e.g.
/// `MM`) is stripped by taking only the leading digits of the second field.
fn offset_values<'a>(tokens: &'a [&'a str]) -> impl Iterator<Item = f64> + 'a {
    tokens
        .iter()
        .filter(|t| t.to_ascii_uppercase().starts_with("ET"))
        .filter_map(|t| t.split_whitespace().nth(1))
        .filter_map(leading_digits)
}

/// Parses the leading ASCII-digit run of `field` as a float, e.g. `"42MM"`
/// → `42.0`. Returns `None` when the field does not start with a digit.
fn leading_digits(field: &str) -> Option<f64> {
    let end = field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(field.len());
    if end == 0 {
        return None;
    }
    field[..end].parse::<f64>().ok()
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
