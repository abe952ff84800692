use super::*;

fn item(id: i64, tags: &str) -> CatalogItem {
    CatalogItem {
        id,
        title: Some(format!("Wheel {id}")),
        tags: Some(tags.to_owned()),
    }
}

fn untagged(id: i64) -> CatalogItem {
    CatalogItem {
        id,
        title: None,
        tags: None,
    }
}

fn ids(items: &[CatalogItem]) -> Vec<i64> {
    items.iter().map(|i| i.id).collect()
}

fn criteria(
    bolt: Option<&str>,
    bore: Option<f64>,
    offsets: &[f64],
) -> FilterCriteria {
    FilterCriteria {
        bolt_pattern: bolt.map(str::to_owned),
        central_bore_min: bore,
        offsets: offsets.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Central-bore rule
// ---------------------------------------------------------------------------

#[test]
fn bore_at_or_above_minimum_is_included() {
    let result = filter_catalog(vec![item(1, "CB 70.0")], &criteria(None, Some(64.1), &[]));
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn bore_below_minimum_is_excluded() {
    let result = filter_catalog(vec![item(1, "CB 70.0")], &criteria(None, Some(75.0), &[]));
    assert!(result.is_empty());
}

#[test]
fn bore_comparison_is_numeric_not_lexicographic() {
    // "9.0" > "66.6" lexicographically; numerically 9.0 fails a 66.0 minimum.
    let result = filter_catalog(
        vec![item(1, "CB 9.0"), item(2, "CB 66.6")],
        &criteria(None, Some(66.0), &[]),
    );
    assert_eq!(ids(&result), vec![2]);
}

#[test]
fn malformed_bore_field_is_non_matching_not_an_error() {
    let result = filter_catalog(vec![item(1, "CB abc")], &criteria(None, Some(60.0), &[]));
    assert!(result.is_empty());
}

#[test]
fn any_of_multiple_bore_tags_can_satisfy_the_rule() {
    let result = filter_catalog(
        vec![item(1, "CB 57.1, CB 72.6")],
        &criteria(None, Some(70.0), &[]),
    );
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn missing_bore_facet_fails_an_active_bore_rule() {
    let result = filter_catalog(
        vec![item(1, "5X112-bolt, ET 42MM")],
        &criteria(None, Some(60.0), &[]),
    );
    assert!(result.is_empty());
}

// ---------------------------------------------------------------------------
// Offset rule
// ---------------------------------------------------------------------------

#[test]
fn offset_at_or_below_maximum_is_included() {
    let result = filter_catalog(vec![item(1, "ET 42MM")], &criteria(None, None, &[45.0]));
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn offset_above_maximum_is_excluded() {
    let result = filter_catalog(vec![item(1, "ET 42MM")], &criteria(None, None, &[30.0]));
    assert!(result.is_empty());
}

#[test]
fn offset_qualifies_against_any_supplied_threshold() {
    let result = filter_catalog(
        vec![item(1, "ET 42MM")],
        &criteria(None, None, &[30.0, 45.0]),
    );
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn offset_unit_suffix_is_stripped_before_comparison() {
    // Without stripping, "42MM" would not parse and the item would be lost.
    let result = filter_catalog(vec![item(1, "ET 42MM")], &criteria(None, None, &[42.0]));
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn offset_without_numeric_field_is_non_matching() {
    let result = filter_catalog(vec![item(1, "ET MM42")], &criteria(None, None, &[45.0]));
    assert!(result.is_empty());
}

#[test]
fn missing_offset_facet_fails_an_active_offset_rule() {
    let result = filter_catalog(
        vec![item(1, "5X112-bolt, CB 66.6")],
        &criteria(None, None, &[45.0]),
    );
    assert!(result.is_empty());
}

// ---------------------------------------------------------------------------
// Bolt-pattern rule
// ---------------------------------------------------------------------------

#[test]
fn bolt_pattern_match_is_case_insensitive() {
    let result = filter_catalog(
        vec![item(1, "5x112-bolt")],
        &criteria(Some("5X112-BOLT"), None, &[]),
    );
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn bolt_pattern_criterion_without_suffix_matches_suffixed_tag() {
    let result = filter_catalog(
        vec![item(1, "5X112-bolt")],
        &criteria(Some("5X112"), None, &[]),
    );
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn bolt_pattern_is_exact_not_substring() {
    let result = filter_catalog(
        vec![item(1, "5X1120-bolt"), item(2, "5X112-wide")],
        &criteria(Some("5X112"), None, &[]),
    );
    assert!(result.is_empty());
}

// ---------------------------------------------------------------------------
// Combination, dedup, policy
// ---------------------------------------------------------------------------

#[test]
fn rules_combine_conjunctively() {
    // Matches bolt pattern but fails the bore minimum: excluded.
    let result = filter_catalog(
        vec![item(1, "5X112-bolt, CB 60.0")],
        &criteria(Some("5X112"), Some(64.1), &[]),
    );
    assert!(result.is_empty());
}

#[test]
fn full_query_selects_only_the_compatible_item() {
    let items = vec![
        item(1, "5X112-bolt, CB 66.6, ET 42MM"),
        item(2, "5X100-bolt, CB 60.1, ET 50MM"),
    ];
    let result = filter_catalog(items, &criteria(Some("5X112"), Some(64.1), &[45.0]));
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn filtering_is_idempotent() {
    let items = vec![
        item(1, "5X112-bolt, CB 66.6, ET 42MM"),
        item(2, "5X100-bolt, CB 60.1, ET 50MM"),
        item(3, "5X112-bolt, CB 72.6, ET 35MM"),
    ];
    let c = criteria(Some("5X112"), Some(64.1), &[45.0]);
    let once = filter_catalog(items, &c);
    let twice = filter_catalog(once.clone(), &c);
    assert_eq!(ids(&once), ids(&twice));
}

#[test]
fn untagged_item_is_excluded_under_any_active_rule() {
    let result = filter_catalog(vec![untagged(1)], &criteria(Some("5X112"), None, &[]));
    assert!(result.is_empty());

    let result = filter_catalog(vec![untagged(1)], &criteria(None, Some(60.0), &[]));
    assert!(result.is_empty());

    let result = filter_catalog(vec![untagged(1)], &criteria(None, None, &[40.0]));
    assert!(result.is_empty());
}

#[test]
fn empty_tag_string_is_excluded_under_an_active_rule() {
    let result = filter_catalog(vec![item(1, "")], &criteria(Some("5X112"), None, &[]));
    assert!(result.is_empty());
}

#[test]
fn empty_criteria_returns_input_unchanged() {
    let items = vec![item(1, "CB 66.6"), untagged(2)];
    let result = filter_catalog(items, &FilterCriteria::default());
    assert_eq!(ids(&result), vec![1, 2]);
}

#[test]
fn duplicate_ids_are_collapsed_keeping_first_occurrence() {
    let items = vec![
        item(1, "5X112-bolt"),
        item(1, "5X112-bolt"),
        item(2, "5X112-bolt"),
    ];
    let result = filter_catalog(items, &criteria(Some("5X112"), None, &[]));
    assert_eq!(ids(&result), vec![1, 2]);
}

// ---------------------------------------------------------------------------
// Criteria parsing
// ---------------------------------------------------------------------------

#[test]
fn from_raw_parses_all_fields() {
    let c = FilterCriteria::from_raw(Some("5X112"), Some("64.1"), Some("35, 45"))
        .expect("valid criteria");
    assert_eq!(c.bolt_pattern.as_deref(), Some("5X112"));
    assert_eq!(c.central_bore_min, Some(64.1));
    assert_eq!(c.offsets, vec![35.0, 45.0]);
}

#[test]
fn from_raw_treats_blank_values_as_absent() {
    let c = FilterCriteria::from_raw(Some("  "), Some(""), Some(" ")).expect("valid criteria");
    assert!(c.is_empty());
}

#[test]
fn from_raw_rejects_non_numeric_central_bore() {
    let err = FilterCriteria::from_raw(None, Some("wide"), None).unwrap_err();
    assert_eq!(err.field, "central_bore");
    assert!(err.to_string().contains("wide"), "message names the value: {err}");
}

#[test]
fn from_raw_rejects_non_numeric_offset_entry() {
    let err = FilterCriteria::from_raw(None, None, Some("35,deep,45")).unwrap_err();
    assert_eq!(err.field, "offset");
    assert!(err.to_string().contains("deep"), "message names the value: {err}");
}
