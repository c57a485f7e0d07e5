use std::collections::HashSet;
use std::fs;

use anyhow::Result;
use serde_json::json;

use catalog_matcher::{
    ExportedItem, InvalidRecordPolicy, MatchPipeline, MatcherConfig, SourceCatalog, SourceRecord,
};

fn record(id: &str, name: &str, brand: Option<&str>, size: Option<&str>, codes: &[&str]) -> SourceRecord {
    SourceRecord {
        id: id.to_string(),
        name: name.to_string(),
        brand: brand.map(String::from),
        size: size.map(String::from),
        codes: codes.iter().map(|c| c.to_string()).collect(),
        payload: json!({ "id": id, "name": name }),
    }
}

fn catalog(name: &str, records: Vec<SourceRecord>) -> SourceCatalog {
    SourceCatalog {
        name: name.to_string(),
        records,
    }
}

/// Three sources, one shampoo each, three brand spellings, no shared codes:
/// brand clustering plus alias matching must land all three records in a
/// single group with no two members from the same source.
#[test]
fn three_brand_spellings_converge_into_one_group() -> Result<()> {
    let catalogs = vec![
        catalog(
            "supplier_a",
            vec![record("p1", "Acme Shampoo 250 ml", Some("Acme"), Some("250 ml"), &[])],
        ),
        catalog(
            "supplier_b",
            vec![record(
                "77",
                "ACME Professional Shampoo",
                Some("ACME Professional"),
                Some("250 ml"),
                &[],
            )],
        ),
        catalog(
            "supplier_c",
            vec![record("x9", "shampoo acme 250 ml", Some("acme"), Some("250 ml"), &[])],
        ),
    ];

    let outcome = MatchPipeline::new(MatcherConfig::default()).run(&catalogs)?;

    assert_eq!(outcome.groups.len(), 1);
    let group = &outcome.groups[0];
    assert_eq!(group.len(), 3);

    let sources: HashSet<_> = group.iter().map(|m| m.source.as_str()).collect();
    assert_eq!(sources.len(), 3, "no two members share a source");
    Ok(())
}

/// Items sharing a code co-group under every source order permutation.
#[test]
fn code_matches_survive_source_order_permutations() -> Result<()> {
    let base = [
        catalog(
            "s1",
            vec![record("a", "Foo Cream", Some("Brando"), Some("50 ml"), &["4001"])],
        ),
        catalog(
            "s2",
            vec![record("b", "Foo Creme", Some("Brando"), Some("50 ml"), &["4001"])],
        ),
        catalog(
            "s3",
            vec![record("c", "Bar Lotion", Some("Brando"), Some("50 ml"), &["9999"])],
        ),
    ];

    for order in [[0usize, 1, 2], [1, 0, 2], [2, 1, 0], [2, 0, 1]] {
        let permuted: Vec<_> = order.iter().map(|&i| base[i].clone()).collect();
        let outcome = MatchPipeline::new(MatcherConfig::default()).run(&permuted)?;

        let coded_group: Vec<&ExportedItem> = outcome
            .groups
            .iter()
            .flatten()
            .filter(|m| m.code.as_deref() == Some("4001"))
            .collect();
        assert_eq!(coded_group.len(), 2, "order {order:?}");

        let containing: Vec<_> = outcome
            .groups
            .iter()
            .filter(|g| g.iter().any(|m| m.code.as_deref() == Some("4001")))
            .collect();
        assert_eq!(containing.len(), 1, "both records in one group, order {order:?}");
    }
    Ok(())
}

/// No record may appear in two final groups.
#[test]
fn final_groups_are_disjoint() -> Result<()> {
    let catalogs = vec![
        catalog(
            "s1",
            vec![
                // Shares two codes with s2's record: must not yield two groups
                record("a", "Acme Shampoo 250 ml", Some("Acme"), Some("250 ml"), &["111", "222"]),
                record("b", "Acme Soap 100 g", Some("Acme"), Some("100 g"), &[]),
            ],
        ),
        catalog(
            "s2",
            vec![
                record("k", "ACME Shampoo", Some("ACME"), Some("250 ml"), &["111", "222"]),
                record("m", "Soap ACME 100 g", Some("ACME"), Some("100 g"), &[]),
            ],
        ),
    ];

    let outcome = MatchPipeline::new(MatcherConfig::default()).run(&catalogs)?;

    let mut seen: HashSet<(String, String)> = HashSet::new();
    for group in &outcome.groups {
        for member in group {
            let key = (member.source.clone(), member.id.clone());
            assert!(seen.insert(key), "record {member:?} appears in two groups");
        }
    }
    Ok(())
}

/// Raising the alias threshold to 100 keeps only byte-identical alias text.
#[test]
fn threshold_100_requires_identical_aliases() -> Result<()> {
    let catalogs = vec![
        catalog(
            "s1",
            vec![record("a", "Brando Repair Shampoo", Some("Brando"), Some("250 ml"), &[])],
        ),
        catalog(
            "s2",
            vec![record("b", "Brando Repair Lotion", Some("Brando"), Some("250 ml"), &[])],
        ),
        catalog(
            "s3",
            vec![record("c", "Brando Repair Shampoo", Some("Brando"), Some("250 ml"), &[])],
        ),
    ];

    let strict = MatcherConfig {
        alias_similarity_threshold: 100,
        ..MatcherConfig::default()
    };
    let outcome = MatchPipeline::new(strict).run(&catalogs)?;

    assert_eq!(outcome.groups.len(), 1);
    let ids: HashSet<_> = outcome.groups[0].iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, HashSet::from(["a", "c"]));
    Ok(())
}

/// Lowering the alias threshold to 0 merges every same-brand/weight bucket.
#[test]
fn threshold_0_merges_whole_buckets() -> Result<()> {
    let catalogs = vec![
        catalog(
            "s1",
            vec![record("a", "Brando Red Soap", Some("Brando"), Some("100 g"), &[])],
        ),
        catalog(
            "s2",
            vec![record("b", "Brando Green Lotion", Some("Brando"), Some("100 g"), &[])],
        ),
    ];

    let loose = MatcherConfig {
        alias_similarity_threshold: 0,
        ..MatcherConfig::default()
    };
    let outcome = MatchPipeline::new(loose).run(&catalogs)?;

    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.groups[0].len(), 2);
    Ok(())
}

/// Stage counters reflect what each stage did.
#[test]
fn stats_expose_per_stage_counts() -> Result<()> {
    let catalogs = vec![
        catalog(
            "s1",
            vec![
                record("1", "Acme Shampoo 250 ml", Some("Acme"), Some("250 ml"), &["111"]),
                record("2", "Acme Soap 100 g", Some("Acme"), Some("100 g"), &[]),
            ],
        ),
        catalog(
            "s2",
            vec![
                record("a", "ACME Shampoo", Some("ACME"), Some("250 ml"), &["111"]),
                record("b", "Soap ACME 100 g", Some("ACME"), Some("100 g"), &[]),
            ],
        ),
    ];

    let outcome = MatchPipeline::new(MatcherConfig::default()).run(&catalogs)?;

    assert_eq!(
        outcome.stats.items_loaded,
        vec![("s1".to_string(), 2), ("s2".to_string(), 2)]
    );
    assert_eq!(outcome.stats.combined_by_code, 1);
    assert_eq!(outcome.stats.unique_brands, 1);
    assert_eq!(outcome.stats.combined_by_alias, 1);
    assert_eq!(outcome.stats.final_groups, 2);
    Ok(())
}

/// The exported shape survives a JSON round trip, with `code` as null when
/// absent. This is the contract the output writer relies on.
#[test]
fn exported_groups_round_trip_through_json() -> Result<()> {
    let catalogs = vec![
        catalog(
            "s1",
            vec![record("1", "Acme Shampoo 250 ml", Some("Acme"), Some("250 ml"), &[])],
        ),
        catalog(
            "s2",
            vec![record("2", "ACME Shampoo", Some("ACME"), Some("250 ml"), &[])],
        ),
    ];

    let outcome = MatchPipeline::new(MatcherConfig::default()).run(&catalogs)?;
    assert_eq!(outcome.groups.len(), 1);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("results.json");
    fs::write(&path, serde_json::to_string_pretty(&outcome.groups)?)?;

    let raw = fs::read_to_string(&path)?;
    let parsed: Vec<Vec<ExportedItem>> = serde_json::from_str(&raw)?;
    assert_eq!(parsed, outcome.groups);

    let value: serde_json::Value = serde_json::from_str(&raw)?;
    assert!(value[0][0]["code"].is_null());
    Ok(())
}

/// A record missing its name fails the whole run under the fail policy but
/// only costs that record under the default skip policy.
#[test]
fn invalid_record_policies_behave_as_configured() -> Result<()> {
    let catalogs = vec![catalog(
        "s1",
        vec![
            record("1", "Acme Shampoo", Some("Acme"), None, &[]),
            record("2", "", Some("Acme"), None, &[]),
        ],
    )];

    let skip = MatchPipeline::new(MatcherConfig::default()).run(&catalogs)?;
    assert_eq!(skip.stats.records_skipped, 1);
    assert_eq!(skip.stats.items_loaded, vec![("s1".to_string(), 1)]);

    let fail_config = MatcherConfig {
        on_invalid_record: InvalidRecordPolicy::Fail,
        ..MatcherConfig::default()
    };
    assert!(MatchPipeline::new(fail_config).run(&catalogs).is_err());
    Ok(())
}
