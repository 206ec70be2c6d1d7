//! Merge properties over realistic classified batches

use mcp_radar::{merge, Category, Enricher, Entry, RawEntry, Snapshot};

fn classified(batch: &[(&str, &str, u64)]) -> Vec<Entry> {
    let enricher = Enricher::new();
    batch
        .iter()
        .map(|(name, description, stars)| {
            let mut raw = RawEntry::new(*name, *description, format!("https://github.com/{}", name));
            raw.stars = *stars;
            raw.forks = stars / 3;
            enricher.enrich(raw)
        })
        .collect()
}

fn day_one() -> Vec<Entry> {
    classified(&[
        ("acme/pg", "Postgres database server for MCP", 120),
        ("acme/search", "Web search with Brave", 40),
        ("acme/misc", "Weather lookups", 15),
        ("tools/fs", "Filesystem access for agents", 80),
    ])
}

fn day_two() -> Vec<Entry> {
    classified(&[
        ("acme/pg", "Postgres database server for MCP, now with SQLite", 90),
        ("acme/misc", "Weather lookups for travel planning", 15),
        ("new/slack", "Slack messaging bridge", 5),
    ])
}

#[test]
fn test_no_name_is_ever_lost() {
    let first = merge(Snapshot::new(), day_one()).snapshot;
    let second = merge(first.clone(), day_two()).snapshot;

    for name in first.names() {
        assert!(second.contains(name), "{} disappeared", name);
    }
    assert!(second.contains("new/slack"));
    assert_eq!(second.len(), 5);
}

#[test]
fn test_merge_is_idempotent() {
    let first = merge(Snapshot::new(), day_one()).snapshot;
    let once = merge(first.clone(), day_two()).snapshot;
    let twice = merge(once.clone(), day_two()).snapshot;
    assert_eq!(once, twice);

    let again = merge(first.clone(), first.clone().into_entries()).snapshot;
    assert_eq!(again, first);
}

#[test]
fn test_stars_and_sets_never_shrink() {
    let first = merge(Snapshot::new(), day_one()).snapshot;
    let second = merge(first.clone(), day_two()).snapshot;

    for before in first.entries() {
        let after = second.get(&before.name).unwrap();
        assert!(after.stars >= before.stars);
        assert!(after.forks >= before.forks);
        assert!(after.keywords.is_superset(&before.keywords));
        assert!(after.signals.is_superset(&before.signals));
        assert!(after.techstack.is_superset(&before.techstack));
    }
    assert_eq!(second.get("acme/pg").unwrap().stars, 120);
}

#[test]
fn test_specific_category_is_sticky() {
    let first = merge(Snapshot::new(), day_one()).snapshot;
    assert_eq!(first.get("acme/misc").unwrap().category, Category::General);

    let second = merge(first, day_two()).snapshot;
    let misc = second.get("acme/misc").unwrap();
    assert_eq!(misc.category, Category::Travel);
    assert_eq!(misc.description, "Weather lookups for travel planning");

    let regressed = classified(&[("acme/misc", "Weather lookups", 15)]);
    let third = merge(second, regressed).snapshot;
    assert_eq!(third.get("acme/misc").unwrap().category, Category::Travel);
}

#[test]
fn test_stats_partition_the_result() {
    let first = merge(Snapshot::new(), day_one()).snapshot;
    let outcome = merge(first.clone(), day_two());

    assert_eq!(outcome.stats.inserted, 1);
    assert_eq!(outcome.stats.updated, 2);
    assert_eq!(outcome.stats.carried_forward, 2);
    assert_eq!(
        outcome.stats.updated + outcome.stats.carried_forward,
        first.len()
    );
    assert_eq!(
        outcome.snapshot.len(),
        first.len() + outcome.stats.inserted
    );
}
