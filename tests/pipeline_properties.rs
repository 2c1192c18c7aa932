//! Properties of the filter -> sort -> paginate pipeline.

use paperdash::pipeline::{self, filter, filter_sort, matches, run};
use paperdash::query::{SortKey, SortOrder};
use paperdash::record::{Journal, Paper, PaperId, SubjectArea};
use proptest::prelude::*;

const WORDS: &[&str] = &["alpha", "Beta", "gamma", "Delta", "cancer", "Cell"];
const DATES: &[&str] = &["2022-06-15", "2023-01-01", "2024-03-10", "not a date"];

/// Records whose id is their input position.
fn records_strategy() -> impl Strategy<Value = Vec<Paper>> {
    prop::collection::vec(
        (
            prop::sample::select(WORDS),
            prop::option::of(prop::sample::select(WORDS)),
            prop::option::of(0u8..4),
            prop::sample::select(DATES),
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(idx, (title, subject, impact, date))| {
                let mut p = Paper::new(PaperId::Num(idx as i64));
                p.papertitle = Some(format!("{} study", title));
                p.salevelone = subject.map(|s| SubjectArea {
                    name: Some(s.to_string()),
                });
                p.journal = impact.map(|i| Journal {
                    impactfactor: Some(f64::from(i) * 1.5),
                    ..Default::default()
                });
                p.published_at = Some(date.to_string());
                p
            })
            .collect()
    })
}

fn key_strategy() -> impl Strategy<Value = SortKey> {
    prop::sample::select(vec![SortKey::Date, SortKey::Impact, SortKey::Title])
}

fn order_strategy() -> impl Strategy<Value = SortOrder> {
    prop::sample::select(vec![SortOrder::Asc, SortOrder::Desc])
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["", "a", "CELL", "study", "delta", "zzz", "gAm"])
        .prop_map(str::to_string)
}

fn ids(items: &[&Paper]) -> Vec<PaperId> {
    items.iter().map(|p| p.id.clone()).collect()
}

fn position(p: &Paper) -> i64 {
    match p.id {
        PaperId::Num(n) => n,
        PaperId::Text(_) => -1,
    }
}

proptest! {
    #[test]
    fn total_items_counts_matches(
        records in records_strategy(),
        query in query_strategy(),
        key in key_strategy(),
        order in order_strategy(),
        page_size in 1usize..12,
        page in 1usize..6,
    ) {
        let expected = records.iter().filter(|p| matches(p, &query)).count();
        let result = run(&records, &query, key, order, page_size, page);
        prop_assert_eq!(result.total_items, expected);
        prop_assert_eq!(result.total_pages, expected.div_ceil(page_size));
    }

    #[test]
    fn filtering_is_idempotent(records in records_strategy(), query in query_strategy()) {
        let once: Vec<Paper> = filter(&records, &query).into_iter().cloned().collect();
        let twice = filter(&once, &query);
        prop_assert_eq!(ids(&twice), once.iter().map(|p| p.id.clone()).collect::<Vec<_>>());
    }

    #[test]
    fn sort_is_stable_in_both_directions(
        records in records_strategy(),
        key in key_strategy(),
        order in order_strategy(),
    ) {
        let sorted = filter_sort(&records, "", key, order);
        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let tie = match key {
                SortKey::Date => a.published_at() == b.published_at(),
                SortKey::Impact => a.impact_factor() == b.impact_factor(),
                SortKey::Title => a.title() == b.title(),
            };
            if tie {
                prop_assert!(position(a) < position(b));
            }
        }
    }

    #[test]
    fn desc_mirrors_asc_on_distinct_keys(records in records_strategy()) {
        let asc = filter_sort(&records, "", SortKey::Impact, SortOrder::Asc);
        let desc = filter_sort(&records, "", SortKey::Impact, SortOrder::Desc);
        let asc_keys: Vec<f64> = asc.iter().map(|p| p.impact_factor()).collect();
        let mut desc_keys: Vec<f64> = desc.iter().map(|p| p.impact_factor()).collect();
        desc_keys.reverse();
        prop_assert_eq!(asc_keys, desc_keys);
    }

    #[test]
    fn pages_cover_the_set_exactly_once(
        records in records_strategy(),
        query in query_strategy(),
        key in key_strategy(),
        order in order_strategy(),
        page_size in 1usize..12,
    ) {
        let full = filter_sort(&records, &query, key, order);
        let total_pages = pipeline::total_pages(full.len(), page_size);

        let mut joined = Vec::new();
        for page in 1..=total_pages {
            let result = run(&records, &query, key, order, page_size, page);
            prop_assert!(!result.items.is_empty());
            prop_assert!(result.items.len() <= page_size);
            prop_assert_eq!(result.start_index_display, (page - 1) * page_size + 1);
            prop_assert_eq!(result.end_index_display, (page - 1) * page_size + result.items.len());
            joined.extend(ids(&result.items));
        }
        prop_assert_eq!(joined, ids(&full));

        let past_end = run(&records, &query, key, order, page_size, total_pages + 1);
        prop_assert!(past_end.items.is_empty());
    }
}
