//! List pipeline: filter -> sort -> paginate.
//!
//! Pure functions over a borrowed record set. Nothing here mutates the
//! records or fails; missing fields degrade to empty text, `0.0` impact
//! factor or the epoch for dates.

use crate::query::{QueryState, SortKey, SortOrder};
use crate::record::Paper;
use std::cmp::Ordering;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// One page of the filtered/sorted set plus pagination metadata.
#[derive(Debug, Clone)]
pub struct PageResult<'a> {
    pub items: Vec<&'a Paper>,
    /// Records matching the filter
    pub total_items: usize,
    /// `ceil(total_items / page_size)`, 0 when nothing matches
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
    /// 1-based index of the first visible record (0 when the slice is empty)
    pub start_index_display: usize,
    /// 1-based inclusive index of the last visible record (0 when the slice is empty)
    pub end_index_display: usize,
}

impl PageResult<'_> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}

/// Whether `paper` matches the free-text query.
///
/// The empty query matches everything. Otherwise the query, as typed, is a
/// case-insensitive substring of title, authors, journal title, publisher
/// or subject area.
pub fn matches(paper: &Paper, query: &str) -> bool {
    let needle = query.to_lowercase();
    matches_lowered(paper, &needle)
}

fn matches_lowered(paper: &Paper, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    paper
        .searchable_fields()
        .iter()
        .any(|field| !field.is_empty() && field.to_lowercase().contains(needle))
}

/// Stage 1: keep records matching `query`, preserving input order.
pub fn filter<'a>(records: &'a [Paper], query: &str) -> Vec<&'a Paper> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|p| matches_lowered(p, &needle))
        .collect()
}

/// Sort value extracted once per record.
enum SortValue {
    Date(i64),
    Impact(f64),
    Title(String, String),
}

impl SortValue {
    fn of(paper: &Paper, key: SortKey) -> Self {
        match key {
            SortKey::Date => SortValue::Date(
                paper
                    .published_at()
                    .map(|dt| dt.timestamp_millis())
                    .unwrap_or(0),
            ),
            SortKey::Impact => SortValue::Impact(paper.impact_factor()),
            SortKey::Title => {
                let title = paper.title();
                SortValue::Title(collation_key(title), title.to_string())
            }
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Impact(a), SortValue::Impact(b)) => a.total_cmp(b),
            (SortValue::Title(ka, a), SortValue::Title(kb, b)) => ka.cmp(kb).then_with(|| a.cmp(b)),
            // Values come from one key, so mixed variants never meet.
            _ => Ordering::Equal,
        }
    }
}

/// Primary collation key: decomposed, combining marks dropped, lowercased.
///
/// Gives "Émile" and "emile" the same primary weight so accented and cased
/// titles interleave the way a locale-aware comparison would.
pub fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locale-aware title comparison used by the `title` sort key.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Stage 2: stable sort. Descending negates the comparator, so equal keys
/// keep their input order in both directions.
pub fn sort(records: &mut Vec<&Paper>, key: SortKey, order: SortOrder) {
    let mut keyed: Vec<(SortValue, &Paper)> = records
        .iter()
        .map(|p| (SortValue::of(p, key), *p))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ord = a.compare(b);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    records.clear();
    records.extend(keyed.into_iter().map(|(_, p)| p));
}

/// Stages 1 and 2: the full filtered/sorted set (what export consumes).
pub fn filter_sort<'a>(
    records: &'a [Paper],
    query: &str,
    key: SortKey,
    order: SortOrder,
) -> Vec<&'a Paper> {
    let mut filtered = filter(records, query);
    sort(&mut filtered, key, order);
    filtered
}

/// Number of pages for `total_items` at `page_size`.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}

/// Stage 3: slice out `page` (1-based). Out-of-range pages yield an empty
/// slice; the caller owns clamping.
pub fn paginate<'a>(sorted: Vec<&'a Paper>, page_size: usize, page: usize) -> PageResult<'a> {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total_items = sorted.len();
    let total_pages = total_pages(total_items, page_size);

    let start = (page - 1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);
    let items: Vec<&Paper> = sorted.into_iter().skip(start).take(end - start).collect();

    let (start_index_display, end_index_display) = if items.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    PageResult {
        items,
        total_items,
        total_pages,
        page,
        page_size,
        start_index_display,
        end_index_display,
    }
}

/// Run the whole pipeline.
pub fn run<'a>(
    records: &'a [Paper],
    query: &str,
    key: SortKey,
    order: SortOrder,
    page_size: usize,
    page: usize,
) -> PageResult<'a> {
    let sorted = filter_sort(records, query, key, order);
    debug!(
        total = records.len(),
        matched = sorted.len(),
        sort_key = %key,
        sort_order = %order,
        page = page,
        "Pipeline run"
    );
    paginate(sorted, page_size, page)
}

/// Run the pipeline for a [`QueryState`].
pub fn run_state<'a>(records: &'a [Paper], state: &QueryState) -> PageResult<'a> {
    run(
        records,
        &state.query,
        state.sort_key,
        state.sort_order,
        state.page_size,
        state.page,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Journal, PaperId, SubjectArea};

    fn paper(id: i64, title: &str, impact: f64, date: &str) -> Paper {
        let mut p = Paper::new(PaperId::Num(id));
        p.papertitle = Some(title.to_string());
        p.journal = Some(Journal {
            title: Some(format!("Journal {}", id)),
            impactfactor: Some(impact),
            ..Default::default()
        });
        p.published_at = Some(date.to_string());
        p
    }

    fn scenario() -> Vec<Paper> {
        vec![
            paper(1, "Alpha Study", 2.1, "2023-01-01"),
            paper(2, "Beta Trial", 5.4, "2022-06-15"),
            paper(3, "Gamma Review", 5.4, "2024-03-10"),
        ]
    }

    fn titles(items: &[&Paper]) -> Vec<String> {
        items.iter().map(|p| p.title().to_string()).collect()
    }

    #[test]
    fn test_impact_desc_keeps_tie_order() {
        let records = scenario();
        let result = run(&records, "", SortKey::Impact, SortOrder::Desc, 10, 1);
        assert_eq!(
            titles(&result.items),
            vec!["Beta Trial", "Gamma Review", "Alpha Study"]
        );
    }

    #[test]
    fn test_impact_asc_keeps_tie_order() {
        let records = scenario();
        let result = run(&records, "", SortKey::Impact, SortOrder::Asc, 10, 1);
        assert_eq!(
            titles(&result.items),
            vec!["Alpha Study", "Beta Trial", "Gamma Review"]
        );
    }

    #[test]
    fn test_query_filters_case_insensitively() {
        let records = scenario();
        let result = run(&records, "gamma", SortKey::Date, SortOrder::Desc, 10, 1);
        assert_eq!(titles(&result.items), vec!["Gamma Review"]);
        assert_eq!(result.total_items, 1);
        assert_eq!(result.total_pages, 1);
    }

    #[test]
    fn test_query_is_not_trimmed() {
        let records = scenario();
        let spaced = run(&records, " review", SortKey::Date, SortOrder::Desc, 10, 1);
        assert_eq!(titles(&spaced.items), vec!["Gamma Review"]);

        // Every title has a single space, none has two
        let space = run(&records, " ", SortKey::Date, SortOrder::Desc, 10, 1);
        assert_eq!(space.total_items, 3);
        let double = run(&records, "  ", SortKey::Date, SortOrder::Desc, 10, 1);
        assert_eq!(double.total_items, 0);
        let tab = run(&records, "\t", SortKey::Date, SortOrder::Desc, 10, 1);
        assert_eq!(tab.total_items, 0);
    }

    #[test]
    fn test_non_finite_impact_sorts_as_zero() -> serde_json::Result<()> {
        let records: Vec<Paper> = serde_json::from_str(
            r#"[
                {"id": 1, "papertitle": "Junk", "journal": {"impactfactor": "NaN"}},
                {"id": 2, "papertitle": "Real", "journal": {"impactfactor": 50}}
            ]"#,
        )?;
        let desc = run(&records, "", SortKey::Impact, SortOrder::Desc, 10, 1);
        assert_eq!(titles(&desc.items), vec!["Real", "Junk"]);
        Ok(())
    }

    #[test]
    fn test_date_sort() {
        let records = scenario();
        let desc = run(&records, "", SortKey::Date, SortOrder::Desc, 10, 1);
        assert_eq!(
            titles(&desc.items),
            vec!["Gamma Review", "Alpha Study", "Beta Trial"]
        );
        let asc = run(&records, "", SortKey::Date, SortOrder::Asc, 10, 1);
        assert_eq!(
            titles(&asc.items),
            vec!["Beta Trial", "Alpha Study", "Gamma Review"]
        );
    }

    #[test]
    fn test_title_sort_is_accent_and_case_insensitive() {
        let records = vec![
            paper(1, "zeta", 1.0, "2020-01-01"),
            paper(2, "Émile", 1.0, "2020-01-01"),
            paper(3, "apple", 1.0, "2020-01-01"),
            paper(4, "Banana", 1.0, "2020-01-01"),
        ];
        let result = run(&records, "", SortKey::Title, SortOrder::Asc, 10, 1);
        assert_eq!(titles(&result.items), vec!["apple", "Banana", "Émile", "zeta"]);
    }

    #[test]
    fn test_filter_searches_all_fields() {
        let mut p = Paper::new(PaperId::Num(1));
        p.coauthors = Some("Jane Doe".to_string());
        p.publishername = Some("Springer Nature".to_string());
        p.salevelone = Some(SubjectArea {
            name: Some("Oncology".to_string()),
        });
        p.journal = Some(Journal {
            title: Some("Cell Reports".to_string()),
            ..Default::default()
        });

        assert!(matches(&p, "doe"));
        assert!(matches(&p, "SPRINGER"));
        assert!(matches(&p, "onco"));
        assert!(matches(&p, "cell"));
        assert!(!matches(&p, "lancet"));
    }

    #[test]
    fn test_missing_fields_do_not_exclude_or_panic() {
        let bare = Paper::new(PaperId::Num(9));
        assert!(matches(&bare, ""));
        assert!(!matches(&bare, "anything"));

        let records = vec![bare.clone(), paper(1, "Alpha Study", 2.1, "2023-01-01")];
        let result = run(&records, "", SortKey::Impact, SortOrder::Asc, 10, 1);
        // Absent impact factor sorts as 0.0
        assert_eq!(result.items[0].id, PaperId::Num(9));
        let result = run(&records, "", SortKey::Title, SortOrder::Asc, 10, 1);
        assert_eq!(result.items[0].id, PaperId::Num(9));
    }

    #[test]
    fn test_paginate_25_records() {
        let records: Vec<Paper> = (0..25)
            .map(|i| paper(i, &format!("Paper {}", i), 1.0, "2020-01-01"))
            .collect();
        let result = run(&records, "", SortKey::Date, SortOrder::Desc, 10, 3);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.items.len(), 5);
        assert_eq!(result.start_index_display, 21);
        assert_eq!(result.end_index_display, 25);
        assert!(!result.has_next_page());
        assert!(result.has_previous_page());
    }

    #[test]
    fn test_no_matches() {
        let records = scenario();
        let result = run(&records, "zzz", SortKey::Date, SortOrder::Desc, 10, 1);
        assert_eq!(result.total_items, 0);
        assert_eq!(result.total_pages, 0);
        assert!(result.is_empty());
        assert_eq!(result.start_index_display, 0);
        assert_eq!(result.end_index_display, 0);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let records = scenario();
        let result = run(&records, "", SortKey::Date, SortOrder::Desc, 2, 7);
        assert!(result.is_empty());
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.total_items, 3);
    }

    #[test]
    fn test_run_does_not_mutate_input() {
        let records = scenario();
        let _ = run(&records, "", SortKey::Title, SortOrder::Desc, 1, 1);
        assert_eq!(records[0].title(), "Alpha Study");
        assert_eq!(records[2].title(), "Gamma Review");
    }

    #[test]
    fn test_compare_titles() {
        assert_eq!(compare_titles("abc", "ABD"), Ordering::Less);
        assert_eq!(compare_titles("é", "e"), Ordering::Greater);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
    }
}
