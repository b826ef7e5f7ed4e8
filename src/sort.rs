//! Client-side ordering of list items.
//!
//! Used for title sorts in every mode and for all sorts in search mode. In
//! discover mode with a non-title sort the catalog's own paging order is kept.

use crate::api::ListItem;
use crate::filters::SortBy;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static LEADING_ARTICLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(the|a|an)\s+").unwrap());

/// Comparison key for title sorts: lowercase, diacritics stripped, one
/// leading English article removed, punctuation collapsed to single spaces.
pub fn normalize_title(item: &ListItem) -> String {
    let lower = item.display_title().to_lowercase();
    let stripped: String = lower.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    let without_article = LEADING_ARTICLE.replace(&stripped, "");

    let mut out = String::with_capacity(without_article.len());
    let mut pending_space = false;
    for c in without_article.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Case-insensitive comparison where digit runs compare by numeric value,
/// so "rocky 2" sorts before "rocky 10".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let na = take_digits(&mut ai);
                let nb = take_digits(&mut bi);
                let ord = cmp_digit_runs(&na, &nb);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                let ord = ca.to_lowercase().cmp(cb.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut s = String::new();
    while let Some(c) = it.peek().copied().filter(|c| c.is_ascii_digit()) {
        s.push(c);
        it.next();
    }
    s
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// `None` for absent or malformed dates, which order as the earliest date.
pub fn release_date(item: &ListItem) -> Option<NaiveDate> {
    let raw = item.release_date.as_deref()?.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

fn rating_or(item: &ListItem, missing: f64) -> f64 {
    item.vote_average.filter(|r| !r.is_nan()).unwrap_or(missing)
}

/// Sorts `items` in place. Stable, so equal keys keep their fetched order.
pub fn sort_items(items: &mut [ListItem], sort: SortBy) {
    match sort {
        SortBy::None => {}
        SortBy::RatingDesc => items.sort_by(|a, b| {
            rating_or(b, f64::NEG_INFINITY).total_cmp(&rating_or(a, f64::NEG_INFINITY))
        }),
        SortBy::RatingAsc => items.sort_by(|a, b| {
            rating_or(a, f64::INFINITY).total_cmp(&rating_or(b, f64::INFINITY))
        }),
        SortBy::DateDesc => items.sort_by(|a, b| release_date(b).cmp(&release_date(a))),
        SortBy::DateAsc => items.sort_by(|a, b| release_date(a).cmp(&release_date(b))),
        SortBy::TitleAsc => {
            items.sort_by_cached_key(|m| (TitleKey(normalize_title(m)), m.id));
        }
        SortBy::TitleDesc => {
            items.sort_by_cached_key(|m| std::cmp::Reverse((TitleKey(normalize_title(m)), m.id)));
        }
    }
}

struct TitleKey(String);

impl PartialEq for TitleKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TitleKey {}

impl Ord for TitleKey {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(&self.0, &other.0)
    }
}

impl PartialOrd for TitleKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(id: u64, title: &str) -> ListItem {
        ListItem { id, title: title.to_string(), ..Default::default() }
    }

    fn rated(id: u64, rating: Option<f64>) -> ListItem {
        ListItem { id, vote_average: rating, ..Default::default() }
    }

    fn dated(id: u64, date: Option<&str>) -> ListItem {
        ListItem { id, release_date: date.map(str::to_string), ..Default::default() }
    }

    fn ids(items: &[ListItem]) -> Vec<u64> {
        items.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title(&titled(1, "The Matrix")), "matrix");
        assert_eq!(normalize_title(&titled(2, "Amélie")), "amelie");
        assert_eq!(normalize_title(&titled(3, "A Beautiful Mind")), "beautiful mind");
        assert_eq!(normalize_title(&titled(4, "Spider-Man: No Way Home")), "spider man no way home");
        // Only a single leading article is removed
        assert_eq!(normalize_title(&titled(5, "The The")), "the");
        // An article without a following word is the title itself
        assert_eq!(normalize_title(&titled(6, "A")), "a");
    }

    #[test]
    fn test_title_asc_ignores_articles() {
        let mut items = vec![titled(1, "The Matrix"), titled(2, "Amelie"), titled(3, "A Beautiful Mind")];
        sort_items(&mut items, SortBy::TitleAsc);
        let titles: Vec<&str> = items.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Amelie", "A Beautiful Mind", "The Matrix"]);
    }

    #[test]
    fn test_title_ties_break_on_id() {
        let mut items = vec![titled(9, "Heat"), titled(2, "heat"), titled(5, "The Heat")];
        sort_items(&mut items, SortBy::TitleAsc);
        assert_eq!(ids(&items), [2, 5, 9]);
        sort_items(&mut items, SortBy::TitleDesc);
        assert_eq!(ids(&items), [9, 5, 2]);
    }

    #[test]
    fn test_title_numeric_aware() {
        let mut items = vec![titled(1, "Rocky 10"), titled(2, "Rocky 2"), titled(3, "Rocky")];
        sort_items(&mut items, SortBy::TitleAsc);
        assert_eq!(ids(&items), [3, 2, 1]);
    }

    #[test]
    fn test_rating_missing_values() {
        let mut items = vec![rated(1, Some(7.0)), rated(2, None), rated(3, Some(9.0))];
        sort_items(&mut items, SortBy::RatingDesc);
        assert_eq!(ids(&items), [3, 1, 2]);

        let mut items = vec![rated(1, Some(7.0)), rated(2, None), rated(3, Some(9.0))];
        sort_items(&mut items, SortBy::RatingAsc);
        assert_eq!(ids(&items), [1, 3, 2]);
    }

    #[test]
    fn test_malformed_dates_are_earliest() {
        let mut items = vec![
            dated(1, Some("2001-05-01")),
            dated(2, Some("not a date")),
            dated(3, None),
            dated(4, Some("1999-12-31")),
        ];
        sort_items(&mut items, SortBy::DateDesc);
        assert_eq!(ids(&items), [1, 4, 2, 3]);
        sort_items(&mut items, SortBy::DateAsc);
        assert_eq!(ids(&items), [2, 3, 4, 1]);
    }

    #[test]
    fn test_none_keeps_order() {
        let mut items = vec![rated(3, Some(1.0)), rated(1, Some(9.0))];
        sort_items(&mut items, SortBy::None);
        assert_eq!(ids(&items), [3, 1]);
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("a2", "a10"), Ordering::Less);
        assert_eq!(natural_cmp("A", "a"), Ordering::Equal);
        assert_eq!(natural_cmp("007", "7"), Ordering::Equal);
        assert_eq!(natural_cmp("b", "a"), Ordering::Greater);
    }
}
