//! Case-insensitive substring filtering of candidate lists.
//!
//! Both [`filter`] and [`match_ranges`] fold case one `char` at a time, so a
//! label matches exactly when it has at least one match range.

use std::ops::Range;

/// Fold a string to lowercase, one `char` at a time.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Whether `label` contains `query`, ignoring case.
///
/// An empty query matches every label.
pub fn matches(label: &str, query: &str) -> bool {
    query.is_empty() || fold_case(label).contains(&fold_case(query))
}

/// Keep the candidates whose label contains `query`, ignoring case.
///
/// Relative order is preserved. An empty query returns the whole list.
///
/// # Example
///
/// ```
/// use typeahead::filter::filter;
///
/// let fruits = vec!["Apple", "Banana", "Grape"];
/// let visible = filter(&fruits, "AP", |f| f.to_string());
/// assert_eq!(visible, vec!["Apple", "Grape"]);
/// ```
pub fn filter<T, F>(candidates: &[T], query: &str, label: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> String,
{
    if query.is_empty() {
        return candidates.to_vec();
    }

    let needle = fold_case(query);
    candidates
        .iter()
        .filter(|candidate| fold_case(&label(candidate)).contains(&needle))
        .cloned()
        .collect()
}

/// Byte ranges of `label` matched by `query`, ignoring case.
///
/// Matches are non-overlapping and scanned left to right. Ranges always
/// fall on `char` boundaries of the original label, so they can be used to
/// slice it for highlighting. An empty query yields no ranges.
pub fn match_ranges(label: &str, query: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    // Folded chars paired with the byte span of the char they came from.
    let folded: Vec<(char, Range<usize>)> = label
        .char_indices()
        .flat_map(|(start, c)| {
            let span = start..start + c.len_utf8();
            c.to_lowercase().map(move |lower| (lower, span.clone()))
        })
        .collect();

    let mut ranges = Vec::new();
    let mut i = 0;
    while i + needle.len() <= folded.len() {
        let window = &folded[i..i + needle.len()];
        if window.iter().map(|(c, _)| *c).eq(needle.iter().copied()) {
            let start = window[0].1.start;
            let end = window[needle.len() - 1].1.end;
            ranges.push(start..end);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &&str) -> String {
        s.to_string()
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let items = vec!["Apple", "Banana", "Grape"];
        assert_eq!(filter(&items, "", label), items);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let items = vec!["Apple", "Banana", "Grape"];
        assert_eq!(filter(&items, "an", label), vec!["Banana"]);
        assert_eq!(filter(&items, "APE", label), vec!["Grape"]);
        assert_eq!(filter(&items, "a", label), items);
        assert!(filter(&items, "xyz", label).is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let items = vec!["cab", "abc", "bca", "xyz"];
        assert_eq!(filter(&items, "ab", label), vec!["cab", "abc"]);
    }

    #[test]
    fn test_matches() {
        assert!(matches("Banana", ""));
        assert!(matches("Banana", "NAN"));
        assert!(!matches("Banana", "nab"));
    }

    #[test]
    fn test_match_ranges() {
        assert_eq!(match_ranges("Banana", "an"), vec![1..3, 3..5]);
        assert_eq!(match_ranges("Banana", "ana"), vec![1..4]);
        assert_eq!(match_ranges("Apple", "P"), vec![1..2, 2..3]);
        assert!(match_ranges("Apple", "").is_empty());
        assert!(match_ranges("Apple", "z").is_empty());
    }

    #[test]
    fn test_match_ranges_non_ascii() {
        let ranges = match_ranges("Crème Brûlée", "BRÛ");
        assert_eq!(ranges.len(), 1);
        assert_eq!(&"Crème Brûlée"[ranges[0].clone()], "Brû");
    }

    #[test]
    fn test_filter_and_ranges_agree() {
        let labels = ["Straße", "STRASSE", "Ωmega", "ωmega"];
        for query in ["stra", "ω", "mega", "ß"] {
            for l in labels {
                assert_eq!(matches(l, query), !match_ranges(l, query).is_empty(), "{l} / {query}");
            }
        }
    }
}
