use crate::catalog::Catalog;
use crate::model::{normalize_query, Entry, MatchSpan, SearchResult};

/// Minimum similarity, in permille, for an entry to be kept.
///
/// 600 lets a three-char query carry one typo when the match starts at the
/// front of the name ("cak" finds Calculator) but not five chars in ("cal"
/// does not find Terminal).
pub const DEFAULT_THRESHOLD: u32 = 600;

/// Permille taken off the similarity per char of match offset.
const START_COST: u32 = 15;
/// Offsets past this cost no more, so an exact substring always scores 850.
const MAX_COSTED_START: usize = 10;

const MAX_START_PENALTY: usize = 99;

/// How well a query aligned against one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    /// `(query_len - edits) * 1000 / query_len`, minus `START_COST` per char
    /// of `start` up to `MAX_COSTED_START`.
    pub similarity: u32,
    pub edits: usize,
    pub start: usize,
    pub spans: Vec<MatchSpan>,
}

impl NameMatch {
    pub fn passes(&self, threshold: u32) -> bool {
        self.similarity >= threshold
    }

    pub fn quality(&self) -> u32 {
        let start_penalty = self.start.min(MAX_START_PENALTY) as u32;
        self.similarity * 100 + (MAX_START_PENALTY as u32 - start_penalty)
    }
}

pub fn search(catalog: &Catalog, query: &str) -> Vec<SearchResult> {
    search_with_threshold(catalog, query, DEFAULT_THRESHOLD)
}

pub fn search_with_threshold(catalog: &Catalog, query: &str, threshold: u32) -> Vec<SearchResult> {
    let normalized_query = normalize_query(query);
    if normalized_query.is_empty() {
        return catalog
            .entries()
            .iter()
            .cloned()
            .map(SearchResult::browse)
            .collect();
    }

    let mut scored: Vec<(u32, usize, &Entry, Vec<MatchSpan>)> = catalog
        .entries()
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let matched = match_name(entry.folded_name(), &normalized_query)?;
            if !matched.passes(threshold) {
                return None;
            }
            Some((matched.quality(), index, entry, matched.spans))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.2.folded_name().cmp(b.2.folded_name()))
            .then_with(|| a.1.cmp(&b.1))
    });

    scored
        .into_iter()
        .map(|(quality, _, entry, spans)| SearchResult {
            entry: entry.clone(),
            spans,
            quality,
        })
        .collect()
}

/// Aligns `query` against the best-fitting substring of `name` using
/// optimal-string-alignment distance (insert, delete, substitute, swap
/// adjacent). Both inputs are expected to be folded already.
///
/// Every end column with fewer edits than the query length is a candidate;
/// the one with the highest position-weighted similarity wins, the earliest
/// end on ties.
pub fn match_name(name: &[char], query: &[char]) -> Option<NameMatch> {
    if name.is_empty() || query.is_empty() {
        return None;
    }

    let table = AlignTable::fill(name, query);
    let mut best: Option<NameMatch> = None;
    for end in 0..table.cols {
        let edits = table.get(query.len(), end);
        if edits >= query.len() {
            continue;
        }
        if let Some(current) = &best {
            if edit_similarity(query.len(), edits) <= current.similarity {
                continue;
            }
        }

        let (start, matched) = table.trace(name, query, end);
        let similarity = weighted_similarity(query.len(), edits, start);
        if best.as_ref().map_or(true, |b| similarity > b.similarity) {
            best = Some(NameMatch {
                similarity,
                edits,
                start,
                spans: merge_positions(matched),
            });
        }
    }
    best
}

fn edit_similarity(query_len: usize, edits: usize) -> u32 {
    ((query_len - edits) * 1000 / query_len) as u32
}

fn weighted_similarity(query_len: usize, edits: usize, start: usize) -> u32 {
    let offset_cost = start.min(MAX_COSTED_START) as u32 * START_COST;
    edit_similarity(query_len, edits).saturating_sub(offset_cost)
}

struct AlignTable {
    cells: Vec<usize>,
    cols: usize,
}

impl AlignTable {
    fn fill(name: &[char], query: &[char]) -> Self {
        let rows = query.len() + 1;
        let cols = name.len() + 1;
        let mut table = Self {
            cells: vec![0usize; rows * cols],
            cols,
        };

        for i in 1..rows {
            table.set(i, 0, i);
            for j in 1..cols {
                let substitution = usize::from(query[i - 1] != name[j - 1]);
                let mut best = (table.get(i - 1, j) + 1)
                    .min(table.get(i, j - 1) + 1)
                    .min(table.get(i - 1, j - 1) + substitution);
                if i > 1 && j > 1 && query[i - 1] == name[j - 2] && query[i - 2] == name[j - 1] {
                    best = best.min(table.get(i - 2, j - 2) + 1);
                }
                table.set(i, j, best);
            }
        }
        table
    }

    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    fn set(&mut self, i: usize, j: usize, value: usize) {
        self.cells[i * self.cols + j] = value;
    }

    /// Walks back from `(query.len(), end)`; returns the start column and the
    /// name positions that matched a query char exactly or by swap.
    fn trace(&self, name: &[char], query: &[char], end: usize) -> (usize, Vec<usize>) {
        let mut matched = Vec::with_capacity(query.len());
        let (mut i, mut j) = (query.len(), end);
        while i > 0 {
            let here = self.get(i, j);
            if j > 0 && query[i - 1] == name[j - 1] && here == self.get(i - 1, j - 1) {
                matched.push(j - 1);
                i -= 1;
                j -= 1;
            } else if i > 1
                && j > 1
                && query[i - 1] == name[j - 2]
                && query[i - 2] == name[j - 1]
                && here == self.get(i - 2, j - 2) + 1
            {
                matched.push(j - 1);
                matched.push(j - 2);
                i -= 2;
                j -= 2;
            } else if j > 0 && here == self.get(i - 1, j - 1) + 1 {
                i -= 1;
                j -= 1;
            } else if here == self.get(i - 1, j) + 1 {
                i -= 1;
            } else {
                j -= 1;
            }
        }
        (j, matched)
    }
}

fn merge_positions(mut positions: Vec<usize>) -> Vec<MatchSpan> {
    positions.sort_unstable();
    positions.dedup();

    let mut spans: Vec<MatchSpan> = Vec::new();
    for position in positions {
        match spans.last_mut() {
            Some(span) if span.end == position => span.end += 1,
            _ => spans.push(MatchSpan::new(position, position + 1)),
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::{match_name, merge_positions};
    use crate::model::{fold_chars, MatchSpan};

    fn run(name: &str, query: &str) -> Option<super::NameMatch> {
        match_name(&fold_chars(name), &fold_chars(query))
    }

    #[test]
    fn merges_adjacent_positions_into_spans() {
        let spans = merge_positions(vec![4, 0, 1, 2, 6, 5]);
        assert_eq!(spans, vec![MatchSpan::new(0, 3), MatchSpan::new(4, 7)]);
    }

    #[test]
    fn exact_prefix_scores_full_similarity() {
        let matched = run("Calculator", "cal").unwrap();
        assert_eq!(matched.similarity, 1000);
        assert_eq!(matched.edits, 0);
        assert_eq!(matched.start, 0);
        assert_eq!(matched.spans, vec![MatchSpan::new(0, 3)]);
    }

    #[test]
    fn substring_match_reports_its_start() {
        let matched = run("Visual Studio Code", "code").unwrap();
        assert_eq!(matched.edits, 0);
        assert_eq!(matched.start, 14);
        assert_eq!(matched.spans, vec![MatchSpan::new(14, 18)]);
    }

    #[test]
    fn transposition_costs_one_edit_and_highlights_both_chars() {
        let matched = run("Safari", "sfaari").unwrap();
        assert_eq!(matched.edits, 1);

        let swapped = run("Terminal", "temrinal").unwrap();
        assert_eq!(swapped.edits, 1);
        assert_eq!(swapped.spans, vec![MatchSpan::new(0, 8)]);
    }

    #[test]
    fn omitted_char_costs_one_edit() {
        let matched = run("Terminal", "termnal").unwrap();
        assert_eq!(matched.edits, 1);
        assert_eq!(matched.start, 0);
        assert_eq!(
            matched.spans,
            vec![MatchSpan::new(0, 4), MatchSpan::new(5, 8)]
        );
    }

    #[test]
    fn late_start_lowers_similarity() {
        let front = run("Calculator", "cak").unwrap();
        assert_eq!(front.edits, 1);
        assert_eq!(front.start, 0);
        assert_eq!(front.similarity, 666);

        let late = run("Terminal", "cal").unwrap();
        assert_eq!(late.edits, 1);
        assert_eq!(late.start, 5);
        assert_eq!(late.similarity, 591);
        assert!(!late.passes(super::DEFAULT_THRESHOLD));
    }

    #[test]
    fn exact_substring_keeps_capped_similarity() {
        let matched = run("Visual Studio Code", "code").unwrap();
        assert_eq!(matched.similarity, 850);
    }

    #[test]
    fn nothing_in_common_is_rejected() {
        assert!(run("Terminal", "xyz").is_none());
        assert!(run("", "abc").is_none());
    }
}
