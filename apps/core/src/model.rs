use serde::{Deserialize, Serialize};

/// One launchable application as reported by the host.
///
/// Entries are identified by `path`; two entries may share a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: String,
    folded_name: Vec<char>,
}

impl Entry {
    pub fn new(name: &str, path: &str) -> Self {
        Self::from_owned(name.to_string(), path.to_string())
    }

    pub fn from_owned(name: String, path: String) -> Self {
        let folded_name = fold_chars(&name);
        Self {
            name,
            path,
            folded_name,
        }
    }

    /// Lower-cased name, one char per char of `name` so indices line up.
    pub fn folded_name(&self) -> &[char] {
        &self.folded_name
    }
}

/// Half-open `[start, end)` char range inside an entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub entry: Entry,
    pub spans: Vec<MatchSpan>,
    /// Ranking key; higher is better. Always 0 in browse mode.
    pub quality: u32,
}

impl SearchResult {
    pub fn browse(entry: Entry) -> Self {
        Self {
            entry,
            spans: Vec::new(),
            quality: 0,
        }
    }
}

pub fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

pub fn fold_chars(input: &str) -> Vec<char> {
    input.chars().map(fold_char).collect()
}

pub fn normalize_query(input: &str) -> Vec<char> {
    fold_chars(input.trim())
}

#[cfg(test)]
mod tests {
    use super::{normalize_query, Entry};

    #[test]
    fn folded_name_keeps_char_alignment() {
        let entry = Entry::new("İstanbul Maps", "/Applications/Maps.app");
        assert_eq!(entry.folded_name().len(), entry.name.chars().count());
        assert_eq!(entry.folded_name()[1], 's');
    }

    #[test]
    fn query_is_trimmed_and_lowercased() {
        let normalized: String = normalize_query("  CaL ").into_iter().collect();
        assert_eq!(normalized, "cal");
    }
}
