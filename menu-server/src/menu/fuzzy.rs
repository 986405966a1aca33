//! Typo-tolerant substring matching
//!
//! Each search term is slid over the candidate text in windows of
//! roughly the term's length; the term matches when some window is
//! within the edit-distance budget `floor(threshold * term_len)`.
//! With the default threshold of 0.3 a 7-letter term tolerates two
//! edits, so "samossa" still finds "Samosas".

/// Tuning knobs for the matcher
#[derive(Debug, Clone, Copy)]
pub struct FuzzyConfig {
    /// Edit budget as a fraction of the term length
    pub threshold: f64,
    /// Terms shorter than this fall back to exact substring search
    pub min_term_len: usize,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            min_term_len: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatcher {
    config: FuzzyConfig,
}

impl FuzzyMatcher {
    pub fn new(config: FuzzyConfig) -> Self {
        Self { config }
    }

    /// True when `term` fuzzily occurs anywhere in `text`.
    ///
    /// Matching is case-insensitive. Terms below `min_term_len` use
    /// plain substring containment since an edit budget of zero makes
    /// the windowed search pointless.
    pub fn is_match(&self, term: &str, text: &str) -> bool {
        let term: Vec<char> = term.to_lowercase().chars().collect();
        let text: Vec<char> = text.to_lowercase().chars().collect();
        if term.is_empty() {
            return true;
        }
        if term.len() > text.len() + self.max_distance(term.len()) {
            return false;
        }
        if term.len() < self.config.min_term_len {
            return contains(&text, &term);
        }

        let max_dist = self.max_distance(term.len());
        if max_dist == 0 {
            return contains(&text, &term);
        }

        // windows within the edit budget of the term's length
        let lo = term.len().saturating_sub(max_dist).max(1);
        let hi = (term.len() + max_dist).min(text.len());
        for width in lo..=hi {
            if width > text.len() {
                continue;
            }
            for window in text.windows(width) {
                if levenshtein(&term, window) <= max_dist {
                    return true;
                }
            }
        }
        false
    }

    fn max_distance(&self, term_len: usize) -> usize {
        (self.config.threshold * term_len as f64).floor() as usize
    }
}

fn contains(haystack: &[char], needle: &[char]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Two-row Levenshtein distance over char slices
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
