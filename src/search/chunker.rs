use super::error::{Result, SearchError};

/// Chunks shorter than this (after trimming) are dropped as noise.
pub const MIN_CHUNK_CHARS: usize = 50;

/// Splits text into overlapping windows of whole words.
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
    min_chars: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            chunk_size: 400,
            overlap: 50,
            min_chars: MIN_CHUNK_CHARS,
        }
    }
}

impl Chunker {
    /// `chunk_size` and `overlap` are counted in words. Rejects settings
    /// where the window would never advance.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(SearchError::invalid_config("chunk_size must be positive"));
        }
        if overlap >= chunk_size {
            return Err(SearchError::invalid_config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            overlap,
            min_chars: MIN_CHUNK_CHARS,
        })
    }

    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Chunk `text`, dropping windows shorter than the minimum length.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.windows(text)
            .into_iter()
            .filter(|chunk| chunk.chars().count() >= self.min_chars)
            .collect()
    }

    /// Every sliding window over the words of `text`, without the length filter.
    pub fn windows(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut windows = Vec::new();

        let mut start = 0;
        while start < words.len() {
            let end = (start + self.chunk_size).min(words.len());
            windows.push(words[start..end].join(" "));
            start += self.step();
        }

        windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_words(count: usize) -> String {
        (0..count)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(Chunker::new(10, 10).is_err());
        assert!(Chunker::new(10, 15).is_err());
        assert!(Chunker::new(0, 0).is_err());
        assert!(Chunker::new(10, 9).is_ok());
    }

    #[test]
    fn test_empty_text() {
        let chunker = Chunker::new(5, 1).unwrap().with_min_chars(0);
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("   \n\t ").is_empty());
    }

    #[test]
    fn test_window_count_matches_step_arithmetic() {
        for (size, overlap) in [(4, 1), (5, 0), (7, 3), (3, 2), (400, 50)] {
            let chunker = Chunker::new(size, overlap).unwrap().with_min_chars(0);
            let step = size - overlap;
            for words in [1, 2, 3, 9, 10, 11, 57, 1000] {
                let windows = chunker.windows(&numbered_words(words));
                let expected = (words + step - 1) / step;
                assert_eq!(
                    windows.len(),
                    expected,
                    "size={} overlap={} words={}",
                    size,
                    overlap,
                    words
                );
            }
        }
    }

    #[test]
    fn test_windows_are_bounded_and_overlap_at_boundaries() {
        let chunker = Chunker::new(4, 1).unwrap().with_min_chars(0);
        let windows = chunker.windows(&numbered_words(10));

        assert_eq!(
            windows,
            vec![
                "w0 w1 w2 w3".to_string(),
                "w3 w4 w5 w6".to_string(),
                "w6 w7 w8 w9".to_string(),
                "w9".to_string(),
            ]
        );
        for window in &windows {
            assert!(window.split_whitespace().count() <= 4);
        }
    }

    #[test]
    fn test_windows_cover_every_word() {
        let chunker = Chunker::new(6, 2).unwrap().with_min_chars(0);
        let text = numbered_words(23);
        let covered: std::collections::HashSet<String> = chunker
            .windows(&text)
            .iter()
            .flat_map(|w| w.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .collect();

        for word in text.split_whitespace() {
            assert!(covered.contains(word), "{} missing", word);
        }
    }

    #[test]
    fn test_never_splits_words() {
        let chunker = Chunker::new(3, 1).unwrap().with_min_chars(0);
        let text = "alpha\nbeta   gamma\tdelta epsilon";
        for window in chunker.windows(text) {
            for word in window.split(' ') {
                assert!(text.split_whitespace().any(|w| w == word));
            }
        }
    }

    #[test]
    fn test_drops_short_chunks() {
        let chunker = Chunker::new(5, 0).unwrap();
        let long = "statistical learning fundamentally balances regularization";
        let text = format!("{} tiny tail", long);

        let chunks = chunker.chunk(&text);
        assert_eq!(chunks, vec![long.to_string()]);
        assert!(chunks.iter().all(|c| c.trim().chars().count() >= MIN_CHUNK_CHARS));
    }
}
