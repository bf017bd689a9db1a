//! Recursive character splitter with overlap.
//!
//! Splits content into windows of at most `chunk_size` characters,
//! trying structural boundaries first (paragraph breaks, line breaks,
//! word breaks) and falling back to raw character windows. Adjacent
//! windows share up to `overlap` trailing characters. All counts are
//! Unicode scalar counts, so umlauts never split a code point.

use crate::types::Chunk;

/// Separator fallback chain, coarsest first. The empty string means raw
/// character windows.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

pub struct ChunkSplitter {
    chunk_size: usize,
    overlap: usize,
}

impl ChunkSplitter {
    /// Panics if `chunk_size` is zero or `overlap >= chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be positive");
        assert!(overlap < chunk_size, "overlap must be smaller than chunk_size");
        Self { chunk_size, overlap }
    }

    /// Splits every section into windows, copying section metadata onto
    /// each window unchanged.
    pub fn split_sections(&self, sections: &[Chunk]) -> Vec<Chunk> {
        let mut out = Vec::new();
        for section in sections {
            for piece in self.split_text(&section.content) {
                let mut chunk = section.clone();
                chunk.content = piece;
                out.push(chunk);
            }
        }
        out
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }
        self.split_with(text, &SEPARATORS)
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (sep, rest) = match separators.split_first() {
            Some((s, r)) => (*s, r),
            None => return vec![text.to_string()],
        };
        if sep.is_empty() {
            return self.char_windows(text);
        }
        if !text.contains(sep) {
            return self.split_with(text, rest);
        }
        let mut pieces: Vec<String> = Vec::new();
        for part in text.split(sep) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if char_len(part) <= self.chunk_size {
                pieces.push(part.to_string());
            } else {
                pieces.extend(self.split_with(part, rest));
            }
        }
        self.merge(pieces, sep)
    }

    /// Greedily packs pieces into windows of at most `chunk_size`
    /// characters, seeding each new window with trailing pieces of the
    /// previous one whose joined length fits in `overlap`.
    fn merge(&self, pieces: Vec<String>, sep: &str) -> Vec<String> {
        let mut windows = Vec::new();
        let mut current: Vec<String> = Vec::new();
        for piece in pieces {
            if !current.is_empty() && !self.fits(&current, &piece, sep) {
                windows.push(current.join(sep));
                current = self.carry_overlap(current, sep);
                // An overlap seed plus a large piece can still overflow;
                // shed seeded pieces from the front until the piece fits.
                while !current.is_empty() && !self.fits(&current, &piece, sep) {
                    current.remove(0);
                }
            }
            current.push(piece);
        }
        if !current.is_empty() {
            windows.push(current.join(sep));
        }
        windows
    }

    fn fits(&self, current: &[String], piece: &str, sep: &str) -> bool {
        joined_len(current, sep) + char_len(sep) + char_len(piece) <= self.chunk_size
    }

    fn carry_overlap(&self, mut window: Vec<String>, sep: &str) -> Vec<String> {
        let mut carried: Vec<String> = Vec::new();
        while let Some(last) = window.pop() {
            let mut trial = vec![last.clone()];
            trial.extend(carried.iter().cloned());
            if joined_len(&trial, sep) > self.overlap {
                break;
            }
            carried.insert(0, last);
        }
        carried
    }

    fn char_windows(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.overlap;
        let mut out = Vec::new();
        let mut start = 0usize;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            out.push(chars[start..end].iter().collect());
            if end >= chars.len() {
                break;
            }
            start += step;
        }
        out
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn joined_len(parts: &[String], sep: &str) -> usize {
    if parts.is_empty() {
        return 0;
    }
    let seps = char_len(sep) * (parts.len() - 1);
    parts.iter().map(|p| char_len(p)).sum::<usize>() + seps
}
