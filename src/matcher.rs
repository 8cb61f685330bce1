use std::collections::{HashMap, VecDeque};

/// Bounded trailing-character buffer. Holds the most recent lowercase
/// alphanumeric characters typed, evicting the oldest first once the
/// configured maximum is reached.
#[derive(Debug)]
pub struct InputBuffer {
    chars: VecDeque<char>,
    max_len: usize,
}

impl InputBuffer {
    pub fn new(max_len: usize) -> Self {
        InputBuffer {
            chars: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    /// Append a character, dropping from the front past the bound.
    pub fn push(&mut self, c: char) {
        self.chars.push_back(c);
        while self.chars.len() > self.max_len {
            self.chars.pop_front();
        }
    }

    /// Remove the most recent character, if any.
    pub fn backspace(&mut self) -> Option<char> {
        self.chars.pop_back()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The trailing `n` characters as a lookup key. Asking for more than
    /// the buffer holds yields the whole buffer.
    pub fn suffix(&self, n: usize) -> String {
        self.chars
            .iter()
            .skip(self.chars.len().saturating_sub(n))
            .collect()
    }

    pub fn contents(&self) -> String {
        self.chars.iter().collect()
    }
}

/// Current match state, refreshed on every buffer update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    Inactive,
    Active {
        expansion: String,
        matched_len: usize,
    },
}

impl Suggestion {
    pub fn is_active(&self) -> bool {
        matches!(self, Suggestion::Active { .. })
    }
}

/// Find the longest trailing substring of the buffer that is a dictionary
/// key. Candidate lengths are probed from the full buffer length down to 1
/// and the first hit wins, so a longer abbreviation always beats a shorter
/// suffix of itself (with both "br" and "abbr" defined, typing "abbr"
/// selects "abbr").
pub fn longest_suffix_match(
    buffer: &InputBuffer,
    dictionary: &HashMap<String, String>,
) -> Suggestion {
    for n in (1..=buffer.len()).rev() {
        let candidate = buffer.suffix(n);
        if let Some(expansion) = dictionary.get(&candidate) {
            return Suggestion::Active {
                expansion: expansion.clone(),
                matched_len: n,
            };
        }
    }
    Suggestion::Inactive
}
