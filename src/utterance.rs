use std::fmt;

/// One finalized transcript from the speech stream
///
/// Holds the trimmed text as recognized plus a lowercase form used for
/// phrase matching. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    raw: String,
    normalized: String,
}

impl Utterance {
    /// Build an utterance from a transcript
    pub fn new(text: &str) -> Self {
        let raw = text.trim().to_owned();
        let normalized = raw.to_lowercase();
        Self { raw, normalized }
    }

    /// Trimmed transcript, original case
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed, lowercased transcript
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Whether nothing but whitespace was recognized
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl From<&str> for Utterance {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_lowercases() {
        let u = Utterance::new("  Evoke Save \n");
        assert_eq!(u.raw(), "Evoke Save");
        assert_eq!(u.normalized(), "evoke save");
        assert!(!u.is_empty());
    }

    #[test]
    fn test_blank() {
        assert!(Utterance::new(" \t ").is_empty());
    }
}
