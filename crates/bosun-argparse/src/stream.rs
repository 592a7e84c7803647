//! Unconsumed argv tokens shared by every matcher of one parse pass.
//!
//! Matchers consume destructively: a matched token is removed and the
//! tokens after it shift left, so a scan that removes at index `i` must
//! re-check index `i` instead of advancing.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TokenStream {
    tokens: Vec<String>,
}

impl TokenStream {
    pub(crate) fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|s| s.as_str())
    }

    /// The first unconsumed token.
    pub(crate) fn head(&self) -> Option<&str> {
        self.get(0)
    }

    /// Index of the first token equal to `needle`.
    pub(crate) fn position(&self, needle: &str) -> Option<usize> {
        self.tokens.iter().position(|t| t == needle)
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.tokens.len() {
            Some(self.tokens.remove(index))
        } else {
            None
        }
    }

    /// Swap the token at `index` for `token`.
    pub(crate) fn replace(&mut self, index: usize, token: String) {
        if let Some(slot) = self.tokens.get_mut(index) {
            *slot = token;
        }
    }

    /// Remove and return the head token.
    pub(crate) fn shift(&mut self) -> Option<String> {
        self.remove(0)
    }

    /// Remove the run of value tokens starting at `index`.
    ///
    /// The run ends at the end of the stream, at the first `-`-prefixed
    /// token, or after `limit` tokens.
    pub(crate) fn take_values(&mut self, index: usize, limit: Option<usize>) -> Vec<String> {
        let mut out = Vec::new();
        while limit.is_none_or(|max| out.len() < max) {
            match self.get(index) {
                Some(token) if !token.starts_with('-') => {}
                _ => break,
            }
            if let Some(token) = self.remove(index) {
                out.push(token);
            }
        }
        out
    }

    pub(crate) fn remaining(&self) -> &[String] {
        self.tokens.as_slice()
    }
}

impl<S: Into<String>> FromIterator<S> for TokenStream {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}
