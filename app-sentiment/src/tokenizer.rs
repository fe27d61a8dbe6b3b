use std::{borrow::Cow, str::Split};

/// Characters that end a token. They never appear inside one.
pub const SEPARATORS: &[char] = &[
    '\t', '\r', '\x0C', '\n', '!', '@', '#', '$', '%', '^', '&', '*', '?', '(', ')', '\'', '"',
    '[', ']', '{', '}', '.', ',', '/', ':', ';', ' ',
];

/// Lower-cased words of `text`, left to right. Runs of separators collapse.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        inner: text.split(SEPARATORS),
    }
}

/// Iterator returned by [`tokenize`].
pub struct Tokens<'a> {
    inner: Split<'a, &'static [char]>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find(|t| !t.is_empty()).map(normalize)
    }
}

// No character lower-cases into a separator, so lower-casing each token
// matches lower-casing the whole text up front.
fn normalize(token: &str) -> Cow<'_, str> {
    if token.bytes().any(|b| !b.is_ascii() || b.is_ascii_uppercase()) {
        Cow::Owned(token.to_lowercase())
    } else {
        Cow::Borrowed(token)
    }
}
