use std::fmt::{self, Display, Formatter};

/// What counts as a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Whitespace separated words.
    #[default]
    Word,
    /// Single characters.
    Character,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Word => f.write_str("word"),
            Mode::Character => f.write_str("character"),
        }
    }
}

/// Strips everything but ASCII letters and digits, lowercasing the letters.
///
/// ```
/// use freq::tokenize::normalize;
///
/// assert_eq!("dont", normalize("Don't"));
/// assert_eq!("r2d2", normalize("R2-D2!"));
/// assert_eq!("", normalize("--"));
/// ```
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Splits `text` according to `mode`, yielding normalized tokens and skipping
/// the ones that normalize to nothing.
pub fn tokens(text: &str, mode: Mode) -> Box<dyn Iterator<Item = String> + '_> {
    match mode {
        Mode::Word => Box::new(text.split_whitespace().map(normalize).filter(|t| !t.is_empty())),
        Mode::Character => Box::new(
            text.chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase().to_string()),
        ),
    }
}
