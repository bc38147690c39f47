use crate::ParsedName;

/// Reasons a file name could not be turned into an identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Nothing left to parse once the extension is removed.
    #[error("file name is empty")]
    EmptyInput,

    /// No title words precede the first year, episode or quality token.
    #[error("no title found in file name")]
    EmptyTitle {
        /// Fields that were still recognised.
        partial: ParsedName,
    },
}

impl ParseError {
    /// Best-effort fields recovered despite the failure.
    pub fn partial(&self) -> Option<&ParsedName> {
        match self {
            Self::EmptyInput => None,
            Self::EmptyTitle { partial } => Some(partial),
        }
    }

    /// Consume the error, returning the best-effort fields or an empty set.
    pub fn into_partial(self) -> ParsedName {
        match self {
            Self::EmptyInput => ParsedName::default(),
            Self::EmptyTitle { partial } => partial,
        }
    }
}
