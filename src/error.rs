use thiserror::Error;

use crate::parser::PatternError;
use crate::types::ConvertError;

/// Errors raised while registering types, compiling patterns or converting
/// captures.
///
/// A pattern that simply does not match is not an error; see
/// [`crate::MatchResult::is_match`].
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed pattern syntax
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("unknown type `{name}`; known types are: {known}")]
    UnknownType { name: String, known: String },

    /// Rejected registration
    #[error("invalid type `{name}`: {reason}")]
    InvalidType { name: String, reason: String },

    #[error("group name `{name}` is used more than once")]
    DuplicateGroupName { name: String },

    /// A converter failed on text its type's fragment accepted.
    #[error("cannot convert {raw:?} captured by group {group}: {source}")]
    Conversion {
        group: String,
        raw: String,
        #[source]
        source: ConvertError,
    },

    /// The engine refused the compiled regex, typically a size limit.
    #[error("compiled regex rejected: {0}")]
    Regex(#[from] Box<regex_automata::meta::BuildError>),

    #[error("replace() needs a successful match")]
    NoMatch,
}

pub type Result<T> = std::result::Result<T, Error>;
