mod ast;
mod lexer;
mod transpile;

use lalrpop_util::ParseError;
use thiserror::Error;

pub use ast::{Ast, Constraint, Group, RawGroup, RawSegment, Segment};
pub use transpile::{Compiled, GroupEntry};

lalrpop_util::lalrpop_mod!(
    #[allow(clippy::ptr_arg)]
    #[rustfmt::skip]
    grammar,
    "/parser/grammar.rs"
);

/// Malformed pattern syntax. Positions are byte offsets into the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unterminated group {snippet:?} at {pos}")]
    UnterminatedGroup { snippet: String, pos: usize },

    #[error("second `|` at {pos} in {snippet:?}; a pattern splits into at most two alternatives")]
    SecondAlternation { snippet: String, pos: usize },

    #[error("group name {name:?} at {pos} is not an identifier")]
    InvalidGroupName { name: String, pos: usize },

    #[error("width {width} at {pos} is too large")]
    WidthTooLarge { width: String, pos: usize },

    #[error("unexpected {snippet:?} at {pos}")]
    Unexpected { snippet: String, pos: usize },
}

impl PatternError {
    fn from_lalrpop(code: &str, err: ParseError<usize, lexer::Tok, PatternError>) -> Self {
        let snippet = |start: usize, end: usize| code.get(start..end).unwrap_or_default().to_owned();

        match err {
            ParseError::User { error } => error,
            ParseError::UnrecognizedToken {
                token: (pos, lexer::Tok::Pipe, _),
                ..
            } => Self::SecondAlternation {
                snippet: snippet(pos, code.len()),
                pos,
            },
            ParseError::UnrecognizedToken {
                token: (pos, _, end),
                ..
            }
            | ParseError::ExtraToken {
                token: (pos, _, end),
            } => Self::Unexpected {
                snippet: snippet(pos, end),
                pos,
            },
            ParseError::InvalidToken { location } | ParseError::UnrecognizedEof { location, .. } => {
                Self::Unexpected {
                    snippet: snippet(location, code.len()),
                    pos: location,
                }
            }
        }
    }
}

/// Tokenizing pass: pattern text to one or two branches of raw segments.
///
/// Group constraints are left as text; [`Ast::resolve`] looks them up.
pub fn parse(code: &str) -> Result<Vec<Vec<RawSegment>>, PatternError> {
    let tokens = lexer::Lexer::new(code).map(|tok| {
        if let Some(err) = tok.get_error() {
            Err(err)
        } else {
            let (start, end) = tok.bounds();
            Ok((start, tok.data, end))
        }
    });

    grammar::BranchesParser::new()
        .parse(tokens)
        .map_err(|err| PatternError::from_lalrpop(code, err))
}
