//! Human-friendly patterns compiled into regular expressions with typed
//! captures.
//!
//! | Syntax | Meaning |
//! |---|---|
//! | `*` | any character, 0+ times |
//! | `+` | any character, exactly once |
//! | `?` | any character, 0 or 1 times |
//! | <code>&#124;</code> | either side; at most one per pattern |
//! | `[name]`, `[]` | named / unnamed group |
//! | `[name:4]`, `[:4]` | group exactly 4 characters wide |
//! | `[name:int]`, `[:int]` | group matching a registered type, converted |
//! | `[*]` `[+]` `[?]` <code>[&#124;]</code> | the literal symbol |
//! | `[[`, `]]` | literal brackets |

mod error;
mod parser;
mod search;
mod types;

pub use error::{Error, Result};
pub use parser::{
    parse, Ast, Compiled, Constraint, Group, GroupEntry, PatternError, RawGroup, RawSegment,
    Segment,
};
pub use search::{Config, MatchList, MatchResult, Matcher, MultiMatcher};
pub use types::{
    register_type, registry, ConvertError, ConvertResult, Converter, Identity, Registry, TypeSpec,
    Value,
};

fn matcher(pattern: &str, case_sensitive: bool) -> Result<Matcher> {
    Matcher::with_config(pattern, Config::new().case_sensitive(case_sensitive))
}

/// One-shot [`Matcher::match_full`].
pub fn match_full(pattern: &str, haystack: &str, case_sensitive: bool) -> Result<MatchResult> {
    matcher(pattern, case_sensitive)?.match_full(haystack)
}

/// One-shot [`Matcher::match_start`].
pub fn match_start(pattern: &str, haystack: &str, case_sensitive: bool) -> Result<MatchResult> {
    matcher(pattern, case_sensitive)?.match_start(haystack)
}

/// One-shot [`Matcher::match_end`].
pub fn match_end(pattern: &str, haystack: &str, case_sensitive: bool) -> Result<MatchResult> {
    matcher(pattern, case_sensitive)?.match_end(haystack)
}

/// One-shot [`Matcher::search`].
pub fn search(pattern: &str, haystack: &str, case_sensitive: bool) -> Result<MatchResult> {
    matcher(pattern, case_sensitive)?.search(haystack)
}

/// One-shot [`Matcher::search_all`].
pub fn search_all(pattern: &str, haystack: &str, case_sensitive: bool) -> Result<MatchList> {
    matcher(pattern, case_sensitive)?.search_all(haystack)
}

/// The regular expression `pattern` compiles to.
pub fn to_regex(pattern: &str) -> Result<String> {
    Ok(Matcher::new(pattern)?.regex().to_owned())
}
