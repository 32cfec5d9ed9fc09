mod multi;
mod result;

use std::sync::Arc;

use regex_automata::meta;
use regex_automata::util::captures::Captures;
use regex_automata::util::syntax;
use regex_automata::{Anchored, Input};

use crate::parser::{Compiled, GroupEntry};
use crate::types::{registry, Registry};
use crate::{Ast, Error, Result};

pub use multi::MultiMatcher;
pub use result::{MatchList, MatchResult};

/// Options for compiling a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    case_sensitive: bool,
    flexible_spaces: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            case_sensitive: true,
            flexible_spaces: false,
        }
    }

    /// Match letters case-sensitively (default `true`).
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    /// Let each space in the pattern match one or more spaces
    /// (default `false`).
    pub fn flexible_spaces(mut self, yes: bool) -> Self {
        self.flexible_spaces = yes;
        self
    }

    pub fn get_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn get_flexible_spaces(&self) -> bool {
        self.flexible_spaces
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// A compiled pattern, ready to run against any number of haystacks.
///
/// Matchers are immutable and can be shared between threads.
#[derive(Clone, Debug)]
pub struct Matcher {
    pattern: String,
    config: Config,
    compiled: Compiled,
    // the pattern as is: search, search_all, match_start
    re: meta::Regex,
    // the pattern followed by `$`: match_full, match_end
    re_end: meta::Regex,
}

impl Matcher {
    /// Compile `pattern` against the process-wide registry.
    pub fn new(pattern: &str) -> Result<Self> {
        Self::with_config(pattern, Config::new())
    }

    pub fn with_config(pattern: &str, config: Config) -> Result<Self> {
        let types = registry().read();
        Self::with_registry(pattern, config, &types)
    }

    /// Compile `pattern`, resolving group types in `types`.
    pub fn with_registry(pattern: &str, config: Config, types: &Registry) -> Result<Self> {
        let ast = Ast::parse(pattern, types)?;
        let compiled = ast.compile(config.flexible_spaces)?;
        tracing::debug!(pattern, regex = %compiled.regex, "compiled pattern");

        let re = build(&compiled.regex, config)?;
        let re_end = build(&format!("(?:{})$", compiled.regex), config)?;

        Ok(Self {
            pattern: pattern.to_owned(),
            config,
            compiled,
            re,
            re_end,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The generated regular expression.
    pub fn regex(&self) -> &str {
        &self.compiled.regex
    }

    pub fn groups(&self) -> &[GroupEntry] {
        &self.compiled.groups
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.config.case_sensitive
    }

    /// The whole haystack must match.
    pub fn match_full(&self, haystack: &str) -> Result<MatchResult> {
        self.run(&self.re_end, haystack, Anchored::Yes)
    }

    /// A prefix of the haystack must match.
    pub fn match_start(&self, haystack: &str) -> Result<MatchResult> {
        self.run(&self.re, haystack, Anchored::Yes)
    }

    /// A suffix of the haystack must match.
    pub fn match_end(&self, haystack: &str) -> Result<MatchResult> {
        self.run(&self.re_end, haystack, Anchored::No)
    }

    /// First occurrence anywhere in the haystack.
    pub fn search(&self, haystack: &str) -> Result<MatchResult> {
        self.run(&self.re, haystack, Anchored::No)
    }

    /// Every non-overlapping occurrence, left to right.
    pub fn search_all(&self, haystack: &str) -> Result<MatchList> {
        let shared: Arc<str> = Arc::from(haystack);
        self.re
            .captures_iter(haystack)
            .map(|caps| self.assemble(&caps, &shared))
            .collect()
    }

    fn run(&self, re: &meta::Regex, haystack: &str, anchored: Anchored) -> Result<MatchResult> {
        let input = Input::new(haystack).anchored(anchored);
        let mut caps = re.create_captures();
        re.search_captures(&input, &mut caps);
        tracing::trace!(pattern = %self.pattern, matched = caps.is_match(), "match attempt");

        if !caps.is_match() {
            return Ok(MatchResult::no_match());
        }
        self.assemble(&caps, &Arc::from(haystack))
    }

    fn assemble(&self, caps: &Captures, haystack: &Arc<str>) -> Result<MatchResult> {
        let mut result = MatchResult::matched(Arc::clone(haystack));
        for entry in &self.compiled.groups {
            let Some(span) = caps.get_group_by_name(&entry.internal_id) else {
                result.push_missing(entry);
                continue;
            };

            let raw = &haystack[span.range()];
            let value = entry
                .converter
                .convert(raw)
                .map_err(|source| Error::Conversion {
                    group: entry.label(),
                    raw: raw.to_owned(),
                    source,
                })?;
            result.push(entry, value, (span.start, span.end));
        }

        Ok(result)
    }
}

fn build(regex: &str, config: Config) -> Result<meta::Regex> {
    meta::Regex::builder()
        .syntax(syntax::Config::new().case_insensitive(!config.case_sensitive))
        .build(regex)
        .map_err(|e| Error::Regex(Box::new(e)))
}
