use super::{Config, MatchList, MatchResult, Matcher};
use crate::types::Registry;
use crate::Result;

/// Several patterns run with the same mode, their results merged.
///
/// Named values from later patterns overwrite earlier ones and unnamed values
/// are appended. When `strict`, a single failing pattern fails the whole
/// match.
#[derive(Clone, Debug)]
pub struct MultiMatcher {
    matchers: Vec<Matcher>,
    strict: bool,
}

impl MultiMatcher {
    pub fn new<P: AsRef<str>>(patterns: &[P], config: Config, strict: bool) -> Result<Self> {
        let matchers = patterns
            .iter()
            .map(|p| Matcher::with_config(p.as_ref(), config))
            .collect::<Result<_>>()?;
        Ok(Self { matchers, strict })
    }

    pub fn with_registry<P: AsRef<str>>(
        patterns: &[P],
        config: Config,
        strict: bool,
        types: &Registry,
    ) -> Result<Self> {
        let matchers = patterns
            .iter()
            .map(|p| Matcher::with_registry(p.as_ref(), config, types))
            .collect::<Result<_>>()?;
        Ok(Self { matchers, strict })
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn collect<F>(&self, run: F) -> Result<MatchResult>
    where
        F: Fn(&Matcher) -> Result<MatchResult>,
    {
        let mut merged = MatchResult::no_match();
        for matcher in &self.matchers {
            let result = run(matcher)?;
            if !result.is_match() && self.strict {
                return Ok(MatchResult::no_match());
            }
            merged.merge(result);
        }
        Ok(merged)
    }

    pub fn match_full(&self, haystack: &str) -> Result<MatchResult> {
        self.collect(|m| m.match_full(haystack))
    }

    pub fn match_start(&self, haystack: &str) -> Result<MatchResult> {
        self.collect(|m| m.match_start(haystack))
    }

    pub fn match_end(&self, haystack: &str) -> Result<MatchResult> {
        self.collect(|m| m.match_end(haystack))
    }

    pub fn search(&self, haystack: &str) -> Result<MatchResult> {
        self.collect(|m| m.search(haystack))
    }

    /// Occurrences of every pattern, grouped by pattern.
    pub fn search_all(&self, haystack: &str) -> Result<MatchList> {
        let mut all = MatchList::default();
        for matcher in &self.matchers {
            let found = matcher.search_all(haystack)?;
            if found.is_empty() && self.strict {
                return Ok(MatchList::default());
            }
            all.extend(found);
        }
        Ok(all)
    }
}
