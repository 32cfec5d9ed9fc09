use std::collections::HashMap;
use std::fmt::Display;
use std::ops::{Deref, Index};
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::parser::GroupEntry;
use crate::{Error, Result, Value};

/// Where a participating group matched, for [`MatchResult::replace`].
#[derive(Debug, Clone, PartialEq)]
struct Capture {
    name: Option<String>,
    span: (usize, usize),
}

/// Outcome of one match attempt.
///
/// A failed attempt is a `MatchResult` too: [`is_match`](Self::is_match) is
/// `false` and both collections are empty.
///
/// A successful one keeps the text it matched, shared between every result
/// of one `search_all` call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchResult {
    named: Vec<(String, Value)>,
    unnamed: Vec<Value>,
    captures: Vec<Capture>,
    haystack: Option<Arc<str>>,
}

impl MatchResult {
    pub(super) fn no_match() -> Self {
        Self::default()
    }

    pub(super) fn matched(haystack: Arc<str>) -> Self {
        Self {
            haystack: Some(haystack),
            ..Self::default()
        }
    }

    pub(super) fn push(&mut self, entry: &GroupEntry, value: Value, span: (usize, usize)) {
        match &entry.display_name {
            Some(name) => self.insert(name.clone(), value),
            None => self.unnamed.push(value),
        }
        self.captures.push(Capture {
            name: entry.display_name.clone(),
            span,
        });
    }

    /// Named groups that did not take part are left out; unnamed ones keep
    /// their slot as [`Value::Null`].
    pub(super) fn push_missing(&mut self, entry: &GroupEntry) {
        if entry.display_name.is_none() {
            self.unnamed.push(Value::Null);
        }
    }

    fn insert(&mut self, name: String, value: Value) {
        match self.named.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.named.push((name, value)),
        }
    }

    /// Fold `other` into `self`: named values overwrite, unnamed ones append.
    pub(super) fn merge(&mut self, other: MatchResult) {
        for (name, value) in other.named {
            self.insert(name, value);
        }
        self.unnamed.extend(other.unnamed);
        self.captures.extend(other.captures);
        if self.haystack.is_none() {
            self.haystack = other.haystack;
        }
    }

    pub fn is_match(&self) -> bool {
        self.haystack.is_some()
    }

    /// The text this result was matched against.
    pub fn haystack(&self) -> Option<&str> {
        self.haystack.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.named.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Named values in the order their groups appear in the pattern.
    pub fn named(&self) -> &[(String, Value)] {
        &self.named
    }

    pub fn unnamed(&self) -> &[Value] {
        &self.unnamed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.named.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }

    /// Unnamed values, then named ones.
    pub fn all_values(&self) -> impl Iterator<Item = &Value> {
        self.unnamed.iter().chain(self.named.iter().map(|(_, v)| v))
    }

    /// Like [`all_values`](Self::all_values), keyed by group name; unnamed
    /// values have no key.
    pub fn all_items(&self) -> impl Iterator<Item = (Option<&str>, &Value)> {
        self.unnamed
            .iter()
            .map(|v| (None, v))
            .chain(self.named.iter().map(|(n, v)| (Some(n.as_str()), v)))
    }

    /// Replace the captured groups of the matched text, left to right, with
    /// `values` for as long as values last.
    pub fn replace<I>(&self, values: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let haystack = self.haystack().ok_or(Error::NoMatch)?;
        Ok(splice(haystack, positional(&self.captures, values)))
    }

    /// Replace only the named groups listed in `values`.
    pub fn replace_named<V: Display>(&self, values: &HashMap<&str, V>) -> Result<String> {
        let haystack = self.haystack().ok_or(Error::NoMatch)?;

        let mut edits: Vec<_> = self
            .captures
            .iter()
            .filter_map(|c| {
                let value = values.get(c.name.as_deref()?)?;
                Some((c.span, value.to_string()))
            })
            .collect();
        edits.sort_by_key(|(span, _)| *span);
        Ok(splice(haystack, edits))
    }
}

fn positional<'a, I>(
    captures: impl IntoIterator<Item = &'a Capture>,
    values: I,
) -> Vec<((usize, usize), String)>
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut spans: Vec<_> = captures.into_iter().map(|c| c.span).collect();
    spans.sort();
    spans
        .into_iter()
        .zip(values)
        .map(|(span, value)| (span, value.to_string()))
        .collect()
}

/// `edits` must be sorted and non-overlapping.
fn splice(haystack: &str, edits: Vec<((usize, usize), String)>) -> String {
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    for ((start, end), value) in edits {
        if start < last {
            continue;
        }
        out.push_str(&haystack[last..start]);
        out.push_str(&value);
        last = end;
    }
    out.push_str(&haystack[last..]);
    out
}

impl Index<&str> for MatchResult {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no group named {name:?} in match result"),
        }
    }
}

impl<'a> IntoIterator for &'a MatchResult {
    type Item = (&'a str, &'a Value);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for MatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.named.len()))?;
        for (name, value) in &self.named {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Every occurrence found by `search_all`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchList(Vec<MatchResult>);

impl MatchList {
    pub fn into_vec(self) -> Vec<MatchResult> {
        self.0
    }

    pub fn all_values(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().flat_map(MatchResult::all_values)
    }

    pub fn all_items(&self) -> impl Iterator<Item = (Option<&str>, &Value)> {
        self.0.iter().flat_map(MatchResult::all_items)
    }

    /// Replace the groups of every match, in order, with `values`.
    pub fn replace<I>(&self, values: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let haystack = self
            .0
            .iter()
            .find_map(MatchResult::haystack)
            .ok_or(Error::NoMatch)?;
        let captures = self.0.iter().flat_map(|r| r.captures.iter());
        Ok(splice(haystack, positional(captures, values)))
    }

    pub(super) fn extend(&mut self, other: MatchList) {
        self.0.extend(other.0);
    }
}

impl Deref for MatchList {
    type Target = [MatchResult];

    fn deref(&self) -> &[MatchResult] {
        &self.0
    }
}

impl FromIterator<MatchResult> for MatchList {
    fn from_iter<I: IntoIterator<Item = MatchResult>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for MatchList {
    type Item = MatchResult;
    type IntoIter = std::vec::IntoIter<MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MatchList {
    type Item = &'a MatchResult;
    type IntoIter = std::slice::Iter<'a, MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
