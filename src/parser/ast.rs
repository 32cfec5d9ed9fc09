use crate::types::{Registry, TypeSpec};
use crate::{Error, Result};

use super::PatternError;

/// A group as written, before its constraint is looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGroup {
    pub name: Option<String>,
    pub constraint: Option<String>,
    pub pos: usize,
}

impl RawGroup {
    /// `content` is the text between the brackets.
    pub(super) fn new(content: &str, pos: usize) -> Self {
        let (name, constraint) = match content.split_once(':') {
            Some((name, constraint)) => (name, Some(constraint.trim())),
            None => (content, None),
        };
        let name = name.trim();

        Self {
            name: (!name.is_empty()).then(|| name.to_owned()),
            constraint: constraint.filter(|c| !c.is_empty()).map(str::to_owned),
            pos,
        }
    }
}

/// Output of the tokenizing pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSegment {
    Literal(String),
    WildcardAny,
    WildcardOne,
    WildcardMaybe,
    Group(RawGroup),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    None,
    Width(u32),
    Type(TypeSpec),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: Option<String>,
    pub constraint: Constraint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    /// `*`
    WildcardAny,
    /// `+`
    WildcardOne,
    /// `?`
    WildcardMaybe,
    Group(Group),
}

/// A parsed pattern: one branch, or two when the pattern contains a
/// top-level `|`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    pub branches: Vec<Vec<Segment>>,
}

impl Ast {
    /// Tokenize `code` and resolve its group constraints against `types`.
    pub fn parse(code: &str, types: &Registry) -> Result<Self> {
        let raw = super::parse(code)?;
        Self::resolve(raw, types)
    }

    pub fn resolve(raw: Vec<Vec<RawSegment>>, types: &Registry) -> Result<Self> {
        let branches = raw
            .into_iter()
            .map(|branch| {
                branch
                    .into_iter()
                    .map(|segment| resolve_segment(segment, types))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { branches })
    }

    pub fn is_alternation(&self) -> bool {
        self.branches.len() > 1
    }
}

fn resolve_segment(segment: RawSegment, types: &Registry) -> Result<Segment> {
    Ok(match segment {
        RawSegment::Literal(text) => Segment::Literal(text),
        RawSegment::WildcardAny => Segment::WildcardAny,
        RawSegment::WildcardOne => Segment::WildcardOne,
        RawSegment::WildcardMaybe => Segment::WildcardMaybe,
        RawSegment::Group(group) => Segment::Group(resolve_group(group, types)?),
    })
}

fn resolve_group(group: RawGroup, types: &Registry) -> Result<Group> {
    if let Some(name) = &group.name {
        if !is_identifier(name) {
            return Err(Error::Pattern(PatternError::InvalidGroupName {
                name: name.clone(),
                pos: group.pos,
            }));
        }
    }

    let constraint = match group.constraint.as_deref() {
        None => Constraint::None,
        Some(c) if c.bytes().all(|b| b.is_ascii_digit()) => match c.parse() {
            Ok(width) => Constraint::Width(width),
            Err(_) => {
                return Err(Error::Pattern(PatternError::WidthTooLarge {
                    width: c.to_owned(),
                    pos: group.pos,
                }))
            }
        },
        Some(name) => Constraint::Type(types.resolve(name)?),
    };

    Ok(Group {
        name: group.name,
        constraint,
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}
