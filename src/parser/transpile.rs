use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use regex_syntax::ast as re_ast;
use regex_syntax::is_meta_character;

use super::{Ast, Constraint, Group, Segment};
use crate::types::{Converter, Identity};
use crate::{Error, Result};

/// One capture of a compiled pattern.
#[derive(Clone)]
pub struct GroupEntry {
    /// Capture name handed to the engine. Unnamed groups get `unnamed.N`,
    /// which no user name can collide with.
    pub internal_id: String,
    pub display_name: Option<String>,
    pub converter: Arc<dyn Converter>,
    /// Left-to-right position among all groups.
    pub order: usize,
}

impl GroupEntry {
    /// How the group is named in error messages.
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) => format!("`{name}`"),
            None => format!("#{}", self.order),
        }
    }
}

impl fmt::Debug for GroupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupEntry")
            .field("internal_id", &self.internal_id)
            .field("display_name", &self.display_name)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// A pattern translated into regex syntax, with its group table.
#[derive(Clone, Debug)]
pub struct Compiled {
    pub regex: String,
    pub groups: Vec<GroupEntry>,
}

fn dummy_span() -> re_ast::Span {
    re_ast::Span::splat(re_ast::Position::new(0, 0, 0))
}

fn no_flags() -> re_ast::Flags {
    re_ast::Flags {
        span: dummy_span(),
        items: vec![],
    }
}

fn non_capturing(ast: re_ast::Ast) -> re_ast::Ast {
    re_ast::Ast::group(re_ast::Group {
        span: dummy_span(),
        kind: re_ast::GroupKind::NonCapturing(no_flags()),
        ast: Box::new(ast),
    })
}

fn repetition(ast: re_ast::Ast, kind: re_ast::RepetitionKind) -> re_ast::Ast {
    re_ast::Ast::repetition(re_ast::Repetition {
        span: dummy_span(),
        op: re_ast::RepetitionOp {
            span: dummy_span(),
            kind,
        },
        greedy: true,
        ast: Box::new(ast),
    })
}

fn any_char() -> re_ast::Ast {
    re_ast::Ast::dot(dummy_span())
}

fn literal(c: char) -> re_ast::Ast {
    let kind = if is_meta_character(c) {
        re_ast::LiteralKind::Meta
    } else {
        re_ast::LiteralKind::Verbatim
    };

    re_ast::Ast::literal(re_ast::Literal {
        span: dummy_span(),
        kind,
        c,
    })
}

/// Walks an [`Ast`] and numbers its groups.
struct Transpiler {
    flexible_spaces: bool,
    groups: Vec<GroupEntry>,
    names: HashSet<String>,
}

impl Transpiler {
    fn text(&self, text: &str, out: &mut Vec<re_ast::Ast>) {
        for c in text.chars() {
            if c == ' ' && self.flexible_spaces {
                out.push(repetition(literal(' '), re_ast::RepetitionKind::OneOrMore));
            } else {
                out.push(literal(c));
            }
        }
    }

    fn group(&mut self, group: &Group) -> Result<re_ast::Ast> {
        let order = self.groups.len();
        let internal_id = match &group.name {
            Some(name) => {
                if !self.names.insert(name.clone()) {
                    return Err(Error::DuplicateGroupName { name: name.clone() });
                }
                name.clone()
            }
            None => format!("unnamed.{order}"),
        };

        let (inner, converter): (_, Arc<dyn Converter>) = match &group.constraint {
            Constraint::None => (
                repetition(any_char(), re_ast::RepetitionKind::ZeroOrMore),
                Arc::new(Identity),
            ),
            Constraint::Width(n) => (
                repetition(
                    any_char(),
                    re_ast::RepetitionKind::Range(re_ast::RepetitionRange::Exactly(*n)),
                ),
                Arc::new(Identity),
            ),
            Constraint::Type(spec) => (spec.regex_ast().clone(), spec.converter().clone()),
        };

        let capture = re_ast::Ast::group(re_ast::Group {
            span: dummy_span(),
            kind: re_ast::GroupKind::CaptureName {
                starts_with_p: true,
                name: re_ast::CaptureName {
                    span: dummy_span(),
                    name: internal_id.clone(),
                    index: order as u32 + 1,
                },
            },
            ast: Box::new(inner),
        });

        self.groups.push(GroupEntry {
            internal_id,
            display_name: group.name.clone(),
            converter,
            order,
        });

        Ok(capture)
    }

    fn branch(&mut self, segments: &[Segment]) -> Result<re_ast::Ast> {
        let mut asts = vec![];
        for segment in segments {
            match segment {
                Segment::Literal(text) => self.text(text, &mut asts),
                Segment::WildcardAny => {
                    asts.push(repetition(any_char(), re_ast::RepetitionKind::ZeroOrMore))
                }
                Segment::WildcardOne => asts.push(any_char()),
                Segment::WildcardMaybe => {
                    asts.push(repetition(any_char(), re_ast::RepetitionKind::ZeroOrOne))
                }
                Segment::Group(group) => asts.push(self.group(group)?),
            }
        }

        Ok(re_ast::Concat {
            span: dummy_span(),
            asts,
        }
        .into_ast())
    }
}

impl Ast {
    pub fn to_regex_ast(&self, flexible_spaces: bool) -> Result<(re_ast::Ast, Vec<GroupEntry>)> {
        let mut transpiler = Transpiler {
            flexible_spaces,
            groups: vec![],
            names: HashSet::new(),
        };

        let ast = match self.branches.as_slice() {
            [single] => transpiler.branch(single)?,
            branches => re_ast::Ast::alternation(re_ast::Alternation {
                span: dummy_span(),
                asts: branches
                    .iter()
                    .map(|b| transpiler.branch(b).map(non_capturing))
                    .collect::<Result<_>>()?,
            }),
        };

        Ok((ast, transpiler.groups))
    }

    pub fn compile(&self, flexible_spaces: bool) -> Result<Compiled> {
        let (ast, groups) = self.to_regex_ast(flexible_spaces)?;
        Ok(Compiled {
            regex: ast.to_string(),
            groups,
        })
    }
}
