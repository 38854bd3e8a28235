use super::Value;

use std::fmt;

/// A search filter in the server's prefix ("Polish") domain notation.
///
/// Consecutive terms are implicitly AND-ed by the server; `And`/`Or` apply to
/// the next two criteria and `Not` to the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    And,
    Or,
    Not,
    Term {
        /// Local field name, or a dot-separated chain through relationships.
        path: String,
        op: Op,
        value: Value,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Like,
    ILike,
    NotLike,
    NotILike,
    EqLike,
    EqILike,
    ChildOf,
    ParentOf,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `(path, op, value)`.
    pub fn filter(mut self, path: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.criteria.push(Criterion::term(path, op, value));
        self
    }

    /// Appends `(path, '=', value)`.
    pub fn eq(self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(path, Op::Eq, value)
    }

    pub fn and(mut self) -> Self {
        self.criteria.push(Criterion::And);
        self
    }

    pub fn or(mut self) -> Self {
        self.criteria.push(Criterion::Or);
        self
    }

    pub fn not(mut self) -> Self {
        self.criteria.push(Criterion::Not);
        self
    }

    pub fn push(&mut self, criterion: Criterion) {
        self.criteria.push(criterion);
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }
}

impl FromIterator<Criterion> for Domain {
    fn from_iter<I: IntoIterator<Item = Criterion>>(iter: I) -> Self {
        Self {
            criteria: iter.into_iter().collect(),
        }
    }
}

impl Criterion {
    pub fn term(path: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Self::Term {
            path: path.into(),
            op,
            value: value.into(),
        }
    }

    /// The wire token of a logical operator.
    pub fn token(&self) -> Option<&'static str> {
        match self {
            Self::And => Some("&"),
            Self::Or => Some("|"),
            Self::Not => Some("!"),
            Self::Term { .. } => None,
        }
    }
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Like => "like",
            Self::ILike => "ilike",
            Self::NotLike => "not like",
            Self::NotILike => "not ilike",
            Self::EqLike => "=like",
            Self::EqILike => "=ilike",
            Self::ChildOf => "child_of",
            Self::ParentOf => "parent_of",
        }
    }

    /// Operators whose operand is a collection.
    pub fn is_membership(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
