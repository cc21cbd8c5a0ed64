use crate::expr::SqlFragment;
use crate::render::Renderer;
use crate::schema::AnyColumn;
use crate::value::Value;

/// Comparison operators. Their SQL tokens belong to the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    ILike,
    NotLike,
    IsNull,
    IsNotNull,
}

impl CompareOp {
    /// Operators that take no right-hand argument.
    pub fn is_unary(&self) -> bool {
        matches!(self, CompareOp::IsNull | CompareOp::IsNotNull)
    }
}

/// `column <op> ?`, or `column IS [NOT] NULL` when `value` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub column: AnyColumn,
    pub op: CompareOp,
    pub value: Option<Value>,
}

/// `column [NOT] IN (?, ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InList {
    pub column: AnyColumn,
    pub values: Vec<Value>,
    pub negated: bool,
}

/// `column BETWEEN ? AND ?`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Between {
    pub column: AnyColumn,
    pub low: Value,
    pub high: Value,
}

/// `[NOT] EXISTS (<subquery>)` over an already rendered subquery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exists {
    pub subquery: String,
    pub args: Vec<Value>,
    pub negated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Not => "NOT",
        }
    }
}

/// AND/OR over any number of children, or NOT over exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logical {
    op: LogicalOp,
    children: Vec<Predicate>,
}

impl Logical {
    pub fn and(children: Vec<Predicate>) -> Self {
        Self {
            op: LogicalOp::And,
            children,
        }
    }

    pub fn or(children: Vec<Predicate>) -> Self {
        Self {
            op: LogicalOp::Or,
            children,
        }
    }

    pub fn not(child: Predicate) -> Self {
        Self {
            op: LogicalOp::Not,
            children: vec![child],
        }
    }

    pub fn op(&self) -> LogicalOp {
        self.op
    }

    pub fn children(&self) -> &[Predicate] {
        &self.children
    }
}

/// Parenthesization wrapper; no semantic change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group(pub Box<Predicate>);

/// A boolean expression usable in WHERE clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Comparison(Comparison),
    InList(InList),
    Between(Between),
    Exists(Exists),
    Logical(Logical),
    Group(Group),
}

impl Predicate {
    pub fn compare(column: AnyColumn, op: CompareOp, value: Value) -> Self {
        Predicate::Comparison(Comparison {
            column,
            op,
            value: Some(value),
        })
    }

    pub fn is_null(column: AnyColumn) -> Self {
        Predicate::Comparison(Comparison {
            column,
            op: CompareOp::IsNull,
            value: None,
        })
    }

    pub fn is_not_null(column: AnyColumn) -> Self {
        Predicate::Comparison(Comparison {
            column,
            op: CompareOp::IsNotNull,
            value: None,
        })
    }

    pub fn group(inner: Predicate) -> Self {
        Predicate::Group(Group(Box::new(inner)))
    }

    pub fn not(inner: Predicate) -> Self {
        Predicate::Logical(Logical::not(inner))
    }

    /// Fold predicates with `op`: one renders bare, several are combined.
    ///
    /// Returns `None` for an empty list.
    pub fn fold(op: LogicalOp, mut predicates: Vec<Predicate>) -> Option<Predicate> {
        match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(Predicate::Logical(match op {
                LogicalOp::Or => Logical::or(predicates),
                _ => Logical::and(predicates),
            })),
        }
    }

    pub fn render(&self, renderer: &dyn Renderer, use_table_alias: bool) -> SqlFragment {
        match self {
            Predicate::Comparison(expr) => renderer.comparison(expr, use_table_alias),
            Predicate::InList(expr) => renderer.in_list(expr, use_table_alias),
            Predicate::Between(expr) => renderer.between(expr, use_table_alias),
            Predicate::Exists(expr) => renderer.exists(expr, use_table_alias),
            Predicate::Logical(expr) => renderer.logical(expr, use_table_alias),
            Predicate::Group(expr) => renderer.group(expr, use_table_alias),
        }
    }
}
