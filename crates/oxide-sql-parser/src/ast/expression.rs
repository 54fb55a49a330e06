//! Expression AST types.

use super::{DataType, OrderBy, Query};
use crate::lexer::Span;

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Literal<'a> {
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// Integer literal outside the `i64` range, kept as its digits.
    Numeric(&'a str),
    /// String literal.
    String(&'a str),
    /// Blob literal.
    Blob(&'a [u8]),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
    /// A string with a type prefix, e.g. `DATE '2024-01-01'`.
    Typed {
        /// The prefixed type.
        data_type: DataType<'a>,
        /// The string contents.
        value: &'a str,
    },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String
    Concat,

    // Bitwise
    BitAnd,
    BitOr,
    LeftShift,
    RightShift,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// Returns true for `= <> < <= > >=`.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Unary plus (+)
    Plus,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "NOT",
            Self::BitNot => "~",
        }
    }
}

/// How a parameter placeholder was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParameterStyle {
    /// `?`, numbered in order of appearance.
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `:name`
    Colon,
    /// `@name`
    At,
}

/// A function call expression.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionCall<'a> {
    /// The function name.
    pub name: &'a str,
    /// The arguments. `COUNT(*)` has a single wildcard argument.
    pub args: &'a [Expr<'a>],
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// The OVER clause of a window function call.
    pub over: Option<WindowSpec<'a>>,
    /// Source span, from the name to the closing parenthesis or OVER clause.
    pub span: Span,
}

/// A window specification: `OVER (PARTITION BY ... ORDER BY ... frame)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WindowSpec<'a> {
    /// PARTITION BY expressions.
    pub partition_by: &'a [Expr<'a>],
    /// ORDER BY entries.
    pub order_by: &'a [OrderBy<'a>],
    /// Frame clause.
    pub frame: Option<WindowFrame<'a>>,
    /// Source span of the parenthesized specification.
    pub span: Span,
}

/// Frame units of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FrameUnits {
    /// ROWS
    Rows,
    /// RANGE
    Range,
}

/// A window frame: `ROWS|RANGE start` or `ROWS|RANGE BETWEEN start AND end`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WindowFrame<'a> {
    /// ROWS or RANGE.
    pub units: FrameUnits,
    /// Start bound.
    pub start: FrameBound<'a>,
    /// End bound, when written with BETWEEN.
    pub end: Option<FrameBound<'a>>,
}

/// One bound of a window frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FrameBound<'a> {
    /// UNBOUNDED PRECEDING
    UnboundedPreceding,
    /// `expr` PRECEDING
    Preceding(&'a Expr<'a>),
    /// CURRENT ROW
    CurrentRow,
    /// `expr` FOLLOWING
    Following(&'a Expr<'a>),
    /// UNBOUNDED FOLLOWING
    UnboundedFollowing,
}

/// An SQL expression.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Expr<'a> {
    /// A literal value.
    Literal {
        /// The value.
        value: Literal<'a>,
        /// Source span.
        span: Span,
    },

    /// A column reference (optionally qualified with table name).
    Column {
        /// Table name or alias (optional).
        table: Option<&'a str>,
        /// Column name.
        name: &'a str,
        /// Source span.
        span: Span,
    },

    /// Wildcard (`*` or `t.*`).
    Wildcard {
        /// Table qualifier (optional).
        table: Option<&'a str>,
        /// Source span.
        span: Span,
    },

    /// A parameter placeholder.
    Parameter {
        /// The parameter name, for `:name` and `@name`.
        name: Option<&'a str>,
        /// 1-based position for `?` and `$n`; 0 for named parameters.
        position: usize,
        /// How the placeholder was written.
        style: ParameterStyle,
        /// Source span.
        span: Span,
    },

    /// A binary expression.
    Binary {
        /// Left operand.
        left: &'a Expr<'a>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: &'a Expr<'a>,
        /// Source span.
        span: Span,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: &'a Expr<'a>,
        /// Source span.
        span: Span,
    },

    /// A function call.
    Function(FunctionCall<'a>),

    /// A scalar subquery.
    Subquery {
        /// The subquery.
        query: &'a Query<'a>,
        /// Source span, including the parentheses.
        span: Span,
    },

    /// EXISTS (subquery).
    Exists {
        /// The subquery.
        query: &'a Query<'a>,
        /// Source span.
        span: Span,
    },

    /// IS [NOT] NULL.
    IsNull {
        /// The expression to check.
        expr: &'a Expr<'a>,
        /// Whether this is IS NOT NULL.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// IS [NOT] TRUE / IS [NOT] FALSE.
    IsBool {
        /// The expression to check.
        expr: &'a Expr<'a>,
        /// TRUE or FALSE.
        value: bool,
        /// Whether NOT was written.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// IS [NOT] DISTINCT FROM.
    IsDistinctFrom {
        /// Left operand.
        left: &'a Expr<'a>,
        /// Right operand.
        right: &'a Expr<'a>,
        /// Whether this is IS NOT DISTINCT FROM.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// [NOT] IN (list).
    In {
        /// The expression to check.
        expr: &'a Expr<'a>,
        /// The list of values.
        list: &'a [Expr<'a>],
        /// Whether this is NOT IN.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// [NOT] IN (subquery).
    InSubquery {
        /// The expression to check.
        expr: &'a Expr<'a>,
        /// The subquery.
        query: &'a Query<'a>,
        /// Whether this is NOT IN.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// [NOT] BETWEEN low AND high.
    Between {
        /// The expression to check.
        expr: &'a Expr<'a>,
        /// Lower bound.
        low: &'a Expr<'a>,
        /// Upper bound.
        high: &'a Expr<'a>,
        /// Whether this is NOT BETWEEN.
        negated: bool,
        /// Source span.
        span: Span,
    },

    /// [NOT] LIKE / [NOT] ILIKE.
    Like {
        /// The expression to match.
        expr: &'a Expr<'a>,
        /// The pattern.
        pattern: &'a Expr<'a>,
        /// Whether NOT was written.
        negated: bool,
        /// ILIKE rather than LIKE.
        case_insensitive: bool,
        /// Source span.
        span: Span,
    },

    /// CASE expression.
    Case {
        /// The operand (if any).
        operand: Option<&'a Expr<'a>>,
        /// WHEN/THEN clauses.
        when_clauses: &'a [(Expr<'a>, Expr<'a>)],
        /// ELSE clause.
        else_clause: Option<&'a Expr<'a>>,
        /// Source span, from CASE to END.
        span: Span,
    },

    /// `CAST(expr AS type)` or `expr::type`.
    Cast {
        /// Expression to cast.
        expr: &'a Expr<'a>,
        /// Target type.
        data_type: DataType<'a>,
        /// Source span.
        span: Span,
    },

    /// Parenthesized expression.
    Paren {
        /// The inner expression.
        expr: &'a Expr<'a>,
        /// Source span, including the parentheses.
        span: Span,
    },

    /// A row constructor, `(a, b, ...)`.
    Tuple {
        /// The items, two or more.
        items: &'a [Expr<'a>],
        /// Source span, including the parentheses.
        span: Span,
    },
}

impl<'a> Expr<'a> {
    /// Returns the source span of the expression.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Function(call) => call.span,
            Self::Literal { span, .. }
            | Self::Column { span, .. }
            | Self::Wildcard { span, .. }
            | Self::Parameter { span, .. }
            | Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Subquery { span, .. }
            | Self::Exists { span, .. }
            | Self::IsNull { span, .. }
            | Self::IsBool { span, .. }
            | Self::IsDistinctFrom { span, .. }
            | Self::In { span, .. }
            | Self::InSubquery { span, .. }
            | Self::Between { span, .. }
            | Self::Like { span, .. }
            | Self::Case { span, .. }
            | Self::Cast { span, .. }
            | Self::Paren { span, .. }
            | Self::Tuple { span, .. } => *span,
        }
    }

    /// Creates a literal expression.
    #[must_use]
    pub const fn literal(value: Literal<'a>, span: Span) -> Self {
        Self::Literal { value, span }
    }

    /// Creates a new column reference with an empty span.
    #[must_use]
    pub const fn column(name: &'a str) -> Self {
        Self::Column {
            table: None,
            name,
            span: Span::new(0, 0),
        }
    }

    /// Creates a new qualified column reference with an empty span.
    #[must_use]
    pub const fn qualified_column(table: &'a str, name: &'a str) -> Self {
        Self::Column {
            table: Some(table),
            name,
            span: Span::new(0, 0),
        }
    }

    /// Creates a new integer literal with an empty span.
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::literal(Literal::Integer(value), Span::new(0, 0))
    }

    /// Creates a new string literal with an empty span.
    #[must_use]
    pub const fn string(value: &'a str) -> Self {
        Self::literal(Literal::String(value), Span::new(0, 0))
    }

    /// Creates a binary expression spanning both operands.
    ///
    /// Both operands must already live in the arena that owns the tree.
    #[must_use]
    pub fn binary(&'a self, op: BinaryOp, right: &'a Self) -> Self {
        Self::Binary {
            left: self,
            op,
            right,
            span: self.span().merge(right.span()),
        }
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(&'a self, right: &'a Self) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(&'a self, right: &'a Self) -> Self {
        self.binary(BinaryOp::And, right)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(&'a self, right: &'a Self) -> Self {
        self.binary(BinaryOp::Or, right)
    }
}
