use std::fmt;

/// The operator of a function application.
///
/// Operators known to the library have their own variant, with a canonical builder and a fixed
/// arity. Any other name becomes [`Operator::Custom`], whose applications are left as written
/// (apart from canonicalizing the operands).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Negate,
    Power,
    Sqrt,

    /// `Root(x, n)`, the `n`-th root of `x`.
    Root,

    /// `Rational(p, q)`, an exact fraction of two integer literals.
    Rational,

    /// `Sum(body, Limits(index, lower, upper))`.
    Sum,

    /// `Product(body, Limits(index, lower, upper))`.
    Product,

    /// The index and bounds of a [`Operator::Sum`] or [`Operator::Product`].
    Limits,

    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Abs,

    List,
    Tuple,

    /// A collection of [`Operator::KeyValuePair`]s with unique string keys.
    Dictionary,
    KeyValuePair,

    /// A list of expressions spliced into the operand list of its parent.
    Sequence,

    /// `Error('code', culprit)`, produced in place of malformed input.
    Error,

    /// Any other operator, identified by name.
    Custom(String),
}

impl Operator {
    /// Returns the operator with the given name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Add" => Self::Add,
            "Subtract" => Self::Subtract,
            "Multiply" => Self::Multiply,
            "Divide" => Self::Divide,
            "Negate" => Self::Negate,
            "Power" => Self::Power,
            "Sqrt" => Self::Sqrt,
            "Root" => Self::Root,
            "Rational" => Self::Rational,
            "Sum" => Self::Sum,
            "Product" => Self::Product,
            "Limits" => Self::Limits,
            "Equal" => Self::Equal,
            "NotEqual" => Self::NotEqual,
            "Less" => Self::Less,
            "LessEqual" => Self::LessEqual,
            "Greater" => Self::Greater,
            "GreaterEqual" => Self::GreaterEqual,
            "Sin" => Self::Sin,
            "Cos" => Self::Cos,
            "Tan" => Self::Tan,
            "Exp" => Self::Exp,
            "Ln" => Self::Ln,
            "Abs" => Self::Abs,
            "List" => Self::List,
            "Tuple" => Self::Tuple,
            "Dictionary" => Self::Dictionary,
            "KeyValuePair" => Self::KeyValuePair,
            "Sequence" => Self::Sequence,
            "Error" => Self::Error,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Returns the name of the operator.
    pub fn name(&self) -> &str {
        match self {
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
            Self::Negate => "Negate",
            Self::Power => "Power",
            Self::Sqrt => "Sqrt",
            Self::Root => "Root",
            Self::Rational => "Rational",
            Self::Sum => "Sum",
            Self::Product => "Product",
            Self::Limits => "Limits",
            Self::Equal => "Equal",
            Self::NotEqual => "NotEqual",
            Self::Less => "Less",
            Self::LessEqual => "LessEqual",
            Self::Greater => "Greater",
            Self::GreaterEqual => "GreaterEqual",
            Self::Sin => "Sin",
            Self::Cos => "Cos",
            Self::Tan => "Tan",
            Self::Exp => "Exp",
            Self::Ln => "Ln",
            Self::Abs => "Abs",
            Self::List => "List",
            Self::Tuple => "Tuple",
            Self::Dictionary => "Dictionary",
            Self::KeyValuePair => "KeyValuePair",
            Self::Sequence => "Sequence",
            Self::Error => "Error",
            Self::Custom(name) => name,
        }
    }

    /// Returns true if the order of the operands does not matter.
    pub fn is_commutative(&self) -> bool {
        matches!(self, Self::Add | Self::Multiply | Self::Equal | Self::NotEqual)
    }

    /// Returns true if nested applications of the operator can be flattened.
    pub fn is_associative(&self) -> bool {
        matches!(self, Self::Add | Self::Multiply)
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::Less
                | Self::LessEqual
                | Self::Greater
                | Self::GreaterEqual
        )
    }

    /// Returns the minimum and maximum number of operands the operator accepts. A maximum of
    /// [`None`] means any number of operands is accepted.
    pub fn arity(&self) -> (usize, Option<usize>) {
        match self {
            Self::Add | Self::Multiply => (0, None),
            Self::Subtract => (1, Some(2)),
            Self::Negate
                | Self::Sqrt
                | Self::Sin
                | Self::Cos
                | Self::Tan
                | Self::Exp
                | Self::Ln
                | Self::Abs => (1, Some(1)),
            Self::Divide | Self::Power | Self::Root | Self::Rational | Self::KeyValuePair => {
                (2, Some(2))
            },
            Self::Equal
                | Self::NotEqual
                | Self::Less
                | Self::LessEqual
                | Self::Greater
                | Self::GreaterEqual => (2, Some(2)),
            Self::Sum | Self::Product => (2, Some(2)),
            Self::Limits => (3, Some(3)),
            Self::Error => (1, Some(2)),
            Self::List
                | Self::Tuple
                | Self::Dictionary
                | Self::Sequence
                | Self::Custom(_) => (0, None),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}
