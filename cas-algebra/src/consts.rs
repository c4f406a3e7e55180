//! Constants used throughout the library. Expression constants are built lazily, once, and are
//! cheap to clone.

use crate::expr::Expr;
use crate::numeric::Number;
use once_cell::sync::Lazy;

/// Inexact values whose magnitude falls below this threshold are chopped to an exact zero.
pub const TOLERANCE: f64 = 1e-10;

/// Names of the well-known symbols.
pub mod symbols {
    /// The imaginary unit, `i`.
    pub const IMAGINARY_UNIT: &str = "ImaginaryUnit";

    /// The ratio of a circle's circumference to its diameter.
    pub const PI: &str = "Pi";

    /// Euler's number.
    pub const EXPONENTIAL_E: &str = "ExponentialE";

    /// The empty result, produced by an empty sequence.
    pub const NOTHING: &str = "Nothing";

    pub const TRUE: &str = "True";

    pub const FALSE: &str = "False";
}

/// The number zero, wrapped in an [`Expr`].
pub static ZERO: Lazy<Expr> = Lazy::new(|| Expr::integer(0));

/// The number one, wrapped in an [`Expr`].
pub static ONE: Lazy<Expr> = Lazy::new(|| Expr::integer(1));

/// The number negative one, wrapped in an [`Expr`].
pub static NEG_ONE: Lazy<Expr> = Lazy::new(|| Expr::integer(-1));

/// The number 1/2, wrapped in an [`Expr`].
pub static ONE_HALF: Lazy<Expr> = Lazy::new(|| Expr::rational(1, 2));

pub static NAN: Lazy<Expr> = Lazy::new(|| Expr::number(Number::NaN));

pub static COMPLEX_INFINITY: Lazy<Expr> = Lazy::new(|| Expr::number(Number::ComplexInfinity));

/// The imaginary unit symbol.
pub static I: Lazy<Expr> = Lazy::new(|| Expr::symbol(symbols::IMAGINARY_UNIT));

pub static PI: Lazy<Expr> = Lazy::new(|| Expr::symbol(symbols::PI));

pub static E: Lazy<Expr> = Lazy::new(|| Expr::symbol(symbols::EXPONENTIAL_E));

pub static NOTHING: Lazy<Expr> = Lazy::new(|| Expr::symbol(symbols::NOTHING));

pub static TRUE: Lazy<Expr> = Lazy::new(|| Expr::symbol(symbols::TRUE));

pub static FALSE: Lazy<Expr> = Lazy::new(|| Expr::symbol(symbols::FALSE));
