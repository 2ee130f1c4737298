use std::{fmt, str::FromStr};

use crate::config::Config;

/// A position on the drawing surface, in pixels. `y` grows downwards.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Blue,
    Yellow,
    SlateGray,
}

impl Color {
    /// The colors a script can pick with `pen` and `fill`.
    pub const PALETTE: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    /// The color's name. These are also valid SVG color keywords.
    pub fn name(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::SlateGray => "slategray",
        }
    }

    /// Looks up a palette color by name.
    pub fn from_palette(name: &str) -> Option<Color> {
        Color::PALETTE.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The stroke used for lines and shape outlines.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: i32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Fill {
    pub enabled: bool,
    pub color: Color,
}

/// The mutable drawing state threaded through execution: where the cursor is and how things
/// get drawn.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ctx {
    pub cursor: Point,
    pub pen: Pen,
    pub fill: Fill,
}

impl Ctx {
    pub fn new(config: &Config) -> Ctx {
        Ctx {
            cursor: Point::ORIGIN,
            pen: Pen {
                color: config.pen,
                width: config.line_width,
            },
            fill: Fill {
                enabled: false,
                color: config.pen,
            },
        }
    }
}

impl Default for Ctx {
    fn default() -> Self {
        Ctx::new(&Config::default())
    }
}

/// A value held by a variable.
///
/// Scripts can only ever store integers; text values can be stored through the API.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Int(i32),
    Text(String),
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Int(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(x) => x.fmt(f),
            Value::Text(s) => f.write_fmt(format_args!("{s:?}")),
        }
    }
}

/// The result of looking up a variable.
///
/// `NotFound` hands back the name that was looked up, so callers that only want "the value, or
/// else the name" can still get it, but without mistaking a missing variable for one that
/// happens to hold its own name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Value),
    NotFound(&'a str),
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a Value> {
        match self {
            Lookup::Found(v) => Some(v),
            Lookup::NotFound(_) => None,
        }
    }

    pub fn int(self) -> Option<i32> {
        match self {
            Lookup::Found(Value::Int(x)) => Some(*x),
            _ => None,
        }
    }
}

/// A command or condition argument: either an integer literal or the name of a variable.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Operand {
    Lit(i32),
    Var(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Lit(x) => x.fmt(f),
            Operand::Var(name) => f.write_str(name),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn name(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    /// Integer arithmetic. Division truncates towards zero.
    pub fn apply(&self, lhs: i32, rhs: i32) -> Result<i32, Error> {
        let res = match self {
            ArithOp::Add => lhs.checked_add(rhs),
            ArithOp::Sub => lhs.checked_sub(rhs),
            ArithOp::Mul => lhs.checked_mul(rhs),
            ArithOp::Div => {
                if rhs == 0 {
                    return Err(Error::DivisionByZero);
                }
                lhs.checked_div(rhs)
            }
        };
        res.ok_or_else(|| Error::Range(format!("{lhs} {} {rhs} overflows", self.name())))
    }
}

impl TryFrom<char> for ArithOp {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Ok(match value {
            '+' => ArithOp::Add,
            '-' => ArithOp::Sub,
            '*' => ArithOp::Mul,
            '/' => ArithOp::Div,
            _ => Err(())?,
        })
    }
}

impl FromStr for ArithOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let mut chars = s.chars();
        let op = match (chars.next(), chars.next()) {
            (Some(ch), None) => ArithOp::try_from(ch).ok(),
            _ => None,
        };
        op.ok_or_else(|| Error::Syntax(format!("invalid operator {s:?}")))
    }
}

/// Comparison operators allowed in `while` and `if` conditions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CmpOp {
    pub fn name(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::Le => "<=",
            CmpOp::Ge => ">=",
        }
    }

    pub fn eval(&self, lhs: i32, rhs: i32) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Ge => lhs >= rhs,
        }
    }
}

impl FromStr for CmpOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(match s {
            "==" => CmpOp::Eq,
            "!=" => CmpOp::Ne,
            "<" => CmpOp::Lt,
            ">" => CmpOp::Gt,
            "<=" => CmpOp::Le,
            ">=" => CmpOp::Ge,
            _ => return Err(Error::Syntax(format!("invalid operator {s:?}"))),
        })
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something that stops the command currently being processed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// A malformed condition, or an operator we don't support.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// A parameter that is missing or has the wrong shape, such as an empty text value.
    #[error("invalid value: {0}")]
    Validation(String),
    /// A non-positive variable value, or a negative size.
    #[error("out of range: {0}")]
    Range(String),
    /// An operand that is neither a literal nor the name of an integer variable.
    #[error("{operand} is neither a number nor a variable holding a number")]
    Unresolved { operand: String },
    /// An arithmetic assignment that divides by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// A `while` loop that ran into [`Config::max_iterations`](crate::Config::max_iterations).
    #[error("while loop still running after {limit} iterations")]
    LoopLimit { limit: u64 },
}

/// Something worth telling the user about that doesn't stop execution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notice {
    Unrecognized(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Unrecognized(line) => write!(f, "Unrecognized command: {line}"),
        }
    }
}
