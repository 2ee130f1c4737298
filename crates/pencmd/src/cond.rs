use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::space0,
    combinator::{all_consuming, map_res},
    sequence::{delimited, tuple},
    IResult,
};

use crate::{
    parse::operand,
    typ::{CmpOp, Error, Operand},
    vars::Variables,
};

/// A binary comparison such as `x < 10`, as found after `while` and `if`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Condition {
    pub left: Operand,
    pub op: CmpOp,
    pub right: Operand,
}

fn cmp_op(input: &str) -> IResult<&str, CmpOp> {
    // Two-character operators first, so that `<=` isn't read as `<` followed by junk.
    map_res(
        alt((tag("=="), tag("!="), tag("<="), tag(">="), tag("<"), tag(">"))),
        str::parse::<CmpOp>,
    )(input)
}

fn condition(input: &str) -> IResult<&str, Condition> {
    let (input, (left, op, right)) = tuple((
        delimited(space0, operand, space0),
        cmp_op,
        delimited(space0, operand, space0),
    ))(input)?;
    Ok((input, Condition { left, op, right }))
}

impl Condition {
    pub fn parse(text: &str) -> Result<Condition, Error> {
        all_consuming(condition)(text)
            .map(|(_, cond)| cond)
            .map_err(|_| Error::Syntax(format!("invalid condition format: {text:?}")))
    }

    /// Resolves both sides against `vars` and compares them.
    pub fn eval(&self, vars: &Variables) -> Result<bool, Error> {
        let lhs = vars.resolve(&self.left)?;
        let rhs = vars.resolve(&self.right)?;
        Ok(self.op.eval(lhs, rhs))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

/// Parses and evaluates a condition in one go.
pub fn evaluate(text: &str, vars: &Variables) -> Result<bool, Error> {
    Condition::parse(text)?.eval(vars)
}

/// Compares two numbers using an operator given as text.
pub fn compare(lhs: i32, op: &str, rhs: i32) -> Result<bool, Error> {
    Ok(op.parse::<CmpOp>()?.eval(lhs, rhs))
}
