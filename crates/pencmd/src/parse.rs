use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit1, i32 as int, one_of, space0, space1},
    combinator::{all_consuming, map, map_opt, map_res, recognize, rest, value, verify},
    multi::many0,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};

use crate::typ::{ArithOp, Color, Operand};

/// One line of a script, after classification. Operands are captured but not resolved.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    DrawTo(Operand, Operand),
    MoveTo(Operand, Operand),
    Rect(Operand, Operand),
    Trig(Operand),
    Circle(Operand),
    Clear,
    Reset,
    Run,
    Fill { on: bool, color: Color },
    Pen(Color),
    /// The start of a `while` block, with its (unparsed) condition.
    While(String),
    EndWhile,
    /// The start of an `if` block, with its (unparsed) condition.
    If(String),
    EndIf,
    Assign {
        name: String,
        value: i32,
    },
    AssignArith {
        name: String,
        source: String,
        op: ArithOp,
        operand: i32,
    },
    Unrecognized(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::DrawTo(..) => "drawto",
            Command::MoveTo(..) => "moveto",
            Command::Rect(..) => "rect",
            Command::Trig(_) => "trig",
            Command::Circle(_) => "circle",
            Command::Clear => "clear",
            Command::Reset => "reset",
            Command::Run => "run",
            Command::Fill { .. } => "fill-toggle",
            Command::Pen(_) => "pen-color",
            Command::While(_) => "while-start",
            Command::EndWhile => "endwhile",
            Command::If(_) => "if-start",
            Command::EndIf => "endif",
            Command::Assign { .. } => "assign-literal",
            Command::AssignArith { .. } => "assign-arithmetic",
            Command::Unrecognized(_) => "unrecognized",
        }
    }

    /// Is this one of the lines that opens or closes a block?
    pub fn is_block_marker(&self) -> bool {
        matches!(
            self,
            Command::While(_) | Command::EndWhile | Command::If(_) | Command::EndIf
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::DrawTo(x, y) => write!(f, "drawto {x}, {y}"),
            Command::MoveTo(x, y) => write!(f, "moveto {x}, {y}"),
            Command::Rect(w, h) => write!(f, "rect {w}, {h}"),
            Command::Trig(side) => write!(f, "trig {side}"),
            Command::Circle(r) => write!(f, "circle {r}"),
            Command::Clear => f.write_str("clear"),
            Command::Reset => f.write_str("reset"),
            Command::Run => f.write_str("run"),
            Command::Fill { on, color } => {
                let on = if *on { "on" } else { "off" };
                write!(f, "fill {on} color:{color}")
            }
            Command::Pen(color) => write!(f, "pen {color}"),
            Command::While(cond) => write!(f, "while {cond}"),
            Command::EndWhile => f.write_str("endwhile"),
            Command::If(cond) => write!(f, "if {cond}"),
            Command::EndIf => f.write_str("endif"),
            Command::Assign { name, value } => write!(f, "{name} = {value}"),
            Command::AssignArith {
                name,
                source,
                op,
                operand,
            } => write!(f, "{name} = {source} {} {operand}", op.name()),
            Command::Unrecognized(line) => f.write_str(line),
        }
    }
}

type Grammar = fn(&str) -> IResult<&str, Command>;

/// Line grammars, in the order they're tried. The first one that consumes the whole line wins.
///
/// Assignments go first, so that `if = 4` assigns to `if` instead of opening a block.
const GRAMMARS: &[(&str, Grammar)] = &[
    ("assign", assign),
    ("assign-arithmetic", assign_arith),
    ("drawto", drawto),
    ("moveto", moveto),
    ("rect", rect),
    ("trig", trig),
    ("circle", circle),
    ("clear", clear),
    ("reset", reset),
    ("run", run),
    ("fill", fill),
    ("pen", pen),
    ("while", while_start),
    ("endwhile", endwhile),
    ("if", if_start),
    ("endif", endif),
];

/// Classifies a single (trimmed) line.
pub fn classify(line: &str) -> Command {
    let line = line.trim();
    GRAMMARS
        .iter()
        .find_map(|(name, grammar)| {
            let (_, cmd) = all_consuming(*grammar)(line).ok()?;
            log::trace!("{line:?} matched {name}");
            Some(cmd)
        })
        .unwrap_or_else(|| Command::Unrecognized(line.to_owned()))
}

/// Parses a plain `NAME = INTEGER` assignment.
pub fn assignment(line: &str) -> Option<(String, i32)> {
    match classify(line) {
        Command::Assign { name, value } => Some((name, value)),
        _ => None,
    }
}

pub fn is_ident(s: &str) -> bool {
    all_consuming(ident)(s).is_ok()
}

pub fn ident(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

pub fn operand(input: &str) -> IResult<&str, Operand> {
    alt((
        map(int, Operand::Lit),
        map(ident, |name: &str| Operand::Var(name.to_owned())),
    ))(input)
}

fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(kw), space1)
}

fn two_operands(input: &str) -> IResult<&str, (Operand, Operand)> {
    separated_pair(operand, delimited(space0, char(','), space0), operand)(input)
}

fn palette(input: &str) -> IResult<&str, Color> {
    map_opt(alpha1, Color::from_palette)(input)
}

fn condition_text(input: &str) -> IResult<&str, String> {
    map(verify(rest, |s: &str| !s.trim().is_empty()), |s: &str| {
        s.trim().to_owned()
    })(input)
}

fn equals(input: &str) -> IResult<&str, char> {
    delimited(space0, char('='), space0)(input)
}

fn drawto(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("drawto"), two_operands), |(x, y)| {
        Command::DrawTo(x, y)
    })(input)
}

fn moveto(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("moveto"), two_operands), |(dx, dy)| {
        Command::MoveTo(dx, dy)
    })(input)
}

fn rect(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("rect"), two_operands), |(w, h)| {
        Command::Rect(w, h)
    })(input)
}

fn trig(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("trig"), operand), Command::Trig)(input)
}

fn circle(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("circle"), operand), Command::Circle)(input)
}

fn clear(input: &str) -> IResult<&str, Command> {
    value(Command::Clear, tag("clear"))(input)
}

fn reset(input: &str) -> IResult<&str, Command> {
    value(Command::Reset, tag("reset"))(input)
}

fn run(input: &str) -> IResult<&str, Command> {
    value(Command::Run, tag("run"))(input)
}

fn fill(input: &str) -> IResult<&str, Command> {
    map(
        tuple((
            keyword("fill"),
            alt((value(true, tag("on")), value(false, tag("off")))),
            space1,
            tag("color:"),
            palette,
        )),
        |(_fill, on, _, _color, color)| Command::Fill { on, color },
    )(input)
}

fn pen(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("pen"), palette), Command::Pen)(input)
}

fn while_start(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("while"), condition_text), Command::While)(input)
}

fn endwhile(input: &str) -> IResult<&str, Command> {
    value(Command::EndWhile, tag("endwhile"))(input)
}

fn if_start(input: &str) -> IResult<&str, Command> {
    map(preceded(keyword("if"), condition_text), Command::If)(input)
}

fn endif(input: &str) -> IResult<&str, Command> {
    value(Command::EndIf, tag("endif"))(input)
}

fn assign(input: &str) -> IResult<&str, Command> {
    map(separated_pair(ident, equals, int), |(name, value)| {
        Command::Assign {
            name: name.to_owned(),
            value,
        }
    })(input)
}

fn assign_arith(input: &str) -> IResult<&str, Command> {
    let op = map_opt(one_of("+-*/"), |ch| ArithOp::try_from(ch).ok());
    let literal = map_res(digit1, str::parse::<i32>);
    map(
        tuple((ident, equals, ident, delimited(space0, op, space0), literal)),
        |(name, _eq, source, op, operand)| Command::AssignArith {
            name: name.to_owned(),
            source: source.to_owned(),
            op,
            operand,
        },
    )(input)
}
