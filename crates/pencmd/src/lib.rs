//! An interpreter for a small line-oriented drawing language.
//!
//! ```text
//! x = 10
//! while x < 100
//! circle x
//! x = x + 10
//! endwhile
//! pen red
//! drawto 200, 150
//! ```
//!
//! Scripts move a pen around a [`Canvas`], draw shapes at the pen's position, and manipulate
//! positive integer variables. See [`Executor::run`] for the main entry point.

pub mod canvas;
pub mod collect;
pub mod cond;
pub mod config;
pub mod exec;
pub mod parse;
pub mod typ;
pub mod vars;

pub use canvas::{Canvas, DrawOp, Recorder};
pub use collect::{Batch, Block, BlockKind};
pub use cond::{compare, evaluate, Condition};
pub use config::Config;
pub use exec::Executor;
pub use parse::{classify, Command};
pub use typ::{
    ArithOp, CmpOp, Color, Ctx, Error, Fill, Lookup, Notice, Operand, Pen, Point, Value,
};
pub use vars::Variables;

/// Prepares raw script text for [`Executor::run`]: lower-cases it and splits it into trimmed
/// lines. Blank lines are kept (as empty strings) so that line numbers stay meaningful.
pub fn normalize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split("\r\n")
        .flat_map(|chunk| chunk.split(|c| c == '\r' || c == '\n'))
        .map(|line| line.trim().to_owned())
        .collect()
}
