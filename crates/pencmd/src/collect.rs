//! Grouping a script's lines into blocks.
//!
//! A script is processed in a single pass. Plain assignments take effect as soon as they're
//! seen, and a `while` or `if` block runs as soon as its closing line is reached. Everything
//! else at the top level is checked and queued, to be run afterwards with
//! [`Executor::execute`]. Only one block can be open at a time.

use std::fmt;

use crate::{
    canvas::Canvas,
    exec::Executor,
    parse::{classify, Command},
    typ::Error,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlockKind {
    While,
    If,
}

impl BlockKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            BlockKind::While => "while",
            BlockKind::If => "if",
        }
    }

    pub fn end_keyword(&self) -> &'static str {
        match self {
            BlockKind::While => "endwhile",
            BlockKind::If => "endif",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The body of a `while` or `if`, together with its condition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub condition: String,
    pub body: Vec<Command>,
    /// The (1-based) line the block was opened on.
    pub line: usize,
}

impl Block {
    fn closed_by(&self, cmd: &Command) -> bool {
        matches!(
            (self.kind, cmd),
            (BlockKind::While, Command::EndWhile) | (BlockKind::If, Command::EndIf)
        )
    }
}

/// The outcome of the validation pass.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Batch {
    /// Valid top-level commands, waiting to be executed.
    pub commands: Vec<Command>,
    /// Top-level lines that didn't match any grammar, with their (1-based) line numbers.
    pub rejected: Vec<(usize, String)>,
}

impl Batch {
    pub fn is_valid(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl<C: Canvas> Executor<C> {
    /// Makes a single pass over `lines`.
    ///
    /// Unrecognized top-level lines don't stop the pass: they're collected in
    /// [`Batch::rejected`]. Any other problem stops it and is returned.
    pub fn parse_and_validate<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<Batch, Error> {
        let mut batch = Batch::default();
        let mut open = None;
        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;
            if let Err(e) = self.collect_line(line_no, line.as_ref(), &mut open, &mut batch) {
                log::error!("line {line_no}: {e}");
                return Err(e);
            }
        }
        if let Some(block) = open {
            let e = Error::Syntax(format!(
                "missing {} for the {} on line {}",
                block.kind.end_keyword(),
                block.kind,
                block.line
            ));
            log::error!("{e}");
            return Err(e);
        }
        Ok(batch)
    }

    fn collect_line(
        &mut self,
        line_no: usize,
        line: &str,
        open: &mut Option<Block>,
        batch: &mut Batch,
    ) -> Result<(), Error> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        let cmd = classify(line);

        let Some(block) = open.as_mut() else {
            return self.collect_top_level(line_no, cmd, open, batch);
        };

        if block.closed_by(&cmd) {
            if let Some(block) = open.take() {
                log::debug!(
                    "running {} block from line {} ({} lines)",
                    block.kind,
                    block.line,
                    block.body.len()
                );
                self.run_block(&block)?;
            }
            Ok(())
        } else if cmd.is_block_marker() {
            Err(Error::Syntax(format!(
                "nested blocks are not supported ({} inside the {} on line {})",
                cmd.name(),
                block.kind,
                block.line
            )))
        } else {
            block.body.push(cmd);
            Ok(())
        }
    }

    fn collect_top_level(
        &mut self,
        line_no: usize,
        cmd: Command,
        open: &mut Option<Block>,
        batch: &mut Batch,
    ) -> Result<(), Error> {
        match cmd {
            Command::Assign { name, value } => self.vars_mut().assign(&name, value)?,
            Command::While(condition) => {
                *open = Some(Block {
                    kind: BlockKind::While,
                    condition,
                    body: Vec::new(),
                    line: line_no,
                });
            }
            Command::If(condition) => {
                *open = Some(Block {
                    kind: BlockKind::If,
                    condition,
                    body: Vec::new(),
                    line: line_no,
                });
            }
            Command::EndWhile | Command::EndIf => {
                return Err(Error::Syntax(format!(
                    "{} without a matching {}",
                    cmd.name(),
                    if cmd == Command::EndWhile { "while" } else { "if" }
                )));
            }
            Command::Unrecognized(line) => {
                log::warn!("line {line_no}: unrecognized command {line:?}");
                batch.rejected.push((line_no, line));
            }
            cmd => batch.commands.push(cmd),
        }
        Ok(())
    }

    /// Validates `lines` and, if they're all valid, executes the queued commands.
    pub fn run<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<Batch, Error> {
        let batch = self.parse_and_validate(lines)?;
        if batch.is_valid() {
            self.execute(&batch.commands)?;
        } else {
            log::warn!(
                "{} invalid line(s), not executing the queued commands",
                batch.rejected.len()
            );
        }
        Ok(batch)
    }
}
