use crate::{
    canvas::Canvas,
    collect::{Block, BlockKind},
    cond::Condition,
    config::Config,
    parse::Command,
    typ::{Ctx, Error, Notice, Point},
    vars::Variables,
};

/// Runs commands: owns the variables and the drawing state, and sends geometry to a [`Canvas`].
///
/// Every executor starts out with its own empty set of variables. To carry variables from one
/// executor over to another, use [`Executor::into_vars`] and [`Executor::with_vars`].
pub struct Executor<C> {
    canvas: C,
    vars: Variables,
    ctx: Ctx,
    config: Config,
    notices: Vec<Notice>,
}

fn non_negative(what: &str, value: i32) -> Result<i32, Error> {
    if value < 0 {
        Err(Error::Range(format!("{what} cannot be negative (got {value})")))
    } else {
        Ok(value)
    }
}

impl<C: Canvas> Executor<C> {
    pub fn new(canvas: C) -> Self {
        Self::with_config(canvas, Config::default())
    }

    pub fn with_config(canvas: C, config: Config) -> Self {
        Executor {
            canvas,
            vars: Variables::new(),
            ctx: Ctx::new(&config),
            config,
            notices: Vec::new(),
        }
    }

    /// Replaces this executor's variables with `vars`.
    pub fn with_vars(mut self, vars: Variables) -> Self {
        self.vars = vars;
        self
    }

    pub fn vars(&self) -> &Variables {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut Variables {
        &mut self.vars
    }

    pub fn into_vars(self) -> Variables {
        self.vars
    }

    pub fn ctx(&self) -> &Ctx {
        &self.ctx
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Things that were reported but didn't stop execution, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notice(&mut self, notice: Notice) {
        log::warn!("{notice}");
        self.notices.push(notice);
    }

    /// Runs `commands` in order, stopping at the first error.
    pub fn execute(&mut self, commands: &[Command]) -> Result<(), Error> {
        for cmd in commands {
            self.execute_command(cmd)?;
        }
        Ok(())
    }

    pub fn execute_command(&mut self, cmd: &Command) -> Result<(), Error> {
        log::debug!("executing {cmd}");
        match cmd {
            Command::DrawTo(x, y) => {
                let to = Point::new(self.vars.resolve(x)?, self.vars.resolve(y)?);
                self.canvas.draw_line(self.ctx.cursor, to, self.ctx.pen);
                self.ctx.cursor = to;
            }
            Command::MoveTo(dx, dy) => {
                let dx = self.vars.resolve(dx)?;
                let dy = self.vars.resolve(dy)?;
                let cursor = self.ctx.cursor;
                let moved = cursor
                    .x
                    .checked_add(dx)
                    .zip(cursor.y.checked_add(dy))
                    .ok_or_else(|| {
                        Error::Range(format!("moving {cursor} by {dx},{dy} overflows"))
                    })?;
                self.ctx.cursor = Point::new(moved.0, moved.1);
            }
            Command::Rect(w, h) => {
                let width = non_negative("width", self.vars.resolve(w)?)?;
                let height = non_negative("height", self.vars.resolve(h)?)?;
                non_negative("line width", self.ctx.pen.width)?;
                self.canvas.draw_or_fill_rect(
                    self.ctx.cursor,
                    width,
                    height,
                    self.ctx.pen,
                    self.ctx.fill,
                );
            }
            Command::Trig(side) => {
                let side = non_negative("side length", self.vars.resolve(side)?)?;
                non_negative("line width", self.ctx.pen.width)?;
                self.canvas
                    .draw_or_fill_triangle(self.ctx.cursor, side, self.ctx.pen, self.ctx.fill);
            }
            Command::Circle(r) => {
                let radius = non_negative("radius", self.vars.resolve(r)?)?;
                non_negative("line width", self.ctx.pen.width)?;
                self.canvas
                    .draw_or_fill_circle(self.ctx.cursor, radius, self.ctx.pen, self.ctx.fill);
            }
            Command::Clear => self.canvas.clear_surface(self.config.background),
            Command::Reset => self.ctx = Ctx::new(&self.config),
            // `run` only means something to whoever feeds us the script.
            Command::Run => {}
            Command::Fill { on, color } => {
                self.ctx.fill.enabled = *on;
                self.ctx.fill.color = *color;
            }
            Command::Pen(color) => self.ctx.pen.color = *color,
            Command::Assign { name, value } => self.vars.assign(name, *value)?,
            Command::AssignArith {
                name,
                source,
                op,
                operand,
            } => {
                let lhs = self.vars.resolve_operand(source)?;
                let res = op.apply(lhs, *operand)?;
                self.vars.assign(name, res)?;
            }
            Command::While(_) | Command::If(_) | Command::EndWhile | Command::EndIf => {
                return Err(Error::Syntax(format!(
                    "{} can only be used to delimit a block",
                    cmd.name()
                )));
            }
            Command::Unrecognized(line) => self.notice(Notice::Unrecognized(line.clone())),
        }
        Ok(())
    }

    /// Runs `body` for as long as `condition` holds, checking it before every iteration.
    ///
    /// Returns the number of iterations.
    pub fn run_while(&mut self, condition: &str, body: &[Command]) -> Result<u64, Error> {
        let cond = Condition::parse(condition)?;
        let mut iterations = 0;
        while cond.eval(&self.vars)? {
            if let Some(limit) = self.config.max_iterations {
                if iterations >= limit {
                    return Err(Error::LoopLimit { limit });
                }
            }
            iterations += 1;
            log::trace!("while {cond}: iteration {iterations}");
            self.execute(body)?;
        }
        log::debug!("while {cond}: finished after {iterations} iterations");
        Ok(iterations)
    }

    /// Runs `body` once if `condition` holds. Returns whether it did.
    pub fn run_if(&mut self, condition: &str, body: &[Command]) -> Result<bool, Error> {
        let cond = Condition::parse(condition)?;
        let taken = cond.eval(&self.vars)?;
        log::debug!("if {cond}: {taken}");
        if taken {
            self.execute(body)?;
        }
        Ok(taken)
    }

    pub fn run_block(&mut self, block: &Block) -> Result<(), Error> {
        match block.kind {
            BlockKind::While => self.run_while(&block.condition, &block.body).map(|_| ()),
            BlockKind::If => self.run_if(&block.condition, &block.body).map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        canvas::{DrawOp, Recorder},
        parse::classify,
        typ::{Color, Fill, Operand, Pen, Value},
    };

    fn exec() -> Executor<Recorder> {
        Executor::new(Recorder::new())
    }

    fn cmds(lines: &[&str]) -> Vec<Command> {
        lines.iter().map(|l| classify(l)).collect()
    }

    const BLACK: Pen = Pen {
        color: Color::Black,
        width: 2,
    };

    #[test]
    fn drawto_resolves_variables() {
        let mut ex = exec();
        ex.vars_mut().assign("x", 100).unwrap();
        ex.execute(&cmds(&["drawto x, 50"])).unwrap();
        assert_eq!(
            ex.canvas().ops,
            [DrawOp::Line {
                from: Point::ORIGIN,
                to: Point::new(100, 50),
                pen: BLACK,
            }]
        );
        assert_eq!(ex.ctx().cursor, Point::new(100, 50));
    }

    #[test]
    fn moveto_is_relative() {
        let mut ex = exec();
        ex.execute(&cmds(&["moveto 10, 20", "moveto 5, -5"]))
            .unwrap();
        assert_eq!(ex.ctx().cursor, Point::new(15, 15));
        assert!(ex.canvas().ops.is_empty());
    }

    #[test]
    fn shapes_use_cursor_and_fill() {
        let mut ex = exec();
        ex.execute(&cmds(&[
            "moveto 10, 10",
            "rect 20, 30",
            "fill on color:green",
            "pen blue",
            "circle 5",
            "trig 8",
        ]))
        .unwrap();
        let fill = Fill {
            enabled: true,
            color: Color::Green,
        };
        let blue = Pen {
            color: Color::Blue,
            width: 2,
        };
        assert_eq!(
            ex.canvas().ops[1..],
            [
                DrawOp::Circle {
                    center: Point::new(10, 10),
                    radius: 5,
                    pen: blue,
                    fill,
                },
                DrawOp::Triangle {
                    origin: Point::new(10, 10),
                    side: 8,
                    pen: blue,
                    fill,
                },
            ]
        );
        assert!(matches!(
            ex.canvas().ops[0],
            DrawOp::Rect {
                width: 20,
                height: 30,
                fill: Fill { enabled: false, .. },
                ..
            }
        ));
    }

    #[test]
    fn negative_sizes_never_reach_the_canvas() {
        for cmd in [
            Command::Circle(Operand::Lit(-100)),
            Command::Rect(Operand::Lit(-50), Operand::Lit(-50)),
            Command::Rect(Operand::Lit(50), Operand::Lit(-1)),
            Command::Trig(Operand::Lit(-100)),
        ] {
            let mut ex = exec();
            assert!(matches!(ex.execute_command(&cmd), Err(Error::Range(_))));
            assert!(ex.canvas().ops.is_empty());
        }
    }

    #[test]
    fn negative_line_width() {
        let config = Config {
            line_width: -1,
            ..Config::default()
        };
        let mut ex = Executor::with_config(Recorder::new(), config);
        let res = ex.execute_command(&Command::Circle(Operand::Lit(3)));
        assert!(matches!(res, Err(Error::Range(_))));
        assert!(ex.canvas().ops.is_empty());
    }

    #[test]
    fn zero_sizes_are_fine() {
        let mut ex = exec();
        ex.execute(&cmds(&["circle 0", "rect 0, 0", "trig 0"]))
            .unwrap();
        assert_eq!(ex.canvas().ops.len(), 3);
    }

    #[test]
    fn unresolved_operand_leaves_cursor_alone() {
        let mut ex = exec();
        ex.execute_command(&classify("moveto 3, 4")).unwrap();
        let res = ex.execute_command(&classify("drawto 10, nowhere"));
        assert_eq!(
            res,
            Err(Error::Unresolved {
                operand: "nowhere".to_owned()
            })
        );
        assert_eq!(ex.ctx().cursor, Point::new(3, 4));
        assert!(ex.canvas().ops.is_empty());
    }

    #[test]
    fn clear_and_reset() {
        let mut ex = exec();
        ex.execute(&cmds(&[
            "moveto 10, 10",
            "pen red",
            "fill on color:red",
            "clear",
        ]))
        .unwrap();
        assert_eq!(ex.canvas().ops, [DrawOp::Clear(Color::SlateGray)]);
        assert_eq!(ex.ctx().cursor, Point::new(10, 10));

        ex.execute_command(&Command::Reset).unwrap();
        assert_eq!(ex.ctx(), &Ctx::default());
    }

    #[test]
    fn arithmetic_assignment() {
        let mut ex = exec();
        ex.vars_mut().assign("x", 6).unwrap();
        ex.execute(&cmds(&["y = x * 3", "y = y - 2", "z = y / 4"]))
            .unwrap();
        assert_eq!(ex.vars().get("y"), Some(&Value::Int(16)));
        assert_eq!(ex.vars().get("z"), Some(&Value::Int(4)));

        assert_eq!(
            ex.execute_command(&classify("z = x / 0")),
            Err(Error::DivisionByZero)
        );
        assert!(matches!(
            ex.execute_command(&classify("z = x - 6")),
            Err(Error::Range(_))
        ));
        assert!(matches!(
            ex.execute_command(&classify("z = missing + 1")),
            Err(Error::Unresolved { .. })
        ));
        assert_eq!(ex.vars().get("z"), Some(&Value::Int(4)));
    }

    #[test]
    fn unrecognized_is_only_a_notice() {
        let mut ex = exec();
        ex.execute(&cmds(&["jump 5", "moveto 1, 1"])).unwrap();
        assert_eq!(ex.notices(), [Notice::Unrecognized("jump 5".to_owned())]);
        assert_eq!(ex.ctx().cursor, Point::new(1, 1));
        assert_eq!(ex.take_notices().len(), 1);
        assert!(ex.notices().is_empty());
    }

    #[test]
    fn block_markers_cannot_be_executed() {
        let mut ex = exec();
        for line in ["while x < 3", "endwhile", "if 1 == 1", "endif"] {
            assert!(matches!(
                ex.execute_command(&classify(line)),
                Err(Error::Syntax(_))
            ));
        }
    }

    #[test]
    fn while_counts_iterations() {
        let mut ex = exec();
        ex.vars_mut().assign("x", 2).unwrap();
        let n = ex
            .run_while("x < 10", &cmds(&["x = x + 1", "moveto 1, 0"]))
            .unwrap();
        assert_eq!(n, 8);
        assert_eq!(ex.vars().get("x"), Some(&Value::Int(10)));
        assert_eq!(ex.ctx().cursor, Point::new(8, 0));
    }

    #[test]
    fn while_false_from_the_start() {
        let mut ex = exec();
        ex.vars_mut().assign("x", 20).unwrap();
        assert_eq!(ex.run_while("x < 10", &cmds(&["circle 3"])), Ok(0));
        assert!(ex.canvas().ops.is_empty());
    }

    #[test]
    fn loop_limit() {
        let config = Config {
            max_iterations: Some(5),
            ..Config::default()
        };
        let mut ex = Executor::with_config(Recorder::new(), config);
        let res = ex.run_while("1 == 1", &cmds(&["moveto 1, 1"]));
        assert_eq!(res, Err(Error::LoopLimit { limit: 5 }));
        assert_eq!(ex.ctx().cursor, Point::new(5, 5));

        // A loop that finishes within the limit is unaffected.
        ex.vars_mut().assign("i", 1).unwrap();
        assert_eq!(ex.run_while("i < 6", &cmds(&["i = i + 1"])), Ok(5));
    }

    #[test]
    fn if_runs_at_most_once() {
        let mut ex = exec();
        ex.vars_mut().assign("x", 5).unwrap();
        assert_eq!(ex.run_if("x == 5", &cmds(&["drawto 50, 50"])), Ok(true));
        assert_eq!(ex.run_if("x != 5", &cmds(&["drawto 70, 70"])), Ok(false));
        assert_eq!(ex.canvas().ops.len(), 1);
    }

    #[test]
    fn bad_conditions() {
        let mut ex = exec();
        assert!(matches!(
            ex.run_if("nonsense", &[]),
            Err(Error::Syntax(_))
        ));
        assert!(matches!(
            ex.run_while("x < 3", &[]),
            Err(Error::Unresolved { .. })
        ));
    }
}
