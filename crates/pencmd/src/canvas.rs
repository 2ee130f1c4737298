use std::fmt;

use crate::typ::{Color, Fill, Point, Pen};

/// A drawing surface.
///
/// The interpreter only ever hands over fully-resolved geometry that has already been checked:
/// sizes are never negative.
pub trait Canvas {
    fn draw_line(&mut self, from: Point, to: Point, pen: Pen);

    /// A `width` by `height` rectangle with its top-left corner at `origin`.
    fn draw_or_fill_rect(&mut self, origin: Point, width: i32, height: i32, pen: Pen, fill: Fill);

    /// A triangle with a horizontal base of length `side` starting at `origin`, and its apex
    /// `side` pixels below the middle of the base.
    fn draw_or_fill_triangle(&mut self, origin: Point, side: i32, pen: Pen, fill: Fill);

    fn draw_or_fill_circle(&mut self, center: Point, radius: i32, pen: Pen, fill: Fill);

    fn clear_surface(&mut self, background: Color);
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn draw_line(&mut self, from: Point, to: Point, pen: Pen) {
        (**self).draw_line(from, to, pen)
    }

    fn draw_or_fill_rect(&mut self, origin: Point, width: i32, height: i32, pen: Pen, fill: Fill) {
        (**self).draw_or_fill_rect(origin, width, height, pen, fill)
    }

    fn draw_or_fill_triangle(&mut self, origin: Point, side: i32, pen: Pen, fill: Fill) {
        (**self).draw_or_fill_triangle(origin, side, pen, fill)
    }

    fn draw_or_fill_circle(&mut self, center: Point, radius: i32, pen: Pen, fill: Fill) {
        (**self).draw_or_fill_circle(center, radius, pen, fill)
    }

    fn clear_surface(&mut self, background: Color) {
        (**self).clear_surface(background)
    }
}

/// One call to a [`Canvas`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DrawOp {
    Line {
        from: Point,
        to: Point,
        pen: Pen,
    },
    Rect {
        origin: Point,
        width: i32,
        height: i32,
        pen: Pen,
        fill: Fill,
    },
    Triangle {
        origin: Point,
        side: i32,
        pen: Pen,
        fill: Fill,
    },
    Circle {
        center: Point,
        radius: i32,
        pen: Pen,
        fill: Fill,
    },
    Clear(Color),
}

struct Style(Pen, Fill);

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Style(pen, fill) = self;
        if fill.enabled {
            write!(f, "fill {}", fill.color)
        } else {
            write!(f, "pen {} {}", pen.color, pen.width)
        }
    }
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DrawOp::Line { from, to, pen } => {
                write!(f, "line {from} -> {to} pen {} {}", pen.color, pen.width)
            }
            DrawOp::Rect {
                origin,
                width,
                height,
                pen,
                fill,
            } => write!(f, "rect {origin} {width}x{height} {}", Style(pen, fill)),
            DrawOp::Triangle {
                origin,
                side,
                pen,
                fill,
            } => write!(f, "trig {origin} {side} {}", Style(pen, fill)),
            DrawOp::Circle {
                center,
                radius,
                pen,
                fill,
            } => write!(f, "circle {center} {radius} {}", Style(pen, fill)),
            DrawOp::Clear(color) => write!(f, "clear {color}"),
        }
    }
}

/// A canvas that just remembers what it was asked to draw.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Canvas for Recorder {
    fn draw_line(&mut self, from: Point, to: Point, pen: Pen) {
        self.ops.push(DrawOp::Line { from, to, pen });
    }

    fn draw_or_fill_rect(&mut self, origin: Point, width: i32, height: i32, pen: Pen, fill: Fill) {
        self.ops.push(DrawOp::Rect {
            origin,
            width,
            height,
            pen,
            fill,
        });
    }

    fn draw_or_fill_triangle(&mut self, origin: Point, side: i32, pen: Pen, fill: Fill) {
        self.ops.push(DrawOp::Triangle {
            origin,
            side,
            pen,
            fill,
        });
    }

    fn draw_or_fill_circle(&mut self, center: Point, radius: i32, pen: Pen, fill: Fill) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            pen,
            fill,
        });
    }

    fn clear_surface(&mut self, background: Color) {
        self.ops.push(DrawOp::Clear(background));
    }
}
