use kurbo::{BezPath, Point as KPoint, Rect, Size};
use pencmd::{Canvas, Color, DrawOp, Fill, Pen, Point};
use svg::node::element::{Circle, Line, Path, Rectangle};
use svg::{Document, Node};

fn kpoint(p: Point) -> KPoint {
    KPoint::new(p.x.into(), p.y.into())
}

fn outline<N: Node>(mut node: N, pen: Pen) -> N {
    node.assign("fill", "none");
    node.assign("stroke", pen.color.name());
    node.assign("stroke-width", pen.width);
    node
}

fn styled<N: Node>(mut node: N, pen: Pen, fill: Fill) -> N {
    if fill.enabled {
        node.assign("fill", fill.color.name());
        node.assign("stroke", "none");
        node
    } else {
        outline(node, pen)
    }
}

/// The closed outline of a triangle drawn by `trig`.
pub fn triangle(origin: Point, side: i32) -> BezPath {
    let p = kpoint(origin);
    let side = f64::from(side);
    let mut path = BezPath::new();
    path.move_to(p);
    path.line_to((p.x + side, p.y));
    path.line_to((p.x + side / 2.0, p.y + side));
    path.close_path();
    path
}

/// A [`Canvas`] that renders to SVG.
///
/// Only the shapes drawn since the last [`Canvas::clear_surface`] are kept.
#[derive(Clone, Debug)]
pub struct SvgCanvas {
    size: Size,
    background: Color,
    shapes: Vec<DrawOp>,
}

impl SvgCanvas {
    pub fn new(size: Size, background: Color) -> Self {
        SvgCanvas {
            size,
            background,
            shapes: Vec::new(),
        }
    }

    pub fn shapes(&self) -> &[DrawOp] {
        &self.shapes
    }

    pub fn document(&self) -> Document {
        let bounds = Rect::from_origin_size(KPoint::ORIGIN, self.size);
        let mut document = Document::new()
            .set("viewBox", (bounds.x0, bounds.y0, bounds.width(), bounds.height()))
            .set("width", bounds.width())
            .set("height", bounds.height())
            .add(
                Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", self.background.name()),
            );

        for op in &self.shapes {
            document = match *op {
                DrawOp::Line { from, to, pen } => document.add(outline(
                    Line::new()
                        .set("x1", from.x)
                        .set("y1", from.y)
                        .set("x2", to.x)
                        .set("y2", to.y),
                    pen,
                )),
                DrawOp::Rect {
                    origin,
                    width,
                    height,
                    pen,
                    fill,
                } => {
                    let rect = Rect::from_origin_size(
                        kpoint(origin),
                        (f64::from(width), f64::from(height)),
                    );
                    document.add(styled(
                        Rectangle::new()
                            .set("x", rect.x0)
                            .set("y", rect.y0)
                            .set("width", rect.width())
                            .set("height", rect.height()),
                        pen,
                        fill,
                    ))
                }
                DrawOp::Triangle {
                    origin,
                    side,
                    pen,
                    fill,
                } => document.add(styled(
                    Path::new().set("d", triangle(origin, side).to_svg()),
                    pen,
                    fill,
                )),
                DrawOp::Circle {
                    center,
                    radius,
                    pen,
                    fill,
                } => document.add(styled(
                    Circle::new()
                        .set("cx", center.x)
                        .set("cy", center.y)
                        .set("r", radius),
                    pen,
                    fill,
                )),
                // Never stored: clearing empties the list instead.
                DrawOp::Clear(_) => document,
            };
        }
        document
    }

    pub fn save(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        svg::save(path, &self.document())
    }
}

impl Canvas for SvgCanvas {
    fn draw_line(&mut self, from: Point, to: Point, pen: Pen) {
        self.shapes.push(DrawOp::Line { from, to, pen });
    }

    fn draw_or_fill_rect(&mut self, origin: Point, width: i32, height: i32, pen: Pen, fill: Fill) {
        self.shapes.push(DrawOp::Rect {
            origin,
            width,
            height,
            pen,
            fill,
        });
    }

    fn draw_or_fill_triangle(&mut self, origin: Point, side: i32, pen: Pen, fill: Fill) {
        self.shapes.push(DrawOp::Triangle {
            origin,
            side,
            pen,
            fill,
        });
    }

    fn draw_or_fill_circle(&mut self, center: Point, radius: i32, pen: Pen, fill: Fill) {
        self.shapes.push(DrawOp::Circle {
            center,
            radius,
            pen,
            fill,
        });
    }

    fn clear_surface(&mut self, background: Color) {
        log::debug!("clearing {} shapes", self.shapes.len());
        self.shapes.clear();
        self.background = background;
    }
}
