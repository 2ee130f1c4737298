use crate::typ::Color;

/// Settings for an [`Executor`](crate::Executor).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Give up on a `while` loop once it has run this many times. `None` lets loops run forever.
    pub max_iterations: Option<u64>,
    /// Stroke width for lines and outlines.
    pub line_width: i32,
    /// Initial stroke color, and the one `reset` goes back to.
    pub pen: Color,
    /// What `clear` paints the surface with.
    pub background: Color,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_iterations: None,
            line_width: 2,
            pen: Color::Black,
            background: Color::SlateGray,
        }
    }
}
