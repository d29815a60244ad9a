use super::{last_day_of_month, months, year_grid, DateExt, DAYS_IN_WEEK, WEEK_COLUMNS};
use std::fmt::{self, Write};
use time::Date;

/// Pixel geometry shared by every step of laying out a year.  Everything is
/// expressed in multiples of the cell size, which is derived once from the
/// width of the drawing target.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct LayoutContext {
    cell_size: u32,
}

impl LayoutContext {
    pub(crate) fn new(cell_size: u32) -> LayoutContext {
        LayoutContext { cell_size }
    }

    /// Fits [`WEEK_COLUMNS`] columns into `width` pixels.  Widths narrower
    /// than that yield a cell size of zero.
    pub(crate) fn from_container_width(width: u32) -> LayoutContext {
        LayoutContext::new(width / WEEK_COLUMNS)
    }

    pub(crate) fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Width of the grid proper, not counting any margins
    pub(crate) fn grid_width(&self) -> u32 {
        self.cell_size.saturating_mul(WEEK_COLUMNS)
    }

    /// Height of the drawing area: seven and a half cells
    pub(crate) fn height(&self) -> f64 {
        f64::from(self.cell_size) * 7.5
    }

    /// `n` cells, in pixels.  Saturates instead of overflowing for absurdly
    /// large cell sizes.
    fn span(&self, n: u32) -> u32 {
        n.saturating_mul(self.cell_size)
    }

    /// Offset of the grid's top-left corner within a container `width` pixels
    /// wide: centred horizontally, with the bottom row one pixel above the
    /// bottom edge.
    pub(crate) fn translation(&self, width: u32) -> (f64, f64) {
        let dx = f64::from(width.saturating_sub(self.grid_width())) / 2.0;
        let grid_height = self.span(u32::from(DAYS_IN_WEEK));
        let dy = self.height() - f64::from(grid_height) - 1.0;
        (dx, dy)
    }

    pub(crate) fn position(&self, date: Date) -> CellPosition {
        CellPosition {
            date,
            x: self.span(u32::from(date.week_of_year())),
            y: self.span(u32::from(date.day_of_week())),
        }
    }

    pub(crate) fn layout_year(&self, year: i32) -> impl Iterator<Item = CellPosition> + '_ {
        year_grid(year).map(|d| self.position(d))
    }

    pub(crate) fn month_outlines(&self, year: i32) -> impl Iterator<Item = MonthOutline> + '_ {
        months(year).map(|d| self.month_outline(d))
    }

    /// Traces the boundary of the cells belonging to the month that starts
    /// on `first`.  The month may begin partway down its first column and end
    /// partway down its last, so the outline is generally an eight-sided
    /// polygon stepping around those partial columns.
    pub(crate) fn month_outline(&self, first: Date) -> MonthOutline {
        let last = last_day_of_month(first);
        let (d0, w0) = (u32::from(first.day_of_week()), u32::from(first.week_of_year()));
        let (d1, w1) = (u32::from(last.day_of_week()), u32::from(last.week_of_year()));
        let path = OutlinePath(vec![
            PathCommand::MoveTo(self.span(w0 + 1), self.span(d0)),
            PathCommand::Horizontal(self.span(w0)),
            PathCommand::Vertical(self.span(u32::from(DAYS_IN_WEEK))),
            PathCommand::Horizontal(self.span(w1)),
            PathCommand::Vertical(self.span(d1 + 1)),
            PathCommand::Horizontal(self.span(w1 + 1)),
            PathCommand::Vertical(0),
            PathCommand::Horizontal(self.span(w0 + 1)),
            PathCommand::Close,
        ]);
        MonthOutline { first, last, path }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct CellPosition {
    pub(crate) date: Date,
    pub(crate) x: u32,
    pub(crate) y: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthOutline {
    pub(crate) first: Date,
    pub(crate) last: Date,
    pub(crate) path: OutlinePath,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum PathCommand {
    MoveTo(u32, u32),
    Horizontal(u32),
    Vertical(u32),
    Close,
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo(x, y) => write!(f, "M{x},{y}"),
            PathCommand::Horizontal(x) => write!(f, "H{x}"),
            PathCommand::Vertical(y) => write!(f, "V{y}"),
            PathCommand::Close => f.write_char('Z'),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct OutlinePath(Vec<PathCommand>);

impl OutlinePath {
    /// The path in SVG `d` attribute syntax
    pub(crate) fn to_svg_data(&self) -> String {
        self.to_string()
    }

    /// Every point the path visits, in order, starting with the move-to
    /// point.  Closing the path does not repeat the starting point.
    pub(crate) fn vertices(&self) -> Vec<(u32, u32)> {
        let mut points: Vec<(u32, u32)> = Vec::with_capacity(self.0.len());
        for cmd in &self.0 {
            let current = points.last().copied();
            match (*cmd, current) {
                (PathCommand::MoveTo(x, y), _) => points.push((x, y)),
                (PathCommand::Horizontal(x), Some((_, y))) => points.push((x, y)),
                (PathCommand::Vertical(y), Some((x, _))) => points.push((x, y)),
                (PathCommand::Horizontal(_) | PathCommand::Vertical(_), None)
                | (PathCommand::Close, _) => (),
            }
        }
        points
    }

    /// The distinct corners of the closed shape: repeated points and points
    /// lying on a straight run between their neighbours are dropped.
    pub(crate) fn corners(&self) -> Vec<(u32, u32)> {
        let mut points = self.vertices();
        points.dedup();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        loop {
            let n = points.len();
            if n < 3 {
                return points;
            }
            let redundant = (0..n).find(|&i| {
                let (px, py) = points[(i + n - 1) % n];
                let (x, y) = points[i];
                let (nx, ny) = points[(i + 1) % n];
                (x, y) == (nx, ny) || (px == x && x == nx) || (py == y && y == ny)
            });
            match redundant {
                Some(i) => {
                    points.remove(i);
                }
                None => return points,
            }
        }
    }
}

impl fmt::Display for OutlinePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cmd in &self.0 {
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}
