//! Geometry and statistics primitives shared by every assembly component
//!
//! All coordinates are page pixels, `y` growing downwards.

use std::fmt;

/// A 2D point in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same point, shifted horizontally
    pub fn shifted_x(self, dx: f64) -> Self {
        Self::new(self.x + dx, self.y)
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1},{:.1})", self.x, self.y)
    }
}

/// An axis-aligned rectangle, typically a glyph bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Whether the vertical spans `[y, bottom]` of both rectangles overlap
    pub fn overlaps_vertically(&self, top: f64, bottom: f64) -> bool {
        self.y <= bottom && self.bottom() >= top
    }

    /// Horizontal gap between two rectangles, zero when they overlap in x
    pub fn horizontal_gap(&self, other: &Rect) -> f64 {
        (other.x - self.right()).max(self.x - other.right()).max(0.0)
    }

    /// Same rectangle, grown by `dx` on left and right and `dy` on top and
    /// bottom
    pub fn grown(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.x - dx,
            self.y - dy,
            self.width + 2.0 * dx,
            self.height + 2.0 * dy,
        )
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }
}

/// A straight line `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Line of the given slope passing through a point
    pub fn through(point: Point, slope: f64) -> Self {
        Self::new(slope, point.y - slope * point.x)
    }

    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares accumulator for fitting a [`Line`] through points
#[derive(Debug, Clone, Default)]
pub struct LineFit {
    n: usize,
    sx: f64,
    sy: f64,
    sxx: f64,
    sxy: f64,
}

impl LineFit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(&mut self, point: Point) {
        self.n += 1;
        self.sx += point.x;
        self.sy += point.y;
        self.sxx += point.x * point.x;
        self.sxy += point.x * point.y;
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Fitted line, `None` with fewer than two points or a vertical spread
    pub fn line(&self) -> Option<Line> {
        if self.n < 2 {
            return None;
        }
        let n = self.n as f64;
        let den = n * self.sxx - self.sx * self.sx;
        if den.abs() < f64::EPSILON {
            return None;
        }
        let slope = (n * self.sxy - self.sx * self.sy) / den;
        let intercept = (self.sy - slope * self.sx) / n;
        Some(Line::new(slope, intercept))
    }
}

/// Running statistics over a population of values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Population {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn exclude(&mut self, value: f64) {
        if self.count > 0 {
            self.count -= 1;
            self.sum -= value;
            self.sum_sq -= value * value;
        }
    }

    pub fn cardinality(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    pub fn variance(&self) -> Option<f64> {
        let mean = self.mean()?;
        Some((self.sum_sq / self.count as f64 - mean * mean).max(0.0))
    }

    pub fn standard_deviation(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }
}

/// Pair of populations over point abscissae and ordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointPopulation {
    xs: Population,
    ys: Population,
}

impl PointPopulation {
    pub fn include(&mut self, point: Point) {
        self.xs.include(point.x);
        self.ys.include(point.y);
    }

    pub fn cardinality(&self) -> usize {
        self.xs.cardinality()
    }

    pub fn mean(&self) -> Option<Point> {
        Some(Point::new(self.xs.mean()?, self.ys.mean()?))
    }

    pub fn x(&self) -> &Population {
        &self.xs
    }

    pub fn y(&self) -> &Population {
        &self.ys
    }
}
