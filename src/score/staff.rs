//! Five-line staff and pitch positions

use super::{PartId, StaffId};

/// A staff, as located by the grid pipeline
///
/// Pitch positions count half interlines from the middle line, growing
/// downwards: `-4` is the top line, `0` the middle line, `4` the bottom line.
#[derive(Debug, Clone, PartialEq)]
pub struct Staff {
    id: StaffId,
    part: PartId,
    index: usize,
    left: f64,
    top: f64,
    width: f64,
    interline: f64,
}

impl Staff {
    pub fn new(
        id: StaffId,
        part: PartId,
        index: usize,
        left: f64,
        top: f64,
        width: f64,
        interline: f64,
    ) -> Self {
        Self {
            id,
            part,
            index,
            left,
            top,
            width,
            interline,
        }
    }

    pub fn id(&self) -> StaffId {
        self.id
    }

    pub fn part(&self) -> PartId {
        self.part
    }

    /// 1-based index within the part
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn height(&self) -> f64 {
        4.0 * self.interline
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height()
    }

    pub fn mid_y(&self) -> f64 {
        self.top + self.height() / 2.0
    }

    pub fn interline(&self) -> f64 {
        self.interline
    }

    pub fn pitch_position_of(&self, y: f64) -> f64 {
        2.0 * (y - self.mid_y()) / self.interline
    }

    pub fn ordinate_of(&self, pitch_position: f64) -> f64 {
        self.mid_y() + pitch_position * self.interline / 2.0
    }

    /// Vertical distance from the middle line
    pub fn vertical_distance(&self, y: f64) -> f64 {
        (y - self.mid_y()).abs()
    }

    /// Whether `[top, bottom]` overlaps the staff lines span
    pub fn overlaps(&self, top: f64, bottom: f64) -> bool {
        top <= self.bottom() && bottom >= self.top
    }

    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> Staff {
        Staff::new(StaffId(0), PartId(0), 1, 0.0, 100.0, 500.0, 20.0)
    }

    #[test]
    fn test_pitch_positions() {
        let s = staff();
        assert_eq!(s.mid_y(), 140.0);
        assert_eq!(s.pitch_position_of(100.0), -4.0);
        assert_eq!(s.pitch_position_of(140.0), 0.0);
        assert_eq!(s.pitch_position_of(190.0), 5.0);
        assert_eq!(s.ordinate_of(-6.0), 80.0);
        assert_eq!(s.ordinate_of(s.pitch_position_of(123.0)), 123.0);
    }

    #[test]
    fn test_overlap() {
        let s = staff();
        assert!(s.overlaps(50.0, 100.0));
        assert!(s.overlaps(150.0, 300.0));
        assert!(!s.overlaps(181.0, 300.0));
        assert!(s.contains_y(180.0));
        assert!(!s.contains_y(99.0));
    }
}
