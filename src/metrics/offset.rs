// Bounding-box helpers for the target producer.

use serde::{Deserialize, Serialize};

use crate::metrics::types::Point2D;

/// Detection box in top-left (x, y, width, height) form, frame-pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Offset of a center point from the frame center.
///
/// Returns (dx, dy) with x positive to the right and y positive upward.
pub fn center_offset(center: &Point2D, frame_width: f64, frame_height: f64) -> (f64, f64) {
    let x_origin = frame_width / 2.0;
    let y_origin = frame_height / 2.0;

    (center.x - x_origin, y_origin - center.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_box() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(bbox.center(), Point2D::new(60.0, 45.0));
    }

    #[test]
    fn offset_from_frame_center() {
        // A point right of and above the frame center is positive on both axes.
        let (dx, dy) = center_offset(&Point2D::new(700.0, 100.0), 1280.0, 720.0);
        assert_eq!(dx, 60.0);
        assert_eq!(dy, 260.0);
    }

    #[test]
    fn frame_center_has_zero_offset() {
        let (dx, dy) = center_offset(&Point2D::new(640.0, 360.0), 1280.0, 720.0);
        assert_eq!(dx, 0.0);
        assert_eq!(dy, 0.0);
    }
}
