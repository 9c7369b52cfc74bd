// Target producer adapter.
//
// The detection loop reports the largest detected object once per frame,
// either as a bounding box or as a ready-made center point. Frames with no
// detection leave the previous target in place.

use crate::metrics::{BoundingBox, Point2D};
use crate::tracking::shared::SharedPoint;

#[derive(Debug, Clone)]
pub struct TargetAdapter {
    shared: SharedPoint,
}

impl TargetAdapter {
    pub fn new(shared: SharedPoint) -> Self {
        Self { shared }
    }

    /// Per-frame detection result. `None` means no object this frame.
    pub fn on_detection(&self, detection: Option<BoundingBox>) {
        if let Some(bbox) = detection {
            self.on_center(bbox.center());
        }
    }

    pub fn on_center(&self, center: Point2D) {
        if !center.is_finite() {
            log::trace!("discarding non-finite target center");
            return;
        }
        self.shared.set(center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_writes_box_center() {
        let shared = SharedPoint::default();
        let adapter = TargetAdapter::new(shared.clone());

        adapter.on_detection(Some(BoundingBox::new(100.0, 200.0, 40.0, 60.0)));
        assert_eq!(shared.get(), Point2D::new(120.0, 230.0));
    }

    #[test]
    fn miss_retains_previous_target() {
        let shared = SharedPoint::new(Point2D::new(50.0, 60.0));
        let adapter = TargetAdapter::new(shared.clone());

        adapter.on_detection(None);
        assert_eq!(shared.get(), Point2D::new(50.0, 60.0));
    }
}
