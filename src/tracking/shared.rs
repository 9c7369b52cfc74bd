// Lock-guarded point holders shared between producers and the sampler.

use std::sync::{Arc, Mutex};

use crate::metrics::Point2D;

/// The latest coordinate pair from one producer. Reads return an atomic
/// snapshot of both coordinates, never a torn pair.
#[derive(Debug, Clone, Default)]
pub struct SharedPoint {
    inner: Arc<Mutex<Point2D>>,
}

impl SharedPoint {
    pub fn new(point: Point2D) -> Self {
        Self { inner: Arc::new(Mutex::new(point)) }
    }

    pub fn set(&self, point: Point2D) {
        *self.inner.lock().unwrap() = point;
    }

    pub fn get(&self) -> Point2D {
        *self.inner.lock().unwrap()
    }
}

/// The process-wide tracking state: latest gaze point and latest target
/// point. Each point has exactly one writer.
#[derive(Debug, Clone, Default)]
pub struct TrackingState {
    pub gaze: SharedPoint,
    pub target: SharedPoint,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn starts_at_origin() {
        let state = TrackingState::default();
        assert_eq!(state.gaze.get(), Point2D::default());
        assert_eq!(state.target.get(), Point2D::default());
    }

    #[test]
    fn set_then_get_round_trips() {
        let point = SharedPoint::default();
        point.set(Point2D::new(12.5, -3.0));
        assert_eq!(point.get(), Point2D::new(12.5, -3.0));
    }

    #[test]
    fn concurrent_reads_never_observe_torn_pairs() {
        // One writer stores (n, n) pairs while readers assert both
        // coordinates always match.
        let point = SharedPoint::default();
        let writer_point = point.clone();

        let writer = thread::spawn(move || {
            for n in 0..100_000 {
                let v = n as f64;
                writer_point.set(Point2D::new(v, v));
            }
        });

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let reader_point = point.clone();
                thread::spawn(move || {
                    for _ in 0..100_000 {
                        let p = reader_point.get();
                        assert_eq!(p.x, p.y, "torn read: ({}, {})", p.x, p.y);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
