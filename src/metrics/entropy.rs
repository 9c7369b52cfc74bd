// Offset/entropy calculation between the gaze point and the tracked target.
//
// The entropy value saturates to zero inside the dead-zone threshold and
// grows logarithmically outside it, keeping the sign of the deviation on the
// axis channels. The radial channel is non-negative by construction.

use crate::metrics::types::{DeviationSample, Point2D, Thresholds};

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn axis_entropy(delta: f64, thresh: f64) -> f64 {
    if delta.abs() > thresh {
        (delta.abs() / thresh).ln() * sign(delta)
    } else {
        0.0
    }
}

fn radial_entropy(distance: f64, thresh: f64) -> f64 {
    if distance > thresh {
        (distance / thresh).ln()
    } else {
        0.0
    }
}

/// Compute the full deviation vector for one sampler tick.
///
/// Pure function of its inputs; `t` is passed through unchanged.
pub fn compute_deviation(
    gaze: &Point2D,
    target: &Point2D,
    thresholds: &Thresholds,
    t: f64,
) -> DeviationSample {
    let dx = gaze.x - target.x;
    let dy = gaze.y - target.y;
    let dr = gaze.distance_to(target);

    DeviationSample {
        dx,
        dy,
        dr,
        ex: axis_entropy(dx, thresholds.x),
        ey: axis_entropy(dy, thresholds.y),
        er: radial_entropy(dr, thresholds.r),
        t,
    }
}
