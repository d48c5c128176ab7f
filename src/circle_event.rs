use std::fmt;

use crate::beachline::ArcKey;
use crate::diagram::SiteIndex;
use crate::geometry::{Site, CONVERGENCE_EPSILON};

/// Where three consecutive arcs are predicted to collapse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePrediction {
    /// x of the circumcenter.
    pub x: f64,
    /// Lowest point of the circle, where the sweep line will be when the
    /// middle arc vanishes.
    pub y: f64,
    /// y of the circumcenter.
    pub y_center: f64,
}

impl CirclePrediction {
    /// Predict the collapse of `center`'s arc between its `left` and `right`
    /// neighbours.
    ///
    /// Returns None when the triple turns clockwise or is collinear, since
    /// the breakpoints then diverge and the arc never disappears.
    pub fn between(left: &Site, center: &Site, right: &Site) -> Option<CirclePrediction> {
        let (bx, by) = (center.x(), center.y());
        let (ax, ay) = (left.x() - bx, left.y() - by);
        let (cx, cy) = (right.x() - bx, right.y() - by);

        let d = 2.0 * (ax * cy - ay * cx);
        if d >= -CONVERGENCE_EPSILON {
            return None;
        }

        let ha = ax * ax + ay * ay;
        let hc = cx * cx + cy * cy;
        let x = (cy * ha - ay * hc) / d;
        let y = (ax * hc - cx * ha) / d;
        let y_center = y + by;

        Some(CirclePrediction {
            x: x + bx,
            y: y_center + (x * x + y * y).sqrt(),
            y_center,
        })
    }
}

/// A pending circle event for one arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleEvent {
    /// The arc that collapses. Never owned; the beach line clears this event
    /// whenever the arc goes away or its neighbours change.
    pub arc: ArcKey,
    /// Site of that arc.
    pub site: SiteIndex,
    pub x: f64,
    pub y: f64,
    pub y_center: f64,
}

impl CircleEvent {
    pub fn new(arc: ArcKey, site: SiteIndex, prediction: CirclePrediction) -> CircleEvent {
        CircleEvent {
            arc,
            site,
            x: prediction.x,
            y: prediction.y,
            y_center: prediction.y_center,
        }
    }

    /// Whether this event belongs before `other` in the queue, ordering by
    /// `y` then `x`. Ties sort first.
    pub fn precedes(&self, other: &CircleEvent) -> bool {
        self.y < other.y || (self.y == other.y && self.x <= other.x)
    }

    /// The predicted Voronoi vertex.
    pub fn vertex(&self) -> (f64, f64) {
        (self.x, self.y_center)
    }
}

impl fmt::Display for CircleEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "circle at ({}, {}) ripe at y = {}", self.x, self.y_center, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn converging_triple_predicts_circumcircle() {
        let left = Site::new_unwrap(0.0, 0.0);
        let center = Site::new_unwrap(10.0, 1.0);
        let right = Site::new_unwrap(5.0, 10.0);

        let prediction = CirclePrediction::between(&left, &center, &right).expect("triple converges");
        let radius = ((prediction.x - 0.0).powi(2) + (prediction.y_center - 0.0).powi(2)).sqrt();

        for site in &[left, center, right] {
            let distance = ((prediction.x - site.x()).powi(2) + (prediction.y_center - site.y()).powi(2)).sqrt();
            assert_relative_eq!(distance, radius, epsilon = 1e-9);
        }
        assert_relative_eq!(prediction.y, prediction.y_center + radius, epsilon = 1e-9);
    }

    #[test]
    fn clockwise_triple_never_converges() {
        let left = Site::new_unwrap(5.0, 10.0);
        let center = Site::new_unwrap(10.0, 1.0);
        let right = Site::new_unwrap(0.0, 0.0);

        assert_eq!(CirclePrediction::between(&left, &center, &right), None);
    }

    #[test]
    fn collinear_triple_never_converges() {
        let left = Site::new_unwrap(0.0, 0.0);
        let center = Site::new_unwrap(1.0, 1.0);
        let right = Site::new_unwrap(2.0, 2.0);

        assert_eq!(CirclePrediction::between(&left, &center, &right), None);
    }

    #[test]
    fn queue_order_is_y_then_x() {
        let arc = ArcKey::default();
        let event = |x, y| CircleEvent { arc, site: SiteIndex(0), x, y, y_center: 0.0 };

        assert!(event(5.0, 1.0).precedes(&event(0.0, 2.0)));
        assert!(event(0.0, 2.0).precedes(&event(5.0, 2.0)));
        assert!(event(5.0, 2.0).precedes(&event(5.0, 2.0)));
        assert!(!event(6.0, 2.0).precedes(&event(5.0, 2.0)));
    }
}
