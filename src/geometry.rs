use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use ordered_float::NotNan;

use crate::error::VoronoiError;

/// Two x coordinates (or two vertex coordinates) closer than this are the same.
///
/// Used both to classify where a new site lands relative to the breakpoints
/// around an arc and to decide that neighbouring circle events collapse at
/// the same vertex.
pub const COINCIDENCE_EPSILON: f64 = 1e-9;

/// A site triple whose doubled signed area is not below `-CONVERGENCE_EPSILON`
/// turns clockwise (or is collinear) and never converges to a vertex.
pub const CONVERGENCE_EPSILON: f64 = 2e-12;

/// Input point for the sweep.
///
/// Sites are ordered the way the sweep line meets them: by `y`, then by `x`,
/// then by id.
#[derive(Clone, Copy)]
pub struct Site {
    id: Option<usize>,
    x: NotNan<f64>,
    y: NotNan<f64>,
}

impl Site {
    /// Create a new site. Returns Err if either coordinate is NaN or infinite.
    pub fn new(x: f64, y: f64) -> Result<Site, VoronoiError> {
        if x.is_infinite() || y.is_infinite() {
            return Err(VoronoiError::Infinite { x, y });
        }

        Ok(Site {
            id: None,
            x: NotNan::new(x)?,
            y: NotNan::new(y)?,
        })
    }

    /// Like `new`, tagging the site with a caller chosen identity.
    pub fn with_id(id: usize, x: f64, y: f64) -> Result<Site, VoronoiError> {
        Site::new(x, y).map(|site| Site { id: Some(id), ..site })
    }

    /// Like new, but panics instead of return an Err.
    pub fn new_unwrap(x: f64, y: f64) -> Site {
        Site::new(x, y).expect("Sites must have finite coordinates.")
    }

    pub fn id(&self) -> Option<usize> {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.x.into_inner()
    }

    pub fn y(&self) -> f64 {
        self.y.into_inner()
    }

    /// Whether both sites sit on exactly the same coordinates, ignoring ids.
    pub fn same_position(&self, other: &Site) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl PartialEq for Site {
    fn eq(&self, other: &Site) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Site {}

impl Hash for Site {
    fn hash<H>(&self, hasher: &mut H) where H: Hasher {
        self.y.hash(hasher);
        self.x.hash(hasher);
        self.id.hash(hasher);
    }
}

impl PartialOrd for Site {
    fn partial_cmp(&self, other: &Site) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Site {
    fn cmp(&self, other: &Site) -> Ordering {
        self.y.cmp(&other.y)
            .then(self.x.cmp(&other.x))
            .then(self.id.cmp(&other.id))
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{}({}, {})", id, self.x, self.y),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Site {{ id: {:?}, x: {}, y: {} }}", self.id, self.x, self.y)
    }
}

/// A parabola described as a focus and a directrix.
///
/// The parabola is the set of points where the distance to the focus and
/// the distance to the directrix are the same. Every arc on the beach line
/// is one of these with the sweep line as its directrix.
///
/// The focus may lie on the directrix, in which case the parabola has
/// collapsed into the vertical ray above its focus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabola {
    focus_x: f64,
    focus_y: f64,
    /// y = directrix
    directrix: f64,
}

impl Parabola {
    pub fn new(focus: &Site, directrix: f64) -> Parabola {
        Parabola { focus_x: focus.x(), focus_y: focus.y(), directrix }
    }

    pub fn focus_x(&self) -> f64 {
        self.focus_x
    }

    /// Whether the focus lies on the directrix.
    pub fn is_degenerate(&self) -> bool {
        self.focus_y == self.directrix
    }

    /// Signed distance from the directrix to the focus.
    fn focal_offset(&self) -> f64 {
        self.focus_y - self.directrix
    }

    /// Evaluate the parabola at `x`.
    ///
    /// Let (x, y) be some point on the parabola. By definition the distance
    /// to the focus equals the distance to the directrix:
    ///
    /// (y - d)^2 = (x - fx)^2 + (y - fy)^2
    ///
    /// The y^2 terms cancel, leaving
    ///
    /// 2*y*(fy - d) = (x - fx)^2 + fy^2 - d^2
    ///
    /// which divides out into the form below. Meaningless for a degenerate
    /// parabola.
    pub fn y_at(&self, x: f64) -> f64 {
        let dx = x - self.focus_x;
        dx * dx / (2.0 * self.focal_offset()) + (self.focus_y + self.directrix) / 2.0
    }

    /// The x coordinate where `left`, the parabola of the arc immediately to
    /// the left, meets this parabola.
    ///
    /// Both parabolas must share a directrix. Of the two intersections, this
    /// picks the one bounding this parabola's arc on the left.
    pub fn left_intersection_x(&self, left: &Parabola) -> f64 {
        debug_assert_eq!(self.directrix, left.directrix);

        let pby2 = self.focal_offset();
        if pby2 == 0.0 {
            return self.focus_x;
        }

        let plby2 = left.focal_offset();
        if plby2 == 0.0 {
            return left.focus_x;
        }

        let hl = left.focus_x - self.focus_x;
        let aby2 = 1.0 / pby2 - 1.0 / plby2;
        let b = hl / plby2;

        if aby2 != 0.0 {
            let c = hl * hl / (-2.0 * plby2) - left.focus_y + plby2 / 2.0 + self.focus_y - pby2 / 2.0;
            return (-b + (b * b - 2.0 * aby2 * c).sqrt()) / aby2 + self.focus_x;
        }

        // Same distance to the directrix: the parabolas are translates of
        // each other and meet half way between the foci.
        (self.focus_x + left.focus_x) / 2.0
    }
}

/// Center of the circle through three sites.
///
/// Computed relative to `a` to keep the magnitudes small. None if the sites
/// are collinear.
pub fn circumcenter(a: &Site, b: &Site, c: &Site) -> Option<(f64, f64)> {
    let (ax, ay) = (a.x(), a.y());
    let (bx, by) = (b.x() - ax, b.y() - ay);
    let (cx, cy) = (c.x() - ax, c.y() - ay);

    let d = 2.0 * (bx * cy - by * cx);
    if d == 0.0 {
        return None;
    }

    let hb = bx * bx + by * by;
    let hc = cx * cx + cy * cy;

    Some(((cy * hb - by * hc) / d + ax, (bx * hc - cx * hb) / d + ay))
}

#[cfg(test)]
mod test {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn rejects_nan_and_infinity() {
        assert!(matches!(Site::new(f64::NAN, 0.0), Err(VoronoiError::NotANumber(_))));
        assert!(matches!(Site::new(0.0, f64::NAN), Err(VoronoiError::NotANumber(_))));
        assert_eq!(
            Site::new(f64::INFINITY, 1.0),
            Err(VoronoiError::Infinite { x: f64::INFINITY, y: 1.0 })
        );
        assert!(Site::with_id(3, 1.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn sites_sort_by_y_then_x() {
        let mut sites = vec![
            Site::new_unwrap(5.0, 1.0),
            Site::new_unwrap(9.0, 0.0),
            Site::new_unwrap(-3.0, 1.0),
            Site::new_unwrap(2.0, 0.0),
        ];
        sites.sort();

        let coordinates: Vec<(f64, f64)> = sites.iter().map(|s| (s.x(), s.y())).collect();
        assert_eq!(coordinates, vec![(2.0, 0.0), (9.0, 0.0), (-3.0, 1.0), (5.0, 1.0)]);
    }

    #[test]
    fn same_position_ignores_id() {
        let a = Site::with_id(1, 4.0, 4.0).unwrap();
        let b = Site::with_id(2, 4.0, 4.0).unwrap();

        assert!(a.same_position(&b));
        assert!(a != b);
        assert!(a < b);
    }

    #[test]
    fn breakpoint_lies_on_both_parabolas() {
        let directrix = 10.0;
        let left = Parabola::new(&Site::new_unwrap(0.0, 0.0), directrix);
        let right = Parabola::new(&Site::new_unwrap(10.0, 1.0), directrix);

        let x = right.left_intersection_x(&left);
        assert_relative_eq!(left.y_at(x), right.y_at(x), epsilon = 1e-9);

        // The breakpoint the other way round is the second intersection.
        let other = left.left_intersection_x(&right);
        assert_relative_eq!(left.y_at(other), right.y_at(other), epsilon = 1e-7);
        assert!(x < other);
    }

    #[test]
    fn equidistant_foci_meet_half_way() {
        let left = Parabola::new(&Site::new_unwrap(0.0, 0.0), 10.0);
        let right = Parabola::new(&Site::new_unwrap(10.0, 0.0), 10.0);

        assert_eq!(right.left_intersection_x(&left), 5.0);
    }

    #[test]
    fn degenerate_parabola_returns_its_focus() {
        let on_directrix = Parabola::new(&Site::new_unwrap(3.0, 10.0), 10.0);
        let other = Parabola::new(&Site::new_unwrap(0.0, 0.0), 10.0);

        assert!(on_directrix.is_degenerate());
        assert_eq!(on_directrix.left_intersection_x(&other), 3.0);
        assert_eq!(other.left_intersection_x(&on_directrix), 3.0);
    }

    #[test]
    fn circumcenter_of_triangle() {
        let (x, y) = circumcenter(
            &Site::new_unwrap(0.0, 0.0),
            &Site::new_unwrap(5.0, 10.0),
            &Site::new_unwrap(10.0, 0.0),
        ).unwrap();

        assert_relative_eq!(x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(y, 3.75, epsilon = 1e-12);
    }

    #[test]
    fn collinear_sites_have_no_circumcenter() {
        let on_one_line = circumcenter(
            &Site::new_unwrap(0.0, 0.0),
            &Site::new_unwrap(10.0, 0.0),
            &Site::new_unwrap(10.0 + 1e-10, 0.0),
        );

        assert_eq!(on_one_line, None);
    }
}
