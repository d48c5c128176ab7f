use std::collections::VecDeque;
use std::f64::{INFINITY, NEG_INFINITY};

use itertools::Itertools;
use log::{debug, trace};
use slotmap::new_key_type;
use thiserror::Error;

use crate::circle_event::{CircleEvent, CirclePrediction};
use crate::diagram::{Diagram, Edge, EdgeIndex, SiteIndex, Vertex, VertexIndex};
use crate::geometry::{circumcenter, Parabola, Site, COINCIDENCE_EPSILON};
use crate::rb_tree::{RbTree, TreeDefect};

/// Relative amount two consecutive breakpoints may overlap before the beach
/// line counts as out of order.
const BREAK_POINT_SLACK: f64 = 1e-6;

new_key_type! {
    /// Handle to an arc on the beach line.
    pub struct ArcKey;

    /// Handle to a pending circle event.
    pub struct CircleEventKey;
}

/// An arc on the beachline.
///
/// A parabola with the site as its focus and the sweep line as its
/// directrix. Since the sweep line moves, this represents an entire class of
/// parabolas, though only one parabola at any point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub site: SiteIndex,

    /// Pending collapse of this arc, if its neighbours converge.
    pub circle_event: Option<CircleEventKey>,

    /// Edge traced by the breakpoint on this arc's left.
    pub edge: Option<EdgeIndex>,
}

impl Arc {
    fn new(site: SiteIndex) -> Arc {
        Arc { site, circle_event: None, edge: None }
    }
}

/// How a new site entered the beach line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The beach line was empty.
    First,
    /// The site fell inside an arc, which was split around the new one.
    Split,
    /// The site fell right of the last arc, on the same line as every
    /// earlier site.
    Append,
    /// The site fell exactly on the breakpoint between two arcs, which
    /// immediately yields a vertex.
    BreakPoint { vertex: VertexIndex },
}

/// Inconsistency between the beach line and its circle events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeachLineDefect {
    #[error("arc tree: {0}")]
    Arcs(#[source] TreeDefect),

    #[error("circle event tree: {0}")]
    CircleEvents(#[source] TreeDefect),

    #[error("an arc points at a circle event that does not point back")]
    DanglingCircleEvent,

    #[error("a circle event belongs to no live arc")]
    OrphanedCircleEvent,

    #[error("circle events are not in (y, x) order")]
    CircleEventsOutOfOrder,

    #[error("the cached first circle event is not the first in the queue")]
    StaleFirstCircleEvent,

    #[error("breakpoint {position} lies left of the breakpoint before it")]
    BreakPointsOutOfOrder { position: usize },

    #[error("sites on the sweep line are not in x order along the beach line")]
    SweepLineSitesOutOfOrder,
}

/// The beachline knows what all the arcs and circle events are.
///
/// It wraps two `RbTree`s, knowing the Voronoi specific operations, while
/// the trees only know about tree operations. Vertices and edges found along
/// the way are collected here too.
#[derive(Debug, Clone, Default)]
pub struct BeachLine {
    sites: Vec<Site>,
    arcs: RbTree<ArcKey, Arc>,
    circle_events: RbTree<CircleEventKey, CircleEvent>,
    first_circle_event: Option<CircleEventKey>,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl BeachLine {
    pub fn new() -> BeachLine {
        BeachLine::default()
    }

    /// Pre-size the arenas for about `sites` sites.
    pub fn with_capacity(sites: usize) -> BeachLine {
        BeachLine {
            sites: Vec::with_capacity(sites),
            arcs: RbTree::with_capacity(2 * sites),
            circle_events: RbTree::with_capacity(sites),
            first_circle_event: None,
            vertices: Vec::with_capacity(2 * sites),
            edges: Vec::with_capacity(3 * sites),
        }
    }

    pub fn site(&self, index: SiteIndex) -> &Site {
        &self.sites[index.0]
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn arc(&self, key: ArcKey) -> Option<&Arc> {
        self.arcs.get(key)
    }

    /// Keys of the arcs, left to right.
    pub fn arc_keys(&self) -> impl Iterator<Item = ArcKey> + '_ {
        self.arcs.keys()
    }

    /// Sites of the arcs, left to right. A site appears once per arc it owns.
    pub fn arcs(&self) -> impl Iterator<Item = &Site> + '_ {
        self.arcs.values().map(move |arc| &self.sites[arc.site.0])
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn circle_event(&self, key: CircleEventKey) -> Option<&CircleEvent> {
        self.circle_events.get(key)
    }

    /// Pending circle events in the order they will fire.
    pub fn circle_events(&self) -> impl Iterator<Item = &CircleEvent> + '_ {
        self.circle_events.values()
    }

    pub fn pending_circle_events(&self) -> usize {
        self.circle_events.len()
    }

    /// The circle event that fires next, if any.
    pub fn first_circle_event(&self) -> Option<&CircleEvent> {
        self.first_circle_event.and_then(|key| self.circle_events.get(key))
    }

    pub fn into_diagram(self) -> Diagram {
        Diagram { sites: self.sites, vertices: self.vertices, edges: self.edges }
    }

    fn live_arc(&self, key: ArcKey) -> &Arc {
        self.arcs.get(key).expect("Arc handles held by the beach line are live.")
    }

    fn live_arc_mut(&mut self, key: ArcKey) -> &mut Arc {
        self.arcs.get_mut(key).expect("Arc handles held by the beach line are live.")
    }

    fn arc_site(&self, key: ArcKey) -> &Site {
        self.site(self.live_arc(key).site)
    }

    /// Where the arc's left breakpoint sits with the sweep line at `directrix`.
    fn left_break_point(&self, arc: ArcKey, directrix: f64) -> f64 {
        let parabola = Parabola::new(self.arc_site(arc), directrix);
        if parabola.is_degenerate() {
            return parabola.focus_x();
        }

        match self.arcs.previous(arc) {
            Some(left) => parabola.left_intersection_x(&Parabola::new(self.arc_site(left), directrix)),
            None => NEG_INFINITY,
        }
    }

    /// Where the arc's right breakpoint sits with the sweep line at `directrix`.
    fn right_break_point(&self, arc: ArcKey, directrix: f64) -> f64 {
        match self.arcs.next(arc) {
            Some(right) => self.left_break_point(right, directrix),
            None => {
                let site = self.arc_site(arc);
                if site.y() == directrix { site.x() } else { INFINITY }
            }
        }
    }

    /// Find the arcs on either side of where `site` meets the beach line.
    ///
    /// Both are the same arc when the site falls strictly inside it.
    fn locate(&self, site: &Site) -> (Option<ArcKey>, Option<ArcKey>) {
        let x = site.x();
        let directrix = site.y();
        let mut node = self.arcs.root();

        while let Some(arc) = node {
            let dxl = self.left_break_point(arc, directrix) - x;
            if dxl > COINCIDENCE_EPSILON {
                node = self.arcs.left(arc);
                continue;
            }

            let dxr = x - self.right_break_point(arc, directrix);
            if dxr > COINCIDENCE_EPSILON {
                match self.arcs.right(arc) {
                    Some(right) => {
                        node = Some(right);
                        continue;
                    }
                    None => return (Some(arc), None),
                }
            }

            let (mut left, mut right) = if dxl > -COINCIDENCE_EPSILON {
                (self.arcs.previous(arc), Some(arc))
            } else if dxr > -COINCIDENCE_EPSILON {
                (Some(arc), self.arcs.next(arc))
            } else {
                return (Some(arc), Some(arc));
            };

            // An arc whose site is on the sweep line has no width. A site
            // landing on it goes to its right, never between it and its left
            // neighbour.
            while let Some(flat) = right.filter(|&key| self.is_flat_at(key, site)) {
                left = Some(flat);
                right = self.arcs.next(flat);
            }

            return (left, right);
        }

        (None, None)
    }

    /// Whether `arc`'s site lies on the sweep line through `site`, no further
    /// than `COINCIDENCE_EPSILON` to its right.
    fn is_flat_at(&self, arc: ArcKey, site: &Site) -> bool {
        let arc_site = self.arc_site(arc);
        arc_site.y() == site.y() && arc_site.x() - site.x() < COINCIDENCE_EPSILON
    }

    /// Handle a site event.
    ///
    /// # Panics
    ///
    /// If the site lands left of every arc, or on a breakpoint between two
    /// arcs whose sites are collinear with it. Both only happen when sites
    /// arrive out of sweep order.
    pub fn add_beach_section(&mut self, site: Site) -> Insertion {
        let (left_arc, right_arc) = self.locate(&site);
        let was_empty = self.arcs.is_empty();

        let index = SiteIndex(self.sites.len());
        self.sites.push(site);

        let insertion = match (left_arc, right_arc) {
            (None, None) => {
                assert!(was_empty, "Site {} landed left of the whole beach line.", site);
                self.arcs.insert_successor(None, Arc::new(index));
                Insertion::First
            }

            (Some(split), Some(right)) if split == right => {
                // The old prediction assumed the arc stayed whole.
                self.detach_circle_event(split);

                let split_site = self.live_arc(split).site;
                let new_arc = self.arcs.insert_successor(Some(split), Arc::new(index));
                let right_copy = self.arcs.insert_successor(Some(new_arc), Arc::new(split_site));

                let edge = self.create_edge(split_site, index, None, None);
                self.live_arc_mut(new_arc).edge = Some(edge);
                self.live_arc_mut(right_copy).edge = Some(edge);

                self.attach_circle_event(split);
                self.attach_circle_event(right_copy);
                Insertion::Split
            }

            (Some(left), None) => {
                // Only reachable while every site so far shares one y. The
                // rightmost arc has no right neighbour and cannot collapse.
                let left_site = self.live_arc(left).site;
                let new_arc = self.arcs.insert_successor(Some(left), Arc::new(index));
                let edge = self.create_edge(left_site, index, None, None);
                self.live_arc_mut(new_arc).edge = Some(edge);
                Insertion::Append
            }

            (Some(left), Some(right)) => {
                self.detach_circle_event(left);
                self.detach_circle_event(right);

                let left_site = self.live_arc(left).site;
                let right_site = self.live_arc(right).site;
                let (x, y) = circumcenter(&site, self.site(left_site), self.site(right_site))
                    .unwrap_or_else(|| panic!("Site {} is collinear with the arcs around it.", site));
                let vertex = self.create_vertex(x, y, vec![left_site, index, right_site]);

                let right_edge = self.live_arc(right).edge
                    .expect("An arc with a left neighbour traces a left edge.");
                self.edges[right_edge.0].set_start_point(left_site, right_site, vertex);

                let new_arc = self.arcs.insert_successor(Some(left), Arc::new(index));
                let new_edge = self.create_edge(left_site, index, None, Some(vertex));
                self.live_arc_mut(new_arc).edge = Some(new_edge);
                let right_edge = self.create_edge(index, right_site, None, Some(vertex));
                self.live_arc_mut(right).edge = Some(right_edge);

                self.attach_circle_event(left);
                self.attach_circle_event(right);
                Insertion::BreakPoint { vertex }
            }

            (None, Some(_)) => panic!("Site {} landed left of the whole beach line.", site),
        };

        debug!("site {} entered the beach line: {:?}", site, insertion);
        insertion
    }

    /// Handle a circle event: remove the collapsing arc, along with any
    /// neighbours collapsing at the same vertex, and return that vertex.
    ///
    /// # Panics
    ///
    /// If `arc` has no circle event or lacks a neighbour on either side.
    /// Arcs with circle events are interior by construction.
    pub fn remove_beach_section(&mut self, arc: ArcKey) -> VertexIndex {
        let event_key = self.live_arc(arc).circle_event.expect("A collapsing arc has a circle event.");
        let (x, y) = self.circle_events.get(event_key).expect("Circle event handles are live.").vertex();

        let previous = self.arcs.previous(arc).expect("A collapsing arc has a left neighbour.");
        let next = self.arcs.next(arc).expect("A collapsing arc has a right neighbour.");

        let collapsed = self.detach_beach_section(arc);
        let mut transitions = VecDeque::new();
        transitions.push_back((collapsed.site, collapsed.edge));

        // More than three sites may be cocircular; their arcs all vanish here.
        let mut left_arc = previous;
        while self.collapses_at(left_arc, x, y) {
            let before = self.arcs.previous(left_arc).expect("A collapsing arc has a left neighbour.");
            let absorbed = self.detach_beach_section(left_arc);
            trace!("absorbed arc of site {} at ({}, {})", self.site(absorbed.site), x, y);
            transitions.push_front((absorbed.site, absorbed.edge));
            left_arc = before;
        }
        self.detach_circle_event(left_arc);
        transitions.push_front((self.live_arc(left_arc).site, self.live_arc(left_arc).edge));

        let mut right_arc = next;
        while self.collapses_at(right_arc, x, y) {
            let after = self.arcs.next(right_arc).expect("A collapsing arc has a right neighbour.");
            let absorbed = self.detach_beach_section(right_arc);
            trace!("absorbed arc of site {} at ({}, {})", self.site(absorbed.site), x, y);
            transitions.push_back((absorbed.site, absorbed.edge));
            right_arc = after;
        }
        self.detach_circle_event(right_arc);
        transitions.push_back((self.live_arc(right_arc).site, self.live_arc(right_arc).edge));

        let sites = transitions.iter().map(|&(site, _)| site).unique().collect();
        let vertex = self.create_vertex(x, y, sites);

        for (&(left_site, _), &(right_site, right_edge)) in transitions.iter().tuple_windows() {
            let edge = right_edge.expect("An arc with a left neighbour traces a left edge.");
            self.edges[edge.0].set_start_point(left_site, right_site, vertex);
        }

        let (outer_left, _) = transitions[0];
        let (outer_right, _) = transitions[transitions.len() - 1];
        let edge = self.create_edge(outer_left, outer_right, None, Some(vertex));
        self.live_arc_mut(right_arc).edge = Some(edge);

        self.attach_circle_event(left_arc);
        self.attach_circle_event(right_arc);

        debug!("vertex {} at ({}, {}) closed {} arcs", vertex.0, x, y, transitions.len() - 2);
        vertex
    }

    /// Whether `arc` is predicted to collapse at `(x, y)`.
    fn collapses_at(&self, arc: ArcKey, x: f64, y: f64) -> bool {
        self.live_arc(arc).circle_event
            .and_then(|key| self.circle_events.get(key))
            .map_or(false, |event| {
                (x - event.x).abs() < COINCIDENCE_EPSILON && (y - event.y_center).abs() < COINCIDENCE_EPSILON
            })
    }

    fn detach_beach_section(&mut self, arc: ArcKey) -> Arc {
        self.detach_circle_event(arc);
        self.arcs.remove(arc)
    }

    /// Queue a circle event for `arc` if it sits between two converging
    /// neighbours.
    fn attach_circle_event(&mut self, arc: ArcKey) {
        let (left, right) = match (self.arcs.previous(arc), self.arcs.next(arc)) {
            (Some(left), Some(right)) => (left, right),
            _ => return,
        };

        let left_site = self.live_arc(left).site;
        let center_site = self.live_arc(arc).site;
        let right_site = self.live_arc(right).site;

        // Both halves of one split arc never close the arc between them.
        if left_site == right_site {
            return;
        }

        let prediction = match CirclePrediction::between(
            self.site(left_site),
            self.site(center_site),
            self.site(right_site),
        ) {
            Some(prediction) => prediction,
            None => return,
        };

        let event = CircleEvent::new(arc, center_site, prediction);
        let (key, first) = self.circle_events.insert_ordered(event, CircleEvent::precedes);
        self.live_arc_mut(arc).circle_event = Some(key);
        if first {
            self.first_circle_event = Some(key);
        }

        trace!("attached {} to arc of site {}", event, self.site(center_site));
    }

    fn detach_circle_event(&mut self, arc: ArcKey) {
        if let Some(key) = self.live_arc_mut(arc).circle_event.take() {
            if self.circle_events.previous(key).is_none() {
                self.first_circle_event = self.circle_events.next(key);
            }
            let event = self.circle_events.remove(key);
            trace!("detached {}", event);
        }
    }

    fn create_vertex(&mut self, x: f64, y: f64, sites: Vec<SiteIndex>) -> VertexIndex {
        self.vertices.push(Vertex { x, y, sites });
        VertexIndex(self.vertices.len() - 1)
    }

    fn create_edge(
        &mut self,
        left: SiteIndex,
        right: SiteIndex,
        start: Option<VertexIndex>,
        end: Option<VertexIndex>,
    ) -> EdgeIndex {
        let mut edge = Edge::new(left, right);
        if let Some(start) = start {
            edge.set_start_point(left, right, start);
        }
        if let Some(end) = end {
            edge.set_end_point(left, right, end);
        }

        self.edges.push(edge);
        EdgeIndex(self.edges.len() - 1)
    }

    /// Check both trees and the links between arcs and their circle events.
    pub fn validate(&self) -> Result<(), BeachLineDefect> {
        self.arcs.validate().map_err(BeachLineDefect::Arcs)?;
        self.circle_events.validate().map_err(BeachLineDefect::CircleEvents)?;

        for key in self.arcs.keys() {
            if let Some(event_key) = self.live_arc(key).circle_event {
                match self.circle_events.get(event_key) {
                    Some(event) if event.arc == key => {}
                    _ => return Err(BeachLineDefect::DanglingCircleEvent),
                }
            }
        }

        for key in self.circle_events.keys() {
            let event = self.circle_events.get(key).expect("Keys come from the tree.");
            match self.arcs.get(event.arc) {
                Some(arc) if arc.circle_event == Some(key) => {}
                _ => return Err(BeachLineDefect::OrphanedCircleEvent),
            }
        }

        if self.circle_events.values().tuple_windows().any(|(a, b)| !a.precedes(b)) {
            return Err(BeachLineDefect::CircleEventsOutOfOrder);
        }

        if self.first_circle_event != self.circle_events.first() {
            return Err(BeachLineDefect::StaleFirstCircleEvent);
        }

        Ok(())
    }

    /// Check that the arcs are in x order with the sweep line at `directrix`.
    ///
    /// Breakpoints may dip by `BREAK_POINT_SLACK` (relative) where arcs are
    /// about to vanish. Sites on the sweep line are compared exactly.
    pub fn validate_break_points(&self, directrix: f64) -> Result<(), BeachLineDefect> {
        let break_points: Vec<f64> = self.arcs.keys()
            .skip(1)
            .map(|arc| self.left_break_point(arc, directrix))
            .collect();

        let misplaced = break_points.iter()
            .tuple_windows()
            .position(|(&left, &right)| right < left - BREAK_POINT_SLACK * left.abs().max(1.0));
        if let Some(position) = misplaced {
            return Err(BeachLineDefect::BreakPointsOutOfOrder { position: position + 1 });
        }

        let on_sweep_line = self.arcs().filter(|site| site.y() == directrix);
        if on_sweep_line.tuple_windows().any(|(left, right)| right.x() < left.x()) {
            return Err(BeachLineDefect::SweepLineSitesOutOfOrder);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn coordinates(beachline: &BeachLine) -> Vec<(f64, f64)> {
        beachline.arcs().map(|site| (site.x(), site.y())).collect()
    }

    #[test]
    fn first_site_becomes_only_arc() {
        let mut beachline = BeachLine::new();

        assert_eq!(beachline.add_beach_section(Site::new_unwrap(1.0, 2.0)), Insertion::First);
        assert_eq!(coordinates(&beachline), vec![(1.0, 2.0)]);
        assert_eq!(beachline.validate(), Ok(()));
    }

    #[test]
    fn site_inside_arc_splits_it() {
        let mut beachline = BeachLine::new();
        beachline.add_beach_section(Site::new_unwrap(0.0, 0.0));

        assert_eq!(beachline.add_beach_section(Site::new_unwrap(3.0, 5.0)), Insertion::Split);
        assert_eq!(coordinates(&beachline), vec![(0.0, 0.0), (3.0, 5.0), (0.0, 0.0)]);
        assert_eq!(beachline.edges().len(), 1);
        assert_eq!(beachline.pending_circle_events(), 0);
        assert_eq!(beachline.validate(), Ok(()));
    }

    #[test]
    fn same_line_sites_append() {
        let mut beachline = BeachLine::new();
        beachline.add_beach_section(Site::new_unwrap(0.0, 0.0));

        assert_eq!(beachline.add_beach_section(Site::new_unwrap(10.0, 0.0)), Insertion::Append);
        assert_eq!(coordinates(&beachline), vec![(0.0, 0.0), (10.0, 0.0)]);
        assert!(beachline.arc_keys().all(|key| beachline.arc(key).unwrap().circle_event.is_none()));
        assert_eq!(beachline.validate(), Ok(()));
    }

    #[test]
    fn site_on_breakpoint_creates_vertex() {
        let mut beachline = BeachLine::new();
        beachline.add_beach_section(Site::new_unwrap(0.0, 0.0));
        beachline.add_beach_section(Site::new_unwrap(10.0, 0.0));

        let insertion = beachline.add_beach_section(Site::new_unwrap(5.0, 10.0));

        assert_eq!(insertion, Insertion::BreakPoint { vertex: VertexIndex(0) });
        assert_eq!(coordinates(&beachline), vec![(0.0, 0.0), (5.0, 10.0), (10.0, 0.0)]);

        let vertex = &beachline.vertices()[0];
        assert_relative_eq!(vertex.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(vertex.y, 3.75, epsilon = 1e-9);
        assert_eq!(vertex.sites, vec![SiteIndex(0), SiteIndex(2), SiteIndex(1)]);

        // The old bisector and both new edges all touch the vertex.
        assert_eq!(beachline.edges().len(), 3);
        assert!(beachline.edges().iter().all(|edge| edge.start == Some(VertexIndex(0))));
        assert_eq!(beachline.validate(), Ok(()));
    }

    #[test]
    fn converging_split_schedules_and_fires_circle_event() {
        let mut beachline = BeachLine::new();
        beachline.add_beach_section(Site::new_unwrap(0.0, 0.0));
        beachline.add_beach_section(Site::new_unwrap(10.0, 1.0));
        beachline.add_beach_section(Site::new_unwrap(5.0, 10.0));

        assert_eq!(beachline.pending_circle_events(), 1);
        let event = *beachline.first_circle_event().expect("one event pending");
        assert_eq!(beachline.site(event.site).x(), 10.0);

        let vertex = beachline.remove_beach_section(event.arc);

        assert_eq!(beachline.pending_circle_events(), 0);
        assert!(beachline.arc(event.arc).is_none());
        assert_eq!(beachline.vertices()[vertex.0].sites, vec![SiteIndex(0), SiteIndex(1), SiteIndex(2)]);
        assert_eq!(coordinates(&beachline), vec![(0.0, 0.0), (5.0, 10.0), (10.0, 1.0), (0.0, 0.0)]);
        assert_eq!(beachline.validate(), Ok(()));
    }

    #[test]
    fn site_just_right_of_flat_first_arc_appends() {
        let mut beachline = BeachLine::new();
        beachline.add_beach_section(Site::new_unwrap(0.0, 0.0));

        assert_eq!(beachline.add_beach_section(Site::new_unwrap(1e-10, 0.0)), Insertion::Append);
        assert_eq!(coordinates(&beachline), vec![(0.0, 0.0), (1e-10, 0.0)]);
        assert_eq!(beachline.validate(), Ok(()));
        assert_eq!(beachline.validate_break_points(0.0), Ok(()));
    }

    #[test]
    fn site_just_right_of_flat_last_arc_appends() {
        let mut beachline = BeachLine::new();
        beachline.add_beach_section(Site::new_unwrap(0.0, 0.0));
        beachline.add_beach_section(Site::new_unwrap(10.0, 0.0));

        let insertion = beachline.add_beach_section(Site::new_unwrap(10.0 + 1e-10, 0.0));

        assert_eq!(insertion, Insertion::Append);
        assert_eq!(coordinates(&beachline), vec![(0.0, 0.0), (10.0, 0.0), (10.0 + 1e-10, 0.0)]);
        assert!(beachline.vertices().is_empty());
        assert_eq!(beachline.validate_break_points(0.0), Ok(()));
    }

    #[test]
    fn sweep_line_sites_out_of_x_order_are_reported() {
        let mut beachline = BeachLine::new();
        beachline.add_beach_section(Site::new_unwrap(0.0, 0.0));
        beachline.add_beach_section(Site::new_unwrap(10.0, 0.0));

        // Slip a site in on the wrong side of the arc at x = 10.
        let first = beachline.arc_keys().next().unwrap();
        beachline.sites.push(Site::new_unwrap(10.0 + 1e-10, 0.0));
        beachline.arcs.insert_successor(Some(first), Arc::new(SiteIndex(2)));

        assert_eq!(beachline.validate(), Ok(()));
        assert_eq!(beachline.validate_break_points(0.0), Err(BeachLineDefect::SweepLineSitesOutOfOrder));
    }

    #[test]
    fn crossing_break_points_are_reported() {
        let mut beachline = BeachLine::new();
        beachline.sites.push(Site::new_unwrap(10.0, 4.0));
        beachline.sites.push(Site::new_unwrap(0.0, 0.0));

        // The narrow arc of (10, 4) wrapped around the wide arc of (0, 0).
        let outer = beachline.arcs.insert_successor(None, Arc::new(SiteIndex(0)));
        let inner = beachline.arcs.insert_successor(Some(outer), Arc::new(SiteIndex(1)));
        beachline.arcs.insert_successor(Some(inner), Arc::new(SiteIndex(0)));

        assert_eq!(
            beachline.validate_break_points(5.0),
            Err(BeachLineDefect::BreakPointsOutOfOrder { position: 1 })
        );
    }

    #[test]
    #[should_panic(expected = "circle event")]
    fn removing_arc_without_event_panics() {
        let mut beachline = BeachLine::new();
        beachline.add_beach_section(Site::new_unwrap(0.0, 0.0));
        let only = beachline.arc_keys().next().unwrap();

        beachline.remove_beach_section(only);
    }
}
