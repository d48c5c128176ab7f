//! Fortune's algorithm, one event at a time.

use itertools::Itertools;
use log::debug;

use crate::beachline::{BeachLine, Insertion};
use crate::circle_event::CircleEvent;
use crate::diagram::{Diagram, Edge, Vertex, VertexIndex};
use crate::error::VoronoiError;
use crate::geometry::Site;
use crate::logger::{DiscardLogger, SweepLogMessage, SweepLogger};

/// Knobs for a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    /// Check every tree, arc/event link and breakpoint order after each
    /// event, panicking on the first defect. Costs O(n) per event.
    pub verify_invariants: bool,

    /// Pre-size internal storage for this many sites instead of the number
    /// handed in.
    pub capacity_hint: Option<usize>,
}

impl SweepConfig {
    pub fn verify_invariants(self, verify_invariants: bool) -> SweepConfig {
        SweepConfig { verify_invariants, ..self }
    }

    pub fn capacity_hint(self, capacity: usize) -> SweepConfig {
        SweepConfig { capacity_hint: Some(capacity), ..self }
    }
}

impl Default for SweepConfig {
    fn default() -> SweepConfig {
        SweepConfig { verify_invariants: cfg!(debug_assertions), capacity_hint: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    /// Sites or circle events remain.
    Active,
    /// Nothing is left to process.
    Exhausted,
}

/// One processed event, as returned by [`VoronoiDiagram::next_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum SweepEvent {
    /// The site was added to the beach line.
    Site { site: Site, insertion: Insertion },

    /// The site repeated the previous site's coordinates and was skipped.
    DuplicateSite(Site),

    /// An arc collapsed, producing a vertex.
    Circle { vertex: VertexIndex, sweep_y: f64 },
}

/// Whether a site at the same sweep position as a circle event goes first.
fn site_precedes(site: &Site, circle: &CircleEvent) -> bool {
    site.y() < circle.y || (site.y() == circle.y && site.x() <= circle.x)
}

/// Incremental construction of a Voronoi diagram.
///
/// Feed sites sorted by `y`, then `x` (sorting a `Vec<Site>` does this), and
/// pull events with `next_event` until it returns None, or call `finish`.
#[derive(Debug)]
pub struct VoronoiDiagram<L = DiscardLogger> {
    sites: Vec<Site>,
    next_site: usize,
    last_site: Option<Site>,
    beachline: BeachLine,
    state: SweepState,
    sweep_y: Option<f64>,
    config: SweepConfig,
    logger: L,
}

impl VoronoiDiagram<DiscardLogger> {
    pub fn new(sites: Vec<Site>) -> Result<VoronoiDiagram, VoronoiError> {
        VoronoiDiagram::with_config(sites, SweepConfig::default())
    }

    pub fn with_config(sites: Vec<Site>, config: SweepConfig) -> Result<VoronoiDiagram, VoronoiError> {
        VoronoiDiagram::with_logger(sites, config, DiscardLogger)
    }
}

impl<L: SweepLogger> VoronoiDiagram<L> {
    /// Set up a sweep over `sites`, reporting each step to `logger`.
    ///
    /// Returns Err if the sites are not in sweep order.
    pub fn with_logger(sites: Vec<Site>, config: SweepConfig, logger: L) -> Result<VoronoiDiagram<L>, VoronoiError> {
        let unsorted = sites.iter()
            .tuple_windows()
            .position(|(a, b)| (b.y(), b.x()) < (a.y(), a.x()));

        if let Some(index) = unsorted {
            return Err(VoronoiError::UnsortedSites { index: index + 1 });
        }

        let capacity = config.capacity_hint.unwrap_or(sites.len());
        debug!("sweeping {} sites", sites.len());

        Ok(VoronoiDiagram {
            sites,
            next_site: 0,
            last_site: None,
            beachline: BeachLine::with_capacity(capacity),
            state: SweepState::Active,
            sweep_y: None,
            config,
            logger,
        })
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Where the sweep line was when the last event was processed.
    pub fn sweep_y(&self) -> Option<f64> {
        self.sweep_y
    }

    /// Sites of the current arcs, left to right.
    pub fn arcs(&self) -> impl Iterator<Item = &Site> + '_ {
        self.beachline.arcs()
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.beachline.vertices()
    }

    pub fn edges(&self) -> &[Edge] {
        self.beachline.edges()
    }

    pub fn pending_circle_events(&self) -> usize {
        self.beachline.pending_circle_events()
    }

    /// Sites not yet consumed by the sweep.
    pub fn remaining_sites(&self) -> &[Site] {
        &self.sites[self.next_site..]
    }

    pub fn beachline(&self) -> &BeachLine {
        &self.beachline
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// Process whichever comes first, the next site or the next circle event.
    ///
    /// Returns None once both are exhausted.
    pub fn next_event(&mut self) -> Option<SweepEvent> {
        if self.state == SweepState::Exhausted {
            return None;
        }

        let site = self.sites.get(self.next_site).copied();
        let circle = self.beachline.first_circle_event().copied();

        let event = match (site, circle) {
            (None, None) => {
                self.state = SweepState::Exhausted;
                debug!("sweep exhausted");
                self.logger.log(SweepLogMessage::Exhausted {
                    vertices: self.beachline.vertices().len(),
                    edges: self.beachline.edges().len(),
                });
                return None;
            }
            (Some(site), Some(circle)) if !site_precedes(&site, &circle) => self.process_circle(circle),
            (Some(site), _) => self.process_site(site),
            (None, Some(circle)) => self.process_circle(circle),
        };

        if self.config.verify_invariants {
            let directrix = self.sweep_y.unwrap_or(f64::NEG_INFINITY);
            let checked = self.beachline.validate()
                .and_then(|()| self.beachline.validate_break_points(directrix));
            if let Err(defect) = checked {
                panic!("Sweep invariant broken after {:?}: {}", event, defect);
            }
        }

        Some(event)
    }

    fn process_site(&mut self, site: Site) -> SweepEvent {
        self.next_site += 1;
        self.sweep_y = Some(site.y());

        if self.last_site.map_or(false, |last| last.same_position(&site)) {
            debug!("skipping duplicate site {}", site);
            self.logger.log(SweepLogMessage::SkipDuplicateSite(site));
            return SweepEvent::DuplicateSite(site);
        }

        self.last_site = Some(site);
        let insertion = self.beachline.add_beach_section(site);
        self.logger.log(SweepLogMessage::AddSite { site, insertion });

        SweepEvent::Site { site, insertion }
    }

    fn process_circle(&mut self, circle: CircleEvent) -> SweepEvent {
        self.sweep_y = Some(circle.y);

        let vertex = self.beachline.remove_beach_section(circle.arc);
        self.logger.log(SweepLogMessage::CloseCircle {
            vertex,
            x: circle.x,
            y: circle.y_center,
            sweep_y: circle.y,
        });

        SweepEvent::Circle { vertex, sweep_y: circle.y }
    }

    /// Process every remaining event.
    pub fn run(&mut self) {
        while self.next_event().is_some() {}
    }

    /// Run to completion and hand back the diagram.
    pub fn finish(mut self) -> Diagram {
        self.run();
        self.beachline.into_diagram()
    }
}

impl<L: SweepLogger> Iterator for VoronoiDiagram<L> {
    type Item = SweepEvent;

    fn next(&mut self) -> Option<SweepEvent> {
        self.next_event()
    }
}
