//! Voronoi diagrams via Fortune's sweep line algorithm.
//!
//! A horizontal sweep line moves through the plane in increasing `y`. Above
//! it, the beach line (a sequence of parabolic arcs, one per site whose
//! region still touches the sweep line) separates the finished part of the
//! diagram from the unknown part. Two kinds of events change the beach line:
//!
//! * site events, when the sweep line reaches a site and a new arc appears;
//! * circle events, when an arc shrinks to nothing between its neighbours,
//!   leaving a Voronoi vertex behind.
//!
//! https://en.wikipedia.org/wiki/Fortune%27s_algorithm
//!
//! ```
//! use voroni_sweep::{compute, Site};
//!
//! let mut sites = vec![
//!     Site::new_unwrap(0.0, 0.0),
//!     Site::new_unwrap(10.0, 1.0),
//!     Site::new_unwrap(5.0, 10.0),
//! ];
//! sites.sort();
//!
//! let diagram = compute(sites).unwrap();
//! assert_eq!(diagram.vertices.len(), 1);
//! ```

mod beachline;
mod circle_event;
mod diagram;
mod error;
mod geometry;
mod logger;
mod rb_tree;
mod voronoi;

pub use ordered_float::FloatIsNan;

pub use crate::beachline::{Arc, ArcKey, BeachLine, BeachLineDefect, CircleEventKey, Insertion};
pub use crate::circle_event::{CircleEvent, CirclePrediction};
pub use crate::diagram::{Diagram, Edge, EdgeIndex, SiteIndex, Vertex, VertexIndex};
pub use crate::error::VoronoiError;
pub use crate::geometry::{circumcenter, Parabola, Site, COINCIDENCE_EPSILON, CONVERGENCE_EPSILON};
pub use crate::logger::{
    DiscardLogger, FacadeLogger, PrintlnLogger, RecordingLogger, SweepLogMessage, SweepLogger,
};
pub use crate::rb_tree::{Keys, RbTree, TreeDefect};
pub use crate::voronoi::{SweepConfig, SweepEvent, SweepState, VoronoiDiagram};

/// Build the Voronoi diagram of `sites`, which must already be in sweep order.
pub fn compute(sites: Vec<Site>) -> Result<Diagram, VoronoiError> {
    VoronoiDiagram::new(sites).map(VoronoiDiagram::finish)
}
