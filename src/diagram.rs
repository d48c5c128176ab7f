//! The output of a sweep: vertices, the edges between them, and the sites
//! they were built from.

use std::fmt;

use itertools::Itertools;

use crate::geometry::Site;

/// Index of a site in [`Diagram::sites`], in the order the sweep consumed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteIndex(pub usize);

/// Index of a vertex in [`Diagram::vertices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexIndex(pub usize);

/// Index of an edge in [`Diagram::edges`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIndex(pub usize);

/// A Voronoi vertex, where the regions of two or more sites meet.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    /// Every site whose region touches the vertex, left to right along the
    /// beach line at the time the vertex was found.
    pub sites: Vec<SiteIndex>,
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}) between sites [{}]", self.x, self.y, self.sites.iter().map(|s| s.0).join(", "))
    }
}

/// Part of the bisector between two sites.
///
/// An endpoint of None means the edge runs off to infinity on that end.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub left_site: SiteIndex,
    pub right_site: SiteIndex,
    pub start: Option<VertexIndex>,
    pub end: Option<VertexIndex>,
}

impl Edge {
    pub(crate) fn new(left_site: SiteIndex, right_site: SiteIndex) -> Edge {
        Edge { left_site, right_site, start: None, end: None }
    }

    /// Record `vertex` as the endpoint where the beach line has `left` on the
    /// left and `right` on the right of this edge's breakpoint.
    pub(crate) fn set_start_point(&mut self, left: SiteIndex, right: SiteIndex, vertex: VertexIndex) {
        if self.start.is_none() && self.end.is_none() {
            self.start = Some(vertex);
            self.left_site = left;
            self.right_site = right;
        } else if self.left_site == right {
            self.end = Some(vertex);
        } else {
            self.start = Some(vertex);
        }
    }

    pub(crate) fn set_end_point(&mut self, left: SiteIndex, right: SiteIndex, vertex: VertexIndex) {
        self.set_start_point(right, left, vertex);
    }

    /// Whether both endpoints are known.
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Whether this edge separates the regions of `a` and `b`.
    pub fn separates(&self, a: SiteIndex, b: SiteIndex) -> bool {
        (self.left_site == a && self.right_site == b) || (self.left_site == b && self.right_site == a)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let endpoint = |vertex: Option<VertexIndex>| vertex.map_or_else(|| "inf".to_string(), |v| v.0.to_string());
        write!(f, "{}|{}: {} -> {}", self.left_site.0, self.right_site.0, endpoint(self.start), endpoint(self.end))
    }
}

/// A finished Voronoi diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    pub sites: Vec<Site>,
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn site(&self, index: SiteIndex) -> &Site {
        &self.sites[index.0]
    }

    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self.vertices[index.0]
    }

    /// Edges bordering the region of `site`.
    pub fn edges_of(&self, site: SiteIndex) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |edge| edge.left_site == site || edge.right_site == site)
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Sites{{\n    {}\n}}", self.sites.iter().join(",\n    "))?;
        writeln!(f, "Vertices{{\n    {}\n}}", self.vertices.iter().join(",\n    "))?;
        write!(f, "Edges{{\n    {}\n}}", self.edges.iter().join(",\n    "))
    }
}
