use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use voroni_sweep::{Diagram, RecordingLogger, Site, SweepConfig, SweepEvent, VoronoiDiagram};

fn random_sites(seed: u64, count: usize) -> Vec<Site> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sites: Vec<Site> = (0..count)
        .map(|id| Site::with_id(id, rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)).unwrap())
        .collect();
    sites.sort();
    sites
}

fn checked_config() -> SweepConfig {
    SweepConfig::default().verify_invariants(true)
}

fn distance(x: f64, y: f64, site: &Site) -> f64 {
    ((x - site.x()).powi(2) + (y - site.y()).powi(2)).sqrt()
}

fn cross(o: &Site, a: &Site, b: &Site) -> f64 {
    (a.x() - o.x()) * (b.y() - o.y()) - (a.y() - o.y()) * (b.x() - o.x())
}

/// Number of sites on the convex hull (monotone chain).
fn hull_size(sites: &[Site]) -> usize {
    let mut sorted: Vec<&Site> = sites.iter().collect();
    sorted.sort_by(|a, b| (a.x(), a.y()).partial_cmp(&(b.x(), b.y())).unwrap());

    fn chain<'a>(points: impl Iterator<Item = &'a Site>) -> usize {
        let mut hull: Vec<&Site> = Vec::new();
        for point in points {
            while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], point) <= 0.0 {
                hull.pop();
            }
            hull.push(point);
        }
        hull.len() - 1
    }

    chain(sorted.iter().copied()) + chain(sorted.iter().rev().copied())
}

#[test]
fn circle_events_fire_in_queue_order() {
    for seed in 0..8 {
        let mut recorder = RecordingLogger::new();
        VoronoiDiagram::with_logger(random_sites(seed, 200), checked_config(), &mut recorder)
            .unwrap()
            .run();

        let fired = recorder.fired_circle_events();
        assert!(!fired.is_empty());
        for (index, pair) in fired.windows(2).enumerate() {
            let ((y0, _), (y1, _)) = (pair[0], pair[1]);
            assert!(y1 >= y0 - 1e-9, "seed {} event {} out of order", seed, index + 1);
        }
    }
}

#[test]
fn sweep_line_never_moves_backwards() {
    let mut sweep = VoronoiDiagram::with_config(random_sites(42, 300), checked_config()).unwrap();
    let mut previous = f64::NEG_INFINITY;

    while sweep.next_event().is_some() {
        let current = sweep.sweep_y().unwrap();
        assert!(current >= previous - 1e-9, "sweep went from {} back to {}", previous, current);
        previous = current;
    }
}

#[test]
fn repeated_runs_are_identical() {
    let sites = random_sites(7, 150);

    let trace = |sites: Vec<Site>| {
        let mut sweep = VoronoiDiagram::with_config(sites, checked_config()).unwrap();
        let mut steps: Vec<(SweepEvent, Vec<Site>)> = Vec::new();
        while let Some(event) = sweep.next_event() {
            steps.push((event, sweep.arcs().cloned().collect()));
        }
        (steps, sweep.finish())
    };

    let (first_steps, first_diagram) = trace(sites.clone());
    let (second_steps, second_diagram) = trace(sites);

    assert_eq!(first_steps, second_steps);
    assert_eq!(first_diagram, second_diagram);
}

fn assert_valid_diagram(diagram: &Diagram, seed: u64) {
    let sites = &diagram.sites;

    for vertex in &diagram.vertices {
        assert!(vertex.sites.len() >= 3, "seed {}: vertex {} has too few sites", seed, vertex);

        let radius = distance(vertex.x, vertex.y, diagram.site(vertex.sites[0]));
        let tolerance = 1e-6 * radius.max(1.0);

        for &site in &vertex.sites {
            let to_site = distance(vertex.x, vertex.y, diagram.site(site));
            assert!((to_site - radius).abs() < tolerance, "seed {}: vertex {} is off center", seed, vertex);
        }

        // Empty circle: no site lies strictly inside.
        for site in sites {
            assert!(distance(vertex.x, vertex.y, site) > radius - tolerance, "seed {}: site {} inside circle of {}", seed, site, vertex);
        }
    }

    for edge in &diagram.edges {
        assert_ne!(edge.left_site, edge.right_site);
        for vertex in edge.start.iter().chain(edge.end.iter()) {
            let vertex = diagram.vertex(*vertex);
            let left = distance(vertex.x, vertex.y, diagram.site(edge.left_site));
            let right = distance(vertex.x, vertex.y, diagram.site(edge.right_site));
            assert!((left - right).abs() < 1e-6 * left.max(1.0), "seed {}: edge {} endpoint is not on its bisector", seed, edge);
        }
    }
}

#[test]
fn random_diagrams_are_valid_voronoi_diagrams() {
    for seed in 0..10 {
        let diagram = VoronoiDiagram::with_config(random_sites(seed, 120), checked_config())
            .unwrap()
            .finish();

        assert_valid_diagram(&diagram, seed);
    }
}

#[test]
fn vertex_and_edge_counts_match_euler() {
    for seed in 100..110 {
        let sites = random_sites(seed, 100);
        let n = sites.len();
        let hull = hull_size(&sites);

        let diagram = VoronoiDiagram::with_config(sites, checked_config()).unwrap().finish();
        let vertices = diagram.vertices.len();

        assert!(vertices <= 2 * n - 5);
        // In general position every bounded face adds one vertex per
        // interior triangle of the dual Delaunay triangulation.
        assert_eq!(vertices, 2 * n - 2 - hull, "seed {}", seed);
        assert_eq!(diagram.edges.len(), n - 1 + vertices, "seed {}", seed);
    }
}

#[test]
fn integer_lattice_is_valid() {
    // Many cocircular quadruples and shared rows.
    let mut sites: Vec<Site> = (0..6)
        .flat_map(|row| (0..6).map(move |column| Site::new_unwrap(column as f64 * 3.0, row as f64 * 3.0)))
        .collect();
    sites.sort();

    let diagram = VoronoiDiagram::with_config(sites, checked_config()).unwrap().finish();

    assert_eq!(diagram.vertices.len(), 25);
    assert_valid_diagram(&diagram, 0);
}
