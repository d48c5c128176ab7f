use voroni_sweep::{FacadeLogger, Site, SweepConfig, VoronoiDiagram};

/// Create a Site. Panics if given NaN or infinity.
fn site(x: f64, y: f64) -> Site {
    Site::new_unwrap(x, y)
}

fn generate_sites() -> Vec<Site> {
    vec![
        site(10.0, 10.0),
        site(0.0, 0.0),
        site(10.0, 0.0),
        site(0.0, 10.0),
        site(5.0, 5.0),
        site(2.5, 7.0),
        site(8.0, 3.5),
    ]
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut sites = generate_sites();
    sites.sort();

    let sweep = VoronoiDiagram::with_logger(sites, SweepConfig::default(), FacadeLogger)
        .expect("Sorted finite sites are always accepted.");

    println!("{}", sweep.finish());
    println!("End of program.");
}
