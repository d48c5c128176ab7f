use std::fmt;

use log::info;

use crate::beachline::Insertion;
use crate::diagram::VertexIndex;
use crate::geometry::Site;

/// What the sweep did on one step.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepLogMessage {
    AddSite { site: Site, insertion: Insertion },
    SkipDuplicateSite(Site),
    CloseCircle { vertex: VertexIndex, x: f64, y: f64, sweep_y: f64 },
    Exhausted { vertices: usize, edges: usize },
}

impl fmt::Display for SweepLogMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            SweepLogMessage::AddSite { ref site, insertion } => {
                write!(f, "Added site {} ({:?}).", site, insertion)
            }
            SweepLogMessage::SkipDuplicateSite(ref site) => {
                write!(f, "Skipped duplicate site {}.", site)
            }
            SweepLogMessage::CloseCircle { vertex, x, y, sweep_y } => {
                write!(f, "Circle event at y = {} produced vertex {} at ({}, {}).", sweep_y, vertex.0, x, y)
            }
            SweepLogMessage::Exhausted { vertices, edges } => {
                write!(f, "Sweep finished with {} vertices and {} edges.", vertices, edges)
            }
        }
    }
}

/// Logger trait for the sweep.
pub trait SweepLogger {
    /// The function that gets a SweepLogMessage and does the actual logging.
    fn log(&mut self, message: SweepLogMessage);
}

impl<'a, L: SweepLogger + ?Sized> SweepLogger for &'a mut L {
    fn log(&mut self, message: SweepLogMessage) {
        (**self).log(message)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardLogger;

impl SweepLogger for DiscardLogger {
    fn log(&mut self, _message: SweepLogMessage) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PrintlnLogger;

impl SweepLogger for PrintlnLogger {
    fn log(&mut self, message: SweepLogMessage) {
        println!("{}", message);
    }
}

/// Forwards every message to the `log` facade at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeLogger;

impl SweepLogger for FacadeLogger {
    fn log(&mut self, message: SweepLogMessage) {
        info!("{}", message);
    }
}

/// Keeps every message, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    pub messages: Vec<SweepLogMessage>,
}

impl RecordingLogger {
    pub fn new() -> RecordingLogger {
        RecordingLogger::default()
    }

    /// The `(y, x)` queue key of every circle event, in firing order.
    pub fn fired_circle_events(&self) -> Vec<(f64, f64)> {
        self.messages.iter().filter_map(|message| match *message {
            SweepLogMessage::CloseCircle { sweep_y, x, .. } => Some((sweep_y, x)),
            _ => None,
        }).collect()
    }
}

impl SweepLogger for RecordingLogger {
    fn log(&mut self, message: SweepLogMessage) {
        self.messages.push(message);
    }
}
