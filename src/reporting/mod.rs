pub mod artifacts;
pub mod events;
pub mod progress;
pub mod renderer;
pub mod report;

pub use artifacts::ArtifactStore;
pub use events::RunEvent;
pub use progress::BurstProgress;
pub use report::{RunReport, SecuritySummary};

use crate::scenarios::RunLog;
use crate::scoring::Scorecard;

/// Writes run events to stdout. Quiet mode drops per-step lines but the
/// summaries are always printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn emit(&self, event: &RunEvent) {
        if !self.quiet {
            println!("{}", renderer::render_event(event));
        }
    }

    pub fn section(&self, title: impl Into<String>) {
        self.emit(&RunEvent::SectionStarted { title: title.into() });
    }

    pub fn note(&self, message: impl Into<String>) {
        self.emit(&RunEvent::Note { message: message.into() });
    }

    pub fn summary(&self, log: &RunLog) {
        println!("{}", renderer::render_summary(log));
    }

    pub fn scorecard(&self, card: &Scorecard, label: &str) {
        println!("{}", renderer::render_scorecard(card, label));
    }

    pub fn comparison(&self, summaries: &[SecuritySummary]) {
        println!("{}", renderer::render_comparison(summaries));
    }
}
