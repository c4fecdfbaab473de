use crate::scenarios::ScenarioOutcome;

/// Messages sent from the scenario runner to the console for real-time display.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// A suite started against a target
    RunStarted {
        suite: String,
        target: String,
        transport: String,
    },
    /// A titled group of steps begins
    SectionStarted {
        title: String,
    },
    /// A step finished and was appended to the run log
    Outcome(ScenarioOutcome),
    /// Informational line under the current section
    Note {
        message: String,
    },
    /// A burst request was answered
    BurstResponse {
        index: u32,
        rate_limited: bool,
        status: Option<u16>,
    },
}
