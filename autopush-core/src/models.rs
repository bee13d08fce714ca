use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stage,
    Commit,
    Push,
}

impl Step {
    pub fn as_str(&self) -> &str {
        match self {
            Step::Stage => "stage",
            Step::Commit => "commit",
            Step::Push => "push",
        }
    }

    /// Step that runs after this one, if any.
    pub fn next(&self) -> Option<Step> {
        match self {
            Step::Stage => Some(Step::Commit),
            Step::Commit => Some(Step::Push),
            Step::Push => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    Skipped,
    Failed,
}

/// Outcome of one runner step, handed to the caller as soon as the step ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub status: StepStatus,
    pub detail: String,
}

impl StepReport {
    pub fn succeeded(step: Step, detail: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Succeeded,
            detail: detail.into(),
        }
    }

    pub fn skipped(step: Step, detail: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Skipped,
            detail: detail.into(),
        }
    }

    pub fn failed(step: Step, detail: impl Into<String>) -> Self {
        Self {
            step,
            status: StepStatus::Failed,
            detail: detail.into(),
        }
    }
}

/// Everything a completed run did, in execution order.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub message: String,
    pub steps: Vec<StepReport>,
}

impl RunReport {
    pub fn new(message: String) -> Self {
        Self {
            message,
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, report: StepReport) {
        self.steps.push(report);
    }

    pub fn status_of(&self, step: Step) -> Option<StepStatus> {
        self.steps.iter().find(|r| r.step == step).map(|r| r.status)
    }

    pub fn committed(&self) -> bool {
        self.status_of(Step::Commit) == Some(StepStatus::Succeeded)
    }

    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|r| r.status != StepStatus::Failed)
    }
}
