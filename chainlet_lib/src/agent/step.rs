use std::fmt::Display;

/// What the reasoning engine decided to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Call a tool.
    Tool {
        /// Tool name.
        name: String,
        /// Tool input.
        input: String,
    },
    /// Stop with the final answer.
    Finish(String),
}

/// One output of the reasoning engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Reasoning that led to the action, may be empty.
    pub thought: String,
    /// Chosen action.
    pub action: Action,
    /// Raw engine output.
    pub log: String,
}

impl Decision {
    /// Decision to call `tool` with `input`.
    pub fn tool(thought: impl Into<String>, tool: impl Into<String>, input: impl Into<String>) -> Self {
        let (thought, name, input) = (thought.into(), tool.into(), input.into());
        let log = format!("{thought}\nAction: {name}\nAction Input: {input}");
        Decision { thought, action: Action::Tool { name, input }, log }
    }

    /// Decision to finish with `answer`.
    pub fn finish(thought: impl Into<String>, answer: impl Into<String>) -> Self {
        let (thought, answer) = (thought.into(), answer.into());
        let log = format!("{thought}\nFinal Answer: {answer}");
        Decision { thought, action: Action::Finish(answer), log }
    }
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepStatus {
    /// Tool ran, observation is its output.
    Completed,
    /// Tool returned an error, observation describes it.
    ToolFailed,
    /// Engine named a tool that is not registered.
    UnknownTool,
    /// Engine output could not be parsed.
    Malformed,
    /// Engine produced the final answer.
    Final,
}

impl Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            StepStatus::Completed => "completed",
            StepStatus::ToolFailed => "tool failed",
            StepStatus::UnknownTool => "unknown tool",
            StepStatus::Malformed => "malformed output",
            StepStatus::Final => "final answer",
        };
        f.write_str(status)
    }
}

/// Record of one loop iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Engine thought.
    pub thought: String,
    /// Chosen action, `None` when the engine output was malformed.
    pub action: Option<Action>,
    /// Observation fed back to the engine, empty for the final step.
    pub observation: String,
    /// Step status.
    pub status: StepStatus,
    /// Raw engine output.
    pub log: String,
}

impl Step {
    /// Tool name if the step requested one.
    pub fn tool(&self) -> Option<&str> {
        match &self.action {
            Some(Action::Tool { name, .. }) => Some(name),
            _ => None,
        }
    }
}

/// Request and the steps taken so far, the engine's only input.
#[derive(Debug, Clone)]
pub struct Transcript {
    request: String,
    steps: Vec<Step>,
}

impl Transcript {
    pub(super) fn new(request: String) -> Self {
        Transcript { request, steps: Vec::new() }
    }

    /// Caller request.
    pub fn request(&self) -> &str {
        &self.request
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub(super) fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub(super) fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}
