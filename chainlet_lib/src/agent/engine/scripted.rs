use std::collections::VecDeque;
use crate::agent::step::{Decision, Transcript};
use crate::error::Error;
use super::ReasoningEngine;

/// Engine that replays prepared decisions, for tests and dry runs.
#[derive(Default)]
pub struct ScriptedEngine {
    script: VecDeque<Result<Decision, Error>>,
    calls: usize,
}

impl ScriptedEngine {

    /// Create engine replaying `script` in order.
    pub fn new(script: Vec<Result<Decision, Error>>) -> Self {
        ScriptedEngine {
            script: script.into(),
            calls: 0,
        }
    }

    /// Engine that returns the same decision `times` times.
    pub fn repeat(decision: Decision, times: usize) -> Self {
        Self::new(std::iter::repeat_with(|| Ok(decision.clone())).take(times).collect())
    }

    /// Number of times the engine was asked for a decision.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl ReasoningEngine for ScriptedEngine {
    fn next_step(&mut self, _transcript: &Transcript) -> Result<Decision, Error> {
        self.calls += 1;
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(Error::output_parse("script is exhausted", "")))
    }
}
