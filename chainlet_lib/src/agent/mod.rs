//! Tool-augmented reasoning loop.
//!
//! The loop alternates between asking a [`ReasoningEngine`] what to do next
//! and running the chosen tool, until the engine gives the final answer or
//! the iteration budget runs out:
//!
//! ```text
//! Reasoning --tool chosen--> Acting --observation--> Reasoning
//! Reasoning --final answer--> Done
//! Reasoning/Acting --budget exhausted--> Failed
//! ```
//!
//! Unknown tools, failing tools and malformed engine output are recorded in
//! the trace as observations and never end the run early.

pub mod engine;
mod step;

use std::fmt::Display;
use crate::error::Error;
use crate::tools::ToolSet;
use engine::ReasoningEngine;

pub use step::{Action, Decision, Step, StepStatus, Transcript};

/// Iteration budget used when none is given.
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Why a run ended without an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// No final answer within the iteration budget.
    BudgetExhausted {
        /// Iterations performed.
        iterations: usize,
    },
    /// The reasoning engine itself failed (transport or provider error).
    Engine(String),
}

impl Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::BudgetExhausted { iterations } => write!(f, "Agent stopped after {iterations} iterations without a final answer."),
            Failure::Engine(e) => write!(f, "Reasoning engine failed: {e}"),
        }
    }
}

/// Terminal result of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Final answer.
    Done(String),
    /// Run ended without an answer.
    Failed(Failure),
}

impl Outcome {
    /// Final answer, if any.
    pub fn answer(&self) -> Option<&str> {
        match self {
            Outcome::Done(answer) => Some(answer),
            Outcome::Failed(_) => None,
        }
    }
}

/// Outcome together with every step taken.
#[derive(Debug, Clone)]
pub struct Run {
    /// Outcome.
    pub outcome: Outcome,
    /// Trace, never longer than the iteration budget.
    pub trace: Vec<Step>,
}

enum State {
    Reasoning,
    Acting { thought: String, name: String, input: String, log: String },
    Done(String),
    Failed(Failure),
}

/// Drives the reasoning engine and the tools.
pub struct Agent<E> {
    engine: E,
    tools: ToolSet,
    max_iterations: usize,
}

impl<E: ReasoningEngine> Agent<E> {

    /// Create agent, `max_iterations` must be positive.
    pub fn new(engine: E, tools: ToolSet, max_iterations: usize) -> Result<Self, Error> {
        if max_iterations == 0 {
            return Err(Error::InvalidArgError("max iterations must be greater than zero"));
        }

        Ok(Agent {
            engine,
            tools,
            max_iterations,
        })
    }

    /// Reasoning engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Answer `request`. Never fails: every problem ends up in the trace or the outcome.
    pub fn run(&mut self, request: &str) -> Run {
        let mut transcript = Transcript::new(request.to_owned());
        let mut state = State::Reasoning;

        loop {
            state = match state {
                State::Reasoning => self.reason(&mut transcript),
                State::Acting { thought, name, input, log } => {
                    transcript.push(self.act(thought, name, input, log));
                    State::Reasoning
                },
                State::Done(answer) => {
                    tracing::info!(iterations = transcript.steps().len(), "agent finished");
                    return Run { outcome: Outcome::Done(answer), trace: transcript.into_steps() };
                },
                State::Failed(failure) => {
                    tracing::warn!(iterations = transcript.steps().len(), %failure, "agent failed");
                    return Run { outcome: Outcome::Failed(failure), trace: transcript.into_steps() };
                },
            };
        }
    }

    fn reason(&mut self, transcript: &mut Transcript) -> State {
        let iterations = transcript.steps().len();
        if iterations >= self.max_iterations {
            return State::Failed(Failure::BudgetExhausted { iterations });
        }

        tracing::debug!(iteration = iterations + 1, max = self.max_iterations, "reasoning");

        match self.engine.next_step(transcript) {
            Ok(Decision { thought, action: Action::Tool { name, input }, log }) => {
                State::Acting { thought, name, input, log }
            },
            Ok(Decision { thought, action: Action::Finish(answer), log }) => {
                transcript.push(Step {
                    thought,
                    action: Some(Action::Finish(answer.clone())),
                    observation: String::new(),
                    status: StepStatus::Final,
                    log,
                });
                State::Done(answer)
            },
            Err(Error::OutputParse { reason, output }) => {
                tracing::warn!(%reason, "malformed reasoning engine output");
                transcript.push(Step {
                    thought: String::new(),
                    action: None,
                    observation: format!("Invalid format: {reason}"),
                    status: StepStatus::Malformed,
                    log: output,
                });
                State::Reasoning
            },
            Err(err) => State::Failed(Failure::Engine(err.to_string())),
        }
    }

    fn act(&self, thought: String, name: String, input: String, log: String) -> Step {
        let (observation, status) = match self.tools.get(&name) {
            None => {
                tracing::warn!(tool = %name, "unknown tool requested");
                (format!("`{}` is not a valid tool, try one of [{}].", name, self.tools.names().join(", ")), StepStatus::UnknownTool)
            },
            Some(tool) => match tool.invoke(&input) {
                Ok(output) => {
                    tracing::debug!(tool = %name, chars = output.len(), "tool finished");
                    (output, StepStatus::Completed)
                },
                Err(err) => {
                    tracing::warn!(tool = %name, error = %err, "tool failed");
                    (format!("Tool `{name}` failed: {err}"), StepStatus::ToolFailed)
                },
            },
        };

        Step {
            thought,
            action: Some(Action::Tool { name, input }),
            observation,
            status,
            log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::engine::ScriptedEngine;
    use crate::tools::{FnTool, Tool};

    fn tool(name: &str, output: &'static str) -> Box<dyn Tool> {
        Box::new(FnTool::new(name, "test tool", move |_: &str| Ok(output.to_owned())))
    }

    fn failing_tool(name: &str) -> Box<dyn Tool> {
        Box::new(FnTool::new(name, "always fails", |_: &str| Err(Error::ToolError("connection reset".into()))))
    }

    #[test]
    fn test_zero_budget_rejected() {
        let engine = ScriptedEngine::new(vec![]);
        assert!(matches!(Agent::new(engine, ToolSet::empty(), 0), Err(Error::InvalidArgError(_))));
    }

    #[test]
    fn test_budget_exhausted_after_exactly_n() {
        for n in 1..=6 {
            let engine = ScriptedEngine::repeat(Decision::tool("again", "search", "q"), n + 3);
            let tools = ToolSet::new(vec![tool("search", "nothing useful")]).expect("tools");
            let mut agent = Agent::new(engine, tools, n).expect("agent");

            let run = agent.run("never answers");

            assert_eq!(run.outcome, Outcome::Failed(Failure::BudgetExhausted { iterations: n }));
            assert_eq!(run.trace.len(), n);
            assert_eq!(agent.engine().calls(), n);
            assert!(run.trace.iter().all(|s| s.status == StepStatus::Completed));
        }
    }

    #[test]
    fn test_final_answer_at_k() {
        for k in 1..=4 {
            let mut script: Vec<Result<Decision, Error>> = (1..k).map(|_| Ok(Decision::tool("", "search", "q"))).collect();
            script.push(Ok(Decision::finish("I now know the final answer", format!("answer {k}"))));

            let tools = ToolSet::new(vec![tool("search", "found")]).expect("tools");
            let mut agent = Agent::new(ScriptedEngine::new(script), tools, 5).expect("agent");

            let run = agent.run("question");

            assert_eq!(run.outcome, Outcome::Done(format!("answer {k}")));
            assert_eq!(run.trace.len(), k);
            let last = run.trace.last().expect("final step");
            assert_eq!(last.status, StepStatus::Final);
            assert_eq!(last.action, Some(Action::Finish(format!("answer {k}"))));
        }
    }

    #[test]
    fn test_search_then_answer_scenario() {
        let script = vec![
            Ok(Decision::tool("look it up", "search", "meaning of life")),
            Ok(Decision::tool("look again", "search", "meaning of life, really")),
            Ok(Decision::finish("done", "42")),
        ];
        let tools = ToolSet::new(vec![tool("search", "42 apparently")]).expect("tools");
        let mut agent = Agent::new(ScriptedEngine::new(script), tools, 3).expect("agent");

        let run = agent.run("What is the answer?");

        assert_eq!(run.outcome, Outcome::Done("42".into()));
        assert_eq!(run.outcome.answer(), Some("42"));
        assert_eq!(run.trace.len(), 3);
        assert_eq!(run.trace[0].tool(), Some("search"));
        assert_eq!(run.trace[0].observation, "42 apparently");
        assert_eq!(run.trace[1].action, Some(Action::Tool { name: "search".into(), input: "meaning of life, really".into() }));
    }

    #[test]
    fn test_unknown_tool_scenario() {
        let engine = ScriptedEngine::repeat(Decision::tool("", "weather", "gurgaon"), 2);
        let mut agent = Agent::new(engine, ToolSet::empty(), 2).expect("agent");

        let run = agent.run("What is the current temp of gurgaon");

        assert_eq!(run.outcome, Outcome::Failed(Failure::BudgetExhausted { iterations: 2 }));
        assert_eq!(run.trace.len(), 2);
        for step in &run.trace {
            assert_eq!(step.status, StepStatus::UnknownTool);
            assert_eq!(step.observation, "`weather` is not a valid tool, try one of [].");
        }
    }

    #[test]
    fn test_unknown_tool_does_not_stop_loop() {
        let script = vec![
            Ok(Decision::tool("", "Search", "q")),
            Ok(Decision::tool("", "search", "q")),
            Ok(Decision::finish("", "ok")),
        ];
        let tools = ToolSet::new(vec![tool("search", "found"), tool("get_weather_data", "31C")]).expect("tools");
        let mut agent = Agent::new(ScriptedEngine::new(script), tools, 5).expect("agent");

        let run = agent.run("q");

        assert_eq!(run.outcome, Outcome::Done("ok".into()));
        assert_eq!(run.trace[0].status, StepStatus::UnknownTool);
        assert_eq!(run.trace[0].observation, "`Search` is not a valid tool, try one of [search, get_weather_data].");
        assert_eq!(run.trace[1].status, StepStatus::Completed);
    }

    #[test]
    fn test_failing_tool_does_not_abort() {
        let script = vec![
            Ok(Decision::tool("", "get_weather_data", "gurgaon")),
            Ok(Decision::finish("", "unknown")),
        ];
        let tools = ToolSet::new(vec![failing_tool("get_weather_data")]).expect("tools");
        let mut agent = Agent::new(ScriptedEngine::new(script), tools, 5).expect("agent");

        let run = agent.run("temp?");

        assert_eq!(run.outcome, Outcome::Done("unknown".into()));
        assert_eq!(run.trace[0].status, StepStatus::ToolFailed);
        assert_eq!(run.trace[0].observation, "Tool `get_weather_data` failed: connection reset");

        let engine = ScriptedEngine::repeat(Decision::tool("", "get_weather_data", "x"), 3);
        let tools = ToolSet::new(vec![failing_tool("get_weather_data")]).expect("tools");
        let run = Agent::new(engine, tools, 3).expect("agent").run("temp?");

        assert!(matches!(run.outcome, Outcome::Failed(Failure::BudgetExhausted { iterations: 3 })));
        assert!(run.trace.iter().all(|s| s.status == StepStatus::ToolFailed && !s.observation.is_empty()));
    }

    #[test]
    fn test_malformed_output_is_bounded() {
        let script = (0..10)
            .map(|_| Err(Error::output_parse("Missing 'Action:' after 'Thought:'", "I think")))
            .collect();
        let mut agent = Agent::new(ScriptedEngine::new(script), ToolSet::empty(), 4).expect("agent");

        let run = agent.run("q");

        assert_eq!(run.outcome, Outcome::Failed(Failure::BudgetExhausted { iterations: 4 }));
        assert_eq!(run.trace.len(), 4);
        assert!(run.trace.iter().all(|s| s.status == StepStatus::Malformed && s.action.is_none()));
        assert_eq!(run.trace[0].observation, "Invalid format: Missing 'Action:' after 'Thought:'");
        assert_eq!(run.trace[0].log, "I think");
    }

    #[test]
    fn test_malformed_then_answer() {
        let script = vec![
            Err(Error::output_parse("Missing 'Action Input:' after 'Action:'", "Action: search")),
            Ok(Decision::finish("", "fine")),
        ];
        let mut agent = Agent::new(ScriptedEngine::new(script), ToolSet::empty(), 3).expect("agent");

        let run = agent.run("q");

        assert_eq!(run.outcome, Outcome::Done("fine".into()));
        assert_eq!(run.trace.len(), 2);
    }

    #[test]
    fn test_engine_failure_keeps_partial_trace() {
        let script = vec![
            Ok(Decision::tool("", "search", "q")),
            Err(Error::LLMErrorMessage("insufficient_quota".into())),
        ];
        let tools = ToolSet::new(vec![tool("search", "found")]).expect("tools");
        let mut agent = Agent::new(ScriptedEngine::new(script), tools, 5).expect("agent");

        let run = agent.run("q");

        assert!(matches!(&run.outcome, Outcome::Failed(Failure::Engine(m)) if m.contains("insufficient_quota")));
        assert_eq!(run.trace.len(), 1);
        assert_eq!(run.outcome.answer(), None);
    }
}
