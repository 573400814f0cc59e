//! Reasoning engines: decide the next action from the transcript.

mod react;
mod tool_calling;
mod scripted;

pub use react::ReActEngine;
pub use react::ReActParser;
pub use tool_calling::ToolCallingEngine;
pub use scripted::ScriptedEngine;

use crate::error::Error;
use super::step::{Decision, Transcript};

/// Component that decides, given the transcript, what to do next.
pub trait ReasoningEngine {

    /// Produce the next decision.
    ///
    /// [`Error::OutputParse`] means the engine answered with something that is
    /// neither a tool request nor a final answer; the loop records it and goes on.
    /// Any other error ends the run.
    fn next_step(&mut self, transcript: &Transcript) -> Result<Decision, Error>;
}

impl<E: ReasoningEngine + ?Sized> ReasoningEngine for Box<E> {
    fn next_step(&mut self, transcript: &Transcript) -> Result<Decision, Error> {
        (**self).next_step(transcript)
    }
}
