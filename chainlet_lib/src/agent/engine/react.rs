use regex::Regex;
use crate::agent::step::{Action, Decision, Step, Transcript};
use crate::chain::PromptTemplate;
use crate::error::Error;
use crate::llm::{collect_text, Llm, Message, Role};
use crate::tools::{ToolChoice, ToolSet};
use super::ReasoningEngine;

/// Standard ReAct prompt.
pub const REACT_PROMPT: &str = "Answer the following questions as best you can. You have access to the following tools:

{tools}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin!

Question: {input}
Thought:{agent_scratchpad}";

const FINAL_ANSWER: &str = "Final Answer:";
const OBSERVATION: &str = "\nObservation:";

/// Parser of the `Thought/Action/Action Input` or `Final Answer` text protocol.
pub struct ReActParser {
    action: Regex,
    action_only: Regex,
    input_only: Regex,
}

impl ReActParser {

    /// Create parser.
    pub fn new() -> Result<Self, Error> {
        let compile = |re: &str| Regex::new(re).map_err(|e| Error::Error(format!("invalid parser regex: {e}")));

        Ok(ReActParser {
            action: compile(r"(?s)Action\s*\d*\s*:\s*(.*?)\s*Action\s*\d*\s*Input\s*\d*\s*:\s*(.*)")?,
            action_only: compile(r"(?s)Action\s*\d*\s*:\s*(.*?)")?,
            input_only: compile(r"(?s)\s*Action\s*\d*\s*Input\s*\d*\s*:\s*(.*)")?,
        })
    }

    /// Parse model output into a decision, malformed output is [`Error::OutputParse`].
    pub fn parse(&self, text: &str) -> Result<Decision, Error> {
        // Models sometimes continue past the action and invent the observation.
        let text = match text.find(OBSERVATION) {
            Some(pos) => &text[..pos],
            None => text,
        };

        let answer_pos = text.find(FINAL_ANSWER);

        if let Some(caps) = self.action.captures(text) {
            if answer_pos.is_some() {
                return Err(Error::output_parse("Parsing LLM output produced both a final answer and a parse-able action", text));
            }

            let start = caps.get(0).map_or(0, |m| m.start());
            let name = caps.get(1).map_or("", |m| m.as_str()).trim();
            let input = caps.get(2).map_or("", |m| m.as_str())
                .trim_matches(' ')
                .trim_matches('"')
                .trim();

            if name.is_empty() {
                return Err(Error::output_parse("Missing tool name after 'Action:'", text));
            }

            return Ok(Decision {
                thought: text[..start].trim().to_owned(),
                action: Action::Tool { name: name.to_owned(), input: input.to_owned() },
                log: text.to_owned(),
            });
        }

        if let Some(pos) = answer_pos {
            return Ok(Decision {
                thought: text[..pos].trim().to_owned(),
                action: Action::Finish(text[pos + FINAL_ANSWER.len()..].trim().to_owned()),
                log: text.to_owned(),
            });
        }

        let reason = if !self.action_only.is_match(text) {
            "Missing 'Action:' after 'Thought:'"
        } else if !self.input_only.is_match(text) {
            "Missing 'Action Input:' after 'Action:'"
        } else {
            "Could not parse LLM output"
        };

        Err(Error::output_parse(reason, text))
    }
}

/// Engine speaking the text ReAct protocol with any model.
pub struct ReActEngine<L> {
    llm: L,
    prompt: PromptTemplate,
    tools: String,
    tool_names: String,
    parser: ReActParser,
}

impl<L: Llm> ReActEngine<L> {

    /// Create engine for the given tools with the standard prompt.
    pub fn new(llm: L, tools: &ToolSet) -> Result<Self, Error> {
        Ok(ReActEngine {
            llm,
            prompt: PromptTemplate::new(REACT_PROMPT)?,
            tools: tools.describe(),
            tool_names: tools.names().join(", "),
            parser: ReActParser::new()?,
        })
    }

    /// Replace the prompt. It must use `{input}` and `{agent_scratchpad}`,
    /// `{tools}` and `{tool_names}` are optional.
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Result<Self, Error> {
        const KNOWN: [&str; 4] = ["tools", "tool_names", "input", "agent_scratchpad"];

        let vars = prompt.variables();
        if let Some(unknown) = vars.iter().find(|v| !KNOWN.contains(&v.as_str())) {
            return Err(Error::Error(format!("unknown ReAct prompt variable `{unknown}`")));
        }
        if !vars.iter().any(|v| v == "input") || !vars.iter().any(|v| v == "agent_scratchpad") {
            return Err(Error::InvalidArgError("ReAct prompt must use {input} and {agent_scratchpad}"));
        }

        self.prompt = prompt;
        Ok(self)
    }

    fn render(&self, transcript: &Transcript) -> Result<String, Error> {
        let scratchpad = scratchpad(transcript.steps());

        self.prompt.format(&[
            ("tools", self.tools.as_str()),
            ("tool_names", self.tool_names.as_str()),
            ("input", transcript.request()),
            ("agent_scratchpad", scratchpad.as_str()),
        ])
    }
}

/// Previous steps in the `<log>\nObservation: <obs>\nThought: ` form.
fn scratchpad(steps: &[Step]) -> String {
    let mut pad = String::new();
    for step in steps {
        pad.push_str(&step.log);
        pad.push_str("\nObservation: ");
        pad.push_str(&step.observation);
        pad.push_str("\nThought: ");
    }
    pad
}

impl<L: Llm> ReasoningEngine for ReActEngine<L> {
    fn next_step(&mut self, transcript: &Transcript) -> Result<Decision, Error> {
        let prompt = self.render(transcript)?;

        let response = self.llm.get_inference(&[Message::text(Role::User, prompt)], &[], &ToolChoice::None)?;

        let text = collect_text(&response)
            .ok_or_else(|| Error::output_parse("Model returned no text", ""))?;

        self.parser.parse(&text)
    }
}
