use serde_json::Value;
use crate::agent::step::{Action, Decision, Transcript};
use crate::error::Error;
use crate::llm::{collect_text, Argument, Llm, Message, Role, ToolCall};
use crate::tools::{ToolChoice, ToolSet, ToolSpec, INPUT_PARAM};
use super::ReasoningEngine;

/// Default system prompt of the function calling engine.
pub const TOOL_CALLING_PROMPT: &str = "You are a helpful assistant. Use the provided tools when you need information you don't have. \
When you know the answer, reply with it as plain text without calling a tool.";

/// Engine relying on the model's native function calling.
pub struct ToolCallingEngine<L> {
    llm: L,
    system_prompt: String,
    specs: Vec<ToolSpec>,
}

impl<L: Llm> ToolCallingEngine<L> {

    /// Create engine, every tool is offered as a function with one string parameter.
    pub fn new(llm: L, tools: &ToolSet) -> Self {
        ToolCallingEngine {
            llm,
            system_prompt: TOOL_CALLING_PROMPT.to_owned(),
            specs: tools.specs(),
        }
    }

    /// Replace the system prompt.
    pub fn with_system_prompt(mut self, prompt: String) -> Self {
        self.system_prompt = prompt;
        self
    }

    fn messages(&self, transcript: &Transcript) -> Vec<Message> {
        let mut messages = vec![
            Message::text(Role::System, self.system_prompt.clone()),
            Message::text(Role::User, transcript.request().to_owned()),
        ];

        for (i, step) in transcript.steps().iter().enumerate() {
            match &step.action {
                Some(Action::Tool { name, input }) => {
                    let call_id = format!("call_{i}");
                    if !step.thought.is_empty() {
                        messages.push(Message::text(Role::Model, step.thought.clone()));
                    }
                    messages.push(Message::tool_call(call_id.clone(), name.clone(), vec![
                        Argument { name: INPUT_PARAM.to_owned(), value: Value::String(input.clone()) }
                    ]));
                    messages.push(Message::tool_result(call_id, name.clone(), step.observation.clone()));
                },
                Some(Action::Finish(answer)) => {
                    messages.push(Message::text(Role::Model, answer.clone()));
                },
                None => {
                    if !step.log.is_empty() {
                        messages.push(Message::text(Role::Model, step.log.clone()));
                    }
                    messages.push(Message::text(Role::User, step.observation.clone()));
                },
            }
        }

        messages
    }
}

// String input of the call: the `input` parameter, or the arguments as JSON.
fn call_input(call: &ToolCall) -> String {
    match call.arg(INPUT_PARAM) {
        Some(Value::String(s)) => s.clone(),
        Some(value) => value.to_string(),
        None => call.arguments().to_string(),
    }
}

fn to_decision(response: &[Message]) -> Result<Decision, Error> {
    let calls: Vec<&ToolCall> = response.iter()
        .filter_map(|m| match m {
            Message::ToolCall(call) => Some(call),
            _ => None,
        })
        .collect();

    let text = collect_text(response).unwrap_or_default();

    match calls.as_slice() {
        [] if text.trim().is_empty() => {
            Err(Error::output_parse("Model returned neither text nor a tool call", text))
        },
        [] => Ok(Decision::finish("", text.trim())),
        [call] => Ok(Decision::tool(text.trim(), call.name.as_str(), call_input(call))),
        _ => {
            let names: Vec<&str> = calls.iter().map(|c| c.name.as_str()).collect();
            Err(Error::output_parse("Only one tool call per step is supported", format!("{text}[{}]", names.join(", "))))
        },
    }
}

impl<L: Llm> ReasoningEngine for ToolCallingEngine<L> {
    fn next_step(&mut self, transcript: &Transcript) -> Result<Decision, Error> {
        let messages = self.messages(transcript);

        let response = self.llm.get_inference(&messages, &self.specs, &ToolChoice::Auto)?;

        to_decision(&response)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;
    use crate::agent::step::{Step, StepStatus};
    use crate::config::{Config, ModelProvider};
    use crate::llm::get_llm;
    use crate::request::stub::StubClient;
    use crate::tools::{FnTool, Tool};

    fn tools() -> ToolSet {
        let search: Box<dyn Tool> = Box::new(FnTool::new("search", "Web search.", |q: &str| Ok(q.to_owned())));
        ToolSet::new(vec![search]).expect("tools")
    }

    fn tools_json() -> Value {
        json!([{
            "type": "function",
            "function": {
                "description": "Web search.",
                "name": "search",
                "strict": true,
                "parameters": {
                    "type": "object",
                    "properties": { "input": { "type": "string", "description": "tool input" } },
                    "required": ["input"],
                    "additionalProperties": false
                }
            }
        }])
    }

    fn step(thought: &str, action: Option<Action>, observation: &str, status: StepStatus, log: &str) -> Step {
        Step {
            thought: thought.into(),
            action,
            observation: observation.into(),
            status,
            log: log.into(),
        }
    }

    fn engine_with(client: StubClient) -> ToolCallingEngine<Box<dyn Llm>> {
        let config = Config::new(ModelProvider::OpenAI, "gpt-4o-mini".into(), "<key>".into(), "<url>".into());
        let llm = get_llm(config, Box::new(client)).expect("llm");
        ToolCallingEngine::new(llm, &tools()).with_system_prompt("sys".into())
    }

    fn call(name: &str, args: Vec<Argument>) -> Message {
        Message::tool_call("id".into(), name.into(), args)
    }

    #[test]
    fn test_to_decision() {
        let input = |v: Value| vec![Argument { name: INPUT_PARAM.into(), value: v }];

        let decision = to_decision(&[Message::text(Role::Model, "Searching.".into()), call("search", input(json!("dhadak 2")))]).expect("decision");
        assert_eq!(decision.thought, "Searching.");
        assert_eq!(decision.action, Action::Tool { name: "search".into(), input: "dhadak 2".into() });

        let decision = to_decision(&[call("search", vec![Argument { name: "query".into(), value: json!("x") }])]).expect("decision");
        assert_eq!(decision.action, Action::Tool { name: "search".into(), input: "{\"query\":\"x\"}".into() });

        let decision = to_decision(&[Message::text(Role::Model, " 42 ".into())]).expect("decision");
        assert_eq!(decision.action, Action::Finish("42".into()));

        assert!(matches!(to_decision(&[]), Err(Error::OutputParse { .. })));
        assert!(matches!(
            to_decision(&[call("search", input(json!("a"))), call("weather", input(json!("b")))]),
            Err(Error::OutputParse { .. })
        ));
    }

    #[test]
    fn test_engine_round_trip_over_openai() {
        let mut transcript = Transcript::new("release date of Dhadak 2?".into());
        let action = Some(Action::Tool { name: "search".into(), input: "Dhadak 2 release".into() });
        transcript.push(step("", action, "1 August 2025", StepStatus::Completed, ""));

        let expected_payload = json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": "sys" },
                { "role": "user", "content": "release date of Dhadak 2?" },
                {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_0",
                        "type": "function",
                        "function": { "name": "search", "arguments": "{\"input\":\"Dhadak 2 release\"}" }
                    }]
                },
                { "role": "tool", "content": "1 August 2025", "tool_call_id": "call_0" }
            ],
            "parallel_tool_calls": false,
            "tool_choice": "auto",
            "tools": tools_json()
        });

        let response_body = json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "It releases on 1 August 2025." },
                "finish_reason": "stop"
            }]
        });

        let client = StubClient::new().expect_post(
            vec![("Authorization".into(), "Bearer <key>".into())],
            Some(expected_payload),
            response_body);

        let mut engine = engine_with(client);

        let decision = engine.next_step(&transcript).expect("decision");
        assert_eq!(decision.action, Action::Finish("It releases on 1 August 2025.".into()));
    }

    #[test]
    fn test_replay_of_recovered_steps() {
        let search = |q: &str| Some(Action::Tool { name: "search".into(), input: q.into() });
        let weather = Some(Action::Tool { name: "weather".into(), input: "Delhi".into() });

        let mut transcript = Transcript::new("release date of Dhadak 2?".into());
        transcript.push(step("I should search.", search("Dhadak 2 release"), "1 August 2025", StepStatus::Completed, ""));
        transcript.push(step("", None, "Invalid format: Missing 'Action:' after 'Thought:'", StepStatus::Malformed, "It is out soon"));
        transcript.push(step("", weather, "`weather` is not a valid tool, try one of [search].", StepStatus::UnknownTool, ""));

        let expected_payload = json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": "sys" },
                { "role": "user", "content": "release date of Dhadak 2?" },
                {
                    "role": "assistant",
                    "content": "I should search.",
                    "tool_calls": [{
                        "id": "call_0",
                        "type": "function",
                        "function": { "name": "search", "arguments": "{\"input\":\"Dhadak 2 release\"}" }
                    }]
                },
                { "role": "tool", "content": "1 August 2025", "tool_call_id": "call_0" },
                { "role": "assistant", "content": "It is out soon" },
                { "role": "user", "content": "Invalid format: Missing 'Action:' after 'Thought:'" },
                {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_2",
                        "type": "function",
                        "function": { "name": "weather", "arguments": "{\"input\":\"Delhi\"}" }
                    }]
                },
                { "role": "tool", "content": "`weather` is not a valid tool, try one of [search].", "tool_call_id": "call_2" }
            ],
            "parallel_tool_calls": false,
            "tool_choice": "auto",
            "tools": tools_json()
        });

        let response_body = json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "1 August 2025" },
                "finish_reason": "stop"
            }]
        });

        let client = StubClient::new().expect_post(
            vec![("Authorization".into(), "Bearer <key>".into())],
            Some(expected_payload),
            response_body);

        let mut engine = engine_with(client);

        let decision = engine.next_step(&transcript).expect("decision");
        assert_eq!(decision.action, Action::Finish("1 August 2025".into()));
    }
}
