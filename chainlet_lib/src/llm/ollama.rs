use serde_json::{json, Map, Value};
use crate::config::Config;
use crate::error::Error;
use crate::request::Client;
use crate::tools::{ToolChoice, ToolSpec};
use crate::val_as_str;
use super::util::{self, split_arguments, llm_to_role, role_to_llm, tool_params_to_value};
use super::{Llm, Message, ToolCall};

/// Local models served by Ollama (`/api/chat`).
pub struct OllamaChat {
    config: Config,
    client: Box<dyn Client>,
}

impl OllamaChat {
    pub(super) fn new(config: Config, client: Box<dyn Client>) -> Self {
        OllamaChat {
            config,
            client,
        }
    }

    fn prep_messages(&self, messages: &[Message]) -> Vec<Value> {
        messages.iter().map(|message| match message {
            Message::Text(txt) => json!({
                "role": role_to_llm(txt.role),
                "content": txt.content
            }),
            Message::ToolCall(call) => json!({
                "role": "assistant",
                "content": "",
                "tool_calls": [{
                    "function": {
                        "name": call.name,
                        "arguments": call.arguments()
                    }
                }]
            }),
            Message::ToolResult(res) => json!({
                "role": "tool",
                "content": res.content,
                "tool_name": res.name
            }),
        }).collect()
    }

    fn prep_options(&self) -> Value {
        let mut options = Value::Object(Map::new());

        util::set_f64_param(&mut options, "temperature", &self.config.temperature);
        util::set_f64_param(&mut options, "top_p", &self.config.top_p);
        util::set_i64_param(&mut options, "top_k", &self.config.top_k);
        util::set_f64_param(&mut options, "frequency_penalty", &self.config.frequency_penalty);
        util::set_f64_param(&mut options, "presence_penalty", &self.config.presence_penalty);
        util::set_i64_param(&mut options, "num_predict", &self.config.max_tokens);

        if let Some(val) = &self.config.stop_sequence {
            options["stop"] = json!([val]);
        }

        options
    }

    fn prep_payload(&self, messages: &[Message], tools: &[ToolSpec], choice: &ToolChoice) -> Value {
        let mut payload = json!({
            "model": self.config.name,
            "messages": self.prep_messages(messages),
            "stream": false,
        });

        let options = self.prep_options();
        if options.as_object().is_some_and(|o| !o.is_empty()) {
            payload["options"] = options;
        }

        // Ollama has no tool_choice, tools are either offered or not.
        if !tools.is_empty() && !matches!(choice, ToolChoice::None) {
            payload["tools"] = Value::Array(tools.iter().map(|spec| json!({
                "type": "function",
                "function": {
                    "name": spec.name,
                    "description": spec.description,
                    "parameters": tool_params_to_value(&spec.params),
                }
            })).collect());
        }

        payload
    }

    fn process_response(&self, response: Value) -> Result<Vec<Message>, Error> {
        if let Some(error) = response.get("error") {
            let errmes = val_as_str!(error, "error message").to_owned();
            return Err(Error::LLMErrorMessage(errmes));
        }

        let msg = response.get("message")
            .ok_or(Error::LLMResponseError("unexpected answer format, no message in response."))?;

        let role = llm_to_role(val_as_str!(msg["role"], "message role"))?;

        let mut result = Vec::new();

        if let Some(content) = msg["content"].as_str() {
            if !content.is_empty() {
                result.push(Message::text(role, content.to_owned()));
            }
        }

        if !msg["tool_calls"].is_null() {
            let calls = msg["tool_calls"].as_array()
                .ok_or(Error::LLMResponseError("unexpected answer format, can't enumerate tool call requests."))?;

            for (i, call) in calls.iter().enumerate() {
                let name = val_as_str!(call["function"]["name"], "tool name").to_owned();

                // Arguments normally arrive as an object, some models send a JSON string.
                let arguments = &call["function"]["arguments"];
                let args = match arguments.as_str() {
                    Some(s) => split_arguments(&serde_json::from_str::<Value>(s)?)?,
                    None => split_arguments(arguments)?,
                };

                result.push(Message::ToolCall(ToolCall { id: format!("call_{i}"), name, args }));
            }
        }

        Ok(result)
    }
}

impl Llm for OllamaChat {

    fn get_inference(&self, messages: &[Message], tools: &[ToolSpec], choice: &ToolChoice) -> Result<Vec<Message>, Error> {
        let payload = self.prep_payload(messages, tools, choice);

        tracing::debug!(model = %self.config.name, messages = messages.len(), "ollama inference");

        let response = self.client.make_json_request(&self.config.api_url, payload, &[], &[])?;

        self.process_response(response)
    }

    fn model_name(&self) -> &str {
        &self.config.name
    }
}
