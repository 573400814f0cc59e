use crate::llm::util::{split_arguments, role_to_llm, tool_params_to_value};
use crate::llm::Llm;
use crate::config::Config;
use crate::error::Error;
use crate::tools::{ToolChoice, ToolSpec};
use crate::val_as_str;
use serde_json::{json, Value};
use crate::request::Client;
use super::messages::Text;
use super::{Message, ToolCall};
use super::util::{self, llm_to_role};

/// Chat completions API of OpenAI and compatible servers.
pub struct OpenAIChat {
    config: Config,
    client: Box<dyn Client>,
}

impl OpenAIChat {
    pub(super) fn new(config: Config, client: Box<dyn Client>) -> Result<Self, Error> {
        if config.api_key.is_empty() {
            return Err(Error::MissingArgError("api-key is mandatory for openai."))
        }

        Ok(OpenAIChat {
            config,
            client,
        })
    }

    fn prep_messages(&self, messages: &[Message]) -> Result<Vec<Value>, Error> {
        let mut history: Vec<Value> = Vec::with_capacity(messages.len());

        for message in messages {
            match message {
                Message::Text(txt) => history.push(json!({
                    "role": role_to_llm(txt.role),
                    "content": txt.content
                })),
                Message::ToolCall(call) => {
                    let entry = json!({
                        "id": call.id,
                        "type": "function",
                        "function": {
                            "name": call.name,
                            "arguments": serde_json::to_string(&call.arguments())?
                        }
                    });

                    // A tool call belongs to the assistant message right before it.
                    match history.last_mut() {
                        Some(last) if last["role"] == "assistant" => {
                            if let Some(calls) = last["tool_calls"].as_array_mut() {
                                calls.push(entry);
                            } else {
                                last["tool_calls"] = Value::Array(vec![entry]);
                            }
                        },
                        _ => history.push(json!({
                            "role": "assistant",
                            "content": null,
                            "tool_calls": [entry]
                        })),
                    }
                },
                Message::ToolResult(res) => history.push(json!({
                    "role": "tool",
                    "content": res.content,
                    "tool_call_id": res.id
                })),
            }
        }

        Ok(history)
    }

    fn prep_payload(&self, messages: &[Message], tools: &[ToolSpec], choice: &ToolChoice) -> Result<Value, Error> {

        let mut payload = json!({
            "model": self.config.name
        });

        payload["messages"] = Value::Array(self.prep_messages(messages)?);

        util::set_f64_param(&mut payload, "frequency_penalty", &self.config.frequency_penalty);
        util::set_f64_param(&mut payload, "presence_penalty", &self.config.presence_penalty);
        util::set_f64_param(&mut payload, "top_p", &self.config.top_p);
        util::set_f64_param(&mut payload, "temperature", &self.config.temperature);
        util::set_i64_param(&mut payload, "max_completion_tokens", &self.config.max_tokens);

        if let Some(val) = &self.config.stop_sequence {
            payload["stop"] = Value::String(val.clone());
        }

        self.prep_tool_use(&mut payload, tools, choice);

        Ok(payload)
    }

    fn prep_tool_use(&self, payload: &mut Value, tools: &[ToolSpec], choice: &ToolChoice) {
        if tools.is_empty() {
            return;
        }

        match choice {
            ToolChoice::None => return,
            ToolChoice::Auto => {
                payload["tool_choice"] = Value::String("auto".to_owned());
            },
            ToolChoice::CallOne => {
                payload["tool_choice"] = Value::String("required".to_owned());
            },
            ToolChoice::Force(tool) => {
                payload["tool_choice"] = json!({
                    "type": "function",
                    "function": {
                        "name": tool
                    }
                });
            },
        };

        let mut arr = Vec::with_capacity(tools.len());
        for spec in tools {
            arr.push(json!({
                "type": "function",
                "function": {
                    "description": spec.description,
                    "name": spec.name,
                    "parameters": tool_params_to_value(&spec.params),
                    "strict": true
                }
            }));
        }
        payload["tools"] = Value::Array(arr);
        payload["parallel_tool_calls"] = Value::Bool(false);
    }

    fn check_for_error(&self, response: &Value) -> Result<(), Error> {
        if let Some(error) = response.get("error") {
            let errmes = val_as_str!(error["message"], "error message").to_owned();
            return Err(Error::LLMErrorMessage(errmes));
        }
        Ok(())
    }

    fn process_response(&self, response: Value) -> Result<Vec<Message>, Error> {

        self.check_for_error(&response)?;

        let mut result = Vec::new();

        for choice in response["choices"].as_array()
            .ok_or(Error::LLMResponseError("unexpected answer format, can't enumerate response messages."))?
        {
            let msg = &choice["message"];

            let role = llm_to_role(val_as_str!(msg["role"], "message role"))?;

            if !msg["content"].is_null() {
                let content = val_as_str!(msg["content"], "message content").to_owned();
                result.push(Message::Text(Text { role, content }));
            }

            if !msg["refusal"].is_null() {
                let content = val_as_str!(msg["refusal"], "refusal content").to_owned();
                result.push(Message::Text(Text { role, content }));
            }

            if !msg["tool_calls"].is_null() {
                for call in msg["tool_calls"].as_array()
                    .ok_or(Error::LLMResponseError("unexpected answer format, can't enumerate tool call requests."))?
                {
                    let id = val_as_str!(call["id"], "tool call id").to_owned();
                    let name = val_as_str!(call["function"]["name"], "tool name").to_owned();
                    let arguments = val_as_str!(call["function"]["arguments"], "tool arguments");

                    let args = split_arguments(&serde_json::from_str::<Value>(arguments)?)?;

                    result.push(Message::ToolCall(ToolCall { id, name, args }));
                }
            }
        }

        Ok(result)
    }
}

impl Llm for OpenAIChat {

    fn get_inference(&self, messages: &[Message], tools: &[ToolSpec], choice: &ToolChoice) -> Result<Vec<Message>, Error> {
        let payload = self.prep_payload(messages, tools, choice)?;

        let token = format!("Bearer {}", self.config.api_key);
        let headers = &[("Authorization", token.as_ref())];

        tracing::debug!(model = %self.config.name, messages = messages.len(), "openai inference");

        let response = self.client.make_json_request(&self.config.api_url, payload, headers, &[])?;

        self.process_response(response)
    }

    fn model_name(&self) -> &str {
        &self.config.name
    }
}
