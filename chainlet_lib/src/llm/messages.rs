use serde_json::{Map, Value};

/// Who produced a message, independent of the provider's naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Instructions for the model.
    System,
    /// The model itself.
    Model,
    /// The caller.
    User,
}

/// Named argument of a tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Argument name.
    pub name: String,
    /// Argument value.
    pub value: Value,
}

/// Plain text from one of the roles.
#[derive(Debug, Clone)]
pub struct Text {
    /// Author.
    pub role: Role,
    /// Text.
    pub content: String,
}

/// Model's request to run a tool.
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Call id, pairs the call with its result.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// Arguments.
    pub args: Vec<Argument>,
}

impl ToolCall {
    /// Arguments as a JSON object.
    pub fn arguments(&self) -> Value {
        let args: Map<String, Value> = self.args.iter()
            .map(|a| (a.name.clone(), a.value.clone()))
            .collect();
        Value::Object(args)
    }

    /// Value of the argument `name`.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.iter().find(|a| a.name == name).map(|a| &a.value)
    }
}

/// Output of a tool run, sent back to the model.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Id of the call this result answers.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// Tool output.
    pub content: String,
}

/// One entry of a model conversation.
#[derive(Debug, Clone)]
pub enum Message {
    /// Text.
    Text(Text),
    /// Tool call.
    ToolCall(ToolCall),
    /// Tool result.
    ToolResult(ToolResult),
}

impl Message {
    /// Text message.
    pub fn text(role: Role, content: String) -> Self {
        Message::Text(Text { role, content })
    }

    /// Tool call made by the model.
    pub fn tool_call(id: String, name: String, args: Vec<Argument>) -> Self {
        Message::ToolCall(ToolCall { id, name, args })
    }

    /// Result of a tool call.
    pub fn tool_result(id: String, name: String, content: String) -> Self {
        Message::ToolResult(ToolResult { id, name, content })
    }
}
