use serde::Serialize;

/// JSON schema type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// String.
    String,
    /// Integer.
    Integer,
    /// Number.
    Number,
    /// Boolean.
    Boolean,
}

/// One parameter of a function calling tool.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Name.
    pub name: String,
    /// What the model should pass.
    pub description: String,
    /// Schema type.
    pub data_type: ParamType,
    /// The model must always pass it.
    pub required: bool,
}

/// Tool as it is described to function calling models.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Function name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Parameters.
    pub params: Vec<ParamSpec>,
}

/// Whether and how the model may call tools.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolChoice {
    /// Tools are not offered.
    None,
    /// Model decides.
    Auto,
    /// Model must call one of the tools.
    CallOne,
    /// Model must call the named tool.
    Force(String),
}
