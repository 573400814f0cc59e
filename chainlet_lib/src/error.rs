use thiserror::Error as ThisError;

/// Library errors.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Missing arguments.
    #[error("Missing mandatory arguments: {0}")]
    MissingArgError(&'static str),

    /// Argument has a value that can't be used.
    #[error("Incorrect argument value: {0}")]
    InvalidArgError(&'static str),

    /// Transport error.
    #[error("Failed to call remote API: {0}")]
    LLMCallError(#[from] reqwest::Error),

    /// Payload (de)serialization error.
    #[error("Failed to process LLM call: {0}")]
    LLMJsonError(#[from] serde_json::Error),

    /// Response has unexpected shape.
    #[error("Failed to parse LLM response: {0}")]
    LLMResponseError(&'static str),

    /// LLM response error message.
    #[error("LLM provider responded with error: {0}")]
    LLMErrorMessage(String),

    /// Reasoning engine produced output that is neither a tool request nor a final answer.
    #[error("Could not parse LLM output ({reason}): `{output}`")]
    OutputParse {
        /// What is wrong with the output.
        reason: String,
        /// Raw output.
        output: String,
    },

    /// Tool invocation failed.
    #[error("{0}")]
    ToolError(String),

    /// Two tools registered under one name.
    #[error("Tool `{0}` is registered more than once")]
    DuplicateTool(String),

    /// Prompt template can't be parsed.
    #[error("Invalid prompt template: {0}")]
    Template(&'static str),

    /// Prompt template variable has no value.
    #[error("Missing value for prompt variable `{0}`")]
    MissingVariable(String),

    /// General error.
    #[error("{0}")]
    Error(String),
}

impl Error {
    /// Create an output parse error.
    pub fn output_parse(reason: impl Into<String>, output: impl Into<String>) -> Self {
        Error::OutputParse { reason: reason.into(), output: output.into() }
    }
}
