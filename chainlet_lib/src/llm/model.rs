use crate::config::{Config, ModelProvider};
use crate::error::Error;
use crate::request::Client;
use crate::tools::{ToolChoice, ToolSpec};
use super::ollama::OllamaChat;
use super::openai::OpenAIChat;
use super::Message;

/// Stateless LLM, the caller passes the whole conversation on every call.
pub trait Llm {

    /// Call the model with the conversation and the tools it may use.
    /// Returns text messages and/or tool call requests.
    fn get_inference(&self, messages: &[Message], tools: &[ToolSpec], choice: &ToolChoice) -> Result<Vec<Message>, Error>;

    /// Model name.
    fn model_name(&self) -> &str;
}

impl<L: Llm + ?Sized> Llm for Box<L> {
    fn get_inference(&self, messages: &[Message], tools: &[ToolSpec], choice: &ToolChoice) -> Result<Vec<Message>, Error> {
        (**self).get_inference(messages, tools, choice)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Create Llm instance for the configured provider.
pub fn get_llm(config: Config, client: Box<dyn Client>) -> Result<Box<dyn Llm>, Error> {
    if config.name.is_empty() {
        return Err(Error::MissingArgError("model name is empty."));
    }

    Ok(match config.provider {
        ModelProvider::OpenAI => Box::new(OpenAIChat::new(config, client)?),
        ModelProvider::Ollama => Box::new(OllamaChat::new(config, client)),
    })
}
