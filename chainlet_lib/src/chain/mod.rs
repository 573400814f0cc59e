//! Prompt templates and chains: prompt -> model -> text.

mod template;

pub use template::PromptTemplate;

use crate::error::Error;
use crate::llm::{collect_text, Llm, Message, Role};
use crate::tools::ToolChoice;

/// Text of the model reply.
pub fn parse_text(messages: &[Message]) -> Result<String, Error> {
    collect_text(messages).ok_or(Error::LLMResponseError("model returned no text."))
}

/// Prompt piped into a model, the reply is parsed as text.
pub struct LlmChain<L> {
    prompt: PromptTemplate,
    llm: L,
}

impl<L: Llm> LlmChain<L> {

    /// Create chain.
    pub fn new(prompt: PromptTemplate, llm: L) -> Self {
        LlmChain { prompt, llm }
    }

    /// Prompt template.
    pub fn prompt(&self) -> &PromptTemplate {
        &self.prompt
    }

    /// Format the prompt with `values`, send it and return the reply text.
    pub fn invoke(&self, values: &[(&str, &str)]) -> Result<String, Error> {
        let text = self.prompt.format(values)?;

        let response = self.llm.get_inference(&[Message::text(Role::User, text)], &[], &ToolChoice::None)?;

        parse_text(&response)
    }
}

/// Run metadata attached to the tracing span of a chain run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Run name.
    pub name: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Free-form key/value pairs.
    pub metadata: Vec<(String, String)>,
}

/// Chain of stages where each stage gets the text produced by the previous one.
pub struct SequentialChain {
    stages: Vec<LlmChain<Box<dyn Llm>>>,
    config: RunConfig,
}

impl SequentialChain {

    /// Create chain. Every stage after the first must take exactly one variable.
    pub fn new(stages: Vec<LlmChain<Box<dyn Llm>>>) -> Result<Self, Error> {
        if stages.is_empty() {
            return Err(Error::InvalidArgError("sequential chain needs at least one stage"));
        }

        if stages.iter().skip(1).any(|s| s.prompt().variables().len() != 1) {
            return Err(Error::InvalidArgError("every stage after the first must have exactly one prompt variable"));
        }

        Ok(SequentialChain { stages, config: RunConfig::default() })
    }

    /// Set run metadata.
    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// Run all stages, returns the output of the last one.
    pub fn invoke(&self, values: &[(&str, &str)]) -> Result<String, Error> {
        let span = tracing::info_span!("chain", run_name = %self.config.name, tags = ?self.config.tags);
        let _enter = span.enter();

        for (k, v) in &self.config.metadata {
            tracing::debug!(key = %k, value = %v, "run metadata");
        }

        let mut output = String::new();

        for (i, stage) in self.stages.iter().enumerate() {
            output = if i == 0 {
                stage.invoke(values)?
            } else {
                let var = stage.prompt().variables()[0].as_str();
                stage.invoke(&[(var, output.as_str())])?
            };

            tracing::debug!(stage = i, model = stage.llm.model_name(), chars = output.len(), "stage finished");
        }

        Ok(output)
    }
}
