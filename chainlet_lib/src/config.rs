use std::fmt::Display;
use std::time::Duration;
use crate::error::Error;

/// Default timeout of a single HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where the model runs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ModelProvider {
    /// OpenAI or any server with an OpenAI-compatible chat completions API.
    OpenAI,
    /// Local Ollama server.
    #[default]
    Ollama,
}

impl TryFrom<&str> for ModelProvider {
    type Error = Error;

    fn try_from(val: &str) -> Result<Self, Self::Error> {
        match val {
            "openai" => Ok(ModelProvider::OpenAI),
            "ollama" => Ok(ModelProvider::Ollama),
            _ => Err(Error::Error(format!("unknown provider: {val}"))),
        }
    }
}

impl Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ModelProvider::OpenAI => "openai",
            ModelProvider::Ollama => "ollama",
        })
    }
}

/// Model endpoint and sampling parameters. Unset parameters are left to the provider.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Provider.
    pub provider: ModelProvider,
    /// Model name as the provider knows it.
    pub name: String,
    /// API key, may be empty for local models.
    pub api_key: String,
    /// Chat endpoint.
    pub api_url: String,
    /// Upper bound of generated tokens.
    pub max_tokens: Option<i64>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Nucleus sampling mass.
    pub top_p: Option<f64>,
    /// Sample from the k most likely tokens.
    pub top_k: Option<i64>,
    /// Frequency penalty.
    pub frequency_penalty: Option<f64>,
    /// Presence penalty.
    pub presence_penalty: Option<f64>,
    /// Generation stops at this sequence.
    pub stop_sequence: Option<String>,
}


impl Config {

    /// Config with provider defaults for all sampling parameters.
    pub fn new(provider: ModelProvider, name: String, api_key: String, api_url: String) -> Self {
        Config {
            provider,
            name,
            api_key,
            api_url,
            ..Config::default()
        }
    }

    /// Chat endpoint used when none is configured.
    pub fn default_api_url(provider: ModelProvider) -> &'static str {
        match provider {
            ModelProvider::OpenAI => "https://api.openai.com/v1/chat/completions",
            ModelProvider::Ollama => "http://localhost:11434/api/chat",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider() {
        assert_eq!(ModelProvider::try_from("openai").expect("provider"), ModelProvider::OpenAI);
        assert_eq!(ModelProvider::try_from("ollama").expect("provider"), ModelProvider::Ollama);
        assert!(matches!(ModelProvider::try_from("anthropic"), Err(Error::Error(_))));
        assert_eq!(ModelProvider::OpenAI.to_string(), "openai");
    }
}
