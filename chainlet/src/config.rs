use std::time::Duration;
use chainlet_lib::agent::DEFAULT_MAX_ITERATIONS;
use chainlet_lib::Config as ModelParams;
use chainlet_lib::{ModelProvider, DEFAULT_TIMEOUT};

use crate::{error::AppError, options::{ModelOptions, Options}, util::ColorPair};

/// What the app does with the message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// Send the message to the model and print the reply.
    Ask,
    /// Generate a report on the message topic, then summarize it.
    Chain,
    /// Answer the message with the tool-using agent.
    Agent,
}

impl TryFrom<&str> for Mode {
    type Error = AppError;

    fn try_from(val: &str) -> Result<Self, Self::Error> {
        match val {
            "ask" => Ok(Mode::Ask),
            "chain" => Ok(Mode::Chain),
            "agent" => Ok(Mode::Agent),
            _ => Err(AppError::ConfigParseError("unknown mode")),
        }
    }
}

/// Reasoning engine of the agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineKind {
    /// Text ReAct protocol.
    ReAct,
    /// Native function calling.
    Tools,
}

impl TryFrom<&str> for EngineKind {
    type Error = AppError;

    fn try_from(val: &str) -> Result<Self, Self::Error> {
        match val {
            "react" => Ok(EngineKind::ReAct),
            "tools" => Ok(EngineKind::Tools),
            _ => Err(AppError::ConfigParseError("unknown engine")),
        }
    }
}

/// Agent settings.
#[derive(Clone, Debug)]
pub struct AgentSettings {
    /// Iteration budget.
    pub max_iterations: usize,
    /// Reasoning engine.
    pub engine: EngineKind,
    /// Weatherstack access key, the weather tool is registered only when set.
    pub weather_api_key: Option<String>,
}

/// Application settings.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Thought lines color.
    pub thought_color: ColorPair,
    /// Tool lines color.
    pub tool_color: ColorPair,
    /// Answer color.
    pub answer_color: ColorPair,
}

/// App config
#[derive(Clone, Debug)]
pub struct Config {
    /// Run mode
    pub mode: Mode,
    /// Message
    pub message: String,
    /// Primary model
    pub model_params: ModelParams,
    /// Summary model of the chain mode
    pub summary_params: Option<ModelParams>,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Agent settings
    pub agent: AgentSettings,
    /// Print agent steps
    pub verbose: bool,
    /// Log level
    pub log_level: Option<String>,
    /// Settings
    pub settings: Settings,
}

fn model_params(options: ModelOptions) -> Result<ModelParams, AppError> {
    let name = options.model.ok_or(AppError::MissingArgError("inference model is not specified."))?;
    let provider: ModelProvider = options.model_provider
        .ok_or(AppError::MissingArgError("model provider is not specified."))?
        .as_str()
        .try_into()?;

    Ok(ModelParams {
        provider,
        name,
        api_key: options.api_key.unwrap_or_default(),
        api_url: options.api_url.unwrap_or_else(|| ModelParams::default_api_url(provider).to_owned()),
        max_tokens: options.max_tokens,
        temperature: options.temperature,
        top_p: options.top_p,
        top_k: options.top_k,
        frequency_penalty: options.frequency_penalty,
        presence_penalty: options.presence_penalty,
        stop_sequence: options.stop_sequence,
    })
}

impl TryFrom<Options> for Config {
    type Error = AppError;

    fn try_from(options: Options) -> Result<Self, AppError> {
        let mode: Mode = options.mode.as_deref().unwrap_or("agent").try_into()?;
        let engine: EngineKind = options.engine.as_deref().unwrap_or("react").try_into()?;

        let max_iterations = match options.max_iterations {
            Some(n) => usize::try_from(n).map_err(|_| AppError::InvalidArgError("max-iterations is too large"))?,
            None => DEFAULT_MAX_ITERATIONS,
        };

        let settings = Settings {
            thought_color: options.thought_color,
            tool_color: options.tool_color,
            answer_color: options.answer_color,
        };

        Ok(Config {
            mode,
            message: options.message.ok_or(AppError::MissingArgError("message is not specified."))?,
            model_params: model_params(options.model)?,
            summary_params: options.summary_model.map(model_params).transpose()?,
            timeout: options.timeout.map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            agent: AgentSettings {
                max_iterations,
                engine,
                weather_api_key: options.weather_api_key.filter(|k| !k.is_empty()),
            },
            verbose: options.verbose,
            log_level: options.log_level,
            settings,
        })
    }
}
