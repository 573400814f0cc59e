//! App initialization functions.

use anstyle::Style;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use std::ffi::OsString;
use std::str::FromStr;
use crate::error::AppError;
use crate::toml_parser::parse_toml_config;
use dirs::home_dir;
use crate::util::{parse_colors, parse_positive, ColorPair};

/// Model options, one set per TOML context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOptions {
    /// Model provider.
    pub model_provider: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Model API URL.
    pub api_url: Option<String>,
    /// Maximum number of tokens that will be generated.
    pub max_tokens: Option<i64>,
    /// Level of randomization when choosing tokens.
    pub temperature: Option<f64>,
    /// Only the tokens comprising the top_p probability mass will be considered.
    pub top_p: Option<f64>,
    /// Only k tokens with the most probability will be considered.
    pub top_k: Option<i64>,
    /// Penalize new tokens based on their existing frequency.
    pub frequency_penalty: Option<f64>,
    /// Penalize new tokens based on whether they appear in the text so far.
    pub presence_penalty: Option<f64>,
    /// Sequence at which model will stop generating.
    pub stop_sequence: Option<String>,
}

/// App options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Run mode.
    pub mode: Option<String>,
    /// User message.
    pub message: Option<String>,
    /// Primary model.
    pub model: ModelOptions,
    /// Name of the TOML context holding the summary model.
    pub summary_context: Option<String>,
    /// Summary model of the chain mode.
    pub summary_model: Option<ModelOptions>,
    /// HTTP request timeout, seconds.
    pub timeout: Option<u64>,
    /// Agent iteration budget.
    pub max_iterations: Option<u64>,
    /// Reasoning engine.
    pub engine: Option<String>,
    /// Weatherstack access key.
    pub weather_api_key: Option<String>,
    /// Log level.
    pub log_level: Option<String>,
    /// Print the agent trace.
    pub verbose: bool,
    /// Thought lines color and badge background.
    pub thought_color: ColorPair,
    /// Tool lines color and badge background.
    pub tool_color: ColorPair,
    /// Answer color and badge background.
    pub answer_color: ColorPair,
}


macro_rules! check_and_set_float_arg {
    ($arg:literal, $m:ident, $option:expr) => {
        if let Some(x) = $m.get_one::<String>($arg) {
            if let Ok(val) = f64::from_str(x) {
                $option.replace(val);
            } else {
                return Err(AppError::InvalidArgError(concat!($arg, " must be floating point number")));
            }
        }
    }
}

macro_rules! check_and_set_color_arg {
    ($arg:literal, $m:ident, $option:expr) => {
        if let Some(x) = $m.get_one::<String>($arg) {
            if let Ok(colors) = parse_colors(&x) {
                $option = colors;
            } else {
                return Err(AppError::InvalidArgError(
                    concat!($arg, " must have valid format, e.g. 'fg(255,0,123);bg(0,123,255)'.")
                ));
            }
        }
    }
}

macro_rules! check_and_set_str_arg {
    ($arg:literal, $m:ident, $option:expr) => {
        if let Some(x) = $m.get_one::<String>($arg) {
            $option.replace(x.clone());
        }
    }
}

impl Options {

    /// Create new unfilled options.
    pub fn new() -> Self {
        Options::default()
    }

    fn env_arg(name: &'static str, env: &'static str, help: &'static str) -> Arg {
        Arg::new(name)
            .long(name)
            .help(help)
            .env(env)
            .required(false)
    }

    fn argument_parser<T>(args: impl IntoIterator<Item = T>) -> ArgMatches where T: Into<OsString> + Clone {
        let bold_underline = Style::new().underline().bold();
        let bold = Style::new().bold();

        Command::new("Chainlet")
            .about("Chainlet runs LLM prompts, two-stage chains, and a tool-using agent that searches the web and checks the weather.")
            .version(env!("CARGO_PKG_VERSION"))
            .arg(Self::env_arg("mode", "CHAINLET_MODE", "Run mode, one of: ask, chain, agent (default)").short('M'))
            .arg(Self::env_arg("message", "CHAINLET_MESSAGE", "Question, chain topic, or agent request").short('e'))
            .arg(Self::env_arg("model", "CHAINLET_MODEL", "Inference model name").short('m'))
            .arg(Self::env_arg("model-provider", "CHAINLET_MODEL_PROVIDER", "Model provider, one of: openai, ollama").short('p'))
            .arg(Self::env_arg("api-key", "CHAINLET_API_KEY", "LLM model API key").short('k'))
            .arg(Self::env_arg("api-url", "CHAINLET_API_URL", "Model API URL").short('u'))
            .arg(Self::env_arg("config", "CHAINLET_CONFIG", "Config file path").short('c'))
            .arg(Self::env_arg("max-tokens", "CHAINLET_MAX_TOKENS", "Maximum number of tokens that will be generated"))
            .arg(Self::env_arg("temperature", "CHAINLET_TEMPERATURE", "Level of randomization when LLM choose tokens"))
            .arg(Self::env_arg("top-p", "CHAINLET_TOP_P", "Only the tokens comprising the top_p probability mass will be considered"))
            .arg(Self::env_arg("top-k", "CHAINLET_TOP_K", "Only k tokens with the most probability will be considered"))
            .arg(Self::env_arg("frequency-penalty", "CHAINLET_FREQUENCY_PENALTY", "Penalize new tokens based on their existing frequency"))
            .arg(Self::env_arg("presence-penalty", "CHAINLET_PRESENCE_PENALTY", "Penalize new tokens based on whether they appear in the text so far"))
            .arg(Self::env_arg("stop-sequence", "CHAINLET_STOP_SEQUENCE", "Sequence at which model will stop generating"))
            .arg(Self::env_arg("summary-context", "CHAINLET_SUMMARY_CONTEXT", "Config file context with the summary model of the chain mode"))
            .arg(Self::env_arg("timeout", "CHAINLET_TIMEOUT", "HTTP request timeout in seconds (default 60)"))
            .arg(Self::env_arg("max-iterations", "CHAINLET_MAX_ITERATIONS", "Maximum number of agent iterations (default 5)").short('n'))
            .arg(Self::env_arg("engine", "CHAINLET_ENGINE", "Agent reasoning engine, one of: react (default), tools"))
            .arg(Self::env_arg("weather-api-key", "CHAINLET_WEATHER_API_KEY", "Weatherstack access key, enables the weather tool"))
            .arg(Self::env_arg("log-level", "CHAINLET_LOG_LEVEL", "Log level: error, warn, info, debug, trace (RUST_LOG is used when not set)").short('l'))
            .arg(
                Arg::new("verbose")
                .long("verbose")
                .help("Print every agent step")
                .short('v')
                .env("CHAINLET_VERBOSE")
                .action(ArgAction::SetTrue)
            )
            .arg(Self::env_arg("thought-color", "CHAINLET_THOUGHT_COLOR", "Thought lines and badge background colors, rgb (e.g. 'fg(255,0,123);bg(0,123,255)')."))
            .arg(Self::env_arg("tool-color", "CHAINLET_TOOL_COLOR", "Tool lines and badge background colors, rgb (e.g. 'fg(255,0,123);bg(0,123,255)')."))
            .arg(Self::env_arg("answer-color", "CHAINLET_ANSWER_COLOR", "Answer and badge background colors, rgb (e.g. 'fg(255,0,123);bg(0,123,255)')."))
            .after_help(format!("{bold_underline}Example:{bold_underline:#} {bold}

    chainlet --model=llama3.2 --model-provider=ollama --message='What is the current temp of gurgaon' --weather-api-key=<your-key>{bold:#}

To start using the application you need to specify at least the model provider (--model-provider), the model name (--model), and the message (--message).
OpenAI models also need an API key (--api-key).
Chainlet uses the configuration file .chainlet.toml from user's home directory, or the one specified with -c option.
Variables from a .env file in the current directory are loaded into the environment.
The configuration options can be overridden with the command line arguments or environment variables."))
            .get_matches_from(args)
    }

    fn load_config_file(path: Option<&str>) -> Result<Option<String>, std::io::Error> {
        Ok(if let Some(p) = path {
            Some(std::fs::read_to_string(p)?)
        } else if let Some(mut p) = home_dir() {
            p.push(".chainlet.toml");
            if std::fs::exists(p.as_path())? {
                Some(std::fs::read_to_string(p.as_path())?)
            } else {
                None
            }
        } else {
            None
        })
    }

    fn validate_mandatory_options(options: &Options) -> Result<(), AppError> {
        if options.message.is_none() {
            return Err(AppError::MissingArgError("message is not specified."));
        }
        if options.model.model.is_none() {
            return Err(AppError::MissingArgError("inference model is not specified."));
        }
        if options.model.model_provider.is_none() {
            return Err(AppError::MissingArgError("model provider is not specified."));
        }
        if options.summary_context.is_some() && options.summary_model.is_none() {
            return Err(AppError::ConfigParseError("summary context is not found in the config file"));
        }

        Ok(())
    }

    /// Load and validate options from env, command line arguments, config file.
    pub fn load<T>(args: impl IntoIterator<Item = T>) -> Result<Self, AppError>
        where T: Into<OsString> + Clone
    {
        let m = Self::argument_parser(args);

        let mut options = Options::new();

        check_and_set_str_arg!("summary-context", m, options.summary_context);

        let config_path = m.get_one("config").map(|s: &String| s.as_ref());

        if let Some(content) = Self::load_config_file(config_path)
            .map_err(|err| AppError::Error(format!("Error loading config file: {}", err)))?
        {
            parse_toml_config(&content, &mut options)?;
        }

        check_and_set_str_arg!("mode", m, options.mode);
        check_and_set_str_arg!("message", m, options.message);
        check_and_set_str_arg!("model", m, options.model.model);
        check_and_set_str_arg!("model-provider", m, options.model.model_provider);
        check_and_set_str_arg!("api-key", m, options.model.api_key);
        check_and_set_str_arg!("api-url", m, options.model.api_url);
        check_and_set_str_arg!("stop-sequence", m, options.model.stop_sequence);
        check_and_set_str_arg!("engine", m, options.engine);
        check_and_set_str_arg!("weather-api-key", m, options.weather_api_key);
        check_and_set_str_arg!("log-level", m, options.log_level);

        if let Some(x) = m.get_one::<String>("max-tokens") {
            if let Ok(val) = x.parse::<i64>() {
                if val < 0 { return Err(AppError::InvalidArgError("max-tokens must be non-negative")) };
                options.model.max_tokens.replace(val);
            } else {
                return Err(AppError::InvalidArgError("max-tokens must be integer"));
            }
        }
        if let Some(x) = m.get_one::<String>("top-k") {
            if let Ok(val) = x.parse::<i64>() {
                if val <= 0 { return Err(AppError::InvalidArgError("top-k must be greater than zero")) };
                options.model.top_k.replace(val);
            } else {
                return Err(AppError::InvalidArgError("top-k must be integer"));
            }
        }
        if let Some(x) = m.get_one::<String>("timeout") {
            options.timeout.replace(parse_positive(x, "timeout must be a positive integer")?);
        }
        if let Some(x) = m.get_one::<String>("max-iterations") {
            options.max_iterations.replace(parse_positive(x, "max-iterations must be a positive integer")?);
        }

        check_and_set_float_arg!("temperature", m, options.model.temperature);
        check_and_set_float_arg!("top-p", m, options.model.top_p);
        check_and_set_float_arg!("frequency-penalty", m, options.model.frequency_penalty);
        check_and_set_float_arg!("presence-penalty", m, options.model.presence_penalty);

        check_and_set_color_arg!("thought-color", m, options.thought_color);
        check_and_set_color_arg!("tool-color", m, options.tool_color);
        check_and_set_color_arg!("answer-color", m, options.answer_color);

        if m.get_flag("verbose") {
            options.verbose = true;
        }

        Self::validate_mandatory_options(&options)?;

        Ok(options)
    }
}
