use thiserror::Error;

/// App errors
#[derive(Error, Debug)]
pub enum AppError {

    /// Toml parsing error
    #[error("Failed to parse config file: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Config parsing error
    #[error("Failed to parse config file: {0}")]
    ConfigParseError(&'static str),

    /// Missing arguments
    #[error("Missing mandatory arguments: {0}\nTry `chainlet --help` for more information.")]
    MissingArgError(&'static str),

    /// Argument value can't be used
    #[error("Incorrect argument value: {0}")]
    InvalidArgError(&'static str),

    /// Library error
    #[error("{0}")]
    LibError(#[from] chainlet_lib::Error),

    /// `.env` file can't be loaded
    #[error("Failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),

    /// Logger setup error
    #[error("Failed to set up logging: {0}")]
    Logger(String),

    /// Config parsing error
    #[error("The format of the color value is incorrect")]
    ColorParseError,

    /// Agent stopped without an answer.
    #[error("{0}")]
    AgentFailed(String),

    /// General error.
    #[error("{0}")]
    Error(String),
}
