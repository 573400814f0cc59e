//! Agent tools.

mod spec;
mod tool;
mod search;
mod weather;

pub use spec::ParamType;
pub use spec::ToolSpec;
pub use spec::ParamSpec;
pub use spec::ToolChoice;
pub use tool::Tool;
pub use tool::FnTool;
pub use tool::ToolSet;
pub use tool::INPUT_PARAM;
pub use search::WebSearch;
pub use weather::Weather;
