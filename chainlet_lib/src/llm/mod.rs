//! LLM interface
mod model;
mod openai;
mod ollama;
mod util;
mod messages;

pub use model::Llm;
pub use model::get_llm;
pub use messages::Argument;
pub use messages::Message;
pub use messages::Role;
pub use messages::Text;
pub use messages::ToolCall;
pub use messages::ToolResult;
pub use util::collect_text;
