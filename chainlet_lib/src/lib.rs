//! Chainlet-lib is a small library for LLM pipelines: prompt templates,
//! chains of model calls and a tool-using agent that reasons, acts and
//! observes until it has an answer or runs out of iterations.
//!
//! ### Features
//!
//!  - prompt templates with `{variable}` placeholders
//!  - single and sequential chains
//!  - reasoning loop with a bounded number of iterations
//!  - text (ReAct) and native function calling reasoning engines
//!  - web search and weather tools
//!
//! ### Providers
//!
//! - OpenAI (GPT models)
//! - Ollama (local models)
//!
//! ### Examples
//!
//! ```rust no_run
//! use chainlet_lib::agent::{Agent, Outcome};
//! use chainlet_lib::agent::engine::ReActEngine;
//! use chainlet_lib::llm::get_llm;
//! use chainlet_lib::request::get_reqwest_client;
//! use chainlet_lib::tools::{Tool, ToolSet, WebSearch};
//! use chainlet_lib::{Config, ModelProvider, DEFAULT_TIMEOUT};
//!
//! let config = Config::new(ModelProvider::Ollama, "llama3.2".into(), String::new(), "http://localhost:11434/api/chat".into());
//!
//! let llm = get_llm(config, get_reqwest_client(DEFAULT_TIMEOUT).expect("transport created")).expect("llm created");
//!
//! let search: Box<dyn Tool> = Box::new(WebSearch::new(get_reqwest_client(DEFAULT_TIMEOUT).expect("transport created")));
//! let tools = ToolSet::new(vec![search]).expect("tools registered");
//!
//! let engine = ReActEngine::new(llm, &tools).expect("engine created");
//! let mut agent = Agent::new(engine, tools, 5).expect("agent created");
//!
//! let run = agent.run("When was Kalpana Chawla born?");
//!
//! match run.outcome {
//!     Outcome::Done(answer) => println!("{answer}"),
//!     Outcome::Failed(failure) => eprintln!("{failure}"),
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::suspicious)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::collapsible_if)]

mod error;
mod config;
pub mod llm;
pub mod tools;
pub mod request;
pub mod chain;
pub mod agent;

pub use error::Error;
pub use config::Config;
pub use config::ModelProvider;
pub use config::DEFAULT_TIMEOUT;
