//! The three run modes.

use chainlet_lib::agent::engine::{ReActEngine, ReasoningEngine, ToolCallingEngine};
use chainlet_lib::agent::{Agent, Outcome, Run};
use chainlet_lib::chain::{LlmChain, PromptTemplate, RunConfig, SequentialChain};
use chainlet_lib::llm::{get_llm, Llm};
use chainlet_lib::request::get_reqwest_client;
use chainlet_lib::tools::{Tool, ToolSet, Weather, WebSearch};
use chainlet_lib::Config as ModelParams;
use crate::config::{Config, EngineKind, Mode};
use crate::error::AppError;
use crate::term::Term;

const ASK_PROMPT: &str = "{question}";
const REPORT_PROMPT: &str = "Generate a detailed report on \n {topic}";
const SUMMARY_PROMPT: &str = "Generate a 7 pointer summary from the following text \n {text}";

/// Run the configured mode.
pub fn run(config: Config) -> Result<(), AppError> {
    let term = Term::new(&config.settings);

    tracing::info!(mode = ?config.mode, model = %config.model_params.name, "starting");

    match config.mode {
        Mode::Ask => ask(&config, &term),
        Mode::Chain => chain(&config, &term),
        Mode::Agent => agent(&config, &term),
    }
}

fn llm(config: &Config, params: &ModelParams) -> Result<Box<dyn Llm>, AppError> {
    let client = get_reqwest_client(config.timeout)?;
    Ok(get_llm(params.clone(), client)?)
}

fn ask(config: &Config, term: &Term) -> Result<(), AppError> {
    let chain = LlmChain::new(PromptTemplate::new(ASK_PROMPT)?, llm(config, &config.model_params)?);

    let answer = chain.invoke(&[("question", config.message.as_str())])?;

    term.print_answer(&answer);
    Ok(())
}

fn chain(config: &Config, term: &Term) -> Result<(), AppError> {
    let summary_params = config.summary_params.as_ref().unwrap_or(&config.model_params);

    let run_config = RunConfig {
        name: "Sequential_chain".into(),
        tags: vec!["report-generation".into(), "summarization".into()],
        metadata: vec![
            ("model1".into(), config.model_params.name.clone()),
            ("model2".into(), summary_params.name.clone()),
        ],
    };

    let chain = SequentialChain::new(vec![
        LlmChain::new(PromptTemplate::new(REPORT_PROMPT)?, llm(config, &config.model_params)?),
        LlmChain::new(PromptTemplate::new(SUMMARY_PROMPT)?, llm(config, summary_params)?),
    ])?.with_config(run_config);

    let summary = chain.invoke(&[("topic", config.message.as_str())])?;

    term.print_answer(&summary);
    Ok(())
}

fn tools(config: &Config) -> Result<ToolSet, AppError> {
    let mut tools: Vec<Box<dyn Tool>> = vec![
        Box::new(WebSearch::new(get_reqwest_client(config.timeout)?)),
    ];

    if let Some(key) = &config.agent.weather_api_key {
        tools.push(Box::new(Weather::new(get_reqwest_client(config.timeout)?, key.clone())));
    } else {
        tracing::info!("weather API key is not configured, weather tool disabled");
    }

    Ok(ToolSet::new(tools)?)
}

fn agent(config: &Config, term: &Term) -> Result<(), AppError> {
    let tools = tools(config)?;
    let llm = llm(config, &config.model_params)?;

    let engine: Box<dyn ReasoningEngine> = match config.agent.engine {
        EngineKind::ReAct => Box::new(ReActEngine::new(llm, &tools)?),
        EngineKind::Tools => Box::new(ToolCallingEngine::new(llm, &tools)),
    };

    let mut agent = Agent::new(engine, tools, config.agent.max_iterations)?;

    let run = agent.run(&config.message);

    if config.verbose {
        for (i, step) in run.trace.iter().enumerate() {
            term.print_step(i + 1, step);
        }
    }

    term.print_answer(final_answer(&run)?);

    Ok(())
}

// A failed run becomes the app error, `main` reports it.
fn final_answer(run: &Run) -> Result<&str, AppError> {
    match &run.outcome {
        Outcome::Done(answer) => Ok(answer),
        Outcome::Failed(failure) => Err(AppError::AgentFailed(failure.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use chainlet_lib::agent::Failure;
    use chainlet_lib::ModelProvider;
    use crate::config::{AgentSettings, Settings};
    use super::*;

    fn config(weather_api_key: Option<String>) -> Config {
        Config {
            mode: Mode::Agent,
            message: "What is the current temp of gurgaon".into(),
            model_params: ModelParams::new(ModelProvider::Ollama, "llama3.2".into(), String::new(), "<url>".into()),
            summary_params: None,
            timeout: Duration::from_secs(5),
            agent: AgentSettings { max_iterations: 5, engine: EngineKind::ReAct, weather_api_key },
            verbose: false,
            log_level: None,
            settings: Settings { thought_color: (None, None), tool_color: (None, None), answer_color: (None, None) },
        }
    }

    #[test]
    fn test_weather_tool_needs_key() {
        assert_eq!(tools(&config(None)).expect("tools").names(), vec!["search"]);
        assert_eq!(tools(&config(Some("<key>".into()))).expect("tools").names(), vec!["search", "get_weather_data"]);
    }

    #[test]
    fn test_final_answer() {
        let done = Run { outcome: Outcome::Done("42".into()), trace: vec![] };
        assert_eq!(final_answer(&done).expect("answer"), "42");

        let failed = Run { outcome: Outcome::Failed(Failure::BudgetExhausted { iterations: 3 }), trace: vec![] };
        let err = final_answer(&failed).expect_err("failure");
        assert!(matches!(err, AppError::AgentFailed(_)));
        assert_eq!(err.to_string(), "Agent stopped after 3 iterations without a final answer.");
    }

    #[test]
    fn test_prompts() {
        assert_eq!(PromptTemplate::new(REPORT_PROMPT).expect("template").variables(), ["topic"]);
        assert_eq!(PromptTemplate::new(SUMMARY_PROMPT).expect("template").variables(), ["text"]);
    }
}
