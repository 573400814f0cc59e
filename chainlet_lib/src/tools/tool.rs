use std::collections::HashSet;
use std::fmt;
use crate::error::Error;
use super::{ParamSpec, ParamType, ToolSpec};

/// Name of the single string parameter every tool takes.
pub const INPUT_PARAM: &str = "input";

/// Named capability the reasoning loop can call with a string input.
pub trait Tool {
    /// Unique tool name.
    fn name(&self) -> &str;

    /// What the tool does, the model reads it to decide when to use the tool.
    fn description(&self) -> &str;

    /// Run the tool. May perform network I/O and fail.
    fn invoke(&self, input: &str) -> Result<String, Error>;

    /// Specification for function calling models.
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            params: vec![
                ParamSpec {
                    name: INPUT_PARAM.to_owned(),
                    description: "tool input".to_owned(),
                    data_type: ParamType::String,
                    required: true,
                }
            ],
        }
    }
}

/// Tool backed by a closure.
pub struct FnTool<F> {
    name: String,
    description: String,
    f: F,
}

impl<F> FnTool<F>
where F: Fn(&str) -> Result<String, Error>
{
    /// Create a tool.
    pub fn new(name: impl Into<String>, description: impl Into<String>, f: F) -> Self {
        FnTool {
            name: name.into(),
            description: description.into(),
            f,
        }
    }
}

impl<F> Tool for FnTool<F>
where F: Fn(&str) -> Result<String, Error>
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn invoke(&self, input: &str) -> Result<String, Error> {
        (self.f)(input)
    }
}

/// Fixed set of tools with unique names.
#[derive(Default)]
pub struct ToolSet {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolSet {

    /// Create a set, fails if two tools share a name.
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Result<Self, Error> {
        let mut names = HashSet::with_capacity(tools.len());
        for tool in &tools {
            if !names.insert(tool.name()) {
                return Err(Error::DuplicateTool(tool.name().to_owned()));
            }
        }

        Ok(ToolSet { tools })
    }

    /// Empty set.
    pub fn empty() -> Self {
        ToolSet::default()
    }

    /// Find tool by exact name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// One `name: description` line per tool.
    pub fn describe(&self) -> String {
        self.tools.iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Specifications of all tools.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    /// Iterate over tools.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|t| t.as_ref())
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// No tools registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
