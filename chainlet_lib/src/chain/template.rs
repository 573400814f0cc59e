use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// Prompt with `{name}` placeholders, `{{` and `}}` stand for literal braces.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
    variables: Vec<String>,
}

impl PromptTemplate {

    /// Parse template.
    pub fn new(template: &str) -> Result<Self, Error> {
        let mut segments = Vec::new();
        let mut variables: Vec<String> = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                },
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                },
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(Error::Template("nested '{' in variable name")),
                            Some(c) => name.push(c),
                            None => return Err(Error::Template("unclosed '{'")),
                        }
                    }

                    let name = name.trim();
                    if name.is_empty() {
                        return Err(Error::Template("empty variable name"));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    if !variables.iter().any(|v| v == name) {
                        variables.push(name.to_owned());
                    }
                    segments.push(Segment::Variable(name.to_owned()));
                },
                '}' => return Err(Error::Template("single '}' encountered")),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(PromptTemplate { segments, variables })
    }

    /// Variable names in order of first appearance.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Substitute variables; values not used by the template are ignored.
    pub fn format(&self, values: &[(&str, &str)]) -> Result<String, Error> {
        let mut result = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => result.push_str(s),
                Segment::Variable(name) => {
                    let value = values.iter()
                        .find(|(k, _)| *k == name.as_str())
                        .map(|(_, v)| *v)
                        .ok_or_else(|| Error::MissingVariable(name.clone()))?;
                    result.push_str(value);
                },
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let prompt = PromptTemplate::new("Generate a detailed report on \n {topic}").expect("template");
        assert_eq!(prompt.variables(), ["topic"]);
        assert_eq!(
            prompt.format(&[("topic", "LLM finetuning"), ("unused", "x")]).expect("formatted"),
            "Generate a detailed report on \n LLM finetuning"
        );

        let prompt = PromptTemplate::new("{ a }{b}{a} {{literal}}").expect("template");
        assert_eq!(prompt.variables(), ["a", "b"]);
        assert_eq!(prompt.format(&[("a", "1"), ("b", "2")]).expect("formatted"), "121 {literal}");
    }

    #[test]
    fn test_missing_variable() {
        let prompt = PromptTemplate::new("{question}").expect("template");
        assert!(matches!(prompt.format(&[]), Err(Error::MissingVariable(v)) if v == "question"));
    }

    #[test]
    fn test_invalid_templates() {
        assert!(matches!(PromptTemplate::new("{open"), Err(Error::Template(_))));
        assert!(matches!(PromptTemplate::new("close}"), Err(Error::Template(_))));
        assert!(matches!(PromptTemplate::new("{}"), Err(Error::Template(_))));
        assert!(matches!(PromptTemplate::new("{a{b}}"), Err(Error::Template(_))));
        assert!(PromptTemplate::new("no variables").expect("template").variables().is_empty());
    }
}
