use chainlet_lib::agent::{Action, Step, StepStatus};
use crate::{config::Settings, style::{LineStyle, Styles}};

/// Terminal output.
pub struct Term {
    styles: Styles,
    dumb: bool,
}

impl Term {
    /// New instance, plain output when `TERM` is `dumb`.
    pub fn new(settings: &Settings) -> Self {
        let dumb = Ok("dumb") == std::env::var("TERM").as_deref();
        Term {
            styles: Styles::new(settings),
            dumb,
        }
    }

    fn line(&self, label: &str, style: &LineStyle, text: &str) -> String {
        if self.dumb {
            format!("{label}> {text}")
        } else {
            format!("{} {} {:#}{} {:#}{}{}{:#}",
                style.badge,
                label,
                style.badge,
                style.arrow,
                style.arrow,
                style.text,
                text,
                style.text
            )
        }
    }

    /// Format one agent step.
    pub fn format_step(&self, n: usize, step: &Step) -> Vec<String> {
        let mut lines = vec![];

        if !step.thought.is_empty() {
            lines.push(self.line(&format!("{n} THOUGHT"), &self.styles.thought, &step.thought));
        }

        match &step.action {
            Some(Action::Tool { name, input }) => {
                lines.push(self.line(&format!("{n} ACTION"), &self.styles.tool, &format!("{name}({input})")));
            },
            Some(Action::Finish(_)) => {},
            None => {
                lines.push(self.line(&format!("{n} OUTPUT"), &self.styles.thought, &step.log));
            },
        }

        if step.status != StepStatus::Final {
            let label = format!("{n} {}", step.status.to_string().to_uppercase());
            let observation = if self.dumb || step.status == StepStatus::Completed {
                step.observation.clone()
            } else {
                format!("{}{}{:#}", self.styles.error, step.observation, self.styles.error)
            };
            lines.push(self.line(&label, &self.styles.tool, &observation));
        }

        lines
    }

    /// Print one agent step.
    pub fn print_step(&self, n: usize, step: &Step) {
        for line in self.format_step(n, step) {
            println!("{line}");
        }
    }

    /// Print a final answer or model reply.
    pub fn print_answer(&self, answer: &str) {
        println!("{}", self.line("ANSWER", &self.styles.answer, answer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dumb_term() -> Term {
        let settings = Settings { thought_color: (None, None), tool_color: (None, None), answer_color: (None, None) };
        Term { styles: Styles::new(&settings), dumb: true }
    }

    #[test]
    fn test_format_steps() {
        let term = dumb_term();

        let step = Step {
            thought: "Look it up.".into(),
            action: Some(Action::Tool { name: "search".into(), input: "dhadak 2".into() }),
            observation: "1 August 2025".into(),
            status: StepStatus::Completed,
            log: String::new(),
        };
        assert_eq!(term.format_step(1, &step), vec![
            "1 THOUGHT> Look it up.",
            "1 ACTION> search(dhadak 2)",
            "1 COMPLETED> 1 August 2025",
        ]);

        let step = Step {
            thought: String::new(),
            action: None,
            observation: "Invalid format: Missing 'Action:' after 'Thought:'".into(),
            status: StepStatus::Malformed,
            log: "hmm".into(),
        };
        assert_eq!(term.format_step(2, &step), vec![
            "2 OUTPUT> hmm",
            "2 MALFORMED OUTPUT> Invalid format: Missing 'Action:' after 'Thought:'",
        ]);

        let step = Step {
            thought: "I now know the final answer".into(),
            action: Some(Action::Finish("42".into())),
            observation: String::new(),
            status: StepStatus::Final,
            log: String::new(),
        };
        assert_eq!(term.format_step(3, &step), vec!["3 THOUGHT> I now know the final answer"]);
    }
}
