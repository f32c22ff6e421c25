use super::ResultSink;
use crate::roll::RollSet;
use crate::value::Value;

const RULE: &str = "------------------------------------------------------";

#[derive(Debug, Clone, Default)]
struct Statement {
    expression: String,
    result: Option<String>,
    details: Vec<String>,
}

/// Plain text output: one `expression = result` line per statement with its
/// details indented below.
#[derive(Debug, Clone, Default)]
pub struct PlainResultFormatter {
    current: Statement,
    statements: Vec<Statement>,
    hidden: bool,
}

impl PlainResultFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn fmt_statement(statement: &Statement) -> Option<String> {
        let result = statement.result.as_deref().filter(|r| !r.is_empty())?;
        let mut ret = format!("{} = {}\n", statement.expression, result);
        for line in &statement.details {
            ret.push('\t');
            ret.push_str(line);
            ret.push('\n');
        }
        Some(ret)
    }
}

impl ResultSink for PlainResultFormatter {
    fn start(&mut self) {
        self.current = Statement::default();
    }

    fn set_expression(&mut self, expression: &str) {
        self.current.expression = expression.to_owned();
    }

    fn set_result(&mut self, result: Option<&Value>) {
        self.current.result = result.and_then(|v| v.text_form()).map(Into::into);
    }

    fn add_assign_symbol(&mut self, name: &str, value: &Value) {
        self.current.details.push(format!("set {} = {}", name, value));
    }

    fn add_resolve_symbol(&mut self, name: &str, value: &Value) {
        self.current.details.push(format!("{} <- {}", value, name));
    }

    fn add_prompt_value(&mut self, prompt: &str, value: &Value) {
        self.current.details.push(format!("input ({}) = {}", prompt, value));
    }

    fn add_roll(&mut self, rolls: &RollSet) {
        self.current.details.push(format!(
            "{}{}{} = {}",
            rolls.number_of_rolls(),
            rolls.name(),
            rolls.sides(),
            rolls.result()
        ));
    }

    fn hide_output(&mut self) {
        self.hidden = true;
    }

    fn show_output(&mut self) {
        self.hidden = false;
    }

    fn is_output_hidden(&self) -> bool {
        self.hidden
    }

    fn end(&mut self) {
        let statement = std::mem::take(&mut self.current);
        if !self.hidden {
            self.statements.push(statement);
        }
    }

    fn format(&self) -> Option<String> {
        let ret = self
            .statements
            .iter()
            .filter_map(Self::fmt_statement)
            .collect::<Vec<_>>()
            .join(&format!("{}\n", RULE));
        if ret.is_empty() {
            None
        } else {
            Some(ret)
        }
    }
}
