use super::{join_dice, ResultSink};
use crate::roll::{DieRoll, RollSet};
use crate::value::Value;

#[derive(Debug, Clone, Default)]
struct Statement {
    expression: String,
    result: Option<String>,
    details: Vec<String>,
}

/// Markdown output for chat clients. Dropped dice are struck through and
/// critical or fumbled dice are bold.
#[derive(Debug, Clone, Default)]
pub struct MarkdownResultFormatter {
    current: Statement,
    statements: Vec<Statement>,
    hidden: bool,
}

impl MarkdownResultFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn fmt_die(die: &DieRoll) -> String {
        let mut ret = die.value().to_string();
        if die.is_critical() || die.is_fumble() {
            ret = format!("**{}**", ret);
        }
        if die.is_dropped() {
            ret = format!("~~{}~~", ret);
        }
        ret
    }

    fn fmt_statement(statement: &Statement) -> Option<String> {
        let result = statement.result.as_deref()?;
        let mut ret = format!("`{}` = **{}**\n", statement.expression, result);
        for line in &statement.details {
            ret.push_str("- ");
            ret.push_str(line);
            ret.push('\n');
        }
        Some(ret)
    }
}

impl ResultSink for MarkdownResultFormatter {
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
        self.current.details.push(format!("`{}` = `{}`", name, value));
    }

    fn add_resolve_symbol(&mut self, name: &str, value: &Value) {
        self.current.details.push(format!("`{}` is `{}`", name, value));
    }

    fn add_prompt_value(&mut self, prompt: &str, value: &Value) {
        self.current.details.push(format!("{} `{}`", prompt, value));
    }

    fn add_roll(&mut self, rolls: &RollSet) {
        let dice = join_dice(rolls, Self::fmt_die);
        self.current.details.push(format!(
            "{}{}{} ({}) = `{}`",
            rolls.number_of_rolls(),
            rolls.name(),
            rolls.sides(),
            dice,
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
            .join("\n");
        if ret.is_empty() {
            None
        } else {
            Some(ret)
        }
    }
}
