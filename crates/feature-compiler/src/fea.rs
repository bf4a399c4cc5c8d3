//! Rendering a rule program as OpenType feature file syntax.

use crate::program::{FeatureBlock, LANGUAGE_SYSTEMS, Rule, RuleProgram, Statement};

impl RuleProgram {
    /// Render the program as feature file source.
    ///
    /// Both ligature features get an identical body; subtable breaks become
    /// `subtable;` statements.
    pub fn to_fea(&self) -> String {
        let mut out = String::from("\n");
        for (script, language) in LANGUAGE_SYSTEMS {
            out.push_str(&format!("languagesystem {script} {language};\n"));
        }

        for block in self.feature_blocks() {
            out.push('\n');
            out.push_str(&render_block(&block));
        }
        out
    }
}

fn render_block(block: &FeatureBlock) -> String {
    let body: Vec<String> = block.statements.iter().map(render_statement).collect();
    format!("feature {tag} {{\n{}\n}} {tag};\n", body.join("\n"), tag = block.tag)
}

fn render_statement(statement: &Statement) -> String {
    match statement {
        Statement::Rule(rule) => render_rule(rule),
        Statement::SubtableBreak => "  subtable;".to_string(),
    }
}

fn render_rule(rule: &Rule) -> String {
    format!("  sub {} by {};", rule.input.join(" "), rule.output)
}
