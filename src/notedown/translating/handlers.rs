//! Handler registry
//!
//! Every call resolves to exactly one handler kind through an immutable
//! name table built once at startup. The set of kinds is closed: the known
//! directives each get a variant, and every unknown name falls through to
//! the generic environment handler, which passes the name through the alias
//! table, lower-cases it, and brackets its body with `\begin`/`\end`. This
//! keeps dispatch a plain enum match while the name table stays the single
//! point of extension.

use crate::notedown::config::DocumentConfig;
use crate::notedown::diagnostics::Warning;
use crate::notedown::token::{CallNode, Value};
use crate::notedown::translating::context::ParseContext;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// The closed set of handler kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Document preamble and title block from the header fields.
    Header,
    /// Numbered problem heading; draws from the per-run counter.
    Problem,
    /// A LaTeX command taking brace groups, e.g. `\textbf{...}`.
    Command(&'static str),
    /// A math environment; its body is math without `$` toggling.
    MathEnv(&'static str),
    /// Fallback: a generic `\begin`/`\end` environment.
    Environment,
}

static REGISTRY: Lazy<HashMap<&'static str, HandlerKind>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert("Header", HandlerKind::Header);
    table.insert("Problem", HandlerKind::Problem);
    table.insert("Image", HandlerKind::Command("includegraphics"));
    table.insert("Bold", HandlerKind::Command("textbf"));
    table.insert("Italic", HandlerKind::Command("textit"));
    table.insert("Underline", HandlerKind::Command("underline"));
    table.insert("Frac", HandlerKind::Command("frac"));
    table.insert("Section", HandlerKind::Command("section"));
    table.insert("Equation", HandlerKind::MathEnv("equation"));
    table.insert("Align", HandlerKind::MathEnv("align*"));
    table
});

/// Substitutions applied before lower-casing an unknown name.
static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert("Box", "mdframed");
    table
});

static CALL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").expect("call name pattern"));

/// Mutable state scoped to one translation run, threaded through handler
/// `begin()` calls. A fresh run always starts from a fresh `RunState`.
pub struct RunState<'a> {
    pub config: &'a DocumentConfig,
    problem_number: usize,
}

impl<'a> RunState<'a> {
    pub fn new(config: &'a DocumentConfig) -> Self {
        RunState {
            config,
            problem_number: 0,
        }
    }

    /// The next problem number: 1, 2, 3, ... in call order.
    fn next_problem(&mut self) -> usize {
        self.problem_number += 1;
        self.problem_number
    }
}

/// A handler bound to one resolved call.
#[derive(Debug, Clone)]
pub struct FnMapping {
    kind: HandlerKind,
    node: CallNode,
}

impl FnMapping {
    /// Resolve a call to its handler. Unknown names fall back to the
    /// generic environment; badly styled names produce a warning, never an
    /// error.
    pub fn resolve(node: CallNode, warnings: &mut Vec<Warning>) -> FnMapping {
        if !CALL_NAME.is_match(&node.name) {
            warnings.push(Warning::new(
                node.line,
                format!("call name `{}` should be capitalized", node.name),
            ));
        }
        let kind = REGISTRY
            .get(node.name.as_str())
            .copied()
            .unwrap_or(HandlerKind::Environment);
        FnMapping { kind, node }
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn line(&self) -> usize {
        self.node.line
    }

    /// Whether this handler expects a braced block body after the call.
    pub fn expects_block(&self) -> bool {
        !matches!(self.kind, HandlerKind::Command(_))
    }

    /// The context pushed for this handler's body. `InheritParent` means
    /// the translator re-pushes whatever context the call site is in.
    pub fn body_context(&self) -> ParseContext {
        match self.kind {
            HandlerKind::Header => ParseContext::Normal,
            HandlerKind::Problem | HandlerKind::Environment => ParseContext::InheritParent,
            HandlerKind::Command(_) => ParseContext::FnArg,
            HandlerKind::MathEnv(_) => ParseContext::Math,
        }
    }

    /// The text emitted when the call is reached. May mutate the run state;
    /// the problem counter increments exactly once per invocation here.
    pub fn begin(&self, run: &mut RunState) -> String {
        match self.kind {
            HandlerKind::Header => self.begin_header(run.config),
            HandlerKind::Problem => {
                let number = run.next_problem();
                match self.node.args.first() {
                    Some(label) => {
                        format!("\\section*{{Problem {}: {}}}\n", number, render_value(label))
                    }
                    None => format!("\\section*{{Problem {}}}\n", number),
                }
            }
            HandlerKind::Command(command) => {
                if self.node.args.is_empty() {
                    // No arguments: the closure body becomes the brace group.
                    format!("\\{}{{", command)
                } else {
                    let groups: String = self
                        .node
                        .args
                        .iter()
                        .map(|value| format!("{{{}}}", render_value(value)))
                        .collect();
                    format!("\\{}{}", command, groups)
                }
            }
            HandlerKind::MathEnv(environment) => format!("\\begin{{{}}}\n", environment),
            HandlerKind::Environment => {
                let name = self.environment_name();
                if self.node.args.is_empty() {
                    format!("\\begin{{{}}}\n", name)
                } else {
                    let options: Vec<String> =
                        self.node.args.iter().map(render_value).collect();
                    format!("\\begin{{{}}}[{}]\n", name, options.join(", "))
                }
            }
        }
    }

    /// The text emitted when the matching closure closes. Never invoked for
    /// calls without a closure body.
    pub fn end(&self) -> String {
        match self.kind {
            HandlerKind::Header => "\\end{document}\n".to_string(),
            HandlerKind::Problem => String::new(),
            HandlerKind::Command(_) => {
                if self.node.args.is_empty() {
                    "}".to_string()
                } else {
                    String::new()
                }
            }
            HandlerKind::MathEnv(environment) => format!("\\end{{{}}}\n", environment),
            HandlerKind::Environment => format!("\\end{{{}}}\n", self.environment_name()),
        }
    }

    fn environment_name(&self) -> String {
        match ALIASES.get(self.node.name.as_str()) {
            Some(alias) => alias.to_string(),
            None => self.node.name.to_lowercase(),
        }
    }

    fn begin_header(&self, config: &DocumentConfig) -> String {
        // Keyword arguments override individual header fields.
        let field = |key: &str, fallback: &str| -> String {
            self.node
                .kwarg(key)
                .and_then(Value::as_key)
                .unwrap_or(fallback)
                .to_string()
        };
        let title = field("title", &config.title);
        let name = field("name", &config.name);
        let id = field("id", &config.id);
        let course = field("course", &config.course);
        let semester = field("semester", &config.semester);
        let instructor = field("instructor", &config.instructor);

        let mut out = String::new();
        out.push_str("\\documentclass{article}\n");
        out.push_str("\\usepackage{amsmath}\n");
        out.push_str("\\usepackage{amssymb}\n");
        out.push_str("\\usepackage{graphicx}\n");
        out.push_str("\\usepackage{mdframed}\n");
        out.push_str(&format!("\\title{{{}}}\n", title));
        let details: Vec<&str> = [&name, &id, &course, &instructor]
            .into_iter()
            .map(String::as_str)
            .filter(|part| !part.is_empty())
            .collect();
        out.push_str(&format!("\\author{{{}}}\n", details.join(" \\\\ ")));
        out.push_str(&format!("\\date{{{}}}\n", semester));
        out.push_str("\\begin{document}\n");
        out.push_str("\\maketitle\n");
        out
    }
}

/// Render an argument value into LaTeX text (argument context, no
/// substitutions). Lists and objects flatten into the comma forms LaTeX
/// option lists use; nested calls render as their command form.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Word(text) | Value::QuotedString(text) => text.clone(),
        Value::List(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(entries) => {
            let mut pairs: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("{}={}", key, render_value(value)))
                .collect();
            pairs.sort();
            pairs.join(", ")
        }
        Value::Call(node) => {
            let command = match REGISTRY.get(node.name.as_str()) {
                Some(HandlerKind::Command(command)) => command.to_string(),
                _ => match ALIASES.get(node.name.as_str()) {
                    Some(alias) => alias.to_string(),
                    None => node.name.to_lowercase(),
                },
            };
            let groups: String = node
                .args
                .iter()
                .map(|value| format!("{{{}}}", render_value(value)))
                .collect();
            format!("\\{}{}", command, groups)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(node: CallNode) -> (FnMapping, Vec<Warning>) {
        let mut warnings = Vec::new();
        let mapping = FnMapping::resolve(node, &mut warnings);
        (mapping, warnings)
    }

    #[test]
    fn test_unknown_name_becomes_lowercase_environment() {
        let (mapping, warnings) = resolve(CallNode::new("Remark", 1));
        let config = DocumentConfig::default();
        let mut run = RunState::new(&config);
        assert_eq!(mapping.begin(&mut run), "\\begin{remark}\n");
        assert_eq!(mapping.end(), "\\end{remark}\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_box_alias_maps_to_mdframed() {
        let (mapping, _) = resolve(CallNode::new("Box", 1));
        let config = DocumentConfig::default();
        let mut run = RunState::new(&config);
        assert_eq!(mapping.begin(&mut run), "\\begin{mdframed}\n");
        assert_eq!(mapping.end(), "\\end{mdframed}\n");
    }

    #[test]
    fn test_lowercase_name_warns_but_translates() {
        let (mapping, warnings) = resolve(CallNode::new("box", 2));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, 2);
        assert!(warnings[0].message.contains("should be capitalized"));
        // Still resolves; `box` is not the alias key, so it stays as-is.
        assert_eq!(mapping.end(), "\\end{box}\n");
    }

    #[test]
    fn test_problem_counter_increments_per_invocation() {
        let config = DocumentConfig::default();
        let mut run = RunState::new(&config);
        let (first, _) = resolve(CallNode::new("Problem", 1));
        let (second, _) = resolve(CallNode::new("Problem", 5));
        assert_eq!(first.begin(&mut run), "\\section*{Problem 1}\n");
        assert_eq!(second.begin(&mut run), "\\section*{Problem 2}\n");

        let mut fresh = RunState::new(&config);
        assert_eq!(first.begin(&mut fresh), "\\section*{Problem 1}\n");
    }

    #[test]
    fn test_command_with_args_is_inline() {
        let mut node = CallNode::new("Frac", 1);
        node.args.push(Value::Word("1".to_string()));
        node.args.push(Value::Word("2".to_string()));
        let (mapping, _) = resolve(node);
        let config = DocumentConfig::default();
        let mut run = RunState::new(&config);
        assert_eq!(mapping.begin(&mut run), "\\frac{1}{2}");
        assert_eq!(mapping.end(), "");
        assert!(!mapping.expects_block());
    }

    #[test]
    fn test_command_without_args_brackets_its_body() {
        let (mapping, _) = resolve(CallNode::new("Bold", 1));
        let config = DocumentConfig::default();
        let mut run = RunState::new(&config);
        assert_eq!(mapping.begin(&mut run), "\\textbf{");
        assert_eq!(mapping.end(), "}");
        assert_eq!(mapping.body_context(), ParseContext::FnArg);
    }

    #[test]
    fn test_math_environment_body_context() {
        let (mapping, _) = resolve(CallNode::new("Equation", 1));
        assert_eq!(mapping.body_context(), ParseContext::Math);
        let config = DocumentConfig::default();
        let mut run = RunState::new(&config);
        assert_eq!(mapping.begin(&mut run), "\\begin{equation}\n");
        assert_eq!(mapping.end(), "\\end{equation}\n");
    }

    #[test]
    fn test_header_kwargs_override_config() {
        let config = DocumentConfig {
            title: "From Config".to_string(),
            name: "Ada".to_string(),
            ..DocumentConfig::default()
        };
        let mut node = CallNode::new("Header", 1);
        node.kwargs.insert(
            "title".to_string(),
            Value::QuotedString("From Kwarg".to_string()),
        );
        let (mapping, _) = resolve(node);
        let mut run = RunState::new(&config);
        let begin = mapping.begin(&mut run);
        assert!(begin.contains("\\title{From Kwarg}"));
        assert!(begin.contains("\\author{Ada}"));
        assert!(begin.ends_with("\\maketitle\n"));
        assert_eq!(mapping.end(), "\\end{document}\n");
    }

    #[test]
    fn test_environment_options_from_positional_args() {
        let mut node = CallNode::new("Box", 1);
        node.args.push(Value::Word("nobreak".to_string()));
        let (mapping, _) = resolve(node);
        let config = DocumentConfig::default();
        let mut run = RunState::new(&config);
        assert_eq!(mapping.begin(&mut run), "\\begin{mdframed}[nobreak]\n");
    }

    #[test]
    fn test_render_value_shapes() {
        assert_eq!(render_value(&Value::Word("x".to_string())), "x");
        assert_eq!(
            render_value(&Value::List(vec![
                Value::Word("a".to_string()),
                Value::Word("b".to_string()),
            ])),
            "a, b"
        );
        let mut entries = HashMap::new();
        entries.insert("k".to_string(), Value::Word("v".to_string()));
        entries.insert("a".to_string(), Value::Word("b".to_string()));
        assert_eq!(render_value(&Value::Object(entries)), "a=b, k=v");

        let mut call = CallNode::new("Frac", 1);
        call.args.push(Value::Word("x".to_string()));
        call.args.push(Value::Word("y".to_string()));
        assert_eq!(render_value(&Value::Call(call)), "\\frac{x}{y}");
    }
}
