//! C source stubs
//!
//! Each prototype becomes a documented empty function in the Betty comment
//! style; a task without prototypes gets a `main` entry point.

use super::ProjectContext;
use alx_schema::TaskSchema;
use once_cell::sync::Lazy;
use regex::Regex;

static SIGNATURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+\s+\**(\w+)\s*\([^)]*\)").expect("valid regex"));

static PARAMETER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+\s+\**(\w+)\s*(?:,|\))").expect("valid regex"));

const BODY_PLACEHOLDER: &str = "\t/* your code goes here */";

/// Function name and parameter names parsed from a prototype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrototypeDoc {
    /// Function name
    pub name: String,
    /// Parameter names, in order
    pub params: Vec<String>,
}

/// Parse `<type> <*>name(<params>)`; `None` when the signature is unrecognisable
#[must_use]
pub fn parse_prototype(prototype: &str) -> Option<PrototypeDoc> {
    let caps = SIGNATURE.captures(prototype)?;
    let params = PARAMETER
        .captures_iter(prototype)
        .map(|c| c[1].to_string())
        .collect();
    Some(PrototypeDoc {
        name: caps[1].to_string(),
        params,
    })
}

fn doc_block(prototype: &str) -> Vec<String> {
    let mut lines = vec![String::new(), "/**".to_string()];

    if let Some(doc) = parse_prototype(prototype) {
        lines.push(format!(" * {} - Short description, single line.", doc.name));
        for param in &doc.params {
            lines.push(format!(" * @{param}: Description of parameter {param}."));
        }
        lines.push(" * ".to_string());
        lines.push(" * Return: Description of the returned value.".to_string());
    } else {
        tracing::warn!("could not parse prototype {prototype:?}, using a generic comment");
        lines.push(" * function_name - Short description, single line".to_string());
        lines.push(" * @parameterx: Description of parameter x".to_string());
        lines.push(" * ".to_string());
        lines.push(" * Return: Description of the returned value".to_string());
    }

    lines.push(" */".to_string());
    lines.push(String::new());
    lines
}

fn main_stub() -> Vec<String> {
    [
        "",
        "/**",
        " * main - Entry point",
        " * ",
        " * Return: Always 0 (Success)",
        " */",
        "",
        "int main(void)",
        "{",
        BODY_PLACEHOLDER,
        "\treturn (0);",
        "}",
        "",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

pub(super) fn generate(task: &TaskSchema, context: &ProjectContext<'_>) -> Vec<String> {
    let include = match context.header {
        Some(header) => format!("#include \"{header}\""),
        None => "#include <stdio.h>".to_string(),
    };
    let mut lines = vec![include];

    if task.prototypes.is_empty() {
        lines.extend(main_stub());
        return lines;
    }

    for prototype in &task.prototypes {
        lines.extend(doc_block(prototype));
        lines.push(prototype.replace(';', ""));
        lines.push("{".to_string());
        lines.push(BODY_PLACEHOLDER.to_string());
        lines.push("}".to_string());
        lines.push(String::new());
    }
    lines
}
