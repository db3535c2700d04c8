//! Operations behind the `ldpolicy` command-line tool.
//!
//! Exit status is 0 when no problems were reported, 1 when the document was
//! transformed with problems and 2 when it could not be read at all.

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::document;
use crate::model::Policy;
use crate::transform::{Problem, TransformerRegistry};

pub const EXIT_PROBLEMS: i32 = 1;
pub const EXIT_FAILURE: i32 = 2;

/// Failure before any transformation ran
#[derive(Debug)]
pub enum CliError {
    Input(String),
    Setup(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Input(msg) | CliError::Setup(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {}

/// What a command produced and how it ended.
#[derive(Debug)]
pub struct Outcome {
    /// JSON to print on stdout.
    pub output: Option<Value>,
    pub problems: Vec<Problem>,
    /// Every step produced a result.
    pub complete: bool,
}

impl Outcome {
    pub fn is_clean(&self) -> bool {
        self.complete && self.problems.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            EXIT_PROBLEMS
        }
    }
}

pub fn registry() -> Result<TransformerRegistry, CliError> {
    TransformerRegistry::with_policy_transformers().map_err(|e| CliError::Setup(e.to_string()))
}

/// Read a document from `path`, or from stdin when `path` is `-`.
pub fn read_document(path: &Path, max_depth: usize) -> Result<Value, CliError> {
    let contents = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| CliError::Input(format!("Failed to read stdin: {}", e)))?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| CliError::Input(format!("Failed to read {}: {}", path.display(), e)))?
    };

    parse_document(&contents, &path.display().to_string(), max_depth)
}

/// Parse `contents`, rejecting documents nested deeper than `max_depth`.
pub fn parse_document(contents: &str, source: &str, max_depth: usize) -> Result<Value, CliError> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|e| CliError::Input(format!("Invalid JSON in {}: {}", source, e)))?;

    let depth = document::depth(&value);
    if depth > max_depth {
        return Err(CliError::Input(format!(
            "Document nesting depth {} exceeds maximum of {}",
            depth, max_depth
        )));
    }

    Ok(value)
}

/// Transform into the domain policy; the output is the policy as JSON.
pub fn transform_document(registry: &TransformerRegistry, input: &Value) -> Result<Outcome, CliError> {
    let (policy, problems) = registry.transform::<Policy>(input).into_parts();

    let output = policy
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| CliError::Setup(format!("Failed to serialize policy: {}", e)))?;

    Ok(Outcome {
        complete: output.is_some(),
        output,
        problems,
    })
}

/// Transform into the domain policy and emit it back as a document.
pub fn normalize_document(registry: &TransformerRegistry, input: &Value) -> Outcome {
    let (policy, mut problems) = registry.transform::<Policy>(input).into_parts();

    let output = policy.and_then(|policy| {
        let (output, emit_problems) = registry.transform::<Value>(&policy).into_parts();
        problems.extend(emit_problems);
        output
    });

    Outcome {
        complete: output.is_some(),
        output,
        problems,
    }
}

/// Transform only to collect problems.
pub fn check_document(registry: &TransformerRegistry, input: &Value) -> Outcome {
    let (policy, problems) = registry.transform::<Policy>(input).into_parts();

    Outcome {
        output: None,
        problems,
        complete: policy.is_some(),
    }
}
