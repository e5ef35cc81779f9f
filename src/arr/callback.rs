//! Callback Parser Module
//!
//! Parses callback strings such as `trim`, `Class::method` or
//! `str_replace(old,new)` into a command and its parameters. Parsing never
//! dispatches; the caller decides what a command name refers to.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static CALL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^(]*)\((.*)\)$").expect("CALL_PATTERN should compile - this is a bug")
});

// == Command ==
/// The callable part of a callback string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A plain function name
    Function(String),
    /// A `Class::method` pair
    Static { class: String, method: String },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Function(name) => f.write_str(name),
            Command::Static { class, method } => write!(f, "{}::{}", class, method),
        }
    }
}

// == Callback ==
/// A parsed callback string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    pub command: Command,
    /// Parameters inside the parentheses, `None` when there are none
    pub params: Option<Vec<String>>,
}

impl Callback {
    // == Parse ==
    /// Parses a callback string. The string is not validated.
    ///
    /// Parameters are split on commas; `\,` is kept as a literal comma.
    pub fn parse(raw: &str) -> Self {
        let (command, params) = match CALL_PATTERN.captures(raw) {
            Some(caps) => {
                let args = &caps[2];
                let params = if args.is_empty() {
                    None
                } else {
                    Some(split_params(args))
                };
                (caps[1].to_string(), params)
            }
            None => (raw.to_string(), None),
        };

        let command = match command.split_once("::") {
            Some((class, method)) => Command::Static {
                class: class.to_string(),
                method: method.to_string(),
            },
            None => Command::Function(command),
        };

        Self { command, params }
    }
}

/// Splits on commas that are not preceded by a backslash, then unescapes `\,`.
fn split_params(raw: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in raw.chars() {
        if c == ',' && !escaped {
            params.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
        escaped = c == '\\';
    }
    params.push(current);

    params
        .into_iter()
        .map(|param| param.replace("\\,", ","))
        .collect()
}

/// Parses a callback string into its command and parameters.
pub fn callback(raw: &str) -> Callback {
    Callback::parse(raw)
}
