//! arrpath - Query nested JSON documents by path
//!
//! Reads a JSON document from stdin, runs one command against it and prints
//! the result as JSON on stdout.
//!
//! # Usage
//! - `arrpath path <path> [default-json]`
//! - `arrpath extract <path>...`
//! - `arrpath flatten`

use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arrkit::{arr, Arr, Config, Value};

const USAGE: &str = "usage: arrpath <path <path> [default-json] | extract <path>... | flatten>";

/// Entry point for the arrpath command.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load configuration from environment variables
/// 3. Read the JSON document from stdin
/// 4. Run the requested command and print the result
fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arrkit=info,arrpath=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    let accessor = Arr::from_config(&config).context("invalid configuration")?;
    debug!(
        "Configuration loaded: delimiter='{}', default_lifetime={}s",
        config.delimiter, config.default_lifetime
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    let document = Value::from_json_str(&input).context("stdin is not a valid JSON document")?;

    let output = run(&accessor, command, rest, &document)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    info!("Command '{}' completed", command);

    Ok(())
}

/// Runs one command against the parsed document.
fn run(accessor: &Arr, command: &str, args: &[String], document: &Value) -> Result<Value> {
    match command {
        "path" => {
            let Some(path) = args.first() else {
                bail!("path: missing <path> argument\n{}", USAGE);
            };
            let default = match args.get(1) {
                Some(raw) => Value::from_json_str(raw)
                    .with_context(|| format!("default '{}' is not valid JSON", raw))?,
                None => Value::Null,
            };
            Ok(accessor.path(document, path, default))
        }
        "extract" => {
            let source = document
                .as_array()
                .context("extract: input must be a JSON object or array")?;
            Ok(Value::Array(accessor.extract(source, args, Value::Null)))
        }
        "flatten" => {
            let source = document
                .as_array()
                .context("flatten: input must be a JSON object or array")?;
            Ok(Value::Array(arr::flatten(source)))
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }
}
