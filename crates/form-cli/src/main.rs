use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use form_spec::{
    FormSchema, SchemaInput, ValueMap, normalize, resolve_visibility, seed_values, validate,
    value_schema,
};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("json encode error: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form schema toolbox",
    long_about = "Normalizes saved form schemas and evaluates visibility and validation against live form data."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a saved (builder) schema into its canonical runtime form.
    Normalize {
        /// Path to the saved or canonical schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        input: PathBuf,
        /// Write the canonical schema here instead of stdout.
        #[arg(long, value_name = "OUT")]
        output: Option<PathBuf>,
        /// Emit compact JSON instead of pretty-printed.
        #[arg(long)]
        compact: bool,
    },
    /// Check form data against a schema and report problems.
    Validate {
        /// Path to the schema JSON (saved or canonical).
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Path to the form data JSON object.
        #[arg(long, value_name = "VALUES")]
        values: PathBuf,
    },
    /// Print the visible/hidden verdict for every field.
    Visibility {
        /// Path to the schema JSON (saved or canonical).
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Path to the form data JSON object.
        #[arg(long, value_name = "VALUES")]
        values: PathBuf,
    },
    /// Emit a JSON Schema for the data of the currently visible fields.
    Schema {
        /// Path to the schema JSON (saved or canonical).
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Optional form data used to resolve visibility (defaults to empty).
        #[arg(long, value_name = "VALUES")]
        values: Option<PathBuf>,
    },
    /// Print the value map a fresh session starts with.
    Prefill {
        /// Path to the schema JSON (saved or canonical).
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> Result<ExitCode, CliError> {
    match command {
        Command::Normalize {
            input,
            output,
            compact,
        } => {
            let schema = load_schema(&input)?;
            let rendered = encode(&schema, compact)?;
            match output {
                Some(path) => fs::write(&path, rendered + "\n").map_err(|source| {
                    CliError::Write {
                        path: path.clone(),
                        source,
                    }
                })?,
                None => println!("{}", rendered),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { schema, values } => {
            let schema = load_schema(&schema)?;
            let values = load_values(&values)?;
            let result = validate(&schema, &values);
            println!("{}", encode(&result, false)?);
            Ok(if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Visibility { schema, values } => {
            let schema = load_schema(&schema)?;
            let values = load_values(&values)?;
            let map = resolve_visibility(&schema, &values);
            println!("{}", encode(&map, false)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Schema { schema, values } => {
            let schema = load_schema(&schema)?;
            let values = match values {
                Some(path) => load_values(&path)?,
                None => ValueMap::new(),
            };
            let visibility = resolve_visibility(&schema, &values);
            println!("{}", encode(&value_schema(&schema, &visibility), false)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Prefill { schema } => {
            let schema = load_schema(&schema)?;
            println!("{}", encode(&seed_values(&schema), false)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_schema(path: &Path) -> Result<FormSchema, CliError> {
    let input: SchemaInput = read_json(path)?;
    Ok(normalize(input))
}

fn load_values(path: &Path) -> Result<ValueMap, CliError> {
    read_json(path)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn encode<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, CliError> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(CliError::Encode)
}
