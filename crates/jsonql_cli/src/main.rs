use jsonql_core::FlattenOptions;
use serde_json::Value;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "Usage: jsonql <COMMAND> [OPTIONS] [ARGS]";

fn print_help() {
    println!(
        "jsonql {VERSION} - JSON document introspection

{USAGE}

Commands:
  paths [OPTIONS] [FILE]         Flatten a document into path assignment lines
  keys [OPTIONS] <VALUE> [FILE]  List keys whose values match <VALUE>

Options (paths):
  -b, --base <NAME>  Base identifier for emitted paths (default: payload)
  -k, --key <KEY>    Restrict output to KEY (repeatable)
  -e, --exact        Filter by owning top-level key instead of path text

Options (keys):
  -e, --exact        Compare decoded values instead of serialized text

Global options:
  -h, --help     Show this help message
  -V, --version  Show version

Reads JSON from FILE, or from stdin when FILE is omitted."
    );
}

fn print_version() {
    println!("jsonql {VERSION}");
}

enum ParsedArgs {
    Help,
    Version,
    Paths {
        base: String,
        keys: Vec<String>,
        exact: bool,
        file: Option<String>,
    },
    Keys {
        value: String,
        exact: bool,
        file: Option<String>,
    },
}

fn usage_error(message: &str) -> String {
    format!("{message}\n\n{USAGE}\n\nFor more information, try '--help'")
}

fn parse_args() -> Result<ParsedArgs, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut iter = args.iter();

    let Some(command) = iter.next() else {
        return Err(usage_error("missing required argument: <COMMAND>"));
    };

    match command.as_str() {
        "-h" | "--help" => Ok(ParsedArgs::Help),
        "-V" | "--version" => Ok(ParsedArgs::Version),
        "paths" => {
            let mut base = String::from("payload");
            let mut keys = Vec::new();
            let mut exact = false;
            let mut positional = Vec::new();

            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "-h" | "--help" => return Ok(ParsedArgs::Help),
                    "-b" | "--base" => match iter.next() {
                        Some(name) => base = name.clone(),
                        None => return Err(usage_error("missing value for --base")),
                    },
                    "-k" | "--key" => match iter.next() {
                        Some(key) => keys.push(key.clone()),
                        None => return Err(usage_error("missing value for --key")),
                    },
                    "-e" | "--exact" => exact = true,
                    s if s.starts_with('-') => {
                        return Err(usage_error(&format!("unknown option: {s}")));
                    }
                    _ => positional.push(arg.clone()),
                }
            }

            match positional.len() {
                0 | 1 => Ok(ParsedArgs::Paths {
                    base,
                    keys,
                    exact,
                    file: positional.into_iter().next(),
                }),
                _ => Err(usage_error("too many arguments")),
            }
        }
        "keys" => {
            let mut exact = false;
            let mut positional = Vec::new();

            for arg in iter {
                match arg.as_str() {
                    "-h" | "--help" => return Ok(ParsedArgs::Help),
                    "-e" | "--exact" => exact = true,
                    s if s.starts_with('-') => {
                        return Err(usage_error(&format!("unknown option: {s}")));
                    }
                    _ => positional.push(arg.clone()),
                }
            }

            let mut positional = positional.into_iter();
            match (positional.next(), positional.next(), positional.next()) {
                (Some(value), file, None) => Ok(ParsedArgs::Keys { value, exact, file }),
                (None, ..) => Err(usage_error("missing required argument: <VALUE>")),
                _ => Err(usage_error("too many arguments")),
            }
        }
        other => Err(usage_error(&format!("unknown command: {other}"))),
    }
}

fn read_input(file: Option<&str>) -> Result<String, String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("error reading file '{path}': {e}"))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("error reading stdin: {e}"))?;
            Ok(buffer)
        }
    }
}

fn load_document(file: Option<&str>) -> Result<Value, String> {
    let input = read_input(file)?;
    serde_json::from_str(&input).map_err(|e| format!("error parsing JSON: {e}"))
}

fn run() -> Result<(), String> {
    match parse_args()? {
        ParsedArgs::Help => {
            print_help();
            Ok(())
        }
        ParsedArgs::Version => {
            print_version();
            Ok(())
        }
        ParsedArgs::Paths {
            base,
            keys,
            exact,
            file,
        } => {
            let document = load_document(file.as_deref())?;
            let options = FlattenOptions {
                selected_keys: if keys.is_empty() { None } else { Some(keys) },
                exact_key_ownership: exact,
            };
            let output = jsonql_core::flatten_with(&document, &base, &options)
                .map_err(|e| e.to_string())?;
            if !output.is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        ParsedArgs::Keys { value, exact, file } => {
            let document = load_document(file.as_deref())?;
            let keys = if exact {
                jsonql_core::keys_for_value_exact(&document, &value)
            } else {
                jsonql_core::keys_for_value(&document, &value).map_err(|e| e.to_string())?
            };
            for key in keys {
                println!("{key}");
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("jsonql: {e}");
            ExitCode::FAILURE
        }
    }
}
