//! Command-line interface for notedown
//! This binary compiles notedown files into LaTeX and exposes the token
//! stream for inspection.
//!
//! Usage:
//!   notedown compile `<path>` [--config `<yaml>`] [--output `<path>`] [--strict-keys]
//!   notedown tokens `<path>` [--format `<format>`]

use clap::{Arg, ArgAction, Command};
use notedown::notedown::config::DocumentConfig;
use notedown::notedown::pipeline::{self, CompileOptions};
use std::path::Path;

fn main() {
    let matches = Command::new("notedown")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A compiler for the notedown markup format")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("compile")
                .about("Compile a notedown file to LaTeX")
                .arg(
                    Arg::new("path")
                        .help("Path to the notedown file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Path to a YAML file with the document header fields"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write the LaTeX here instead of stdout"),
                )
                .arg(
                    Arg::new("strict-keys")
                        .long("strict-keys")
                        .help("Reject duplicate keyword and object keys")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Dump the semantic token stream of a notedown file")
                .arg(
                    Arg::new("path")
                        .help("Path to the notedown file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('simple' or 'json')")
                        .default_value("simple"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("compile", compile_matches)) => {
            let path = compile_matches.get_one::<String>("path").unwrap();
            let config = compile_matches.get_one::<String>("config");
            let output = compile_matches.get_one::<String>("output");
            let strict_keys = compile_matches.get_flag("strict-keys");
            handle_compile_command(path, config, output, strict_keys);
        }
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").unwrap();
            let format = tokens_matches.get_one::<String>("format").unwrap();
            handle_tokens_command(path, format);
        }
        _ => unreachable!(),
    }
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    })
}

/// Handle the compile command
fn handle_compile_command(
    path: &str,
    config_path: Option<&String>,
    output_path: Option<&String>,
    strict_keys: bool,
) {
    let source = read_source(path);

    let config = match config_path {
        Some(config_path) => {
            let text = read_source(config_path);
            DocumentConfig::from_yaml_str(&text).unwrap_or_else(|e| {
                eprintln!("Error reading config: {}", e);
                std::process::exit(1);
            })
        }
        None => DocumentConfig::default(),
    };

    let options = CompileOptions { strict_keys };
    let translation = pipeline::compile(&source, &config, &options).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    for warning in &translation.warnings {
        eprintln!("{}", warning);
    }

    match output_path {
        Some(output_path) => {
            if let Err(e) = std::fs::write(Path::new(output_path), &translation.latex) {
                eprintln!("Error writing output: {}", e);
                std::process::exit(1);
            }
        }
        None => print!("{}", translation.latex),
    }
}

/// Handle the tokens command
fn handle_tokens_command(path: &str, format: &str) {
    let source = read_source(path);

    let tokens = pipeline::tokens(&source).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    match format {
        "simple" => {
            for (token, line) in &tokens {
                println!("{}: {:?}", line, token);
            }
        }
        "json" => {
            let json = serde_json::to_string_pretty(&tokens).unwrap_or_else(|e| {
                eprintln!("Error serializing tokens: {}", e);
                std::process::exit(1);
            });
            println!("{}", json);
        }
        other => {
            eprintln!("Unknown format '{}' (expected 'simple' or 'json')", other);
            std::process::exit(1);
        }
    }
}
