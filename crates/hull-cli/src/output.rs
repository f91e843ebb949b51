//! Output helpers shared by all commands.
//!
//! In JSON mode stdout carries only the result document; status lines are
//! dropped and warnings go to stderr.

use colored::Colorize;
use serde::Serialize;

use crate::OutputFormat;

/// Print a command result.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{}: failed to serialize result: {}", "Error".red().bold(), e),
        },
        OutputFormat::Text => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a progress line.
pub fn info(message: &str, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    if let OutputFormat::Text = format {
        println!("{} {}", "→".blue(), message);
    }
}

/// Print a completion line.
pub fn success(message: &str, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    if let OutputFormat::Text = format {
        println!("{} {}", "✓".green().bold(), message);
    }
}

/// Print a warning.
pub fn warning(message: &str, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => println!("{} {}", "!".yellow().bold(), message),
        OutputFormat::Json => eprintln!("warning: {}", message),
    }
}
