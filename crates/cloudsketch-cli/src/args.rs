//! Command-line argument definitions for the cloudsketch CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the input format,
//! configuration and catalog files, and logging verbosity.

use std::path::Path;

use clap::{Parser, ValueEnum};

/// Source format of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputType {
    /// The cloudsketch text language
    Dsl,
    /// The structured JSON form
    Json,
}

impl InputType {
    /// Guess the format from a file extension, defaulting to DSL.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Dsl,
        }
    }
}

/// Command-line arguments for the cloudsketch diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Input format; guessed from the file extension when omitted
    #[arg(short = 't', long, value_enum)]
    pub input_type: Option<InputType>,

    /// JSON card list merged over the built-in icon catalog
    #[arg(long)]
    pub catalog: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The input format to use for [`Args::input`].
    pub fn input_type(&self) -> InputType {
        self.input_type
            .unwrap_or_else(|| InputType::from_path(&self.input))
    }
}
