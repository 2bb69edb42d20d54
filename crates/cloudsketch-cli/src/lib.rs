//! CLI logic for the cloudsketch diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, InputType};

use std::{fs, io};

use log::info;

use cloudsketch::{CloudsketchError, DiagramBuilder, catalog::IconCatalog};

/// Run the cloudsketch CLI application
///
/// Reads the input diagram, lays it out and writes the resulting SVG to the
/// output file.
///
/// # Errors
///
/// Returns `CloudsketchError` for:
/// - File I/O errors
/// - Configuration or catalog loading errors
/// - Parsing errors
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), CloudsketchError> {
    let input_type = args.input_type();
    info!(
        input_path = args.input,
        output_path = args.output,
        input_type:?;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let catalog = load_catalog(args.catalog.as_deref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = DiagramBuilder::new(app_config).with_catalog(catalog);
    let diagram = match input_type {
        InputType::Dsl => builder.parse(&source)?,
        InputType::Json => builder.parse_json(&source)?,
    };
    let svg = builder.render_svg(&diagram)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

/// The built-in catalog, overlaid with the cards of `path` when given.
fn load_catalog(path: Option<&str>) -> Result<IconCatalog, CloudsketchError> {
    let mut catalog = IconCatalog::builtin();
    if let Some(path) = path {
        let json = fs::read_to_string(path)?;
        catalog
            .extend_from_json(&json)
            .map_err(|err| io::Error::other(format!("Invalid card catalog {path}: {err}")))?;
        info!(path, cards = catalog.len(); "Loaded card catalog");
    }
    Ok(catalog)
}
