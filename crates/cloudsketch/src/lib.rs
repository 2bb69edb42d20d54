//! Cloudsketch - Cloud architecture diagrams from a small text language.
//!
//! Parsing, block layout, path routing and SVG rendering for diagrams made
//! of cards, groups and a cloud container. Diagrams are written in the
//! cloudsketch DSL or its JSON form.

pub mod config;
pub mod layout;
pub mod render;
pub mod route;

mod error;

pub use cloudsketch_core::{catalog, color, geometry, semantic};

pub use error::CloudsketchError;

use log::{debug, info, trace};

use cloudsketch_core::{catalog::IconCatalog, geometry::Point, semantic::Diagram};

use config::AppConfig;
use layout::BlockLayout;
use render::{SvgRenderer, SvgStyle};

/// Builder for parsing and rendering cloudsketch diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use cloudsketch::{DiagramBuilder, config::AppConfig};
///
/// let source = r#"
///     elements {
///         card user
///         gcp {
///             card gce as backend
///         }
///     }
///     paths {
///         user --> backend
///     }
/// "#;
///
/// let builder = DiagramBuilder::new(AppConfig::default());
/// let diagram = builder.parse(source).expect("Failed to parse");
/// let svg = builder.render_svg(&diagram).expect("Failed to render");
/// assert!(svg.starts_with("<svg"));
/// ```
pub struct DiagramBuilder {
    config: AppConfig,
    catalog: IconCatalog,
}

impl DiagramBuilder {
    /// Create a builder that resolves card types with the built-in catalog.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            catalog: IconCatalog::builtin(),
        }
    }

    /// Replace the icon catalog used to resolve card types.
    pub fn with_catalog(mut self, catalog: IconCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Parse DSL source into a validated diagram.
    ///
    /// # Errors
    ///
    /// Returns `CloudsketchError::Parse` carrying every diagnostic found.
    pub fn parse(&self, source: &str) -> Result<Diagram, CloudsketchError> {
        info!(bytes = source.len(); "Parsing diagram");

        let diagram = cloudsketch_parser::parse_dsl(source, &self.catalog)
            .map_err(|err| CloudsketchError::new_parse_error(err, source))?;

        debug!(
            elements = diagram.elements().len(),
            paths = diagram.paths().len();
            "Diagram parsed successfully"
        );
        trace!(diagram:?; "Parsed diagram");

        Ok(diagram)
    }

    /// Parse the JSON form into a validated diagram.
    ///
    /// # Errors
    ///
    /// Returns `CloudsketchError::Parse` with the first failure.
    pub fn parse_json(&self, source: &str) -> Result<Diagram, CloudsketchError> {
        info!(bytes = source.len(); "Parsing JSON diagram");

        let diagram = cloudsketch_parser::parse_json(source, &self.catalog)
            .map_err(|err| CloudsketchError::new_parse_error(err, source))?;

        debug!(
            elements = diagram.elements().len(),
            paths = diagram.paths().len();
            "Diagram parsed successfully"
        );
        trace!(diagram:?; "Parsed diagram");

        Ok(diagram)
    }

    /// Lay out `diagram` in place with its top-left corner at the origin.
    ///
    /// # Errors
    ///
    /// Returns `CloudsketchError::Layout` when the layout hints cannot be
    /// satisfied.
    pub fn layout(&self, diagram: &mut Diagram) -> Result<(), CloudsketchError> {
        BlockLayout::new(self.config.layout()).layout(diagram, Point::default())?;
        Ok(())
    }

    /// Lay out and render a diagram to an SVG string.
    ///
    /// `diagram` itself is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `CloudsketchError` for layout, style or rendering errors.
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, CloudsketchError> {
        let mut diagram = diagram.clone();
        self.layout(&mut diagram)?;

        let style = SvgStyle::from_config(self.config.style())?;
        let mut renderer = SvgRenderer::new(style, &diagram);
        render::render(&diagram, &mut renderer)?;
        let svg = renderer.into_svg()?;

        info!(bytes = svg.len(); "SVG rendered successfully");
        Ok(svg)
    }
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
