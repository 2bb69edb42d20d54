//! The JSON form of a diagram.
//!
//! ```json
//! {
//!   "version": "v1alpha1",
//!   "diagram": {
//!     "meta": { "title": "Checkout" },
//!     "elements": [
//!       { "type": "card", "cardId": "user" },
//!       { "type": "gcp", "innerElements": [
//!         { "type": "card", "cardId": "compute_engine", "id": "web" }
//!       ]}
//!     ],
//!     "paths": [{ "src": "user", "dst": "web" }]
//!   }
//! }
//! ```
//!
//! Unlike the DSL, a JSON path gets a filled end arrow unless told
//! otherwise. Parsing stops at the first problem.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use cloudsketch_core::{
    catalog::IconCatalog,
    color::Color,
    semantic::{Arrow, Container, Dash, Diagram, Direction, Element, Meta, Path, ValidationError},
};

use crate::{
    elaborate::{CardFields, ElementBuilder, ElementError},
    error::{Diagnostic, ErrorCode, ParseError},
    span::Span,
};

const VERSION: &str = "v1alpha1";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct Document {
    version: String,
    diagram: DiagramDoc,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct DiagramDoc {
    meta: MetaDoc,
    elements: Vec<ElementDoc>,
    paths: Vec<PathDoc>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct MetaDoc {
    title: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
struct ElementDoc {
    #[serde(rename = "type")]
    kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,
    #[serde(rename = "icon_url", skip_serializing_if = "String::is_empty")]
    icon_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    card_id: String,
    #[serde(skip_serializing_if = "is_false")]
    stacked: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    inner_elements: Vec<ElementDoc>,
    #[serde(skip_serializing_if = "String::is_empty")]
    background_color: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
struct PathDoc {
    src: String,
    dst: String,
    #[serde(skip_serializing_if = "is_false")]
    hidden: bool,
    direction: String,
    src_arrow_type: String,
    dst_arrow_type: String,
    dash_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    annotation: String,
}

fn is_false(value: &bool) -> bool {
    !value
}

/// Parses the JSON form into a validated [`Diagram`].
pub fn parse_json(source: &str, catalog: &IconCatalog) -> Result<Diagram, ParseError> {
    let document: Document = serde_json::from_str(source).map_err(|err| {
        let span = error_span(source, err.line(), err.column());
        Diagnostic::error(format!("invalid JSON: {err}"))
            .with_code(ErrorCode::E400)
            .with_label(span, ErrorCode::E400.description())
    })?;

    if document.version != VERSION {
        return Err(Diagnostic::error(format!(
            "version is not available: {}",
            document.version
        ))
        .with_code(ErrorCode::E401)
        .with_help(format!("set \"version\" to \"{VERSION}\""))
        .into());
    }

    let builder = ElementBuilder::new(catalog);
    let DiagramDoc {
        meta,
        elements,
        paths,
    } = document.diagram;

    let elements = elements
        .into_iter()
        .map(|element| build_element(&builder, element, 0))
        .collect::<Result<Vec<_>, _>>()?;
    let paths = paths
        .into_iter()
        .map(build_path)
        .collect::<Result<Vec<_>, _>>()?;

    let diagram = Diagram::new(Meta::new(meta.title), elements, paths, source);
    diagram.validate().map_err(|err| {
        debug!(err:%; "Diagram failed validation");
        let code = match &err {
            ValidationError::DuplicateId(_) => ErrorCode::E200,
            ValidationError::EmptyGroup(_) => ErrorCode::E201,
            ValidationError::UnknownPathElement(_) => ErrorCode::E202,
        };
        Diagnostic::error(err.to_string()).with_code(code)
    })?;

    trace!(elements = diagram.elements().len(), paths = diagram.paths().len(); "Parsed JSON diagram");
    Ok(diagram)
}

fn build_element(
    builder: &ElementBuilder<'_>,
    doc: ElementDoc,
    depth: usize,
) -> Result<Element, Diagnostic> {
    let element_error = |err: ElementError| {
        Diagnostic::error(err.to_string()).with_code(err.code())
    };

    match doc.kind.as_str() {
        "card" => {
            let id = if doc.id.is_empty() {
                &doc.card_id
            } else {
                &doc.id
            };
            let fields = CardFields {
                name: doc.name.clone(),
                description: doc.description.clone(),
                display_name: doc.display_name.clone(),
                icon_url: doc.icon_url.clone(),
            };
            builder
                .card(id, &doc.card_id, fields, doc.stacked)
                .map(Element::from)
                .map_err(element_error)
        }
        "gcp" => {
            let children = doc
                .inner_elements
                .into_iter()
                .map(|child| build_element(builder, child, depth))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Container::new(children).into())
        }
        "group" => {
            let background_color = if doc.background_color.is_empty() {
                Color::group_default(depth)
            } else {
                Color::from_hex(&doc.background_color).map_err(|_| {
                    Diagnostic::error(format!(
                        "invalid backgroundColor: {:?}",
                        doc.background_color
                    ))
                    .with_code(ErrorCode::E303)
                })?
            };
            let children = doc
                .inner_elements
                .into_iter()
                .map(|child| build_element(builder, child, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            let name = if doc.name.is_empty() {
                &doc.id
            } else {
                &doc.name
            };
            builder
                .group(&doc.id, name, &doc.icon_url, background_color, children)
                .map(Element::from)
                .map_err(element_error)
        }
        other => Err(
            Diagnostic::error(format!("invalid element type: {other:?}"))
                .with_code(ErrorCode::E402)
                .with_help("use \"card\", \"group\" or \"gcp\""),
        ),
    }
}

fn build_path(doc: PathDoc) -> Result<Path, Diagnostic> {
    fn attribute<T: std::str::FromStr>(
        value: &str,
        default: T,
        field: &str,
    ) -> Result<T, Diagnostic> {
        if value.is_empty() {
            return Ok(default);
        }
        value.parse().map_err(|_| {
            Diagnostic::error(format!("invalid {field}: {value:?}")).with_code(ErrorCode::E403)
        })
    }

    let direction = attribute(&doc.direction, Direction::Right, "path direction")?;
    let start_arrow = attribute(&doc.src_arrow_type, Arrow::None, "srcArrowType")?;
    let end_arrow = attribute(&doc.dst_arrow_type, Arrow::Fill, "dstArrowType")?;
    let dash = attribute(&doc.dash_type, Dash::Solid, "dashType")?;

    Ok(Path::new(doc.src, doc.dst)
        .with_arrows(start_arrow, end_arrow)
        .with_dash(dash)
        .with_direction(direction)
        .with_hidden(doc.hidden)
        .with_annotation(doc.annotation))
}

/// Byte span of the character serde_json stopped at.
fn error_span(source: &str, line: usize, column: usize) -> Span {
    if line == 0 {
        return Span::new(0..0);
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let offset = (line_start + column.saturating_sub(1)).min(source.len());
    Span::new(offset..(offset + 1).min(source.len()))
}

/// Serializes a diagram into the JSON form.
///
/// Every path attribute is written out. Card icons are only written when
/// they are custom Drive icons; catalog icons are looked up again on load.
pub fn to_json(diagram: &Diagram) -> serde_json::Result<String> {
    let document = Document {
        version: VERSION.to_string(),
        diagram: DiagramDoc {
            meta: MetaDoc {
                title: diagram.meta().title().to_string(),
            },
            elements: diagram.elements().iter().map(element_doc).collect(),
            paths: diagram.paths().iter().map(path_doc).collect(),
        },
    };
    serde_json::to_string_pretty(&document)
}

fn element_doc(element: &Element) -> ElementDoc {
    match element {
        Element::Card(card) => ElementDoc {
            kind: "card".to_string(),
            id: card.id().to_string(),
            name: card.name().to_string(),
            icon_url: if card.icon_url().starts_with("https://drive.google.com/") {
                card.icon_url().to_string()
            } else {
                String::new()
            },
            description: card.description().to_string(),
            display_name: card.display_name().to_string(),
            card_id: card.card_type().to_string(),
            stacked: card.is_stacked(),
            ..ElementDoc::default()
        },
        Element::Group(group) => ElementDoc {
            kind: "group".to_string(),
            id: group.id().to_string(),
            name: group.name().to_string(),
            icon_url: group.icon_url().unwrap_or_default().to_string(),
            background_color: group.background_color().to_hex(),
            inner_elements: group.children().iter().map(element_doc).collect(),
            ..ElementDoc::default()
        },
        Element::Container(container) => ElementDoc {
            kind: "gcp".to_string(),
            inner_elements: container.children().iter().map(element_doc).collect(),
            ..ElementDoc::default()
        },
    }
}

fn path_doc(path: &Path) -> PathDoc {
    PathDoc {
        src: path.start().to_string(),
        dst: path.end().to_string(),
        hidden: path.is_hidden(),
        direction: path.direction().to_string(),
        src_arrow_type: path.start_arrow().to_string(),
        dst_arrow_type: path.end_arrow().to_string(),
        dash_type: path.dash().to_string(),
        annotation: path.annotation().unwrap_or_default().to_string(),
    }
}
