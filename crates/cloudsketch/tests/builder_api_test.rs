//! Integration tests for the DiagramBuilder API

use cloudsketch::{
    CloudsketchError, DiagramBuilder,
    catalog::{CardConfig, IconCatalog},
    config::{AppConfig, LayoutConfig, StyleConfig},
    geometry::{Point, Size},
};

const SOURCE: &str = r#"
meta {
  title "Web application"
}

elements {
  card user
  gcp {
    card lb
    group app {
      name "Application"
      stacked_card gce as web
    }
  }
}

paths {
  user --> lb
  lb --> web : "HTTP"
}
"#;

#[test]
fn test_parse_simple_diagram() {
    let builder = DiagramBuilder::default();
    let result = builder.parse("elements {\n card user\n}");

    assert!(
        result.is_ok(),
        "Should parse valid diagram: {:?}",
        result.err()
    );
}

#[test]
fn test_render_svg() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(SOURCE).expect("Failed to parse diagram");
    let svg = builder.render_svg(&diagram).expect("Failed to render");

    assert!(svg.starts_with("<svg"), "Output should contain SVG tag");
    assert!(svg.ends_with("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("<title>Web application</title>"));
    assert!(svg.contains("Google Cloud"));
    let compact: String = svg.split_whitespace().collect();
    assert!(compact.contains(">HTTP</text>"));
}

#[test]
fn test_render_leaves_diagram_unplaced() {
    let builder = DiagramBuilder::default();
    let diagram = builder.parse(SOURCE).expect("Failed to parse diagram");
    builder.render_svg(&diagram).expect("Failed to render");

    assert_eq!(diagram.size(), Size::default());
}

#[test]
fn test_layout_places_elements() {
    let builder = DiagramBuilder::default();
    let mut diagram = builder.parse(SOURCE).expect("Failed to parse diagram");
    builder.layout(&mut diagram).expect("Failed to lay out");

    assert_eq!(diagram.offset(), Point::default());
    let user = diagram.find("user").expect("user card");
    assert_eq!(user.offset().x(), 15.0);
    assert!(user.offset().y() > Point::default().y());
    assert!(diagram.size().width() > 0.0);
}

#[test]
fn test_parse_json() {
    let source = r#"{
        "version": "v1alpha1",
        "diagram": {
            "elements": [{"type": "card", "cardId": "user"}],
            "paths": []
        }
    }"#;

    let builder = DiagramBuilder::default();
    let diagram = builder.parse_json(source).expect("Failed to parse JSON");
    assert!(diagram.contains("user"));
}

#[test]
fn test_parse_invalid_syntax_returns_error() {
    let builder = DiagramBuilder::default();
    let result = builder.parse("elements {\n  card mainframe\n  group {\n}");

    match result {
        Err(CloudsketchError::Parse { err, src }) => {
            assert!(err.diagnostics().len() >= 2, "{err}");
            assert!(src.starts_with("elements {"));
        }
        other => panic!("Expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_custom_catalog() {
    let mut catalog = IconCatalog::new();
    catalog.insert(CardConfig::new("queue", "Queue", "queue.png"));
    let builder = DiagramBuilder::default().with_catalog(catalog);

    let diagram = builder
        .parse("elements {\n card queue\n}")
        .expect("Failed to parse diagram");
    let svg = builder.render_svg(&diagram).expect("Failed to render");
    assert!(svg.contains("queue.png"));

    assert!(builder.parse("elements {\n card user\n}").is_err());
}

#[test]
fn test_custom_config() {
    let config = AppConfig::new(LayoutConfig::new(5), StyleConfig::default());
    let builder = DiagramBuilder::new(config);

    let diagram = builder.parse(SOURCE).expect("Failed to parse diagram");
    assert!(builder.render_svg(&diagram).is_ok());
}

#[test]
fn test_builder_reusability() {
    let builder = DiagramBuilder::default();

    let first = builder
        .parse("elements {\n card user\n}")
        .expect("Failed to parse first diagram");
    let second = builder.parse(SOURCE).expect("Failed to parse second diagram");

    let svg1 = builder.render_svg(&first).expect("Failed to render first");
    let svg2 = builder.render_svg(&second).expect("Failed to render second");
    assert_ne!(svg1, svg2);
}
