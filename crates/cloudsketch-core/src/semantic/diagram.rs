//! The diagram aggregate and its structural validation.

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    geometry::{Point, Size},
    semantic::{Element, Path},
};

const DEFAULT_TITLE: &str = "Architecture";

/// Diagram-wide metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    title: String,
}

impl Meta {
    /// Creates metadata with the given title, falling back to the default
    /// title when `title` is empty.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        if title.is_empty() {
            Self::default()
        } else {
            Self { title }
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// A structural problem found by [`Diagram::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("id={0:?} is used in multiple elements. Please assign unique id with `as` keyword")]
    DuplicateId(String),

    #[error("group id={0:?} must include at least one element inside it")]
    EmptyGroup(String),

    #[error("path has non-existent element id={0:?}")]
    UnknownPathElement(String),
}

impl ValidationError {
    /// The element id the error is about.
    pub fn id(&self) -> &str {
        match self {
            ValidationError::DuplicateId(id)
            | ValidationError::EmptyGroup(id)
            | ValidationError::UnknownPathElement(id) => id,
        }
    }
}

/// A parsed diagram: metadata, the element forest and the paths between
/// elements.
///
/// The structure is fixed once parsed. Layout only fills in the offsets and
/// sizes of the elements and of the diagram itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    meta: Meta,
    elements: Vec<Element>,
    paths: Vec<Path>,
    source: String,
    offset: Point,
    size: Size,
}

impl Diagram {
    /// Creates a diagram. Call [`Diagram::validate`] before laying it out.
    pub fn new(
        meta: Meta,
        elements: Vec<Element>,
        paths: Vec<Path>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            meta,
            elements,
            paths,
            source: source.into(),
            offset: Point::default(),
            size: Size::default(),
        }
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Top-level elements in declaration order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// The text the diagram was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Splits the diagram so layout can move elements while reading paths.
    pub fn layout_parts_mut(&mut self) -> (&mut [Element], &[Path]) {
        (&mut self.elements, &self.paths)
    }

    /// Top-left corner of the whole diagram, header included.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Size of the whole diagram, header and footer included.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Records the diagram's position and size.
    pub fn place(&mut self, offset: Point, size: Size) {
        self.offset = offset;
        self.size = size;
    }

    /// Finds an element anywhere in the tree.
    pub fn find(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find_map(|element| element.find(id))
    }

    /// Returns true if any element in the tree has the given id.
    pub fn contains(&self, id: &str) -> bool {
        self.elements.iter().any(|element| element.contains(id))
    }

    /// Visits every element depth-first, in declaration order.
    pub fn walk<E, F>(&self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&Element) -> Result<(), E>,
    {
        for element in &self.elements {
            element.walk(f)?;
        }
        Ok(())
    }

    /// Checks the structural rules of a diagram.
    ///
    /// The checks run in a fixed order and the first violation is returned:
    /// 1. every element id is unique across the whole tree;
    /// 2. every group contains at least one card, directly or in a subgroup;
    /// 3. both ends of every path name an existing element.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        self.walk(&mut |element| {
            if seen.insert(element.id().to_string()) {
                Ok(())
            } else {
                Err(ValidationError::DuplicateId(element.id().to_string()))
            }
        })?;

        self.walk(&mut |element| match element {
            Element::Group(group) if !group.has_card() => {
                Err(ValidationError::EmptyGroup(group.id().to_string()))
            }
            _ => Ok(()),
        })?;

        for path in &self.paths {
            for id in [path.start(), path.end()] {
                if !self.contains(id) {
                    return Err(ValidationError::UnknownPathElement(id.to_string()));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::Color,
        semantic::{Card, Container, Group},
    };

    fn card(id: &str) -> Element {
        Card::new(id, "generic", "icon.png").into()
    }

    fn group(id: &str, children: Vec<Element>) -> Element {
        Group::new(id, id, Color::group_default(0), children).into()
    }

    fn diagram(elements: Vec<Element>, paths: Vec<Path>) -> Diagram {
        Diagram::new(Meta::default(), elements, paths, "")
    }

    #[test]
    fn test_meta_default_title() {
        assert_eq!(Meta::new("").title(), "Architecture");
        assert_eq!(Meta::default().title(), "Architecture");
        assert_eq!(Meta::new("Checkout").title(), "Checkout");
    }

    #[test]
    fn test_validate_valid_nested_groups() {
        let d = diagram(
            vec![
                card("a"),
                group("g", vec![group("inner", vec![card("b")])]),
            ],
            vec![Path::new("a", "b")],
        );

        assert_eq!(d.validate(), Ok(()));
    }

    #[test]
    fn test_validate_duplicate_top_level() {
        let d = diagram(vec![card("a"), card("a")], vec![]);

        assert_eq!(
            d.validate(),
            Err(ValidationError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn test_validate_duplicate_inside_group() {
        let d = diagram(vec![group("g", vec![card("a"), card("a")])], vec![]);

        assert_eq!(
            d.validate(),
            Err(ValidationError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn test_validate_duplicate_inside_container() {
        let d = diagram(
            vec![Container::new(vec![card("a"), card("a")]).into()],
            vec![],
        );

        assert_eq!(
            d.validate(),
            Err(ValidationError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn test_validate_duplicate_across_levels() {
        let d = diagram(
            vec![card("a"), group("g", vec![group("inner", vec![card("a")])])],
            vec![],
        );

        assert_eq!(
            d.validate(),
            Err(ValidationError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn test_validate_group_id_collides_with_card() {
        let d = diagram(vec![group("a", vec![card("a")])], vec![]);

        assert_eq!(
            d.validate(),
            Err(ValidationError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn test_validate_empty_group() {
        let d = diagram(vec![card("a"), group("g", vec![])], vec![]);

        assert_eq!(
            d.validate(),
            Err(ValidationError::EmptyGroup("g".to_string()))
        );
    }

    #[test]
    fn test_validate_nested_empty_group() {
        let d = diagram(vec![group("g", vec![group("inner", vec![])])], vec![]);

        // The outer group is visited first.
        assert_eq!(
            d.validate(),
            Err(ValidationError::EmptyGroup("g".to_string()))
        );
    }

    #[test]
    fn test_validate_dangling_path() {
        let d = diagram(vec![card("a")], vec![Path::new("a", "missing")]);

        let err = d.validate().unwrap_err();
        assert_eq!(err.id(), "missing");
        assert_eq!(
            err.to_string(),
            "path has non-existent element id=\"missing\""
        );
    }

    #[test]
    fn test_validate_reports_start_before_end() {
        let d = diagram(vec![card("a")], vec![Path::new("x", "y")]);

        assert_eq!(
            d.validate(),
            Err(ValidationError::UnknownPathElement("x".to_string()))
        );
    }

    #[test]
    fn test_validate_duplicates_checked_before_groups() {
        let d = diagram(vec![card("a"), card("a"), group("g", vec![])], vec![]);

        assert!(matches!(
            d.validate(),
            Err(ValidationError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::DuplicateId("web".to_string()).to_string(),
            "id=\"web\" is used in multiple elements. Please assign unique id with `as` keyword"
        );
        assert_eq!(
            ValidationError::EmptyGroup("vpc".to_string()).to_string(),
            "group id=\"vpc\" must include at least one element inside it"
        );
    }

    #[test]
    fn test_find_nested() {
        let d = diagram(
            vec![card("a"), Container::new(vec![group("g", vec![card("b")])]).into()],
            vec![],
        );

        assert_eq!(d.find("b").map(Element::id), Some("b"));
        assert!(d.contains("gcp"));
        assert!(!d.contains("c"));
    }
}
