//! Block layout engine.
//!
//! Layout runs level by level down the element tree. The siblings of a level
//! are first arranged into [`Blocks`], then placed in two passes:
//!
//! 1. a measuring pass that stacks each block from the top of the level and
//!    yields the level height;
//! 2. a placing pass that centres every block vertically in that height.
//!
//! Groups and the container lay their own children out the same way, inside
//! their padding, every time they are placed. The result is written into the
//! offset and size slot of every element and of the diagram.

mod blocks;

pub use blocks::Blocks;

use log::info;
use thiserror::Error;

use cloudsketch_core::{
    geometry::{Insets, Point, Size},
    semantic::{Container, Diagram, Element, Group, Path},
};

use crate::config::LayoutConfig;

/// Height of the title bar above the diagram body.
pub const HEADER_HEIGHT: f32 = 20.0;
/// Height of the bar below the diagram body.
pub const FOOTER_HEIGHT: f32 = 10.0;

/// Extra left inset for cards sharing a block with a group, so the card
/// lines up with the group's cards.
const CARD_GROUP_INDENT: f32 = 15.0;

/// Errors raised while laying a diagram out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("failed to layout the diagram with layout hint. Please use another layout hint.")]
    RelocationLimit,
}

/// The block layout engine.
#[derive(Debug, Clone)]
pub struct BlockLayout {
    relocation_limit: usize,
}

impl BlockLayout {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            relocation_limit: config.relocation_limit(),
        }
    }

    /// Lays out the whole diagram with its top-left corner at `origin`.
    ///
    /// Returns the diagram size, header and footer included.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RelocationLimit`] when the layout hints of the
    /// paths contradict each other.
    pub fn layout(&self, diagram: &mut Diagram, origin: Point) -> Result<Size, LayoutError> {
        let (elements, paths) = diagram.layout_parts_mut();
        let level = Level {
            paths,
            relocation_limit: self.relocation_limit,
        };

        let body_offset = origin.add_point(Point::new(0.0, HEADER_HEIGHT));
        let body = level.layout_children(elements, body_offset)?;
        let size = Size::new(body.width(), body.height() + HEADER_HEIGHT + FOOTER_HEIGHT);

        diagram.place(origin, size);
        info!(width = size.width(), height = size.height(); "Diagram laid out");

        Ok(size)
    }
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

/// Shared state of one layout run.
struct Level<'a> {
    paths: &'a [Path],
    relocation_limit: usize,
}

impl Level<'_> {
    /// Composes `elements` into blocks and places them at `offset`, measuring
    /// first and then centring. Returns the size of the content, without
    /// padding.
    fn layout_children(&self, elements: &mut [Element], offset: Point) -> Result<Size, LayoutError> {
        let blocks = Blocks::compose(elements, self.paths, self.relocation_limit)?;

        let measured = self.place_blocks(elements, &blocks, offset, 0.0)?;
        self.place_blocks(elements, &blocks, offset, measured.height())
    }

    /// Places a nested level inside `padding` and returns the padded size.
    fn layout_nested(
        &self,
        elements: &mut [Element],
        offset: Point,
        padding: Insets,
        min_width: f32,
    ) -> Result<Size, LayoutError> {
        let inner = self.layout_children(elements, offset.add_point(padding.top_left()))?;
        let size = inner.add_padding(padding);
        Ok(size.with_width(size.width().max(min_width)))
    }

    /// Places one element with its top-left corner at `offset`.
    fn layout_element(&self, element: &mut Element, offset: Point) -> Result<Size, LayoutError> {
        let size = match element {
            Element::Card(card) => card.intrinsic_size(),
            Element::Group(_) => {
                self.layout_nested(element.children_mut(), offset, Group::PADDING, 0.0)?
            }
            Element::Container(_) => self.layout_nested(
                element.children_mut(),
                offset,
                Container::PADDING,
                Container::MIN_WIDTH,
            )?,
        };
        element.place(offset, size);
        Ok(size)
    }

    /// Places every block left to right from `offset`.
    ///
    /// With a positive `parent_height` each block is centred vertically in
    /// it. Cards are centred horizontally on the widest card of their block.
    fn place_blocks(
        &self,
        elements: &mut [Element],
        blocks: &Blocks,
        offset: Point,
        parent_height: f32,
    ) -> Result<Size, LayoutError> {
        let mut x = offset.x();
        let mut max_height = 0.0f32;

        for block in blocks.iter() {
            let mut block_top = offset.y();
            if parent_height > 0.0 {
                let height = self.stack(elements, block, Point::new(x, offset.y()))?;
                block_top += (parent_height - height) / 2.0;
            }

            let has_group = block.iter().any(|&index| elements[index].is_group());
            let widest_card = block
                .iter()
                .filter_map(|&index| elements[index].as_card())
                .map(|card| card.intrinsic_size().width())
                .fold(0.0f32, f32::max);

            let mut y = block_top;
            let mut max_width = 0.0f32;
            for &index in block {
                let element = &mut elements[index];
                let mut margin = element.margin();
                if let Some(card) = element.as_card() {
                    let mut indent = (widest_card - card.intrinsic_size().width()) / 2.0;
                    if has_group {
                        indent += CARD_GROUP_INDENT;
                    }
                    margin = margin.grow_left(indent);
                }

                let at = Point::new(x + margin.left(), y + margin.top());
                let size = self.layout_element(element, at)?;
                y = at.y() + size.height() + margin.bottom();
                max_width = max_width.max(margin.horizontal_sum() + size.width());
            }

            max_height = max_height.max(y - offset.y());
            x += max_width;
        }

        Ok(Size::new(x - offset.x(), max_height))
    }

    /// Stacks a block top-down from `offset` with plain margins and returns
    /// its height.
    fn stack(
        &self,
        elements: &mut [Element],
        block: &[usize],
        offset: Point,
    ) -> Result<f32, LayoutError> {
        let mut y = offset.y();
        for &index in block {
            let element = &mut elements[index];
            let margin = element.margin();
            let at = Point::new(offset.x() + margin.left(), y + margin.top());
            let size = self.layout_element(element, at)?;
            y = at.y() + size.height() + margin.bottom();
        }
        Ok(y - offset.y())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use cloudsketch_core::{
        color::Color,
        semantic::{Card, Direction, Meta},
    };

    use super::*;

    fn card(id: &str) -> Element {
        Card::new(id, "generic", "icon.png").into()
    }

    fn group(id: &str, children: Vec<Element>) -> Element {
        Group::new(id, id, Color::group_default(0), children).into()
    }

    fn laid_out(elements: Vec<Element>, paths: Vec<Path>) -> Diagram {
        let mut diagram = Diagram::new(Meta::default(), elements, paths, "");
        BlockLayout::default()
            .layout(&mut diagram, Point::default())
            .expect("layout should succeed");
        diagram
    }

    fn offset_of(diagram: &Diagram, id: &str) -> Point {
        diagram.find(id).map(Element::offset).unwrap_or_default()
    }

    #[test]
    fn test_single_card() {
        let diagram = laid_out(vec![card("a")], vec![]);

        assert_eq!(offset_of(&diagram, "a"), Point::new(15.0, 30.0));
        assert_eq!(diagram.size(), Size::new(60.0, 80.0));
        assert_eq!(diagram.offset(), Point::default());
    }

    #[test]
    fn test_cards_centred_on_widest_card() {
        let diagram = laid_out(
            vec![
                card("a"),
                Card::new("b", "generic", "icon.png").with_name("Backend").into(),
            ],
            vec![],
        );

        assert_eq!(offset_of(&diagram, "a"), Point::new(37.5, 30.0));
        assert_eq!(offset_of(&diagram, "b"), Point::new(15.0, 80.0));
        assert_eq!(diagram.size(), Size::new(105.0, 130.0));
    }

    #[test]
    fn test_blocks_centred_vertically() {
        let diagram = laid_out(
            vec![card("a"), card("b"), card("c")],
            vec![Path::new("a", "b"), Path::new("a", "c")],
        );

        assert_eq!(offset_of(&diagram, "a"), Point::new(15.0, 55.0));
        assert_eq!(offset_of(&diagram, "b"), Point::new(75.0, 30.0));
        assert_eq!(offset_of(&diagram, "c"), Point::new(75.0, 80.0));
        assert_eq!(diagram.size(), Size::new(120.0, 130.0));
    }

    #[test]
    fn test_group_padding() {
        let diagram = laid_out(vec![group("g", vec![card("c")])], vec![]);

        let g = diagram.find("g").unwrap();
        assert_eq!(g.offset(), Point::new(15.0, 30.0));
        assert_eq!(g.size(), Size::new(60.0, 60.0));
        assert_eq!(offset_of(&diagram, "c"), Point::new(30.0, 50.0));
        assert_eq!(diagram.size(), Size::new(90.0, 110.0));
    }

    #[test]
    fn test_card_next_to_group_is_indented() {
        let diagram = laid_out(vec![group("g", vec![card("c")]), card("d")], vec![]);

        assert_eq!(offset_of(&diagram, "d"), Point::new(30.0, 110.0));
        assert!(approx_eq!(f32, diagram.size().height(), 160.0));
    }

    #[test]
    fn test_container_minimum_width() {
        let diagram = laid_out(vec![Container::new(vec![card("a")]).into()], vec![]);

        let gcp = diagram.find("gcp").unwrap();
        assert_eq!(gcp.offset(), Point::new(15.0, 30.0));
        assert_eq!(gcp.size(), Size::new(150.0, 80.0));
        assert_eq!(offset_of(&diagram, "a"), Point::new(30.0, 70.0));
        assert_eq!(diagram.size(), Size::new(180.0, 140.0));
    }

    #[test]
    fn test_origin_shifts_everything() {
        let mut diagram = Diagram::new(Meta::default(), vec![card("a")], vec![], "");
        BlockLayout::default()
            .layout(&mut diagram, Point::new(100.0, 50.0))
            .unwrap();

        assert_eq!(offset_of(&diagram, "a"), Point::new(115.0, 80.0));
        assert_eq!(diagram.offset(), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_nested_relocation_error_propagates() {
        let inner = vec![card("a"), card("b"), group("g", vec![card("c"), card("d")])];
        let paths = vec![
            Path::new("a", "b"),
            Path::new("c", "d"),
            Path::new("a", "c").with_direction(Direction::Down),
            Path::new("b", "d").with_direction(Direction::Down),
        ];
        let mut diagram = Diagram::new(
            Meta::default(),
            vec![Container::new(inner).into()],
            paths,
            "",
        );

        assert_eq!(
            BlockLayout::default().layout(&mut diagram, Point::default()),
            Err(LayoutError::RelocationLimit)
        );
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        fn check_children_inside_parents(
            groups: usize,
            cards_per_group: usize,
        ) -> Result<(), TestCaseError> {
            let elements: Vec<Element> = (0..groups)
                .map(|g| {
                    let children = (0..cards_per_group)
                        .map(|c| card(&format!("c{g}_{c}")))
                        .collect();
                    group(&format!("g{g}"), children)
                })
                .collect();
            let paths: Vec<Path> = (1..groups)
                .map(|g| Path::new(format!("c{}_0", g - 1), format!("c{g}_0")))
                .collect();
            let diagram = laid_out(elements, paths);

            for g in 0..groups {
                let parent = diagram.find(&format!("g{g}")).unwrap().bounds();
                for c in 0..cards_per_group {
                    let child = diagram.find(&format!("c{g}_{c}")).unwrap().bounds();
                    prop_assert!(child.min_x() >= parent.min_x());
                    prop_assert!(child.max_x() <= parent.max_x() + 0.01);
                    prop_assert!(child.min_y() >= parent.min_y());
                    prop_assert!(child.max_y() <= parent.max_y() + 0.01);
                }
            }
            Ok(())
        }

        proptest! {
            #[test]
            fn children_inside_parents(groups in 1usize..4, cards_per_group in 1usize..4) {
                check_children_inside_parents(groups, cards_per_group)?;
            }
        }
    }
}
