//! Diagram elements: cards, groups and the cloud container.
//!
//! Elements form a tree. Cards are leaves, groups and the container own an
//! ordered list of children. Every element also carries a layout slot
//! holding its absolute offset and size. The slot stays zeroed until the
//! layout engine calls [`Element::place`].

use crate::{
    color::Color,
    geometry::{Bounds, Insets, Point, Size},
};

const CARD_MARGIN: Insets = Insets::new(10.0, 15.0, 10.0, 15.0);
const GROUP_MARGIN: Insets = Insets::new(10.0, 15.0, 10.0, 15.0);
const CONTAINER_MARGIN: Insets = Insets::new(10.0, 15.0, 20.0, 15.0);

const DEFAULT_CARD_WIDTH: f32 = 75.0;
const DEFAULT_CARD_HEIGHT: f32 = 30.0;
const EXPANDED_CARD_HEIGHT: f32 = 45.0;
const ICON_ONLY_CARD_SIZE: f32 = 30.0;

const NAME_CHAR_WIDTH: f32 = 4.3;
const DISPLAY_NAME_CHAR_WIDTH: f32 = 4.3;
const DESCRIPTION_CHAR_WIDTH: f32 = 3.8;

/// Absolute position and size assigned by layout.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Placement {
    offset: Point,
    size: Size,
}

/// A leaf element showing one product or component.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    id: String,
    card_type: String,
    display_name: String,
    name: String,
    description: String,
    icon_url: String,
    stacked: bool,
    placement: Placement,
}

impl Card {
    /// Size of the icon drawn in the top-left corner of a card.
    pub const ICON_SIZE: Size = Size::new(20.0, 20.0);
    /// Space around the icon of a card that has text.
    pub const ICON_MARGIN: Insets = Insets::new(5.0, 7.0, 0.0, 5.0);
    /// Space around the icon of an icon-only card.
    pub const ICON_ONLY_MARGIN: Insets = Insets::uniform(5.0);
    /// Offset of the shadow drawn behind a stacked card.
    pub const STACK_OFFSET: Point = Point::new(4.0, 4.0);

    /// Creates a card whose icon and display name are already resolved.
    pub fn new(
        id: impl Into<String>,
        card_type: impl Into<String>,
        icon_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            card_type: card_type.into(),
            display_name: String::new(),
            name: String::new(),
            description: String::new(),
            icon_url: icon_url.into(),
            stacked: false,
            placement: Placement::default(),
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The catalog card type this card was declared with.
    pub fn card_type(&self) -> &str {
        &self.card_type
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn icon_url(&self) -> &str {
        &self.icon_url
    }

    /// Whether a shadow copy is drawn behind the card.
    pub fn is_stacked(&self) -> bool {
        self.stacked
    }

    /// Returns true when the card shows no text at all.
    pub fn is_icon_only(&self) -> bool {
        self.display_name.is_empty() && self.name.is_empty() && self.description.is_empty()
    }

    /// The size a card needs for its icon and text.
    ///
    /// Text is measured with fixed per-character widths. When the card only
    /// has a display name it may wrap, so the longest word is measured
    /// instead of the whole name.
    pub fn intrinsic_size(&self) -> Size {
        if self.is_icon_only() {
            return Size::new(ICON_ONLY_CARD_SIZE, ICON_ONLY_CARD_SIZE);
        }

        let display_name_width = if self.name.is_empty() && self.description.is_empty() {
            self.display_name
                .split(' ')
                .map(|word| text_width(word, DISPLAY_NAME_CHAR_WIDTH))
                .fold(0.0, f32::max)
        } else {
            text_width(&self.display_name, DISPLAY_NAME_CHAR_WIDTH)
        };

        let icon_width = Self::ICON_MARGIN.horizontal_sum() + Self::ICON_SIZE.width();
        let name_width = text_width(&self.name, NAME_CHAR_WIDTH);
        let description_width = text_width(&self.description, DESCRIPTION_CHAR_WIDTH);

        let width = [display_name_width, name_width, description_width]
            .into_iter()
            .map(|text| icon_width + text)
            .fold(DEFAULT_CARD_WIDTH, f32::max);

        let height = if self.description.is_empty() {
            DEFAULT_CARD_HEIGHT
        } else {
            EXPANDED_CARD_HEIGHT
        };

        Size::new(width, height)
    }
}

fn text_width(text: &str, char_width: f32) -> f32 {
    text.chars().count() as f32 * char_width
}

/// A titled, colored box around related elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    id: String,
    name: String,
    icon_url: Option<String>,
    background_color: Color,
    children: Vec<Element>,
    placement: Placement,
}

impl Group {
    /// Space between the group border and its children.
    pub const PADDING: Insets = Insets::new(10.0, 0.0, 0.0, 0.0);
    /// Position of the group name relative to the group's offset.
    pub const NAME_OFFSET: Point = Point::new(5.0, 10.0);

    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        background_color: Color,
        children: Vec<Element>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon_url: None,
            background_color,
            children,
            placement: Placement::default(),
        }
    }

    pub fn with_icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The title shown in the group's corner.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon_url(&self) -> Option<&str> {
        self.icon_url.as_deref()
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns true if a card exists anywhere below this group.
    pub fn has_card(&self) -> bool {
        self.children.iter().any(|child| match child {
            Element::Card(_) => true,
            Element::Group(group) => group.has_card(),
            Element::Container(_) => false,
        })
    }
}

/// The cloud boundary wrapping the hosted part of an architecture.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    children: Vec<Element>,
    placement: Placement,
}

impl Container {
    /// Id every container is registered under.
    pub const ID: &'static str = "gcp";
    /// Space between the container border and its children.
    pub const PADDING: Insets = Insets::new(30.0, 0.0, 0.0, 0.0);
    pub const MIN_WIDTH: f32 = 150.0;
    /// Position of the cloud logo relative to the container's offset.
    pub const ICON_OFFSET: Point = Point::new(10.0, 10.0);

    pub fn new(children: Vec<Element>) -> Self {
        Self {
            children,
            placement: Placement::default(),
        }
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }
}

/// A node of the diagram tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Card(Card),
    Group(Group),
    Container(Container),
}

impl Element {
    pub fn id(&self) -> &str {
        match self {
            Element::Card(card) => card.id(),
            Element::Group(group) => group.id(),
            Element::Container(_) => Container::ID,
        }
    }

    /// Space kept around the element inside its parent.
    pub fn margin(&self) -> Insets {
        match self {
            Element::Card(_) => CARD_MARGIN,
            Element::Group(_) => GROUP_MARGIN,
            Element::Container(_) => CONTAINER_MARGIN,
        }
    }

    /// Direct children; empty for cards.
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Card(_) => &[],
            Element::Group(group) => &group.children,
            Element::Container(container) => &container.children,
        }
    }

    /// Mutable access to the direct children, used by layout.
    pub fn children_mut(&mut self) -> &mut [Element] {
        match self {
            Element::Card(_) => &mut [],
            Element::Group(group) => &mut group.children,
            Element::Container(container) => &mut container.children,
        }
    }

    /// Finds this element or a descendant with the given id.
    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id() == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Returns true if this element is, or contains, the element `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Visits this element and then every descendant depth-first.
    ///
    /// Stops at the first error returned by `f`.
    pub fn walk<E, F>(&self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&Element) -> Result<(), E>,
    {
        f(self)?;
        for child in self.children() {
            child.walk(f)?;
        }
        Ok(())
    }

    pub fn as_card(&self) -> Option<&Card> {
        match self {
            Element::Card(card) => Some(card),
            _ => None,
        }
    }

    pub fn is_card(&self) -> bool {
        matches!(self, Element::Card(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Element::Group(_))
    }

    /// Absolute top-left corner assigned by layout.
    pub fn offset(&self) -> Point {
        self.placement().offset
    }

    /// Size assigned by layout.
    pub fn size(&self) -> Size {
        self.placement().size
    }

    pub fn bounds(&self) -> Bounds {
        let placement = self.placement();
        Bounds::new_from_top_left(placement.offset, placement.size)
    }

    /// Records the element's position and size.
    pub fn place(&mut self, offset: Point, size: Size) {
        let placement = match self {
            Element::Card(card) => &mut card.placement,
            Element::Group(group) => &mut group.placement,
            Element::Container(container) => &mut container.placement,
        };
        *placement = Placement { offset, size };
    }

    fn placement(&self) -> Placement {
        match self {
            Element::Card(card) => card.placement,
            Element::Group(group) => group.placement,
            Element::Container(container) => container.placement,
        }
    }
}

impl From<Card> for Element {
    fn from(card: Card) -> Self {
        Element::Card(card)
    }
}

impl From<Group> for Element {
    fn from(group: Group) -> Self {
        Element::Group(group)
    }
}

impl From<Container> for Element {
    fn from(container: Container) -> Self {
        Element::Container(container)
    }
}
