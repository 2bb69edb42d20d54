//! Connections between elements.
//!
//! A [`Path`] names its endpoints by element id. Ids are resolved against the
//! element tree during validation, layout and rendering, so a path may point
//! at a card nested deep inside groups.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Arrowhead drawn at one end of a path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arrow {
    #[default]
    None,
    /// A filled triangle.
    Fill,
}

impl FromStr for Arrow {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "fill" => Ok(Self::Fill),
            _ => Err("Unsupported arrow type"),
        }
    }
}

impl From<Arrow> for &'static str {
    fn from(val: Arrow) -> Self {
        match val {
            Arrow::None => "none",
            Arrow::Fill => "fill",
        }
    }
}

impl Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Stroke pattern of a path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dash {
    #[default]
    Solid,
    Dot,
}

impl FromStr for Dash {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dot" => Ok(Self::Dot),
            _ => Err("Unsupported dash type"),
        }
    }
}

impl From<Dash> for &'static str {
    fn from(val: Dash) -> Self {
        match val {
            Dash::Solid => "solid",
            Dash::Dot => "dot",
        }
    }
}

impl Display for Dash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Layout hint: where the end element should sit relative to the start.
///
/// `Right` is the natural left-to-right flow. `Down` and `Up` stack the end
/// element in the start element's column, `Left` pulls it into the column
/// before the start element.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Right,
    Left,
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "right" => Ok(Self::Right),
            "left" => Ok(Self::Left),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err("Unsupported path direction"),
        }
    }
}

impl From<Direction> for &'static str {
    fn from(val: Direction) -> Self {
        match val {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A directed, styled connection between two elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    start: String,
    end: String,
    start_arrow: Arrow,
    end_arrow: Arrow,
    dash: Dash,
    direction: Direction,
    hidden: bool,
    annotation: Option<String>,
}

impl Path {
    /// Creates a visible, solid, rightward path without arrowheads.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            start_arrow: Arrow::None,
            end_arrow: Arrow::None,
            dash: Dash::Solid,
            direction: Direction::Right,
            hidden: false,
            annotation: None,
        }
    }

    pub fn with_arrows(mut self, start_arrow: Arrow, end_arrow: Arrow) -> Self {
        self.start_arrow = start_arrow;
        self.end_arrow = end_arrow;
        self
    }

    pub fn with_dash(mut self, dash: Dash) -> Self {
        self.dash = dash;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Sets the label drawn along the path. An empty string clears it.
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        let annotation = annotation.into();
        self.annotation = (!annotation.is_empty()).then_some(annotation);
        self
    }

    /// Id of the element the path starts from.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Id of the element the path points to.
    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn start_arrow(&self) -> Arrow {
        self.start_arrow
    }

    pub fn end_arrow(&self) -> Arrow {
        self.end_arrow
    }

    pub fn dash(&self) -> Dash {
        self.dash
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Hidden paths shape the layout but are never drawn.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.direction {
            Direction::Right => "-->".to_string(),
            direction => format!("-{direction}->"),
        };
        if self.hidden {
            write!(f, "{} ({arrow}) {}", self.start, self.end)
        } else {
            write!(f, "{} {arrow} {}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_defaults() {
        let path = Path::new("a", "b");

        assert_eq!(path.start(), "a");
        assert_eq!(path.end(), "b");
        assert_eq!(path.start_arrow(), Arrow::None);
        assert_eq!(path.end_arrow(), Arrow::None);
        assert_eq!(path.dash(), Dash::Solid);
        assert_eq!(path.direction(), Direction::Right);
        assert!(!path.is_hidden());
        assert_eq!(path.annotation(), None);
    }

    #[test]
    fn test_empty_annotation_is_none() {
        assert_eq!(Path::new("a", "b").with_annotation("").annotation(), None);
        assert_eq!(
            Path::new("a", "b").with_annotation("HTTPS").annotation(),
            Some("HTTPS")
        );
    }

    #[test]
    fn test_enum_from_str_round_trip() {
        for direction in [Direction::Right, Direction::Left, Direction::Up, Direction::Down] {
            assert_eq!(direction.to_string().parse::<Direction>(), Ok(direction));
        }
        for arrow in [Arrow::None, Arrow::Fill] {
            assert_eq!(arrow.to_string().parse::<Arrow>(), Ok(arrow));
        }
        for dash in [Dash::Solid, Dash::Dot] {
            assert_eq!(dash.to_string().parse::<Dash>(), Ok(dash));
        }
        assert!("sideways".parse::<Direction>().is_err());
        assert!("FILL".parse::<Arrow>().is_err());
    }

    #[test]
    fn test_path_display() {
        let path = Path::new("a", "b")
            .with_direction(Direction::Down)
            .with_hidden(true);
        assert_eq!(path.to_string(), "a (-down->) b");
        assert_eq!(Path::new("a", "b").to_string(), "a --> b");
    }
}
