//! Diagram data model.
//!
//! - [`Element`] - A card, group or container in the element tree
//! - [`Path`] - A directed connection between two elements, addressed by id
//! - [`Diagram`] - The aggregate root holding metadata, elements and paths

mod diagram;
mod element;
mod path;

pub use diagram::{Diagram, Meta, ValidationError};
pub use element::{Card, Container, Element, Group};
pub use path::{Arrow, Dash, Direction, Path};
