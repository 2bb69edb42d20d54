//! Rendering of laid-out diagrams.
//!
//! [`render`] walks a diagram whose layout is complete and hands every
//! visual part to a [`Renderer`] in a fixed order: header, footer, the
//! element tree depth-first (each background before its children), every
//! visible path, then [`Renderer::finalize`]. Backends only decide how
//! each part looks.

mod svg;

pub use svg::{SvgRenderer, SvgStyle};

use log::debug;
use thiserror::Error;

use cloudsketch_core::{
    color::Color,
    geometry::{Point, Size},
    semantic::{Card, Diagram, Element, Path},
};

use crate::{
    layout::{FOOTER_HEIGHT, HEADER_HEIGHT},
    route::{Route, find_route},
};

/// Errors raised while rendering.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid style: {0}")]
    Style(String),

    #[error("path end {0:?} is not an element of the diagram")]
    UnknownElement(String),

    #[error("{0}")]
    Render(String),
}

/// A drawing backend.
pub trait Renderer {
    /// The title bar across the top of the diagram.
    fn render_header(&mut self, offset: Point, size: Size, title: &str) -> Result<(), Error>;

    /// The bar across the bottom of the diagram.
    fn render_footer(&mut self, offset: Point, size: Size) -> Result<(), Error>;

    /// The background of the cloud container, drawn before its children.
    fn render_container_background(
        &mut self,
        id: &str,
        offset: Point,
        size: Size,
    ) -> Result<(), Error>;

    /// The background of a group, drawn before its children.
    fn render_group_background(
        &mut self,
        id: &str,
        offset: Point,
        size: Size,
        name: &str,
        icon_url: Option<&str>,
        color: Color,
    ) -> Result<(), Error>;

    /// The shadow card drawn behind a stacked card.
    fn render_stacked_card(&mut self, id: &str, offset: Point, size: Size) -> Result<(), Error>;

    fn render_card(&mut self, id: &str, offset: Point, size: Size, card: &Card)
    -> Result<(), Error>;

    /// A visible path along its computed route.
    fn render_path(
        &mut self,
        path: &Path,
        route: &Route,
        start: &Element,
        end: &Element,
    ) -> Result<(), Error>;

    /// Called once after everything else.
    fn finalize(&mut self) -> Result<(), Error>;
}

/// Draws a laid-out diagram with `renderer`.
///
/// # Errors
///
/// Returns the first error of the renderer, or [`Error::UnknownElement`]
/// when a path names an element that is not in the diagram.
pub fn render<R>(diagram: &Diagram, renderer: &mut R) -> Result<(), Error>
where
    R: Renderer + ?Sized,
{
    let offset = diagram.offset();
    let size = diagram.size();

    renderer.render_header(
        offset,
        size.with_height(HEADER_HEIGHT),
        diagram.meta().title(),
    )?;
    renderer.render_footer(
        offset.add_point(Point::new(0.0, size.height() - FOOTER_HEIGHT)),
        size.with_height(FOOTER_HEIGHT),
    )?;

    for element in diagram.elements() {
        render_element(element, renderer)?;
    }

    for path in diagram.paths().iter().filter(|path| !path.is_hidden()) {
        let start = find_element(diagram, path.start())?;
        let end = find_element(diagram, path.end())?;
        let route = find_route(diagram, path, start.bounds(), end.bounds());
        debug!(path:%, route:%; "Routed path");
        renderer.render_path(path, &route, start, end)?;
    }

    renderer.finalize()
}

fn find_element<'a>(diagram: &'a Diagram, id: &str) -> Result<&'a Element, Error> {
    diagram
        .find(id)
        .ok_or_else(|| Error::UnknownElement(id.to_string()))
}

fn render_element<R>(element: &Element, renderer: &mut R) -> Result<(), Error>
where
    R: Renderer + ?Sized,
{
    let offset = element.offset();
    let size = element.size();

    match element {
        Element::Card(card) => {
            if card.is_stacked() {
                renderer.render_stacked_card(
                    card.id(),
                    offset.add_point(Card::STACK_OFFSET),
                    size,
                )?;
            }
            return renderer.render_card(card.id(), offset, size, card);
        }
        Element::Group(group) => renderer.render_group_background(
            group.id(),
            offset,
            size,
            group.name(),
            group.icon_url(),
            group.background_color(),
        )?,
        Element::Container(_) => {
            renderer.render_container_background(element.id(), offset, size)?
        }
    }

    for child in element.children() {
        render_element(child, renderer)?;
    }
    Ok(())
}
