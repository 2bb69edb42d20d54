//! SVG backend.

use log::debug;
use svg::{
    Document, Node,
    node::{self, Value, element as svg_element},
};

use cloudsketch_core::{
    color::Color,
    geometry::{Point, Size},
    semantic::{Arrow, Card, Container, Dash, Diagram, Element, Group, Path},
};

use super::{Error, Renderer};
use crate::{config::StyleConfig, route::Route};

const DEFAULT_HEADER_COLOR: &str = "#519bf7";
const DEFAULT_PATH_COLOR: &str = "#3a7df0";
const DEFAULT_FONT_FAMILY: &str = "Roboto, Arial, sans-serif";

const HEADER_TEXT_COLOR: &str = "#ffffff";
const FOOTER_COLOR: &str = "#e0e0e0";
const CONTAINER_BACKGROUND: &str = "#f6f6f6";
const CONTAINER_LABEL: &str = "Google Cloud";
const CONTAINER_LABEL_COLOR: &str = "#757575";
const GROUP_TEXT_COLOR: &str = "#9e9e9e";
const CARD_FILL: &str = "#ffffff";
const CARD_BORDER: &str = "#000000";
const NAME_COLOR: &str = "#212121";
const DISPLAY_NAME_COLOR: &str = "#757575";
const SEPARATOR_COLOR: &str = "#e0e0e0";
const DESCRIPTION_COLOR: &str = "#000000";
const ANNOTATION_COLOR: &str = "#757575";

const HEADER_FONT_SIZE: f32 = 8.5;
const GROUP_NAME_FONT_SIZE: f32 = 7.5;
const NAME_FONT_SIZE: f32 = 7.5;
const DISPLAY_NAME_FONT_SIZE: f32 = 7.0;
const DESCRIPTION_FONT_SIZE: f32 = 6.5;
const LINE_HEIGHT: f32 = 9.0;

const HEADER_TEXT_INDENT: f32 = 10.0;
const GROUP_ICON_SIZE: f32 = 12.0;
/// Top of the text area above the description separator.
const CARD_TEXT_AREA_HEIGHT: f32 = 28.0;
const DESCRIPTION_TOP: f32 = 30.0;
const DESCRIPTION_HEIGHT: f32 = 10.0;
const SEPARATOR_SPACE: f32 = 3.0;
/// Advance of one display name character, used for word wrapping.
const DISPLAY_CHAR_WIDTH: f32 = 4.3;

const ARROW_END_MARKER: &str = "arrow-end";
const ARROW_START_MARKER: &str = "arrow-start";

/// Colors and font used by [`SvgRenderer`].
#[derive(Debug, Clone)]
pub struct SvgStyle {
    header_color: String,
    path_color: String,
    font_family: String,
}

impl SvgStyle {
    /// Builds a style from configuration, keeping defaults for unset fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Style`] when a configured color is invalid.
    pub fn from_config(config: &StyleConfig) -> Result<Self, Error> {
        let default = Self::default();
        let header_color = config.header_color().map_err(Error::Style)?;
        let path_color = config.path_color().map_err(Error::Style)?;

        Ok(Self {
            header_color: header_color.map_or(default.header_color, Color::to_hex),
            path_color: path_color.map_or(default.path_color, Color::to_hex),
            font_family: config
                .font_family()
                .map_or(default.font_family, str::to_string),
        })
    }
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            header_color: DEFAULT_HEADER_COLOR.to_string(),
            path_color: DEFAULT_PATH_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

/// Renders a diagram into an in-memory SVG document.
///
/// The canvas covers the diagram bounds. The title goes into `<title>` and
/// the diagram source into `<desc>` so a rendered file can be traced back
/// to its source.
#[derive(Debug)]
pub struct SvgRenderer {
    style: SvgStyle,
    origin: Point,
    canvas: Size,
    title: String,
    source: String,
    content: svg_element::Group,
    document: Option<Document>,
}

impl SvgRenderer {
    pub fn new(style: SvgStyle, diagram: &Diagram) -> Self {
        Self {
            style,
            origin: diagram.offset(),
            canvas: diagram.size(),
            title: diagram.meta().title().to_string(),
            source: diagram.source().to_string(),
            content: svg_element::Group::new(),
            document: None,
        }
    }

    /// Returns the finished document as SVG text.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Renderer::finalize`] has not run.
    pub fn into_svg(self) -> Result<String, Error> {
        self.document
            .map(|document| document.to_string())
            .ok_or_else(|| Error::Render("SVG document was not finalized".to_string()))
    }

    fn push(&mut self, node: impl Into<Box<dyn Node>>) {
        self.content.append(node);
    }

    fn text(
        &self,
        content: &str,
        position: Point,
        font_size: f32,
        color: &str,
    ) -> svg_element::Text {
        svg_element::Text::new(content)
            .set("x", position.x())
            .set("y", position.y())
            .set("dominant-baseline", "middle")
            .set("font-family", self.style.font_family.as_str())
            .set("font-size", font_size)
            .set("fill", color)
    }

    fn markers(&self) -> svg_element::Definitions {
        let marker = |id: &str, orient: &str| {
            svg_element::Marker::new()
                .set("id", id)
                .set("viewBox", "0 0 10 10")
                .set("refX", 9)
                .set("refY", 5)
                .set("markerWidth", 6)
                .set("markerHeight", 6)
                .set("orient", orient)
                .add(
                    svg_element::Path::new()
                        .set("d", "M 0 0 L 10 5 L 0 10 z")
                        .set("fill", self.style.path_color.as_str()),
                )
        };

        svg_element::Definitions::new()
            .add(marker(ARROW_END_MARKER, "auto"))
            .add(marker(ARROW_START_MARKER, "auto-start-reverse"))
    }

    /// Text lines of a card as `(text, font size, color)`, top to bottom.
    fn card_lines(card: &Card, text_width: f32) -> Vec<(String, f32, &'static str)> {
        let mut lines = Vec::new();
        if !card.name().is_empty() {
            lines.push((card.name().to_string(), NAME_FONT_SIZE, NAME_COLOR));
        }
        if !card.display_name().is_empty() {
            let display_lines = if card.name().is_empty() && card.description().is_empty() {
                wrap_words(card.display_name(), text_width)
            } else {
                vec![card.display_name().to_string()]
            };
            lines.extend(
                display_lines
                    .into_iter()
                    .map(|line| (line, DISPLAY_NAME_FONT_SIZE, DISPLAY_NAME_COLOR)),
            );
        }
        lines
    }
}

/// Breaks `text` at spaces so each line fits `width` where possible.
fn wrap_words(text: &str, width: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for word in text.split(' ') {
        let fits = lines.last().is_some_and(|line| {
            (line.chars().count() + 1 + word.chars().count()) as f32 * DISPLAY_CHAR_WIDTH <= width
        });
        match lines.last_mut() {
            Some(line) if fits => {
                line.push(' ');
                line.push_str(word);
            }
            _ => lines.push(word.to_string()),
        }
    }
    lines
}

fn rectangle(offset: Point, size: Size, fill: impl Into<Value>) -> svg_element::Rectangle {
    svg_element::Rectangle::new()
        .set("x", offset.x())
        .set("y", offset.y())
        .set("width", size.width())
        .set("height", size.height())
        .set("fill", fill)
}

fn image(url: &str, offset: Point, size: Size) -> svg_element::Image {
    svg_element::Image::new()
        .set("href", url)
        .set("x", offset.x())
        .set("y", offset.y())
        .set("width", size.width())
        .set("height", size.height())
}

fn polyline_data(points: &[Point]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let command = if i == 0 { "M" } else { "L" };
            format!("{command} {} {}", point.x(), point.y())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Renderer for SvgRenderer {
    fn render_header(&mut self, offset: Point, size: Size, title: &str) -> Result<(), Error> {
        let bar = rectangle(offset, size, self.style.header_color.as_str());
        let text = self.text(
            title,
            offset.add_point(Point::new(HEADER_TEXT_INDENT, size.height() / 2.0)),
            HEADER_FONT_SIZE,
            HEADER_TEXT_COLOR,
        );
        self.push(bar);
        self.push(text);
        Ok(())
    }

    fn render_footer(&mut self, offset: Point, size: Size) -> Result<(), Error> {
        self.push(rectangle(offset, size, FOOTER_COLOR));
        Ok(())
    }

    fn render_container_background(
        &mut self,
        id: &str,
        offset: Point,
        size: Size,
    ) -> Result<(), Error> {
        let background = rectangle(offset, size, CONTAINER_BACKGROUND).set("id", id);
        let label = self
            .text(
                CONTAINER_LABEL,
                offset.add_point(Container::ICON_OFFSET),
                HEADER_FONT_SIZE,
                CONTAINER_LABEL_COLOR,
            )
            .set("dominant-baseline", "hanging")
            .set("font-weight", "bold");
        self.push(background);
        self.push(label);
        Ok(())
    }

    fn render_group_background(
        &mut self,
        id: &str,
        offset: Point,
        size: Size,
        name: &str,
        icon_url: Option<&str>,
        color: Color,
    ) -> Result<(), Error> {
        self.push(rectangle(offset, size, &color).set("id", id));

        let mut name_offset = offset.add_point(Group::NAME_OFFSET);
        if let Some(url) = icon_url {
            let icon_offset = Point::new(name_offset.x(), name_offset.y() - GROUP_ICON_SIZE / 2.0);
            self.push(image(
                url,
                icon_offset,
                Size::new(GROUP_ICON_SIZE, GROUP_ICON_SIZE),
            ));
            name_offset = name_offset.with_x(name_offset.x() + GROUP_ICON_SIZE + 3.0);
        }
        let text = self.text(name, name_offset, GROUP_NAME_FONT_SIZE, GROUP_TEXT_COLOR);
        self.push(text);
        Ok(())
    }

    fn render_stacked_card(&mut self, id: &str, offset: Point, size: Size) -> Result<(), Error> {
        self.push(
            rectangle(offset, size, CARD_FILL)
                .set("id", format!("{id}-stacked"))
                .set("stroke", CARD_BORDER)
                .set("stroke-width", 0.5),
        );
        Ok(())
    }

    fn render_card(
        &mut self,
        id: &str,
        offset: Point,
        size: Size,
        card: &Card,
    ) -> Result<(), Error> {
        let mut group = svg_element::Group::new().set("id", id).add(
            rectangle(offset, size, CARD_FILL)
                .set("stroke", CARD_BORDER)
                .set("stroke-width", 0.5),
        );

        if card.is_icon_only() {
            let icon_offset = offset.add_point(Card::ICON_ONLY_MARGIN.top_left());
            self.push(group.add(image(card.icon_url(), icon_offset, Card::ICON_SIZE)));
            return Ok(());
        }

        group = group.add(image(
            card.icon_url(),
            offset.add_point(Card::ICON_MARGIN.top_left()),
            Card::ICON_SIZE,
        ));

        let text_left = Card::ICON_MARGIN.horizontal_sum() + Card::ICON_SIZE.width();
        let text_width = size.width() - text_left - SEPARATOR_SPACE;
        let lines = Self::card_lines(card, text_width);

        let area_height = if card.description().is_empty() {
            size.height()
        } else {
            CARD_TEXT_AREA_HEIGHT
        };
        let first_line = (area_height - lines.len() as f32 * LINE_HEIGHT) / 2.0 + LINE_HEIGHT / 2.0;
        for (i, (line, font_size, color)) in lines.iter().enumerate() {
            let position = offset.add_point(Point::new(
                text_left,
                first_line + i as f32 * LINE_HEIGHT,
            ));
            group = group.add(self.text(line, position, *font_size, color));
        }

        if !card.description().is_empty() {
            let start = offset.add_point(Point::new(text_left, CARD_TEXT_AREA_HEIGHT));
            group = group
                .add(
                    svg_element::Line::new()
                        .set("x1", start.x())
                        .set("y1", start.y())
                        .set("x2", start.x() + text_width)
                        .set("y2", start.y())
                        .set("stroke", SEPARATOR_COLOR)
                        .set("stroke-width", 0.5),
                )
                .add(self.text(
                    card.description(),
                    offset.add_point(Point::new(
                        text_left + 0.5,
                        DESCRIPTION_TOP + DESCRIPTION_HEIGHT / 2.0,
                    )),
                    DESCRIPTION_FONT_SIZE,
                    DESCRIPTION_COLOR,
                ));
        }

        self.push(group);
        Ok(())
    }

    fn render_path(
        &mut self,
        path: &Path,
        route: &Route,
        start: &Element,
        end: &Element,
    ) -> Result<(), Error> {
        let points = route.points();
        if points.len() < 2 {
            return Err(Error::Render(format!(
                "route for {} -> {} has no segment",
                start.id(),
                end.id()
            )));
        }

        let mut line = svg_element::Path::new()
            .set("d", polyline_data(points))
            .set("fill", "none")
            .set("stroke", self.style.path_color.as_str())
            .set("stroke-width", 1);
        if path.dash() == Dash::Dot {
            line = line.set("stroke-dasharray", "2,2");
        }
        if path.start_arrow() == Arrow::Fill {
            line = line.set("marker-start", format!("url(#{ARROW_START_MARKER})"));
        }
        if path.end_arrow() == Arrow::Fill {
            line = line.set("marker-end", format!("url(#{ARROW_END_MARKER})"));
        }
        self.push(line);

        if let Some(annotation) = path.annotation() {
            // Label the middle segment.
            let middle = (points.len() - 1) / 2;
            let position = points[middle].midpoint(points[middle + 1]);
            let label = self
                .text(annotation, position, DESCRIPTION_FONT_SIZE, ANNOTATION_COLOR)
                .set("text-anchor", "middle");
            self.push(label);
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), Error> {
        let content = std::mem::take(&mut self.content);
        let document = Document::new()
            .set(
                "viewBox",
                (
                    self.origin.x(),
                    self.origin.y(),
                    self.canvas.width(),
                    self.canvas.height(),
                ),
            )
            .set("width", self.canvas.width())
            .set("height", self.canvas.height())
            .add(svg_element::Title::new(self.title.as_str()))
            .add(svg_element::Description::new().add(node::Text::new(self.source.as_str())))
            .add(self.markers())
            .add(content);

        debug!(
            width = self.canvas.width(),
            height = self.canvas.height();
            "SVG document rendered"
        );
        self.document = Some(document);
        Ok(())
    }
}
