//! Orthogonal route finding between two placed elements.
//!
//! A route leaves the source from the middle of one side and enters the
//! destination in the middle of another. Candidates are tried in order of
//! preference for the path's direction, then for every side pair; the first
//! candidate that does not cross a card wins.

use std::fmt;

use log::warn;

use cloudsketch_core::{
    geometry::{Bounds, Point},
    semantic::{Diagram, Direction, Element, Path},
};

/// Distance a route keeps from a card side before turning.
const STANDOFF: f32 = 15.0;

/// The side of an element a route attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl CardSide {
    const ALL: [CardSide; 4] = [
        CardSide::Top,
        CardSide::Right,
        CardSide::Bottom,
        CardSide::Left,
    ];

    /// Middle of this side of `bounds`.
    fn anchor(self, bounds: Bounds) -> Point {
        let center = bounds.center();
        match self {
            CardSide::Top => center.with_y(bounds.min_y()),
            CardSide::Right => center.with_x(bounds.max_x()),
            CardSide::Bottom => center.with_y(bounds.max_y()),
            CardSide::Left => center.with_x(bounds.min_x()),
        }
    }

    /// `point` moved [`STANDOFF`] away from the side.
    fn standoff(self, point: Point) -> Point {
        match self {
            CardSide::Top => point.with_y(point.y() - STANDOFF),
            CardSide::Right => point.with_x(point.x() + STANDOFF),
            CardSide::Bottom => point.with_y(point.y() + STANDOFF),
            CardSide::Left => point.with_x(point.x() - STANDOFF),
        }
    }
}

impl fmt::Display for CardSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardSide::Top => "top",
            CardSide::Right => "right",
            CardSide::Bottom => "bottom",
            CardSide::Left => "left",
        };
        write!(f, "{s}")
    }
}

/// An orthogonal polyline from a source side to a destination side.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<Point>,
    src_side: CardSide,
    dst_side: CardSide,
}

impl Route {
    pub fn new(points: Vec<Point>, src_side: CardSide, dst_side: CardSide) -> Self {
        Self {
            points,
            src_side,
            dst_side,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn src_side(&self) -> CardSide {
        self.src_side
    }

    pub fn dst_side(&self) -> CardSide {
        self.dst_side
    }

    fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let points: Vec<String> = self.points.iter().map(Point::to_string).collect();
        write!(
            f,
            "{}->{} [{}]",
            self.src_side,
            self.dst_side,
            points.join(", ")
        )
    }
}

/// Finds the route for `path` between the placed elements `src` and `dst`.
///
/// Never fails: when every candidate crosses a card, the most preferred
/// candidate is returned and a warning is logged.
pub fn find_route(diagram: &Diagram, path: &Path, src: Bounds, dst: Bounds) -> Route {
    let preferred = preferred_sides(path.direction())
        .into_iter()
        .map(|dst_side| (preferred_source(path.direction()), dst_side));
    let every = CardSide::ALL
        .into_iter()
        .flat_map(|src_side| CardSide::ALL.into_iter().map(move |dst_side| (src_side, dst_side)));

    let candidates: Vec<Route> = preferred
        .chain(every)
        .flat_map(|(src_side, dst_side)| routes_for(src, dst, src_side, dst_side))
        .collect();

    if let Some(route) = candidates
        .iter()
        .find(|route| !overlaps_any_card(route, diagram))
    {
        return route.clone();
    }

    let route = candidates[0].clone();
    warn!(path:%, route:%; "All routes overlap a card, using the preferred route");
    route
}

fn preferred_source(direction: Direction) -> CardSide {
    match direction {
        Direction::Right => CardSide::Right,
        Direction::Up => CardSide::Top,
        Direction::Left => CardSide::Left,
        Direction::Down => CardSide::Bottom,
    }
}

/// Destination sides tried first, in order, for a direction.
fn preferred_sides(direction: Direction) -> [CardSide; 4] {
    use CardSide::{Bottom, Left, Right, Top};

    match direction {
        Direction::Right => [Left, Top, Right, Bottom],
        Direction::Up => [Bottom, Left, Top, Right],
        Direction::Left => [Right, Bottom, Left, Top],
        Direction::Down => [Top, Right, Bottom, Left],
    }
}

fn routes_for(src: Bounds, dst: Bounds, src_side: CardSide, dst_side: CardSide) -> Vec<Route> {
    use CardSide::{Bottom, Left, Right, Top};

    match (src_side, dst_side) {
        (Right, Left) | (Top, Bottom) | (Left, Right) | (Bottom, Top) => {
            vec![facing_route(src, dst, src_side, dst_side)]
        }
        _ => detour_routes(src, dst, src_side, dst_side).to_vec(),
    }
}

/// A four point elbow between two sides that face each other, turning
/// halfway between them.
fn facing_route(src: Bounds, dst: Bounds, src_side: CardSide, dst_side: CardSide) -> Route {
    let a = src_side.anchor(src);
    let d = dst_side.anchor(dst);
    let (b, c) = match src_side {
        CardSide::Left | CardSide::Right => {
            let mid_x = a.midpoint(d).x();
            (a.with_x(mid_x), d.with_x(mid_x))
        }
        CardSide::Top | CardSide::Bottom => {
            let mid_y = a.midpoint(d).y();
            (a.with_y(mid_y), d.with_y(mid_y))
        }
    };
    Route::new(vec![a, b, c, d], src_side, dst_side)
}

/// The two five point detours `A B C D E` for sides that do not face each
/// other.
///
/// `A` and `E` sit on the card sides, `B` and `D` keep the standoff from
/// them. The first candidate turns at `C` below or above `D`, the second at
/// `C` in line with `B`. When `C` already lies on the `A-B` or `E-D` leg,
/// that leg is cut short at `C`. The second candidate starts from the legs
/// as the first one left them.
fn detour_routes(src: Bounds, dst: Bounds, src_side: CardSide, dst_side: CardSide) -> [Route; 2] {
    let a = src_side.anchor(src);
    let mut b = src_side.standoff(a);
    let e = dst_side.anchor(dst);
    let mut d = dst_side.standoff(e);

    let c = Point::new(d.x(), b.y());
    cut_legs(a, &mut b, c, &mut d, e);
    let first = Route::new(vec![a, b, c, d, e], src_side, dst_side);

    let c = Point::new(b.x(), d.y());
    cut_legs(a, &mut b, c, &mut d, e);
    let second = Route::new(vec![a, b, c, d, e], src_side, dst_side);

    [first, second]
}

/// Moves `b` or `d` onto `c` when `c` lies on the `a-b` or `e-d` leg.
fn cut_legs(a: Point, b: &mut Point, c: Point, d: &mut Point, e: Point) {
    if is_point_on_segment(a, *b, c) {
        *b = c;
    }
    if is_point_on_segment(e, *d, c) {
        *d = c;
    }
}

/// Returns true if `point` lies on the horizontal or vertical segment `a-b`,
/// ends included.
fn is_point_on_segment(a: Point, b: Point, point: Point) -> bool {
    let within = |p: f32, q: f32, v: f32| (p <= v && v <= q) || (q <= v && v <= p);

    (a.y() == b.y() && b.y() == point.y() && within(a.x(), b.x(), point.x()))
        || (a.x() == b.x() && b.x() == point.x() && within(a.y(), b.y(), point.y()))
}

fn overlaps_any_card(route: &Route, diagram: &Diagram) -> bool {
    route.segments().any(|(a, b)| {
        diagram
            .walk(&mut |element: &Element| {
                if element.is_card() && segment_overlaps(a, b, element.bounds()) {
                    Err(())
                } else {
                    Ok(())
                }
            })
            .is_err()
    })
}

/// Returns true if the segment `a-b` has an end strictly inside `card`, or
/// crosses it completely along one axis.
fn segment_overlaps(a: Point, b: Point, card: Bounds) -> bool {
    if card.contains_strict(a) || card.contains_strict(b) {
        return true;
    }

    let spans = |p: f32, q: f32, min: f32, max: f32| (p <= min && q >= max) || (q <= min && p >= max);

    if a.x() == b.x()
        && card.min_x() <= a.x()
        && a.x() <= card.max_x()
        && spans(a.y(), b.y(), card.min_y(), card.max_y())
    {
        return true;
    }

    a.y() == b.y()
        && card.min_y() <= a.y()
        && a.y() <= card.max_y()
        && spans(a.x(), b.x(), card.min_x(), card.max_x())
}
