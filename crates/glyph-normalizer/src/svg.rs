//! SVG outline import.
//!
//! Reads the filled shapes of a single-glyph SVG document and maps them
//! from SVG user space (y down, viewBox units) into font units (y up), with
//! the viewBox height stretched over the em box. Element and group
//! `transform` attributes are applied. Content that has no filled-outline
//! equivalent (strokes, text, images, references) is rejected rather than
//! dropped.

use std::{fs::read_to_string, io::ErrorKind, path::PathBuf};

use kurbo::{Affine, BezPath, Circle, Ellipse, Point, Rect, RoundedRect, Shape};
use xml::{
    attribute::OwnedAttribute,
    reader::{EventReader, XmlEvent},
};

use crate::{Error, Outline, OutlineSource, Result};

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Flattening tolerance for shapes kurbo draws with curves.
const SHAPE_TOLERANCE: f64 = 0.1;

/// Elements whose content is never rendered directly.
const NON_RENDERED: &[&str] = &[
    "defs",
    "symbol",
    "clipPath",
    "mask",
    "pattern",
    "marker",
    "linearGradient",
    "radialGradient",
    "filter",
    "title",
    "desc",
    "metadata",
    "style",
    "script",
];

/// Elements that only group or describe their children.
const CONTAINERS: &[&str] = &["g", "a", "switch"];

/// Vertical font metrics the SVG canvas is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportMetrics {
    pub ascender: f64,
    /// Negative below the baseline.
    pub descender: f64,
}

impl ImportMetrics {
    pub fn new(ascender: f64, descender: f64) -> Self {
        Self { ascender, descender }
    }

    /// Height of the em box in font units.
    pub fn em_height(&self) -> f64 {
        self.ascender - self.descender
    }
}

/// Outline source backed by a directory of `cistercian_NNNN.svg` files.
#[derive(Debug, Clone)]
pub struct SvgDirectory {
    dir: PathBuf,
    metrics: ImportMetrics,
}

impl SvgDirectory {
    pub fn new(dir: impl Into<PathBuf>, metrics: ImportMetrics) -> Self {
        Self { dir: dir.into(), metrics }
    }

    pub fn file_name(numeral: u16) -> String {
        format!("cistercian_{numeral:04}.svg")
    }

    pub fn path_for(&self, numeral: u16) -> PathBuf {
        self.dir.join(Self::file_name(numeral))
    }
}

impl OutlineSource for SvgDirectory {
    fn outline(&self, numeral: u16) -> Result<Option<Outline>> {
        let path = self.path_for(numeral);
        let source = match read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(Error::Read { path, source }),
        };
        parse_svg(&source, &self.metrics).map(Some)
    }
}

/// Per-element drawing state, inherited by children.
#[derive(Debug, Clone, Copy)]
struct Scope {
    transform: Affine,
    filled: bool,
    rendered: bool,
}

/// Parse an SVG document into a font-space outline.
pub fn parse_svg(source: &str, metrics: &ImportMetrics) -> Result<Outline> {
    let mut canvas = None;
    let mut path = BezPath::new();
    let mut scopes: Vec<Scope> = Vec::new();

    for event in EventReader::new(source.as_bytes()) {
        match event.map_err(|e| Error::Malformed(format!("invalid XML: {e}")))? {
            XmlEvent::StartElement { name, attributes, .. } => {
                let element = name.local_name.as_str();
                let foreign = name.namespace.as_deref().is_some_and(|ns| ns != SVG_NAMESPACE);
                let parent = scopes.last().copied();

                let Some(parent) = parent else {
                    if element != "svg" || foreign {
                        return Err(Error::Malformed(format!("root element is <{element}>")));
                    }
                    canvas = Some(Canvas::from_root(&attributes)?);
                    scopes.push(Scope {
                        transform: Affine::IDENTITY,
                        filled: fill_of(&attributes).unwrap_or(true),
                        rendered: true,
                    });
                    continue;
                };

                let transform = match attr(&attributes, "transform") {
                    Some(value) => parent.transform * parse_transform(value)?,
                    None => parent.transform,
                };
                let scope = Scope {
                    transform,
                    filled: fill_of(&attributes).unwrap_or(parent.filled),
                    rendered: parent.rendered && !foreign && !NON_RENDERED.contains(&element),
                };
                scopes.push(scope);

                if !scope.rendered || CONTAINERS.contains(&element) {
                    continue;
                }
                if let Some(mut shape) = shape_path(element, &attributes)? {
                    if !scope.filled {
                        return Err(Error::Malformed(format!("<{element}> has no fill")));
                    }
                    shape.apply_affine(scope.transform);
                    path.extend(shape.elements().iter().copied());
                }
            }
            XmlEvent::EndElement { .. } => {
                scopes.pop();
            }
            _ => {}
        }
    }

    let canvas = canvas.ok_or_else(|| Error::Malformed("missing <svg> root element".into()))?;
    let outline = Outline::new(path);
    if outline.is_empty() {
        return Ok(outline);
    }
    Ok(outline.transformed(canvas.to_font_space(metrics)))
}

/// The path drawn by one SVG element in its own user space.
///
/// `None` for shapes that draw nothing (zero size, missing data). Elements
/// without a filled-outline equivalent are an error.
fn shape_path(element: &str, attributes: &[OwnedAttribute]) -> Result<Option<BezPath>> {
    let number = |name: &str| attr(attributes, name).map(parse_length).transpose();

    let path = match element {
        "path" => match attr(attributes, "d") {
            Some(d) => Some(
                BezPath::from_svg(d)
                    .map_err(|e| Error::Malformed(format!("invalid path data: {e:?}")))?,
            ),
            None => None,
        },
        "polygon" | "polyline" => match attr(attributes, "points") {
            Some(points) => polygon(&parse_numbers(points)?)?,
            None => None,
        },
        "rect" => {
            let x = number("x")?.unwrap_or(0.0);
            let y = number("y")?.unwrap_or(0.0);
            let (Some(width), Some(height)) = (number("width")?, number("height")?) else {
                return Ok(None);
            };
            if width <= 0.0 || height <= 0.0 {
                return Ok(None);
            }
            let rect = Rect::new(x, y, x + width, y + height);
            match (number("rx")?, number("ry")?) {
                (None, None) => Some(rect.to_path(SHAPE_TOLERANCE)),
                (Some(r), None) | (None, Some(r)) => {
                    Some(RoundedRect::from_rect(rect, r).to_path(SHAPE_TOLERANCE))
                }
                (Some(rx), Some(ry)) if rx == ry => {
                    Some(RoundedRect::from_rect(rect, rx).to_path(SHAPE_TOLERANCE))
                }
                (Some(_), Some(_)) => {
                    return Err(Error::Malformed("rect with elliptical corners".into()));
                }
            }
        }
        "circle" => {
            let center = Point::new(number("cx")?.unwrap_or(0.0), number("cy")?.unwrap_or(0.0));
            match number("r")? {
                Some(r) if r > 0.0 => Some(Circle::new(center, r).to_path(SHAPE_TOLERANCE)),
                _ => None,
            }
        }
        "ellipse" => {
            let center = Point::new(number("cx")?.unwrap_or(0.0), number("cy")?.unwrap_or(0.0));
            match (number("rx")?, number("ry")?) {
                (Some(rx), Some(ry)) if rx > 0.0 && ry > 0.0 => {
                    Some(Ellipse::new(center, (rx, ry), 0.0).to_path(SHAPE_TOLERANCE))
                }
                _ => None,
            }
        }
        other => return Err(Error::Malformed(format!("unsupported element <{other}>"))),
    };

    Ok(path.filter(|p| !p.elements().is_empty()))
}

/// The SVG viewport in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Canvas {
    min_x: f64,
    min_y: f64,
    height: Option<f64>,
}

impl Canvas {
    fn from_root(attributes: &[OwnedAttribute]) -> Result<Self> {
        if let Some(view_box) = attr(attributes, "viewBox") {
            let values = parse_numbers(view_box)?;
            let &[min_x, min_y, _width, height] = values.as_slice() else {
                return Err(Error::Malformed(format!("invalid viewBox '{view_box}'")));
            };
            if height <= 0.0 {
                return Err(Error::Malformed(format!("viewBox height must be positive: {height}")));
            }
            return Ok(Self { min_x, min_y, height: Some(height) });
        }

        let height = attr(attributes, "height").map(parse_length).transpose()?;
        Ok(Self { min_x: 0.0, min_y: 0.0, height: height.filter(|h| *h > 0.0) })
    }

    fn to_font_space(self, metrics: &ImportMetrics) -> Affine {
        let scale = self.height.map(|h| metrics.em_height() / h).unwrap_or(1.0);
        Affine::new([
            scale,
            0.0,
            0.0,
            -scale,
            -self.min_x * scale,
            metrics.ascender + self.min_y * scale,
        ])
    }
}

/// Value of an unprefixed attribute.
fn attr<'a>(attributes: &'a [OwnedAttribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name.prefix.is_none() && a.name.local_name == name)
        .map(|a| a.value.as_str())
}

/// Whether an element paints its fill, from `fill` or a `style` declaration.
///
/// `None` when the element does not say, so the parent's value applies.
fn fill_of(attributes: &[OwnedAttribute]) -> Option<bool> {
    let from_style = attr(attributes, "style").and_then(|style| {
        style.split(';').find_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            (property.trim() == "fill").then(|| value.trim())
        })
    });
    from_style.or_else(|| attr(attributes, "fill")).map(|value| value.trim() != "none")
}

fn polygon(numbers: &[f64]) -> Result<Option<BezPath>> {
    if numbers.len() % 2 != 0 {
        return Err(Error::Malformed("odd number of polygon coordinates".into()));
    }
    let mut points = numbers.chunks_exact(2).map(|p| Point::new(p[0], p[1]));
    let Some(first) = points.next() else {
        return Ok(None);
    };
    let mut path = BezPath::new();
    path.move_to(first);
    for point in points {
        path.line_to(point);
    }
    path.close_path();
    Ok(Some(path))
}

/// Parse a `transform` attribute into a single affine, applied left to right.
fn parse_transform(value: &str) -> Result<Affine> {
    let malformed = || Error::Malformed(format!("invalid transform '{value}'"));
    let mut affine = Affine::IDENTITY;
    let mut rest = value.trim();

    while !rest.is_empty() {
        let open = rest.find('(').ok_or_else(malformed)?;
        let close = rest.find(')').ok_or_else(malformed)?;
        if close < open {
            return Err(malformed());
        }
        let name = rest[..open].trim();
        let args = parse_numbers(&rest[open + 1..close])?;

        let step = match (name, args.as_slice()) {
            ("matrix", &[a, b, c, d, e, f]) => Affine::new([a, b, c, d, e, f]),
            ("translate", &[tx]) => Affine::translate((tx, 0.0)),
            ("translate", &[tx, ty]) => Affine::translate((tx, ty)),
            ("scale", &[s]) => Affine::scale(s),
            ("scale", &[sx, sy]) => Affine::scale_non_uniform(sx, sy),
            ("rotate", &[angle]) => Affine::rotate(angle.to_radians()),
            ("rotate", &[angle, cx, cy]) => {
                Affine::translate((cx, cy))
                    * Affine::rotate(angle.to_radians())
                    * Affine::translate((-cx, -cy))
            }
            ("skewX", &[angle]) => Affine::new([1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0]),
            ("skewY", &[angle]) => Affine::new([1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0]),
            _ => return Err(malformed()),
        };
        affine *= step;

        rest = rest[close + 1..].trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    }
    Ok(affine)
}

fn parse_numbers(list: &str) -> Result<Vec<f64>> {
    list.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| Error::Malformed(format!("invalid number '{s}'"))))
        .collect()
}

fn parse_length(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number.parse::<f64>().map_err(|_| Error::Malformed(format!("invalid length '{value}'")))
}
