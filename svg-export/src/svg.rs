// This code is a thin Rust wrapper to handle SVG tags
// and render the results to *.svg files.

use std::fmt::Write;

// ----------------------------------------------------------------------------
//
//
// Rust representation and rendering of SVG tags.
//
//
// ----------------------------------------------------------------------------

/// Attributes are kept sorted so rendering is deterministic.
pub type Params = std::collections::BTreeMap<String, String>;

pub trait RenderTag: std::fmt::Debug {
    fn render(&self, buf: &mut String);
}

impl<T> RenderTag for Tag<T>
where
    T: Identifier + std::fmt::Debug,
{
    fn render(&self, buf: &mut String) {
        write!(buf, "<{}", self.kind.identifier()).expect(FAILED_STRING_WRITE);
        for (k, v) in self.parameters.iter() {
            write!(buf, " {k}=\"{}\"", escape(v)).expect(FAILED_STRING_WRITE);
        }
        if !self.style.is_empty() {
            let style: Vec<_> = self.style.iter().map(|(k, v)| format!("{k}:{v}")).collect();
            write!(buf, " style=\"{}\"", escape(&style.join(";"))).expect(FAILED_STRING_WRITE);
        }
        if self.children.is_empty() {
            buf.push_str(" />");
            return;
        }
        buf.push('>');
        for c in self.children.iter() {
            c.render(buf);
        }
        write!(buf, "</{}>", self.kind.identifier()).expect(FAILED_STRING_WRITE);
    }
}

/// Character data. Escaped when rendered.
#[derive(Debug)]
struct Content(String);

impl RenderTag for Content {
    fn render(&self, buf: &mut String) {
        buf.push_str(&escape(&self.0));
    }
}

pub fn render(svg_tag: &Tag<SVG>) -> String {
    let mut raw_svg = String::new();
    svg_tag.render(&mut raw_svg);
    raw_svg
}

/// Escape text for use as XML character data or attribute value.
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for chr in raw.chars() {
        match chr {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(chr),
        }
    }
    escaped
}

#[derive(Debug)]
pub struct Tag<T>
where
    T: std::fmt::Debug,
{
    parameters: Params,
    style: Params,
    children: Vec<Box<dyn RenderTag>>,
    kind: T,
}

impl<T> Tag<T>
where
    T: std::fmt::Debug,
{
    fn with_kind(kind: T, parameters: Params, style: Option<Params>) -> Self {
        Self {
            parameters,
            style: style.unwrap_or_default(),
            children: Vec::new(),
            kind,
        }
    }

    pub fn add_child(&mut self, child: impl RenderTag + 'static) {
        self.children.push(Box::new(child));
    }

    pub fn add_children(&mut self, children: Vec<Box<dyn RenderTag>>) {
        self.children.extend(children);
    }

    pub fn set_param(&mut self, key: &str, value: &str) {
        self.parameters.insert(key.to_string(), value.to_string());
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.set_param(key, value);
        self
    }
}

fn params(items: Vec<(&str, String)>) -> Params {
    items.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

// ----------------------------------------------------------------------------
//
//
// Creation of `new` tags.
//
//
// ----------------------------------------------------------------------------

impl Tag<SVG> {
    pub fn new(width: u64, height: u64, style: Option<Params>) -> Self {
        let parameters = params(vec![
            ("width", format!("{width}")),
            ("height", format!("{height}")),
            ("viewBox", format!("0 0 {width} {height}")),
            ("xmlns", "http://www.w3.org/2000/svg".to_string()),
        ]);
        Self::with_kind(SVG {}, parameters, style)
    }
}

impl Tag<Group> {
    pub fn new(x: f64, y: f64, style: Option<Params>) -> Self {
        let parameters = params(vec![("transform", format!("translate({x},{y})"))]);
        Self::with_kind(Group {}, parameters, style)
    }
}

impl Tag<Circle> {
    pub fn new(cx: f64, cy: f64, r: f64, style: Option<Params>) -> Self {
        let parameters = params(vec![
            ("cx", format!("{cx}")),
            ("cy", format!("{cy}")),
            ("r", format!("{r}")),
        ]);
        Self::with_kind(Circle {}, parameters, style)
    }
}

impl Tag<Text> {
    pub fn new(x: f64, y: f64, angle: f64, text: &str, style: Option<Params>) -> Self {
        let parameters = params(vec![(
            "transform",
            format!("translate({x},{y}) rotate({angle})"),
        )]);
        let mut res = Self::with_kind(Text {}, parameters, style);
        res.add_child(Content(text.to_string()));
        res
    }
}

impl Tag<Title> {
    pub fn new(text: &str) -> Self {
        let mut res = Self::with_kind(Title {}, Params::new(), None);
        res.add_child(Content(text.to_string()));
        res
    }
}

impl Tag<Line> {
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64, style: Option<Params>) -> Self {
        let parameters = params(vec![
            ("x1", format!("{x1}")),
            ("x2", format!("{x2}")),
            ("y1", format!("{y1}")),
            ("y2", format!("{y2}")),
            ("stroke", "black".to_string()),
        ]);
        Self::with_kind(Line {}, parameters, style)
    }
}

// ----------------------------------------------------------------------------
//
//
// SVG tag kinds and their str representation (`identifier`)
//
//
// ----------------------------------------------------------------------------

#[derive(Debug)]
pub struct SVG {}
#[derive(Debug)]
pub struct Group {}
#[derive(Debug)]
pub struct Circle {}
#[derive(Debug)]
pub struct Text {}
#[derive(Debug)]
pub struct Title {}
#[derive(Debug)]
pub struct Line {}

pub trait Identifier {
    fn identifier(&self) -> &'static str;
}

impl Identifier for SVG {
    fn identifier(&self) -> &'static str {
        "svg"
    }
}

impl Identifier for Group {
    fn identifier(&self) -> &'static str {
        "g"
    }
}

impl Identifier for Circle {
    fn identifier(&self) -> &'static str {
        "circle"
    }
}

impl Identifier for Text {
    fn identifier(&self) -> &'static str {
        "text"
    }
}

impl Identifier for Title {
    fn identifier(&self) -> &'static str {
        "title"
    }
}

impl Identifier for Line {
    fn identifier(&self) -> &'static str {
        "line"
    }
}

const FAILED_STRING_WRITE: &str = "Failed to write into string.";

pub fn opts(items: &[(&str, &str)]) -> Option<Params> {
    Some(
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}
