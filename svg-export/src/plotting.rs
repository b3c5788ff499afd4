use crate::svg::{self, opts, Params, Tag};

/// The basic plotting primitive. Can be converted into a Vec of `svg::Tag`.
trait Element {
    /// Convert `Element` into a Vec of `svg::Tag`.
    ///
    /// All elements are placed relative to an axis which itself is sized and
    /// placed relative to a figure. For correct placement, the axis and figure
    /// thus have to be passed into the function.
    fn to_tags(&self, ax: &Axis, fig: &Figure) -> Vec<Box<dyn svg::RenderTag>>;
}

// ----------------------------------------------------------------------------
//
//
// Figure
//
//
// ----------------------------------------------------------------------------

/// The Figure defines the overall size of a plot and holds the axes.
pub struct Figure {
    width: u64,
    height: u64,
    axes: Vec<Axis>,
}

impl Figure {
    pub fn empty(width: u64, height: u64) -> Self {
        Self {
            width,
            height,
            axes: Vec::new(),
        }
    }

    pub fn width(&self) -> u64 {
        self.width
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn add_axis(&mut self, ax: Axis) {
        self.axes.push(ax);
    }

    /// Render this `Figure` to raw SVG markup.
    pub fn render(&self) -> String {
        let mut root = Tag::<svg::SVG>::new(self.width, self.height, None);
        for ax in self.axes.iter() {
            root.add_children(ax.to_tags(self));
        }
        crate::svg::render(&root)
    }
}

/// Pixel distance between the figure border and the axis area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

// ----------------------------------------------------------------------------
//
//
// Axis
//
//
// ----------------------------------------------------------------------------

/// The container for plots and other elements.
pub struct Axis {
    elements: Vec<Box<dyn Element>>,
    /// Selectable x-axis labels, stacked below the axis. The flag marks the
    /// active one.
    xlabels: Vec<(String, bool)>,
    ylabel: String,
    limits: [f64; 4],
    pub ticks: Ticks,
    /// u coordinate for placement in Figure, normalized to [0, 1]
    u: f64,
    /// v coordinate for placement in Figure, normalized to [0, 1]
    v: f64,
    width: f64,
    height: f64,
}

impl Axis {
    pub fn new(u: f64, v: f64, width: f64, height: f64) -> Self {
        Axis {
            u,
            v,
            width,
            height,
            limits: [0.0, 1.0, 0.0, 1.0],
            ticks: Default::default(),
            elements: Vec::new(),
            xlabels: Vec::new(),
            ylabel: String::new(),
        }
    }

    /// Place the axis inside a figure of the given size, leaving `margins`
    /// (in pixels) free on each side.
    pub fn from_margins(fig_width: u64, fig_height: u64, margins: Margins) -> Self {
        let (fw, fh) = (fig_width as f64, fig_height as f64);
        Self::new(
            margins.left / fw,
            margins.top / fh,
            (fw - margins.left - margins.right) / fw,
            (fh - margins.top - margins.bottom) / fh,
        )
    }

    pub fn xlim(&mut self, xmin: f64, xmax: f64) {
        self.limits[0] = xmin;
        self.limits[1] = xmax;
    }

    pub fn ylim(&mut self, ymin: f64, ymax: f64) {
        self.limits[2] = ymin;
        self.limits[3] = ymax;
    }

    pub fn with_xlim(mut self, xmin: f64, xmax: f64) -> Self {
        self.xlim(xmin, xmax);
        self
    }

    pub fn with_ylim(mut self, ymin: f64, ymax: f64) -> Self {
        self.ylim(ymin, ymax);
        self
    }

    pub fn with_xticks(mut self, positions: Vec<f64>) -> Self {
        self.ticks.xpos = positions;
        self
    }

    pub fn with_yticks(mut self, positions: Vec<f64>) -> Self {
        self.ticks.ypos = positions;
        self
    }

    /// Append a selectable x-axis label. Labels are stacked in the order
    /// they are added.
    pub fn with_xlabel(mut self, text: &str, active: bool) -> Self {
        self.xlabels.push((text.to_owned(), active));
        self
    }

    pub fn with_ylabel(mut self, text: &str) -> Self {
        self.ylabel = text.to_owned();
        self
    }

    pub fn add_scatter(&mut self, scatter: ScatterPlot) {
        self.elements.push(Box::new(scatter));
    }

    pub fn insert_into(self, fig: &mut Figure) {
        fig.add_axis(self);
    }

    /// Returns the maps from normalized axis coordinates to figure pixels
    /// (`x`, `y`) and from data to normalized axis coordinates (`u`, `v`).
    fn transformations(
        &self,
        fig: &Figure,
    ) -> (
        impl Fn(f64) -> f64,
        impl Fn(f64) -> f64,
        impl Fn(f64) -> f64,
        impl Fn(f64) -> f64,
    ) {
        let (fw, fh) = (fig.width, fig.height);
        let (au, av, aw, ah) = (self.u, self.v, self.width, self.height);
        let [xmin, xmax, ymin, ymax] = self.limits;

        let x = move |u| fw as f64 * (au + u * aw);
        let y = move |v| fh as f64 * (av + v * ah);
        let u = move |x| normalize(x, xmin, xmax);
        let v = move |y| 1.0 - normalize(y, ymin, ymax);

        (x, y, u, v)
    }

    /// Convert `Axis` into a Vec of `svg::Tag`.
    ///
    /// Since we only need the figure for placing `Axis`, `Axis` is not an
    /// `Element` and implements this function without using the trait.
    fn to_tags(&self, fig: &Figure) -> Vec<Box<dyn svg::RenderTag>> {
        let (x, y, _, _) = self.transformations(fig);

        let mut children: Vec<Box<dyn svg::RenderTag>> = Vec::new();
        children.extend(self.ticks.to_tags(self, fig));
        children.extend(self.elements.iter().flat_map(|el| el.to_tags(self, fig)));

        // Selectable x labels, 20 px apart, starting 40 px below the axis.
        let bottom = y(1.0);
        for (i, (text, active)) in self.xlabels.iter().enumerate() {
            let (class, style) = if *active {
                ("active", [("text-anchor", "middle"), ("font-weight", "bold")])
            } else {
                ("inactive", [("text-anchor", "middle"), ("fill", "#aaa")])
            };
            let label = Tag::<svg::Text>::new(
                x(0.5),
                bottom + 40.0 + 20.0 * i as f64,
                0.0,
                text,
                opts(&style),
            )
            .with_param("class", class);
            children.push(Box::new(label));
        }

        if !self.ylabel.is_empty() {
            let ylabel = Tag::<svg::Text>::new(
                x(0.0) - 24.0,
                y(0.5),
                270.0,
                &self.ylabel,
                opts(&[("text-anchor", "middle")]),
            )
            .with_param("class", "axis-text");
            children.push(Box::new(ylabel));
        }

        let mut group = Tag::<svg::Group>::new(0.0, 0.0, None);
        group.add_children(children);
        vec![Box::new(group)]
    }
}

// ----------------------------------------------------------------------------
//
//
// Ticks
//
//
// ----------------------------------------------------------------------------

/// The ticks of the axes. Includes the axis domain lines, ticks and tick
/// labels.
pub struct Ticks {
    pub xpos: Vec<f64>,
    pub ypos: Vec<f64>,
    /// Tick length in pixels.
    pub size: f64,
    color: String,
    linewidth: f64,
}

impl Default for Ticks {
    fn default() -> Self {
        Self {
            xpos: Vec::new(),
            ypos: Vec::new(),
            size: 6.0,
            color: "black".to_string(),
            linewidth: 1.0,
        }
    }
}

impl Element for Ticks {
    fn to_tags(&self, ax: &Axis, fig: &Figure) -> Vec<Box<dyn svg::RenderTag>> {
        let (x, y, u, v) = ax.transformations(fig);

        let width_param = format!("{}", self.linewidth);
        let style = [
            ("stroke", &self.color[..]),
            ("stroke-width", &width_param[..]),
        ];
        let style_xtick_label = [("text-anchor", "middle"), ("font-size", "10px")];
        let style_ytick_label = [("text-anchor", "end"), ("font-size", "10px")];

        let mut tags: Vec<Box<dyn svg::RenderTag>> = Vec::new();

        // Domain lines along the bottom and left edge.
        let (left, right, top, bottom) = (x(0.0), x(1.0), y(0.0), y(1.0));
        tags.push(Box::new(Tag::<svg::Line>::new(
            left,
            right,
            bottom,
            bottom,
            opts(&style),
        )));
        tags.push(Box::new(Tag::<svg::Line>::new(
            left,
            left,
            top,
            bottom,
            opts(&style),
        )));

        for (&xi, li) in self.xpos.iter().zip(format_ticks(&self.xpos)) {
            let px = x(u(xi));
            if !px.is_finite() {
                continue;
            }
            let lt = Tag::<svg::Line>::new(px, px, bottom, bottom + self.size, opts(&style));
            let tt = Tag::<svg::Text>::new(
                px,
                bottom + self.size + 12.0,
                0.0,
                &li,
                opts(&style_xtick_label),
            );
            tags.push(Box::new(lt));
            tags.push(Box::new(tt));
        }

        for (&yi, li) in self.ypos.iter().zip(format_ticks(&self.ypos)) {
            let py = y(v(yi));
            if !py.is_finite() {
                continue;
            }
            let lt = Tag::<svg::Line>::new(left - self.size, left, py, py, opts(&style));
            let tt = Tag::<svg::Text>::new(
                left - self.size - 3.0,
                py + 3.0,
                0.0,
                &li,
                opts(&style_ytick_label),
            );
            tags.push(Box::new(lt));
            tags.push(Box::new(tt));
        }

        tags
    }
}

// ----------------------------------------------------------------------------
//
//
// ScatterPlot
//
//
// ----------------------------------------------------------------------------

/// Circle markers with an optional text label on top and a hover tooltip
/// (an SVG `<title>`) for each point.
#[derive(Clone)]
pub struct ScatterPlot {
    xs: Vec<f64>,
    ys: Vec<f64>,
    labels: Vec<String>,
    tooltips: Vec<String>,
    radius: f64,
    style: Params,
}

impl ScatterPlot {
    pub fn new(xs: &[f64], ys: &[f64]) -> Self {
        Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            labels: Vec::new(),
            tooltips: Vec::new(),
            radius: 5.0,
            style: Params::new(),
        }
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_tooltips(mut self, tooltips: Vec<String>) -> Self {
        self.tooltips = tooltips;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.style.insert("fill".to_string(), color.to_string());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.style
            .insert("opacity".to_string(), format!("{opacity}"));
        self
    }

    pub fn insert_into(self, mut ax: Axis) -> Axis {
        ax.add_scatter(self);
        ax
    }
}

impl Element for ScatterPlot {
    fn to_tags(&self, ax: &Axis, fig: &Figure) -> Vec<Box<dyn svg::RenderTag>> {
        let (x, y, u, v) = ax.transformations(fig);
        let mut circles: Vec<Box<dyn svg::RenderTag>> = Vec::new();
        let mut labels: Vec<Box<dyn svg::RenderTag>> = Vec::new();

        for (i, (xi, yi)) in self.xs.iter().zip(self.ys.iter()).enumerate() {
            let (px, py) = (x(u(*xi)), y(v(*yi)));
            // NaN coordinates are invalid SVG, such points are not drawn.
            if !px.is_finite() || !py.is_finite() {
                log::debug!("skipping point {i} at non-finite position ({px}, {py})");
                continue;
            }
            let mut circle = Tag::<svg::Circle>::new(px, py, self.radius, Some(self.style.clone()));
            if let Some(tooltip) = self.tooltips.get(i) {
                circle.add_child(Tag::<svg::Title>::new(tooltip));
            }
            circles.push(Box::new(circle));

            if let Some(label) = self.labels.get(i) {
                let text = Tag::<svg::Text>::new(
                    px,
                    py + 3.5,
                    0.0,
                    label,
                    opts(&[
                        ("text-anchor", "middle"),
                        ("font-size", "10px"),
                        ("fill", "white"),
                    ]),
                )
                .with_param("class", "stateAbbr");
                labels.push(Box::new(text));
            }
        }

        // Labels go last so they are drawn on top of every circle.
        circles.extend(labels);
        circles
    }
}

// ----------------------------------------------------------------------------
//
//
// Helpers
//
//
// ----------------------------------------------------------------------------

/// Position of `value` between `min` (0) and `max` (1). Zero-width limits
/// put every value in the middle.
fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 {
        0.5
    } else {
        (value - min) / span
    }
}

/// Format tick positions with a common number of decimals derived from the
/// tick step, and group thousands with commas.
pub fn format_ticks(tick_positions: &[f64]) -> Vec<String> {
    let precision = tick_precision(tick_positions);
    tick_positions
        .iter()
        .map(|z| group_thousands(&format!("{z:.precision$}")))
        .collect()
}

fn tick_precision(tick_positions: &[f64]) -> usize {
    let step = match tick_positions {
        [first, second, ..] => (second - first).abs(),
        [single] => single.abs(),
        [] => return 0,
    };
    if !step.is_finite() || step == 0.0 {
        return 0;
    }
    let magnitude = step.log10().floor();
    if magnitude < 0.0 {
        -magnitude as usize
    } else {
        0
    }
}

fn group_thousands(raw: &str) -> String {
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };
    if !int_part.chars().all(|c| c.is_ascii_digit()) {
        // NaN or inf, leave as is.
        return raw.to_string();
    }

    let mut grouped = String::with_capacity(raw.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
