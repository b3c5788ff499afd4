use std::path::Path;

use app_core::{
    backend::{BackendEventLoop, BackendLink, LinkReceiver},
    string_error::ErrorStringExt,
};
use svg_export::{Axis, Figure, ScatterPlot};

use crate::{
    app::DynRequestSender,
    backend_state::Dataset,
    chart::{
        AxisField, LabelState, ScatterChart, MARGIN, MARK_FILL, MARK_OPACITY, MARK_RADIUS,
        SVG_HEIGHT, SVG_WIDTH, TICK_COUNT, Y_AXIS_TITLE,
    },
    BackendAppState,
};

impl super::Scatter {
    /// Ask the backend to load the dataset from its configured path.
    pub fn load(&mut self, request_tx: &mut DynRequestSender) {
        match load_dataset(request_tx) {
            Ok(rx) => self.dataset.set_recv(rx),
            Err(err) => {
                log::error!("{}", err);
                *self.dataset.value_mut() = Err(err);
            }
        }
    }

    /// Poll for the dataset. Builds the chart once it arrives and returns
    /// `true` if anything changed.
    pub fn try_update(&mut self) -> bool {
        if !self.dataset.try_update() {
            return false;
        }
        match self.dataset.value() {
            Ok(dataset) => self.chart = Some(ScatterChart::new(dataset.clone())),
            Err(err) => log::error!("no chart to show: {}", err),
        }
        true
    }

    pub fn select_x_axis(&mut self, field: AxisField, now: f64) -> Result<bool, String> {
        let Some(chart) = self.chart.as_mut() else {
            return Err(format!("cannot select x axis '{field}': no data loaded"));
        };
        Ok(chart.select_x_axis(field, now))
    }

    pub fn save_svg(&self, path: &Path) -> Result<(), String> {
        log::debug!("requested to save svg at '{:?}'", path);
        let Some(chart) = self.chart.as_ref() else {
            return Err("cannot export svg: no data loaded".to_string());
        };
        let raw = build_figure(chart).render();
        std::fs::write(path, raw).err_to_string(&format!("could not write svg file {:?}", path))
    }
}

fn load_dataset(
    request_tx: &mut DynRequestSender,
) -> Result<LinkReceiver<Result<Dataset, String>>, String> {
    let (rx, linker) = BackendLink::new(
        "load dataset",
        |b: &mut BackendEventLoop<BackendAppState>| {
            Dataset::from_path(b.state.data_path()).map_err(|err| {
                log::error!("{}", err);
                err
            })
        },
    );
    request_tx
        .send(Box::new(linker))
        .err_to_string(app_core::BACKEND_HUNG_UP_MSG)?;
    Ok(rx)
}

/// The chart as a static figure, with everything at its final position.
pub fn build_figure(chart: &ScatterChart) -> Figure {
    let [xmin, xmax] = chart.x_scale().domain();
    let [ymin, ymax] = chart.y_scale().domain();

    let mut fig = Figure::empty(SVG_WIDTH as u64, SVG_HEIGHT as u64);
    let mut ax = Axis::from_margins(fig.width(), fig.height(), MARGIN)
        .with_xlim(xmin, xmax)
        .with_ylim(ymin, ymax)
        .with_xticks(chart.x_scale().ticks(TICK_COUNT))
        .with_yticks(chart.y_scale().ticks(TICK_COUNT))
        .with_ylabel(Y_AXIS_TITLE);
    for field in AxisField::ALL {
        ax = ax.with_xlabel(field.label(), chart.label_state(field) == LabelState::Active);
    }

    let dataset = chart.dataset();
    let xs: Vec<f64> = dataset.iter().map(|r| r.x_value(chart.chosen_x())).collect();
    let ys: Vec<f64> = dataset.iter().map(|r| r.healthcare).collect();
    let labels = dataset.iter().map(|r| r.abbr.clone()).collect();
    let tooltips = dataset
        .iter()
        .map(|r| chart.tooltip().lines(r).join("\n"))
        .collect();

    let scatter = ScatterPlot::new(&xs, &ys)
        .with_labels(labels)
        .with_tooltips(tooltips)
        .with_radius(MARK_RADIUS)
        .with_color(MARK_FILL)
        .with_opacity(MARK_OPACITY);
    ax.add_scatter(scatter);
    ax.insert_into(&mut fig);
    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::components::Scatter, Record};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn record(abbr: &str, poverty: f64, income: f64, healthcare: f64) -> Record {
        Record {
            state: String::new(),
            abbr: abbr.to_string(),
            poverty,
            age: 35.0,
            income,
            obesity: 0.0,
            smokes: 0.0,
            healthcare,
        }
    }

    fn chart() -> ScatterChart {
        ScatterChart::new(Dataset::new(vec![
            record("CA", 16.4, 55000.0, 12.0),
            record("A&B", 10.0, 40000.0, 8.0),
            record("NV", f64::NAN, 50000.0, 10.0),
        ]))
    }

    #[test]
    fn test_build_figure() {
        init();
        let mut chart = chart();
        chart.select_x_axis(AxisField::Income, 0.0);
        let raw = build_figure(&chart).render();

        assert!(raw.starts_with("<svg"));
        assert!(raw.contains("width=\"800\""));
        assert_eq!(raw.matches("<circle").count(), 3);
        assert!(raw.contains(
            "<title>CA\nHousehold Income (Median):55000\nHealthcare (%):12</title>"
        ));
        assert!(raw.contains(">A&amp;B</text>"));
        assert!(raw.contains(">Household Income (Median)</text>"));
        assert_eq!(raw.matches("class=\"active\"").count(), 1);
        assert_eq!(raw.matches("class=\"inactive\"").count(), 2);
        assert!(raw.contains(">Lacks Healthcare (%)</text>"));
        assert!(raw.contains(">40,000</text>"));
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        init();
        let raw = build_figure(&chart()).render();
        // NV has no poverty value
        assert_eq!(raw.matches("<circle").count(), 2);
        assert!(!raw.contains("NaN"));
    }

    #[test]
    fn test_flat_x_domain_matches_chart_positions() {
        init();
        // every record has the same poverty value, so the x domain is [0, 0]
        let chart = ScatterChart::new(Dataset::new(vec![
            record("AA", 0.0, 1000.0, 8.0),
            record("BB", 0.0, 2000.0, 12.0),
        ]));
        assert_eq!(chart.x_scale().domain(), [0.0, 0.0]);

        let raw = build_figure(&chart).render();
        let exported: Vec<f64> = raw
            .split("cx=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next()?.parse().ok())
            .collect();
        assert_eq!(exported.len(), 2);
        for (mark, cx) in chart.marks().iter().zip(exported) {
            let on_screen = mark.x_at(0.0) + MARGIN.left;
            assert_eq!(on_screen, 400.0);
            assert!((cx - on_screen).abs() < 1e-9, "{cx} != {on_screen}");
        }
    }

    #[test]
    fn test_save_svg() {
        init();
        let mut scatter = Scatter::new();
        let path = std::env::temp_dir().join("health_scatter_test_save.svg");
        assert!(scatter.save_svg(&path).is_err());
        assert!(scatter.select_x_axis(AxisField::Age, 0.0).is_err());

        scatter.chart = Some(chart());
        assert_eq!(scatter.select_x_axis(AxisField::Age, 0.0), Ok(true));
        scatter.save_svg(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("<circle"));
        let _ = std::fs::remove_file(&path);
    }
}
