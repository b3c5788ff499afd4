//! The scatter chart: scales, animated axes, marks, tooltips, and the
//! controller that switches the x-axis field.

mod axis;
mod marks;
pub mod scale;
pub mod transition;
mod tooltip;

use std::{fmt::Display, str::FromStr};

use svg_export::Margins;

use crate::backend_state::Dataset;

pub use axis::{AxisRenderer, TickMark, TICK_COUNT};
pub use marks::{mark_at, place_marks, render_marks, Mark};
pub use scale::LinearScale;
pub use tooltip::{format_number, TooltipBinder};

pub const SVG_WIDTH: f64 = 800.0;
pub const SVG_HEIGHT: f64 = 500.0;
pub const MARGIN: Margins = Margins {
    top: 20.0,
    right: 40.0,
    bottom: 100.0,
    left: 40.0,
};
pub const PLOT_WIDTH: f64 = SVG_WIDTH - MARGIN.left - MARGIN.right;
pub const PLOT_HEIGHT: f64 = SVG_HEIGHT - MARGIN.top - MARGIN.bottom;

/// Seconds.
pub const TRANSITION_DURATION: f64 = 1.0;

pub const MARK_RADIUS: f64 = 10.0;
pub const MARK_FILL: &str = "blue";
pub const MARK_OPACITY: f64 = 0.5;

/// Name of the y field in tooltips.
pub const Y_LABEL: &str = "Healthcare (%)";
pub const Y_AXIS_TITLE: &str = "Lacks Healthcare (%)";

/// The fields the x-axis can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AxisField {
    #[default]
    Poverty,
    Age,
    Income,
}

impl AxisField {
    /// In the order the labels are stacked below the axis.
    pub const ALL: [AxisField; 3] = [AxisField::Poverty, AxisField::Age, AxisField::Income];

    /// Column name in the data file.
    pub fn key(&self) -> &'static str {
        match self {
            AxisField::Poverty => "poverty",
            AxisField::Age => "age",
            AxisField::Income => "income",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AxisField::Poverty => "In Poverty (%)",
            AxisField::Age => "Age (Median)",
            AxisField::Income => "Household Income (Median)",
        }
    }

    fn index(&self) -> usize {
        match self {
            AxisField::Poverty => 0,
            AxisField::Age => 1,
            AxisField::Income => 2,
        }
    }
}

impl Display for AxisField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for AxisField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| format!("unknown axis field '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelState {
    Active,
    Inactive,
}

impl LabelState {
    /// Style class used in the SVG export.
    pub fn class(&self) -> &'static str {
        match self {
            LabelState::Active => "active",
            LabelState::Inactive => "inactive",
        }
    }
}

/// Chart state for one dataset. Owns the chosen x field and switches it on
/// label clicks, re-running every renderer that depends on it.
#[derive(Debug, Clone)]
pub struct ScatterChart {
    dataset: Dataset,
    chosen_x: AxisField,
    x_scale: LinearScale,
    y_scale: LinearScale,
    x_axis: AxisRenderer,
    y_axis: AxisRenderer,
    marks: Vec<Mark>,
    tooltip: TooltipBinder,
    labels: [LabelState; 3],
    redraw_count: usize,
}

impl ScatterChart {
    /// Initial chart with the x-axis bound to poverty. Nothing is animated.
    pub fn new(dataset: Dataset) -> Self {
        let chosen_x = AxisField::default();
        let x_scale = scale::x_scale(&dataset, chosen_x);
        let y_scale = scale::y_scale(&dataset);
        let marks = place_marks(&dataset, &x_scale, &y_scale, chosen_x);
        let mut chart = Self {
            x_axis: AxisRenderer::new(x_scale),
            y_axis: AxisRenderer::new(y_scale),
            dataset,
            chosen_x,
            x_scale,
            y_scale,
            marks,
            tooltip: TooltipBinder::new(chosen_x),
            labels: [LabelState::Inactive; 3],
            redraw_count: 0,
        };
        chart.restyle_labels();
        chart
    }

    /// Switch the x-axis to `field`, animating from `now`. Selecting the
    /// field already shown does nothing and returns `false`.
    pub fn select_x_axis(&mut self, field: AxisField, now: f64) -> bool {
        if field == self.chosen_x {
            return false;
        }
        log::info!("switching x axis from {} to {}", self.chosen_x, field);

        self.chosen_x = field;
        self.x_scale = scale::x_scale(&self.dataset, field);
        // The y field never changes, so this yields the same scale and the
        // y axis render below is a no-op.
        self.y_scale = scale::y_scale(&self.dataset);
        self.x_axis.render(&self.x_scale, now);
        self.y_axis.render(&self.y_scale, now);
        render_marks(&mut self.marks, &self.dataset, &self.x_scale, field, now);
        self.tooltip.bind(field);
        self.restyle_labels();

        self.redraw_count += 1;
        true
    }

    fn restyle_labels(&mut self) {
        for field in AxisField::ALL {
            self.labels[field.index()] = if field == self.chosen_x {
                LabelState::Active
            } else {
                LabelState::Inactive
            };
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn chosen_x(&self) -> AxisField {
        self.chosen_x
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x_scale
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y_scale
    }

    pub fn x_axis(&self) -> &AxisRenderer {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &AxisRenderer {
        &self.y_axis
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn tooltip(&self) -> &TooltipBinder {
        &self.tooltip
    }

    pub fn label_state(&self, field: AxisField) -> LabelState {
        self.labels[field.index()]
    }

    /// Number of accepted axis changes.
    pub fn redraw_count(&self) -> usize {
        self.redraw_count
    }

    /// Tooltip lines for the mark at `index`.
    pub fn tooltip_lines(&self, index: usize) -> Option<Vec<String>> {
        self.dataset
            .records()
            .get(index)
            .map(|record| self.tooltip.lines(record))
    }

    /// Mark under a position in plot coordinates.
    pub fn mark_at(&self, pos: [f64; 2], now: f64) -> Option<usize> {
        mark_at(&self.marks, pos, now)
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.x_axis.is_running(now)
            || self.y_axis.is_running(now)
            || self.marks.iter().any(|mark| mark.is_moving(now))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backend_state::Record;

    /// Records `S0`, `S1`, ... with the given poverty and age values. Income
    /// is `1000 * (i + 1)` and healthcare `5 * (i + 1)`. Missing ages are NaN.
    pub fn dataset(poverty: &[f64], age: &[f64]) -> Dataset {
        let records = poverty
            .iter()
            .enumerate()
            .map(|(i, &poverty)| {
                let n = (i + 1) as f64;
                Record {
                    state: format!("State {i}"),
                    abbr: format!("S{i}"),
                    poverty,
                    age: age.get(i).copied().unwrap_or(f64::NAN),
                    income: 1000.0 * n,
                    obesity: 20.0,
                    smokes: 15.0,
                    healthcare: 5.0 * n,
                }
            })
            .collect();
        Dataset::new(records)
    }

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn active_labels(chart: &ScatterChart) -> Vec<AxisField> {
        AxisField::ALL
            .into_iter()
            .filter(|field| chart.label_state(*field) == LabelState::Active)
            .collect()
    }

    #[test]
    fn test_geometry() {
        assert_eq!(PLOT_WIDTH, 720.0);
        assert_eq!(PLOT_HEIGHT, 380.0);
    }

    #[test]
    fn test_axis_field_lookup() {
        assert_eq!("income".parse::<AxisField>(), Ok(AxisField::Income));
        assert!("healthcare".parse::<AxisField>().is_err());
        assert_eq!(AxisField::Age.to_string(), "age");
        assert_eq!(AxisField::Poverty.label(), "In Poverty (%)");
        assert_eq!(LabelState::Inactive.class(), "inactive");
    }

    #[test]
    fn test_initial_state() {
        let chart = ScatterChart::new(dataset(&[10.0, 20.0, 30.0], &[30.0, 40.0, 50.0]));
        assert_eq!(chart.chosen_x(), AxisField::Poverty);
        assert_eq!(active_labels(&chart), vec![AxisField::Poverty]);
        assert_eq!(chart.x_scale().domain()[0], 10.0 * 0.8);
        assert_eq!(chart.redraw_count(), 0);
        assert!(!chart.is_animating(0.0));
        assert_eq!(chart.marks().len(), 3);
    }

    #[test]
    fn test_select_active_field_is_noop() {
        init();
        let mut chart = ScatterChart::new(dataset(&[10.0, 20.0, 30.0], &[30.0, 40.0, 50.0]));
        assert!(!chart.select_x_axis(AxisField::Poverty, 0.0));
        assert_eq!(chart.redraw_count(), 0);
        assert!(!chart.is_animating(0.0));
    }

    #[test]
    fn test_switch_to_age() {
        init();
        let mut chart = ScatterChart::new(dataset(&[10.0, 20.0, 30.0], &[30.0, 40.0, 50.0]));
        let y_before = *chart.y_scale();

        assert!(chart.select_x_axis(AxisField::Age, 0.0));
        assert_eq!(chart.redraw_count(), 1);
        assert_eq!(chart.chosen_x(), AxisField::Age);

        let [d0, d1] = chart.x_scale().domain();
        assert!((d0 - 24.0).abs() < 1e-9);
        assert!((d1 - 60.0).abs() < 1e-9);
        assert_eq!(chart.x_axis().scale(), chart.x_scale());

        // y is rebuilt but unchanged and its axis does not animate
        assert_eq!(*chart.y_scale(), y_before);
        assert!(!chart.y_axis().is_running(0.5));
        assert!(chart.is_animating(0.5));

        for (mark, record) in chart.marks().iter().zip(chart.dataset().iter()) {
            assert_eq!(mark.target_x(), chart.x_scale().map(record.age));
        }
        assert_eq!(
            chart.tooltip_lines(0),
            Some(vec![
                "S0".to_string(),
                "Age (Median):30".to_string(),
                "Healthcare (%):5".to_string()
            ])
        );
        assert_eq!(active_labels(&chart), vec![AxisField::Age]);

        // clicking the same label again changes nothing
        assert!(!chart.select_x_axis(AxisField::Age, 0.2));
        assert_eq!(chart.redraw_count(), 1);
        assert!(!chart.is_animating(1.0));
    }

    #[test]
    fn test_exactly_one_active_label() {
        let mut chart = ScatterChart::new(dataset(&[10.0, 20.0, 30.0], &[30.0, 40.0, 50.0]));
        let clicks = [
            AxisField::Income,
            AxisField::Income,
            AxisField::Poverty,
            AxisField::Age,
            AxisField::Poverty,
        ];
        for (i, field) in clicks.into_iter().enumerate() {
            chart.select_x_axis(field, i as f64 * 0.3);
            assert_eq!(active_labels(&chart), vec![field]);
            assert_eq!(chart.tooltip().field(), field);
        }
        assert_eq!(chart.redraw_count(), 4);
    }

    #[test]
    fn test_tooltip_lines_out_of_range() {
        let chart = ScatterChart::new(dataset(&[1.0], &[1.0]));
        assert!(chart.tooltip_lines(1).is_none());
    }
}
