mod logic;
mod ui;

use crate::{backend_state::Dataset, chart::ScatterChart};
use app_core::frontend::UIParameter;

/// The chart panel. Waits for the dataset from the backend, then owns the
/// chart built from it.
#[derive(Debug)]
pub struct Scatter {
    dataset: UIParameter<Result<Dataset, String>>,
    chart: Option<ScatterChart>,
}

impl Scatter {
    pub fn new() -> Self {
        Self {
            dataset: UIParameter::new(Err("data not loaded".to_string())),
            chart: None,
        }
    }

    pub fn chart(&self) -> Option<&ScatterChart> {
        self.chart.as_ref()
    }
}
