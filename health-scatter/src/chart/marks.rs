use crate::backend_state::Dataset;

use super::{scale::LinearScale, transition::Transition, AxisField, MARK_RADIUS, TRANSITION_DURATION};

/// Circle plus abbreviation text for one record. Both share the same
/// position, so a single x transition drives them.
#[derive(Debug, Clone)]
pub struct Mark {
    pub abbr: String,
    x: Transition,
    y: f64,
}

impl Mark {
    pub fn x_at(&self, now: f64) -> f64 {
        self.x.value_at(now)
    }

    /// Vertical position. Fixed at creation.
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn target_x(&self) -> f64 {
        self.x.target()
    }

    pub fn is_moving(&self, now: f64) -> bool {
        self.x.is_running(now)
    }
}

/// One mark per record, in dataset order, placed without animation.
pub fn place_marks(
    dataset: &Dataset,
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    field: AxisField,
) -> Vec<Mark> {
    dataset
        .iter()
        .map(|record| Mark {
            abbr: record.abbr.clone(),
            x: Transition::settled(x_scale.map(record.x_value(field))),
            y: y_scale.map(record.healthcare),
        })
        .collect()
}

/// Move every mark to its position on `x_scale`. Animations still running
/// are replaced and continue from where they are.
pub fn render_marks(
    marks: &mut [Mark],
    dataset: &Dataset,
    x_scale: &LinearScale,
    field: AxisField,
    now: f64,
) {
    for (mark, record) in marks.iter_mut().zip(dataset.iter()) {
        let target = x_scale.map(record.x_value(field));
        mark.x.retarget(target, now, TRANSITION_DURATION);
    }
}

/// Index of the topmost mark whose circle contains `pos`. Later marks are
/// drawn on top of earlier ones.
pub fn mark_at(marks: &[Mark], pos: [f64; 2], now: f64) -> Option<usize> {
    let [px, py] = pos;
    marks.iter().rposition(|mark| {
        let (x, y) = (mark.x_at(now), mark.y);
        x.is_finite() && y.is_finite() && (x - px).hypot(y - py) <= MARK_RADIUS
    })
}
