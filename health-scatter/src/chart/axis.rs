use super::{scale::LinearScale, transition::Transition, TRANSITION_DURATION};

/// Number of ticks requested from a scale.
pub const TICK_COUNT: usize = 10;

/// A tick as it should be drawn at a given moment.
#[derive(Debug, Clone, PartialEq)]
pub struct TickMark {
    pub value: f64,
    pub label: String,
    /// Position along the axis in plot pixels.
    pub position: f64,
    pub opacity: f64,
}

/// Animates an axis from the scale it currently shows to a new one.
///
/// While the animation runs, ticks shared by both scales slide to their new
/// position, ticks of the old scale fade out and ticks of the new scale fade
/// in, all moving along with the changing scale.
#[derive(Debug, Clone)]
pub struct AxisRenderer {
    from: LinearScale,
    to: LinearScale,
    progress: Transition,
}

impl AxisRenderer {
    pub fn new(scale: LinearScale) -> Self {
        Self {
            from: scale,
            to: scale,
            progress: Transition::settled(1.0),
        }
    }

    /// The scale the axis shows once the animation is done.
    pub fn scale(&self) -> &LinearScale {
        &self.to
    }

    /// Animate towards `scale`. Rendering the current target again changes
    /// nothing and returns `false`.
    pub fn render(&mut self, scale: &LinearScale, now: f64) -> bool {
        if *scale == self.to {
            return false;
        }
        self.from = self.displayed_scale(now);
        self.to = *scale;
        self.progress = Transition::new(0.0, 1.0, now, TRANSITION_DURATION);
        true
    }

    pub fn displayed_scale(&self, now: f64) -> LinearScale {
        let t = self.progress.value_at(now);
        if t >= 1.0 {
            self.to
        } else {
            self.from.lerp(&self.to, t)
        }
    }

    pub fn is_running(&self, now: f64) -> bool {
        self.progress.is_running(now)
    }

    pub fn tick_marks(&self, now: f64) -> Vec<TickMark> {
        let t = self.progress.value_at(now);
        let new_ticks = self.to.ticks(TICK_COUNT);
        let new_labels = svg_export::format_ticks(&new_ticks);

        if t >= 1.0 {
            return new_ticks
                .into_iter()
                .zip(new_labels)
                .map(|(value, label)| TickMark {
                    value,
                    label,
                    position: self.to.map(value),
                    opacity: 1.0,
                })
                .collect();
        }

        let old_ticks = self.from.ticks(TICK_COUNT);
        let old_labels = svg_export::format_ticks(&old_ticks);
        let position = |value: f64| {
            let (a, b) = (self.from.map(value), self.to.map(value));
            a + (b - a) * t
        };

        let mut marks = Vec::with_capacity(new_ticks.len() + old_ticks.len());
        for (&value, label) in new_ticks.iter().zip(new_labels) {
            let shared = old_ticks.iter().any(|old| same_tick(*old, value));
            marks.push(TickMark {
                value,
                label,
                position: position(value),
                opacity: if shared { 1.0 } else { t },
            });
        }
        for (&value, label) in old_ticks.iter().zip(old_labels) {
            if new_ticks.iter().any(|new| same_tick(*new, value)) {
                continue;
            }
            marks.push(TickMark {
                value,
                label,
                position: position(value),
                opacity: 1.0 - t,
            });
        }
        marks
    }
}

fn same_tick(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
