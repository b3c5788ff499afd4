//! Linear scales from data values to pixels, built from the dataset with
//! fixed padding around the data extent.

use crate::{backend_state::Dataset, chart::AxisField};

use super::{PLOT_HEIGHT, PLOT_WIDTH};

/// Multipliers applied to the minimum and maximum of the x data.
pub const X_PADDING: [f64; 2] = [0.8, 1.2];
/// Multipliers applied to the minimum and maximum of the y data.
pub const Y_PADDING: [f64; 2] = [0.5, 1.1];

#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

// Bitwise, so that a scale with a NaN domain still equals itself.
impl PartialEq for LinearScale {
    fn eq(&self, other: &Self) -> bool {
        let bits = |s: &Self| {
            [s.domain[0], s.domain[1], s.range[0], s.range[1]].map(f64::to_bits)
        };
        bits(self) == bits(other)
    }
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Map a data value into the range. A degenerate domain maps everything
    /// to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + (r1 - r0) * t
    }

    /// Scale with domain and range interpolated between `self` (t = 0) and
    /// `other` (t = 1).
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            domain: [
                mix(self.domain[0], other.domain[0]),
                mix(self.domain[1], other.domain[1]),
            ],
            range: [
                mix(self.range[0], other.range[0]),
                mix(self.range[1], other.range[1]),
            ],
        }
    }

    /// Roughly `count` evenly spaced, round values inside the domain. Steps
    /// are 1, 2 or 5 times a power of ten.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [mut start, mut stop] = self.domain;
        if count == 0 || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }
        if start == stop {
            return vec![start];
        }

        let step = tick_increment(start, stop, count as f64);
        if step == 0.0 || !step.is_finite() {
            return Vec::new();
        }

        // Negative increments encode the inverse of a fractional step, which
        // keeps values like 0.3 exact.
        let mut ticks: Vec<f64> = if step > 0.0 {
            let (lo, hi) = ((start / step).ceil(), (stop / step).floor());
            (0..)
                .map(|i| lo + i as f64)
                .take_while(|k| *k <= hi)
                .map(|k| k * step)
                .collect()
        } else {
            let inverse = -step;
            let (lo, hi) = ((start * inverse).ceil(), (stop * inverse).floor());
            (0..)
                .map(|i| lo + i as f64)
                .take_while(|k| *k <= hi)
                .map(|k| k / inverse)
                .collect()
        };
        if reverse {
            ticks.reverse();
        }
        ticks
    }
}

fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Minimum and maximum, ignoring NaN. `None` if nothing is left.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn padded_domain(values: impl IntoIterator<Item = f64>, padding: [f64; 2]) -> [f64; 2] {
    let (min, max) = extent(values).unwrap_or((f64::NAN, f64::NAN));
    [min * padding[0], max * padding[1]]
}

/// The x scale for `field`, spanning the plot width.
pub fn x_scale(dataset: &Dataset, field: AxisField) -> LinearScale {
    let domain = padded_domain(dataset.iter().map(|r| r.x_value(field)), X_PADDING);
    LinearScale::new(domain, [0.0, PLOT_WIDTH])
}

/// The y scale for the healthcare field. The range is inverted so that larger
/// values are drawn further up.
pub fn y_scale(dataset: &Dataset) -> LinearScale {
    let domain = padded_domain(dataset.iter().map(|r| r.healthcare), Y_PADDING);
    LinearScale::new(domain, [PLOT_HEIGHT, 0.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::tests::dataset;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_map_and_degenerate_domain() {
        let scale = LinearScale::new([8.0, 36.0], [0.0, 720.0]);
        assert_close(scale.map(8.0), 0.0);
        assert_close(scale.map(36.0), 720.0);
        assert_close(scale.map(22.0), 360.0);

        let flat = LinearScale::new([5.0, 5.0], [0.0, 100.0]);
        assert_close(flat.map(123.0), 50.0);

        let undefined = LinearScale::new([f64::NAN, f64::NAN], [0.0, 100.0]);
        assert!(undefined.map(1.0).is_nan());
    }

    #[test]
    fn test_x_scale_padding() {
        let data = dataset(&[10.0, 20.0, 30.0], &[30.0, 40.0, 50.0]);
        let scale = x_scale(&data, AxisField::Poverty);
        let [d0, d1] = scale.domain();
        assert_close(d0, 8.0);
        assert_close(d1, 36.0);
        assert_eq!(scale.range(), [0.0, PLOT_WIDTH]);

        let [d0, d1] = x_scale(&data, AxisField::Age).domain();
        assert_close(d0, 24.0);
        assert_close(d1, 60.0);
    }

    #[test]
    fn test_y_scale_padding_and_inverted_range() {
        let data = dataset(&[10.0, 20.0, 30.0], &[30.0, 40.0, 50.0]);
        let scale = y_scale(&data);
        // healthcare values of the test dataset are 5, 10 and 15
        let [d0, d1] = scale.domain();
        assert_close(d0, 2.5);
        assert_close(d1, 16.5);
        assert_eq!(scale.range(), [PLOT_HEIGHT, 0.0]);
        assert_close(scale.map(d1), 0.0);
    }

    #[test]
    fn test_scales_are_pure() {
        let data = dataset(&[10.0, 20.0, 30.0], &[30.0, 40.0, 50.0]);
        assert_eq!(
            x_scale(&data, AxisField::Income),
            x_scale(&data, AxisField::Income)
        );
        assert_eq!(y_scale(&data), y_scale(&data));
    }

    #[test]
    fn test_extent_skips_nan() {
        assert_eq!(extent([3.0, f64::NAN, 1.0, 2.0]), Some((1.0, 3.0)));
        assert_eq!(extent([f64::NAN]), None);
        assert_eq!(extent(Vec::new()), None);

        let data = dataset(&[], &[]);
        let scale = x_scale(&data, AxisField::Poverty);
        assert!(scale.domain()[0].is_nan());
        assert_eq!(scale, x_scale(&data, AxisField::Poverty));
    }

    #[test]
    fn test_ticks() {
        let ticks = LinearScale::new([8.0, 36.0], [0.0, 1.0]).ticks(10);
        let expected: Vec<f64> = (4..=18).map(|k| k as f64 * 2.0).collect();
        assert_eq!(ticks, expected);

        let ticks = LinearScale::new([24.0, 60.0], [0.0, 1.0]).ticks(10);
        assert_eq!(ticks, vec![25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0]);

        let ticks = LinearScale::new([0.0, 1.0], [0.0, 1.0]).ticks(10);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[3], 0.3);

        let ticks = LinearScale::new([60.0, 24.0], [0.0, 1.0]).ticks(10);
        assert_eq!(ticks.first(), Some(&60.0));
        assert_eq!(ticks.last(), Some(&25.0));

        assert!(LinearScale::new([f64::NAN, 1.0], [0.0, 1.0])
            .ticks(10)
            .is_empty());
        assert_eq!(LinearScale::new([2.0, 2.0], [0.0, 1.0]).ticks(10), vec![2.0]);
    }

    #[test]
    fn test_lerp() {
        let a = LinearScale::new([0.0, 10.0], [0.0, 100.0]);
        let b = LinearScale::new([10.0, 30.0], [0.0, 100.0]);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5).domain(), [5.0, 20.0]);
    }
}
