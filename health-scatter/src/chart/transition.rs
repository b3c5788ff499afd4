//! Time based interpolation of a single value.
//!
//! Time is given in seconds by the caller, usually the frame clock of the
//! UI, so transitions carry no clock of their own.

/// Animates a value from `from` to `to` over `duration` seconds, starting at
/// `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: f64,
    to: f64,
    start: f64,
    duration: f64,
}

impl Transition {
    pub fn new(from: f64, to: f64, start: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// A transition that already rests at `value`.
    pub fn settled(value: f64) -> Self {
        Self::new(value, value, f64::NEG_INFINITY, 0.0)
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now: f64) -> f64 {
        let t = ease_cubic_in_out(self.progress(now));
        if t >= 1.0 {
            self.to
        } else if t <= 0.0 {
            self.from
        } else {
            self.from + (self.to - self.from) * t
        }
    }

    /// Start a new animation towards `to`. It begins at the value shown at
    /// `now`, so an animation still in flight is replaced without a jump.
    pub fn retarget(&mut self, to: f64, now: f64, duration: f64) {
        *self = Self::new(self.value_at(now), to, now, duration);
    }

    pub fn is_running(&self, now: f64) -> bool {
        self.progress(now) < 1.0
    }

    pub fn target(&self) -> f64 {
        self.to
    }
}

/// Symmetric cubic easing: slow start, fast middle, slow end.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}
