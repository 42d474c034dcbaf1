/// Cubic ease-in-out on `t ∈ [0, 1]`.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// A scalar interpolated over wall-clock time (seconds).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    start: f64,
    duration: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: f64, duration: f32) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (((now - self.start) / f64::from(self.duration)) as f32).clamp(0.0, 1.0)
    }

    pub fn value(&self, now: f64) -> f32 {
        let t = ease_in_out(self.progress(now));
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}
