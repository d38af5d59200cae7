/// Linear interpolation from `start` to `end` over `steps` steps,
/// clamped to the endpoints outside of `[0, steps]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearDecay {
    pub start: f32,
    pub end: f32,
    pub steps: usize,
}

impl LinearDecay {
    #[must_use]
    pub const fn new(start: f32, end: f32, steps: usize) -> Self {
        Self { start, end, steps }
    }

    #[must_use]
    pub fn value(&self, t: usize) -> f32 {
        if t == 0 {
            return self.start;
        }
        if t >= self.steps {
            return self.end;
        }
        let fraction = t as f32 / self.steps as f32;
        (self.end - self.start).mul_add(fraction, self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::LinearDecay;

    #[test]
    fn endpoints() {
        let decay = LinearDecay::new(1.0, 0.1, 10);
        assert_eq!(decay.value(0), 1.0);
        assert_eq!(decay.value(10), 0.1);
    }

    #[test]
    fn clamps_past_the_end() {
        let decay = LinearDecay::new(0.5, 0.0, 4);
        assert_eq!(decay.value(4), 0.0);
        assert_eq!(decay.value(5), 0.0);
        assert_eq!(decay.value(usize::MAX), 0.0);
    }

    #[test]
    fn halfway() {
        let decay = LinearDecay::new(1.0, 0.0, 10);
        assert!((decay.value(5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn monotonic_between_endpoints() {
        let decreasing = LinearDecay::new(0.9, 0.05, 100);
        assert!((0..=100)
            .map(|t| decreasing.value(t))
            .collect::<Vec<_>>()
            .windows(2)
            .all(|w| w[1] <= w[0]));

        let increasing = LinearDecay::new(0.0, 2.0, 7);
        assert!((0..=10)
            .map(|t| increasing.value(t))
            .collect::<Vec<_>>()
            .windows(2)
            .all(|w| w[1] >= w[0]));
    }

    #[test]
    fn zero_steps_jumps_to_end() {
        let decay = LinearDecay::new(1.0, 0.2, 0);
        assert_eq!(decay.value(0), 1.0);
        assert_eq!(decay.value(1), 0.2);
    }
}
