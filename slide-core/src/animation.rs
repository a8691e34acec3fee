use serde::{Deserialize, Serialize};

/// Timing function applied to the elapsed time fraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// Result of advancing an animation to a given timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub progress: f64,
    pub done: bool,
}

/// Time-boxed progress driver.
///
/// The host calls [`Animation::frame`] (or [`Animation::step`]) once per
/// display refresh with its frame timestamp; the first call fixes the start
/// time. Progress is `elapsed / duration` clamped to `[0, 1]` and passed
/// through the easing. A driver is good for one run only.
#[derive(Clone, Debug)]
pub struct Animation {
    duration_ms: f64,
    easing: Easing,
    start_ms: Option<f64>,
    finished: bool,
}

impl Animation {
    pub fn new(duration_ms: f64) -> Self {
        Animation {
            duration_ms,
            easing: Easing::Linear,
            start_ms: None,
            finished: false,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn frame(&mut self, now_ms: f64) -> Frame {
        let start = *self.start_ms.get_or_insert(now_ms);
        let fraction = if self.duration_ms > 0.0 {
            ((now_ms - start) / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let done = fraction >= 1.0;
        if done {
            self.finished = true;
        }
        Frame {
            progress: self.easing.apply(fraction),
            done,
        }
    }

    /// Callback form of [`Animation::frame`]: `on_frame` runs for every frame
    /// including the last, `on_end` runs once right after the last one.
    /// Returns whether more frames are wanted.
    pub fn step(
        &mut self,
        now_ms: f64,
        mut on_frame: impl FnMut(f64),
        on_end: impl FnOnce(),
    ) -> bool {
        if self.finished {
            return false;
        }
        let frame = self.frame(now_ms);
        on_frame(frame.progress);
        if frame.done {
            on_end();
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_linear_and_clamped() {
        let mut anim = Animation::new(100.0);
        assert_eq!(anim.frame(1000.0), Frame { progress: 0.0, done: false });
        assert_eq!(anim.frame(1025.0).progress, 0.25);
        let last = anim.frame(1200.0);
        assert_eq!(last, Frame { progress: 1.0, done: true });
        assert!(anim.is_finished());
    }

    #[test]
    fn step_ends_exactly_once() {
        let mut anim = Animation::new(50.0);
        let mut frames = Vec::new();
        let mut ends = 0;
        let mut t = 0.0;
        while anim.step(t, |p| frames.push(p), || ends += 1) {
            t += 16.0;
        }
        assert!(!anim.step(t + 16.0, |p| frames.push(p), || ends += 1));
        assert_eq!(ends, 1);
        assert_eq!(frames.first(), Some(&0.0));
        assert_eq!(frames.last(), Some(&1.0));
        assert!(frames.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn zero_duration_finishes_on_first_frame() {
        let mut anim = Animation::new(0.0);
        assert!(anim.frame(5.0).done);
    }

    #[test]
    fn easings_pin_endpoints() {
        for e in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
        }
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }
}
