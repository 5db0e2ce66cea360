//! Zoom state for the page canvas

/// Zoom step direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomStep {
    In,
    Out,
}

impl ZoomStep {
    /// Signed change applied to the zoom factor
    pub fn delta(self) -> f32 {
        match self {
            Self::In => Zoom::STEP,
            Self::Out => -Zoom::STEP,
        }
    }
}

/// Zoom factor for page rendering (1.0 = 100%)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zoom {
    factor: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self {
            factor: Self::DEFAULT,
        }
    }
}

impl Zoom {
    pub const DEFAULT: f32 = 1.0;
    pub const STEP: f32 = 0.25;
    pub const MIN_SCALE: f32 = 0.5;
    pub const MAX_SCALE: f32 = 3.0;

    /// Returns the current zoom factor
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Apply one step; returns true if the factor changed
    pub fn step(&mut self, step: ZoomStep) -> bool {
        let next = Self::clamp_factor(self.factor + step.delta());
        if (next - self.factor).abs() > f32::EPSILON {
            self.factor = next;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.factor = Self::DEFAULT;
    }

    pub fn can_zoom_in(&self) -> bool {
        self.factor < Self::MAX_SCALE
    }

    pub fn can_zoom_out(&self) -> bool {
        self.factor > Self::MIN_SCALE
    }

    /// Zoom as a whole percentage, e.g. "125%"
    pub fn label(&self) -> String {
        format!("{}%", (self.factor * 100.0).round() as i32)
    }

    /// Clamp factor to valid range, handling NaN/Inf
    pub fn clamp_factor(factor: f32) -> f32 {
        if !factor.is_finite() {
            Self::DEFAULT
        } else {
            factor.clamp(Self::MIN_SCALE, Self::MAX_SCALE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_out_floors_at_half() {
        let mut zoom = Zoom::default();
        for _ in 0..8 {
            zoom.step(ZoomStep::Out);
        }
        assert_eq!(zoom.factor(), 0.5);
        assert!(!zoom.can_zoom_out());
        assert_eq!(zoom.label(), "50%");
    }

    #[test]
    fn zoom_in_caps_at_three() {
        let mut zoom = Zoom::default();
        let mut changes = 0;
        for _ in 0..20 {
            if zoom.step(ZoomStep::In) {
                changes += 1;
            }
        }
        assert_eq!(changes, 8);
        assert_eq!(zoom.factor(), 3.0);
        assert!(!zoom.can_zoom_in());
    }

    #[test]
    fn mixed_sequences_stay_on_quarter_grid() {
        let mut zoom = Zoom::default();
        let pattern = [
            ZoomStep::In,
            ZoomStep::In,
            ZoomStep::Out,
            ZoomStep::In,
            ZoomStep::Out,
            ZoomStep::Out,
            ZoomStep::Out,
            ZoomStep::Out,
        ];
        for (i, step) in pattern.iter().cycle().take(200).enumerate() {
            zoom.step(*step);
            let f = zoom.factor();
            assert!((Zoom::MIN_SCALE..=Zoom::MAX_SCALE).contains(&f), "step {i}: {f}");
            let quarters = (f - 1.0) / Zoom::STEP;
            assert_eq!(quarters, quarters.round(), "step {i}: {f}");
        }
    }

    #[test]
    fn clamp_handles_non_finite() {
        assert_eq!(Zoom::clamp_factor(f32::NAN), 1.0);
        assert_eq!(Zoom::clamp_factor(f32::INFINITY), 1.0);
        assert_eq!(Zoom::clamp_factor(7.0), 3.0);
    }

    #[test]
    fn label_rounds_to_whole_percent() {
        let mut zoom = Zoom::default();
        zoom.step(ZoomStep::In);
        assert_eq!(zoom.label(), "125%");
    }
}
