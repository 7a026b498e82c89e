//! Strain-to-direction classification with hysteresis
//!
//! ```text
//!            N-RADIUS  N-RADIUS+MARGIN      N      N+RADIUS-MARGIN  N+RADIUS
//!   fire Left  |<-gap->|<------------ re-arm band ------------>|<-gap->|  fire Right
//! ```
//!
//! Crossing an outer threshold fires once and latches. The latch releases
//! only when the signal comes back inside the inner re-arm band, so noise
//! hovering around an outer threshold cannot fire again.

use std::fmt;

use crate::calibration::Baseline;

/// Distance from neutral that fires an event
pub const RADIUS: i32 = 0x0400;

/// Width of the hysteresis gap between firing and re-arming
pub const MARGIN: i32 = 0x0010;

const _: () = assert!(MARGIN < RADIUS);

/// A discrete direction recognised from the strain signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectionalEvent {
    /// Ring squeezed below neutral
    Left,
    /// Ring pulled above neutral
    Right,
}

impl DirectionalEvent {
    /// DOM-style key name
    pub fn key_name(&self) -> &'static str {
        match self {
            DirectionalEvent::Left => "ArrowLeft",
            DirectionalEvent::Right => "ArrowRight",
        }
    }

    /// DOM-style key code
    pub fn key_code(&self) -> u32 {
        match self {
            DirectionalEvent::Left => 37,
            DirectionalEvent::Right => 39,
        }
    }
}

impl fmt::Display for DirectionalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_name())
    }
}

/// Edge-triggered classifier over a calibrated strain stream
#[derive(Debug, Clone)]
pub struct StrainClassifier {
    baseline: Baseline,
    is_latched: bool,
}

impl StrainClassifier {
    /// Create an unlatched classifier around `baseline`
    pub fn new(baseline: Baseline) -> Self {
        Self {
            baseline,
            is_latched: false,
        }
    }

    /// Feed one sample; returns the event it fires, if any
    pub fn observe(&mut self, sample: i16) -> Option<DirectionalEvent> {
        let neutral = self.baseline.value() as i32;
        let s = sample as i32;

        if self.is_latched {
            if neutral - RADIUS + MARGIN <= s && s <= neutral + RADIUS - MARGIN {
                self.is_latched = false;
            }
            return None;
        }

        let event = if s < neutral - RADIUS {
            DirectionalEvent::Left
        } else if s > neutral + RADIUS {
            DirectionalEvent::Right
        } else {
            return None;
        };
        self.is_latched = true;
        Some(event)
    }

    /// Whether an event has fired and the signal has not yet re-armed
    pub fn is_latched(&self) -> bool {
        self.is_latched
    }

    /// The neutral value this classifier measures against
    pub fn baseline(&self) -> Baseline {
        self.baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier(neutral: i16) -> StrainClassifier {
        StrainClassifier::new(Baseline::new(neutral).unwrap())
    }

    fn run(c: &mut StrainClassifier, samples: &[i16]) -> Vec<DirectionalEvent> {
        samples.iter().filter_map(|&s| c.observe(s)).collect()
    }

    #[test]
    fn test_neutral_emits_nothing() {
        let mut c = classifier(1000);
        assert!(run(&mut c, &[1000, 1010, 990, 1000 + 1024, 1000 - 1024]).is_empty());
        assert!(!c.is_latched());
    }

    #[test]
    fn test_noisy_squeeze_fires_once() {
        let mut c = classifier(1000);
        // Dip past the threshold, then chatter between N-1100 and N-1020
        let samples = [-100, -20, -100, -20, -100, -20, -100];
        assert_eq!(run(&mut c, &samples), vec![DirectionalEvent::Left]);
        assert!(c.is_latched());

        // Still outside the re-arm band: -9 < 1000 - 1024 + 16 = -8
        assert!(c.observe(-9).is_none());
        assert!(c.is_latched());

        // Back inside the band re-arms without firing
        assert!(c.observe(-8).is_none());
        assert!(!c.is_latched());

        assert_eq!(c.observe(-100), Some(DirectionalEvent::Left));
    }

    #[test]
    fn test_noisy_pull_fires_once() {
        let mut c = classifier(1000);
        let samples = [2100, 2020, 2100, 2020, 2100];
        assert_eq!(run(&mut c, &samples), vec![DirectionalEvent::Right]);

        // 2009 > 1000 + 1024 - 16 = 2008
        assert!(c.observe(2009).is_none());
        assert!(c.is_latched());
        assert!(c.observe(2008).is_none());
        assert!(!c.is_latched());

        assert_eq!(c.observe(2100), Some(DirectionalEvent::Right));
    }

    #[test]
    fn test_threshold_boundary() {
        let mut c = classifier(1000);
        // Exactly at N - RADIUS does not fire
        assert!(c.observe(1000 - 1024).is_none());
        assert_eq!(c.observe(1000 - 1025), Some(DirectionalEvent::Left));

        let mut c = classifier(1000);
        assert!(c.observe(1000 + 1024).is_none());
        assert_eq!(c.observe(1000 + 1025), Some(DirectionalEvent::Right));
    }

    #[test]
    fn test_swing_through_neutral_requires_rearm() {
        let mut c = classifier(1);
        // Squeeze, then snap straight to a full pull: the pull sample lands
        // outside the re-arm band, so it only counts once the ring has
        // passed back through neutral.
        assert_eq!(c.observe(-2000), Some(DirectionalEvent::Left));
        assert!(c.observe(2000).is_none());
        assert!(c.observe(1).is_none());
        assert_eq!(c.observe(2000), Some(DirectionalEvent::Right));
    }

    #[test]
    fn test_extremes_do_not_overflow() {
        let mut c = classifier(i16::MIN + 1);
        assert!(c.observe(i16::MIN).is_none());
        assert_eq!(c.observe(i16::MAX), Some(DirectionalEvent::Right));

        let mut c = classifier(i16::MAX);
        assert_eq!(c.observe(i16::MIN), Some(DirectionalEvent::Left));
    }

    #[test]
    fn test_independent_sessions() {
        let mut a = classifier(1);
        let mut b = classifier(1);
        assert_eq!(a.observe(-2000), Some(DirectionalEvent::Left));
        assert!(a.is_latched());
        assert!(!b.is_latched());
        assert_eq!(b.observe(-2000), Some(DirectionalEvent::Left));
    }

    #[test]
    fn test_key_names_and_codes() {
        assert_eq!(DirectionalEvent::Left.key_name(), "ArrowLeft");
        assert_eq!(DirectionalEvent::Left.key_code(), 37);
        assert_eq!(DirectionalEvent::Right.key_name(), "ArrowRight");
        assert_eq!(DirectionalEvent::Right.key_code(), 39);
        assert_eq!(DirectionalEvent::Right.to_string(), "ArrowRight");
    }
}
