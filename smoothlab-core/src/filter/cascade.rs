//! Windowed cascade filter: one sliding window feeding a chain of FIR
//! stages.
//!
//! A cascade has two states. While the window is filling (WARMING) the
//! current value is absent. From the push that fills the window onward
//! (READY) the current value is the last element of the final stage's
//! output, recomputed from the window snapshot on each query. The
//! window never drains, so a cascade never returns to WARMING.

use super::stage::{ConfigError, Stage};
use super::window::SlidingWindow;

/// A sliding window coupled to an ordered chain of FIR stages.
///
/// The five indicator variants are presets over this one shape: they
/// differ only in window capacity and stage list.
#[derive(Debug, Clone)]
pub struct WindowedCascade {
    window: SlidingWindow,
    stages: Vec<Stage>,
}

impl WindowedCascade {
    /// Build a cascade from explicit capacity and stages.
    ///
    /// Rejects zero capacity, an empty stage list, and any invalid
    /// stage parameters.
    pub fn new(capacity: usize, stages: Vec<Stage>) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::Capacity(capacity));
        }
        if stages.is_empty() {
            return Err(ConfigError::EmptyCascade);
        }
        for stage in &stages {
            stage.validate()?;
        }
        Ok(Self {
            window: SlidingWindow::new(capacity),
            stages,
        })
    }

    /// Exponential moving average: window of `flen`, one decay-weighted
    /// pass `(flen, alpha)`.
    pub fn ema(flen: usize, alpha: f64) -> Result<Self, ConfigError> {
        Self::new(
            flen,
            vec![Stage::Smooth {
                length: flen,
                alpha,
            }],
        )
    }

    /// First-difference derivative: window of 2, one `[1, -1]` pass.
    pub fn derivative() -> Self {
        Self::new(2, vec![Stage::Difference]).expect("fixed derivative parameters are valid")
    }

    /// Always-zero baseline: window of 2, one `[0]` pass. Produces 0
    /// once ready regardless of input.
    pub fn zero_baseline() -> Self {
        Self::new(2, vec![Stage::Zero]).expect("fixed zero-baseline parameters are valid")
    }

    /// Triple-smoothed rate-of-change: window of `flen * 3`, three
    /// cascaded decay-weighted passes of length `flen`.
    pub fn trix(flen: usize, alphas: [f64; 3]) -> Result<Self, ConfigError> {
        Self::new(flen.saturating_mul(3), smooth_chain(flen, alphas))
    }

    /// Hull-style smoother: same three-pass chain as TRIX over a larger
    /// window of `flen * 5`.
    pub fn hull(flen: usize, alphas: [f64; 3]) -> Result<Self, ConfigError> {
        Self::new(flen.saturating_mul(5), smooth_chain(flen, alphas))
    }

    /// Feed one value into the window.
    pub fn push(&mut self, value: f64) {
        self.window.push(value);
    }

    /// True once the window has filled; never reverts to false.
    pub fn is_ready(&self) -> bool {
        self.window.is_full()
    }

    /// Current indicator value.
    ///
    /// `None` while warming. Once ready, runs the full stage chain over
    /// the window snapshot and returns the last element of the final
    /// pass. Pure recomputation: querying twice without an intervening
    /// push yields identical results.
    pub fn current(&self) -> Option<f64> {
        if !self.window.is_full() {
            return None;
        }
        let mut data = self.window.values();
        for stage in &self.stages {
            data = stage.apply(&data);
        }
        data.last().copied()
    }

    /// Window capacity (the number of pushes needed to leave WARMING).
    pub fn warmup(&self) -> usize {
        self.window.capacity()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

/// Three cascaded smoothing passes of the same length, one alpha each.
fn smooth_chain(flen: usize, alphas: [f64; 3]) -> Vec<Stage> {
    alphas
        .into_iter()
        .map(|alpha| Stage::Smooth {
            length: flen,
            alpha,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_warms_up_then_converges_on_constant_input() {
        let mut ema = WindowedCascade::ema(5, 0.3).unwrap();
        for _ in 0..4 {
            ema.push(1.0);
            assert_eq!(ema.current(), None);
        }
        ema.push(1.0);
        assert!(ema.is_ready());
        assert_approx(ema.current().unwrap(), 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_weighted_average_known_value() {
        // flen 2, alpha 0.5: taps [1, 0.5], norm 1.5.
        // Window [2, 4] → (1*4 + 0.5*2) / 1.5 = 10/3
        let mut ema = WindowedCascade::ema(2, 0.5).unwrap();
        ema.push(2.0);
        ema.push(4.0);
        assert_approx(ema.current().unwrap(), 10.0 / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_alpha_one_tracks_newest_value() {
        let mut ema = WindowedCascade::ema(3, 1.0).unwrap();
        for v in [5.0, 6.0, 7.0] {
            ema.push(v);
        }
        assert_approx(ema.current().unwrap(), 7.0, DEFAULT_EPSILON);
        ema.push(42.0);
        assert_approx(ema.current().unwrap(), 42.0, DEFAULT_EPSILON);
    }

    #[test]
    fn derivative_first_difference() {
        let mut d = WindowedCascade::derivative();
        d.push(5.0);
        assert_eq!(d.current(), None);
        d.push(5.0);
        assert_approx(d.current().unwrap(), 0.0, DEFAULT_EPSILON);
        d.push(7.0);
        assert_approx(d.current().unwrap(), 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_baseline_always_zero_once_ready() {
        let mut z = WindowedCascade::zero_baseline();
        z.push(3.0);
        assert_eq!(z.current(), None);
        z.push(3.0);
        assert_eq!(z.current(), Some(0.0));
        z.push(9.0);
        assert_eq!(z.current(), Some(0.0));
    }

    #[test]
    fn trix_requires_exactly_three_windows() {
        let flen = 4;
        let mut trix = WindowedCascade::trix(flen, [0.3, 0.3, 0.3]).unwrap();
        for i in 0..(flen * 3 - 1) {
            trix.push(i as f64);
            assert_eq!(trix.current(), None, "push {} should still be warming", i);
        }
        trix.push(99.0);
        assert!(trix.current().is_some());
    }

    #[test]
    fn hull_requires_exactly_five_windows() {
        let flen = 3;
        let mut hull = WindowedCascade::hull(flen, [0.2, 0.4, 0.6]).unwrap();
        for i in 0..(flen * 5 - 1) {
            hull.push(i as f64);
            assert_eq!(hull.current(), None);
        }
        hull.push(1.0);
        assert!(hull.current().is_some());
    }

    #[test]
    fn trix_flen_one_is_identity_chain() {
        // Length-1 smoothing taps are [1]/1: each pass is the identity,
        // so the cascade reduces to the newest value.
        let mut trix = WindowedCascade::trix(1, [0.5, 0.5, 0.5]).unwrap();
        trix.push(10.0);
        trix.push(20.0);
        trix.push(30.0);
        assert_approx(trix.current().unwrap(), 30.0, DEFAULT_EPSILON);
    }

    #[test]
    fn trix_cascaded_passes_known_value() {
        // flen 2, alpha 0.5 per pass over window [1..6]:
        // pass: y[n] = (2x[n] + x[n-1]) / 3
        // y = [2/3, 5/3, 8/3, 11/3, 14/3, 17/3]
        // z = [..., 13/3, 16/3]
        // w[5] = (2*16/3 + 13/3) / 3 = 5.0
        let mut trix = WindowedCascade::trix(2, [0.5, 0.5, 0.5]).unwrap();
        for v in 1..=6 {
            trix.push(v as f64);
        }
        assert_approx(trix.current().unwrap(), 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn hull_matches_trix_chain_on_shared_window_tail() {
        // Same stages, different capacity: hull sees a longer history,
        // so outputs generally differ; on constant input both converge.
        let mut trix = WindowedCascade::trix(2, [0.3, 0.3, 0.3]).unwrap();
        let mut hull = WindowedCascade::hull(2, [0.3, 0.3, 0.3]).unwrap();
        for _ in 0..10 {
            trix.push(4.0);
            hull.push(4.0);
        }
        assert_approx(trix.current().unwrap(), 4.0, DEFAULT_EPSILON);
        assert_approx(hull.current().unwrap(), 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn current_is_idempotent_between_pushes() {
        let mut trix = WindowedCascade::trix(3, [0.2, 0.5, 0.8]).unwrap();
        for v in [1.0, 4.0, 2.0, 8.0, 5.0, 7.0, 1.0, 3.0, 6.0] {
            trix.push(v);
        }
        let a = trix.current().unwrap();
        let b = trix.current().unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn never_reverts_to_warming() {
        let mut ema = WindowedCascade::ema(3, 0.4).unwrap();
        for v in 0..20 {
            ema.push(v as f64);
            if v >= 2 {
                assert!(ema.is_ready());
                assert!(ema.current().is_some());
            }
        }
    }

    #[test]
    fn construction_rejects_bad_parameters() {
        assert!(WindowedCascade::ema(0, 0.3).is_err());
        assert!(WindowedCascade::ema(5, 0.0).is_err());
        assert!(WindowedCascade::ema(5, 1.5).is_err());
        assert!(WindowedCascade::trix(0, [0.3, 0.3, 0.3]).is_err());
        assert!(WindowedCascade::trix(4, [0.3, -0.1, 0.3]).is_err());
        assert!(WindowedCascade::hull(4, [0.3, 0.3, 2.0]).is_err());
        assert_eq!(
            WindowedCascade::new(0, vec![Stage::Difference]).unwrap_err(),
            ConfigError::Capacity(0)
        );
        assert_eq!(
            WindowedCascade::new(4, vec![]).unwrap_err(),
            ConfigError::EmptyCascade
        );
    }

    #[test]
    fn preset_warmup_lengths() {
        assert_eq!(WindowedCascade::ema(8, 0.3).unwrap().warmup(), 8);
        assert_eq!(WindowedCascade::derivative().warmup(), 2);
        assert_eq!(WindowedCascade::zero_baseline().warmup(), 2);
        assert_eq!(WindowedCascade::trix(8, [0.3; 3]).unwrap().warmup(), 24);
        assert_eq!(WindowedCascade::hull(8, [0.3; 3]).unwrap().warmup(), 40);
    }
}
