//! Pipe obstacles
//!
//! A pipe pair is a hanging top pipe and an upright bottom pipe around a gap.
//! `top` is the y of the hanging sprite's origin, so the gap spans
//! `height..bottom`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::settings::PipeConfig;

/// A pipe pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    /// Gap center height drawn at creation
    pub height: f32,
    /// y of the hanging pipe's sprite origin
    pub top: f32,
    /// y of the upright pipe's mouth
    pub bottom: f32,
    /// Set once the leading bird has flown past
    pub passed: bool,
}

impl Pipe {
    /// New pipe with a random gap center
    pub fn new<R: Rng + ?Sized>(x: f32, rng: &mut R, cfg: &PipeConfig) -> Self {
        let height = rng.random_range(cfg.gap_min..cfg.gap_max);
        Self::with_gap(x, height as f32, cfg)
    }

    /// New pipe with a known gap center
    pub fn with_gap(x: f32, height: f32, cfg: &PipeConfig) -> Self {
        Self {
            x,
            height,
            top: height - cfg.height as f32,
            bottom: height + cfg.gap,
            passed: false,
        }
    }

    /// Scroll one tick left
    pub fn advance(&mut self, cfg: &PipeConfig) {
        self.x -= cfg.scroll_velocity;
    }

    #[inline]
    pub fn right_edge(&self, cfg: &PipeConfig) -> f32 {
        self.x + cfg.width as f32
    }

    /// Fully scrolled past the left edge
    #[inline]
    pub fn is_off_screen(&self, cfg: &PipeConfig) -> bool {
        self.right_edge(cfg) < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_boundary_span_is_constant() {
        let cfg = PipeConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let pipe = Pipe::new(600.0, &mut rng, &cfg);
            assert!(pipe.height >= cfg.gap_min as f32 && pipe.height < cfg.gap_max as f32);
            assert_eq!(pipe.bottom - pipe.top, cfg.gap + cfg.height as f32);
            assert_eq!(pipe.height.fract(), 0.0);
        }
    }

    #[test]
    fn test_with_gap_is_deterministic() {
        let cfg = PipeConfig::default();
        assert_eq!(Pipe::with_gap(700.0, 250.0, &cfg), Pipe::with_gap(700.0, 250.0, &cfg));
        let pipe = Pipe::with_gap(700.0, 250.0, &cfg);
        assert_eq!(pipe.top, 250.0 - 640.0);
        assert_eq!(pipe.bottom, 450.0);
        assert!(!pipe.passed);
    }

    #[test]
    fn test_scrolls_off_screen() {
        let cfg = PipeConfig::default();
        let mut pipe = Pipe::with_gap(0.0, 250.0, &cfg);
        pipe.advance(&cfg);
        assert_eq!(pipe.x, -cfg.scroll_velocity);
        assert!(!pipe.is_off_screen(&cfg));
        while pipe.right_edge(&cfg) >= 0.0 {
            pipe.advance(&cfg);
        }
        assert!(pipe.is_off_screen(&cfg));
    }
}
