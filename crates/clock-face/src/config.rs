use anyhow::Result;
use winit::dpi::LogicalSize;

use clock_engine::window::RuntimeConfig;

/// Clock face configuration.
///
/// Defaults reproduce the classic 600×600 face: a 40-sided disc of radius 1.0
/// with an inner disc of radius 0.8, leaving a 0.2-wide rim.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    pub title: String,
    /// Window width and height in logical pixels (screen coordinates), so the
    /// framebuffer is `window_size * scale_factor` physical pixels on HiDPI
    /// displays. Geometry assumes a square.
    pub window_size: f64,
    /// Number of segments approximating each disc.
    pub sides: u32,
    /// Radius of the rim disc, in normalized device units.
    pub outer_radius: f32,
    /// Radius of the face disc drawn over the rim disc.
    pub inner_radius: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            title: "opengl-lines".to_string(),
            window_size: 600.0,
            sides: 40,
            outer_radius: 1.0,
            inner_radius: 0.8,
        }
    }
}

impl ClockConfig {
    /// Largest side count whose fan still fits 16-bit indices (`sides + 2` vertices).
    pub const MAX_SIDES: u32 = u16::MAX as u32 - 1;

    /// Checks that the geometry derived from this config is drawable.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.sides >= 3, "sides must be at least 3, got {}", self.sides);
        anyhow::ensure!(
            self.sides <= Self::MAX_SIDES,
            "sides must be at most {}, got {}",
            Self::MAX_SIDES,
            self.sides
        );
        anyhow::ensure!(
            self.outer_radius > 0.0 && self.outer_radius <= 1.0,
            "outer radius must be in (0, 1], got {}",
            self.outer_radius
        );
        anyhow::ensure!(
            self.inner_radius > 0.0 && self.inner_radius < self.outer_radius,
            "inner radius must be in (0, {}), got {}",
            self.outer_radius,
            self.inner_radius
        );
        anyhow::ensure!(
            self.window_size.is_finite() && self.window_size >= 1.0,
            "window size must be at least 1px, got {}",
            self.window_size
        );
        Ok(())
    }

    /// Window settings for the engine runtime.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.window_size, self.window_size),
            resizable: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(ClockConfig::default().validate().is_ok());
    }

    #[test]
    fn default_matches_classic_face() {
        let c = ClockConfig::default();
        assert_eq!(c.title, "opengl-lines");
        assert_eq!(c.sides, 40);
        assert_eq!((c.outer_radius, c.inner_radius), (1.0, 0.8));
    }

    #[test]
    fn rejects_too_few_sides() {
        let c = ClockConfig { sides: 2, ..ClockConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_sides_beyond_u16_indices() {
        let c = ClockConfig { sides: ClockConfig::MAX_SIDES + 1, ..ClockConfig::default() };
        assert!(c.validate().is_err());
        let c = ClockConfig { sides: ClockConfig::MAX_SIDES, ..ClockConfig::default() };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_inner_not_smaller_than_outer() {
        let c = ClockConfig { inner_radius: 1.0, ..ClockConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_outer_beyond_ndc() {
        let c = ClockConfig { outer_radius: 1.2, ..ClockConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn runtime_config_is_square_and_fixed() {
        let rc = ClockConfig::default().runtime_config();
        assert_eq!(rc.initial_size, LogicalSize::new(600.0, 600.0));
        assert!(!rc.resizable);
        assert_eq!(rc.title, "opengl-lines");
    }

    #[test]
    fn window_size_is_logical_not_physical() {
        let rc = ClockConfig::default().runtime_config();
        let at_2x: winit::dpi::PhysicalSize<u32> = rc.initial_size.to_physical(2.0);
        assert_eq!(at_2x, winit::dpi::PhysicalSize::new(1200, 1200));
    }
}
