use anyhow::Result;

use clock_engine::core::{App, AppControl, FrameCtx};
use clock_engine::device::{Gpu, GpuInit};
use clock_engine::window::Runtime;

use crate::config::ClockConfig;
use crate::frame::FramePlan;
use crate::geometry::ClockGeometry;
use crate::render::ClockRenderer;
use crate::time::{ClockAngles, ClockTime, LocalClock, TimeSource};

/// The clock application: builds GPU resources at startup and paints the face
/// and hands for the current time every frame.
pub struct ClockApp<T: TimeSource = LocalClock> {
    config: ClockConfig,
    time_source: T,
    renderer: Option<ClockRenderer>,
    last_shown: Option<ClockTime>,
}

impl ClockApp<LocalClock> {
    pub fn new(config: ClockConfig) -> Self {
        Self::with_time_source(config, LocalClock)
    }
}

impl<T: TimeSource> ClockApp<T> {
    pub fn with_time_source(config: ClockConfig, time_source: T) -> Self {
        Self {
            config,
            time_source,
            renderer: None,
            last_shown: None,
        }
    }

    /// Reads the time source and derives this frame's draw plan.
    pub fn plan_frame(&mut self) -> FramePlan {
        let now = self.time_source.now();
        if self.last_shown != Some(now) {
            log::trace!("showing {:02}:{:02}:{:02}", now.hour(), now.minute(), now.second());
            self.last_shown = Some(now);
        }
        FramePlan::build(&ClockAngles::from_time(now))
    }
}

impl<T: TimeSource> App for ClockApp<T> {
    fn on_start(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let info = gpu.adapter_info();
        log::info!("rendering on {} ({:?})", info.name, info.backend);

        let geometry = ClockGeometry::generate(&self.config);
        self.renderer = Some(ClockRenderer::new(gpu, geometry)?);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let plan = self.plan_frame();
        let Some(renderer) = self.renderer.as_mut() else {
            log::error!("frame requested before GPU resources were created");
            return AppControl::Exit;
        };

        ctx.render(plan.clear, |rctx, target| renderer.render(rctx, target, &plan))
    }
}

/// Validates `config` and runs the clock until its window is closed.
pub fn run(config: ClockConfig) -> Result<()> {
    config.validate()?;

    let runtime_config = config.runtime_config();
    // Linear surface so the face colors reach the screen unconverted.
    let gpu_init = GpuInit {
        prefer_srgb: false,
        ..GpuInit::default()
    };

    log::info!(
        "starting clock: {} sides, radii {}/{}",
        config.sides,
        config.outer_radius,
        config.inner_radius
    );

    Runtime::run(runtime_config, gpu_init, ClockApp::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Hand;
    use crate::time::FixedTime;

    fn app_at(h: u32, m: u32, s: u32) -> ClockApp<FixedTime> {
        ClockApp::with_time_source(ClockConfig::default(), FixedTime(ClockTime::new(h, m, s)))
    }

    #[test]
    fn plan_follows_injected_time() {
        let mut app = app_at(3, 15, 45);
        let expected = FramePlan::build(&ClockAngles::from_time(ClockTime::new(3, 15, 45)));
        assert_eq!(app.plan_frame(), expected);
    }

    #[test]
    fn repeated_frames_are_identical() {
        let mut app = app_at(9, 41, 7);
        let first = app.plan_frame();
        let second = app.plan_frame();
        assert_eq!(first, second);
    }

    #[test]
    fn noon_hands_match_their_style() {
        let mut app = app_at(12, 0, 0);
        let plan = app.plan_frame();
        let angles = ClockAngles::from_time(ClockTime::new(12, 0, 0));
        for (i, hand) in Hand::ALL.into_iter().enumerate() {
            assert_eq!(plan.draws[2 + i].model, hand.model(&angles));
        }
    }

    #[test]
    fn last_shown_tracks_time() {
        let mut app = app_at(1, 2, 3);
        assert_eq!(app.last_shown, None);
        app.plan_frame();
        assert_eq!(app.last_shown, Some(ClockTime::new(1, 2, 3)));
    }

    #[test]
    fn run_rejects_invalid_config_before_opening_a_window() {
        let config = ClockConfig { sides: 1, ..ClockConfig::default() };
        assert!(run(config).is_err());
    }
}
