//! Day/night cycle: a directional sun light swinging around the X axis.

use std::f32::consts::TAU;

use keel_core::{
    BackendError, Environment, LightKind, Quat, RenderBackend, RenderObjectDesc, RenderObjectId,
    SceneHandle, Transform, Vec3,
};

/// Seconds in a full day by default.
pub const DEFAULT_DAY_LENGTH: f32 = 120.0;

const SUN_COLOUR: Vec3 = Vec3::new(1.0, 0.95, 0.85);

/// Environment that advances a time of day and aims a sun light with it.
#[derive(Debug)]
pub struct DayCycle {
    day_length: f32,
    time_of_day: f32,
    paused: bool,
    sun: Option<RenderObjectId>,
}

impl Default for DayCycle {
    fn default() -> Self {
        Self::new(DEFAULT_DAY_LENGTH)
    }
}

impl DayCycle {
    /// Cycle lasting `day_length` seconds, starting at dawn.
    #[must_use]
    pub fn new(day_length: f32) -> Self {
        Self {
            day_length: day_length.max(f32::EPSILON),
            time_of_day: 0.0,
            paused: false,
            sun: None,
        }
    }

    /// Fraction of the day elapsed, in `[0, 1)`. Zero is dawn, one half is
    /// dusk.
    #[inline]
    #[must_use]
    pub const fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    /// Whether the sun is above the horizon.
    #[must_use]
    pub fn is_daytime(&self) -> bool {
        self.time_of_day < 0.5
    }

    /// Whether the world paused the cycle.
    #[inline]
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Render handle of the sun light while initialized.
    #[inline]
    #[must_use]
    pub const fn sun(&self) -> Option<RenderObjectId> {
        self.sun
    }

    fn sun_transform(&self) -> Transform {
        let angle = self.time_of_day * TAU;
        Transform::new(Vec3::ZERO, Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), angle))
    }
}

impl Environment for DayCycle {
    fn init(
        &mut self,
        render: &mut dyn RenderBackend,
        scene: SceneHandle,
    ) -> Result<(), BackendError> {
        let sun = render.create_object(
            scene,
            &RenderObjectDesc::Light {
                kind: LightKind::Directional,
                colour: SUN_COLOUR,
            },
        )?;
        render.set_transform(sun, &self.sun_transform());
        self.sun = Some(sun);
        self.paused = false;
        tracing::debug!(day_length = self.day_length, "Day cycle started");
        Ok(())
    }

    fn destroy(&mut self, render: &mut dyn RenderBackend) {
        if let Some(sun) = self.sun.take() {
            render.destroy_object(sun);
        }
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn update(
        &mut self,
        render: &mut dyn RenderBackend,
        frame_time: f32,
    ) -> Result<(), BackendError> {
        if self.paused {
            return Ok(());
        }
        let Some(sun) = self.sun else {
            return Ok(());
        };

        let was_day = self.is_daytime();
        self.time_of_day = (self.time_of_day + frame_time / self.day_length).fract();
        render.set_transform(sun, &self.sun_transform());

        if was_day != self.is_daytime() {
            tracing::debug!(daytime = self.is_daytime(), "Sun crossed the horizon");
        }
        Ok(())
    }
}
