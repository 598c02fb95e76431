use crate::config::TimeConfig;

/// Day/night clock advanced once per tick in the TIME_UPDATE phase.
///
/// The activity modifier is a triangle wave rather than a sinusoid so that
/// hot paths stay free of transcendental functions whose results vary
/// across platforms.
#[derive(Debug, Clone)]
pub struct DayClock {
    day_length: u64,
    night_activity: f32,
    pub time_of_day: f32,
    pub activity: f32,
}

impl DayClock {
    pub fn new(config: &TimeConfig) -> Self {
        let mut clock = Self {
            day_length: config.day_length,
            night_activity: config.night_activity,
            time_of_day: 0.0,
            activity: config.night_activity,
        };
        clock.update(0);
        clock
    }

    /// Recomputes `time_of_day` in `[0, 1)` (0.5 = noon) and the activity
    /// modifier in `[night_activity, 1.0]`.
    pub fn update(&mut self, frame: u64) {
        let phase = (frame % self.day_length) as f32 / self.day_length as f32;
        self.time_of_day = phase;
        let triangle = 1.0 - (2.0 * (phase - 0.5)).abs();
        self.activity = self.night_activity + (1.0 - self.night_activity) * triangle;
    }
}
