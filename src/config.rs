//! Wheel configuration: segments, size and spin tuning.
//!
//! Everything here is validated once at construction and never mutated after.

use crate::defaults;
use crate::errors::ConfigError;
use crate::outcome::arc_width;
use crate::types::{Color, check_positive};

/// One wedge of the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub color: Color,
    pub label: String,
}

impl Segment {
    pub fn new(color: Color, label: impl Into<String>) -> Self {
        Self {
            color,
            label: label.into(),
        }
    }
}

/// The four tunable constants of the spin physics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTuning {
    /// Per-frame velocity multiplier, strictly inside (0, 1).
    pub friction: f64,
    /// Lower bound of the initial angular velocity (radians per frame).
    pub min_velocity: f64,
    /// Upper bound of the initial angular velocity (radians per frame).
    pub max_velocity: f64,
    /// The wheel may only stop once its velocity is below this.
    pub stop_velocity: f64,
    /// ...and it is within this distance of the target angle.
    pub stop_angle: f64,
}

impl Default for SpinTuning {
    fn default() -> Self {
        Self {
            friction: defaults::FRICTION,
            min_velocity: defaults::MIN_INITIAL_VELOCITY,
            max_velocity: defaults::MAX_INITIAL_VELOCITY,
            stop_velocity: defaults::STOP_VELOCITY,
            stop_angle: defaults::STOP_ANGLE,
        }
    }
}

impl SpinTuning {
    /// Velocity floor for friction decay.
    ///
    /// Decay stops here; a spin launched slower than the floor keeps its
    /// launch speed. Every step at or below this floor is shorter than the
    /// `2 * stop_angle` wide stop window, so the wheel cannot hop over the
    /// target and settles within one more revolution.
    pub fn creep_velocity(&self) -> f64 {
        self.stop_velocity.min(2.0 * self.stop_angle) * 0.5
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = self.friction;
        if !(f.is_finite() && f > 0.0 && f < 1.0) {
            return Err(ConfigError::InvalidFriction { value: f });
        }

        let (min, max) = (self.min_velocity, self.max_velocity);
        if check_positive(min).is_err() || check_positive(max).is_err() || min > max {
            return Err(ConfigError::InvalidVelocityRange { min, max });
        }

        check_positive(self.stop_velocity).map_err(|reason| ConfigError::InvalidStopVelocity {
            value: self.stop_velocity,
            reason,
        })?;
        check_positive(self.stop_angle).map_err(|reason| ConfigError::InvalidStopAngle {
            value: self.stop_angle,
            reason,
        })?;
        Ok(())
    }
}

/// An immutable wheel: ordered segments, size, pixel density and tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelConfig {
    segments: Vec<Segment>,
    radius: f64,
    pixel_ratio: f64,
    tuning: SpinTuning,
    arc: f64,
}

impl WheelConfig {
    pub fn new(
        segments: Vec<Segment>,
        radius: f64,
        pixel_ratio: f64,
        tuning: SpinTuning,
    ) -> Result<Self, ConfigError> {
        if segments.is_empty() {
            return Err(ConfigError::EmptySegments);
        }
        check_positive(radius)
            .map_err(|reason| ConfigError::InvalidRadius { value: radius, reason })?;
        check_positive(pixel_ratio).map_err(|reason| ConfigError::InvalidPixelRatio {
            value: pixel_ratio,
            reason,
        })?;
        tuning.validate()?;

        let arc = arc_width(segments.len());
        if tuning.stop_angle >= arc / 2.0 {
            return Err(ConfigError::StopAngleTooWide {
                value: tuning.stop_angle,
                half_wedge: arc / 2.0,
            });
        }

        Ok(Self {
            segments,
            radius,
            pixel_ratio,
            tuning,
            arc,
        })
    }

    pub fn builder() -> WheelConfigBuilder {
        WheelConfigBuilder::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Radius in CSS pixels.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Radius on the backing surface, `radius * pixel_ratio`.
    pub fn pixel_radius(&self) -> f64 {
        self.radius * self.pixel_ratio
    }

    /// Label font size on the backing surface.
    pub fn font_size(&self) -> f64 {
        defaults::FONT_SIZE * self.pixel_ratio
    }

    pub fn tuning(&self) -> &SpinTuning {
        &self.tuning
    }

    /// Angular width of one wedge, `2π / segment_count`.
    pub fn arc_width(&self) -> f64 {
        self.arc
    }
}

/// Chained construction of a [`WheelConfig`].
#[derive(Debug, Clone)]
pub struct WheelConfigBuilder {
    segments: Vec<Segment>,
    radius: f64,
    pixel_ratio: f64,
    tuning: SpinTuning,
}

impl Default for WheelConfigBuilder {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            radius: defaults::RADIUS,
            pixel_ratio: defaults::PIXEL_RATIO,
            tuning: SpinTuning::default(),
        }
    }
}

impl WheelConfigBuilder {
    pub fn segment(mut self, color: Color, label: impl Into<String>) -> Self {
        self.segments.push(Segment::new(color, label));
        self
    }

    pub fn segments(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
        self.segments.extend(segments);
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    pub fn tuning(mut self, tuning: SpinTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn friction(mut self, friction: f64) -> Self {
        self.tuning.friction = friction;
        self
    }

    pub fn velocity_range(mut self, min: f64, max: f64) -> Self {
        self.tuning.min_velocity = min;
        self.tuning.max_velocity = max;
        self
    }

    pub fn stop_thresholds(mut self, velocity: f64, angle: f64) -> Self {
        self.tuning.stop_velocity = velocity;
        self.tuning.stop_angle = angle;
        self
    }

    pub fn build(self) -> Result<WheelConfig, ConfigError> {
        WheelConfig::new(self.segments, self.radius, self.pixel_ratio, self.tuning)
    }
}
