//! Textual wheel descriptions.
//!
//! ```text
//! // six prizes, retina display
//! pixel_ratio = 2
//! friction = 0.99
//! segment "一等奖" #0bf
//! segment "二等奖" #fb0
//! ```
//!
//! Settings are optional and may each appear once. Segments are listed in
//! wheel order, clockwise from three o'clock.

use std::collections::HashMap;

use miette::SourceSpan;
use pest::Parser;
use pest::iterators::Pair;

use crate::config::{Segment, SpinTuning, WheelConfig};
use crate::engine::SpinEngine;
use crate::errors::{DescriptionError, SourceContext};
use crate::log;
use crate::types::Color;
use crate::{Rule, WheelParser};

/// A parsed description: the wheel plus an optional RNG seed.
#[derive(Debug, Clone)]
pub struct WheelDescription {
    pub config: WheelConfig,
    pub seed: Option<u64>,
}

impl WheelDescription {
    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    /// A fresh engine for this wheel, seeded if the description sets `seed`.
    pub fn engine(&self) -> SpinEngine {
        match self.seed {
            Some(seed) => SpinEngine::with_seed(self.config.clone(), seed),
            None => SpinEngine::new(self.config.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Setting {
    Radius,
    PixelRatio,
    Friction,
    MinVelocity,
    MaxVelocity,
    StopVelocity,
    StopAngle,
    Seed,
}

impl Setting {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "radius" => Self::Radius,
            "pixel_ratio" => Self::PixelRatio,
            "friction" => Self::Friction,
            "min_velocity" => Self::MinVelocity,
            "max_velocity" => Self::MaxVelocity,
            "stop_velocity" => Self::StopVelocity,
            "stop_angle" => Self::StopAngle,
            "seed" => Self::Seed,
            _ => return None,
        })
    }
}

fn span_of(pair: &Pair<'_, Rule>) -> SourceSpan {
    let span = pair.as_span();
    (span.start(), span.end() - span.start()).into()
}

/// Parse a wheel description. `name` labels the source in diagnostics.
pub fn parse_wheel(name: &str, source: &str) -> Result<WheelDescription, DescriptionError> {
    let ctx = SourceContext::new(name, source);

    let program = WheelParser::parse(Rule::program, source)
        .map_err(|e| {
            let span: SourceSpan = match e.location {
                pest::error::InputLocation::Pos(pos) => (pos, 0).into(),
                pest::error::InputLocation::Span((start, end)) => (start, end - start).into(),
            };
            DescriptionError::Syntax {
                message: e.variant.message().into_owned(),
                src: ctx.named_source(),
                span,
            }
        })?
        .next()
        .ok_or_else(|| DescriptionError::Syntax {
            message: "empty parse".to_string(),
            src: ctx.named_source(),
            span: (0, 0).into(),
        })?;

    let mut builder = WheelConfig::builder();
    let mut tuning = SpinTuning::default();
    let mut seed = None;
    let mut seen: HashMap<Setting, SourceSpan> = HashMap::new();

    for statement in program.into_inner() {
        match statement.as_rule() {
            Rule::segment => {
                builder = builder.segments([read_segment(statement, &ctx)?]);
            }
            Rule::setting => {
                let span = span_of(&statement);
                let mut inner = statement.into_inner();
                let (Some(ident), Some(number)) = (inner.next(), inner.next()) else {
                    continue;
                };

                let setting = Setting::from_name(ident.as_str()).ok_or_else(|| {
                    DescriptionError::UnknownSetting {
                        name: ident.as_str().to_string(),
                        src: ctx.named_source(),
                        span: span_of(&ident),
                    }
                })?;
                if let Some(first) = seen.insert(setting, span) {
                    return Err(DescriptionError::DuplicateSetting {
                        name: ident.as_str().to_string(),
                        src: ctx.named_source(),
                        span,
                        first,
                    });
                }

                if setting == Setting::Seed {
                    seed = Some(read_seed(&number, &ctx)?);
                    continue;
                }
                let value = read_number(&number, &ctx)?;
                match setting {
                    Setting::Radius => builder = builder.radius(value),
                    Setting::PixelRatio => builder = builder.pixel_ratio(value),
                    Setting::Friction => tuning.friction = value,
                    Setting::MinVelocity => tuning.min_velocity = value,
                    Setting::MaxVelocity => tuning.max_velocity = value,
                    Setting::StopVelocity => tuning.stop_velocity = value,
                    Setting::StopAngle => tuning.stop_angle = value,
                    Setting::Seed => {}
                }
            }
            _ => {}
        }
    }

    let config = builder.tuning(tuning).build()?;
    log::debug!(
        source = name,
        segments = config.segment_count(),
        seed,
        "wheel description parsed"
    );
    Ok(WheelDescription { config, seed })
}

fn read_segment(pair: Pair<'_, Rule>, ctx: &SourceContext) -> Result<Segment, DescriptionError> {
    let span = span_of(&pair);
    let mut inner = pair.into_inner();
    let (Some(string), Some(color)) = (inner.next(), inner.next()) else {
        return Err(DescriptionError::Syntax {
            message: "a segment needs a label and a color".to_string(),
            src: ctx.named_source(),
            span,
        });
    };

    let label = string
        .into_inner()
        .next()
        .map(|text| unescape(text.as_str()))
        .unwrap_or_default();
    let color = color
        .as_str()
        .parse::<Color>()
        .map_err(|_| DescriptionError::InvalidColor {
            text: color.as_str().to_string(),
            src: ctx.named_source(),
            span: span_of(&color),
        })?;
    Ok(Segment::new(color, label))
}

fn read_number(pair: &Pair<'_, Rule>, ctx: &SourceContext) -> Result<f64, DescriptionError> {
    pair.as_str()
        .parse::<f64>()
        .map_err(|e| DescriptionError::InvalidNumber {
            message: e.to_string(),
            src: ctx.named_source(),
            span: span_of(pair),
        })
}

fn read_seed(pair: &Pair<'_, Rule>, ctx: &SourceContext) -> Result<u64, DescriptionError> {
    pair.as_str()
        .parse::<u64>()
        .map_err(|e| DescriptionError::InvalidNumber {
            message: format!("seed must be a non-negative integer ({e})"),
            src: ctx.named_source(),
            span: span_of(pair),
        })
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
