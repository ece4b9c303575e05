//! Image + text-bbox transforms.
//!
//! An [`Effect`] receives a canvas and the bbox of the text on it and returns both, possibly
//! resized and moved. [`Effects`] folds its steps left to right so later steps see the bbox as
//! earlier ones left it.

use rand::RngCore;

use crate::foundation::core::{BBox, Canvas};
use crate::foundation::error::{SynthError, SynthResult};
use crate::foundation::random;
use crate::render::color::TextColorConfig;

pub mod curve;
pub mod dropout;
pub mod line;
pub mod padding;
pub mod text_border;

pub use curve::Curve;
pub use dropout::{DropoutHorizontal, DropoutRand, DropoutVertical};
pub use line::{Line, LinePosition};
pub use padding::Padding;
pub use text_border::{BorderStyle, TextBorder};

pub trait Effect: std::fmt::Debug {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Unconditionally transform `canvas`. The returned bbox must address the returned canvas.
    fn apply(
        &self,
        canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> SynthResult<(Canvas, BBox)>;
}

/// Run `effect` with probability `p`; otherwise hand back the inputs untouched.
///
/// Render failures are tagged with the effect's name.
pub fn apply_with_prob(
    effect: &dyn Effect,
    p: f64,
    canvas: Canvas,
    bbox: BBox,
    rng: &mut dyn RngCore,
) -> SynthResult<(Canvas, BBox)> {
    if !random::prob(rng, p) {
        return Ok((canvas, bbox));
    }
    effect.apply(canvas, bbox, rng).map_err(|e| {
        tracing::debug!(effect = effect.name(), "effect failed: {e}");
        match e {
            SynthError::Render(msg) => SynthError::render(format!("{}: {msg}", effect.name())),
            other => other,
        }
    })
}

/// One step of an [`Effects`] chain.
#[derive(Debug)]
pub enum Step {
    Gated { p: f64, effect: Box<dyn Effect> },
    /// Pick one child uniformly; its own gate still applies.
    OneOf(Vec<Step>),
    Identity,
}

impl Step {
    pub fn apply(
        &self,
        canvas: Canvas,
        bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> SynthResult<(Canvas, BBox)> {
        match self {
            Self::Gated { p, effect } => apply_with_prob(effect.as_ref(), *p, canvas, bbox, rng),
            Self::OneOf(steps) if steps.is_empty() => Ok((canvas, bbox)),
            Self::OneOf(steps) => {
                let idx = random::index(rng, steps.len());
                steps[idx].apply(canvas, bbox, rng)
            }
            Self::Identity => Ok((canvas, bbox)),
        }
    }
}

/// Ordered effect chain.
#[derive(Debug, Default)]
pub struct Effects {
    steps: Vec<Step>,
}

impl Effects {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// The identity chain.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_configs(configs: &[EffectConfig]) -> SynthResult<Self> {
        Ok(Self::new(
            configs
                .iter()
                .map(EffectConfig::build)
                .collect::<SynthResult<Vec<_>>>()?,
        ))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn apply_effects(
        &self,
        mut canvas: Canvas,
        mut bbox: BBox,
        rng: &mut dyn RngCore,
    ) -> SynthResult<(Canvas, BBox)> {
        for step in &self.steps {
            (canvas, bbox) = step.apply(canvas, bbox, rng)?;
        }
        Ok((canvas, bbox))
    }
}

/// Effect configuration, tagged by `type`.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectConfig {
    Padding {
        #[serde(default = "default_p")]
        p: f64,
        #[serde(default = "padding::default_w_ratio")]
        w_ratio: (f64, f64),
        #[serde(default = "padding::default_h_ratio")]
        h_ratio: (f64, f64),
    },
    DropoutRand {
        #[serde(default = "default_p")]
        p: f64,
        #[serde(default = "dropout::default_dropout_p")]
        dropout_p: (f64, f64),
    },
    DropoutHorizontal {
        #[serde(default = "default_p")]
        p: f64,
        #[serde(default = "dropout::default_num_line_horizontal")]
        num_line: u32,
        #[serde(default = "dropout::default_thickness")]
        thickness: u32,
    },
    DropoutVertical {
        #[serde(default = "default_p")]
        p: f64,
        #[serde(default = "dropout::default_num_line_vertical")]
        num_line: u32,
        #[serde(default = "dropout::default_thickness")]
        thickness: u32,
    },
    Line {
        #[serde(default = "default_p")]
        p: f64,
        #[serde(default = "line::default_thickness")]
        thickness: (u32, u32),
        #[serde(default = "line::default_lr_in_offset")]
        lr_in_offset: (u32, u32),
        #[serde(default = "line::default_lr_out_offset")]
        lr_out_offset: (u32, u32),
        #[serde(default = "line::default_tb_in_offset")]
        tb_in_offset: (u32, u32),
        #[serde(default = "line::default_tb_out_offset")]
        tb_out_offset: (u32, u32),
        #[serde(default = "line::default_line_pos_p")]
        line_pos_p: [f64; 10],
        #[serde(default)]
        color: Option<TextColorConfig>,
    },
    Curve {
        #[serde(default = "default_p")]
        p: f64,
        #[serde(default = "curve::default_period")]
        period: f64,
        #[serde(default = "curve::default_amplitude")]
        amplitude: (f64, f64),
    },
    TextBorder {
        #[serde(default = "default_p")]
        p: f64,
        #[serde(default = "text_border::default_border_width")]
        border_width: (u32, u32),
        #[serde(default)]
        style: BorderStyle,
        #[serde(default)]
        blur_radius: f32,
        #[serde(default)]
        color: Option<TextColorConfig>,
        #[serde(default = "default_true")]
        light_enable: bool,
        #[serde(default = "default_true")]
        dark_enable: bool,
        #[serde(default = "default_half")]
        light_fraction: f64,
    },
    OneOf {
        effects: Vec<EffectConfig>,
    },
    NoEffects,
}

fn default_p() -> f64 {
    0.5
}

fn default_half() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

fn check_p(p: f64) -> SynthResult<f64> {
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(SynthError::config(format!("effect probability must be in [0, 1], got {p}")))
    }
}

fn check_range<T: PartialOrd + std::fmt::Debug>(name: &str, r: (T, T)) -> SynthResult<(T, T)> {
    if r.0 < r.1 {
        Ok(r)
    } else {
        Err(SynthError::config(format!(
            "{name} must be [min, max) with min < max, got {r:?}"
        )))
    }
}

impl EffectConfig {
    pub fn build(&self) -> SynthResult<Step> {
        Ok(match self.clone() {
            Self::Padding {
                p,
                w_ratio,
                h_ratio,
            } => Step::Gated {
                p: check_p(p)?,
                effect: Box::new(Padding {
                    w_ratio: check_range("padding w_ratio", w_ratio)?,
                    h_ratio: check_range("padding h_ratio", h_ratio)?,
                }),
            },
            Self::DropoutRand { p, dropout_p } => {
                let dropout_p = check_range("dropout_p", dropout_p)?;
                if dropout_p.0 < 0.0 || dropout_p.1 > 1.0 {
                    return Err(SynthError::config("dropout_p must lie within [0, 1]"));
                }
                Step::Gated {
                    p: check_p(p)?,
                    effect: Box::new(DropoutRand { dropout_p }),
                }
            }
            Self::DropoutHorizontal {
                p,
                num_line,
                thickness,
            } => Step::Gated {
                p: check_p(p)?,
                effect: Box::new(DropoutHorizontal {
                    num_line,
                    thickness,
                }),
            },
            Self::DropoutVertical {
                p,
                num_line,
                thickness,
            } => Step::Gated {
                p: check_p(p)?,
                effect: Box::new(DropoutVertical {
                    num_line,
                    thickness,
                }),
            },
            Self::Line {
                p,
                thickness,
                lr_in_offset,
                lr_out_offset,
                tb_in_offset,
                tb_out_offset,
                line_pos_p,
                color,
            } => {
                let sum: f64 = line_pos_p.iter().sum();
                if line_pos_p.iter().any(|v| *v < 0.0) || (sum - 1.0).abs() > 1e-6 {
                    return Err(SynthError::config(format!(
                        "line_pos_p must be non-negative and sum to 1, got sum {sum}"
                    )));
                }
                if let Some(color) = &color {
                    color.validate()?;
                }
                Step::Gated {
                    p: check_p(p)?,
                    effect: Box::new(Line {
                        thickness: check_range("line thickness", thickness)?,
                        lr_in_offset: check_range("lr_in_offset", lr_in_offset)?,
                        lr_out_offset: check_range("lr_out_offset", lr_out_offset)?,
                        tb_in_offset: check_range("tb_in_offset", tb_in_offset)?,
                        tb_out_offset: check_range("tb_out_offset", tb_out_offset)?,
                        line_pos_p,
                        color,
                    }),
                }
            }
            Self::Curve {
                p,
                period,
                amplitude,
            } => {
                if !(period > 0.0 && period.is_finite()) {
                    return Err(SynthError::config(format!(
                        "curve period must be positive, got {period}"
                    )));
                }
                Step::Gated {
                    p: check_p(p)?,
                    effect: Box::new(Curve {
                        period,
                        amplitude: check_range("curve amplitude", amplitude)?,
                    }),
                }
            }
            Self::TextBorder {
                p,
                border_width,
                style,
                blur_radius,
                color,
                light_enable,
                dark_enable,
                light_fraction,
            } => {
                if border_width.0 == 0 {
                    return Err(SynthError::config("border_width must start at 1 or more"));
                }
                if !(blur_radius >= 0.0 && blur_radius.is_finite()) {
                    return Err(SynthError::config(format!(
                        "blur_radius must be non-negative, got {blur_radius}"
                    )));
                }
                if !(0.0..=1.0).contains(&light_fraction) {
                    return Err(SynthError::config(format!(
                        "light_fraction must be in [0, 1], got {light_fraction}"
                    )));
                }
                if let Some(color) = &color {
                    color.validate()?;
                }
                Step::Gated {
                    p: check_p(p)?,
                    effect: Box::new(TextBorder {
                        border_width: check_range("border_width", border_width)?,
                        style,
                        blur_radius,
                        color,
                        light_enable,
                        dark_enable,
                        light_fraction,
                    }),
                }
            }
            Self::OneOf { effects } => {
                if effects.is_empty() {
                    return Err(SynthError::config("one_of needs at least one effect"));
                }
                Step::OneOf(
                    effects
                        .iter()
                        .map(EffectConfig::build)
                        .collect::<SynthResult<Vec<_>>>()?,
                )
            }
            Self::NoEffects => Step::Identity,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mod.rs"]
mod tests;
