//! Form field rules: numeric clamping and prompt validation.

use crate::error::{GenerationError, Result};
use std::fmt;
use std::str::FromStr;

pub const MIN_PROMPT_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBounds {
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Width,
    Height,
    Steps,
}

impl NumericField {
    pub const ALL: [NumericField; 3] = [NumericField::Width, NumericField::Height, NumericField::Steps];

    pub fn bounds(&self) -> FieldBounds {
        match self {
            NumericField::Width | NumericField::Height => FieldBounds {
                min: 256,
                max: 2048,
                step: 64,
            },
            NumericField::Steps => FieldBounds {
                min: 1,
                max: 50,
                step: 1,
            },
        }
    }

    pub fn default_value(&self) -> u32 {
        match self {
            NumericField::Width | NumericField::Height => 1024,
            NumericField::Steps => 28,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NumericField::Width => "width",
            NumericField::Height => "height",
            NumericField::Steps => "steps",
        }
    }

    /// Clamp raw input text the way the field does on every keystroke.
    pub fn clamp_input(&self, raw: &str) -> u32 {
        self.clamp_value(parse_int_prefix(raw))
    }

    pub fn clamp_value(&self, value: Option<i64>) -> u32 {
        let FieldBounds { min, max, step } = self.bounds();
        // Bounds are small and positive, so the clamped value always fits.
        clamp(value, min, max, step) as u32
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumericField {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "width" | "w" => Ok(NumericField::Width),
            "height" | "h" => Ok(NumericField::Height),
            "steps" | "s" => Ok(NumericField::Steps),
            other => Err(GenerationError::Validation(format!(
                "Unknown field '{}', expected width, height or steps",
                other
            ))),
        }
    }
}

/// Constrain `value` to `[min, max]` and snap it to the `step` grid.
///
/// Missing (non-numeric) and below-minimum values become `min`, values above
/// the range become `max`, everything else is rounded to the nearest
/// multiple of `step`.
pub fn clamp(value: Option<i64>, min: i64, max: i64, step: i64) -> i64 {
    let step = step.max(1);
    let value = match value {
        Some(v) if v >= min => v.min(max),
        _ => min,
    };

    let snapped = (value as f64 / step as f64).round() as i64 * step;
    snapped.clamp(min, max)
}

/// Parse the leading integer of `raw`: optional whitespace and sign, then
/// digits. Trailing garbage is ignored (`"512px"` is 512, `"3.9"` is 3).
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Only overflow can fail here; saturate like a float parse would.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Returns the trimmed prompt, or the validation message for the alert.
pub fn validate_prompt(raw: &str) -> Result<&str> {
    let prompt = raw.trim();

    if prompt.is_empty() {
        return Err(GenerationError::Validation(
            "Please enter a prompt to generate an image".into(),
        ));
    }

    if prompt.chars().count() < MIN_PROMPT_CHARS {
        return Err(GenerationError::Validation(
            "Prompt is too short. Please provide more details".into(),
        ));
    }

    Ok(prompt)
}
