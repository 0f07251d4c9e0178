use crate::{
    error::Result,
    form::{validate_prompt, NumericField},
};
use serde::{Deserialize, Serialize};

/// One generation call. Built fresh per request and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    prompt: String,
    width: u32,
    height: u32,
    steps: u32,
}

impl GenerationRequest {
    /// Validates the prompt and clamps each dimension into its field range.
    pub fn new(prompt: &str, width: u32, height: u32, steps: u32) -> Result<Self> {
        let prompt = validate_prompt(prompt)?;

        Ok(Self {
            prompt: prompt.to_string(),
            width: NumericField::Width.clamp_value(Some(width.into())),
            height: NumericField::Height.clamp_value(Some(height.into())),
            steps: NumericField::Steps.clamp_value(Some(steps.into())),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }
}
