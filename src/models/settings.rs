use crate::{
    error::{GenerationError, Result},
    form::{parse_int_prefix, NumericField},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Storage key the numeric settings live under.
pub const SETTINGS_KEY: &str = "fluxSettings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSettings {
    pub width: u32,
    pub height: u32,
    pub steps: u32,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            width: NumericField::Width.default_value(),
            height: NumericField::Height.default_value(),
            steps: NumericField::Steps.default_value(),
        }
    }
}

impl PersistedSettings {
    pub fn new(width: u32, height: u32, steps: u32) -> Self {
        Self {
            width,
            height,
            steps,
        }
    }

    pub fn get(&self, field: NumericField) -> u32 {
        match field {
            NumericField::Width => self.width,
            NumericField::Height => self.height,
            NumericField::Steps => self.steps,
        }
    }

    pub fn set(&mut self, field: NumericField, value: u32) {
        match field {
            NumericField::Width => self.width = value,
            NumericField::Height => self.height = value,
            NumericField::Steps => self.steps = value,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored settings object.
    ///
    /// Each field is read independently: numbers and numeric strings are
    /// accepted, while a missing, null, zero, empty or non-numeric value
    /// falls back to that field's default. Every value goes through the
    /// field's clamp.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| GenerationError::Storage(format!("Unparseable settings: {}", e)))?;

        let object = value.as_object().ok_or_else(|| {
            GenerationError::Storage(format!("Settings must be a JSON object, got: {}", value))
        })?;

        let mut settings = Self::default();
        for field in NumericField::ALL {
            if let Some(v) = stored_number(object, field.as_str()) {
                settings.set(field, field.clamp_value(Some(v)));
            }
        }
        Ok(settings)
    }
}

fn stored_number(object: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = match object.get(key)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))?,
        Value::String(s) => parse_int_prefix(s)?,
        _ => return None,
    };

    (value != 0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let settings = PersistedSettings::new(512, 768, 20);
        let json = settings.to_json().unwrap();
        assert_eq!(PersistedSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_string_values_are_accepted() {
        let settings =
            PersistedSettings::from_json(r#"{"width": "640", "height": "1280", "steps": "12"}"#)
                .unwrap();
        assert_eq!(settings, PersistedSettings::new(640, 1280, 12));
    }

    #[test]
    fn test_missing_fields_fall_back_independently() {
        let settings = PersistedSettings::from_json(r#"{"width": 512}"#).unwrap();
        assert_eq!(settings, PersistedSettings::new(512, 1024, 28));

        let settings =
            PersistedSettings::from_json(r#"{"width": 0, "height": "", "steps": null}"#).unwrap();
        assert_eq!(settings, PersistedSettings::default());

        let settings = PersistedSettings::from_json(r#"{"steps": "lots"}"#).unwrap();
        assert_eq!(settings, PersistedSettings::default());
    }

    #[test]
    fn test_stored_values_are_clamped() {
        let settings =
            PersistedSettings::from_json(r#"{"width": 100000, "height": 300, "steps": 99.5}"#)
                .unwrap();
        assert_eq!(settings, PersistedSettings::new(2048, 320, 50));
    }

    #[test]
    fn test_corrupted_settings_are_storage_errors() {
        assert!(matches!(
            PersistedSettings::from_json("{width: 512"),
            Err(GenerationError::Storage(_))
        ));
        assert!(matches!(
            PersistedSettings::from_json("null"),
            Err(GenerationError::Storage(_))
        ));
    }
}
