//! Named-parameter validation shared by the filters.

use scree_core::{Grid, ParamError};

pub(crate) fn unknown(plugin: &str, name: &str) -> ParamError {
    ParamError::Unknown {
        plugin: plugin.to_string(),
        name: name.to_string(),
    }
}

/// Accept finite, strictly positive values.
pub(crate) fn positive(name: &str, value: f32) -> Result<f32, ParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ParamError::Invalid {
            name: name.to_string(),
            value,
            reason: "must be finite and positive",
        })
    }
}

/// Accept finite, non-negative values.
pub(crate) fn non_negative(name: &str, value: f32) -> Result<f32, ParamError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ParamError::Invalid {
            name: name.to_string(),
            value,
            reason: "must be finite and non-negative",
        })
    }
}

/// Accept any finite value.
pub(crate) fn finite(name: &str, value: f32) -> Result<f32, ParamError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParamError::Invalid {
            name: name.to_string(),
            value,
            reason: "must be finite",
        })
    }
}

/// Accept a positive resolution and apply it to `out`.
pub(crate) fn resolution(out: &mut Grid, name: &str, value: f32) -> Result<f32, ParamError> {
    let value = positive(name, value)?;
    out.set_resolution(value).map_err(|_| ParamError::Invalid {
        name: name.to_string(),
        value,
        reason: "must be finite and positive",
    })?;
    Ok(value)
}

/// Builder-side check with a `String` error.
pub(crate) fn check(name: &str, value: f32, rule: fn(&str, f32) -> Result<f32, ParamError>) -> Result<f32, String> {
    rule(name, value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules() {
        assert!(positive("radius", 0.5).is_ok());
        assert!(positive("radius", 0.0).is_err());
        assert!(positive("radius", f32::NAN).is_err());
        assert!(non_negative("min_distance", 0.0).is_ok());
        assert!(non_negative("min_distance", -0.1).is_err());
        assert!(finite("step_threshold", -3.0).is_ok());
        assert!(finite("step_threshold", f32::INFINITY).is_err());
    }

    #[test]
    fn builder_message_names_parameter() {
        let err = check("radius", -1.0, positive).unwrap_err();
        assert!(err.contains("radius"));
    }
}
