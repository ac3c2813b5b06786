//! Run configuration validation logic.
//!
//! Everything here is a startup check: a violation is fatal and reported
//! to the caller before any solver is touched.

use crate::schema::{CardiacDef, CatheterDef, InletDef, InletModeDef, ProfileDef, RunConfig,
                    SteppingDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing field: {field} ({reason})")]
    MissingField { field: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &RunConfig) -> Result<(), ValidationError> {
    if config.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    if config.artery.first_node_id > config.artery.last_node_id {
        return Err(ValidationError::InvalidValue {
            field: "artery.first_node_id".to_string(),
            value: config.artery.first_node_id.to_string(),
            reason: format!(
                "artery node ID range is inverted (last_node_id = {})",
                config.artery.last_node_id
            ),
        });
    }

    validate_cardiac(&config.cardiac)?;
    validate_stepping(&config.stepping)?;

    if config.coupling.enable_3d && config.coupling.couple_after_cycle > config.cardiac.cycles {
        return Err(ValidationError::InvalidValue {
            field: "coupling.couple_after_cycle".to_string(),
            value: config.coupling.couple_after_cycle.to_string(),
            reason: format!(
                "coupling would never activate within {} cycles",
                config.cardiac.cycles
            ),
        });
    }
    if config.coupling.enable_3d && config.coupling.couple_after_cycle == 0 {
        return Err(ValidationError::InvalidValue {
            field: "coupling.couple_after_cycle".to_string(),
            value: "0".to_string(),
            reason: "cycle indices are 1-based".to_string(),
        });
    }

    validate_inlet(&config.inlet)?;

    if let Some(catheter) = &config.catheter {
        validate_catheter(catheter)?;
    }

    if config.output.write_every == 0 {
        return Err(ValidationError::InvalidValue {
            field: "output.write_every".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(())
}

fn validate_cardiac(cardiac: &CardiacDef) -> Result<(), ValidationError> {
    if cardiac.cycles == 0 {
        return Err(ValidationError::InvalidValue {
            field: "cardiac.cycles".to_string(),
            value: "0".to_string(),
            reason: "at least one cardiac cycle required".to_string(),
        });
    }

    validate_positive_finite("cardiac.cycle_length_s", cardiac.cycle_length_s)?;
    validate_positive_finite("cardiac.systolic_mmhg", cardiac.systolic_mmhg)?;
    validate_positive_finite("cardiac.diastolic_mmhg", cardiac.diastolic_mmhg)?;

    if cardiac.systolic_mmhg <= cardiac.diastolic_mmhg {
        return Err(ValidationError::InvalidValue {
            field: "cardiac.systolic_mmhg".to_string(),
            value: cardiac.systolic_mmhg.to_string(),
            reason: format!(
                "systolic pressure must exceed diastolic ({})",
                cardiac.diastolic_mmhg
            ),
        });
    }

    if !cardiac.venous_mmhg.is_finite() || cardiac.venous_mmhg < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "cardiac.venous_mmhg".to_string(),
            value: cardiac.venous_mmhg.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }

    Ok(())
}

fn validate_stepping(stepping: &SteppingDef) -> Result<(), ValidationError> {
    validate_positive_finite("stepping.dt_s", stepping.dt_s)?;

    if !stepping.cfl.is_finite() || stepping.cfl <= 0.0 || stepping.cfl > 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "stepping.cfl".to_string(),
            value: stepping.cfl.to_string(),
            reason: "must be in (0, 1]".to_string(),
        });
    }

    if stepping.sub_step_period == 0 {
        return Err(ValidationError::InvalidValue {
            field: "stepping.sub_step_period".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if stepping.max_steps == 0 {
        return Err(ValidationError::InvalidValue {
            field: "stepping.max_steps".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    Ok(())
}

fn validate_inlet(inlet: &InletDef) -> Result<(), ValidationError> {
    match &inlet.profile {
        ProfileDef::Parabolic { p1, p2, p3 } => {
            for (field, value) in [("p1", p1), ("p2", p2), ("p3", p3)] {
                if !value.is_finite() {
                    return Err(ValidationError::InvalidValue {
                        field: format!("inlet.profile.{}", field),
                        value: value.to_string(),
                        reason: "must be finite".to_string(),
                    });
                }
            }
        }
        ProfileDef::Cosine { p1, p2 } => {
            for (field, value) in [("p1", p1), ("p2", p2)] {
                if !value.is_finite() {
                    return Err(ValidationError::InvalidValue {
                        field: format!("inlet.profile.{}", field),
                        value: value.to_string(),
                        reason: "must be finite".to_string(),
                    });
                }
            }
        }
        ProfileDef::Tabulated { points } => {
            if points.len() < 2 {
                return Err(ValidationError::InvalidValue {
                    field: "inlet.profile.points".to_string(),
                    value: points.len().to_string(),
                    reason: "tabulated profile needs at least two samples".to_string(),
                });
            }
            for pair in points.windows(2) {
                if pair[1].0 <= pair[0].0 {
                    return Err(ValidationError::InvalidValue {
                        field: "inlet.profile.points".to_string(),
                        value: pair[1].0.to_string(),
                        reason: "sample times must be strictly increasing".to_string(),
                    });
                }
            }
        }
    }

    if inlet.mode == InletModeDef::Pressure {
        let law = inlet.tube_law.ok_or_else(|| ValidationError::MissingField {
            field: "inlet.tube_law".to_string(),
            reason: "pressure-driven inlets need a tube law".to_string(),
        })?;
        validate_positive_finite("inlet.tube_law.a0_m2", law.a0_m2)?;
        validate_positive_finite("inlet.tube_law.beta", law.beta)?;
    }

    Ok(())
}

fn validate_catheter(catheter: &CatheterDef) -> Result<(), ValidationError> {
    if catheter.enabled && catheter.centerline_path.is_none() {
        return Err(ValidationError::MissingField {
            field: "catheter.centerline_path".to_string(),
            reason: "catheter runs need a centerline geometry".to_string(),
        });
    }
    validate_positive_finite("catheter.diameter_m", catheter.diameter_m)
}

fn validate_positive_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    #[test]
    fn example_config_is_valid() {
        assert!(validate_config(&RunConfig::example()).is_ok());
    }

    #[test]
    fn rejects_systolic_below_diastolic() {
        let mut config = RunConfig::example();
        config.cardiac.systolic_mmhg = 70.0;
        let err = validate_config(&config).unwrap_err();
        assert!(format!("{err}").contains("systolic"));
    }

    #[test]
    fn rejects_zero_cycles() {
        let mut config = RunConfig::example();
        config.cardiac.cycles = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_inverted_artery_range() {
        let mut config = RunConfig::example();
        config.artery.first_node_id = 30;
        config.artery.last_node_id = 10;
        let err = validate_config(&config).unwrap_err();
        assert!(format!("{err}").contains("inverted"));
    }

    #[test]
    fn rejects_catheter_without_centerline() {
        let mut config = RunConfig::example();
        config.catheter = Some(CatheterDef {
            enabled: true,
            centerline_path: None,
            diameter_m: 6e-4,
        });
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { .. }));
    }

    #[test]
    fn rejects_pressure_inlet_without_tube_law() {
        let mut config = RunConfig::example();
        config.inlet.mode = InletModeDef::Pressure;
        config.inlet.tube_law = None;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_coupling_beyond_last_cycle() {
        let mut config = RunConfig::example();
        config.coupling.enable_3d = true;
        config.coupling.couple_after_cycle = config.cardiac.cycles + 1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_non_monotone_tabulated_points() {
        let mut config = RunConfig::example();
        config.inlet.profile = ProfileDef::Tabulated {
            points: vec![(0.0, 1.0), (0.5, 2.0), (0.4, 3.0)],
        };
        assert!(validate_config(&config).is_err());
    }
}
