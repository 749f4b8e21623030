//! Telemetry Schema Validator - Implementation of TelemetryValidator.
//!
//! Walks the decoded JSON payload by hand and builds the typed tick as it
//! goes. Either every field checks out and a complete [`TelemetryTick`] is
//! returned, or the first violation is reported with its full field path.
//!
//! Unknown keys are ignored: the backend decorates `initial_data` sections
//! with extra bookkeeping fields such as `timestamp`.

use serde_json::{Map, Value};

use crate::domain::foundation::Percentage;
use crate::domain::telemetry::{
    ActionRecord, AgentSnapshot, Direction, Intersection, PerformanceSnapshot, QueueCounts,
    SignalPhase, SimulationTick, TelemetryTick, Vehicle,
};
use crate::ports::{SchemaValidationError, TelemetryValidator};

const ROOT_FIELDS: [&str; 5] = [
    "simulationTime",
    "cycleNumber",
    "intersection",
    "performance",
    "agent",
];

const LANE_TAGS: [&str; 4] = ["north", "south", "east", "west"];

type Object = Map<String, Value>;

/// Hand-written schema validator for telemetry payloads.
///
/// # Thread Safety
///
/// Stateless; `Send + Sync` and freely shareable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TelemetrySchemaValidator;

impl TelemetrySchemaValidator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self
    }

    fn validate_tick(&self, payload: &Value) -> Result<TelemetryTick, SchemaValidationError> {
        let root = self.require_object(payload, "data")?;

        let missing: Vec<SchemaValidationError> = ROOT_FIELDS
            .iter()
            .filter(|field| !root.contains_key(**field))
            .map(|field| SchemaValidationError::MissingRequired {
                field: field.to_string(),
            })
            .collect();
        if !missing.is_empty() {
            return Err(Self::collect_errors(missing));
        }

        let simulation_time = self.require_non_negative(root, "simulationTime", "")?;
        let cycle_number = self.require_count(root, "cycleNumber", "")?;
        let intersection = self.validate_intersection(root)?;
        let performance = self.validate_performance(root)?;
        let agent = self.validate_agent(root)?;

        Ok(TelemetryTick {
            simulation: SimulationTick {
                simulation_time,
                cycle_number,
                intersection,
            },
            performance,
            agent,
        })
    }

    // =========================================================================
    // Section validators
    // =========================================================================

    fn validate_intersection(&self, root: &Object) -> Result<Intersection, SchemaValidationError> {
        let path = "intersection";
        let obj = self.require_object(self.require_field(root, path, "")?, path)?;

        let queues = QueueCounts {
            north: self.require_queue(obj, "northQueue", path)?,
            south: self.require_queue(obj, "southQueue", path)?,
            east: self.require_queue(obj, "eastQueue", path)?,
            west: self.require_queue(obj, "westQueue", path)?,
        };
        let current_phase = self.require_variant(
            obj,
            "currentPhase",
            path,
            SignalPhase::from_tag,
            &SignalPhase::TAGS,
        )?;
        let phase_time_remaining = self.require_non_negative(obj, "phaseTimeRemaining", path)?;

        let vehicles_path = Self::join(path, "vehicles");
        let vehicles = self
            .require_array(obj, "vehicles", path)?
            .iter()
            .enumerate()
            .map(|(i, item)| self.validate_vehicle(item, &format!("{}[{}]", vehicles_path, i)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Intersection {
            queues,
            current_phase,
            phase_time_remaining,
            vehicles,
        })
    }

    fn validate_vehicle(&self, value: &Value, path: &str) -> Result<Vehicle, SchemaValidationError> {
        let obj = self.require_object(value, path)?;
        Ok(Vehicle {
            id: self.require_string(obj, "id", path)?,
            lane: self.require_variant(obj, "lane", path, Direction::from_tag, &LANE_TAGS)?,
            position: self.require_finite(obj, "position", path)?,
            speed: self.require_non_negative(obj, "speed", path)?,
        })
    }

    fn validate_performance(
        &self,
        root: &Object,
    ) -> Result<PerformanceSnapshot, SchemaValidationError> {
        let path = "performance";
        let obj = self.require_object(self.require_field(root, path, "")?, path)?;
        Ok(PerformanceSnapshot {
            avg_wait_time: self.require_non_negative(obj, "avgWaitTime", path)?,
            throughput: self.require_non_negative(obj, "throughput", path)?,
            max_queue: self.require_non_negative(obj, "maxQueue", path)?,
            efficiency_score: self.require_non_negative(obj, "efficiencyScore", path)?,
        })
    }

    fn validate_agent(&self, root: &Object) -> Result<AgentSnapshot, SchemaValidationError> {
        let path = "agent";
        let obj = self.require_object(self.require_field(root, path, "")?, path)?;

        let last_action = self.require_string(obj, "lastAction", path)?;
        let epsilon = self.require_in_range(obj, "epsilon", path, 0.0, 1.0)?;
        let episode = self.require_count(obj, "episode", path)?;
        let replay_buffer_full =
            Percentage::new(self.require_in_range(obj, "replayBufferFull", path, 0.0, 100.0)?);

        let actions_path = Self::join(path, "recentActions");
        let recent_actions = self
            .require_array(obj, "recentActions", path)?
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let item_path = format!("{}[{}]", actions_path, i);
                let action = self.require_object(item, &item_path)?;
                Ok(ActionRecord {
                    time: self.require_string(action, "time", &item_path)?,
                    action: self.require_string(action, "action", &item_path)?,
                })
            })
            .collect::<Result<Vec<_>, SchemaValidationError>>()?;

        Ok(AgentSnapshot {
            last_action,
            epsilon,
            episode,
            replay_buffer_full,
            recent_actions,
        })
    }

    // =========================================================================
    // Field helpers
    // =========================================================================

    fn require_object<'a>(
        &self,
        value: &'a Value,
        path: &str,
    ) -> Result<&'a Object, SchemaValidationError> {
        value.as_object().ok_or_else(|| SchemaValidationError::InvalidType {
            field: path.to_string(),
            expected: "object".to_string(),
            actual: Self::type_name(value),
        })
    }

    fn require_field<'a>(
        &self,
        obj: &'a Object,
        field: &str,
        path: &str,
    ) -> Result<&'a Value, SchemaValidationError> {
        obj.get(field)
            .ok_or_else(|| SchemaValidationError::MissingRequired {
                field: Self::join(path, field),
            })
    }

    fn require_string(
        &self,
        obj: &Object,
        field: &str,
        path: &str,
    ) -> Result<String, SchemaValidationError> {
        let value = self.require_field(obj, field, path)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SchemaValidationError::InvalidType {
                field: Self::join(path, field),
                expected: "string".to_string(),
                actual: Self::type_name(value),
            })
    }

    fn require_array<'a>(
        &self,
        obj: &'a Object,
        field: &str,
        path: &str,
    ) -> Result<&'a Vec<Value>, SchemaValidationError> {
        let value = self.require_field(obj, field, path)?;
        value.as_array().ok_or_else(|| SchemaValidationError::InvalidType {
            field: Self::join(path, field),
            expected: "array".to_string(),
            actual: Self::type_name(value),
        })
    }

    fn require_finite(
        &self,
        obj: &Object,
        field: &str,
        path: &str,
    ) -> Result<f64, SchemaValidationError> {
        let value = self.require_field(obj, field, path)?;
        let number = value.as_f64().ok_or_else(|| SchemaValidationError::InvalidType {
            field: Self::join(path, field),
            expected: "number".to_string(),
            actual: Self::type_name(value),
        })?;
        if !number.is_finite() {
            return Err(SchemaValidationError::NotFinite {
                field: Self::join(path, field),
            });
        }
        Ok(number)
    }

    fn require_non_negative(
        &self,
        obj: &Object,
        field: &str,
        path: &str,
    ) -> Result<f64, SchemaValidationError> {
        let number = self.require_finite(obj, field, path)?;
        if number < 0.0 {
            return Err(SchemaValidationError::OutOfRange {
                field: Self::join(path, field),
                value: number.to_string(),
                min: "0".to_string(),
                max: "inf".to_string(),
            });
        }
        Ok(number)
    }

    fn require_in_range(
        &self,
        obj: &Object,
        field: &str,
        path: &str,
        min: f64,
        max: f64,
    ) -> Result<f64, SchemaValidationError> {
        let number = self.require_finite(obj, field, path)?;
        if number < min || number > max {
            return Err(SchemaValidationError::OutOfRange {
                field: Self::join(path, field),
                value: number.to_string(),
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(number)
    }

    /// Non-negative integer. Floats with no fractional part are accepted.
    fn require_count(
        &self,
        obj: &Object,
        field: &str,
        path: &str,
    ) -> Result<u64, SchemaValidationError> {
        let value = self.require_field(obj, field, path)?;
        if let Some(n) = value.as_u64() {
            return Ok(n);
        }
        let number = self.require_non_negative(obj, field, path)?;
        if number.fract() != 0.0 {
            return Err(SchemaValidationError::InvalidType {
                field: Self::join(path, field),
                expected: "integer".to_string(),
                actual: number.to_string(),
            });
        }
        // u64::MAX rounds up to 2^64 as f64, so anything at or above it overflows.
        if number >= u64::MAX as f64 {
            return Err(SchemaValidationError::OutOfRange {
                field: Self::join(path, field),
                value: number.to_string(),
                min: "0".to_string(),
                max: u64::MAX.to_string(),
            });
        }
        Ok(number as u64)
    }

    fn require_queue(
        &self,
        obj: &Object,
        field: &str,
        path: &str,
    ) -> Result<u32, SchemaValidationError> {
        let count = self.require_count(obj, field, path)?;
        u32::try_from(count).map_err(|_| SchemaValidationError::OutOfRange {
            field: Self::join(path, field),
            value: count.to_string(),
            min: "0".to_string(),
            max: u32::MAX.to_string(),
        })
    }

    fn require_variant<T>(
        &self,
        obj: &Object,
        field: &str,
        path: &str,
        parse: fn(&str) -> Option<T>,
        allowed: &[&str],
    ) -> Result<T, SchemaValidationError> {
        let tag = self.require_string(obj, field, path)?;
        parse(&tag).ok_or_else(|| SchemaValidationError::UnknownVariant {
            field: Self::join(path, field),
            value: tag,
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn join(path: &str, field: &str) -> String {
        if path.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", path, field)
        }
    }

    fn type_name(value: &Value) -> String {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
        .to_string()
    }

    fn collect_errors(errors: Vec<SchemaValidationError>) -> SchemaValidationError {
        if errors.len() == 1 {
            errors
                .into_iter()
                .next()
                .unwrap_or(SchemaValidationError::Multiple(Vec::new()))
        } else {
            SchemaValidationError::Multiple(errors)
        }
    }
}

impl TelemetryValidator for TelemetrySchemaValidator {
    fn validate(&self, payload: &Value) -> Result<TelemetryTick, SchemaValidationError> {
        self.validate_tick(payload)
    }
}
