//! Perception - an immutable snapshot of world facts for one agent.
//!
//! The snapshot is produced by the host's world sensor and handed to the
//! reasoning backend verbatim through [`Perception::semantic_summary`]. The
//! summary text is part of the reasoning contract, so its formatting is
//! fixed, not cosmetic: identical field values must always render identical
//! text.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Weather type tag observed by the sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    #[default]
    Clear,
    Cloudy,
    Rain,
    Snow,
    Fog,
    Storm,
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clear => write!(f, "Clear"),
            Self::Cloudy => write!(f, "Cloudy"),
            Self::Rain => write!(f, "Rain"),
            Self::Snow => write!(f, "Snow"),
            Self::Fog => write!(f, "Fog"),
            Self::Storm => write!(f, "Storm"),
        }
    }
}

/// Weather at the moment of perception.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    pub condition: WeatherCondition,
    pub temperature_c: i32,
}

impl Weather {
    pub fn new(condition: WeatherCondition, temperature_c: i32) -> Self {
        Self {
            condition,
            temperature_c,
        }
    }
}

/// Local economic indicators. Plain integers; no range invariants are
/// enforced at this layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomySnapshot {
    pub prosperity: i32,
    pub food_supply: i32,
    pub tax_rate: i32,
}

impl EconomySnapshot {
    pub fn new(prosperity: i32, food_supply: i32, tax_rate: i32) -> Self {
        Self {
            prosperity,
            food_supply,
            tax_rate,
        }
    }
}

/// Immutable snapshot of world facts relevant to one agent at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perception {
    timestamp: NaiveDateTime,
    weather: Weather,
    economy: EconomySnapshot,
    // BTreeMap keeps relation iteration deterministic for the summary text.
    relations: BTreeMap<String, i32>,
    location: String,
}

impl Perception {
    /// Create a snapshot. The location identifier must be non-empty.
    pub fn new(
        timestamp: NaiveDateTime,
        location: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let location = location.into();
        if location.trim().is_empty() {
            return Err(DomainError::validation(
                "perception location cannot be empty",
            ));
        }
        Ok(Self {
            timestamp,
            weather: Weather::default(),
            economy: EconomySnapshot::default(),
            relations: BTreeMap::new(),
            location,
        })
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_economy(mut self, economy: EconomySnapshot) -> Self {
        self.economy = economy;
        self
    }

    /// Record a relation score toward a faction or person. Keys are unique;
    /// re-inserting a key overwrites its score.
    pub fn with_relation(mut self, target: impl Into<String>, score: i32) -> Self {
        self.relations.insert(target.into(), score);
        self
    }

    pub fn with_relations(mut self, relations: BTreeMap<String, i32>) -> Self {
        self.relations = relations;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn economy(&self) -> EconomySnapshot {
        self.economy
    }

    pub fn relations(&self) -> &BTreeMap<String, i32> {
        &self.relations
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Deterministic plain-text rendering of every field.
    ///
    /// This is the exact artifact handed to the reasoning backend as context.
    /// Timestamps format as `YYYY-MM-DD HH:MM`, weather as
    /// `{condition} ({temperature}°C)`, relations as comma-joined
    /// `{key}: {value}` pairs in map iteration order.
    pub fn semantic_summary(&self) -> String {
        let mut summary = String::new();
        let _ = writeln!(summary, "Time: {}", self.timestamp.format("%Y-%m-%d %H:%M"));
        let _ = writeln!(summary, "Location: {}", self.location);
        let _ = writeln!(
            summary,
            "Weather: {} ({}°C)",
            self.weather.condition, self.weather.temperature_c
        );
        let _ = writeln!(
            summary,
            "Economy: prosperity {}, food supply {}, tax rate {}",
            self.economy.prosperity, self.economy.food_supply, self.economy.tax_rate
        );
        if self.relations.is_empty() {
            let _ = write!(summary, "Relations: none");
        } else {
            let rendered: Vec<String> = self
                .relations
                .iter()
                .map(|(target, score)| format!("{target}: {score}"))
                .collect();
            let _ = write!(summary, "Relations: {}", rendered.join(", "));
        }
        summary
    }
}
