use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Opaque unique identifier assigned to a city at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityId(String);

impl CityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One municipality in the managed collection.
///
/// `id` and `created_at` are store-assigned and never change after creation;
/// the remaining fields are replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub country: String,
    pub population: u64,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl City {
    /// Returns the mutable subset of the record as form data.
    pub fn form_data(&self) -> CityFormData {
        CityFormData {
            name: self.name.clone(),
            country: self.country.clone(),
            population: self.population,
            timezone: self.timezone.clone(),
        }
    }

    /// Replaces the four mutable fields, leaving `id` and `created_at` untouched.
    pub fn apply(&mut self, data: CityFormData) {
        self.name = data.name;
        self.country = data.country;
        self.population = data.population;
        self.timezone = data.timezone;
    }
}

/// Payload for create and update operations.
///
/// Excludes `id` and `created_at`, which only the store assigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityFormData {
    pub name: String,
    pub country: String,
    pub population: u64,
    pub timezone: String,
}

impl CityFormData {
    /// Checks the required-field contract before any store mutation.
    ///
    /// Population is unsigned by construction, so the non-negative check is a
    /// type-level guarantee rather than a runtime one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("country", &self.country),
            ("timezone", &self.timezone),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField(field));
            }
        }
        Ok(())
    }
}

/// Errors raised by form data validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required field '{0}' must not be empty")]
    EmptyField(&'static str),
}

/// Aggregated state handed to a rendering layer.
///
/// The snapshot owns its data; mutating it never affects the store it was
/// taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub version: u64,
    pub cities: Vec<City>,
}

/// Change notification emitted after every successful store mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub version: u64,
    #[serde(rename = "type")]
    pub kind: PatchKind,
    pub at: DateTime<Utc>,
    pub data: Value,
}

impl Patch {
    /// Returns the patch type string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Enumerates the supported patch kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    CityCreated,
    CityUpdated,
    CityRemoved,
    StateReplace,
}

impl PatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CityCreated => "city.created",
            Self::CityUpdated => "city.updated",
            Self::CityRemoved => "city.removed",
            Self::StateReplace => "state.replace",
        }
    }
}

impl Serialize for PatchKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PatchKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        PatchKind::from_str(&value).map_err(|_| D::Error::custom("unknown patch kind"))
    }
}

impl FromStr for PatchKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "city.created" => Ok(Self::CityCreated),
            "city.updated" => Ok(Self::CityUpdated),
            "city.removed" => Ok(Self::CityRemoved),
            "state.replace" => Ok(Self::StateReplace),
            _ => Err(()),
        }
    }
}
