use chrono::{DateTime, Utc};
use serde_json::json;

use crate::types::{City, CityId, Patch, PatchKind, StateSnapshot};

/// Pure projector helpers that transform store mutations into patches.
pub struct Projector;

impl Projector {
    /// Builds a `city.created` patch carrying the new record.
    pub fn city_created(version: u64, at: DateTime<Utc>, city: &City) -> Patch {
        Patch {
            version,
            kind: PatchKind::CityCreated,
            at,
            data: json!({ "city": city }),
        }
    }

    /// Builds a `city.updated` patch carrying the record after the update.
    pub fn city_updated(version: u64, at: DateTime<Utc>, city: &City) -> Patch {
        Patch {
            version,
            kind: PatchKind::CityUpdated,
            at,
            data: json!({ "city": city }),
        }
    }

    /// Builds a `city.removed` patch identifying the removed record.
    pub fn city_removed(version: u64, at: DateTime<Utc>, id: &CityId, name: &str) -> Patch {
        Patch {
            version,
            kind: PatchKind::CityRemoved,
            at,
            data: json!({
                "id": id,
                "name": name,
            }),
        }
    }

    /// Builds a `state.replace` patch with the provided snapshot.
    pub fn state_replace(version: u64, at: DateTime<Utc>, snapshot: StateSnapshot) -> Patch {
        Patch {
            version,
            kind: PatchKind::StateReplace,
            at,
            data: json!({ "state": snapshot }),
        }
    }
}
