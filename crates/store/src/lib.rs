use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use city_manager_core::projector::Projector;
use city_manager_core::types::{
    City, CityFormData, CityId, Patch, StateSnapshot, ValidationError,
};

/// Synchronous observer invoked with every patch the store emits.
pub type PatchObserver = Box<dyn FnMut(&Patch)>;

/// In-memory ordered collection of city records.
///
/// Cities keep insertion order; updates mutate a record in place without
/// reordering. Every successful mutation bumps the version counter by one and
/// delivers a patch to all registered observers before the call returns.
pub struct CityStore {
    cities: Vec<City>,
    version: u64,
    clock: Box<dyn Fn() -> DateTime<Utc>>,
    observers: Vec<PatchObserver>,
}

impl Default for CityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CityStore {
    /// Creates an empty store using the wall clock for timestamps.
    pub fn new() -> Self {
        Self::with_clock(Box::new(Utc::now))
    }

    /// Creates a store with an injectable clock so tests can pin timestamps.
    pub fn with_clock(clock: Box<dyn Fn() -> DateTime<Utc>>) -> Self {
        Self {
            cities: Vec::new(),
            version: 0,
            clock,
            observers: Vec::new(),
        }
    }

    /// Creates a store preloaded with the demo cities shown on first launch.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.seed_demo_cities();
        store
    }

    /// Loads the demo records.
    ///
    /// Seeding happens before any observer can subscribe, so it fills the
    /// collection directly without bumping the version or emitting patches;
    /// rendering layers pull an initial snapshot instead.
    pub fn seed_demo_cities(&mut self) {
        let seeds = [
            ("Tokyo", "Japan", 13_960_000, "JST (UTC+9)"),
            ("New York", "United States", 8_336_817, "EST (UTC-5)"),
            ("London", "United Kingdom", 8_982_000, "GMT (UTC+0)"),
            ("Paris", "France", 2_161_000, "CET (UTC+1)"),
        ];
        for (name, country, population, timezone) in seeds {
            let city = City {
                id: Self::fresh_id(),
                name: name.to_string(),
                country: country.to_string(),
                population,
                timezone: timezone.to_string(),
                created_at: self.now(),
            };
            self.cities.push(city);
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn fresh_id() -> CityId {
        CityId::new(Uuid::new_v4().to_string())
    }

    /// Registers a change-notification hook.
    pub fn subscribe(&mut self, observer: PatchObserver) {
        self.observers.push(observer);
    }

    fn emit(&mut self, patch: Patch) {
        for observer in &mut self.observers {
            observer(&patch);
        }
    }

    /// Validates the form data, assigns a fresh id and creation timestamp,
    /// and appends the new city to the collection.
    pub fn create(&mut self, data: CityFormData) -> Result<City, StoreError> {
        data.validate()?;
        let now = self.now();
        let city = City {
            id: Self::fresh_id(),
            name: data.name,
            country: data.country,
            population: data.population,
            timezone: data.timezone,
            created_at: now,
        };
        self.cities.push(city.clone());
        self.version += 1;
        self.emit(Projector::city_created(self.version, now, &city));
        Ok(city)
    }

    /// Replaces the four mutable fields of the matching city in place.
    ///
    /// `id` and `created_at` are preserved; a missing id aborts with
    /// [`StoreError::NotFound`] and no mutation.
    pub fn update(&mut self, id: &CityId, data: CityFormData) -> Result<City, StoreError> {
        data.validate()?;
        let now = self.now();
        let city = self
            .cities
            .iter_mut()
            .find(|city| &city.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        city.apply(data);
        let updated = city.clone();
        self.version += 1;
        self.emit(Projector::city_updated(self.version, now, &updated));
        Ok(updated)
    }

    /// Removes the city with the given id and returns it.
    ///
    /// A missing id is reported as [`StoreError::NotFound`] with the
    /// collection and version untouched; callers that prefer the silent
    /// no-op treat it as recoverable.
    pub fn delete(&mut self, id: &CityId) -> Result<City, StoreError> {
        let index = self
            .cities
            .iter()
            .position(|city| &city.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let removed = self.cities.remove(index);
        self.version += 1;
        let at = self.now();
        self.emit(Projector::city_removed(
            self.version,
            at,
            &removed.id,
            &removed.name,
        ));
        Ok(removed)
    }

    /// Returns all cities in insertion order.
    pub fn list(&self) -> &[City] {
        &self.cities
    }

    /// Looks up a city by id.
    pub fn get(&self, id: &CityId) -> Option<&City> {
        self.cities.iter().find(|city| &city.id == id)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Returns the version after the most recent successful mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sums the population over the whole collection.
    pub fn total_population(&self) -> u64 {
        self.cities.iter().map(|city| city.population).sum()
    }

    /// Produces an owned snapshot for a rendering layer.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            version: self.version,
            cities: self.cities.clone(),
        }
    }
}

/// Errors raised by store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("invalid form data: {0}")]
    Validation(#[from] ValidationError),
    #[error("no city with id {0}")]
    NotFound(CityId),
}
