use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HotelStatus {
    Active,
    Inactive,
    #[default]
    Pending,
}

/// Bookable hotel
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub city: String,
    pub rating: String,
    pub address: String,
    pub description: String,
    pub facilities: String,
    /// Total rooms available for booking
    pub rooms: u32,
    pub price_per_night: f64,
    pub status: HotelStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or replacing a hotel
#[derive(Debug, Clone, Deserialize)]
pub struct HotelInput {
    pub name: String,
    pub country: String,
    pub city: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub facilities: String,
    pub rooms: u32,
    pub price_per_night: f64,
    #[serde(default)]
    pub status: HotelStatus,
}

impl HotelInput {
    /// Checks required fields before the input reaches the store
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Hotel name is required".to_string());
        }
        if self.city.trim().is_empty() || self.country.trim().is_empty() {
            return Err("Hotel city and country are required".to_string());
        }
        if !self.price_per_night.is_finite() || self.price_per_night < 0.0 {
            return Err("Price per night must be a non-negative number".to_string());
        }
        Ok(())
    }
}

impl Hotel {
    pub fn new(input: HotelInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            country: input.country.trim().to_string(),
            city: input.city.trim().to_string(),
            rating: input.rating,
            address: input.address,
            description: input.description,
            facilities: input.facilities,
            rooms: input.rooms,
            price_per_night: input.price_per_night,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field, keeping identity and creation time
    pub fn apply(&mut self, input: HotelInput) {
        self.name = input.name.trim().to_string();
        self.country = input.country.trim().to_string();
        self.city = input.city.trim().to_string();
        self.rating = input.rating;
        self.address = input.address;
        self.description = input.description;
        self.facilities = input.facilities;
        self.rooms = input.rooms;
        self.price_per_night = input.price_per_night;
        self.status = input.status;
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelFilter {
    pub city: Option<String>,
    pub country: Option<String>,
    pub rating: Option<String>,
    pub status: Option<HotelStatus>,
}

impl Record for Hotel {
    type Filter = HotelFilter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn matches(&self, filter: &HotelFilter) -> bool {
        let text_matches = |wanted: &Option<String>, actual: &str| {
            wanted
                .as_deref()
                .map_or(true, |wanted| actual.eq_ignore_ascii_case(wanted.trim()))
        };

        text_matches(&filter.city, &self.city)
            && text_matches(&filter.country, &self.country)
            && text_matches(&filter.rating, &self.rating)
            && filter.status.map_or(true, |status| self.status == status)
    }
}
