//! Database row types. These map directly to SQLite rows and are converted
//! into aisle-types models at the edge.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use aisle_types::models::{AttendanceStatus, FoodChoice, Guest, GuestType};

pub struct GuestRow {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub guest_type: String,
    pub attendance_status: String,
    pub food_choice: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub song_requests: Option<String>,
    pub is_bridal_party: bool,
    pub is_of_drinking_age: bool,
    pub is_admin: bool,
    pub bridal_party_role: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

pub struct DocumentRow {
    pub id: String,
    pub collection: String,
    pub index_key: String,
    pub body: String,
}

/// SQLite's `datetime('now')` produces "YYYY-MM-DD HH:MM:SS" without a
/// timezone; RFC 3339 is accepted too.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>().ok().or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|ndt| ndt.and_utc())
    })
}

impl GuestRow {
    /// Corrupt columns are logged and replaced with defaults rather than
    /// failing the whole listing.
    pub fn into_guest(self) -> Guest {
        let guest_id = self.id.parse::<Uuid>().unwrap_or_else(|e| {
            warn!("Corrupt guest id '{}': {}", self.id, e);
            Uuid::default()
        });

        let guest_type = self.guest_type.parse::<GuestType>().unwrap_or_else(|e| {
            warn!("Guest {}: {}", self.id, e);
            GuestType::default()
        });

        let attendance_status = self
            .attendance_status
            .parse::<AttendanceStatus>()
            .unwrap_or_else(|e| {
                warn!("Guest {}: {}", self.id, e);
                AttendanceStatus::default()
            });

        let food_choice = self.food_choice.as_deref().and_then(|raw| {
            raw.parse::<FoodChoice>()
                .map_err(|e| warn!("Guest {}: {}", self.id, e))
                .ok()
        });

        let created_at = parse_timestamp(&self.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on guest '{}'", self.created_at, self.id);
            DateTime::default()
        });

        let updated_at = self.updated_at.as_deref().and_then(parse_timestamp);

        Guest {
            guest_id,
            email: self.email,
            full_name: self.full_name,
            guest_type,
            attendance_status,
            food_choice,
            dietary_restrictions: self.dietary_restrictions,
            song_requests: self.song_requests,
            is_bridal_party: self.is_bridal_party,
            is_of_drinking_age: self.is_of_drinking_age,
            is_admin: self.is_admin,
            bridal_party_role: self.bridal_party_role,
            image: self.image,
            description: self.description,
            address: self.address,
            created_at,
            updated_at,
        }
    }
}
