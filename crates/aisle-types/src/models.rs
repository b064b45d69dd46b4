use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Canonical form of a guest's full name: trimmed and lower-cased.
/// Stored names and login lookups both go through this.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Canonical form of a party email.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returned when a stored enum column holds a value we don't recognise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown variant '{0}'")]
pub struct UnknownVariant(pub String);

macro_rules! string_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(UnknownVariant(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuestType {
    /// Main contact for the party.
    #[default]
    Primary,
    PlusOne,
    Child,
}

string_enum!(GuestType {
    Primary => "PRIMARY",
    PlusOne => "PLUS_ONE",
    Child => "CHILD",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    #[default]
    Pending,
    Attending,
    Declined,
}

string_enum!(AttendanceStatus {
    Pending => "PENDING",
    Attending => "ATTENDING",
    Declined => "DECLINED",
});

impl AttendanceStatus {
    /// Maps the party-level yes/no answer from the RSVP form.
    pub fn from_response(attending: bool) -> Self {
        if attending { Self::Attending } else { Self::Declined }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoodChoice {
    Beef,
    Chicken,
    Vegetarian,
}

string_enum!(FoodChoice {
    Beef => "BEEF",
    Chicken => "CHICKEN",
    Vegetarian => "VEGETARIAN",
});

/// A single invitee. Guests sharing an `email` form one party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub guest_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub guest_type: GuestType,
    pub attendance_status: AttendanceStatus,
    pub food_choice: Option<FoodChoice>,
    pub dietary_restrictions: Option<String>,
    pub song_requests: Option<String>,
    pub is_bridal_party: bool,
    pub is_of_drinking_age: bool,
    pub is_admin: bool,
    pub bridal_party_role: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Guest {
    /// A freshly invited guest with every optional field empty.
    pub fn new(email: &str, full_name: &str, guest_type: GuestType) -> Self {
        Self {
            guest_id: Uuid::new_v4(),
            email: normalize_email(email),
            full_name: normalize_name(full_name),
            guest_type,
            attendance_status: AttendanceStatus::Pending,
            food_choice: None,
            dietary_restrictions: None,
            song_requests: None,
            is_bridal_party: false,
            is_of_drinking_age: false,
            is_admin: false,
            bridal_party_role: None,
            image: None,
            description: None,
            address: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn is_attending(&self) -> bool {
        self.attendance_status == AttendanceStatus::Attending
    }

    pub fn is_adult(&self) -> bool {
        self.guest_type != GuestType::Child
    }

    /// Last time anything about this guest changed.
    pub fn last_touched(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// Fields written when a guest record is first created.
#[derive(Debug, Clone)]
pub struct NewGuest {
    pub email: String,
    pub full_name: String,
    pub guest_type: GuestType,
    pub is_of_drinking_age: bool,
    pub address: Option<String>,
}

/// Fields the RSVP flow overwrites on each guest.
#[derive(Debug, Clone, PartialEq)]
pub struct RsvpPatch {
    pub attendance_status: AttendanceStatus,
    pub food_choice: Option<FoodChoice>,
    pub dietary_restrictions: Option<String>,
    pub song_requests: Option<String>,
}

/// Admin-only edits for the wedding party page. `None` leaves a field as is;
/// an empty role, image or description clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WeddingPartyPatch {
    pub is_bridal_party: Option<bool>,
    pub bridal_party_role: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub is_of_drinking_age: Option<bool>,
    pub is_admin: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_lowercased() {
        assert_eq!(normalize_name("  Jane Doe "), "jane doe");
        assert_eq!(normalize_name("JANE DOE"), "jane doe");
    }

    #[test]
    fn enums_use_storage_spelling() {
        assert_eq!(GuestType::PlusOne.as_str(), "PLUS_ONE");
        assert_eq!("VEGETARIAN".parse::<FoodChoice>().unwrap(), FoodChoice::Vegetarian);
        let err = "FISH".parse::<FoodChoice>().unwrap_err();
        assert_eq!(err, UnknownVariant("FISH".into()));
        assert_eq!(err.to_string(), "unknown variant 'FISH'");
        assert!("FISH".parse::<FoodChoice>().is_err());

        let json = serde_json::to_string(&AttendanceStatus::Declined).unwrap();
        assert_eq!(json, "\"DECLINED\"");
    }

    #[test]
    fn new_guest_starts_pending() {
        let guest = Guest::new(" Party@Example.com ", "Jane Doe", GuestType::Primary);
        assert_eq!(guest.attendance_status, AttendanceStatus::Pending);
        assert_eq!(guest.email, "party@example.com");
        assert_eq!(guest.full_name, "jane doe");
        assert!(!guest.is_bridal_party);
    }
}
