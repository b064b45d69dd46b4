use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{FoodChoice, GuestType};

// -- Sessions --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Admin,
}

/// JWT claims for both guest and admin sessions. For a guest session `sub`
/// is the party email; for an admin session it is the literal "admin".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: Option<String>,
    pub role: Role,
    pub exp: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GuestLoginRequest {
    pub full_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NameLookupResponse {
    pub exists: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminLoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub role: Role,
    pub email: Option<String>,
}

// -- RSVP --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpGuestChoice {
    pub guest_id: Uuid,
    pub food_choice: Option<FoodChoice>,
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub attending: bool,
    pub guests: Vec<RsvpGuestChoice>,
    #[serde(default)]
    pub song_requests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub item: String,
    pub reason: String,
}

/// Per-record result of a multi-record write. Writes are independent, so
/// some records can succeed while others fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub succeeded: Vec<Uuid>,
    pub failed: Vec<ItemFailure>,
}

impl WriteOutcome {
    pub fn fail(&mut self, item: impl Into<String>, reason: impl Into<String>) {
        self.failed.push(ItemFailure {
            item: item.into(),
            reason: reason.into(),
        });
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// -- Save the date --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTheDateGuest {
    pub full_name: String,
    #[serde(default)]
    pub guest_type: GuestType,
    #[serde(default)]
    pub is_of_drinking_age: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTheDateRequest {
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub guests: Vec<SaveTheDateGuest>,
}

// -- Wedding party --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeddingPartyMember {
    pub guest_id: Uuid,
    pub full_name: String,
    pub role: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}

// -- Functions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AskRequest {
    pub context: String,
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidatePasswordRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidatePasswordResponse {
    pub valid: bool,
}

// -- Storage --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredObject {
    pub bucket: String,
    pub name: String,
    pub size: u64,
}
