use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use aisle_types::api::SaveTheDateRequest;
use aisle_types::models::{GuestType, NewGuest, normalize_email};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
static STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("state pattern"));
static ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(?:-\d{4})?$").expect("zip pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("Email is required")]
    MissingEmail,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Street address is required")]
    MissingStreet,
    #[error("Street address should include a house or box number")]
    StreetWithoutNumber,
    #[error("City is required")]
    MissingCity,
    #[error("State must be a two-letter code")]
    InvalidState,
    #[error("Zip code must be 5 digits or ZIP+4")]
    InvalidZip,
    #[error("Add at least one guest")]
    NoGuests,
    #[error("Guest {} needs a name", .0 + 1)]
    MissingGuestName(usize),
}

impl IntakeError {
    /// Form field the message belongs to.
    pub fn field(&self) -> String {
        match self {
            Self::MissingEmail | Self::InvalidEmail => "email".into(),
            Self::MissingStreet | Self::StreetWithoutNumber => "street".into(),
            Self::MissingCity => "city".into(),
            Self::InvalidState => "state".into(),
            Self::InvalidZip => "zip".into(),
            Self::NoGuests => "guests".into(),
            Self::MissingGuestName(i) => format!("guests[{i}].fullName"),
        }
    }
}

/// Checks every field and reports all problems at once.
pub fn validate(req: &SaveTheDateRequest) -> Result<(), Vec<IntakeError>> {
    let mut errors = Vec::new();

    let email = req.email.trim();
    if email.is_empty() {
        errors.push(IntakeError::MissingEmail);
    } else if !EMAIL.is_match(email) {
        errors.push(IntakeError::InvalidEmail);
    }

    let street = req.street.trim();
    if street.is_empty() {
        errors.push(IntakeError::MissingStreet);
    } else if !street.chars().any(|c| c.is_ascii_digit()) {
        errors.push(IntakeError::StreetWithoutNumber);
    }

    if req.city.trim().is_empty() {
        errors.push(IntakeError::MissingCity);
    }
    if !STATE.is_match(req.state.trim()) {
        errors.push(IntakeError::InvalidState);
    }
    if !ZIP.is_match(req.zip.trim()) {
        errors.push(IntakeError::InvalidZip);
    }

    if req.guests.is_empty() {
        errors.push(IntakeError::NoGuests);
    }
    for (i, guest) in req.guests.iter().enumerate() {
        if guest.full_name.trim().is_empty() {
            errors.push(IntakeError::MissingGuestName(i));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// "street, city, ST zip", the form the export parser reads back.
pub fn combined_address(req: &SaveTheDateRequest) -> String {
    format!(
        "{}, {}, {} {}",
        req.street.trim(),
        req.city.trim(),
        req.state.trim().to_uppercase(),
        req.zip.trim()
    )
}

/// Validates the form and lays out one record per listed person. The first
/// person is always the party's PRIMARY guest; nobody else may be.
pub fn plan(req: &SaveTheDateRequest) -> Result<Vec<NewGuest>, Vec<IntakeError>> {
    validate(req)?;

    let email = normalize_email(&req.email);
    let address = combined_address(req);

    Ok(req
        .guests
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let guest_type = match (i, g.guest_type) {
                (0, _) => GuestType::Primary,
                (_, GuestType::Primary) => GuestType::PlusOne,
                (_, other) => other,
            };
            NewGuest {
                email: email.clone(),
                full_name: g.full_name.clone(),
                guest_type,
                is_of_drinking_age: g.is_of_drinking_age,
                address: Some(address.clone()),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_types::api::SaveTheDateGuest;

    fn person(name: &str, guest_type: GuestType) -> SaveTheDateGuest {
        SaveTheDateGuest {
            full_name: name.into(),
            guest_type,
            is_of_drinking_age: guest_type != GuestType::Child,
        }
    }

    fn form() -> SaveTheDateRequest {
        SaveTheDateRequest {
            email: "Doe@Example.com".into(),
            street: "123 Main St".into(),
            city: "Boise".into(),
            state: "id".into(),
            zip: "83702".into(),
            guests: vec![
                person("Jane Doe", GuestType::Primary),
                person("John Doe", GuestType::Primary),
                person("Kid Doe", GuestType::Child),
            ],
        }
    }

    #[test]
    fn valid_form_plans_one_record_per_person() {
        let planned = plan(&form()).unwrap();
        assert_eq!(planned.len(), 3);

        let types: Vec<_> = planned.iter().map(|g| g.guest_type).collect();
        assert_eq!(types, vec![GuestType::Primary, GuestType::PlusOne, GuestType::Child]);
        assert!(planned.iter().all(|g| g.email == "doe@example.com"));
        assert_eq!(
            planned[0].address.as_deref(),
            Some("123 Main St, Boise, ID 83702")
        );
    }

    #[test]
    fn zip_plus_four_is_accepted() {
        let mut req = form();
        req.zip = "83702-1234".into();
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn reports_every_bad_field() {
        let req = SaveTheDateRequest {
            email: "not-an-email".into(),
            street: "Main Street".into(),
            city: " ".into(),
            state: "Idaho".into(),
            zip: "8370".into(),
            guests: vec![person("Jane Doe", GuestType::Primary), person("  ", GuestType::PlusOne)],
        };

        let errors = validate(&req).unwrap_err();
        assert_eq!(
            errors,
            vec![
                IntakeError::InvalidEmail,
                IntakeError::StreetWithoutNumber,
                IntakeError::MissingCity,
                IntakeError::InvalidState,
                IntakeError::InvalidZip,
                IntakeError::MissingGuestName(1),
            ]
        );
        assert_eq!(errors[5].field(), "guests[1].fullName");
        assert_eq!(errors[5].to_string(), "Guest 2 needs a name");
    }

    #[test]
    fn empty_form_is_rejected() {
        let req = SaveTheDateRequest {
            email: String::new(),
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            guests: vec![],
        };
        let errors = validate(&req).unwrap_err();
        assert!(errors.contains(&IntakeError::MissingEmail));
        assert!(errors.contains(&IntakeError::MissingStreet));
        assert!(errors.contains(&IntakeError::NoGuests));
    }
}
