use std::cmp::Ordering;

use serde::Deserialize;

use aisle_types::models::Guest;

/// Sortable columns of the admin guest table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuestColumn {
    #[default]
    FullName,
    Email,
    GuestType,
    AttendanceStatus,
    FoodChoice,
    DietaryRestrictions,
    SongRequests,
    IsBridalParty,
    IsOfDrinkingAge,
    IsAdmin,
    BridalPartyRole,
    Address,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Comparison key for one cell. Flags compare as 0/1, timestamps
/// chronologically, and everything else as lower-cased text (missing
/// values become the empty string).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(i64),
    Text(String),
}

fn text(value: Option<&str>) -> SortKey {
    SortKey::Text(value.unwrap_or_default().to_lowercase())
}

fn sort_key(guest: &Guest, column: GuestColumn) -> SortKey {
    match column {
        GuestColumn::FullName => text(Some(&guest.full_name)),
        GuestColumn::Email => text(Some(&guest.email)),
        GuestColumn::GuestType => text(Some(guest.guest_type.as_str())),
        GuestColumn::AttendanceStatus => text(Some(guest.attendance_status.as_str())),
        GuestColumn::FoodChoice => text(guest.food_choice.map(|f| f.as_str())),
        GuestColumn::DietaryRestrictions => text(guest.dietary_restrictions.as_deref()),
        GuestColumn::SongRequests => text(guest.song_requests.as_deref()),
        GuestColumn::IsBridalParty => SortKey::Number(i64::from(guest.is_bridal_party)),
        GuestColumn::IsOfDrinkingAge => SortKey::Number(i64::from(guest.is_of_drinking_age)),
        GuestColumn::IsAdmin => SortKey::Number(i64::from(guest.is_admin)),
        GuestColumn::BridalPartyRole => text(guest.bridal_party_role.as_deref()),
        GuestColumn::Address => text(guest.address.as_deref()),
        GuestColumn::CreatedAt => SortKey::Number(guest.created_at.timestamp_millis()),
        GuestColumn::UpdatedAt => SortKey::Number(
            guest.updated_at.map(|t| t.timestamp_millis()).unwrap_or(i64::MIN),
        ),
    }
}

/// Stable in-place sort; rows with equal keys keep their relative order.
pub fn sort_guests(guests: &mut [Guest], column: GuestColumn, direction: SortDirection) {
    guests.sort_by(|a, b| {
        let ord: Ordering = sort_key(a, column).cmp(&sort_key(b, column));
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_types::models::{FoodChoice, GuestType};
    use chrono::{Duration, Utc};

    fn names(guests: &[Guest]) -> Vec<&str> {
        guests.iter().map(|g| g.full_name.as_str()).collect()
    }

    #[test]
    fn sorts_text_case_insensitively_both_ways() {
        let mut guests = vec![
            Guest::new("a@example.com", "charlie", GuestType::Primary),
            Guest::new("b@example.com", "alice", GuestType::Primary),
            Guest::new("c@example.com", "bob", GuestType::Primary),
        ];
        guests[0].full_name = "Charlie".into();

        sort_guests(&mut guests, GuestColumn::FullName, SortDirection::Asc);
        assert_eq!(names(&guests), vec!["alice", "bob", "Charlie"]);

        sort_guests(&mut guests, GuestColumn::FullName, SortDirection::Desc);
        assert_eq!(names(&guests), vec!["Charlie", "bob", "alice"]);
    }

    #[test]
    fn missing_values_sort_first_and_flags_as_numbers() {
        let mut guests = vec![
            Guest::new("a@example.com", "beef eater", GuestType::Primary),
            Guest::new("b@example.com", "undecided", GuestType::Primary),
            Guest::new("c@example.com", "chicken fan", GuestType::Primary),
        ];
        guests[0].food_choice = Some(FoodChoice::Beef);
        guests[2].food_choice = Some(FoodChoice::Chicken);
        guests[2].is_bridal_party = true;

        sort_guests(&mut guests, GuestColumn::FoodChoice, SortDirection::Asc);
        assert_eq!(names(&guests), vec!["undecided", "beef eater", "chicken fan"]);

        sort_guests(&mut guests, GuestColumn::IsBridalParty, SortDirection::Desc);
        assert_eq!(guests[0].full_name, "chicken fan");
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let now = Utc::now();
        let mut guests = vec![
            Guest::new("a@example.com", "recent", GuestType::Primary),
            Guest::new("b@example.com", "never", GuestType::Primary),
            Guest::new("c@example.com", "older", GuestType::Primary),
        ];
        guests[0].updated_at = Some(now);
        guests[2].updated_at = Some(now - Duration::days(2));

        sort_guests(&mut guests, GuestColumn::UpdatedAt, SortDirection::Asc);
        assert_eq!(names(&guests), vec!["never", "older", "recent"]);
    }

    #[test]
    fn toggle_flips_direction() {
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.toggled(), SortDirection::Asc);
    }
}
