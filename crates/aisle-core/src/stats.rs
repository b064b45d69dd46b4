use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use aisle_types::models::{AttendanceStatus, FoodChoice, Guest, GuestType};

/// How far back "recently updated" reaches.
pub const RECENT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodCounts {
    pub beef: usize,
    pub chicken: usize,
    pub vegetarian: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestStats {
    pub total: usize,
    pub attending: usize,
    pub declined: usize,
    pub pending: usize,
    pub adults: usize,
    pub children: usize,
    pub primary_guests: usize,
    pub plus_ones: usize,
    pub drinking_age: usize,
    pub bridal_party: usize,
    /// Meal counts among attending guests only.
    pub food: FoodCounts,
    pub with_dietary_restrictions: usize,
    pub with_song_requests: usize,
    pub recently_updated: usize,
    /// Whole percent of guests attending.
    pub attendance_rate: u32,
}

/// round(attending / total * 100), or 0 for an empty list.
pub fn attendance_rate(attending: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((attending as f64 / total as f64) * 100.0).round() as u32
}

pub fn is_recently_updated(guest: &Guest, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(guest.last_touched()) <= Duration::days(RECENT_WINDOW_DAYS)
}

fn has_text(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

pub fn compute(guests: &[Guest], now: DateTime<Utc>) -> GuestStats {
    let mut stats = GuestStats {
        total: guests.len(),
        ..Default::default()
    };

    for g in guests {
        match g.attendance_status {
            AttendanceStatus::Attending => stats.attending += 1,
            AttendanceStatus::Declined => stats.declined += 1,
            AttendanceStatus::Pending => stats.pending += 1,
        }

        match g.guest_type {
            GuestType::Primary => stats.primary_guests += 1,
            GuestType::PlusOne => stats.plus_ones += 1,
            GuestType::Child => {}
        }
        if g.is_adult() {
            stats.adults += 1;
        } else {
            stats.children += 1;
        }

        if g.is_of_drinking_age {
            stats.drinking_age += 1;
        }
        if g.is_bridal_party {
            stats.bridal_party += 1;
        }

        if g.is_attending() {
            match g.food_choice {
                Some(FoodChoice::Beef) => stats.food.beef += 1,
                Some(FoodChoice::Chicken) => stats.food.chicken += 1,
                Some(FoodChoice::Vegetarian) => stats.food.vegetarian += 1,
                None => {}
            }
        }

        if has_text(&g.dietary_restrictions) {
            stats.with_dietary_restrictions += 1;
        }
        if has_text(&g.song_requests) {
            stats.with_song_requests += 1;
        }
        if is_recently_updated(g, now) {
            stats.recently_updated += 1;
        }
    }

    stats.attendance_rate = attendance_rate(stats.attending, stats.total);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(guest_type: GuestType, status: AttendanceStatus) -> Guest {
        let mut g = Guest::new("party@example.com", "someone", guest_type);
        g.attendance_status = status;
        g
    }

    #[test]
    fn attendance_rate_rounds_and_handles_empty() {
        assert_eq!(attendance_rate(0, 0), 0);
        assert_eq!(attendance_rate(4, 10), 40);
        assert_eq!(attendance_rate(2, 3), 67);
        assert_eq!(attendance_rate(1, 3), 33);
    }

    #[test]
    fn recent_window_prefers_updated_at() {
        let now = Utc::now();

        let mut fresh = guest(GuestType::Primary, AttendanceStatus::Attending);
        fresh.created_at = now - Duration::days(30);
        fresh.updated_at = Some(now - Duration::days(3));
        assert!(is_recently_updated(&fresh, now));

        let mut stale = guest(GuestType::Primary, AttendanceStatus::Attending);
        stale.created_at = now - Duration::days(30);
        stale.updated_at = Some(now - Duration::days(10));
        assert!(!is_recently_updated(&stale, now));

        let mut new_invite = guest(GuestType::Primary, AttendanceStatus::Pending);
        new_invite.created_at = now - Duration::days(1);
        assert!(is_recently_updated(&new_invite, now));
    }

    #[test]
    fn counts_across_a_mixed_list() {
        let now = Utc::now();

        let mut jane = guest(GuestType::Primary, AttendanceStatus::Attending);
        jane.food_choice = Some(FoodChoice::Beef);
        jane.is_of_drinking_age = true;
        jane.is_bridal_party = true;
        jane.song_requests = Some("September".into());

        let mut john = guest(GuestType::PlusOne, AttendanceStatus::Attending);
        john.food_choice = Some(FoodChoice::Vegetarian);
        john.dietary_restrictions = Some("gluten".into());

        let mut kid = guest(GuestType::Child, AttendanceStatus::Declined);
        kid.food_choice = Some(FoodChoice::Chicken);
        kid.dietary_restrictions = Some("   ".into());
        kid.created_at = now - Duration::days(20);

        let sam = guest(GuestType::Primary, AttendanceStatus::Pending);

        let stats = compute(&[jane, john, kid, sam], now);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.attending, 2);
        assert_eq!(stats.declined, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.adults, 3);
        assert_eq!(stats.children, 1);
        assert_eq!(stats.primary_guests, 2);
        assert_eq!(stats.plus_ones, 1);
        assert_eq!(stats.drinking_age, 1);
        assert_eq!(stats.bridal_party, 1);
        assert_eq!(
            stats.food,
            FoodCounts {
                beef: 1,
                chicken: 0,
                vegetarian: 1
            }
        );
        assert_eq!(stats.with_dietary_restrictions, 1);
        assert_eq!(stats.with_song_requests, 1);
        assert_eq!(stats.recently_updated, 3);
        assert_eq!(stats.attendance_rate, 50);
    }

    #[test]
    fn empty_list_is_all_zero() {
        assert_eq!(compute(&[], Utc::now()), GuestStats::default());
    }
}
