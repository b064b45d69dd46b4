use std::collections::HashMap;

use uuid::Uuid;

use aisle_types::api::{ItemFailure, RsvpGuestChoice, RsvpRequest};
use aisle_types::models::{AttendanceStatus, Guest, RsvpPatch};

/// Songs are kept as one comma-separated string. Blank entries are dropped.
pub fn join_song_requests(songs: &[String]) -> Option<String> {
    let joined = songs
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() { None } else { Some(joined) }
}

fn clean(text: &Option<String>) -> Option<String> {
    text.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// The writes an RSVP submission turns into, plus the entries refused
/// before anything is written.
#[derive(Debug, Default)]
pub struct RsvpPlan {
    pub updates: Vec<(Uuid, RsvpPatch)>,
    pub rejected: Vec<ItemFailure>,
}

/// Every member of the party gets one update carrying the party-level
/// attendance and the shared song string. Members without a matching
/// choice get no meal or dietary note. Choices naming someone outside the
/// party, or naming a member twice, are rejected.
pub fn plan(party: &[Guest], request: &RsvpRequest) -> RsvpPlan {
    let mut plan = RsvpPlan::default();
    let mut choices: HashMap<Uuid, &RsvpGuestChoice> = HashMap::new();

    for choice in &request.guests {
        if !party.iter().any(|g| g.guest_id == choice.guest_id) {
            plan.rejected.push(ItemFailure {
                item: choice.guest_id.to_string(),
                reason: "guest is not part of this party".into(),
            });
        } else if choices.contains_key(&choice.guest_id) {
            plan.rejected.push(ItemFailure {
                item: choice.guest_id.to_string(),
                reason: "guest listed more than once".into(),
            });
        } else {
            choices.insert(choice.guest_id, choice);
        }
    }

    let attendance_status = AttendanceStatus::from_response(request.attending);
    let song_requests = join_song_requests(&request.song_requests);

    for guest in party {
        let choice = choices.get(&guest.guest_id);
        plan.updates.push((
            guest.guest_id,
            RsvpPatch {
                attendance_status,
                food_choice: choice.and_then(|c| c.food_choice),
                dietary_restrictions: choice.and_then(|c| clean(&c.dietary_restrictions)),
                song_requests: song_requests.clone(),
            },
        ));
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_types::models::{FoodChoice, GuestType};

    fn party() -> Vec<Guest> {
        vec![
            Guest::new("doe@example.com", "Jane Doe", GuestType::Primary),
            Guest::new("doe@example.com", "John Doe", GuestType::PlusOne),
        ]
    }

    fn choice(id: Uuid, food: FoodChoice, diet: &str) -> RsvpGuestChoice {
        RsvpGuestChoice {
            guest_id: id,
            food_choice: Some(food),
            dietary_restrictions: Some(diet.into()),
        }
    }

    #[test]
    fn songs_are_trimmed_and_joined() {
        let songs = vec![" September ".to_string(), "".into(), "Dancing Queen".into()];
        assert_eq!(
            join_song_requests(&songs).as_deref(),
            Some("September, Dancing Queen")
        );
        assert_eq!(join_song_requests(&[]), None);
    }

    #[test]
    fn every_member_is_updated_with_party_answer() {
        let party = party();
        let request = RsvpRequest {
            attending: true,
            guests: vec![choice(party[0].guest_id, FoodChoice::Beef, " shellfish ")],
            song_requests: vec!["September".into()],
        };

        let plan = plan(&party, &request);
        assert!(plan.rejected.is_empty());
        assert_eq!(plan.updates.len(), 2);

        let (jane_id, jane) = &plan.updates[0];
        assert_eq!(*jane_id, party[0].guest_id);
        assert_eq!(jane.attendance_status, AttendanceStatus::Attending);
        assert_eq!(jane.food_choice, Some(FoodChoice::Beef));
        assert_eq!(jane.dietary_restrictions.as_deref(), Some("shellfish"));
        assert_eq!(jane.song_requests.as_deref(), Some("September"));

        let (_, john) = &plan.updates[1];
        assert_eq!(john.food_choice, None);
        assert_eq!(john.song_requests.as_deref(), Some("September"));
    }

    #[test]
    fn declining_marks_everyone_declined() {
        let party = party();
        let request = RsvpRequest {
            attending: false,
            guests: vec![],
            song_requests: vec![],
        };
        let plan = plan(&party, &request);
        assert!(
            plan.updates
                .iter()
                .all(|(_, p)| p.attendance_status == AttendanceStatus::Declined)
        );
    }

    #[test]
    fn strangers_and_duplicates_are_rejected() {
        let party = party();
        let stranger = Uuid::new_v4();
        let request = RsvpRequest {
            attending: true,
            guests: vec![
                choice(stranger, FoodChoice::Chicken, ""),
                choice(party[1].guest_id, FoodChoice::Vegetarian, ""),
                choice(party[1].guest_id, FoodChoice::Beef, ""),
            ],
            song_requests: vec![],
        };

        let plan = plan(&party, &request);
        assert_eq!(plan.rejected.len(), 2);
        assert_eq!(plan.rejected[0].item, stranger.to_string());
        assert_eq!(plan.rejected[1].reason, "guest listed more than once");

        // the first choice for a member wins
        let (_, john) = &plan.updates[1];
        assert_eq!(john.food_choice, Some(FoodChoice::Vegetarian));
        assert_eq!(john.dietary_restrictions, None);
    }
}
