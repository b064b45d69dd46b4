use crate::Database;
use crate::models::GuestRow;
use anyhow::Result;
use rusqlite::{Connection, Row};

use aisle_types::models::{NewGuest, RsvpPatch, WeddingPartyPatch, normalize_email, normalize_name};

const GUEST_COLUMNS: &str = "id, email, full_name, guest_type, attendance_status, food_choice, \
     dietary_restrictions, song_requests, is_bridal_party, is_of_drinking_age, is_admin, \
     bridal_party_role, image, description, address, created_at, updated_at";

impl Database {
    // -- Writes --

    /// Inserts one guest. Email and full name are normalized here so that
    /// lookups never depend on how the caller typed them.
    pub fn create_guest(&self, id: &str, guest: &NewGuest) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO guests (id, email, full_name, guest_type, is_of_drinking_age, address)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    id,
                    normalize_email(&guest.email),
                    normalize_name(&guest.full_name),
                    guest.guest_type.as_str(),
                    guest.is_of_drinking_age,
                    guest.address,
                ],
            )?;
            Ok(())
        })
    }

    /// Overwrites the RSVP fields of one guest. Returns false if no such guest.
    pub fn update_guest_rsvp(&self, id: &str, patch: &RsvpPatch) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE guests
                 SET attendance_status = ?2,
                     food_choice = ?3,
                     dietary_restrictions = ?4,
                     song_requests = ?5,
                     updated_at = datetime('now')
                 WHERE id = ?1",
                rusqlite::params![
                    id,
                    patch.attendance_status.as_str(),
                    patch.food_choice.map(|f| f.as_str()),
                    patch.dietary_restrictions,
                    patch.song_requests,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Absent fields are left alone. An empty role, image or description
    /// clears the stored value.
    pub fn update_wedding_party(&self, id: &str, patch: &WeddingPartyPatch) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE guests
                 SET is_bridal_party = COALESCE(?2, is_bridal_party),
                     bridal_party_role = CASE WHEN ?3 IS NULL THEN bridal_party_role
                                              ELSE NULLIF(TRIM(?3), '') END,
                     image = CASE WHEN ?4 IS NULL THEN image ELSE NULLIF(TRIM(?4), '') END,
                     description = CASE WHEN ?5 IS NULL THEN description
                                        ELSE NULLIF(TRIM(?5), '') END,
                     is_of_drinking_age = COALESCE(?6, is_of_drinking_age),
                     is_admin = COALESCE(?7, is_admin),
                     updated_at = datetime('now')
                 WHERE id = ?1",
                rusqlite::params![
                    id,
                    patch.is_bridal_party,
                    patch.bridal_party_role,
                    patch.image,
                    patch.description,
                    patch.is_of_drinking_age,
                    patch.is_admin,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_guest(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM guests WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Reads --

    /// Existence check used as the guest login gate.
    pub fn lookup_by_full_name(&self, full_name: &str) -> Result<bool> {
        Ok(self.find_guest_by_full_name(full_name)?.is_some())
    }

    pub fn find_guest_by_full_name(&self, full_name: &str) -> Result<Option<GuestRow>> {
        let name = normalize_name(full_name);
        self.with_conn(|conn| {
            let sql = format!("SELECT {GUEST_COLUMNS} FROM guests WHERE full_name = ?1 LIMIT 1");
            conn.query_row(&sql, [&name], map_guest_row).optional()
        })
    }

    pub fn get_guest(&self, id: &str) -> Result<Option<GuestRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {GUEST_COLUMNS} FROM guests WHERE id = ?1");
            conn.query_row(&sql, [id], map_guest_row).optional()
        })
    }

    /// Every member of one party, in no particular order.
    pub fn list_guests_by_email(&self, email: &str) -> Result<Vec<GuestRow>> {
        let email = normalize_email(email);
        self.with_conn(|conn| query_guests(conn, "WHERE email = ?1", &[&email]))
    }

    /// Full scan for the admin dashboard. Wedding-scale lists only, so no paging.
    pub fn list_all_guests(&self) -> Result<Vec<GuestRow>> {
        self.with_conn(|conn| query_guests(conn, "", &[]))
    }

    pub fn list_bridal_party(&self) -> Result<Vec<GuestRow>> {
        self.with_conn(|conn| query_guests(conn, "WHERE is_bridal_party = 1", &[]))
    }
}

fn query_guests(
    conn: &Connection,
    filter: &str,
    params: &[&dyn rusqlite::types::ToSql],
) -> Result<Vec<GuestRow>> {
    let sql = format!("SELECT {GUEST_COLUMNS} FROM guests {filter} ORDER BY created_at, rowid");
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map(params, map_guest_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_guest_row(row: &Row<'_>) -> rusqlite::Result<GuestRow> {
    Ok(GuestRow {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        guest_type: row.get(3)?,
        attendance_status: row.get(4)?,
        food_choice: row.get(5)?,
        dietary_restrictions: row.get(6)?,
        song_requests: row.get(7)?,
        is_bridal_party: row.get(8)?,
        is_of_drinking_age: row.get(9)?,
        is_admin: row.get(10)?,
        bridal_party_role: row.get(11)?,
        image: row.get(12)?,
        description: row.get(13)?,
        address: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aisle_types::models::{AttendanceStatus, FoodChoice, GuestType};
    use uuid::Uuid;

    fn invite(db: &Database, email: &str, name: &str, guest_type: GuestType) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_guest(
            &id,
            &NewGuest {
                email: email.into(),
                full_name: name.into(),
                guest_type,
                is_of_drinking_age: true,
                address: Some("123 Main St, Boise, ID 83702".into()),
            },
        )
        .unwrap();
        id
    }

    #[test]
    fn full_name_lookup_ignores_case_and_padding() {
        let db = Database::open_in_memory().unwrap();
        invite(&db, "doe@example.com", "Jane Doe", GuestType::Primary);

        for attempt in ["Jane Doe", "jane doe", " Jane Doe ", "JANE DOE"] {
            assert!(db.lookup_by_full_name(attempt).unwrap(), "{attempt:?} should match");
        }
        assert!(!db.lookup_by_full_name("John Doe").unwrap());

        let row = db.find_guest_by_full_name(" jane DOE").unwrap().unwrap();
        assert_eq!(row.full_name, "jane doe");
        assert_eq!(row.email, "doe@example.com");
    }

    #[test]
    fn party_is_everyone_sharing_an_email() {
        let db = Database::open_in_memory().unwrap();
        invite(&db, "doe@example.com", "Jane Doe", GuestType::Primary);
        invite(&db, "Doe@Example.com", "John Doe", GuestType::PlusOne);
        invite(&db, "smith@example.com", "Sam Smith", GuestType::Primary);

        let party = db.list_guests_by_email("doe@example.com").unwrap();
        assert_eq!(party.len(), 2);
        assert_eq!(db.list_all_guests().unwrap().len(), 3);
    }

    #[test]
    fn rsvp_update_sets_fields_and_timestamp() {
        let db = Database::open_in_memory().unwrap();
        let id = invite(&db, "doe@example.com", "Jane Doe", GuestType::Primary);

        let patch = RsvpPatch {
            attendance_status: AttendanceStatus::Attending,
            food_choice: Some(FoodChoice::Chicken),
            dietary_restrictions: Some("peanuts".into()),
            song_requests: Some("September, Dancing Queen".into()),
        };
        assert!(db.update_guest_rsvp(&id, &patch).unwrap());
        assert!(!db.update_guest_rsvp(&Uuid::new_v4().to_string(), &patch).unwrap());

        let guest = db.get_guest(&id).unwrap().unwrap().into_guest();
        assert_eq!(guest.attendance_status, AttendanceStatus::Attending);
        assert_eq!(guest.food_choice, Some(FoodChoice::Chicken));
        assert_eq!(guest.dietary_restrictions.as_deref(), Some("peanuts"));
        assert!(guest.updated_at.is_some());
    }

    #[test]
    fn wedding_party_patch_only_touches_given_fields() {
        let db = Database::open_in_memory().unwrap();
        let id = invite(&db, "doe@example.com", "Jane Doe", GuestType::Primary);

        let patch = WeddingPartyPatch {
            is_bridal_party: Some(true),
            bridal_party_role: Some("Maid of Honor".into()),
            ..Default::default()
        };
        assert!(db.update_wedding_party(&id, &patch).unwrap());

        let guest = db.get_guest(&id).unwrap().unwrap().into_guest();
        assert!(guest.is_bridal_party);
        assert!(guest.is_of_drinking_age);
        assert_eq!(guest.bridal_party_role.as_deref(), Some("Maid of Honor"));
        assert_eq!(db.list_bridal_party().unwrap().len(), 1);
    }

    #[test]
    fn empty_wedding_party_text_clears_the_field() {
        let db = Database::open_in_memory().unwrap();
        let id = invite(&db, "doe@example.com", "Jane Doe", GuestType::Primary);

        let set = WeddingPartyPatch {
            is_bridal_party: Some(true),
            bridal_party_role: Some("Maid of Honor".into()),
            image: Some("wedding-party/jane.jpg".into()),
            description: Some("Best friend since kindergarten.".into()),
            ..Default::default()
        };
        assert!(db.update_wedding_party(&id, &set).unwrap());

        let clear = WeddingPartyPatch {
            bridal_party_role: Some(String::new()),
            image: Some("  ".into()),
            ..Default::default()
        };
        assert!(db.update_wedding_party(&id, &clear).unwrap());

        let guest = db.get_guest(&id).unwrap().unwrap().into_guest();
        assert_eq!(guest.bridal_party_role, None);
        assert_eq!(guest.image, None);
        assert_eq!(guest.description.as_deref(), Some("Best friend since kindergarten."));
        assert!(guest.is_bridal_party);
    }

    #[test]
    fn deleting_a_guest_leaves_the_rest_of_the_party() {
        let db = Database::open_in_memory().unwrap();
        let jane = invite(&db, "doe@example.com", "Jane Doe", GuestType::Primary);
        invite(&db, "doe@example.com", "John Doe", GuestType::PlusOne);

        assert!(db.delete_guest(&jane).unwrap());
        assert!(!db.delete_guest(&jane).unwrap());

        let party = db.list_guests_by_email("doe@example.com").unwrap();
        assert_eq!(party.len(), 1);
        assert_eq!(party[0].full_name, "john doe");
    }
}
