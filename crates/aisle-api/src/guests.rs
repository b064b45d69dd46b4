use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use tracing::{info, warn};
use uuid::Uuid;

use aisle_core::{export::title_case, intake, rsvp};
use aisle_db::models::GuestRow;
use aisle_types::api::{
    Claims, GuestLoginRequest, NameLookupResponse, RsvpRequest, SaveTheDateRequest,
    WeddingPartyMember, WriteOutcome,
};
use aisle_types::models::Guest;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::query;

fn into_guests(rows: Vec<GuestRow>) -> Vec<Guest> {
    rows.into_iter().map(GuestRow::into_guest).collect()
}

/// POST /guests/lookup: does anyone by this name have an invitation?
pub async fn lookup(
    State(state): State<AppState>,
    Json(req): Json<GuestLoginRequest>,
) -> Result<Json<NameLookupResponse>, ApiError> {
    let name = req.full_name;
    let exists = query::read(&state, move |db| db.lookup_by_full_name(&name)).await?;
    Ok(Json(NameLookupResponse { exists }))
}

/// GET /party: every record sharing the session's email.
pub async fn party(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Guest>>, ApiError> {
    let email = claims.sub;
    let rows = query::read(&state, move |db| db.list_guests_by_email(&email)).await?;
    Ok(Json(into_guests(rows)))
}

/// POST /rsvp
///
/// One independent update per party member. There is no transaction: if an
/// update fails the others still land, and the response says which did.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RsvpRequest>,
) -> Result<Json<WriteOutcome>, ApiError> {
    let email = claims.sub.clone();
    let party = into_guests(query::read(&state, move |db| db.list_guests_by_email(&email)).await?);
    if party.is_empty() {
        return Err(ApiError::NotFound);
    }

    let plan = rsvp::plan(&party, &req);
    for rejected in &plan.rejected {
        warn!("RSVP for {}: skipped {} ({})", claims.sub, rejected.item, rejected.reason);
    }

    let mut outcome = WriteOutcome {
        failed: plan.rejected,
        ..Default::default()
    };
    let updates = plan.updates;

    let outcome = query::write(&state, move |db| {
        for (guest_id, patch) in &updates {
            match db.update_guest_rsvp(&guest_id.to_string(), patch) {
                Ok(true) => outcome.succeeded.push(*guest_id),
                Ok(false) => outcome.fail(guest_id.to_string(), "guest no longer exists"),
                Err(e) => outcome.fail(guest_id.to_string(), format!("{:#}", e)),
            }
        }
        Ok(outcome)
    })
    .await?;

    info!(
        "RSVP for {}: attending={} updated={} failed={}",
        claims.sub,
        req.attending,
        outcome.succeeded.len(),
        outcome.failed.len()
    );
    Ok(Json(outcome))
}

/// POST /save-the-date: validates, then creates one record per person.
pub async fn save_the_date(
    State(state): State<AppState>,
    Json(req): Json<SaveTheDateRequest>,
) -> Result<(StatusCode, Json<WriteOutcome>), ApiError> {
    let planned = intake::plan(&req)?;

    let outcome = query::write(&state, move |db| {
        let mut outcome = WriteOutcome::default();
        for guest in &planned {
            let id = Uuid::new_v4();
            match db.create_guest(&id.to_string(), guest) {
                Ok(()) => outcome.succeeded.push(id),
                Err(e) => outcome.fail(guest.full_name.clone(), format!("{:#}", e)),
            }
        }
        Ok(outcome)
    })
    .await?;

    info!(
        "Save the date: created {} guest(s), {} failed",
        outcome.succeeded.len(),
        outcome.failed.len()
    );
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /wedding-party: public bios, ordered by role then name.
pub async fn wedding_party(
    State(state): State<AppState>,
) -> Result<Json<Vec<WeddingPartyMember>>, ApiError> {
    let rows = query::read(&state, |db| db.list_bridal_party()).await?;
    let mut members: Vec<WeddingPartyMember> = into_guests(rows)
        .into_iter()
        .map(|g| WeddingPartyMember {
            guest_id: g.guest_id,
            full_name: title_case(&g.full_name),
            role: g.bridal_party_role,
            image: g.image,
            description: g.description,
        })
        .collect();

    members.sort_by(|a, b| {
        a.role
            .as_deref()
            .unwrap_or_default()
            .cmp(b.role.as_deref().unwrap_or_default())
            .then_with(|| a.full_name.cmp(&b.full_name))
    });
    Ok(Json(members))
}
