pub mod admin;
pub mod assistant;
pub mod auth;
pub mod content;
pub mod error;
pub mod files;
pub mod guests;
pub mod middleware;
pub mod query;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use aisle_types::content::{FaqItem, RegistryItem, ScheduleItem, StoryItem, TravelItem};

use crate::auth::AppState;
use crate::content::IndexFilter;
use crate::middleware::{require_admin, require_guest};

async fn health() -> &'static str {
    "ok"
}

/// Public list route plus admin create/update/delete for one collection.
fn collection<T: IndexFilter>(
    public: Router<AppState>,
    admin: Router<AppState>,
) -> (Router<AppState>, Router<AppState>) {
    let public = public.route(&format!("/{}", T::NAME), get(content::list::<T>));
    let admin = admin
        .route(&format!("/admin/{}", T::NAME), post(content::create::<T>))
        .route(
            &format!("/admin/{}/{{id}}", T::NAME),
            put(content::update::<T>).delete(content::remove::<T>),
        );
    (public, admin)
}

/// Builds the full HTTP surface. Static file serving is layered on by the
/// binary.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/session/guest", post(auth::guest_login))
        .route("/session/admin", post(auth::admin_login))
        .route("/guests/lookup", post(guests::lookup))
        .route("/save-the-date", post(guests::save_the_date))
        .route("/wedding-party", get(guests::wedding_party))
        .route("/functions/ask", post(assistant::ask))
        .route("/functions/validate-admin-password", post(assistant::validate_password));

    let admin = Router::new()
        .route("/admin/guests", get(admin::list_guests))
        .route(
            "/admin/guests/{id}",
            patch(admin::update_guest).delete(admin::delete_guest),
        )
        .route("/admin/stats", get(admin::guest_stats))
        .route("/admin/export/guests.csv", get(admin::export_raw))
        .route("/admin/export/import.csv", get(admin::export_import));

    let (public, admin) = collection::<FaqItem>(public, admin);
    let (public, admin) = collection::<ScheduleItem>(public, admin);
    let (public, admin) = collection::<StoryItem>(public, admin);
    let (public, admin) = collection::<RegistryItem>(public, admin);
    let (public, admin) = collection::<TravelItem>(public, admin);

    let admin = admin.layer(from_fn_with_state(state.clone(), require_admin));

    let party = Router::new()
        .route("/party", get(guests::party))
        .route("/rsvp", post(guests::submit_rsvp))
        .layer(from_fn_with_state(state.clone(), require_guest));

    let storage = Router::new()
        .route("/storage/{bucket}", get(files::list_objects))
        .route(
            "/storage/{bucket}/{name}",
            get(files::download_object)
                .put(files::upload_object)
                .delete(files::delete_object),
        )
        .layer(DefaultBodyLimit::max(files::MAX_UPLOAD_BYTES));

    Router::new()
        .merge(public)
        .merge(admin)
        .merge(party)
        .merge(storage)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
