use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use aisle_types::content::{Collection, FaqItem, RegistryItem, ScheduleItem, StoryItem, TravelItem};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::query;

/// Maps list query parameters onto a collection's index key.
pub trait IndexFilter: Collection {
    fn index_filter(params: &HashMap<String, String>) -> Option<String>;
}

impl IndexFilter for FaqItem {
    fn index_filter(params: &HashMap<String, String>) -> Option<String> {
        params.get("section").cloned()
    }
}

impl IndexFilter for ScheduleItem {
    fn index_filter(params: &HashMap<String, String>) -> Option<String> {
        params.get("date").cloned()
    }
}

impl IndexFilter for StoryItem {
    /// Both `year` and `month` are needed; either alone lists everything.
    fn index_filter(params: &HashMap<String, String>) -> Option<String> {
        let year = params.get("year")?.parse().ok()?;
        let month = params.get("month")?.parse().ok()?;
        Some(StoryItem::year_month_key(year, month))
    }
}

impl IndexFilter for RegistryItem {
    fn index_filter(params: &HashMap<String, String>) -> Option<String> {
        params.get("category").cloned()
    }
}

impl IndexFilter for TravelItem {
    fn index_filter(params: &HashMap<String, String>) -> Option<String> {
        params.get("category").cloned()
    }
}

/// GET /{collection}
pub async fn list<T: IndexFilter>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<T>>, ApiError> {
    let key = T::index_filter(&params);
    let items = query::read(&state, move |db| db.list_documents::<T>(key.as_deref())).await?;
    Ok(Json(items))
}

/// POST /admin/{collection}: the server assigns the id.
pub async fn create<T: Collection>(
    State(state): State<AppState>,
    Json(mut item): Json<T>,
) -> Result<(StatusCode, Json<T>), ApiError> {
    item.validate().map_err(ApiError::BadRequest)?;
    item.set_id(Uuid::new_v4());
    let item = query::write(&state, move |db| {
        db.insert_document(&item)?;
        Ok(item)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /admin/{collection}/{id}: the path id wins over any id in the body.
pub async fn update<T: Collection>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut item): Json<T>,
) -> Result<Json<T>, ApiError> {
    item.validate().map_err(ApiError::BadRequest)?;
    item.set_id(id);
    let (found, item) = query::write(&state, move |db| {
        let found = db.update_document(&item)?;
        Ok((found, item))
    })
    .await?;

    if found { Ok(Json(item)) } else { Err(ApiError::NotFound) }
}

/// DELETE /admin/{collection}/{id}
pub async fn remove<T: Collection>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let found = query::write(&state, move |db| db.delete_document::<T>(&id.to_string())).await?;
    if found { Ok(StatusCode::NO_CONTENT) } else { Err(ApiError::NotFound) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn story_filter_needs_year_and_month() {
        assert_eq!(
            StoryItem::index_filter(&params(&[("year", "2019"), ("month", "3")])).as_deref(),
            Some("2019-03")
        );
        assert_eq!(StoryItem::index_filter(&params(&[("year", "2019")])), None);
        assert_eq!(StoryItem::index_filter(&params(&[("year", "x"), ("month", "3")])), None);
    }

    #[test]
    fn other_collections_filter_on_one_param() {
        assert_eq!(
            FaqItem::index_filter(&params(&[("section", "Travel")])).as_deref(),
            Some("Travel")
        );
        assert_eq!(RegistryItem::index_filter(&params(&[("section", "Travel")])), None);
    }
}
