use super::{
    config::NUMBER_MAX_LEN,
    db_ops,
    db_ops::DbModel,
    errors::ServerError,
    models::{
        AppState, Event, EventForm, EventRange, Message, Property,
        PropertyForm,
    },
    timestamp::{self, DefaultTime},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDateTime, Utc};

const PROPERTY_NOT_FOUND: &str = "Property not found.";
const EVENT_NOT_FOUND: &str = "Event not found.";

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "healthy"
}

async fn get_property_or_404(
    db: &sqlx::SqlitePool,
    id: i64,
) -> Result<Property, ServerError> {
    Property::get(db, &db_ops::GetPropertyQuery { id })
        .await?
        .ok_or(ServerError::NotFound(PROPERTY_NOT_FOUND))
}

fn validate_number(number: &str) -> Result<&str, ServerError> {
    let number = number.trim();
    if number.is_empty() {
        return Err(ServerError::BadRequest(
            "Property number must not be empty.".to_string(),
        ));
    }
    if number.chars().count() > NUMBER_MAX_LEN {
        return Err(ServerError::BadRequest(format!(
            "Property number must be at most {NUMBER_MAX_LEN} characters."
        )));
    }
    Ok(number)
}

fn parse_field(
    field: &str,
    raw: Option<&str>,
    default_time: DefaultTime,
) -> Result<Option<NaiveDateTime>, ServerError> {
    match raw {
        None => Ok(None),
        Some(raw) => timestamp::parse(raw, default_time)
            .map(Some)
            .ok_or_else(|| {
                ServerError::BadRequest(timestamp::parse_error_detail(field))
            }),
    }
}

/// Create a property.
#[utoipa::path(
    post,
    path = "/properties",
    tag = "properties",
    request_body = PropertyForm,
    responses(
        (status = 201, description = "Property created", body = Property),
        (status = 400, description = "Invalid property number"),
    )
)]
pub async fn create_property(
    State(AppState { db }): State<AppState>,
    Json(form): Json<PropertyForm>,
) -> Result<(StatusCode, Json<Property>), ServerError> {
    let number = validate_number(&form.number)?;
    let property =
        db_ops::create_property(&db, number, form.notes.as_deref()).await?;
    tracing::info!(property_id = property.id, "created property");

    Ok((StatusCode::CREATED, Json(property)))
}

/// List every property.
#[utoipa::path(
    get,
    path = "/properties",
    tag = "properties",
    responses((status = 200, description = "All properties", body = [Property]))
)]
pub async fn list_properties(
    State(AppState { db }): State<AppState>,
) -> Result<Json<Vec<Property>>, ServerError> {
    let properties =
        Property::list(&db, &db_ops::ListPropertyQuery).await?;

    Ok(Json(properties))
}

/// Get a property, including its notes.
#[utoipa::path(
    get,
    path = "/properties/{property_id}",
    tag = "properties",
    params(("property_id" = i64, Path, description = "Property id")),
    responses(
        (status = 200, description = "The property", body = Property),
        (status = 404, description = "Property not found"),
    )
)]
pub async fn get_property(
    State(AppState { db }): State<AppState>,
    Path(property_id): Path<i64>,
) -> Result<Json<Property>, ServerError> {
    Ok(Json(get_property_or_404(&db, property_id).await?))
}

/// Replace a property's number and notes.
#[utoipa::path(
    put,
    path = "/properties/{property_id}",
    tag = "properties",
    params(("property_id" = i64, Path, description = "Property id")),
    request_body = PropertyForm,
    responses(
        (status = 200, description = "Updated property", body = Property),
        (status = 400, description = "Invalid property number"),
        (status = 404, description = "Property not found"),
    )
)]
pub async fn update_property(
    State(AppState { db }): State<AppState>,
    Path(property_id): Path<i64>,
    Json(form): Json<PropertyForm>,
) -> Result<Json<Property>, ServerError> {
    let number = validate_number(&form.number)?.to_string();
    let mut property = get_property_or_404(&db, property_id).await?;
    property.number = number;
    property.notes = form.notes;
    property.save(&db).await?;
    tracing::info!(property_id, "updated property");

    Ok(Json(property))
}

/// Permanently delete a property along with all of its events.
#[utoipa::path(
    delete,
    path = "/properties/{property_id}",
    tag = "properties",
    params(("property_id" = i64, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property deleted", body = Message),
        (status = 404, description = "Property not found"),
    )
)]
pub async fn delete_property(
    State(AppState { db }): State<AppState>,
    Path(property_id): Path<i64>,
) -> Result<Json<Message>, ServerError> {
    get_property_or_404(&db, property_id)
        .await?
        .delete(&db)
        .await?;
    tracing::info!(property_id, "deleted property and its events");

    Ok(Json(Message {
        message: "Property and associated events deleted.".to_string(),
    }))
}

/// List a property's events, oldest first, optionally within a date range.
#[utoipa::path(
    get,
    path = "/properties/{property_id}/events",
    tag = "events",
    params(
        ("property_id" = i64, Path, description = "Property id"),
        EventRange,
    ),
    responses(
        (status = 200, description = "Matching events", body = [Event]),
        (status = 400, description = "Unparsable or inverted date range"),
        (status = 404, description = "Property not found, or no matching events"),
    )
)]
pub async fn list_events(
    State(AppState { db }): State<AppState>,
    Path(property_id): Path<i64>,
    Query(range): Query<EventRange>,
) -> Result<Json<Vec<Event>>, ServerError> {
    let start = parse_field(
        "start_date",
        range.start_date.as_deref(),
        DefaultTime::StartOfDay,
    )?;
    let end = parse_field(
        "end_date",
        range.end_date.as_deref(),
        DefaultTime::EndOfDay,
    )?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(ServerError::BadRequest(
                "start_date must not be after end_date.".to_string(),
            ));
        }
    }
    get_property_or_404(&db, property_id).await?;

    let events = Event::list(
        &db,
        &db_ops::ListEventQuery {
            property_id,
            start,
            end,
        },
    )
    .await?;
    if events.is_empty() {
        return Err(ServerError::NotFound(
            if start.is_some() || end.is_some() {
                "No events found for this property in the given range."
            } else {
                "No events found for this property."
            },
        ));
    }

    Ok(Json(events))
}

/// Log a new event for a property.
#[utoipa::path(
    post,
    path = "/properties/{property_id}/events",
    tag = "events",
    params(("property_id" = i64, Path, description = "Property id")),
    request_body = EventForm,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Unparsable timestamp"),
        (status = 404, description = "Property not found"),
    )
)]
pub async fn create_event(
    State(AppState { db }): State<AppState>,
    Path(property_id): Path<i64>,
    Json(form): Json<EventForm>,
) -> Result<(StatusCode, Json<Event>), ServerError> {
    let timestamp = parse_field(
        "timestamp",
        form.timestamp.as_deref(),
        DefaultTime::StartOfDay,
    )?
    .unwrap_or_else(|| Utc::now().naive_utc());

    let event =
        db_ops::create_event(&db, property_id, timestamp, &form.description)
            .await?
            .ok_or(ServerError::NotFound(PROPERTY_NOT_FOUND))?;
    tracing::info!(property_id, event_id = event.id, "logged event");

    Ok((StatusCode::CREATED, Json(event)))
}

/// Get one of a property's events.
#[utoipa::path(
    get,
    path = "/properties/{property_id}/events/{event_id}",
    tag = "events",
    params(
        ("property_id" = i64, Path, description = "Property id"),
        ("event_id" = i64, Path, description = "Event id"),
    ),
    responses(
        (status = 200, description = "The event", body = Event),
        (status = 404, description = "Event not found"),
    )
)]
pub async fn get_event(
    State(AppState { db }): State<AppState>,
    Path((property_id, event_id)): Path<(i64, i64)>,
) -> Result<Json<Event>, ServerError> {
    let event = Event::get(
        &db,
        &db_ops::GetEventQuery {
            property_id,
            id: event_id,
        },
    )
    .await?
    .ok_or(ServerError::NotFound(EVENT_NOT_FOUND))?;

    Ok(Json(event))
}

/// Correct an event's description or timestamp. An omitted timestamp leaves
/// the existing one alone.
#[utoipa::path(
    put,
    path = "/properties/{property_id}/events/{event_id}",
    tag = "events",
    params(
        ("property_id" = i64, Path, description = "Property id"),
        ("event_id" = i64, Path, description = "Event id"),
    ),
    request_body = EventForm,
    responses(
        (status = 200, description = "Updated event", body = Event),
        (status = 400, description = "Unparsable timestamp"),
        (status = 404, description = "Event not found"),
    )
)]
pub async fn update_event(
    State(AppState { db }): State<AppState>,
    Path((property_id, event_id)): Path<(i64, i64)>,
    Json(form): Json<EventForm>,
) -> Result<Json<Event>, ServerError> {
    let timestamp = parse_field(
        "timestamp",
        form.timestamp.as_deref(),
        DefaultTime::StartOfDay,
    )?;
    let mut event = Event::get(
        &db,
        &db_ops::GetEventQuery {
            property_id,
            id: event_id,
        },
    )
    .await?
    .ok_or(ServerError::NotFound(EVENT_NOT_FOUND))?;

    event.description = form.description;
    if let Some(ts) = timestamp {
        event.timestamp = ts;
    }
    event.save(&db).await?;
    tracing::info!(property_id, event_id, "updated event");

    Ok(Json(event))
}

/// Permanently delete an event.
#[utoipa::path(
    delete,
    path = "/properties/{property_id}/events/{event_id}",
    tag = "events",
    params(
        ("property_id" = i64, Path, description = "Property id"),
        ("event_id" = i64, Path, description = "Event id"),
    ),
    responses(
        (status = 200, description = "Event deleted", body = Message),
        (status = 404, description = "Event not found"),
    )
)]
pub async fn delete_event(
    State(AppState { db }): State<AppState>,
    Path((property_id, event_id)): Path<(i64, i64)>,
) -> Result<Json<Message>, ServerError> {
    Event::get(
        &db,
        &db_ops::GetEventQuery {
            property_id,
            id: event_id,
        },
    )
    .await?
    .ok_or(ServerError::NotFound(EVENT_NOT_FOUND))?
    .delete(&db)
    .await?;
    tracing::info!(property_id, event_id, "deleted event");

    Ok(Json(Message {
        message: "Event deleted.".to_string(),
    }))
}
