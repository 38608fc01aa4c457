use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: SqlitePool,
}

/// A tracked item; events hang off of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Property {
    pub id: i64,
    /// Caller-supplied identifier, i.e, a lot or unit number.
    pub number: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub id: i64,
    #[serde(rename = "propertyId")]
    pub property_id: i64,
    pub timestamp: NaiveDateTime,
    pub description: String,
}

/// Body for creating or replacing a property.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PropertyForm {
    pub number: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EventForm {
    pub description: String,
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`; defaults to now.
    pub timestamp: Option<String>,
}

/// Optional bounds on an event listing. Bare dates cover the whole day.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventRange {
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Message {
    pub message: String,
}
