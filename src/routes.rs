use super::{controllers, docs::ApiDoc, models};
use axum::routing::{get, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[rustfmt::skip]
pub fn get_routes() -> Router<models::AppState> {
    Router::new()
        .route("/health", get(controllers::health))
        .route("/properties", get(controllers::list_properties).post(controllers::create_property))
        .route("/properties/", get(controllers::list_properties).post(controllers::create_property))
        .route("/properties/:property_id", get(controllers::get_property).put(controllers::update_property).delete(controllers::delete_property))
        .route("/properties/:property_id/events", get(controllers::list_events).post(controllers::create_event))
        .route("/properties/:property_id/events/", get(controllers::list_events).post(controllers::create_event))
        .route("/properties/:property_id/events/:event_id", get(controllers::get_event).put(controllers::update_event).delete(controllers::delete_event))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}
