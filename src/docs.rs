use super::{controllers, models};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Property Event Logging",
        description = "A simple database API server for logging events relating to properties.",
    ),
    paths(
        controllers::health,
        // Properties
        controllers::create_property,
        controllers::list_properties,
        controllers::get_property,
        controllers::update_property,
        controllers::delete_property,
        // Events
        controllers::list_events,
        controllers::create_event,
        controllers::get_event,
        controllers::update_event,
        controllers::delete_event,
    ),
    components(schemas(
        models::Property,
        models::Event,
        models::PropertyForm,
        models::EventForm,
        models::Message,
    )),
    tags(
        (name = "properties", description = "Operations relating to Properties."),
        (name = "events", description = "Operations relating to Events (which are tied to Properties)."),
    )
)]
pub struct ApiDoc;
