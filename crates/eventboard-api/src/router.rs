//! Axum router construction.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with request tracing and, optionally, permissive CORS.

use axum::Router;
use axum::routing::get;
use eventboard_types::{Event, Location, Participant, User};
use serde::de::DeserializeOwned;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::resource::Resource;
use crate::state::AppState;
use crate::ws;

/// Register the collection and single-record routes for one record kind
/// under `/api/{E::PATH}`.
fn resource_routes<E>(router: Router<AppState>) -> Router<AppState>
where
    E: Resource,
    E::Patch: DeserializeOwned + Send,
{
    let base = format!("/api/{}", E::PATH);
    let item = format!("{base}/{{id}}");
    router
        .route(
            &base,
            get(handlers::list::<E>)
                .post(handlers::create::<E>)
                .delete(handlers::delete_all::<E>),
        )
        .route(
            &item,
            get(handlers::find::<E>)
                .patch(handlers::update::<E>)
                .delete(handlers::delete::<E>),
        )
}

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/{topic}` -- `WebSocket` change stream for one topic
/// - `/api/users`, `/api/locations`, `/api/events`, `/api/participants`
///   -- list, create, delete all
/// - `/api/{collection}/{id}` -- find, patch, delete
/// - relationship routes under `/api/events/{id}`, `/api/users/{id}`,
///   and `/api/participants/{id}`
///
/// With `allow_any_origin` set, CORS accepts requests from any origin.
pub fn build_router(state: AppState, allow_any_origin: bool) -> Router {
    let mut router = Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/{topic}", get(ws::ws_topic));

    // CRUD
    router = resource_routes::<User>(router);
    router = resource_routes::<Location>(router);
    router = resource_routes::<Event>(router);
    router = resource_routes::<Participant>(router);

    // Relationships
    router = router
        .route("/api/events/{id}/location", get(handlers::event_location))
        .route("/api/events/{id}/user", get(handlers::event_user))
        .route(
            "/api/events/{id}/participants",
            get(handlers::event_participants),
        )
        .route("/api/users/{id}/events", get(handlers::user_events))
        .route("/api/participants/{id}/event", get(handlers::participant_event))
        .route("/api/participants/{id}/user", get(handlers::participant_user));

    if allow_any_origin {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
