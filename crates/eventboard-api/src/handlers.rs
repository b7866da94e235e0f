//! REST endpoint handlers.
//!
//! Reads take the board's read lock; writes go through the mutation
//! engine, which publishes a change for every create, update, and delete.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/{collection}` | List records in insertion order |
//! | `POST` | `/api/{collection}` | Create a record |
//! | `DELETE` | `/api/{collection}` | Delete every record in the collection |
//! | `GET` | `/api/{collection}/{id}` | Single record |
//! | `PATCH` | `/api/{collection}/{id}` | Merge a partial update |
//! | `DELETE` | `/api/{collection}/{id}` | Delete one record |
//! | `GET` | `/api/events/{id}/location` | The event's location, or `null` |
//! | `GET` | `/api/events/{id}/user` | The event's organizer, or `null` |
//! | `GET` | `/api/events/{id}/participants` | The event's participant records |
//! | `GET` | `/api/users/{id}/events` | Events the user organizes |
//! | `GET` | `/api/participants/{id}/event` | The participant's event, or `null` |
//! | `GET` | `/api/participants/{id}/user` | The participant's user, or `null` |

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use eventboard_core::Board;
use eventboard_store::EntityStore;
use eventboard_types::{Entity, Event, EventId, Location, Participant, ParticipantId, User, UserId};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::resource::Resource;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing record counts and API links.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let counts = state.board.counts().await;
    let users = counts.users;
    let locations = counts.locations;
    let events = counts.events;
    let participants = counts.participants;

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Eventboard</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        code {{ color: #7ee787; }}
    </style>
</head>
<body>
    <h1>Eventboard</h1>

    <div>
        <div class="metric"><div class="label">Users</div><div class="value">{users}</div></div>
        <div class="metric"><div class="label">Locations</div><div class="value">{locations}</div></div>
        <div class="metric"><div class="label">Events</div><div class="value">{events}</div></div>
        <div class="metric"><div class="label">Participants</div><div class="value">{participants}</div></div>
    </div>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/users">/api/users</a> -- Users</li>
        <li><a href="/api/locations">/api/locations</a> -- Locations</li>
        <li><a href="/api/events">/api/events</a> -- Events</li>
        <li><a href="/api/participants">/api/participants</a> -- Participants</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws/{{topic}}</code> -- e.g. <code>eventCreated</code>, <code>userDeleted</code></li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// Generic collection handlers
// ---------------------------------------------------------------------------

fn not_found<E: Entity>(id: &E::Id) -> ApiError {
    ApiError::NotFound(format!("{} not found: {id}", E::KIND))
}

fn lookup<E: Resource>(store: &EntityStore, id: &E::Id) -> Result<E, ApiError> {
    store
        .collection::<E>()
        .find_by_id(id)
        .cloned()
        .ok_or_else(|| not_found::<E>(id))
}

/// List every record of a collection in insertion order.
pub async fn list<E: Resource>(State(state): State<AppState>) -> Json<Vec<E>> {
    let store = state.board.read().await;
    Json(store.collection::<E>().list().to_vec())
}

/// Return one record by identifier.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if no record has the identifier.
pub async fn find<E: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<E>, ApiError> {
    let store = state.board.read().await;
    lookup::<E>(&store, &E::Id::from(id)).map(Json)
}

/// Create a record and return it with `201 Created`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the store rejects the insert.
pub async fn create<E: Resource>(
    State(state): State<AppState>,
    Json(input): Json<E::Input>,
) -> Result<impl IntoResponse, ApiError> {
    let mut engine = state.board.mutations().await;
    let record = E::create(&mut engine, input)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Merge a partial update into a record and return the stored result.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if no record has the identifier.
pub async fn update<E>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<E::Patch>,
) -> Result<Json<E>, ApiError>
where
    E: Resource,
    E::Patch: DeserializeOwned + Send,
{
    let mut engine = state.board.mutations().await;
    let record = E::update(&mut engine, E::Id::from(id), patch)?;
    Ok(Json(record))
}

/// Delete one record and return it.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if no record has the identifier.
pub async fn delete<E: Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<E>, ApiError> {
    let mut engine = state.board.mutations().await;
    let record = E::delete(&mut engine, &E::Id::from(id))?;
    Ok(Json(record))
}

/// Delete every record of a collection.
///
/// Responds with `{ "deleted": n }`.
pub async fn delete_all<E: Resource>(State(state): State<AppState>) -> impl IntoResponse {
    let mut engine = state.board.mutations().await;
    let deleted = E::delete_all(&mut engine);
    Json(serde_json::json!({ "deleted": deleted }))
}

// ---------------------------------------------------------------------------
// Relationship handlers
// ---------------------------------------------------------------------------

async fn with_event<T>(
    board: &Board,
    id: String,
    resolve: impl FnOnce(&EntityStore, &Event) -> T,
) -> Result<T, ApiError> {
    let store = board.read().await;
    let event = lookup::<Event>(&store, &EventId::from(id))?;
    Ok(resolve(&store, &event))
}

async fn with_participant<T>(
    board: &Board,
    id: String,
    resolve: impl FnOnce(&EntityStore, &Participant) -> T,
) -> Result<T, ApiError> {
    let store = board.read().await;
    let participant = lookup::<Participant>(&store, &ParticipantId::from(id))?;
    Ok(resolve(&store, &participant))
}

/// The location an event takes place at, or `null` if unset or dangling.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the event does not exist.
pub async fn event_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Location>>, ApiError> {
    with_event(&state.board, id, |store, event| {
        store.resolver().event_location(event).cloned()
    })
    .await
    .map(Json)
}

/// The user organizing an event, or `null` if unset or dangling.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the event does not exist.
pub async fn event_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<User>>, ApiError> {
    with_event(&state.board, id, |store, event| {
        store.resolver().event_user(event).cloned()
    })
    .await
    .map(Json)
}

/// Every participant record for an event.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the event does not exist.
pub async fn event_participants(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    with_event(&state.board, id, |store, event| {
        store
            .resolver()
            .event_participants(event)
            .into_iter()
            .cloned()
            .collect()
    })
    .await
    .map(Json)
}

/// Every event a user organizes.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the user does not exist.
pub async fn user_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let store = state.board.read().await;
    let user = lookup::<User>(&store, &UserId::from(id))?;
    let events = store
        .resolver()
        .user_events(&user)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(events))
}

/// The event a participant record refers to, or `null` if dangling.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the participant does not exist.
pub async fn participant_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Event>>, ApiError> {
    with_participant(&state.board, id, |store, participant| {
        store.resolver().participant_event(participant).cloned()
    })
    .await
    .map(Json)
}

/// The user a participant record refers to, or `null` if dangling.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the participant does not exist.
pub async fn participant_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<User>>, ApiError> {
    with_participant(&state.board, id, |store, participant| {
        store.resolver().participant_user(participant).cloned()
    })
    .await
    .map(Json)
}
