//! Game API handlers

use crate::error::ApiError;
use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use gameshelf_library::{AddEntryRequest, LibraryEntry, LibraryError, LibraryService};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Header carrying the caller's user id
pub const USER_ID_HEADER: &str = "user-id";

/// Query string of the search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LibraryResponse {
    pub library: Vec<LibraryEntry>,
}

/// Register the game routes under `/api/games`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/games")
            .service(search_games)
            .service(get_library)
            .service(add_to_library)
            .service(remove_from_library),
    );
}

fn user_id(req: &HttpRequest) -> Result<String, ApiError> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ApiError::MissingUser)
}

#[get("/search")]
async fn search_games(
    library: web::Data<LibraryService>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let term = params
        .q
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .ok_or(ApiError::MissingSearchTerm)?;
    let platform = params.platform.as_deref().filter(|p| !p.is_empty());

    let games = library
        .search(term, platform)
        .await
        .map_err(|e| ApiError::internal("Search games", "Failed to search games", &e))?;

    Ok(HttpResponse::Ok().json(games))
}

#[get("/library")]
async fn get_library(
    req: HttpRequest,
    library: web::Data<LibraryService>,
) -> Result<HttpResponse, ApiError> {
    let user = user_id(&req)?;

    let entries = library
        .list_library(&user)
        .await
        .map_err(|e| ApiError::internal("Get library", "Failed to get user library", &e))?;

    Ok(HttpResponse::Ok().json(LibraryResponse { library: entries }))
}

#[post("/library")]
async fn add_to_library(
    req: HttpRequest,
    library: web::Data<LibraryService>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    // The caller is checked before the body is looked at
    let user = user_id(&req)?;
    let request: AddEntryRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejected add request from {}: {}", user, e);
        ApiError::InvalidBody
    })?;

    let entry = library
        .add_to_library(&user, request)
        .await
        .map_err(|e| match e {
            LibraryError::GameNotFound(_) => ApiError::GameNotFound,
            other => ApiError::internal("Add game", "Failed to add game to library", &other),
        })?;

    Ok(HttpResponse::Created().json(entry))
}

#[delete("/library/{entry_id}")]
async fn remove_from_library(
    req: HttpRequest,
    library: web::Data<LibraryService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = user_id(&req)?;
    let entry_id = path.into_inner();

    library
        .remove_from_library(&user, &entry_id)
        .await
        .map_err(|e| {
            ApiError::internal("Remove game", "Failed to remove game from library", &e)
        })?;

    Ok(HttpResponse::NoContent().finish())
}
