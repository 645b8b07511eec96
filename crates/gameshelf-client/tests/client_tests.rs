//! Integration tests for the client against a loopback backend

use actix_web::{App, HttpResponse, HttpServer, web};
use async_trait::async_trait;
use gameshelf_client::{
    FetchError, FileStorage, Game, GameStore, MemoryStorage, RemoteSearchApi, ResilientFetch,
    SearchApi,
};
use gameshelf_config::ClientConfig;
use serde::Deserialize;
use serde_json::json;
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::{Mutex, oneshot};

#[derive(Default)]
struct Calls {
    flaky: AtomicUsize,
    broken: AtomicUsize,
    missing: AtomicUsize,
}

fn count(counter: &AtomicUsize) -> usize {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

async fn ok() -> HttpResponse {
    HttpResponse::Ok().json(json!([{"id": 1}, {"id": 2}]))
}

async fn flaky(calls: web::Data<Calls>) -> HttpResponse {
    if count(&calls.flaky) <= 2 {
        HttpResponse::ServiceUnavailable().finish()
    } else {
        HttpResponse::Ok().json(json!([{"id": 3}]))
    }
}

async fn broken(calls: web::Data<Calls>) -> HttpResponse {
    count(&calls.broken);
    HttpResponse::InternalServerError().finish()
}

async fn missing(calls: web::Data<Calls>) -> HttpResponse {
    count(&calls.missing);
    HttpResponse::NotFound().finish()
}

async fn throttled() -> HttpResponse {
    HttpResponse::TooManyRequests().finish()
}

async fn object() -> HttpResponse {
    HttpResponse::Ok().json(json!({"results": [{"id": 1}]}))
}

async fn garbage() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body("<html>not json</html>")
}

async fn slow() -> HttpResponse {
    actix_web::rt::time::sleep(Duration::from_secs(2)).await;
    HttpResponse::Ok().json(json!([]))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
    platform: Option<String>,
}

async fn search(query: web::Query<SearchQuery>) -> HttpResponse {
    let name = match &query.platform {
        Some(platform) => format!("{} on {}", query.q, platform),
        None => query.q.clone(),
    };
    HttpResponse::Ok().json(json!([{
        "id": 1,
        "name": name,
        "slug": "super-mario-bros",
        "releaseDate": "1985-09-13T00:00:00.000Z",
        "coverUrl": "https://images.igdb.com/igdb/image/upload/t_cover_big/mario.jpg",
        "platforms": ["Nintendo Entertainment System", "Famicom"],
        "genres": ["Platform"]
    }]))
}

fn start_server() -> (String, web::Data<Calls>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = web::Data::new(Calls::default());
    let app_calls = calls.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_calls.clone())
            .route("/ok", web::get().to(ok))
            .route("/flaky", web::get().to(flaky))
            .route("/broken", web::get().to(broken))
            .route("/missing", web::get().to(missing))
            .route("/throttled", web::get().to(throttled))
            .route("/object", web::get().to(object))
            .route("/garbage", web::get().to(garbage))
            .route("/slow", web::get().to(slow))
            .route("/api/games/search", web::get().to(search))
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .disable_signals()
    .run();
    actix_web::rt::spawn(server);

    (format!("http://{}", addr), calls)
}

fn config(base: &str) -> ClientConfig {
    ClientConfig {
        api_url: format!("{}/api/games", base),
        request_timeout_ms: 300,
        max_retries: 3,
        backoff_unit_ms: 10,
        ..ClientConfig::default()
    }
}

#[actix_web::test]
async fn test_fetch_returns_array() {
    let (base, _) = start_server();
    let fetch = ResilientFetch::new(&config(&base)).unwrap();

    let items = fetch.get(&format!("{}/ok", base)).await.unwrap();
    assert_eq!(items, vec![json!({"id": 1}), json!({"id": 2})]);
}

#[actix_web::test]
async fn test_fetch_retries_server_errors() {
    let (base, calls) = start_server();
    let fetch = ResilientFetch::new(&config(&base)).unwrap();

    let items = fetch.get(&format!("{}/flaky", base)).await.unwrap();
    assert_eq!(items, vec![json!({"id": 3})]);
    assert_eq!(calls.flaky.load(Ordering::SeqCst), 3);
}

#[actix_web::test]
async fn test_fetch_gives_up_after_max_retries() {
    let (base, calls) = start_server();
    let fetch = ResilientFetch::new(&config(&base)).unwrap();

    let err = fetch.get(&format!("{}/broken", base)).await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::Api {
            status: 500,
            retryable: true
        }
    ));
    assert_eq!(calls.broken.load(Ordering::SeqCst), 4);
}

#[actix_web::test]
async fn test_fetch_does_not_retry_client_errors() {
    let (base, calls) = start_server();
    let fetch = ResilientFetch::new(&config(&base)).unwrap();

    let err = fetch.get(&format!("{}/missing", base)).await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::Api {
            status: 404,
            retryable: false
        }
    ));
    assert_eq!(calls.missing.load(Ordering::SeqCst), 1);

    let err = fetch.get(&format!("{}/throttled", base)).await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::Api {
            status: 429,
            retryable: false
        }
    ));
}

#[actix_web::test]
async fn test_fetch_non_array_payload() {
    let (base, _) = start_server();
    let fetch = ResilientFetch::new(&config(&base)).unwrap();

    assert!(fetch.get(&format!("{}/object", base)).await.unwrap().is_empty());

    let err = fetch.get(&format!("{}/garbage", base)).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[actix_web::test]
async fn test_fetch_timeout_is_distinct() {
    let (base, _) = start_server();
    let fetch = ResilientFetch::new(&config(&base)).unwrap();

    let err = fetch.get(&format!("{}/slow", base)).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_millis(300)));
}

#[actix_web::test]
async fn test_fetch_network_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let fetch = ResilientFetch::new(&ClientConfig::default()).unwrap();

    let err = fetch.get(&format!("http://{}/ok", addr)).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
    assert!(err.to_string().starts_with("Network error: "));
}

#[actix_web::test]
async fn test_remote_search() {
    let (base, _) = start_server();
    let api = RemoteSearchApi::new(&config(&base)).unwrap();

    let games = api.search("Super Mario", Some("NES")).await.unwrap();
    assert_eq!(games.len(), 1);

    let game = &games[0];
    assert_eq!(game.name, "Super Mario on NES");
    assert_eq!(game.release_date.as_deref(), Some("1985-09-13T00:00:00.000Z"));
    assert_eq!(game.genres, vec!["Platform"]);
    assert!(game.user_platform.is_none());
}

#[actix_web::test]
async fn test_store_round_trip_through_files() {
    let (base, _) = start_server();
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileStorage::new(temp_dir.path()));
    let api = Arc::new(RemoteSearchApi::new(&config(&base)).unwrap());

    let store = GameStore::new(api.clone(), storage.clone()).await.unwrap();
    let results = store.search_games("Mario", None).await;
    store.add_to_library(&results[0], "NES").await.unwrap();
    store.add_to_favorites(&results[0]).await.unwrap();

    assert!(temp_dir.path().join("game-store.json").exists());

    let reopened = GameStore::new(api, Arc::new(FileStorage::new(temp_dir.path())))
        .await
        .unwrap();
    let state = reopened.state();
    assert_eq!(state.user_library.len(), 1);
    assert_eq!(state.user_library[0].user_platform.as_deref(), Some("NES"));
    assert_eq!(state.favorites[0].name, "Mario");
    assert!(state.search_results.is_empty());
}

/// Search API that blocks until released
struct GatedApi {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    outcome: Result<Vec<Game>, String>,
}

impl GatedApi {
    fn new(outcome: Result<Vec<Game>, String>) -> (Self, oneshot::Sender<()>) {
        let (release, gate) = oneshot::channel();
        let api = Self {
            gate: Mutex::new(Some(gate)),
            outcome,
        };
        (api, release)
    }
}

#[async_trait]
impl SearchApi for GatedApi {
    async fn search(&self, _term: &str, _platform: Option<&str>) -> Result<Vec<Game>, FetchError> {
        let gate = self.gate.lock().await.take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.outcome.clone().map_err(FetchError::Network)
    }
}

#[tokio::test]
async fn test_is_searching_while_in_flight() {
    let games = vec![Game::new(1, "Super Mario Bros"), Game::new(2, "Super Mario Bros 3")];
    let (api, release) = GatedApi::new(Ok(games));
    let store = Arc::new(
        GameStore::new(Arc::new(api), Arc::new(MemoryStorage::new()))
            .await
            .unwrap(),
    );
    let mut rx = store.subscribe();

    let search = tokio::spawn({
        let store = store.clone();
        async move { store.search_games("Mario", None).await }
    });

    rx.wait_for(|state| state.is_searching).await.unwrap();
    assert!(store.state().search_results.is_empty());

    release.send(()).unwrap();
    let results = search.await.unwrap();

    assert_eq!(results.len(), 2);
    let state = store.state();
    assert!(!state.is_searching);
    assert_eq!(state.search_results, results);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_rejected_search_records_error() {
    let (api, release) = GatedApi::new(Err("offline".to_string()));
    let store = Arc::new(
        GameStore::new(Arc::new(api), Arc::new(MemoryStorage::new()))
            .await
            .unwrap(),
    );
    let mut rx = store.subscribe();

    let search = tokio::spawn({
        let store = store.clone();
        async move { store.search_games("Mario", None).await }
    });

    rx.wait_for(|state| state.is_searching).await.unwrap();
    release.send(()).unwrap();

    assert!(search.await.unwrap().is_empty());
    let state = store.state();
    assert!(!state.is_searching);
    assert!(state.search_results.is_empty());
    assert_eq!(state.error.as_deref(), Some("offline"));
}

#[tokio::test]
async fn test_corrupt_game_store_file_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    let config = ClientConfig {
        storage_dir: temp_dir.path().to_path_buf(),
        ..ClientConfig::default()
    };
    std::fs::write(temp_dir.path().join("game-store.json"), "{truncated").unwrap();

    let api = Arc::new(GatedApi::new(Ok(Vec::new())).0);
    let storage = Arc::new(FileStorage::from_config(&config));
    let store = GameStore::new(api, storage).await.unwrap();

    let state = store.state();
    assert!(state.user_library.is_empty());
    assert!(state.favorites.is_empty());

    store
        .add_to_library(&Game::new(1, "Super Mario Bros"), "NES")
        .await
        .unwrap();
    let saved = std::fs::read_to_string(temp_dir.path().join("game-store.json")).unwrap();
    assert!(saved.contains("Super Mario Bros"));
}
