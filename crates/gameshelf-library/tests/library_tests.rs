//! Integration tests for the library service with an on-disk database

use async_trait::async_trait;
use gameshelf_catalog::{CatalogError, CatalogItem, CatalogSource};
use gameshelf_library::{AddEntryRequest, EntryStatus, LibraryDatabase, LibraryService};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// Catalog whose game names change on every lookup
struct RenamingCatalog {
    lookups: AtomicUsize,
}

#[async_trait]
impl CatalogSource for RenamingCatalog {
    async fn search(
        &self,
        _term: &str,
        _platform: Option<&str>,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        Ok(Vec::new())
    }

    async fn fetch_by_id(&self, id: i64) -> Option<CatalogItem> {
        let n = self.lookups.fetch_add(1, Ordering::SeqCst);
        let mut game = CatalogItem::new(id, format!("Game {} rev {}", id, n));
        game.platforms = vec!["Super Famicom".to_string(), "SNES".to_string()];
        Some(game)
    }
}

struct TestEnvironment {
    #[allow(dead_code)]
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl TestEnvironment {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("library.db");
        Self { temp_dir, db_path }
    }

    fn service(&self) -> LibraryService {
        let db = LibraryDatabase::open(&self.db_path).expect("Failed to open database");
        let catalog = RenamingCatalog {
            lookups: AtomicUsize::new(0),
        };
        LibraryService::new(Arc::new(catalog), db)
    }
}

#[tokio::test]
async fn test_library_survives_reopen() {
    let env = TestEnvironment::new();

    {
        let service = env.service();
        service
            .add_to_library("alice", AddEntryRequest::new(19).with_platform("Super Nintendo"))
            .await
            .unwrap();
        service
            .add_to_library(
                "alice",
                AddEntryRequest::new(20).with_status(EntryStatus::Completed),
            )
            .await
            .unwrap();
    }

    let service = env.service();
    let library = service.list_library("alice").await.unwrap();

    assert_eq!(library.len(), 2);
    assert_eq!(library[0].game_id, 20);
    assert_eq!(library[0].status, EntryStatus::Completed);
    assert_eq!(library[1].platform.as_deref(), Some("Super Nintendo"));
    assert_eq!(library[1].game.platforms, vec!["Super Famicom", "SNES"]);
}

#[tokio::test]
async fn test_readding_refreshes_cached_game() {
    let env = TestEnvironment::new();
    let service = env.service();

    service
        .add_to_library("alice", AddEntryRequest::new(7))
        .await
        .unwrap();
    let second = service
        .add_to_library("bob", AddEntryRequest::new(7))
        .await
        .unwrap();

    assert_eq!(second.game.name, "Game 7 rev 1");

    // Both entries now see the overwritten cache row
    let alice = service.list_library("alice").await.unwrap();
    assert_eq!(alice[0].game.name, "Game 7 rev 1");

    let db = LibraryDatabase::open(&env.db_path).unwrap();
    assert_eq!(db.game_count().unwrap(), 1);
    assert_eq!(db.entry_count("alice").unwrap(), 1);
    assert_eq!(db.entry_count("bob").unwrap(), 1);
}

#[tokio::test]
async fn test_server_side_entries_are_not_deduplicated() {
    let env = TestEnvironment::new();
    let service = env.service();

    for _ in 0..2 {
        service
            .add_to_library("alice", AddEntryRequest::new(7).with_platform("NES"))
            .await
            .unwrap();
    }

    assert_eq!(service.list_library("alice").await.unwrap().len(), 2);
}
