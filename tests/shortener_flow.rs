mod common;

use common::{InMemoryRepository, tiered};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url_shortener::application::services::{ShortenError, ShortenerService};
use url_shortener::domain::StorageError;
use url_shortener::domain::repositories::UrlStorage;
use url_shortener::infrastructure::cache::{ExpiringCache, spawn_sweeper};
use url_shortener::utils::code_generator::{CODE_LEN, fingerprint, slot_suffix};

const URL: &str = "https://example.com";

fn code_for(url: &str, slot: usize) -> String {
    format!("{}{}", fingerprint(url), slot_suffix(slot).unwrap())
}

#[tokio::test]
async fn test_example_com_scenario() {
    let repo = InMemoryRepository::new();
    let (storage, _cache) = tiered(repo.clone());
    let service = ShortenerService::new(storage);

    let code = service.shorten(URL).await.unwrap();

    assert_eq!(code.len(), CODE_LEN);
    assert_eq!(&code[..8], fingerprint(URL));
    assert_eq!(&code[8..], "00");
    assert_eq!(code, "G60jKicb00");
    assert_eq!(service.expand(&code).await.unwrap(), URL);
    assert_eq!(repo.row(&code).as_deref(), Some(URL));
}

#[tokio::test]
async fn test_shorten_is_idempotent_with_single_durable_insert() {
    let repo = InMemoryRepository::new();
    let (storage, _cache) = tiered(repo.clone());
    let service = ShortenerService::new(storage);

    let first = service.shorten(URL).await.unwrap();
    let second = service.shorten(URL).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(repo.inserts(), 1);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_round_trip_for_many_urls() {
    let repo = InMemoryRepository::new();
    let (storage, _cache) = tiered(repo.clone());
    let service = ShortenerService::new(storage);

    for i in 0..50 {
        let url = format!("https://example.com/page/{i}?q=ü");
        let code = service.shorten(&url).await.unwrap();
        assert_eq!(service.expand(&code).await.unwrap(), url);
    }

    assert_eq!(repo.len(), 50);
}

#[tokio::test]
async fn test_collision_takes_next_slot_deterministically() {
    let repo = InMemoryRepository::new();
    repo.seed(&code_for(URL, 0), "https://collision.example");

    let (storage, _cache) = tiered(repo.clone());
    let service = ShortenerService::new(storage);

    let code = service.shorten(URL).await.unwrap();
    assert_eq!(code, code_for(URL, 1));

    let again = service.shorten(URL).await.unwrap();
    assert_eq!(again, code);
    assert_eq!(repo.inserts(), 1);

    assert_eq!(
        service.expand(&code_for(URL, 0)).await.unwrap(),
        "https://collision.example"
    );
    assert_eq!(service.expand(&code).await.unwrap(), URL);
}

#[tokio::test]
async fn test_cold_cache_reads_durable_once() {
    let repo = InMemoryRepository::new();
    let code = {
        let (storage, _cache) = tiered(repo.clone());
        ShortenerService::new(storage).shorten(URL).await.unwrap()
    };

    // Fresh cache over the same durable rows, as after a restart.
    let (storage, cache) = tiered(repo.clone());
    let service = ShortenerService::new(storage);
    let gets_before = repo.gets();

    assert_eq!(service.expand(&code).await.unwrap(), URL);
    assert_eq!(repo.gets(), gets_before + 1);

    assert_eq!(service.expand(&code).await.unwrap(), URL);
    assert_eq!(repo.gets(), gets_before + 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_manual_insert_on_taken_key_conflicts() {
    let repo = InMemoryRepository::new();
    let (storage, _cache) = tiered(repo.clone());
    let service = ShortenerService::new(storage.clone());

    let code = service.shorten(URL).await.unwrap();

    let result = storage.insert(&code, "https://other.example").await;

    assert!(matches!(result, Err(StorageError::AlreadyExists)));
    assert_eq!(repo.row(&code).as_deref(), Some(URL));
    assert_eq!(service.expand(&code).await.unwrap(), URL);
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let (storage, cache) = tiered(InMemoryRepository::new());
    let service = ShortenerService::new(storage);

    let result = service.expand("zzzzzzzz00").await;

    assert!(matches!(result, Err(ShortenError::NotFound)));
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_durable_outage_surfaces_as_storage_error() {
    let repo = InMemoryRepository::new();
    let (storage, _cache) = tiered(repo.clone());
    let service = ShortenerService::new(storage);
    repo.go_offline();

    let result = service.shorten(URL).await;

    assert!(matches!(
        result,
        Err(ShortenError::Storage(StorageError::Backend(_)))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_idle_entries_expire_and_reload_from_durable() {
    let repo = InMemoryRepository::new();
    let (storage, cache) = tiered(repo.clone());
    let service = ShortenerService::new(storage);

    let code = service.shorten(URL).await.unwrap();
    assert_eq!(cache.len(), 1);

    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(
        cache.clone(),
        Duration::from_secs(60),
        Duration::from_secs(60),
        shutdown.clone(),
    );

    // Tick at 60s sees exactly 60s idle, which is not past the threshold.
    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(cache.len(), 1);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(cache.is_empty());

    let gets_before = repo.gets();
    assert_eq!(service.expand(&code).await.unwrap(), URL);
    assert_eq!(repo.gets(), gets_before + 1);
    assert_eq!(cache.len(), 1);

    shutdown.cancel();
    sweeper.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_recently_read_entry_survives_sweep() {
    let repo = InMemoryRepository::new();
    let (storage, cache) = tiered(repo.clone());
    let service = ShortenerService::new(storage);

    let stale = service.shorten("https://stale.example").await.unwrap();
    let fresh = service.shorten("https://fresh.example").await.unwrap();

    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(
        cache.clone(),
        Duration::from_secs(60),
        Duration::from_secs(60),
        shutdown.clone(),
    );

    tokio::time::sleep(Duration::from_secs(100)).await;
    service.expand(&fresh).await.unwrap();

    tokio::time::sleep(Duration::from_secs(21)).await;

    assert!(cache.peek(&stale).is_none());
    assert!(cache.peek(&fresh).is_some());

    shutdown.cancel();
    sweeper.await.unwrap();
}

#[tokio::test]
async fn test_memory_mode_round_trip() {
    let cache = Arc::new(ExpiringCache::new());
    let service = ShortenerService::new(cache.clone());

    let code = service.shorten(URL).await.unwrap();

    assert_eq!(service.expand(&code).await.unwrap(), URL);
    assert_eq!(service.shorten(URL).await.unwrap(), code);
    assert_eq!(service.storage_kind(), "memory");
    assert_eq!(cache.len(), 1);
}
