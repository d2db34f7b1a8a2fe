//! Tests for the in-memory profile cache

use super::*;
use chrono::Duration as ChronoDuration;

fn alice() -> UserProfile {
    UserProfile::new("u1", "Alice", Some("a@x.com".to_string()))
}

#[test]
fn test_set_then_get_before_expiry() {
    let cache = MemoryProfileCache::new();
    cache.set("AT1", alice(), Utc::now() + ChronoDuration::hours(1));

    assert_eq!(cache.get("AT1"), Some(alice()));
}

#[test]
fn test_get_unknown_key_is_none() {
    let cache = MemoryProfileCache::new();
    assert_eq!(cache.get("missing"), None);
}

#[test]
fn test_empty_key_is_never_stored() {
    let cache = MemoryProfileCache::new();
    cache.set("", alice(), Utc::now() + ChronoDuration::hours(1));

    assert!(cache.is_empty());
    assert_eq!(cache.get(""), None);
}

#[test]
fn test_get_after_expiry_behaves_like_absent() {
    let cache = MemoryProfileCache::new();
    let expires_at = Utc::now() + ChronoDuration::minutes(5);
    cache.set("AT1", alice(), expires_at);

    assert_eq!(cache.get_at("AT1", expires_at - ChronoDuration::seconds(1)), Some(alice()));
    assert_eq!(cache.get_at("AT1", expires_at), None);
    // lazy expiry removed the entry
    assert!(cache.is_empty());
}

#[test]
fn test_already_expired_entry_is_never_served() {
    let cache = MemoryProfileCache::new();
    cache.set("AT1", alice(), Utc::now() - ChronoDuration::seconds(1));

    assert_eq!(cache.get("AT1"), None);
}

#[test]
fn test_set_overwrites_existing_entry() {
    let cache = MemoryProfileCache::new();
    let later = Utc::now() + ChronoDuration::hours(1);
    cache.set("AT1", alice(), later);

    let bob = UserProfile::new("u2", "Bob", None);
    cache.set("AT1", bob.clone(), later);

    assert_eq!(cache.get("AT1"), Some(bob));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_overwrite_extends_expiry() {
    let cache = MemoryProfileCache::new();
    let now = Utc::now();
    cache.set("AT1", alice(), now - ChronoDuration::seconds(1));
    cache.set("AT1", alice(), now + ChronoDuration::hours(1));

    assert_eq!(cache.get_at("AT1", now), Some(alice()));
}

#[test]
fn test_purge_removes_only_expired_entries() {
    let cache = MemoryProfileCache::new();
    let now = Utc::now();
    cache.set("old", alice(), now - ChronoDuration::seconds(10));
    cache.set("fresh", alice(), now + ChronoDuration::hours(1));

    assert_eq!(cache.purge_at(now), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("fresh"), Some(alice()));
}

#[test]
fn test_clones_share_entries() {
    let cache = MemoryProfileCache::new();
    let other = cache.clone();
    cache.set("AT1", alice(), Utc::now() + ChronoDuration::hours(1));

    assert_eq!(other.get("AT1"), Some(alice()));
}

#[tokio::test]
async fn test_concurrent_set_and_get() {
    let cache = Arc::new(MemoryProfileCache::new());
    let expires_at = Utc::now() + ChronoDuration::hours(1);

    let mut handles = Vec::new();
    for i in 0..32 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("AT{}", i % 4);
            let profile = UserProfile::new(format!("u{}", i), format!("User {}", i), None);
            cache.set(&key, profile, expires_at);
            // must observe a complete profile written by some task
            let seen = cache.get(&key).expect("entry present");
            assert!(seen.subject.starts_with('u'));
            assert_eq!(seen.display_name, format!("User {}", &seen.subject[1..]));
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(cache.len(), 4);
}

#[tokio::test]
async fn test_sweeper_purges_in_background() {
    let cache = Arc::new(MemoryProfileCache::new());
    cache.set("old", alice(), Utc::now() - ChronoDuration::seconds(1));

    let handle = spawn_sweeper(cache.clone(), std::time::Duration::from_millis(20));
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    handle.abort();

    assert!(cache.is_empty());
}
