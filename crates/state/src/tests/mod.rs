// Path: crates/state/src/tests/mod.rs

use crate::{CommittedStore, PendingLayer, ReadThroughCache};
use ante_api::state::{StateAccess, StateOverlay};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn cache_loads_once_then_hits() {
    let cache = ReadThroughCache::new(8);
    let loads = AtomicUsize::new(0);
    let load = |_: &[u8]| -> Result<Option<Vec<u8>>, ()> {
        loads.fetch_add(1, Ordering::SeqCst);
        Ok(Some(b"v".to_vec()))
    };

    assert_eq!(cache.get_or_load(b"k", load).unwrap(), Some(b"v".to_vec()));
    assert_eq!(cache.get_or_load(b"k", load).unwrap(), Some(b"v".to_vec()));
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
}

#[test]
fn cache_remembers_absent_keys_and_evicts_lru() {
    let cache = ReadThroughCache::new(2);
    cache.get_or_load(b"a", |_| Ok::<_, ()>(None)).unwrap();
    cache.get_or_load(b"b", |_| Ok::<_, ()>(Some(vec![1]))).unwrap();
    // Promote "a" so that "b" is the eviction candidate.
    cache.get_or_load(b"a", |_| Err(())).unwrap();
    cache.get_or_load(b"c", |_| Ok::<_, ()>(Some(vec![3]))).unwrap();
    assert_eq!(cache.len(), 2);
    assert!(cache.get_or_load(b"b", |_| Err(())).is_err());
}

#[test]
fn cache_load_errors_are_not_cached() {
    let cache = ReadThroughCache::new(4);
    assert!(cache.get_or_load(b"k", |_| Err::<Option<Vec<u8>>, _>("down")).is_err());
    assert!(cache.is_empty());
}

#[test]
fn zero_capacity_cache_still_works() {
    let cache = ReadThroughCache::new(0);
    assert_eq!(cache.get_or_load(b"k", |_| Ok::<_, ()>(Some(vec![7]))).unwrap(), Some(vec![7]));
}

#[test]
fn concurrent_readers_share_the_cache() {
    let mut store = CommittedStore::in_memory(64);
    for i in 0u8..32 {
        store.insert(&[i], &[i, i]).unwrap();
    }
    let store = &store;
    (0..1_000usize).into_par_iter().for_each(|n| {
        let key = (n % 32) as u8;
        assert_eq!(store.get(&[key]).unwrap(), Some(vec![key, key]));
    });
}

#[test]
fn committed_store_reflects_commits_through_cache() {
    let mut store = CommittedStore::in_memory(16);
    store.insert(b"acct", b"1").unwrap();
    assert_eq!(store.get(b"acct").unwrap(), Some(b"1".to_vec()));

    let changes = {
        let mut overlay = StateOverlay::new(&store);
        overlay.insert(b"acct", b"2").unwrap();
        overlay.insert(b"new", b"x").unwrap();
        overlay.into_ordered_batch()
    };
    assert_eq!(store.commit(changes).unwrap(), 1);
    assert_eq!(store.get(b"acct").unwrap(), Some(b"2".to_vec()));

    store.commit((vec![], vec![b"acct".to_vec()])).unwrap();
    assert_eq!(store.get(b"acct").unwrap(), None);
    assert_eq!(store.version(), 2);
}

#[test]
fn pending_layer_shadows_the_store() {
    let mut store = CommittedStore::in_memory(16);
    store.insert(b"p::a", b"1").unwrap();
    store.insert(b"p::b", b"2").unwrap();

    let mut layer = PendingLayer::new();
    layer.absorb((vec![(b"p::c".to_vec(), b"3".to_vec())], vec![b"p::a".to_vec()]));

    {
        let view = layer.view(&store);
        assert_eq!(view.get(b"p::a").unwrap(), None);
        assert_eq!(view.get(b"p::b").unwrap(), Some(b"2".to_vec()));
        let keys: Vec<_> = view.prefix_scan(b"p::").unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"p::b".to_vec(), b"p::c".to_vec()]);
    }

    let changes = layer.take();
    assert!(layer.is_empty());
    store.commit(changes).unwrap();
    assert_eq!(store.get(b"p::a").unwrap(), None);
    assert_eq!(store.get(b"p::c").unwrap(), Some(b"3".to_vec()));
}

#[test]
fn layered_view_is_read_only() {
    let store = CommittedStore::in_memory(4);
    let layer = PendingLayer::new();
    let mut view = layer.view(&store);
    assert!(view.insert(b"k", b"v").is_err());
}
