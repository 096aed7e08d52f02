//! End-to-end reference-data flow: a document-type catalog and its
//! per-type subtypes, served through the kernel's caches the way the
//! data hooks consume them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use portaria::{Portaria, PortariaConfig};
use portaria_cache::{CacheError, FnFetch, FnFetchKeyed};
use portaria_store::MemoryStorage;

#[derive(Debug, Clone, PartialEq, Eq)]
struct DocumentType {
    id: i64,
    name: String,
}

fn kernel() -> Portaria<MemoryStorage> {
    Portaria::new(MemoryStorage::new(), PortariaConfig::default())
}

#[tokio::test]
async fn document_type_catalog_is_fetched_once() {
    let portaria = kernel();
    let cache = portaria.resource_cache::<Vec<DocumentType>>();
    let calls = Arc::new(AtomicUsize::new(0));

    let c = Arc::clone(&calls);
    let fetcher = FnFetch::new(move || {
        c.fetch_add(1, Ordering::SeqCst);
        std::future::ready(Ok(vec![
            DocumentType {
                id: 1,
                name: "Decreto".into(),
            },
            DocumentType {
                id: 2,
                name: "Portaria".into(),
            },
        ]))
    });

    let first = cache.get(&fetcher).await.unwrap();
    let second = cache.get(&fetcher).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn scrubbing_the_type_selector_fetches_only_the_last_subtype_list() {
    let portaria = kernel();
    let cache = Arc::new(portaria.keyed_cache::<i64, Vec<String>>());
    let fetched = Arc::new(std::sync::Mutex::new(Vec::new()));

    let f = Arc::clone(&fetched);
    let fetcher = Arc::new(FnFetchKeyed::new(move |type_id: i64| {
        f.lock().unwrap().push(type_id);
        std::future::ready(Ok(vec![format!("subtipo-{type_id}")]))
    }));

    // The user scrubs through types 1..4; only the final selection
    // should reach the network.
    let mut handles = Vec::new();
    for type_id in [1i64, 2, 3, 4] {
        let cache = Arc::clone(&cache);
        let fetcher = Arc::clone(&fetcher);
        handles.push(tokio::spawn(async move {
            cache.get_debounced(&type_id, &*fetcher).await
        }));
        tokio::task::yield_now().await;
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_eq!(results[0], Err(CacheError::Superseded));
    assert_eq!(results[1], Err(CacheError::Superseded));
    assert_eq!(results[2], Err(CacheError::Superseded));
    assert_eq!(results[3], Ok(vec!["subtipo-4".to_string()]));
    assert_eq!(*fetched.lock().unwrap(), vec![4]);
}

#[tokio::test]
async fn failed_subtype_fetch_is_retried_fresh() {
    let portaria = kernel();
    let cache = portaria.keyed_cache::<i64, Vec<String>>();
    let calls = Arc::new(AtomicUsize::new(0));

    let c = Arc::clone(&calls);
    let fetcher = FnFetchKeyed::new(move |type_id: i64| {
        let attempt = c.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt == 0 {
                Err(portaria_cache::FetchError::new("HTTP 503"))
            } else {
                Ok(vec![format!("subtipo-{type_id}")])
            }
        }
    });

    assert!(cache.get(&5, &fetcher).await.is_err());
    assert_eq!(
        cache.get(&5, &fetcher).await.unwrap(),
        vec!["subtipo-5".to_string()]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
