use std::time::{Duration, Instant};

use pokedex_lib::config::DETAIL_STALE_TIME;
use pokedex_lib::{
    CacheKey, CachedClient, ConnectivityMonitor, PokedexError, QueryCache, QueryState, RetryPolicy,
    ViewMode,
};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("../pokeapi/tests/fixtures/{}", name)).unwrap()
}

fn fast_retries() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay_ms: 1,
        max_delay_ms: 5,
    }
}

async fn mount_listing(server: &MockServer, delay: Duration, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(fixture("pokemon_list.json"))
                .set_delay(delay),
        )
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_details(server: &MockServer) {
    for (id, file) in [(1, "pokemon_1.json"), (2, "pokemon_2.json"), (25, "pokemon_25.json")] {
        Mock::given(method("GET"))
            .and(path(format!("/pokemon/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixture(file)))
            .mount(server)
            .await;
    }
}

fn client(server: &MockServer) -> CachedClient {
    CachedClient::with_base_url(&server.uri(), QueryCache::new())
        .unwrap()
        .with_retry_policy(fast_retries())
}

#[tokio::test]
async fn fresh_cache_hit_skips_network() {
    let server = MockServer::start().await;
    mount_listing(&server, Duration::ZERO, 1).await;
    mount_details(&server).await;
    let client = client(&server);

    let first = client.get_list(1, ViewMode::Pagination).await.unwrap();
    let second = client.get_list(1, ViewMode::Pagination).await.unwrap();

    assert_eq!(first, second);
    let key = CacheKey::List {
        page: 1,
        mode: ViewMode::Pagination,
    };
    let snapshot = client.query_state(&key).unwrap();
    assert_eq!(snapshot.state, QueryState::Success);
    assert!(snapshot.has_value);
    // One listing plus three details, fetched once.
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn view_modes_are_cached_separately() {
    let server = MockServer::start().await;
    mount_listing(&server, Duration::ZERO, 2).await;
    mount_details(&server).await;
    let client = client(&server);

    client.get_list(1, ViewMode::Pagination).await.unwrap();
    client.get_list(1, ViewMode::InfiniteScroll).await.unwrap();
}

#[tokio::test]
async fn concurrent_identical_requests_share_one_fetch() {
    let server = MockServer::start().await;
    mount_listing(&server, Duration::from_millis(200), 1).await;
    mount_details(&server).await;
    let client = client(&server);

    let (a, b) = tokio::join!(
        client.get_list(1, ViewMode::InfiniteScroll),
        client.get_list(1, ViewMode::InfiniteScroll)
    );

    assert_eq!(a.unwrap().items.len(), 3);
    assert_eq!(b.unwrap().items.len(), 3);
}

#[tokio::test]
async fn concurrent_failing_requests_share_one_retry_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(50)))
        .expect(4)
        .mount(&server)
        .await;
    let client = client(&server);

    let (a, b) = tokio::join!(
        client.get_list(1, ViewMode::Pagination),
        client.get_list(1, ViewMode::Pagination)
    );

    assert!(matches!(a, Err(PokedexError::Upstream { status: 500, .. })));
    assert!(matches!(b, Err(PokedexError::Upstream { status: 500, .. })));
}

#[tokio::test]
async fn upstream_failure_is_retried_three_times() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;
    let client = client(&server);

    let err = client.get_list(1, ViewMode::Pagination).await.unwrap_err();
    assert!(matches!(err, PokedexError::Upstream { status: 500, .. }));

    let key = CacheKey::List {
        page: 1,
        mode: ViewMode::Pagination,
    };
    let snapshot = client.query_state(&key).unwrap();
    assert!(matches!(snapshot.state, QueryState::Error(_)));
    assert_eq!(snapshot.error_count, 1);
    assert!(!snapshot.has_value);
}

#[tokio::test]
async fn malformed_response_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"unexpected": true}"#))
        .expect(1)
        .mount(&server)
        .await;
    let client = client(&server);

    let err = client.get_list(1, ViewMode::Pagination).await.unwrap_err();
    assert!(matches!(err, PokedexError::Validation(_)));
}

#[tokio::test]
async fn later_infinite_scroll_page_fails_fast_on_network_error() {
    // Nothing listens on the discard port, so the connection is refused.
    let client = CachedClient::with_base_url("http://127.0.0.1:9", QueryCache::new()).unwrap();

    let started = Instant::now();
    let err = client.get_list(2, ViewMode::InfiniteScroll).await.unwrap_err();

    assert!(matches!(err, PokedexError::Network(_)));
    // The default policy would have slept a full second before retrying.
    assert!(started.elapsed() < Duration::from_millis(900));
}

#[tokio::test]
async fn later_infinite_scroll_page_fails_fast_while_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;
    let client = client(&server).with_connectivity(ConnectivityMonitor::new(false));

    let err = client.get_list(2, ViewMode::InfiniteScroll).await.unwrap_err();
    assert!(matches!(err, PokedexError::Upstream { status: 502, .. }));
}

#[tokio::test]
async fn pagination_mode_retries_later_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .respond_with(ResponseTemplate::new(502))
        .expect(4)
        .mount(&server)
        .await;
    let client = client(&server);

    client.get_list(2, ViewMode::Pagination).await.unwrap_err();
}

#[tokio::test]
async fn failure_does_not_poison_the_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/25"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pokemon/25"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("pokemon_25.json")))
        .mount(&server)
        .await;
    let client = client(&server).with_retry_policy(RetryPolicy {
        max_retries: 0,
        ..fast_retries()
    });

    assert!(client.get_detail(25).await.is_err());
    let detail = client.get_detail(25).await.unwrap();
    assert_eq!(detail.name, "pikachu");

    let snapshot = client.query_state(&CacheKey::Detail { id: 25 }).unwrap();
    assert_eq!(snapshot.state, QueryState::Success);
    assert_eq!(snapshot.error_count, 0);
}

#[tokio::test]
async fn detail_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/pokemon/25$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("pokemon_25.json")))
        .expect(1)
        .mount(&server)
        .await;
    let client = client(&server);

    let a = client.get_detail(25).await.unwrap();
    let b = client.get_detail(25).await.unwrap();
    assert_eq!(a, b);

    client.clear_cache();
    assert!(client.query_state(&CacheKey::Detail { id: 25 }).is_none());
}

#[tokio::test]
async fn stale_detail_is_served_and_refreshed_in_background() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon/25"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("pokemon_25.json")))
        .expect(2)
        .mount(&server)
        .await;
    let client = client(&server);

    let fresh = client.get_detail(25).await.unwrap();

    tokio::time::pause();
    tokio::time::advance(DETAIL_STALE_TIME + Duration::from_secs(1)).await;
    tokio::time::resume();

    let stale = client.get_detail(25).await.unwrap();
    assert_eq!(stale, fresh);

    let started = Instant::now();
    while server.received_requests().await.unwrap().len() < 2 {
        assert!(started.elapsed() < Duration::from_secs(5), "no background refresh");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    while client.query_state(&CacheKey::Detail { id: 25 }).unwrap().state != QueryState::Success {
        assert!(started.elapsed() < Duration::from_secs(5), "refresh never stored");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
