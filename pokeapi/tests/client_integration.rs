use pokeapi::{Client, Error, ListQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_pokemon_list_sends_limit_and_offset() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("pokemon_list.json");

    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let resp = client
        .get_pokemon_list(&ListQuery::for_page(3))
        .await
        .unwrap();
    assert_eq!(resp.count, 1302);
    assert_eq!(resp.results.len(), 3);
}

#[tokio::test]
async fn get_pokemon_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("pokemon_25.json");

    Mock::given(method("GET"))
        .and(path("/pokemon/25"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let p = client.get_pokemon(25).await.unwrap();
    assert_eq!(p.name, "pikachu");
}

#[tokio::test]
async fn get_pokemon_not_found_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/99999"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client.get_pokemon(99999).await.unwrap_err();
    match err {
        Error::HttpStatus {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status, 404);
            assert_eq!(status_text, "Not Found");
            assert_eq!(body, "Not Found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn get_pokemon_malformed_json_is_validation_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pokemon/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id": 1}"#))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let err = client.get_pokemon(1).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(!err.is_network());
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    // Nothing listens on the discard port.
    let client = Client::with_base_url("http://127.0.0.1:9").unwrap();
    let err = client.get_pokemon(1).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
    assert!(err.is_network());
}
