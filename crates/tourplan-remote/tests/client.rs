//! Integration tests for `SafetyApiClient` using wiremock HTTP mocks.

use serde_json::json;
use tourplan_core::{ItemType, ItineraryItem};
use tourplan_remote::{ItineraryRemote, RemoteError, SafetyApiClient, SavePayload};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SafetyApiClient {
    SafetyApiClient::new(base_url, 5, "tourplan-test/0.1")
        .expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_returns_parsed_itinerary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/itinerary/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_id": "u1",
            "items": [
                {"id": "place:p1", "type": "place", "placeId": "p1", "day": 2},
                {"id": "city:c1", "type": "city", "cityName": "Jaipur"}
            ],
            "trip_note": "Honeymoon"
        })))
        .mount(&server)
        .await;

    let itinerary = test_client(&server.uri())
        .fetch("u1")
        .await
        .expect("should parse itinerary");

    assert_eq!(itinerary.items.len(), 2);
    assert_eq!(itinerary.items[0].id, "place:p1");
    assert_eq!(itinerary.items[0].day, 2);
    assert_eq!(itinerary.items[1].day, 1);
    assert_eq!(itinerary.trip_note.as_deref(), Some("Honeymoon"));
}

#[tokio::test]
async fn fetch_treats_null_items_as_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/itinerary/u1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"items": null, "trip_note": null})),
        )
        .mount(&server)
        .await;

    let itinerary = test_client(&server.uri()).fetch("u1").await.unwrap();
    assert!(itinerary.items.is_empty());
    assert!(itinerary.trip_note.is_none());
}

#[tokio::test]
async fn fetch_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/itinerary/u404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch("u404").await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}

#[tokio::test]
async fn fetch_maps_500_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch("u1").await.unwrap_err();
    assert!(
        matches!(err, RemoteError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch("u1").await.unwrap_err();
    assert!(matches!(err, RemoteError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn save_posts_full_payload() {
    let server = MockServer::start().await;

    let mut item = ItineraryItem::new(ItemType::State, "s1");
    item.name = Some("Rajasthan".to_owned());
    let payload = SavePayload {
        user_id: "u1".to_owned(),
        items: vec![item],
        trip_note: Some("Honeymoon".to_owned()),
    };

    Mock::given(method("POST"))
        .and(path("/api/itinerary/save"))
        .and(body_json(json!({
            "user_id": "u1",
            "items": [{"id": "state:s1", "type": "state", "stateId": "s1", "name": "Rajasthan", "day": 1}],
            "trip_note": "Honeymoon"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": "u1"})))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .save(&payload)
        .await
        .expect("save should succeed");
}

#[tokio::test]
async fn save_surfaces_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/itinerary/save"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "Failed to save itinerary"
        })))
        .mount(&server)
        .await;

    let payload = SavePayload {
        user_id: "u1".to_owned(),
        items: Vec::new(),
        trip_note: None,
    };
    let err = test_client(&server.uri()).save(&payload).await.unwrap_err();
    assert!(matches!(err, RemoteError::UnexpectedStatus { status: 500, .. }));
}

#[tokio::test]
async fn clear_sends_user_id_as_query_param() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/itinerary/clear"))
        .and(query_param("user_id", "u1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user_id": "u1", "cleared": false})),
        )
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .clear("u1")
        .await
        .expect("clear should succeed even when nothing was stored");
}

#[tokio::test]
async fn bearer_token_is_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/itinerary/clear"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .with_token(Some("secret-token".to_owned()))
        .clear("u1")
        .await
        .expect("authorized clear should succeed");
}
