use catalog_core::{fetch_artist, fetch_gallery, ApiClient, ApiError, DetailError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_client(reqwest::Client::new(), &server.uri()).unwrap()
}

#[tokio::test]
async fn artist_search_returns_first_hit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/artists/search"))
        .and(query_param("keyword", "Kim Hong-do"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "count": 2,
            "data": [
                {
                    "artistId": 3,
                    "name": "Kim Hong-do",
                    "theme": "Genre painting",
                    "nationality": "Joseon"
                },
                {"artistId": 4, "name": "Kim Hong-do II"}
            ]
        })))
        .mount(&server)
        .await;

    let artist = fetch_artist(&client_for(&server), "Kim Hong-do")
        .await
        .unwrap()
        .expect("artist");
    assert_eq!(artist.artist_id.as_deref(), Some("3"));
    assert_eq!(artist.nationality.as_deref(), Some("Joseon"));
}

#[tokio::test]
async fn gallery_search_maps_camel_case_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/galleries/search"))
        .and(query_param("keyword", "National Museum"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "count": 1,
            "data": [{
                "galleryId": "G1",
                "name": "National Museum",
                "openTime": "10:00",
                "closedTime": "18:00",
                "fee": 3000
            }]
        })))
        .mount(&server)
        .await;

    let gallery = fetch_gallery(&client_for(&server), "National Museum")
        .await
        .unwrap()
        .expect("gallery");
    assert_eq!(gallery.open_time.as_deref(), Some("10:00"));
    assert_eq!(gallery.fee, Some(3000));
    assert_eq!(gallery.phone, None);
}

#[tokio::test]
async fn empty_result_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/artists/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "count": 0,
            "data": []
        })))
        .mount(&server)
        .await;

    assert_eq!(fetch_artist(&client_for(&server), "nobody").await.unwrap(), None);
}

#[tokio::test]
async fn null_data_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/galleries/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "none",
            "count": 0,
            "data": null
        })))
        .mount(&server)
        .await;

    assert_eq!(fetch_gallery(&client_for(&server), "nowhere").await.unwrap(), None);
}

#[tokio::test]
async fn blank_name_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    let err = fetch_gallery(&client_for(&server), "  ").await.unwrap_err();
    assert!(matches!(err, DetailError::MissingName));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/artists/search"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetch_artist(&client_for(&server), "x").await.unwrap_err();
    assert!(matches!(err, DetailError::Api(ApiError::Status(404))));
}
