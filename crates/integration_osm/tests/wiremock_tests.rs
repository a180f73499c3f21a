//! Integration tests for the OSM clients (wiremock-based)

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_osm::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient, OsrmConfig,
    OsrmRoutingClient, RoutingClient, RoutingError,
};

fn nominatim_for_mock(base_url: &str) -> NominatimGeocodingClient {
    let config = NominatimConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..NominatimConfig::default()
    };
    NominatimGeocodingClient::new(&config).unwrap()
}

fn osrm_for_mock(base_url: &str) -> OsrmRoutingClient {
    let config = OsrmConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..OsrmConfig::default()
    };
    OsrmRoutingClient::new(&config).unwrap()
}

const fn sample_search_json() -> &'static str {
    r#"[
        {"place_id": 2503, "display_name": "Red Square, Tverskoy, Moscow, Russia", "lat": "55.7539", "lon": "37.6208"},
        {"place_id": 9912, "display_name": "Red Square Cafe, Moscow, Russia", "lat": "55.7601", "lon": "37.6010"}
    ]"#
}

// ----------------------------------------------------------------------------
// Nominatim
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_reverse_geocode_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "55.75"))
        .and(query_param("lon", "37.61"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"place_id": 1, "display_name": "Moscow, Russia"}"#),
        )
        .mount(&server)
        .await;

    let client = nominatim_for_mock(&server.uri());
    let label = client.reverse_geocode(55.75, 37.61).await.unwrap();
    assert_eq!(label, "Moscow, Russia");
}

#[tokio::test]
async fn test_reverse_geocode_no_label() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"error": "Unable to geocode"}"#))
        .mount(&server)
        .await;

    let client = nominatim_for_mock(&server.uri());
    let err = client.reverse_geocode(0.0, -160.0).await.unwrap_err();
    assert!(matches!(err, GeocodingError::AddressNotFound(_)));
}

#[tokio::test]
async fn test_reverse_geocode_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = nominatim_for_mock(&server.uri());
    let err = client.reverse_geocode(55.75, 37.61).await.unwrap_err();
    assert!(matches!(err, GeocodingError::RequestFailed(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_reverse_geocode_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = nominatim_for_mock(&server.uri());
    let err = client.reverse_geocode(55.75, 37.61).await.unwrap_err();
    assert!(matches!(err, GeocodingError::RateLimitExceeded));
}

#[tokio::test]
async fn test_search_success_preserves_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Red Square"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_search_json()))
        .mount(&server)
        .await;

    let client = nominatim_for_mock(&server.uri());
    let places = client.search("Red Square", 5).await.unwrap();

    assert_eq!(places.len(), 2);
    assert_eq!(places[0].id, "2503");
    assert!(places[0].label.starts_with("Red Square"));
    assert!((places[0].latitude - 55.7539).abs() < 1e-9);
    assert!((places[0].longitude - 37.6208).abs() < 1e-9);
    assert_eq!(places[1].id, "9912");
}

#[tokio::test]
async fn test_search_empty_result_is_ok() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = nominatim_for_mock(&server.uri());
    let places = client.search("qqqqqqq", 5).await.unwrap();
    assert!(places.is_empty());
}

#[tokio::test]
async fn test_search_country_filter_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("countrycodes", "ru"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let config = NominatimConfig {
        base_url: server.uri(),
        country_filter: "ru".to_string(),
        ..NominatimConfig::for_testing()
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();
    client.search("Kremlin", 5).await.unwrap();
}

#[tokio::test]
async fn test_search_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = nominatim_for_mock(&server.uri());
    let err = client.search("Kremlin", 5).await.unwrap_err();
    assert!(matches!(err, GeocodingError::ParseError(_)));
}

// ----------------------------------------------------------------------------
// OSRM
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_route_success_swaps_axes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/route/v1/driving/37.61,55.75;37.6,55.76"))
        .and(query_param("overview", "full"))
        .and(query_param("geometries", "geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "code": "Ok",
                "routes": [{
                    "distance": 1830.5,
                    "duration": 240.0,
                    "geometry": { "type": "LineString", "coordinates": [[37.62, 55.75], [37.60, 55.76]] }
                }]
            }"#,
        ))
        .mount(&server)
        .await;

    let client = osrm_for_mock(&server.uri());
    let route = client.route(55.75, 37.61, 55.76, 37.6).await.unwrap();

    assert_eq!(route.lat_lon_points(), vec![(55.75, 37.62), (55.76, 37.60)]);
    assert_eq!(route.duration, Some(240.0));
}

#[tokio::test]
async fn test_route_no_route_http_400() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/route/v1/driving/37.61,55.75;-74,40.7"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"code": "NoRoute", "message": "Impossible route between points"}"#,
        ))
        .mount(&server)
        .await;

    let client = osrm_for_mock(&server.uri());
    let err = client.route(55.75, 37.61, 40.7, -74.0).await.unwrap_err();
    assert!(matches!(err, RoutingError::NoRoutesFound { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_route_zero_routes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/route/v1/driving/37.61,55.75;37.6,55.76"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code": "Ok", "routes": []}"#))
        .mount(&server)
        .await;

    let client = osrm_for_mock(&server.uri());
    let err = client.route(55.75, 37.61, 55.76, 37.6).await.unwrap_err();
    assert!(matches!(err, RoutingError::NoRoutesFound { .. }));
}

#[tokio::test]
async fn test_route_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = osrm_for_mock(&server.uri());
    let err = client.route(55.75, 37.61, 55.76, 37.6).await.unwrap_err();
    assert!(matches!(err, RoutingError::RequestFailed(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_route_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = osrm_for_mock(&server.uri());
    let err = client.route(55.75, 37.61, 55.76, 37.6).await.unwrap_err();
    assert!(matches!(
        err,
        RoutingError::RateLimitExceeded {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_route_rejects_invalid_point_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = osrm_for_mock(&server.uri());
    let err = client.route(123.0, 37.61, 55.76, 37.6).await.unwrap_err();
    assert!(matches!(err, RoutingError::InvalidLocation(_)));
}

#[tokio::test]
async fn test_route_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(3))
                .set_body_string(r#"{"code": "Ok", "routes": []}"#),
        )
        .mount(&server)
        .await;

    let config = OsrmConfig {
        base_url: server.uri(),
        timeout_secs: 1,
        ..OsrmConfig::default()
    };
    let client = OsrmRoutingClient::new(&config).unwrap();
    let err = client.route(55.75, 37.61, 55.76, 37.6).await.unwrap_err();
    assert!(matches!(err, RoutingError::Timeout { timeout_secs: 1 }));
}
