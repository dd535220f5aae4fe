//! OpenWeatherProvider against a mock HTTP server.

use weather_core::{
    Coordinates, LoadError, OpenWeatherProvider, UnitsSystem, WeatherProvider, WeatherTarget,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEATHER_PATH: &str = "/data/2.5/weather";

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    let base_url = format!("{}{WEATHER_PATH}", server.uri());
    OpenWeatherProvider::with_base_url("K".to_string(), &base_url).unwrap()
}

fn paris_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Paris",
        "sys": { "country": "FR" },
        "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 21.3, "feels_like": 20.9, "humidity": 40, "pressure": 1018 },
        "wind": { "speed": 3.6 },
        "cod": 200
    })
}

#[tokio::test]
async fn test_city_query_returns_body_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "Paris"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "K"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let payload = provider
        .fetch(&WeatherTarget::City("Paris".into()), UnitsSystem::Metric)
        .await
        .unwrap();

    assert_eq!(payload.as_json(), &paris_body());
    assert_eq!(payload.summary().place().as_deref(), Some("Paris, FR"));
}

#[tokio::test]
async fn test_coordinates_query_sends_lat_lon() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("lat", "40.7"))
        .and(query_param("lon", "-74.0"))
        .and(query_param("units", "imperial"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "New York" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let target = WeatherTarget::Coordinates(Coordinates::new(40.7, -74.0));
    let payload = provider.fetch(&target, UnitsSystem::Imperial).await.unwrap();

    assert_eq!(payload.summary().location_name.as_deref(), Some("New York"));
}

#[tokio::test]
async fn test_api_failure_uses_body_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider
        .fetch(&WeatherTarget::City("Atlantis".into()), UnitsSystem::Metric)
        .await
        .unwrap_err();

    match err {
        LoadError::Api(message) => assert_eq!(message, "city not found"),
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_api_failure_without_message_mentions_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({ "cod": 401 })))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider
        .fetch(&WeatherTarget::City("Paris".into()), UnitsSystem::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Api(_)));
    assert!(err.to_string().contains("401"), "Error should mention status: {err}");
}

#[tokio::test]
async fn test_non_json_body_is_parse_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let err = provider
        .fetch(&WeatherTarget::City("Paris".into()), UnitsSystem::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_network_failure_hides_api_key() {
    // Nothing listens on port 1.
    let provider = OpenWeatherProvider::with_base_url(
        "SECRET".to_string(),
        &format!("http://127.0.0.1:1{WEATHER_PATH}"),
    )
    .unwrap();
    let err = provider
        .fetch(&WeatherTarget::City("Paris".into()), UnitsSystem::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Network(_)), "got {err:?}");
    assert!(!err.to_string().contains("SECRET"));
}
