//! HTTP-level tests for the OpenWeather client and a full session against it.

use chrono::{Duration, NaiveDate};
use serde_json::{Value, json};
use weather_core::{
    CurrentLookup, FixedClock, IconId, LookupOutcome, LookupQuery, OpenWeatherProvider, Panel,
    ProviderError, WeatherProvider, WeatherSession,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
}

fn london_current() -> Value {
    json!({
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 15.7, "feels_like": 15.1, "humidity": 72},
        "wind": {"speed": 4.1, "deg": 240},
        "dt": 1792324800,
        "name": "London",
        "cod": 200
    })
}

/// Forty 3-hour slots from today's midnight, `dt_txt` formatted as the provider does.
fn london_forecast() -> Value {
    let start = today().and_hms_opt(0, 0, 0).expect("valid time");
    let list: Vec<Value> = (0..40)
        .map(|i| {
            let ts = start + Duration::hours(3 * i);
            json!({
                "dt": ts.and_utc().timestamp(),
                "main": {"temp": 8.0 + i as f64 * 0.25, "humidity": 70},
                "weather": [{"id": if i % 2 == 0 { 800 } else { 601 }, "main": "Mixed"}],
                "dt_txt": ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            })
        })
        .collect();

    json!({"cod": "200", "message": 0, "cnt": 40, "list": list, "city": {"name": "London", "country": "GB"}})
}

fn provider(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY".into()).with_base_url(&server.uri())
}

#[tokio::test]
async fn sends_city_key_and_metric_units() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_current()))
        .expect(1)
        .mount(&server)
        .await;

    let query = LookupQuery::parse("London").expect("valid query");
    let lookup = provider(&server).current(&query).await.expect("request succeeds");

    let CurrentLookup::Found(conditions) = lookup else {
        panic!("expected Found, got {lookup:?}");
    };
    assert_eq!(conditions.city_name, "London");
    assert_eq!(conditions.condition_code, 803);
}

#[tokio::test]
async fn http_404_with_provider_body_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&server)
        .await;

    let query = LookupQuery::parse("Atlantis").expect("valid query");
    let lookup = provider(&server).current(&query).await.expect("request succeeds");

    assert_eq!(
        lookup,
        CurrentLookup::NotFound {
            message: "city not found".into()
        }
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let server = MockServer::start().await;
    let provider = provider(&server);
    drop(server);

    let query = LookupQuery::parse("London").expect("valid query");
    let err = provider.current(&query).await.unwrap_err();

    assert!(matches!(err, ProviderError::Transport { endpoint: "weather", .. }));
    assert!(err.chain().starts_with("request to weather failed: "));
}

#[tokio::test]
async fn session_renders_london() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_current()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let session = WeatherSession::new(provider(&server)).with_clock(FixedClock(today()));

    assert_eq!(session.lookup("London").await, LookupOutcome::Found);

    let view = session.view();
    assert_eq!(view.panel, Panel::Results);
    assert!(!view.loading);

    let current = view.current.expect("current conditions rendered");
    assert_eq!(current.city, "London");
    assert_eq!(current.temperature, "16 °C");
    assert_eq!(current.condition, "Clouds");
    assert_eq!(current.humidity, "72%");
    assert_eq!(current.wind_speed, "4.1 M/s");
    assert_eq!(current.date, "Sun, 18 Oct");
    assert_eq!(current.icon, IconId::Clouds);

    // Midday is slot 4 of each day: an even index, so code 800.
    let dates: Vec<_> = view.forecast.iter().map(|c| c.date.as_str()).collect();
    assert_eq!(dates, ["Oct 19", "Oct 20", "Oct 21", "Oct 22"]);
    assert!(view.forecast.iter().all(|c| c.icon == IconId::Clear));
    // Slot 12 (Oct 19 12:00): 8.0 + 12 * 0.25 = 11.0
    assert_eq!(view.forecast[0].temperature, "11 °C");
}

#[tokio::test]
async fn session_not_found_never_requests_forecast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"cod": "404", "message": "city not found"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_forecast()))
        .expect(0)
        .mount(&server)
        .await;

    let session = WeatherSession::new(provider(&server)).with_clock(FixedClock(today()));

    assert_eq!(session.lookup("Atlantis").await, LookupOutcome::NotFound);
    assert_eq!(session.view().panel, Panel::NotFound);
    assert!(!session.view().loading);
}

#[tokio::test]
async fn session_survives_broken_forecast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_current()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let session = WeatherSession::new(provider(&server)).with_clock(FixedClock(today()));

    assert_eq!(session.lookup("London").await, LookupOutcome::Found);

    let view = session.view();
    assert_eq!(view.panel, Panel::Results);
    assert!(view.forecast.is_empty());
    assert_eq!(view.current.expect("rendered").city, "London");
}

#[tokio::test]
async fn session_keeps_prompt_on_malformed_current_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let session = WeatherSession::new(provider(&server)).with_clock(FixedClock(today()));

    assert_eq!(session.lookup("London").await, LookupOutcome::Failed);
    assert_eq!(session.view().panel, Panel::Prompt);
    assert!(!session.view().loading);
}

#[tokio::test]
async fn session_tolerates_slots_without_conditions_outside_midday() {
    let mut forecast = london_forecast();
    for slot in forecast["list"].as_array_mut().expect("list").iter_mut() {
        if !slot["dt_txt"].as_str().expect("dt_txt").ends_with("12:00:00") {
            slot["weather"] = json!([]);
        }
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_current()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast))
        .mount(&server)
        .await;

    let session = WeatherSession::new(provider(&server)).with_clock(FixedClock(today()));

    assert_eq!(session.lookup("London").await, LookupOutcome::Found);
    assert_eq!(session.view().forecast.len(), 4);
}
