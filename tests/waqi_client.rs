//! Integration tests for the WAQI feed client
//!
//! Each test serves one canned HTTP response from a local listener and checks
//! how the client classifies it.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use airwatch::data::{AirQualitySource, FetchError, Location, WaqiClient};

const OK_BODY: &str = r#"{
    "status": "ok",
    "data": {
        "aqi": 42,
        "city": {"geo": [23.7961, 90.4243], "name": "Dhaka"},
        "iaqi": {"pm25": {"v": 42}, "t": {"v": 31}},
        "time": {"iso": "2024-07-15T14:00:00+06:00"}
    }
}"#;

/// Serves a single response and returns the request line the client sent
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        let request = String::from_utf8_lossy(&request).to_string();
        request.lines().next().unwrap_or_default().to_string()
    });

    (base_url, server)
}

#[tokio::test]
async fn test_fetch_valid_feed() {
    let (base_url, server) = serve_once("200 OK", OK_BODY).await;
    let client = WaqiClient::new("demo").with_base_url(base_url);

    let reading = client.fetch(&Location::Here).await.unwrap();
    assert_eq!(reading.aqi, 42.0);
    assert_eq!(reading.location, "Dhaka");
    assert_eq!(reading.pollutants.pm25, Some(42.0));
    assert_eq!(reading.pollutants.no2, None);
    assert_eq!(reading.weather.temperature, Some(31.0));

    let request_line = server.await.unwrap();
    assert!(
        request_line.starts_with("GET /here/?token=demo"),
        "unexpected request: {}",
        request_line
    );
}

#[tokio::test]
async fn test_fetch_requests_geo_path() {
    let (base_url, server) = serve_once("200 OK", OK_BODY).await;
    let client = WaqiClient::new("demo").with_base_url(format!("{}/", base_url));

    let location = Location::Geo {
        lat: 23.7961,
        lon: 90.4243,
    };
    client.fetch(&location).await.unwrap();

    let request_line = server.await.unwrap();
    assert!(
        request_line.starts_with("GET /@23.7961;90.4243/?token=demo"),
        "unexpected request: {}",
        request_line
    );
}

#[tokio::test]
async fn test_http_error_is_network_error() {
    let (base_url, server) = serve_once("500 Internal Server Error", "oops").await;
    let client = WaqiClient::new("demo").with_base_url(base_url);

    let err = client.fetch(&Location::Here).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)), "got {:?}", err);
    assert!(err.to_string().contains("500"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_error_status_is_invalid_response() {
    let (base_url, server) =
        serve_once("200 OK", r#"{"status": "error", "data": "Invalid key"}"#).await;
    let client = WaqiClient::new("bad-token").with_base_url(base_url);

    let err = client.fetch(&Location::Here).await.unwrap_err();
    assert_eq!(err, FetchError::InvalidResponse("Invalid key".to_string()));
    server.await.unwrap();
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let (base_url, server) = serve_once("200 OK", "<html>not json</html>").await;
    let client = WaqiClient::new("demo").with_base_url(base_url);

    let err = client.fetch(&Location::Here).await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidResponse(_)), "got {:?}", err);
    server.await.unwrap();
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = WaqiClient::new("demo").with_base_url(base_url);
    let err = client.fetch(&Location::Here).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)), "got {:?}", err);
    assert!(err.to_string().starts_with("Network error"));
}
