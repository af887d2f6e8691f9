//! HTTP transport tests against a mock server

use bytes::Bytes;
use meridian_client::error::{QueryError, TransportError};
use meridian_client::transport::{
    HttpTransport, Procedure, RequestDescriptor, StaticToken, Transport,
};
use std::sync::Arc;

fn descriptor() -> RequestDescriptor {
    RequestDescriptor::new(Procedure::Search, "Things")
}

#[tokio::test]
async fn test_success_returns_raw_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/search/Things")
        .match_header("content-type", "application/x-msgpack")
        .with_status(200)
        .with_body(b"reply-bytes")
        .create_async()
        .await;

    let transport = HttpTransport::new(server.url()).unwrap();
    let body = transport
        .perform_request(Bytes::from_static(b"request-bytes"), &descriptor())
        .await
        .unwrap();

    assert_eq!(body, Bytes::from_static(b"reply-bytes"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/search/Things")
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_body(b"")
        .create_async()
        .await;

    let transport = HttpTransport::new(server.url())
        .unwrap()
        .with_token_provider(Arc::new(StaticToken::new("secret-token")));
    transport
        .perform_request(Bytes::new(), &descriptor())
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_rejection_surfaces_verbatim() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/search/Things")
        .with_status(422)
        .with_body("negative limit is invalid")
        .create_async()
        .await;

    let transport = HttpTransport::new(server.url()).unwrap();
    let result = transport
        .perform_request(Bytes::new(), &descriptor())
        .await;

    match result {
        Err(QueryError::Api(api)) => {
            assert_eq!(api.status, 422);
            assert_eq!(api.message, "negative limit is invalid");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_auth_failure_is_a_transport_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/search/Things")
        .with_status(401)
        .with_body("token expired")
        .create_async()
        .await;

    let transport = HttpTransport::new(server.url()).unwrap();
    let result = transport
        .perform_request(Bytes::new(), &descriptor())
        .await;

    assert!(matches!(
        result,
        Err(QueryError::Transport(
            TransportError::AuthenticationFailed(_)
        ))
    ));
}

#[tokio::test]
async fn test_aggregate_routes_to_its_procedure() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/aggregate/Things")
        .with_status(200)
        .with_body(b"")
        .create_async()
        .await;

    let transport = HttpTransport::new(server.url()).unwrap();
    transport
        .perform_request(
            Bytes::new(),
            &RequestDescriptor::new(Procedure::Aggregate, "Things"),
        )
        .await
        .unwrap();

    mock.assert_async().await;
}
