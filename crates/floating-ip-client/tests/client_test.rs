//! HTTP-level tests for DigitalOceanClient using wiremock

use floating_ip_client::{
    ActionStatus, DigitalOceanClient, DropletId, FloatingIpClientTrait, FloatingIpError,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> DigitalOceanClient {
    DigitalOceanClient::new(format!("{}/", server.uri()), "secret-token".to_string()).unwrap()
}

#[tokio::test]
async fn test_get_floating_ip_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/floating_ips/45.55.96.47"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "floating_ip": {
                "ip": "45.55.96.47",
                "droplet": {"id": 3164444, "name": "web-01"},
                "region": {"name": "New York 3", "slug": "nyc3"},
                "locked": false
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fip = client_for(&server).get_floating_ip("45.55.96.47").await.unwrap();
    assert_eq!(fip.holder(), Some(DropletId(3_164_444)));
}

#[tokio::test]
async fn test_assign_posts_assign_action() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/floating_ips/45.55.96.47/actions"))
        .and(body_json(json!({"type": "assign", "droplet_id": 42})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "action": {
                "id": 68212728,
                "status": "in-progress",
                "type": "assign_ip",
                "started_at": "2015-10-15T17:45:44Z",
                "completed_at": null,
                "resource_id": 758603823,
                "resource_type": "floating_ip",
                "region_slug": "nyc3"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let action = client_for(&server).assign("45.55.96.47", DropletId(42)).await.unwrap();
    assert_eq!(action.id, 68_212_728);
    assert_eq!(action.status, ActionStatus::Pending);
}

#[tokio::test]
async fn test_get_action_through_trait_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/floating_ips/45.55.96.47/actions/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "action": {"id": 7, "status": "completed", "type": "assign_ip"}
        })))
        .mount(&server)
        .await;

    let client: Box<dyn FloatingIpClientTrait> = Box::new(client_for(&server));
    let action = client.get_action("45.55.96.47", 7).await.unwrap();
    assert_eq!(action.status, ActionStatus::Completed);
    assert_eq!(client.base_url(), server.uri());
}

#[tokio::test]
async fn test_error_status_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/floating_ips/10.0.0.1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not_found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/floating_ips/10.0.0.2"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/floating_ips/10.0.0.3"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.get_floating_ip("10.0.0.1").await,
        Err(FloatingIpError::NotFound(_))
    ));
    assert!(matches!(
        client.get_floating_ip("10.0.0.2").await,
        Err(FloatingIpError::Authentication(_))
    ));
    match client.get_floating_ip("10.0.0.3").await {
        Err(FloatingIpError::Api(msg)) => {
            assert!(msg.contains("503"), "unexpected message: {}", msg)
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/floating_ips/45.55.96.47"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server).get_floating_ip("45.55.96.47").await;
    assert!(matches!(result, Err(FloatingIpError::Api(_))));
}
