//! Integration tests for a caller-supplied transport.
//!
//! A recording [`Requestor`] stands in for the network so the exact request
//! handed to the transport can be inspected.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tiny_client::{
    BaseUrl, ClientConfig, Error, HttpMethod, HttpRequest, HttpResponse, Params, Requestor,
    ResourceDescriptor, ResourceId, ResourceRegistry, TransportError,
};

#[derive(Debug)]
struct Recorder {
    status: u16,
    body: &'static str,
    requests: Mutex<Vec<HttpRequest>>,
}

impl Recorder {
    fn new(status: u16, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Requestor for Recorder {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        Ok(HttpResponse::from_raw(
            self.status,
            url,
            "Content-Type: application/json",
            self.body,
        ))
    }
}

#[derive(Debug)]
struct Unreachable;

#[async_trait]
impl Requestor for Unreachable {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::Timeout { url: request.url })
    }
}

fn config(requestor: Arc<dyn Requestor>) -> Arc<ClientConfig> {
    Arc::new(
        ClientConfig::builder()
            .url(BaseUrl::new("http://localhost:3000/api/1.0").unwrap())
            .header("Authorization", "Token secret")
            .connect_timeout(Duration::from_secs(3))
            .requestor(requestor)
            .build()
            .unwrap(),
    )
}

fn organization(config: &Arc<ClientConfig>) -> Arc<ResourceDescriptor> {
    ResourceDescriptor::builder("Organization")
        .path("organizations")
        .fields(["id", "name"])
        .build(config)
}

#[tokio::test]
async fn test_get_carries_query_headers_and_timeout() {
    let recorder = Recorder::new(200, "[]");
    let organization = organization(&config(recorder.clone()));
    let params = json!({ "id": [1, 2] });

    organization
        .index(params.as_object().unwrap())
        .await
        .unwrap();

    let requests = recorder.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.http_method, HttpMethod::Get);
    assert_eq!(
        request.url,
        "http://localhost:3000/api/1.0/organizations.json?id%5B%5D=1&id%5B%5D=2"
    );
    assert_eq!(request.headers["Accept"], "application/json");
    assert_eq!(
        request.headers["Content-Type"],
        "application/x-www-form-urlencoded"
    );
    assert_eq!(request.headers["Authorization"], "Token secret");
    assert!(request.headers["User-Agent"].starts_with("tiny-client v"));
    assert_eq!(request.timeout, Some(Duration::from_secs(3)));
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_post_carries_json_body_without_query() {
    let recorder = Recorder::new(201, r#"{"id":1,"name":"acme"}"#);
    let organization = organization(&config(recorder.clone()));

    let created = organization
        .create(json!({ "name": "acme" }))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.get("name"), Some(&json!("acme")));

    let requests = recorder.requests();
    let request = &requests[0];
    assert_eq!(request.http_method, HttpMethod::Post);
    assert_eq!(request.url, "http://localhost:3000/api/1.0/organizations.json");
    assert_eq!(request.headers["Content-Type"], "application/json");

    let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "organization": { "name": "acme" } }));
}

#[tokio::test]
async fn test_primitives_address_sub_paths() {
    let recorder = Recorder::new(200, r#"{"id":1}"#);
    let config = config(recorder.clone());
    let organization = organization(&config);
    let role = ResourceDescriptor::builder("Role")
        .path("roles")
        .fields(["id"])
        .build(&config);
    let id = ResourceId::from(1_u64);

    organization
        .get(Some(&id), Some("roles/1.json"), &Params::new(), Some(&role))
        .await
        .unwrap();
    organization
        .put(Some(&id), Some("roles/1"), &json!({ "role": {} }), Some(&role))
        .await
        .unwrap();
    organization
        .delete_at(Some(&id), Some("roles/1"), Some(&role))
        .await
        .unwrap();

    let urls: Vec<String> = recorder.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "http://localhost:3000/api/1.0/organizations/1/roles/1.json";
            3
        ]
    );
    assert!(role.last_response().is_some());
    assert!(organization.last_response().is_none());
}

#[tokio::test]
async fn test_transport_failure_surfaces_once() {
    let organization = organization(&config(Arc::new(Unreachable)));

    let error = organization.show(1, &Params::new()).await.unwrap_err();

    let Error::Transport(TransportError::Timeout { url }) = error else {
        panic!("expected a timeout");
    };
    assert_eq!(url, "http://localhost:3000/api/1.0/organizations/1.json");
}

#[tokio::test]
async fn test_scalar_body_is_empty_payload() {
    let recorder = Recorder::new(200, "42");
    let organization = organization(&config(recorder.clone()));

    let result = organization.show(1, &Params::new()).await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_registry_shares_one_transport() {
    let recorder = Recorder::new(200, "[]");
    let mut registry = ResourceRegistry::new(config(recorder.clone()));

    let organization = registry.register(
        ResourceDescriptor::builder("Organization")
            .path("organizations")
            .fields(["id"]),
    );
    let user = registry.register(ResourceDescriptor::builder("User").path("users"));

    organization.index(&Params::new()).await.unwrap();
    user.index(&Params::new()).await.unwrap();

    let urls: Vec<String> = recorder.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        [
            "http://localhost:3000/api/1.0/organizations.json",
            "http://localhost:3000/api/1.0/users.json"
        ]
    );
}
