//! Integration tests for nested resources.

use std::sync::Arc;

use serde_json::json;
use tiny_client::{
    BaseUrl, ClientConfig, Error, Params, Resource, ResourceDescriptor, ResourceId,
};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Types {
    post: Arc<ResourceDescriptor>,
    comment: Arc<ResourceDescriptor>,
    tag: Arc<ResourceDescriptor>,
}

fn types(server: &MockServer) -> Types {
    let config = Arc::new(
        ClientConfig::builder()
            .url(BaseUrl::new(format!("{}/api", server.uri())).unwrap())
            .build()
            .unwrap(),
    );
    let comment = ResourceDescriptor::builder("Comment")
        .path("comments")
        .fields(["id", "body"])
        .build(&config);
    let tag = ResourceDescriptor::builder("Tag")
        .path("tags")
        .fields(["id"])
        .build(&config);
    let post = ResourceDescriptor::builder("Post")
        .path("posts")
        .fields(["id", "name"])
        .nested([&comment])
        .build(&config);
    Types { post, comment, tag }
}

fn persisted(descriptor: &Arc<ResourceDescriptor>, id: u64) -> Resource {
    Resource::build(descriptor, &json!({ "id": id }))
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |r| r.len())
}

#[tokio::test]
async fn test_nested_index_lists_children() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/1/comments.json"))
        .and(query_param("order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 10, "body": "a" },
            { "id": 11, "body": "b" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let types = types(&server);
    let post = persisted(&types.post, 1);
    let params = json!({ "order": "desc" });

    let comments: Vec<Resource> = post
        .nested_index(&types.comment, params.as_object().unwrap())
        .await
        .unwrap()
        .collect();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].descriptor(), &types.comment);
    assert_eq!(comments[1].get("body"), Some(&json!("b")));

    // The response is recorded on the child type
    assert!(types.comment.last_response().is_some());
    assert!(types.post.last_response().is_none());
}

#[tokio::test]
async fn test_nested_show_fetches_one_child() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/1/comments/10.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 10, "body": "a" })))
        .expect(1)
        .mount(&server)
        .await;

    let types = types(&server);
    let post = persisted(&types.post, 1);

    let comment = post
        .nested_show(&types.comment, 10, &Params::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(comment.id(), Some(&ResourceId::Number(10)));
}

#[tokio::test]
async fn test_nested_create_posts_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/posts/1/comments.json"))
        .and(body_json(json!({ "comment": { "body": "hi" } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 12, "body": "hi" })))
        .expect(1)
        .mount(&server)
        .await;

    let types = types(&server);
    let post = persisted(&types.post, 1);
    let mut comment = types.comment.instantiate();
    comment.set("body", "hi").unwrap();

    let created = post.nested_create(&comment).await.unwrap().unwrap();

    assert_eq!(created.id(), Some(&ResourceId::Number(12)));
}

#[tokio::test]
async fn test_nested_update_puts_to_child_member() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/posts/1/comments/10.json"))
        .and(body_json(json!({ "comment": { "body": "edited" } })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 10, "body": "edited" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let types = types(&server);
    let post = persisted(&types.post, 1);
    let mut comment = persisted(&types.comment, 10);
    comment.set("body", "edited").unwrap();

    let updated = post.nested_update(&comment).await.unwrap().unwrap();

    assert_eq!(updated.get("body"), Some(&json!("edited")));
}

#[tokio::test]
async fn test_nested_delete_removes_child() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/posts/1/comments/10.json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let types = types(&server);
    let post = persisted(&types.post, 1);
    let comment = persisted(&types.comment, 10);

    // Not gated by the child type's deletable flag
    assert!(!types.comment.is_deletable());
    let result = post.nested_delete(&comment).await.unwrap();

    assert!(result.is_none());
    assert_eq!(types.comment.last_response().unwrap().code, 204);
}

#[tokio::test]
async fn test_nested_all_paginates_under_parent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/1/comments.json"))
        .and(query_param("offset", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }, { "id": 2 }])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/posts/1/comments.json"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 3 }])))
        .expect(1)
        .mount(&server)
        .await;

    let types = types(&server);
    let post = persisted(&types.post, 1);
    let params = json!({ "limit": 2 });

    let comments = post
        .nested_all(&types.comment, params.as_object().unwrap())
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    assert_eq!(comments.len(), 3);
    assert!(comments.iter().all(|c| c.descriptor() == &types.comment));
}

#[tokio::test]
async fn test_nested_in_batches_yields_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/1/comments.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
        .expect(1)
        .mount(&server)
        .await;

    let types = types(&server);
    let post = persisted(&types.post, 1);

    let mut pages = post.nested_in_batches(&types.comment, &Params::new()).unwrap();

    assert_eq!(pages.next_page().await.unwrap().unwrap().len(), 1);
    assert!(pages.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn test_undeclared_child_sends_nothing() {
    let server = MockServer::start().await;
    let types = types(&server);
    let post = persisted(&types.post, 1);
    let tag = persisted(&types.tag, 3);

    let error = post.nested_create(&tag).await.unwrap_err();
    assert!(matches!(error, Error::Argument { .. }));

    let error = post.nested_update(&tag).await.unwrap_err();
    assert!(matches!(error, Error::Argument { .. }));

    let error = post
        .nested_index(&types.tag, &Params::new())
        .await
        .unwrap_err();
    assert!(matches!(error, Error::Argument { .. }));

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_parent_without_id_sends_nothing() {
    let server = MockServer::start().await;
    let types = types(&server);
    let post = types.post.instantiate();
    let comment = persisted(&types.comment, 10);

    let error = post
        .nested_show(&types.comment, 10, &Params::new())
        .await
        .unwrap_err();
    assert!(matches!(error, Error::MissingId { .. }));

    let error = post.nested_delete(&comment).await.unwrap_err();
    assert!(matches!(error, Error::MissingId { .. }));

    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_child_without_id_sends_nothing() {
    let server = MockServer::start().await;
    let types = types(&server);
    let post = persisted(&types.post, 1);
    let comment = types.comment.instantiate();

    let error = post.nested_update(&comment).await.unwrap_err();
    assert!(matches!(error, Error::Argument { .. }));

    let error = post.nested_delete(&comment).await.unwrap_err();
    assert!(matches!(error, Error::Argument { .. }));

    assert_eq!(request_count(&server).await, 0);
}
