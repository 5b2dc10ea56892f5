//! Integration tests for request URL construction.

use serde_json::json;
use tiny_client::rest::to_query;
use tiny_client::{BaseUrl, ClientConfig, Params, UrlBuilder};

fn params(value: serde_json::Value) -> Params {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_built_urls_never_hold_doubled_separators() {
    let bases = ["", "/", "/api", "/api/", "http://acme.org", "http://acme.org/v1/"];
    let segment_lists: [&[&str]; 5] = [
        &[],
        &["posts"],
        &["/posts/", "1"],
        &["posts/1.json", "/", "comments/"],
        &["", "posts", ".json", "2"],
    ];

    for base in bases {
        for segments in segment_lists {
            let builder = segments
                .iter()
                .fold(UrlBuilder::url(base), |builder, segment| builder.path(segment));
            let url = builder.build();
            let path = url.trim_start_matches("http://");

            assert!(!path.contains("//"), "{url} holds a doubled separator");
            assert!(url.ends_with(".json"), "{url} does not end with .json");
        }
    }
}

#[test]
fn test_json_suffix_stripping_is_idempotent() {
    let with_suffix = UrlBuilder::url("/organizations")
        .path(1)
        .path("permissions/1.json")
        .build();
    let without_suffix = UrlBuilder::url("/organizations")
        .path(1)
        .path("permissions/1")
        .build();

    assert_eq!(with_suffix, without_suffix);
    assert_eq!(with_suffix, "/organizations/1/permissions/1.json");
}

#[test]
fn test_empty_base_without_segments() {
    assert_eq!(UrlBuilder::url("").build(), "/.json");
    assert_eq!(UrlBuilder::url("/").build(), "/.json");
}

#[test]
fn test_query_goes_after_json_suffix() {
    let url = UrlBuilder::url("http://acme.org/")
        .path("posts")
        .query(&params(json!({ "limit": 10, "offset": 0 })))
        .build();

    assert_eq!(url, "http://acme.org/posts.json?limit=10&offset=0");
}

#[test]
fn test_query_merges_with_last_value_winning() {
    let url = UrlBuilder::url("/")
        .path("posts")
        .query(&params(json!({ "a": 1, "b": 1 })))
        .query(&params(json!({ "b": 2 })))
        .build();

    assert_eq!(url, "/posts.json?a=1&b=2");
}

#[test]
fn test_build_is_repeatable() {
    let builder = UrlBuilder::url("/api")
        .path("posts")
        .query(&params(json!({ "id": [1, 2] })));

    assert_eq!(builder.build(), builder.build());
    assert_eq!(builder.segments(), ["posts"]);
}

#[test]
fn test_array_parameters_use_bracket_notation() {
    let query = to_query(&params(json!({ "id": [1, 2] })));
    assert_eq!(query, "id%5B%5D=1&id%5B%5D=2");
}

#[test]
fn test_nested_and_null_parameters() {
    let query = to_query(&params(json!({
        "filter": { "state": "open", "tags": ["a"] },
        "empty": null,
        "skipped": []
    })));

    assert_eq!(
        query,
        "empty=&filter%5Bstate%5D=open&filter%5Btags%5D%5B%5D=a"
    );
}

#[test]
fn test_config_url_for_uses_base_url() {
    let config = ClientConfig::builder()
        .url(BaseUrl::new("http://localhost:3000/api/1.0/").unwrap())
        .build()
        .unwrap();

    let url = config.url_for("organizations", Some("1"), Some("roles"), &Params::new());

    assert_eq!(url, "http://localhost:3000/api/1.0/organizations/1/roles.json");
}
