//! Endpoint tests for the windowed analytics API against a mocked upstream.

mod helpers;

use axum::http::StatusCode;
use helpers::{engagement, get_json, mount_auth, mount_insights, user};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_popular_posts_ranks_and_pages() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_insights(
        &server,
        json!([
            engagement("e1", "u1", "solid", (5, 3, 2, 100)), // total 10, rate 10.0
            engagement("e2", "u2", "viral", (40, 5, 5, 200)), // total 50, rate 25.0
            engagement("e3", "u3", "quiet", (1, 0, 0, 50)),  // total 1, rate 2.0
        ]),
    )
    .await;

    let router = helpers::router(&server);
    let (status, body) =
        get_json(&router, "/api/analytics/popular-posts?period=week&limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"], "week");
    assert_eq!(body["count"], 2);

    let posts = body["posts"].as_array().expect("posts array");
    assert_eq!(posts[0]["postId"], "e2");
    assert_eq!(posts[0]["totalEngagements"], 50);
    assert_eq!(posts[0]["engagementRate"], 25.0);
    assert_eq!(posts[1]["postId"], "e1");

    // Average over the returned page only: (25.0 + 10.0) / 2.
    assert_eq!(body["averageEngagementRate"], 17.5);
}

#[tokio::test]
async fn test_popular_posts_forwards_user_filter() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    Mock::given(method("GET"))
        .and(path("/insights/posts"))
        .and(query_param("userId", "u7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/analytics/popular-posts?userId=u7").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"], "week", "config default applies");
    assert_eq!(body["count"], 0);
    assert_eq!(body["averageEngagementRate"], 0.0);
}

#[tokio::test]
async fn test_popular_posts_rejects_unknown_period() {
    let server = MockServer::start().await;
    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/analytics/popular-posts?period=decade").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PERIOD");
    let message = body["error"]["message"].as_str().expect("message");
    assert!(message.contains("decade"));
    assert!(message.contains("day, week, month, year, all"));
}

#[tokio::test]
async fn test_trending_topics_rejects_out_of_range_limit() {
    let server = MockServer::start().await;
    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/analytics/trending-topics?limit=101").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_LIMIT");
    assert!(
        body["error"]["message"]
            .as_str()
            .expect("message")
            .contains("1-100")
    );
}

#[tokio::test]
async fn test_trending_topics_weights_by_engagement() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_insights(
        &server,
        json!([
            engagement("e1", "u1", "great day #sunny #sunny @bob", (5, 3, 2, 100)), // weight 10
            engagement("e2", "u2", "cloudy #sunny", (1, 1, 1, 10)),                 // weight 3
        ]),
    )
    .await;

    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/analytics/trending-topics?period=day").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"], "day");
    assert_eq!(body["count"], 2);

    let topics = body["topics"].as_array().expect("topics array");
    assert_eq!(topics[0]["text"], "#sunny");
    assert_eq!(topics[0]["kind"], "hashtag");
    assert_eq!(topics[0]["count"], 3, "every occurrence counts");
    assert_eq!(topics[0]["engagementScore"], 23, "10 + 10 + 3");
    assert_eq!(topics[1]["text"], "@bob");
    assert_eq!(topics[1]["kind"], "mention");
    assert_eq!(topics[1]["count"], 1);
    assert_eq!(topics[1]["engagementScore"], 10);
}

#[tokio::test]
async fn test_user_engagement_standing() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user("u1", "Ada")))
        .mount(&server)
        .await;
    mount_insights(
        &server,
        json!([
            engagement("e1", "u1", "mine", (5, 3, 2, 100)), // u1 rate 10.0
            engagement("e2", "u2", "low", (2, 0, 0, 100)),  // rate 2.0
            engagement("e3", "u3", "high", (10, 1, 1, 100)), // rate 12.0
        ]),
    )
    .await;

    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/analytics/users/u1/engagement").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], "u1");
    assert_eq!(body["userName"], "Ada");
    assert_eq!(body["period"], "month", "config default applies");
    assert_eq!(body["engagementRate"], 10.0);
    assert_eq!(body["postCount"], 1);
    // Other authors sit at 2.0 and 12.0; one of two reaches 10.0.
    assert_eq!(body["percentile"], 50.0);
    // Platform-wide: (10 + 2 + 12) engagements over 300 views = 8.0.
    assert_eq!(body["platformRate"], 8.0);
    assert_eq!(body["comparison"], 25.0);
}

#[tokio::test]
async fn test_user_engagement_unknown_user() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/analytics/users/ghost/engagement").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(
        body["error"]["message"]
            .as_str()
            .expect("message")
            .contains("ghost")
    );
}

#[tokio::test]
async fn test_insights_failure_maps_to_bad_gateway() {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    Mock::given(method("GET"))
        .and(path("/insights/posts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/analytics/popular-posts").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPSTREAM_UNAVAILABLE");
}
