use mockito::{Matcher, Server};
use serde_json::json;
use twitch_community_playlist::api::twitch::TwitchClient;
use twitch_community_playlist::api::RedemptionSource;
use twitch_community_playlist::models::RedemptionStatus;

fn redemption(user: &str, input: serde_json::Value, status: &str) -> serde_json::Value {
    json!({
        "id": format!("{}-{}", user, status),
        "user_login": user,
        "user_name": user,
        "user_input": input,
        "status": status,
        "redeemed_at": "2024-05-01T18:30:00Z",
        "reward": { "id": "r1", "title": "Song Request Bot" }
    })
}

#[test]
fn broadcaster_lookup_sends_client_id_and_bearer() {
    let mut server = Server::new();
    let m = server
        .mock("GET", "/users")
        .match_query(Matcher::UrlEncoded("login".into(), "somechannel".into()))
        .match_header("client-id", "cid")
        .match_header("authorization", "Bearer user-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": [{ "id": "1234", "login": "somechannel" }] }).to_string())
        .create();

    let client = TwitchClient::new("cid".into(), "user-token".into()).with_api_base(server.url());
    let rt = tokio::runtime::Runtime::new().unwrap();
    let id = rt.block_on(client.get_broadcaster_id("somechannel")).unwrap();
    assert_eq!(id.as_deref(), Some("1234"));
    m.assert();
}

#[test]
fn unknown_broadcaster_is_none() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/users")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": [] }).to_string())
        .create();

    let client = TwitchClient::new("cid".into(), "tok".into()).with_api_base(server.url());
    let rt = tokio::runtime::Runtime::new().unwrap();
    assert!(rt.block_on(client.get_broadcaster_id("nobody")).unwrap().is_none());
}

#[test]
fn rewards_are_listed() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/channel_points/custom_rewards")
        .match_query(Matcher::UrlEncoded("broadcaster_id".into(), "1234".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({ "data": [
                { "id": "r0", "title": "Hydrate", "cost": 100 },
                { "id": "r1", "title": "Song Request Bot", "cost": 500 }
            ]})
            .to_string(),
        )
        .create();

    let client = TwitchClient::new("cid".into(), "tok".into()).with_api_base(server.url());
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rewards = rt.block_on(client.get_custom_rewards("1234")).unwrap();
    let titles: Vec<&str> = rewards.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Hydrate", "Song Request Bot"]);
}

#[test]
fn redemptions_follow_cursor_per_status_in_order() {
    let mut server = Server::new();
    let path = "/channel_points/custom_rewards/redemptions";

    let canceled_p1 = server
        .mock("GET", path)
        .match_query(Matcher::Exact(
            "broadcaster_id=1234&reward_id=r1&status=CANCELED&first=2".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": [
                    redemption("a", json!("spotify:track:aaa"), "CANCELED"),
                    redemption("b", json!("freebird"), "CANCELED")
                ],
                "pagination": { "cursor": "c1" }
            })
            .to_string(),
        )
        .create();
    let canceled_p2 = server
        .mock("GET", path)
        .match_query(Matcher::Exact(
            "broadcaster_id=1234&reward_id=r1&status=CANCELED&first=2&after=c1".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": [redemption("c", json!(null), "CANCELED")],
                "pagination": {}
            })
            .to_string(),
        )
        .create();
    let fulfilled = server
        .mock("GET", path)
        .match_query(Matcher::Exact(
            "broadcaster_id=1234&reward_id=r1&status=FULFILLED&first=2".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": [], "pagination": {} }).to_string())
        .create();
    let unfulfilled = server
        .mock("GET", path)
        .match_query(Matcher::Exact(
            "broadcaster_id=1234&reward_id=r1&status=UNFULFILLED&first=2".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "data": [redemption("d", json!("https://open.spotify.com/track/ddd"), "UNFULFILLED")],
                "pagination": {}
            })
            .to_string(),
        )
        .create();

    let client = TwitchClient::new("cid".into(), "tok".into())
        .with_api_base(server.url())
        .with_page_size(2);
    let rt = tokio::runtime::Runtime::new().unwrap();
    let records = rt
        .block_on(client.get_reward_redemptions("1234", "r1", &RedemptionStatus::ALL))
        .unwrap();

    let users: Vec<&str> = records.iter().map(|r| r.user_name.as_str()).collect();
    assert_eq!(users, vec!["a", "b", "c", "d"]);
    assert_eq!(records[2].user_input, "");
    assert_eq!(records[3].status, RedemptionStatus::Unfulfilled);

    canceled_p1.assert();
    canceled_p2.assert();
    fulfilled.assert();
    unfulfilled.assert();
}

#[test]
fn helix_error_is_propagated() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/channel_points/custom_rewards")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Forbidden","status":403,"message":"missing scope"}"#)
        .create();

    let client = TwitchClient::new("cid".into(), "tok".into()).with_api_base(server.url());
    let rt = tokio::runtime::Runtime::new().unwrap();
    let err = rt.block_on(client.get_custom_rewards("1234")).unwrap_err();
    let s = err.to_string();
    assert!(s.contains("403"));
    assert!(s.contains("missing scope"));
}
