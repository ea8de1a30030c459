#![allow(clippy::unwrap_used)]
// Integration tests for `CardService` against a mocked server.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use favorcard_api::ApiClient;
use favorcard_core::{
    CardAction, CardService, CoreError, InviteState, MemorySessionStore, NewCard,
    ProfileUpdate, RemainingTime, SessionStore,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

fn token(s: &str) -> SecretString {
    SecretString::from(s.to_owned())
}

async fn setup(
    saved: Option<&str>,
) -> (MockServer, CardService<Arc<MemorySessionStore>>, Arc<MemorySessionStore>) {
    let server = MockServer::start().await;
    let api = ApiClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());
    let store = Arc::new(match saved {
        Some(t) => MemorySessionStore::with_token(token(t)),
        None => MemorySessionStore::new(),
    });
    let service = CardService::new(api, Arc::clone(&store));
    (server, service, store)
}

fn card(id: u64, title: &str, expires_at: Option<&str>, owner: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "one favor",
        "status": "active",
        "expires_at": expires_at,
        "updated_at": "2025-12-01T00:00:00Z",
        "creator": { "id": 1, "username": "alice", "nickname": "Alice" },
        "owner": { "username": owner }
    })
}

async fn mount_created(server: &MockServer, cards: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cards": cards })))
        .mount(server)
        .await;
}

/// A keyring that can neither read nor write, as on a headless box
/// without a secret service.
struct BrokenKeyring;

impl SessionStore for BrokenKeyring {
    fn get(&self) -> Result<Option<SecretString>, CoreError> {
        Err(CoreError::Session {
            message: "keyring: Platform secure storage failure".into(),
        })
    }

    fn set(&self, _token: &SecretString) -> Result<(), CoreError> {
        Err(CoreError::Session {
            message: "keyring: Platform secure storage failure".into(),
        })
    }

    fn clear(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_saved_token_is_restored() {
    let (server, service, _) = setup(Some("saved-tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("authorization", "Bearer saved-tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "username": "alice", "nickname": "Alice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(service.is_logged_in());
    let profile = service.profile().await.unwrap();
    assert_eq!(profile.display_name, "Alice");
    // Cached after the first fetch.
    assert_eq!(service.viewer().await.unwrap(), "alice");
}

#[tokio::test]
async fn test_login_persists_token() {
    let (server, service, store) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh",
            "user": { "id": 1, "username": "alice" }
        })))
        .mount(&server)
        .await;

    let profile = service.login("alice", &token("pw")).await.unwrap();
    assert_eq!(profile.username, "alice");
    assert_eq!(store.get().unwrap().unwrap().expose_secret(), "fresh");
    assert_eq!(service.viewer().await.unwrap(), "alice");
}

#[tokio::test]
async fn test_unauthorized_clears_session() {
    let (server, service, store) = setup(Some("stale")).await;

    Mock::given(method("GET"))
        .and(path("/api/cards"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "token expired" })))
        .mount(&server)
        .await;

    let err = service.created(now()).await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert!(store.get().unwrap().is_none());
    assert!(!service.is_logged_in());

    // Without a token the next call fails locally.
    let err = service.created(now()).await.unwrap_err();
    assert!(matches!(err, CoreError::NotLoggedIn));
}

#[tokio::test]
async fn test_logout_clears_store() {
    let (_server, service, store) = setup(Some("tok")).await;
    service.logout().unwrap();
    assert!(store.get().unwrap().is_none());
    assert!(!service.is_logged_in());
}

#[tokio::test]
async fn test_broken_keyring_still_allows_login() {
    let server = MockServer::start().await;
    let api = ApiClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap());
    let service = CardService::new(api, BrokenKeyring);
    assert!(!service.is_logged_in());

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh",
            "user": { "id": 1, "username": "alice" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "username": "alice", "nickname": "Alice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = service.login("alice", &token("pw")).await.unwrap();
    assert_eq!(profile.username, "alice");
    assert!(service.is_logged_in());

    // The token is kept in memory for the rest of the run.
    let profile = service.profile().await.unwrap();
    assert_eq!(profile.display_name, "Alice");
}

#[tokio::test]
async fn test_register_persists_token() {
    let (server, service, store) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .and(body_json(json!({
            "username": "dora",
            "email": "dora@example.com",
            "nickname": "Dora",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "new-tok",
            "user": { "id": 8, "username": "dora", "nickname": "Dora" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = service
        .register("dora", "dora@example.com", Some("Dora"), &token("pw"))
        .await
        .unwrap();
    assert_eq!(profile.display_name, "Dora");
    assert_eq!(store.get().unwrap().unwrap().expose_secret(), "new-tok");
    assert_eq!(service.viewer().await.unwrap(), "dora");
}

#[tokio::test]
async fn test_register_rejects_bad_input_without_request() {
    let (server, service, store) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let err = service
        .register("  ", "dora@example.com", None, &token("pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));

    let err = service
        .register("dora", "not-an-email", None, &token("pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));

    assert!(store.get().unwrap().is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Cards ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_created_cards_are_grouped() {
    let (server, service, _) = setup(Some("tok")).await;
    let service = service.with_viewer("alice");

    mount_created(
        &server,
        json!([
            card(3, "Coffee", Some("2026-01-05T00:00:00Z"), "alice"),
            card(4, "Hug", None, "alice"),
            card(5, "Coffee", Some("2026-01-02T12:00:00Z"), "alice"),
        ]),
    )
    .await;

    let tiles = service.created(now()).await.unwrap();

    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles[0].title, "Coffee");
    assert_eq!(tiles[0].id, "5");
    assert_eq!(tiles[0].count, 2);
    assert_eq!(tiles[0].remaining, Some(RemainingTime::Days(1)));
    assert!(tiles[0].actions.contains(CardAction::Delete));
    assert_eq!(tiles[1].title, "Hug");
    assert_eq!(tiles[1].remaining, None);
}

#[tokio::test]
async fn test_create_reloads_created_list() {
    let (server, service, _) = setup(Some("tok")).await;
    let service = service.with_viewer("alice");

    Mock::given(method("POST"))
        .and(path("/api/cards"))
        .and(body_json(json!({
            "title": "Coffee",
            "description": "one favor",
            "expires_at": "2026-01-03T00:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "card": card(9, "Coffee", None, "alice") })))
        .expect(1)
        .mount(&server)
        .await;
    mount_created(&server, json!([card(9, "Coffee", Some("2026-01-03T00:00:00Z"), "alice")])).await;

    let tiles = service
        .create(
            NewCard {
                title: "  Coffee ".into(),
                description: "one favor".into(),
                expires_at: Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).single(),
            },
            now(),
        )
        .await
        .unwrap();

    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].id, "9");
}

#[tokio::test]
async fn test_create_rejects_past_expiry_without_request() {
    let (_server, service, _) = setup(Some("tok")).await;

    let err = service
        .create(
            NewCard {
                title: "Coffee".into(),
                description: String::new(),
                expires_at: Some(now()),
            },
            now(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

#[tokio::test]
async fn test_copy_recreates_matching_card() {
    let (server, service, _) = setup(Some("tok")).await;
    let service = service.with_viewer("alice");

    mount_created(&server, json!([card(3, "Coffee", Some("2026-01-05T00:00:00Z"), "bob")])).await;
    Mock::given(method("POST"))
        .and(path("/api/cards"))
        .and(body_json(json!({
            "title": "Coffee",
            "description": "one favor",
            "expires_at": "2026-01-05T00:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    service.copy("3", now()).await.unwrap();
}

#[tokio::test]
async fn test_copy_unknown_card_is_not_found() {
    let (server, service, _) = setup(Some("tok")).await;
    let service = service.with_viewer("alice");
    mount_created(&server, json!([])).await;

    let err = service.copy("42", now()).await.unwrap_err();
    assert!(matches!(err, CoreError::NotFound { ref identifier, .. } if identifier == "42"));
}

#[tokio::test]
async fn test_send_reloads_created_list() {
    let (server, service, _) = setup(Some("tok")).await;
    let service = service.with_viewer("alice");

    Mock::given(method("POST"))
        .and(path("/api/cards/3/send"))
        .and(body_json(json!({ "to_username": "bob" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "card": card(3, "Coffee", None, "bob") })))
        .expect(1)
        .mount(&server)
        .await;
    mount_created(&server, json!([card(3, "Coffee", None, "bob")])).await;

    let tiles = service.send("3", " bob ", now()).await.unwrap();

    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].owner, "bob");
    // Given away: the creator can no longer delete it.
    assert!(!tiles[0].actions.contains(CardAction::Delete));
}

#[tokio::test]
async fn test_send_without_recipient_is_rejected_locally() {
    let (server, service, _) = setup(Some("tok")).await;

    let err = service.send("3", "  ", now()).await.unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_reloads_created_list() {
    let (server, service, _) = setup(Some("tok")).await;
    let service = service.with_viewer("alice");

    Mock::given(method("POST"))
        .and(path("/api/cards/3/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted", "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    mount_created(&server, json!([card(4, "Hug", None, "alice")])).await;

    let tiles = service.delete("3", now()).await.unwrap();

    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].id, "4");
}

#[tokio::test]
async fn test_use_reloads_received_list() {
    let (server, service, _) = setup(Some("tok")).await;
    let service = service.with_viewer("bob");

    let mut used = card(7, "Tea", None, "bob");
    used["status"] = json!("used");
    Mock::given(method("POST"))
        .and(path("/api/cards/7/use"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "card": used.clone() })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cards/received"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cards": [used] })))
        .expect(1)
        .mount(&server)
        .await;

    let tiles = service.use_card("7", now()).await.unwrap();

    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].id, "7");
    assert_eq!(tiles[0].status_label, "Used");
    assert!(tiles[0].actions.is_empty());
}

#[tokio::test]
async fn test_use_rejected_by_server() {
    let (server, service, _) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/api/cards/3/use"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "card is not active" })))
        .mount(&server)
        .await;

    let err = service.use_card("3", now()).await.unwrap_err();
    assert!(matches!(err, CoreError::Rejected { ref message } if message == "card is not active"));
}

#[tokio::test]
async fn test_stats_counts_both_lists() {
    let (server, service, _) = setup(Some("tok")).await;

    let mut used = card(2, "Hug", None, "alice");
    used["status"] = json!("used");
    mount_created(&server, json!([card(1, "Coffee", None, "bob"), used])).await;

    let mut received_used = card(7, "Tea", None, "alice");
    received_used["status"] = json!("used");
    Mock::given(method("GET"))
        .and(path("/api/cards/received"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cards": [received_used] })))
        .mount(&server)
        .await;

    let stats = service.stats().await.unwrap();
    assert_eq!((stats.created, stats.received, stats.used), (2, 1, 2));
}

// ── Friends / profile ───────────────────────────────────────────────

#[tokio::test]
async fn test_short_friend_search_is_rejected_locally() {
    let (_server, service, _) = setup(Some("tok")).await;
    let err = service.search_friends(" a ").await.unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

#[tokio::test]
async fn test_friend_search_maps_states() {
    let (server, service, _) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/users/friends/search"))
        .and(query_param("q", "ca"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [
                { "user": { "id": 3, "username": "carol" }, "invited": "default" },
                { "user": { "id": 4, "username": "cami" }, "invited": "pending" }
            ]
        })))
        .mount(&server)
        .await;

    let found = service.search_friends("ca").await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found[0].state.can_invite());
    assert!(!found[1].state.can_invite());
}

#[tokio::test]
async fn test_user_search_lists_all_users() {
    let (server, service, _) = setup(Some("tok")).await;

    let err = service.search_users("c").await.unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));

    Mock::given(method("GET"))
        .and(path("/api/users/search"))
        .and(query_param("q", "car"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "id": 3, "username": "carol", "nickname": "Carol" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = service.search_users(" car ").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "3");
    assert_eq!(found[0].display_name, "Carol");
}

#[tokio::test]
async fn test_invite_lists_map_states() {
    let (server, service, _) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/users/friends/myInvite/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [
                { "user": { "id": 3, "username": "carol" }, "invited": "accepted" },
                { "user": { "id": 4, "username": "cami" }, "invited": "rejected" }
            ]
        })))
        .mount(&server)
        .await;
    // Bare users with no state are pending invitations.
    Mock::given(method("GET"))
        .and(path("/api/users/friends/inviteMy/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "id": 5, "username": "dave" }]
        })))
        .mount(&server)
        .await;

    let sent = service.sent_invites().await.unwrap();
    assert_eq!(
        sent.iter().map(|c| c.state).collect::<Vec<_>>(),
        vec![InviteState::Accepted, InviteState::Rejected]
    );

    let received = service.received_invites().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].user.username, "dave");
    assert_eq!(received[0].state, InviteState::Pending);
}

#[tokio::test]
async fn test_invite_and_accept_return_server_message() {
    let (server, service, _) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/api/users/friends/5/invite"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "invitation sent", "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users/friends/6/accept"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(service.invite("5").await.unwrap().as_deref(), Some("invitation sent"));
    assert_eq!(service.accept("6").await.unwrap(), None);
}

#[tokio::test]
async fn test_update_profile_rejects_same_email() {
    let (server, service, _) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "username": "alice", "email": "a@example.com"
        })))
        .mount(&server)
        .await;

    let err = service
        .update_profile(ProfileUpdate {
            email: Some("a@example.com".into()),
            nickname: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
}

#[tokio::test]
async fn test_update_profile_posts_user() {
    let (server, service, _) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "username": "alice", "email": "a@example.com"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/user/1/update"))
        .and(body_json(json!({
            "user": { "id": "1", "username": "alice", "nickname": null, "email": "new@example.com" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "updated" })))
        .expect(1)
        .mount(&server)
        .await;

    service
        .update_profile(ProfileUpdate {
            email: Some("new@example.com".into()),
            nickname: None,
        })
        .await
        .unwrap();
}
