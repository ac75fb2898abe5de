use serde_json::json;

use crate::support::{seed, send};

#[test]
fn refresh_rotates_the_token() {
    let (service, f) = seed();
    let issued = service.tokens().issue(&f.user.id);

    let envelope = send(&service, "auth.refresh", json!({ "refreshToken": issued }), &[]);
    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.data["user"], f.user.id.as_str());
    let rotated = envelope.data["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, issued);

    // The old token was consumed.
    let replay = send(&service, "auth.refresh", json!({ "refreshToken": issued }), &[]);
    assert_eq!(replay.status_code, 401);

    assert_eq!(service.tokens().owner(&rotated), Some(f.user.id.clone()));
}

#[test]
fn logout_revokes_once() {
    let (service, f) = seed();
    let token = service.tokens().issue(&f.user.id);

    let first = send(&service, "auth.logout", json!({ "refreshToken": token }), &[]);
    assert_eq!(first.data, json!({ "revoked": true }));
    let second = send(&service, "auth.logout", json!({ "refreshToken": token }), &[]);
    assert_eq!(second.data, json!({ "revoked": false }));

    let refresh = send(&service, "auth.refresh", json!({ "refreshToken": token }), &[]);
    assert_eq!(refresh.status_code, 401);
}

#[test]
fn token_is_required() {
    let (service, f) = seed();
    for command in ["auth.refresh", "auth.logout"] {
        let envelope = send(&service, command, json!({}), &[]);
        assert_eq!(envelope.status_code, 400, "{}", command);
    }
}
