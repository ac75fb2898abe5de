use orgdesk::document::new_id;
use serde_json::{json, Value};

use crate::support::{seed, send};

#[test]
fn compose_registers_every_command() {
    let (service, f) = seed();
    assert_eq!(
        service.commands(),
        vec![
            "announcement.results",
            "assessment.excel_data",
            "auth.logout",
            "auth.refresh",
            "notification.feed",
            "notification.mark_seen",
            "ou.breadcrumbs",
            "search.advanced",
            "survey.excel_data",
            "training.catalog",
        ]
    );
}

#[test]
fn breadcrumbs_envelope() {
    let (service, f) = seed();
    let envelope = send(&service, "ou.breadcrumbs", json!({ "ou": f.branch.id }), &[]);
    assert!(envelope.is_success());
    assert_eq!(envelope.message, "OK");
    assert_eq!(
        envelope.data,
        json!({ "ou": f.branch.id, "breadcrumbs": ["HQ", "Branch"] })
    );
}

#[test]
fn failures_carry_status_and_message() {
    let (service, f) = seed();
    let cases = [
        ("ou.breadcrumbs", json!({}), 400),
        ("ou.breadcrumbs", json!({ "ou": "nope" }), 400),
        ("ou.breadcrumbs", json!({ "ou": new_id() }), 404),
        ("announcement.results", json!({ "announcement": new_id() }), 404),
        ("survey.excel_data", json!({ "quiz": f.quiz.id }), 404),
        ("search.advanced", json!({ "collection": "  " }), 400),
        ("no.such.command", json!({}), 404),
    ];
    for (command, input, status) in cases {
        let envelope = send(&service, command, input, &[]);
        assert_eq!(envelope.status_code, status, "{}", command);
        assert_eq!(envelope.data, Value::Null);
        assert!(!envelope.message.is_empty());
    }
}

#[test]
fn announcement_results_rows() {
    let (service, f) = seed();
    let envelope = send(
        &service,
        "announcement.results",
        json!({ "announcement": f.announcement.id }),
        &[],
    );
    assert_eq!(envelope.status_code, 200);
    let rows = envelope.data.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user"], "Layla");
    assert_eq!(rows[0]["response"], "Agree");
    assert_eq!(rows[0]["breadcrumbs"], json!(["HQ", "Branch"]));
}

#[test]
fn assessment_export_is_scored() {
    let (service, f) = seed();
    let envelope = send(&service, "assessment.excel_data", json!({ "quiz": f.quiz.id }), &[]);
    assert_eq!(envelope.status_code, 200);
    let row = &envelope.data["rows"][0];
    assert_eq!(row["user"], "Layla");
    assert_eq!(row["score"]["percentage"], 100.0);
    assert_eq!(envelope.data["type"], "assessment");
}

#[test]
fn feed_requires_a_user() {
    let (service, f) = seed();
    let envelope = send(&service, "notification.feed", Value::Null, &[]);
    assert_eq!(envelope.status_code, 401);
}

#[test]
fn feed_and_mark_seen() {
    let (service, f) = seed();
    let session = [("x-user-id", f.user.id.as_str())];

    let feed = send(&service, "notification.feed", Value::Null, &session);
    assert_eq!(feed.status_code, 200);
    assert_eq!(feed.data["total"], 1);
    assert_eq!(feed.data["unseen"], 1);
    assert_eq!(feed.data["items"][0]["_id"], f.notification.id.as_str());
    assert_eq!(feed.data["items"][0]["isNew"], true);

    let marked = send(
        &service,
        "notification.mark_seen",
        json!({ "notification": f.notification.id }),
        &session,
    );
    assert_eq!(
        marked.data,
        json!({ "notification": f.notification.id, "marked": true })
    );

    let feed = send(&service, "notification.feed", json!({ "page": 1 }), &session);
    assert_eq!(feed.data["unseen"], 0);
    assert_eq!(feed.data["items"][0]["seen"], true);
}

#[test]
fn tenant_header_scopes_search() {
    let (service, f) = seed();
    let input = json!({
        "collection": "users",
        "company": "acme",
        "extras": { "likeAny": "layla" }
    });

    let own = send(&service, "search.advanced", input.clone(), &[("x-tenant-id", "acme")]);
    assert_eq!(own.data["total"], 1);
    assert_eq!(own.data["patterns"], json!(["layla"]));

    // The session tenant wins over the requested company.
    let other = send(&service, "search.advanced", input, &[("x-tenant-id", "globex")]);
    assert_eq!(other.status_code, 200);
    assert_eq!(other.data["total"], 0);
}

#[test]
fn unknown_rule_operator_is_a_decode_failure() {
    let (service, f) = seed();
    let envelope = send(
        &service,
        "search.advanced",
        json!({
            "collection": "users",
            "rules": [{ "field": "Region", "operator": "starts with", "value": "x" }]
        }),
        &[],
    );
    assert_eq!(envelope.status_code, 400);
}

#[test]
fn empty_catalog_page() {
    let (service, f) = seed();
    let envelope = send(&service, "training.catalog", Value::Null, &[]);
    assert_eq!(envelope.status_code, 200);
    assert_eq!(envelope.data["total"], 0);
    assert_eq!(envelope.data["items"], json!([]));
    assert_eq!(envelope.data["limit"], 10);
}
