use orgdesk::document::new_id;
use orgdesk::domain::Announcement;
use orgdesk::{reports, Document, DocumentStore, ReportError};
use serde_json::json;

use crate::support::Org;

#[test]
fn responses_newest_first_with_user_context() {
    let org = Org::new();
    let mut announcement = Announcement::new("Policy update", "Please acknowledge");
    announcement.respond(&org.sara.id, "Agree", 1_000);
    announcement.respond(&org.omar.id, "Disagree", 2_000);
    org.insert(&announcement);

    let rows = reports::announcement_results(&org.store, &announcement.id).unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].user.as_deref(), Some("Omar"));
    assert_eq!(rows[0].response.as_deref(), Some("Disagree"));
    assert_eq!(rows[0].responded_at, Some(2_000));
    assert_eq!(rows[0].breadcrumbs, vec!["HQ", "Central"]);

    assert_eq!(rows[1].user.as_deref(), Some("Sara"));
    assert_eq!(rows[1].email.as_deref(), Some("sara@acme.test"));
    assert_eq!(rows[1].ou.as_deref(), Some(org.riyadh.id.as_str()));
    assert_eq!(rows[1].breadcrumbs, vec!["HQ", "Central", "Riyadh"]);
}

#[test]
fn response_from_deleted_user_is_kept() {
    let org = Org::new();
    let mut announcement = Announcement::new("Survey", "Quick question");
    announcement.respond(&new_id(), "Maybe", 500);
    org.insert(&announcement);

    let rows = reports::announcement_results(&org.store, &announcement.id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user, None);
    assert_eq!(rows[0].email, None);
    assert!(rows[0].breadcrumbs.is_empty());
    assert_eq!(rows[0].response.as_deref(), Some("Maybe"));
}

#[test]
fn announcement_without_responses_is_empty() {
    let org = Org::new();
    let announcement = Announcement::new("Quiet", "Nobody answered");
    org.insert(&announcement);

    assert!(reports::announcement_results(&org.store, &announcement.id)
        .unwrap()
        .is_empty());
}

#[test]
fn unknown_announcement_is_not_found() {
    let org = Org::new();
    assert!(matches!(
        reports::announcement_results(&org.store, &new_id()),
        Err(ReportError::NotFound { .. })
    ));
}

#[test]
fn responses_missing_fields_still_load() {
    let org = Org::new();
    let id = new_id();
    org.store
        .insert_document(
            Announcement::COLLECTION,
            json!({
                "_id": id,
                "name": "Legacy",
                "responses": [
                    { "user": org.sara.id, "respondedAt": 1_000 },
                    { "response": "Agree" }
                ]
            }),
        )
        .unwrap();

    let rows = reports::announcement_results(&org.store, &id).unwrap();
    assert_eq!(rows.len(), 2);
    let by_sara = rows.iter().find(|r| r.user.as_deref() == Some("Sara")).unwrap();
    assert_eq!(by_sara.response, None);
    assert_eq!(by_sara.responded_at, Some(1_000));
    let anonymous = rows.iter().find(|r| r.user.is_none()).unwrap();
    assert_eq!(anonymous.response.as_deref(), Some("Agree"));
    assert_eq!(anonymous.responded_at, None);
}
