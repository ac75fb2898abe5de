use orgdesk::document::new_id;
use orgdesk::domain::{now_millis, Notification};
use orgdesk::{reports, Document, DocumentStore, ReportError, StoreError};
use serde_json::json;

use crate::support::Org;

const HOUR: i64 = 60 * 60 * 1000;

struct Seeded {
    now: i64,
    direct: Notification,
    regional: Notification,
    old_broadcast: Notification,
}

fn seed(org: &Org) -> Seeded {
    let now = now_millis();
    let direct = Notification::to_user(&org.sara.id, "Welcome", "Hi Sara").created_at(now - HOUR);
    // Sara sits in Riyadh, below Central.
    let regional = Notification::to_ou(&org.central.id, "Town hall", "Central region")
        .created_at(now - 2 * HOUR);
    let foreign = Notification::to_ou(&org.elsewhere.id, "Elsewhere", "Not for acme")
        .created_at(now - 3 * HOUR);
    let old_broadcast =
        Notification::broadcast("Maintenance", "Last week").created_at(now - 48 * HOUR);
    let for_omar = Notification::to_user(&org.omar.id, "Hi Omar", "Private").created_at(now);

    for n in [&direct, &regional, &foreign, &old_broadcast, &for_omar] {
        org.insert(n);
    }
    Seeded {
        now,
        direct,
        regional,
        old_broadcast,
    }
}

fn query(org: &Org, now: i64, page: u64, limit: u64) -> reports::FeedQuery {
    reports::FeedQuery {
        user_id: org.sara.id.clone(),
        now,
        window_millis: 24 * HOUR,
        page,
        limit,
    }
}

#[test]
fn feed_covers_user_ancestor_units_and_broadcasts() {
    let org = Org::new();
    let seeded = seed(&org);

    let feed = reports::notification_feed(&org.store, &query(&org, seeded.now, 1, 10)).unwrap();
    let ids: Vec<&str> = feed.page.items.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            seeded.direct.id.as_str(),
            seeded.regional.id.as_str(),
            seeded.old_broadcast.id.as_str()
        ]
    );
    assert_eq!(feed.page.total, 3);
    assert_eq!(feed.unseen, 3);

    let new_flags: Vec<bool> = feed.page.items.iter().map(|n| n.is_new).collect();
    assert_eq!(new_flags, vec![true, true, false]);
    assert!(feed.page.items.iter().all(|n| !n.seen));
}

#[test]
fn marking_seen_updates_the_feed() {
    let org = Org::new();
    let seeded = seed(&org);

    assert!(reports::mark_seen(&org.store, &seeded.direct.id, &org.sara.id).unwrap());
    assert!(!reports::mark_seen(&org.store, &seeded.direct.id, &org.sara.id).unwrap());

    let feed = reports::notification_feed(&org.store, &query(&org, seeded.now, 1, 10)).unwrap();
    assert_eq!(feed.unseen, 2);
    let direct = &feed.page.items[0];
    assert!(direct.seen);
    assert!(!direct.is_new);

    // Other recipients are unaffected.
    let mut omar_query = query(&org, seeded.now, 1, 10);
    omar_query.user_id = org.omar.id.clone();
    let omar_feed = reports::notification_feed(&org.store, &omar_query).unwrap();
    assert!(omar_feed.page.items.iter().all(|n| !n.seen));
}

#[test]
fn feed_is_paginated() {
    let org = Org::new();
    let seeded = seed(&org);

    let first = reports::notification_feed(&org.store, &query(&org, seeded.now, 1, 2)).unwrap();
    assert_eq!(first.page.items.len(), 2);
    assert_eq!(first.page.total, 3);
    assert_eq!(first.page.pages, 2);

    let second = reports::notification_feed(&org.store, &query(&org, seeded.now, 2, 2)).unwrap();
    assert_eq!(second.page.items.len(), 1);
    assert_eq!(second.page.items[0].id, seeded.old_broadcast.id);
    assert_eq!(second.unseen, 3);
}

#[test]
fn user_without_unit_sees_direct_and_broadcast_only() {
    let org = Org::new();
    let seeded = seed(&org);
    let loner = orgdesk::domain::User::new("Loner", "loner@acme.test");
    org.insert(&loner);
    let mut q = query(&org, seeded.now, 1, 10);
    q.user_id = loner.id.clone();

    let feed = reports::notification_feed(&org.store, &q).unwrap();
    let ids: Vec<&str> = feed.page.items.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec![seeded.old_broadcast.id.as_str()]);
}

#[test]
fn mark_seen_errors() {
    let org = Org::new();
    assert!(matches!(
        reports::mark_seen(&org.store, &new_id(), &org.sara.id),
        Err(ReportError::NotFound { .. })
    ));
    assert!(matches!(
        reports::mark_seen(&org.store, "bogus", &org.sara.id),
        Err(ReportError::Store(StoreError::InvalidId(_)))
    ));
}

#[test]
fn unknown_user_has_no_feed() {
    let org = Org::new();
    let mut q = query(&org, now_millis(), 1, 10);
    q.user_id = new_id();
    assert!(matches!(
        reports::notification_feed(&org.store, &q),
        Err(ReportError::NotFound { .. })
    ));
}

#[test]
fn notifications_missing_name_or_timestamp_still_load() {
    let org = Org::new();
    let id = new_id();
    org.store
        .insert_document(
            Notification::COLLECTION,
            json!({ "_id": id, "user": org.sara.id, "body": "No title" }),
        )
        .unwrap();

    let feed = reports::notification_feed(&org.store, &query(&org, now_millis(), 1, 10)).unwrap();
    assert_eq!(feed.page.total, 1);
    let item = &feed.page.items[0];
    assert_eq!(item.id, id);
    assert_eq!(item.name, "");
    assert_eq!(item.created_at, 0);
    assert!(!item.is_new);
    assert_eq!(feed.unseen, 1);
}
