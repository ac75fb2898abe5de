use orgdesk::document::new_id;
use orgdesk::{reports, ReportError, StoreError};

use crate::support::Org;

#[test]
fn path_runs_from_root_to_unit() {
    let org = Org::new();
    assert_eq!(
        reports::ou_breadcrumbs(&org.store, &org.riyadh.id).unwrap(),
        vec!["HQ", "Central", "Riyadh"]
    );
    assert_eq!(reports::ou_breadcrumbs(&org.store, &org.hq.id).unwrap(), vec!["HQ"]);
}

#[test]
fn dangling_parent_truncates_the_path() {
    let org = Org::new();
    let mut orphan = orgdesk::domain::OrganizationalUnit::root("Orphan");
    orphan.parent = Some(new_id());
    org.insert(&orphan);

    assert_eq!(reports::ou_breadcrumbs(&org.store, &orphan.id).unwrap(), vec!["Orphan"]);
}

#[test]
fn unknown_and_malformed_ids() {
    let org = Org::new();
    assert!(matches!(
        reports::ou_breadcrumbs(&org.store, &new_id()),
        Err(ReportError::NotFound { .. })
    ));
    assert!(matches!(
        reports::ou_breadcrumbs(&org.store, "not-an-id"),
        Err(ReportError::Store(StoreError::InvalidId(_)))
    ));
}
