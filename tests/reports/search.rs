use orgdesk::domain::{OrganizationalUnit, User};
use orgdesk::filter::{FilterExtras, FilterRequest, Operator, Rule};
use orgdesk::reports::{self, SearchQuery};
use orgdesk::{Document, ReportError, RuleTranslator};

use crate::support::{Org, COMPANY};

fn search(org: &Org, query: &SearchQuery, page: u64, limit: u64) -> reports::SearchResults {
    reports::advanced_search(&org.store, &RuleTranslator::default(), query, page, limit).unwrap()
}

#[test]
fn users_by_free_text_with_breadcrumbs() {
    let org = Org::new();
    let query = SearchQuery {
        collection: User::COLLECTION.into(),
        filter: FilterRequest {
            rules: Vec::new(),
            extras: FilterExtras {
                like_any: Some("sara tariq".into()),
                ..FilterExtras::default()
            },
        },
        company: Some(COMPANY.into()),
        ..SearchQuery::default()
    };

    let results = search(&org, &query, 1, 10);
    assert_eq!(results.patterns, vec!["sara|tariq"]);
    assert_eq!(results.page.total, 1);
    let sara = &results.page.items[0];
    assert_eq!(sara["_id"], org.sara.id.as_str());
    assert_eq!(sara["breadcrumbs"], serde_json::json!(["HQ", "Central", "Riyadh"]));
}

#[test]
fn units_by_custom_field_rule() {
    let org = Org::new();
    let query = SearchQuery {
        collection: OrganizationalUnit::COLLECTION.into(),
        filter: FilterRequest {
            rules: vec![Rule::new("Region", Operator::ContainsAll, "central riyadh")],
            ..FilterRequest::default()
        },
        ..SearchQuery::default()
    };

    let results = search(&org, &query, 1, 10);
    assert_eq!(results.page.total, 1);
    assert_eq!(results.page.items[0]["name"], "Riyadh");
}

#[test]
fn results_are_paginated_newest_first() {
    let org = Org::new();
    let query = SearchQuery {
        collection: User::COLLECTION.into(),
        ..SearchQuery::default()
    };

    let first = search(&org, &query, 1, 2);
    assert_eq!(first.page.total, 3);
    assert_eq!(first.page.pages, 2);
    let names: Vec<&str> = first.page.items.iter().filter_map(|u| u["name"].as_str()).collect();
    assert_eq!(names, vec!["Sara", "Omar"]);

    let second = search(&org, &query, 2, 2);
    assert_eq!(second.page.items[0]["name"], "Tariq");
    assert!(second.patterns.is_empty());
}

#[test]
fn collection_is_required() {
    let org = Org::new();
    let result = reports::advanced_search(
        &org.store,
        &RuleTranslator::default(),
        &SearchQuery::default(),
        1,
        10,
    );
    assert!(matches!(result, Err(ReportError::Invalid(_))));
}
