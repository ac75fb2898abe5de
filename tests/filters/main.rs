//! Rule translation evaluated against documents.

use orgdesk::filter::{ArabicFolding, Filter, FilterExtras, FilterRequest, Operator, Rule, RuleTranslator};
use serde_json::{json, Value};

fn riyadh() -> Value {
    json!({
        "name": "Riyadh Branch",
        "type": "branch",
        "ou": "ou-1",
        "fields": [
            { "label": "Region", "data": "Central Riyadh" },
            { "label": "City", "data": "Riyadh" }
        ]
    })
}

fn jeddah() -> Value {
    json!({
        "name": "Jeddah Office",
        "type": "office",
        "ou": "ou-2",
        "fields": [
            { "label": "Region", "data": "Western" },
            { "label": "City", "data": "Jeddah" }
        ]
    })
}

fn matching(filter: &Filter) -> Vec<&'static str> {
    let mut names = Vec::new();
    if filter.matches(&riyadh()) {
        names.push("riyadh");
    }
    if filter.matches(&jeddah()) {
        names.push("jeddah");
    }
    names
}

fn rule(field: &str, operator: Operator, value: &str) -> FilterRequest {
    FilterRequest {
        rules: vec![Rule::new(field, operator, value)],
        ..FilterRequest::default()
    }
}

fn extras(extras: FilterExtras) -> FilterRequest {
    FilterRequest {
        rules: Vec::new(),
        extras,
    }
}

fn translate(request: &FilterRequest) -> Filter {
    RuleTranslator::default().translate(request).filter
}

#[test]
fn empty_request_matches_everything() {
    let filter = translate(&FilterRequest::default());
    assert!(filter.is_all());
    assert_eq!(matching(&filter), vec!["riyadh", "jeddah"]);
}

#[test]
fn equal_rule_is_case_insensitive_substring() {
    let filter = translate(&rule("Region", Operator::Equal, "riyadh"));
    assert_eq!(matching(&filter), vec!["riyadh"]);
}

#[test]
fn label_and_value_must_match_the_same_entry() {
    // Jeddah is the City, not the Region.
    let filter = translate(&rule("Region", Operator::Equal, "Jeddah"));
    assert!(matching(&filter).is_empty());

    let filter = translate(&rule("City", Operator::Equal, "Jeddah"));
    assert_eq!(matching(&filter), vec!["jeddah"]);
}

#[test]
fn not_contains_rule_excludes_any_term() {
    let filter = translate(&rule("Region", Operator::NotContains, "central north"));
    assert_eq!(matching(&filter), vec!["jeddah"]);
}

#[test]
fn contains_all_respects_term_order() {
    let filter = translate(&rule("Region", Operator::ContainsAll, "central riyadh"));
    assert_eq!(matching(&filter), vec!["riyadh"]);

    let filter = translate(&rule("Region", Operator::ContainsAll, "riyadh central"));
    assert!(matching(&filter).is_empty());
}

#[test]
fn contains_any_needs_one_term() {
    let filter = translate(&rule("City", Operator::ContainsAny, "dammam jeddah"));
    assert_eq!(matching(&filter), vec!["jeddah"]);
}

#[test]
fn free_text_searches_name_and_custom_fields() {
    let filter = translate(&extras(FilterExtras {
        like_any: Some("office western".into()),
        ..FilterExtras::default()
    }));
    assert_eq!(matching(&filter), vec!["jeddah"]);

    let filter = translate(&extras(FilterExtras {
        like_all: Some("branch".into()),
        ..FilterExtras::default()
    }));
    assert_eq!(matching(&filter), vec!["riyadh"]);
}

#[test]
fn same_word_rejects_partial_words() {
    let partial = translate(&extras(FilterExtras {
        same_word: Some("riyad".into()),
        ..FilterExtras::default()
    }));
    assert!(matching(&partial).is_empty());

    let whole = translate(&extras(FilterExtras {
        same_word: Some("riyadh".into()),
        ..FilterExtras::default()
    }));
    assert_eq!(matching(&whole), vec!["riyadh"]);
}

#[test]
fn free_text_exclusion_needs_one_clean_path() {
    // "Western" appears only in Jeddah's Region; its name still passes.
    let filter = translate(&extras(FilterExtras {
        not_contains: Some("western".into()),
        ..FilterExtras::default()
    }));
    assert_eq!(matching(&filter), vec!["riyadh", "jeddah"]);
}

#[test]
fn type_and_ou_are_exact() {
    let filter = translate(&extras(FilterExtras {
        kind: Some("office".into()),
        ..FilterExtras::default()
    }));
    assert_eq!(matching(&filter), vec!["jeddah"]);

    let filter = translate(&extras(FilterExtras {
        ou: Some("ou-1".into()),
        kind: Some("branch".into()),
        ..FilterExtras::default()
    }));
    assert_eq!(matching(&filter), vec!["riyadh"]);

    let filter = translate(&extras(FilterExtras {
        ou: Some("ou".into()),
        ..FilterExtras::default()
    }));
    assert!(matching(&filter).is_empty());
}

#[test]
fn metacharacters_in_values_match_literally() {
    let doc = json!({
        "name": "Head office",
        "fields": [{ "label": "Code", "data": "HQ (1.0)" }]
    });
    let filter = translate(&rule("Code", Operator::Equal, "(1.0)"));
    assert!(filter.matches(&doc));

    let filter = translate(&rule("Code", Operator::Equal, "(1x0)"));
    assert!(!filter.matches(&doc));
}

#[test]
fn letter_folding_matches_arabic_variants() {
    let doc = json!({ "name": "مدرسة أحمد", "fields": [] });
    let request = extras(FilterExtras {
        like_all: Some("مدرسه احمد".into()),
        ..FilterExtras::default()
    });

    let plain = RuleTranslator::default().translate(&request);
    assert!(!plain.filter.matches(&doc));

    let folded = RuleTranslator::new(ArabicFolding::LetterClasses).translate(&request);
    assert!(folded.filter.matches(&doc));
    assert_eq!(folded.patterns, vec!["مدرس[ةه].*[اأإآ]حمد".to_string()]);
}

#[test]
fn wire_request_combines_rules_and_extras() {
    let request: FilterRequest = serde_json::from_value(json!({
        "rules": [
            { "field": "City", "operator": "contains any", "value": "riyadh jeddah" },
            { "field": "Region", "operator": "equal", "value": "   " }
        ],
        "extras": { "type": "branch", "likeAll": "riyadh branch" }
    }))
    .unwrap();
    let translation = RuleTranslator::default().translate(&request);

    assert_eq!(translation.patterns, vec!["riyadh|jeddah", "riyadh.*branch"]);
    assert_eq!(matching(&translation.filter), vec!["riyadh"]);
}

#[test]
fn multi_line_values_match_across_lines() {
    let doc = json!({
        "name": "Notes",
        "fields": [{ "label": "Summary", "data": "red\ncar" }]
    });

    let filter = translate(&rule("Summary", Operator::ContainsAll, "red car"));
    assert!(filter.matches(&doc));
    assert_eq!(
        filter.to_document()["$and"][0]["fields"]["$elemMatch"]["data"]["$options"],
        "is"
    );

    let filter = translate(&rule("Summary", Operator::NotContains, "blue"));
    assert!(filter.matches(&doc));
}
