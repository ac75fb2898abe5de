use orgdesk::domain::{Course, TrainingProgram};
use orgdesk::filter::{FilterExtras, FilterRequest};
use orgdesk::reports::{self, CatalogKind, CatalogQuery};
use orgdesk::RuleTranslator;

use crate::support::{Org, COMPANY};

struct Catalog {
    safety: TrainingProgram,
    leadership: TrainingProgram,
    excel: Course,
}

fn seed(org: &Org) -> Catalog {
    let mut safety = TrainingProgram::new("Safety program");
    let mut fire = Course::new("Fire drills");
    let mut first_aid = Course::new("First aid");
    safety.add_course(&mut fire);
    safety.add_course(&mut first_aid);
    let leadership = TrainingProgram::new("Leadership track");
    let excel = Course::new("Spreadsheets 101");
    let foreign = Course::new("Globex onboarding");

    let mut programs = [safety, leadership];
    for (program, created_at) in programs.iter_mut().zip([3_000, 1_000]) {
        program.company = Some(COMPANY.into());
        program.created_at = created_at;
    }
    let mut courses = [fire, first_aid, excel, foreign];
    for (course, created_at) in courses.iter_mut().zip([500, 600, 2_000, 4_000]) {
        course.company = Some(COMPANY.into());
        course.created_at = created_at;
    }
    courses[3].company = Some("globex".into());

    for program in &programs {
        org.insert(program);
    }
    for course in &courses {
        org.insert(course);
    }
    let [safety, leadership] = programs;
    let [_, _, excel, _] = courses;
    Catalog {
        safety,
        leadership,
        excel,
    }
}

fn catalog(org: &Org, query: &CatalogQuery) -> orgdesk::Page<reports::CatalogEntry> {
    reports::training_catalog(&org.store, &RuleTranslator::default(), query, 1, 10).unwrap()
}

fn scoped(extras: FilterExtras) -> CatalogQuery {
    CatalogQuery {
        filter: FilterRequest {
            rules: Vec::new(),
            extras,
        },
        company: Some(COMPANY.into()),
        ..CatalogQuery::default()
    }
}

#[test]
fn programs_and_standalone_courses_newest_first() {
    let org = Org::new();
    let seeded = seed(&org);

    let page = catalog(&org, &scoped(FilterExtras::default()));
    assert_eq!(page.total, 3);
    let ids: Vec<&str> = page.items.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![seeded.safety.id.as_str(), seeded.excel.id.as_str(), seeded.leadership.id.as_str()]
    );

    assert_eq!(page.items[0].kind, CatalogKind::Program);
    assert_eq!(page.items[0].title, "Safety program");
    assert_eq!(page.items[0].course_count, 2);
    assert_eq!(page.items[1].kind, CatalogKind::Course);
    assert_eq!(page.items[1].course_count, 0);
}

#[test]
fn type_extra_selects_one_kind() {
    let org = Org::new();
    let seeded = seed(&org);

    let page = catalog(
        &org,
        &scoped(FilterExtras {
            kind: Some("course".into()),
            ..FilterExtras::default()
        }),
    );
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, seeded.excel.id);
}

#[test]
fn free_text_narrows_the_catalog() {
    let org = Org::new();
    let seeded = seed(&org);

    let page = catalog(
        &org,
        &scoped(FilterExtras {
            like_any: Some("leadership spreadsheets".into()),
            ..FilterExtras::default()
        }),
    );
    let ids: Vec<&str> = page.items.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![seeded.excel.id.as_str(), seeded.leadership.id.as_str()]);
}

#[test]
fn unscoped_catalog_spans_companies() {
    let org = Org::new();
    seed(&org);

    let page = catalog(&org, &CatalogQuery::default());
    assert_eq!(page.total, 4);
    assert_eq!(page.items[0].title, "Globex onboarding");
}

#[test]
fn course_count_ignores_ids_of_deleted_courses() {
    let org = Org::new();
    let mut program = TrainingProgram::new("Onboarding");
    let mut kept = Course::new("Welcome");
    let mut dropped = Course::new("Old policies");
    program.add_course(&mut kept);
    program.add_course(&mut dropped);
    program.company = Some(COMPANY.into());
    kept.company = Some(COMPANY.into());
    org.insert(&program);
    org.insert(&kept);

    let page = catalog(&org, &scoped(FilterExtras::default()));
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, program.id);
    assert_eq!(page.items[0].course_count, 1);
}
