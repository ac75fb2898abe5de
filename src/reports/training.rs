use serde::{Deserialize, Serialize};

use super::ReportError;
use crate::document::{Document, DocumentStore};
use crate::domain::{Course, TrainingProgram};
use crate::filter::{Condition, Filter, FilterRequest, RuleTranslator};
use crate::pipeline::{helpers, Expr, Page, Pipeline, Projection, SortOrder, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Program,
    Course,
}

/// A program or standalone course in the training catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub kind: CatalogKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ou: Option<String>,
    pub course_count: u64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    #[serde(flatten)]
    pub filter: FilterRequest,
    pub company: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

fn company_scope(company: Option<&str>) -> Filter {
    company
        .map(|company| Filter::field("company", Condition::eq(company)))
        .unwrap_or_default()
}

/// Programs unioned with courses that belong to no program, filtered,
/// newest first. The rule translator's `type` extra selects `program` or
/// `course`. A program's course count is the number of courses pointing
/// back at it, so ids left behind by deleted courses are not counted.
pub fn catalog_pipeline(filter: Filter, company: Option<&str>, page: u64, limit: u64) -> Pipeline {
    let standalone_courses = Pipeline::new()
        .match_filter(Filter::all_of(vec![
            company_scope(company),
            Filter::field("program", Condition::Eq(serde_json::Value::Null)),
        ]))
        .add_fields(vec![
            ("type".to_string(), Expr::lit("course")),
            ("courseCount".to_string(), Expr::lit(0)),
        ]);

    Pipeline::new()
        .match_filter(company_scope(company))
        .stages(helpers::join_many(
            Course::COLLECTION,
            "_id",
            "program",
            "programCourses",
        ))
        .add_fields(vec![
            ("type".to_string(), Expr::lit("program")),
            ("courseCount".to_string(), Expr::size(Expr::field("programCourses"))),
        ])
        .stage(Stage::UnionWith {
            collection: Course::COLLECTION.to_string(),
            pipeline: standalone_courses,
        })
        .match_filter(filter)
        .sort(vec![
            ("createdAt".to_string(), SortOrder::Desc),
            ("_id".to_string(), SortOrder::Asc),
        ])
        .project(vec![
            ("kind".to_string(), Projection::Computed(Expr::field("type"))),
            ("title".to_string(), Projection::Computed(Expr::field("name"))),
            ("ou".to_string(), Projection::Include),
            ("courseCount".to_string(), Projection::Include),
            ("createdAt".to_string(), Projection::Include),
        ])
        .stages(helpers::paginate(page, limit))
}

pub fn training_catalog<S: DocumentStore + ?Sized>(
    store: &S,
    translator: &RuleTranslator,
    query: &CatalogQuery,
    page: u64,
    limit: u64,
) -> Result<Page<CatalogEntry>, ReportError> {
    let translation = translator.translate(&query.filter);
    let pipeline = catalog_pipeline(translation.filter, query.company.as_deref(), page, limit);
    let output = store.aggregate(TrainingProgram::COLLECTION, &pipeline)?;
    Ok(Page::from_facet(output, page, limit)?)
}
