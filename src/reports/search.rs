use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ReportError;
use crate::document::DocumentStore;
use crate::filter::{Condition, Filter, FilterRequest, RuleTranslator};
use crate::pipeline::{helpers, Page, Pipeline, SortOrder};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub collection: String,
    #[serde(flatten)]
    pub filter: FilterRequest,
    pub company: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    #[serde(flatten)]
    pub page: Page<Value>,
    /// Pattern sources, for highlighting matches client side.
    pub patterns: Vec<String>,
}

pub fn search_pipeline(filter: Filter, company: Option<&str>, page: u64, limit: u64) -> Pipeline {
    let scope = company
        .map(|company| Filter::field("company", Condition::eq(company)))
        .unwrap_or_default();
    Pipeline::new()
        .match_filter(Filter::all_of(vec![scope, filter]))
        .stages(helpers::breadcrumbs("ou", "breadcrumbs"))
        .sort(vec![
            ("createdAt".to_string(), SortOrder::Desc),
            ("_id".to_string(), SortOrder::Asc),
        ])
        .stages(helpers::paginate(page, limit))
}

/// Rule-based search over any collection, with OU breadcrumbs resolved.
pub fn advanced_search<S: DocumentStore + ?Sized>(
    store: &S,
    translator: &RuleTranslator,
    query: &SearchQuery,
    page: u64,
    limit: u64,
) -> Result<SearchResults, ReportError> {
    let collection = query.collection.trim();
    if collection.is_empty() {
        return Err(ReportError::Invalid("collection is required".into()));
    }
    let translation = translator.translate(&query.filter);
    let pipeline = search_pipeline(translation.filter, query.company.as_deref(), page, limit);
    let output = store.aggregate(collection, &pipeline)?;
    let page = Page::from_facet(output, page, limit)?;
    tracing::debug!(collection, total = page.total, "advanced search");
    Ok(SearchResults {
        page,
        patterns: translation.patterns,
    })
}
