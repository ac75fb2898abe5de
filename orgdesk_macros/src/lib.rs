mod document;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Document)] derive macro
// ============================================================================

/// Derive macro for the `Document` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Document)]
/// struct Quiz {
///     #[serde(rename = "_id")]
///     pub id: String,
///     pub name: String,
/// }
/// // Quiz::COLLECTION == "quizzes"
/// ```
///
/// - The collection defaults to the snake_case type name in plural form
///   (`OrganizationalUnit` is stored in `organizational_units`).
///   `#[document(collection = "...")]` overrides it.
/// - The id is the field serde renames to `_id`. Without one, a field
///   marked `#[document(id)]`, then a field named `id`.
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}
