//! `#[derive(Document)]`: binds a struct to its store collection and the
//! field holding its `_id`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, LitStr};

pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    expand(&input).unwrap_or_else(|err| err.to_compile_error().into())
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let collection = match collection_override(&input.attrs)? {
        Some(collection) => collection,
        None => collection_name(&name.to_string()),
    };
    let id_field = id_field(input)?;

    let expanded = quote! {
        impl orgdesk::Document for #name {
            const COLLECTION: &'static str = #collection;

            fn id(&self) -> &str {
                &self.#id_field
            }
        }
    };
    Ok(expanded.into())
}

/// `#[document(collection = "...")]` on the struct.
fn collection_override(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut collection = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("document")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `collection = \"...\"`"))
            }
        })?;
    }
    Ok(collection)
}

/// The field stored as `_id`.
///
/// Resolution order: the field serde renames to `_id`, then a field marked
/// `#[document(id)]`, then a field named `id`.
fn id_field(input: &DeriveInput) -> syn::Result<Ident> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Document derive needs a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Document derive only supports structs",
            ))
        }
    };

    let named: Vec<(&Ident, &Field)> = fields
        .iter()
        .filter_map(|field| field.ident.as_ref().map(|ident| (ident, field)))
        .collect();

    for (ident, field) in &named {
        if serde_renamed_to_id(field)? {
            return Ok((*ident).clone());
        }
    }
    for (ident, field) in &named {
        if marked_as_id(field)? {
            return Ok((*ident).clone());
        }
    }
    named
        .iter()
        .find(|(ident, _)| *ident == "id")
        .map(|(ident, _)| (*ident).clone())
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Document derive: no field renamed to `_id`, marked #[document(id)] or named `id`",
            )
        })
}

/// `#[serde(rename = "_id")]`. Other serde keys are left for serde to check.
fn serde_renamed_to_id(field: &Field) -> syn::Result<bool> {
    let mut renamed = false;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                let value: LitStr = meta.value()?.parse()?;
                renamed |= value.value() == "_id";
            } else if meta.input.peek(syn::Token![=]) {
                meta.value()?.parse::<syn::Expr>()?;
            } else if meta.input.peek(syn::token::Paren) {
                meta.parse_nested_meta(|nested| {
                    if nested.input.peek(syn::Token![=]) {
                        nested.value()?.parse::<syn::Expr>()?;
                    }
                    Ok(())
                })?;
            }
            Ok(())
        })?;
    }
    Ok(renamed)
}

fn marked_as_id(field: &Field) -> syn::Result<bool> {
    let mut is_id = false;
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("document")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                is_id = true;
                Ok(())
            } else {
                Err(meta.error("expected `id`"))
            }
        })?;
    }
    Ok(is_id)
}

/// Default collection: the snake_case type name, pluralized.
fn collection_name(type_name: &str) -> String {
    pluralize(&to_snake_case(type_name))
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

fn pluralize(word: &str) -> String {
    const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(VOWELS) && !stem.is_empty() {
            return format!("{stem}ies");
        }
    }
    // quiz -> quizzes
    if let Some(stem) = word.strip_suffix('z') {
        if stem.ends_with(VOWELS) {
            return format!("{word}zes");
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|end| word.ends_with(end)) {
        return format!("{word}es");
    }
    format!("{word}s")
}
