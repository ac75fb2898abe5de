//! orgdesk - query composition and reporting for a multi-tenant admin backend.
//!
//! Rule-based search requests translate into typed filters; reports are
//! declarative pipelines built from shared helpers (joins, OU breadcrumbs,
//! pagination) and run against any `DocumentStore`. A small command
//! service puts everything behind a uniform response envelope.

extern crate self as orgdesk;

pub mod auth;
pub mod config;
pub mod document;
pub mod domain;
pub mod filter;
pub mod handlers;
pub mod pipeline;
pub mod reports;
pub mod service;
pub mod value;

pub use auth::RefreshTokenStore;
pub use config::{AdminConfig, ConfigError};
pub use document::{
    Document, DocumentRepository, DocumentStore, DocumentsExt, FindOptions,
    InMemoryDocumentStore, StoreError,
};
pub use filter::{Filter, FilterRequest, RuleTranslator, Translation};
pub use pipeline::{Page, Pipeline, Stage};
pub use reports::ReportError;
pub use service::{HandlerError, ResponseEnvelope, Service, Session};

pub use orgdesk_macros::Document;
