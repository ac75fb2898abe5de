//! The composed command service: dispatch, envelopes and the HTTP transport.

mod support;

mod auth;
mod commands;
#[cfg(feature = "http")]
mod http;
