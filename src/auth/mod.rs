//! Auth - refresh token bookkeeping.
//!
//! Issued refresh tokens live in a bounded cache with TTL eviction. The
//! store is created by the composition root and injected into the service;
//! nothing is held in process-global state.
//!
//! ## Example
//!
//! ```ignore
//! use orgdesk::auth::RefreshTokenStore;
//!
//! let tokens = RefreshTokenStore::new(10_000, Duration::from_secs(7 * 24 * 3600));
//! let token = tokens.issue("65a1b2c3d4e5f60718293a4b");
//! let rotated = tokens.rotate(&token).unwrap();
//! assert!(tokens.owner(&token).is_none());
//! ```

mod refresh;

pub use refresh::RefreshTokenStore;
