//! Transport layers exposing the resolver to clients.
//!
//! The core never depends on this module; it only adapts requests onto
//! [`SocialGraph`](crate::SocialGraph) calls and maps errors onto statuses.

#[cfg(feature = "http")]
pub mod http;
