//! jportal - a terminal viewer for the JIIT student web portal.
//!
//! The crate is organized around a cached session store:
//!
//! - [`client`] - the portal API surface ([`client::PortalClient`]) and its
//!   HTTP implementation
//! - [`extract`] - turning raw marks report documents into structured data
//! - [`store`] - the session store: memoized fetches, per-domain selection,
//!   and race-safe published views
//! - [`derive`] - pure computations over fetched data (required SGPA,
//!   subject grouping, chart series)
//! - [`models`] - portal data types
//! - [`cli`] - command-line interface
//!
//! Every portal payload is fetched at most once per session; switching
//! between semesters serves cached data instantly and concurrent requests
//! for the same payload are collapsed into a single network call.

pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod derive;
pub mod extract;
pub mod models;
pub mod store;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
