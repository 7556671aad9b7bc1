//! Integration tests for the session store: default selection, caching,
//! selection races, and failure recovery, all against the scripted
//! in-memory portal.

use jportal_cli::extract::JsonReportExtractor;
use jportal_cli::store::SessionStore;
use jportal_cli::test_utils::MockPortal;

mod caching;
mod races;
mod resilience;
mod selection;

/// Session over a scripted portal.
pub fn session(portal: MockPortal) -> SessionStore<MockPortal, JsonReportExtractor> {
    jportal_cli::test_utils::init_test_logging();
    SessionStore::new(portal, JsonReportExtractor)
}
