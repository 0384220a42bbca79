//! External data source clients for TrialScout.
//!
//! Two collaborators, both thin request/response HTTP clients:
//! - [`HttpTrialSource`] — the primary trial search service (taxonomy,
//!   search pages, detail fetches).
//! - [`CtGovRegistry`] — the public ClinicalTrials.gov registry, used for
//!   eligibility/treatment detail and as the backstop search target.
//!
//! Errors surface as the typed errors declared in `trialscout-core` and are
//! caught at the tool-executor boundary.

mod ctgov;
mod trial_api;

pub use ctgov::CtGovRegistry;
pub use trial_api::HttpTrialSource;
