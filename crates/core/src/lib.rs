//! wrapgen-core
//!
//! Function classification and polymorphism resolution for a C++ binding
//! generator.
//!
//! Given a metadata model of a class hierarchy, this crate answers three
//! questions for every member function:
//! - may a wrapper be generated at all ([`filter::SupportFilter`]),
//! - which concrete subclasses may arrive for a parameter or receiver and
//!   therefore need a runtime type switch ([`dispatch::PolymorphismResolver`]),
//! - does the function override a virtual or pure-virtual ancestor
//!   declaration ([`virtuals::VirtualResolver`]).
//!
//! No output text is produced here; the rendering layer consumes the
//! decisions through [`services::analysis::AnalysisReport`].

pub mod model;
pub mod graph;
pub mod filter;
pub mod dispatch;
pub mod virtuals;
pub mod config;
pub mod services;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
