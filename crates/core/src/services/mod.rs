//! Batch services built on the resolvers.

pub mod analysis;
