//! OIDC provider implementations.

mod google;

pub use google::GoogleProvider;
