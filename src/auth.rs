//! Client-credentials authentication: secrets, credentials, access tokens, and the
//! [`TokenManager`] that keeps a bearer token fresh.

pub mod credentials;
pub mod manager;
pub mod secret;
pub mod token;

pub use credentials::*;
pub use manager::*;
pub use secret::*;
pub use token::*;
