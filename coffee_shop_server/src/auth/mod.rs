//! # Authorization
//!
//! Protected routes accept RS256 bearer tokens issued by an external identity provider. Verification is split into
//! three parts:
//!
//! * [`KeyProvider`]s supply the identity provider's published signing keys (a JWKS).
//! * The [`TokenVerifier`] checks the token header, signature, expiry, audience and issuer, producing a [`ClaimSet`].
//! * [`check_permission`] checks the verified claims for the permission a route requires.
//!
//! The [`AclMiddlewareFactory`](crate::middleware::AclMiddlewareFactory) middleware ties them together for each
//! protected route.
mod claims;
mod keys;
mod verifier;

pub use claims::{check_permission, ClaimSet};
pub use keys::{CachedKeyProvider, KeyProvider, RemoteKeyProvider, StaticKeyProvider};
pub use verifier::TokenVerifier;
