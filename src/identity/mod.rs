//! Request identity helpers.
//!
//! The identity used for authorization is always the `REMOTE-USER` value set
//! by the proxy. A client certificate, when forwarded, is only inspected for
//! diagnostics.

pub mod certificate;

pub use certificate::{common_name, extract_user, CertificateError};
