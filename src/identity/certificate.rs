//! Client certificate identity extraction.
//!
//! This is identity *parsing*, not authentication: no chain, expiry, or
//! revocation checks are made. Callers must not base a trust decision on the
//! returned name unless the certificate was verified elsewhere (e.g. by the
//! TLS-terminating proxy).

use rustls_pemfile::Item;
use x509_parser::parse_x509_certificate;

/// Failure to obtain a subject name from a PEM certificate.
#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    #[error("no PEM block found")]
    MissingPem,
    #[error("failed to decode PEM block: {0}")]
    Decode(#[source] std::io::Error),
    #[error("PEM block is not a certificate")]
    NotCertificate,
    #[error("failed to parse certificate: {0}")]
    Parse(String),
}

/// Subject Common Name of the first PEM block in `pem`.
///
/// Blocks with an unrecognized label are skipped, so input holding only such
/// blocks reports `MissingPem`. Returns `Ok(None)` for a valid certificate without a Common Name. When the
/// subject carries several, the last one is returned.
pub fn common_name(pem: &str) -> Result<Option<String>, CertificateError> {
    let mut reader = pem.as_bytes();

    let der = match rustls_pemfile::read_one(&mut reader) {
        Ok(Some(Item::X509Certificate(der))) => der,
        Ok(Some(_)) => return Err(CertificateError::NotCertificate),
        Ok(None) => return Err(CertificateError::MissingPem),
        Err(e) => return Err(CertificateError::Decode(e)),
    };

    let (_, cert) =
        parse_x509_certificate(der.as_ref()).map_err(|e| CertificateError::Parse(e.to_string()))?;

    Ok(cert
        .subject()
        .iter_common_name()
        .filter_map(|cn| cn.as_str().ok())
        .last()
        .map(str::to_string))
}

/// Subject Common Name of `pem`, or an empty string if it cannot be obtained.
///
/// A missing PEM block or bad base64 is logged as a warning. A block that is
/// not a certificate, or DER that does not parse, is logged as an error.
/// Neither is propagated.
pub fn extract_user(pem: &str) -> String {
    match common_name(pem) {
        Ok(name) => name.unwrap_or_default(),
        Err(e @ (CertificateError::MissingPem | CertificateError::Decode(_))) => {
            tracing::warn!(error = %e, "Failed to decode PEM block containing the certificate");
            String::new()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse certificate");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = include_str!("../../tests/fixtures/client-alice.pem");
    const NO_CN: &str = include_str!("../../tests/fixtures/no-cn.pem");
    const KEY: &str = include_str!("../../tests/fixtures/client-key.pem");

    #[test]
    fn test_common_name() {
        assert_eq!(common_name(ALICE).unwrap().as_deref(), Some("alice"));
        assert_eq!(extract_user(ALICE), "alice");
    }

    #[test]
    fn test_only_first_block_is_used() {
        let bundle = format!("{ALICE}{NO_CN}");
        assert_eq!(extract_user(&bundle), "alice");

        let bundle = format!("{NO_CN}{ALICE}");
        assert_eq!(extract_user(&bundle), "");
    }

    #[test]
    fn test_no_common_name() {
        assert_eq!(common_name(NO_CN).unwrap(), None);
        assert_eq!(extract_user(NO_CN), "");
    }

    #[test]
    fn test_missing_pem_marker() {
        assert!(matches!(common_name("not a certificate"), Err(CertificateError::MissingPem)));
        assert!(matches!(common_name(""), Err(CertificateError::MissingPem)));
        assert_eq!(extract_user("MIIBoTCCAUegAwIBAgIU"), "");
    }

    #[test]
    fn test_unknown_label_is_skipped() {
        let pem = "-----BEGIN FOO-----\nAAAA\n-----END FOO-----\n";
        assert!(matches!(common_name(pem), Err(CertificateError::MissingPem)));
        assert_eq!(extract_user(pem), "");
    }

    #[test]
    fn test_bad_base64_is_decode_error() {
        let pem = "-----BEGIN CERTIFICATE-----\n!!!!\n-----END CERTIFICATE-----\n";
        assert!(matches!(common_name(pem), Err(CertificateError::Decode(_))));
        assert_eq!(extract_user(pem), "");
    }

    #[test]
    fn test_non_certificate_block() {
        assert!(matches!(common_name(KEY), Err(CertificateError::NotCertificate)));
        assert_eq!(extract_user(KEY), "");
    }

    #[test]
    fn test_garbage_der() {
        let pem = "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n";
        assert!(matches!(common_name(pem), Err(CertificateError::Parse(_))));
        assert_eq!(extract_user(pem), "");
    }
}
