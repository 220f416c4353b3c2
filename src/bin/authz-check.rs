//! Offline check of a single request against an access document.
//!
//! Exit status: 0 allow, 1 deny, 2 error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use auth_responder::authz::{evaluate, AccessRequest};
use auth_responder::config::{lint_document, load_document_file, ServiceConfig};
use auth_responder::identity::common_name;
use auth_responder::AccessPolicy;

#[derive(Parser)]
#[command(name = "authz-check")]
#[command(about = "Evaluate a request against an auth-responder access document", long_about = None)]
struct Cli {
    /// The access document to evaluate against
    #[arg(short, long, default_value = ServiceConfig::DEFAULT_ACCESS_FILE)]
    config: PathBuf,

    /// User name (as sent in REMOTE-USER)
    #[arg(short, long)]
    user: String,

    /// Request URI (as sent in X-URI)
    #[arg(long)]
    uri: String,

    /// Virtual host (as sent in X-Host)
    #[arg(long)]
    host: String,

    /// PEM client certificate to inspect (informational only)
    #[arg(long)]
    cert: Option<PathBuf>,

    /// Also print lint warnings for the document
    #[arg(long)]
    lint: bool,
}

type CheckResult = Result<bool, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let result = run(Cli::parse());
    if let Err(e) = &result {
        eprintln!("Error: {}", e);
    }
    ExitCode::from(exit_status(&result))
}

fn exit_status(result: &CheckResult) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn run(cli: Cli) -> CheckResult {
    let document = load_document_file(&cli.config)?;
    if cli.lint {
        for warning in lint_document(&document) {
            eprintln!("warning: {}", warning);
        }
    }
    let policy = AccessPolicy::from_document(document);

    if let Some(path) = &cli.cert {
        let pem = std::fs::read_to_string(path)?;
        match common_name(&pem)? {
            Some(name) => println!("certificate subject CN: {}", name),
            None => println!("certificate subject has no CN"),
        }
    }

    let request = AccessRequest::new(&cli.user, &cli.uri, &cli.host);
    if request.is_incomplete() {
        println!("deny (incomplete request, would answer 401)");
        return Ok(false);
    }

    let decision = evaluate(&policy, &request);
    println!("{}", decision);
    Ok(decision.is_allowed())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "admins": ["alice"],
        "hosts": {"example.com": {"locations": {"/private": {"users": ["bob"]}}}}
    }"#;

    fn document_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "authz-check-{}-{}.json",
            name,
            std::process::id()
        ));
        std::fs::write(&path, DOCUMENT).unwrap();
        path
    }

    fn cli(config: PathBuf, user: &str, uri: &str) -> Cli {
        Cli {
            config,
            user: user.to_string(),
            uri: uri.to_string(),
            host: "example.com".to_string(),
            cert: None,
            lint: false,
        }
    }

    #[test]
    fn test_exit_status_contract() {
        let path = document_path("exit");

        assert_eq!(exit_status(&run(cli(path.clone(), "bob", "/private/x"))), 0);
        assert_eq!(exit_status(&run(cli(path.clone(), "alice", "/anything"))), 0);
        assert_eq!(exit_status(&run(cli(path.clone(), "carol", "/private/x"))), 1);
        assert_eq!(exit_status(&run(cli(path.clone(), "", "/private/x"))), 1);

        let missing = path.with_extension("missing");
        assert_eq!(exit_status(&run(cli(missing, "bob", "/private/x"))), 2);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_malformed_document_is_error() {
        let path = document_path("malformed");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(exit_status(&run(cli(path.clone(), "bob", "/private/x"))), 2);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unreadable_certificate_is_error() {
        let path = document_path("cert");
        let mut args = cli(path.clone(), "bob", "/private/x");
        args.cert = Some(path.with_extension("pem-missing"));
        assert_eq!(exit_status(&run(args)), 2);
        std::fs::remove_file(&path).unwrap();
    }
}
