// Unit tests for the private source-chain helpers behind From<reqwest::Error>

use crate::error::ConnectionCode;
use crate::error::raw_failure::{connection_code, describe_chain};

use std::fmt;
use std::io::{Error as IoError, ErrorKind as IoErrorKind};

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
#[error("error sending request")]
struct Outer {
    #[source]
    inner: Middle,
}

#[derive(Debug, ThisError)]
#[error("client error (Connect)")]
struct Middle {
    #[source]
    io: IoError,
}

#[derive(Debug)]
struct DnsFailure;

impl fmt::Display for DnsFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dns error: failed to lookup address information")
    }
}

impl std::error::Error for DnsFailure {}

/// **VALUE**: Verifies a refused connection buried two levels deep is found.
///
/// **WHY THIS MATTERS**: reqwest wraps hyper which wraps the io::Error. Without walking
/// the chain a wrong port would surface as a Generic error instead of a config problem.
#[test]
fn given_nested_connection_refused_when_inspected_then_econnrefused() {
    // GIVEN: outer → middle → io::Error(ConnectionRefused)
    let error = Outer {
        inner: Middle {
            io: IoError::from(IoErrorKind::ConnectionRefused),
        },
    };

    // WHEN: Looking for the connection code
    let (code, _) = connection_code(&error);

    // THEN: ECONNREFUSED
    assert_eq!(code, ConnectionCode::ConnectionRefused);
}

#[test]
fn given_dns_failure_when_inspected_then_host_not_found() {
    let (code, errno) = connection_code(&DnsFailure);

    assert_eq!(code, ConnectionCode::HostNotFound);
    assert_eq!(errno, None);
}

#[test]
fn given_unrecognized_cause_when_inspected_then_other_code() {
    let error = IoError::new(IoErrorKind::Other, "tls handshake eof");

    let (code, _) = connection_code(&error);

    assert_eq!(code.as_str(), "ECONNECT");
}

#[test]
fn given_error_chain_when_described_then_all_levels_joined() {
    let error = Outer {
        inner: Middle {
            io: IoError::new(IoErrorKind::ConnectionRefused, "Connection refused (os error 111)"),
        },
    };

    let text = describe_chain(&error);

    assert_eq!(
        text,
        "error sending request: client error (Connect): Connection refused (os error 111)"
    );
}
