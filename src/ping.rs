//! Connectivity-check protocol.
//!
//! A ping call has two separate concerns: computing the verdict (once per
//! call) and reporting it (repeated per the caller's count). `resolve`
//! performs the validate-then-lookup step; `report` only repeats the
//! formatted outcome and never re-runs the lookup.

use std::fmt;
use std::net::Ipv4Addr;

use log::info;
use serde::Serialize;

/// Number of report repetitions when the caller does not specify one
pub const DEFAULT_PING_COUNT: u32 = 4;

/// Terminal outcome of a single connectivity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PingResponse {
    /// 200: the destination answered
    Success { destination: Ipv4Addr },
    /// 400: the destination is not a parseable IPv4 address
    BadRequest,
    /// 404: the topology is known but offers no path to the destination
    HostUnreachable,
    /// 504: no route is known at all
    NoRoute,
}

impl PingResponse {
    pub fn code(&self) -> u16 {
        match self {
            PingResponse::Success { .. } => 200,
            PingResponse::BadRequest => 400,
            PingResponse::HostUnreachable => 404,
            PingResponse::NoRoute => 504,
        }
    }

    pub fn message(&self) -> String {
        match self {
            PingResponse::Success { destination } => {
                format!("{} replies with success", destination)
            }
            PingResponse::BadRequest => "Bad request".to_string(),
            PingResponse::HostUnreachable => "host Unreachable".to_string(),
            PingResponse::NoRoute => "timeout no route found".to_string(),
        }
    }
}

impl fmt::Display for PingResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.message())
    }
}

/// Compute the verdict for `destination` against a reachability cache.
///
/// An unparseable destination is a bad request regardless of device state.
/// An empty cache means no route is known; a non-empty cache that does not
/// hold the destination means the host is unreachable by policy.
pub fn resolve(cache: &[Ipv4Addr], destination: &str) -> PingResponse {
    let addr = match destination.parse::<Ipv4Addr>() {
        Ok(addr) => addr,
        Err(_) => return PingResponse::BadRequest,
    };

    if cache.is_empty() {
        PingResponse::NoRoute
    } else if cache.contains(&addr) {
        PingResponse::Success { destination: addr }
    } else {
        PingResponse::HostUnreachable
    }
}

/// Emit the formatted response `count` times on behalf of `device`.
pub fn report(device: &str, response: &PingResponse, count: u32) {
    for seq in 1..=count {
        info!("{}: ping reply {}/{}: {}", device, seq, count, response);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_codes_and_messages() {
        let success = PingResponse::Success {
            destination: "10.0.0.1".parse().unwrap(),
        };
        assert_eq!(success.code(), 200);
        assert_eq!(success.message(), "10.0.0.1 replies with success");

        assert_eq!(PingResponse::BadRequest.code(), 400);
        assert_eq!(PingResponse::BadRequest.message(), "Bad request");

        assert_eq!(PingResponse::HostUnreachable.code(), 404);
        assert_eq!(PingResponse::HostUnreachable.message(), "host Unreachable");

        assert_eq!(PingResponse::NoRoute.code(), 504);
        assert_eq!(PingResponse::NoRoute.message(), "timeout no route found");
    }

    #[test]
    fn test_display_pairs_code_with_message() {
        assert_eq!(PingResponse::BadRequest.to_string(), "400 Bad request");
        assert_eq!(
            PingResponse::NoRoute.to_string(),
            "504 timeout no route found"
        );
    }

    #[test]
    fn test_resolve_bad_request_ignores_cache() {
        let cache = vec!["10.0.0.1".parse().unwrap()];
        assert_eq!(resolve(&cache, "not-an-ip"), PingResponse::BadRequest);
        assert_eq!(resolve(&[], "999.0.0.1"), PingResponse::BadRequest);
    }

    #[test]
    fn test_resolve_empty_cache_means_no_route() {
        assert_eq!(resolve(&[], "10.0.0.1"), PingResponse::NoRoute);
    }

    #[test]
    fn test_resolve_lookup_verdicts() {
        let cache: Vec<Ipv4Addr> = vec!["10.0.0.1".parse().unwrap()];
        assert_eq!(
            resolve(&cache, "10.0.0.1"),
            PingResponse::Success {
                destination: "10.0.0.1".parse().unwrap()
            }
        );
        assert_eq!(resolve(&cache, "10.0.0.9"), PingResponse::HostUnreachable);
    }
}
