//! Outbound client identities.
//!
//! Every request carries a user-agent picked from a small fixed pool so the
//! upstream host does not see the same fingerprint on each call. Selection goes
//! through the `IdentitySource` trait, which lets tests plug in a fixed value.
use rand::seq::IndexedRandom;

use crate::net::{ACCEPT, ACCEPT_LANGUAGE};

/// User-agent strings rotated across requests.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.107 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:90.0) Gecko/20100101 Firefox/90.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 11.5; rv:90.0) Gecko/20100101 Firefox/90.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 11_5_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.2 Safari/605.1.15",
];

/// Header values attached to one outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeaders {
    /// `User-Agent` value.
    pub user_agent: String,
    /// `Accept` value.
    pub accept: &'static str,
    /// `Accept-Language` value.
    pub accept_language: &'static str,
}

impl IdentityHeaders {
    /// Wrap a user-agent with the fixed accept headers the host expects.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            accept: ACCEPT,
            accept_language: ACCEPT_LANGUAGE,
        }
    }
}

/// Supplies the identity for the next request.
pub trait IdentitySource: Send {
    /// Identity to present on the next request.
    fn next(&self) -> IdentityHeaders;
}

/// Uniform random pick from [`USER_AGENTS`]. Holds no mutable state.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdentityPool;

impl IdentitySource for RandomIdentityPool {
    fn next(&self) -> IdentityHeaders {
        let agent = USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);
        IdentityHeaders::new(agent)
    }
}

/// Always returns the same identity.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub String);

impl IdentitySource for FixedIdentity {
    fn next(&self) -> IdentityHeaders {
        IdentityHeaders::new(self.0.clone())
    }
}
