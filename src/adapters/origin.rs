//! Requester address resolution
//!
//! When the service sits behind a reverse proxy, the proxy reports the
//! original client in a forwarded-for header as a comma-separated chain
//! (`client, proxy1, proxy2`). The first entry is the client.

use crate::core::ports::AddressSource;

/// Address information available for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOrigin {
    /// Raw forwarded-for header value, if present
    pub forwarded_for: Option<String>,
    /// Transport-level peer address
    pub peer: Option<String>,
}

impl RequestOrigin {
    /// Origin known only by its peer address
    #[must_use]
    pub fn peer(addr: impl Into<String>) -> Self {
        Self {
            forwarded_for: None,
            peer: Some(addr.into()),
        }
    }

    /// Add a forwarded-for header value
    #[must_use]
    pub fn with_forwarded_for(mut self, header: impl Into<String>) -> Self {
        self.forwarded_for = Some(header.into());
        self
    }
}

impl AddressSource for RequestOrigin {
    fn requester_address(&self) -> Option<String> {
        let forwarded = self
            .forwarded_for
            .as_deref()
            .and_then(|header| header.split(',').next())
            .map(str::trim)
            .filter(|first| !first.is_empty());

        forwarded
            .or_else(|| self.peer.as_deref().map(str::trim).filter(|p| !p.is_empty()))
            .map(str::to_string)
    }
}
