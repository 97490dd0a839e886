//! Self-reference detection
//!
//! A URL that points back at the service itself would redirect into the
//! service forever. Both sides are reduced to `host[:port]`: the scheme
//! (`http`/`https`), a leading `www.` and everything after the authority are
//! ignored.

use std::borrow::Cow;

use url::Url;

#[derive(Debug, PartialEq, Eq)]
struct Authority {
    host: String,
    port: Option<u16>,
}

impl Authority {
    /// `raw` may omit the scheme (`localhost:8080`), as service addresses usually do.
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let with_scheme: Cow<'_, str> = if raw.contains("://") {
            Cow::Borrowed(raw)
        } else {
            Cow::Owned(format!("http://{raw}"))
        };

        let url = Url::parse(&with_scheme).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        let host = url.host_str()?.to_ascii_lowercase();
        let host = match host.strip_prefix("www.") {
            Some(stripped) => stripped.to_string(),
            None => host,
        };

        Some(Self {
            host,
            port: url.port(),
        })
    }

    /// A missing port stands for whichever default port the other side names.
    fn matches(&self, other: &Self) -> bool {
        if self.host != other.host {
            return false;
        }
        match (self.port, other.port) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            (Some(p), None) | (None, Some(p)) => matches!(p, 80 | 443),
        }
    }
}

/// Whether `candidate` points at the service reachable at `service_address`.
pub fn is_self_reference(candidate: &str, service_address: &str) -> bool {
    let candidate = candidate.trim();
    let service_address = service_address.trim();

    if service_address.is_empty() {
        return false;
    }

    if candidate.eq_ignore_ascii_case(service_address) {
        return true;
    }

    match (Authority::parse(candidate), Authority::parse(service_address)) {
        (Some(target), Some(service)) => target.matches(&service),
        _ => false,
    }
}
