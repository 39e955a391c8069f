use std::fmt;

use actix_web::http::header::HeaderMap;

use crate::jwt::JwtClaims;

/// Bucket shared by every client whose address could not be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Who is calling, as far as proxy headers tell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// First `X-Forwarded-For` hop, then `X-Real-IP`, then [`UNKNOWN_CLIENT`].
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let real_ip = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        ClientIdentity(
            forwarded
                .or(real_ip)
                .unwrap_or(UNKNOWN_CLIENT)
                .to_string(),
        )
    }

    pub fn new(value: impl Into<String>) -> Self {
        ClientIdentity(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-request facts resolved once by the extraction middleware.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub client: ClientIdentity,
    /// Valid session claims, if a bearer token was sent and verified.
    pub staff: Option<JwtClaims>,
}

#[cfg(test)]
mod tests {
    use actix_web::http::header::{HeaderName, HeaderValue};

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(HeaderName::from_static(k), HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn prefers_first_forwarded_hop() {
        let id = ClientIdentity::from_headers(&headers(&[
            ("x-forwarded-for", "203.0.113.9, 10.0.0.1"),
            ("x-real-ip", "10.0.0.2"),
        ]));
        assert_eq!(id.as_str(), "203.0.113.9");
    }

    #[test]
    fn falls_back_to_real_ip_then_unknown() {
        let id = ClientIdentity::from_headers(&headers(&[("x-real-ip", "198.51.100.4")]));
        assert_eq!(id.as_str(), "198.51.100.4");

        let id = ClientIdentity::from_headers(&headers(&[]));
        assert_eq!(id.as_str(), UNKNOWN_CLIENT);
    }
}
