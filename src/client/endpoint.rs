//! Where the driver sends its requests.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub host: IpAddr,
    pub port: u16,
}

impl Endpoint {
    pub fn loopback(port: u16) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port,
        }
    }

    /// `http://<host>:<port><path>`
    pub fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}", SocketAddr::new(self.host, self.port)))?.join(path)
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Self {
            host: addr.ip(),
            port: addr.port(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SocketAddr::new(self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_request_url() {
        let url = Endpoint::loopback(8080).url("/test/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/test/");
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let endpoint = Endpoint::from("[::1]:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(endpoint.url("/test/").unwrap().as_str(), "http://[::1]:9000/test/");
        assert_eq!(endpoint.to_string(), "[::1]:9000");
    }
}
