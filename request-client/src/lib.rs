//! Private HTTP/XML request client for the WF830 management interface
//!
//! This crate provides a minimal client for the router's undocumented
//! `_request.xml` endpoint. It owns one authenticated session (the device
//! issues a cookie token at login) and exposes the raw node-get / node-set /
//! list-full request primitives. Typed operations live in `wf830-api`.

mod error;

pub use error::RequestError;

use std::time::Duration;
use xmltree::Element;

/// Scheme for all device requests; the WF830 web server speaks plain HTTP.
pub const PROTO: &str = "http";

/// The only account the login endpoint accepts.
pub const LOGIN_USERNAME: &str = "smartadmin";

/// Name of the session cookie issued by the device's GoAhead web server.
/// The agent's cookie store captures it at login and replays it on every
/// subsequent request.
pub const TOKEN_COOKIE_NAME: &str = "-goahead-session-";

/// Timeout for reads and ordinary writes.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Timeout for band changes; re-associating radio state takes several seconds.
pub const CHANGE_BAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Substring present in the login response body when credentials are rejected.
const LOGIN_ERROR_MARKER: &str = "errString";

/// Command codes understood by the `_request.xml` endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Batched read of node values
    NodeGet,
    /// Single node write
    NodeSet,
    /// Multi-value node write (semicolon-separated value list)
    NodeMultiSet,
    /// Full dump of one of the device's list structures
    ListFull,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::NodeGet => "OAM_MIDWARE_NODE_GET",
            Command::NodeSet => "OAM_MIDWARE_NODE_SET",
            Command::NodeMultiSet => "OAM_MIDWARE_NODEM_SET",
            Command::ListFull => "OAM_MIDWARE_LIST_FULL",
        }
    }
}

/// One authenticated session against a device
///
/// A session is opened by logging in and is never re-authenticated in place;
/// when the device stops honoring the cookie, callers open a fresh session.
#[derive(Debug)]
pub struct Session {
    agent: ureq::Agent,
    host: String,
}

impl Session {
    /// Log in and return a session holding the device's auth cookie.
    ///
    /// The device answers rejected credentials with HTTP 200 and an error
    /// marker in the body, so the status code alone proves nothing.
    pub fn open(host: &str, password: &str) -> Result<Self, RequestError> {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(DEFAULT_REQUEST_TIMEOUT)
            .build();

        let response = agent
            .post(&format!("{PROTO}://{host}/action/login"))
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .send_form(&[("username", LOGIN_USERNAME), ("password", password)])?;

        let body = response.into_string().map_err(RequestError::from_read)?;
        if body.contains(LOGIN_ERROR_MARKER) {
            return Err(RequestError::Auth);
        }

        Ok(Self {
            agent,
            host: host.to_string(),
        })
    }

    /// Host (and optional port) this session talks to
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Read several node values in one request.
    ///
    /// Values come back cleaned (whitespace and `;` separators stripped) and
    /// in request order. The device guarantees response order matches the
    /// request; only the count is validated here.
    pub fn node_get(&self, codes: &[&str]) -> Result<Vec<String>, RequestError> {
        let response = self
            .agent
            .get(&self.request_url())
            .query("cmd", Command::NodeGet.as_str())
            .query("node", &codes.join(";"))
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .call()?;

        let body = response.into_string().map_err(RequestError::from_read)?;
        let data = parse_data_root(&body)?;
        let values = collect_values(&data);

        if values.len() != codes.len() {
            return Err(RequestError::NodeCountMismatch {
                expected: codes.len(),
                actual: values.len(),
            });
        }
        Ok(values)
    }

    /// Write one node value; returns the device's `result` status field.
    ///
    /// The timeout is caller-supplied because band changes need
    /// [`CHANGE_BAND_TIMEOUT`] while everything else uses the default.
    pub fn node_set(
        &self,
        command: Command,
        code: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<String, RequestError> {
        let response = self
            .agent
            .get(&self.request_url())
            .query("cmd", command.as_str())
            .query("node", code)
            .query("value", value)
            .timeout(timeout)
            .call()?;

        let body = response.into_string().map_err(RequestError::from_read)?;
        let data = parse_data_root(&body)?;
        data.get_child("result")
            .map(element_text)
            .ok_or_else(|| RequestError::Parse("missing result field in node-set response".to_string()))
    }

    /// Fetch one of the device's list structures.
    ///
    /// Returns the parsed `data` root; record fields are device-specific, so
    /// picking them out is left to the caller.
    pub fn list_full(&self, list: &str) -> Result<Element, RequestError> {
        let response = self
            .agent
            .get(&self.request_url())
            .query("cmd", Command::ListFull.as_str())
            .query("list", list)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .call()?;

        let body = response.into_string().map_err(RequestError::from_read)?;
        parse_data_root(&body)
    }

    fn request_url(&self) -> String {
        format!("{PROTO}://{}/_request.xml", self.host)
    }
}

/// Parse a response body and check it is rooted at `data`.
///
/// An expired session gets answered with an HTML page instead of XML, so a
/// parse failure here doubles as the session-loss signal.
fn parse_data_root(body: &str) -> Result<Element, RequestError> {
    let root = Element::parse(body.as_bytes()).map_err(|e| RequestError::Parse(e.to_string()))?;
    if root.name != "data" {
        return Err(RequestError::Parse(format!(
            "unexpected response root <{}>",
            root.name
        )));
    }
    Ok(root)
}

/// Node values are the element children of `data`, in document order.
fn collect_values(data: &Element) -> Vec<String> {
    data.children
        .iter()
        .filter_map(|node| node.as_element())
        .map(|el| clean_value(&element_text(el)))
        .collect()
}

fn element_text(el: &Element) -> String {
    el.get_text().map(|text| text.trim().to_string()).unwrap_or_default()
}

/// Strip the `;` separators the device appends to node values.
fn clean_value(raw: &str) -> String {
    raw.trim().trim_matches(';').to_string()
}
