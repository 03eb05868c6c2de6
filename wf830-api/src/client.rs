//! Typed client for one WF830 device

use request_client::{
    Command, RequestError, Session, CHANGE_BAND_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
};
use tracing::{debug, info};

use crate::band::Band;
use crate::error::{ApiError, Result};
use crate::model::{SignalParams, TransferStatus};
use crate::node::{Node, SIGNAL_NODES};
use crate::retry::RetryPolicy;

/// Client for one WF830 device
///
/// Holds a single authenticated session; every failed call may replace that
/// session, which is why all operations take `&mut self`. One client serves
/// one device, and calls against it must be serialized by the caller — the
/// `&mut` receiver makes the borrow checker enforce that within a process.
pub struct RouterClient {
    host: String,
    password: String,
    policy: RetryPolicy,
    session: Session,
}

impl std::fmt::Debug for RouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterClient")
            .field("host", &self.host)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl RouterClient {
    /// Connect to a device and authenticate with the smartadmin password.
    pub fn connect(host: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::connect_with_policy(host, password, RetryPolicy::default())
    }

    /// Connect with a custom retry policy (shorter bounds for tests, longer
    /// for links known to be bad).
    pub fn connect_with_policy(
        host: impl Into<String>,
        password: impl Into<String>,
        policy: RetryPolicy,
    ) -> Result<Self> {
        let host = host.into();
        let password = password.into();
        let session = Session::open(&host, &password)?;
        info!(host = %host, "authenticated against device");

        Ok(Self {
            host,
            password,
            policy,
            session,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Open a fresh session, replacing the current one.
    ///
    /// Callable repeatedly; the retry layer also goes through this whenever
    /// the device stops honoring the session cookie.
    pub fn authenticate(&mut self) -> Result<()> {
        self.reopen_session()?;
        Ok(())
    }

    /// Read the raw values of several nodes in one batched request.
    ///
    /// Values come back cleaned and in request order, one per node.
    pub fn get_node_values(&mut self, nodes: &[Node]) -> Result<Vec<String>> {
        let codes: Vec<&str> = nodes.iter().map(|node| node.code()).collect();
        self.with_retry(|session| session.node_get(&codes))
    }

    /// Poll the eight signal telemetry nodes in one request.
    pub fn get_signal_params(&mut self) -> Result<SignalParams> {
        let values = self.get_node_values(&SIGNAL_NODES)?;
        SignalParams::from_node_values(&values)
    }

    /// Poll transfer counters: cumulative totals from the list-full dump plus
    /// the two instantaneous-rate nodes.
    pub fn get_transfer_status(&mut self) -> Result<TransferStatus> {
        let totals = self.with_retry(|session| session.list_full("0"))?;
        let rates = self.get_node_values(&[Node::CurrentDownload, Node::CurrentUpload])?;
        TransferStatus::from_parts(&totals, &rates)
    }

    /// Read the currently active LTE bands.
    pub fn get_active_bands(&mut self) -> Result<Vec<Band>> {
        let value = self.get_single_value(Node::ActiveBands)?;
        Band::parse_active_list(&value)
    }

    /// Replace the active band set with a single band.
    ///
    /// Returns the device's raw result string; the device reports outcomes in
    /// its own vocabulary, so interpreting it is left to the caller. Band
    /// switching re-associates radio state and runs under the long timeout.
    pub fn set_band(&mut self, band: Band) -> Result<String> {
        info!(band = ?band, "switching active band");
        self.with_retry(|session| {
            session.node_set(
                Command::NodeMultiSet,
                Node::SetActiveBands.code(),
                band.device_code(),
                CHANGE_BAND_TIMEOUT,
            )
        })
    }

    /// Trigger a reboot by writing the two trigger nodes in sequence.
    ///
    /// The first write is retried like any other call. The second is issued
    /// exactly once: the device starts going down after the first trigger, so
    /// a dropped connection or garbled body on the second is the expected
    /// outcome — and re-running the pair after a drop would double-fire the
    /// first trigger.
    pub fn reboot(&mut self) -> Result<()> {
        info!(host = %self.host, "rebooting device");
        self.with_retry(|session| {
            session.node_set(
                Command::NodeSet,
                Node::RebootPrimary.code(),
                "1",
                DEFAULT_REQUEST_TIMEOUT,
            )
        })?;

        match self.session.node_set(
            Command::NodeSet,
            Node::RebootSecondary.code(),
            "1",
            DEFAULT_REQUEST_TIMEOUT,
        ) {
            Ok(_) => Ok(()),
            Err(err) if err.is_transient() || err.is_session_loss() => {
                debug!(error = %err, "device went down during reboot, as expected");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Read the device serial number, verbatim.
    pub fn get_serial_number(&mut self) -> Result<String> {
        self.get_single_value(Node::SerialNumber)
    }

    fn get_single_value(&mut self, node: Node) -> Result<String> {
        let values = self.get_node_values(&[node])?;
        values.into_iter().next().ok_or_else(|| {
            ApiError::Protocol(format!("empty response reading {}", node.code()))
        })
    }

    fn with_retry<T>(
        &mut self,
        op: impl Fn(&Session) -> std::result::Result<T, RequestError>,
    ) -> Result<T> {
        let policy = self.policy.clone();
        policy.run(self, |client| op(&client.session), Self::reopen_session)
    }

    fn reopen_session(&mut self) -> std::result::Result<(), RequestError> {
        self.session = Session::open(&self.host, &self.password)?;
        Ok(())
    }
}
