//! Retry policy applied to every device call
//!
//! The router's web server is flaky under rapid polling. Three failure
//! signatures are recoverable: an unparsable response means the session
//! token is no longer honored (open a fresh session and repeat the call),
//! while a dropped connection or a read timeout means the server hiccuped
//! (pause briefly and repeat). Anything else is fatal and propagates
//! immediately.

use std::time::Duration;

use request_client::RequestError;
use tracing::{debug, warn};

use crate::error::ApiError;

/// Bounds and pacing for the per-call retry loop
///
/// A healthy device recovers well inside the defaults; the bounds exist so a
/// dead one cannot block its caller forever.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Reauthentication cycles allowed per call before a session-loss
    /// signature escalates as a protocol failure
    pub max_reauth_attempts: u32,
    /// Transient-failure retries allowed per call
    pub max_transient_attempts: u32,
    /// Pause between transient-failure retries
    pub transient_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_reauth_attempts: 5,
            max_transient_attempts: 30,
            transient_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Run `op` against `state` until it succeeds or the policy gives up.
    ///
    /// `reauth` must replace the session held in `state` with a freshly
    /// opened one; it is invoked whenever `op` fails with a session-loss
    /// signature. A transient failure during reauthentication counts against
    /// the transient budget; a fatal one escalates.
    pub fn run<S, T>(
        &self,
        state: &mut S,
        mut op: impl FnMut(&mut S) -> Result<T, RequestError>,
        mut reauth: impl FnMut(&mut S) -> Result<(), RequestError>,
    ) -> Result<T, ApiError> {
        let mut reauths = 0;
        let mut transients = 0;

        loop {
            let err = match op(state) {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if err.is_session_loss() {
                reauths += 1;
                if reauths > self.max_reauth_attempts {
                    return Err(ApiError::Protocol(format!(
                        "response still malformed after {} reauthentication attempts: {err}",
                        self.max_reauth_attempts
                    )));
                }
                warn!(attempt = reauths, error = %err, "session lost, reauthenticating");

                match reauth(state) {
                    Ok(()) => {}
                    Err(reauth_err) if reauth_err.is_transient() => {
                        transients += 1;
                        if transients > self.max_transient_attempts {
                            return Err(self.transients_exhausted(&reauth_err));
                        }
                        debug!(error = %reauth_err, "transient failure during reauthentication");
                        std::thread::sleep(self.transient_delay);
                    }
                    Err(reauth_err) => return Err(reauth_err.into()),
                }
            } else if err.is_transient() {
                transients += 1;
                if transients > self.max_transient_attempts {
                    return Err(self.transients_exhausted(&err));
                }
                debug!(error = %err, "transient failure, pausing before retry");
                std::thread::sleep(self.transient_delay);
            } else {
                return Err(err.into());
            }
        }
    }

    fn transients_exhausted(&self, err: &RequestError) -> ApiError {
        ApiError::Connection(format!(
            "device still failing after {} retries: {err}",
            self.max_transient_attempts
        ))
    }
}
