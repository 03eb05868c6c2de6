//! Typed client API for the ZTE WF830 LTE router
//!
//! The WF830's management interface is an undocumented HTTP/XML protocol:
//! a cookie-token login plus a node-based get/set endpoint. This crate turns
//! that into typed operations — signal telemetry, transfer counters, active
//! LTE bands, reboot — on top of the raw `request-client` transport.
//!
//! Every device call runs under a [`RetryPolicy`] that absorbs the device's
//! known flakiness (session expiry answered as non-XML, dropped connections,
//! read timeouts) and only surfaces failures that matter to the caller.
//!
//! ```rust,ignore
//! use wf830_api::{Band, RouterClient};
//!
//! let mut client = RouterClient::connect("192.168.0.1", "admin-password")?;
//! let signal = client.get_signal_params()?;
//! println!("{} dBm on {}", signal.rsrp0, signal.network_type);
//!
//! client.set_band(Band::Band7)?;
//! ```
//!
//! One client owns one session against one device; calls against it must be
//! serialized by the caller (the `&mut self` receivers enforce this within a
//! process).

pub mod band;
pub mod client;
pub mod error;
pub mod model;
pub mod node;
pub mod registry;
pub mod retry;

pub use band::Band;
pub use client::RouterClient;
pub use error::{ApiError, Result};
pub use model::{SignalParams, TransferStatus};
pub use node::Node;
pub use registry::ClientRegistry;
pub use retry::RetryPolicy;
