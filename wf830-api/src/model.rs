//! Typed records reconstructed from raw node values
//!
//! Every poll rebuilds these records from scratch; there are no partial
//! updates. Numeric fields that fail to parse surface as
//! [`ApiError::Validation`] rather than defaults, so a half-broken device
//! never produces plausible-looking telemetry.

use serde::Serialize;
use xmltree::Element;

use crate::error::ApiError;

/// Signal telemetry, rebuilt on every poll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalParams {
    /// Bar count the device UI shows, 0-4
    pub strength: u8,
    pub network_type: String,
    pub rsrp0: i32,
    pub rsrp1: i32,
    pub rsrq: i32,
    pub sinr: i32,
    pub network_status: String,
    pub wan_ip_addr: String,
}

impl SignalParams {
    /// Number of node values one signal poll carries.
    pub const NODE_COUNT: usize = 8;

    /// Build from the raw values of one batched read, in protocol order:
    /// strength, network type, rsrp0, rsrp1, rsrq, sinr, network status,
    /// WAN IP. Separator characters are stripped before parsing.
    pub fn from_node_values(values: &[String]) -> Result<Self, ApiError> {
        let [strength, network_type, rsrp0, rsrp1, rsrq, sinr, network_status, wan_ip_addr] =
            values
        else {
            return Err(ApiError::Protocol(format!(
                "expected {} signal values, device returned {}",
                Self::NODE_COUNT,
                values.len()
            )));
        };

        Ok(Self {
            strength: parse_numeric("strength", strength)?,
            network_type: clean(network_type),
            rsrp0: parse_numeric("rsrp0", rsrp0)?,
            rsrp1: parse_numeric("rsrp1", rsrp1)?,
            rsrq: parse_numeric("rsrq", rsrq)?,
            sinr: parse_numeric("sinr", sinr)?,
            network_status: clean(network_status),
            wan_ip_addr: clean(wan_ip_addr),
        })
    }
}

/// Cumulative and instantaneous transfer counters, in bytes
///
/// Totals are monotonic within a session epoch but reset when the device
/// reboots; callers tracking deltas must tolerate the counters going
/// backwards across a reboot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferStatus {
    pub current_download: u64,
    pub current_upload: u64,
    pub total_download: u64,
    pub total_upload: u64,
}

impl TransferStatus {
    /// Field keys of the totals inside the list-full record.
    const TOTAL_DOWNLOAD_FIELD: &'static str = "L_1";
    const TOTAL_UPLOAD_FIELD: &'static str = "L_5";

    /// Combine the list-full totals record with the two instantaneous-rate
    /// node values (download, upload). Totals and rates live in different
    /// device structures, which is why a transfer poll takes two requests.
    pub fn from_parts(totals: &Element, rates: &[String]) -> Result<Self, ApiError> {
        let [current_download, current_upload] = rates else {
            return Err(ApiError::Protocol(format!(
                "expected 2 rate values, device returned {}",
                rates.len()
            )));
        };

        let record = totals.get_child("list").ok_or_else(|| {
            ApiError::Protocol("list-full response has no list record".to_string())
        })?;

        Ok(Self {
            current_download: parse_numeric("current_download", current_download)?,
            current_upload: parse_numeric("current_upload", current_upload)?,
            total_download: record_field(record, Self::TOTAL_DOWNLOAD_FIELD, "total_download")?,
            total_upload: record_field(record, Self::TOTAL_UPLOAD_FIELD, "total_upload")?,
        })
    }
}

fn clean(raw: &str) -> String {
    raw.trim().trim_matches(';').to_string()
}

fn parse_numeric<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, ApiError> {
    clean(raw).parse().map_err(|_| ApiError::Validation {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

fn record_field(record: &Element, key: &str, field: &str) -> Result<u64, ApiError> {
    let raw = record
        .get_child(key)
        .and_then(|el| el.get_text())
        .ok_or_else(|| ApiError::Protocol(format!("list record missing {key}")))?;
    raw.trim().parse().map_err(|_| ApiError::Validation {
        field: field.to_string(),
        value: raw.to_string(),
    })
}
