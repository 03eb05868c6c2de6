//! Registry of the device's known telemetry and control nodes
//!
//! Node codes are opaque identifiers in the router's OAM midware namespace,
//! recovered from the stock web UI's traffic. The enum is closed on purpose:
//! every point this SDK can touch is listed here, nothing else is addressable.

/// One telemetry/control point on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    /// Currently active LTE bands (read)
    ActiveBands,
    /// Active LTE band set (write)
    SetActiveBands,
    /// Signal strength bars, 0-4
    SignalStrength,
    NetworkType,
    Rsrp0,
    Rsrp1,
    Rsrq,
    Sinr,
    NetworkStatus,
    WanIpAddr,
    /// Instantaneous download rate, bytes
    CurrentDownload,
    /// Instantaneous upload rate, bytes
    CurrentUpload,
    SerialNumber,
    /// First of the two reboot trigger nodes
    RebootPrimary,
    /// Second reboot trigger; the device goes down once both are written
    RebootSecondary,
}

impl Node {
    /// The opaque code the device uses for this node
    pub fn code(self) -> &'static str {
        match self {
            Node::ActiveBands => "N_8_38",
            Node::SetActiveBands => "N_8_36",
            Node::SignalStrength => "N_8_49",
            Node::NetworkType => "N_8_45",
            Node::Rsrp0 => "N_8_25",
            Node::Rsrp1 => "N_8_26",
            Node::Rsrq => "N_8_22",
            Node::Sinr => "N_8_35",
            Node::NetworkStatus => "N_8_46",
            Node::WanIpAddr => "N_3_45",
            Node::CurrentDownload => "N_5_58",
            Node::CurrentUpload => "N_5_61",
            Node::SerialNumber => "N_5_54",
            Node::RebootPrimary => "N_5_66",
            Node::RebootSecondary => "N_5_67",
        }
    }
}

/// The eight nodes read by one signal poll, in protocol order.
pub(crate) const SIGNAL_NODES: [Node; 8] = [
    Node::SignalStrength,
    Node::NetworkType,
    Node::Rsrp0,
    Node::Rsrp1,
    Node::Rsrq,
    Node::Sinr,
    Node::NetworkStatus,
    Node::WanIpAddr,
];
