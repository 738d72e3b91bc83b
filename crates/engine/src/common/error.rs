//! Error definitions.
//!
//! The engine distinguishes two tiers of trouble:
//! 1. **Fatal invariant violations** (`SimError`): a caller, configuration or
//!    accounting bug. They propagate to the driver, which ends the run.
//! 2. **Non-fatal diagnostics** (deadlock warnings, busy or full VCs): these are
//!    `tracing` events, never errors, and resolve by re-arbitration.
//!
//! Configuration loading and validation failures are reported as `ConfigError`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::ids::{ClassId, FlitId, NodeId, PacketId, SubnetId};

/// Fatal invariant violation raised while generating, stepping or retiring traffic.
#[derive(Debug, Error)]
pub enum SimError {
    /// A packet was generated for a destination outside `[0, nodes)`.
    #[error("incorrect packet destination {dest} (network has {nodes} nodes)")]
    DestinationOutOfRange {
        /// Requested destination node.
        dest: NodeId,
        /// Number of nodes in the network.
        nodes: usize,
    },

    /// A packet was generated at a source outside `[0, nodes)`.
    #[error("incorrect packet source {src} (network has {nodes} nodes)")]
    SourceOutOfRange {
        /// Requested source node.
        src: NodeId,
        /// Number of nodes in the network.
        nodes: usize,
    },

    /// A packet was generated on a subnet that does not exist.
    #[error("subnet {subnet} out of range (network has {subnets} subnets)")]
    SubnetOutOfRange {
        /// Requested subnet.
        subnet: SubnetId,
        /// Number of configured subnets.
        subnets: usize,
    },

    /// A packet was generated in a traffic class that does not exist.
    #[error("traffic class {class} out of range ({classes} classes configured)")]
    ClassOutOfRange {
        /// Requested class.
        class: ClassId,
        /// Number of configured classes.
        classes: usize,
    },

    /// A packet with zero flits was requested.
    #[error("packet from node {src} to node {dest} has no flits")]
    EmptyPacket {
        /// Source node.
        src: NodeId,
        /// Destination node.
        dest: NodeId,
    },

    /// A head flit was ejected at a node other than its destination.
    #[error("flit {flit} arrived at incorrect output {node} (expected {expected:?})")]
    MisroutedFlit {
        /// Offending flit.
        flit: FlitId,
        /// Node where it was ejected.
        node: NodeId,
        /// Destination recorded in the head flit.
        expected: Option<NodeId>,
    },

    /// A flit was retired that the engine was not tracking as in flight.
    #[error("flit {flit} (class {class}) retired but not in flight")]
    FlitNotInFlight {
        /// Offending flit.
        flit: FlitId,
        /// Its traffic class.
        class: ClassId,
    },

    /// A tail flit arrived but its packet's head flit was never parked.
    #[error("tail flit {flit} of packet {pid} arrived without a retired head")]
    MissingHeadFlit {
        /// Tail flit.
        flit: FlitId,
        /// Packet the tail belongs to.
        pid: PacketId,
    },

    /// A node reported a packet that no dispatched command owns.
    #[error("node {node} received packet {pid} that no command owns")]
    UnknownPacket {
        /// Receiving node.
        node: NodeId,
        /// Unowned packet.
        pid: PacketId,
    },

    /// The supplied substrate does not match the configured network shape.
    #[error("network mismatch: {0}")]
    NetworkMismatch(String),

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failure to load or validate a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration text is not valid JSON for `Config`.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the engine cannot run with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}
