//! Configuration system for the traffic engine.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the engine. It provides:
//! 1. **Defaults:** Baseline network shape, buffer depth and arbitration constants.
//! 2. **Structures:** Hierarchical config for general, network, traffic and routing settings.
//! 3. **Enums:** Priority schemes and the command hand-off mode.
//! 4. **Loading:** JSON text or file loading followed by validation.
//!
//! Configuration is supplied as JSON (CLI `--config`, Python dict) or built with `Config::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;
use crate::common::ids::{ClassId, VcId};
use crate::flit::FlitType;

/// Default configuration constants for the engine.
mod defaults {
    /// Number of network endpoints.
    pub const NODES: usize = 2;

    /// Number of independent subnetworks.
    pub const SUBNETS: usize = 1;

    /// Virtual channels per injection port.
    pub const NUM_VCS: usize = 4;

    /// Buffer slots per virtual channel.
    pub const VC_BUF_SIZE: usize = 8;

    /// Traversal latency of the reference crossbar in cycles.
    pub const LATENCY: u64 = 1;

    /// Number of traffic classes.
    pub const CLASSES: usize = 1;

    /// Cycles without any retirement, while flits are in flight, before a
    /// possible-deadlock warning is emitted.
    pub const DEADLOCK_WARN_TIMEOUT: u64 = 256;
}

/// Flit priority assignment scheme.
///
/// Higher values win arbitration; ties keep the earlier round-robin candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PriorityScheme {
    /// Every flit has priority 0.
    #[default]
    #[serde(alias = "none")]
    None,
    /// Fixed priority per traffic class (`traffic.class_priority`).
    #[serde(alias = "class")]
    ClassBased,
    /// `i32::MAX - creation time`: older packets win.
    #[serde(alias = "age")]
    AgeBased,
    /// `i32::MAX - injection time`, stamped when the flit enters the network.
    #[serde(alias = "network_age")]
    NetworkAgeBased,
    /// `i32::MAX - per-source packet sequence number`.
    #[serde(alias = "sequence")]
    SequenceBased,
}

/// How a received packet is handed off to free its destination node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum HandoffMode {
    /// The wrapper frees the node in the same cycle the tail flit arrives.
    #[default]
    #[serde(alias = "immediate")]
    Immediate,
    /// The node stays busy until the driver calls `handle_received_command`.
    #[serde(alias = "deferred")]
    Deferred,
}

/// Inclusive virtual-channel range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcRange {
    /// First eligible VC.
    pub begin: VcId,
    /// Last eligible VC (inclusive).
    pub end: VcId,
}

/// Root configuration structure containing all engine settings.
///
/// # Examples
///
/// ```
/// use flitsim_core::config::{Config, PriorityScheme};
///
/// let config = Config::default();
/// assert_eq!(config.network.nodes, 2);
/// assert_eq!(config.traffic.priority, PriorityScheme::None);
/// ```
///
/// Deserializing from JSON; omitted sections and fields take their defaults:
///
/// ```
/// use flitsim_core::config::{Config, HandoffMode, PriorityScheme};
///
/// let json = r#"{
///     "network": { "nodes": 16, "subnets": 2, "num_vcs": 2 },
///     "traffic": { "classes": 2, "priority": "age", "handoff": "Deferred" },
///     "routing": { "read_request": { "begin": 0, "end": 0 } }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.network.nodes, 16);
/// assert_eq!(config.network.vc_buf_size, 8);
/// assert_eq!(config.traffic.priority, PriorityScheme::AgeBased);
/// assert_eq!(config.traffic.handoff, HandoffMode::Deferred);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tracing and statistics switches.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Network shape and buffering.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Traffic classes, arbitration and hand-off.
    #[serde(default)]
    pub traffic: TrafficConfig,
    /// Per payload-type VC ranges for injection.
    #[serde(default)]
    pub routing: RoutingConfig,
}

impl Config {
    /// Parses and validates a JSON configuration string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks that the configuration describes a network the engine can run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("network.nodes", self.network.nodes),
            ("network.subnets", self.network.subnets),
            ("network.num_vcs", self.network.num_vcs),
            ("network.vc_buf_size", self.network.vc_buf_size),
            ("traffic.classes", self.traffic.classes),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if self.network.latency == 0 {
            return Err(ConfigError::Invalid {
                field: "network.latency",
                reason: "must be at least 1 cycle".to_string(),
            });
        }
        if self.traffic.deadlock_warn_timeout == 0 {
            return Err(ConfigError::Invalid {
                field: "traffic.deadlock_warn_timeout",
                reason: "must be at least 1 cycle".to_string(),
            });
        }

        let priorities = &self.traffic.class_priority;
        if !priorities.is_empty() && priorities.len() != self.traffic.classes {
            return Err(ConfigError::Invalid {
                field: "traffic.class_priority",
                reason: format!(
                    "has {} entries but {} classes are configured",
                    priorities.len(),
                    self.traffic.classes
                ),
            });
        }
        if let Some(p) = priorities.iter().find(|p| **p < 0) {
            return Err(ConfigError::Invalid {
                field: "traffic.class_priority",
                reason: format!("priority {p} is negative"),
            });
        }

        for (field, range) in self.routing.ranges() {
            if let Some(r) = range
                && (r.begin > r.end || r.end >= self.network.num_vcs)
            {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!(
                        "range {}..={} is not within 0..{}",
                        r.begin, r.end, self.network.num_vcs
                    ),
                });
            }
        }
        Ok(())
    }
}

/// General tracing and statistics settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Flit ids whose arbitration and injection are traced at debug level.
    #[serde(default)]
    pub watch_flits: Vec<u64>,

    /// Packet ids whose flits are traced at debug level.
    #[serde(default)]
    pub watch_packets: Vec<u64>,

    /// Emit a trace event every cycle with the new simulation time.
    #[serde(default)]
    pub trace: bool,

    /// Collect latency tables per (source, destination) pair.
    #[serde(default)]
    pub pair_stats: bool,
}

/// Network shape and buffering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of endpoints.
    #[serde(default = "NetworkConfig::default_nodes")]
    pub nodes: usize,

    /// Number of independent subnetworks.
    #[serde(default = "NetworkConfig::default_subnets")]
    pub subnets: usize,

    /// Virtual channels per injection port.
    #[serde(default = "NetworkConfig::default_num_vcs")]
    pub num_vcs: usize,

    /// Buffer slots per virtual channel.
    #[serde(default = "NetworkConfig::default_vc_buf_size")]
    pub vc_buf_size: usize,

    /// Traversal latency of the reference crossbar in cycles.
    #[serde(default = "NetworkConfig::default_latency")]
    pub latency: u64,
}

impl NetworkConfig {
    fn default_nodes() -> usize {
        defaults::NODES
    }

    fn default_subnets() -> usize {
        defaults::SUBNETS
    }

    fn default_num_vcs() -> usize {
        defaults::NUM_VCS
    }

    fn default_vc_buf_size() -> usize {
        defaults::VC_BUF_SIZE
    }

    fn default_latency() -> u64 {
        defaults::LATENCY
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            nodes: defaults::NODES,
            subnets: defaults::SUBNETS,
            num_vcs: defaults::NUM_VCS,
            vc_buf_size: defaults::VC_BUF_SIZE,
            latency: defaults::LATENCY,
        }
    }
}

/// Traffic classes, arbitration and hand-off settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficConfig {
    /// Number of traffic classes.
    #[serde(default = "TrafficConfig::default_classes")]
    pub classes: usize,

    /// Priority assignment scheme.
    #[serde(default)]
    pub priority: PriorityScheme,

    /// Per-class priority for `PriorityScheme::ClassBased`; empty means all 0.
    #[serde(default)]
    pub class_priority: Vec<i32>,

    /// Keep injecting the body of an in-progress packet without re-arbitrating.
    #[serde(default)]
    pub hold_switch_for_packet: bool,

    /// Idle cycles (flits in flight, nothing retired) before a deadlock warning.
    #[serde(default = "TrafficConfig::default_deadlock_warn_timeout")]
    pub deadlock_warn_timeout: u64,

    /// Command hand-off mode used by the interconnect wrapper.
    #[serde(default)]
    pub handoff: HandoffMode,
}

impl TrafficConfig {
    fn default_classes() -> usize {
        defaults::CLASSES
    }

    fn default_deadlock_warn_timeout() -> u64 {
        defaults::DEADLOCK_WARN_TIMEOUT
    }

    /// Returns the configured priority of `class`, or 0 when none is set.
    pub fn class_priority(&self, class: ClassId) -> i32 {
        self.class_priority.get(class).copied().unwrap_or(0)
    }
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            classes: defaults::CLASSES,
            priority: PriorityScheme::default(),
            class_priority: Vec::new(),
            hold_switch_for_packet: false,
            deadlock_warn_timeout: defaults::DEADLOCK_WARN_TIMEOUT,
            handoff: HandoffMode::default(),
        }
    }
}

/// Injection VC ranges per payload kind. `None` makes every VC eligible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// VCs for read requests.
    #[serde(default)]
    pub read_request: Option<VcRange>,
    /// VCs for write requests (and control packets).
    #[serde(default)]
    pub write_request: Option<VcRange>,
    /// VCs for read replies.
    #[serde(default)]
    pub read_reply: Option<VcRange>,
    /// VCs for write replies.
    #[serde(default)]
    pub write_reply: Option<VcRange>,
    /// VCs for untyped traffic.
    #[serde(default)]
    pub any_type: Option<VcRange>,
}

impl RoutingConfig {
    /// Returns the configured range for a payload kind.
    pub fn range_for(&self, kind: FlitType) -> Option<VcRange> {
        match kind {
            FlitType::ReadRequest => self.read_request,
            FlitType::WriteRequest => self.write_request,
            FlitType::ReadReply => self.read_reply,
            FlitType::WriteReply => self.write_reply,
            FlitType::AnyType => self.any_type,
        }
    }

    fn ranges(&self) -> [(&'static str, Option<VcRange>); 5] {
        [
            ("routing.read_request", self.read_request),
            ("routing.write_request", self.write_request),
            ("routing.read_reply", self.read_reply),
            ("routing.write_reply", self.write_reply),
            ("routing.any_type", self.any_type),
        ]
    }
}
