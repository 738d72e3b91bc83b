//! Traffic statistics collection and reporting.
//!
//! This module tracks what the traffic manager observes at retirement. It provides:
//! 1. **Latency samples:** Flit, packet and network latency, fragmentation and hops per class.
//! 2. **Throughput:** Sent and accepted flit/packet counts per class and node.
//! 3. **Outliers:** The slowest flit and packet seen so far per class.
//! 4. **Pairs:** Optional per (source, destination) latency tables.
//! 5. **Requests:** Outstanding request counters per node.

use std::time::Instant;

use serde::Serialize;

use crate::common::ids::{ClassId, Cycle, FlitId, NodeId, PacketId};

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"latency"`, `"throughput"`, `"pairs"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "latency", "throughput", "pairs"];

/// Running count, sum, minimum and maximum of integer samples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SampleStats {
    count: u64,
    sum: i64,
    min: Option<i64>,
    max: Option<i64>,
}

impl SampleStats {
    /// Adds one sample.
    pub fn add_sample(&mut self, value: i64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Number of samples.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of all samples.
    pub fn sum(&self) -> i64 {
        self.sum
    }

    /// Smallest sample, if any.
    pub fn min(&self) -> Option<i64> {
        self.min
    }

    /// Largest sample, if any.
    pub fn max(&self) -> Option<i64> {
        self.max
    }

    /// Mean of all samples, or 0.0 when empty.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }
}

/// Latency tables for one (source, destination) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PairStats {
    /// Per-flit latency, injection to ejection.
    pub flit_latency: SampleStats,
    /// Per-packet latency, creation to tail ejection.
    pub packet_latency: SampleStats,
    /// Per-packet latency, head injection to tail ejection.
    pub network_latency: SampleStats,
}

/// Statistics for one traffic class.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassStats {
    /// Per-flit latency, injection to ejection.
    pub flit_latency: SampleStats,
    /// Per-packet latency, creation to tail ejection.
    pub packet_latency: SampleStats,
    /// Per-packet latency, head injection to tail ejection.
    pub network_latency: SampleStats,
    /// Extra cycles a packet's flits spent spread out beyond back-to-back arrival.
    pub fragmentation: SampleStats,
    /// Hops travelled by tail flits.
    pub hops: SampleStats,
    /// Flit with the largest flit latency so far.
    pub slowest_flit: Option<FlitId>,
    /// Packet with the largest packet latency so far.
    pub slowest_packet: Option<PacketId>,
    /// Flits injected, per source node.
    pub sent_flits: Vec<u64>,
    /// Packets injected (head flits), per source node.
    pub sent_packets: Vec<u64>,
    /// Flits ejected, per destination node.
    pub accepted_flits: Vec<u64>,
    /// Packets ejected (tail flits), per destination node.
    pub accepted_packets: Vec<u64>,
}

impl ClassStats {
    fn new(nodes: usize) -> Self {
        Self {
            sent_flits: vec![0; nodes],
            sent_packets: vec![0; nodes],
            accepted_flits: vec![0; nodes],
            accepted_packets: vec![0; nodes],
            ..Self::default()
        }
    }
}

/// Latency figures recorded when a tail flit retires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketSample {
    /// Retired packet.
    pub pid: PacketId,
    /// Hops travelled by the tail flit.
    pub hops: u32,
    /// `tail.atime - head.ctime`.
    pub packet_latency: i64,
    /// `tail.atime - head.itime`.
    pub network_latency: i64,
    /// `(tail.atime - head.atime) - (tail.id - head.id)`.
    pub fragmentation: i64,
}

/// All statistics gathered by one traffic manager.
#[derive(Debug, Clone, Serialize)]
pub struct TrafficStats {
    #[serde(skip)]
    start_time: Instant,
    nodes: usize,
    /// Cycles simulated.
    pub cycles: Cycle,
    /// Per-class statistics.
    pub classes: Vec<ClassStats>,
    /// Per-pair tables indexed `src * nodes + dest`; empty when disabled.
    pub pairs: Vec<PairStats>,
    /// Requests awaiting a reply, per node.
    pub requests_outstanding: Vec<i64>,
}

impl TrafficStats {
    /// Creates empty statistics for `classes` classes over `nodes` nodes.
    pub fn new(nodes: usize, classes: usize, pair_stats: bool) -> Self {
        let pairs = if pair_stats {
            vec![PairStats::default(); nodes * nodes]
        } else {
            Vec::new()
        };
        Self {
            start_time: Instant::now(),
            nodes,
            cycles: 0,
            classes: (0..classes).map(|_| ClassStats::new(nodes)).collect(),
            pairs,
            requests_outstanding: vec![0; nodes],
        }
    }

    /// Returns the pair table for `src -> dest`, if pair stats are enabled.
    pub fn pair(&self, src: NodeId, dest: NodeId) -> Option<&PairStats> {
        if src >= self.nodes || dest >= self.nodes {
            return None;
        }
        self.pairs.get(src * self.nodes + dest)
    }

    fn pair_mut(&mut self, src: NodeId, dest: NodeId) -> Option<&mut PairStats> {
        if src >= self.nodes || dest >= self.nodes {
            return None;
        }
        self.pairs.get_mut(src * self.nodes + dest)
    }

    /// Total flits ejected across classes and nodes.
    pub fn total_accepted_flits(&self) -> u64 {
        self.classes.iter().flat_map(|c| &c.accepted_flits).sum()
    }

    /// Total packets ejected across classes and nodes.
    pub fn total_accepted_packets(&self) -> u64 {
        self.classes.iter().flat_map(|c| &c.accepted_packets).sum()
    }

    /// Total flits injected across classes and nodes.
    pub fn total_sent_flits(&self) -> u64 {
        self.classes.iter().flat_map(|c| &c.sent_flits).sum()
    }

    /// Total packets injected across classes and nodes.
    pub fn total_sent_packets(&self) -> u64 {
        self.classes.iter().flat_map(|c| &c.sent_packets).sum()
    }

    pub(crate) fn send_flit(&mut self, class: ClassId, node: NodeId, head: bool) {
        if let Some(c) = self.classes.get_mut(class) {
            bump(&mut c.sent_flits, node);
            if head {
                bump(&mut c.sent_packets, node);
            }
        }
    }

    pub(crate) fn accept_flit(&mut self, class: ClassId, node: NodeId, tail: bool) {
        if let Some(c) = self.classes.get_mut(class) {
            bump(&mut c.accepted_flits, node);
            if tail {
                bump(&mut c.accepted_packets, node);
            }
        }
    }

    pub(crate) fn record_flit(
        &mut self,
        class: ClassId,
        src: NodeId,
        dest: NodeId,
        flit: FlitId,
        latency: i64,
    ) {
        if let Some(c) = self.classes.get_mut(class) {
            if c.flit_latency.max().is_none_or(|m| m < latency) {
                c.slowest_flit = Some(flit);
            }
            c.flit_latency.add_sample(latency);
        }
        if let Some(p) = self.pair_mut(src, dest) {
            p.flit_latency.add_sample(latency);
        }
    }

    pub(crate) fn record_packet(
        &mut self,
        class: ClassId,
        src: NodeId,
        dest: NodeId,
        sample: &PacketSample,
    ) {
        if let Some(c) = self.classes.get_mut(class) {
            if c.packet_latency.max().is_none_or(|m| m < sample.packet_latency) {
                c.slowest_packet = Some(sample.pid);
            }
            c.packet_latency.add_sample(sample.packet_latency);
            c.network_latency.add_sample(sample.network_latency);
            c.fragmentation.add_sample(sample.fragmentation);
            c.hops.add_sample(i64::from(sample.hops));
        }
        if let Some(p) = self.pair_mut(src, dest) {
            p.packet_latency.add_sample(sample.packet_latency);
            p.network_latency.add_sample(sample.network_latency);
        }
    }

    pub(crate) fn adjust_outstanding(&mut self, node: NodeId, delta: i64) {
        if let Some(n) = self.requests_outstanding.get_mut(node) {
            *n += delta;
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of `"summary"`, `"latency"`,
    /// `"throughput"`, or `"pairs"`. Pass an empty slice to print all sections.
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();

        if want("summary") {
            let khz = if seconds > 0.0 {
                (self.cycles as f64 / seconds) / 1000.0
            } else {
                0.0
            };
            println!("\n==========================================================");
            println!("NETWORK TRAFFIC STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {:.4} s", seconds);
            println!("sim_cycles               {}", self.cycles);
            println!("sim_freq                 {:.2} kHz", khz);
            println!("sent_packets             {}", self.total_sent_packets());
            println!("sent_flits               {}", self.total_sent_flits());
            println!("accepted_packets         {}", self.total_accepted_packets());
            println!("accepted_flits           {}", self.total_accepted_flits());
            println!(
                "requests_outstanding     {}",
                self.requests_outstanding.iter().sum::<i64>()
            );
            println!("----------------------------------------------------------");
        }
        if want("latency") {
            let print_sample = |name: &str, s: &SampleStats| {
                println!(
                    "  {:<16} avg: {:<10.2} | min: {:<8} | max: {:<8} | samples: {}",
                    name,
                    s.average(),
                    s.min().unwrap_or(0),
                    s.max().unwrap_or(0),
                    s.count()
                );
            };
            println!("LATENCY");
            for (cl, c) in self.classes.iter().enumerate() {
                println!(" class {cl}");
                print_sample("flit_latency", &c.flit_latency);
                print_sample("packet_latency", &c.packet_latency);
                print_sample("network_latency", &c.network_latency);
                print_sample("fragmentation", &c.fragmentation);
                print_sample("hops", &c.hops);
                if let Some(f) = c.slowest_flit {
                    println!("  slowest_flit     {f}");
                }
                if let Some(p) = c.slowest_packet {
                    println!("  slowest_packet   {p}");
                }
            }
            println!("----------------------------------------------------------");
        }
        if want("throughput") {
            let cyc = self.cycles.max(1) as f64;
            println!("THROUGHPUT");
            for (cl, c) in self.classes.iter().enumerate() {
                println!(" class {cl}");
                for node in 0..self.nodes {
                    println!(
                        "  node {:<4} sent: {:<8} ({:<6} pkts) | accepted: {:<8} ({:<6} pkts) | rate: {:.4} flits/cycle",
                        node,
                        c.sent_flits[node],
                        c.sent_packets[node],
                        c.accepted_flits[node],
                        c.accepted_packets[node],
                        c.accepted_flits[node] as f64 / cyc
                    );
                }
            }
            println!("----------------------------------------------------------");
        }
        if want("pairs") && !self.pairs.is_empty() {
            println!("PAIRS");
            for src in 0..self.nodes {
                for dest in 0..self.nodes {
                    let Some(p) = self.pair(src, dest) else {
                        continue;
                    };
                    if p.packet_latency.count() == 0 {
                        continue;
                    }
                    println!(
                        "  {:>4} -> {:<4} plat: {:<10.2} | nlat: {:<10.2} | flat: {:.2}",
                        src,
                        dest,
                        p.packet_latency.average(),
                        p.network_latency.average(),
                        p.flit_latency.average()
                    );
                }
            }
            println!("----------------------------------------------------------");
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

fn bump(counters: &mut [u64], node: NodeId) {
    if let Some(n) = counters.get_mut(node) {
        *n += 1;
    }
}
