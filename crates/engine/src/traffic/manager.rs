//! Flit-level traffic manager.
//!
//! `TrafficManager` owns every flit from creation to retirement and drives one
//! `Network` per subnet. Each call to `step` performs, in order:
//! 1. **Deadlock watch:** warn when flits are in flight but nothing has retired
//!    for `deadlock_warn_timeout` cycles.
//! 2. **Ingress:** read at most one ejected flit per idle node and one credit
//!    per node, then latch the substrate inputs.
//! 3. **Arbitration and injection:** per node, pick one class by round robin
//!    and priority, allocate a VC for head flits, and inject one flit.
//! 4. **Egress:** return a credit for every flit read in phase 2 and retire it.
//! 5. **Substrate:** evaluate and publish outputs, then advance the clock.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use tracing::{debug, trace, warn};

use crate::common::context::SimContext;
use crate::common::error::SimError;
use crate::common::ids::{ClassId, Cycle, FlitId, NodeId, PacketId, SubnetId, VcId};
use crate::config::{Config, PriorityScheme};
use crate::flit::{Credit, Flit, FlitType};
use crate::network::buffer::CreditBuffer;
use crate::network::routing::TypeVcRouting;
use crate::network::traits::{BufferState, Network, OutputSet, RoutingFunction};
use crate::stats::{PacketSample, TrafficStats};
use crate::traffic::traits::{ArrivalObserver, TrafficEngine};

/// Flit-level traffic manager over one substrate per subnet.
pub struct TrafficManager<N: Network> {
    ctx: SimContext,
    nodes: usize,
    subnets: usize,
    classes: usize,

    net: Vec<N>,
    /// Injection buffer state, `[node][subnet]`.
    buf_states: Vec<Vec<Box<dyn BufferState + Send + Sync>>>,
    routing: Box<dyn RoutingFunction + Send + Sync>,

    /// Flits awaiting injection, `[subnet][node][class]`.
    input_queue: Vec<Vec<Vec<VecDeque<Flit>>>>,
    /// Ids of every flit not yet retired, per class.
    in_flight: Vec<HashSet<FlitId>>,
    /// Head flits of partially retired packets, per class.
    retired_heads: Vec<HashMap<PacketId, Flit>>,

    /// Last class served, `[node][subnet]`.
    last_class: Vec<Vec<ClassId>>,
    /// Last VC allocated, `[node][subnet][class]`.
    last_vc: Vec<Vec<Vec<Option<VcId>>>>,

    priority: PriorityScheme,
    class_priority: Vec<i32>,
    packet_seq_no: Vec<u64>,
    hold_switch_for_packet: bool,

    deadlock_timer: u64,
    deadlock_warn_timeout: u64,

    cur_id: u64,
    cur_pid: u64,

    stats: TrafficStats,
}

impl<N: Network> TrafficManager<N> {
    /// Creates a manager over `networks` with credit buffers and type-based
    /// VC routing built from `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated engine configuration.
    /// * `ctx` - Simulation context shared with the substrates.
    /// * `networks` - One substrate per configured subnet.
    pub fn new(config: &Config, ctx: SimContext, networks: Vec<N>) -> Result<Self, SimError> {
        let net = &config.network;
        let buf_states = (0..net.nodes)
            .map(|_| {
                (0..net.subnets)
                    .map(|_| {
                        Box::new(CreditBuffer::new(net.num_vcs, net.vc_buf_size))
                            as Box<dyn BufferState + Send + Sync>
                    })
                    .collect()
            })
            .collect();
        let routing = Box::new(TypeVcRouting::from_config(config));
        Self::with_substrate(config, ctx, networks, buf_states, routing)
    }

    /// Creates a manager with caller-supplied buffer states and routing.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine configuration; validated here.
    /// * `ctx` - Simulation context shared with the substrates.
    /// * `networks` - One substrate per configured subnet.
    /// * `buf_states` - Buffer state per `[node][subnet]`.
    /// * `routing` - Injection routing function.
    pub fn with_substrate(
        config: &Config,
        ctx: SimContext,
        networks: Vec<N>,
        buf_states: Vec<Vec<Box<dyn BufferState + Send + Sync>>>,
        routing: Box<dyn RoutingFunction + Send + Sync>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let nodes = config.network.nodes;
        let subnets = config.network.subnets;
        let classes = config.traffic.classes;

        if networks.len() != subnets {
            return Err(SimError::NetworkMismatch(format!(
                "{} substrates supplied for {subnets} subnets",
                networks.len()
            )));
        }
        if let Some((subnet, n)) = networks
            .iter()
            .enumerate()
            .find(|(_, n)| n.num_nodes() != nodes)
        {
            return Err(SimError::NetworkMismatch(format!(
                "subnet {subnet} has {} nodes, expected {nodes}",
                n.num_nodes()
            )));
        }
        if buf_states.len() != nodes || buf_states.iter().any(|b| b.len() != subnets) {
            return Err(SimError::NetworkMismatch(format!(
                "buffer states must be shaped [{nodes}][{subnets}]"
            )));
        }

        Ok(Self {
            ctx,
            nodes,
            subnets,
            classes,
            net: networks,
            buf_states,
            routing,
            input_queue: (0..subnets)
                .map(|_| (0..nodes).map(|_| vec![VecDeque::new(); classes]).collect())
                .collect(),
            in_flight: vec![HashSet::new(); classes],
            retired_heads: vec![HashMap::new(); classes],
            last_class: vec![vec![0; subnets]; nodes],
            last_vc: vec![vec![vec![None; classes]; subnets]; nodes],
            priority: config.traffic.priority,
            class_priority: (0..classes)
                .map(|c| config.traffic.class_priority(c))
                .collect(),
            packet_seq_no: vec![0; nodes],
            hold_switch_for_packet: config.traffic.hold_switch_for_packet,
            deadlock_timer: 0,
            deadlock_warn_timeout: config.traffic.deadlock_warn_timeout,
            cur_id: 0,
            cur_pid: 0,
            stats: TrafficStats::new(nodes, classes, config.general.pair_stats),
        })
    }

    /// Current simulation cycle.
    pub fn time(&self) -> Cycle {
        self.ctx.now()
    }

    /// Simulation context shared with the substrates.
    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    /// Number of nodes.
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// Number of subnets.
    pub fn subnets(&self) -> usize {
        self.subnets
    }

    /// Number of traffic classes.
    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Statistics gathered so far.
    pub fn stats(&self) -> &TrafficStats {
        &self.stats
    }

    /// Substrate of `subnet`.
    pub fn network(&self, subnet: SubnetId) -> Option<&N> {
        self.net.get(subnet)
    }

    /// Mutable substrate of `subnet`.
    pub fn network_mut(&mut self, subnet: SubnetId) -> Option<&mut N> {
        self.net.get_mut(subnet)
    }

    /// Buffer state of `node` on `subnet`.
    pub fn buffer_state(
        &self,
        node: NodeId,
        subnet: SubnetId,
    ) -> Option<&(dyn BufferState + Send + Sync)> {
        self.buf_states.get(node)?.get(subnet).map(|b| &**b)
    }

    /// Flits waiting for injection in one input queue.
    pub fn queued_flits(&self, subnet: SubnetId, node: NodeId, class: ClassId) -> usize {
        self.input_queue
            .get(subnet)
            .and_then(|s| s.get(node))
            .and_then(|n| n.get(class))
            .map_or(0, VecDeque::len)
    }

    /// Flits generated but not yet retired, across classes.
    pub fn flits_in_flight(&self) -> usize {
        self.in_flight.iter().map(HashSet::len).sum()
    }

    /// Head flits parked while their packet's tail is outstanding.
    pub fn pending_heads(&self) -> usize {
        self.retired_heads.iter().map(HashMap::len).sum()
    }

    /// Requests from `node` still awaiting a reply.
    pub fn requests_outstanding(&self, node: NodeId) -> i64 {
        self.stats.requests_outstanding.get(node).copied().unwrap_or(0)
    }

    /// Priority for a new packet under the configured scheme.
    fn packet_priority(&self, source: NodeId, class: ClassId, time: Cycle) -> i32 {
        match self.priority {
            PriorityScheme::ClassBased => self.class_priority.get(class).copied().unwrap_or(0),
            PriorityScheme::AgeBased => inverted(time),
            PriorityScheme::SequenceBased => inverted(self.packet_seq_no[source]),
            PriorityScheme::NetworkAgeBased | PriorityScheme::None => 0,
        }
    }

    fn check_deadlock(&mut self, now: Cycle) {
        if self.in_flight.iter().all(HashSet::is_empty) {
            return;
        }
        let idle = self.deadlock_timer;
        self.deadlock_timer += 1;
        if idle >= self.deadlock_warn_timeout {
            self.deadlock_timer = 0;
            warn!(
                cycle = now,
                in_flight = self.flits_in_flight(),
                "possible network deadlock: no flit retired for {idle} cycles"
            );
        }
    }

    /// Picks the class whose front flit is injected at (`subnet`, `node`).
    fn arbitrate(&mut self, subnet: SubnetId, node: NodeId, now: Cycle) -> Option<ClassId> {
        let last_class = self.last_class[node][subnet];
        let dest_buf = &*self.buf_states[node][subnet];
        let queues = &mut self.input_queue[subnet][node];

        let mut class_limit = self.classes;
        let mut best: Option<(ClassId, i32)> = None;

        if self.hold_switch_for_packet
            && let Some(front) = queues[last_class].front()
            && !front.head
            && let Some(vc) = front.vc
            && !dest_buf.is_full_for(vc)
        {
            debug_assert_eq!(Some(vc), self.last_vc[node][subnet][last_class]);
            best = Some((last_class, front.pri));
            class_limit -= 1;
        }

        for i in 1..=class_limit {
            let class = (last_class + i) % self.classes;
            let Some(cf) = queues[class].front_mut() else {
                continue;
            };
            debug_assert_eq!(cf.cl, class);
            debug_assert_eq!(cf.subnet, subnet);

            if best.is_some_and(|(_, pri)| pri >= cf.pri) {
                continue;
            }

            if cf.head && !cf.vc.is_some_and(|vc| dest_buf.is_available_for(vc)) {
                let route = self.routing.route(None, cf, None, true);
                let last_vc = self.last_vc[node][subnet][class];
                cf.vc = select_vc(dest_buf, route, last_vc, cf, node, now);
            }

            match cf.vc {
                None => {
                    if cf.watch {
                        debug!(cycle = now, node, flit = %cf.id, "no output VC found");
                    }
                }
                Some(vc) if dest_buf.is_full_for(vc) => {
                    if cf.watch {
                        debug!(cycle = now, node, flit = %cf.id, vc, "selected VC is full");
                    }
                }
                Some(_) => best = Some((class, cf.pri)),
            }
        }

        best.map(|(class, _)| class)
    }

    /// Moves the front flit of (`subnet`, `node`, `class`) into the substrate.
    fn inject(&mut self, subnet: SubnetId, node: NodeId, class: ClassId, now: Cycle) {
        let queue = &mut self.input_queue[subnet][node][class];
        let Some(mut f) = queue.pop_front() else {
            return;
        };
        let Some(vc) = f.vc else {
            queue.push_front(f);
            return;
        };
        let dest_buf = &mut self.buf_states[node][subnet];

        if f.head {
            dest_buf.take_buffer(vc);
            self.last_vc[node][subnet][class] = Some(vc);
        }
        self.last_class[node][subnet] = class;
        dest_buf.sending_flit(&f);

        if self.priority == PriorityScheme::NetworkAgeBased {
            f.pri = inverted(now);
        }
        if f.watch {
            debug!(cycle = now, node, flit = %f.id, pid = %f.pid, vc, "injecting flit");
        }
        f.itime = now;

        if !f.tail
            && let Some(next) = queue.front_mut()
        {
            debug_assert_eq!(next.pid, f.pid);
            next.vc = Some(vc);
        }

        self.stats.send_flit(class, node, f.head);
        self.net[subnet].write_flit(f, node);
    }
}

/// Scans `route` for a VC that is neither allocated nor full, starting after
/// `last_vc` (or at the range start when `last_vc` lies outside it).
fn select_vc(
    buf: &(dyn BufferState + Send + Sync),
    route: OutputSet,
    last_vc: Option<VcId>,
    flit: &Flit,
    node: NodeId,
    now: Cycle,
) -> Option<VcId> {
    if route.vc_end < route.vc_start {
        return None;
    }
    let width = route.vc_end - route.vc_start + 1;
    let first = match last_vc {
        Some(vc) if route.contains(vc) => vc - route.vc_start + 1,
        _ => 0,
    };
    (0..width)
        .map(|i| route.vc_start + (first + i) % width)
        .find(|&vc| {
            if !buf.is_available_for(vc) {
                if flit.watch {
                    debug!(cycle = now, node, flit = %flit.id, vc, "output VC is busy");
                }
                return false;
            }
            if buf.is_full_for(vc) {
                if flit.watch {
                    debug!(cycle = now, node, flit = %flit.id, vc, "output VC is full");
                }
                return false;
            }
            true
        })
}

/// `i32::MAX - value`, clamped so larger values never wrap to a higher priority.
fn inverted(value: u64) -> i32 {
    i32::MAX - i32::try_from(value).unwrap_or(i32::MAX)
}

/// Signed difference `a - b` of two cycle stamps.
fn elapsed(a: Cycle, b: Cycle) -> i64 {
    let a = i64::try_from(a).unwrap_or(i64::MAX);
    let b = i64::try_from(b).unwrap_or(i64::MAX);
    a.saturating_sub(b)
}

impl<N: Network> TrafficEngine for TrafficManager<N> {
    fn generate_packet(
        &mut self,
        source: NodeId,
        class: ClassId,
        time: Cycle,
        subnet: SubnetId,
        flit_count: usize,
        kind: FlitType,
        dest: NodeId,
    ) -> Result<PacketId, SimError> {
        if dest >= self.nodes {
            return Err(SimError::DestinationOutOfRange {
                dest,
                nodes: self.nodes,
            });
        }
        if source >= self.nodes {
            return Err(SimError::SourceOutOfRange {
                src: source,
                nodes: self.nodes,
            });
        }
        if subnet >= self.subnets {
            return Err(SimError::SubnetOutOfRange {
                subnet,
                subnets: self.subnets,
            });
        }
        if class >= self.classes {
            return Err(SimError::ClassOutOfRange {
                class,
                classes: self.classes,
            });
        }
        if flit_count == 0 {
            return Err(SimError::EmptyPacket { src: source, dest });
        }

        let pid = PacketId(self.cur_pid);
        self.cur_pid += 1;
        let pri = self.packet_priority(source, class, time);
        self.packet_seq_no[source] += 1;

        let queue = &mut self.input_queue[subnet][source][class];
        for i in 0..flit_count {
            let id = FlitId(self.cur_id);
            self.cur_id += 1;

            let mut f = Flit::new(id, pid, class, subnet, source, time);
            f.kind = kind;
            f.head = i == 0;
            f.tail = i == flit_count - 1;
            f.dest = f.head.then_some(dest);
            f.pri = pri;
            f.watch = self.ctx.is_watched(id, pid);
            if f.watch {
                debug!(
                    cycle = time,
                    flit = %id,
                    pid = %pid,
                    src = source,
                    dest,
                    head = f.head,
                    tail = f.tail,
                    "flit generated"
                );
            }

            let _ = self.in_flight[class].insert(id);
            queue.push_back(f);
        }
        Ok(pid)
    }

    fn retire_flit(&mut self, flit: Flit, dest: NodeId) -> Result<(), SimError> {
        self.deadlock_timer = 0;

        let class = flit.cl;
        let tracked = self
            .in_flight
            .get_mut(class)
            .is_some_and(|set| set.remove(&flit.id));
        if !tracked {
            return Err(SimError::FlitNotInFlight {
                flit: flit.id,
                class,
            });
        }
        if flit.head && flit.dest != Some(dest) {
            return Err(SimError::MisroutedFlit {
                flit: flit.id,
                node: dest,
                expected: flit.dest,
            });
        }
        if flit.watch {
            debug!(cycle = flit.atime, node = dest, flit = %flit.id, pid = %flit.pid, "retiring flit");
        }

        self.stats
            .record_flit(class, flit.src, dest, flit.id, elapsed(flit.atime, flit.itime));

        if flit.tail {
            let parked = if flit.head {
                None
            } else {
                let head = self.retired_heads[class].remove(&flit.pid).ok_or(
                    SimError::MissingHeadFlit {
                        flit: flit.id,
                        pid: flit.pid,
                    },
                )?;
                Some(head)
            };
            let head = parked.as_ref().unwrap_or(&flit);

            match flit.kind {
                FlitType::ReadReply | FlitType::WriteReply => {
                    self.stats.adjust_outstanding(dest, -1);
                }
                FlitType::AnyType => self.stats.adjust_outstanding(flit.src, -1),
                FlitType::ReadRequest | FlitType::WriteRequest => {}
            }

            let sample = PacketSample {
                pid: flit.pid,
                hops: flit.hops,
                packet_latency: elapsed(flit.atime, head.ctime),
                network_latency: elapsed(flit.atime, head.itime),
                fragmentation: elapsed(flit.atime, head.atime) - elapsed(flit.id.0, head.id.0),
            };
            self.stats.record_packet(class, flit.src, dest, &sample);
        } else if flit.head {
            let _ = self.retired_heads[class].insert(flit.pid, flit);
        }
        Ok(())
    }

    fn step(&mut self, observer: &mut dyn ArrivalObserver) -> Result<(), SimError> {
        let now = self.ctx.now();
        self.check_deadlock(now);

        let mut arrivals: Vec<Vec<Option<Flit>>> = (0..self.subnets)
            .map(|_| (0..self.nodes).map(|_| None).collect())
            .collect();

        for (subnet, slots) in arrivals.iter_mut().enumerate() {
            for (node, slot) in slots.iter_mut().enumerate() {
                if !observer.is_node_busy(node)
                    && let Some(f) = self.net[subnet].read_flit(node)
                {
                    if f.watch {
                        debug!(cycle = now, node, flit = %f.id, "ejected flit");
                    }
                    self.stats.accept_flit(f.cl, node, f.tail);
                    if f.tail {
                        observer.receive_packet(node, f.pid);
                    }
                    *slot = Some(f);
                }
                if let Some(credit) = self.net[subnet].read_credit(node) {
                    self.buf_states[node][subnet].process_credit(&credit);
                }
            }
            self.net[subnet].read_inputs();
        }

        for subnet in 0..self.subnets {
            for node in 0..self.nodes {
                if let Some(class) = self.arbitrate(subnet, node, now) {
                    self.inject(subnet, node, class, now);
                }
            }
        }

        for (subnet, slots) in arrivals.into_iter().enumerate() {
            for (node, slot) in slots.into_iter().enumerate() {
                let Some(mut f) = slot else {
                    continue;
                };
                f.atime = now;
                match f.vc {
                    Some(vc) => self.net[subnet].write_credit(Credit::new(vc), node),
                    None => warn!(flit = %f.id, node, "ejected flit carries no VC"),
                }
                self.retire_flit(f, node)?;
            }
            self.net[subnet].evaluate();
            self.net[subnet].write_outputs();
        }

        let t = self.ctx.advance();
        self.stats.cycles = t;
        if self.ctx.trace() {
            trace!("TIME {t}");
        }
        Ok(())
    }
}

impl<N: Network> fmt::Debug for TrafficManager<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrafficManager")
            .field("time", &self.ctx.now())
            .field("nodes", &self.nodes)
            .field("subnets", &self.subnets)
            .field("classes", &self.classes)
            .field("flits_in_flight", &self.flits_in_flight())
            .field("pending_heads", &self.pending_heads())
            .finish_non_exhaustive()
    }
}
