//! An integer primal network simplex with Big-M artificial arcs, five
//! classical pivot rules, and a shielded pivot rule specialized to
//! [`GridGraph`].
//!
//! The tree-pivot machinery below is a textbook primal simplex: a star
//! spanning tree rooted at an artificial node, Big-M costs driving
//! artificial flow to zero, and a whole-tree potential/depth recompute
//! after every pivot rather than an amortized thread-indexed reroot. That
//! trade only costs performance -- every pivot still leaves a valid
//! spanning-tree basis with zero reduced cost on every tree arc, so the
//! computed flow and objective are exact.

use crate::bipartite::ArcId;
use crate::grid_graph::{sort_support, GridGraph, Support};

/// Total accumulated cost, widened to `i128` so large grids can't overflow
/// it even though individual arc costs and flows are `i64`.
pub type TotalCost = i128;

/// Outcome of a solve.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProblemType {
    Optimal,
    Infeasible,
    Unbounded,
}

/// How the sum of node supplies relates to the sum of node demands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SupplyType {
    /// Total supply may exceed total demand; excess supply is absorbed by
    /// an internal slack sink.
    Geq,
    /// Total demand may exceed total supply; the shortfall is covered by
    /// an internal slack source.
    Leq,
    /// Total supply equals total demand exactly.
    Eq,
}

/// Which arc the simplex pivots in on each iteration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PivotRule {
    FirstEligible,
    BestEligible,
    BlockSearch,
    CandidateList,
    AlteringList,
    /// Only meaningful via [`run_shielded`]; passing it to
    /// [`NetSimplex::run`] panics.
    Shielded,
}

/// A read-only view a [`NetSimplex`] needs of its host graph: node and arc
/// counts, arc endpoints (as global node indices), arc costs, and node
/// supplies (positive for sources, negative for sinks, zero for transshipment
/// nodes).
pub trait FlowNetwork {
    fn node_num(&self) -> usize;
    fn arc_num(&self) -> usize;
    fn arc_source(&self, a: usize) -> usize;
    fn arc_target(&self, a: usize) -> usize;
    fn arc_cost(&self, a: usize) -> i64;
    fn node_supply(&self, n: usize) -> i64;
}

impl<const D: usize> FlowNetwork for GridGraph<D> {
    fn node_num(&self) -> usize {
        GridGraph::node_num(self)
    }

    fn arc_num(&self) -> usize {
        GridGraph::arc_num(self)
    }

    fn arc_source(&self, a: usize) -> usize {
        self.node(self.source(ArcId(a as u32))).index()
    }

    fn arc_target(&self, a: usize) -> usize {
        self.blue_node(self.target(ArcId(a as u32))).index()
    }

    fn arc_cost(&self, a: usize) -> i64 {
        self.cost(ArcId(a as u32))
    }

    fn node_supply(&self, n: usize) -> i64 {
        self.supply(crate::bipartite::NodeId(n as u32))
    }
}

const INF: i64 = i64::MAX / 4;
/// Candidate-list size cap for [`PivotRule::CandidateList`] and
/// [`PivotRule::AlteringList`].
const LIST_CAP: usize = 64;
/// Rebuild interval for [`PivotRule::AlteringList`]'s extended scan.
const ALTER_PERIOD: usize = 8;

struct Tableau {
    /// Node count including an optional slack node, excluding the root.
    n: usize,
    root: usize,
    /// Arc count including slack and artificial arcs.
    total_arcs: usize,
    /// First artificial-arc index.
    artificial_start: usize,
    source: Vec<usize>,
    target: Vec<usize>,
    cost: Vec<i64>,
    flow: Vec<i64>,
    in_tree: Vec<bool>,
    parent: Vec<usize>,
    pred_arc: Vec<usize>,
    /// `true` iff the tree arc to `parent[i]` is directed `i -> parent[i]`.
    pred_dir: Vec<bool>,
    depth: Vec<usize>,
    potential: Vec<i64>,
}

impl Tableau {
    fn reduced_cost(&self, a: usize) -> i64 {
        self.cost[a] - self.potential[self.source[a]] + self.potential[self.target[a]]
    }

    /// Rebuilds `parent`/`pred_arc`/`pred_dir`/`depth`/`potential` from
    /// `in_tree` via a BFS from the root. O(n) per call, deliberately --
    /// see the module doc comment.
    fn rebuild_tree(&mut self) {
        let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); self.n + 1];
        for a in 0..self.total_arcs {
            if self.in_tree[a] {
                adjacency[self.source[a]].push((self.target[a], a));
                adjacency[self.target[a]].push((self.source[a], a));
            }
        }

        for v in self.parent.iter_mut() {
            *v = usize::MAX;
        }
        self.depth[self.root] = 0;
        self.potential[self.root] = 0;

        let mut queue = std::collections::VecDeque::new();
        queue.push_back(self.root);
        let mut visited = vec![false; self.n + 1];
        visited[self.root] = true;

        while let Some(u) = queue.pop_front() {
            for &(v, a) in &adjacency[u] {
                if visited[v] {
                    continue;
                }
                visited[v] = true;
                self.parent[v] = u;
                self.pred_arc[v] = a;
                self.pred_dir[v] = self.source[a] == v;
                self.depth[v] = self.depth[u] + 1;
                self.potential[v] = if self.pred_dir[v] {
                    self.potential[u] + self.cost[a]
                } else {
                    self.potential[u] - self.cost[a]
                };
                queue.push_back(v);
            }
        }
    }

    fn lca(&self, mut u: usize, mut v: usize) -> usize {
        while self.depth[u] > self.depth[v] {
            u = self.parent[u];
        }
        while self.depth[v] > self.depth[u] {
            v = self.parent[v];
        }
        while u != v {
            u = self.parent[u];
            v = self.parent[v];
        }
        u
    }

    /// Performs one pivot on entering arc `e`. Returns `false` (unbounded)
    /// if the cycle has no flow-bounded arc opposing the entering
    /// direction.
    fn pivot(&mut self, e: usize) -> bool {
        let u = self.source[e];
        let v = self.target[e];
        let anchor = self.lca(u, v);

        // backward (cycle-opposing) tree arcs bound how far we can push e.
        let mut backward: Vec<(i64, usize, usize)> = Vec::new(); // (flow, arc, child)
        let mut forward: Vec<usize> = Vec::new();

        let mut x = v;
        while x != anchor {
            let a = self.pred_arc[x];
            if self.pred_dir[x] {
                forward.push(a);
            } else {
                backward.push((self.flow[a], a, x));
            }
            x = self.parent[x];
        }
        let mut x = u;
        while x != anchor {
            let a = self.pred_arc[x];
            if self.pred_dir[x] {
                backward.push((self.flow[a], a, x));
            } else {
                forward.push(a);
            }
            x = self.parent[x];
        }

        let Some(&(theta, leaving_arc, _)) = backward.iter().min_by_key(|&&(f, _, _)| f) else {
            return false;
        };

        self.flow[e] += theta;
        for a in forward {
            self.flow[a] += theta;
        }
        for (_, a, _) in backward {
            self.flow[a] -= theta;
        }

        self.in_tree[leaving_arc] = false;
        self.in_tree[e] = true;
        self.rebuild_tree();
        true
    }
}

/// A configurable, single-use network simplex solver.
pub struct NetSimplex {
    node_num: usize,
    arc_num: usize,
    arc_source: Vec<usize>,
    arc_target: Vec<usize>,
    arc_cost: Vec<i64>,
    supply: Vec<i64>,
    supply_type: SupplyType,
    result: Option<SolveResult>,
}

struct SolveResult {
    status: ProblemType,
    flow: Vec<i64>,
    potential: Vec<i64>,
    total_cost: TotalCost,
}

impl NetSimplex {
    /// Copies `net`'s arcs and node supplies; defaults to [`SupplyType::Eq`].
    pub fn new(net: &impl FlowNetwork) -> Self {
        let arc_num = net.arc_num();
        let node_num = net.node_num();
        let mut arc_source = Vec::with_capacity(arc_num);
        let mut arc_target = Vec::with_capacity(arc_num);
        let mut arc_cost = Vec::with_capacity(arc_num);
        for a in 0..arc_num {
            arc_source.push(net.arc_source(a));
            arc_target.push(net.arc_target(a));
            arc_cost.push(net.arc_cost(a));
        }
        let supply = (0..node_num).map(|n| net.node_supply(n)).collect();

        NetSimplex {
            node_num,
            arc_num,
            arc_source,
            arc_target,
            arc_cost,
            supply,
            supply_type: SupplyType::Eq,
            result: None,
        }
    }

    pub fn with_supply_type(mut self, t: SupplyType) -> Self {
        self.supply_type = t;
        self
    }

    /// Runs the solve to completion and records the result.
    pub fn run(&mut self, rule: PivotRule) -> ProblemType {
        assert_ne!(
            rule,
            PivotRule::Shielded,
            "PivotRule::Shielded only applies through run_shielded"
        );

        let total_supply: i64 = self.supply.iter().filter(|&&s| s > 0).sum();
        let total_demand: i64 = self.supply.iter().filter(|&&s| s < 0).map(|s| -s).sum();

        let (mut supply, slack_arcs): (Vec<i64>, Vec<(usize, usize)>) = match self.supply_type {
            SupplyType::Eq => {
                assert_eq!(
                    total_supply, total_demand,
                    "SupplyType::Eq requires total supply to equal total demand"
                );
                (self.supply.clone(), Vec::new())
            }
            SupplyType::Geq => {
                assert!(
                    total_supply >= total_demand,
                    "SupplyType::Geq requires total supply >= total demand"
                );
                let slack = self.node_num;
                let mut supply = self.supply.clone();
                supply.push(-(total_supply - total_demand));
                let arcs = (0..self.node_num)
                    .filter(|&n| self.supply[n] > 0)
                    .map(|n| (n, slack))
                    .collect();
                (supply, arcs)
            }
            SupplyType::Leq => {
                assert!(
                    total_demand >= total_supply,
                    "SupplyType::Leq requires total demand >= total supply"
                );
                let slack = self.node_num;
                let mut supply = self.supply.clone();
                supply.push(total_demand - total_supply);
                let arcs = (0..self.node_num)
                    .filter(|&n| self.supply[n] < 0)
                    .map(|n| (slack, n))
                    .collect();
                (supply, arcs)
            }
        };
        let has_slack = !matches!(self.supply_type, SupplyType::Eq);
        if !has_slack {
            debug_assert_eq!(supply.iter().sum::<i64>(), 0);
        }

        let n = supply.len();
        let root = n;
        let slack_arc_num = slack_arcs.len();
        let artificial_start = self.arc_num + slack_arc_num;
        let total_arcs = artificial_start + n;

        let mut source = vec![0usize; total_arcs];
        let mut target = vec![0usize; total_arcs];
        let mut cost = vec![0i64; total_arcs];
        let mut flow = vec![0i64; total_arcs];
        let mut in_tree = vec![false; total_arcs];

        source[..self.arc_num].copy_from_slice(&self.arc_source);
        target[..self.arc_num].copy_from_slice(&self.arc_target);
        cost[..self.arc_num].copy_from_slice(&self.arc_cost);

        for (i, &(s, t)) in slack_arcs.iter().enumerate() {
            let a = self.arc_num + i;
            source[a] = s;
            target[a] = t;
            cost[a] = 0;
        }

        let big_m = 1 + self
            .arc_cost
            .iter()
            .map(|c| c.unsigned_abs())
            .sum::<u64>()
            .saturating_mul(n as u64 + 1)
            .min(i64::MAX as u64 / 2) as i64;

        for i in 0..n {
            let a = artificial_start + i;
            if supply[i] >= 0 {
                source[a] = i;
                target[a] = root;
                flow[a] = supply[i];
            } else {
                source[a] = root;
                target[a] = i;
                flow[a] = -supply[i];
            }
            cost[a] = big_m;
            in_tree[a] = true;
        }

        let mut tableau = Tableau {
            n,
            root,
            total_arcs,
            artificial_start,
            source,
            target,
            cost,
            flow,
            in_tree,
            parent: vec![usize::MAX; n + 1],
            pred_arc: vec![0; n + 1],
            pred_dir: vec![false; n + 1],
            depth: vec![0; n + 1],
            potential: vec![0; n + 1],
        };
        tableau.rebuild_tree();

        let status = run_pivots(&mut tableau, rule);

        let total_cost: TotalCost = (0..self.arc_num)
            .map(|a| tableau.flow[a] as TotalCost * tableau.cost[a] as TotalCost)
            .sum();

        self.result = Some(SolveResult {
            status,
            flow: tableau.flow[..self.arc_num].to_vec(),
            potential: tableau.potential[..self.node_num].to_vec(),
            total_cost,
        });
        status
    }

    fn result(&self) -> &SolveResult {
        self.result.as_ref().expect("NetSimplex::run was not called")
    }

    pub fn problem_type(&self) -> ProblemType {
        self.result().status
    }

    pub fn flow(&self, a: usize) -> i64 {
        self.result().flow[a]
    }

    pub fn potential(&self, n: usize) -> i64 {
        self.result().potential[n]
    }

    pub fn total_cost(&self) -> TotalCost {
        self.result().total_cost
    }

    /// Like [`NetSimplex::run`], but seeds the tableau from a prior optimal
    /// solve's support instead of a Big-M artificial on every node.
    /// `warm_arcs[i]` is this graph's arc index for `extract_support_with_flow`'s
    /// `i`-th support pair, and `warm_flow[i]` its flow; together they must
    /// describe a forest (always true for a support extracted from a tree
    /// solution). One artificial arc is attached per forest component to
    /// complete the spanning tree, at zero flow.
    ///
    /// Requires [`SupplyType::Eq`]: the warm flow must already satisfy every
    /// node's balance equation by itself, which only holds when the prior
    /// solve's artificial (and, for Geq/Leq, slack) flow was all zero.
    pub fn run_warm_started(
        &mut self,
        rule: PivotRule,
        warm_arcs: &[usize],
        warm_flow: &[i64],
    ) -> ProblemType {
        assert_ne!(
            rule,
            PivotRule::Shielded,
            "PivotRule::Shielded only applies through run_shielded"
        );
        assert_eq!(
            self.supply_type,
            SupplyType::Eq,
            "run_warm_started requires SupplyType::Eq"
        );
        assert_eq!(warm_arcs.len(), warm_flow.len());
        debug_assert_eq!(self.supply.iter().sum::<i64>(), 0);

        let n = self.node_num;
        let root = n;
        let artificial_start = self.arc_num;
        let total_arcs = artificial_start + n;

        let mut source = vec![0usize; total_arcs];
        let mut target = vec![0usize; total_arcs];
        let mut cost = vec![0i64; total_arcs];
        let mut flow = vec![0i64; total_arcs];
        let mut in_tree = vec![false; total_arcs];

        source[..self.arc_num].copy_from_slice(&self.arc_source);
        target[..self.arc_num].copy_from_slice(&self.arc_target);
        cost[..self.arc_num].copy_from_slice(&self.arc_cost);

        let big_m = 1 + self
            .arc_cost
            .iter()
            .map(|c| c.unsigned_abs())
            .sum::<u64>()
            .saturating_mul(n as u64 + 1)
            .min(i64::MAX as u64 / 2) as i64;

        for i in 0..n {
            let a = artificial_start + i;
            if self.supply[i] >= 0 {
                source[a] = i;
                target[a] = root;
            } else {
                source[a] = root;
                target[a] = i;
            }
            cost[a] = big_m;
        }

        fn find(uf: &mut [usize], mut x: usize) -> usize {
            while uf[x] != x {
                uf[x] = uf[uf[x]];
                x = uf[x];
            }
            x
        }

        let mut uf: Vec<usize> = (0..n).collect();
        for (&a, &f) in warm_arcs.iter().zip(warm_flow) {
            flow[a] = f;
            in_tree[a] = true;
            let ru = find(&mut uf, self.arc_source[a]);
            let rv = find(&mut uf, self.arc_target[a]);
            if ru != rv {
                uf[ru] = rv;
            }
        }

        let mut has_artificial = vec![false; n];
        for i in 0..n {
            let r = find(&mut uf, i);
            if !has_artificial[r] {
                has_artificial[r] = true;
                in_tree[artificial_start + r] = true;
            }
        }

        let mut tableau = Tableau {
            n,
            root,
            total_arcs,
            artificial_start,
            source,
            target,
            cost,
            flow,
            in_tree,
            parent: vec![usize::MAX; n + 1],
            pred_arc: vec![0; n + 1],
            pred_dir: vec![false; n + 1],
            depth: vec![0; n + 1],
            potential: vec![0; n + 1],
        };
        tableau.rebuild_tree();

        let status = run_pivots(&mut tableau, rule);

        let total_cost: TotalCost = (0..self.arc_num)
            .map(|a| tableau.flow[a] as TotalCost * tableau.cost[a] as TotalCost)
            .sum();

        self.result = Some(SolveResult {
            status,
            flow: tableau.flow[..self.arc_num].to_vec(),
            potential: tableau.potential[..self.node_num].to_vec(),
            total_cost,
        });
        status
    }
}

fn run_pivots(tableau: &mut Tableau, rule: PivotRule) -> ProblemType {
    let bounded = match rule {
        PivotRule::FirstEligible => run_first_eligible(tableau),
        PivotRule::BestEligible => run_best_eligible(tableau),
        PivotRule::BlockSearch => run_block_search(tableau),
        PivotRule::CandidateList => run_candidate_list(tableau, false),
        PivotRule::AlteringList => run_candidate_list(tableau, true),
        PivotRule::Shielded => unreachable!("guarded in NetSimplex::run"),
    };
    if !bounded {
        return ProblemType::Unbounded;
    }
    finish(tableau)
}

fn finish(tableau: &Tableau) -> ProblemType {
    let artificial_flow: i64 = (0..tableau.n).map(|i| tableau.flow[tableau.artificial_start + i]).sum();
    if artificial_flow == 0 {
        ProblemType::Optimal
    } else {
        ProblemType::Infeasible
    }
}

fn run_first_eligible(tableau: &mut Tableau) -> bool {
    let mut cursor = 0usize;
    loop {
        let mut found = None;
        for offset in 0..tableau.total_arcs {
            let a = (cursor + offset) % tableau.total_arcs;
            if !tableau.in_tree[a] && tableau.reduced_cost(a) < 0 {
                found = Some(a);
                break;
            }
        }
        match found {
            None => return true,
            Some(a) => {
                cursor = (a + 1) % tableau.total_arcs;
                if !tableau.pivot(a) {
                    return false;
                }
            }
        }
    }
}

fn run_best_eligible(tableau: &mut Tableau) -> bool {
    loop {
        let best = (0..tableau.total_arcs)
            .filter(|&a| !tableau.in_tree[a])
            .map(|a| (tableau.reduced_cost(a), a))
            .filter(|&(rc, _)| rc < 0)
            .min_by_key(|&(rc, _)| rc);
        match best {
            None => return true,
            Some((_, a)) => {
                if !tableau.pivot(a) {
                    return false;
                }
            }
        }
    }
}

fn run_block_search(tableau: &mut Tableau) -> bool {
    let block_size = (tableau.total_arcs as f64).sqrt().ceil().max(1.0) as usize;
    let mut block_start = 0usize;
    let mut scanned_blocks = 0usize;
    let num_blocks = tableau.total_arcs.div_ceil(block_size).max(1);

    loop {
        let end = (block_start + block_size).min(tableau.total_arcs);
        let best = (block_start..end)
            .filter(|&a| !tableau.in_tree[a])
            .map(|a| (tableau.reduced_cost(a), a))
            .filter(|&(rc, _)| rc < 0)
            .min_by_key(|&(rc, _)| rc);

        block_start = if end >= tableau.total_arcs { 0 } else { end };

        match best {
            Some((_, a)) => {
                scanned_blocks = 0;
                if !tableau.pivot(a) {
                    return false;
                }
            }
            None => {
                scanned_blocks += 1;
                if scanned_blocks >= num_blocks {
                    return true;
                }
            }
        }
    }
}

fn run_candidate_list(tableau: &mut Tableau, altering: bool) -> bool {
    let mut list: Vec<usize> = Vec::new();
    let mut iterations_since_rebuild = 0usize;

    loop {
        list.retain(|&a| !tableau.in_tree[a] && tableau.reduced_cost(a) < 0);

        let needs_rebuild = list.is_empty() || (altering && iterations_since_rebuild >= ALTER_PERIOD);
        if needs_rebuild {
            list.clear();
            for a in 0..tableau.total_arcs {
                if !tableau.in_tree[a] && tableau.reduced_cost(a) < 0 {
                    list.push(a);
                    if list.len() >= LIST_CAP {
                        break;
                    }
                }
            }
            iterations_since_rebuild = 0;
        }

        let Some((pos, &a)) = list
            .iter()
            .enumerate()
            .min_by_key(|&(_, &a)| tableau.reduced_cost(a))
        else {
            return true;
        };
        list.swap_remove(pos);
        iterations_since_rebuild += 1;
        if !tableau.pivot(a) {
            return false;
        }
    }
}

/// Runs the shielded pivot rule on `graph`: solves over the currently
/// materialized arcs with `inner_rule`, then certifies the result against
/// every arc in the positive-flow support's full shield rectangle. Every
/// arc solved over in this or an earlier round already has a non-negative
/// reduced cost -- the just-completed inner solve wouldn't have stopped
/// otherwise -- so only the arcs the widened shield newly covers can
/// possibly improve on it. If any of those has a strictly negative reduced
/// cost under the solved potentials, it's materialized and the inner solve
/// re-runs; this repeats until certification finds nothing, which proves
/// global optimality (Schmitzer 2016).
pub fn run_shielded<const D: usize>(
    graph: &mut GridGraph<D>,
    supply_type: SupplyType,
    inner_rule: PivotRule,
) -> (ProblemType, NetSimplex) {
    assert_ne!(inner_rule, PivotRule::Shielded);

    loop {
        let mut simplex = NetSimplex::new(graph).with_supply_type(supply_type);
        let status = simplex.run(inner_rule);
        if status != ProblemType::Optimal {
            return (status, simplex);
        }

        let support = extract_support(graph, &simplex);
        let arcs_before = graph.arc_num();
        graph.update_shield(&support);

        let improving = (arcs_before..graph.arc_num()).any(|a| {
            let arc = ArcId(a as u32);
            let x_node = graph.node(graph.source(arc)).index();
            let y_node = graph.blue_node(graph.target(arc)).index();
            graph.cost(arc) - simplex.potential(x_node) + simplex.potential(y_node) < 0
        });

        if !improving {
            return (ProblemType::Optimal, simplex);
        }
    }
}

/// The sorted set of arcs carrying strictly positive flow.
pub fn extract_support<const D: usize>(graph: &GridGraph<D>, simplex: &NetSimplex) -> Support {
    let mut support = Vec::new();
    for a in graph.arcs() {
        if simplex.flow(a.index()) > 0 {
            support.push((graph.source(a), graph.target(a)));
        }
    }
    sort_support(&mut support);
    support
}

/// Like [`extract_support`], but also returns the flow carried on each
/// support arc, aligned by index with the returned [`Support`]. Used to
/// warm-start a later solve from this one's optimal basis.
pub fn extract_support_with_flow<const D: usize>(
    graph: &GridGraph<D>,
    simplex: &NetSimplex,
) -> (Support, Vec<i64>) {
    let mut pairs = Vec::new();
    for a in graph.arcs() {
        let f = simplex.flow(a.index());
        if f > 0 {
            pairs.push((graph.source(a), graph.target(a), f));
        }
    }
    pairs.sort_by_key(|&(x, y, _)| (x.0, y.0));
    let support = pairs.iter().map(|&(x, y, _)| (x, y)).collect();
    let flow = pairs.iter().map(|&(_, _, f)| f).collect();
    (support, flow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_graph::GridGraph as Grid;

    #[test]
    fn two_by_two_full_bipartite_matches_known_objective() {
        // scenario S1: 2x2 source/target grids, unit supplies/demands at
        // diagonal corners, full bipartite arc set.
        let x_dim = [2i64, 2];
        let y_dim = [2i64, 2];
        let supply = vec![2, 0, 0, 2, -1, -1, -1, -1];
        let mut g = Grid::<2>::new(x_dim, y_dim, supply, true);
        let mut simplex = NetSimplex::new(&g).with_supply_type(SupplyType::Eq);
        let status = simplex.run(PivotRule::BestEligible);
        assert_eq!(status, ProblemType::Optimal);
        assert_eq!(simplex.total_cost(), 2);
        let _ = &mut g;
    }

    #[test]
    fn geq_absorbs_excess_supply_at_zero_cost() {
        let x_dim = [2i64];
        let y_dim = [2i64];
        let supply = vec![3, 0, -1, -1];
        let g = Grid::<1>::new(x_dim, y_dim, supply, true);
        let mut simplex = NetSimplex::new(&g).with_supply_type(SupplyType::Geq);
        let status = simplex.run(PivotRule::FirstEligible);
        assert_eq!(status, ProblemType::Optimal);
    }

    #[test]
    fn pivot_rules_agree_on_objective() {
        let x_dim = [3i64];
        let y_dim = [3i64];
        let supply = vec![1, 2, 0, -1, -1, -1];
        let rules = [
            PivotRule::FirstEligible,
            PivotRule::BestEligible,
            PivotRule::BlockSearch,
            PivotRule::CandidateList,
            PivotRule::AlteringList,
        ];
        let mut costs = Vec::new();
        for rule in rules {
            let g = Grid::<1>::new(x_dim, y_dim, supply.clone(), true);
            let mut simplex = NetSimplex::new(&g).with_supply_type(SupplyType::Eq);
            assert_eq!(simplex.run(rule), ProblemType::Optimal);
            costs.push(simplex.total_cost());
        }
        assert!(costs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn run_shielded_reaches_optimum_from_a_sparse_start() {
        let x_dim = [4i64];
        let y_dim = [4i64];
        let supply = vec![1, 1, 1, 1, -1, -1, -1, -1];
        let mut g = Grid::<1>::new(x_dim, y_dim, supply, false);
        g.rebuild_shield(&Vec::new());
        let (status, simplex) = run_shielded(&mut g, SupplyType::Eq, PivotRule::BestEligible);
        assert_eq!(status, ProblemType::Optimal);
        assert_eq!(simplex.total_cost(), 0);
    }
}
