//! The coarsen/solve/refine driver: solves a grid optimal-transport
//! instance by recursively coarsening it down to a size the shielded
//! simplex can certify cheaply, then refining level by level, restricting
//! each finer level's candidate arcs to windows around the coarser level's
//! positive-flow support.

use crate::grid::{self, Pos};
use crate::grid_graph::{Support, GridGraph};
use crate::simplex::{
    extract_support, extract_support_with_flow, run_shielded, NetSimplex, PivotRule, ProblemType,
    SupplyType, TotalCost,
};

/// Coarsen/solve/refine driver over a `D`-dimensional grid pair.
pub struct GridSolver {
    merge_num: i64,
    pivot_rule: PivotRule,
    supply_type: SupplyType,
    result: Option<NetSimplex>,
}

impl Default for GridSolver {
    fn default() -> Self {
        GridSolver {
            merge_num: 2,
            pivot_rule: PivotRule::BestEligible,
            supply_type: SupplyType::Eq,
            result: None,
        }
    }
}

impl GridSolver {
    /// A driver merging `merge_num` grid points per axis at each
    /// coarsening step.
    pub fn new(merge_num: i64) -> Self {
        assert!(merge_num >= 1, "merge_num must be positive");
        GridSolver {
            merge_num,
            ..Default::default()
        }
    }

    pub fn with_pivot_rule(mut self, rule: PivotRule) -> Self {
        self.pivot_rule = rule;
        self
    }

    pub fn with_supply_type(mut self, t: SupplyType) -> Self {
        self.supply_type = t;
        self
    }

    /// Solves `graph` by coarsening down to [`grid::hierarchical_depth`]
    /// levels and refining back up, restricting each finer level's
    /// candidate arcs to windows around the next-coarser level's support.
    pub fn run<const D: usize>(&mut self, graph: &mut GridGraph<D>) -> ProblemType {
        let max_depth = grid::hierarchical_depth(&graph.x_dim(), &graph.y_dim(), self.merge_num);
        let (status, simplex) = self.solve_level(graph, max_depth);
        self.result = Some(simplex);
        status
    }

    fn solve_level<const D: usize>(
        &self,
        graph: &mut GridGraph<D>,
        depth: i64,
    ) -> (ProblemType, NetSimplex) {
        if depth <= 0 {
            if graph.arc_num() == 0 {
                graph.add_all_arcs();
            }
            return run_shielded(graph, self.supply_type, self.pivot_rule);
        }

        let mut coarse = GridGraph::coarsened(graph, self.merge_num);
        let (status, coarse_simplex) = self.solve_level(&mut coarse, depth - 1);
        if status != ProblemType::Optimal {
            return (status, coarse_simplex);
        }

        let coarse_support = extract_support(&coarse, &coarse_simplex);
        self.prepare(graph, &coarse, &coarse_support);
        run_shielded(graph, self.supply_type, self.pivot_rule)
    }

    /// Restricts `graph`'s candidate arcs to the windows `coarse`'s
    /// positive-flow support maps to, one `merge_num`-wide box per axis per
    /// coarse arc.
    fn prepare<const D: usize>(&self, graph: &mut GridGraph<D>, coarse: &GridGraph<D>, coarse_support: &Support) {
        graph.clear_arcs();
        let k = self.merge_num;
        let x_dim = graph.x_dim();
        let y_dim = graph.y_dim();

        for &(x, y) in coarse_support {
            let cx = coarse.red_pos(x);
            let cy = coarse.blue_pos(y);
            let mut x_min: Pos<D> = [0; D];
            let mut x_max: Pos<D> = [0; D];
            let mut y_min: Pos<D> = [0; D];
            let mut y_max: Pos<D> = [0; D];
            for i in 0..D {
                x_min[i] = cx[i] * k;
                x_max[i] = (x_min[i] + k).min(x_dim[i]);
                y_min[i] = cy[i] * k;
                y_max[i] = (y_min[i] + k).min(y_dim[i]);
            }
            graph.add_arcs_box(x_min, x_max, y_min, y_max);
        }
    }

    fn result(&self) -> &NetSimplex {
        self.result.as_ref().expect("GridSolver::run was not called")
    }

    pub fn problem_type(&self) -> ProblemType {
        self.result().problem_type()
    }

    pub fn total_cost(&self) -> TotalCost {
        self.result().total_cost()
    }

    pub fn flow(&self, a: usize) -> i64 {
        self.result().flow(a)
    }

    /// Safety-net post-pass: repeatedly extracts the current support,
    /// rebuilds the shield from it, and re-solves, stopping once the
    /// objective stops strictly decreasing or the problem turns out
    /// unbounded. Not part of [`GridSolver::run`] -- an explicit opt-in for
    /// callers who want the extra certification.
    ///
    /// For [`SupplyType::Eq`], the re-solve warm-starts from the prior
    /// solve's basis via [`GridGraph::rebuild_shield_with_arcs`] and
    /// [`NetSimplex::run_warm_started`] rather than discarding it; Geq/Leq
    /// fall back to a cold solve, since slack-arc flow isn't tracked by the
    /// support extraction the warm start relies on.
    pub fn refine_until_stable<const D: usize>(&mut self, graph: &mut GridGraph<D>) -> ProblemType {
        let status = self.run(graph);
        if status != ProblemType::Optimal {
            return status;
        }

        let mut best = self.total_cost();
        let mut out_arcs = Vec::new();
        loop {
            let (support, support_flow) =
                extract_support_with_flow(graph, self.result.as_ref().unwrap());

            let mut simplex;
            let status;
            if self.supply_type == SupplyType::Eq {
                graph.rebuild_shield_with_arcs(&support, &support_flow, &mut out_arcs);
                let warm_arcs: Vec<usize> = out_arcs
                    .iter()
                    .map(|a| a.expect("support arc missing from rebuilt shield").index())
                    .collect();
                simplex = NetSimplex::new(graph).with_supply_type(self.supply_type);
                status = simplex.run_warm_started(self.pivot_rule, &warm_arcs, &support_flow);
            } else {
                graph.rebuild_shield(&support);
                simplex = NetSimplex::new(graph).with_supply_type(self.supply_type);
                status = simplex.run(self.pivot_rule);
            }
            if status != ProblemType::Optimal {
                return status;
            }

            let cost = simplex.total_cost();
            if cost >= best {
                return ProblemType::Optimal;
            }
            best = cost;
            self.result = Some(simplex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supply_diagonal(dim: i64) -> (Pos<1>, Pos<1>, Vec<i64>) {
        let x_dim = [dim];
        let y_dim = [dim];
        let mut supply = vec![1i64; dim as usize];
        supply.extend(vec![-1i64; dim as usize]);
        (x_dim, y_dim, supply)
    }

    #[test]
    fn multiscale_matches_full_shielded_solve_for_small_grid() {
        let (x_dim, y_dim, supply) = supply_diagonal(8);

        let mut full = GridGraph::<1>::new(x_dim, y_dim, supply.clone(), true);
        let (full_status, full_simplex) =
            crate::simplex::run_shielded(&mut full, SupplyType::Eq, PivotRule::BestEligible);
        assert_eq!(full_status, ProblemType::Optimal);

        let mut sparse = GridGraph::<1>::new(x_dim, y_dim, supply, false);
        let mut solver = GridSolver::new(2);
        let status = solver.run(&mut sparse);
        assert_eq!(status, ProblemType::Optimal);
        assert_eq!(solver.total_cost(), full_simplex.total_cost());
    }

    #[test]
    fn coarsened_supply_sum_matches_parent() {
        let x_dim = [6i64];
        let y_dim = [6i64];
        let supply = vec![1, 2, 0, 1, 2, 0, -2, -2, -2, 0, 0, -2];
        let parent = GridGraph::<1>::new(x_dim, y_dim, supply, false);
        let coarse = GridGraph::<1>::coarsened(&parent, 2);
        assert_eq!(coarse.x_dim(), [3]);
        let sum: i64 = (0..coarse.node_num())
            .map(|n| coarse.supply(crate::bipartite::NodeId(n as u32)))
            .sum();
        assert_eq!(sum, 0);
    }

    #[test]
    fn refine_until_stable_never_increases_cost() {
        let (x_dim, y_dim, supply) = supply_diagonal(8);
        let mut graph = GridGraph::<1>::new(x_dim, y_dim, supply, false);
        let mut solver = GridSolver::new(2);
        let status = solver.refine_until_stable(&mut graph);
        assert_eq!(status, ProblemType::Optimal);
        assert_eq!(solver.total_cost(), 0);
    }
}
