//! A [`BpDigraph`] specialized to two grids: owns per-red supplies,
//! per-arc costs, and the per-red shield rectangle that bounds the
//! candidate neighborhood provably sufficient to contain an optimal flow's
//! support (Schmitzer 2016).

use crate::bipartite::{ArcId, BlueId, BpDigraph, NodeId, RedId};
use crate::grid::{self, Pos};

/// Arc reservation multiplier used for from-scratch and shield-rebuilt
/// graphs.
const RESERVE_FACTOR: usize = 4;

/// A flow support: pairs with strictly positive flow. Callers should keep
/// this stable-sorted by `(red, blue)` id for deterministic shield
/// rebuilds -- see [`sort_support`].
pub type Support = Vec<(RedId, BlueId)>;

/// Sorts a support vector by `(red, blue)` id, stably.
pub fn sort_support(support: &mut Support) {
    support.sort_by_key(|&(x, y)| (x.0, y.0));
}

/// A bipartite grid graph: red nodes on an `x_dim`-shaped grid, blue nodes
/// on a `y_dim`-shaped grid, squared-Euclidean arc costs, and a per-red
/// shield rectangle `[y_min, y_max)` in target-grid coordinates.
#[derive(Clone)]
pub struct GridGraph<const D: usize> {
    bp: BpDigraph,
    x_dim: Pos<D>,
    y_dim: Pos<D>,
    x_strides: Pos<D>,
    y_strides: Pos<D>,
    x_pos: Vec<Pos<D>>,
    y_pos: Vec<Pos<D>>,
    supply: Vec<i64>,
    cost: Vec<i64>,
    y_min: Vec<Pos<D>>,
    y_max: Vec<Pos<D>>,
    old_y_min: Vec<Pos<D>>,
    old_y_max: Vec<Pos<D>>,
    fully: bool,
}

impl<const D: usize> GridGraph<D> {
    /// Builds a graph with no arcs (`fully = false`) or the complete
    /// bipartite graph (`fully = true`).
    pub fn new(x_dim: Pos<D>, y_dim: Pos<D>, supply: Vec<i64>, fully: bool) -> Self {
        let red_num = grid::num_nodes(&x_dim) as usize;
        let blue_num = grid::num_nodes(&y_dim) as usize;
        assert_eq!(
            supply.len(),
            red_num + blue_num,
            "supply length must equal red_num + blue_num"
        );

        let mut g = GridGraph {
            bp: BpDigraph::new(red_num, blue_num),
            x_dim,
            y_dim,
            x_strides: grid::strides(&x_dim),
            y_strides: grid::strides(&y_dim),
            x_pos: Vec::with_capacity(red_num),
            y_pos: Vec::with_capacity(blue_num),
            supply,
            cost: Vec::new(),
            // Isolated (y_min == y_max == 0) until something -- add_all_arcs
            // or a shield rebuild -- establishes real candidates.
            y_min: vec![[0i64; D]; red_num],
            y_max: vec![[0i64; D]; red_num],
            old_y_min: vec![[0i64; D]; red_num],
            old_y_max: vec![[0i64; D]; red_num],
            fully: false,
        };
        g.init_pos();

        if fully {
            g.add_all_arcs();
        } else {
            g.reserve_arcs(RESERVE_FACTOR * g.bp.node_num());
        }
        g
    }

    /// Builds a graph with the given per-red shield, adding exactly the
    /// arcs inside each rectangle.
    pub fn with_shield(
        x_dim: Pos<D>,
        y_dim: Pos<D>,
        supply: Vec<i64>,
        y_min: Vec<Pos<D>>,
        y_max: Vec<Pos<D>>,
    ) -> Self {
        let red_num = grid::num_nodes(&x_dim) as usize;
        let blue_num = grid::num_nodes(&y_dim) as usize;
        assert_eq!(supply.len(), red_num + blue_num);
        assert_eq!(y_min.len(), red_num);
        assert_eq!(y_max.len(), red_num);

        let mut g = GridGraph {
            bp: BpDigraph::new(red_num, blue_num),
            x_dim,
            y_dim,
            x_strides: grid::strides(&x_dim),
            y_strides: grid::strides(&y_dim),
            x_pos: Vec::with_capacity(red_num),
            y_pos: Vec::with_capacity(blue_num),
            supply,
            cost: Vec::new(),
            y_min,
            y_max,
            old_y_min: vec![[0i64; D]; red_num],
            old_y_max: vec![[0i64; D]; red_num],
            fully: false,
        };
        g.init_pos();

        let arc_estimate: i64 = (0..red_num)
            .map(|x| grid::num_nodes_in_box(&g.y_min[x], &g.y_max[x]))
            .sum();
        g.reserve_arcs(RESERVE_FACTOR * arc_estimate.max(0) as usize);
        g.add_arcs_shield(|_, _| true);
        g
    }

    /// Builds the coarse grid graph obtained by merging `k` points per axis
    /// of `parent`. Coarse supplies are sums of parent supplies per block;
    /// coarse arcs are empty.
    pub fn coarsened(parent: &GridGraph<D>, k: i64) -> Self {
        let x_dim = grid::coarsened_dim(k, &parent.x_dim);
        let y_dim = grid::coarsened_dim(k, &parent.y_dim);
        let red_num = grid::num_nodes(&x_dim) as usize;
        let blue_num = grid::num_nodes(&y_dim) as usize;

        let mut g = GridGraph {
            bp: BpDigraph::new(red_num, blue_num),
            x_dim,
            y_dim,
            x_strides: grid::strides(&x_dim),
            y_strides: grid::strides(&y_dim),
            x_pos: Vec::with_capacity(red_num),
            y_pos: Vec::with_capacity(blue_num),
            supply: vec![0i64; red_num + blue_num],
            cost: Vec::new(),
            y_min: vec![[0i64; D]; red_num],
            y_max: vec![[0i64; D]; red_num],
            old_y_min: vec![[0i64; D]; red_num],
            old_y_max: vec![[0i64; D]; red_num],
            fully: false,
        };
        g.init_pos();

        for xx in parent.bp.reds() {
            let coarse_pos = grid::coarsened_pos(k, &parent.x_pos[xx.index()]);
            let x = grid::id_from_pos(&coarse_pos, &g.x_strides) as usize;
            g.supply[x] += parent.supply[xx.index()];
        }
        for yy in parent.bp.blues() {
            let coarse_pos = grid::coarsened_pos(k, &parent.y_pos[yy.index()]);
            let y = grid::id_from_pos(&coarse_pos, &g.y_strides) as usize;
            g.supply[red_num + y] += parent.supply[parent.bp.red_num() + yy.index()];
        }
        debug_assert_eq!(g.supply.iter().sum::<i64>(), 0);

        g.reserve_arcs(RESERVE_FACTOR * g.bp.node_num());
        g
    }

    fn init_pos(&mut self) {
        let mut pos = [0i64; D];
        for _ in 0..self.bp.red_num() {
            self.x_pos.push(pos);
            grid::advance_pos(&[0i64; D], &self.x_dim, &mut pos);
        }
        debug_assert_eq!(pos, [0i64; D]);
        for _ in 0..self.bp.blue_num() {
            self.y_pos.push(pos);
            grid::advance_pos(&[0i64; D], &self.y_dim, &mut pos);
        }
        debug_assert_eq!(pos, [0i64; D]);
    }

    #[inline]
    pub fn x_dim(&self) -> Pos<D> {
        self.x_dim
    }

    #[inline]
    pub fn y_dim(&self) -> Pos<D> {
        self.y_dim
    }

    #[inline]
    pub fn red_num(&self) -> usize {
        self.bp.red_num()
    }

    #[inline]
    pub fn blue_num(&self) -> usize {
        self.bp.blue_num()
    }

    #[inline]
    pub fn node_num(&self) -> usize {
        self.bp.node_num()
    }

    #[inline]
    pub fn arc_num(&self) -> usize {
        self.bp.arc_num()
    }

    #[inline]
    pub fn is_fully(&self) -> bool {
        self.fully
    }

    /// The grid position of a red node.
    #[inline]
    pub fn red_pos(&self, x: RedId) -> Pos<D> {
        self.x_pos[x.index()]
    }

    /// The grid position of a blue node.
    #[inline]
    pub fn blue_pos(&self, y: BlueId) -> Pos<D> {
        self.y_pos[y.index()]
    }

    /// The signed supply of a global node id (nonnegative for reds,
    /// nonpositive for blues).
    #[inline]
    pub fn supply(&self, node: NodeId) -> i64 {
        self.supply[node.index()]
    }

    #[inline]
    pub fn red_supply(&self, x: RedId) -> i64 {
        self.supply[x.index()]
    }

    #[inline]
    pub fn blue_supply(&self, y: BlueId) -> i64 {
        self.supply[self.red_num() + y.index()]
    }

    /// The recorded squared-Euclidean cost of arc `a`.
    #[inline]
    pub fn cost(&self, a: ArcId) -> i64 {
        self.cost[a.index()]
    }

    #[inline]
    pub fn source(&self, a: ArcId) -> RedId {
        self.bp.source(a)
    }

    #[inline]
    pub fn target(&self, a: ArcId) -> BlueId {
        self.bp.target(a)
    }

    pub fn reds(&self) -> impl Iterator<Item = RedId> + '_ {
        self.bp.reds()
    }

    pub fn blues(&self) -> impl Iterator<Item = BlueId> + '_ {
        self.bp.blues()
    }

    pub fn node(&self, x: RedId) -> NodeId {
        self.bp.red_node(x)
    }

    pub fn blue_node(&self, y: BlueId) -> NodeId {
        self.bp.blue_node(y)
    }

    pub fn arcs(&self) -> impl Iterator<Item = ArcId> + '_ {
        self.bp.arcs()
    }

    pub fn out_arcs(&self, x: RedId) -> crate::bipartite::OutArcs<'_> {
        self.bp.out_arcs(x)
    }

    /// The current shield rectangle of red `x`: `[y_min, y_max)`.
    #[inline]
    pub fn shield(&self, x: RedId) -> (Pos<D>, Pos<D>) {
        (self.y_min[x.index()], self.y_max[x.index()])
    }

    /// `true` iff `x`'s shield is empty (no candidate neighbors).
    #[inline]
    pub fn is_isolated(&self, x: RedId) -> bool {
        !grid::less(&self.y_min[x.index()], &self.y_max[x.index()])
    }

    pub fn reserve_arcs(&mut self, n: usize) {
        self.bp.reserve_arcs(n);
        self.cost.reserve(n);
    }

    /// Appends arc `x -> y`, recording its squared-Euclidean cost.
    pub fn add_arc(&mut self, x: RedId, y: BlueId) -> ArcId {
        let c = grid::squared_euclidean(&self.x_pos[x.index()], &self.y_pos[y.index()]);
        let a = self.bp.add_arc(x, y);
        self.cost.push(c);
        a
    }

    /// Drops every arc and cost; marks the graph as not fully bipartite.
    pub fn clear_arcs(&mut self) {
        self.bp.clear_arcs();
        self.cost.clear();
        self.fully = false;
    }

    /// Adds every arc in the Cartesian product of the `x` and `y` boxes.
    pub fn add_arcs_box(&mut self, x_min: Pos<D>, x_max: Pos<D>, y_min: Pos<D>, y_max: Pos<D>) {
        let added = grid::num_nodes_in_box(&x_min, &x_max) * grid::num_nodes_in_box(&y_min, &y_max);
        self.reserve_arcs(self.arc_num() + added.max(0) as usize);

        if !grid::less(&x_min, &x_max) || !grid::less(&y_min, &y_max) {
            return;
        }

        let mut x_pos = x_min;
        loop {
            let x = RedId(grid::id_from_pos(&x_pos, &self.x_strides) as u32);
            let mut y_pos = y_min;
            loop {
                let y = BlueId(grid::id_from_pos(&y_pos, &self.y_strides) as u32);
                self.add_arc(x, y);
                grid::advance_pos(&y_min, &y_max, &mut y_pos);
                if y_pos == y_min {
                    break;
                }
            }
            grid::advance_pos(&x_min, &x_max, &mut x_pos);
            if x_pos == x_min {
                break;
            }
        }
    }

    /// For every red `x` with a non-empty shield, adds `(x, y)` for each
    /// `y` in `x`'s shield rectangle for which `cond(x, y)` holds.
    pub fn add_arcs_shield(&mut self, mut cond: impl FnMut(RedId, BlueId) -> bool) {
        for x in self.bp.reds() {
            if self.is_isolated(x) {
                continue;
            }
            let (y_min, y_max) = self.shield(x);
            let mut y_pos = y_min;
            loop {
                let y = BlueId(grid::id_from_pos(&y_pos, &self.y_strides) as u32);
                if cond(x, y) {
                    self.add_arc(x, y);
                }
                grid::advance_pos(&y_min, &y_max, &mut y_pos);
                if y_pos == y_min {
                    break;
                }
            }
        }
    }

    /// Clears arcs, resets the shield to the full Y-box for every red with
    /// nonzero supply, and adds all arcs.
    pub fn add_all_arcs(&mut self) {
        self.clear_arcs();
        self.reserve_arcs(self.red_num() * self.blue_num());
        self.reset_shield();
        self.add_arcs_shield(|_, _| true);
        self.fully = true;
    }

    /// Sets `y_min[x] = 0`, `y_max[x] = y_dim` for every red with nonzero
    /// supply; leaves the shield empty otherwise.
    pub fn reset_shield(&mut self) {
        for x in 0..self.red_num() {
            if self.supply[x] == 0 {
                self.y_min[x] = [0i64; D];
                self.y_max[x] = [0i64; D];
            } else {
                self.y_min[x] = [0i64; D];
                self.y_max[x] = self.y_dim;
            }
        }
    }

    /// Tightens the shield of `x`'s axis-neighbors given that `(x, y)` is
    /// in the support.
    fn tighten_shield_for_pair(&mut self, x: RedId, y: BlueId) {
        let p_x = self.x_pos[x.index()];
        let p_y = self.y_pos[y.index()];

        for i in 0..D {
            if p_x[i] > 0 {
                let nx = (x.index() as i64 - self.x_strides[i]) as usize;
                self.y_max[nx][i] = self.y_max[nx][i].min(p_y[i] + 1);
            }
        }
        for i in 0..D {
            if p_x[i] < self.x_dim[i] - 1 {
                let px = (x.index() as i64 + self.x_strides[i]) as usize;
                self.y_min[px][i] = self.y_min[px][i].max(p_y[i]);
            }
        }
    }

    /// Recomputes the shield from `support`, clears arcs, adds all shield
    /// arcs, then adds any support arcs not already inside the shield.
    pub fn rebuild_shield(&mut self, support: &Support) {
        self.reset_shield();
        for &(x, y) in support {
            self.tighten_shield_for_pair(x, y);
        }
        self.clear_arcs();
        let arc_estimate: i64 = (0..self.red_num())
            .map(|x| grid::num_nodes_in_box(&self.y_min[x], &self.y_max[x]))
            .sum();
        self.reserve_arcs(arc_estimate.max(0) as usize + self.node_num());
        self.add_arcs_shield(|_, _| true);

        for &(x, y) in support {
            let (y_min, y_max) = self.shield(x);
            if !grid::contains(&y_min, &y_max, &self.y_pos[y.index()]) {
                self.add_arc(x, y);
            }
        }
    }

    /// As [`GridGraph::rebuild_shield`], but fills `out_arcs[i]` with the
    /// arc id corresponding to `support[i]`, used by the simplex to
    /// warm-start a fresh solve from a prior support. `support` must be
    /// sorted by `(x, y)` (see [`sort_support`]); `support_flow[i]` gates
    /// whether `support[i]` contributes to the shield (zero-flow entries
    /// don't).
    pub fn rebuild_shield_with_arcs(
        &mut self,
        support: &Support,
        support_flow: &[i64],
        out_arcs: &mut Vec<Option<ArcId>>,
    ) {
        assert_eq!(support.len(), support_flow.len());
        debug_assert!(support.windows(2).all(|w| (w[0].0 .0, w[0].1 .0) <= (w[1].0 .0, w[1].1 .0)));
        out_arcs.clear();
        out_arcs.resize(support.len(), None);

        self.reset_shield();
        for (&(x, y), &flow) in support.iter().zip(support_flow) {
            if flow != 0 {
                self.tighten_shield_for_pair(x, y);
            }
        }
        self.clear_arcs();
        let arc_estimate: i64 = (0..self.red_num())
            .map(|x| grid::num_nodes_in_box(&self.y_min[x], &self.y_max[x]))
            .sum();
        self.reserve_arcs(arc_estimate.max(0) as usize + self.node_num());

        let mut it = 0usize;
        for x in self.bp.reds() {
            if self.is_isolated(x) {
                continue;
            }
            let (y_min, y_max) = self.shield(x);
            let mut y_pos = y_min;
            loop {
                let y = BlueId(grid::id_from_pos(&y_pos, &self.y_strides) as u32);
                let a = self.add_arc(x, y);
                while it < support.len() && support[it] < (x, y) {
                    it += 1;
                }
                if it < support.len() && support[it] == (x, y) {
                    out_arcs[it] = Some(a);
                }
                grid::advance_pos(&y_min, &y_max, &mut y_pos);
                if y_pos == y_min {
                    break;
                }
            }
        }

        for (i, &(x, y)) in support.iter().enumerate() {
            let (y_min, y_max) = self.shield(x);
            if !grid::contains(&y_min, &y_max, &self.y_pos[y.index()]) {
                let a = self.add_arc(x, y);
                debug_assert!(out_arcs[i].is_none());
                out_arcs[i] = Some(a);
            }
        }
    }

    /// Incrementally tightens the shield from `support`, then adds only
    /// the arcs newly covered relative to the previous shield.
    pub fn update_shield(&mut self, support: &Support) {
        if self.fully {
            return;
        }

        std::mem::swap(&mut self.y_min, &mut self.old_y_min);
        std::mem::swap(&mut self.y_max, &mut self.old_y_max);
        self.reset_shield();
        for &(x, y) in support {
            self.tighten_shield_for_pair(x, y);
        }

        for x in 0..self.red_num() {
            for i in 0..D {
                self.y_min[x][i] = self.y_min[x][i].min(self.old_y_min[x][i]);
                self.y_max[x][i] = self.y_max[x][i].max(self.old_y_max[x][i]);
            }
        }

        let old_y_min = self.old_y_min.clone();
        let old_y_max = self.old_y_max.clone();
        let y_pos = self.y_pos.clone();
        self.add_arcs_shield(|x, y| {
            !grid::contains(&old_y_min[x.index()], &old_y_max[x.index()], &y_pos[y.index()])
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supply_for(x_dim: &Pos<2>, y_dim: &Pos<2>) -> Vec<i64> {
        let nx = grid::num_nodes(x_dim) as usize;
        let ny = grid::num_nodes(y_dim) as usize;
        let mut s = vec![1i64; nx];
        s.extend(vec![-1i64; ny]);
        s
    }

    #[test]
    fn coarsening_preserves_supply_sum_per_color() {
        let x_dim = [5i64, 6];
        let y_dim = [7i64, 8];
        let nx = grid::num_nodes(&x_dim) as usize;
        let ny = grid::num_nodes(&y_dim) as usize;
        let mut supply = vec![0i64; nx + ny];
        for (i, s) in supply.iter_mut().enumerate().take(nx) {
            *s = (i as i64 % 5) + 1;
        }
        let total_x: i64 = supply[..nx].iter().sum();
        for s in supply[nx..].iter_mut() {
            *s = 0;
        }
        // distribute total_x as demand across blues
        let per = total_x / ny as i64;
        let mut remaining = total_x;
        for i in 0..ny {
            let take = if i + 1 == ny { remaining } else { per };
            supply[nx + i] = -take;
            remaining -= take;
        }

        let parent = GridGraph::<2>::new(x_dim, y_dim, supply.clone(), false);
        let coarse = GridGraph::<2>::coarsened(&parent, 2);
        assert_eq!(coarse.x_dim(), [3, 3]);
        assert_eq!(coarse.y_dim(), [4, 4]);

        let coarse_red_sum: i64 = (0..coarse.red_num()).map(|i| coarse.supply[i]).sum();
        let coarse_blue_sum: i64 = (0..coarse.blue_num())
            .map(|i| coarse.supply[coarse.red_num() + i])
            .sum();
        assert_eq!(coarse_red_sum, total_x);
        assert_eq!(coarse_blue_sum, -total_x);
    }

    #[test]
    fn add_arcs_box_matches_scenario_s5() {
        let x_dim = [5i64, 6];
        let y_dim = [7i64, 8];
        let supply = supply_for(&x_dim, &y_dim);
        let parent = GridGraph::<2>::new(x_dim, y_dim, supply, false);
        let mut coarse = GridGraph::<2>::coarsened(&parent, 2);
        coarse.add_arcs_box([0, 0], [2, 2], [1, 1], [4, 4]);
        assert_eq!(coarse.arc_num(), 36);
        let a0 = ArcId(0);
        assert_eq!(coarse.red_pos(coarse.source(a0)), [0, 0]);
        assert_eq!(coarse.blue_pos(coarse.target(a0)), [1, 1]);
    }

    #[test]
    fn full_bipartite_has_all_arcs() {
        let x_dim = [2i64, 2];
        let y_dim = [2i64, 2];
        let supply = vec![1, 2, 3, 4, -2, -2, -3, -3];
        let g = GridGraph::<2>::new(x_dim, y_dim, supply, true);
        assert_eq!(g.arc_num(), 16);
        assert!(g.is_fully());
    }
}
