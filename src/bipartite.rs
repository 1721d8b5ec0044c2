//! An append-only bipartite digraph: red (source) nodes, blue (target)
//! nodes, arcs always directed red -> blue.
//!
//! An arena of arcs with `next_out`/`next_in` singly linked lists embedded
//! in the arc records themselves, rather than owned adjacency vectors per
//! node. No arc is ever removed individually; the whole arc list clears as
//! a unit.

use std::fmt;

const END: u32 = u32::MAX;

/// Identifies a node: reds occupy `[0, red_num)`, blues occupy
/// `[red_num, red_num + blue_num)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Identifies a red (source) node by its own index, `[0, red_num)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RedId(pub u32);

/// Identifies a blue (target) node by its own index, `[0, blue_num)`
/// -- *not* offset by `red_num`; use [`BpDigraph::blue_node`] to get a
/// [`NodeId`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlueId(pub u32);

/// Identifies an arc in insertion order, `[0, arc_num)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArcId(pub u32);

impl RedId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl BlueId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ArcId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug)]
struct RedHead {
    first_out: u32,
}

#[derive(Copy, Clone, Debug)]
struct BlueHead {
    first_in: u32,
}

#[derive(Copy, Clone, Debug)]
struct Arc {
    source: u32,
    target: u32,
    next_out: u32,
    next_in: u32,
}

/// The append-only red/blue arc arena.
///
/// Arcs are always red -> blue. The same `(red, blue)` pair may be added
/// more than once; callers must avoid duplicates where it matters (the
/// grid graph never does, by construction of its shield rectangles).
#[derive(Clone)]
pub struct BpDigraph {
    red_heads: Vec<RedHead>,
    blue_heads: Vec<BlueHead>,
    arcs: Vec<Arc>,
}

impl fmt::Debug for BpDigraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BpDigraph {{ red_num: {}, blue_num: {}, arc_num: {} }}",
            self.red_num(),
            self.blue_num(),
            self.arc_num()
        )
    }
}

impl BpDigraph {
    /// Allocates an arc-less graph with `red_num` red and `blue_num` blue nodes.
    pub fn new(red_num: usize, blue_num: usize) -> Self {
        BpDigraph {
            red_heads: vec![RedHead { first_out: END }; red_num],
            blue_heads: vec![BlueHead { first_in: END }; blue_num],
            arcs: Vec::new(),
        }
    }

    #[inline]
    pub fn red_num(&self) -> usize {
        self.red_heads.len()
    }

    #[inline]
    pub fn blue_num(&self) -> usize {
        self.blue_heads.len()
    }

    #[inline]
    pub fn node_num(&self) -> usize {
        self.red_num() + self.blue_num()
    }

    #[inline]
    pub fn arc_num(&self) -> usize {
        self.arcs.len()
    }

    /// Reserves capacity for at least `n` more arcs.
    pub fn reserve_arcs(&mut self, n: usize) {
        self.arcs.reserve(n);
    }

    /// Converts a red index to its global [`NodeId`].
    #[inline]
    pub fn red_node(&self, r: RedId) -> NodeId {
        debug_assert!(r.index() < self.red_num(), "invalid red id");
        NodeId(r.0)
    }

    /// Converts a blue index to its global [`NodeId`].
    #[inline]
    pub fn blue_node(&self, b: BlueId) -> NodeId {
        debug_assert!(b.index() < self.blue_num(), "invalid blue id");
        NodeId(self.red_num() as u32 + b.0)
    }

    /// `true` iff `node` is on the red side.
    #[inline]
    pub fn is_red(&self, node: NodeId) -> bool {
        node.index() < self.red_num()
    }

    /// Appends an arc `u -> v`, linking it into `u`'s out-list and `v`'s
    /// in-list. Returns the new arc's id.
    pub fn add_arc(&mut self, u: RedId, v: BlueId) -> ArcId {
        assert!(u.index() < self.red_num(), "invalid red node {u:?}");
        assert!(v.index() < self.blue_num(), "invalid blue node {v:?}");

        let id = self.arcs.len() as u32;
        let next_out = self.red_heads[u.index()].first_out;
        let next_in = self.blue_heads[v.index()].first_in;
        self.arcs.push(Arc {
            source: u.0,
            target: v.0,
            next_out,
            next_in,
        });
        self.red_heads[u.index()].first_out = id;
        self.blue_heads[v.index()].first_in = id;
        ArcId(id)
    }

    /// Drops every arc and resets all adjacency heads to empty.
    pub fn clear_arcs(&mut self) {
        for h in &mut self.red_heads {
            h.first_out = END;
        }
        for h in &mut self.blue_heads {
            h.first_in = END;
        }
        self.arcs.clear();
    }

    /// The red endpoint of `a`, as a [`RedId`].
    #[inline]
    pub fn source(&self, a: ArcId) -> RedId {
        RedId(self.arcs[a.index()].source)
    }

    /// The blue endpoint of `a`, as a [`BlueId`].
    #[inline]
    pub fn target(&self, a: ArcId) -> BlueId {
        BlueId(self.arcs[a.index()].target)
    }

    /// Iterates `0..red_num` as [`RedId`]s.
    pub fn reds(&self) -> impl Iterator<Item = RedId> + '_ {
        (0..self.red_num() as u32).map(RedId)
    }

    /// Iterates `0..blue_num` as [`BlueId`]s.
    pub fn blues(&self) -> impl Iterator<Item = BlueId> + '_ {
        (0..self.blue_num() as u32).map(BlueId)
    }

    /// Iterates every node id, reds then blues.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_num() as u32).map(NodeId)
    }

    /// Iterates `0..arc_num` as [`ArcId`]s, in insertion order.
    pub fn arcs(&self) -> impl Iterator<Item = ArcId> + '_ {
        (0..self.arc_num() as u32).map(ArcId)
    }

    /// Iterates the outgoing arcs of red node `u`, order-unspecified but
    /// stable across two passes without mutation in between.
    pub fn out_arcs(&self, u: RedId) -> OutArcs<'_> {
        OutArcs {
            arcs: &self.arcs,
            next: self.red_heads[u.index()].first_out,
        }
    }

    /// Iterates the incoming arcs of blue node `v`.
    pub fn in_arcs(&self, v: BlueId) -> InArcs<'_> {
        InArcs {
            arcs: &self.arcs,
            next: self.blue_heads[v.index()].first_in,
        }
    }
}

/// Iterator over a red node's outgoing arcs.
pub struct OutArcs<'a> {
    arcs: &'a [Arc],
    next: u32,
}

impl Iterator for OutArcs<'_> {
    type Item = ArcId;

    fn next(&mut self) -> Option<ArcId> {
        if self.next == END {
            return None;
        }
        let id = self.next;
        self.next = self.arcs[id as usize].next_out;
        Some(ArcId(id))
    }
}

/// Iterator over a blue node's incoming arcs.
pub struct InArcs<'a> {
    arcs: &'a [Arc],
    next: u32,
}

impl Iterator for InArcs<'_> {
    type Item = ArcId;

    fn next(&mut self) -> Option<ArcId> {
        if self.next == END {
            return None;
        }
        let id = self.next;
        self.next = self.arcs[id as usize].next_in;
        Some(ArcId(id))
    }
}
