//! Pure position/index arithmetic over row-major, fixed-dimension grids.
//!
//! A grid position is a `[i64; D]` tuple; a grid index is its row-major
//! linearization.

/// A grid position: one coordinate per axis, row-major.
pub type Pos<const D: usize> = [i64; D];

/// Number of grid points spanned by `dim`, i.e. `dim[0] * dim[1] * ...`.
///
/// Panics on overflow -- an oversized grid is an implementer error, not a
/// recoverable condition.
pub fn num_nodes<const D: usize>(dim: &Pos<D>) -> i64 {
    dim.iter().copied().fold(1i64, |acc, d| {
        acc.checked_mul(d).expect("grid node count overflow")
    })
}

/// Number of grid points in the half-open box `[min, max)`.
pub fn num_nodes_in_box<const D: usize>(min: &Pos<D>, max: &Pos<D>) -> i64 {
    let mut n = 1i64;
    for i in 0..D {
        n = n
            .checked_mul((max[i] - min[i]).max(0))
            .expect("box node count overflow");
    }
    n
}

/// Row-major strides for `dim`: `strides[D-1] = 1`, `strides[i] = strides[i+1] * dim[i+1]`.
pub fn strides<const D: usize>(dim: &Pos<D>) -> Pos<D> {
    let mut strides = [0i64; D];
    if D == 0 {
        return strides;
    }
    strides[D - 1] = 1;
    for i in (0..D - 1).rev() {
        strides[i] = strides[i + 1]
            .checked_mul(dim[i + 1])
            .expect("stride overflow");
    }
    strides
}

/// Row-major linear index of `pos` given `strides`.
pub fn id_from_pos<const D: usize>(pos: &Pos<D>, strides: &Pos<D>) -> i64 {
    (0..D).map(|i| pos[i] * strides[i]).sum()
}

/// Inverse of [`id_from_pos`]: the grid position of linear index `id`.
pub fn pos_from_id<const D: usize>(mut id: i64, strides: &Pos<D>) -> Pos<D> {
    let mut pos = [0i64; D];
    for i in 0..D {
        pos[i] = id / strides[i];
        id %= strides[i];
    }
    pos
}

/// Lexicographically advances `pos` within the half-open box `[min, max)`,
/// wrapping back to `min` once the box is exhausted. Callers detect
/// termination by comparing `pos == min` after the call.
pub fn advance_pos<const D: usize>(min: &Pos<D>, max: &Pos<D>, pos: &mut Pos<D>) {
    assert!(D > 0, "cannot advance a 0-dimensional position");
    let mut d = D;
    loop {
        d -= 1;
        pos[d] += 1;
        if pos[d] >= max[d] {
            pos[d] = min[d];
        }
        if pos[d] != min[d] || d == 0 {
            break;
        }
    }
}

/// Grid extents after merging `k` points per axis: `ceil(dim[i] / k)`.
pub fn coarsened_dim<const D: usize>(k: i64, dim: &Pos<D>) -> Pos<D> {
    assert!(k > 0, "merge factor must be positive");
    let mut out = [0i64; D];
    for i in 0..D {
        out[i] = (dim[i] + k - 1) / k;
    }
    out
}

/// Position of the coarse cell that `pos` falls into after merging `k`
/// points per axis. Integer division; see DESIGN.md for the
/// `coarsened_index`-vs-`coarsened_pos` open question.
pub fn coarsened_pos<const D: usize>(k: i64, pos: &Pos<D>) -> Pos<D> {
    let mut out = [0i64; D];
    for i in 0..D {
        out[i] = pos[i] / k;
    }
    out
}

/// `min <= pos < max` componentwise.
pub fn contains<const D: usize>(min: &Pos<D>, max: &Pos<D>, pos: &Pos<D>) -> bool {
    (0..D).all(|i| min[i] <= pos[i] && pos[i] < max[i])
}

/// `a < b` componentwise.
pub fn less<const D: usize>(a: &Pos<D>, b: &Pos<D>) -> bool {
    (0..D).all(|i| a[i] < b[i])
}

fn ceil_log(n: i64, b: i64) -> i64 {
    if n <= 1 || b <= 1 {
        return 0;
    }
    let mut res = 0i64;
    let mut power = 1i64;
    while power < n {
        power *= b;
        res += 1;
    }
    res
}

/// A hierarchical depth for the multi-scale solver: one coarsening level
/// fewer than would collapse the smallest axis (of either grid) to one.
pub fn hierarchical_depth<const D: usize>(x_dim: &Pos<D>, y_dim: &Pos<D>, k: i64) -> i64 {
    let min_extent = x_dim
        .iter()
        .chain(y_dim.iter())
        .copied()
        .min()
        .unwrap_or(0);
    (ceil_log(min_extent, k) - 1).max(0)
}

/// Squared-Euclidean distance between two grid positions; the ground cost
/// functor used throughout the crate.
pub fn squared_euclidean<const D: usize>(a: &Pos<D>, b: &Pos<D>) -> i64 {
    (0..D).map(|i| (a[i] - b[i]).pow(2)).sum()
}
