//! Embedding irreversible functions into reversible ones.
//!
//! An `n`-input, `m`-output function `f` is not a bijection in general. It is
//! made one by adding constant-0 input lines and garbage output lines until
//! every output pattern can be told apart.

use std::collections::HashSet;

use log::{debug, info};
use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::circuit::LineInfo;
use crate::error::{Result, RevError};
use crate::function::BddFunction;
use crate::rcbdd::{x_var, y_var, Rcbdd};
use crate::reference::Ref;
use crate::types::Lit;

/// How many lines the embedding uses.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum AncillaPolicy {
    /// `r = max(n, m + ⌈log2 μ⌉)` where `μ` is the largest preimage size.
    #[default]
    Minimal,
    /// `r = n + m`, mapping `(x, c)` to `(x, c ⊕ f(x))`.
    Bennett,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EmbedOptions {
    /// Refuse embeddings that need more lines than this.
    pub max_lines: usize,
    pub policy: AncillaPolicy,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            max_lines: 16,
            policy: AncillaPolicy::default(),
        }
    }
}

/// Size of the largest preimage `|f⁻¹(y)|`, found by splitting the input
/// space on every output.
pub fn max_preimage(f: &BddFunction) -> BigUint {
    let bdd = f.bdd();
    let mut parts: Vec<Ref> = vec![bdd.one];
    for &out in f.outputs() {
        parts = parts
            .into_iter()
            .flat_map(|s| [bdd.apply_and(s, out), bdd.apply_and(s, -out)])
            .filter(|&s| !bdd.is_zero(s))
            .collect();
    }
    parts
        .into_iter()
        .map(|s| bdd.sat_count(s, f.num_inputs()))
        .max()
        .unwrap_or_default()
}

/// Lines needed by the minimal embedding.
pub fn required_lines(f: &BddFunction) -> usize {
    let mu = max_preimage(f);
    let garbage = if mu > BigUint::from(1u32) {
        (mu - 1u32).bits() as usize
    } else {
        0
    };
    f.num_inputs().max(f.num_outputs() + garbage)
}

pub fn embed(f: &BddFunction, options: &EmbedOptions) -> Result<Rcbdd> {
    let n = f.num_inputs();
    let m = f.num_outputs();
    if n > options.max_lines || m > options.max_lines {
        return Err(RevError::EmbeddingError(format!(
            "{} inputs and {} outputs exceed the limit of {} lines",
            n, m, options.max_lines
        )));
    }

    let r = match options.policy {
        AncillaPolicy::Minimal => required_lines(f),
        AncillaPolicy::Bennett => n + m,
    };
    info!(
        "embed: {} inputs, {} outputs -> {} lines ({:?})",
        n, m, r, options.policy
    );
    if r > options.max_lines || r >= 64 {
        return Err(RevError::EmbeddingError(format!(
            "embedding needs {} lines, the limit is {}",
            r,
            options.max_lines.min(63)
        )));
    }

    match options.policy {
        AncillaPolicy::Minimal => embed_minimal(f, r),
        AncillaPolicy::Bennett => embed_bennett(f),
    }
}

/// Preimage `f⁻¹(y)` of every output pattern `y` in the image of `f`.
fn preimages(f: &BddFunction) -> Vec<(Ref, u64)> {
    let bdd = f.bdd();
    let mut parts: Vec<(Ref, u64)> = vec![(bdd.one, 0)];
    for (j, &out) in f.outputs().iter().enumerate() {
        parts = parts
            .into_iter()
            .flat_map(|(s, y)| [(bdd.apply_and(s, -out), y), (bdd.apply_and(s, out), y | 1 << j)])
            .filter(|&(s, _)| !bdd.is_zero(s))
            .collect();
    }
    parts
}

/// Constraint `lhs = base + addend`, both variable lists least significant
/// bit first. Missing addend bits are 0.
fn offset_sum(bdd: &Bdd, lhs: &[u32], base: u64, addend: &[u32]) -> Ref {
    let mut carry = bdd.zero;
    let mut eqs = Vec::with_capacity(lhs.len());
    for (j, &v) in lhs.iter().enumerate() {
        let a = addend.get(j).map_or(bdd.zero, |&u| bdd.mk_var(u));
        let b = bdd.constant(base >> j & 1 == 1);
        let sum = bdd.apply_xor_many([a, b, carry]);
        eqs.push(bdd.apply_eq(bdd.mk_var(v), sum));
        carry = bdd.apply_or(bdd.apply_and(a, b), bdd.apply_and(carry, bdd.apply_xor(a, b)));
    }
    bdd.apply_and_many(eqs)
}

/// Disjoint path cubes of `set` from the smallest one up, each with its free
/// variables among `vars`.
fn cubes(bdd: &Bdd, set: Ref, vars: &[u32]) -> Vec<(Vec<Lit>, Vec<u32>)> {
    let mut paths: Vec<Vec<Lit>> = bdd.paths(set).collect();
    paths.reverse();
    paths
        .into_iter()
        .map(|path| {
            let fixed: HashSet<u32> = path.iter().map(|lit| lit.var()).collect();
            let free = vars.iter().copied().filter(|v| !fixed.contains(v)).collect();
            (path, free)
        })
        .collect()
}

/// Inputs `x` with constant lines at 0 map to `(f(x), rank of x among the
/// preimages of f(x))`; all other inputs take the unused patterns in order.
///
/// Ranks are counted cube by cube over the paths of each preimage, so the
/// relation is built from cubes and adders without visiting single rows.
fn embed_minimal(f: &BddFunction, r: usize) -> Result<Rcbdd> {
    let n = f.num_inputs();
    let m = f.num_outputs();
    let bdd = f.bdd();

    let inputs: Vec<u32> = (0..n).map(|i| x_var(r, i)).collect();
    let garbage: Vec<u32> = (m..r).map(|i| y_var(r, i)).collect();
    let constants: Vec<i32> = (n..r).map(|i| -(x_var(r, i) as i32)).collect();

    let mut care = bdd.zero;
    for (set, y) in preimages(f) {
        // Input `i` of `f` is variable `i + 1`.
        let set = bdd.rename(set, |v| x_var(r, v as usize - 1));
        let out = bdd.cube((0..m).map(|j| {
            let v = y_var(r, j) as i32;
            if y >> j & 1 == 1 {
                v
            } else {
                -v
            }
        }));
        let mut rank = 0u64;
        for (path, free) in cubes(bdd, set, &inputs) {
            let cube = bdd.cube(
                path.iter()
                    .map(|lit| lit.to_dimacs())
                    .chain(constants.iter().copied()),
            );
            let ranks = offset_sum(bdd, &garbage, rank, &free);
            care = bdd.apply_or(care, bdd.apply_and_many([cube, out, ranks]));
            rank += 1 << free.len();
        }
    }

    // Rows with a non-zero constant line, in order, onto the unused patterns.
    let xs: Vec<u32> = (0..r).map(|i| x_var(r, i)).collect();
    let ys: Vec<u32> = (0..r).map(|i| y_var(r, i)).collect();
    let unused = -bdd.exists(care, &xs);
    let mut rest = bdd.zero;
    let mut next = 1u64 << n;
    for (path, free) in cubes(bdd, unused, &ys) {
        let cube = bdd.cube(path.iter().map(|lit| lit.to_dimacs()));
        let rows = offset_sum(bdd, &xs, next, &free);
        rest = bdd.apply_or(rest, bdd.apply_and(cube, rows));
        next += 1 << free.len();
    }
    if next != 1 << r {
        return Err(RevError::EmbeddingError(format!(
            "{} rows left for {} unused patterns",
            (1u64 << r) - (1 << n),
            next - (1 << n)
        )));
    }
    debug!("embed: {} rows filled with unused patterns", next - (1 << n));

    let chi = bdd.apply_or(care, rest);
    Rcbdd::new(bdd.clone(), r, chi, line_info(f, r, n, m))
}

/// Lines `0..n` keep `x`, lines `n..n+m` receive `c ⊕ f(x)`.
fn embed_bennett(f: &BddFunction) -> Result<Rcbdd> {
    let n = f.num_inputs();
    let m = f.num_outputs();
    let r = n + m;
    let bdd = f.bdd().clone();

    // Input `i` of `f` is variable `i + 1`; move it to the input side of line `i`.
    let eqs: Vec<Ref> = f
        .outputs()
        .iter()
        .enumerate()
        .map(|(j, &out)| {
            let line = n + j;
            let g = bdd.rename(out, |v| x_var(r, v as usize - 1));
            let c = bdd.mk_var(x_var(r, line));
            let y = bdd.mk_var(y_var(r, line));
            bdd.apply_eq(y, bdd.apply_xor(c, g))
        })
        .collect();
    let keep: Vec<Ref> = (0..n)
        .map(|i| bdd.apply_eq(bdd.mk_var(x_var(r, i)), bdd.mk_var(y_var(r, i))))
        .collect();
    let chi = bdd.apply_and_many(keep.into_iter().chain(eqs));

    let mut info = Vec::with_capacity(r);
    for i in 0..n {
        info.push(LineInfo {
            input: f.input_labels()[i].clone(),
            output: f.input_labels()[i].clone(),
            constant: None,
            garbage: true,
        });
    }
    for j in 0..m {
        info.push(LineInfo {
            input: "0".to_string(),
            output: f.output_labels()[j].clone(),
            constant: Some(false),
            garbage: false,
        });
    }
    Rcbdd::new(bdd, r, chi, info)
}

fn line_info(f: &BddFunction, r: usize, n: usize, m: usize) -> Vec<LineInfo> {
    (0..r)
        .map(|i| LineInfo {
            input: if i < n {
                f.input_labels()[i].clone()
            } else {
                "0".to_string()
            },
            output: if i < m {
                f.output_labels()[i].clone()
            } else {
                format!("g{}", i)
            },
            constant: (i >= n).then_some(false),
            garbage: i >= m,
        })
        .collect()
}
