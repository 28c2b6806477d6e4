//! End-to-end properties of the synthesis algorithms.

use std::rc::Rc;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use rev_rs::aig::Aig;
use rev_rs::bdd::Bdd;
use rev_rs::circuit::Circuit;
use rev_rs::embed::{embed, EmbedOptions};
use rev_rs::equivalence::{equivalent, is_identity};
use rev_rs::function::BddFunction;
use rev_rs::permutation::TruthTable;
use rev_rs::random::{random_circuit, RandomCircuitOptions};
use rev_rs::rcbdd::Rcbdd;
use rev_rs::simplify::simplify;
use rev_rs::synthesis::cbs::CbsOptions;
use rev_rs::synthesis::tbs::TbsOptions;
use rev_rs::synthesis::{Cbs, Dbs, Exs, SymbolicTbs, Synthesizer, Tbs};

fn realizes(circuit: &Circuit, spec: &TruthTable) -> bool {
    TruthTable::from_circuit(circuit).unwrap() == *spec
}

fn random_specs(lines: usize, count: usize, seed: u64) -> Vec<TruthTable> {
    let mut rng = Pcg64::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut images: Vec<u64> = (0..1 << lines).collect();
            images.shuffle(&mut rng);
            TruthTable::new(images).unwrap()
        })
        .collect()
}

/// All permutations of `0..n`, in no particular order.
fn all_specs(lines: usize) -> Vec<TruthTable> {
    fn go(prefix: &mut Vec<u64>, rest: &mut Vec<u64>, out: &mut Vec<TruthTable>) {
        if rest.is_empty() {
            out.push(TruthTable::new(prefix.clone()).unwrap());
            return;
        }
        for k in 0..rest.len() {
            let x = rest.remove(k);
            prefix.push(x);
            go(prefix, rest, out);
            prefix.pop();
            rest.insert(k, x);
        }
    }
    let mut out = Vec::new();
    go(&mut Vec::new(), &mut (0..1 << lines).collect(), &mut out);
    out
}

// ─── TBS ─────────────────────────────────────────────────────────────────────

#[test]
fn tbs_swaps_rows_three_and_four() {
    let spec: TruthTable = "0 1 2 4 3 5 6 7".parse().unwrap();
    let circuit = Tbs::default().synthesize(&spec).unwrap();
    for x in 0..8 {
        let expected = match x {
            3 => 4,
            4 => 3,
            x => x,
        };
        assert_eq!(circuit.simulate(x), expected);
    }
}

#[test]
fn tbs_realizes_every_two_line_permutation() {
    for spec in all_specs(2) {
        for tbs in [Tbs::default(), Tbs::unidirectional()] {
            let circuit = tbs.synthesize(&spec).unwrap();
            assert!(realizes(&circuit, &spec), "{}", spec);
        }
    }
}

#[test]
fn tbs_realizes_random_permutations() {
    for lines in 3..=5 {
        for spec in random_specs(lines, 20, lines as u64) {
            let circuit = Tbs::new(TbsOptions { bidirectional: true })
                .synthesize(&spec)
                .unwrap();
            assert!(realizes(&circuit, &spec), "{}", spec);
        }
    }
}

// ─── DBS ─────────────────────────────────────────────────────────────────────

#[test]
fn dbs_agrees_with_tbs() {
    let mut specs = random_specs(3, 20, 17);
    specs.extend(random_specs(4, 10, 18));
    specs.push("7 2 3 6 1 4 5 0".parse().unwrap());
    for spec in specs {
        let a = Tbs::default().synthesize(&spec).unwrap();
        let b = Dbs::default().synthesize(&spec).unwrap();
        assert!(realizes(&b, &spec), "{}", spec);
        assert!(is_identity(&a.concat(&b.reverse()).unwrap()).unwrap(), "{}", spec);
    }
}

#[test]
fn circuit_followed_by_its_reverse_is_identity() {
    for seed in 0..10 {
        let options = RandomCircuitOptions {
            lines: 5,
            gates: 20,
            seed,
            negative_controls: true,
        };
        let c = random_circuit(&options).unwrap();
        assert!(is_identity(&c.concat(&c.reverse()).unwrap()).unwrap());
    }
}

// ─── EXS ─────────────────────────────────────────────────────────────────────

#[test]
fn exs_finds_known_minimal_lengths() {
    // (spec, minimal number of positive-control MCT gates)
    let cases = [
        ("0 1 2 3 4 5 7 6", 1),
        ("1 0 3 2", 1),
        ("0 3 2 1", 1),
        ("0 2 1 3", 3),
    ];
    for (text, k) in cases {
        let spec: TruthTable = text.parse().unwrap();
        let circuit = Exs::default().synthesize(&spec).unwrap();
        assert_eq!(circuit.num_gates(), k, "{}", text);
        assert!(realizes(&circuit, &spec));
    }
}

#[test]
fn exs_is_never_longer_than_tbs() {
    for spec in random_specs(3, 4, 5) {
        let tbs = Tbs::default().synthesize(&spec).unwrap();
        let exs = Exs::default().synthesize(&spec).unwrap();
        assert!(exs.num_gates() <= tbs.num_gates(), "{}", spec);
        assert!(equivalent(&tbs, &exs).unwrap());
    }
}

#[test]
fn exs_on_tabulated_random_circuit() {
    let options = RandomCircuitOptions {
        lines: 3,
        gates: 10,
        seed: 655321,
        negative_controls: false,
    };
    let c = random_circuit(&options).unwrap();
    let spec = TruthTable::from_circuit(&c).unwrap();
    let exs = Exs::default().synthesize(&spec).unwrap();
    assert!(exs.num_gates() <= c.num_gates());
    assert!(equivalent(&c, &exs).unwrap());
}

// ─── Embedding and symbolic TBS ──────────────────────────────────────────────

#[test]
fn symbolic_tbs_matches_explicit_tbs_on_embedding() {
    let functions = [
        // 1-bit full adder: (sum, carry)
        BddFunction::from_fn(3, 2, |x| {
            let s = x.count_ones() as u64;
            (s & 1) | (s >> 1) << 1
        })
        .unwrap(),
        // 3-input majority
        BddFunction::from_fn(3, 1, |x| (x.count_ones() >= 2) as u64).unwrap(),
        // 2x2 multiplier
        BddFunction::from_fn(4, 4, |x| (x & 3) * (x >> 2)).unwrap(),
    ];
    for f in &functions {
        let rc = embed(f, &EmbedOptions::default()).unwrap();
        let symbolic = SymbolicTbs.synthesize(&rc).unwrap();
        let table = rc.to_truth_table().unwrap();
        let explicit = Tbs::unidirectional().synthesize(&table).unwrap();
        assert_eq!(symbolic.gates(), explicit.gates());

        for x in 0..1u64 << f.num_inputs() {
            let y = symbolic.simulate(x);
            let mask = (1u64 << f.num_outputs()) - 1;
            assert_eq!(y & mask, f.evaluate(x), "x = {}", x);
        }
    }
}

#[test]
fn symbolic_tbs_on_circuit_relation() {
    let options = RandomCircuitOptions {
        lines: 4,
        gates: 12,
        seed: 3,
        negative_controls: true,
    };
    let c = random_circuit(&options).unwrap();
    let rc = Rcbdd::from_circuit(Rc::new(Bdd::default()), &c).unwrap();
    let synthesized = SymbolicTbs.synthesize(&rc).unwrap();
    assert!(equivalent(&c, &synthesized).unwrap());
}

// ─── Simplification ──────────────────────────────────────────────────────────

#[test]
fn simplify_preserves_truth_table() {
    for spec in random_specs(4, 10, 99) {
        let c = Tbs::default().synthesize(&spec).unwrap();
        let s = simplify(&c).unwrap();
        assert!(s.num_gates() <= c.num_gates());
        assert!(realizes(&s, &spec), "{}", spec);
    }
}

// ─── CBS ─────────────────────────────────────────────────────────────────────

#[test]
fn cbs_computes_aig_outputs() {
    // Half adder: sum = a XOR b, carry = a AND b.
    let text = "\
aag 5 2 0 2 3
2
4
10
6
6 2 4
8 3 5
10 7 9
i0 a
i1 b
o0 sum
o1 carry
";
    let aig = Aig::from_aag(text).unwrap();
    for uncompute in [false, true] {
        let circuit = Cbs::new(CbsOptions { uncompute }).synthesize(&aig).unwrap();
        let n = aig.num_inputs();
        let a = aig.num_ands();
        for x in 0..1u64 << n {
            let y = circuit.simulate(x);
            assert_eq!(y >> (n + a), aig.simulate(x), "x = {}", x);
            if uncompute {
                assert_eq!(y >> n & ((1 << a) - 1), 0, "x = {}", x);
            }
        }
    }
}
