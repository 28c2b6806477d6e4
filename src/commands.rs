//! Shell-level entry points over a [`Store`].
//!
//! Each command reads its input from the indexed (or current) entry of one
//! kind and puts its result into another. Nothing is written to the store
//! until the result is complete, so a failing command leaves it untouched.
//!
//! ```
//! use rev_rs::commands;
//! use rev_rs::store::{Placement, Store};
//! use rev_rs::synthesis::tbs::TbsOptions;
//!
//! let mut store = Store::new();
//! commands::read_spec(&mut store, "0 1 2 4 3 5 6 7", Placement::Append).unwrap();
//! commands::tbs(&mut store, None, TbsOptions::default(), Placement::Append).unwrap();
//! assert!(!commands::is_identity(&store, None).unwrap());
//! ```

use std::fmt::Write;
use std::rc::Rc;

use log::info;

use crate::aig::Aig;
use crate::bdd::Bdd;
use crate::circuit::{Circuit, CircuitStats};
use crate::embed::EmbedOptions;
use crate::equivalence;
use crate::error::Result;
use crate::function::BddFunction;
use crate::permutation::TruthTable;
use crate::random::{self, RandomCircuitOptions};
use crate::rcbdd::Rcbdd;
use crate::simplify;
use crate::store::{Kind, Placement, Store, StoreItem};
use crate::synthesis::cbs::CbsOptions;
use crate::synthesis::dbs::DbsOptions;
use crate::synthesis::exs::ExsOptions;
use crate::synthesis::tbs::TbsOptions;
use crate::synthesis::{Cbs, Dbs, Exs, SymbolicTbs, Synthesizer, Tbs};

fn synthesize<I, S>(
    store: &mut Store,
    name: &str,
    input: Option<usize>,
    synthesizer: &S,
    placement: Placement,
) -> Result<usize>
where
    I: StoreItem,
    S: Synthesizer<I>,
{
    let circuit = synthesizer.synthesize(store.get::<I>(input)?)?;
    info!("{}: {}", name, circuit.stats());
    Ok(store.place(circuit, placement))
}

// Readers

/// Permutation text such as `"0 1 2 4 3 5 6 7"`.
pub fn read_spec(store: &mut Store, text: &str, placement: Placement) -> Result<usize> {
    let spec: TruthTable = text.parse()?;
    info!("read spec: {} lines", spec.lines());
    Ok(store.place(spec, placement))
}

pub fn read_pla(store: &mut Store, text: &str, placement: Placement) -> Result<usize> {
    let f = BddFunction::from_pla(text)?;
    info!(
        "read pla: {} inputs, {} outputs",
        f.num_inputs(),
        f.num_outputs()
    );
    Ok(store.place(f, placement))
}

pub fn read_aag(store: &mut Store, text: &str, placement: Placement) -> Result<usize> {
    let aig = Aig::from_aag(text)?;
    info!(
        "read aag: {} inputs, {} ANDs, {} outputs",
        aig.num_inputs(),
        aig.num_ands(),
        aig.num_outputs()
    );
    Ok(store.place(aig, placement))
}

// Synthesis

pub fn tbs(
    store: &mut Store,
    spec: Option<usize>,
    options: TbsOptions,
    placement: Placement,
) -> Result<usize> {
    synthesize(store, "tbs", spec, &Tbs::new(options), placement)
}

pub fn dbs(
    store: &mut Store,
    spec: Option<usize>,
    options: DbsOptions,
    placement: Placement,
) -> Result<usize> {
    synthesize(store, "dbs", spec, &Dbs::new(options), placement)
}

pub fn exs(
    store: &mut Store,
    spec: Option<usize>,
    options: ExsOptions,
    placement: Placement,
) -> Result<usize> {
    synthesize(store, "exs", spec, &Exs::new(options), placement)
}

/// TBS run directly on an embedded function.
pub fn rcbdd_synth(store: &mut Store, rcbdd: Option<usize>, placement: Placement) -> Result<usize> {
    synthesize(store, "rcbdd synth", rcbdd, &SymbolicTbs, placement)
}

pub fn cbs(
    store: &mut Store,
    aig: Option<usize>,
    options: CbsOptions,
    placement: Placement,
) -> Result<usize> {
    synthesize(store, "cbs", aig, &Cbs::new(options), placement)
}

/// Embed a BDD function into a reversible one.
pub fn embed(
    store: &mut Store,
    bdd: Option<usize>,
    options: &EmbedOptions,
    placement: Placement,
) -> Result<usize> {
    let rc = crate::embed::embed(store.get::<BddFunction>(bdd)?, options)?;
    info!("embed: {} lines", rc.lines());
    Ok(store.place(rc, placement))
}

// Conversions

/// Tabulate a circuit into a specification.
pub fn spec_from_circuit(store: &mut Store, circuit: Option<usize>, placement: Placement) -> Result<usize> {
    let spec = TruthTable::from_circuit(store.get::<Circuit>(circuit)?)?;
    info!("spec from circuit: {} lines", spec.lines());
    Ok(store.place(spec, placement))
}

/// Characteristic BDD of a specification, in a fresh manager.
pub fn rcbdd_from_spec(store: &mut Store, spec: Option<usize>, placement: Placement) -> Result<usize> {
    let rc = Rcbdd::from_truth_table(Rc::new(Bdd::default()), store.get::<TruthTable>(spec)?);
    info!("rcbdd from spec: {} lines", rc.lines());
    Ok(store.place(rc, placement))
}

/// Characteristic BDD of a circuit, in a fresh manager.
pub fn rcbdd_from_circuit(store: &mut Store, circuit: Option<usize>, placement: Placement) -> Result<usize> {
    let rc = Rcbdd::from_circuit(Rc::new(Bdd::default()), store.get::<Circuit>(circuit)?)?;
    info!("rcbdd from circuit: {} lines", rc.lines());
    Ok(store.place(rc, placement))
}

// Circuit transformations

pub fn random_circuit(store: &mut Store, options: &RandomCircuitOptions, placement: Placement) -> Result<usize> {
    let circuit = random::random_circuit(options)?;
    info!("random: {}", circuit.stats());
    Ok(store.place(circuit, placement))
}

pub fn insert_random_gate(
    store: &mut Store,
    circuit: Option<usize>,
    seed: u64,
    negative_controls: bool,
    placement: Placement,
) -> Result<usize> {
    let result = random::insert_random_gate(store.get::<Circuit>(circuit)?, seed, negative_controls)?;
    info!("random gate: {}", result.stats());
    Ok(store.place(result, placement))
}

pub fn simplify(store: &mut Store, circuit: Option<usize>, placement: Placement) -> Result<usize> {
    let before = store.get::<Circuit>(circuit)?;
    let result = simplify::simplify(before)?;
    info!("revsimp: {} -> {} gates", before.num_gates(), result.num_gates());
    Ok(store.place(result, placement))
}

pub fn reverse(store: &mut Store, circuit: Option<usize>, placement: Placement) -> Result<usize> {
    let result = store.get::<Circuit>(circuit)?.reverse();
    Ok(store.place(result, placement))
}

/// `first` followed by `second`.
pub fn concat(store: &mut Store, first: usize, second: usize, placement: Placement) -> Result<usize> {
    let a = store.get::<Circuit>(Some(first))?;
    let b = store.get::<Circuit>(Some(second))?;
    let result = a.concat(b)?;
    info!("concat: {}", result.stats());
    Ok(store.place(result, placement))
}

// Queries

pub fn is_identity(store: &Store, circuit: Option<usize>) -> Result<bool> {
    let result = equivalence::is_identity(store.get::<Circuit>(circuit)?)?;
    info!("is identity: {}", result);
    Ok(result)
}

pub fn equivalent(store: &Store, first: usize, second: usize) -> Result<bool> {
    let a = store.get::<Circuit>(Some(first))?;
    let b = store.get::<Circuit>(Some(second))?;
    let result = equivalence::equivalent(a, b)?;
    info!("equivalent: {}", result);
    Ok(result)
}

pub fn ps(store: &Store, circuit: Option<usize>) -> Result<CircuitStats> {
    Ok(store.get::<Circuit>(circuit)?.stats())
}

/// Text form of the current (or indexed) entry of `kind`.
pub fn print(store: &Store, kind: Kind, index: Option<usize>) -> Result<String> {
    let text = match kind {
        Kind::Spec => store.get::<TruthTable>(index)?.to_table_string(),
        Kind::Bdd => format!("{:?}", store.get::<BddFunction>(index)?),
        Kind::Rcbdd => format!("{:?}", store.get::<Rcbdd>(index)?),
        Kind::Aig => store.get::<Aig>(index)?.to_string(),
        Kind::Circuit => store.get::<Circuit>(index)?.to_string(),
    };
    Ok(text)
}

/// One line per non-empty kind, marking the current entry with `*`.
pub fn listing(store: &Store) -> String {
    let mut out = String::new();
    for kind in Kind::ALL {
        let len = store.len(kind);
        if len == 0 {
            continue;
        }
        let _ = write!(out, "{}:", kind);
        for i in 0..len {
            let mark = if store.current(kind) == Some(i) { "*" } else { "" };
            let _ = write!(out, " {}{}", mark, i);
        }
        out.push('\n');
    }
    out
}

pub fn clear(store: &mut Store, kinds: &[Kind]) {
    store.clear(kinds);
    info!("cleared {} kinds", kinds.len());
}
