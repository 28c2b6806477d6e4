//! And-Inverter Graphs.
//!
//! Nodes are kept in topological order: an AND node only refers to inputs and
//! to nodes created before it.

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

use log::debug;

use crate::error::{Result, RevError};
use crate::signal::Signal;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Aig {
    num_inputs: usize,
    ands: Vec<[Signal; 2]>,
    outputs: Vec<Signal>,
    input_labels: Vec<String>,
    output_labels: Vec<String>,
}

impl Aig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(&mut self, label: impl Into<String>) -> Signal {
        let s = Signal::from_input(self.num_inputs as u32);
        self.num_inputs += 1;
        self.input_labels.push(label.into());
        s
    }

    fn check(&self, s: Signal) -> Result<()> {
        let ok = if s.is_input() {
            (s.input() as usize) < self.num_inputs
        } else if s.is_node() {
            (s.node() as usize) < self.ands.len()
        } else {
            true
        };
        if ok {
            Ok(())
        } else {
            Err(RevError::malformed(format!("signal {} does not exist", s)))
        }
    }

    pub fn add_and(&mut self, a: Signal, b: Signal) -> Result<Signal> {
        self.check(a)?;
        self.check(b)?;
        self.ands.push([a, b]);
        Ok(Signal::from_node(self.ands.len() as u32 - 1))
    }

    pub fn add_output(&mut self, s: Signal, label: impl Into<String>) -> Result<()> {
        self.check(s)?;
        self.outputs.push(s);
        self.output_labels.push(label.into());
        Ok(())
    }
}

impl Aig {
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_ands(&self) -> usize {
        self.ands.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn ands(&self) -> &[[Signal; 2]] {
        &self.ands
    }

    pub fn outputs(&self) -> &[Signal] {
        &self.outputs
    }

    pub fn input_labels(&self) -> &[String] {
        &self.input_labels
    }

    pub fn output_labels(&self) -> &[String] {
        &self.output_labels
    }

    /// Output bits for the packed input `x`.
    pub fn simulate(&self, x: u64) -> u64 {
        let mut values = Vec::with_capacity(self.ands.len());
        let value = |values: &[bool], s: Signal| {
            let v = if s.is_const() {
                false
            } else if s.is_input() {
                x >> s.input() & 1 == 1
            } else {
                values[s.node() as usize]
            };
            v ^ s.is_negated()
        };
        for &[a, b] in &self.ands {
            let v = value(&values, a) && value(&values, b);
            values.push(v);
        }
        self.outputs
            .iter()
            .enumerate()
            .filter(|&(_, &s)| value(&values, s))
            .fold(0, |acc, (j, _)| acc | 1 << j)
    }
}

impl Display for Aig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "aig with {} inputs, {} ands, {} outputs",
            self.num_inputs,
            self.ands.len(),
            self.outputs.len()
        )?;
        for (k, [a, b]) in self.ands.iter().enumerate() {
            writeln!(f, "  n{} = {} & {}", k, a, b)?;
        }
        for (s, label) in self.outputs.iter().zip(&self.output_labels) {
            writeln!(f, "  {} = {}", label, s)?;
        }
        Ok(())
    }
}

// AIGER reader
impl Aig {
    /// Parse a combinational AIG in ASCII AIGER (`aag`) format.
    ///
    /// AND definitions may come in any order; they are renumbered
    /// topologically. Latches are rejected.
    ///
    /// ```
    /// use rev_rs::aig::Aig;
    ///
    /// let aig = Aig::from_aag("aag 3 2 0 1 1\n2\n4\n6\n6 2 4\n").unwrap();
    /// assert_eq!(aig.simulate(0b11), 1);
    /// assert_eq!(aig.simulate(0b10), 0);
    /// ```
    pub fn from_aag(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate();

        let (_, header) = lines
            .next()
            .ok_or_else(|| RevError::malformed("empty AIGER file"))?;
        let fields: Vec<&str> = header.split_whitespace().collect();
        if fields.len() != 6 || fields[0] != "aag" {
            return Err(RevError::malformed(format!("bad AIGER header `{}`", header)));
        }
        let numbers = fields[1..]
            .iter()
            .map(|t| t.parse::<usize>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| RevError::malformed(format!("bad AIGER header `{}`", header)))?;
        let (max_var, num_inputs, num_latches, num_outputs, num_ands) =
            (numbers[0], numbers[1], numbers[2], numbers[3], numbers[4]);
        if num_latches > 0 {
            return Err(RevError::malformed("sequential AIGs are not supported"));
        }
        debug!(
            "from_aag: M={} I={} O={} A={}",
            max_var, num_inputs, num_outputs, num_ands
        );

        let mut next_numbers = |count: usize| -> Result<Vec<u64>> {
            let (lineno, line) = lines
                .next()
                .ok_or_else(|| RevError::malformed("unexpected end of AIGER file"))?;
            let values = line
                .split_whitespace()
                .map(|t| t.parse::<u64>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| RevError::malformed(format!("line {}: bad literal", lineno + 1)))?;
            if values.len() != count {
                return Err(RevError::malformed(format!(
                    "line {}: expected {} literals, found {}",
                    lineno + 1,
                    count,
                    values.len()
                )));
            }
            if let Some(&lit) = values.iter().find(|&&lit| lit / 2 > max_var as u64) {
                return Err(RevError::malformed(format!(
                    "line {}: literal {} exceeds the maximum variable {}",
                    lineno + 1,
                    lit,
                    max_var
                )));
            }
            Ok(values)
        };

        let mut aig = Aig::new();
        let mut defined: HashMap<u64, Signal> = HashMap::new();
        for k in 0..num_inputs {
            let lit = next_numbers(1)?[0];
            if lit == 0 || lit % 2 == 1 || defined.contains_key(&(lit / 2)) {
                return Err(RevError::malformed(format!("bad input literal {}", lit)));
            }
            defined.insert(lit / 2, aig.add_input(format!("i{}", k)));
        }

        let mut output_lits = Vec::with_capacity(num_outputs);
        for _ in 0..num_outputs {
            output_lits.push(next_numbers(1)?[0]);
        }

        let mut and_defs: HashMap<u64, [u64; 2]> = HashMap::new();
        for _ in 0..num_ands {
            let v = next_numbers(3)?;
            let lhs = v[0];
            if lhs == 0 || lhs % 2 == 1 || defined.contains_key(&(lhs / 2)) {
                return Err(RevError::malformed(format!("bad AND literal {}", lhs)));
            }
            if and_defs.insert(lhs / 2, [v[1], v[2]]).is_some() {
                return Err(RevError::malformed(format!("AND literal {} defined twice", lhs)));
            }
        }

        // Symbol table and comments.
        let mut output_labels: Vec<String> = (0..num_outputs).map(|j| format!("o{}", j)).collect();
        for (lineno, line) in lines {
            let line = line.trim();
            if line == "c" {
                break;
            }
            if line.is_empty() {
                continue;
            }
            let (symbol, name) = line.split_once(' ').unwrap_or((line, ""));
            let mut chars = symbol.chars();
            let kind = chars.next();
            let position = chars
                .as_str()
                .parse::<usize>()
                .map_err(|_| RevError::malformed(format!("line {}: bad symbol", lineno + 1)))?;
            let labels = match kind {
                Some('i') => &mut aig.input_labels,
                Some('o') => &mut output_labels,
                _ => {
                    return Err(RevError::malformed(format!(
                        "line {}: unknown symbol `{}`",
                        lineno + 1,
                        symbol
                    )))
                }
            };
            let label = labels.get_mut(position).ok_or_else(|| {
                RevError::malformed(format!("line {}: symbol index out of range", lineno + 1))
            })?;
            *label = name.to_string();
        }

        let mut resolver = Resolver {
            aig: &mut aig,
            defined,
            and_defs,
        };
        let outputs = output_lits
            .iter()
            .map(|&lit| resolver.resolve(lit))
            .collect::<Result<Vec<_>>>()?;
        for (s, label) in outputs.into_iter().zip(output_labels) {
            aig.add_output(s, label)?;
        }
        Ok(aig)
    }
}

/// Builds AND nodes on demand, children first.
struct Resolver<'a> {
    aig: &'a mut Aig,
    defined: HashMap<u64, Signal>,
    and_defs: HashMap<u64, [u64; 2]>,
}

impl Resolver<'_> {
    fn resolve(&mut self, lit: u64) -> Result<Signal> {
        let var = lit / 2;
        let mut stack = vec![(var, false)];
        let mut on_stack = HashSet::new();

        while let Some((v, expanded)) = stack.pop() {
            if v == 0 || self.defined.contains_key(&v) {
                continue;
            }
            let [a, b] = *self
                .and_defs
                .get(&v)
                .ok_or_else(|| RevError::malformed(format!("variable {} is never defined", v)))?;
            if expanded {
                let sa = self.signal(a)?;
                let sb = self.signal(b)?;
                let s = self.aig.add_and(sa, sb)?;
                self.defined.insert(v, s);
                on_stack.remove(&v);
            } else {
                if !on_stack.insert(v) {
                    return Err(RevError::malformed(format!(
                        "combinational cycle through variable {}",
                        v
                    )));
                }
                stack.push((v, true));
                stack.push((a / 2, false));
                stack.push((b / 2, false));
            }
        }
        self.signal(lit)
    }

    fn signal(&self, lit: u64) -> Result<Signal> {
        let var = lit / 2;
        let s = if var == 0 {
            Signal::zero()
        } else {
            *self
                .defined
                .get(&var)
                .ok_or_else(|| RevError::malformed(format!("variable {} is never defined", var)))?
        };
        Ok(if lit % 2 == 1 { !s } else { s })
    }
}
