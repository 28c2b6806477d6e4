//! Multi-output Boolean functions as BDDs.
//!
//! Input `i` is BDD variable `i + 1`; output `j` is the `j`-th root.

use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use log::debug;

use crate::bdd::Bdd;
use crate::error::{Result, RevError};
use crate::reference::Ref;

/// An `n`-input, `m`-output function sharing one BDD manager.
///
/// The outputs stay protected in the manager while the function is alive.
pub struct BddFunction {
    bdd: Rc<Bdd>,
    inputs: usize,
    outputs: Vec<Ref>,
    input_labels: Vec<String>,
    output_labels: Vec<String>,
}

impl BddFunction {
    /// Wrap output roots built in `bdd` over the variables `1..=inputs`.
    pub fn new(bdd: Rc<Bdd>, inputs: usize, outputs: Vec<Ref>) -> Result<Self> {
        for (j, &f) in outputs.iter().enumerate() {
            if let Some(&v) = bdd.support(f).last() {
                if v as usize > inputs {
                    return Err(RevError::malformed(format!(
                        "output {} depends on variable {} of a {}-input function",
                        j, v, inputs
                    )));
                }
            }
        }
        let input_labels = (0..inputs).map(|i| format!("x{}", i)).collect();
        let output_labels = (0..outputs.len()).map(|j| format!("y{}", j)).collect();
        for &f in &outputs {
            bdd.protect(f);
        }
        Ok(Self {
            bdd,
            inputs,
            outputs,
            input_labels,
            output_labels,
        })
    }

    /// Tabulate `f` over `inputs` input bits, keeping `outputs` output bits.
    pub fn from_fn(inputs: usize, outputs: usize, f: impl Fn(u64) -> u64) -> Result<Self> {
        let bdd = Rc::new(Bdd::default());
        let vars: Vec<u32> = (1..=inputs as u32).collect();
        let roots = (0..outputs)
            .map(|j| bdd.from_fn(&vars, |x| f(x) >> j & 1 == 1))
            .collect();
        Self::new(bdd, inputs, roots)
    }

    pub fn bdd(&self) -> &Rc<Bdd> {
        &self.bdd
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn outputs(&self) -> &[Ref] {
        &self.outputs
    }

    pub fn input_labels(&self) -> &[String] {
        &self.input_labels
    }

    pub fn output_labels(&self) -> &[String] {
        &self.output_labels
    }

    /// Output bits for the packed input `x`.
    pub fn evaluate(&self, x: u64) -> u64 {
        self.outputs
            .iter()
            .enumerate()
            .filter(|&(_, &f)| self.bdd.evaluate(f, |v| x >> (v - 1) & 1 == 1))
            .fold(0, |acc, (j, _)| acc | 1 << j)
    }

}

impl Clone for BddFunction {
    fn clone(&self) -> Self {
        for &f in &self.outputs {
            self.bdd.protect(f);
        }
        Self {
            bdd: self.bdd.clone(),
            inputs: self.inputs,
            outputs: self.outputs.clone(),
            input_labels: self.input_labels.clone(),
            output_labels: self.output_labels.clone(),
        }
    }
}

impl Drop for BddFunction {
    fn drop(&mut self) {
        for &f in &self.outputs {
            self.bdd.unprotect(f);
        }
    }
}

impl Debug for BddFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BddFunction")
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs.len())
            .field("bdd", &self.bdd)
            .finish()
    }
}

// PLA reader
impl BddFunction {
    /// Parse a two-level cover in PLA format.
    ///
    /// Recognized directives are `.i`, `.o`, `.ilb`, `.ob`, `.p`, `.type`
    /// (`f` or `fd`) and `.e`. Each cube row is an input part over `0`, `1`,
    /// `-` and an output part where `1` adds the cube to that output.
    ///
    /// ```
    /// use rev_rs::function::BddFunction;
    ///
    /// let f = BddFunction::from_pla(".i 2\n.o 1\n11 1\n.e\n").unwrap();
    /// assert_eq!(f.evaluate(0b11), 1);
    /// assert_eq!(f.evaluate(0b01), 0);
    /// ```
    pub fn from_pla(text: &str) -> Result<Self> {
        let mut inputs: Option<usize> = None;
        let mut outputs: Option<usize> = None;
        let mut input_labels: Option<Vec<String>> = None;
        let mut output_labels: Option<Vec<String>> = None;
        let mut cubes: Vec<(String, String)> = Vec::new();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let at = |msg: String| RevError::malformed(format!("line {}: {}", lineno + 1, msg));
            let mut tokens = line.split_whitespace();
            let Some(head) = tokens.next() else {
                continue;
            };

            match head {
                ".i" | ".o" => {
                    let n = tokens
                        .next()
                        .and_then(|t| t.parse::<usize>().ok())
                        .ok_or_else(|| at(format!("`{}` needs a number", head)))?;
                    if head == ".i" {
                        inputs = Some(n);
                    } else {
                        outputs = Some(n);
                    }
                }
                ".ilb" => input_labels = Some(tokens.map(String::from).collect()),
                ".ob" => output_labels = Some(tokens.map(String::from).collect()),
                ".p" => {}
                ".type" => match tokens.next() {
                    Some("f") | Some("fd") => {}
                    other => return Err(at(format!("unsupported type {:?}", other))),
                },
                ".e" | ".end" => break,
                _ if head.starts_with('.') => {
                    return Err(at(format!("unknown directive `{}`", head)));
                }
                _ => {
                    let (Some(n), Some(m)) = (inputs, outputs) else {
                        return Err(at("cube before `.i` and `.o`".to_string()));
                    };
                    let output = tokens
                        .next()
                        .ok_or_else(|| at("cube without output part".to_string()))?;
                    if head.len() != n || output.len() != m {
                        return Err(at(format!(
                            "cube `{} {}` does not match {} inputs and {} outputs",
                            head, output, n, m
                        )));
                    }
                    if let Some(c) = head.chars().find(|c| !matches!(c, '0' | '1' | '-')) {
                        return Err(at(format!("bad input character `{}`", c)));
                    }
                    if let Some(c) = output.chars().find(|c| !matches!(c, '0' | '1' | '-' | '~')) {
                        return Err(at(format!("bad output character `{}`", c)));
                    }
                    cubes.push((head.to_string(), output.to_string()));
                }
            }
        }

        let (Some(n), Some(m)) = (inputs, outputs) else {
            return Err(RevError::malformed("missing `.i` or `.o`"));
        };
        debug!("from_pla: {} inputs, {} outputs, {} cubes", n, m, cubes.len());

        let bdd = Rc::new(Bdd::default());
        let mut roots = vec![bdd.zero; m];
        for (input, output) in &cubes {
            let lits = input.chars().enumerate().filter_map(|(i, c)| {
                let var = i as i32 + 1;
                match c {
                    '1' => Some(var),
                    '0' => Some(-var),
                    _ => None,
                }
            });
            let cube = bdd.cube(lits);
            for (j, c) in output.chars().enumerate() {
                if c == '1' {
                    roots[j] = bdd.apply_or(roots[j], cube);
                }
            }
        }

        let mut function = Self::new(bdd, n, roots)?;
        if let Some(labels) = input_labels {
            if labels.len() != n {
                return Err(RevError::malformed(format!(
                    "`.ilb` names {} inputs, expected {}",
                    labels.len(),
                    n
                )));
            }
            function.input_labels = labels;
        }
        if let Some(labels) = output_labels {
            if labels.len() != m {
                return Err(RevError::malformed(format!(
                    "`.ob` names {} outputs, expected {}",
                    labels.len(),
                    m
                )));
            }
            function.output_labels = labels;
        }
        Ok(function)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    const FULL_ADDER: &str = "\
# full adder
.i 3
.o 2
.ilb a b cin
.ob s cout
.p 7
100 10
010 10
001 10
111 11
11- 01
1-1 01
-11 01
.e
";

    #[test]
    fn test_full_adder() {
        let f = BddFunction::from_pla(FULL_ADDER).unwrap();
        assert_eq!(f.num_inputs(), 3);
        assert_eq!(f.num_outputs(), 2);
        assert_eq!(f.input_labels(), &["a", "b", "cin"]);
        assert_eq!(f.output_labels(), &["s", "cout"]);
        for x in 0..8u64 {
            let ones = x.count_ones() as u64;
            let sum = ones & 1;
            let carry = (ones >> 1) & 1;
            assert_eq!(f.evaluate(x), sum | carry << 1, "x = {}", x);
        }
    }

    #[test]
    fn test_from_fn() {
        let f = BddFunction::from_fn(3, 3, |x| (x + 1) % 8).unwrap();
        for x in 0..8 {
            assert_eq!(f.evaluate(x), (x + 1) % 8);
        }
        assert_eq!(f.input_labels(), &["x0", "x1", "x2"]);
    }

    #[test]
    fn test_malformed_pla() {
        for text in [
            "11 1\n",
            ".i 2\n.o 1\n1 1\n",
            ".i 2\n.o 1\n1x 1\n",
            ".i 2\n.o 1\n.ilb a\n11 1\n",
            ".i two\n",
            ".i 2\n.o 1\n.type r\n",
            ".i 2\n",
        ] {
            assert!(
                matches!(BddFunction::from_pla(text), Err(RevError::MalformedInput(_))),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn test_outputs_survive_collection() {
        let f = BddFunction::from_pla(FULL_ADDER).unwrap();
        let bdd = f.bdd().clone();
        let tmp = bdd.apply_xor(f.outputs()[0], bdd.mk_var(3));
        assert!(!bdd.is_zero(tmp));

        bdd.collect_garbage(&[]);
        let _noise = bdd.apply_and_many((1..=3).map(|v| -bdd.mk_var(v)));
        for x in 0..8u64 {
            assert_eq!(f.evaluate(x) & 1, (x.count_ones() & 1) as u64);
        }

        drop(f);
        bdd.collect_garbage(&[]);
        assert_eq!(bdd.num_nodes(), 1);
    }
}
