//! Circuit-based synthesis from an AIG.
//!
//! Every AND node gets its own constant-0 line and is computed there by one
//! Toffoli gate. Outputs are copied onto fresh constant-0 lines, after which
//! the AND lines can be cleaned up by running their gates backwards.

use log::debug;

use crate::aig::Aig;
use crate::circuit::{Circuit, LineInfo};
use crate::error::Result;
use crate::gate::{Control, Gate};
use crate::signal::Signal;

use super::Synthesizer;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CbsOptions {
    /// Return the AND lines to 0 after the outputs are copied.
    pub uncompute: bool,
}

impl Default for CbsOptions {
    fn default() -> Self {
        Self { uncompute: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cbs {
    pub options: CbsOptions,
}

impl Cbs {
    pub fn new(options: CbsOptions) -> Self {
        Self { options }
    }
}

/// What a signal evaluates to once the circuit has run up to its node.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Value {
    Const(bool),
    Line(Control),
}

impl Value {
    fn negate(self, negated: bool) -> Value {
        match self {
            Value::Const(v) => Value::Const(v ^ negated),
            Value::Line(c) => Value::Line(Control {
                line: c.line,
                polarity: c.polarity ^ negated,
            }),
        }
    }
}

struct Layout {
    inputs: usize,
    ands: usize,
}

impl Layout {
    fn and_line(&self, node: usize) -> usize {
        self.inputs + node
    }

    fn output_line(&self, output: usize) -> usize {
        self.inputs + self.ands + output
    }

    fn lines(&self, outputs: usize) -> usize {
        self.inputs + self.ands + outputs
    }
}

impl Synthesizer<Aig> for Cbs {
    fn synthesize(&self, aig: &Aig) -> Result<Circuit> {
        let layout = Layout {
            inputs: aig.num_inputs(),
            ands: aig.num_ands(),
        };
        let mut circuit = Circuit::new(layout.lines(aig.num_outputs()));

        let mut values: Vec<Value> = Vec::with_capacity(aig.num_ands());
        let value_of = |values: &[Value], s: Signal| {
            let v = if s.is_const() {
                Value::Const(false)
            } else if s.is_input() {
                Value::Line(Control::positive(s.input() as usize))
            } else {
                values[s.node() as usize]
            };
            v.negate(s.is_negated())
        };

        let mut and_gates = Vec::new();
        for (k, &[a, b]) in aig.ands().iter().enumerate() {
            let value = match (value_of(&values, a), value_of(&values, b)) {
                (Value::Const(false), _) | (_, Value::Const(false)) => Value::Const(false),
                (Value::Const(true), Value::Const(true)) => Value::Const(true),
                (Value::Const(true), Value::Line(c)) | (Value::Line(c), Value::Const(true)) => {
                    and_gates.push(Gate::new(layout.and_line(k), [c])?);
                    Value::Line(Control::positive(layout.and_line(k)))
                }
                (Value::Line(c), Value::Line(d)) if c.line == d.line => {
                    if c.polarity != d.polarity {
                        Value::Const(false)
                    } else {
                        and_gates.push(Gate::new(layout.and_line(k), [c])?);
                        Value::Line(Control::positive(layout.and_line(k)))
                    }
                }
                (Value::Line(c), Value::Line(d)) => {
                    and_gates.push(Gate::new(layout.and_line(k), [c, d])?);
                    Value::Line(Control::positive(layout.and_line(k)))
                }
            };
            values.push(value);
        }
        debug!(
            "cbs: {} of {} AND nodes need a gate",
            and_gates.len(),
            aig.num_ands()
        );

        for gate in &and_gates {
            circuit.push(gate.clone())?;
        }
        for (j, &s) in aig.outputs().iter().enumerate() {
            let target = layout.output_line(j);
            match value_of(&values, s) {
                Value::Const(false) => {}
                Value::Const(true) => circuit.push(Gate::not(target))?,
                Value::Line(c) => {
                    circuit.push(Gate::new(target, [Control::positive(c.line)])?)?;
                    if !c.polarity {
                        circuit.push(Gate::not(target))?;
                    }
                }
            }
        }
        if self.options.uncompute {
            for gate in and_gates.iter().rev() {
                circuit.push(gate.clone())?;
            }
        }

        let mut info = Vec::with_capacity(circuit.lines());
        for label in aig.input_labels() {
            info.push(LineInfo {
                input: label.clone(),
                output: label.clone(),
                constant: None,
                garbage: true,
            });
        }
        for k in 0..aig.num_ands() {
            info.push(LineInfo {
                input: "0".to_string(),
                output: format!("n{}", k),
                constant: Some(false),
                garbage: true,
            });
        }
        for label in aig.output_labels() {
            info.push(LineInfo {
                input: "0".to_string(),
                output: label.clone(),
                constant: Some(false),
                garbage: false,
            });
        }
        circuit.set_line_info(info)?;

        debug!("cbs: {} lines, {} gates", circuit.lines(), circuit.num_gates());
        Ok(circuit)
    }
}
