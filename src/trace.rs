//! Recording of simulated trajectories as whitespace-separated text.
//!
//! A trace starts with a header line, `Time` followed by the label of every observable, then holds one row per recorded tick.
use itertools::Itertools;
use std::io::Write;

use crate::circuit::{NeuronId, SynapseId};
use crate::error::CPGError;

/// A quantity read from a simulation after every tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Observable {
    /// A state variable of a neuron, by flat index.
    Variable {
        neuron: NeuronId,
        index: usize,
        label: String,
    },
    /// The current computed by a synapse at the last tick.
    SynapseCurrent { synapse: SynapseId, label: String },
    /// A state variable of a synapse, by flat index.
    SynapseVariable {
        synapse: SynapseId,
        index: usize,
        label: String,
    },
}

impl Observable {
    /// Returns the column label of the observable.
    pub fn label(&self) -> &str {
        match self {
            Observable::Variable { label, .. } => label,
            Observable::SynapseCurrent { label, .. } => label,
            Observable::SynapseVariable { label, .. } => label,
        }
    }
}

/// Writes the rows of a trace.
#[derive(Debug)]
pub struct TraceWriter<W: Write> {
    writer: W,
    columns: usize,
    rows: usize,
}

impl<W: Write> TraceWriter<W> {
    /// Create a trace writer and write the header line for the provided observables.
    pub fn new(mut writer: W, observables: &[Observable]) -> Result<Self, CPGError> {
        let header = std::iter::once("Time")
            .chain(observables.iter().map(|observable| observable.label()))
            .join(" ");
        writeln!(writer, "{}", header).map_err(|e| CPGError::IOError(e.to_string()))?;
        Ok(TraceWriter {
            writer,
            columns: observables.len(),
            rows: 0,
        })
    }

    /// Write one row.
    /// The function returns an error if the number of values does not match the header.
    pub fn write_row(&mut self, time: f64, values: &[f64]) -> Result<(), CPGError> {
        if values.len() != self.columns {
            return Err(CPGError::InvalidParameters(format!(
                "Trace row has {} values, expected {}",
                values.len(),
                self.columns
            )));
        }
        let result = match values.is_empty() {
            true => writeln!(self.writer, "{}", time),
            false => writeln!(self.writer, "{} {}", time, values.iter().join(" ")),
        };
        result.map_err(|e| CPGError::IOError(e.to_string()))?;
        self.rows += 1;
        Ok(())
    }

    /// Returns the number of rows written so far, header excluded.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> Result<(), CPGError> {
        self.writer
            .flush()
            .map_err(|e| CPGError::IOError(e.to_string()))
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observables() -> Vec<Observable> {
        vec![
            Observable::Variable {
                neuron: NeuronId(0),
                index: 0,
                label: "N1M_v".to_string(),
            },
            Observable::SynapseCurrent {
                synapse: SynapseId(1),
                label: "i_N2v_N1M".to_string(),
            },
        ]
    }

    #[test]
    fn test_header_and_rows() {
        let mut trace = TraceWriter::new(Vec::new(), &observables()).unwrap();
        trace.write_row(0.0, &[-67.0, 0.0]).unwrap();
        trace.write_row(0.01, &[-66.5, 1.25]).unwrap();
        assert_eq!(trace.rows(), 2);
        let text = String::from_utf8(trace.into_inner()).unwrap();
        assert_eq!(text, "Time N1M_v i_N2v_N1M\n0 -67 0\n0.01 -66.5 1.25\n");
    }

    #[test]
    fn test_rejects_wrong_row_length() {
        let mut trace = TraceWriter::new(Vec::new(), &observables()).unwrap();
        assert!(matches!(
            trace.write_row(0.0, &[1.0]),
            Err(CPGError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_no_observables() {
        let mut trace = TraceWriter::new(Vec::new(), &[]).unwrap();
        trace.write_row(1.5, &[]).unwrap();
        assert_eq!(String::from_utf8(trace.into_inner()).unwrap(), "Time\n1.5\n");
    }
}
