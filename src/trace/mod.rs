//! Trace output for the CLI frontend.
//!
//! Writes a rendered output trace either as raw little-endian f32 samples or
//! as `t,v` CSV rows.

use std::io::Write;

use crate::error::{BenchError, Result};
use crate::signal::PeriodicSignal;

/// Block size for trace output (in samples).
pub const BUFFER_SIZE: usize = 256;

/// Encoding of a written trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceFormat {
    /// `t,v` rows with a header line
    #[default]
    Csv,
    /// Raw little-endian f32 values, no timestamps
    F32le,
}

impl TraceFormat {
    /// Parse a format name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(TraceFormat::Csv),
            "f32le" | "f32" | "raw" => Some(TraceFormat::F32le),
            _ => None,
        }
    }
}

fn output_error(e: std::io::Error) -> BenchError {
    BenchError::TraceOutputError {
        message: e.to_string(),
    }
}

/// Trace writer over any byte sink.
pub struct TraceOutput<W: Write> {
    writer: W,
    format: TraceFormat,
    buffer: Vec<u8>,
    header_written: bool,
}

impl<W: Write> TraceOutput<W> {
    /// Create a new trace writer.
    pub fn new(writer: W, format: TraceFormat) -> Self {
        Self {
            writer,
            format,
            buffer: Vec::with_capacity(BUFFER_SIZE * 4),
            header_written: false,
        }
    }

    /// Write a block of samples with their timestamps.
    pub fn write_block(&mut self, times: &[f64], values: &[f64]) -> Result<()> {
        self.buffer.clear();
        match self.format {
            TraceFormat::F32le => {
                for &v in values {
                    self.buffer.extend_from_slice(&(v as f32).to_le_bytes());
                }
            }
            TraceFormat::Csv => {
                if !self.header_written {
                    self.buffer.extend_from_slice(b"t,v\n");
                    self.header_written = true;
                }
                for (t, v) in times.iter().zip(values) {
                    writeln!(self.buffer, "{t:e},{v:e}").map_err(output_error)?;
                }
            }
        }

        self.writer.write_all(&self.buffer).map_err(output_error)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(output_error)
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Render `periods` periods of `signal` at `samples` points and write them in blocks.
pub fn write_trace<W: Write>(
    writer: W,
    format: TraceFormat,
    signal: &PeriodicSignal,
    samples: usize,
    periods: f64,
) -> Result<W> {
    let values = signal.render(samples, periods);
    let dt = signal.period() * periods / samples.max(1) as f64;
    let times: Vec<f64> = (0..values.len()).map(|j| j as f64 * dt).collect();

    let mut output = TraceOutput::new(writer, format);
    for (t, v) in times.chunks(BUFFER_SIZE).zip(values.chunks(BUFFER_SIZE)) {
        output.write_block(t, v)?;
    }
    output.flush()?;
    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Sine;

    #[test]
    fn test_format_names() {
        assert_eq!(TraceFormat::from_str("CSV"), Some(TraceFormat::Csv));
        assert_eq!(TraceFormat::from_str("f32le"), Some(TraceFormat::F32le));
        assert_eq!(TraceFormat::from_str("wav"), None);
    }

    #[test]
    fn test_f32le_trace() {
        let signal: PeriodicSignal = Sine::with_frequency(2.0, 1.0).unwrap().into();
        let bytes = write_trace(Vec::new(), TraceFormat::F32le, &signal, 600, 1.0).unwrap();
        assert_eq!(bytes.len(), 600 * 4);

        // quarter period is the positive peak
        let peak = f32::from_le_bytes([bytes[600], bytes[601], bytes[602], bytes[603]]);
        assert!((peak - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_csv_trace() {
        let signal: PeriodicSignal = Sine::with_frequency(1.0, 1.0).unwrap().into();
        let bytes = write_trace(Vec::new(), TraceFormat::Csv, &signal, 300, 2.0).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "t,v");
        // header written once across blocks
        assert_eq!(lines.len(), 301);
        assert_eq!(text.matches("t,v").count(), 1);

        let (t, v) = lines[1].split_once(',').unwrap();
        assert_eq!(t.parse::<f64>().unwrap(), 0.0);
        assert!(v.parse::<f64>().unwrap().abs() < 1e-12);
    }
}
