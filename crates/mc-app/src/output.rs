use std::io::Write;

use anyhow::{Context, Result};
use mc_core::features::FeatureMatrix;

use crate::cli::OutputFormat;

/// Écrit la matrice dans le format demandé.
///
/// # Errors
/// Returns an error if the writer fails.
pub fn write_matrix(
    matrix: &FeatureMatrix,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(matrix, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, matrix).context("Sérialisation JSON")?;
            writeln!(out)?;
            Ok(())
        }
    }
}

/// Header `time,c<k>,...` numbered by cepstral index, then one row per frame.
fn write_csv(matrix: &FeatureMatrix, out: &mut impl Write) -> Result<()> {
    let first = matrix.first_coefficient;
    let header: Vec<String> = (first..first + matrix.num_coefficients)
        .map(|i| format!("c{i}"))
        .collect();
    writeln!(out, "time,{}", header.join(",")).context("Écriture CSV")?;

    for (i, row) in matrix.frames.iter().enumerate() {
        let t = i as f32 * matrix.hop_duration;
        let cells: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
        writeln!(out, "{t:.4},{}", cells.join(",")).context("Écriture CSV")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> FeatureMatrix {
        FeatureMatrix {
            frames: vec![vec![1.0, -0.5], vec![0.25, 2.0]],
            hop_duration: 0.01,
            sample_rate: 16_000,
            num_coefficients: 2,
            first_coefficient: 1,
        }
    }

    #[test]
    fn csv_layout() {
        let mut buf = Vec::new();
        write_matrix(&matrix(), OutputFormat::Csv, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time,c1,c2");
        assert_eq!(lines[1], "0.0000,1.000000,-0.500000");
        assert_eq!(lines[2], "0.0100,0.250000,2.000000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn csv_header_starts_at_c0_when_kept() {
        let m = FeatureMatrix {
            first_coefficient: 0,
            ..matrix()
        };
        let mut buf = Vec::new();
        write_matrix(&m, OutputFormat::Csv, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next(), Some("time,c0,c1"));
    }

    #[test]
    fn json_round_trips_fields() {
        let mut buf = Vec::new();
        write_matrix(&matrix(), OutputFormat::Json, &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["sample_rate"], 16_000);
        assert_eq!(v["num_coefficients"], 2);
        assert_eq!(v["first_coefficient"], 1);
        assert_eq!(v["frames"].as_array().map(Vec::len), Some(2));
    }
}
