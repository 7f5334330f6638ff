//! CSV loading for labelled datasets.
//!
//! Supported format:
//! - UTF-8, comma-separated, one sample per line: `f1,f2,...,fn,label`
//! - Optional header row (auto-detected: the first row is a header if any of
//!   its feature cells is non-numeric)
//! - Double-quoted fields with embedded commas are handled
//! - Blank lines are skipped

use crate::data::dataset::{Dataset, LabelEncoder, Sample};
use crate::error::{NnError, Result};

const IRIS_EXCERPT: &str = include_str!("iris_excerpt.csv");

/// The three Iris species, in target-vector order.
pub const IRIS_CLASSES: [&str; 3] = ["Iris-setosa", "Iris-versicolor", "Iris-virginica"];

/// Parses CSV text into a `Dataset`.
///
/// With `encoder == None` the category set is collected from the labels in
/// first-seen order.
pub fn parse_csv(text: &str, encoder: Option<LabelEncoder>) -> Result<Dataset> {
    let mut lines = text.lines().enumerate().peekable();

    if let Some((_, first)) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut samples = Vec::new();
    for (idx, line) in lines {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        let Some((label, feature_cells)) = cells.split_last() else {
            continue;
        };
        if feature_cells.is_empty() {
            return Err(NnError::Parse {
                line: line_no,
                message: format!("expected at least 2 columns (features + label), got {}", cells.len()),
            });
        }

        let features = parse_floats(feature_cells, line_no)?;
        samples.push(Sample::new(features, label.trim()));
    }

    match encoder {
        Some(enc) => Dataset::new(samples, enc),
        None => Dataset::with_inferred_classes(samples),
    }
}

/// Reads and parses a CSV file; see [`parse_csv`].
pub fn load_csv(path: &str, encoder: Option<LabelEncoder>) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    parse_csv(&text, encoder)
}

/// Fifteen Iris rows (five per species, interleaved), 4 features each.
pub fn builtin_iris_excerpt() -> Result<Dataset> {
    parse_csv(IRIS_EXCERPT, Some(LabelEncoder::new(IRIS_CLASSES)))
}

/// Returns `true` if the row looks like a header (any feature cell non-numeric).
fn is_header(line: &str) -> bool {
    let cells = parse_csv_row(line);
    let features = match cells.split_last() {
        Some((_, rest)) => rest,
        None => return false,
    };
    features.iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], line: usize) -> Result<Vec<f64>> {
    cells.iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| NnError::Parse {
                line,
                message: format!("'{}' is not a valid number", c.trim()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_header_and_blank_lines() {
        let text = "a,b,label\n1.0,2.0,x\n\n3.0,4.0,y\n";
        let ds = parse_csv(text, None).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.samples()[1].features, vec![3.0, 4.0]);
        assert_eq!(ds.samples()[1].label, "y");
        assert_eq!(ds.encoder().classes(), &["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn headerless_input_keeps_first_row() {
        let ds = parse_csv("0.5,cat\n0.25,dog\n", None).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.samples()[0].label, "cat");
    }

    #[test]
    fn quoted_label_with_comma() {
        let ds = parse_csv("1,2,\"big, red\"\n", None).unwrap();
        assert_eq!(ds.samples()[0].label, "big, red");
    }

    #[test]
    fn bad_number_reports_line() {
        let err = parse_csv("f,label\n1.0,a\nnope,b\n", None).unwrap_err();
        match err {
            NnError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn label_only_row_is_rejected() {
        assert!(matches!(parse_csv("1.0,a\nlonely\n", None), Err(NnError::Parse { line: 2, .. })));
    }

    #[test]
    fn header_only_is_empty_dataset() {
        assert!(matches!(parse_csv("a,b,label\n", None), Err(NnError::EmptyDataset)));
    }

    #[test]
    fn iris_excerpt_is_balanced() {
        let ds = builtin_iris_excerpt().unwrap();
        assert_eq!(ds.len(), 15);
        assert_eq!(ds.feature_count(), 4);
        for class in IRIS_CLASSES {
            assert_eq!(ds.samples().iter().filter(|s| s.label == class).count(), 5);
        }
    }
}
