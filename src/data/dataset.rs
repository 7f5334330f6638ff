use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};

/// One labelled record: a fixed-width feature vector and a category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: String,
}

impl Sample {
    pub fn new(features: Vec<f64>, label: impl Into<String>) -> Self {
        Sample { features, label: label.into() }
    }
}

/// Maps a closed set of category names onto one-hot target vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<S: Into<String>>(classes: impl IntoIterator<Item = S>) -> Self {
        LabelEncoder { classes: classes.into_iter().map(Into::into).collect() }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// One-hot vector for `label`; an unknown label yields all zeros.
    pub fn target_for(&self, label: &str) -> Vec<f64> {
        let mut target = vec![0.0; self.classes.len()];
        if let Some(i) = self.index_of(label) {
            target[i] = 1.0;
        }
        target
    }
}

/// Ordered, immutable collection of samples plus the category set their
/// labels are drawn from.
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Vec<Sample>,
    encoder: LabelEncoder,
    feature_count: usize,
}

impl Dataset {
    /// Rejects an empty sample list and rows of differing feature width.
    /// Labels outside `encoder` are kept; they encode to the zero vector.
    pub fn new(samples: Vec<Sample>, encoder: LabelEncoder) -> Result<Self> {
        let feature_count = match samples.first() {
            Some(s) => s.features.len(),
            None => return Err(NnError::EmptyDataset),
        };
        if let Some(bad) = samples.iter().find(|s| s.features.len() != feature_count) {
            return Err(NnError::shape("dataset feature width", feature_count, bad.features.len()));
        }
        Ok(Dataset { samples, encoder, feature_count })
    }

    /// Like `new`, with the category set taken from the labels in first-seen order.
    pub fn with_inferred_classes(samples: Vec<Sample>) -> Result<Self> {
        let mut classes: Vec<String> = Vec::new();
        for s in &samples {
            if !classes.contains(&s.label) {
                classes.push(s.label.clone());
            }
        }
        Dataset::new(samples, LabelEncoder::new(classes))
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_targets_follow_class_order() {
        let enc = LabelEncoder::new(["setosa", "versicolor", "virginica"]);
        assert_eq!(enc.target_for("setosa"), vec![1.0, 0.0, 0.0]);
        assert_eq!(enc.target_for("virginica"), vec![0.0, 0.0, 1.0]);
        assert_eq!(enc.index_of("versicolor"), Some(1));
    }

    #[test]
    fn unknown_label_encodes_to_zero_vector() {
        let enc = LabelEncoder::new(["a", "b"]);
        assert_eq!(enc.target_for("c"), vec![0.0, 0.0]);
        assert_eq!(enc.index_of("c"), None);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(matches!(
            Dataset::new(vec![], LabelEncoder::new(["a"])),
            Err(NnError::EmptyDataset)
        ));
    }

    #[test]
    fn ragged_features_are_rejected() {
        let err = Dataset::with_inferred_classes(vec![
            Sample::new(vec![1.0, 2.0], "a"),
            Sample::new(vec![1.0], "b"),
        ]).unwrap_err();
        assert!(err.is_shape_mismatch());
    }

    #[test]
    fn inferred_classes_keep_first_seen_order() {
        let ds = Dataset::with_inferred_classes(vec![
            Sample::new(vec![0.0], "b"),
            Sample::new(vec![1.0], "a"),
            Sample::new(vec![2.0], "b"),
        ]).unwrap();
        assert_eq!(ds.encoder().classes(), &["b".to_string(), "a".to_string()]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.feature_count(), 1);
    }
}
