use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Accuracy,
    Ushift,
    Performance,
    /// Any type this tool does not know how to plot
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("results contain no x-axis values")]
    MissingAxis,
    #[error("{labels} labels do not fit {columns} data columns")]
    LabelMismatch { labels: usize, columns: usize },
    #[error("data column {column} has {len} values, x-axis has {expected}")]
    RaggedColumn {
        column: usize,
        len: usize,
        expected: usize,
    },
    #[error("elem_size must be non-zero")]
    ZeroElemSize,
}

/// The `type` of a results file, read before the rest of it
#[derive(Debug, Deserialize)]
struct ResultsHeader {
    #[serde(rename = "type")]
    kind: ResultKind,
}

/// One benchmark results file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsRecord {
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub title: String,
    #[serde(deserialize_with = "deserialize_labels")]
    pub labels: Vec<String>,
    pub data: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elem_size: Option<u64>,
}

impl ResultsRecord {
    /// Parses a results file that has already been read as JSON. Files of an
    /// unknown `type` yield `None` and need no other fields.
    pub fn from_value(value: serde_json::Value) -> Result<Option<Self>, serde_json::Error> {
        if ResultsHeader::deserialize(&value)?.kind == ResultKind::Unknown {
            return Ok(None);
        }
        Self::deserialize(value).map(Some)
    }

    /// Checks that every label has a data column and that all columns line up
    /// with the x-axis.
    pub fn validate(&self) -> Result<(), RecordError> {
        let Some(x) = self.data.first() else {
            return Err(RecordError::MissingAxis);
        };

        let (labels, columns) = (self.labels.len(), self.data.len());
        let fits = match self.kind {
            ResultKind::Ushift => columns == labels || columns == labels + 1,
            _ => columns == labels + 1,
        };
        if !fits {
            return Err(RecordError::LabelMismatch { labels, columns });
        }

        if let Some((column, values)) = self
            .data
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != x.len())
        {
            return Err(RecordError::RaggedColumn {
                column,
                len: values.len(),
                expected: x.len(),
            });
        }

        if self.elem_size == Some(0) {
            return Err(RecordError::ZeroElemSize);
        }
        Ok(())
    }

    /// Label and (x, y) points of every plotted series, in label order.
    ///
    /// `accuracy` and `performance` pair `labels[i]` with `data[i + 1]`.
    /// `ushift` uses `labels[0]` to name the x column, the remaining labels
    /// are paired with the trailing data columns.
    pub fn series(&self) -> Vec<(&str, Vec<(f64, f64)>)> {
        let Some(x) = self.data.first() else {
            return Vec::new();
        };
        let (labels, first_column) = match self.kind {
            ResultKind::Ushift => {
                let labels = self.labels.get(1..).unwrap_or_default();
                (labels, self.data.len().saturating_sub(labels.len()))
            }
            _ => (self.labels.as_slice(), 1),
        };

        labels
            .iter()
            .zip(self.data.iter().skip(first_column))
            .map(|(label, ys)| {
                let points = x.iter().copied().zip(ys.iter().copied()).collect();
                (label.as_str(), points)
            })
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawLabel> for String {
    fn from(label: RawLabel) -> Self {
        match label {
            RawLabel::Text(text) => text,
            RawLabel::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => i.to_string(),
                (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
                _ => n.to_string(),
            },
        }
    }
}

/// Element counts are written as plain numbers by some benchmarks
fn deserialize_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let labels = Vec::<RawLabel>::deserialize(deserializer)?;
    Ok(labels.into_iter().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ResultsRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn unknown_type_parses() {
        let record = parse(r#"{"type":"latency","title":"T","labels":[],"data":[[1]]}"#);
        assert_eq!(record.kind, ResultKind::Unknown);
    }

    #[test]
    fn unknown_type_needs_only_the_type() {
        let value = serde_json::json!({"type": "machine", "cpu": "x86"});
        assert_eq!(ResultsRecord::from_value(value).unwrap(), None);
    }

    #[test]
    fn missing_type_is_an_error() {
        let value = serde_json::json!({"title": "T"});
        assert!(ResultsRecord::from_value(value).is_err());
    }

    #[test]
    fn known_type_parses_full_record() {
        let value = serde_json::json!({
            "type": "accuracy", "title": "T", "labels": ["a"], "data": [[1], [2]]
        });
        let record = ResultsRecord::from_value(value).unwrap().unwrap();
        assert_eq!(record.kind, ResultKind::Accuracy);
        assert_eq!(record.labels, ["a"]);
    }

    #[test]
    fn numeric_labels_are_accepted() {
        let record =
            parse(r#"{"type":"ushift","title":"T","labels":["U",2,4.0,0.5],"data":[[0]]}"#);
        assert_eq!(record.labels, ["U", "2", "4", "0.5"]);
    }

    #[test]
    fn performance_pairs_label_with_next_column() {
        let record = parse(
            r#"{"type":"performance","title":"T","labels":["a","b"],
                "data":[[1,2],[3,4],[5,6]],"elem_size":8}"#,
        );
        record.validate().unwrap();
        assert_eq!(
            record.series(),
            vec![
                ("a", vec![(1.0, 3.0), (2.0, 4.0)]),
                ("b", vec![(1.0, 5.0), (2.0, 6.0)]),
            ]
        );
    }

    #[test]
    fn ushift_skips_first_label() {
        let record = parse(
            r#"{"type":"ushift","title":"T","labels":["a","2","4"],
                "data":[[0,1],[1,2],[2,3]]}"#,
        );
        record.validate().unwrap();
        let series = record.series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0], ("2", vec![(0.0, 1.0), (1.0, 2.0)]));
        assert_eq!(series[1], ("4", vec![(0.0, 2.0), (1.0, 3.0)]));
    }

    #[test]
    fn ushift_with_extra_column_uses_trailing_columns() {
        let record = parse(
            r#"{"type":"ushift","title":"T","labels":["a","2","4"],
                "data":[[0,1],[9,9],[1,2],[2,3]]}"#,
        );
        record.validate().unwrap();
        let series = record.series();
        assert_eq!(series[0], ("2", vec![(0.0, 1.0), (1.0, 2.0)]));
        assert_eq!(series[1], ("4", vec![(0.0, 2.0), (1.0, 3.0)]));
    }

    #[test]
    fn label_count_must_match_columns() {
        let record =
            parse(r#"{"type":"accuracy","title":"T","labels":["a","b"],"data":[[1],[2]]}"#);
        assert_eq!(
            record.validate(),
            Err(RecordError::LabelMismatch {
                labels: 2,
                columns: 2
            })
        );
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let record = parse(r#"{"type":"accuracy","title":"T","labels":["a"],"data":[[1,2],[2]]}"#);
        assert_eq!(
            record.validate(),
            Err(RecordError::RaggedColumn {
                column: 1,
                len: 1,
                expected: 2
            })
        );
    }

    #[test]
    fn empty_data_is_rejected() {
        let record = parse(r#"{"type":"accuracy","title":"T","labels":[],"data":[]}"#);
        assert_eq!(record.validate(), Err(RecordError::MissingAxis));
    }

    #[test]
    fn zero_elem_size_is_rejected() {
        let record = parse(
            r#"{"type":"performance","title":"T","labels":[],"data":[[1]],"elem_size":0}"#,
        );
        assert_eq!(record.validate(), Err(RecordError::ZeroElemSize));
    }
}
