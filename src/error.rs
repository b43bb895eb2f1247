use thiserror::Error;

/// Why an upload could not be turned into an enriched table.
///
/// Every variant is recoverable: the caller shows the message and keeps
/// (or clears) whatever it had before.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Missing required columns in the uploaded file: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Error processing data. Check file format and content. Error: {0}")]
    Parse(String),

    /// Parsed cleanly but no row had a usable `Date`; holds the dropped count.
    #[error("No transactions with a valid Date in the uploaded file ({0} rows dropped).")]
    NoRows(usize),
}

impl IngestError {
    pub fn parse(cause: impl ToString) -> Self {
        IngestError::Parse(cause.to_string())
    }

    /// Missing column names, empty for anything other than a schema error.
    pub fn missing_columns(&self) -> &[String] {
        match self {
            IngestError::MissingColumns(cols) => cols,
            IngestError::Parse(_) | IngestError::NoRows(_) => &[],
        }
    }
}

/// An aggregation was asked to summarise zero rows.
///
/// Kept apart from a result full of zeros so the page can say
/// "no data for this selection" instead of drawing an empty chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No data found for the selected combination.")]
pub struct NoData;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_names() {
        let err = IngestError::MissingColumns(vec!["Festival".into(), "Price_Band".into()]);
        assert_eq!(
            err.to_string(),
            "Missing required columns in the uploaded file: Festival, Price_Band"
        );
        assert_eq!(err.missing_columns().len(), 2);
    }

    #[test]
    fn test_parse_error_carries_cause() {
        let err = IngestError::parse("bad gzip header");
        assert!(err.to_string().ends_with("Error: bad gzip header"));
        assert!(err.missing_columns().is_empty());
    }

    #[test]
    fn test_no_rows_message_counts_dropped() {
        let err = IngestError::NoRows(4);
        assert_eq!(
            err.to_string(),
            "No transactions with a valid Date in the uploaded file (4 rows dropped)."
        );
        assert!(err.missing_columns().is_empty());
    }
}
