use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid id list for {field}: {value}")]
    InvalidIdList { field: &'static str, value: String },

    #[error("Invalid date for {field}: {value} (expected dd-mm-yyyy)")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("fromDate {from} is after toDate {to}")]
    InvertedDateRange { from: String, to: String },
}
