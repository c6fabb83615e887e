use crate::models::Field;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum FormError {
    #[error("Submission rejected: an analysis is already in progress")]
    Busy,
    #[error("Submission rejected: required fields are blank {missing:?}")]
    Incomplete {
        missing: Vec<Field>
    },
    #[error("Form session is no longer running")]
    SessionClosed
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum FieldError {
    #[error("Unknown form field [{0}]")]
    Unknown(String)
}

#[derive(Debug, Error, Eq, PartialEq)]
pub enum TransactionTypeError {
    #[error("Unknown transaction type [{0}]")]
    Unknown(String)
}
