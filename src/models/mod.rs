mod errors;
mod form;
mod transaction;

use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use errors::{FieldError, FormError, TransactionTypeError};
pub use form::{Completion, FormState, Snapshot, Ticket};
pub use transaction::TransactionInput;

/// The closed set of transaction types any form variant offers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TransactionType {
    Purchase,
    Online,
    Atm,
    Withdrawal,
    Transfer,
    Refund,
    Payment
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Online => "online",
            TransactionType::Atm => "atm",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Transfer => "transfer",
            TransactionType::Refund => "refund",
            TransactionType::Payment => "payment"
        }
    }
}

impl FromStr for TransactionType {
    type Err = TransactionTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "purchase" => Ok(TransactionType::Purchase),
            "online" => Ok(TransactionType::Online),
            "atm" => Ok(TransactionType::Atm),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            "transfer" => Ok(TransactionType::Transfer),
            "refund" => Ok(TransactionType::Refund),
            "payment" => Ok(TransactionType::Payment),
            _ => Err(TransactionTypeError::Unknown(value.to_string()))
        }
    }
}

/// The six inputs of the transaction form.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Field {
    TransactionId,
    TransactionDate,
    Amount,
    MerchantId,
    TransactionType,
    Location
}

impl Field {
    /// Every field in the order the form presents them.
    pub const ALL: [Field; 6] = [
        Field::TransactionId,
        Field::TransactionDate,
        Field::Amount,
        Field::MerchantId,
        Field::TransactionType,
        Field::Location
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::TransactionId => "transactionId",
            Field::TransactionDate => "transactionDate",
            Field::Amount => "amount",
            Field::MerchantId => "merchantId",
            Field::TransactionType => "transactionType",
            Field::Location => "location"
        }
    }
}

impl Display for Field {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        //NOTE: Accepts both the form names (camelCase) and the CSV header names (snake_case)
        match value.trim().to_lowercase().replace('_', "").as_str() {
            "transactionid" => Ok(Field::TransactionId),
            "transactiondate" => Ok(Field::TransactionDate),
            "amount" => Ok(Field::Amount),
            "merchantid" => Ok(Field::MerchantId),
            "transactiontype" => Ok(Field::TransactionType),
            "location" => Ok(Field::Location),
            _ => Err(FieldError::Unknown(value.to_string()))
        }
    }
}

/// Outcome of a single scoring run. A completed analysis is always one of the two.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Decision {
    Legitimate,
    Fraudulent
}

/// What the form currently shows: nothing yet, or the outcome of the last analysis.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Verdict {
    #[default]
    Unset,
    Legitimate,
    Fraudulent
}

impl Verdict {
    /// `0` for legitimate, `1` for fraudulent.
    pub fn code(&self) -> Option<u8> {
        match self {
            Verdict::Unset => None,
            Verdict::Legitimate => Some(0),
            Verdict::Fraudulent => Some(1)
        }
    }

    pub fn is_set(&self) -> bool {
        *self != Verdict::Unset
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Unset => "unset",
            Verdict::Legitimate => "legitimate",
            Verdict::Fraudulent => "fraudulent"
        }
    }

    /// The percentage printed on the result panel. It is a fixed figure per outcome and
    /// says nothing about the draw that produced the verdict.
    pub fn display_confidence(&self) -> Option<f64> {
        match self {
            Verdict::Unset => None,
            Verdict::Legitimate => Some(94.7),
            Verdict::Fraudulent => Some(87.3)
        }
    }
}

impl From<Decision> for Verdict {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Legitimate => Verdict::Legitimate,
            Decision::Fraudulent => Verdict::Fraudulent
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}
