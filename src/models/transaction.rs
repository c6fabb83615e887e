use serde::Deserialize;

use crate::models::{Field, TransactionType};
use crate::types::Amount;

/// The raw contents of the transaction form.
///
/// Every field is kept as the text that was entered. Nothing is validated on entry;
/// the amount and transaction type are only interpreted when the form is scored.
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize)]
pub struct TransactionInput {
    /// Opaque identifier, no format is enforced.
    #[serde(default)]
    pub transaction_id: String,
    /// Local date and time of the transaction. Collected but never consulted by scoring.
    #[serde(default)]
    pub transaction_date: String,
    /// Text-encoded decimal amount.
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub merchant_id: String,
    /// One of the transaction types offered by the form variant.
    #[serde(default)]
    pub transaction_type: String,
    /// Free text, unused by scoring.
    #[serde(default)]
    pub location: String
}

impl TransactionInput {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::TransactionId => &self.transaction_id,
            Field::TransactionDate => &self.transaction_date,
            Field::Amount => &self.amount,
            Field::MerchantId => &self.merchant_id,
            Field::TransactionType => &self.transaction_type,
            Field::Location => &self.location
        }
    }

    /// Replaces exactly one field's value.
    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::TransactionId => &mut self.transaction_id,
            Field::TransactionDate => &mut self.transaction_date,
            Field::Amount => &mut self.amount,
            Field::MerchantId => &mut self.merchant_id,
            Field::TransactionType => &mut self.transaction_type,
            Field::Location => &mut self.location
        };

        *slot = value;
    }

    /// Fields that are empty or whitespace only, in form order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL.into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn parsed_amount(&self) -> Option<Amount> {
        Amount::parse_lenient(&self.amount)
    }

    /// The selected transaction type, or `None` when the text is not a known type.
    pub fn parsed_transaction_type(&self) -> Option<TransactionType> {
        self.transaction_type.parse().ok()
    }
}
