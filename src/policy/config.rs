use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::models::TransactionType;
use crate::policy::errors::ConfigError;

/// Fraud probability by the number of risk signals raised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskTable {
    /// Two or more signals.
    pub elevated: f64,
    /// Exactly one signal.
    pub single: f64,
    /// No signal.
    pub baseline: f64
}

impl RiskTable {
    pub fn probability(&self, signal_count: usize) -> f64 {
        match signal_count {
            0 => self.baseline,
            1 => self.single,
            _ => self.elevated
        }
    }
}

/// How an amount without a leading number is treated.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum UnparsableAmount {
    /// The amount is unknown and never counts as high.
    Indeterminate,
    /// The amount reads as zero.
    Zero
}

/// Hours of the day considered normal, inclusive on both ends.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ActiveHours {
    pub earliest: u32,
    pub latest: u32
}

impl ActiveHours {
    pub fn contains(&self, hour: u32) -> bool {
        (self.earliest..=self.latest).contains(&hour)
    }
}

/// Every tunable of the mock scoring policy.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Amounts strictly above this raise the high-amount signal.
    pub amount_threshold: Decimal,
    /// Transaction types that raise the suspicious-type signal.
    pub suspicious_types: Vec<TransactionType>,
    /// Transaction types the form variant lets the user pick.
    pub offered_types: Vec<TransactionType>,
    /// When set, hours outside of this range raise the odd-hour signal.
    pub active_hours: Option<ActiveHours>,
    pub risk: RiskTable,
    pub unparsable_amount: UnparsableAmount,
    /// Artificial pause before a verdict is produced.
    pub delay: Duration
}

impl PolicyConfig {
    pub fn offers(&self, transaction_type: TransactionType) -> bool {
        self.offered_types.contains(&transaction_type)
    }
}

/// The two form variants, expressed as configurations of the same policy.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Preset {
    /// High amounts and online/ATM transactions, two second delay.
    #[default]
    TypeWeighted,
    /// High amounts and late-night hours, one second delay.
    TimeWeighted
}

impl Preset {
    pub fn name(&self) -> &'static str {
        match self {
            Preset::TypeWeighted => "type-weighted",
            Preset::TimeWeighted => "time-weighted"
        }
    }

    pub fn config(&self) -> PolicyConfig {
        match self {
            Preset::TypeWeighted => PolicyConfig {
                amount_threshold: Decimal::from(5000),
                suspicious_types: vec![TransactionType::Online, TransactionType::Atm],
                offered_types: vec![
                    TransactionType::Purchase,
                    TransactionType::Online,
                    TransactionType::Atm,
                    TransactionType::Transfer,
                    TransactionType::Refund
                ],
                active_hours: None,
                risk: RiskTable { elevated: 0.7, single: 0.3, baseline: 0.1 },
                unparsable_amount: UnparsableAmount::Indeterminate,
                delay: Duration::from_millis(2000)
            },
            Preset::TimeWeighted => PolicyConfig {
                amount_threshold: Decimal::from(10000),
                suspicious_types: Vec::new(),
                offered_types: vec![
                    TransactionType::Purchase,
                    TransactionType::Withdrawal,
                    TransactionType::Transfer,
                    TransactionType::Refund,
                    TransactionType::Payment
                ],
                active_hours: Some(ActiveHours { earliest: 6, latest: 22 }),
                risk: RiskTable { elevated: 0.7, single: 0.7, baseline: 0.2 },
                unparsable_amount: UnparsableAmount::Zero,
                delay: Duration::from_millis(1000)
            }
        }
    }
}

impl Display for Preset {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "type-weighted" => Ok(Preset::TypeWeighted),
            "time-weighted" => Ok(Preset::TimeWeighted),
            _ => Err(ConfigError::UnknownPreset(value.to_string()))
        }
    }
}
