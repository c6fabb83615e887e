use std::sync::Arc;
use std::time::Duration;

use crate::models::{Decision, TransactionInput};
use crate::policy::errors::ScoringError;
use crate::policy::{Clock, PolicyConfig, RandomSource, UnparsableAmount};
use crate::types::Amount;

/// Risk signals raised by a transaction.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Signals {
    pub high_amount: bool,
    pub suspicious_type: bool,
    pub odd_hour: bool
}

impl Signals {
    pub fn count(&self) -> usize {
        [self.high_amount, self.suspicious_type, self.odd_hour].into_iter()
            .filter(|raised| *raised)
            .count()
    }
}

/// Stand-in for a fraud classifier.
///
/// A handful of threshold checks pick a fraud probability from the configured
/// [`RiskTable`](crate::policy::RiskTable), then a single uniform draw decides the outcome.
/// The result is intentionally non-deterministic unless the random source is.
#[derive(Debug, Clone)]
pub struct ScoringPolicy {
    config: PolicyConfig
}

impl ScoringPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Evaluates the threshold checks. The clock is only read when the policy checks the hour.
    ///
    /// # Errors
    /// Returns `ScoringError::InvalidHour` if the clock reports an hour above 23.
    pub fn signals(&self, input: &TransactionInput, clock: &dyn Clock) -> Result<Signals, ScoringError> {
        let amount = match (input.parsed_amount(), self.config.unparsable_amount) {
            (Some(amount), _) => Some(amount),
            (None, UnparsableAmount::Zero) => Some(Amount::zero()),
            (None, UnparsableAmount::Indeterminate) => None
        };

        let high_amount = amount.is_some_and(|amount| amount.value() > self.config.amount_threshold);

        let suspicious_type = input.parsed_transaction_type()
            .is_some_and(|transaction_type| self.config.suspicious_types.contains(&transaction_type));

        let odd_hour = match self.config.active_hours {
            Some(active_hours) => {
                let hour = clock.hour();

                if hour > 23 {
                    return Err(ScoringError::InvalidHour(hour))
                }

                !active_hours.contains(hour)
            },
            None => false
        };

        Ok(Signals { high_amount, suspicious_type, odd_hour })
    }

    pub fn fraud_probability(&self, signals: &Signals) -> f64 {
        self.config.risk.probability(signals.count())
    }

    /// Produces a verdict for one transaction.
    ///
    /// The transaction is fraudulent when the draw lands above `1 - p`, where `p` is the
    /// fraud probability for the raised signals.
    ///
    /// # Errors
    /// Returns `ScoringError` if:
    /// - The clock reports an invalid hour.
    /// - The random source yields a draw that is not a finite value in `[0, 1]`.
    pub fn score(&self, input: &TransactionInput, random: &dyn RandomSource, clock: &dyn Clock) -> Result<Decision, ScoringError> {
        let signals = self.signals(input, clock)?;
        let probability = self.fraud_probability(&signals);
        let draw = random.draw();

        if !draw.is_finite() || !(0.0..=1.0).contains(&draw) {
            return Err(ScoringError::InvalidDraw(draw))
        }

        if draw > 1.0 - probability {
            Ok(Decision::Fraudulent)
        } else {
            Ok(Decision::Legitimate)
        }
    }
}

/// A policy bundled with the random source and clock it draws from.
#[derive(Clone)]
pub struct Scorer {
    policy: Arc<ScoringPolicy>,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>
}

impl Scorer {
    pub fn new(policy: ScoringPolicy, random: Arc<dyn RandomSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy: Arc::new(policy),
            random,
            clock
        }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn delay(&self) -> Duration {
        self.policy.config().delay
    }

    pub fn score(&self, input: &TransactionInput) -> Result<Decision, ScoringError> {
        self.policy.score(input, self.random.as_ref(), self.clock.as_ref())
    }
}
