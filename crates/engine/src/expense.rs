use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine};

/// Opaque identifier of someone who pays into an event.
///
/// The engine never interprets the value: it only compares ids for equality
/// and hands them back untouched so the presentation layer can map them to a
/// label.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` characters of the id, used as a placeholder label.
    pub fn short(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Largest single expense accepted from the store: one trillion in major
/// units.
pub const MAX_EXPENSE: MoneyCents = MoneyCents::new(100_000_000_000_000);

/// One expense as the settlement engine sees it: who paid and how much.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub payer: ParticipantId,
    pub amount: MoneyCents,
}

impl ExpenseRecord {
    pub fn new(payer: impl Into<ParticipantId>, amount: MoneyCents) -> Self {
        Self {
            payer: payer.into(),
            amount,
        }
    }

    /// Builds a record from raw store values, rejecting what the engine
    /// assumes never reaches it: empty payer ids, negative amounts and
    /// amounts above [`MAX_EXPENSE`].
    pub fn validated(payer: &str, amount: MoneyCents) -> ResultEngine<Self> {
        let payer = payer.trim();
        if payer.is_empty() {
            return Err(EngineError::InvalidName(
                "payer id must not be empty".to_string(),
            ));
        }
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "expense amount must be >= 0, got {amount}"
            )));
        }
        if amount > MAX_EXPENSE {
            return Err(EngineError::InvalidAmount(format!(
                "expense amount must be <= {MAX_EXPENSE}, got {amount}"
            )));
        }
        Ok(Self::new(payer, amount))
    }
}
