//! Balance and settlement computation.
//!
//! Two pure stages: `expenses -> balances -> transfers`. Nothing here keeps
//! state between calls; every call recomputes from the snapshot it is given.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ExpenseRecord, MoneyCents, ParticipantId};

/// Net position of one participant.
///
/// `diff = paid - share`: positive means the participant is owed money,
/// negative means they owe money.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub participant: ParticipantId,
    pub paid: MoneyCents,
    pub share: MoneyCents,
    pub diff: MoneyCents,
}

impl Balance {
    pub fn is_creditor(&self) -> bool {
        self.diff.is_positive()
    }

    pub fn is_debtor(&self) -> bool {
        self.diff.is_negative()
    }
}

/// Suggested payment from a debtor to a creditor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: MoneyCents,
}

/// Who takes part in the equal split.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Only participants who paid at least one expense share the total.
    #[default]
    Payers,
    /// Every listed participant shares the total, including those who paid
    /// nothing. Payers missing from the roster are appended after it.
    Participants(Vec<ParticipantId>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettlementOptions {
    pub split: SplitPolicy,
    /// A diff whose magnitude is at most this amount counts as settled.
    ///
    /// Zero settles every cent exactly.
    pub tolerance: MoneyCents,
}

/// Result of a full settlement run over one event's expenses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    pub total: MoneyCents,
    pub balances: Vec<Balance>,
    pub transfers: Vec<Transfer>,
}

/// Stateless settlement calculator configured with a split policy and a
/// tolerance.
#[derive(Clone, Debug, Default)]
pub struct SettlementEngine {
    options: SettlementOptions,
}

impl SettlementEngine {
    /// Return a builder for `SettlementEngine`.
    pub fn builder() -> SettlementEngineBuilder {
        SettlementEngineBuilder::default()
    }

    pub fn new(options: SettlementOptions) -> Self {
        Self { options }
    }

    /// Per-participant balances under the configured split policy.
    pub fn balances(&self, expenses: &[ExpenseRecord]) -> Vec<Balance> {
        match &self.options.split {
            SplitPolicy::Payers => compute_balances(expenses),
            SplitPolicy::Participants(roster) => {
                split_equally(paid_by_participant(roster, expenses))
            }
        }
    }

    /// Transfers settling `balances` under the configured tolerance.
    pub fn transfers(&self, balances: &[Balance]) -> Vec<Transfer> {
        settle_greedy(balances, self.options.tolerance)
    }

    /// Runs both stages over a snapshot of expenses.
    pub fn settle(&self, expenses: &[ExpenseRecord]) -> SettlementPlan {
        let balances = self.balances(expenses);
        let transfers = self.transfers(&balances);
        SettlementPlan {
            total: expenses.iter().map(|e| e.amount).sum(),
            balances,
            transfers,
        }
    }
}

/// The builder for `SettlementEngine`
#[derive(Default)]
pub struct SettlementEngineBuilder {
    options: SettlementOptions,
}

impl SettlementEngineBuilder {
    pub fn split(mut self, split: SplitPolicy) -> SettlementEngineBuilder {
        self.options.split = split;
        self
    }

    pub fn tolerance(mut self, tolerance: MoneyCents) -> SettlementEngineBuilder {
        self.options.tolerance = tolerance;
        self
    }

    /// Construct `SettlementEngine`
    pub fn build(self) -> SettlementEngine {
        SettlementEngine::new(self.options)
    }
}

/// Computes one balance per distinct payer, in first-seen order.
///
/// The total is split equally among the payers. The split works in whole
/// cents: everyone gets `total / n` and the first `total % n` payers carry
/// one extra cent, so shares add up to the total and diffs add up to zero
/// exactly.
pub fn compute_balances(expenses: &[ExpenseRecord]) -> Vec<Balance> {
    split_equally(paid_by_participant(&[], expenses))
}

/// Greedy largest-first settlement of `balances` with no tolerance: every
/// non-zero diff is discharged to the cent.
///
/// The number of transfers is minimal in the common case only; the greedy
/// matching is deterministic for a given input order.
pub fn compute_transfers(balances: &[Balance]) -> Vec<Transfer> {
    settle_greedy(balances, MoneyCents::ZERO)
}

/// Total paid per participant, largest first.
pub fn contributions(expenses: &[ExpenseRecord]) -> Vec<(ParticipantId, MoneyCents)> {
    let mut paid = paid_by_participant(&[], expenses);
    paid.sort_by(|a, b| b.1.cmp(&a.1));
    paid
}

/// Diffs left over after every transfer in `transfers` has been paid.
///
/// A complete plan leaves every residual at zero (or within the tolerance it
/// was computed with).
pub fn apply_transfers(
    balances: &[Balance],
    transfers: &[Transfer],
) -> Vec<(ParticipantId, MoneyCents)> {
    let mut residual: Vec<(ParticipantId, MoneyCents)> = balances
        .iter()
        .map(|b| (b.participant.clone(), b.diff))
        .collect();
    let index: HashMap<ParticipantId, usize> = residual
        .iter()
        .enumerate()
        .map(|(i, (id, _))| (id.clone(), i))
        .collect();

    for transfer in transfers {
        if let Some(&i) = index.get(&transfer.from) {
            residual[i].1 = residual[i].1.saturating_add(transfer.amount);
        }
        if let Some(&i) = index.get(&transfer.to) {
            residual[i].1 = residual[i].1.saturating_sub(transfer.amount);
        }
    }
    residual
}

/// Group-by-sum of amounts per payer. Roster entries come first (deduplicated,
/// starting at zero), then payers in first-seen order. Sums saturate.
fn paid_by_participant(
    roster: &[ParticipantId],
    expenses: &[ExpenseRecord],
) -> Vec<(ParticipantId, MoneyCents)> {
    let mut index: HashMap<&ParticipantId, usize> = HashMap::new();
    let mut paid: Vec<(ParticipantId, MoneyCents)> = Vec::new();

    for participant in roster {
        if !index.contains_key(participant) {
            index.insert(participant, paid.len());
            paid.push((participant.clone(), MoneyCents::ZERO));
        }
    }

    for expense in expenses {
        match index.get(&expense.payer) {
            Some(&i) => paid[i].1 = paid[i].1.saturating_add(expense.amount),
            None => {
                index.insert(&expense.payer, paid.len());
                paid.push((expense.payer.clone(), expense.amount));
            }
        }
    }
    paid
}

fn split_equally(paid: Vec<(ParticipantId, MoneyCents)>) -> Vec<Balance> {
    if paid.is_empty() {
        return Vec::new();
    }

    // The total is exact in i128; the mean of i64 values always fits back.
    let total: i128 = paid.iter().map(|(_, amount)| i128::from(amount.cents())).sum();
    let count = paid.len() as i128;
    let base = total.div_euclid(count);
    let remainder = total.rem_euclid(count) as usize;

    paid.into_iter()
        .enumerate()
        .map(|(i, (participant, paid))| {
            let cents = base + i128::from(i < remainder);
            let share = MoneyCents::new(i64::try_from(cents).unwrap_or(i64::MAX));
            Balance {
                participant,
                paid,
                share,
                diff: paid.saturating_sub(share),
            }
        })
        .collect()
}

fn settle_greedy(balances: &[Balance], tolerance: MoneyCents) -> Vec<Transfer> {
    let tolerance = tolerance.max(MoneyCents::ZERO);

    let mut creditors: Vec<(&ParticipantId, MoneyCents)> = balances
        .iter()
        .filter(|b| b.is_creditor() && b.diff > tolerance)
        .map(|b| (&b.participant, b.diff))
        .collect();
    let mut debtors: Vec<(&ParticipantId, MoneyCents)> = balances
        .iter()
        .filter(|b| b.is_debtor() && b.diff < -tolerance)
        .map(|b| (&b.participant, MoneyCents::ZERO.saturating_sub(b.diff)))
        .collect();

    // Stable sorts: equal amounts keep their input order.
    creditors.sort_by(|a, b| b.1.cmp(&a.1));
    debtors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut transfers = Vec::with_capacity(creditors.len() + debtors.len());
    let (mut d, mut c) = (0, 0);
    while d < debtors.len() && c < creditors.len() {
        let amount = debtors[d].1.min(creditors[c].1);
        if amount.is_positive() && debtors[d].0 != creditors[c].0 {
            transfers.push(Transfer {
                from: debtors[d].0.clone(),
                to: creditors[c].0.clone(),
                amount,
            });
        }
        debtors[d].1 -= amount;
        creditors[c].1 -= amount;

        if debtors[d].1 <= tolerance {
            d += 1;
        }
        if creditors[c].1 <= tolerance {
            c += 1;
        }
    }
    transfers
}
