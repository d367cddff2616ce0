//! Wire shapes exchanged with the backing store and the presentation layer.
//!
//! Rows mirror what the backend returns for one event; amounts on rows are
//! plain numbers in major units. Views produced from a settlement carry money
//! as integer minor units (`*_minor`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod event {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct EventRow {
        pub id: Uuid,
        pub title: String,
        pub event_datetime: Option<DateTime<Utc>>,
        pub location_text: Option<String>,
        #[serde(default)]
        pub adults_count: u32,
        #[serde(default)]
        pub minors_count: u32,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod expense {
    use super::*;

    /// Expense row as stored by the backend.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ExpenseRow {
        #[serde(default)]
        pub id: Option<Uuid>,
        #[serde(default)]
        pub event_id: Option<Uuid>,
        pub paid_by: String,
        /// Amount in major units (e.g. `12.5`).
        pub amount: f64,
        #[serde(default)]
        pub note: Option<String>,
        #[serde(default)]
        pub created_at: Option<DateTime<Utc>>,
    }
}

pub mod item {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ItemRow {
        pub id: Uuid,
        pub event_id: Uuid,
        pub name: String,
        pub category: String,
        pub qty: Option<f64>,
        pub unit: Option<String>,
        pub assigned_to: Option<String>,
        /// `pending`, `bought` or `delivered`.
        pub status: String,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod invite {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct InviteRow {
        pub id: Uuid,
        pub event_id: Uuid,
        pub code: String,
        pub expires_at: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod profile {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ProfileRow {
        pub id: String,
        pub display_name: Option<String>,
    }
}

pub mod settlement {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BalanceView {
        /// Raw participant id, so clients can apply their own labels.
        pub participant: String,
        pub label: String,
        pub paid_minor: i64,
        pub share_minor: i64,
        pub diff_minor: i64,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransferView {
        pub from: String,
        pub from_label: String,
        pub to: String,
        pub to_label: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SettlementView {
        pub total_minor: i64,
        pub balances: Vec<BalanceView>,
        pub transfers: Vec<TransferView>,
    }
}
