//! Expense splitting and settlement for group events.
//!
//! The core is [`SettlementEngine`]: a pure pipeline that turns an event's
//! expense records into per-participant [`Balance`]s and a plan of
//! [`Transfer`]s that settles every debt. Money is integer cents
//! ([`MoneyCents`]) throughout, so the zero-sum and completeness properties
//! hold exactly.
//!
//! ```rust
//! use engine::{ExpenseRecord, MoneyCents, compute_balances, compute_transfers};
//!
//! let expenses = [
//!     ExpenseRecord::new("a", MoneyCents::new(300_00)),
//!     ExpenseRecord::new("b", MoneyCents::new(100_00)),
//!     ExpenseRecord::new("c", MoneyCents::new(100_00)),
//! ];
//! let balances = compute_balances(&expenses);
//! let transfers = compute_transfers(&balances);
//! assert_eq!(transfers.len(), 2);
//! assert!(transfers.iter().all(|t| t.to.as_str() == "a"));
//! ```
//!
//! The remaining modules hold the small pieces of domain logic around it:
//! the shopping checklist, purchase recommendations, invite codes,
//! participant labels and the seams towards the external record store.

pub use error::EngineError;
pub use expense::{ExpenseRecord, MAX_EXPENSE, ParticipantId};
pub use invites::{DEFAULT_INVITE_MINUTES, Invite, InviteCode, NewEvent};
pub use items::{Category, Item, ItemStatus, NewItem, group_by_category};
pub use money::{MoneyCents, round_to_cents};
pub use profiles::{ProfileDirectory, fallback_label, normalize_display_name};
pub use recommendations::{RecUnit, Recommendation, build_recommendations, format_amount};
pub use settlement::{
    Balance, SettlementEngine, SettlementEngineBuilder, SettlementOptions, SettlementPlan,
    SplitPolicy, Transfer, apply_transfers, compute_balances, compute_transfers, contributions,
};
pub use store::{Change, ChangeFeed, ExpenseSource, MemoryStore, SubscriptionId};

mod error;
mod expense;
mod invites;
mod items;
mod money;
mod profiles;
pub mod recommendations;
mod settlement;
pub mod store;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
