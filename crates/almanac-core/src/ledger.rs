//! Read-only, single-user view over transactions and budgets

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::{Budget, DateRange, Transaction};
use crate::Result;

/// Serialized shape of a ledger (JSON files, request bodies)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub user_id: i64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

/// One user's transactions keyed by id, plus their budgets
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    user_id: i64,
    transactions: BTreeMap<i64, Transaction>,
    budgets: Vec<Budget>,
}

impl Ledger {
    /// Build a ledger scoped to `user_id`.
    ///
    /// Records owned by other users are dropped. A repeated transaction id
    /// keeps the last record.
    pub fn new(
        user_id: i64,
        transactions: impl IntoIterator<Item = Transaction>,
        budgets: impl IntoIterator<Item = Budget>,
    ) -> Self {
        let mut foreign = 0usize;
        let mut map = BTreeMap::new();
        for tx in transactions {
            if tx.user_id != user_id {
                foreign += 1;
                continue;
            }
            if let Some(prev) = map.insert(tx.id, tx) {
                tracing::warn!(user_id, transaction_id = prev.id, "Duplicate transaction id, keeping last");
            }
        }

        let budgets: Vec<Budget> = budgets
            .into_iter()
            .filter(|b| {
                let own = b.user_id == user_id;
                if !own {
                    foreign += 1;
                }
                own
            })
            .collect();

        if foreign > 0 {
            tracing::warn!(user_id, dropped = foreign, "Dropped records owned by another user");
        }

        Self {
            user_id,
            transactions: map,
            budgets,
        }
    }

    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self::new(snapshot.user_id, snapshot.transactions, snapshot.budgets)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: LedgerSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Load a [`LedgerSnapshot`] JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            user_id: self.user_id,
            transactions: self.transactions.values().cloned().collect(),
            budgets: self.budgets.clone(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn transactions(&self) -> &BTreeMap<i64, Transaction> {
        &self.transactions
    }

    pub fn transaction(&self, id: i64) -> Option<&Transaction> {
        self.transactions.get(&id)
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Earliest transaction day; the start of usable history
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.transactions.values().map(|t| t.day()).min()
    }

    /// Transactions whose calendar day falls inside `range`, in id order
    pub fn window(&self, range: DateRange) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions
            .values()
            .filter(move |t| range.contains(t.day()))
    }

    /// SHA-256 over the ledger content, hex-encoded.
    ///
    /// Any transaction or budget mutation changes the fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.user_id.to_le_bytes());
        for tx in self.transactions.values() {
            hasher.update(b"t");
            hasher.update(tx.id.to_le_bytes());
            hasher.update(tx.amount.to_bits().to_le_bytes());
            hasher.update(tx.kind.as_str().as_bytes());
            hasher.update([0]);
            hasher.update(tx.category.as_bytes());
            hasher.update([0]);
            hasher.update(tx.description.as_bytes());
            hasher.update([0]);
            hasher.update(tx.date.and_utc().timestamp().to_le_bytes());
        }
        for budget in &self.budgets {
            hasher.update(b"b");
            hasher.update(budget.id.to_le_bytes());
            hasher.update(budget.amount.to_bits().to_le_bytes());
            hasher.update(budget.period.as_str().as_bytes());
            hasher.update([0]);
            hasher.update(budget.category.as_bytes());
            hasher.update([0]);
        }
        hex::encode(hasher.finalize())
    }
}
