//! Transfer service
//!
//! A transfer writes two transaction rows at once: a negative outgoing leg
//! on the source account and a positive incoming leg on the destination,
//! each pointing at the other account through `to_account_id`. The backend
//! offers no transaction spanning both inserts. When exactly one leg lands,
//! the service deletes it again and reports a [`FintrackError::PartialTransfer`].

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::backend::{Backend, Collection};
use crate::error::{FintrackError, FintrackResult};
use crate::models::{Account, Money, NewTransaction, Transaction, TransactionType, UserId};
use crate::storage::{ResourceKey, Storage};
use crate::validation::{Form, TransferForm, ValidationErrors};

use super::{parse_amount, parse_date_or, AccountService};

/// One side of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferLeg {
    Outgoing,
    Incoming,
}

impl fmt::Display for TransferLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outgoing => write!(f, "outgoing"),
            Self::Incoming => write!(f, "incoming"),
        }
    }
}

/// Both stored legs of a completed transfer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferResult {
    pub outgoing: Transaction,
    pub incoming: Transaction,
}

impl TransferResult {
    /// Amount moved, as a positive value
    pub fn amount(&self) -> Money {
        self.incoming.amount
    }
}

/// Service for transfers between accounts
pub struct TransferService<'a, B: Backend> {
    storage: &'a Storage<B>,
}

impl<'a, B: Backend> TransferService<'a, B> {
    /// Create a new transfer service
    pub fn new(storage: &'a Storage<B>) -> Self {
        Self { storage }
    }

    /// Move money between two active accounts
    pub async fn transfer(&self, form: &TransferForm, today: NaiveDate) -> FintrackResult<TransferResult> {
        form.validate()?;
        let user_id = self.storage.require_user()?;

        let accounts = AccountService::new(self.storage);
        let from = accounts.resolve(&form.from_account).await?;
        let to = accounts.resolve(&form.to_account).await?;
        if from.id == to.id {
            return Err(ValidationErrors::single(
                "to_account",
                "Source and destination accounts must be different",
            )
            .into());
        }

        let amount = parse_amount("amount", &form.amount)?.abs();
        let date = parse_date_or("date", form.date.as_deref(), today)?;
        let description = form.description.trim();
        let (outgoing, incoming) = legs(user_id, &from, &to, amount, date, description);

        for leg in [&outgoing, &incoming] {
            leg.validate()
                .map_err(|e| ValidationErrors::single("amount", e.to_string()))?;
        }

        let (out_result, in_result) = tokio::join!(
            self.storage
                .insert_one::<_, Transaction>(Collection::Transactions, &outgoing),
            self.storage
                .insert_one::<_, Transaction>(Collection::Transactions, &incoming),
        );

        let result = match (out_result, in_result) {
            (Ok(outgoing), Ok(incoming)) => {
                info!(
                    from = %from.name,
                    to = %to.name,
                    %amount,
                    "transfer recorded"
                );
                Ok(TransferResult { outgoing, incoming })
            }
            (Ok(committed), Err(cause)) => {
                Err(self.compensate(TransferLeg::Outgoing, &committed, cause).await)
            }
            (Err(cause), Ok(committed)) => {
                Err(self.compensate(TransferLeg::Incoming, &committed, cause).await)
            }
            (Err(cause), Err(_)) => Err(cause),
        };

        self.storage.invalidate(&ResourceKey::TRANSACTION_WRITES);
        self.storage.invalidate(&[ResourceKey::Accounts]);
        result
    }

    /// Delete the leg that landed and build the error describing what happened
    async fn compensate(
        &self,
        committed: TransferLeg,
        row: &Transaction,
        cause: FintrackError,
    ) -> FintrackError {
        warn!(leg = %committed, id = %row.id, %cause, "transfer leg failed, rolling back");
        let rolled_back = match self
            .storage
            .delete_by_id(Collection::Transactions, row.id.as_uuid())
            .await
        {
            Ok(deleted) => deleted,
            Err(err) => {
                error!(id = %row.id, %err, "could not roll back transfer leg");
                false
            }
        };
        FintrackError::PartialTransfer {
            committed,
            rolled_back,
            cause: cause.to_string(),
        }
    }
}

fn legs(
    user_id: UserId,
    from: &Account,
    to: &Account,
    amount: Money,
    date: NaiveDate,
    description: &str,
) -> (NewTransaction, NewTransaction) {
    let outgoing = NewTransaction {
        user_id,
        account_id: from.id,
        to_account_id: Some(to.id),
        category_id: None,
        amount: -amount,
        transaction_type: TransactionType::Transfer,
        transaction_date: date,
        description: Some(format!("Transfer to {}: {}", to.name, description)),
        notes: None,
    };
    let incoming = NewTransaction {
        account_id: to.id,
        to_account_id: Some(from.id),
        amount,
        description: Some(format!("Transfer from {}: {}", from.name, description)),
        ..outgoing.clone()
    };
    (outgoing, incoming)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::services::test_support::storage;
    use crate::services::TransactionService;
    use crate::validation::AccountForm;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    async fn accounts(storage: &Storage<MemoryBackend>) -> (Account, Account) {
        let service = AccountService::new(storage);
        let checking = service
            .create(&AccountForm {
                name: "Checking".into(),
                ..AccountForm::default()
            })
            .await
            .unwrap();
        let savings = service
            .create(&AccountForm {
                name: "Savings".into(),
                ..AccountForm::default()
            })
            .await
            .unwrap();
        (checking, savings)
    }

    fn form(amount: &str) -> TransferForm {
        TransferForm {
            description: "Rainy day".into(),
            amount: amount.into(),
            from_account: "Checking".into(),
            to_account: "Savings".into(),
            date: None,
        }
    }

    #[tokio::test]
    async fn test_transfer_creates_two_linked_legs() {
        let storage = storage();
        let (checking, savings) = accounts(&storage).await;

        let result = TransferService::new(&storage)
            .transfer(&form("250"), today())
            .await
            .unwrap();

        assert_eq!(result.outgoing.amount.cents(), -25000);
        assert_eq!(result.incoming.amount.cents(), 25000);
        assert_eq!(result.outgoing.amount + result.incoming.amount, Money::zero());
        assert_eq!(result.amount().cents(), 25000);

        assert_eq!(result.outgoing.account_id, checking.id);
        assert_eq!(result.outgoing.to_account_id, Some(savings.id));
        assert_eq!(result.incoming.account_id, savings.id);
        assert_eq!(result.incoming.to_account_id, Some(checking.id));
        assert!(result.outgoing.is_transfer() && result.incoming.is_transfer());

        assert_eq!(result.outgoing.description(), "Transfer to Savings: Rainy day");
        assert_eq!(result.incoming.description(), "Transfer from Checking: Rainy day");
        assert_eq!(result.outgoing.transaction_date, today());
    }

    #[tokio::test]
    async fn test_same_account_rejected_before_any_write() {
        let storage = storage();
        accounts(&storage).await;

        let mut same = form("10");
        same.to_account = "checking".into();
        let err = TransferService::new(&storage)
            .transfer(&same, today())
            .await
            .unwrap_err();
        match err {
            FintrackError::Validation(errors) => assert_eq!(
                errors.get("to_account"),
                Some("Source and destination accounts must be different")
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(storage.backend().row_count(Collection::Transactions), 0);
    }

    #[tokio::test]
    async fn test_same_account_by_id_rejected() {
        let storage = storage();
        let (checking, _) = accounts(&storage).await;

        let mut same = form("10");
        same.to_account = checking.id.as_uuid().to_string();
        let err = TransferService::new(&storage)
            .transfer(&same, today())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_partial_failure_rolls_back_committed_leg() {
        let storage = storage();
        let (_, savings) = accounts(&storage).await;
        storage.backend().fail_insert_when(
            Collection::Transactions,
            "account_id",
            savings.id.as_uuid().to_string(),
            "insert rejected",
        );

        let err = TransferService::new(&storage)
            .transfer(&form("100"), today())
            .await
            .unwrap_err();
        match err {
            FintrackError::PartialTransfer {
                committed,
                rolled_back,
                cause,
            } => {
                assert_eq!(committed, TransferLeg::Outgoing);
                assert!(rolled_back);
                assert!(cause.contains("insert rejected"));
            }
            other => panic!("expected partial transfer, got {other:?}"),
        }
        assert_eq!(storage.backend().row_count(Collection::Transactions), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_when_rollback_fails() {
        let storage = storage();
        let (checking, _) = accounts(&storage).await;
        storage.backend().fail_insert_when(
            Collection::Transactions,
            "account_id",
            checking.id.as_uuid().to_string(),
            "insert rejected",
        );
        storage
            .backend()
            .fail_delete(Collection::Transactions, "delete rejected");

        let err = TransferService::new(&storage)
            .transfer(&form("100"), today())
            .await
            .unwrap_err();
        match err {
            FintrackError::PartialTransfer {
                committed,
                rolled_back,
                ..
            } => {
                assert_eq!(committed, TransferLeg::Incoming);
                assert!(!rolled_back);
            }
            other => panic!("expected partial transfer, got {other:?}"),
        }
        assert_eq!(storage.backend().row_count(Collection::Transactions), 1);
    }

    #[tokio::test]
    async fn test_transfer_invalidates_transaction_reads() {
        let storage = storage();
        accounts(&storage).await;
        let transactions = TransactionService::new(&storage);
        assert!(transactions.all().await.unwrap().is_empty());

        TransferService::new(&storage)
            .transfer(&form("10"), today())
            .await
            .unwrap();
        assert_eq!(transactions.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_transfer_requires_user() {
        let storage = crate::services::test_support::anonymous_storage();
        let err = TransferService::new(&storage)
            .transfer(&form("10"), today())
            .await
            .unwrap_err();
        assert!(err.is_auth());
    }

    #[test]
    fn test_leg_display() {
        assert_eq!(TransferLeg::Outgoing.to_string(), "outgoing");
        assert_eq!(TransferLeg::Incoming.to_string(), "incoming");
    }
}
