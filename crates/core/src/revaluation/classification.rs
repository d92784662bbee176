//! Account classification for revaluation grouping.
//!
//! Classification is advisory: it only decides whether rows of an account are
//! split by partner. Unknown accounts are never segmented.

use std::collections::{BTreeMap, HashMap};

use fxreval_shared::types::AccountId;
use serde::{Deserialize, Serialize};

/// Account type tags relevant to revaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Trade receivable.
    AssetReceivable,
    /// Trade payable.
    LiabilityPayable,
    /// Bank and cash.
    AssetCash,
    /// Credit card liability.
    LiabilityCreditCard,
    /// Anything else.
    Other,
}

impl AccountType {
    /// Returns true if balances of this account type are tracked per partner.
    #[must_use]
    pub const fn segments_by_partner(self) -> bool {
        matches!(self, Self::AssetReceivable | Self::LiabilityPayable)
    }

    /// Returns true if accounts of this type are revalued unless configured otherwise.
    #[must_use]
    pub const fn revaluation_enabled_by_default(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Returns the ledger tag for this account type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AssetReceivable => "asset_receivable",
            Self::LiabilityPayable => "liability_payable",
            Self::AssetCash => "asset_cash",
            Self::LiabilityCreditCard => "liability_credit_card",
            Self::Other => "other",
        }
    }

    /// Parses a ledger tag. Unrecognised tags map to `Other`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "asset_receivable" => Self::AssetReceivable,
            "liability_payable" => Self::LiabilityPayable,
            "asset_cash" => Self::AssetCash,
            "liability_credit_card" => Self::LiabilityCreditCard,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup capability from account to account type.
pub trait AccountClassifier {
    /// Returns the account type, or `None` when the account is unknown.
    fn classify(&self, account_id: AccountId) -> Option<AccountType>;

    /// Returns true if rows of the account are split by partner.
    fn segments_by_partner(&self, account_id: AccountId) -> bool {
        self.classify(account_id)
            .is_some_and(AccountType::segments_by_partner)
    }
}

impl<S: std::hash::BuildHasher> AccountClassifier for HashMap<AccountId, AccountType, S> {
    fn classify(&self, account_id: AccountId) -> Option<AccountType> {
        self.get(&account_id).copied()
    }
}

impl AccountClassifier for BTreeMap<AccountId, AccountType> {
    fn classify(&self, account_id: AccountId) -> Option<AccountType> {
        self.get(&account_id).copied()
    }
}

/// Adapts a closure into an [`AccountClassifier`].
#[derive(Debug, Clone, Copy)]
pub struct ClassifyFn<F>(pub F);

impl<F> AccountClassifier for ClassifyFn<F>
where
    F: Fn(AccountId) -> Option<AccountType>,
{
    fn classify(&self, account_id: AccountId) -> Option<AccountType> {
        (self.0)(account_id)
    }
}
