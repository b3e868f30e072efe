use super::amount::{Balance, NativeAmount};
use super::profile::{Address, Profile};
use thiserror::Error;

/// Locally detected reasons a payment never reaches the wallet.
///
/// The display strings are shown to the user verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayRejection {
    #[error("Invalid Profile selected.")]
    NoProfileSelected,
    #[error("Invalid Amount.")]
    InvalidAmount,
    #[error("Insufficient Balance.")]
    InsufficientBalance,
}

/// A validated transfer, alive only for the duration of one pay action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub recipient: Address,
    pub amount: NativeAmount,
}

impl PaymentRequest {
    /// Runs the pay preconditions in order: selection, amount, balance.
    ///
    /// An unknown balance (still loading) does not block the payment.
    pub fn validate(
        selected: Option<&Profile>,
        amount_text: &str,
        balance: Option<&Balance>,
        decimals: u32,
    ) -> Result<Self, PayRejection> {
        let profile = selected.ok_or(PayRejection::NoProfileSelected)?;

        let amount = NativeAmount::parse_units(amount_text, decimals)
            .filter(|amount| !amount.is_zero())
            .ok_or(PayRejection::InvalidAmount)?;

        if let Some(balance) = balance
            && !balance.covers(amount)
        {
            return Err(PayRejection::InsufficientBalance);
        }

        Ok(Self {
            recipient: profile.owned_by.clone(),
            amount,
        })
    }
}
