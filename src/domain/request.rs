use super::money::{Amount, Balance};
use crate::error::PayoutError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a payout request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Approved,
    Processing,
    Completed,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PayoutMethod {
    Bank,
    Upi,
    Paypal,
    Crypto,
}

/// Urgency tier. Only used to order the review queue.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Colour family a status badge is rendered with.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Tone {
    Warning,
    Info,
    Accent,
    Success,
    Danger,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: Tone,
}

impl PayoutStatus {
    pub const ALL: [PayoutStatus; 5] = [
        PayoutStatus::Pending,
        PayoutStatus::Approved,
        PayoutStatus::Processing,
        PayoutStatus::Completed,
        PayoutStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Approved => "approved",
            PayoutStatus::Processing => "processing",
            PayoutStatus::Completed => "completed",
            PayoutStatus::Rejected => "rejected",
        }
    }

    pub fn badge(&self) -> StatusBadge {
        let (label, tone) = match self {
            PayoutStatus::Pending => ("Pending", Tone::Warning),
            PayoutStatus::Approved => ("Approved", Tone::Info),
            PayoutStatus::Processing => ("Processing", Tone::Accent),
            PayoutStatus::Completed => ("Completed", Tone::Success),
            PayoutStatus::Rejected => ("Rejected", Tone::Danger),
        };
        StatusBadge { label, tone }
    }

    /// Transition table for the review console.
    ///
    /// Only moves out of `Pending` exist; every other status is terminal here.
    pub fn can_transition_to(&self, target: PayoutStatus) -> bool {
        matches!(
            (self, target),
            (PayoutStatus::Pending, PayoutStatus::Approved)
                | (PayoutStatus::Pending, PayoutStatus::Rejected)
        )
    }
}

impl PayoutMethod {
    pub const ALL: [PayoutMethod; 4] = [
        PayoutMethod::Bank,
        PayoutMethod::Upi,
        PayoutMethod::Paypal,
        PayoutMethod::Crypto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutMethod::Bank => "bank",
            PayoutMethod::Upi => "upi",
            PayoutMethod::Paypal => "paypal",
            PayoutMethod::Crypto => "crypto",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PayoutMethod::Bank => "Bank Transfer",
            PayoutMethod::Upi => "UPI",
            PayoutMethod::Paypal => "PayPal",
            PayoutMethod::Crypto => "Crypto",
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Sort rank, most urgent first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

macro_rules! impl_str_enum {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = PayoutError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                Self::variants()
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| PayoutError::Validation(format!("Unknown {}: {s}", $what)))
            }
        }
    };
}

impl PayoutStatus {
    fn variants() -> &'static [Self] {
        &Self::ALL
    }
}

impl PayoutMethod {
    fn variants() -> &'static [Self] {
        &Self::ALL
    }
}

impl Priority {
    fn variants() -> &'static [Self] {
        &[Priority::High, Priority::Medium, Priority::Low]
    }
}

impl_str_enum!(PayoutStatus, "status");
impl_str_enum!(PayoutMethod, "payout method");
impl_str_enum!(Priority, "priority");

/// One affiliate's demand for payment of accrued earnings.
///
/// Descriptive fields are immutable once the request is in a store; only
/// `status` moves, and only through the store's transition operations.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PayoutRequest {
    pub id: String,
    pub affiliate_id: String,
    pub affiliate_name: String,
    pub affiliate_email: String,
    pub amount: Amount,
    pub request_date: NaiveDate,
    pub status: PayoutStatus,
    pub method: PayoutMethod,
    pub account_details: String,
    pub earnings: Balance,
    pub previous_payouts: Balance,
    pub join_date: NaiveDate,
    pub priority: Priority,
}

impl PayoutRequest {
    /// Checks the invariants a store relies on before accepting a request.
    pub fn validate(&self) -> Result<(), PayoutError> {
        if self.id.trim().is_empty() {
            return Err(PayoutError::Validation(
                "Payout request id must not be blank".to_string(),
            ));
        }
        if self.affiliate_id.trim().is_empty() {
            return Err(PayoutError::Validation(format!(
                "Payout request {} has no affiliate id",
                self.id
            )));
        }
        Ok(())
    }

    /// Case-insensitive substring match over name, email and id.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.affiliate_name.to_lowercase().contains(needle)
            || self.affiliate_email.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
    }
}
