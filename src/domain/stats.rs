use super::money::Balance;
use super::request::{PayoutRequest, PayoutStatus};
use crate::error::{PayoutError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

/// Summary figures shown above the payout queue.
///
/// Always computed over the full, unfiltered store.
#[derive(Debug, Serialize, PartialEq, Clone, Default)]
pub struct PayoutStats {
    pub total_pending: Balance,
    pub total_processing: Balance,
    pub total_completed: Balance,
    pub pending_count: usize,
    pub today_requests_count: usize,
    /// Mean request amount rounded to whole units; zero for an empty store.
    pub avg_payout: Balance,
    pub total_affiliates: usize,
}

impl PayoutStats {
    /// Fails with `Overflow` when a running total no longer fits a `Decimal`.
    pub fn compute(requests: &[PayoutRequest], today: NaiveDate) -> Result<Self> {
        let mut stats = Self::default();
        let mut total = Balance::ZERO;
        let mut affiliates = HashSet::new();

        for request in requests {
            let amount = Balance::from(request.amount);
            total = add(total, amount)?;
            affiliates.insert(request.affiliate_id.as_str());

            match request.status {
                PayoutStatus::Pending => {
                    stats.total_pending = add(stats.total_pending, amount)?;
                    stats.pending_count += 1;
                }
                PayoutStatus::Processing => {
                    stats.total_processing = add(stats.total_processing, amount)?;
                }
                PayoutStatus::Completed => {
                    stats.total_completed = add(stats.total_completed, amount)?;
                }
                PayoutStatus::Approved | PayoutStatus::Rejected => {}
            }

            if request.request_date == today {
                stats.today_requests_count += 1;
            }
        }

        if !requests.is_empty() {
            stats.avg_payout = Balance::new(total.0 / Decimal::from(requests.len())).round_whole();
        }
        stats.total_affiliates = affiliates.len();
        Ok(stats)
    }
}

fn add(total: Balance, amount: Balance) -> Result<Balance> {
    total.checked_add(amount).ok_or(PayoutError::Overflow)
}
