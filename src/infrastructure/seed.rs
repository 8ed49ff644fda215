//! Reference dataset the console boots with when no request file is given.
//!
//! The processing date the figures assume is [`REFERENCE_DATE`].

use crate::domain::money::{Amount, Balance};
use crate::domain::request::{PayoutMethod, PayoutRequest, PayoutStatus, Priority};
use crate::error::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub const REFERENCE_DATE: NaiveDate = date(2024, 1, 15);

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid seed date"),
    }
}

struct Row {
    id: &'static str,
    affiliate: (&'static str, &'static str, &'static str),
    amount: i64,
    requested: NaiveDate,
    status: PayoutStatus,
    method: PayoutMethod,
    account: &'static str,
    earnings: i64,
    previous: i64,
    joined: NaiveDate,
    priority: Priority,
}

const ROWS: [Row; 12] = [
    Row {
        id: "PAY001",
        affiliate: ("AFF001", "Rahul Sharma", "rahul.sharma@example.com"),
        amount: 15000,
        requested: date(2024, 1, 15),
        status: PayoutStatus::Pending,
        method: PayoutMethod::Bank,
        account: "HDFC Bank ****4521",
        earnings: 125000,
        previous: 95000,
        joined: date(2023, 3, 12),
        priority: Priority::High,
    },
    Row {
        id: "PAY002",
        affiliate: ("AFF002", "Priya Patel", "priya.patel@example.com"),
        amount: 8500,
        requested: date(2024, 1, 14),
        status: PayoutStatus::Approved,
        method: PayoutMethod::Upi,
        account: "priya@okaxis",
        earnings: 68000,
        previous: 52000,
        joined: date(2023, 5, 2),
        priority: Priority::Medium,
    },
    Row {
        id: "PAY003",
        affiliate: ("AFF003", "Amit Kumar", "amit.kumar@example.com"),
        amount: 22000,
        requested: date(2024, 1, 13),
        status: PayoutStatus::Processing,
        method: PayoutMethod::Paypal,
        account: "amit.kumar@paypal.me",
        earnings: 180000,
        previous: 140000,
        joined: date(2022, 11, 20),
        priority: Priority::High,
    },
    Row {
        id: "PAY004",
        affiliate: ("AFF004", "Sneha Reddy", "sneha.reddy@example.com"),
        amount: 5000,
        requested: date(2024, 1, 12),
        status: PayoutStatus::Completed,
        method: PayoutMethod::Bank,
        account: "ICICI Bank ****7788",
        earnings: 42000,
        previous: 37000,
        joined: date(2023, 7, 18),
        priority: Priority::Low,
    },
    Row {
        id: "PAY005",
        affiliate: ("AFF005", "Vikram Singh", "vikram.singh@example.com"),
        amount: 12000,
        requested: date(2024, 1, 15),
        status: PayoutStatus::Pending,
        method: PayoutMethod::Crypto,
        account: "0x71C4...9A3F",
        earnings: 98000,
        previous: 74000,
        joined: date(2023, 1, 9),
        priority: Priority::Medium,
    },
    Row {
        id: "PAY006",
        affiliate: ("AFF006", "Anjali Gupta", "anjali.gupta@example.com"),
        amount: 3500,
        requested: date(2024, 1, 11),
        status: PayoutStatus::Rejected,
        method: PayoutMethod::Upi,
        account: "anjali@ybl",
        earnings: 15000,
        previous: 9000,
        joined: date(2023, 9, 30),
        priority: Priority::Low,
    },
    Row {
        id: "PAY007",
        affiliate: ("AFF007", "Rohit Verma", "rohit.verma@example.com"),
        amount: 18000,
        requested: date(2024, 1, 10),
        status: PayoutStatus::Completed,
        method: PayoutMethod::Bank,
        account: "SBI ****1203",
        earnings: 156000,
        previous: 120000,
        joined: date(2022, 8, 14),
        priority: Priority::Medium,
    },
    Row {
        id: "PAY008",
        affiliate: ("AFF008", "Kavya Nair", "kavya.nair@example.com"),
        amount: 20000,
        requested: date(2024, 1, 15),
        status: PayoutStatus::Pending,
        method: PayoutMethod::Paypal,
        account: "kavya.nair@paypal.me",
        earnings: 172000,
        previous: 130000,
        joined: date(2022, 12, 5),
        priority: Priority::High,
    },
    Row {
        id: "PAY009",
        affiliate: ("AFF009", "Arjun Mehta", "arjun.mehta@example.com"),
        amount: 9500,
        requested: date(2024, 1, 9),
        status: PayoutStatus::Processing,
        method: PayoutMethod::Upi,
        account: "arjun@paytm",
        earnings: 71000,
        previous: 56000,
        joined: date(2023, 4, 22),
        priority: Priority::Medium,
    },
    Row {
        id: "PAY010",
        affiliate: ("AFF010", "Deepika Joshi", "deepika.joshi@example.com"),
        amount: 6500,
        requested: date(2024, 1, 8),
        status: PayoutStatus::Completed,
        method: PayoutMethod::Bank,
        account: "Axis Bank ****6650",
        earnings: 48000,
        previous: 41500,
        joined: date(2023, 6, 11),
        priority: Priority::Low,
    },
    Row {
        id: "PAY011",
        affiliate: ("AFF002", "Priya Patel", "priya.patel@example.com"),
        amount: 14000,
        requested: date(2024, 1, 7),
        status: PayoutStatus::Approved,
        method: PayoutMethod::Crypto,
        account: "bc1q...x7kd",
        earnings: 68000,
        previous: 38000,
        joined: date(2023, 5, 2),
        priority: Priority::Medium,
    },
    Row {
        id: "PAY012",
        affiliate: ("AFF011", "Neha Kapoor", "neha.kapoor@example.com"),
        amount: 11000,
        requested: date(2024, 1, 14),
        status: PayoutStatus::Pending,
        method: PayoutMethod::Bank,
        account: "Kotak ****3390",
        earnings: 83000,
        previous: 61000,
        joined: date(2023, 2, 27),
        priority: Priority::Low,
    },
];

/// Builds the 12 reference payout requests in their canonical order.
pub fn reference_requests() -> Result<Vec<PayoutRequest>> {
    ROWS.iter()
        .map(|row| {
            let (affiliate_id, name, email) = row.affiliate;
            Ok(PayoutRequest {
                id: row.id.to_string(),
                affiliate_id: affiliate_id.to_string(),
                affiliate_name: name.to_string(),
                affiliate_email: email.to_string(),
                amount: Amount::new(Decimal::from(row.amount))?,
                request_date: row.requested,
                status: row.status,
                method: row.method,
                account_details: row.account.to_string(),
                earnings: Balance::new(Decimal::from(row.earnings)),
                previous_payouts: Balance::new(Decimal::from(row.previous)),
                join_date: row.joined,
                priority: row.priority,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_reference_ids_unique() {
        let requests = reference_requests().unwrap();
        let ids: HashSet<_> = requests.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(requests.len(), 12);
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn test_reference_pending_set() {
        let pending: Vec<_> = reference_requests()
            .unwrap()
            .into_iter()
            .filter(|r| r.status == PayoutStatus::Pending)
            .map(|r| r.id)
            .collect();
        assert_eq!(pending, ["PAY001", "PAY005", "PAY008", "PAY012"]);
    }
}
