//! Search, filter and sort pipeline that turns the store into the ordered view.

use super::pagination::PaginationState;
use super::request::{PayoutMethod, PayoutRequest, PayoutStatus};
use super::stats::PayoutStats;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// A filter that either keeps everything or a single exact value.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq> Filter<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str("all"),
            Filter::Only(value) => value.fmt(f),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recent request first.
    #[default]
    Date,
    /// Largest amount first.
    Amount,
    /// High, then medium, then low.
    Priority,
}

impl FromStr for SortKey {
    type Err = crate::error::PayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "priority" => Ok(SortKey::Priority),
            other => Err(crate::error::PayoutError::Validation(format!(
                "Unknown sort key: {other}"
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct QueryCriteria {
    pub search_query: String,
    pub status_filter: Filter<PayoutStatus>,
    pub method_filter: Filter<PayoutMethod>,
    pub sort_key: SortKey,
}

/// Partial criteria change; `None` fields keep their current value.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct CriteriaUpdate {
    pub search_query: Option<String>,
    pub status_filter: Option<Filter<PayoutStatus>>,
    pub method_filter: Option<Filter<PayoutMethod>>,
    pub sort_key: Option<SortKey>,
}

impl CriteriaUpdate {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search_query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn status(filter: Filter<PayoutStatus>) -> Self {
        Self {
            status_filter: Some(filter),
            ..Self::default()
        }
    }

    pub fn method(filter: Filter<PayoutMethod>) -> Self {
        Self {
            method_filter: Some(filter),
            ..Self::default()
        }
    }

    pub fn sort(key: SortKey) -> Self {
        Self {
            sort_key: Some(key),
            ..Self::default()
        }
    }
}

impl QueryCriteria {
    /// Applies `update` and reports whether any field actually changed.
    pub fn apply(&mut self, update: CriteriaUpdate) -> bool {
        let before = self.clone();
        if let Some(query) = update.search_query {
            self.search_query = query;
        }
        if let Some(filter) = update.status_filter {
            self.status_filter = filter;
        }
        if let Some(filter) = update.method_filter {
            self.method_filter = filter;
        }
        if let Some(key) = update.sort_key {
            self.sort_key = key;
        }
        *self != before
    }

    pub fn admits(&self, request: &PayoutRequest) -> bool {
        request.matches_search(&self.search_query.to_lowercase())
            && self.status_filter.admits(&request.status)
            && self.method_filter.admits(&request.method)
    }
}

/// Runs search, status filter, method filter, then a stable sort.
///
/// Ties keep the order of `requests`.
pub fn ordered_view(requests: &[PayoutRequest], criteria: &QueryCriteria) -> Vec<PayoutRequest> {
    let needle = criteria.search_query.to_lowercase();
    let mut view: Vec<PayoutRequest> = requests
        .iter()
        .filter(|r| r.matches_search(&needle))
        .filter(|r| criteria.status_filter.admits(&r.status))
        .filter(|r| criteria.method_filter.admits(&r.method))
        .cloned()
        .collect();
    sort_requests(&mut view, criteria.sort_key);
    view
}

pub fn sort_requests(requests: &mut [PayoutRequest], key: SortKey) {
    // slice::sort_by_key is stable
    match key {
        SortKey::Date => requests.sort_by_key(|r| Reverse(r.request_date)),
        SortKey::Amount => requests.sort_by_key(|r| Reverse(r.amount)),
        SortKey::Priority => requests.sort_by_key(|r| r.priority.rank()),
    }
}

/// What the queue renders for one criteria/pagination pair.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct RequestPage {
    pub visible: Vec<PayoutRequest>,
    pub stats: PayoutStats,
    pub has_more: bool,
}

pub fn get_requests(
    requests: &[PayoutRequest],
    criteria: &QueryCriteria,
    pagination: &PaginationState,
    today: NaiveDate,
) -> crate::error::Result<RequestPage> {
    let view = ordered_view(requests, criteria);
    Ok(RequestPage {
        visible: pagination.visible_slice(&view).to_vec(),
        stats: PayoutStats::compute(requests, today)?,
        has_more: pagination.has_more(&view),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::seed::{REFERENCE_DATE, reference_requests};

    fn ids(view: &[PayoutRequest]) -> Vec<&str> {
        view.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_pending_filter() {
        let requests = reference_requests().unwrap();
        let criteria = QueryCriteria {
            status_filter: Filter::Only(PayoutStatus::Pending),
            sort_key: SortKey::Priority,
            ..Default::default()
        };
        let view = ordered_view(&requests, &criteria);
        // priority sort keeps store order inside a tier
        assert_eq!(ids(&view), ["PAY001", "PAY008", "PAY005", "PAY012"]);
    }

    #[test]
    fn test_amount_sort_descending() {
        let requests = reference_requests().unwrap();
        let criteria = QueryCriteria {
            sort_key: SortKey::Amount,
            ..Default::default()
        };
        let view = ordered_view(&requests, &criteria);
        assert_eq!(ids(&view)[..3], ["PAY003", "PAY008", "PAY007"]);
        assert!(view.windows(2).all(|w| w[0].amount >= w[1].amount));
    }

    #[test]
    fn test_date_sort_is_stable() {
        let requests = reference_requests().unwrap();
        let view = ordered_view(&requests, &QueryCriteria::default());
        // three requests share the latest date and keep their store order
        assert_eq!(ids(&view)[..3], ["PAY001", "PAY005", "PAY008"]);

        let mut resorted = view.clone();
        sort_requests(&mut resorted, SortKey::Date);
        assert_eq!(resorted, view);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let requests = reference_requests().unwrap();
        let criteria = QueryCriteria {
            search_query: "PRIYA".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&ordered_view(&requests, &criteria)), ["PAY002", "PAY011"]);

        // only the empty query matches everything; whitespace is matched literally
        let blank = QueryCriteria {
            search_query: "   ".to_string(),
            ..Default::default()
        };
        assert!(ordered_view(&requests, &blank).is_empty());
        let padded = QueryCriteria {
            search_query: " priya ".to_string(),
            ..Default::default()
        };
        assert!(ordered_view(&requests, &padded).is_empty());

        let by_id = QueryCriteria {
            search_query: "pay01".to_string(),
            ..Default::default()
        };
        // PAY012 (01-14), PAY010 (01-08), PAY011 (01-07)
        assert_eq!(
            ids(&ordered_view(&requests, &by_id)),
            ["PAY012", "PAY010", "PAY011"]
        );
    }

    #[test]
    fn test_combined_filters() {
        let requests = reference_requests().unwrap();
        let criteria = QueryCriteria {
            search_query: String::new(),
            status_filter: Filter::Only(PayoutStatus::Completed),
            method_filter: Filter::Only(PayoutMethod::Bank),
            sort_key: SortKey::Amount,
        };
        assert_eq!(
            ids(&ordered_view(&requests, &criteria)),
            ["PAY007", "PAY010", "PAY004"]
        );
    }

    #[test]
    fn test_apply_reports_changes() {
        let mut criteria = QueryCriteria::default();
        assert!(!criteria.apply(CriteriaUpdate::sort(SortKey::Date)));
        assert!(criteria.apply(CriteriaUpdate::sort(SortKey::Amount)));
        assert!(criteria.apply(CriteriaUpdate::method(Filter::Only(PayoutMethod::Upi))));
        assert_eq!(criteria.sort_key, SortKey::Amount);
        assert_eq!(criteria.method_filter, Filter::Only(PayoutMethod::Upi));
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("all".parse::<Filter<PayoutStatus>>().unwrap(), Filter::All);
        assert_eq!(
            "rejected".parse::<Filter<PayoutStatus>>().unwrap(),
            Filter::Only(PayoutStatus::Rejected)
        );
        assert!("amount".parse::<SortKey>().is_ok());
        assert!("name".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_get_requests_first_page() {
        let requests = reference_requests().unwrap();
        let page = get_requests(
            &requests,
            &QueryCriteria::default(),
            &PaginationState::default(),
            REFERENCE_DATE,
        )
        .unwrap();
        assert_eq!(page.visible.len(), 5);
        assert!(page.has_more);
        assert_eq!(page.stats.pending_count, 4);
    }
}
