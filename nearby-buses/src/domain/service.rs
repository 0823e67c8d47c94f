//! Bus services and their arrivals at a stop.

use std::fmt;

use super::arrival::ArrivalEstimate;

/// A bus service number such as `"12"`, `"2A"` or `"NR5"`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ServiceNo(String);

impl ServiceNo {
    pub fn new(no: impl Into<String>) -> Self {
        Self(no.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric sort key: the integer formed by the digits of the number.
    ///
    /// `"NR5"` → 5, `"2A"` → 2. Returns `None` when there are no digits (or
    /// too many to fit a `u64`).
    ///
    /// ```
    /// use nearby_buses::domain::ServiceNo;
    ///
    /// assert_eq!(ServiceNo::new("NR5").sort_key(), Some(5));
    /// assert_eq!(ServiceNo::new("12e").sort_key(), Some(12));
    /// assert_eq!(ServiceNo::new("CT").sort_key(), None);
    /// ```
    pub fn sort_key(&self) -> Option<u64> {
        let digits: String = self.0.chars().filter(char::is_ascii_digit).collect();
        digits.parse().ok()
    }
}

impl fmt::Debug for ServiceNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceNo({})", self.0)
    }
}

impl fmt::Display for ServiceNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upcoming arrivals of one service at the selected stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceArrivals {
    pub service_no: ServiceNo,
    pub operator: Option<String>,
    /// Up to three estimates, ordered by rank.
    pub estimates: Vec<ArrivalEstimate>,
}

impl ServiceArrivals {
    /// Whether the feed had no timing at all for this service.
    pub fn has_no_timing(&self) -> bool {
        self.estimates.is_empty()
    }
}

/// Sort services for display.
///
/// Ascending by [`ServiceNo::sort_key`]; services without digits go last.
/// The sort is stable, so equal keys keep feed order.
pub fn sort_services(services: &mut [ServiceArrivals]) {
    services.sort_by_key(|s| match s.service_no.sort_key() {
        Some(key) => (0, key),
        None => (1, 0),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(no: &str) -> ServiceArrivals {
        ServiceArrivals {
            service_no: ServiceNo::new(no),
            operator: None,
            estimates: Vec::new(),
        }
    }

    fn order(services: &[ServiceArrivals]) -> Vec<&str> {
        services.iter().map(|s| s.service_no.as_str()).collect()
    }

    #[test]
    fn sorts_by_numeric_part() {
        let mut services = vec![service("NR5"), service("12"), service("2A"), service("88")];
        sort_services(&mut services);
        assert_eq!(order(&services), ["2A", "NR5", "12", "88"]);
    }

    #[test]
    fn non_numeric_services_go_last_in_feed_order() {
        let mut services = vec![service("CT"), service("7"), service("BPS"), service("3")];
        sort_services(&mut services);
        assert_eq!(order(&services), ["3", "7", "CT", "BPS"]);
    }

    #[test]
    fn equal_keys_keep_feed_order() {
        let mut services = vec![service("10e"), service("10"), service("NR10")];
        sort_services(&mut services);
        assert_eq!(order(&services), ["10e", "10", "NR10"]);
    }

    #[test]
    fn oversized_digit_run_is_non_numeric() {
        assert_eq!(ServiceNo::new("99999999999999999999999").sort_key(), None);
    }
}
