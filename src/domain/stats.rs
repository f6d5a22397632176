use bigdecimal::{BigDecimal, Zero};

use super::money::cents;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductStats {
    pub count: i64,
    pub average_price: BigDecimal,
}

impl ProductStats {
    /// `average_price` is the raw SQL `AVG`, `None` over an empty set.
    pub fn new(count: i64, average_price: Option<BigDecimal>) -> Self {
        Self {
            count,
            average_price: cents(average_price.as_ref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleStats {
    pub count: i64,
    pub total_sum: BigDecimal,
    /// Mean over the sales that carry a total; zero when none do.
    pub average_total: BigDecimal,
}

impl SaleStats {
    /// Built from `COUNT(*)`, `SUM(total)` and `AVG(total)`. SQL aggregates
    /// skip null totals, so unpriced sales only add to `count`.
    pub fn new(
        count: i64,
        total_sum: Option<BigDecimal>,
        average_total: Option<BigDecimal>,
    ) -> Self {
        Self {
            count,
            total_sum: total_sum.unwrap_or_else(BigDecimal::zero),
            average_total: cents(average_total.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn empty_sales_report_zero_average() {
        let stats = SaleStats::new(0, None, None);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.total_sum, BigDecimal::zero());
        assert_eq!(stats.average_total, BigDecimal::zero());
    }

    #[test]
    fn sale_average_is_rounded_to_cents() {
        let stats = SaleStats::new(3, Some(dec("401")), Some(dec("133.6666666666666667")));
        assert_eq!(stats.total_sum, dec("401"));
        assert_eq!(stats.average_total, dec("133.67"));
    }

    #[test]
    fn unpriced_sales_count_but_do_not_skew_average() {
        let stats = SaleStats::new(2, Some(dec("100")), Some(dec("100.0000000000000000")));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average_total, dec("100"));
    }

    #[test]
    fn product_stats_average_price() {
        let stats = ProductStats::new(2, Some(dec("15.2500000000000000")));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average_price, dec("15.25"));
        assert_eq!(ProductStats::new(0, None).average_price, BigDecimal::zero());
    }
}
