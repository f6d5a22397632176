//! Listing filters built from raw query-string parameters.
//!
//! Parameter names follow the public API (`marca`, `precio_min`, ...) and each
//! one also accepts its English alias. A value that is missing, empty or does
//! not parse is treated as absent, so a bad parameter widens the result set
//! instead of failing the request.

use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{Days, NaiveDate, NaiveDateTime};

pub type Params = HashMap<String, String>;

fn raw<'a>(params: &'a Params, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| params.get(*name))
        .map(String::as_str)
        .find(|value| !value.is_empty())
}

fn parsed<T: FromStr>(params: &Params, names: &[&str]) -> Option<T> {
    raw(params, names).and_then(|value| value.trim().parse().ok())
}

fn search(params: &Params) -> Option<String> {
    raw(params, &["search", "buscar"]).map(str::to_string)
}

fn date(params: &Params, names: &[&str]) -> Option<NaiveDate> {
    raw(params, names).and_then(|value| NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok())
}

/// Search term for listings that only match on a name column (brands,
/// categories).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameFilter {
    pub search: Option<String>,
}

impl NameFilter {
    pub fn from_params(params: &Params) -> Self {
        Self {
            search: search(params),
        }
    }
}

/// `search` matches supplier name or email.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupplierFilter {
    pub search: Option<String>,
}

impl SupplierFilter {
    pub fn from_params(params: &Params) -> Self {
        Self {
            search: search(params),
        }
    }
}

/// `search` matches product name or description; the remaining fields are
/// exact id matches and an inclusive price range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub brand_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
    pub price_min: Option<BigDecimal>,
    pub price_max: Option<BigDecimal>,
}

impl ProductFilter {
    pub fn from_params(params: &Params) -> Self {
        Self {
            search: search(params),
            brand_id: parsed(params, &["marca", "brand"]),
            supplier_id: parsed(params, &["proveedor", "supplier"]),
            category_id: parsed(params, &["categoria", "category"]),
            price_min: parsed(params, &["precio_min", "price_min"]),
            price_max: parsed(params, &["precio_max", "price_max"]),
        }
    }
}

/// `search` matches username, first name or last name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub search: Option<String>,
}

impl UserFilter {
    pub fn from_params(params: &Params) -> Self {
        Self {
            search: search(params),
        }
    }
}

/// `search` matches client name, surname, RUT or email.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientFilter {
    pub search: Option<String>,
}

impl ClientFilter {
    pub fn from_params(params: &Params) -> Self {
        Self {
            search: search(params),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleFilter {
    /// Client name or seller username.
    pub search: Option<String>,
    pub seller_id: Option<i32>,
    pub client_id: Option<i32>,
    pub product_id: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SaleFilter {
    pub fn from_params(params: &Params) -> Self {
        Self {
            search: search(params),
            seller_id: parsed(params, &["vendedor", "seller"]),
            client_id: parsed(params, &["cliente", "client"]),
            product_id: parsed(params, &["producto", "product"]),
            date_from: date(params, &["fecha_desde", "date_from"]),
            date_to: date(params, &["fecha_hasta", "date_to"]),
        }
    }

    /// Inclusive lower bound on the local wall-clock time of `created_at`:
    /// midnight starting `date_from`.
    pub fn local_from(&self) -> Option<NaiveDateTime> {
        self.date_from.and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    /// Exclusive upper bound on the local wall-clock time of `created_at`:
    /// midnight starting the day after `date_to`, so all of `date_to` is
    /// included.
    pub fn local_before(&self) -> Option<NaiveDateTime> {
        self.date_to
            .and_then(|d| d.checked_add_days(Days::new(1)))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleItemFilter {
    pub sale_id: Option<i32>,
}

impl SaleItemFilter {
    pub fn from_params(params: &Params) -> Self {
        Self {
            sale_id: parsed(params, &["venta", "sale"]),
        }
    }
}

/// `ILIKE` pattern matching `term` anywhere, with LIKE wildcards in the term
/// escaped so they match literally.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_params_impose_no_constraint() {
        assert_eq!(ProductFilter::from_params(&Params::new()), ProductFilter::default());
        assert_eq!(SaleFilter::from_params(&Params::new()), SaleFilter::default());
    }

    #[test]
    fn product_filter_reads_price_range() {
        let filter = ProductFilter::from_params(&params(&[
            ("precio_min", "100"),
            ("precio_max", "200"),
        ]));
        assert_eq!(filter.price_min, Some(BigDecimal::from(100)));
        assert_eq!(filter.price_max, Some(BigDecimal::from(200)));
    }

    #[test]
    fn malformed_values_are_ignored() {
        let filter = ProductFilter::from_params(&params(&[
            ("marca", "abc"),
            ("precio_min", "cheap"),
            ("categoria", "3"),
        ]));
        assert_eq!(filter.brand_id, None);
        assert_eq!(filter.price_min, None);
        assert_eq!(filter.category_id, Some(3));
    }

    #[test]
    fn english_aliases_are_accepted() {
        let filter = SaleFilter::from_params(&params(&[("seller", "4"), ("client", "9")]));
        assert_eq!(filter.seller_id, Some(4));
        assert_eq!(filter.client_id, Some(9));
    }

    #[test]
    fn empty_search_is_absent() {
        let filter = ClientFilter::from_params(&params(&[("search", "")]));
        assert_eq!(filter.search, None);
    }

    #[test]
    fn legacy_search_name_is_accepted() {
        let filter = NameFilter::from_params(&params(&[("buscar", "logi")]));
        assert_eq!(filter.search.as_deref(), Some("logi"));
    }

    #[test]
    fn sale_date_range_covers_whole_days() {
        let filter = SaleFilter::from_params(&params(&[
            ("fecha_desde", "2024-03-01"),
            ("fecha_hasta", "2024-03-31"),
        ]));
        assert_eq!(filter.local_from().unwrap().to_string(), "2024-03-01 00:00:00");
        assert_eq!(filter.local_before().unwrap().to_string(), "2024-04-01 00:00:00");
    }

    #[test]
    fn malformed_dates_are_ignored() {
        let filter = SaleFilter::from_params(&params(&[("fecha_desde", "01/03/2024")]));
        assert_eq!(filter.date_from, None);
        assert_eq!(filter.local_from(), None);
    }

    #[test]
    fn sale_item_filter_reads_sale_id() {
        let filter = SaleItemFilter::from_params(&params(&[("venta", "12")]));
        assert_eq!(filter.sale_id, Some(12));
    }

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ram"), "%ram%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
