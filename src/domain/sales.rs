use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::errors::DomainError;
use super::money::WHOLE_AMOUNT;

#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UserInput {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
}

#[derive(Debug, Clone)]
pub struct Client {
    pub id: i32,
    pub rut: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClientInput {
    pub rut: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Sale {
    pub id: i32,
    pub seller_id: i32,
    pub client_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
}

/// A new sale. The seller is fixed here and never changes afterwards.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub seller_id: i32,
    pub lines: SaleLines,
}

/// The editable part of a sale. Every save of these fields recomputes the
/// total from the product's current price.
#[derive(Debug, Clone)]
pub struct SaleLines {
    pub client_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

/// Total for `quantity` units at `price`, quantized to whole units.
///
/// A product without a price leaves the total unset. The result must still
/// fit the `NUMERIC(10, 0)` column, otherwise the sale is rejected.
pub fn sale_total(
    price: Option<&BigDecimal>,
    quantity: i32,
) -> Result<Option<BigDecimal>, DomainError> {
    let Some(price) = price else {
        return Ok(None);
    };
    let raw = price * BigDecimal::from(quantity);
    WHOLE_AMOUNT.quantize("total", &raw).map(Some)
}

#[derive(Debug, Clone)]
pub struct SaleItem {
    pub id: i32,
    pub sale_id: i32,
    pub product_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl SaleItem {
    pub fn subtotal(&self) -> BigDecimal {
        BigDecimal::from(self.quantity) * &self.unit_price
    }
}

#[derive(Debug, Clone)]
pub struct SaleItemInput {
    pub sale_id: i32,
    pub product_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}
