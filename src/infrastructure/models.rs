use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::catalog::{
    Brand, BrandInput, Category, CategoryInput, Product, ProductInput, Supplier, SupplierInput,
};
use crate::domain::sales::{Client, ClientInput, Sale, SaleItem, SaleItemInput, User, UserInput};
use crate::schema::{brands, categories, clients, products, sale_items, sales, suppliers, users};

// ── Catalog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = brands)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BrandRow {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = brands)]
pub struct BrandChanges {
    pub name: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = suppliers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SupplierRow {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = suppliers)]
pub struct SupplierChanges {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = categories)]
#[diesel(treat_none_as_null = true)]
pub struct CategoryChanges {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i32,
    pub brand_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
}

/// Replacing a product writes every column, so clearing a foreign key in the
/// request clears it in the row.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub struct ProductChanges {
    pub brand_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
}

// ── Sales ledger ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChanges {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClientRow {
    pub id: i32,
    pub rut: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = clients)]
#[diesel(treat_none_as_null = true)]
pub struct ClientChanges {
    pub rut: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sales)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SaleRow {
    pub id: i32,
    pub seller_id: i32,
    pub client_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sales)]
pub struct NewSaleRow {
    pub seller_id: i32,
    pub client_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total: Option<BigDecimal>,
}

/// Columns an edit may touch. `seller_id` and `created_at` never change.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = sales)]
#[diesel(treat_none_as_null = true)]
pub struct SaleChanges {
    pub client_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total: Option<BigDecimal>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sale_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SaleItemRow {
    pub id: i32,
    pub sale_id: i32,
    pub product_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = sale_items)]
#[diesel(treat_none_as_null = true)]
pub struct SaleItemChanges {
    pub sale_id: i32,
    pub product_id: Option<i32>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

// ── Row <-> domain conversions ───────────────────────────────────────────────

impl From<BrandRow> for Brand {
    fn from(row: BrandRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<BrandInput> for BrandChanges {
    fn from(input: BrandInput) -> Self {
        Self { name: input.name }
    }
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
        }
    }
}

impl From<SupplierInput> for SupplierChanges {
    fn from(input: SupplierInput) -> Self {
        Self {
            name: input.name,
            phone: input.phone,
            email: input.email,
        }
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

impl From<CategoryInput> for CategoryChanges {
    fn from(input: CategoryInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
        }
    }
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
            brand_id: row.brand_id,
            supplier_id: row.supplier_id,
            category_id: row.category_id,
        }
    }
}

impl From<ProductInput> for ProductChanges {
    fn from(input: ProductInput) -> Self {
        Self {
            brand_id: input.brand_id,
            supplier_id: input.supplier_id,
            category_id: input.category_id,
            name: input.name,
            price: input.price,
            description: input.description,
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            is_active: row.is_active,
            is_staff: row.is_staff,
            date_joined: row.date_joined,
        }
    }
}

impl From<UserInput> for UserChanges {
    fn from(input: UserInput) -> Self {
        Self {
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            is_active: input.is_active,
            is_staff: input.is_staff,
        }
    }
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            rut: row.rut,
            name: row.name,
            surname: row.surname,
            email: row.email,
            phone: row.phone,
            address: row.address,
        }
    }
}

impl From<ClientInput> for ClientChanges {
    fn from(input: ClientInput) -> Self {
        Self {
            rut: input.rut,
            name: input.name,
            surname: input.surname,
            email: input.email,
            phone: input.phone,
            address: input.address,
        }
    }
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Self {
            id: row.id,
            seller_id: row.seller_id,
            client_id: row.client_id,
            product_id: row.product_id,
            quantity: row.quantity,
            total: row.total,
            created_at: row.created_at,
        }
    }
}

impl From<SaleItemRow> for SaleItem {
    fn from(row: SaleItemRow) -> Self {
        Self {
            id: row.id,
            sale_id: row.sale_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

impl From<SaleItemInput> for SaleItemChanges {
    fn from(input: SaleItemInput) -> Self {
        Self {
            sale_id: input.sale_id,
            product_id: input.product_id,
            quantity: input.quantity,
            unit_price: input.unit_price,
        }
    }
}
