use bigdecimal::BigDecimal;

#[derive(Debug, Clone)]
pub struct Brand {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct BrandInput {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Supplier {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct SupplierInput {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
    pub brand_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
}

/// Fields accepted when creating or replacing a product. `price` is already
/// scaled to two decimal places.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
    pub brand_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
}
