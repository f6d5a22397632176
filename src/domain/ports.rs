use super::catalog::{
    Brand, BrandInput, Category, CategoryInput, Product, ProductInput, Supplier, SupplierInput,
};
use super::errors::DomainError;
use super::filters::{
    ClientFilter, NameFilter, ProductFilter, SaleFilter, SaleItemFilter, SupplierFilter,
    UserFilter,
};
use super::pagination::{Page, PageRequest};
use super::sales::{
    Client, ClientInput, NewSale, Sale, SaleItem, SaleItemInput, SaleLines, User, UserInput,
};
use super::stats::{ProductStats, SaleStats};

/// Brands, suppliers, categories and products.
///
/// Deleting a brand or supplier removes its products; deleting a category only
/// clears the products' category.
pub trait CatalogRepository: Send + Sync + 'static {
    fn list_brands(
        &self,
        filter: &NameFilter,
        page: PageRequest,
    ) -> Result<Page<Brand>, DomainError>;
    fn get_brand(&self, id: i32) -> Result<Brand, DomainError>;
    fn create_brand(&self, input: BrandInput) -> Result<Brand, DomainError>;
    fn update_brand(&self, id: i32, input: BrandInput) -> Result<Brand, DomainError>;
    fn delete_brand(&self, id: i32) -> Result<(), DomainError>;

    fn list_suppliers(
        &self,
        filter: &SupplierFilter,
        page: PageRequest,
    ) -> Result<Page<Supplier>, DomainError>;
    fn get_supplier(&self, id: i32) -> Result<Supplier, DomainError>;
    fn create_supplier(&self, input: SupplierInput) -> Result<Supplier, DomainError>;
    fn update_supplier(&self, id: i32, input: SupplierInput) -> Result<Supplier, DomainError>;
    fn delete_supplier(&self, id: i32) -> Result<(), DomainError>;

    fn list_categories(
        &self,
        filter: &NameFilter,
        page: PageRequest,
    ) -> Result<Page<Category>, DomainError>;
    fn get_category(&self, id: i32) -> Result<Category, DomainError>;
    fn create_category(&self, input: CategoryInput) -> Result<Category, DomainError>;
    fn update_category(&self, id: i32, input: CategoryInput) -> Result<Category, DomainError>;
    fn delete_category(&self, id: i32) -> Result<(), DomainError>;

    fn list_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, DomainError>;
    /// Count and average price over every product matching `filter`,
    /// aggregated by the database.
    fn product_stats(&self, filter: &ProductFilter) -> Result<ProductStats, DomainError>;
    fn get_product(&self, id: i32) -> Result<Product, DomainError>;
    fn create_product(&self, input: ProductInput) -> Result<Product, DomainError>;
    fn update_product(&self, id: i32, input: ProductInput) -> Result<Product, DomainError>;
    fn delete_product(&self, id: i32) -> Result<(), DomainError>;
}

/// Users (sellers), clients, sales and sale line items.
pub trait SalesRepository: Send + Sync + 'static {
    fn list_users(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<User>, DomainError>;
    fn get_user(&self, id: i32) -> Result<User, DomainError>;
    fn create_user(&self, input: UserInput) -> Result<User, DomainError>;
    fn update_user(&self, id: i32, input: UserInput) -> Result<User, DomainError>;
    fn delete_user(&self, id: i32) -> Result<(), DomainError>;

    fn list_clients(
        &self,
        filter: &ClientFilter,
        page: PageRequest,
    ) -> Result<Page<Client>, DomainError>;
    fn get_client(&self, id: i32) -> Result<Client, DomainError>;
    fn create_client(&self, input: ClientInput) -> Result<Client, DomainError>;
    fn update_client(&self, id: i32, input: ClientInput) -> Result<Client, DomainError>;
    fn delete_client(&self, id: i32) -> Result<(), DomainError>;

    fn list_sales(&self, filter: &SaleFilter, page: PageRequest) -> Result<Page<Sale>, DomainError>;
    /// Count, sum and average total over every sale matching `filter`,
    /// aggregated by the database.
    fn sale_stats(&self, filter: &SaleFilter) -> Result<SaleStats, DomainError>;
    fn get_sale(&self, id: i32) -> Result<Sale, DomainError>;
    /// Persist a new sale, pricing it from the product inside the same
    /// transaction.
    fn create_sale(&self, sale: NewSale) -> Result<Sale, DomainError>;
    /// Replace client, product and quantity and reprice the sale from the
    /// product's current price. Seller and creation time are untouched.
    fn update_sale(&self, id: i32, lines: SaleLines) -> Result<Sale, DomainError>;
    fn delete_sale(&self, id: i32) -> Result<(), DomainError>;

    fn list_sale_items(
        &self,
        filter: &SaleItemFilter,
        page: PageRequest,
    ) -> Result<Page<SaleItem>, DomainError>;
    fn get_sale_item(&self, id: i32) -> Result<SaleItem, DomainError>;
    fn create_sale_item(&self, input: SaleItemInput) -> Result<SaleItem, DomainError>;
    fn update_sale_item(&self, id: i32, input: SaleItemInput) -> Result<SaleItem, DomainError>;
    fn delete_sale_item(&self, id: i32) -> Result<(), DomainError>;
}
