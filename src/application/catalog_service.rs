use crate::domain::catalog::{
    Brand, BrandInput, Category, CategoryInput, Product, ProductInput, Supplier, SupplierInput,
};
use crate::domain::errors::DomainError;
use crate::domain::filters::{NameFilter, ProductFilter, SupplierFilter};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::CatalogRepository;
use crate::domain::stats::ProductStats;

pub struct CatalogService<R> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    // ── Brands ───────────────────────────────────────────────────────────────

    pub fn list_brands(
        &self,
        filter: &NameFilter,
        page: PageRequest,
    ) -> Result<Page<Brand>, DomainError> {
        self.repo.list_brands(filter, page)
    }

    pub fn get_brand(&self, id: i32) -> Result<Brand, DomainError> {
        self.repo.get_brand(id)
    }

    pub fn create_brand(&self, input: BrandInput) -> Result<Brand, DomainError> {
        let brand = self.repo.create_brand(input)?;
        log::info!("brand {} created", brand.id);
        Ok(brand)
    }

    pub fn update_brand(&self, id: i32, input: BrandInput) -> Result<Brand, DomainError> {
        let brand = self.repo.update_brand(id, input)?;
        log::info!("brand {} updated", id);
        Ok(brand)
    }

    pub fn delete_brand(&self, id: i32) -> Result<(), DomainError> {
        self.repo.delete_brand(id)?;
        log::info!("brand {} deleted together with its products", id);
        Ok(())
    }

    pub fn brand_products(&self, id: i32, page: PageRequest) -> Result<Page<Product>, DomainError> {
        self.repo.get_brand(id)?;
        let filter = ProductFilter {
            brand_id: Some(id),
            ..Default::default()
        };
        self.repo.list_products(&filter, page)
    }

    // ── Suppliers ────────────────────────────────────────────────────────────

    pub fn list_suppliers(
        &self,
        filter: &SupplierFilter,
        page: PageRequest,
    ) -> Result<Page<Supplier>, DomainError> {
        self.repo.list_suppliers(filter, page)
    }

    pub fn get_supplier(&self, id: i32) -> Result<Supplier, DomainError> {
        self.repo.get_supplier(id)
    }

    pub fn create_supplier(&self, input: SupplierInput) -> Result<Supplier, DomainError> {
        let supplier = self.repo.create_supplier(input)?;
        log::info!("supplier {} created", supplier.id);
        Ok(supplier)
    }

    pub fn update_supplier(&self, id: i32, input: SupplierInput) -> Result<Supplier, DomainError> {
        let supplier = self.repo.update_supplier(id, input)?;
        log::info!("supplier {} updated", id);
        Ok(supplier)
    }

    pub fn delete_supplier(&self, id: i32) -> Result<(), DomainError> {
        self.repo.delete_supplier(id)?;
        log::info!("supplier {} deleted together with its products", id);
        Ok(())
    }

    pub fn supplier_products(
        &self,
        id: i32,
        page: PageRequest,
    ) -> Result<Page<Product>, DomainError> {
        self.repo.get_supplier(id)?;
        let filter = ProductFilter {
            supplier_id: Some(id),
            ..Default::default()
        };
        self.repo.list_products(&filter, page)
    }

    // ── Categories ───────────────────────────────────────────────────────────

    pub fn list_categories(
        &self,
        filter: &NameFilter,
        page: PageRequest,
    ) -> Result<Page<Category>, DomainError> {
        self.repo.list_categories(filter, page)
    }

    pub fn get_category(&self, id: i32) -> Result<Category, DomainError> {
        self.repo.get_category(id)
    }

    pub fn create_category(&self, input: CategoryInput) -> Result<Category, DomainError> {
        let category = self.repo.create_category(input)?;
        log::info!("category {} created", category.id);
        Ok(category)
    }

    pub fn update_category(&self, id: i32, input: CategoryInput) -> Result<Category, DomainError> {
        let category = self.repo.update_category(id, input)?;
        log::info!("category {} updated", id);
        Ok(category)
    }

    pub fn delete_category(&self, id: i32) -> Result<(), DomainError> {
        self.repo.delete_category(id)?;
        log::info!("category {} deleted, its products are now uncategorised", id);
        Ok(())
    }

    pub fn category_products(
        &self,
        id: i32,
        page: PageRequest,
    ) -> Result<Page<Product>, DomainError> {
        self.repo.get_category(id)?;
        let filter = ProductFilter {
            category_id: Some(id),
            ..Default::default()
        };
        self.repo.list_products(&filter, page)
    }

    // ── Products ─────────────────────────────────────────────────────────────

    pub fn list_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, DomainError> {
        self.repo.list_products(filter, page)
    }

    pub fn product_stats(&self, filter: &ProductFilter) -> Result<ProductStats, DomainError> {
        self.repo.product_stats(filter)
    }

    pub fn get_product(&self, id: i32) -> Result<Product, DomainError> {
        self.repo.get_product(id)
    }

    pub fn create_product(&self, input: ProductInput) -> Result<Product, DomainError> {
        let product = self.repo.create_product(input)?;
        log::info!("product {} created at {}", product.id, product.price);
        Ok(product)
    }

    pub fn update_product(&self, id: i32, input: ProductInput) -> Result<Product, DomainError> {
        let product = self.repo.update_product(id, input)?;
        log::info!("product {} updated, price now {}", id, product.price);
        Ok(product)
    }

    pub fn delete_product(&self, id: i32) -> Result<(), DomainError> {
        self.repo.delete_product(id)?;
        log::info!("product {} deleted", id);
        Ok(())
    }
}
