use bigdecimal::BigDecimal;
use diesel::dsl::{avg, count_star};
use diesel::pg::Pg;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::catalog::{
    Brand, BrandInput, Category, CategoryInput, Product, ProductInput, Supplier, SupplierInput,
};
use crate::domain::errors::DomainError;
use crate::domain::filters::{contains_pattern, NameFilter, ProductFilter, SupplierFilter};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::CatalogRepository;
use crate::domain::stats::ProductStats;
use crate::schema::{brands, categories, products, suppliers};

use super::expect_deleted;
use super::models::{
    BrandChanges, BrandRow, CategoryChanges, CategoryRow, ProductChanges, ProductRow,
    SupplierChanges, SupplierRow,
};

// ── Filters ──────────────────────────────────────────────────────────────────

fn brand_query(filter: &NameFilter) -> brands::BoxedQuery<'static, Pg> {
    let mut query = brands::table.into_boxed();
    if let Some(term) = &filter.search {
        query = query.filter(brands::name.ilike(contains_pattern(term)));
    }
    query
}

fn supplier_query(filter: &SupplierFilter) -> suppliers::BoxedQuery<'static, Pg> {
    let mut query = suppliers::table.into_boxed();
    if let Some(term) = &filter.search {
        let pattern = contains_pattern(term);
        query = query.filter(
            suppliers::name
                .ilike(pattern.clone())
                .or(suppliers::email.ilike(pattern)),
        );
    }
    query
}

fn category_query(filter: &NameFilter) -> categories::BoxedQuery<'static, Pg> {
    let mut query = categories::table.into_boxed();
    if let Some(term) = &filter.search {
        query = query.filter(categories::name.ilike(contains_pattern(term)));
    }
    query
}

fn product_query(filter: &ProductFilter) -> products::BoxedQuery<'static, Pg> {
    let mut query = products::table.into_boxed();
    if let Some(term) = &filter.search {
        let pattern = contains_pattern(term);
        query = query.filter(
            products::name
                .ilike(pattern.clone())
                .or(products::description.ilike(pattern)),
        );
    }
    if let Some(id) = filter.brand_id {
        query = query.filter(products::brand_id.eq(id));
    }
    if let Some(id) = filter.supplier_id {
        query = query.filter(products::supplier_id.eq(id));
    }
    if let Some(id) = filter.category_id {
        query = query.filter(products::category_id.eq(id));
    }
    if let Some(min) = &filter.price_min {
        query = query.filter(products::price.ge(min.clone()));
    }
    if let Some(max) = &filter.price_max {
        query = query.filter(products::price.le(max.clone()));
    }
    query
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn list_brands(
        &self,
        filter: &NameFilter,
        page: PageRequest,
    ) -> Result<Page<Brand>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let count: i64 = brand_query(filter).count().get_result(conn)?;
            let window = page.resolve(count);
            let rows = brand_query(filter)
                .select(BrandRow::as_select())
                .order(brands::id.desc())
                .limit(window.limit)
                .offset(window.offset)
                .load(conn)?;
            Ok(window.wrap(rows.into_iter().map(Brand::from).collect(), count))
        })
    }

    fn get_brand(&self, id: i32) -> Result<Brand, DomainError> {
        let mut conn = self.pool.get()?;

        brands::table
            .find(id)
            .select(BrandRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Brand::from)
            .ok_or(DomainError::NotFound("Brand"))
    }

    fn create_brand(&self, input: BrandInput) -> Result<Brand, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(brands::table)
            .values(&BrandChanges::from(input))
            .returning(BrandRow::as_returning())
            .get_result(&mut conn)?;
        log::debug!("inserted brand id={}", row.id);
        Ok(row.into())
    }

    fn update_brand(&self, id: i32, input: BrandInput) -> Result<Brand, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(brands::table.find(id))
            .set(&BrandChanges::from(input))
            .returning(BrandRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(Brand::from)
            .ok_or(DomainError::NotFound("Brand"))
    }

    fn delete_brand(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // Products of the brand go with it (ON DELETE CASCADE).
        let affected = diesel::delete(brands::table.find(id)).execute(&mut conn)?;
        expect_deleted(affected, "Brand")
    }

    fn list_suppliers(
        &self,
        filter: &SupplierFilter,
        page: PageRequest,
    ) -> Result<Page<Supplier>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let count: i64 = supplier_query(filter).count().get_result(conn)?;
            let window = page.resolve(count);
            let rows = supplier_query(filter)
                .select(SupplierRow::as_select())
                .order(suppliers::id.desc())
                .limit(window.limit)
                .offset(window.offset)
                .load(conn)?;
            Ok(window.wrap(rows.into_iter().map(Supplier::from).collect(), count))
        })
    }

    fn get_supplier(&self, id: i32) -> Result<Supplier, DomainError> {
        let mut conn = self.pool.get()?;

        suppliers::table
            .find(id)
            .select(SupplierRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Supplier::from)
            .ok_or(DomainError::NotFound("Supplier"))
    }

    fn create_supplier(&self, input: SupplierInput) -> Result<Supplier, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(suppliers::table)
            .values(&SupplierChanges::from(input))
            .returning(SupplierRow::as_returning())
            .get_result(&mut conn)?;
        log::debug!("inserted supplier id={}", row.id);
        Ok(row.into())
    }

    fn update_supplier(&self, id: i32, input: SupplierInput) -> Result<Supplier, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(suppliers::table.find(id))
            .set(&SupplierChanges::from(input))
            .returning(SupplierRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(Supplier::from)
            .ok_or(DomainError::NotFound("Supplier"))
    }

    fn delete_supplier(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::delete(suppliers::table.find(id)).execute(&mut conn)?;
        expect_deleted(affected, "Supplier")
    }

    fn list_categories(
        &self,
        filter: &NameFilter,
        page: PageRequest,
    ) -> Result<Page<Category>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let count: i64 = category_query(filter).count().get_result(conn)?;
            let window = page.resolve(count);
            let rows = category_query(filter)
                .select(CategoryRow::as_select())
                .order(categories::id.desc())
                .limit(window.limit)
                .offset(window.offset)
                .load(conn)?;
            Ok(window.wrap(rows.into_iter().map(Category::from).collect(), count))
        })
    }

    fn get_category(&self, id: i32) -> Result<Category, DomainError> {
        let mut conn = self.pool.get()?;

        categories::table
            .find(id)
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Category::from)
            .ok_or(DomainError::NotFound("Category"))
    }

    fn create_category(&self, input: CategoryInput) -> Result<Category, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(categories::table)
            .values(&CategoryChanges::from(input))
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)?;
        log::debug!("inserted category id={}", row.id);
        Ok(row.into())
    }

    fn update_category(&self, id: i32, input: CategoryInput) -> Result<Category, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(categories::table.find(id))
            .set(&CategoryChanges::from(input))
            .returning(CategoryRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(Category::from)
            .ok_or(DomainError::NotFound("Category"))
    }

    fn delete_category(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        // Products keep existing with category_id cleared (ON DELETE SET NULL).
        let affected = diesel::delete(categories::table.find(id)).execute(&mut conn)?;
        expect_deleted(affected, "Category")
    }

    fn list_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let count: i64 = product_query(filter).count().get_result(conn)?;
            let window = page.resolve(count);
            let rows = product_query(filter)
                .select(ProductRow::as_select())
                .order(products::id.desc())
                .limit(window.limit)
                .offset(window.offset)
                .load(conn)?;
            Ok(window.wrap(rows.into_iter().map(Product::from).collect(), count))
        })
    }

    fn product_stats(&self, filter: &ProductFilter) -> Result<ProductStats, DomainError> {
        let mut conn = self.pool.get()?;

        let (count, average) = product_query(filter)
            .select((count_star(), avg(products::price)))
            .get_result::<(i64, Option<BigDecimal>)>(&mut conn)?;
        Ok(ProductStats::new(count, average))
    }

    fn get_product(&self, id: i32) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        products::table
            .find(id)
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Product::from)
            .ok_or(DomainError::NotFound("Product"))
    }

    fn create_product(&self, input: ProductInput) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(products::table)
            .values(&ProductChanges::from(input))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;
        log::debug!("inserted product id={} price={}", row.id, row.price);
        Ok(row.into())
    }

    fn update_product(&self, id: i32, input: ProductInput) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(products::table.find(id))
            .set(&ProductChanges::from(input))
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(Product::from)
            .ok_or(DomainError::NotFound("Product"))
    }

    fn delete_product(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        expect_deleted(affected, "Product")
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::DieselCatalogRepository;
    use crate::domain::catalog::{BrandInput, CategoryInput, ProductInput, SupplierInput};
    use crate::domain::errors::DomainError;
    use crate::domain::filters::{NameFilter, ProductFilter, SupplierFilter};
    use crate::domain::pagination::PageRequest;
    use crate::domain::ports::CatalogRepository;
    use crate::infrastructure::test_support::setup_db;

    fn product(name: &str, price: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            price: BigDecimal::from_str(price).expect("valid decimal"),
            description: format!("{name} description"),
            brand_id: None,
            supplier_id: None,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn price_range_is_inclusive() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        for (name, price) in [
            ("Mouse", "99.99"),
            ("Keyboard", "100.00"),
            ("Headset", "150.00"),
            ("Monitor", "200.00"),
            ("Chair", "200.01"),
        ] {
            repo.create_product(product(name, price)).expect("create failed");
        }

        let filter = ProductFilter {
            price_min: Some(BigDecimal::from(100)),
            price_max: Some(BigDecimal::from(200)),
            ..Default::default()
        };
        let page = repo.list_products(&filter, PageRequest::default()).expect("list failed");

        let mut names: Vec<_> = page.items.iter().map(|p| p.name.as_str()).collect();
        names.sort();
        assert_eq!(page.count, 3);
        assert_eq!(names, ["Headset", "Keyboard", "Monitor"]);
    }

    #[tokio::test]
    async fn product_stats_follow_the_filter() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        let empty = repo.product_stats(&ProductFilter::default()).expect("stats failed");
        assert_eq!(empty.count, 0);
        assert_eq!(empty.average_price, BigDecimal::from(0));

        for (name, price) in [("Cable", "10.00"), ("Adapter", "20.50"), ("Dock", "300.00")] {
            repo.create_product(product(name, price)).expect("create failed");
        }
        let filter = ProductFilter {
            price_max: Some(BigDecimal::from(100)),
            ..Default::default()
        };
        let stats = repo.product_stats(&filter).expect("stats failed");

        assert_eq!(stats.count, 2);
        assert_eq!(stats.average_price, BigDecimal::from_str("15.25").expect("valid decimal"));
    }

    #[tokio::test]
    async fn search_matches_name_or_description_case_insensitively() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        let mut ssd = product("SSD 1TB", "80.00");
        ssd.description = "NVMe storage".to_string();
        repo.create_product(ssd).expect("create failed");
        repo.create_product(product("nvme enclosure", "20.00")).expect("create failed");
        repo.create_product(product("Mouse", "10.00")).expect("create failed");

        let filter = ProductFilter {
            search: Some("NVME".to_string()),
            ..Default::default()
        };
        let page = repo.list_products(&filter, PageRequest::default()).expect("list failed");
        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn deleting_brand_cascades_to_products() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        let brand = repo
            .create_brand(BrandInput { name: "Logitech".into() })
            .expect("create brand failed");
        let mut mouse = product("MX Master", "99.00");
        mouse.brand_id = Some(brand.id);
        let mouse = repo.create_product(mouse).expect("create product failed");

        repo.delete_brand(brand.id).expect("delete failed");

        assert!(matches!(
            repo.get_product(mouse.id),
            Err(DomainError::NotFound("Product"))
        ));
    }

    #[tokio::test]
    async fn deleting_category_clears_product_category() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        let category = repo
            .create_category(CategoryInput {
                name: "Monitors".into(),
                description: None,
            })
            .expect("create category failed");
        let supplier = repo
            .create_supplier(SupplierInput {
                name: "PC Factory".into(),
                phone: String::new(),
                email: "ventas@pcfactory.cl".into(),
            })
            .expect("create supplier failed");
        let mut monitor = product("27in IPS", "250.00");
        monitor.category_id = Some(category.id);
        monitor.supplier_id = Some(supplier.id);
        let monitor = repo.create_product(monitor).expect("create product failed");

        repo.delete_category(category.id).expect("delete failed");

        let monitor = repo.get_product(monitor.id).expect("product should survive");
        assert_eq!(monitor.category_id, None);
        assert_eq!(monitor.supplier_id, Some(supplier.id));
    }

    #[tokio::test]
    async fn product_with_unknown_brand_is_invalid_input() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        let mut orphan = product("Ghost", "1.00");
        orphan.brand_id = Some(4242);

        assert!(matches!(
            repo.create_product(orphan),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_brand_name_conflicts() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        repo.create_brand(BrandInput { name: "Asus".into() })
            .expect("create failed");
        assert!(matches!(
            repo.create_brand(BrandInput { name: "Asus".into() }),
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn supplier_search_matches_email() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        repo.create_supplier(SupplierInput {
            name: "Acme".into(),
            phone: String::new(),
            email: "orders@wholesale.example".into(),
        })
        .expect("create failed");

        let filter = SupplierFilter {
            search: Some("wholesale".into()),
        };
        let page = repo.list_suppliers(&filter, PageRequest::default()).expect("list failed");
        assert_eq!(page.count, 1);
        assert_eq!(page.items[0].name, "Acme");
    }

    #[tokio::test]
    async fn listing_pages_newest_first_and_clamps() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        for i in 1..=7 {
            repo.create_brand(BrandInput { name: format!("Brand {i}") })
                .expect("create failed");
        }

        let first = repo
            .list_brands(&NameFilter::default(), PageRequest::new(1))
            .expect("list failed");
        assert_eq!(first.count, 7);
        assert_eq!(first.num_pages, 2);
        assert_eq!(first.items.len(), 5);
        assert_eq!(first.items[0].name, "Brand 7");

        let past_end = repo
            .list_brands(&NameFilter::default(), PageRequest::new(9))
            .expect("list failed");
        assert_eq!(past_end.number, 2);
        assert_eq!(past_end.items.len(), 2);
    }

    #[tokio::test]
    async fn update_missing_product_is_not_found() {
        let (_container, pool) = setup_db().await;
        let repo = DieselCatalogRepository::new(pool);

        assert!(matches!(
            repo.update_product(99, product("Nothing", "1.00")),
            Err(DomainError::NotFound("Product"))
        ));
    }
}
