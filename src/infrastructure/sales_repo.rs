use bigdecimal::BigDecimal;
use diesel::dsl::{avg, count_star, sum};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Text, Timestamp, Timestamptz};

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::filters::{
    contains_pattern, ClientFilter, SaleFilter, SaleItemFilter, UserFilter,
};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::SalesRepository;
use crate::domain::sales::{
    sale_total, Client, ClientInput, NewSale, Sale, SaleItem, SaleItemInput, SaleLines, User,
    UserInput,
};
use crate::domain::stats::SaleStats;
use crate::schema::{clients, products, sale_items, sales, users};

use super::expect_deleted;
use super::models::{
    ClientChanges, ClientRow, NewSaleRow, SaleChanges, SaleItemChanges, SaleItemRow, SaleRow,
    UserChanges, UserRow,
};

diesel::define_sql_function! {
    /// Wall-clock time of `ts` in the named zone.
    fn timezone(zone: Text, ts: Timestamptz) -> Timestamp;
}

/// Zone used when none is configured.
pub const DEFAULT_TIME_ZONE: &str = "UTC";

// ── Filters ──────────────────────────────────────────────────────────────────

fn user_query(filter: &UserFilter) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table.into_boxed();
    if let Some(term) = &filter.search {
        let pattern = contains_pattern(term);
        query = query.filter(
            users::username
                .ilike(pattern.clone())
                .or(users::first_name.ilike(pattern.clone()))
                .or(users::last_name.ilike(pattern)),
        );
    }
    query
}

fn client_query(filter: &ClientFilter) -> clients::BoxedQuery<'static, Pg> {
    let mut query = clients::table.into_boxed();
    if let Some(term) = &filter.search {
        let pattern = contains_pattern(term);
        query = query.filter(
            clients::name
                .ilike(pattern.clone())
                .or(clients::surname.ilike(pattern.clone()))
                .or(clients::rut.ilike(pattern.clone()))
                .or(clients::email.ilike(pattern)),
        );
    }
    query
}

/// Date bounds are compared against `created_at` as seen in `zone`, so a
/// day means a local calendar day.
fn sale_query(filter: &SaleFilter, zone: &str) -> sales::BoxedQuery<'static, Pg> {
    let mut query = sales::table.into_boxed();
    if let Some(term) = &filter.search {
        let pattern = contains_pattern(term);
        let matching_clients = clients::table
            .filter(clients::name.ilike(pattern.clone()))
            .select(clients::id);
        let matching_sellers = users::table
            .filter(users::username.ilike(pattern))
            .select(users::id);
        query = query.filter(
            sales::client_id
                .eq_any(matching_clients)
                .or(sales::seller_id.eq_any(matching_sellers)),
        );
    }
    if let Some(id) = filter.seller_id {
        query = query.filter(sales::seller_id.eq(id));
    }
    if let Some(id) = filter.client_id {
        query = query.filter(sales::client_id.eq(id));
    }
    if let Some(id) = filter.product_id {
        query = query.filter(sales::product_id.eq(id));
    }
    if let Some(from) = filter.local_from() {
        query = query.filter(timezone(zone.to_string(), sales::created_at).ge(from));
    }
    if let Some(before) = filter.local_before() {
        query = query.filter(timezone(zone.to_string(), sales::created_at).lt(before));
    }
    query
}

fn sale_item_query(filter: &SaleItemFilter) -> sale_items::BoxedQuery<'static, Pg> {
    let mut query = sale_items::table.into_boxed();
    if let Some(id) = filter.sale_id {
        query = query.filter(sale_items::sale_id.eq(id));
    }
    query
}

/// Price the sale from the product as it is right now. `Ok(None)` inside
/// means the product exists but carries no price.
fn price_lines(
    conn: &mut PgConnection,
    lines: &SaleLines,
) -> Result<Option<BigDecimal>, DomainError> {
    let price: Option<Option<BigDecimal>> = products::table
        .find(lines.product_id)
        .select(products::price.nullable())
        .first(conn)
        .optional()?;
    let Some(price) = price else {
        return Err(DomainError::InvalidInput(format!(
            "product {} does not exist",
            lines.product_id
        )));
    };
    sale_total(price.as_ref(), lines.quantity)
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselSalesRepository {
    pool: DbPool,
    time_zone: String,
}

impl DieselSalesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }

    /// IANA zone (e.g. `America/Santiago`) whose calendar days the sale date
    /// filters refer to.
    pub fn with_time_zone(mut self, zone: impl Into<String>) -> Self {
        self.time_zone = zone.into();
        self
    }
}

/// Fails with `InvalidInput` when the database does not know `zone`.
pub fn check_time_zone(pool: &DbPool, zone: &str) -> Result<(), DomainError> {
    let mut conn = pool.get()?;

    diesel::select(timezone(zone.to_string(), chrono::Utc::now()))
        .get_result::<chrono::NaiveDateTime>(&mut conn)
        .map(|_| ())
        .map_err(|e| DomainError::InvalidInput(format!("unknown time zone '{zone}': {e}")))
}

impl SalesRepository for DieselSalesRepository {
    fn list_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let count: i64 = user_query(filter).count().get_result(conn)?;
            let window = page.resolve(count);
            let rows = user_query(filter)
                .select(UserRow::as_select())
                .order(users::id.desc())
                .limit(window.limit)
                .offset(window.offset)
                .load(conn)?;
            Ok(window.wrap(rows.into_iter().map(User::from).collect(), count))
        })
    }

    fn get_user(&self, id: i32) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .find(id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(User::from)
            .ok_or(DomainError::NotFound("User"))
    }

    fn create_user(&self, input: UserInput) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(users::table)
            .values(&UserChanges::from(input))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)?;
        log::debug!("inserted user id={}", row.id);
        Ok(row.into())
    }

    fn update_user(&self, id: i32, input: UserInput) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(users::table.find(id))
            .set(&UserChanges::from(input))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(User::from)
            .ok_or(DomainError::NotFound("User"))
    }

    fn delete_user(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::delete(users::table.find(id)).execute(&mut conn)?;
        expect_deleted(affected, "User")
    }

    fn list_clients(
        &self,
        filter: &ClientFilter,
        page: PageRequest,
    ) -> Result<Page<Client>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let count: i64 = client_query(filter).count().get_result(conn)?;
            let window = page.resolve(count);
            let rows = client_query(filter)
                .select(ClientRow::as_select())
                .order(clients::id.desc())
                .limit(window.limit)
                .offset(window.offset)
                .load(conn)?;
            Ok(window.wrap(rows.into_iter().map(Client::from).collect(), count))
        })
    }

    fn get_client(&self, id: i32) -> Result<Client, DomainError> {
        let mut conn = self.pool.get()?;

        clients::table
            .find(id)
            .select(ClientRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Client::from)
            .ok_or(DomainError::NotFound("Client"))
    }

    fn create_client(&self, input: ClientInput) -> Result<Client, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(clients::table)
            .values(&ClientChanges::from(input))
            .returning(ClientRow::as_returning())
            .get_result(&mut conn)?;
        log::debug!("inserted client id={}", row.id);
        Ok(row.into())
    }

    fn update_client(&self, id: i32, input: ClientInput) -> Result<Client, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(clients::table.find(id))
            .set(&ClientChanges::from(input))
            .returning(ClientRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(Client::from)
            .ok_or(DomainError::NotFound("Client"))
    }

    fn delete_client(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::delete(clients::table.find(id)).execute(&mut conn)?;
        expect_deleted(affected, "Client")
    }

    fn list_sales(
        &self,
        filter: &SaleFilter,
        page: PageRequest,
    ) -> Result<Page<Sale>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let count: i64 = sale_query(filter, &self.time_zone).count().get_result(conn)?;
            let window = page.resolve(count);
            let rows = sale_query(filter, &self.time_zone)
                .select(SaleRow::as_select())
                .order((sales::created_at.desc(), sales::id.desc()))
                .limit(window.limit)
                .offset(window.offset)
                .load(conn)?;
            Ok(window.wrap(rows.into_iter().map(Sale::from).collect(), count))
        })
    }

    fn sale_stats(&self, filter: &SaleFilter) -> Result<SaleStats, DomainError> {
        let mut conn = self.pool.get()?;

        let (count, total_sum, average) = sale_query(filter, &self.time_zone)
            .select((count_star(), sum(sales::total), avg(sales::total)))
            .get_result::<(i64, Option<BigDecimal>, Option<BigDecimal>)>(&mut conn)?;
        Ok(SaleStats::new(count, total_sum, average))
    }

    fn get_sale(&self, id: i32) -> Result<Sale, DomainError> {
        let mut conn = self.pool.get()?;

        sales::table
            .find(id)
            .select(SaleRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Sale::from)
            .ok_or(DomainError::NotFound("Sale"))
    }

    fn create_sale(&self, sale: NewSale) -> Result<Sale, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total = price_lines(conn, &sale.lines)?;
            let row = diesel::insert_into(sales::table)
                .values(&NewSaleRow {
                    seller_id: sale.seller_id,
                    client_id: sale.lines.client_id,
                    product_id: sale.lines.product_id,
                    quantity: sale.lines.quantity,
                    total,
                })
                .returning(SaleRow::as_returning())
                .get_result(conn)?;
            log::debug!("inserted sale id={} total={:?}", row.id, row.total);
            Ok(row.into())
        })
    }

    fn update_sale(&self, id: i32, lines: SaleLines) -> Result<Sale, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total = price_lines(conn, &lines)?;
            diesel::update(sales::table.find(id))
                .set(&SaleChanges {
                    client_id: lines.client_id,
                    product_id: lines.product_id,
                    quantity: lines.quantity,
                    total,
                })
                .returning(SaleRow::as_returning())
                .get_result(conn)
                .optional()?
                .map(Sale::from)
                .ok_or(DomainError::NotFound("Sale"))
        })
    }

    fn delete_sale(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::delete(sales::table.find(id)).execute(&mut conn)?;
        expect_deleted(affected, "Sale")
    }

    fn list_sale_items(
        &self,
        filter: &SaleItemFilter,
        page: PageRequest,
    ) -> Result<Page<SaleItem>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let count: i64 = sale_item_query(filter).count().get_result(conn)?;
            let window = page.resolve(count);
            let rows = sale_item_query(filter)
                .select(SaleItemRow::as_select())
                .order(sale_items::id.desc())
                .limit(window.limit)
                .offset(window.offset)
                .load(conn)?;
            Ok(window.wrap(rows.into_iter().map(SaleItem::from).collect(), count))
        })
    }

    fn get_sale_item(&self, id: i32) -> Result<SaleItem, DomainError> {
        let mut conn = self.pool.get()?;

        sale_items::table
            .find(id)
            .select(SaleItemRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(SaleItem::from)
            .ok_or(DomainError::NotFound("Sale item"))
    }

    fn create_sale_item(&self, input: SaleItemInput) -> Result<SaleItem, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(sale_items::table)
            .values(&SaleItemChanges::from(input))
            .returning(SaleItemRow::as_returning())
            .get_result(&mut conn)?;
        log::debug!("inserted sale item id={} for sale {}", row.id, row.sale_id);
        Ok(row.into())
    }

    fn update_sale_item(&self, id: i32, input: SaleItemInput) -> Result<SaleItem, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::update(sale_items::table.find(id))
            .set(&SaleItemChanges::from(input))
            .returning(SaleItemRow::as_returning())
            .get_result(&mut conn)
            .optional()?
            .map(SaleItem::from)
            .ok_or(DomainError::NotFound("Sale item"))
    }

    fn delete_sale_item(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::delete(sale_items::table.find(id)).execute(&mut conn)?;
        expect_deleted(affected, "Sale item")
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::{NaiveDate, TimeZone, Utc};
    use diesel::prelude::*;

    use super::{check_time_zone, DieselSalesRepository};
    use crate::db::DbPool;
    use crate::domain::catalog::ProductInput;
    use crate::domain::errors::DomainError;
    use crate::domain::filters::{ClientFilter, SaleFilter};
    use crate::domain::pagination::PageRequest;
    use crate::domain::ports::{CatalogRepository, SalesRepository};
    use crate::domain::sales::{ClientInput, NewSale, SaleItemInput, SaleLines, UserInput};
    use crate::infrastructure::catalog_repo::DieselCatalogRepository;
    use crate::infrastructure::test_support::setup_db;
    use crate::schema::sales;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    struct Fixture {
        catalog: DieselCatalogRepository,
        sales: DieselSalesRepository,
        seller: i32,
        client: i32,
    }

    fn fixture(pool: DbPool) -> Fixture {
        let catalog = DieselCatalogRepository::new(pool.clone());
        let sales = DieselSalesRepository::new(pool);
        let seller = sales
            .create_user(UserInput {
                username: "vendedor1".into(),
                first_name: "Ana".into(),
                last_name: "Rojas".into(),
                email: String::new(),
                is_active: true,
                is_staff: false,
            })
            .expect("create user failed")
            .id;
        let client = sales
            .create_client(client_input("11.111.111-1", "Pedro", "Gonzalez", None))
            .expect("create client failed")
            .id;
        Fixture {
            catalog,
            sales,
            seller,
            client,
        }
    }

    fn client_input(rut: &str, name: &str, surname: &str, email: Option<&str>) -> ClientInput {
        ClientInput {
            rut: rut.into(),
            name: name.into(),
            surname: surname.into(),
            email: email.map(str::to_string),
            phone: None,
            address: None,
        }
    }

    fn product_at(f: &Fixture, price: &str) -> i32 {
        f.catalog
            .create_product(ProductInput {
                name: format!("Product at {price}"),
                price: dec(price),
                description: String::new(),
                brand_id: None,
                supplier_id: None,
                category_id: None,
            })
            .expect("create product failed")
            .id
    }

    fn sell(f: &Fixture, product_id: i32, quantity: i32) -> crate::domain::sales::Sale {
        f.sales
            .create_sale(NewSale {
                seller_id: f.seller,
                lines: SaleLines {
                    client_id: f.client,
                    product_id,
                    quantity,
                },
            })
            .expect("create sale failed")
    }

    #[tokio::test]
    async fn create_sale_computes_total() {
        let (_container, pool) = setup_db().await;
        let f = fixture(pool);
        let product = product_at(&f, "150.00");

        let sale = sell(&f, product, 3);

        assert_eq!(sale.total, Some(dec("450")));
        assert_eq!(sale.seller_id, f.seller);
    }

    #[tokio::test]
    async fn editing_quantity_recomputes_total() {
        let (_container, pool) = setup_db().await;
        let f = fixture(pool);
        let product = product_at(&f, "20.00");
        let sale = sell(&f, product, 2);
        assert_eq!(sale.total, Some(dec("40")));

        let edited = f
            .sales
            .update_sale(
                sale.id,
                SaleLines {
                    client_id: f.client,
                    product_id: product,
                    quantity: 5,
                },
            )
            .expect("update failed");

        assert_eq!(edited.total, Some(dec("100")));
        assert_eq!(edited.created_at, sale.created_at);
        assert_eq!(edited.seller_id, sale.seller_id);
    }

    #[tokio::test]
    async fn swapping_product_uses_new_price() {
        let (_container, pool) = setup_db().await;
        let f = fixture(pool);
        let cheap = product_at(&f, "10.00");
        let pricey = product_at(&f, "75.50");
        let sale = sell(&f, cheap, 2);

        let edited = f
            .sales
            .update_sale(
                sale.id,
                SaleLines {
                    client_id: f.client,
                    product_id: pricey,
                    quantity: 2,
                },
            )
            .expect("update failed");

        assert_eq!(edited.total, Some(dec("151")));
    }

    #[tokio::test]
    async fn sale_for_missing_product_is_invalid() {
        let (_container, pool) = setup_db().await;
        let f = fixture(pool);

        let result = f.sales.create_sale(NewSale {
            seller_id: f.seller,
            lines: SaleLines {
                client_id: f.client,
                product_id: 777,
                quantity: 1,
            },
        });

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn client_search_matches_surname_only() {
        let (_container, pool) = setup_db().await;
        let f = fixture(pool);
        f.sales
            .create_client(client_input("22.222.222-2", "Maria", "Zuniga", Some("m@example.com")))
            .expect("create client failed");

        let filter = ClientFilter {
            search: Some("zuni".into()),
        };
        let page = f
            .sales
            .list_clients(&filter, PageRequest::default())
            .expect("list failed");

        assert_eq!(page.count, 1);
        assert_eq!(page.items[0].surname, "Zuniga");
    }

    #[tokio::test]
    async fn sale_filters_by_client_and_today() {
        let (_container, pool) = setup_db().await;
        let f = fixture(pool);
        let product = product_at(&f, "5.00");
        sell(&f, product, 1);
        sell(&f, product, 2);

        let today = Utc::now().date_naive();
        let filter = SaleFilter {
            client_id: Some(f.client),
            date_from: Some(today),
            date_to: Some(today),
            ..Default::default()
        };
        let page = f
            .sales
            .list_sales(&filter, PageRequest::default())
            .expect("list failed");
        assert_eq!(page.count, 2);

        let yesterday = today.pred_opt().expect("valid date");
        let filter = SaleFilter {
            date_to: Some(yesterday),
            ..Default::default()
        };
        assert_eq!(f.sales.sale_stats(&filter).expect("stats failed").count, 0);
    }

    #[tokio::test]
    async fn sale_stats_are_aggregated_over_the_filter() {
        let (_container, pool) = setup_db().await;
        let f = fixture(pool);
        let product = product_at(&f, "150.00");
        let other = product_at(&f, "20.00");
        sell(&f, product, 3);
        sell(&f, other, 2);
        sell(&f, other, 1);

        let stats = f.sales.sale_stats(&SaleFilter::default()).expect("stats failed");
        assert_eq!(stats.count, 3);
        assert_eq!(stats.total_sum, dec("510"));
        assert_eq!(stats.average_total, dec("170.00"));

        let filter = SaleFilter {
            product_id: Some(other),
            ..Default::default()
        };
        let stats = f.sales.sale_stats(&filter).expect("stats failed");
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_sum, dec("60"));
        assert_eq!(stats.average_total, dec("30.00"));
    }

    #[tokio::test]
    async fn date_filters_follow_the_configured_zone() {
        let (_container, pool) = setup_db().await;
        let f = fixture(pool.clone());
        let product = product_at(&f, "5.00");
        let sale = sell(&f, product, 1);

        // 02:30 UTC on 10 March is still the evening of 9 March in Santiago (UTC-3).
        let instant = Utc.with_ymd_and_hms(2024, 3, 10, 2, 30, 0).unwrap();
        let mut conn = pool.get().expect("connection failed");
        diesel::update(sales::table.find(sale.id))
            .set(sales::created_at.eq(instant))
            .execute(&mut conn)
            .expect("backdating failed");

        let day = |d: u32| SaleFilter {
            date_from: NaiveDate::from_ymd_opt(2024, 3, d),
            date_to: NaiveDate::from_ymd_opt(2024, 3, d),
            ..Default::default()
        };

        let utc = DieselSalesRepository::new(pool.clone());
        assert_eq!(utc.sale_stats(&day(10)).expect("stats failed").count, 1);
        assert_eq!(utc.sale_stats(&day(9)).expect("stats failed").count, 0);

        let santiago = DieselSalesRepository::new(pool).with_time_zone("America/Santiago");
        assert_eq!(santiago.sale_stats(&day(9)).expect("stats failed").count, 1);
        assert_eq!(santiago.sale_stats(&day(10)).expect("stats failed").count, 0);
    }

    #[tokio::test]
    async fn unknown_time_zone_is_rejected() {
        let (_container, pool) = setup_db().await;

        assert!(check_time_zone(&pool, "America/Santiago").is_ok());
        assert!(matches!(
            check_time_zone(&pool, "Mars/Olympus_Mons"),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn sale_search_matches_seller_username() {
        let (_container, pool) = setup_db().await;
        let f = fixture(pool);
        let product = product_at(&f, "5.00");
        sell(&f, product, 1);

        let filter = SaleFilter {
            search: Some("VENDEDOR".into()),
            ..Default::default()
        };
        let page = f
            .sales
            .list_sales(&filter, PageRequest::default())
            .expect("list failed");
        assert_eq!(page.count, 1);
    }

    #[tokio::test]
    async fn deleted_product_leaves_line_items_orphaned() {
        let (_container, pool) = setup_db().await;
        let f = fixture(pool);
        let sold = product_at(&f, "5.00");
        let extra = product_at(&f, "9.00");
        let sale = sell(&f, sold, 1);
        let item = f
            .sales
            .create_sale_item(SaleItemInput {
                sale_id: sale.id,
                product_id: Some(extra),
                quantity: 2,
                unit_price: dec("9"),
            })
            .expect("create item failed");

        f.catalog.delete_product(extra).expect("delete failed");

        let item = f.sales.get_sale_item(item.id).expect("item should survive");
        assert_eq!(item.product_id, None);
        assert_eq!(item.subtotal(), dec("18"));
    }
}
