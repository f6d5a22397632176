use crate::domain::errors::DomainError;
use crate::domain::filters::{ClientFilter, SaleFilter, SaleItemFilter, UserFilter};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::ports::SalesRepository;
use crate::domain::sales::{
    Client, ClientInput, NewSale, Sale, SaleItem, SaleItemInput, SaleLines, User, UserInput,
};
use crate::domain::stats::SaleStats;

pub struct SalesService<R> {
    repo: R,
}

impl<R: SalesRepository> SalesService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    // ── Users ────────────────────────────────────────────────────────────────

    pub fn list_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, DomainError> {
        self.repo.list_users(filter, page)
    }

    pub fn get_user(&self, id: i32) -> Result<User, DomainError> {
        self.repo.get_user(id)
    }

    pub fn create_user(&self, input: UserInput) -> Result<User, DomainError> {
        let user = self.repo.create_user(input)?;
        log::info!("user {} ({}) created", user.id, user.username);
        Ok(user)
    }

    pub fn update_user(&self, id: i32, input: UserInput) -> Result<User, DomainError> {
        let user = self.repo.update_user(id, input)?;
        log::info!("user {} updated", id);
        Ok(user)
    }

    pub fn delete_user(&self, id: i32) -> Result<(), DomainError> {
        self.repo.delete_user(id)?;
        log::info!("user {} deleted together with their sales", id);
        Ok(())
    }

    // ── Clients ──────────────────────────────────────────────────────────────

    pub fn list_clients(
        &self,
        filter: &ClientFilter,
        page: PageRequest,
    ) -> Result<Page<Client>, DomainError> {
        self.repo.list_clients(filter, page)
    }

    pub fn get_client(&self, id: i32) -> Result<Client, DomainError> {
        self.repo.get_client(id)
    }

    pub fn create_client(&self, input: ClientInput) -> Result<Client, DomainError> {
        let client = self.repo.create_client(input)?;
        log::info!("client {} created", client.id);
        Ok(client)
    }

    pub fn update_client(&self, id: i32, input: ClientInput) -> Result<Client, DomainError> {
        let client = self.repo.update_client(id, input)?;
        log::info!("client {} updated", id);
        Ok(client)
    }

    pub fn delete_client(&self, id: i32) -> Result<(), DomainError> {
        self.repo.delete_client(id)?;
        log::info!("client {} deleted together with their purchases", id);
        Ok(())
    }

    pub fn client_purchases(&self, id: i32, page: PageRequest) -> Result<Page<Sale>, DomainError> {
        self.repo.get_client(id)?;
        let filter = SaleFilter {
            client_id: Some(id),
            ..Default::default()
        };
        self.repo.list_sales(&filter, page)
    }

    // ── Sales ────────────────────────────────────────────────────────────────

    pub fn list_sales(
        &self,
        filter: &SaleFilter,
        page: PageRequest,
    ) -> Result<Page<Sale>, DomainError> {
        self.repo.list_sales(filter, page)
    }

    pub fn sale_stats(&self, filter: &SaleFilter) -> Result<SaleStats, DomainError> {
        self.repo.sale_stats(filter)
    }

    pub fn get_sale(&self, id: i32) -> Result<Sale, DomainError> {
        self.repo.get_sale(id)
    }

    pub fn create_sale(&self, sale: NewSale) -> Result<Sale, DomainError> {
        let sale = self.repo.create_sale(sale)?;
        log::info!(
            "sale {} recorded by seller {}: {} x product {}",
            sale.id,
            sale.seller_id,
            sale.quantity,
            sale.product_id
        );
        Ok(sale)
    }

    pub fn update_sale(&self, id: i32, lines: SaleLines) -> Result<Sale, DomainError> {
        let sale = self.repo.update_sale(id, lines)?;
        log::info!("sale {} updated, total repriced to {:?}", id, sale.total);
        Ok(sale)
    }

    pub fn delete_sale(&self, id: i32) -> Result<(), DomainError> {
        self.repo.delete_sale(id)?;
        log::info!("sale {} deleted", id);
        Ok(())
    }

    // ── Sale line items ──────────────────────────────────────────────────────

    pub fn list_sale_items(
        &self,
        filter: &SaleItemFilter,
        page: PageRequest,
    ) -> Result<Page<SaleItem>, DomainError> {
        self.repo.list_sale_items(filter, page)
    }

    pub fn get_sale_item(&self, id: i32) -> Result<SaleItem, DomainError> {
        self.repo.get_sale_item(id)
    }

    pub fn create_sale_item(&self, input: SaleItemInput) -> Result<SaleItem, DomainError> {
        let item = self.repo.create_sale_item(input)?;
        log::info!("line item {} added to sale {}", item.id, item.sale_id);
        Ok(item)
    }

    pub fn update_sale_item(&self, id: i32, input: SaleItemInput) -> Result<SaleItem, DomainError> {
        let item = self.repo.update_sale_item(id, input)?;
        log::info!("line item {} updated", id);
        Ok(item)
    }

    pub fn delete_sale_item(&self, id: i32) -> Result<(), DomainError> {
        self.repo.delete_sale_item(id)?;
        log::info!("line item {} deleted", id);
        Ok(())
    }
}
