use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::sales::SaleResponse;
use super::{blocking, non_blank, ListResponse, Sales};
use crate::domain::filters::{ClientFilter, Params};
use crate::domain::pagination::PageRequest;
use crate::domain::sales::{Client, ClientInput};
use crate::errors::AppError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClientRequest {
    /// National id, e.g. `12.345.678-9`.
    #[validate(length(min = 1, max = 12))]
    pub rut: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub surname: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ClientRequest {
    fn into_input(self) -> Result<ClientInput, AppError> {
        let req = Self {
            rut: self.rut.trim().to_string(),
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
            address: non_blank(self.address),
        };
        req.validate()?;
        Ok(ClientInput {
            rut: req.rut,
            name: req.name,
            surname: req.surname,
            email: req.email,
            phone: req.phone,
            address: req.address,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientResponse {
    pub id: i32,
    pub rut: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<Client> for ClientResponse {
    fn from(c: Client) -> Self {
        Self {
            id: c.id,
            rut: c.rut,
            name: c.name,
            surname: c.surname,
            email: c.email,
            phone: c.phone,
            address: c.address,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/clients",
    params(
        ("search" = Option<String>, Query, description = "Matches name, surname, RUT or email"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Page of clients", body = ListResponse<ClientResponse>),
    ),
    tag = "clients"
)]
pub async fn list_clients(
    service: web::Data<Sales>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let filter = ClientFilter::from_params(&params);
    let page = PageRequest::from_params(&params);

    let result = blocking(move || service.list_clients(&filter, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<ClientResponse>::from(result)))
}

#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = ClientRequest,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "RUT already registered"),
    ),
    tag = "clients"
)]
pub async fn create_client(
    service: web::Data<Sales>,
    body: web::Json<ClientRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;

    let client = blocking(move || service.create_client(input)).await?;
    Ok(HttpResponse::Created().json(ClientResponse::from(client)))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    params(("id" = i32, Path, description = "Client id")),
    responses(
        (status = 200, description = "Client found", body = ClientResponse),
        (status = 404, description = "Client not found"),
    ),
    tag = "clients"
)]
pub async fn get_client(
    service: web::Data<Sales>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let client = blocking(move || service.get_client(id)).await?;
    Ok(HttpResponse::Ok().json(ClientResponse::from(client)))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    params(("id" = i32, Path, description = "Client id")),
    request_body = ClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Client not found"),
        (status = 409, description = "RUT already registered"),
    ),
    tag = "clients"
)]
pub async fn update_client(
    service: web::Data<Sales>,
    path: web::Path<i32>,
    body: web::Json<ClientRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;

    let client = blocking(move || service.update_client(id, input)).await?;
    Ok(HttpResponse::Ok().json(ClientResponse::from(client)))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    params(("id" = i32, Path, description = "Client id")),
    responses(
        (status = 204, description = "Client and their purchases deleted"),
        (status = 404, description = "Client not found"),
    ),
    tag = "clients"
)]
pub async fn delete_client(
    service: web::Data<Sales>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    blocking(move || service.delete_client(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Purchase history of one client, newest first.
#[utoipa::path(
    get,
    path = "/api/clients/{id}/purchases",
    params(
        ("id" = i32, Path, description = "Client id"),
        ("page" = Option<i64>, Query, description = "Page number (1-based, 5 per page)"),
    ),
    responses(
        (status = 200, description = "Sales made to the client", body = ListResponse<SaleResponse>),
        (status = 404, description = "Client not found"),
    ),
    tag = "clients"
)]
pub async fn client_purchases(
    service: web::Data<Sales>,
    path: web::Path<i32>,
    query: web::Query<Params>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let page = PageRequest::from_params(&query);

    let result = blocking(move || service.client_purchases(id, page)).await?;
    Ok(HttpResponse::Ok().json(ListResponse::<SaleResponse>::from(result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ClientRequest {
        ClientRequest {
            rut: " 12.345.678-9 ".into(),
            name: "Ana".into(),
            surname: "Pérez".into(),
            email: Some(" ".into()),
            phone: None,
            address: Some("Av. Siempre Viva 742".into()),
        }
    }

    #[test]
    fn blank_optionals_become_null() {
        let input = request().into_input().unwrap();
        assert_eq!(input.rut, "12.345.678-9");
        assert_eq!(input.email, None);
        assert_eq!(input.address.as_deref(), Some("Av. Siempre Viva 742"));
    }

    #[test]
    fn overlong_rut_is_rejected() {
        let mut req = request();
        req.rut = "12.345.678-9-0".into();
        assert!(matches!(req.into_input(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut req = request();
        req.email = Some("ana@".into());
        assert!(matches!(req.into_input(), Err(AppError::BadRequest(_))));
    }
}
