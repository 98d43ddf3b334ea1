// HTTP handlers for customer endpoints
//
// Endpoints:
// - POST   /api/customers        - Create a customer
// - GET    /api/customers        - List customers
// - GET    /api/customers/{id}   - Get a customer
// - PUT    /api/customers/{id}   - Update name, surname and credit limit
// - DELETE /api/customers/{id}   - Delete a customer

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::customers::models::Customer;
use crate::modules::customers::services::CustomerService;

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub surname: String,
    pub credit_limit: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: String,
    pub surname: String,
    pub credit_limit: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub credit_limit: Decimal,
    pub used_credit_limit: Decimal,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            surname: customer.surname,
            credit_limit: customer.credit_limit,
            used_credit_limit: customer.used_credit_limit,
        }
    }
}

/// POST /api/customers
pub async fn create_customer(
    request: web::Json<CreateCustomerRequest>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let service = CustomerService::mysql(pool.get_ref().clone());
    let request = request.into_inner();

    let customer = service
        .create(request.name, request.surname, request.credit_limit)
        .await?;

    Ok(HttpResponse::Created().json(CustomerResponse::from(customer)))
}

/// GET /api/customers/{id}
pub async fn get_customer(
    customer_id: web::Path<String>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let service = CustomerService::mysql(pool.get_ref().clone());

    let customer = service.get(&customer_id).await?;

    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

/// GET /api/customers
pub async fn list_customers(pool: web::Data<MySqlPool>) -> Result<HttpResponse> {
    let service = CustomerService::mysql(pool.get_ref().clone());

    let customers = service.list().await?;
    let response: Vec<CustomerResponse> =
        customers.into_iter().map(CustomerResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/customers/{id}
pub async fn update_customer(
    customer_id: web::Path<String>,
    request: web::Json<UpdateCustomerRequest>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let service = CustomerService::mysql(pool.get_ref().clone());
    let request = request.into_inner();

    let customer = service
        .update(
            &customer_id,
            request.name,
            request.surname,
            request.credit_limit,
        )
        .await?;

    Ok(HttpResponse::Ok().json(CustomerResponse::from(customer)))
}

/// DELETE /api/customers/{id}
pub async fn delete_customer(
    customer_id: web::Path<String>,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse> {
    let service = CustomerService::mysql(pool.get_ref().clone());

    service.delete(&customer_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure customer routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/customers")
            .route("", web::post().to(create_customer))
            .route("", web::get().to(list_customers))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}", web::put().to(update_customer))
            .route("/{id}", web::delete().to(delete_customer)),
    );
}
