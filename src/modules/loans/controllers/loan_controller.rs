// HTTP handlers for loan endpoints
//
// Endpoints:
// - POST /api/loans                        - Originate a loan
// - GET  /api/loans?customer_id={id}       - List a customer's loans
// - GET  /api/loans/{loan_id}/installments - List a loan's installments
// - POST /api/loans/{loan_id}/pay          - Pay against a loan

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::config::Config;
use crate::core::Result;
use crate::modules::loans::models::{Loan, LoanInstallment};
use crate::modules::loans::services::LoanService;

#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    pub customer_id: String,
    pub amount: Decimal,
    pub interest_rate: Decimal,
    pub number_of_installments: i32,
}

#[derive(Debug, Deserialize)]
pub struct ListLoansQuery {
    pub customer_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PayLoanRequest {
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct LoanResponse {
    pub id: String,
    pub customer_id: String,
    pub loan_amount: Decimal,
    pub number_of_installments: i32,
    pub is_paid: bool,
    pub create_date: String,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id,
            customer_id: loan.customer_id,
            loan_amount: loan.loan_amount,
            number_of_installments: loan.number_of_installments,
            is_paid: loan.is_paid,
            create_date: loan.create_date.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InstallmentResponse {
    pub id: String,
    pub loan_id: String,
    pub amount: Decimal,
    pub paid_amount: Decimal,
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,
    pub is_paid: bool,
}

impl From<LoanInstallment> for InstallmentResponse {
    fn from(installment: LoanInstallment) -> Self {
        Self {
            id: installment.id,
            loan_id: installment.loan_id,
            amount: installment.amount,
            paid_amount: installment.paid_amount,
            due_date: installment.due_date.to_string(),
            payment_date: installment.payment_date.map(|date| date.to_string()),
            is_paid: installment.is_paid,
        }
    }
}

fn loan_service(pool: &web::Data<MySqlPool>, config: &web::Data<Config>) -> LoanService {
    LoanService::mysql(pool.get_ref().clone())
        .with_payment_window(config.app.payment_window_months)
}

/// POST /api/loans
pub async fn create_loan(
    request: web::Json<CreateLoanRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let service = loan_service(&pool, &config);
    let request = request.into_inner();

    let loan = service
        .create_loan(
            &request.customer_id,
            request.amount,
            request.interest_rate,
            request.number_of_installments,
        )
        .await?;

    Ok(HttpResponse::Created().json(LoanResponse::from(loan)))
}

/// GET /api/loans?customer_id={id}
pub async fn list_loans(
    query: web::Query<ListLoansQuery>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let service = loan_service(&pool, &config);

    let loans = service.get_loans_by_customer(&query.customer_id).await?;
    let response: Vec<LoanResponse> = loans.into_iter().map(LoanResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/loans/{loan_id}/installments
pub async fn list_installments(
    loan_id: web::Path<String>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let service = loan_service(&pool, &config);

    let installments = service.get_installments_by_loan(&loan_id).await?;
    let response: Vec<InstallmentResponse> = installments
        .into_iter()
        .map(InstallmentResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/loans/{loan_id}/pay
pub async fn pay_loan(
    loan_id: web::Path<String>,
    request: web::Json<PayLoanRequest>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    let service = loan_service(&pool, &config);

    let result = service.pay_loan(&loan_id, request.amount).await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Configure loan routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/loans")
            .route("", web::post().to(create_loan))
            .route("", web::get().to(list_loans))
            .route("/{loan_id}/installments", web::get().to(list_installments))
            .route("/{loan_id}/pay", web::post().to(pay_loan)),
    );
}
