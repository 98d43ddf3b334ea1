// Full lifecycle against the in-memory engine: open a customer, originate
// a loan, pay it down across several calls, and close a loan whose
// remaining installments sit inside the payment window.

use std::sync::Arc;

use chrono::{Days, Utc};
use creditline::customers::{CustomerService, InMemoryCustomerStore};
use creditline::loans::models::{Loan, LoanInstallment};
use creditline::loans::{
    InMemoryInstallmentStore, InMemoryLoanStore, InstallmentStore, LoanService, LoanStore,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct App {
    loans: LoanService,
    ledger: CustomerService,
    loan_store: Arc<InMemoryLoanStore>,
    installment_store: Arc<InMemoryInstallmentStore>,
}

fn app() -> App {
    let customer_store = Arc::new(InMemoryCustomerStore::new());
    let loan_store = Arc::new(InMemoryLoanStore::new());
    let installment_store = Arc::new(InMemoryInstallmentStore::new());

    App {
        loans: LoanService::new(
            loan_store.clone(),
            installment_store.clone(),
            CustomerService::new(customer_store.clone()),
        ),
        ledger: CustomerService::new(customer_store),
        loan_store,
        installment_store,
    }
}

#[tokio::test]
async fn test_originate_and_pay_down() {
    let app = app();

    let customer = app
        .ledger
        .create("Grace".to_string(), "Hopper".to_string(), dec!(1000))
        .await
        .unwrap();

    let loan = app
        .loans
        .create_loan(&customer.id, dec!(100), dec!(0.2), 6)
        .await
        .unwrap();
    assert_eq!(loan.loan_amount, dec!(120.00));

    // Reservation took the full repayable amount
    let customer_after = app.ledger.get(&customer.id).await.unwrap();
    assert_eq!(customer_after.used_credit_limit, dec!(120.00));

    // Schedule landed with the loan
    let installments = app.loans.get_installments_by_loan(&loan.id).await.unwrap();
    assert_eq!(installments.len(), 6);
    assert!(installments.windows(2).all(|w| w[0].due_date < w[1].due_date));

    // First payment clears the two nearest installments
    let first = app.loans.pay_loan(&loan.id, dec!(45)).await.unwrap();
    assert_eq!(first.installments_paid, 2);
    assert_eq!(first.total_amount_paid, dec!(40.00));
    assert!(!first.loan_fully_paid);

    // Ledger released exactly what was consumed
    let customer_after = app.ledger.get(&customer.id).await.unwrap();
    assert_eq!(customer_after.used_credit_limit, dec!(80.00));

    // Paid installments carry their full amount and a payment date
    let installments = app.loans.get_installments_by_loan(&loan.id).await.unwrap();
    let paid: Vec<&LoanInstallment> = installments.iter().filter(|i| i.is_paid).collect();
    assert_eq!(paid.len(), 2);
    for inst in paid {
        assert_eq!(inst.paid_amount, dec!(20.00));
        assert!(inst.payment_date.is_some());
    }

    // A second undersized payment is a no-op
    let second = app.loans.pay_loan(&loan.id, dec!(10)).await.unwrap();
    assert_eq!(second.installments_paid, 0);
    assert_eq!(second.total_amount_paid, Decimal::ZERO);

    let customer_after = app.ledger.get(&customer.id).await.unwrap();
    assert_eq!(customer_after.used_credit_limit, dec!(80.00));
}

#[tokio::test]
async fn test_pay_to_closure_releases_all_reserved_credit() {
    let app = app();

    let customer = app
        .ledger
        .create("Grace".to_string(), "Hopper".to_string(), dec!(500))
        .await
        .unwrap();

    // A seasoned loan: two installments left, both due inside the window
    let today = Utc::now().date_naive();
    let loan = Loan::new(customer.id.clone(), dec!(240.00), 6, today);
    app.loan_store.insert(&loan).await.unwrap();

    let mut paid_history: Vec<LoanInstallment> = (1..=4u64)
        .map(|i| {
            LoanInstallment::new(
                loan.id.clone(),
                dec!(40.00),
                today.checked_sub_days(Days::new(30 * i)).unwrap(),
            )
        })
        .collect();
    for inst in paid_history.iter_mut() {
        inst.mark_paid(today.checked_sub_days(Days::new(10)).unwrap())
            .unwrap();
    }
    let outstanding = vec![
        LoanInstallment::new(
            loan.id.clone(),
            dec!(40.00),
            today.checked_add_days(Days::new(15)).unwrap(),
        ),
        LoanInstallment::new(
            loan.id.clone(),
            dec!(40.00),
            today.checked_add_days(Days::new(45)).unwrap(),
        ),
    ];
    app.installment_store.insert_batch(&paid_history).await.unwrap();
    app.installment_store.insert_batch(&outstanding).await.unwrap();
    app.ledger.adjust_used(&customer.id, dec!(80.00)).await.unwrap();

    let result = app.loans.pay_loan(&loan.id, dec!(100)).await.unwrap();

    assert_eq!(result.installments_paid, 2);
    assert_eq!(result.total_amount_paid, dec!(80.00));
    assert!(result.loan_fully_paid);

    let loan = app.loan_store.find_by_id(&loan.id).await.unwrap().unwrap();
    assert!(loan.is_paid);

    let customer = app.ledger.get(&customer.id).await.unwrap();
    assert_eq!(customer.used_credit_limit, Decimal::ZERO);

    // Nothing outstanding remains
    let unpaid = app
        .installment_store
        .find_unpaid_by_loan_ordered_by_due_date(&loan.id)
        .await
        .unwrap();
    assert!(unpaid.is_empty());

    // The freed limit is usable for a new loan
    let next = app
        .loans
        .create_loan(&customer.id, dec!(400), dec!(0.25), 9)
        .await
        .unwrap();
    assert_eq!(next.loan_amount, dec!(500.00));

    let loans = app.loans.get_loans_by_customer(&customer.id).await.unwrap();
    assert_eq!(loans.len(), 2);
}
