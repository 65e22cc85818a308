mod common;

use fd_portal::error::ClientError;
use fd_portal::models::{
    CalculationRequest, CreateProductRequest, OpenAccountRequest, ProductStatus,
    UpdateProductRequest,
};
use fd_portal::session::KeyValueStorage;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn product(code: &str, status: &str) -> serde_json::Value {
    json!({
        "productCode": code,
        "productName": format!("{code} deposit"),
        "minAmount": 1000.0,
        "minTermMonths": 6,
        "maxTermMonths": 60,
        "baseInterestRate": 7.1,
        "status": status
    })
}

#[tokio::test]
async fn products_decode_from_a_paged_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "content": [product("FD12", "ACTIVE"), product("FD24", "DRAFT")], "totalElements": 2 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products/FD12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product("FD12", "ACTIVE")))
        .mount(&server)
        .await;

    let (state, _) = common::app_state(&server.uri());

    let products = state.products.list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].status, Some(ProductStatus::Draft));

    let single = state.products.get_product("FD12").await.unwrap();
    assert_eq!(single.product_code, "FD12");
}

#[tokio::test]
async fn product_writes_are_validated_and_sent_with_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .and(header("authorization", "Bearer admin-token"))
        .and(body_partial_json(json!({ "productCode": "FD36", "maxTermMonths": 36 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": product("FD36", "DRAFT")
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/products/FD36"))
        .and(body_partial_json(json!({ "status": "ACTIVE" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(product("FD36", "ACTIVE")))
        .expect(1)
        .mount(&server)
        .await;

    let (state, storage) = common::app_state(&server.uri());
    common::seed_session(&storage, "admin-token", Some("r1"));

    let mut request = CreateProductRequest {
        product_code: "FD36".into(),
        product_name: "Three year deposit".into(),
        description: None,
        currency: Some("INR".into()),
        min_amount: 1000.0,
        max_amount: Some(500.0),
        min_term_months: 12,
        max_term_months: 36,
        base_interest_rate: 7.5,
        compounding_frequency: None,
    };
    let err = state.products.create_product(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));

    request.max_amount = None;
    let created = state.products.create_product(&request).await.unwrap();
    assert_eq!(created.status, Some(ProductStatus::Draft));

    let update = UpdateProductRequest {
        status: Some(ProductStatus::Active),
        ..UpdateProductRequest::default()
    };
    let updated = state.products.update_product("FD36", &update).await.unwrap();
    assert_eq!(updated.status, Some(ProductStatus::Active));
}

#[tokio::test]
async fn profile_records_customer_number_used_when_opening_accounts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profiles/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "customerNumber": "C-1001", "fullName": "Asha Rao", "email": "c@b.com" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/accounts"))
        .and(body_partial_json(json!({ "customerNumber": "C-1001", "calculationId": "calc-9" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {
                "accountNumber": "FD-0001",
                "productCode": "FD12",
                "customerNumber": "C-1001",
                "principalAmount": 50000.0,
                "interestRate": 7.25,
                "tenureMonths": 12,
                "status": "ACTIVE"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (state, storage) = common::app_state(&server.uri());
    common::seed_session(&storage, &common::customer_token(), Some("r1"));

    let profile = state.profiles.my_profile().await.unwrap();
    assert_eq!(profile.initials(), "AR");
    assert_eq!(storage.get("customerNumber").unwrap().as_deref(), Some("C-1001"));

    let account = state
        .accounts
        .open_account(&OpenAccountRequest {
            product_code: "FD12".into(),
            principal_amount: 50000.0,
            tenure_months: 12,
            customer_number: None,
            calculation_id: Some("calc-9".into()),
        })
        .await
        .unwrap();
    assert_eq!(account.account_number, "FD-0001");
}

#[tokio::test]
async fn calculation_history_accepts_bare_lists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/fd/calculations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "calculationId": "calc-1",
            "principalAmount": 10000.0,
            "interestRate": 7.0,
            "tenureMonths": 12,
            "maturityAmount": 10723.0
        }])))
        .mount(&server)
        .await;

    let (state, storage) = common::app_state(&server.uri());
    common::seed_session(&storage, "a1", Some("r1"));

    let history = state.calculator.history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].calculation_id.as_deref(), Some("calc-1"));
}

#[tokio::test]
async fn invalid_calculation_never_reaches_the_backend() {
    let server = MockServer::start().await;
    let (state, _) = common::app_state(&server.uri());

    let err = state
        .calculator
        .calculate(&CalculationRequest {
            product_code: "FD12".into(),
            principal_amount: 10000.0,
            tenure_months: 0,
            compounding_frequency: None,
            customer_category: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
