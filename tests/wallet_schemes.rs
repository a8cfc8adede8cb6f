//! Wallet deposits, scheme subscriptions and aims against a mock backend.

mod common;

use chrono::Utc;
use httpmock::prelude::*;
use rust_decimal_macros::dec;
use serde_json::json;

use common::{bearer, profile_body, scheme_body, signed_in_client};
use savings_portal_sdk::domain::aim::{AimsState, AimsView, PaymentCycle};
use savings_portal_sdk::domain::scheme::{SchemesState, SchemesView};
use savings_portal_sdk::domain::wallet::state::{DEPOSIT_FAILED, HISTORY_FAILED};
use savings_portal_sdk::domain::wallet::WalletView;
use savings_portal_sdk::shared::{Loadable, ToastKind};

fn history_body(balance: i64, deposits: serde_json::Value) -> serde_json::Value {
    json!({
        "success": true,
        "data": [{
            "wallet": [{
                "balance": balance, "credit": balance, "debit": 0,
                "paymentHistory": deposits
            }],
            "selectedSchemes": [],
            "aimPayments": []
        }]
    })
}

#[tokio::test]
async fn accepted_deposit_is_shown_before_the_refetch_confirms_it() {
    let server = MockServer::start_async().await;
    let deposit = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/wallet/payment")
                .header("authorization", bearer())
                .body_includes("\"transaction_id\":\"TXN42\"");
            then.status(200)
                .json_body(json!({"success": true, "message": "Deposit requested", "data": {}}));
        })
        .await;
    let history = server
        .mock_async(|when, then| {
            when.method(GET).path("/transaction");
            then.status(500).json_body(json!({"message": "database unavailable"}));
        })
        .await;

    let client = signed_in_client(&server);
    let mut view = WalletView::new();
    view.open_deposit();
    {
        let form = view.deposit_mut().unwrap();
        form.amount = "250".into();
        form.transaction_id = "  TXN42 ".into();
    }

    assert!(client.wallet().submit_deposit(&mut view).await.unwrap());
    deposit.assert_async().await;
    history.assert_async().await;

    let form = view.deposit().unwrap();
    assert!(form.succeeded);
    assert!(form.amount.is_empty() && form.transaction_id.is_empty());

    let top = &view.transactions()[0];
    assert!(top.unconfirmed);
    assert!(top.is_temporary());
    assert_eq!(top.amount, dec!(250));
    assert_eq!(top.status, "requested");
    assert_eq!(top.transaction_id.as_deref(), Some("TXN42"));
    assert_eq!(view.refresh_error(), Some(HISTORY_FAILED));
}

#[tokio::test]
async fn successful_refetch_replaces_the_local_entry() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/wallet/payment");
            then.status(200).json_body(json!({"success": true, "data": {}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/transaction");
            then.status(200).json_body(history_body(
                750,
                json!([{
                    "_id": "w9", "paid_amount": 250, "paidAt": Utc::now().to_rfc3339(),
                    "status": "requested", "transaction_id": "TXN42"
                }]),
            ));
        })
        .await;

    let client = signed_in_client(&server);
    let mut view = WalletView::new();
    view.open_deposit();
    {
        let form = view.deposit_mut().unwrap();
        form.amount = "250".into();
        form.transaction_id = "TXN42".into();
    }
    assert!(client.wallet().submit_deposit(&mut view).await.unwrap());

    assert_eq!(view.transactions().len(), 1);
    assert_eq!(view.transactions()[0].id, "w9");
    assert!(!view.transactions()[0].unconfirmed);
    assert_eq!(view.refresh_error(), None);
    assert_eq!(client.profile().wallet_balance().await, dec!(750));
}

#[tokio::test]
async fn rejected_deposit_keeps_the_input() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/wallet/payment");
            then.status(500).body("");
        })
        .await;
    let history = server
        .mock_async(|when, then| {
            when.method(GET).path("/transaction");
            then.status(200).json_body(history_body(0, json!([])));
        })
        .await;

    let client = signed_in_client(&server);
    let mut view = WalletView::new();
    view.open_deposit();
    {
        let form = view.deposit_mut().unwrap();
        form.amount = "99.5".into();
        form.transaction_id = "TXN7".into();
    }
    assert!(client.wallet().submit_deposit(&mut view).await.is_err());

    let form = view.deposit().unwrap();
    assert_eq!(form.error.as_deref(), Some(DEPOSIT_FAILED));
    assert_eq!(form.amount, "99.5");
    assert!(!form.succeeded);
    assert!(view.transactions().is_empty());
    history.assert_calls_async(0).await;
}

#[tokio::test]
async fn newer_profile_balance_wins_over_older_history() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/transaction");
            then.status(200).json_body(history_body(300, json!([])));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/profile");
            then.status(200).json_body(profile_body(None));
        })
        .await;

    let client = signed_in_client(&server);
    let mut view = WalletView::new();
    client.wallet().load(&mut view).await.unwrap();
    assert_eq!(view.overview().value().unwrap().summary.balance, dec!(300));

    client.profile().refresh_user().await;
    assert_eq!(client.profile().wallet_balance().await, dec!(500));
}

#[tokio::test]
async fn scheme_payment_without_kyc_raises_the_prompt() {
    let server = MockServer::start_async().await;
    let select = server
        .mock_async(|when, then| {
            when.method(POST).path("/scheme").body_includes("\"scheme_id\":\"s1\"");
            then.status(403)
                .json_body(json!({"message": "Please complete your KYC verification first"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/scheme");
            then.status(200).json_body(json!({"success": true, "data": [scheme_body()]}));
        })
        .await;

    let client = signed_in_client(&server);
    let mut state = SchemesState::new();
    state.show_catalog();
    client.schemes().load_catalog(&mut state).await;
    let scheme = state.catalog().value().unwrap()[0].clone();
    assert_eq!(scheme.name, "Gold Saver");

    state.select_scheme(scheme, 10);
    let err = client.schemes().submit_payment(&mut state).await.unwrap_err();
    select.assert_async().await;

    assert!(err.requires_kyc());
    assert!(state.kyc_prompt());
    assert!(state.toast().is_none());
    assert!(matches!(state.view(), SchemesView::Payment(_)));
}

#[tokio::test]
async fn scheme_payment_success_returns_to_subscriptions() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/scheme");
            then.status(201).json_body(json!({"success": true, "data": {}}));
        })
        .await;
    let subscriptions = server
        .mock_async(|when, then| {
            when.method(GET).path("/scheme-selected");
            then.status(200).json_body(json!({
                "success": true,
                "data": [{
                    "_id": "sel1",
                    "scheme_id": scheme_body(),
                    "balance_payout": 1100,
                    "payment_date": 10,
                    "payment_history": [{"_id": "p1", "paid_amount": 100, "paidAt": "2026-09-10T08:00:00Z"}]
                }]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/scheme");
            then.status(200).json_body(json!({"success": true, "data": [scheme_body()]}));
        })
        .await;

    let client = signed_in_client(&server);
    let mut state = SchemesState::new();
    state.show_catalog();
    client.schemes().load_catalog(&mut state).await;
    let scheme = state.catalog().value().unwrap()[0].clone();
    state.select_scheme(scheme, 10);

    assert!(client.schemes().submit_payment(&mut state).await.unwrap());
    subscriptions.assert_async().await;

    assert!(matches!(state.view(), SchemesView::Subscriptions));
    let toast = state.toast().unwrap();
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.message, "Payment setup successful for Gold Saver!");
    let subs = state.subscriptions().value().unwrap();
    assert_eq!(subs[0].paid_amount(), dec!(100));
    assert_eq!(subs[0].payments_remaining(), 11);
}

#[tokio::test]
async fn rejected_scheme_envelope_shows_server_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/scheme");
            then.status(200).json_body(json!({
                "success": false,
                "message": "Insufficient wallet balance",
                "data": null
            }));
        })
        .await;

    let client = signed_in_client(&server);
    let mut state = SchemesState::new();
    state.select_scheme(
        serde_json::from_value::<savings_portal_sdk::domain::scheme::wire::SchemeResponse>(
            scheme_body(),
        )
        .unwrap()
        .into(),
        3,
    );
    assert!(client.schemes().submit_payment(&mut state).await.is_err());
    assert_eq!(state.toast().unwrap().message, "Insufficient wallet balance");
    assert!(!state.kyc_prompt());
}

#[tokio::test]
async fn aim_is_calculated_then_created() {
    let server = MockServer::start_async().await;
    let calculate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/aim-calculation")
                .body_includes("\"payment_cycle\":\"monthly\"");
            then.status(200).json_body(json!({
                "success": true,
                "data": {"calculatedEmi": 200, "totalPayments": 10, "totalAmount": 2000, "endDate": "2027-08-18"}
            }));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/aim").body_includes("\"name\":\"New Car\"");
            then.status(201).json_body(json!({"success": true, "data": {}}));
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/aim");
            then.status(200).json_body(json!({
                "success": true,
                "data": [{
                    "_id": "aim1", "name": "New Car", "amount": 2000, "months": 10,
                    "payment_cycle": "monthly", "calculated_emi": 200, "current_saved": 0
                }]
            }));
        })
        .await;

    let client = signed_in_client(&server);
    let mut state = AimsState::new();
    state.show_add();
    {
        let form = state.form_mut().unwrap();
        form.set_name("New Car");
        form.set_amount("2000");
        form.set_months("10");
        form.set_payment_cycle(PaymentCycle::Monthly);
        assert!(!form.can_submit());
    }

    assert!(client.aims().calculate_form(&mut state).await.unwrap());
    calculate.assert_async().await;
    let calc = state.form_mut().unwrap().calculation().cloned().unwrap();
    assert_eq!(calc.calculated_emi, dec!(200));
    assert_eq!(calc.total_payments, 10);

    assert!(client.aims().submit(&mut state).await.unwrap());
    create.assert_async().await;
    list.assert_async().await;

    assert!(matches!(state.view(), AimsView::List));
    assert_eq!(state.toast().unwrap().message, "Aim \"New Car\" created successfully!");
    match state.aims() {
        Loadable::Loaded(aims) => assert_eq!(aims[0].name, "New Car"),
        other => panic!("aims should be loaded, got {:?}", other),
    }
}

#[tokio::test]
async fn kyc_rejection_on_aim_create_raises_the_prompt() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/aim-calculation");
            then.status(200).json_body(json!({
                "success": true,
                "data": {"calculatedEmi": 100, "totalPayments": 12, "totalAmount": 1200}
            }));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/aim");
            then.status(400).json_body(json!({"message": "User kyc not verified"}));
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/aim");
            then.status(200).json_body(json!({"success": true, "data": []}));
        })
        .await;

    let client = signed_in_client(&server);
    let mut state = AimsState::new();
    state.show_add();
    {
        let form = state.form_mut().unwrap();
        form.set_name("Holiday");
        form.set_amount("1200");
        form.set_months("12");
    }
    assert!(client.aims().calculate_form(&mut state).await.unwrap());

    let err = client.aims().submit(&mut state).await.unwrap_err();
    create.assert_async().await;
    assert!(err.requires_kyc());
    assert!(state.kyc_prompt());
    assert!(state.toast().is_none());

    let form = state.form_mut().expect("form stays open");
    assert_eq!(form.errors.general(), None);
    assert!(form.can_submit());
    list.assert_calls_async(0).await;
}
