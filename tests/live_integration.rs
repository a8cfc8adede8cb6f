//! Smoke test against a running portal backend.
//!
//! Ignored by default because it needs a live server and a test account.
//! Configure through the environment or a `.env` file:
//!
//! ```text
//! PORTAL_API_URL=http://localhost:8000
//! PORTAL_TEST_EMAIL=...
//! PORTAL_TEST_PASSWORD=...
//! ```
//!
//! Run with:
//! ```bash
//! cargo test --test live_integration -- --ignored
//! ```

use savings_portal_sdk::client::PortalClient;
use savings_portal_sdk::domain::profile::FetchOutcome;
use savings_portal_sdk::domain::scheme::SchemesState;
use savings_portal_sdk::domain::wallet::WalletView;

fn credentials() -> (String, String) {
    dotenvy::dotenv().ok();
    let email = std::env::var("PORTAL_TEST_EMAIL").expect("PORTAL_TEST_EMAIL not set");
    let password = std::env::var("PORTAL_TEST_PASSWORD").expect("PORTAL_TEST_PASSWORD not set");
    (email, password)
}

#[tokio::test]
#[ignore]
async fn login_and_read_every_screen() {
    let (email, password) = credentials();
    let client = PortalClient::from_env().expect("client should build");

    client.auth().login(&email, &password).await.expect("login failed");
    assert!(client.auth().is_authenticated().await);

    assert_eq!(client.profile().fetch_user(false).await, FetchOutcome::Loaded);
    let user = client.profile().user().await.expect("profile cached");
    println!("Signed in as {} <{}>", user.full_name(), user.email);

    let mut schemes = SchemesState::new();
    client.schemes().load_catalog(&mut schemes).await;
    client.schemes().load_subscriptions(&mut schemes).await;
    assert!(schemes.catalog().error().is_none(), "{:?}", schemes.catalog());
    assert!(schemes.subscriptions().error().is_none());

    let mut wallet = WalletView::new();
    client.wallet().load(&mut wallet).await.expect("history failed");
    println!("{} transactions", wallet.transactions().len());

    let kyc = client.kyc().get().await.expect("kyc fetch failed");
    println!("KYC: {:?}", kyc.map(|r| r.status));

    client.auth().logout().await.unwrap();
    assert!(client.profile().user().await.is_none());
}
