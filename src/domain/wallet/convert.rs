//! Merge the three transaction histories into one timeline.

use super::wire::{AimPaymentResponse, PaymentRecordResponse, TransactionHistoryResponse};
use super::{
    sort_timeline, Transaction, TransactionKind, WalletOverview, WalletSummary,
    AIM_PAYMENT_DESCRIPTION, DEPOSIT_DESCRIPTION,
};

impl From<TransactionHistoryResponse> for WalletOverview {
    fn from(resp: TransactionHistoryResponse) -> Self {
        let mut wallets = resp.wallet.into_iter();
        let wallet = wallets.next().unwrap_or_default();
        let summary = WalletSummary {
            balance: wallet.balance,
            credit: wallet.credit,
            debit: wallet.debit,
        };

        let deposits = wallet
            .payment_history
            .into_iter()
            .map(|p| payment(p, TransactionKind::Deposit, DEPOSIT_DESCRIPTION.to_string()));

        let scheme_payments = resp.selected_schemes.into_iter().flat_map(|s| {
            let name = s.scheme_details.map(|d| d.name).unwrap_or_default();
            s.payment_history.into_iter().map(move |p| {
                payment(
                    p,
                    TransactionKind::SchemePayment,
                    format!("Payment for {}", name),
                )
            })
        });

        let aim_payments = resp.aim_payments.into_iter().map(aim_payment);

        let mut transactions: Vec<Transaction> =
            deposits.chain(scheme_payments).chain(aim_payments).collect();
        sort_timeline(&mut transactions);

        WalletOverview {
            summary,
            transactions,
        }
    }
}

fn payment(p: PaymentRecordResponse, kind: TransactionKind, description: String) -> Transaction {
    Transaction {
        id: p.id.map(|i| i.to_string()).unwrap_or_default(),
        kind,
        amount: p.paid_amount,
        date: p.paid_at,
        description,
        status: p.status.unwrap_or_default(),
        transaction_id: p.transaction_id,
        unconfirmed: false,
    }
}

fn aim_payment(p: AimPaymentResponse) -> Transaction {
    Transaction {
        id: p.id.map(|i| i.to_string()).unwrap_or_default(),
        kind: TransactionKind::AimPayment,
        amount: p.amount,
        date: p.created_at,
        description: AIM_PAYMENT_DESCRIPTION.to_string(),
        status: p.status.unwrap_or_default(),
        transaction_id: p.transaction_id,
        unconfirmed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HISTORY: &str = r#"{
        "wallet": [{
            "balance": 750, "credit": 1000, "debit": 250,
            "paymentHistory": [
                {"_id": "w1", "paid_amount": 1000, "paidAt": "2026-09-01T10:00:00Z", "status": "approved", "transaction_id": "TXN1"}
            ]
        }],
        "selectedSchemes": [{
            "schemeDetails": {"name": "Gold Saver"},
            "paymentHistory": [
                {"_id": "s1", "paid_amount": 200, "paidAt": "2026-09-05T10:00:00Z", "status": "paid"}
            ]
        }],
        "aimPayments": [
            {"_id": "a1", "amount": 50, "createdAt": "2026-09-03T10:00:00Z", "status": "paid"}
        ]
    }"#;

    #[test]
    fn test_merge_sorted_newest_first() {
        let resp: TransactionHistoryResponse = serde_json::from_str(HISTORY).unwrap();
        let overview = WalletOverview::from(resp);
        assert_eq!(overview.summary.balance, dec!(750));

        let rows: Vec<_> = overview
            .transactions
            .iter()
            .map(|t| (t.id.as_str(), t.description.as_str()))
            .collect();
        assert_eq!(
            rows,
            [
                ("s1", "Payment for Gold Saver"),
                ("a1", "AIM Payment"),
                ("w1", "Wallet Deposit"),
            ]
        );
        assert_eq!(overview.transactions[2].transaction_id.as_deref(), Some("TXN1"));
    }

    #[test]
    fn test_empty_history() {
        let overview = WalletOverview::from(TransactionHistoryResponse::default());
        assert!(overview.transactions.is_empty());
        assert_eq!(overview.summary, WalletSummary::default());
    }
}
