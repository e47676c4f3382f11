use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// A transaction id purchased more recently than this still matches even
/// when its id differs from the one the client sent.
const RECENCY_WINDOW_MINUTES: i64 = 10;

const REQUEST_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// The provider could not be reached or answered garbage. Retryable.
    #[error("payment provider request failed: {0}")]
    Provider(String),

    /// The provider answered but the receipt does not cover this purchase.
    #[error("receipt rejected: {0}")]
    Rejected(&'static str),
}

/// External payment ledger. Queried server-side only; a client-supplied
/// transaction id is never trusted until it is found here.
#[async_trait::async_trait]
pub trait PaymentVerifier: Send + Sync {
    async fn verify(
        &self,
        user_id: Uuid,
        transaction_id: &str,
        product_id: &str,
    ) -> Result<(), PaymentError>;
}

/// One purchase as reported by the payment provider.
#[derive(Debug, Clone)]
pub struct ReceiptEntry {
    pub transaction_id: String,
    pub product_id: String,
    pub purchased_at: DateTime<Utc>,
}

/// Match a claimed transaction against the user's receipts.
///
/// A receipt matches when the product is right and either the id is exactly
/// the one claimed, or the purchase happened within the last few minutes.
/// The fallback exists because the store client and the payment processor
/// do not always agree on the transaction id format. It also means a stolen
/// but very recent receipt id could be replayed by someone fast enough;
/// tolerable for a $2.99 unlock, not a pattern to copy for anything dearer.
pub fn receipt_matches(
    receipts: &[ReceiptEntry],
    transaction_id: &str,
    product_id: &str,
    now: DateTime<Utc>,
) -> bool {
    receipts.iter().any(|receipt| {
        receipt.product_id == product_id
            && (receipt.transaction_id == transaction_id
                || is_recent(receipt.purchased_at, now))
    })
}

fn is_recent(purchased_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let age = now - purchased_at;
    age >= Duration::zero() && age <= Duration::minutes(RECENCY_WINDOW_MINUTES)
}

/// RevenueCat-backed verifier: fetches the subscriber's one-time purchases
/// and matches the claimed transaction against them.
pub struct RevenueCatVerifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl RevenueCatVerifier {
    pub fn new(api_url: String, api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_url,
            api_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SubscriberEnvelope {
    subscriber: Subscriber,
}

#[derive(Debug, Deserialize)]
struct Subscriber {
    #[serde(default)]
    non_subscriptions: HashMap<String, Vec<Purchase>>,
}

#[derive(Debug, Deserialize)]
struct Purchase {
    id: String,
    purchase_date: DateTime<Utc>,
}

#[async_trait::async_trait]
impl PaymentVerifier for RevenueCatVerifier {
    async fn verify(
        &self,
        user_id: Uuid,
        transaction_id: &str,
        product_id: &str,
    ) -> Result<(), PaymentError> {
        let url = format!("{}/subscribers/{}", self.api_url, user_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| PaymentError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PaymentError::Provider(format!(
                "payment provider returned {}",
                response.status()
            )));
        }

        let envelope: SubscriberEnvelope = response
            .json()
            .await
            .map_err(|e| PaymentError::Provider(e.to_string()))?;

        let receipts: Vec<ReceiptEntry> = envelope
            .subscriber
            .non_subscriptions
            .into_iter()
            .flat_map(|(product, purchases)| {
                purchases.into_iter().map(move |p| ReceiptEntry {
                    transaction_id: p.id,
                    product_id: product.clone(),
                    purchased_at: p.purchase_date,
                })
            })
            .collect();

        if receipt_matches(&receipts, transaction_id, product_id, Utc::now()) {
            Ok(())
        } else {
            Err(PaymentError::Rejected(
                "no matching purchase found for this user",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(transaction_id: &str, product_id: &str, minutes_ago: i64) -> ReceiptEntry {
        ReceiptEntry {
            transaction_id: transaction_id.to_string(),
            product_id: product_id.to_string(),
            purchased_at: now() - Duration::minutes(minutes_ago),
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn test_exact_transaction_id_matches() {
        let receipts = vec![receipt("txn_123", "leave_competition", 120)];
        assert!(receipt_matches(&receipts, "txn_123", "leave_competition", now()));
    }

    #[test]
    fn test_recent_purchase_matches_despite_id_drift() {
        let receipts = vec![receipt("store_999", "leave_competition", 5)];
        assert!(receipt_matches(&receipts, "txn_123", "leave_competition", now()));
    }

    #[test]
    fn test_stale_purchase_with_different_id_does_not_match() {
        let receipts = vec![receipt("store_999", "leave_competition", 11)];
        assert!(!receipt_matches(&receipts, "txn_123", "leave_competition", now()));
    }

    #[test]
    fn test_wrong_product_never_matches() {
        // even an exact id on another product is not good enough
        let receipts = vec![receipt("txn_123", "coach_pack", 1)];
        assert!(!receipt_matches(&receipts, "txn_123", "leave_competition", now()));
    }

    #[test]
    fn test_future_dated_purchase_does_not_match_window() {
        let receipts = vec![ReceiptEntry {
            transaction_id: "store_999".to_string(),
            product_id: "leave_competition".to_string(),
            purchased_at: now() + Duration::minutes(5),
        }];
        assert!(!receipt_matches(&receipts, "txn_123", "leave_competition", now()));
    }

    #[test]
    fn test_empty_receipts_never_match() {
        assert!(!receipt_matches(&[], "txn_123", "leave_competition", now()));
    }
}
