use std::sync::Arc;
use std::time::Duration;
use storage::Database;
use uuid::Uuid;

use crate::collaborators::notify::{LogDispatcher, NotificationDispatcher};
use crate::collaborators::payment::{PaymentVerifier, RevenueCatVerifier};
use crate::config::Config;
use crate::middleware::auth::JwtKeys;
use crate::util::{KeyedTtl, SyncGuard};

/// What leaving a competition costs on the free tier, echoed back to
/// clients in the payment-required response.
#[derive(Debug, Clone)]
pub struct LeaveTerms {
    pub product_id: String,
    pub amount: f64,
    pub currency: String,
}

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtKeys,
    pub payments: Arc<dyn PaymentVerifier>,
    pub notifier: Arc<dyn NotificationDispatcher>,
    pub sync_guard: Arc<SyncGuard>,
    /// One winner announcement per competition per window.
    pub winner_marks: Arc<KeyedTtl<Uuid>>,
    pub leave_terms: LeaveTerms,
}

const WINNER_MARK_TTL: Duration = Duration::from_secs(24 * 60 * 60);

impl AppState {
    pub fn new(config: &Config, db: Database) -> Self {
        Self {
            db,
            jwt: JwtKeys::new(&config.jwt_secret),
            payments: Arc::new(RevenueCatVerifier::new(
                config.payment.api_url.clone(),
                config.payment.api_key.clone(),
            )),
            notifier: Arc::new(LogDispatcher),
            sync_guard: Arc::new(SyncGuard::new()),
            winner_marks: Arc::new(KeyedTtl::new(WINNER_MARK_TTL)),
            leave_terms: LeaveTerms {
                product_id: config.payment.leave_product_id.clone(),
                amount: config.payment.leave_price,
                currency: config.payment.leave_currency.clone(),
            },
        }
    }
}
