use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request payload for leaving a competition. Free-tier users attach the
/// transaction id of their completed exit purchase.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveCompetitionRequest {
    pub transaction_id: Option<String>,
}

/// Response for the leave endpoint. The payment-required branch is returned
/// as HTTP 200 with `success: false` for compatibility with deployed
/// clients, so callers must branch on `success`, never on status alone.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveCompetitionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_payment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl LeaveCompetitionResponse {
    pub fn removed() -> Self {
        Self {
            success: true,
            error: None,
            requires_payment: None,
            amount: None,
            currency: None,
            product_id: None,
        }
    }

    pub fn payment_required(
        error: impl Into<String>,
        amount: f64,
        currency: impl Into<String>,
        product_id: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            requires_payment: Some(true),
            amount: Some(amount),
            currency: Some(currency.into()),
            product_id: Some(product_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_required_wire_shape() {
        let body = serde_json::to_value(LeaveCompetitionResponse::payment_required(
            "Payment required to leave this competition",
            2.99,
            "USD",
            "leave_competition",
        ))
        .expect("serializes");

        assert_eq!(body["success"], false);
        assert_eq!(body["requiresPayment"], true);
        assert_eq!(body["amount"], 2.99);
        assert_eq!(body["currency"], "USD");
        assert_eq!(body["productId"], "leave_competition");
    }

    #[test]
    fn test_removed_omits_payment_fields() {
        let body =
            serde_json::to_value(LeaveCompetitionResponse::removed()).expect("serializes");
        assert_eq!(body["success"], true);
        assert!(body.get("requiresPayment").is_none());
        assert!(body.get("error").is_none());
    }
}
