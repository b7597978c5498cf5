//! Request bodies sent to the provider.

use bazaar_commerce::Money;
use serde::Serialize;

/// `POST /v1/orders` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    /// 1 = capture automatically on authorization.
    pub payment_capture: u8,
}

impl CreateOrderRequest {
    pub fn new(amount: &Money, receipt: impl Into<String>) -> Self {
        Self {
            amount: amount.amount_minor,
            currency: amount.currency.code().to_string(),
            receipt: receipt.into(),
            payment_capture: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_commerce::Currency;

    #[test]
    fn test_body_shape() {
        let body = CreateOrderRequest::new(&Money::new(116_200, Currency::INR), "ord-1");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "amount": 116200,
                "currency": "INR",
                "receipt": "ord-1",
                "payment_capture": 1
            })
        );
    }
}
