//! Shipping address captured at checkout.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;

/// Where an order ships to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingInfo {
    /// Street address.
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    /// Contact phone number.
    pub phone: String,
}

impl ShippingInfo {
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
            phone: phone.into(),
        }
    }

    /// Every field is required.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let fields = [
            ("address", &self.address),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
            ("phone", &self.phone),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CommerceError::ValidationError(format!(
                    "shipping {name} is required"
                )));
            }
        }
        if !self
            .phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '))
        {
            return Err(CommerceError::ValidationError(
                "shipping phone may only contain digits, spaces, '+' and '-'".into(),
            ));
        }
        Ok(())
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        format!(
            "{}, {} {}, {}",
            self.address, self.city, self.postal_code, self.country
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_all_fields() {
        let info = ShippingInfo::new("12 MG Road", "Pune", "411001", "India", "+91 98765 43210");
        assert!(info.validate().is_ok());

        let missing_city = ShippingInfo {
            city: "  ".into(),
            ..info.clone()
        };
        assert!(missing_city.validate().is_err());

        let bad_phone = ShippingInfo {
            phone: "call me".into(),
            ..info
        };
        assert!(bad_phone.validate().is_err());
    }
}
