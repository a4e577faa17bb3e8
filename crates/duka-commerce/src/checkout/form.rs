//! Checkout form data and the per-step validation gates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::account::SavedAddress;
use crate::checkout::ShippingTier;
use crate::order::OrderAddress;
use crate::validation::{is_valid_email, FieldErrors};

const DEFAULT_COUNTRY: &str = "Kenya";

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Paypal,
    Mpesa,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Mpesa => "mpesa",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::Mpesa => "M-Pesa",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "credit_card" | "card" => Ok(PaymentMethod::CreditCard),
            "paypal" => Ok(PaymentMethod::Paypal),
            "mpesa" | "m_pesa" => Ok(PaymentMethod::Mpesa),
            other => Err(format!("unknown payment method '{}'", other)),
        }
    }
}

/// Everything the customer enters across the checkout steps.
///
/// Deserializes from partial input: absent fields take the defaults of a
/// fresh checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutFormData {
    // Contact
    pub email: String,

    // Shipping address
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,

    pub shipping_method: ShippingTier,

    // Payment
    pub payment_method: PaymentMethod,
    pub card_number: String,
    pub card_expiry: String,
    pub card_cvv: String,
    pub name_on_card: String,
    pub mpesa_phone: String,

    // Billing address, only read when `same_as_shipping` is false
    pub same_as_shipping: bool,
    pub billing_first_name: String,
    pub billing_last_name: String,
    pub billing_address: String,
    pub billing_apartment: Option<String>,
    pub billing_city: String,
    pub billing_state: String,
    pub billing_zip_code: String,
    pub billing_country: String,
}

impl Default for CheckoutFormData {
    fn default() -> Self {
        Self {
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            address: String::new(),
            apartment: None,
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            phone: String::new(),
            shipping_method: ShippingTier::default(),
            payment_method: PaymentMethod::default(),
            card_number: String::new(),
            card_expiry: String::new(),
            card_cvv: String::new(),
            name_on_card: String::new(),
            mpesa_phone: String::new(),
            same_as_shipping: true,
            billing_first_name: String::new(),
            billing_last_name: String::new(),
            billing_address: String::new(),
            billing_apartment: None,
            billing_city: String::new(),
            billing_state: String::new(),
            billing_zip_code: String::new(),
            billing_country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl CheckoutFormData {
    /// Gate for leaving the information step.
    pub fn validate_information(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.email.trim().is_empty() {
            errors.push("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.push("email", "Email is invalid");
        }

        errors.require("firstName", &self.first_name, "First name is required");
        errors.require("lastName", &self.last_name, "Last name is required");
        errors.require("address", &self.address, "Address is required");
        errors.require("city", &self.city, "City is required");
        errors.require("state", &self.state, "State/County is required");
        errors.require("zipCode", &self.zip_code, "Postal/Zip code is required");
        errors.require("phone", &self.phone, "Phone number is required");
        errors
    }

    /// Gate for leaving the payment step.
    pub fn validate_payment(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        match self.payment_method {
            PaymentMethod::CreditCard => {
                errors.require("cardNumber", &self.card_number, "Card number is required");
                errors.require("cardExpiry", &self.card_expiry, "Expiration date is required");
                errors.require("cardCvv", &self.card_cvv, "CVV is required");
                errors.require("nameOnCard", &self.name_on_card, "Name on card is required");
            }
            PaymentMethod::Mpesa => {
                errors.require("mpesaPhone", &self.mpesa_phone, "M-Pesa phone number is required");
            }
            PaymentMethod::Paypal => {}
        }

        if !self.same_as_shipping {
            errors.require("billingFirstName", &self.billing_first_name, "First name is required");
            errors.require("billingLastName", &self.billing_last_name, "Last name is required");
            errors.require("billingAddress", &self.billing_address, "Address is required");
            errors.require("billingCity", &self.billing_city, "City is required");
            errors.require("billingState", &self.billing_state, "County/State is required");
            errors.require("billingZipCode", &self.billing_zip_code, "Postal/Zip code is required");
        }
        errors
    }

    /// Shipping address as it goes on the order.
    pub fn shipping_address(&self) -> OrderAddress {
        OrderAddress {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
            apartment: self.apartment.clone().filter(|a| !a.trim().is_empty()),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            country: self.country.clone(),
            phone: self.phone.clone(),
        }
    }

    /// Billing address: the shipping address unless a separate one was entered.
    pub fn billing_address(&self) -> OrderAddress {
        if self.same_as_shipping {
            return self.shipping_address();
        }
        OrderAddress {
            first_name: self.billing_first_name.clone(),
            last_name: self.billing_last_name.clone(),
            address: self.billing_address.clone(),
            apartment: self.billing_apartment.clone().filter(|a| !a.trim().is_empty()),
            city: self.billing_city.clone(),
            state: self.billing_state.clone(),
            zip_code: self.billing_zip_code.clone(),
            country: self.billing_country.clone(),
            phone: self.phone.clone(),
        }
    }

    /// Pre-fill the shipping section from an address-book entry.
    pub fn apply_saved_address(&mut self, saved: &SavedAddress) {
        self.first_name = saved.first_name.clone();
        self.last_name = saved.last_name.clone();
        self.address = saved.address_line1.clone();
        self.apartment = saved.address_line2.clone();
        self.city = saved.city.clone();
        self.state = saved.state.clone();
        self.zip_code = saved.postal_code.clone();
        self.country = saved.country.clone();
        self.phone = saved.phone_number.clone();
    }

    /// One-line payment description without exposing card details,
    /// e.g. `Credit Card **** **** **** 4242`.
    pub fn payment_summary(&self) -> String {
        match self.payment_method {
            PaymentMethod::CreditCard => {
                let digits: Vec<char> = self
                    .card_number
                    .chars()
                    .filter(|c| c.is_ascii_digit())
                    .collect();
                let last4: String = digits[digits.len().saturating_sub(4)..].iter().collect();
                format!("Credit Card **** **** **** {}", last4)
            }
            PaymentMethod::Mpesa => format!("M-Pesa {}", self.mpesa_phone),
            PaymentMethod::Paypal => "PayPal".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{AddressId, UserId};

    fn filled() -> CheckoutFormData {
        CheckoutFormData {
            email: "jane@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            address: "123 Main St".into(),
            city: "Nairobi".into(),
            state: "Nairobi County".into(),
            zip_code: "00100".into(),
            phone: "+254712345678".into(),
            card_number: "4242 4242 4242 4242".into(),
            card_expiry: "12/29".into(),
            card_cvv: "123".into(),
            name_on_card: "Jane Doe".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let form = CheckoutFormData::default();
        assert_eq!(form.country, "Kenya");
        assert_eq!(form.billing_country, "Kenya");
        assert_eq!(form.shipping_method, ShippingTier::Standard);
        assert_eq!(form.payment_method, PaymentMethod::CreditCard);
        assert!(form.same_as_shipping);
    }

    #[test]
    fn test_information_gate_reports_every_field() {
        let errors = CheckoutFormData::default().validate_information();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["email", "firstName", "lastName", "address", "city", "state", "zipCode", "phone"]
        );
        assert_eq!(errors.get("state"), Some("State/County is required"));
        assert!(filled().validate_information().is_empty());
    }

    #[test]
    fn test_information_gate_checks_email_shape() {
        let form = CheckoutFormData {
            email: "jane@example".into(),
            ..filled()
        };
        let errors = form.validate_information();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Email is invalid"));
    }

    #[test]
    fn test_payment_gate_per_method() {
        let card = CheckoutFormData {
            card_cvv: String::new(),
            ..filled()
        };
        assert_eq!(card.validate_payment().get("cardCvv"), Some("CVV is required"));

        let mpesa = CheckoutFormData {
            payment_method: PaymentMethod::Mpesa,
            ..CheckoutFormData::default()
        };
        let errors = mpesa.validate_payment();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("mpesaPhone"), Some("M-Pesa phone number is required"));

        let paypal = CheckoutFormData {
            payment_method: PaymentMethod::Paypal,
            ..CheckoutFormData::default()
        };
        assert!(paypal.validate_payment().is_empty());
    }

    #[test]
    fn test_payment_gate_checks_separate_billing() {
        let form = CheckoutFormData {
            same_as_shipping: false,
            billing_first_name: "Jane".into(),
            ..filled()
        };
        let errors = form.validate_payment();
        assert_eq!(errors.len(), 5);
        assert!(!errors.contains("billingFirstName"));
        assert_eq!(errors.get("billingState"), Some("County/State is required"));
    }

    #[test]
    fn test_billing_address_follows_flag() {
        let mut form = filled();
        assert_eq!(form.billing_address(), form.shipping_address());

        form.same_as_shipping = false;
        form.billing_first_name = "Acme".into();
        form.billing_city = "Kisumu".into();
        let billing = form.billing_address();
        assert_eq!(billing.first_name, "Acme");
        assert_eq!(billing.city, "Kisumu");
        assert_eq!(billing.country, "Kenya");
    }

    #[test]
    fn test_apply_saved_address() {
        let saved = SavedAddress {
            id: AddressId::new("addr-2"),
            user_id: UserId::new("1"),
            is_default: false,
            first_name: "John".into(),
            last_name: "Doe".into(),
            address_line1: "456 Work Avenue".into(),
            address_line2: Some("Floor 5".into()),
            city: "Nairobi".into(),
            state: "Nairobi County".into(),
            postal_code: "00200".into(),
            country: "Kenya".into(),
            phone_number: "+254787654321".into(),
            label: None,
        };

        let mut form = CheckoutFormData {
            email: "john@example.com".into(),
            ..Default::default()
        };
        form.apply_saved_address(&saved);

        assert!(form.validate_information().is_empty());
        assert_eq!(form.shipping_address(), saved.to_order_address());
    }

    #[test]
    fn test_payment_summary_masks_card() {
        assert_eq!(filled().payment_summary(), "Credit Card **** **** **** 4242");
        let paypal = CheckoutFormData {
            payment_method: PaymentMethod::Paypal,
            ..filled()
        };
        assert_eq!(paypal.payment_summary(), "PayPal");
    }

    #[test]
    fn test_partial_deserialization() {
        let form: CheckoutFormData = serde_json::from_str(
            r#"{"email": "a@b.co", "shippingMethod": "express", "paymentMethod": "mpesa"}"#,
        )
        .unwrap();
        assert_eq!(form.shipping_method, ShippingTier::Express);
        assert_eq!(form.payment_method, PaymentMethod::Mpesa);
        assert_eq!(form.country, "Kenya");
        assert!(form.same_as_shipping);
    }
}
