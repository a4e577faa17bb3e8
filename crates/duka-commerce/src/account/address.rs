//! Saved addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::{AddressId, UserId};
use crate::order::OrderAddress;
use crate::validation::FieldErrors;

/// What kind of place an address is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressLabel {
    Home,
    Work,
    Other,
}

impl AddressLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressLabel::Home => "home",
            AddressLabel::Work => "work",
            AddressLabel::Other => "other",
        }
    }
}

impl fmt::Display for AddressLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(AddressLabel::Home),
            "work" => Ok(AddressLabel::Work),
            "other" => Ok(AddressLabel::Other),
            other => Err(format!("unknown address label '{}'", other)),
        }
    }
}

/// An address stored in the customer's address book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedAddress {
    pub id: AddressId,
    pub user_id: UserId,
    pub is_default: bool,
    pub first_name: String,
    pub last_name: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<AddressLabel>,
}

impl SavedAddress {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The address as it would be printed on an order.
    pub fn to_order_address(&self) -> OrderAddress {
        OrderAddress {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address_line1.clone(),
            apartment: self.address_line2.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.postal_code.clone(),
            country: self.country.clone(),
            phone: self.phone_number.clone(),
        }
    }
}

/// Payload for creating an address. Every field is optional on the wire so
/// missing ones can be reported individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewAddress {
    pub is_default: bool,
    pub first_name: String,
    pub last_name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone_number: String,
    pub label: Option<AddressLabel>,
}

impl NewAddress {
    /// Every missing required field, as `"<field> is required"`.
    pub fn validate(&self) -> FieldErrors {
        let required = [
            ("firstName", self.first_name.as_str()),
            ("lastName", self.last_name.as_str()),
            ("addressLine1", self.address_line1.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("postalCode", self.postal_code.as_str()),
            ("country", self.country.as_str()),
            ("phoneNumber", self.phone_number.as_str()),
        ];

        let mut errors = FieldErrors::new();
        for (field, value) in required {
            errors.require(field, value, &format!("{} is required", field));
        }
        errors
    }

    /// Turn a validated payload into a stored address.
    pub fn into_saved(self, id: AddressId, user_id: UserId) -> SavedAddress {
        SavedAddress {
            id,
            user_id,
            is_default: self.is_default,
            first_name: self.first_name,
            last_name: self.last_name,
            address_line1: self.address_line1,
            address_line2: self.address_line2.filter(|l| !l.trim().is_empty()),
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
            phone_number: self.phone_number,
            label: self.label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> NewAddress {
        NewAddress {
            first_name: "Jane".into(),
            last_name: "Wanjiku".into(),
            address_line1: "12 Moi Avenue".into(),
            address_line2: Some("Suite 3".into()),
            city: "Mombasa".into(),
            state: "Mombasa County".into(),
            postal_code: "80100".into(),
            country: "Kenya".into(),
            phone_number: "+254700000001".into(),
            label: Some(AddressLabel::Work),
            ..Default::default()
        }
    }

    #[test]
    fn test_label_parses_any_case() {
        assert_eq!("Work".parse::<AddressLabel>(), Ok(AddressLabel::Work));
        assert_eq!(AddressLabel::Home.to_string(), "home");
        assert!("office".parse::<AddressLabel>().is_err());
    }

    #[test]
    fn test_complete_address_validates() {
        assert!(complete().validate().is_empty());
    }

    #[test]
    fn test_missing_fields_are_named() {
        let draft = NewAddress {
            city: String::new(),
            phone_number: " ".into(),
            ..complete()
        };
        let errors = draft.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("city"), Some("city is required"));
        assert_eq!(errors.get("phoneNumber"), Some("phoneNumber is required"));
    }

    #[test]
    fn test_deserialize_partial_payload() {
        let draft: NewAddress = serde_json::from_str(r#"{"firstName": "Jane"}"#).unwrap();
        assert_eq!(draft.first_name, "Jane");
        assert_eq!(draft.validate().len(), 7);
    }

    #[test]
    fn test_into_saved_and_order_address() {
        let saved = complete().into_saved(AddressId::new("addr-9"), UserId::new("1"));
        assert_eq!(saved.full_name(), "Jane Wanjiku");

        let order = saved.to_order_address();
        assert_eq!(order.address, "12 Moi Avenue");
        assert_eq!(order.apartment.as_deref(), Some("Suite 3"));
        assert_eq!(order.zip_code, "80100");
        assert_eq!(order.phone, "+254700000001");
    }
}
