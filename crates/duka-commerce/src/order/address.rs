//! Address as recorded on an order.

use serde::{Deserialize, Serialize};

/// A postal address attached to an order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
    pub city: String,
    /// State or county.
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub phone: String,
}

impl OrderAddress {
    /// Get full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address.clone()];
        if let Some(apartment) = self.apartment.as_ref().filter(|a| !a.is_empty()) {
            parts.push(apartment.clone());
        }
        parts.push(self.city.clone());
        parts.push(self.state.clone());
        parts.push(self.zip_code.clone());
        parts.push(self.country.clone());
        parts.join(", ")
    }

    /// Format as multi-line, the way it is printed on a receipt.
    pub fn multi_line(&self) -> String {
        let mut lines = vec![self.full_name(), self.address.clone()];
        if let Some(apartment) = self.apartment.as_ref().filter(|a| !a.is_empty()) {
            lines.push(apartment.clone());
        }
        lines.push(format!("{}, {} {}", self.city, self.state, self.zip_code));
        lines.push(self.country.clone());
        if !self.phone.is_empty() {
            lines.push(self.phone.clone());
        }
        lines.join("\n")
    }
}
