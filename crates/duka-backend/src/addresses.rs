//! The customer's address book.

use duka_commerce::account::{NewAddress, SavedAddress};
use duka_commerce::{AddressId, CommerceError};
use tracing::{debug, info};

use crate::latency::pause;
use crate::MockBackend;

impl MockBackend {
    /// Saved addresses, in the order they were added.
    pub async fn list_addresses(&self) -> Result<Vec<SavedAddress>, CommerceError> {
        pause(self.latency.address_list_ms).await;

        let addresses = self.addresses.lock().await.clone();
        debug!(count = addresses.len(), "listed addresses");
        Ok(addresses)
    }

    pub async fn get_address(&self, id: &AddressId) -> Result<SavedAddress, CommerceError> {
        pause(self.latency.address_list_ms).await;

        self.addresses
            .lock()
            .await
            .iter()
            .find(|a| &a.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::AddressNotFound(id.to_string()))
    }

    /// The address marked as default, if any.
    pub async fn default_address(&self) -> Result<Option<SavedAddress>, CommerceError> {
        Ok(self
            .list_addresses()
            .await?
            .into_iter()
            .find(|a| a.is_default))
    }

    /// Validate and store a new address.
    ///
    /// A new default address takes the flag away from every other entry,
    /// so at most one address is ever the default.
    pub async fn add_address(&self, new: NewAddress) -> Result<SavedAddress, CommerceError> {
        pause(self.latency.address_create_ms).await;

        new.validate().into_result()?;

        let saved = new.into_saved(AddressId::generate(), self.user_id.clone());
        let mut addresses = self.addresses.lock().await;
        if saved.is_default {
            for existing in addresses.iter_mut() {
                existing.is_default = false;
            }
        }
        addresses.push(saved.clone());

        info!(address_id = %saved.id, default = saved.is_default, "address saved");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duka_commerce::account::AddressLabel;

    fn office() -> NewAddress {
        NewAddress {
            first_name: "John".into(),
            last_name: "Doe".into(),
            address_line1: "1 Kenyatta Avenue".into(),
            city: "Mombasa".into(),
            state: "Mombasa County".into(),
            postal_code: "80100".into(),
            country: "Kenya".into(),
            phone_number: "+254711000000".into(),
            label: Some(AddressLabel::Other),
            ..NewAddress::default()
        }
    }

    #[tokio::test]
    async fn test_seeded_book() {
        let backend = MockBackend::instant();
        let addresses = backend.list_addresses().await.unwrap();
        assert_eq!(addresses.len(), 2);

        let default = backend.default_address().await.unwrap().unwrap();
        assert_eq!(default.id.as_str(), "addr-1");
        assert_eq!(default.address_line1, "123 Main Street");
    }

    #[tokio::test]
    async fn test_add_address_appends() {
        let backend = MockBackend::instant();
        let saved = backend.add_address(office()).await.unwrap();

        assert!(saved.id.as_str().starts_with("addr-"));
        assert_eq!(saved.user_id.as_str(), "1");
        assert!(!saved.is_default);
        assert_eq!(backend.get_address(&saved.id).await.unwrap(), saved);
        assert_eq!(
            backend.default_address().await.unwrap().unwrap().id.as_str(),
            "addr-1"
        );
    }

    #[tokio::test]
    async fn test_new_default_replaces_old() {
        let backend = MockBackend::instant();
        let saved = backend
            .add_address(NewAddress {
                is_default: true,
                ..office()
            })
            .await
            .unwrap();

        let addresses = backend.list_addresses().await.unwrap();
        let defaults: Vec<_> = addresses.iter().filter(|a| a.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, saved.id);
    }

    #[tokio::test]
    async fn test_add_address_reports_every_missing_field() {
        let backend = MockBackend::instant();
        let err = backend
            .add_address(NewAddress {
                city: String::new(),
                phone_number: "  ".into(),
                ..office()
            })
            .await
            .unwrap_err();

        let errors = err.field_errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("city"), Some("city is required"));
        assert!(errors.contains("phoneNumber"));
        assert_eq!(backend.list_addresses().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_address() {
        let backend = MockBackend::instant();
        let err = backend
            .get_address(&AddressId::new("addr-404"))
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::AddressNotFound(_)));
    }
}
