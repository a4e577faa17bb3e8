//! Durable cart store.

use duka_cache::{Cache, KvStore};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::cart::{reduce, CartCommand, CartItem, CartState, LineKey};
use crate::error::CommerceError;

/// Slot name the cart is persisted under.
pub const CART_SLOT: &str = "cart";

/// The persisted form. Totals are written but recomputed on load.
#[derive(Deserialize)]
struct PersistedCart {
    items: Vec<CartItem>,
}

/// Owns the current [`CartState`] and mirrors it to a durable slot.
///
/// Every mutation is a read-modify-write of the slot: the latest persisted
/// cart is rehydrated, the command is reduced against it, and the result is
/// written back only if nobody else wrote the slot meanwhile. The in-memory
/// state changes only after the write lands, so a failed write leaves the
/// store exactly as it was.
#[derive(Debug)]
pub struct CartStore<S> {
    cache: Cache<S>,
    slot: String,
    state: CartState,
}

impl<S: KvStore> CartStore<S> {
    /// Open the cart persisted under [`CART_SLOT`].
    pub fn open(store: S) -> Self {
        Self::open_slot(store, CART_SLOT)
    }

    /// Open the cart persisted under `slot`.
    ///
    /// A missing, unreadable or corrupt slot yields an empty cart; the
    /// problem is logged and never surfaced.
    pub fn open_slot(store: S, slot: impl Into<String>) -> Self {
        let cache = Cache::new(store);
        let slot = slot.into();
        let state = load(&cache, &slot);
        debug!(slot = %slot, items = state.total_items(), "cart opened");
        Self { cache, slot, state }
    }

    /// Current snapshot.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Re-read the slot, picking up writes from other processes.
    pub fn reload(&mut self) -> &CartState {
        self.state = load(&self.cache, &self.slot);
        &self.state
    }

    /// Apply `command` and persist the result.
    pub fn dispatch(&mut self, command: CartCommand) -> Result<&CartState, CommerceError> {
        let next = self
            .cache
            .update(&self.slot, |bytes| reduce(&rehydrate(bytes), &command))?;

        info!(
            slot = %self.slot,
            command = command.name(),
            total_items = next.total_items(),
            total_price = %next.total_price(),
            "cart updated"
        );
        self.state = next;
        Ok(&self.state)
    }

    pub fn add_item(&mut self, item: CartItem) -> Result<&CartState, CommerceError> {
        self.dispatch(CartCommand::AddItem(item))
    }

    pub fn remove_item(&mut self, key: impl Into<LineKey>) -> Result<&CartState, CommerceError> {
        self.dispatch(CartCommand::RemoveItem(key.into()))
    }

    pub fn update_quantity(
        &mut self,
        key: impl Into<LineKey>,
        quantity: i64,
    ) -> Result<&CartState, CommerceError> {
        self.dispatch(CartCommand::UpdateQuantity {
            key: key.into(),
            quantity,
        })
    }

    pub fn clear_cart(&mut self) -> Result<&CartState, CommerceError> {
        self.dispatch(CartCommand::Clear)
    }
}

fn load<S: KvStore>(cache: &Cache<S>, slot: &str) -> CartState {
    match cache.get_raw(slot) {
        Ok(bytes) => rehydrate(bytes.as_deref()),
        Err(e) => {
            warn!(slot, error = %e, "failed to read persisted cart, starting empty");
            CartState::default()
        }
    }
}

/// Rebuild a cart by replaying persisted lines through the reducer.
fn rehydrate(bytes: Option<&[u8]>) -> CartState {
    let Some(bytes) = bytes else {
        return CartState::default();
    };

    let persisted: PersistedCart = match serde_json::from_slice(bytes) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "failed to parse persisted cart, starting empty");
            return CartState::default();
        }
    };

    persisted
        .items
        .into_iter()
        .fold(CartState::default(), |state, item| {
            let product_id = item.id.clone();
            match reduce(&state, &CartCommand::AddItem(item)) {
                Ok(next) => next,
                Err(e) => {
                    warn!(product_id = %product_id, error = %e, "dropping persisted cart line");
                    state
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use duka_cache::{CacheError, MemoryStore};

    fn headphones(quantity: i64) -> CartItem {
        CartItem::new("1", "Wireless Bluetooth Headphones", Money::kes(9999), quantity)
    }

    fn watch(quantity: i64) -> CartItem {
        CartItem::new("2", "Smart Fitness Watch", Money::kes(14999), quantity)
    }

    /// Reads succeed, writes always fail.
    struct ReadOnlyStore(MemoryStore);

    impl KvStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            self.0.get(key)
        }
        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
            Err(CacheError::StoreError("read-only".into()))
        }
        fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::StoreError("read-only".into()))
        }
        fn compare_and_swap(
            &self,
            _key: &str,
            _expected: Option<&[u8]>,
            _value: &[u8],
        ) -> Result<bool, CacheError> {
            Err(CacheError::StoreError("read-only".into()))
        }
        fn keys(&self) -> Result<Vec<String>, CacheError> {
            self.0.keys()
        }
    }

    #[test]
    fn test_open_empty_slot() {
        let store = CartStore::open(MemoryStore::new());
        assert!(store.state().is_empty());
        assert_eq!(store.slot(), CART_SLOT);
    }

    #[test]
    fn test_mutations_persist_across_reopen() {
        let backing = MemoryStore::new();
        let mut store = CartStore::open(backing.clone());
        store.add_item(headphones(1)).unwrap();
        store.add_item(watch(2)).unwrap();
        store.update_quantity("1", 3).unwrap();

        let reopened = CartStore::open(backing);
        assert_eq!(reopened.state(), store.state());
        assert_eq!(reopened.state().total_items(), 5);
        assert_eq!(reopened.state().total_price(), Money::kes(59995));
    }

    #[test]
    fn test_persisted_shape() {
        let backing = MemoryStore::new();
        let mut store = CartStore::open(backing.clone());
        store.add_item(headphones(2)).unwrap();

        let bytes = backing.get(CART_SLOT).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["totalItems"], 2);
        assert_eq!(json["items"][0]["id"], "1");
    }

    #[test]
    fn test_corrupt_slot_starts_empty() {
        let backing = MemoryStore::new();
        backing.set(CART_SLOT, b"{not json").unwrap();

        let mut store = CartStore::open(backing.clone());
        assert!(store.state().is_empty());

        store.add_item(watch(1)).unwrap();
        assert_eq!(CartStore::open(backing).state().total_items(), 1);
    }

    #[test]
    fn test_rehydrate_recomputes_totals_and_skips_bad_lines() {
        let backing = MemoryStore::new();
        let persisted = serde_json::json!({
            "items": [
                {"id": "1", "name": "Headphones", "price": {"amount": 999900, "currency": "KES"}, "quantity": 2, "image": ""},
                {"id": "2", "name": "Watch", "price": {"amount": 1499900, "currency": "KES"}, "quantity": -4, "image": ""}
            ],
            "totalItems": 999,
            "totalPrice": {"amount": 1, "currency": "KES"}
        });
        backing
            .set(CART_SLOT, &serde_json::to_vec(&persisted).unwrap())
            .unwrap();

        let store = CartStore::open(backing);
        assert_eq!(store.state().unique_item_count(), 1);
        assert_eq!(store.state().total_items(), 2);
        assert_eq!(store.state().total_price(), Money::kes(19998));
    }

    #[test]
    fn test_rejected_command_keeps_state() {
        let mut store = CartStore::open(MemoryStore::new());
        store.add_item(headphones(1)).unwrap();
        let before = store.state().clone();

        let err = store.add_item(headphones(0)).unwrap_err();
        assert!(matches!(err, CommerceError::InvalidQuantity(0)));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn test_failed_write_keeps_state() {
        let mut store = CartStore::open(ReadOnlyStore(MemoryStore::new()));
        let err = store.add_item(headphones(1)).unwrap_err();
        assert!(matches!(err, CommerceError::Storage(_)));
        assert!(err.is_retryable());
        assert!(store.state().is_empty());
    }

    #[test]
    fn test_two_handles_do_not_lose_updates() {
        let backing = MemoryStore::new();
        let mut a = CartStore::open(backing.clone());
        let mut b = CartStore::open(backing.clone());

        a.add_item(headphones(1)).unwrap();
        // `b` still holds the empty snapshot it opened with.
        b.add_item(watch(1)).unwrap();

        assert_eq!(b.state().unique_item_count(), 2);
        assert_eq!(a.reload().unique_item_count(), 2);
    }

    #[test]
    fn test_clear_cart() {
        let backing = MemoryStore::new();
        let mut store = CartStore::open(backing.clone());
        store.add_item(headphones(1)).unwrap();
        store.remove_item("1").unwrap();
        store.add_item(watch(1)).unwrap();
        store.clear_cart().unwrap();

        assert!(store.state().is_empty());
        assert!(CartStore::open(backing).state().is_empty());
    }
}
