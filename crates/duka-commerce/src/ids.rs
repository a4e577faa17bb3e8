//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing an OrderId where a ProductId is expected.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(OrderId);
define_id!(AddressId);
define_id!(UserId);

const ORDER_SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ORDER_SUFFIX_LEN: usize = 7;

impl OrderId {
    /// Generate a customer-facing order number, e.g. `ORD-7K2QX9A`.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..ORDER_SUFFIX_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..ORDER_SUFFIX_ALPHABET.len());
                ORDER_SUFFIX_ALPHABET[idx] as char
            })
            .collect();
        Self(format!("ORD-{}", suffix))
    }
}

impl AddressId {
    /// Generate an id of the form `addr-<unix millis>`.
    ///
    /// Ids handed out by one process are strictly increasing, so two
    /// addresses created within the same millisecond still differ.
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicI64, Ordering};

        static LAST: AtomicI64 = AtomicI64::new(0);

        let now = chrono::Utc::now().timestamp_millis();
        let mut prev = LAST.load(Ordering::SeqCst);
        loop {
            let next = now.max(prev + 1);
            match LAST.compare_exchange(prev, next, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => return Self(format!("addr-{}", next)),
                Err(actual) => prev = actual,
            }
        }
    }
}
