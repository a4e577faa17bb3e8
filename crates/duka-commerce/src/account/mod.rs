//! Customer account data: the saved-address book.

mod address;

pub use address::{AddressLabel, NewAddress, SavedAddress};
