pub mod adapter;
pub mod client;
pub mod traits;

pub use adapter::{TransactOptions, WalletAdapter, NIL_ADDRESS};
pub use traits::WalletRegistry;
