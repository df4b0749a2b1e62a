//! # Vendor Integration Library
//!
//! Everything that talks to the outside world on behalf of the orchestrators:
//! per-currency provider credentials, the internal wallet service client, and
//! the outbound vendor API clients (Hg5, Ors).
//!
//! Collaborators are exposed as `async_trait` traits so the service layer can
//! be exercised against mocks.

pub mod credentials;
pub mod hg5;
pub mod ors;
pub mod wallet;

// Re-export commonly used types
pub use credentials::{CredentialsResolver, ProviderCredentials};
pub use hg5::{Hg5Api, Hg5HttpClient};
pub use ors::{OrsApi, OrsHttpClient};
pub use wallet::{WalletApi, WalletHttpClient, WalletResult, WALLET_STATUS_OK};
