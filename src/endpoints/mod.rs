//! Resource modules.
//!
//! Each handle borrows the client and maps its parameters onto one [`Operation`] plus the
//! operation's response contract. Retry, classification and validation all happen in the
//! client's request pipeline.
//!
//! [`Operation`]: crate::client::Operation

pub mod agents;
pub mod chat;
pub mod documents;
pub mod workspaces;

pub use agents::Agents;
pub use chat::Chat;
pub use documents::Documents;
pub use workspaces::Workspaces;
