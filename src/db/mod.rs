pub mod chatdb;
pub mod db;
pub mod jobdb;
pub mod notificationdb;
pub mod walletdb;

#[cfg(test)]
pub mod memdb;

use chatdb::ConversationExt;
use jobdb::JobExt;
use notificationdb::NotificationExt;
use walletdb::WalletExt;

/// The full persistence surface the services depend on. Injected as a
/// trait object so tests can substitute an in-memory store for the
/// Postgres-backed `DBClient`.
pub trait MarketStore:
    JobExt + WalletExt + ConversationExt + NotificationExt + Send + Sync
{
}

impl<T> MarketStore for T where
    T: JobExt + WalletExt + ConversationExt + NotificationExt + Send + Sync
{
}
