pub mod remote;
pub mod sync;

pub use remote::RemoteClient;
pub use sync::SyncService;
