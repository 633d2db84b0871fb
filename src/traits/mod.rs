mod observer;
pub use observer::NullObserver as NullObserver;
pub use observer::SyncObserver as SyncObserver;
pub use observer::TracingObserver as TracingObserver;

mod remote_source;
pub use remote_source::RemoteSource as RemoteSource;
