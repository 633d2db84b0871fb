use crossbeam::queue::SegQueue;

/// Shared pool of read buffers rented by download workers. Every rented
/// buffer must come back on all exit paths.
pub struct BufferPool {
  pub(crate) pool: SegQueue<Vec<u8>>,
  pub(crate) buffer_size: usize,
}
