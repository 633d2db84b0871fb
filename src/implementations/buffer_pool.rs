use crossbeam::queue::SegQueue;

use crate::structures::BufferPool;

impl BufferPool {
  pub fn new(buffer_size: usize) -> Self {
    Self {
      pool: SegQueue::new(),
      buffer_size,
    }
  }

  /// Hands out a zeroed buffer of `buffer_size` bytes, reusing a returned
  /// one when available.
  pub fn rent(&self) -> Vec<u8> {
    match self.pool.pop() {
      Some(buffer) => buffer,
      None => vec![0u8; self.buffer_size],
    }
  }

  pub fn give_back(&self, buffer: Vec<u8>) {
    if buffer.len() == self.buffer_size {
      self.pool.push(buffer);
    }
  }

  pub fn idle(&self) -> usize {
    self.pool.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rented_buffers_are_reused() {
    let pool = BufferPool::new(64 * 1024);
    let a = pool.rent();
    assert_eq!(a.len(), 64 * 1024);
    pool.give_back(a);
    assert_eq!(pool.idle(), 1);
    let _b = pool.rent();
    assert_eq!(pool.idle(), 0);
  }

  #[test]
  fn foreign_sized_buffers_are_dropped() {
    let pool = BufferPool::new(1024);
    pool.give_back(vec![0u8; 10]);
    assert_eq!(pool.idle(), 0);
  }
}
