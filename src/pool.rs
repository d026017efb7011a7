//! Reusable output buffers.

use std::fmt;
use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

/// Idle buffers kept by default.
const DEFAULT_MAX_IDLE: usize = 16;

/// A pool of `String` buffers shared by the renderers of one run.
///
/// A checked-out buffer is exclusively owned by its [`PooledBuffer`] and goes
/// back to the pool, cleared, when the guard drops.
pub struct BufferPool {
    idle: Mutex<Vec<String>>,
    max_idle: usize,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }

    pub fn with_max_idle(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Take an empty buffer, reusing an idle one when available.
    pub fn checkout(&self) -> PooledBuffer<'_> {
        let buf = self.idle.lock().pop().unwrap_or_default();
        PooledBuffer { pool: self, buf }
    }

    /// Number of buffers waiting for reuse.
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    fn give_back(&self, mut buf: String) {
        buf.clear();
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(buf);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferPool")
            .field("idle", &self.idle())
            .field("max_idle", &self.max_idle)
            .finish()
    }
}

/// A buffer checked out of a [`BufferPool`].
pub struct PooledBuffer<'p> {
    pool: &'p BufferPool,
    buf: String,
}

impl PooledBuffer<'_> {
    /// Copy the contents out; the buffer itself still returns to the pool.
    pub fn to_output(&self) -> String {
        self.as_str().to_owned()
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buf));
    }
}

impl fmt::Debug for PooledBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_buffers_are_reused_and_cleared() {
        let pool = BufferPool::new();
        let capacity = {
            let mut buf = pool.checkout();
            write!(buf, "package base").unwrap();
            assert_eq!(buf.as_str(), "package base");
            buf.capacity()
        };
        assert_eq!(pool.idle(), 1);

        let buf = pool.checkout();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), capacity);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_buffer_returns_on_early_exit() {
        fn render(pool: &BufferPool, fail: bool) -> Result<String, fmt::Error> {
            let mut buf = pool.checkout();
            buf.push_str("partial");
            if fail {
                return Err(fmt::Error);
            }
            Ok(buf.to_output())
        }
        let pool = BufferPool::new();
        assert!(render(&pool, true).is_err());
        assert_eq!(pool.idle(), 1);
        assert_eq!(render(&pool, false).unwrap(), "partial");
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_idle_is_capped() {
        let pool = BufferPool::with_max_idle(1);
        let a = pool.checkout();
        let b = pool.checkout();
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 1);
    }
}
