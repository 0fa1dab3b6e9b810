//! Secure memory subsystem.
//!
//! Backs every streaming context that holds key material or intermediate
//! kernel state. Two allocation policies exist, selected at build time by
//! the `pool` Cargo feature (mirroring `ordo/src/common/securemem.c` and
//! `include/internal/mem/params.h` in the original source):
//!
//! - **Direct** (`pool` disabled): each allocation is its own heap buffer,
//!   advised to the OS as non-swappable via `mlock`/`VirtualLock`.
//! - **Pool** (`pool` enabled, default): a single `POOL_SIZE`-slot arena of
//!   `POOL_WORD` bytes each (32 KiB total) is locked once at [`crate::init`]
//!   time; allocations carve contiguous slots out of it under a mutex.
//!   This guarantees secret material never touches the arena backing even
//!   if a later direct `mlock` call would have failed.
//!
//! Every allocation is zeroized unconditionally when freed (on `Drop`),
//! including on partial-initialization failure paths.

use zeroize::Zeroize;

use crate::error::OrdoError;

/// Number of slots in the fixed pool.
pub const POOL_SIZE: usize = 1024;
/// Bytes per pool slot.
pub const POOL_WORD: usize = 32;
/// Total backing size of the pool, in bytes.
pub const POOL_LEN: usize = POOL_SIZE * POOL_WORD;

/// Advises the OS that `ptr[..len]` should not be paged to swap.
/// Best-effort: failure is advisory unless the caller treats it otherwise.
fn mem_lock(ptr: *mut u8, len: usize) -> bool {
    if len == 0 {
        return true;
    }
    #[cfg(unix)]
    {
        // SAFETY: ptr/len describe a live allocation owned by the caller
        // for at least the duration of this call.
        unsafe { libc::mlock(ptr as *const _, len) == 0 }
    }
    #[cfg(windows)]
    {
        use windows_sys::Win32::System::Memory::VirtualLock;
        unsafe { VirtualLock(ptr as *mut _, len) != 0 }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = (ptr, len);
        false
    }
}

fn mem_unlock(ptr: *mut u8, len: usize) {
    if len == 0 {
        return;
    }
    #[cfg(unix)]
    {
        unsafe {
            libc::munlock(ptr as *const _, len);
        }
    }
    #[cfg(windows)]
    {
        use windows_sys::Win32::System::Memory::VirtualUnlock;
        unsafe {
            VirtualUnlock(ptr as *mut _, len);
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = (ptr, len);
    }
}

/// A secure allocation: zero-filled on creation, zeroized and (if locked)
/// unlocked on drop. Holds either a direct locked buffer or a slice carved
/// out of the process-wide pool, depending on the `pool` feature.
pub struct SecureBuffer {
    inner: Inner,
}

enum Inner {
    Direct { buf: Vec<u8>, locked: bool },
    #[cfg(feature = "pool")]
    Pooled(pool::PoolHandle),
}

impl SecureBuffer {
    /// Allocates `size` zero-filled bytes. `size == 0` always succeeds,
    /// returning a unique, dereference-safe, zero-length handle.
    pub fn alloc(size: usize) -> Result<Self, OrdoError> {
        if size == 0 {
            return Ok(SecureBuffer {
                inner: Inner::Direct {
                    buf: Vec::new(),
                    locked: true,
                },
            });
        }

        #[cfg(feature = "pool")]
        {
            return pool::with_pool(|p| p.alloc(size))
                .map(|h| SecureBuffer {
                    inner: Inner::Pooled(h),
                })
                .ok_or(OrdoError::Alloc);
        }

        #[cfg(not(feature = "pool"))]
        {
            let mut buf = vec![0u8; size];
            let locked = mem_lock(buf.as_mut_ptr(), buf.len());
            if !locked {
                log::warn!("securemem: mem_lock advisory failure for {size} bytes, continuing");
            }
            Ok(SecureBuffer {
                inner: Inner::Direct { buf, locked },
            })
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        match &self.inner {
            Inner::Direct { buf, .. } => buf.as_slice(),
            #[cfg(feature = "pool")]
            Inner::Pooled(h) => h.as_slice(),
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.inner {
            Inner::Direct { buf, .. } => buf.as_mut_slice(),
            #[cfg(feature = "pool")]
            Inner::Pooled(h) => h.as_mut_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Produces an independent deep copy of this buffer's contents.
    pub fn try_clone(&self) -> Result<Self, OrdoError> {
        let mut other = SecureBuffer::alloc(self.len())?;
        other.as_mut_slice().copy_from_slice(self.as_slice());
        Ok(other)
    }
}

impl Drop for SecureBuffer {
    fn drop(&mut self) {
        match &mut self.inner {
            Inner::Direct { buf, locked } => {
                buf.zeroize();
                if *locked {
                    mem_unlock(buf.as_mut_ptr(), buf.len());
                }
            }
            #[cfg(feature = "pool")]
            Inner::Pooled(_) => {
                // PoolHandle zeroizes and releases its slots in its own Drop.
            }
        }
    }
}

#[cfg(feature = "pool")]
mod pool {
    use super::{mem_lock, POOL_LEN, POOL_SIZE, POOL_WORD};
    use crate::error::OrdoError;
    use parking_lot::Mutex;
    use std::ptr::NonNull;
    use std::sync::OnceLock;
    use zeroize::Zeroize;

    struct Arena {
        backing: Box<[u8; POOL_LEN]>,
        /// `used[i]` is true iff slot `i` is currently allocated.
        used: [bool; POOL_SIZE],
        locked: bool,
    }

    // SAFETY: all access to `backing`/`used` happens either through the
    // guarding Mutex (for bookkeeping) or through a `PoolHandle`'s exclusive
    // ownership of its slot range, which `Arena::alloc`/`free` enforce never
    // overlaps another live handle's range.
    unsafe impl Send for Arena {}

    impl Arena {
        fn new() -> Self {
            let mut backing = Box::new([0u8; POOL_LEN]);
            let locked = mem_lock(backing.as_mut_ptr(), POOL_LEN);
            Arena {
                backing,
                used: [false; POOL_SIZE],
                locked,
            }
        }

        fn alloc(&mut self, size: usize) -> Option<PoolHandle> {
            let slots_needed = size.div_ceil(POOL_WORD);
            if slots_needed == 0 || slots_needed > POOL_SIZE {
                return None;
            }
            let mut run_start = None;
            let mut run_len = 0;
            for i in 0..POOL_SIZE {
                if !self.used[i] {
                    if run_start.is_none() {
                        run_start = Some(i);
                    }
                    run_len += 1;
                    if run_len == slots_needed {
                        let start = run_start.unwrap();
                        for slot in &mut self.used[start..start + slots_needed] {
                            *slot = true;
                        }
                        let ptr = unsafe { self.backing.as_mut_ptr().add(start * POOL_WORD) };
                        return Some(PoolHandle {
                            ptr: NonNull::new(ptr).unwrap(),
                            len: size,
                            start,
                            slots: slots_needed,
                        });
                    }
                } else {
                    run_start = None;
                    run_len = 0;
                }
            }
            None
        }

        fn free(&mut self, start: usize, slots: usize) {
            for slot in &mut self.used[start..start + slots] {
                *slot = false;
            }
        }
    }

    static ARENA: OnceLock<Mutex<Arena>> = OnceLock::new();

    /// Initializes the global pool exactly once. Returns `Err` if locking
    /// the arena failed: per spec, a lock failure during pool
    /// initialization is fatal to `ordo_init` (unlike the advisory
    /// direct-allocation case).
    pub(crate) fn init() -> Result<(), OrdoError> {
        let mutex = ARENA.get_or_init(|| Mutex::new(Arena::new()));
        if mutex.lock().locked {
            Ok(())
        } else {
            log::error!("securemem: pool arena mem_lock failed, aborting ordo_init");
            Err(OrdoError::Alloc)
        }
    }

    pub(super) fn with_pool<R>(f: impl FnOnce(&mut Arena) -> R) -> R {
        let mutex = ARENA.get_or_init(|| Mutex::new(Arena::new()));
        let mut arena = mutex.lock();
        f(&mut arena)
    }

    pub struct PoolHandle {
        ptr: NonNull<u8>,
        len: usize,
        start: usize,
        slots: usize,
    }

    // SAFETY: the byte range `[start*POOL_WORD, (start+slots)*POOL_WORD)` is
    // exclusively owned by this handle until it is dropped, per `Arena`'s
    // bookkeeping.
    unsafe impl Send for PoolHandle {}

    impl PoolHandle {
        pub fn as_slice(&self) -> &[u8] {
            unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
        }

        pub fn as_mut_slice(&mut self) -> &mut [u8] {
            unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
        }
    }

    impl Drop for PoolHandle {
        fn drop(&mut self) {
            self.as_mut_slice().zeroize();
            with_pool(|arena| arena.free(self.start, self.slots));
        }
    }

}

/// Initializes the secure memory subsystem. Called once from [`crate::init`].
pub(crate) fn init() -> Result<(), OrdoError> {
    #[cfg(feature = "pool")]
    {
        pool::init()
    }
    #[cfg(not(feature = "pool"))]
    {
        Ok(())
    }
}
