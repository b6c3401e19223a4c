use std::{mem::ManuallyDrop, ptr::NonNull, slice};

use libc::{
  _SC_PAGESIZE, MAP_ANONYMOUS, MAP_FAILED, MAP_PRIVATE, PROT_NONE, PROT_READ, PROT_WRITE, c_void,
  mmap, mprotect, munmap, sysconf,
};
use tracing::{debug, warn};

use crate::error::ArenaError;

/// Returns the system page size.
pub fn page_size() -> Result<usize, ArenaError> {
  let size = unsafe { sysconf(_SC_PAGESIZE) };

  if size <= 0 {
    return Err(ArenaError::last_os("sysconf(_SC_PAGESIZE)"));
  }

  Ok(size as usize)
}

/// A page-aligned range of anonymous private memory obtained from `mmap(2)`.
///
/// ```text
///   base                                  base + len        base + reserved
///   ┌──────────────────────────────────────┬─────────────────┐
///   │            usable pages              │   guard page    │
///   │          PROT_READ|PROT_WRITE        │    PROT_NONE    │
///   └──────────────────────────────────────┴─────────────────┘
/// ```
///
/// The guard page is only present when requested. The whole reserved range
/// is unmapped by [`Region::release`] or on drop.
pub struct Region {
  base: NonNull<u8>,
  len: usize,
  reserved: usize,
  page_size: usize,
}

// SAFETY: a `Region` is the only handle to its mapping and hands out borrows
// tied to `&self`/`&mut self`, so moving it to another thread is sound.
unsafe impl Send for Region {}

impl Region {
  /// Maps `pages` pages (at least one), plus a trailing guard page when
  /// `guard_page` is set.
  pub fn map(
    pages: usize,
    guard_page: bool,
  ) -> Result<Self, ArenaError> {
    let page_size = page_size()?;
    let pages = pages.max(1);

    let len = pages.checked_mul(page_size).ok_or(ArenaError::InvalidSize(pages))?;
    let reserved = if guard_page {
      len.checked_add(page_size).ok_or(ArenaError::InvalidSize(pages))?
    } else {
      len
    };

    let address = unsafe {
      mmap(
        std::ptr::null_mut(),
        reserved,
        PROT_READ | PROT_WRITE,
        MAP_PRIVATE | MAP_ANONYMOUS,
        -1,
        0,
      )
    };

    if address == MAP_FAILED {
      return Err(ArenaError::last_os("mmap"));
    }

    let Some(base) = NonNull::new(address as *mut u8) else {
      return Err(ArenaError::last_os("mmap"));
    };

    let region = Self {
      base,
      len,
      reserved,
      page_size,
    };

    if guard_page {
      let guard = unsafe { base.as_ptr().add(len) } as *mut c_void;

      if unsafe { mprotect(guard, page_size, PROT_NONE) } != 0 {
        // `region` unmaps itself on the way out.
        return Err(ArenaError::last_os("mprotect"));
      }
    }

    debug!(
      address = ?base,
      len,
      guard_page,
      "mapped region"
    );

    Ok(region)
  }

  /// Usable bytes, excluding the guard page.
  pub fn len(&self) -> usize {
    self.len
  }

  /// Bytes reserved from the OS, including the guard page.
  pub fn reserved(&self) -> usize {
    self.reserved
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  pub fn pages(&self) -> usize {
    self.len / self.page_size
  }

  pub fn has_guard_page(&self) -> bool {
    self.reserved > self.len
  }

  pub fn as_ptr(&self) -> *mut u8 {
    self.base.as_ptr()
  }

  pub fn as_slice(&self) -> &[u8] {
    unsafe { slice::from_raw_parts(self.base.as_ptr(), self.len) }
  }

  pub fn as_mut_slice(&mut self) -> &mut [u8] {
    unsafe { slice::from_raw_parts_mut(self.base.as_ptr(), self.len) }
  }

  /// Unmaps the whole reserved range and reports the `munmap(2)` result.
  pub fn release(self) -> Result<(), ArenaError> {
    let region = ManuallyDrop::new(self);
    unsafe { region.unmap() }
  }

  /// # Safety
  ///
  /// Must be called at most once; the mapping is gone afterwards.
  unsafe fn unmap(&self) -> Result<(), ArenaError> {
    let result = unsafe { munmap(self.base.as_ptr() as *mut c_void, self.reserved) };

    if result != 0 {
      return Err(ArenaError::last_os("munmap"));
    }

    debug!(address = ?self.base, reserved = self.reserved, "unmapped region");

    Ok(())
  }
}

impl Drop for Region {
  fn drop(&mut self) {
    if let Err(err) = unsafe { self.unmap() } {
      warn!(%err, "leaking region");
    }
  }
}
