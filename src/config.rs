//! Arena configuration.

/// Options fixed at [`Arena`](crate::Arena) creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
  /// Map one extra trailing page with no access rights so that anything
  /// walking past the end of the region faults instead of corrupting memory.
  ///
  /// Default: on in debug builds, off in release builds.
  pub guard_pages: bool,

  /// Zero the bytes discarded by `pop_to` in typed arenas.
  ///
  /// Slots handed out again by the free list are always zeroed.
  pub zero_on_free: bool,

  /// Initial alignment of every allocation. Power of two, at most one page.
  pub alignment: usize,

  /// Element size for typed ("one type") mode. `None` creates a plain
  /// bump arena; typed mode can still be enabled before the first push.
  pub element_size: Option<usize>,
}

impl ArenaConfig {
  pub const DEFAULT_ALIGNMENT: usize = 16;

  pub fn new() -> Self {
    Self {
      guard_pages: cfg!(debug_assertions),
      zero_on_free: true,
      alignment: Self::DEFAULT_ALIGNMENT,
      element_size: None,
    }
  }

  /// Config for an arena holding only elements of `element_size` bytes.
  pub fn typed(element_size: usize) -> Self {
    Self::new().with_element_size(element_size)
  }

  pub fn with_guard_pages(
    mut self,
    guard_pages: bool,
  ) -> Self {
    self.guard_pages = guard_pages;
    self
  }

  pub fn with_zero_on_free(
    mut self,
    zero_on_free: bool,
  ) -> Self {
    self.zero_on_free = zero_on_free;
    self
  }

  pub fn with_alignment(
    mut self,
    alignment: usize,
  ) -> Self {
    self.alignment = alignment;
    self
  }

  pub fn with_element_size(
    mut self,
    element_size: usize,
  ) -> Self {
    self.element_size = Some(element_size);
    self
  }
}

impl Default for ArenaConfig {
  fn default() -> Self {
    Self::new()
  }
}
