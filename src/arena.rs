use std::fmt;

use tracing::{debug, trace, warn};

use crate::{
  align::checked_align_to, align_to, config::ArenaConfig, error::ArenaError, free_list::FreeList,
  region::Region,
};

/// A stack-discipline allocator over one mapped region.
///
/// Positions inside the region are byte offsets from its (page aligned)
/// base:
///
/// ```text
///   0      first_usable                  cursor                      end
///   ├──────────┼─────┬─────┬─────┬─────────┼───────────────────────────┤
///   │ padding  │ A1  │ A2  │ A3  │   A4    │        free space         │
///   └──────────┴─────┴─────┴─────┴─────────┴───────────────────────────┘
/// ```
///
/// Every returned offset and the cursor itself are multiples of
/// [`Arena::alignment`].
///
/// In typed mode (see [`Arena::set_element_size`]) the arena is a grid of
/// `stride`-sized slots and dropped interior slots are recorded in a
/// [`FreeList`] to be handed out again by the next [`Arena::push`].
pub struct Arena {
  // Declared before `region` so it is unmapped first on drop.
  pub(crate) free_list: Option<FreeList>,
  pub(crate) region: Region,
  pub(crate) first_usable: usize,
  pub(crate) cursor: usize,
  pub(crate) alignment: usize,
  pub(crate) element_size: Option<usize>,
  pub(crate) guard_pages: bool,
  pub(crate) zero_on_free: bool,
}

impl Arena {
  /// Maps an arena of `pages` pages with the default configuration.
  pub fn new(pages: usize) -> Result<Self, ArenaError> {
    Self::with_config(pages, ArenaConfig::default())
  }

  pub fn with_config(
    pages: usize,
    config: ArenaConfig,
  ) -> Result<Self, ArenaError> {
    let region = Region::map(pages, config.guard_pages)?;

    let mut arena = Self {
      free_list: None,
      region,
      first_usable: 0,
      cursor: 0,
      alignment: 1,
      element_size: None,
      guard_pages: config.guard_pages,
      zero_on_free: config.zero_on_free,
    };

    arena.set_alignment(config.alignment)?;

    if let Some(element_size) = config.element_size {
      arena.set_element_size(element_size)?;
    }

    Ok(arena)
  }

  /// Changes the alignment applied to every following allocation.
  ///
  /// `n` must be a power of two no larger than a page, and after rounding
  /// the cursor up to `n` at least `n` bytes must remain. Both the cursor
  /// and `first_usable` move forward to the next multiple of `n`; space
  /// already consumed is never given back.
  pub fn set_alignment(
    &mut self,
    n: usize,
  ) -> Result<(), ArenaError> {
    if !n.is_power_of_two() || n > self.region.page_size() {
      warn!(alignment = n, "alignment must be a power of two no larger than a page");
      return Err(ArenaError::InvalidAlignment(n));
    }

    if self.element_size.is_some() && !self.is_empty() {
      warn!(alignment = n, "cannot realign a typed arena holding elements");
      return Err(ArenaError::InvalidAlignment(n));
    }

    let cursor = align_to!(self.cursor, n);

    if cursor + n > self.end() {
      warn!(alignment = n, cursor = self.cursor, "alignment leaves no room in the arena");
      return Err(ArenaError::InvalidAlignment(n));
    }

    self.first_usable = align_to!(self.first_usable, n);
    self.cursor = cursor;
    self.alignment = n;

    Ok(())
  }

  /// Switches the arena to typed mode with elements of `size` bytes.
  ///
  /// Only allowed before the first allocation.
  pub fn set_element_size(
    &mut self,
    size: usize,
  ) -> Result<(), ArenaError> {
    if size == 0 || !self.is_empty() {
      warn!(size, used = self.used(), "element size must be non-zero and set on an empty arena");
      return Err(ArenaError::InvalidElementSize(size));
    }

    match checked_align_to(size, self.alignment) {
      Some(stride) if stride <= self.capacity() => {}
      _ => return Err(ArenaError::InvalidElementSize(size)),
    }

    self.element_size = Some(size);

    Ok(())
  }

  /// Allocates `size` bytes and returns their offset.
  ///
  /// The push is refused unless `cursor + size + alignment < end`; the
  /// alignment term is headroom for rounding the cursor up afterwards.
  ///
  /// In typed mode `size` must not exceed the element size; a recycled slot
  /// is returned (zeroed) if one is pending, otherwise one slot is bumped.
  /// The arena is left untouched on error.
  pub fn push(
    &mut self,
    size: usize,
  ) -> Result<usize, ArenaError> {
    if size == 0 {
      return Err(ArenaError::InvalidSize(size));
    }

    let Some(element_size) = self.element_size else {
      return self.bump(size);
    };

    if size > element_size {
      return Err(ArenaError::InvalidSize(size));
    }

    if let Some(offset) = self.reuse_slot() {
      trace!(offset, "reused slot");
      return Ok(offset);
    }

    self.bump(align_to!(element_size, self.alignment))
  }

  /// Moves the cursor back (or forward) to `pos`, rounded up to the
  /// alignment, and returns the new cursor.
  ///
  /// Everything allocated at or after `pos` is discarded. In typed mode
  /// `pos` rounds up to a slot boundary, discarded bytes are zeroed when
  /// `zero_on_free` is set, holes above the new cursor are forgotten and
  /// holes directly below it are trimmed away.
  pub fn pop_to(
    &mut self,
    pos: usize,
  ) -> Result<usize, ArenaError> {
    if pos < self.first_usable || pos > self.end() {
      return Err(self.ignored_pop_to(pos));
    }

    let Some(stride) = self.stride() else {
      self.cursor = align_to!(pos, self.alignment);
      trace!(cursor = self.cursor, "popped");
      return Ok(self.cursor);
    };

    let cursor = self.first_usable + (pos - self.first_usable).div_ceil(stride) * stride;

    if cursor > self.end() {
      return Err(self.ignored_pop_to(pos));
    }

    if self.zero_on_free && cursor < self.cursor {
      self.zero(cursor, self.cursor - cursor);
    }

    self.cursor = cursor;

    if self.is_empty() {
      self.release_free_list();
    } else if let Some(list) = self.free_list.as_mut() {
      list.retain(|offset| offset < cursor);

      while self.cursor > self.first_usable && list.remove(self.cursor - stride) {
        self.cursor -= stride;
      }

      if list.is_empty() {
        self.release_free_list();
      }
    }

    trace!(cursor = self.cursor, "popped");

    Ok(self.cursor)
  }

  /// Discards every allocation.
  pub fn reset(&mut self) {
    if self.zero_on_free && self.is_typed() {
      self.zero(self.first_usable, self.used());
    }

    self.cursor = self.first_usable;
    self.release_free_list();
  }

  /// Marks the typed slot at `offset` as free.
  ///
  /// Dropping the topmost slot simply moves the cursor back. Any other slot
  /// is zeroed and recorded in the free list, which is created on first use.
  pub fn drop_slot(
    &mut self,
    offset: usize,
  ) -> Result<(), ArenaError> {
    let stride = self.typed_stride()?;

    if self.is_empty() {
      warn!(offset, "drop on an empty arena");
      self.release_free_list();
      return Err(ArenaError::OutOfRange {
        offset,
        start: self.first_usable,
        end: self.cursor,
      });
    }

    self.check_live_slot(offset)?;

    if offset + stride == self.cursor {
      self.pop_to(offset)?;
      return Ok(());
    }

    if self.free_list.as_ref().is_some_and(|list| list.contains(offset)) {
      warn!(offset, "slot dropped twice");
      return Err(ArenaError::DoubleFree(offset));
    }

    let list = match self.free_list.take() {
      Some(list) => list,
      None => FreeList::with_capacity(self.capacity() / stride, self.guard_pages)?,
    };
    let list = self.free_list.insert(list);

    list.push(offset)?;

    self.zero(offset, stride);

    trace!(offset, holes = self.holes(), "dropped slot");

    Ok(())
  }

  /// [`Arena::drop_slot`], then zeroes the slot whichever way it was freed.
  pub fn pop(
    &mut self,
    offset: usize,
  ) -> Result<(), ArenaError> {
    let stride = self.typed_stride()?;

    self.drop_slot(offset)?;
    self.zero(offset, stride);

    Ok(())
  }

  /// Releases the free list, then the region itself.
  ///
  /// Both unmaps are attempted; the first failure is returned.
  pub fn release(self) -> Result<(), ArenaError> {
    let Arena {
      region, free_list, ..
    } = self;

    let free_list = free_list.map_or(Ok(()), FreeList::release);
    let region = region.release();

    free_list.and(region)
  }

  pub fn bytes(
    &self,
    offset: usize,
    len: usize,
  ) -> Result<&[u8], ArenaError> {
    let range = self.range(offset, len)?;
    Ok(&self.region.as_slice()[range])
  }

  pub fn bytes_mut(
    &mut self,
    offset: usize,
    len: usize,
  ) -> Result<&mut [u8], ArenaError> {
    let range = self.range(offset, len)?;
    Ok(&mut self.region.as_mut_slice()[range])
  }

  /// The `element_size` bytes of the live typed slot at `offset`.
  pub fn slot(
    &self,
    offset: usize,
  ) -> Result<&[u8], ArenaError> {
    let size = self.element_size.ok_or(ArenaError::NotTyped)?;
    self.check_live_slot(offset)?;
    Ok(&self.region.as_slice()[offset..offset + size])
  }

  pub fn slot_mut(
    &mut self,
    offset: usize,
  ) -> Result<&mut [u8], ArenaError> {
    let size = self.element_size.ok_or(ArenaError::NotTyped)?;
    self.check_live_slot(offset)?;
    Ok(&mut self.region.as_mut_slice()[offset..offset + size])
  }

  /// Raw pointer to `offset`, valid until the arena is released.
  pub fn as_ptr(
    &self,
    offset: usize,
  ) -> Result<*mut u8, ArenaError> {
    self.range(offset, 0)?;
    Ok(unsafe { self.region.as_ptr().add(offset) })
  }

  pub fn alignment(&self) -> usize {
    self.alignment
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn first_usable(&self) -> usize {
    self.first_usable
  }

  /// End of the usable region; the guard page, if any, starts here.
  pub fn end(&self) -> usize {
    self.region.len()
  }

  pub fn capacity(&self) -> usize {
    self.end() - self.first_usable
  }

  pub fn used(&self) -> usize {
    self.cursor - self.first_usable
  }

  pub fn remaining(&self) -> usize {
    self.end() - self.cursor
  }

  pub fn is_empty(&self) -> bool {
    self.cursor == self.first_usable
  }

  pub fn page_size(&self) -> usize {
    self.region.page_size()
  }

  pub fn page_count(&self) -> usize {
    self.region.pages()
  }

  pub fn has_guard_page(&self) -> bool {
    self.region.has_guard_page()
  }

  pub fn is_typed(&self) -> bool {
    self.element_size.is_some()
  }

  pub fn element_size(&self) -> Option<usize> {
    self.element_size
  }

  /// Distance between typed slots: the element size rounded up to the
  /// alignment.
  pub fn stride(&self) -> Option<usize> {
    self.element_size.map(|size| align_to!(size, self.alignment))
  }

  /// Number of typed slots below the cursor, holes included.
  pub fn len(&self) -> usize {
    self.stride().map_or(0, |stride| self.used() / stride)
  }

  /// Number of dropped slots waiting to be reused.
  pub fn holes(&self) -> usize {
    self.free_list.as_ref().map_or(0, FreeList::len)
  }

  pub fn has_free_list(&self) -> bool {
    self.free_list.is_some()
  }

  /// Slot the next typed [`Arena::push`] will return instead of bumping.
  pub fn next_free_slot(&self) -> Option<usize> {
    self.free_list.as_ref().and_then(FreeList::peek)
  }

  pub(crate) fn typed_stride(&self) -> Result<usize, ArenaError> {
    self.stride().ok_or(ArenaError::NotTyped)
  }

  pub(crate) fn check_live_slot(
    &self,
    offset: usize,
  ) -> Result<(), ArenaError> {
    let stride = self.typed_stride()?;

    if offset < self.first_usable
      || offset >= self.cursor
      || (offset - self.first_usable) % stride != 0
    {
      return Err(ArenaError::OutOfRange {
        offset,
        start: self.first_usable,
        end: self.cursor,
      });
    }

    Ok(())
  }

  /// Pops the most recently freed slot and zeroes it.
  pub(crate) fn reuse_slot(&mut self) -> Option<usize> {
    let stride = self.stride()?;
    let list = self.free_list.as_mut()?;
    let offset = list.pop()?;

    if list.is_empty() {
      self.release_free_list();
    }

    self.zero(offset, stride);

    Some(offset)
  }

  pub(crate) fn zero(
    &mut self,
    offset: usize,
    len: usize,
  ) {
    debug_assert!(offset + len <= self.end(), "zeroing past the end of the region");
    self.region.as_mut_slice()[offset..offset + len].fill(0);
  }

  fn bump(
    &mut self,
    size: usize,
  ) -> Result<usize, ArenaError> {
    let fits = self
      .cursor
      .checked_add(size)
      .and_then(|end| end.checked_add(self.alignment))
      .is_some_and(|limit| limit < self.end());

    if !fits {
      return Err(ArenaError::Exhausted {
        requested: size,
        remaining: self.remaining(),
      });
    }

    let offset = self.cursor;
    let next = align_to!(offset + size, self.alignment);
    self.cursor = next;

    trace!(offset, size, cursor = next, "pushed");

    Ok(offset)
  }

  fn range(
    &self,
    offset: usize,
    len: usize,
  ) -> Result<std::ops::Range<usize>, ArenaError> {
    match offset.checked_add(len) {
      Some(end) if end <= self.end() => Ok(offset..end),
      _ => Err(ArenaError::OutOfRange {
        offset,
        start: 0,
        end: self.end(),
      }),
    }
  }

  fn ignored_pop_to(
    &self,
    pos: usize,
  ) -> ArenaError {
    warn!(
      pos,
      first_usable = self.first_usable,
      end = self.end(),
      "pop_to target out of range, ignored"
    );

    ArenaError::OutOfRange {
      offset: pos,
      start: self.first_usable,
      end: self.end(),
    }
  }

  fn release_free_list(&mut self) {
    if let Some(list) = self.free_list.take() {
      match list.release() {
        Ok(()) => debug!("released free list"),
        Err(err) => warn!(%err, "failed to release free list"),
      }
    }
  }
}

impl fmt::Debug for Arena {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Arena")
      .field("base", &self.region.as_ptr())
      .field("first_usable", &self.first_usable)
      .field("cursor", &self.cursor)
      .field("end", &self.end())
      .field("alignment", &self.alignment)
      .field("element_size", &self.element_size)
      .field("holes", &self.holes())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn plain(pages: usize) -> Arena {
    Arena::with_config(pages, ArenaConfig::new().with_guard_pages(true)).unwrap()
  }

  fn typed(element_size: usize) -> Arena {
    let config = ArenaConfig::typed(element_size)
      .with_alignment(element_size)
      .with_guard_pages(true);
    Arena::with_config(1, config).unwrap()
  }

  fn write_u64(
    arena: &mut Arena,
    offset: usize,
    value: u64,
  ) {
    arena.slot_mut(offset).unwrap().copy_from_slice(&value.to_ne_bytes());
  }

  fn read_u64(
    arena: &Arena,
    offset: usize,
  ) -> u64 {
    u64::from_ne_bytes(arena.bytes(offset, 8).unwrap().try_into().unwrap())
  }

  #[test]
  fn test_new_arena_bounds() {
    let arena = plain(2);
    assert_eq!(arena.first_usable(), 0);
    assert_eq!(arena.cursor(), 0);
    assert_eq!(arena.end(), 2 * arena.page_size());
    assert_eq!(arena.alignment(), 16);
    assert!(arena.has_guard_page());
    assert!(!arena.is_typed());
    arena.release().unwrap();
  }

  #[test]
  fn test_push_rounds_cursor_to_alignment() {
    let mut arena = plain(1);

    let first = arena.push(13).unwrap();
    let second = arena.push(1).unwrap();

    assert_eq!(first, 0);
    assert_eq!(second, 16);
    assert_eq!(arena.cursor(), 32);
    arena.release().unwrap();
  }

  #[test]
  fn test_push_zero_is_rejected() {
    let mut arena = plain(1);
    assert!(matches!(arena.push(0), Err(ArenaError::InvalidSize(0))));
    assert_eq!(arena.cursor(), 0);
    arena.release().unwrap();
  }

  #[test]
  fn test_push_until_exhausted() {
    let mut arena = plain(1);
    let end = arena.end();

    assert!(matches!(arena.push(end), Err(ArenaError::Exhausted { .. })));
    assert!(matches!(arena.push(end - 16), Err(ArenaError::Exhausted { .. })));
    assert_eq!(arena.cursor(), 0);

    assert_eq!(arena.push(end - 17).unwrap(), 0);
    assert_eq!(arena.cursor(), end - 16);

    let err = arena.push(1).unwrap_err();
    assert!(matches!(err, ArenaError::Exhausted { requested: 1, remaining: 16 }));
    assert_eq!(arena.cursor(), end - 16);
    arena.release().unwrap();
  }

  #[test]
  fn test_push_keeps_alignment_headroom() {
    let mut arena = plain(1);
    let end = arena.end();
    arena.push(end - 64).unwrap();
    assert_eq!(arena.cursor(), end - 64);

    assert!(matches!(arena.push(64), Err(ArenaError::Exhausted { .. })));
    assert!(matches!(arena.push(48), Err(ArenaError::Exhausted { .. })));
    assert_eq!(arena.cursor(), end - 64);

    assert_eq!(arena.push(47).unwrap(), end - 64);
    assert_eq!(arena.cursor(), end - 16);
    arena.release().unwrap();
  }

  #[test]
  fn test_push_huge_does_not_overflow() {
    let mut arena = plain(1);
    arena.push(16).unwrap();
    assert!(matches!(arena.push(usize::MAX), Err(ArenaError::Exhausted { .. })));
    assert_eq!(arena.cursor(), 16);
    arena.release().unwrap();
  }

  #[test]
  fn test_set_alignment_moves_forward_only() {
    let mut arena = plain(1);
    arena.push(8).unwrap();
    assert_eq!(arena.cursor(), 16);

    arena.set_alignment(64).unwrap();
    assert_eq!(arena.cursor(), 64);
    assert_eq!(arena.first_usable(), 0);

    arena.set_alignment(8).unwrap();
    assert_eq!(arena.cursor(), 64);
    assert_eq!(arena.alignment(), 8);
    arena.release().unwrap();
  }

  #[test]
  fn test_set_alignment_rejects_invalid() {
    let mut arena = plain(1);

    for n in [0, 3, 20, 48] {
      assert!(matches!(arena.set_alignment(n), Err(ArenaError::InvalidAlignment(_))));
    }

    let too_big = arena.page_size() * 2;
    assert!(arena.set_alignment(too_big).is_err());
    assert_eq!(arena.alignment(), 16);
    arena.release().unwrap();
  }

  #[test]
  fn test_set_alignment_needs_room() {
    let mut arena = plain(1);
    let end = arena.end();
    arena.push(end - 32).unwrap();

    assert!(arena.set_alignment(64).is_err());
    assert_eq!(arena.cursor(), end - 32);
    arena.release().unwrap();
  }

  #[test]
  fn test_pop_to_rolls_back() {
    let mut arena = plain(1);
    let first = arena.push(64).unwrap();
    arena.push(64).unwrap();

    assert_eq!(arena.pop_to(first).unwrap(), first);
    assert_eq!(arena.push(64).unwrap(), first);

    assert_eq!(arena.pop_to(5).unwrap(), 16);
    arena.release().unwrap();
  }

  #[test]
  fn test_pop_to_out_of_range_is_noop() {
    let mut arena = plain(1);
    arena.push(32).unwrap();

    let past_end = arena.end() + 1;
    assert!(matches!(arena.pop_to(past_end), Err(ArenaError::OutOfRange { .. })));
    assert_eq!(arena.cursor(), 32);
    arena.release().unwrap();
  }

  #[test]
  fn test_reset_releases_free_list() {
    let mut arena = typed(8);
    let first = arena.push(8).unwrap();
    write_u64(&mut arena, first, 99);
    arena.push(8).unwrap();
    arena.push(8).unwrap();
    arena.drop_slot(first + 8).unwrap();

    arena.reset();

    assert!(arena.is_empty());
    assert!(!arena.has_free_list());
    assert_eq!(read_u64(&arena, first), 0);
    arena.release().unwrap();
  }

  #[test]
  fn test_element_size_validation() {
    let mut arena = plain(1);
    assert!(matches!(arena.set_element_size(0), Err(ArenaError::InvalidElementSize(0))));

    arena.push(8).unwrap();
    assert!(arena.set_element_size(8).is_err());

    arena.reset();
    arena.set_element_size(24).unwrap();
    assert_eq!(arena.stride(), Some(32));
    arena.release().unwrap();
  }

  #[test]
  fn test_typed_ops_on_plain_arena() {
    let mut arena = plain(1);
    let offset = arena.push(8).unwrap();

    assert!(matches!(arena.drop_slot(offset), Err(ArenaError::NotTyped)));
    assert!(matches!(arena.pop(offset), Err(ArenaError::NotTyped)));
    assert!(matches!(arena.slot(offset), Err(ArenaError::NotTyped)));
    arena.release().unwrap();
  }

  #[test]
  fn test_typed_push_ignores_smaller_sizes() {
    let mut arena = typed(8);
    assert_eq!(arena.push(1).unwrap(), 0);
    assert_eq!(arena.push(8).unwrap(), 8);
    assert!(matches!(arena.push(9), Err(ArenaError::InvalidSize(9))));
    assert_eq!(arena.len(), 2);
    arena.release().unwrap();
  }

  #[test]
  fn test_drop_top_slot_moves_cursor() {
    let mut arena = typed(8);
    arena.push(8).unwrap();
    let top = arena.push(8).unwrap();

    arena.drop_slot(top).unwrap();

    assert_eq!(arena.cursor(), top);
    assert!(!arena.has_free_list());
    arena.release().unwrap();
  }

  #[test]
  fn test_drop_interior_slot_is_recycled() {
    let mut arena = typed(8);
    let slots: Vec<usize> = (0..4).map(|_| arena.push(8).unwrap()).collect();
    for (i, &slot) in slots.iter().enumerate() {
      write_u64(&mut arena, slot, i as u64 + 1);
    }

    arena.drop_slot(slots[1]).unwrap();
    arena.drop_slot(slots[2]).unwrap();

    assert_eq!(read_u64(&arena, slots[1]), 0);
    assert_eq!(arena.holes(), 2);
    assert_eq!(arena.next_free_slot(), Some(slots[2]));

    let cursor = arena.cursor();
    assert_eq!(arena.push(8).unwrap(), slots[2]);
    assert_eq!(arena.push(8).unwrap(), slots[1]);
    assert_eq!(arena.cursor(), cursor);
    assert!(!arena.has_free_list());

    assert_eq!(arena.push(8).unwrap(), cursor);
    arena.release().unwrap();
  }

  #[test]
  fn test_drop_twice() {
    let mut arena = typed(8);
    let first = arena.push(8).unwrap();
    arena.push(8).unwrap();

    arena.drop_slot(first).unwrap();
    assert!(matches!(arena.drop_slot(first), Err(ArenaError::DoubleFree(_))));
    assert_eq!(arena.holes(), 1);
    arena.release().unwrap();
  }

  #[test]
  fn test_drop_on_empty_arena() {
    let mut arena = typed(8);
    assert!(matches!(arena.drop_slot(0), Err(ArenaError::OutOfRange { .. })));
    assert!(!arena.has_free_list());
    arena.release().unwrap();
  }

  #[test]
  fn test_drop_misaligned_offset() {
    let mut arena = typed(16);
    arena.push(16).unwrap();
    arena.push(16).unwrap();
    assert!(matches!(arena.drop_slot(8), Err(ArenaError::OutOfRange { .. })));
    arena.release().unwrap();
  }

  #[test]
  fn test_dropping_top_trims_trailing_holes() {
    let mut arena = typed(8);
    let slots: Vec<usize> = (0..4).map(|_| arena.push(8).unwrap()).collect();

    arena.drop_slot(slots[1]).unwrap();
    arena.drop_slot(slots[2]).unwrap();
    arena.drop_slot(slots[3]).unwrap();

    assert_eq!(arena.cursor(), slots[1]);
    assert_eq!(arena.len(), 1);
    assert!(!arena.has_free_list());
    arena.release().unwrap();
  }

  #[test]
  fn test_pop_to_forgets_holes_above_cursor() {
    let mut arena = typed(8);
    let slots: Vec<usize> = (0..6).map(|_| arena.push(8).unwrap()).collect();

    arena.drop_slot(slots[1]).unwrap();
    arena.drop_slot(slots[4]).unwrap();

    arena.pop_to(slots[3]).unwrap();

    assert_eq!(arena.holes(), 1);
    assert_eq!(arena.next_free_slot(), Some(slots[1]));
    arena.release().unwrap();
  }

  #[test]
  fn test_pop_zeroes_top_slot() {
    let mut arena = typed(8);
    let slot = arena.push(8).unwrap();
    write_u64(&mut arena, slot, 12345);

    arena.pop(slot).unwrap();

    assert_eq!(read_u64(&arena, slot), 0);
    assert!(arena.is_empty());
    arena.release().unwrap();
  }

  #[test]
  fn test_pop_to_without_zero_on_free_keeps_bytes() {
    let config = ArenaConfig::typed(8).with_alignment(8).with_zero_on_free(false);
    let mut arena = Arena::with_config(1, config).unwrap();
    let slot = arena.push(8).unwrap();
    write_u64(&mut arena, slot, 7);

    arena.drop_slot(slot).unwrap();
    assert_eq!(read_u64(&arena, slot), 7);

    arena.push(8).unwrap();
    arena.pop(slot).unwrap();
    assert_eq!(read_u64(&arena, slot), 0);
    arena.release().unwrap();
  }

  #[test]
  fn test_release_with_free_list() {
    let mut arena = typed(8);
    let first = arena.push(8).unwrap();
    arena.push(8).unwrap();
    arena.drop_slot(first).unwrap();
    assert!(arena.has_free_list());

    arena.release().unwrap();
  }

  #[test]
  fn test_drop_with_free_list_unmaps_both() {
    let mut arena = typed(8);
    let first = arena.push(8).unwrap();
    arena.push(8).unwrap();
    arena.drop_slot(first).unwrap();
    assert!(arena.has_free_list());

    drop(arena);
  }

  #[test]
  fn test_bytes_bounds() {
    let mut arena = plain(1);
    let end = arena.end();
    assert!(arena.bytes(end - 4, 4).is_ok());
    assert!(arena.bytes(end - 4, 5).is_err());
    assert!(arena.bytes_mut(usize::MAX, 2).is_err());
    assert!(arena.as_ptr(end).is_ok());
    assert!(arena.as_ptr(end + 1).is_err());
    arena.release().unwrap();
  }
}
