use std::mem;

use tracing::debug;

use crate::{
  error::ArenaError,
  region::{Region, page_size},
};

const WORD: usize = mem::size_of::<usize>();

/// LIFO stack of freed slot offsets, kept in its own mapping.
///
/// ```text
///   ┌────────┬────────┬────────┬──────────────────────────┐
///   │ off #0 │ off #1 │ off #2 │        unused            │
///   └────────┴────────┴────────┴──────────────────────────┘
///                              ▲
///                             len (next entry)
/// ```
///
/// The owning arena creates it on the first interior drop and releases it
/// once it runs empty.
pub struct FreeList {
  region: Region,
  len: usize,
}

impl FreeList {
  /// Maps a free list able to hold at least `entries` offsets.
  pub fn with_capacity(
    entries: usize,
    guard_page: bool,
  ) -> Result<Self, ArenaError> {
    let page_size = page_size()?;
    let bytes = entries.max(1).checked_mul(WORD).ok_or(ArenaError::InvalidSize(entries))?;
    let pages = bytes.div_ceil(page_size);

    let region = Region::map(pages, guard_page)?;

    debug!(entries, pages, "created free list");

    Ok(Self { region, len: 0 })
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn capacity(&self) -> usize {
    self.region.len() / WORD
  }

  pub fn push(
    &mut self,
    offset: usize,
  ) -> Result<(), ArenaError> {
    if self.len == self.capacity() {
      return Err(ArenaError::Exhausted {
        requested: WORD,
        remaining: 0,
      });
    }

    self.write(self.len, offset);
    self.len += 1;

    Ok(())
  }

  pub fn pop(&mut self) -> Option<usize> {
    let offset = self.peek()?;
    self.len -= 1;
    self.write(self.len, 0);
    Some(offset)
  }

  /// The offset the next [`FreeList::pop`] returns.
  pub fn peek(&self) -> Option<usize> {
    match self.len {
      0 => None,
      len => Some(self.read(len - 1)),
    }
  }

  pub fn contains(
    &self,
    offset: usize,
  ) -> bool {
    self.iter().any(|entry| entry == offset)
  }

  /// Removes `offset`, keeping the order of the remaining entries.
  pub fn remove(
    &mut self,
    offset: usize,
  ) -> bool {
    let Some(index) = self.iter().position(|entry| entry == offset) else {
      return false;
    };

    let slice = self.region.as_mut_slice();
    slice.copy_within((index + 1) * WORD..self.len * WORD, index * WORD);
    self.len -= 1;
    self.write(self.len, 0);

    true
  }

  /// Keeps only the offsets for which `keep` returns `true`.
  pub fn retain(
    &mut self,
    mut keep: impl FnMut(usize) -> bool,
  ) {
    let mut kept = 0;

    for index in 0..self.len {
      let entry = self.read(index);
      if keep(entry) {
        self.write(kept, entry);
        kept += 1;
      }
    }

    for index in kept..self.len {
      self.write(index, 0);
    }

    self.len = kept;
  }

  /// Entries from oldest to most recently pushed.
  pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
    (0..self.len).map(|index| self.read(index))
  }

  pub fn release(self) -> Result<(), ArenaError> {
    self.region.release()
  }

  fn read(
    &self,
    index: usize,
  ) -> usize {
    let mut word = [0u8; WORD];
    word.copy_from_slice(&self.region.as_slice()[index * WORD..(index + 1) * WORD]);
    usize::from_ne_bytes(word)
  }

  fn write(
    &mut self,
    index: usize,
    offset: usize,
  ) {
    self.region.as_mut_slice()[index * WORD..(index + 1) * WORD]
      .copy_from_slice(&offset.to_ne_bytes());
  }
}
