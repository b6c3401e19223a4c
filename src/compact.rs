use tracing::debug;

use crate::{arena::Arena, error::ArenaError};

impl Arena {
  /// Exchanges the contents of two live typed slots.
  ///
  /// The cursor and the free list are left as they are.
  pub fn swap(
    &mut self,
    a: usize,
    b: usize,
  ) -> Result<(), ArenaError> {
    let stride = self.typed_stride()?;
    self.check_live_slot(a)?;
    self.check_live_slot(b)?;

    if a == b {
      return Ok(());
    }

    let (low, high) = (a.min(b), a.max(b));
    let (head, tail) = self.region.as_mut_slice().split_at_mut(high);
    head[low..low + stride].swap_with_slice(&mut tail[..stride]);

    Ok(())
  }

  /// Closes every hole left by interior drops and returns how many
  /// elements were moved.
  ///
  /// ```text
  ///   before:  │ 10 │ __ │ 30 │ 40 │          free list: [1]
  ///   after:   │ 10 │ 40 │ 30 │              free list: none
  /// ```
  ///
  /// Each round moves the topmost element into the hole the free list
  /// hands out next, then pulls the cursor back over the vacated slot (and
  /// over any holes that now sit directly below it).
  pub fn defrag(&mut self) -> Result<usize, ArenaError> {
    let stride = self.typed_stride()?;
    let mut moved = 0;

    while self.has_free_list() {
      let top = self.cursor - stride;

      let Some(hole) = self.reuse_slot() else {
        break;
      };
      debug_assert!(hole < top, "free list recorded a slot at or above the top");

      self.region.as_mut_slice().copy_within(top..top + stride, hole);
      self.pop_to(top)?;

      moved += 1;
    }

    debug!(moved, len = self.len(), "defragmented arena");

    Ok(moved)
  }
}
