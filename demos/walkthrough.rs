use std::io::Read;

use rarena::{Arena, ArenaConfig, ArenaError};
use tracing_subscriber::EnvFilter;

/// Waits until the user presses ENTER.
/// Useful when you want to inspect the mappings with `pmap` or
/// `/proc/<pid>/maps` while the demo is paused.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn print_arena(
  label: &str,
  arena: &Arena,
) {
  println!(
    "[{}] PID = {}, base = {:?}, cursor = {}, remaining = {}, holes = {}",
    label,
    std::process::id(),
    arena.as_ptr(0).unwrap_or(std::ptr::null_mut()),
    arena.cursor(),
    arena.remaining(),
    arena.holes(),
  );
}

fn read_u64(
  arena: &Arena,
  offset: usize,
) -> Result<u64, ArenaError> {
  let mut word = [0u8; 8];
  word.copy_from_slice(arena.bytes(offset, 8)?);
  Ok(u64::from_ne_bytes(word))
}

fn main() -> Result<(), ArenaError> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
    .init();

  // --------------------------------------------------------------------
  // 1) A plain arena: four pages plus a guard page.
  // --------------------------------------------------------------------
  let mut arena = Arena::with_config(4, ArenaConfig::new().with_guard_pages(true))?;
  print_arena("1: mapped", &arena);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Bump a few odd-sized blocks and watch the cursor round up.
  // --------------------------------------------------------------------
  let header = arena.push(13)?;
  let body = arena.push(100)?;
  arena.bytes_mut(body, 100)?.fill(0xAB);
  println!("\n[2] header at {header}, body at {body}");
  print_arena("2: pushed", &arena);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) Throw the body away again.
  // --------------------------------------------------------------------
  arena.pop_to(body)?;
  print_arena("3: popped to body", &arena);
  arena.release()?;
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) A typed arena of u64 values with a hole in the middle.
  // --------------------------------------------------------------------
  let mut arena = Arena::with_config(1, ArenaConfig::typed(8).with_alignment(8))?;
  let mut slots = Vec::new();
  for value in [10u64, 20, 30, 40] {
    let slot = arena.push(8)?;
    arena.slot_mut(slot)?.copy_from_slice(&value.to_ne_bytes());
    slots.push(slot);
  }

  arena.pop(slots[1])?;
  println!("\n[4] dropped the slot holding 20, next reuse = {:?}", arena.next_free_slot());
  print_arena("4: hole", &arena);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 5) Compact: the top element moves into the hole.
  // --------------------------------------------------------------------
  let moved = arena.defrag()?;
  let values = (0..arena.len())
    .map(|i| read_u64(&arena, arena.first_usable() + i * 8))
    .collect::<Result<Vec<_>, _>>()?;
  println!("\n[5] moved {moved} element(s), live values = {values:?}");
  print_arena("5: defragmented", &arena);

  arena.release()?;

  println!("\n[6] End of example. Both arenas have been unmapped.");

  Ok(())
}
