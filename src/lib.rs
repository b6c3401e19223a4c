//! # rarena - A Region-Based Arena Allocator
//!
//! This crate provides an **arena allocator** that carves allocations out of
//! a single block of virtual memory obtained with `mmap(2)`, in strict stack
//! order, with an optional "typed" mode that recycles freed slots.
//!
//! ## Overview
//!
//! ```text
//!   Arena Concept:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                      MAPPED REGION (n pages)                         │
//!   │                                                                      │
//!   │   ┌─────┬─────┬─────┬─────┬──────────────────────────────┬────────┐  │
//!   │   │ A1  │ A2  │ A3  │ A4  │          Free Space          │ Guard  │  │
//!   │   └─────┴─────┴─────┴─────┴──────────────────────────────┴────────┘  │
//!   │   ▲                       ▲                              ▲           │
//!   │   │                       │                              │           │
//!   │ first_usable            cursor                          end          │
//!   │                      (next alloc)                                    │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   push:   the cursor moves right by the (aligned) size.   O(1)
//!   pop_to: the cursor moves back to an earlier offset.     O(1)
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rarena
//!   ├── align      - Alignment helpers (align_to!)
//!   ├── config     - ArenaConfig
//!   ├── error      - ArenaError
//!   ├── region     - mmap/munmap/mprotect wrapper (Region)
//!   ├── free_list  - LIFO stack of freed slot offsets (internal)
//!   ├── arena      - Arena: cursor and typed recycling
//!   └── compact    - Arena::swap and Arena::defrag
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rarena::{Arena, ArenaError};
//!
//! fn main() -> Result<(), ArenaError> {
//!     let mut arena = Arena::new(4)?;
//!
//!     let header = arena.push(64)?;
//!     let body = arena.push(256)?;
//!     arena.bytes_mut(body, 5)?.copy_from_slice(b"hello");
//!
//!     // Throw away `body` (and everything after it).
//!     arena.pop_to(body)?;
//!     assert_eq!(arena.cursor(), header + 64);
//!
//!     arena.release()
//! }
//! ```
//!
//! ## Typed Mode
//!
//! An arena declared to hold a single element size becomes a grid of slots.
//! Dropping a slot in the middle leaves a hole that is remembered in a free
//! list (itself backed by its own mapping) and handed out by the next push:
//!
//! ```text
//!   push × 4          │ 10 │ 20 │ 30 │ 40 │
//!   drop(20)          │ 10 │ __ │ 30 │ 40 │      free list: [1]
//!   push              │ 10 │ ▓▓ │ 30 │ 40 │      free list: none
//!                           ▲
//!                           └── reused slot, zeroed
//!
//!   drop(20), defrag  │ 10 │ 40 │ 30 │          top element moved into hole
//! ```
//!
//! ## Guard Pages
//!
//! With [`ArenaConfig::guard_pages`] (on by default in debug builds) one
//! more page is mapped after the region with `PROT_NONE`, so a write that
//! runs past the end faults immediately.
//!
//! ## Errors
//!
//! Capacity and usage problems (exhaustion, bad alignment, offsets outside
//! the live range) come back as [`ArenaError`] values and leave the arena
//! unchanged. OS failures are reported as [`ArenaError::Os`];
//! [`ArenaError::is_fatal`] tells them apart.
//!
//! ## Limitations
//!
//! - **Single-threaded only**: No synchronization primitives
//! - **No general free**: Plain arenas only give memory back via `pop_to`
//! - **Fixed size**: The region never grows after creation
//! - **Unix-only**: Requires `libc` and `mmap` (POSIX systems)

pub mod align;
mod arena;
mod compact;
pub mod config;
pub mod error;
mod free_list;
pub mod region;

pub use arena::Arena;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use region::{Region, page_size};
