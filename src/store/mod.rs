//! Local storage and community posts.
//!
//! # Data Flow
//! ```text
//! SlotStore (memory | file)        ← session token, local posts
//!     ↑
//! PostStore (trait)
//!     ├── local.rs  → community_posts / community_comments slots
//!     └── remote.rs → trading API /community/{posts,comments}
//! ```
//!
//! # Design Decisions
//! - One capability trait; the backend is chosen once from `posts.mode`
//! - Local mode makes no consistency promise beyond last write wins

pub mod local;
pub mod posts;
pub mod remote;
pub mod slot;

pub use posts::{open, Comment, NewComment, NewPost, Post, PostStore, PostStoreError};
pub use slot::{FileSlotStore, MemorySlotStore, SlotError, SlotStore};
