//! Line wrapping and pagination.
//!
//! - [`LineWrapper`]: greedy, direction-agnostic wrapping of one block
//! - [`PageCompositor`]: distributes the wrapped lines of all blocks over pages
//!
//! Both work on logical pixels and never touch a raster surface, so the
//! resulting [`Page`]s can feed any backend.

mod block;
mod paginate;
mod wrap;

pub use block::{ContentBlock, Direction, TextAlign, TITLE_SCALE};
pub use paginate::{Page, PageCompositor, PaginationCursor, PlacedLine};
pub use wrap::{LineKind, LineWrapper, WrappedLine};
