//! Page composition: distributes wrapped lines over fixed-height pages.
//!
//! The compositor walks every line of every block exactly once, in order,
//! with a [`PaginationCursor`] that only moves forward. A line that does not
//! fit closes the current page and is retried, unchanged, on the next one, so
//! a block spanning a page boundary resumes at the exact line it stopped on.

use super::block::ContentBlock;
use super::wrap::{LineWrapper, WrappedLine};
use crate::config::BlockBreak;
use crate::error::{Error, Result};
use crate::fonts::MeasureLookup;

/// Position of the next line not yet placed on any page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PaginationCursor {
    /// Current block
    pub block_index: usize,
    /// Next line within the block
    pub line_index: usize,
}

/// A line placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// The wrapped line
    pub line: WrappedLine,
    /// Offset of the line's top edge from the top of the content area
    pub top_px: f32,
}

/// One composed page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number
    pub page_number: usize,
    /// Lines in placement order
    pub placed_lines: Vec<PlacedLine>,
    /// Height consumed by lines and inter-block gaps
    pub used_height_px: f32,
}

impl Page {
    /// Placed lines without their offsets.
    pub fn lines(&self) -> impl Iterator<Item = &WrappedLine> {
        self.placed_lines.iter().map(|p| &p.line)
    }

    /// Whether any line on the page belongs to `block_index`.
    pub fn contains_block(&self, block_index: usize) -> bool {
        self.lines().any(|l| l.block_index == block_index)
    }
}

/// Greedy page compositor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCompositor {
    content_height_px: f32,
    block_break: BlockBreak,
}

impl PageCompositor {
    /// Create a compositor for the given content height.
    pub fn new(content_height_px: f32, block_break: BlockBreak) -> Self {
        Self {
            content_height_px,
            block_break,
        }
    }

    /// Vertical budget of one page.
    pub fn content_height(&self) -> f32 {
        self.content_height_px
    }

    /// Paginate `blocks`, wrapping each lazily on first visit.
    pub fn paginate<M>(&self, blocks: &[ContentBlock], wrapper: &LineWrapper, lookup: &M) -> Result<Vec<Page>>
    where
        M: MeasureLookup + ?Sized,
    {
        self.paginate_with(blocks, wrapper, lookup, |_, _| {})
    }

    /// Like [`paginate`](Self::paginate), reporting every placement as
    /// `(cursor, page_number)` before the cursor advances.
    pub fn paginate_with<M, F>(
        &self,
        blocks: &[ContentBlock],
        wrapper: &LineWrapper,
        lookup: &M,
        mut on_place: F,
    ) -> Result<Vec<Page>>
    where
        M: MeasureLookup + ?Sized,
        F: FnMut(PaginationCursor, usize),
    {
        let budget = self.content_height_px;
        if !budget.is_finite() || budget <= 0.0 {
            return Err(Error::PaginationDeadlock {
                content_height_px: budget,
                line_height_px: blocks.first().map(|b| b.line_height_px).unwrap_or(0.0),
            });
        }
        if let Some(block) = blocks
            .iter()
            .find(|b| !b.line_height_px.is_finite() || b.line_height_px <= 0.0)
        {
            return Err(Error::InvalidConfig(format!(
                "line height must be positive, got {} for font '{}'",
                block.line_height_px, block.font_family
            )));
        }

        let mut wrapped: Vec<Option<Vec<WrappedLine>>> = vec![None; blocks.len()];
        let mut cursor = PaginationCursor::default();
        let mut pages: Vec<Page> = Vec::new();
        let mut current: Vec<PlacedLine> = Vec::new();
        let mut height = 0.0f32;
        let mut pending_gap = 0.0f32;

        loop {
            if cursor.block_index >= blocks.len() {
                if !current.is_empty() {
                    flush(&mut pages, &mut current, &mut height);
                }
                break;
            }

            let block = &blocks[cursor.block_index];
            if wrapped[cursor.block_index].is_none() {
                let measure = lookup.measure_for(block)?;
                wrapped[cursor.block_index] = Some(wrapper.wrap(block, cursor.block_index, &measure));
            }
            let lines = wrapped[cursor.block_index].as_deref().unwrap_or(&[]);

            if cursor.line_index >= lines.len() {
                cursor.block_index += 1;
                cursor.line_index = 0;
                if cursor.block_index < blocks.len() {
                    match self.block_break {
                        BlockBreak::Gap(gap) => pending_gap = gap.max(0.0),
                        BlockBreak::NewPage => {
                            if !current.is_empty() {
                                flush(&mut pages, &mut current, &mut height);
                            }
                        },
                    }
                }
                continue;
            }

            let line = &lines[cursor.line_index];
            let gap = if current.is_empty() { 0.0 } else { pending_gap };
            if height + gap + line.height_px > budget {
                if current.is_empty() {
                    return Err(Error::PaginationDeadlock {
                        content_height_px: budget,
                        line_height_px: line.height_px,
                    });
                }
                // Retry the same line on a fresh page; the gap does not carry over.
                flush(&mut pages, &mut current, &mut height);
                pending_gap = 0.0;
                continue;
            }

            let top_px = height + gap;
            current.push(PlacedLine {
                line: line.clone(),
                top_px,
            });
            height = top_px + line.height_px;
            pending_gap = 0.0;
            on_place(cursor, pages.len() + 1);
            cursor.line_index += 1;
        }

        log::info!(
            "Paginated {} block(s) into {} page(s) ({}px per page)",
            blocks.len(),
            pages.len(),
            budget
        );
        Ok(pages)
    }
}

fn flush(pages: &mut Vec<Page>, current: &mut Vec<PlacedLine>, height: &mut f32) {
    let page_number = pages.len() + 1;
    log::debug!(
        "Page {} closed with {} line(s), {:.1}px used",
        page_number,
        current.len(),
        *height
    );
    pages.push(Page {
        page_number,
        placed_lines: std::mem::take(current),
        used_height_px: *height,
    });
    *height = 0.0;
}
