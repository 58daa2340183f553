//! Tests for line wrapping and pagination.
//!
//! All measurement is synthetic so results do not depend on installed fonts.

use dastavez::config::BlockBreak;
use dastavez::fonts::{MeasureFn, SimpleFontMetrics};
use dastavez::layout::{ContentBlock, Direction, LineKind, LineWrapper, Page, PageCompositor, PaginationCursor};
use dastavez::Error;
use proptest::prelude::*;

/// 6px per character at size 10.
fn monospace() -> MeasureFn {
    MeasureFn::new(SimpleFontMetrics::default())
}

fn block(body: &str, direction: Direction) -> ContentBlock {
    ContentBlock::new(body, direction, "Test", 10.0)
}

fn body_tokens(pages: &[Page], block_index: usize) -> Vec<String> {
    pages
        .iter()
        .flat_map(|p| p.placed_lines.iter())
        .filter(|p| p.line.block_index == block_index && p.line.kind == LineKind::Body)
        .flat_map(|p| p.line.text.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .collect()
}

fn repeat_words(word: &str, count: usize) -> String {
    vec![word; count].join(" ")
}

mod scenarios {
    use super::*;

    #[test]
    fn test_scenario_a_four_words_per_line() {
        let wrapper = LineWrapper::new(120.0);
        let lines = wrapper.wrap(
            &block("The quick brown fox jumps over the lazy dog", Direction::Ltr),
            0,
            &monospace(),
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[0].text.split(' ').count() <= 4);
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.text.split(' ')).collect();
        assert_eq!(
            rejoined,
            "The quick brown fox jumps over the lazy dog".split(' ').collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_scenario_b_translation_blocks_do_not_interleave() {
        // 300px fits eight five-letter words; 450px holds 30 lines of 15px.
        let english = repeat_words("court", 400);
        let urdu = repeat_words("عدالت", 400);
        let blocks = vec![block(&english, Direction::Ltr), block(&urdu, Direction::Rtl)];

        let pages = PageCompositor::new(450.0, BlockBreak::NewPage)
            .paginate(&blocks, &LineWrapper::new(300.0), &monospace())
            .unwrap();

        assert_eq!(pages.len(), 4);
        assert_eq!(pages[0].placed_lines.len(), 30);
        assert_eq!(pages[1].placed_lines.len(), 20);

        let english_pages: Vec<usize> = pages.iter().filter(|p| p.contains_block(0)).map(|p| p.page_number).collect();
        let urdu_pages: Vec<usize> = pages.iter().filter(|p| p.contains_block(1)).map(|p| p.page_number).collect();
        assert_eq!(english_pages, vec![1, 2]);
        assert_eq!(urdu_pages, vec![3, 4]);
        assert!(pages.iter().all(|p| !(p.contains_block(0) && p.contains_block(1))));

        assert_eq!(body_tokens(&pages, 0).len(), 400);
        assert_eq!(body_tokens(&pages, 1).len(), 400);
    }

    #[test]
    fn test_scenario_b_with_gap_continues_on_same_page() {
        let blocks = vec![
            block(&repeat_words("court", 400), Direction::Ltr),
            block(&repeat_words("عدالت", 400), Direction::Rtl),
        ];
        let pages = PageCompositor::new(450.0, BlockBreak::Gap(15.0))
            .paginate(&blocks, &LineWrapper::new(300.0), &monospace())
            .unwrap();

        // 50 + 50 lines plus one 15px gap on page 2
        assert_eq!(pages.len(), 4);
        assert!(pages[1].contains_block(0) && pages[1].contains_block(1));
        let first_urdu = pages[1].placed_lines.iter().find(|p| p.line.block_index == 1).unwrap();
        assert_eq!(first_urdu.top_px, 20.0 * 15.0 + 15.0);
    }

    #[test]
    fn test_scenario_c_overwide_token() {
        let measure = MeasureFn::from_fn(|text, _| if text.contains("WIDE") { 2000.0 } else { 6.0 * text.chars().count() as f32 });
        let blocks = vec![block("before WIDE after", Direction::Ltr)];
        let pages = PageCompositor::new(700.0, BlockBreak::default())
            .paginate(&blocks, &LineWrapper::new(500.0), &measure)
            .unwrap();

        let lines: Vec<_> = pages[0].lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text, "WIDE");
        assert_eq!(lines[1].width_px, 2000.0);
    }

    #[test]
    fn test_scenario_d_zero_height_is_a_deadlock() {
        let blocks = vec![block("some words here", Direction::Ltr)];
        let result = PageCompositor::new(0.0, BlockBreak::default()).paginate(&blocks, &LineWrapper::new(500.0), &monospace());
        assert!(matches!(result, Err(Error::PaginationDeadlock { .. })));
    }

    #[test]
    fn test_line_taller_than_page_is_a_deadlock() {
        let blocks = vec![block("words", Direction::Ltr).with_line_height(40.0)];
        let result = PageCompositor::new(30.0, BlockBreak::default()).paginate(&blocks, &LineWrapper::new(500.0), &monospace());
        match result {
            Err(Error::PaginationDeadlock {
                content_height_px,
                line_height_px,
            }) => {
                assert_eq!(content_height_px, 30.0);
                assert_eq!(line_height_px, 40.0);
            },
            other => panic!("expected deadlock, got {:?}", other),
        }
    }
}

mod resumption {
    use super::*;

    #[test]
    fn test_block_resumes_at_exact_line() {
        // Ten one-word lines, four per page
        let body = (0..10).map(|i| format!("w{}", i)).collect::<Vec<_>>().join("\n");
        let blocks = vec![block(&body, Direction::Ltr)];
        let pages = PageCompositor::new(60.0, BlockBreak::default())
            .paginate(&blocks, &LineWrapper::new(500.0), &monospace())
            .unwrap();

        let per_page: Vec<Vec<&str>> = pages
            .iter()
            .map(|p| p.lines().map(|l| l.text.as_str()).collect())
            .collect();
        assert_eq!(
            per_page,
            vec![
                vec!["w0", "w1", "w2", "w3"],
                vec!["w4", "w5", "w6", "w7"],
                vec!["w8", "w9"],
            ]
        );
        assert_eq!(pages.iter().map(|p| p.page_number).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_title_lines_count_against_height() {
        let blocks = vec![block("a\nb\nc", Direction::Ltr).with_title("Heading")];
        // Title line is 18.75px; with three 15px lines, 60px holds title + two lines
        let pages = PageCompositor::new(60.0, BlockBreak::default())
            .paginate(&blocks, &LineWrapper::new(500.0), &monospace())
            .unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].placed_lines[0].line.kind, LineKind::Title);
        assert_eq!(pages[0].placed_lines.len(), 3);
        assert_eq!(pages[1].placed_lines[0].line.text, "c");
    }
}

fn words() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => "[a-z]{1,12}",
            1 => "[اآبپتٹثجچحخدڈذرڑزژسشصضطظعغفقکگلمنوہھءیے]{1,8}",
            1 => Just("\n".to_string()),
        ],
        0..120,
    )
    .prop_map(|tokens| tokens.join(" "))
}

fn blocks() -> impl Strategy<Value = Vec<ContentBlock>> {
    prop::collection::vec(
        (words(), any::<bool>(), 10.0f32..30.0).prop_map(|(body, rtl, line_height)| {
            let direction = if rtl { Direction::Rtl } else { Direction::Ltr };
            block(&body, direction).with_line_height(line_height)
        }),
        1..5,
    )
}

fn break_mode() -> impl Strategy<Value = BlockBreak> {
    prop_oneof![Just(BlockBreak::NewPage), (0.0f32..40.0).prop_map(BlockBreak::Gap)]
}

proptest! {
    #[test]
    fn prop_reconstruction(blocks in blocks(), width in 30.0f32..400.0, height in 40.0f32..600.0, mode in break_mode()) {
        let pages = PageCompositor::new(height, mode)
            .paginate(&blocks, &LineWrapper::new(width), &monospace())
            .unwrap();
        for (index, block) in blocks.iter().enumerate() {
            let expected: Vec<String> = block.body.split_whitespace().map(str::to_string).collect();
            prop_assert_eq!(body_tokens(&pages, index), expected);
        }
    }

    #[test]
    fn prop_every_line_placed_exactly_once(blocks in blocks(), width in 30.0f32..400.0, height in 40.0f32..600.0) {
        let wrapper = LineWrapper::new(width);
        let measure = monospace();
        let pages = PageCompositor::new(height, BlockBreak::default())
            .paginate(&blocks, &wrapper, &measure)
            .unwrap();
        let placed: Vec<_> = pages.iter().flat_map(|p| p.lines().cloned()).collect();
        let wrapped: Vec<_> = blocks
            .iter()
            .enumerate()
            .flat_map(|(i, b)| wrapper.wrap(b, i, &measure))
            .collect();
        prop_assert_eq!(placed, wrapped);
    }

    #[test]
    fn prop_height_bound(blocks in blocks(), width in 30.0f32..400.0, height in 40.0f32..600.0, mode in break_mode()) {
        let pages = PageCompositor::new(height, mode)
            .paginate(&blocks, &LineWrapper::new(width), &monospace())
            .unwrap();
        for page in &pages {
            prop_assert!(page.used_height_px <= height);
            prop_assert!(!page.placed_lines.is_empty());
            for placed in &page.placed_lines {
                prop_assert!(placed.top_px + placed.line.height_px <= height);
            }
        }
    }

    #[test]
    fn prop_cursor_monotonic(blocks in blocks(), width in 30.0f32..400.0, height in 40.0f32..600.0, mode in break_mode()) {
        let mut seen: Vec<(PaginationCursor, usize)> = Vec::new();
        PageCompositor::new(height, mode)
            .paginate_with(&blocks, &LineWrapper::new(width), &monospace(), |cursor, page| seen.push((cursor, page)))
            .unwrap();
        for pair in seen.windows(2) {
            prop_assert!(pair[0].0 < pair[1].0);
            prop_assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn prop_deterministic(blocks in blocks(), width in 30.0f32..400.0, height in 40.0f32..600.0, mode in break_mode()) {
        let compositor = PageCompositor::new(height, mode);
        let wrapper = LineWrapper::new(width);
        let first = compositor.paginate(&blocks, &wrapper, &monospace()).unwrap();
        let second = compositor.paginate(&blocks, &wrapper, &monospace()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_direction_does_not_affect_wrapping(body in words(), width in 30.0f32..400.0) {
        let wrapper = LineWrapper::new(width);
        let ltr = wrapper.wrap(&block(&body, Direction::Ltr), 0, &monospace());
        let rtl = wrapper.wrap(&block(&body, Direction::Rtl), 0, &monospace());
        prop_assert_eq!(ltr, rtl);
    }

    #[test]
    fn prop_lines_fit_unless_single_token(body in words(), width in 30.0f32..400.0) {
        let measure = monospace();
        for (text, line_width) in LineWrapper::new(width).wrap_text(&body, 10.0, &measure) {
            prop_assert!(line_width <= width || !text.contains(' '));
        }
    }
}
