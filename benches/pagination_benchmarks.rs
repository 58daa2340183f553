use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dastavez::config::BlockBreak;
use dastavez::fonts::{MeasureFn, SimpleFontMetrics};
use dastavez::layout::{ContentBlock, Direction, LineWrapper, PageCompositor};

// Alternating English paragraphs and Urdu renderings of roughly `word_count` words each
fn generate_blocks(word_count: usize) -> Vec<ContentBlock> {
    let english_words = ["the", "court", "hereby", "orders", "that", "appellant", "shall", "appear"];
    let urdu_words = ["عدالت", "حکم", "دیتی", "ہے", "کہ", "اپیل", "کنندہ", "پیش"];

    let mut english = String::new();
    let mut urdu = String::new();
    for i in 0..word_count {
        english.push_str(english_words[i % english_words.len()]);
        urdu.push_str(urdu_words[i % urdu_words.len()]);
        if i % 60 == 59 {
            english.push('\n');
            urdu.push('\n');
        } else {
            english.push(' ');
            urdu.push(' ');
        }
    }

    vec![
        ContentBlock::new(english, Direction::Ltr, "Times New Roman", 12.0).with_title("Original Text"),
        ContentBlock::new(urdu, Direction::Rtl, "Noto Nastaliq Urdu", 14.0).with_title("Translation"),
    ]
}

fn benchmark_wrapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap");
    let measure = MeasureFn::new(SimpleFontMetrics::default());
    let wrapper = LineWrapper::new(1000.0);

    for size in [1_000, 10_000, 50_000] {
        let blocks = generate_blocks(size);
        group.throughput(Throughput::Elements(size as u64 * 2));
        group.bench_with_input(BenchmarkId::from_parameter(size), &blocks, |b, blocks| {
            b.iter(|| {
                for (index, block) in blocks.iter().enumerate() {
                    black_box(wrapper.wrap(black_box(block), index, &measure));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_pagination(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate");
    let measure = MeasureFn::new(SimpleFontMetrics::default());
    let wrapper = LineWrapper::new(1000.0);

    for size in [1_000, 10_000, 50_000] {
        let blocks = generate_blocks(size);
        group.throughput(Throughput::Elements(size as u64 * 2));

        for (label, mode) in [("new_page", BlockBreak::NewPage), ("gap", BlockBreak::Gap(24.0))] {
            let compositor = PageCompositor::new(1400.0, mode);
            group.bench_with_input(BenchmarkId::new(label, size), &blocks, |b, blocks| {
                b.iter(|| compositor.paginate(black_box(blocks), &wrapper, &measure));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_wrapping, benchmark_pagination);
criterion_main!(benches);
