//! Benchmarks for note markup serialization.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use quillnote::buffer::{TaggedBuffer, TextContainer};
use quillnote::codec::{deserialize, serialize};
use quillnote::style::{Decoration, Size, Tag};

fn styled_buffer(paragraphs: usize) -> TaggedBuffer {
    let paragraph = "Lorem ipsum dolor sit amet, consectetur <adipiscing> elit & more.\n";
    let mut buf = TaggedBuffer::from_text(&paragraph.repeat(paragraphs));
    let len = paragraph.chars().count();
    for i in 0..paragraphs {
        let start = i * len;
        buf.apply_tag(Tag::Size(Size::Pt11), start..start + len);
        buf.apply_tag(Tag::Decoration(Decoration::Bold), start + 6..start + 17);
        buf.apply_tag(Tag::Decoration(Decoration::Italic), start + 12..start + 28);
        if i % 3 == 0 {
            buf.remove_tag(Tag::Size(Size::Pt11), start..start + 5);
            buf.apply_tag(Tag::Size(Size::Pt26), start..start + 5);
        }
    }
    buf
}

fn bench_serialize(c: &mut Criterion) {
    let buf = styled_buffer(500);
    c.bench_function("serialize_500_paragraphs", |b| {
        b.iter(|| serialize(black_box(&buf)))
    });
}

fn bench_deserialize(c: &mut Criterion) {
    let markup = serialize(&styled_buffer(500));
    c.bench_function("deserialize_500_paragraphs", |b| {
        b.iter(|| {
            let mut buf = TaggedBuffer::empty();
            deserialize(black_box(&markup), &mut buf);
            buf
        })
    });
}

criterion_group!(benches, bench_serialize, bench_deserialize);
criterion_main!(benches);
