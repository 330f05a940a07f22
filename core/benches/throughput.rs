use divan::{Bencher, black_box};
use thinkstream_core::{ParserState, StreamSegmenter};

fn main() {
    divan::main();
}

// Sample reasoning-model replies
const SAMPLE_REPLIES: &[&str] = &[
    "<think>\nThe user wants a roadmap for learning Rust.\nStart with ownership.\n</think>\n# Rust Roadmap\n1. Ownership\n2. Traits\n",
    "Here is the plan. <think>Should I mention async? Probably later.</think>Step one: install rustup.\n",
    "<think>short</think><think>\n\n</think>Answer with a stray </think> marker inside.\n",
];

/// Generate a reply stream with N repetitions of the sample replies
fn generate_stream(count: usize) -> String {
    let mut result = String::with_capacity(count * 120);
    for i in 0..count {
        result.push_str(SAMPLE_REPLIES[i % SAMPLE_REPLIES.len()]);
    }
    result
}

/// Split into token-sized chunks the way a model server emits them
fn generate_chunks(input: &str, chunk_size: usize) -> Vec<String> {
    input
        .as_bytes()
        .chunks(chunk_size)
        .map(|c| String::from_utf8_lossy(c).to_string())
        .collect()
}

fn consume_chunks(chunks: &[String]) -> usize {
    let segmenter = StreamSegmenter::new();
    let mut state = ParserState::new();
    let mut buffer = String::new();
    for chunk in chunks {
        buffer.push_str(chunk);
        black_box(segmenter.consume(&mut state, &buffer, true).ok());
    }
    segmenter
        .consume(&mut state, &buffer, false)
        .map(|model| model.len())
        .unwrap_or_default()
}

#[divan::bench(
    name = "one_shot",
    args = [10, 100, 1000, 10_000],
)]
fn bench_one_shot(bencher: Bencher, n: usize) {
    let input = generate_stream(n);

    bencher
        .counter(divan::counter::BytesCount::new(input.len()))
        .bench(|| black_box(StreamSegmenter::new().segment_all(black_box(&input))));
}

#[divan::bench(
    name = "token_chunks",
    args = [10, 100, 1000, 10_000],
)]
fn bench_token_chunks(bencher: Bencher, n: usize) {
    let input = generate_stream(n);
    let chunks = generate_chunks(&input, 4);

    bencher
        .counter(divan::counter::BytesCount::new(input.len()))
        .bench(|| black_box(consume_chunks(black_box(&chunks))));
}

#[divan::bench(
    name = "packet_chunks",
    args = [10, 100, 1000, 10_000],
)]
fn bench_packet_chunks(bencher: Bencher, n: usize) {
    let input = generate_stream(n);
    let chunks = generate_chunks(&input, 1024);

    bencher
        .counter(divan::counter::BytesCount::new(input.len()))
        .bench(|| black_box(consume_chunks(black_box(&chunks))));
}
