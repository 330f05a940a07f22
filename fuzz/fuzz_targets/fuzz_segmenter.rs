#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use thinkstream::{ParserState, StreamSegmenter, strip_markers};

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    cuts: Vec<u16>,
}

fuzz_target!(|input: Input| {
    let text = input.text.as_str();
    let segmenter = StreamSegmenter::new();

    let mut offsets: Vec<usize> = input
        .cuts
        .iter()
        .map(|&c| {
            let mut o = usize::from(c) % (text.len() + 1);
            while !text.is_char_boundary(o) {
                o -= 1;
            }
            o
        })
        .collect();
    offsets.push(text.len());
    offsets.sort_unstable();

    let mut state = ParserState::new();
    for &end in &offsets {
        let model = segmenter.consume(&mut state, &text[..end], true).unwrap();
        assert_eq!(model.text() + state.pending(), strip_markers(&text[..end]));
    }
    let model = segmenter.consume(&mut state, text, false).unwrap();

    assert!(model.open.is_none());
    assert!(model.finalized.iter().all(|s| !s.text.is_empty()));
    assert_eq!(model.text(), strip_markers(text));
    assert_eq!(model.finalized, segmenter.segment_all(text).as_slice());
});
