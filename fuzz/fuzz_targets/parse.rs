#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    html: &'a str,
    offset: usize,
}

fuzz_target!(|input: Input| {
    let offset = input.offset % (input.html.len() + 1);
    if let Ok(tag) = tagsmith::parse_tag(input.html, offset) {
        assert!(tag.start >= offset);
        assert!(tag.end <= input.html.len());
        if let (Some(body_start), Some(body_end)) = (tag.body_start, tag.body_end) {
            assert!(tag.start < body_start && body_start <= body_end && body_end < tag.end);
        }
    }
});
