#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    html: &'a str,
    namespace: &'a str,
    with_classes: bool,
}

fuzz_target!(|input: Input| {
    let _ = tagsmith::namespace_html(input.html, input.namespace, input.with_classes);
});
