#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|html: &str| {
    if let Ok(repaired) = tagsmith::encode_invalid_tags(html) {
        assert!(repaired.len() >= html.len());
    }
});
