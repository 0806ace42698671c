#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use tagsmith::{AttributeMap, AttributeValue, IfExists};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    tag: &'a str,
    html: &'a str,
    keep: Option<bool>,
    attributes: Vec<(&'a str, Option<&'a str>)>,
}

fuzz_target!(|input: Input| {
    let if_exists = input
        .keep
        .map(|keep| if keep { IfExists::Keep } else { IfExists::Replace });
    let _ = tagsmith::append_to_tag(input.tag, input.html, if_exists);
    let _ = tagsmith::prepend_to_tag(input.tag, input.html, if_exists);

    let attributes = input
        .attributes
        .iter()
        .map(|&(name, value)| {
            let value = match value {
                Some(v) => AttributeValue::from(v),
                None => AttributeValue::Boolean(false),
            };
            (name.to_string(), value)
        })
        .collect::<AttributeMap>();
    let _ = tagsmith::modify_tag_attributes(input.tag, attributes);
});
