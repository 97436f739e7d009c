#![no_main]

use libfuzzer_sys::fuzz_target;

mod utils;

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };
    if let Ok(method) = widgen_classfile::parse_method_descriptor(text) {
        // Reparsing the canonical parameter list must agree with the original.
        let params = method.params_descriptor();
        let reparsed = widgen_classfile::parse_method_descriptor(&format!("{params}V"))
            .expect("params descriptor of a parsed method must reparse");
        assert_eq!(reparsed.params, method.params);
    }
    let _ = widgen_classfile::parse_field_descriptor(text);
});
