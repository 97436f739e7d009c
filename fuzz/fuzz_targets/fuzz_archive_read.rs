#![no_main]

use std::io::Write;

use libfuzzer_sys::fuzz_target;
use widgen_archive::Archive;

mod utils;

fuzz_target!(|data: &[u8]| {
    let bytes = &data[..data.len().min(utils::MAX_INPUT_SIZE)];

    let mut jar = tempfile::Builder::new()
        .prefix("fuzz_archive_read")
        .suffix(".jar")
        .tempfile()
        .expect("failed to create tempfile");
    jar.write_all(bytes).expect("failed to write jar bytes");
    jar.flush().expect("failed to flush jar bytes");

    // Malformed archives must surface as errors, never panics.
    let Ok(archive) = Archive::open(jar.path()) else {
        return;
    };
    if let Ok(entries) = archive.class_entries() {
        for entry in entries.iter().take(16) {
            let _ = widgen_classfile::ClassFile::parse(&entry.bytes);
        }
    }
    let _ = archive.read("a/A.class");
});
