#![no_main]

use libfuzzer_sys::fuzz_target;
use sharedmime::MagicIndex;
use sharedmime::infrastructure::database::parse_magic;

fuzz_target!(|data: &[u8]| {
    if let Ok(rules) = parse_magic(data) {
        let _ = MagicIndex::new(rules).match_content(data);
    }
});
