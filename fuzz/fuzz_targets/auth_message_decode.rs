#![no_main]

use libfuzzer_sys::fuzz_target;
use mpin_engine::ser::{decode_auth_message, decode_commit_message, encode_auth_message};

fuzz_target!(|data: &[u8]| {
    if let Ok(msg) = decode_auth_message(data) {
        // Anything that decodes re-encodes to the same bytes.
        let enc = encode_auth_message(&msg).expect("decoded message re-encodes");
        assert_eq!(enc, data);
    }
    let _ = decode_commit_message(data);
});
