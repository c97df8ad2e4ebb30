#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Running out of data isn't interesting.
    let _ = trapmap::construction::arbtests::insertion(&mut Unstructured::new(data));
});
