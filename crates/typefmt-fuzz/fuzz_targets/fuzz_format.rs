#![no_main]
use libfuzzer_sys::fuzz_target;
use typefmt_core::{ArgValue, args};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks an argument mix; the rest is the format string.
    let (selector, rest) = data.split_at(1);
    let format = String::from_utf8_lossy(rest);
    let pool: Vec<ArgValue<'_>> = args![
        -7_i64,
        u64::MAX,
        f64::NAN,
        1.0e300_f64,
        'é',
        "fuzz",
        ArgValue::Pointer(0x1000),
        ArgValue::Enum(3),
        true
    ];
    let take = usize::from(selector[0]) % (pool.len() + 1);
    let args = &pool[..take];

    let soft = typefmt_core::format(&format, args);
    match typefmt_core::format_strict(&format, args) {
        Ok(strict) => assert_eq!(soft, strict),
        Err(err) => {
            assert!(soft.starts_with("<formatting error> "));
            assert!(soft.contains(err.kind().as_str()));
        }
    }
});
