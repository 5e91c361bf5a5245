#![no_main]

use libfuzzer_sys::fuzz_target;
use orcfile::settings::Settings;
use orcfile::writer::WriterOptions;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Settings files and key=value overrides must be rejected, never panic
    let mut settings = Settings::from_toml_str(text).unwrap_or_default();
    let _ = settings.apply_pairs(text.lines());

    // Whatever survives parsing must resolve or fail validation cleanly
    let _ = WriterOptions::new(&settings).build();
});
