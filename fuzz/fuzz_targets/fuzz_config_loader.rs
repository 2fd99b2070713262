#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing and validation may reject input but must never panic.
    if let Ok(cfg) = toml::from_str::<yatuli_config::Config>(data) {
        if cfg.validate().is_ok() {
            // Anything the loader accepts must also convert for the core.
            let _ = yatuli_core::TunerCfg::from(&cfg);
        }
    }
});
