use rstest::rstest;
use yatuli_config::load_toml;

const MINIMAL: &str = r#"
[tuner]
pin = 3
range_start = 7000000
range_end = 7200000
step = 10
edge_step = 1000
"#;

#[test]
fn minimal_config_uses_defaults() {
    let cfg = load_toml(MINIMAL).expect("parse TOML");
    cfg.validate().expect("valid config should pass");

    assert_eq!(cfg.tuner.pin, 3);
    assert_eq!(cfg.sampler.oversample, 100);
    assert_eq!(cfg.sampler.resolution, 10);
    assert_eq!(cfg.sampler.adc_max, 1023);
    assert_eq!(cfg.hysteresis.dead_band, 5);
    assert_eq!(cfg.edge.high, 5000);
    assert_eq!(cfg.edge.low, -5000);
    assert_eq!(cfg.edge.pace_ms, 500);
    assert_eq!(cfg.direction.ticks, 500);
    assert!(!cfg.direction.paced);
    assert!(cfg.lock.allow);
}

#[test]
fn step_defaults_when_omitted() {
    let toml = r#"
[tuner]
pin = 0
range_start = 0
range_end = 100
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    assert_eq!(cfg.tuner.step, 10);
    assert_eq!(cfg.tuner.edge_step, 0);
}

#[test]
fn missing_tuner_section_fails_to_parse() {
    let toml = r#"
[sampler]
oversample = 16
"#;
    assert!(load_toml(toml).is_err());
}

#[test]
fn full_config_parses() {
    let toml = r#"
[tuner]
pin = 1
range_start = 0
range_end = 30000000
step = 50
edge_step = 10000

[sampler]
oversample = 16
resolution = 4
adc_min = 0
adc_max = 1023

[hysteresis]
dead_band = 3
counts_per_step = 4

[edge]
high = 1900
low = -1900
pace_ms = 250

[direction]
ticks = 80
paced = true
pace_ms = 120

[lock]
allow = false
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.sampler.oversample, 16);
    assert_eq!(cfg.edge.pace_ms, 250);
    assert!(cfg.direction.paced);
    assert!(!cfg.lock.allow);
}

#[rstest]
#[case("[tuner]\npin = 0\nrange_start = 10\nrange_end = 5\n", "range_end must be >= tuner.range_start")]
#[case("[sampler]\noversample = 0\n", "oversample must be >= 1")]
#[case("[sampler]\nresolution = 0\n", "resolution must be >= 1")]
#[case("[sampler]\nadc_min = 900\nadc_max = 100\n", "adc_max must be > sampler.adc_min")]
#[case("[hysteresis]\ncounts_per_step = 0\n", "counts_per_step must be >= 1")]
#[case("[edge]\nhigh = -10\nlow = 10\n", "edge.low must be < edge.high")]
#[case("[edge]\npace_ms = 0\n", "edge.pace_ms must be >= 1")]
#[case("[edge]\nhigh = 6000\nlow = -5000\n", "inside the sampler span")]
#[case("[direction]\nticks = 0\n", "direction.ticks must be >= 1")]
#[case("[direction]\npaced = true\npace_ms = 0\n", "direction.pace_ms must be >= 1")]
fn rejects_invalid_sections(#[case] extra: &str, #[case] needle: &str) {
    // A later [tuner] table would be a duplicate key, so the range case carries its own.
    let toml = if extra.starts_with("[tuner]") {
        extra.to_string()
    } else {
        format!("{MINIMAL}\n{extra}")
    };
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "expected '{needle}' in '{err}'"
    );
}
