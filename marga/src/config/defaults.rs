//! Default value functions for serde deserialization.

pub fn enabled() -> bool {
    true
}

pub fn report_interval_ms() -> u64 {
    1000
}

pub fn check_every() -> usize {
    1000
}

pub fn simplify_epsilon() -> f64 {
    1.0
}

pub fn tubeness_threshold() -> f32 {
    20.0
}
