//! Sample integrals offered to users who do not know what to type.

/// Expression analyzed first by an interactive session
pub const DEFAULT_INTEGRAL: &str = "∫ x*cos(x) dx";

/// Samples offered by the original example picker
pub const SAMPLE_INTEGRALS: &[&str] = &[
    "∫ x*cos(x) dx",
    "∫ (2x+5)/(x^2-x-2) dx",
    "∫ sin^3(x)*cos^2(x) dx",
    "∫ 1/sqrt(4-x^2) dx",
    "∫ x*e^(x^2) dx",
];
