//! Test helpers for the text format parser and writer

use crate::constants::fill;

mod writer_tests;

/// Two sensors on the x axis and two rows of columns `a` and `b`
pub fn create_minimal_file() -> String {
    "2\n# x z\n0 0\n5 0\n2\n# a b\n1 10\n2 20\n".to_string()
}

/// Shot/receiver survey with comments, blank lines and topography
pub fn create_survey_file() -> String {
    r#"# survey line 1
3   # sensors
# x y z
0 0 0
1.5 0 -0.25

3 0 0
4
# s g rho err
1 2 105.2 0.01
1 3 98.7 0.02   # repeated reading
2 3 110.0 0.01
1 1 0 nan
2
# x z
0.5 1.25
2.5 1.5
"#
    .to_string()
}

/// Fill callback treating `s` and `g` as sensor-index columns
pub fn survey_fill(token: &str) -> f64 {
    match token {
        "s" | "g" => fill::SENSOR_INDEX,
        _ => fill::NUMERIC,
    }
}
