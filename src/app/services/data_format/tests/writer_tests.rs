//! Tests for the writer and its column-order resolution

use super::*;
use crate::app::container::DataContainer;
use crate::app::models::Pos;
use crate::app::services::data_format::WritePlan;
use crate::config::ContainerConfig;
use crate::Error;

fn render(data: &DataContainer, data_format: &str, sensor_format: &str) -> String {
    let plan = WritePlan::new(data, data_format, sensor_format).unwrap();
    let mut out = Vec::new();
    plan.write_to(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn minimal_container() -> DataContainer {
    let mut data = DataContainer::new();
    data.load_from_str(&create_minimal_file(), "minimal").unwrap();
    data
}

#[test]
fn test_write_selected_columns() {
    let data = minimal_container();
    let text = render(&data, "b a", "x z");

    let expected = "2\n\
                    # x z\n\
                    0\t0\n\
                    5\t0\n\
                    2\n\
                    # b a\n\
                    1.00000000000000e+01\t1.00000000000000e+00\n\
                    2.00000000000000e+01\t2.00000000000000e+00\n\
                    0\n";
    assert_eq!(text, expected);
}

#[test]
fn test_write_all_includes_invalid_rows_and_flags() {
    let mut data = minimal_container();
    data.mark_valid(&[0], false).unwrap();

    let text = render(&data, "all", "");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[1], "# x y z");
    assert_eq!(lines[2], "0\t0\t0");
    assert_eq!(lines[4], "2");
    assert_eq!(lines[5], "# a b valid");
    assert!(lines[6].ends_with("\t0"));
    assert!(lines[7].ends_with("\t1"));
}

#[test]
fn test_write_selection_skips_invalid_rows() {
    let mut data = minimal_container();
    data.mark_valid(&[0], false).unwrap();

    let text = render(&data, "a", "x");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[4], "1");
    assert_eq!(lines[5], "# a");
    assert_eq!(lines[6], "2.00000000000000e+00");
    assert_eq!(lines[7], "0");
    assert_eq!(lines.len(), 8);
}

#[test]
fn test_write_sensor_indices_with_origin() {
    let config = ContainerConfig::default()
        .with_sensor_index("s")
        .with_sensor_index_from_one(true);
    let mut data = DataContainer::with_config(config);
    data.create_sensor(Pos::new(0.0, 0.0, 0.0), 1e-6);
    data.create_sensor(Pos::new(1.0, 0.0, 0.0), 1e-6);
    data.resize(2).unwrap();
    data.set("s", vec![0.0, 1.0]).unwrap();
    data.set("valid", vec![1.0, 1.0]).unwrap();

    let text = render(&data, "s valid", "x");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[5], "# s valid");
    assert_eq!(lines[6], "1\t1");
    assert_eq!(lines[7], "2\t1");
}

#[test]
fn test_write_resolves_aliases() {
    let config = ContainerConfig::default().with_alias("rhoa", "r");
    let mut data = DataContainer::with_config(config);
    data.create_sensor(Pos::default(), 1e-6);
    data.resize(1).unwrap();
    data.set("r", vec![42.0]).unwrap();
    data.set("valid", vec![1.0]).unwrap();

    let text = render(&data, "rhoa", "x");
    assert!(text.ends_with("# rhoa\n4.20000000000000e+01\n0\n"));
}

#[test]
fn test_write_millimetre_sensor_columns() {
    let mut data = DataContainer::new();
    data.create_sensor(Pos::new(1.5, 0.0, -0.002), 1e-6);

    let text = render(&data, "", "x/mm z/mm");
    assert_eq!(text, "1\n# x/mm z/mm\n1500\t-2\n0\n#\n0\n");
}

#[test]
fn test_write_topography_block() {
    let mut data = minimal_container();
    data.push_additional_point(Pos::new(0.5, 0.0, 1.25));

    let text = render(&data, "a", "x z");
    assert!(text.ends_with("1\n# x y z\n0.5\t0\t1.25\n"));
}

#[test]
fn test_write_empty_selection_keeps_block_headers() {
    let mut data = minimal_container();
    data.mark_valid(&[0, 1], false).unwrap();

    let text = render(&data, "a b", "x z");
    assert!(text.ends_with("5\t0\n0\n# a b\n0\n"));

    let mut reloaded = DataContainer::new();
    reloaded.load_from_str(&text, "empty").unwrap();
    assert_eq!(reloaded.size(), 0);
    assert_eq!(reloaded.sensor_count(), 2);
}

#[test]
fn test_write_large_coordinates_exactly() {
    let mut data = DataContainer::new();
    data.create_sensor(Pos::new(1234.56789012345, 512345.123456789, 0.0), 1e-6);
    data.push_additional_point(Pos::new(5_712_345.98765432, 0.0, 101.25));

    let text = render(&data, "", "x y z");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[2], "1234.56789012345\t512345.123456789\t0");
    assert_eq!(lines[7], "5712345.98765432\t0\t101.25");
}

#[test]
fn test_write_huge_sensor_index_saturates() {
    let config = ContainerConfig::default()
        .with_sensor_index("s")
        .with_sensor_index_from_one(true);
    let mut data = DataContainer::with_config(config);
    data.resize(1).unwrap();
    data.set("s", vec![1e19]).unwrap();
    data.set("valid", vec![1.0]).unwrap();

    let text = render(&data, "s", "x");
    assert!(text.contains(&format!("# s\n{}\n", i64::MAX)));
}

#[test]
fn test_unknown_data_token_is_rejected() {
    let data = minimal_container();
    let result = WritePlan::new(&data, "a missing", "x z");
    match result {
        Err(Error::UnknownToken { token, available }) => {
            assert_eq!(token, "missing");
            assert_eq!(available, "a b valid");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_unknown_sensor_token_is_rejected() {
    let data = minimal_container();
    let result = WritePlan::new(&data, "a", "x rho");
    assert!(matches!(
        result,
        Err(Error::UnknownColumnToken { .. })
    ));
}

#[test]
fn test_failed_save_leaves_no_file() {
    let data = minimal_container();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.dat");

    assert!(data.save(&path, "missing", "x z").is_err());
    assert!(!path.exists());

    let stats = data.save(&path, "a b", "x z").unwrap();
    assert!(path.exists());
    assert_eq!(stats.records, 2);
    assert_eq!(stats.columns, 2);
    assert_eq!(stats.sensors, 2);
}
