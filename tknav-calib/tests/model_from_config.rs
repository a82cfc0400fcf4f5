#![allow(clippy::uninlined_format_args)]

use std::fs;

use tknav_calib::{DarkeningConfig, DarkeningModel, Error};

fn write_config(dir: &std::path::Path, dose_map: &str) -> std::path::PathBuf {
    let map_path = dir.join("doses_13tev.txt");
    fs::write(&map_path, dose_map).expect("write dose map");

    let config_path = dir.join("darkening.json");
    let json = format!(
        r#"{{
            "ieta_shift": 16,
            "drd_a": 30.0,
            "drd_b": -0.2,
            "years": [
                {{"year": "2030", "intlumi": 30.0, "lumirate": 4.0e-3, "energy": 13}},
                {{"year": "2031", "intlumi": 40.0, "lumirate": 5.0e-3, "energy": 13}}
            ],
            "dose_maps": [
                {{"energy": 13, "path": "{}"}}
            ]
        }}"#,
        map_path.display()
    );
    fs::write(&config_path, json).expect("write config");
    config_path
}

#[test]
fn model_builds_from_json_and_dose_map_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = write_config(dir.path(), "2.0 0.5\n1.0 4.0\n");

    let config = DarkeningConfig::from_json_file(&config_path).expect("config");
    let model = DarkeningModel::from_config(&config).expect("model");

    assert_eq!(model.years().len(), 2);
    let factor = model.degradation(50.0, 16, 0).expect("degradation");
    assert!(factor > 0.0 && factor < 1.0);
}

#[test]
fn malformed_dose_map_aborts_model_construction() {
    let dir = tempfile::tempdir().expect("tempdir");
    // second row has a different column count
    let config_path = write_config(dir.path(), "2.0 0.5\n1.0\n");

    let config = DarkeningConfig::from_json_file(&config_path).expect("config");
    assert!(matches!(
        DarkeningModel::from_config(&config),
        Err(Error::MalformedDoseMap { .. })
    ));
}
