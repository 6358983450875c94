use crate::*;

const CATALOG: &str = r##"{
  "Dixon": {
    "type": { "H2O": true, "CO2": true, "Mixed": true },
    "data": {
      "facecolor": "#92C5DE",
      "H2O": { "SiO2": [49.0, 50.5], "Na2O": [2.5, 2.7], "K2O": [0.3, 0.4] },
      "CO2": { "SiO2": [48.0], "Na2O+K2O": [3.1] }
    }
  },
  "Liu": {
    "type": { "H2O": true, "CO2": false, "Mixed": true },
    "data": "Calibration dataset for Liu is not bundled with this build."
  }
}"##;

#[test]
fn catalog_loads_from_json() {
    let catalog = InMemoryCatalog::from_json_str(CATALOG).unwrap();
    assert_eq!(catalog.model_names().collect::<Vec<_>>(), vec!["Dixon", "Liu"]);

    let dixon = catalog.dataset("Dixon").unwrap();
    assert_eq!(dixon.face_color, "#92C5DE");
    assert_eq!(dixon.subset(ChemicalSystem::PureH2O).unwrap().len(), 2);
    assert!(dixon.subset(ChemicalSystem::PureCO2).unwrap().has_column("Na2O+K2O"));
    assert!(dixon.subset(ChemicalSystem::Mixed).is_none());

    let applies = catalog.applicability("Dixon").unwrap();
    assert!(applies.applies_to(ChemicalSystem::PureH2O));
    assert!(applies.applies_to(ChemicalSystem::Mixed));
}

#[test]
fn unavailable_models_carry_their_message() {
    let catalog = InMemoryCatalog::from_json_str(CATALOG).unwrap();
    let err = catalog.dataset("Liu").unwrap_err();
    assert_eq!(err.model, "Liu");
    assert_eq!(
        err.to_string(),
        "Calibration dataset for Liu is not bundled with this build."
    );
    assert!(catalog.applicability("Liu").is_some());

    let unknown = catalog.dataset("Nope").unwrap_err();
    assert_eq!(unknown.model, "Nope");
    assert!(catalog.applicability("Nope").is_none());
}

#[test]
fn model_lists_cover_mixed_subset() {
    for m in MIXED_MODELS {
        assert!(ALL_MODELS.contains(m));
    }
    assert_eq!(ALL_MODELS.len(), 7);
}
