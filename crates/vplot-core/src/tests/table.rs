use crate::*;

#[test]
fn unique_keeps_first_appearance_order() {
    let t = Table::from_columns([("Pressure", vec![2000.0, 1000.0, 2000.0, 500.0, 1000.0])]).unwrap();
    assert_eq!(t.unique("Pressure").unwrap(), vec![2000.0, 1000.0, 500.0]);
}

#[test]
fn ragged_columns_are_rejected() {
    let err = Table::from_columns([("a", vec![1.0, 2.0]), ("b", vec![1.0])]).unwrap_err();
    assert_eq!(err.to_string(), "column `b` has 1 rows; expected 2");
}

#[test]
fn push_row_appends_in_column_order() {
    let mut t = Table::from_columns([("a", vec![1.0]), ("b", vec![2.0])]).unwrap();
    t.push_row(&[3.0, 4.0]).unwrap();
    assert_eq!(t.len(), 2);
    assert_eq!(t.column("a"), Some(&[1.0, 3.0][..]));
    assert_eq!(t.column("b"), Some(&[2.0, 4.0][..]));
    assert!(t.push_row(&[1.0]).is_err());
}

#[test]
fn concat_unions_columns_and_fills_nan() {
    let a = Table::from_columns([("SiO2", vec![50.0]), ("Na2O", vec![3.0])]).unwrap();
    let b = Table::from_columns([("SiO2", vec![60.0, 70.0]), ("K2O", vec![1.0, 2.0])]).unwrap();
    let c = Table::concat([&a, &b]);
    assert_eq!(c.len(), 3);
    assert_eq!(c.column_names().collect::<Vec<_>>(), vec!["SiO2", "Na2O", "K2O"]);
    assert_eq!(c.column("SiO2"), Some(&[50.0, 60.0, 70.0][..]));
    let na = c.column("Na2O").unwrap();
    assert_eq!(na[0], 3.0);
    assert!(na[1].is_nan() && na[2].is_nan());
}

#[test]
fn max_skips_nan() {
    let t = Table::from_columns([("H2O_liq", vec![1.0, f64::NAN, 3.5, 2.0])]).unwrap();
    assert_eq!(t.max("H2O_liq").unwrap(), Some(3.5));
    let empty = Table::from_columns([("H2O_liq", vec![])]).unwrap();
    assert_eq!(empty.max("H2O_liq").unwrap(), None);
}

#[test]
fn csv_drops_text_columns_and_reads_blanks_as_nan() {
    let csv = "Label,SiO2,Na2O,K2O\nsampleA,50.1,3.2,\nsampleB,61.0,4.0,2.1\n";
    let t = Table::from_csv_reader(csv.as_bytes()).unwrap();
    assert_eq!(t.column_names().collect::<Vec<_>>(), vec!["SiO2", "Na2O", "K2O"]);
    assert_eq!(t.column("SiO2"), Some(&[50.1, 61.0][..]));
    assert!(t.column("K2O").unwrap()[0].is_nan());
    assert_eq!(
        t.require("Label").unwrap_err().to_string(),
        "column `Label` not found"
    );
}

#[test]
fn json_roundtrip_keeps_column_order() {
    let t = Table::from_json_str(r#"{"Pressure":[1000,2000],"H2O_liq":[1.5,2.5],"CO2_liq":[0.1,0.2]}"#)
        .unwrap();
    assert_eq!(
        t.column_names().collect::<Vec<_>>(),
        vec!["Pressure", "H2O_liq", "CO2_liq"]
    );
    assert!(Table::from_json_str(r#"{"a":[1],"b":[1,2]}"#).is_err());
}

#[test]
fn sample_set_total_alkalis() {
    let single = SampleSet::from(Sample::new().with("SiO2", 52.0).with("Na2O", 3.5).with("K2O", 1.5));
    assert_eq!(single.total_alkalis().unwrap(), vec![5.0]);
    assert!(single.is_single());

    let many = SampleSet::from(
        Table::from_columns([("Na2O", vec![3.0, 4.0]), ("K2O", vec![1.0, 2.0])]).unwrap(),
    );
    assert_eq!(many.total_alkalis().unwrap(), vec![4.0, 6.0]);
    assert_eq!(many.len(), 2);

    let missing = SampleSet::from(Sample::new().with("Na2O", 3.0));
    assert!(missing.total_alkalis().is_err());
}
