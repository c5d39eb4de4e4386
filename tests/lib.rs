// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use box_separation_simulator::*;



#[test]
fn test_identifier_ordering() {
    let mut boxes = vec![BoxId::new("10"), BoxId::new("9"), BoxId::new("B"), BoxId::new("A")];
    boxes.sort();
    let sorted: Vec<&str> = boxes.iter().map(BoxId::as_str).collect();
    assert_eq!(sorted, vec!["9", "10", "A", "B"]);

    assert_eq!(StationId::from("Pack").to_string(), "Pack");
    assert_eq!(PackageId::new("1"), PackageId::from("1".to_string()));
}

#[test]
fn test_enum_types() {
    assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert_eq!(InputFormat::from_extension("jsonl"), Some(InputFormat::JsonLines));
    assert_eq!(ComparisonDirection::Improved.to_string(), "improved");
}

#[test]
fn test_default_configuration() {
    let config = SimulationConfig::default();
    assert_eq!(config.time_per_item, 20.0);
    assert_eq!(config.transit_time_per_station, 5.0);
    assert_eq!(config.station_capacity, 10);
    assert_eq!(config.workers_per_station, 1.0);
    assert_eq!(config.extra_time_per_box, 0.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_json_report_shape() {
    let runner = SimulationRunner::new(SimulationConfig::default()).unwrap();
    let report = runner.run(vec![WorkItem::new("1", "1", "Pick", 2)]).unwrap();
    let run_id = RunId::from("sheet_2024-01-01_08h00min");

    let json = report::JsonOutput { run_id: &run_id, report: &report, comparison: None }
        .to_json()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["run_id"], "sheet_2024-01-01_08h00min");
    assert_eq!(value["summary"]["total_duration"], 45.0);
    assert_eq!(value["summary"]["per_station_busy_time"]["Pick"], 45.0);
    assert!(value["summary"]["bottleneck_time"].is_null());
    assert_eq!(value["order"].as_array().unwrap().len(), 1);
    assert_eq!(value["assignments"][0]["worker_index"], 0);
    assert!(value.get("comparison").is_none());
}

#[test]
fn test_synthetic_workload_runs() {
    let items = WorkloadGenerator::with_seed(11).generate(30).unwrap();
    let report = SimulationRunner::new(SimulationConfig::default()).unwrap().run(items).unwrap();
    assert_eq!(report.summary.box_count, 30);
    assert!(report.summary.total_duration > 0.0);
}
