use ifc_lca::analysis::{aggregate, auto_map, format_summary, Mapping, ResultStatus};
use ifc_lca::config::NormalizerConfig;
use ifc_lca::database::{load_database, DatabaseKind, RejectReason};
use ifc_lca::export::export_csv;
use ifc_lca::parser::parse_ifc_file;
use ifc_lca::resolve::{resolve_materials_with_counts, QuantityResolver, VolumeSource};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[test]
fn sample_house_end_to_end() {
    let model = parse_ifc_file(fixture("sample.ifc")).unwrap();
    assert_eq!(model.name, "Sample House");
    assert_eq!(model.total_elements(), 4);

    let database = load_database(
        DatabaseKind::Kbob,
        fixture("kbob.json"),
        None,
        &NormalizerConfig::default(),
    )
    .unwrap();
    assert_eq!(database.len(), 4);
    let reasons: Vec<&RejectReason> = database.skipped().iter().map(|r| &r.reason).collect();
    assert_eq!(
        reasons,
        vec![&RejectReason::CorruptedName, &RejectReason::MissingId]
    );

    let mapping = Mapping::load(fixture("mapping.json")).unwrap();
    let report = aggregate(&model, &mapping, &database, &QuantityResolver::default());

    let concrete = &report.results["Concrete"];
    assert!(close(concrete.total_volume, 4.5));
    assert!(close(concrete.total_mass, 10800.0));
    assert!(close(concrete.total_impact, 1080.0));
    assert_eq!(concrete.category, "Concrete");

    let steel = &report.results["Steel"];
    assert_eq!(steel.total_volume, 0.5);
    assert_eq!(steel.total_impact, 2943.75);
    assert_eq!(
        steel.contributions[0].source,
        VolumeSource::Dimensions {
            height: 4.0,
            width: 0.5,
            length: 0.25,
        }
    );

    let timber = &report.results["Glulam Timber"];
    assert_eq!(timber.density, 450.0);
    assert!(close(timber.total_volume, 2.0));
    assert!(matches!(
        timber.contributions[0].source,
        VolumeSource::SurfaceAreaApproximation { .. }
    ));

    let insulation = &report.results["Insulation"];
    assert_eq!(insulation.status, ResultStatus::MissingDensity);
    assert_eq!(insulation.total_impact, 0.0);

    assert_eq!(report.unresolved_mappings.len(), 1);
    assert_eq!(report.unresolved_mappings[0].record_id, "KBOB_99.999");
    let unmapped: Vec<&str> = report
        .unmapped_materials
        .iter()
        .map(|usage| usage.name.as_str())
        .collect();
    assert_eq!(unmapped, vec!["Gravel"]);

    assert!(close(report.total_impact(), 4473.75));
    let ranked: Vec<&str> = report.ranked().iter().map(|r| r.material.as_str()).collect();
    assert_eq!(&ranked[..3], &["Steel", "Concrete", "Glulam Timber"]);

    let summary = format_summary(&report);
    assert!(summary.contains("• Insulation: 1 elements (missing density)"));
    assert!(summary.ends_with("TOTAL EMBODIED CARBON: 4.47 t CO₂-eq"));

    let csv_path = std::env::temp_dir().join(format!("ifc-lca-pipeline-{}.csv", std::process::id()));
    export_csv(&report, &csv_path).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    std::fs::remove_file(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 5);
    assert!(csv.contains("Steel,KBOB_06.003,\"Stahlprofil, blank\",1,1,0.500,3925.0,2943.75,computed"));
}

#[test]
fn auto_map_places_known_materials() {
    let model = parse_ifc_file(fixture("sample.ifc")).unwrap();
    let database = load_database(
        DatabaseKind::Kbob,
        fixture("kbob.json"),
        None,
        &NormalizerConfig::default(),
    )
    .unwrap();

    let materials = resolve_materials_with_counts(&model);
    let mut mapping = Mapping::new();
    let summary = auto_map(
        materials.iter().map(|usage| usage.name.as_str()),
        &database,
        &mut mapping,
    );

    assert_eq!(mapping.get("Concrete"), Some("KBOB_01.002"));
    assert_eq!(mapping.get("Steel"), Some("KBOB_06.003"));
    assert_eq!(mapping.get("Glulam Timber"), Some("KBOB_07.001"));
    assert!(summary.unmatched.contains(&"Gravel".to_string()));
}

#[test]
fn query_narrows_the_database() {
    let database = load_database(
        DatabaseKind::Kbob,
        fixture("kbob.json"),
        Some("beton"),
        &NormalizerConfig::default(),
    )
    .unwrap();
    let ids: Vec<&str> = database.records().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["KBOB_01.002"]);
}
