use super::AggregationReport;
use std::fmt::Write;

/// Materials listed by name in the "without volume" section before the
/// rest are only counted.
const NO_VOLUME_LISTED: usize = 5;

/// Impact as kg, or tonnes from 1000 kg on.
#[must_use]
pub fn format_impact(kg: f64) -> String {
    if kg >= 1000.0 {
        format!("{:.2} t CO₂-eq", kg / 1000.0)
    } else {
        format!("{kg:.1} kg CO₂-eq")
    }
}

/// Plain-text report: ranked materials with impact, materials without
/// volume, mapping problems, then totals.
#[must_use]
pub fn format_summary(report: &AggregationReport) -> String {
    let mut out = String::new();
    let ranked = report.ranked();

    let _ = writeln!(out, "=== Embodied Carbon Results ===\n");

    let with_impact: Vec<_> = ranked.iter().filter(|r| r.total_impact > 0.0).collect();
    for result in &with_impact {
        let _ = writeln!(out, "{}:", result.record_name);
        let _ = writeln!(out, "  IFC Material: {}", result.material);
        let _ = writeln!(
            out,
            "  Elements: {} ({} with volume)",
            result.element_count, result.elements_with_volume
        );
        let _ = writeln!(out, "  Volume: {:.2} m³", result.total_volume);
        let _ = writeln!(out, "  Mass: {:.0} kg", result.total_mass);
        let _ = writeln!(out, "  Carbon: {}", format_impact(result.total_impact));
        if let Some(penre) = result.total_penre.filter(|v| *v > 0.0) {
            let _ = writeln!(out, "  Primary Energy (non-renewable): {penre:.0} MJ");
        }
        if let Some(ubp) = result.total_ubp.filter(|v| *v > 0.0) {
            let _ = writeln!(out, "  Environmental Impact Points: {ubp:.0} UBP");
        }
        let _ = writeln!(out);
    }

    let without_impact: Vec<_> = ranked
        .iter()
        .filter(|r| r.total_impact == 0.0 && r.element_count > 0)
        .collect();
    if !without_impact.is_empty() {
        let _ = writeln!(out, "--- Materials without volume data ---");
        for result in without_impact.iter().take(NO_VOLUME_LISTED) {
            let _ = writeln!(
                out,
                "• {}: {} elements ({})",
                result.material,
                result.element_count,
                result.status.label()
            );
        }
        if without_impact.len() > NO_VOLUME_LISTED {
            let _ = writeln!(out, "  ... and {} more", without_impact.len() - NO_VOLUME_LISTED);
        }
        let _ = writeln!(out);
    }

    if !report.unresolved_mappings.is_empty() {
        let _ = writeln!(out, "--- Mapped records not found in database ---");
        for unresolved in &report.unresolved_mappings {
            let _ = writeln!(out, "• {} → {}", unresolved.material, unresolved.record_id);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", "-".repeat(30));
    let _ = writeln!(out, "SUMMARY:");
    let _ = writeln!(out, "  Materials analyzed: {}", report.results.len());
    let _ = writeln!(out, "  Materials with impact: {}", with_impact.len());
    let _ = writeln!(out, "  Materials without volume: {}", without_impact.len());
    let _ = writeln!(out, "  Unmapped materials: {}", report.unmapped_materials.len());
    let _ = writeln!(out, "  Total mass: {:.0} kg", report.total_mass());
    let _ = writeln!(out);

    let total = report.total_impact();
    let _ = write!(out, "TOTAL EMBODIED CARBON: {}", format_impact(total));
    if total == 0.0 {
        let _ = write!(
            out,
            "\n\nNo carbon impact calculated. Possible reasons:\n  \
             • Elements don't have volume/quantity data\n  \
             • Materials not mapped to database entries\n  \
             • Database entries missing carbon data"
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{MaterialResult, ResultStatus, UnresolvedMapping};
    use pretty_assertions::assert_eq;

    fn result(material: &str, elements: usize, volume: f64, impact: f64) -> MaterialResult {
        MaterialResult {
            material: material.to_string(),
            record_id: format!("ID_{material}"),
            record_name: format!("{material} (db)"),
            category: "Other Materials".to_string(),
            density: 1.0,
            impact_per_kg: 1.0,
            element_count: elements,
            elements_with_volume: usize::from(volume > 0.0) * elements,
            total_volume: volume,
            total_mass: volume,
            total_impact: impact,
            total_penre: None,
            total_ubp: None,
            status: ResultStatus::Computed,
            contributions: Vec::new(),
        }
    }

    #[test]
    fn impact_switches_to_tonnes() {
        assert_eq!(format_impact(999.94), "999.9 kg CO₂-eq");
        assert_eq!(format_impact(17700.0), "17.70 t CO₂-eq");
    }

    #[test]
    fn summary_lists_ranked_materials_and_problem_buckets() {
        let mut report = AggregationReport::default();
        report.results.insert("Wood".to_string(), result("Wood", 2, 1.0, 137.5));
        report.results.insert("Steel".to_string(), result("Steel", 3, 3.0, 17662.5));
        for i in 0..7 {
            let name = format!("Empty{i}");
            report.results.insert(name.clone(), result(&name, 1, 0.0, 0.0));
        }
        report.unresolved_mappings.push(UnresolvedMapping {
            material: "Glass".to_string(),
            record_id: "KBOB_404".to_string(),
        });

        let text = format_summary(&report);

        let steel = text.find("Steel (db):").unwrap();
        let wood = text.find("Wood (db):").unwrap();
        assert!(steel < wood);
        assert!(text.contains("• Empty4: 1 elements (computed)"));
        assert!(!text.contains("• Empty5"));
        assert!(text.contains("  ... and 2 more"));
        assert!(text.contains("• Glass → KBOB_404"));
        assert!(text.contains("  Materials with impact: 2"));
        assert!(text.contains("  Total mass: 4 kg"));
        assert!(text.ends_with("TOTAL EMBODIED CARBON: 17.80 t CO₂-eq"));
    }

    #[test]
    fn empty_report_explains_the_zero_total() {
        let text = format_summary(&AggregationReport::default());
        assert!(text.contains("TOTAL EMBODIED CARBON: 0.0 kg CO₂-eq"));
        assert!(text.contains("No carbon impact calculated"));
    }
}
