use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ifc_lca::analysis::{aggregate, auto_map, format_summary, Mapping};
use ifc_lca::config::AnalysisConfig;
use ifc_lca::database::{load_database, DatabaseKind};
use ifc_lca::export::{export_csv, export_json, save_mapping};
use ifc_lca::parser::parse_ifc_file;
use ifc_lca::resolve::{resolve_materials_with_counts, QuantityResolver};
use ifc_lca::ui::App;

#[derive(Parser, Debug)]
#[command(name = "ifc-lca")]
#[command(about = "IFC LCA - embodied carbon of IFC models from KBOB, ÖKOBAUDAT or custom data")]
#[command(version)]
struct Args {
    /// Path to IFC file
    #[arg(required = true)]
    file: PathBuf,

    /// Environmental impact database file
    #[arg(long, short, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Database file format: kbob, okobaudat, okobaudat-csv or custom
    #[arg(long, default_value = "kbob")]
    schema: DatabaseKind,

    /// Only load database records whose name contains this text
    #[arg(long, value_name = "TEXT")]
    query: Option<String>,

    /// Material → record id mapping (JSON object)
    #[arg(long, short, value_name = "FILE")]
    mapping: Option<PathBuf>,

    /// Map unmapped materials by searching the database
    #[arg(long)]
    auto_map: bool,

    /// Write the mapping in use (after auto-mapping)
    #[arg(long, value_name = "FILE")]
    save_mapping: Option<PathBuf>,

    /// Engine settings (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the model's materials with element counts and exit
    #[arg(long)]
    list_materials: bool,

    /// Export results to CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Export results to JSON
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Print the text report instead of opening the browser
    #[arg(long)]
    summary: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    let model = parse_ifc_file(&args.file)?;
    let materials = resolve_materials_with_counts(&model);

    if args.list_materials {
        for usage in &materials {
            println!("{}\t{}", usage.element_count, usage.name);
        }
        return Ok(());
    }

    let database_path = args
        .database
        .as_ref()
        .ok_or_else(|| eyre!("--database is required unless --list-materials is given"))?;
    let database = load_database(
        args.schema,
        database_path,
        args.query.as_deref(),
        &config.normalizer,
    )?;

    let mut mapping = match &args.mapping {
        Some(path) => Mapping::load(path)?,
        None => Mapping::new(),
    };

    if args.auto_map {
        let summary = auto_map(
            materials.iter().map(|usage| usage.name.as_str()),
            &database,
            &mut mapping,
        );
        eprintln!(
            "Auto-mapped {} materials ({} unmatched)",
            summary.mapped.len(),
            summary.unmatched.len()
        );
    }

    if let Some(path) = &args.save_mapping {
        save_mapping(&mapping, path)?;
        println!("Saved mapping: {}", path.display());
    }

    let quantities = QuantityResolver::new(config.quantity);
    let report = aggregate(&model, &mapping, &database, &quantities);

    if let Some(csv_path) = &args.csv {
        export_csv(&report, csv_path)?;
        println!("Exported to CSV: {}", csv_path.display());
    }

    if let Some(json_path) = &args.json {
        export_json(&report, json_path)?;
        println!("Exported to JSON: {}", json_path.display());
    }

    if args.summary {
        println!("{}", format_summary(&report));
    }

    if args.csv.is_some() || args.json.is_some() || args.summary {
        return Ok(());
    }

    let app = App::new(report)
        .with_model(model.name.clone(), model.total_elements())
        .with_skipped_records(database.skipped().len());

    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}
