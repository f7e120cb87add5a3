// Entry point and high-level CLI flow.
//
// Every command loads the settlements CSV, runs one page report and then
// - prints Markdown previews of its tables to the console, and
// - writes the tables as CSV plus the whole report as JSON to the output dir.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use settlement_stats::config::AppConfig;
use settlement_stats::facade::{MunicipalityQuery, StatisticsFacade};
use settlement_stats::loader;
use settlement_stats::output;
use settlement_stats::source::InMemorySource;
use settlement_stats::util::format_int;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "settlements.toml";

#[derive(Parser)]
#[command(author, version, about = "Population statistics by region, municipality and settlement", long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG, global = true)]
    config: PathBuf,

    /// Settlements CSV, overrides `input.csv` from the config
    #[arg(long, value_name = "FILE", global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Country-wide overview: top regions, statistics, type distribution
    Overview,
    /// Statistics and municipalities of one region
    Region { name: String },
    /// Statistics and settlement list of one municipality
    Municipality {
        region: String,
        name: String,
        /// Case-insensitive part of the settlement name
        #[arg(long)]
        search: Option<String>,
        /// Settlement category, e.g. "Село"
        #[arg(long = "type")]
        settlement_type: Option<String>,
        #[arg(long)]
        page: Option<usize>,
    },
}

fn load_config(path: &Path) -> Result<AppConfig> {
    // The default config file is optional; an explicitly named one is not.
    if path == Path::new(DEFAULT_CONFIG) && !path.exists() {
        info!("{} not found, using defaults", DEFAULT_CONFIG);
        return Ok(AppConfig::default());
    }
    AppConfig::load_from_file(path)
}

fn load_source(config: &AppConfig) -> Result<InMemorySource> {
    let (source, report) = loader::load_settlements(&config.input.csv)
        .with_context(|| format!("Failed to load {:?}", config.input.csv))?;
    println!(
        "Processing dataset... ({} rows read, {} settlements loaded)",
        format_int(report.total_rows),
        format_int(report.loaded_rows)
    );
    println!(
        "{} regions, {} municipalities.",
        format_int(report.regions),
        format_int(report.municipalities)
    );
    if report.skipped_rows > 0 {
        println!(
            "Note: {} rows skipped due to parse/validation errors.",
            format_int(report.skipped_rows)
        );
    }
    println!();
    Ok(source)
}

fn run_overview(facade: &StatisticsFacade<InMemorySource>, config: &AppConfig) -> Result<()> {
    let report = facade.overview()?;
    let dir = &config.output.dir;
    let rows = config.output.preview_rows;

    println!("Settlements overview\n");
    println!("Top regions by population");
    output::preview_records(&report.top_regions, rows);
    output::write_records_csv(&dir.join("top_regions.csv"), &report.top_regions)?;

    println!("Population of regions");
    output::preview_table_rows(std::slice::from_ref(&report.population_stats), 1);

    println!("Settlement types");
    output::preview_records(&report.settlement_types, rows);
    output::write_records_csv(&dir.join("settlement_types.csv"), &report.settlement_types)?;

    let g = &report.general_stats;
    println!(
        "Regions: {}, municipalities: {}, settlements: {} ({} populated, {} empty)\n",
        format_int(g.regions.unwrap_or(0)),
        format_int(g.municipalities.unwrap_or(0)),
        format_int(g.settlements),
        format_int(g.populated_settlements),
        format_int(g.empty_settlements)
    );

    output::write_json(&dir.join("overview.json"), &report)?;
    println!("(Full report exported to {})", dir.display());
    Ok(())
}

fn run_region(
    facade: &StatisticsFacade<InMemorySource>,
    config: &AppConfig,
    name: &str,
) -> Result<()> {
    let report = facade.region_report(name)?;
    let dir = &config.output.dir;
    let rows = config.output.preview_rows;

    println!("Region: {}\n", report.region_name);
    println!("Population of municipalities");
    output::preview_table_rows(std::slice::from_ref(&report.population_stats), 1);

    println!("Municipalities");
    output::preview_records(&report.municipalities, rows);
    output::write_records_csv(&dir.join("municipalities.csv"), &report.municipalities)?;

    let g = &report.region_stats;
    println!(
        "Municipalities: {}, settlements: {} ({} populated, {} empty)\n",
        format_int(g.municipalities.unwrap_or(0)),
        format_int(g.settlements),
        format_int(g.populated_settlements),
        format_int(g.empty_settlements)
    );

    output::write_json(&dir.join("region.json"), &report)?;
    println!("(Full report exported to {})", dir.display());
    Ok(())
}

fn run_municipality(
    facade: &StatisticsFacade<InMemorySource>,
    config: &AppConfig,
    query: &MunicipalityQuery,
) -> Result<()> {
    let report = facade.municipality_report(query, config.report.page_size)?;
    let dir = &config.output.dir;

    println!("Municipality: {} ({})\n", report.municipality, report.region_name);
    println!("Population of settlements");
    output::preview_table_rows(std::slice::from_ref(&report.population_stats), 1);

    println!(
        "Settlements, page {} of {} ({} found)",
        report.page.number,
        report.page.num_pages,
        format_int(report.total_results)
    );
    output::preview_table_rows(&report.page.items, report.page.per_page);
    output::write_csv(&dir.join("settlements.csv"), &report.page.items)?;

    println!("Types: {}\n", report.settlement_types.join(", "));

    output::write_json(&dir.join("municipality.json"), &report)?;
    println!("(Full report exported to {})", dir.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(csv) = cli.csv {
        config.input.csv = csv;
    }

    let source = load_source(&config)?;
    fs::create_dir_all(&config.output.dir)
        .with_context(|| format!("Failed to create {:?}", config.output.dir))?;
    let facade = StatisticsFacade::new(&source);

    match cli.command {
        Commands::Overview => run_overview(&facade, &config),
        Commands::Region { name } => run_region(&facade, &config, &name),
        Commands::Municipality {
            region,
            name,
            search,
            settlement_type,
            page,
        } => {
            let query = MunicipalityQuery {
                search,
                settlement_type,
                page,
                ..MunicipalityQuery::new(&region, &name)
            };
            run_municipality(&facade, &config, &query)
        }
    }
}
