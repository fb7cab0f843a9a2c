use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use structopt::StructOpt;
use tracing::{debug, error, info, warn};

use sgmapper::config::MapperConfig;
use sgmapper::formatters::{Renderer, renderer_for};
use sgmapper::graph_builder::SgGraph;
use sgmapper::types::SecurityGroupRecord;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "sgmapper",
    about = "Map security group relationships and generate visualizations"
)]
struct Opt {
    /// Input JSON file with security group records
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Output file path
    #[structopt(short, long, default_value = "sg_map.dot", parse(from_os_str))]
    output: PathBuf,

    /// Render engine: dot or json (defaults to the configured engine)
    #[structopt(short, long)]
    format: Option<String>,

    /// Configuration file (TOML)
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Security group ID to highlight
    #[structopt(long)]
    highlight: Option<String>,

    /// Generate a separate map for each security group
    #[structopt(long)]
    output_per_sg: bool,

    /// Filter specific security group IDs (e.g. sg-123456)
    #[structopt(long)]
    security_group_ids: Vec<String>,

    /// Enable debug logging
    #[structopt(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    init_logging(opt.debug);
    info!("Starting security group mapper");

    let config = match &opt.config {
        Some(path) => MapperConfig::load(path)?,
        None => MapperConfig::default(),
    };

    let mut records = load_records(&opt.input)?;
    if !opt.security_group_ids.is_empty() {
        for id in &opt.security_group_ids {
            if !records.iter().any(|sg| sg.group_id == *id) {
                warn!("Security group {} not found", id);
            }
        }
        records.retain(|sg| opt.security_group_ids.contains(&sg.group_id));
    }
    if records.is_empty() {
        bail!("No security groups found in {:?}", opt.input);
    }
    info!("Found total of {} security groups", records.len());

    let engine = opt
        .format
        .as_deref()
        .unwrap_or(&config.visualization.default_engine)
        .to_string();
    let renderer = renderer_for(&engine, &config)?;

    let mut graph = SgGraph::new(config);

    if opt.output_per_sg {
        generate_per_group_maps(&mut graph, renderer.as_ref(), &records, &opt.output);
    } else {
        debug!("Building graph structure");
        graph.build(&records, opt.highlight.as_deref());
        let output = output_with_extension(&opt.output, renderer.extension());
        debug!("Generating visualization to {}", output.display());
        renderer.render(&graph, &output, None)?;
    }

    info!("Security group mapping complete");
    Ok(())
}

fn init_logging(debug: bool) {
    let default_directive = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_records(path: &Path) -> Result<Vec<SecurityGroupRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {:?}", path))?;
    let records: Vec<SecurityGroupRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse security group records from {:?}", path))?;
    Ok(records)
}

// One map per record, each build focused on and highlighting that group.
// A failed render is logged and skipped so the rest of the batch completes.
fn generate_per_group_maps(
    graph: &mut SgGraph,
    renderer: &dyn Renderer,
    records: &[SecurityGroupRecord],
    base_output: &Path,
) {
    for record in records {
        let output = per_group_output(base_output, &record.group_id, renderer.extension());
        let title = format!(
            "Security Group: {} ({})",
            record.group_name, record.group_id
        );

        debug!("Building graph for {}", record.group_id);
        graph.build(std::slice::from_ref(record), Some(&record.group_id));
        match renderer.render(graph, &output, Some(&title)) {
            Ok(()) => info!(
                "Generated map for {} at {}",
                record.group_id,
                output.display()
            ),
            Err(e) => error!("Failed to generate map for {}: {:#}", record.group_id, e),
        }
    }
}

fn per_group_output(base: &Path, group_id: &str, extension: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sg_map");
    base.with_file_name(format!("{}_{}.{}", stem, group_id, extension))
}

fn output_with_extension(path: &Path, extension: &str) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some(extension) {
        path.to_path_buf()
    } else {
        path.with_extension(extension)
    }
}
