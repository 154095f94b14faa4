use clap::Args;

use crate::cli::{OutputFormat, StoreArgs};
use crate::services::annotation_metadata::AnnotationMetadataService;
use crate::services::variant::VariantService;

#[derive(Args)]
pub struct BoundariesArgs {
    /// Chromosome name
    pub chromosome: String,

    /// Studies to aggregate over (repeatable)
    #[arg(long = "study")]
    pub studies: Vec<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct CountArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct AnnotationsArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

pub fn run_boundaries(args: BoundariesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (config, store) = args.store.open()?;
    let service = VariantService::new(&store, &config);
    let bounds = service.find_chromosome_boundaries(&args.chromosome, &args.studies)?;

    match format {
        OutputFormat::Text => match bounds {
            Some((lowest, highest)) => {
                println!("Chromosome {}", args.chromosome);
                println!("  Lowest reported coordinate: {lowest}");
                println!("  Highest reported coordinate: {highest}");
            }
            None => println!(
                "No variants on chromosome {} for the given studies",
                args.chromosome
            ),
        },
        OutputFormat::Json => {
            let output = serde_json::json!({
                "chromosome": args.chromosome,
                "studies": args.studies,
                "lowest": bounds.map(|(lowest, _)| lowest),
                "highest": bounds.map(|(_, highest)| highest),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("chromosome\tlowest\thighest");
            let cell = |v: Option<u64>| v.map_or_else(|| "NA".to_string(), |n| n.to_string());
            println!(
                "{}\t{}\t{}",
                args.chromosome,
                cell(bounds.map(|(lowest, _)| lowest)),
                cell(bounds.map(|(_, highest)| highest))
            );
        }
    }

    Ok(())
}

pub fn run_count(args: CountArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (config, store) = args.store.open()?;
    let total = VariantService::new(&store, &config).count_total_number_of_variants()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "total": total })),
        OutputFormat::Text | OutputFormat::Tsv => println!("{total}"),
    }
    Ok(())
}

pub fn run_annotations(args: AnnotationsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (_, store) = args.store.open()?;
    let all = AnnotationMetadataService::new(&store).find_all_ordered()?;

    match format {
        OutputFormat::Text => {
            if all.is_empty() {
                println!("No annotation versions stored");
            }
            for metadata in &all {
                let marker = if metadata.default_version { " (default)" } else { "" };
                println!("{metadata}{marker}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&all)?),
        OutputFormat::Tsv => {
            println!("vep_version\tcache_version\tdefault");
            for metadata in &all {
                println!(
                    "{}\t{}\t{}",
                    metadata.vep_version, metadata.cache_version, metadata.default_version
                );
            }
        }
    }
    Ok(())
}
