use clap::Args;

use crate::cli::{print_explain, OutputFormat, PageArgs, StoreArgs};
use crate::core::region::Region;
use crate::core::types::VariantType;
use crate::core::variant::VariantDocument;
use crate::filter::builder::FilterBuilder;
use crate::filter::compose::{ranges_predicate, with_filters};
use crate::services::variant::VariantService;

#[derive(Args)]
pub struct BeaconArgs {
    /// Range the variant start must fall in, as CHR:POS or CHR:START-END
    #[arg(long, required = true)]
    pub start_range: Region,

    /// Range the variant end must fall in (defaults to the start range)
    #[arg(long)]
    pub end_range: Option<Region>,

    /// Reference allele
    #[arg(long)]
    pub reference: Option<String>,

    /// Alternate allele
    #[arg(long)]
    pub alternate: Option<String>,

    /// Variant type, e.g. SNV or INDEL
    #[arg(long = "type")]
    pub variant_type: Option<VariantType>,

    /// Only variants of these studies (repeatable)
    #[arg(long = "study")]
    pub studies: Vec<String>,

    /// Print the store query to stderr
    #[arg(long)]
    pub explain: bool,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub paging: PageArgs,
}

pub fn run(args: BeaconArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (config, store) = args.store.open()?;
    let service = VariantService::new(&store, &config);

    let end_range = args.end_range.as_ref().unwrap_or(&args.start_range);
    let filters = FilterBuilder::beacon_filters(
        args.reference.as_deref(),
        args.alternate.as_deref(),
        args.variant_type,
        Some(args.studies.as_slice()),
    )?;

    if args.explain {
        print_explain(&with_filters(
            ranges_predicate(&args.start_range, end_range)?,
            &filters,
        ))?;
    }

    let variants = service.find_by_region_and_other_beacon_filters(
        &args.start_range,
        end_range,
        &filters,
        args.paging.pageable(&config),
    )?;

    if verbose {
        eprintln!(
            "Start range {}, end range {}: {} variant(s)",
            args.start_range,
            end_range,
            variants.len()
        );
    }

    match format {
        OutputFormat::Text => print_text(&variants),
        OutputFormat::Json => print_json(&variants)?,
        OutputFormat::Tsv => print_tsv(&variants),
    }

    Ok(())
}

fn print_text(variants: &[VariantDocument]) {
    println!("Exists: {}", !variants.is_empty());
    for variant in variants {
        let studies: Vec<&str> = variant.study_ids().collect();
        println!(
            "  {}  {}>{}  {}  [{}]",
            variant.id,
            variant.reference,
            variant.alternate,
            variant.variant_type,
            studies.join(", ")
        );
    }
}

fn print_json(variants: &[VariantDocument]) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "exists": !variants.is_empty(),
        "variants": variants,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(variants: &[VariantDocument]) {
    println!("id\tchromosome\tstart\tend\treference\talternate\ttype");
    for variant in variants {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            variant.id,
            variant.chromosome,
            variant.start,
            variant.end,
            variant.reference,
            variant.alternate,
            variant.variant_type
        );
    }
}
