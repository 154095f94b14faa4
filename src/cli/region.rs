use clap::Args;

use crate::cli::{print_explain, OutputFormat, PageArgs, StoreArgs};
use crate::core::annotation::AnnotationMetadata;
use crate::core::enriched::VariantWithSamplesAndAnnotation;
use crate::core::region::Region;
use crate::filter::builder::FilterBuilder;
use crate::filter::compose::{regions_predicate, with_filters};
use crate::filter::query::ExcludedField;
use crate::services::variant::VariantService;

#[derive(Args)]
pub struct RegionArgs {
    /// Regions as CHR, CHR:POS or CHR:START-END
    #[arg(required = true)]
    pub regions: Vec<Region>,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Only variants of these studies (repeatable)
    #[arg(long = "study")]
    pub studies: Vec<String>,

    /// Minor allele frequency threshold, e.g. '<0.05'
    #[arg(long)]
    pub maf: Option<String>,

    /// PolyPhen score threshold, e.g. '>0.5'
    #[arg(long)]
    pub polyphen: Option<String>,

    /// SIFT score threshold, e.g. '<0.05'
    #[arg(long)]
    pub sift: Option<String>,

    /// Sequence Ontology consequence terms, e.g. SO:0001583 (repeatable)
    #[arg(long = "consequence-type")]
    pub consequence_types: Vec<String>,

    /// VEP version of the annotation to join (requires --annotation-cache)
    #[arg(long, requires = "annotation_cache")]
    pub annotation_vep: Option<String>,

    /// Cache version of the annotation to join (requires --annotation-vep)
    #[arg(long, requires = "annotation_vep")]
    pub annotation_cache: Option<String>,

    /// Parts of the result to leave out: sourceEntries, sourceEntries.samplesData,
    /// sourceEntries.cohortStats, annotation (repeatable)
    #[arg(long)]
    pub exclude: Vec<ExcludedField>,

    /// Print only the number of matching variants
    #[arg(long)]
    pub count: bool,

    /// Print the store query to stderr
    #[arg(long)]
    pub explain: bool,

    #[command(flatten)]
    pub paging: PageArgs,
}

pub fn run(args: RegionArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let (config, store) = args.store.open()?;
    let service = VariantService::new(&store, &config);

    let filters = FilterBuilder::new()
        .with_studies(Some(args.studies.as_slice()))
        .with_maf(args.maf.as_deref())
        .with_polyphen(args.polyphen.as_deref())
        .with_sift(args.sift.as_deref())
        .with_consequence_types(Some(args.consequence_types.as_slice()))
        .build()?;

    if args.explain {
        print_explain(&with_filters(regions_predicate(&args.regions), &filters))?;
    }

    if args.count {
        let count = service.count_by_regions_and_complex_filters(&args.regions, &filters)?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::json!({ "count": count })),
            OutputFormat::Text | OutputFormat::Tsv => println!("{count}"),
        }
        return Ok(());
    }

    let annotation = match (&args.annotation_vep, &args.annotation_cache) {
        (Some(vep), Some(cache)) => Some(AnnotationMetadata::new(vep, cache)),
        _ => None,
    };

    let variants = service.find_by_regions_and_complex_filters(
        &args.regions,
        &filters,
        annotation.as_ref(),
        &args.exclude,
        args.paging.pageable(&config),
    )?;

    if verbose {
        eprintln!("Found {} variant(s)", variants.len());
    }

    match format {
        OutputFormat::Text => print_text(&variants),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&variants)?),
        OutputFormat::Tsv => print_tsv(&variants),
    }

    Ok(())
}

fn print_text(variants: &[VariantWithSamplesAndAnnotation]) {
    if variants.is_empty() {
        println!("No variants found");
        return;
    }
    for variant in variants {
        println!(
            "{}  {}:{}-{}  {}>{}  {}",
            variant.id,
            variant.chromosome,
            variant.start,
            variant.end,
            variant.reference,
            variant.alternate,
            variant.variant_type
        );
        for entry in &variant.source_entries {
            println!(
                "    study {} file {}: {} sample(s), {} cohort(s)",
                entry.study_id,
                entry.file_id,
                entry.samples_data.len(),
                entry.cohort_stats.len()
            );
        }
        if let Some(annotation) = &variant.annotation {
            let genes: Vec<&str> = annotation
                .consequence_types
                .iter()
                .filter_map(|ct| ct.gene_name.as_deref())
                .collect();
            println!(
                "    annotation VEP {} / cache {}: {} consequence type(s){}",
                annotation.vep_version,
                annotation.cache_version,
                annotation.consequence_types.len(),
                if genes.is_empty() {
                    String::new()
                } else {
                    format!(", genes {}", genes.join(","))
                }
            );
        }
    }
}

fn print_tsv(variants: &[VariantWithSamplesAndAnnotation]) {
    println!("id\tchromosome\tstart\tend\treference\talternate\ttype\tstudies");
    for variant in variants {
        let studies: Vec<&str> = variant
            .source_entries
            .iter()
            .map(|e| e.study_id.as_str())
            .collect();
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            variant.id,
            variant.chromosome,
            variant.start,
            variant.end,
            variant.reference,
            variant.alternate,
            variant.variant_type,
            studies.join(",")
        );
    }
}
