//! Domain types of the variant database.
//!
//! - [`Region`](region::Region): closed coordinate interval on one chromosome
//! - [`VariantDocument`](variant::VariantDocument): a stored variant with its
//!   source entries, statistics and annotation summary
//! - [`Annotation`](annotation::Annotation), [`AnnotationMetadata`](annotation::AnnotationMetadata):
//!   functional annotation and the VEP/cache versions it was produced with
//! - [`VariantSource`](source::VariantSource): an imported file and its samples
//! - [`VariantWithSamplesAndAnnotation`](enriched::VariantWithSamplesAndAnnotation):
//!   what region and id queries return
//! - [`Publication`](publication::Publication), [`Study`](study::Study): bibliographic metadata
//! - [`VariantType`](types::VariantType), [`Pageable`](types::Pageable) and other small types
//!
//! ## Coordinates
//!
//! Coordinates are 1-based and inclusive at both ends. A variant spans
//! `[start, end]`; a single-nucleotide variant has `start == end`.

pub mod annotation;
pub mod enriched;
pub mod publication;
pub mod region;
pub mod source;
pub mod study;
pub mod types;
pub mod variant;
