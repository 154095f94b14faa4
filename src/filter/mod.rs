//! Query composition for the variants collection.
//!
//! Callers describe what they want with [`Region`](crate::core::region::Region)s
//! and [`VariantRepositoryFilter`](builder::VariantRepositoryFilter)s; this module
//! turns them into a single [`Predicate`](predicate::Predicate) that a
//! [`VariantStore`](crate::store::VariantStore) executes.
//!
//! - [`builder`]: validated filters built from optional criteria
//! - [`compose`]: region overlap, start/end range and study predicates
//! - [`predicate`]: the predicate tree and its MongoDB rendering
//! - [`query`]: predicate plus sort order and projection
//!
//! ## Example
//!
//! ```rust
//! use eva_commons::core::region::Region;
//! use eva_commons::filter::builder::FilterBuilder;
//! use eva_commons::filter::compose::{ranges_predicate, with_filters};
//!
//! let range = Region::new("11", 190238, 190276).unwrap();
//! let filters = FilterBuilder::beacon_filters(Some("A"), Some("T"), None, None::<&[&str]>).unwrap();
//! let predicate = with_filters(ranges_predicate(&range, &range).unwrap(), &filters);
//! println!("{}", predicate.to_document());
//! ```

pub mod builder;
pub mod compose;
pub mod predicate;
pub mod query;
