use tracing::debug;

use crate::core::annotation::AnnotationMetadata;
use crate::services::ServiceError;
use crate::store::VariantStore;

/// Lookup of the annotation versions available in the store
pub struct AnnotationMetadataService<'a, S: VariantStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: VariantStore + ?Sized> AnnotationMetadataService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All entries, newest cache version first, then newest VEP version
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the store fails.
    pub fn find_all_ordered(&self) -> Result<Vec<AnnotationMetadata>, ServiceError> {
        let mut all = self.store.find_annotation_metadata()?;
        all.sort_by(AnnotationMetadata::newest_first);
        Ok(all)
    }

    /// Entries flagged as the default version
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the store fails.
    pub fn find_default(&self) -> Result<Vec<AnnotationMetadata>, ServiceError> {
        Ok(self
            .store
            .find_annotation_metadata()?
            .into_iter()
            .filter(|m| m.default_version)
            .collect())
    }

    /// # Errors
    ///
    /// Returns `ServiceError::StorageUnavailable` if the store fails.
    pub fn find_by_cache_and_vep(
        &self,
        cache_version: &str,
        vep_version: &str,
    ) -> Result<Vec<AnnotationMetadata>, ServiceError> {
        let wanted = AnnotationMetadata::new(vep_version, cache_version);
        Ok(self
            .store
            .find_annotation_metadata()?
            .into_iter()
            .filter(|m| m.same_version(&wanted))
            .collect())
    }

    /// Pick the annotation version to join into results.
    ///
    /// A requested version must exist. Without a request the default-flagged
    /// version wins, then the newest one.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::AnnotationMetadataNotFound` if the requested version is
    /// unknown or the store holds no annotation metadata at all.
    pub fn resolve(
        &self,
        requested: Option<&AnnotationMetadata>,
    ) -> Result<AnnotationMetadata, ServiceError> {
        if let Some(requested) = requested {
            return self
                .find_by_cache_and_vep(&requested.cache_version, &requested.vep_version)?
                .into_iter()
                .next()
                .ok_or_else(|| ServiceError::AnnotationMetadataNotFound(requested.to_string()));
        }

        let mut defaults = self.find_default()?;
        defaults.sort_by(AnnotationMetadata::newest_first);
        let chosen = match defaults.into_iter().next() {
            Some(default) => Some(default),
            None => self.find_all_ordered()?.into_iter().next(),
        };
        let chosen = chosen.ok_or_else(|| {
            ServiceError::AnnotationMetadataNotFound("no annotation versions stored".to_string())
        })?;
        debug!(version = %chosen, "selected annotation version");
        Ok(chosen)
    }
}
