//! Type-keyed index of registered annotations

use std::collections::HashMap;

use crate::world::AnnotationId;

use super::AnnotationType;

/// Maps each variant and capability tag to the annotations carrying it
#[derive(Debug, Clone, Default)]
pub struct AnnotationIndex {
    by_type: HashMap<AnnotationType, Vec<AnnotationId>>,
}

impl AnnotationIndex {
    /// Register an annotation under its own type and each capability
    pub(crate) fn register(
        &mut self,
        id: AnnotationId,
        ty: AnnotationType,
        capabilities: &[AnnotationType],
    ) {
        for tag in std::iter::once(&ty).chain(capabilities) {
            let ids = self.by_type.entry(*tag).or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    /// Annotations carrying a tag, in registration order
    pub fn get(&self, ty: AnnotationType) -> &[AnnotationId] {
        self.by_type.get(&ty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every tag with its annotations
    pub(crate) fn entries(&self) -> impl Iterator<Item = (AnnotationType, &[AnnotationId])> {
        self.by_type.iter().map(|(ty, ids)| (*ty, ids.as_slice()))
    }
}
