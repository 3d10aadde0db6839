use std::sync::Arc;

use super::{BoundaryFeature, PlantFeature};

/// Ordered set of boundary features from one source. Replaced wholesale on reload.
#[derive(Debug, Clone, Default)]
pub struct BoundaryCollection {
    features: Vec<Arc<BoundaryFeature>>,
}

impl BoundaryCollection {
    pub fn new(features: Vec<BoundaryFeature>) -> Self {
        Self { features: features.into_iter().map(Arc::new).collect() }
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[Arc<BoundaryFeature>] { &self.features }
}

/// Ordered set of plant features, held in full for repeated spatial queries.
#[derive(Debug, Clone, Default)]
pub struct PointCollection {
    features: Vec<Arc<PlantFeature>>,
}

impl PointCollection {
    pub fn new(features: Vec<PlantFeature>) -> Self {
        Self { features: features.into_iter().map(Arc::new).collect() }
    }

    #[inline] pub fn len(&self) -> usize { self.features.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.features.is_empty() }

    #[inline] pub fn features(&self) -> &[Arc<PlantFeature>] { &self.features }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Arc<PlantFeature>> { self.features.iter() }
}
