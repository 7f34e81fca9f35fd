//! Composite of intersectable objects.

use helios_math::Ray;

use super::{Hit, Intersectable};

/// A collection of intersectable objects, itself intersectable.
///
/// Collections nest: a `Geometries` can hold other `Geometries`.
#[derive(Default)]
pub struct Geometries {
    objects: Vec<Box<dyn Intersectable>>,
}

impl Geometries {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the collection.
    pub fn add(&mut self, object: impl Intersectable + 'static) {
        self.objects.push(Box::new(object));
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, object: impl Intersectable + 'static) -> Self {
        self.add(object);
        self
    }

    /// Get the number of direct children.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Intersectable for Geometries {
    fn find_intersections<'a>(&'a self, ray: &Ray) -> Vec<Hit<'a>> {
        self.objects
            .iter()
            .flat_map(|object| object.find_intersections(ray))
            .collect()
    }
}

impl std::fmt::Debug for Geometries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geometries")
            .field("len", &self.objects.len())
            .finish()
    }
}
