//! Layer sequencing.

use super::{extract_contours, GeometrySource, Layer};
use crate::{CoordF, Error, Result};
use log::{debug, info, warn};

/// Candidate cutting heights for an extent.
///
/// Heights are `min_z + k * layer_height` for every `k` keeping the height
/// strictly below `max_z`. The count is derived as an integer so long
/// models do not drift from float accumulation.
pub fn slice_heights(min_z: CoordF, max_z: CoordF, layer_height: CoordF) -> Result<Vec<CoordF>> {
    if !layer_height.is_finite() || layer_height <= 0.0 {
        return Err(Error::Config(format!(
            "layer height must be a positive number, got {}",
            layer_height
        )));
    }
    if !min_z.is_finite() || !max_z.is_finite() || max_z <= min_z {
        return Ok(Vec::new());
    }

    let count = ((max_z - min_z) / layer_height).ceil() as usize;
    Ok((0..count)
        .map(|k| min_z + k as CoordF * layer_height)
        .take_while(|&z| z < max_z)
        .collect())
}

/// Drives a [`GeometrySource`] through every candidate height.
#[derive(Clone, Debug)]
pub struct Slicer {
    layer_height: CoordF,
}

impl Slicer {
    /// Create a slicer cutting at the given layer height.
    pub fn new(layer_height: CoordF) -> Self {
        Self { layer_height }
    }

    /// Slice `source` into layers.
    ///
    /// Missing or entity-less cross-sections are skipped with a warning.
    /// Accepted layers are indexed densely from zero. Returns
    /// [`Error::NoValidSlices`] when nothing was accepted.
    pub fn slice<S: GeometrySource + ?Sized>(&self, source: &S) -> Result<Vec<Layer>> {
        let extent = source.extent().ok_or(Error::NoValidSlices)?;
        let heights = slice_heights(extent.min_z, extent.max_z, self.layer_height)?;
        info!(
            "Slicing Z {:.3}..{:.3} into {} candidate layers",
            extent.min_z,
            extent.max_z,
            heights.len()
        );

        let mut layers = Vec::with_capacity(heights.len());
        for z in heights {
            let section = match source.cross_section(z) {
                Some(section) if section.has_entities() => section,
                Some(_) => {
                    warn!("Cross-section at Z={:.2} has no entities, skipping", z);
                    continue;
                }
                None => {
                    warn!("No valid cross-section at Z={:.2}, skipping", z);
                    continue;
                }
            };

            let index = layers.len();
            let (planar, _) = section.to_2d();
            let contours = extract_contours(&planar, index);
            debug!(
                "Layer {} at Z={:.3}: {} contours",
                index,
                z,
                contours.len()
            );
            layers.push(Layer::new(index, z, contours));
        }

        if layers.is_empty() {
            return Err(Error::NoValidSlices);
        }

        info!("Generated {} layers", layers.len());
        Ok(layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3F;
    use crate::slice::{CrossSection, ModelExtent};
    use std::cell::RefCell;

    /// Square prism that misses selected heights.
    struct Prism {
        extent: ModelExtent,
        missing: Vec<usize>,
        calls: RefCell<Vec<CoordF>>,
    }

    impl Prism {
        fn new(min_z: CoordF, max_z: CoordF) -> Self {
            Self {
                extent: ModelExtent::new(min_z, max_z),
                missing: Vec::new(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl GeometrySource for Prism {
        fn extent(&self) -> Option<ModelExtent> {
            Some(self.extent)
        }

        fn cross_section(&self, z: CoordF) -> Option<CrossSection> {
            let call = self.calls.borrow().len();
            self.calls.borrow_mut().push(z);
            if self.missing.contains(&call) {
                return None;
            }
            Some(CrossSection::new(
                z,
                vec![
                    Point3F::new(0.0, 0.0, z),
                    Point3F::new(10.0, 0.0, z),
                    Point3F::new(10.0, 10.0, z),
                    Point3F::new(0.0, 10.0, z),
                ],
                vec![vec![0, 1, 2, 3]],
            ))
        }
    }

    #[test]
    fn test_slice_heights_count() {
        let heights = slice_heights(0.0, 2.0, 0.5).unwrap();
        assert_eq!(heights.len(), 4);
        assert!((heights[3] - 1.5).abs() < 1e-6);

        let heights = slice_heights(0.0, 2.2, 0.5).unwrap();
        assert_eq!(heights.len(), 5);
        assert!(heights.iter().all(|&z| z < 2.2));
    }

    #[test]
    fn test_slice_heights_offset_origin() {
        let heights = slice_heights(1.0, 2.0, 0.25).unwrap();
        assert_eq!(heights.len(), 4);
        assert!((heights[0] - 1.0).abs() < 1e-6);
        assert!((heights[1] - 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_slice_heights_no_accumulation_drift() {
        let heights = slice_heights(0.0, 100.0, 0.1).unwrap();
        assert!((heights[999] - 99.9).abs() < 1e-9);
        assert!(heights.iter().all(|&z| z < 100.0));
    }

    #[test]
    fn test_slice_heights_flat_model() {
        assert!(slice_heights(3.0, 3.0, 0.2).unwrap().is_empty());
    }

    #[test]
    fn test_slice_heights_rejects_bad_layer_height() {
        assert!(matches!(slice_heights(0.0, 1.0, 0.0), Err(Error::Config(_))));
        assert!(matches!(slice_heights(0.0, 1.0, -0.2), Err(Error::Config(_))));
        assert!(matches!(
            slice_heights(0.0, 1.0, CoordF::NAN),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_slice_prism() {
        let prism = Prism::new(0.0, 2.0);
        let layers = Slicer::new(0.5).slice(&prism).unwrap();

        assert_eq!(layers.len(), 4);
        assert_eq!(prism.calls.borrow().len(), 4);
        for (i, layer) in layers.iter().enumerate() {
            assert_eq!(layer.index, i);
            assert_eq!(layer.contours.len(), 1);
            assert!(layer.z_height < 2.0);
        }
    }

    #[test]
    fn test_missing_sections_keep_dense_indices() {
        let mut prism = Prism::new(0.0, 2.0);
        prism.missing = vec![1];
        let layers = Slicer::new(0.5).slice(&prism).unwrap();

        assert_eq!(layers.len(), 3);
        assert_eq!(layers[1].index, 1);
        assert!((layers[1].z_height - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_model_is_fatal() {
        let prism = Prism::new(1.0, 1.0);
        let result = Slicer::new(0.5).slice(&prism);
        assert!(matches!(result, Err(Error::NoValidSlices)));
    }

    #[test]
    fn test_all_sections_missing_is_fatal() {
        let mut prism = Prism::new(0.0, 1.0);
        prism.missing = vec![0, 1];
        assert!(matches!(
            Slicer::new(0.5).slice(&prism),
            Err(Error::NoValidSlices)
        ));
    }
}
