//! Standalone triangle mesh used to carry triangulated faces between
//! containers.

use nalgebra::{Affine3, Point3};

use crate::error::{MeshError, MeshResult};

/// A point list plus triangles indexing into it.
///
/// Unlike [`Entities`](crate::Entities) the mesh has no topology and no vertex
/// merging, so its points can be moved freely with [`set_point`](Self::set_point).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonMesh {
    points: Vec<Point3<f64>>,
    polygons: Vec<[u32; 3]>,
}

impl PolygonMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from existing points and triangles.
    pub fn from_parts(points: Vec<Point3<f64>>, polygons: Vec<[u32; 3]>) -> Self {
        Self { points, polygons }
    }

    /// Append a point, returning its index.
    pub fn add_point(&mut self, point: Point3<f64>) -> u32 {
        self.points.push(point);
        (self.points.len() - 1) as u32
    }

    /// Append a triangle.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidHandle`] if any index is out of range.
    pub fn add_polygon(&mut self, triangle: [u32; 3]) -> MeshResult<()> {
        for index in triangle {
            self.check_index(index)?;
        }
        self.polygons.push(triangle);
        Ok(())
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    #[inline]
    pub fn polygons(&self) -> &[[u32; 3]] {
        &self.polygons
    }

    pub fn point_at(&self, index: u32) -> Option<Point3<f64>> {
        self.points.get(index as usize).copied()
    }

    /// Move an existing point.
    pub fn set_point(&mut self, index: u32, point: Point3<f64>) -> MeshResult<()> {
        self.check_index(index)?;
        self.points[index as usize] = point;
        Ok(())
    }

    /// Corner positions of one triangle.
    pub fn triangle_points(&self, triangle: &[u32; 3]) -> MeshResult<[Point3<f64>; 3]> {
        let mut out = [Point3::origin(); 3];
        for (slot, &index) in out.iter_mut().zip(triangle) {
            *slot = self
                .point_at(index)
                .ok_or_else(|| MeshError::invalid_handle("mesh point", index))?;
        }
        Ok(out)
    }

    /// Flip every triangle's orientation.
    pub fn reverse_winding(&mut self) {
        for triangle in &mut self.polygons {
            triangle.swap(1, 2);
        }
    }

    /// Apply a transformation to every point.
    pub fn transform(&mut self, transformation: &Affine3<f64>) {
        for p in &mut self.points {
            *p = transformation.transform_point(p);
        }
    }

    fn check_index(&self, index: u32) -> MeshResult<()> {
        if (index as usize) < self.points.len() {
            Ok(())
        } else {
            Err(MeshError::invalid_handle("mesh point", index))
        }
    }
}
