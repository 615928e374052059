use geo::{BoundingRect, Coord, Intersects, MultiPolygon, Point, Rect};
use rstar::{
    primitives::{GeomWithData, Rectangle},
    RTree, AABB,
};

/// Shape envelope tagged with the shape's index.
type Envelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Screen-space shapes of one layer with an R-tree for pointer hit-testing.
#[derive(Debug, Clone)]
pub(crate) struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    bounds: Vec<Option<Rect<f64>>>,
    rtree: RTree<Envelope>,
}

impl Geometries {
    /// Index projected shapes; a shape keeps its position as its index.
    pub(crate) fn new(shapes: Vec<MultiPolygon<f64>>) -> Self {
        let bounds = shapes.iter()
            .map(|shape| shape.bounding_rect())
            .collect::<Vec<_>>();

        Self {
            rtree: RTree::bulk_load(
                bounds.iter().enumerate()
                    .filter_map(|(i, rect)| rect.map(|rect| {
                        Envelope::new(Rectangle::from_corners(rect.min().into(), rect.max().into()), i)
                    }))
                    .collect()
            ),
            shapes,
            bounds,
        }
    }

    /// Screen bounding box of a shape; `None` for empty geometry.
    #[inline] pub(crate) fn bounds_of(&self, idx: usize) -> Option<Rect<f64>> {
        self.bounds.get(idx).copied().flatten()
    }

    /// Index of the shape containing the point, if any.
    /// Points on a shared border resolve to the lowest index.
    pub(crate) fn locate(&self, at: Coord<f64>) -> Option<usize> {
        let envelope = AABB::from_point([at.x, at.y]);
        let point = Point::from(at);

        self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|envelope| envelope.data)
            .filter(|&idx| self.shapes[idx].intersects(&point))
            .min()
    }
}
