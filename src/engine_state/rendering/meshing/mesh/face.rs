use cgmath::Point3;

use crate::engine_state::voxels::block::block_side::BlockSide;

/// Represents a single unit quad on one side of a voxel.
///
/// A face is defined by four corner points in global block coordinates. The
/// block at `(i, j, k)` occupies `[i, i + 1) x [j, j + 1) x [k, k + 1)`.
///
/// Corners are named as seen from outside the block, looking at the face:
/// `lower-left -> lower-right -> upper-right` winds counter-clockwise, so the
/// front side of every face points away from the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Lower-right corner of the face
    pub lr: Point3<i32>,
    /// Lower-left corner of the face
    pub ll: Point3<i32>,
    /// Upper-right corner of the face
    pub ur: Point3<i32>,
    /// Upper-left corner of the face
    pub ul: Point3<i32>,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face on `block_side` of the block at global block
    /// coordinates `(i, j, k)`.
    pub fn new(i: i32, j: i32, k: i32, block_side: BlockSide) -> Self {
        match block_side {
            BlockSide::FRONT => Face {
                ll: Point3::new(i, j, k + 1),
                lr: Point3::new(i + 1, j, k + 1),
                ul: Point3::new(i, j + 1, k + 1),
                ur: Point3::new(i + 1, j + 1, k + 1),
                block_side,
            },

            BlockSide::BACK => Face {
                ll: Point3::new(i + 1, j, k),
                lr: Point3::new(i, j, k),
                ul: Point3::new(i + 1, j + 1, k),
                ur: Point3::new(i, j + 1, k),
                block_side,
            },

            BlockSide::BOTTOM => Face {
                ll: Point3::new(i, j, k),
                lr: Point3::new(i + 1, j, k),
                ul: Point3::new(i, j, k + 1),
                ur: Point3::new(i + 1, j, k + 1),
                block_side,
            },

            BlockSide::TOP => Face {
                ll: Point3::new(i, j + 1, k + 1),
                lr: Point3::new(i + 1, j + 1, k + 1),
                ul: Point3::new(i, j + 1, k),
                ur: Point3::new(i + 1, j + 1, k),
                block_side,
            },

            BlockSide::LEFT => Face {
                ll: Point3::new(i, j, k),
                lr: Point3::new(i, j, k + 1),
                ul: Point3::new(i, j + 1, k),
                ur: Point3::new(i, j + 1, k + 1),
                block_side,
            },

            BlockSide::RIGHT => Face {
                ll: Point3::new(i + 1, j, k + 1),
                lr: Point3::new(i + 1, j, k),
                ul: Point3::new(i + 1, j + 1, k + 1),
                ur: Point3::new(i + 1, j + 1, k),
                block_side,
            },
        }
    }

    /// The corners in vertex order: lower-left, lower-right, upper-left, upper-right.
    pub fn corners(&self) -> [Point3<i32>; 4] {
        [self.ll, self.lr, self.ul, self.ur]
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{EuclideanSpace, InnerSpace, Vector3};

    use super::*;

    #[test]
    fn every_face_winds_outward() {
        for side in BlockSide::all() {
            let face = Face::new(4, 10, -3, side);
            let a = (face.lr - face.ll).cast::<f32>().expect("small ints");
            let b = (face.ur - face.ll).cast::<f32>().expect("small ints");
            let n = side.normal();
            let winding = a.cross(b).normalize();
            assert_eq!(winding, Vector3::new(n[0], n[1], n[2]), "{:?}", side);
        }
    }

    #[test]
    fn every_face_lies_on_the_block_boundary() {
        let origin = Point3::new(4, 10, -3);
        for side in BlockSide::all() {
            let face = Face::new(origin.x, origin.y, origin.z, side);
            let offset = side.offset();
            for corner in face.corners() {
                let local = corner - origin.to_vec();
                for (axis, delta) in [(local.x, offset.x), (local.y, offset.y), (local.z, offset.z)]
                {
                    assert!((0..=1).contains(&axis));
                    if delta == 1 {
                        assert_eq!(axis, 1);
                    } else if delta == -1 {
                        assert_eq!(axis, 0);
                    }
                }
            }
        }
    }
}
