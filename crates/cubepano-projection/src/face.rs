//! The six cube faces and the static tables describing their local frames.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// The six faces of the source cubemap.
///
/// The discriminant order is also the face-selection tie-break order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CubeFace {
    /// Camera looking along +Y.
    Front = 0,
    /// Camera looking along −Y.
    Back = 1,
    /// Camera looking along +X.
    Right = 2,
    /// Camera looking along −X.
    Left = 3,
    /// Camera looking along +Z.
    Top = 4,
    /// Camera looking along −Z.
    Bottom = 5,
}

impl CubeFace {
    /// All six faces in tie-break order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Front,
        CubeFace::Back,
        CubeFace::Right,
        CubeFace::Left,
        CubeFace::Top,
        CubeFace::Bottom,
    ];

    /// Position of this face in [`CubeFace::ALL`].
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase face name as used on the command line and in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CubeFace::Front => "front",
            CubeFace::Back => "back",
            CubeFace::Right => "right",
            CubeFace::Left => "left",
            CubeFace::Top => "top",
            CubeFace::Bottom => "bottom",
        }
    }

    /// Outward-pointing unit normal for this face.
    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            CubeFace::Front => DVec3::Y,
            CubeFace::Back => DVec3::NEG_Y,
            CubeFace::Right => DVec3::X,
            CubeFace::Left => DVec3::NEG_X,
            CubeFace::Top => DVec3::Z,
            CubeFace::Bottom => DVec3::NEG_Z,
        }
    }
}

impl fmt::Display for CubeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which axis, flip and pole convention the projection uses.
///
/// Chosen once per run; the tables for both are static.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrientationConvention {
    /// Axes as tabulated, no face mirrored. The top output row looks along −Z.
    #[default]
    Canonical,
    /// Top and bottom faces mirrored horizontally, the top output row looking
    /// along +Z and panorama columns running in reverse longitude order.
    Upright,
}

impl OrientationConvention {
    /// Both conventions.
    pub const ALL: [OrientationConvention; 2] = [
        OrientationConvention::Canonical,
        OrientationConvention::Upright,
    ];

    /// Kebab-case name accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            OrientationConvention::Canonical => "canonical",
            OrientationConvention::Upright => "upright",
        }
    }

    /// The face table for this convention.
    #[inline]
    #[must_use]
    pub fn table(self) -> &'static FaceTable {
        match self {
            OrientationConvention::Canonical => &CANONICAL,
            OrientationConvention::Upright => &UPRIGHT,
        }
    }
}

impl fmt::Display for OrientationConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OrientationConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown orientation convention '{s}'"))
    }
}

/// Local frame of one face: where `u` and `v` grow on its image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceDescriptor {
    /// The face this frame belongs to.
    pub face: CubeFace,
    /// Outward unit normal.
    pub normal: DVec3,
    /// Direction of increasing `u` (image column).
    pub u_axis: DVec3,
    /// Direction of increasing `v` (image row).
    pub v_axis: DVec3,
    /// Mirror `u` after normalization.
    pub flip_u: bool,
}

/// The six face descriptors, indexed by [`CubeFace::index`].
#[derive(Debug, PartialEq)]
pub struct FaceTable {
    faces: [FaceDescriptor; 6],
}

impl FaceTable {
    /// Descriptor for `face`.
    #[inline]
    #[must_use]
    pub fn descriptor(&self, face: CubeFace) -> &FaceDescriptor {
        &self.faces[face.index()]
    }

    /// All descriptors in tie-break order.
    #[inline]
    #[must_use]
    pub fn descriptors(&self) -> &[FaceDescriptor; 6] {
        &self.faces
    }
}

const fn descriptor(
    face: CubeFace,
    normal: DVec3,
    u_axis: DVec3,
    v_axis: DVec3,
    flip_u: bool,
) -> FaceDescriptor {
    FaceDescriptor {
        face,
        normal,
        u_axis,
        v_axis,
        flip_u,
    }
}

const fn table(flip_poles: bool) -> FaceTable {
    FaceTable {
        faces: [
            descriptor(CubeFace::Front, DVec3::Y, DVec3::X, DVec3::NEG_Z, false),
            descriptor(CubeFace::Back, DVec3::NEG_Y, DVec3::NEG_X, DVec3::NEG_Z, false),
            descriptor(CubeFace::Right, DVec3::X, DVec3::NEG_Y, DVec3::NEG_Z, false),
            descriptor(CubeFace::Left, DVec3::NEG_X, DVec3::Y, DVec3::NEG_Z, false),
            descriptor(CubeFace::Top, DVec3::Z, DVec3::X, DVec3::NEG_Y, flip_poles),
            descriptor(CubeFace::Bottom, DVec3::NEG_Z, DVec3::X, DVec3::Y, flip_poles),
        ],
    }
}

static CANONICAL: FaceTable = table(false);
static UPRIGHT: FaceTable = table(true);
