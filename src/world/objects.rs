//! Object catalog
//!
//! A closed set of object types, each with a flat-shaded blueprint and an
//! explicit table mapping it to what remains once it is destroyed.

use serde::{Serialize, Deserialize};
use crate::math::{Fixed, Mat3, Vec3};
use crate::rasterizer::Color;
use super::terrain::altitude;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Ship = 0,
    Pyramid = 1,
    LeafyTree = 2,
    FirTree = 3,
    Gazebo = 4,
    Building = 5,
    Rocket = 6,
    SmokingRemains = 7,
    SmokingGazebo = 8,
    SmokingBuilding = 9,
}

pub const OBJECT_TYPE_COUNT: usize = 10;

/// Destroyed counterpart of each type, indexed by discriminant
const DESTROYED_TYPES: [Option<ObjectType>; OBJECT_TYPE_COUNT] = [
    None,                                  // Ship
    Some(ObjectType::SmokingRemains),      // Pyramid
    Some(ObjectType::SmokingRemains),      // LeafyTree
    Some(ObjectType::SmokingRemains),      // FirTree
    Some(ObjectType::SmokingGazebo),       // Gazebo
    Some(ObjectType::SmokingBuilding),     // Building
    None,                                  // Rocket
    Some(ObjectType::SmokingRemains),      // SmokingRemains
    Some(ObjectType::SmokingGazebo),       // SmokingGazebo
    Some(ObjectType::SmokingBuilding),     // SmokingBuilding
];

impl ObjectType {
    pub const ALL: [ObjectType; OBJECT_TYPE_COUNT] = [
        ObjectType::Ship,
        ObjectType::Pyramid,
        ObjectType::LeafyTree,
        ObjectType::FirTree,
        ObjectType::Gazebo,
        ObjectType::Building,
        ObjectType::Rocket,
        ObjectType::SmokingRemains,
        ObjectType::SmokingGazebo,
        ObjectType::SmokingBuilding,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// What this object turns into when destroyed (None: it just vanishes)
    pub fn destroyed(self) -> Option<ObjectType> {
        DESTROYED_TYPES[self.index()]
    }

    pub fn is_destroyed(self) -> bool {
        self.destroyed() == Some(self)
    }
}

/// One flat-shaded face of a blueprint
#[derive(Debug, Clone)]
pub struct BlueprintFace {
    pub indices: [usize; 3],
    /// Unit normal pointing out of the object
    pub normal: Vec3,
    pub color: Color,
}

/// Object geometry in object space (Y down, base at y = 0)
#[derive(Debug, Clone, Default)]
pub struct Blueprint {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<BlueprintFace>,
}

/// Convex piece of a blueprint; face normals are oriented away from its centre
struct Part<'a> {
    vertices: &'a [Vec3],
    faces: &'a [([usize; 3], Color)],
}

impl Blueprint {
    fn from_parts(parts: &[Part]) -> Self {
        let mut bp = Blueprint::default();
        for part in parts {
            let base = bp.vertices.len();
            bp.vertices.extend_from_slice(part.vertices);
            let centre = centroid(part.vertices);
            for &(indices, color) in part.faces {
                let [a, b, c] = indices.map(|i| part.vertices[i]);
                let mut normal = (b - a).cross(c - a).normalize();
                let face_centre = centroid(&[a, b, c]);
                if normal.dot(face_centre - centre) < Fixed::ZERO {
                    normal = -normal;
                }
                bp.faces.push(BlueprintFace {
                    indices: indices.map(|i| i + base),
                    normal,
                    color,
                });
            }
        }
        bp
    }
}

fn centroid(points: &[Vec3]) -> Vec3 {
    let n = Fixed::from_int(points.len() as i32);
    let sum = points.iter().fold(Vec3::ZERO, |acc, p| acc + *p);
    Vec3::new(sum.x / n, sum.y / n, sum.z / n)
}

/// Point in 1/256ths of a tile
const fn p(x: i32, y: i32, z: i32) -> Vec3 {
    Vec3::from_raw(x << 16, y << 16, z << 16)
}

const HULL: Color = Color::new(200, 200, 210);
const HULL_DARK: Color = Color::new(120, 120, 140);
const EXHAUST: Color = Color::new(230, 90, 40);
const STONE: Color = Color::new(210, 190, 110);
const STONE_DARK: Color = Color::new(170, 150, 80);
const BARK: Color = Color::new(110, 70, 30);
const LEAF: Color = Color::new(40, 170, 40);
const PINE: Color = Color::new(20, 110, 50);
const WALL: Color = Color::new(220, 220, 220);
const ROOF: Color = Color::new(170, 40, 40);
const ROCKET_BODY: Color = Color::new(240, 240, 240);
const ROCKET_FIN: Color = Color::new(200, 30, 30);
const SOOT: Color = Color::new(60, 50, 40);
const EMBER: Color = Color::new(100, 60, 30);

const BOX_FACES: [([usize; 3], Color); 10] = [
    ([4, 5, 6], ROOF),
    ([4, 6, 7], ROOF),
    ([0, 1, 5], WALL),
    ([0, 5, 4], WALL),
    ([1, 2, 6], WALL),
    ([1, 6, 5], WALL),
    ([2, 3, 7], WALL),
    ([2, 7, 6], WALL),
    ([3, 0, 4], WALL),
    ([3, 4, 7], WALL),
];

fn box_vertices(half: i32, height: i32) -> [Vec3; 8] {
    [
        p(-half, 0, -half),
        p(half, 0, -half),
        p(half, 0, half),
        p(-half, 0, half),
        p(-half, -height, -half),
        p(half, -height, -half),
        p(half, -height, half),
        p(-half, -height, half),
    ]
}

/// Thin three-sided post from the ground to `top`
fn post(x: i32, z: i32, top: i32) -> [Vec3; 4] {
    [p(x - 6, 0, z - 4), p(x + 6, 0, z - 4), p(x, 0, z + 6), p(x, top, z)]
}

const POST_FACES: [([usize; 3], Color); 3] = [
    ([0, 1, 3], BARK),
    ([1, 2, 3], BARK),
    ([2, 0, 3], BARK),
];

impl ObjectType {
    /// Build this type's geometry
    pub fn blueprint(self) -> Blueprint {
        match self {
            ObjectType::Ship => Blueprint::from_parts(&[Part {
                vertices: &[p(0, -16, 128), p(-96, 16, -80), p(96, 16, -80), p(0, -48, -80), p(0, 32, -48)],
                faces: &[
                    ([0, 3, 1], HULL),
                    ([0, 2, 3], HULL),
                    ([1, 3, 2], EXHAUST),
                    ([0, 1, 4], HULL_DARK),
                    ([0, 4, 2], HULL_DARK),
                    ([1, 2, 4], EXHAUST),
                ],
            }]),
            ObjectType::Pyramid => Blueprint::from_parts(&[Part {
                vertices: &[p(-64, 0, -64), p(64, 0, -64), p(64, 0, 64), p(-64, 0, 64), p(0, -128, 0)],
                faces: &[
                    ([0, 1, 4], STONE),
                    ([1, 2, 4], STONE_DARK),
                    ([2, 3, 4], STONE),
                    ([3, 0, 4], STONE_DARK),
                ],
            }]),
            ObjectType::LeafyTree => Blueprint::from_parts(&[
                Part { vertices: &post(0, 0, -80), faces: &POST_FACES },
                Part {
                    vertices: &[
                        p(0, -140, 0),
                        p(-40, -100, 0),
                        p(0, -100, -40),
                        p(40, -100, 0),
                        p(0, -100, 40),
                        p(0, -64, 0),
                    ],
                    faces: &[
                        ([0, 1, 2], LEAF),
                        ([0, 2, 3], LEAF),
                        ([0, 3, 4], LEAF),
                        ([0, 4, 1], LEAF),
                        ([5, 1, 2], LEAF),
                        ([5, 2, 3], LEAF),
                        ([5, 3, 4], LEAF),
                        ([5, 4, 1], LEAF),
                    ],
                },
            ]),
            ObjectType::FirTree => Blueprint::from_parts(&[
                Part { vertices: &post(0, 0, -40), faces: &POST_FACES },
                Part {
                    vertices: &[p(-40, -24, -30), p(40, -24, -30), p(0, -24, 44), p(0, -160, 0)],
                    faces: &[([0, 1, 3], PINE), ([1, 2, 3], PINE), ([2, 0, 3], PINE), ([0, 1, 2], PINE)],
                },
            ]),
            ObjectType::Gazebo => Blueprint::from_parts(&[
                Part { vertices: &post(-40, -40, -64), faces: &POST_FACES },
                Part { vertices: &post(40, -40, -64), faces: &POST_FACES },
                Part { vertices: &post(40, 40, -64), faces: &POST_FACES },
                Part { vertices: &post(-40, 40, -64), faces: &POST_FACES },
                Part {
                    vertices: &[p(-56, -64, -56), p(56, -64, -56), p(56, -64, 56), p(-56, -64, 56), p(0, -112, 0)],
                    faces: &[
                        ([0, 1, 4], ROOF),
                        ([1, 2, 4], ROOF),
                        ([2, 3, 4], ROOF),
                        ([3, 0, 4], ROOF),
                        ([0, 2, 1], WALL),
                        ([0, 3, 2], WALL),
                    ],
                },
            ]),
            ObjectType::Building => Blueprint::from_parts(&[Part {
                vertices: &box_vertices(56, 96),
                faces: &BOX_FACES,
            }]),
            ObjectType::Rocket => Blueprint::from_parts(&[
                Part {
                    vertices: &[p(-20, -16, -14), p(20, -16, -14), p(0, -16, 24), p(0, -180, 0)],
                    faces: &[
                        ([0, 1, 3], ROCKET_BODY),
                        ([1, 2, 3], ROCKET_BODY),
                        ([2, 0, 3], ROCKET_BODY),
                        ([0, 1, 2], EXHAUST),
                    ],
                },
                Part {
                    vertices: &[p(-36, 0, -24), p(36, 0, -24), p(0, 0, 40), p(0, -60, 0)],
                    faces: &[([0, 1, 3], ROCKET_FIN), ([1, 2, 3], ROCKET_FIN), ([2, 0, 3], ROCKET_FIN)],
                },
            ]),
            ObjectType::SmokingRemains => Blueprint::from_parts(&[Part {
                vertices: &[p(-40, 0, -40), p(40, 0, -40), p(40, 0, 40), p(-40, 0, 40), p(8, -20, -6)],
                faces: &[
                    ([0, 1, 4], SOOT),
                    ([1, 2, 4], EMBER),
                    ([2, 3, 4], SOOT),
                    ([3, 0, 4], EMBER),
                ],
            }]),
            ObjectType::SmokingGazebo => Blueprint::from_parts(&[
                Part { vertices: &post(-40, -40, -30), faces: &POST_FACES },
                Part { vertices: &post(40, 40, -20), faces: &POST_FACES },
                Part {
                    vertices: &[p(-56, 0, -56), p(56, 0, -56), p(56, 0, 56), p(-56, 0, 56), p(10, -24, 4)],
                    faces: &[
                        ([0, 1, 4], SOOT),
                        ([1, 2, 4], EMBER),
                        ([2, 3, 4], SOOT),
                        ([3, 0, 4], EMBER),
                    ],
                },
            ]),
            ObjectType::SmokingBuilding => {
                let mut bp = Blueprint::from_parts(&[Part {
                    vertices: &box_vertices(56, 32),
                    faces: &BOX_FACES,
                }]);
                for face in &mut bp.faces {
                    face.color = if face.color == ROOF { EMBER } else { SOOT };
                }
                bp
            }
        }
    }
}

/// Every blueprint, built once and shared read-only by the renderer
pub struct ObjectCatalog {
    blueprints: Vec<Blueprint>,
}

impl ObjectCatalog {
    pub fn new() -> Self {
        Self {
            blueprints: ObjectType::ALL.iter().map(|t| t.blueprint()).collect(),
        }
    }

    pub fn get(&self, kind: ObjectType) -> &Blueprint {
        &self.blueprints[kind.index()]
    }
}

impl Default for ObjectCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// A placed object in the world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneObject {
    pub kind: ObjectType,
    pub position: Vec3,
    pub rotation: Mat3,
}

impl SceneObject {
    pub fn new(kind: ObjectType, position: Vec3) -> Self {
        Self {
            kind,
            position,
            rotation: Mat3::IDENTITY,
        }
    }

    /// Place an object with its base on the landscape surface
    pub fn on_ground(kind: ObjectType, x: Fixed, z: Fixed) -> Self {
        Self::new(kind, Vec3::new(x, altitude(x, z), z))
    }

    pub fn with_rotation(mut self, rotation: Mat3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Swap in the destroyed counterpart. Returns false if the object
    /// has none and should be removed instead.
    pub fn destroy(&mut self) -> bool {
        match self.kind.destroyed() {
            Some(remains) => {
                self.kind = remains;
                true
            }
            None => false,
        }
    }
}

/// A small scene around the launchpad, positions in half tiles
pub fn demo_scene() -> Vec<SceneObject> {
    const PLACEMENTS: [(ObjectType, i32, i32); 12] = [
        (ObjectType::Rocket, 3, 6),
        (ObjectType::Pyramid, 10, 9),
        (ObjectType::Building, 13, 4),
        (ObjectType::Gazebo, 5, 12),
        (ObjectType::SmokingBuilding, 18, 8),
        (ObjectType::LeafyTree, 20, 3),
        (ObjectType::LeafyTree, 21, 11),
        (ObjectType::FirTree, -3, 7),
        (ObjectType::FirTree, -5, 14),
        (ObjectType::FirTree, 17, 16),
        (ObjectType::SmokingRemains, 23, 6),
        (ObjectType::SmokingGazebo, -2, 18),
    ];

    let mut scene: Vec<SceneObject> = PLACEMENTS
        .iter()
        .map(|&(kind, x, z)| SceneObject::on_ground(kind, Fixed::from_ratio(x, 2), Fixed::from_ratio(z, 2)))
        .collect();

    // Ship hovering over the pad
    let ship = Vec3::new(Fixed::from_int(4), Fixed::from_ratio(5, 2), Fixed::from_int(2));
    scene.push(SceneObject::new(ObjectType::Ship, ship));
    scene
}
