/*

    Declare Scene consisting of materials, shapes and the
    probe rays to be cast against them.

    Loading happens in two steps: serde fills the *JSON
    structs that still refer to materials by id, then
    Scene::new_from resolves those ids into shared handles
    and builds the ShapeList.
*/
use std::collections::HashSet;
use std::error::Error;

use serde_json::Value;

use crate::interval::Interval;
use crate::json_structs::{BoxData, SingleOrVec, SphereData};
use crate::material::{parse_material, HeapAllocMaterial};
use crate::probe::Probe;
use crate::ray::{Ray, HitRecord};
use crate::shapes::{AxisAlignedBox, HeapAllocatedShape, Shape, Sphere};
use crate::prelude::*;


// =======================================================================================================
// ShapeList (impl Shape)
// =======================================================================================================

/// Heterogeneous collection of shapes, itself a Shape that reports the closest hit
#[derive(Debug, Default, Clone)]
pub struct ShapeList {
    pub shapes: Vec<HeapAllocatedShape>,
}

impl ShapeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, shape: HeapAllocatedShape) {
        self.shapes.push(shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Shape for ShapeList {

    fn intersect(&self, ray: &Ray, ray_t: &Interval, rec: &mut HitRecord) -> bool {
        let mut temp_rec = HitRecord::default();
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for shape in self.shapes.iter() {
            // Later shapes only count if they are closer than the best so far
            if shape.intersect(ray, &ray_t.with_max(closest_so_far), &mut temp_rec) {
                hit_anything = true;
                closest_so_far = temp_rec.t;
                *rec = temp_rec.clone();
            }
        }

        hit_anything
    }
}


// =======================================================================================================
// JSON side
// =======================================================================================================

#[derive(Debug, Deserialize)]
pub struct RootScene {
    #[serde(rename = "Scene")]
    pub scene: SceneJSON,
}

#[derive(Debug, Deserialize, SmartDefault)]
#[serde(rename_all = "PascalCase")]
#[serde(default)]
pub struct SceneJSON {
    #[default = 1e-3]
    #[serde(deserialize_with = "deser_float")]
    pub intersection_test_epsilon: Float,

    pub materials: SceneMaterials,
    pub objects: SceneObjects,
    pub probes: SceneProbes,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SceneMaterials {
    #[serde(rename = "Material")]
    raw_materials: SingleOrVec<Value>, // Parse the json value later separately
}

impl SceneMaterials {
    pub fn finalize(&self) -> Vec<HeapAllocMaterial> {
        let materials: Vec<HeapAllocMaterial> = self.raw_materials
            .all()
            .into_iter()
            .flat_map(parse_material)
            .collect();

        // Shapes resolve ids to the first material carrying them
        let mut seen = HashSet::new();
        for m in materials.iter() {
            if !seen.insert(m.id()) {
                warn!("Material id {} is declared more than once, shapes will use the first one.", m.id());
            }
        }
        materials
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)] // If any of the fields below is missing in the JSON, use default (empty)
pub struct SceneObjects {
    #[serde(rename = "Box")]
    pub boxes: SingleOrVec<BoxData>,
    #[serde(rename = "Sphere")]
    pub spheres: SingleOrVec<SphereData>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SceneProbes {
    #[serde(rename = "Probe")]
    pub probes: SingleOrVec<Probe>,
}


// =======================================================================================================
// Scene
// =======================================================================================================

#[derive(Debug)]
pub struct Scene {
    pub intersection_test_epsilon: Float,
    pub materials: Vec<HeapAllocMaterial>,
    pub world: ShapeList,
    pub probes: Vec<Probe>,
}

impl Scene {
    pub fn new_from(scene_json: SceneJSON) -> Result<Self, Box<dyn Error>> {

        let materials = scene_json.materials.finalize();
        debug!("Parsed {} materials.", materials.len());

        let find_material = |shape_kind: &str, shape_id: usize, material_id: usize| -> Result<HeapAllocMaterial, Box<dyn Error>> {
            materials
                .iter()
                .find(|m| m.id() == material_id)
                .cloned()
                .ok_or_else(|| format!("{shape_kind} {shape_id} refers to missing material {material_id}").into())
        };

        let mut world = ShapeList::new();
        for data in scene_json.objects.boxes.iter() {
            if data.is_inverted() {
                warn!("Box {} has min > max on some axis ({:?} / {:?}), it can never be hit.", data._id, data.min, data.max);
            }
            let material = find_material("Box", data._id, data.material_idx)?;
            world.add(Arc::new(AxisAlignedBox::new(data.min, data.max, material)));
        }
        for data in scene_json.objects.spheres.iter() {
            if !(data.radius > 0.0) {
                return Err(format!("Sphere {} has non-positive radius {}", data._id, data.radius).into());
            }
            let material = find_material("Sphere", data._id, data.material_idx)?;
            world.add(Arc::new(Sphere::new(data.center, data.radius, material)));
        }
        info!(">> There are {} shapes in the scene.", world.len());

        Ok(Self {
            intersection_test_epsilon: scene_json.intersection_test_epsilon,
            materials,
            world,
            probes: scene_json.probes.probes.all(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_parser::parse_scene_str;
    use crate::material::Lambertian;

    const SCENE: &str = r#"
    {
        "Scene": {
            "IntersectionTestEpsilon": "0.001",
            "Materials": {
                "Material": [
                    {"_id": "1", "_type": "lambertian", "Albedo": "0.5 0.5 0.5"},
                    {"_id": "2", "_type": "metal", "Albedo": "0.8 0.8 0.8", "Fuzz": "0.1"}
                ]
            },
            "Objects": {
                "Box": [
                    {"_id": "1", "Min": "-1 -1 -1", "Max": "1 1 1", "Material": "1"},
                    {"_id": "2", "Min": [4, -1, -1], "Max": [5, 1, 1], "Material": 2}
                ],
                "Sphere": {"_id": "1", "Center": "0 3 0", "Radius": "0.5", "Material": "2"}
            },
            "Probes": {
                "Probe": {"_id": "1", "Origin": "-5 0 0", "Direction": "1 0 0"}
            }
        }
    }"#;

    fn solid(lo: Float, hi: Float) -> HeapAllocatedShape {
        Arc::new(AxisAlignedBox::new(Vector3::splat(lo), Vector3::splat(hi), Arc::new(Lambertian::default())))
    }

    #[test]
    fn test_closest_hit_regardless_of_order() {
        let near = solid(-1.0, 1.0);
        let far = solid(3.0, 4.0);
        let ray = Ray::new(Vector3::splat(-5.0), Vector3::ONE.normalize());

        for order in [[Arc::clone(&near), Arc::clone(&far)], [Arc::clone(&far), Arc::clone(&near)]] {
            let world = ShapeList { shapes: order.to_vec() };
            let rec = world.hit(&ray, &Interval::positive(1e-3)).unwrap();
            let expected = near.hit(&ray, &Interval::positive(1e-3)).unwrap();
            assert_eq!(rec.t, expected.t);
            assert_eq!(rec.normal, Vector3::NEG_X);
        }
    }

    #[test]
    fn test_empty_list_never_hits() {
        let world = ShapeList::new();
        assert!(world.is_empty());
        let ray = Ray::new(Vector3::ZERO, Vector3::X);
        assert!(world.hit(&ray, &Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_load_scene() {
        let root = parse_scene_str(SCENE).unwrap();
        let scene = Scene::new_from(root.scene).unwrap();

        assert_eq!(scene.intersection_test_epsilon, 1e-3);
        assert_eq!(scene.materials.len(), 2);
        assert_eq!(scene.world.len(), 3);
        assert_eq!(scene.probes.len(), 1);

        let ray = Ray::new(Vector3::new(10.0, 0.0, 0.0), Vector3::NEG_X);
        let rec = scene.world.hit(&ray, &Interval::positive(scene.intersection_test_epsilon)).unwrap();
        assert_eq!(rec.t, 5.0);
        assert_eq!(rec.normal, Vector3::X);
        assert_eq!(rec.material_type(), Some("metal"));

        // Sphere and second box share material 2
        let up = Ray::new(Vector3::new(0.0, 10.0, 0.0), Vector3::NEG_Y);
        let sphere_rec = scene.world.hit(&up, &Interval::NONNEGATIVE).unwrap();
        assert_eq!(sphere_rec.t, 6.5);
        assert!(Arc::ptr_eq(sphere_rec.material.as_ref().unwrap(), rec.material.as_ref().unwrap()));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let root = parse_scene_str(r#"{"Scene": {}}"#).unwrap();
        let scene = Scene::new_from(root.scene).unwrap();
        assert_eq!(scene.intersection_test_epsilon, 1e-3);
        assert!(scene.world.is_empty());
        assert!(scene.materials.is_empty());
        assert!(scene.probes.is_empty());
    }

    #[test]
    fn test_non_positive_radius_is_an_error() {
        for radius in ["0", "-1.5", "nan"] {
            let json = format!(
                r#"{{"Scene": {{
                    "Materials": {{"Material": {{"_id": "1"}}}},
                    "Objects": {{"Sphere": {{"_id": "4", "Center": "0 0 0", "Radius": "{radius}", "Material": "1"}}}}
                }}}}"#
            );
            let root = parse_scene_str(&json).unwrap();
            let err = Scene::new_from(root.scene).unwrap_err();
            assert!(err.to_string().contains("Sphere 4 has non-positive radius"), "radius {radius}: {err}");
        }
    }

    #[test]
    fn test_duplicate_material_id_resolves_to_first() {
        let json = r#"{"Scene": {
            "Materials": {"Material": [
                {"_id": "1", "_type": "lambertian"},
                {"_id": "1", "_type": "dielectric"}
            ]},
            "Objects": {"Box": {"_id": "1", "Min": "-1 -1 -1", "Max": "1 1 1", "Material": "1"}}
        }}"#;
        let root = parse_scene_str(json).unwrap();
        let scene = Scene::new_from(root.scene).unwrap();

        // Both are kept, the box points at the first
        assert_eq!(scene.materials.len(), 2);
        let ray = Ray::new(Vector3::new(-5.0, 0.0, 0.0), Vector3::X);
        let rec = scene.world.hit(&ray, &Interval::NONNEGATIVE).unwrap();
        assert_eq!(rec.material_type(), Some("lambertian"));
        assert!(Arc::ptr_eq(rec.material.as_ref().unwrap(), &scene.materials[0]));
    }

    #[test]
    fn test_missing_material_is_an_error() {
        let json = r#"{"Scene": {"Objects": {"Box": {"_id": "3", "Min": "0 0 0", "Max": "1 1 1", "Material": "9"}}}}"#;
        let root = parse_scene_str(json).unwrap();
        let err = Scene::new_from(root.scene).unwrap_err();
        assert!(err.to_string().contains("missing material 9"));
    }
}
