/*

    Declare Material trait, and store data related to
    different types of materials. Currently supporting:
        - Lambertian
        - Metal
        - Dielectric

    Materials are opaque to intersection code: shapes only
    hold a shared handle and copy it into the HitRecord so
    that a later shading stage can use it.
*/
use std::fmt::Debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::prelude::*;


////////////////////////////////////////////////////////////////////////////////////////////////////////////////
///
/// MATERIAL TRAIT
///
////////////////////////////////////////////////////////////////////////////////////////////////////////////////
pub trait Material : Debug + Send + Sync {

    fn new_from(value: &Value) -> Self
    where
        Self: Sized + DeserializeOwned + Default,
    {
        match serde_json::from_value::<Self>(value.clone()) {
            Ok(m) => m,
            Err(e) => {
                error!("Failed to parse Material: {e}. JSON: {value}\nSetting material to default...");
                Self::default()
            }
        }
    }

    fn id(&self) -> usize;
    fn get_type(&self) -> &str;
    fn albedo(&self) -> Vector3;
}

// Shared between shapes, Arc because probes are cast from rayon workers
pub type HeapAllocMaterial = Arc<dyn Material>;


////////////////////////////////////////////////////////////////////////////////////////////////////////////////
///
/// LAMBERTIAN
///
////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize, Clone, SmartDefault)]
#[serde(default)]
pub struct Lambertian {
    #[serde(deserialize_with = "deser_usize")]
    pub _id: usize,

    #[default(Vector3::splat(0.5))]
    #[serde(rename = "Albedo", deserialize_with = "deser_vec3")]
    pub albedo: Vector3,
}

impl Lambertian {
    pub fn new(albedo: Vector3) -> Self {
        Self { _id: 0, albedo }
    }
}

impl Material for Lambertian {
    fn id(&self) -> usize {
        self._id
    }

    fn get_type(&self) -> &str {
        "lambertian"
    }

    fn albedo(&self) -> Vector3 {
        self.albedo
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////
///
/// METAL
///
////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize, Clone, SmartDefault)]
#[serde(default)]
pub struct Metal {
    #[serde(deserialize_with = "deser_usize")]
    pub _id: usize,

    #[default(Vector3::splat(0.8))]
    #[serde(rename = "Albedo", deserialize_with = "deser_vec3")]
    pub albedo: Vector3,

    #[serde(rename = "Fuzz", deserialize_with = "deser_float")]
    pub fuzz: Float, // clamped to [0, 1] by setup()
}

impl Metal {
    pub fn new(albedo: Vector3, fuzz: Float) -> Self {
        let mut metal = Self { _id: 0, albedo, fuzz };
        metal.setup();
        metal
    }

    /// Bring deserialized values into range
    pub fn setup(&mut self) {
        self.fuzz = self.fuzz.clamp(0.0, 1.0);
    }

    pub fn fuzz(&self) -> Float {
        self.fuzz
    }
}

impl Material for Metal {
    fn id(&self) -> usize {
        self._id
    }

    fn get_type(&self) -> &str {
        "metal"
    }

    fn albedo(&self) -> Vector3 {
        self.albedo
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////
///
/// DIELECTRIC
///
////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize, Clone, SmartDefault)]
#[serde(default)]
pub struct Dielectric {
    #[serde(deserialize_with = "deser_usize")]
    pub _id: usize,

    #[default = 1.5]
    #[serde(rename = "RefractionIndex", deserialize_with = "deser_float")]
    pub refraction_index: Float,
}

impl Material for Dielectric {
    fn id(&self) -> usize {
        self._id
    }

    fn get_type(&self) -> &str {
        "dielectric"
    }

    fn albedo(&self) -> Vector3 {
        Vector3::ONE // clear glass does not absorb
    }
}


fn parse_metal(value: &Value) -> Metal {
    let mut metal = Metal::new_from(value);
    metal.setup();
    metal
}

fn parse_single_material(value: Value) -> HeapAllocMaterial {

    debug!("Parsing material JSON: {:#?}", value);

    // Check _type field
    let mat_type = value.get("_type").and_then(|v| v.as_str()).unwrap_or("lambertian");

    match mat_type {
        "lambertian" | "diffuse" => Arc::new(Lambertian::new_from(&value)),
        "metal" | "mirror" => Arc::new(parse_metal(&value)),
        "dielectric" => Arc::new(Dielectric::new_from(&value)),
        // Add more materials here

        other => {
            error!("Unknown material type '{other}', defaulting to Lambertian");
            Arc::new(Lambertian::new_from(&value))
        }
    }
}

/// Accepts a single material object or an array of them
pub fn parse_material(value: Value) -> Vec<HeapAllocMaterial> {
    match value {
        Value::Array(arr) => arr.into_iter().map(parse_single_material).collect(),
        Value::Object(_) => vec![parse_single_material(value)],
        _ => {
            error!("Invalid material JSON, expected object or array: {value:?}");
            vec![]
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_by_type() {
        let mats = parse_material(json!([
            {"_id": "1", "_type": "lambertian", "Albedo": "0.1 0.2 0.3"},
            {"_id": 2, "_type": "metal", "Albedo": [0.9, 0.9, 0.9], "Fuzz": "3.0"},
            {"_id": "3", "_type": "dielectric", "RefractionIndex": 1.33},
        ]));

        assert_eq!(mats.len(), 3);
        assert_eq!(mats[0].get_type(), "lambertian");
        assert_eq!(mats[0].albedo(), Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(mats[1].get_type(), "metal");
        assert_eq!(mats[1].id(), 2);
        assert_eq!(mats[2].get_type(), "dielectric");
        assert_eq!(mats[2].id(), 3);
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let too_rough = parse_metal(&json!({"_id": "1", "_type": "metal", "Fuzz": "3.0"}));
        assert_eq!(too_rough.fuzz(), 1.0);

        let negative = parse_metal(&json!({"_id": "2", "_type": "metal", "Fuzz": -0.5}));
        assert_eq!(negative.fuzz(), 0.0);

        let in_range = parse_metal(&json!({"_id": "3", "_type": "metal", "Fuzz": "0.25"}));
        assert_eq!(in_range.fuzz(), 0.25);

        assert_eq!(Metal::new(Vector3::ONE, 7.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Vector3::ONE, -7.0).fuzz(), 0.0);
    }

    #[test]
    fn test_unknown_type_falls_back_to_lambertian() {
        let mats = parse_material(json!({"_id": "7", "_type": "velvet"}));
        assert_eq!(mats.len(), 1);
        assert_eq!(mats[0].get_type(), "lambertian");
        assert_eq!(mats[0].id(), 7);
        assert_eq!(mats[0].albedo(), Vector3::splat(0.5));
    }

    #[test]
    fn test_invalid_json_yields_nothing() {
        assert!(parse_material(json!("lambertian")).is_empty());
    }
}
