/*

    Provide utilities to parse scene JSON files.

    The parser is somewhat robust, let <a> be integer or float type,
    in JSON file <a> can be given both in quotes (string) or as is.

    e.g. In JSON file both
    "IntersectionTestEpsilon": "0.001" and "IntersectionTestEpsilon": 0.001
    works as intersection_test_epsilon: Float in source code

    Vector3 fields are accepted as "<a> <a> <a>" strings or
    as [<a>, <a>, <a>] arrays.
*/

use std::error::Error;
use std::fmt::{self};
use std::fs::File;
use std::io::BufReader;

use serde::{Deserialize, Deserializer};
use serde::de::{self, Visitor, SeqAccess};

use crate::prelude::*;
use crate::scene::{RootScene};

pub fn parse_scene_json(path: &str) -> Result<RootScene, Box<dyn Error>> {

    let span = tracing::span!(tracing::Level::INFO, "load_scene");
    let _enter = span.enter();

    // Open file
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    debug!("Reading file from {}", path);

    // Parse JSON into Scene
    let root: RootScene = serde_json::from_reader(reader)?;
    Ok(root)
}

/// Same as parse_scene_json but from an in-memory document
pub fn parse_scene_str(json: &str) -> Result<RootScene, Box<dyn Error>> {
    let root: RootScene = serde_json::from_str(json)?;
    Ok(root)
}


pub(crate) fn deser_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    /*
        Deserialize usize type given as either string or number in JSON
    */
    let s: serde_json::Value = Deserialize::deserialize(deserializer)?;
    match s {
        serde_json::Value::Number(n) => n.as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| de::Error::custom("Invalid unsigned integer")),
        serde_json::Value::String(s) => s.trim().parse::<usize>()
            .map_err(|_| de::Error::custom("Failed to parse integer from string")),
        t => Err(de::Error::custom(format!("Expected int or string, found {:#?}", t))),
    }
}

// Handles floats as string or number
pub(crate) fn deser_float<'de, D>(deserializer: D) -> Result<Float, D::Error>
where
    D: Deserializer<'de>,
{
    let s: serde_json::Value = Deserialize::deserialize(deserializer)?;
    value_to_float(&s).map_err(de::Error::custom)
}

pub(crate) fn deser_opt_float<'de, D>(deserializer: D) -> Result<Option<Float>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;

    match opt {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => value_to_float(&v).map(Some).map_err(de::Error::custom),
    }
}

fn value_to_float(value: &serde_json::Value) -> Result<Float, String> {
    match value {
        serde_json::Value::Number(n) => n.as_f64()
            .map(|v| v as Float)
            .ok_or_else(|| "Invalid float".to_string()),
        serde_json::Value::String(s) => parse_float_str(s),
        t => Err(format!("Expected float or string, found {t}")),
    }
}

// Accepts "inf", "-Infinity", "nan" as well, case insensitive
fn parse_float_str(s: &str) -> Result<Float, String> {
    let s = s.trim();
    s.parse::<Float>().map_err(|e| format!("Failed to parse float from '{s}': {e}"))
}


pub(crate) fn deser_vec3<'de, D>(deserializer: D) -> Result<Vector3, D::Error>
where
    D: Deserializer<'de>,
{
    struct Vec3Visitor;

    impl<'de> Visitor<'de> for Vec3Visitor {
        type Value = Vector3;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a Vec3 as a string 'x y z' or an array [x, y, z]")
        }

        // Given "X Y Z"
        fn visit_str<E>(self, value: &str) -> Result<Vector3, E>
        where
            E: de::Error,
        {
            parse_vec3_str(value).map_err(de::Error::custom)
        }

        // Given [X, Y, Z], each element a number or a numeric string
        fn visit_seq<A>(self, mut seq: A) -> Result<Vector3, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut xyz = [0.0 as Float; NUM_AXES];
            for component in xyz.iter_mut() {
                let value: serde_json::Value = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::custom("Expected 3 elements in Vec3 array"))?;
                *component = value_to_float(&value).map_err(de::Error::custom)?;
            }
            if seq.next_element::<serde_json::Value>()?.is_some() {
                return Err(de::Error::custom("Expected only 3 elements in Vec3 array"));
            }
            Ok(Vector3::from_array(xyz))
        }
    }

    deserializer.deserialize_any(Vec3Visitor)
}

/// Helper function: parse a string like "25 25 25" into Vector3
pub fn parse_vec3_str(s: &str) -> Result<Vector3, String> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != NUM_AXES {
        return Err(format!("Expected 3 values, got {}", parts.len()));
    }
    let x = parse_float_str(parts[0])?;
    let y = parse_float_str(parts[1])?;
    let z = parse_float_str(parts[2])?;
    Ok(Vector3::new(x, y, z))
}
