/*

    Declare data structs needed to parse JSON.

    - SingleOrVec
    - BoxData, SphereData: raw shape descriptions that refer
      to materials by id. They are resolved into shapes holding
      shared material handles by Scene::new_from.
*/

use serde::Deserialize;

use crate::json_parser::{deser_float, deser_usize, deser_vec3};
use crate::numeric::{Float, Vector3, NUM_AXES};


// To handle JSON file having a single <object>
// or an array of <object>s
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum SingleOrVec<T> {
    Empty,
    Single(T),
    Multiple(Vec<T>),
}

impl<T: Clone> SingleOrVec<T>  {
    pub fn all(&self) -> Vec<T> {
        match &self {
            SingleOrVec::Empty => vec![],
            SingleOrVec::Single(t) => vec![t.clone()],
            SingleOrVec::Multiple(vec) => vec.clone(),
        }
    }
}

impl<T> SingleOrVec<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            SingleOrVec::Empty => <&[T]>::default().iter(),
            SingleOrVec::Single(t) => std::slice::from_ref(t).iter(),
            SingleOrVec::Multiple(vec) => vec.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.iter().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for SingleOrVec<T> {
    fn default() -> Self {
        SingleOrVec::Empty
    }
}


#[derive(Debug, Deserialize, Clone)]
pub struct BoxData {
    #[serde(deserialize_with = "deser_usize")]
    pub _id: usize,
    #[serde(rename = "Min", deserialize_with = "deser_vec3")]
    pub min: Vector3,
    #[serde(rename = "Max", deserialize_with = "deser_vec3")]
    pub max: Vector3,
    #[serde(rename = "Material", deserialize_with = "deser_usize")]
    pub material_idx: usize,
}

impl BoxData {
    /// Any axis with min > max (flat axes with min == max are fine)
    pub fn is_inverted(&self) -> bool {
        (0..NUM_AXES).any(|axis| self.min[axis] > self.max[axis])
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SphereData {
    #[serde(deserialize_with = "deser_usize")]
    pub _id: usize,
    #[serde(rename = "Center", deserialize_with = "deser_vec3")]
    pub center: Vector3,
    #[serde(rename = "Radius", deserialize_with = "deser_float")]
    pub radius: Float,
    #[serde(rename = "Material", deserialize_with = "deser_usize")]
    pub material_idx: usize,
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(rename = "Box", default)]
        boxes: SingleOrVec<BoxData>,
    }

    #[test]
    fn test_single_or_vec() {
        let single: Holder = serde_json::from_value(json!({
            "Box": {"_id": "1", "Min": "0 0 0", "Max": "1 1 1", "Material": "1"}
        })).unwrap();
        assert_eq!(single.boxes.len(), 1);

        let many: Holder = serde_json::from_value(json!({
            "Box": [
                {"_id": "1", "Min": "0 0 0", "Max": "1 1 1", "Material": "1"},
                {"_id": 2, "Min": [0, 0, 0], "Max": [2, 2, 2], "Material": 1},
            ]
        })).unwrap();
        assert_eq!(many.boxes.len(), 2);
        assert_eq!(many.boxes.all()[1].max, Vector3::splat(2.0));

        let none: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(none.boxes.is_empty());
    }

    #[test]
    fn test_inverted_box_detection() {
        let data: BoxData = serde_json::from_value(json!(
            {"_id": "1", "Min": "0 1 0", "Max": "1 0 1", "Material": "1"}
        )).unwrap();
        assert!(data.is_inverted());

        let flat: BoxData = serde_json::from_value(json!(
            {"_id": "1", "Min": "0 0 0", "Max": "1 0 1", "Material": "1"}
        )).unwrap();
        assert!(!flat.is_inverted());
    }
}
