/*

    Probe rays read from the scene file and cast against
    the scene's shapes. Each probe reports the closest hit
    in a serializable form.
*/

use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

use crate::interval::{Interval, FloatConst};
use crate::ray::{Ray, HitRecord};
use crate::scene::Scene;
use crate::shapes::Shape;
use crate::prelude::*;

#[derive(Debug, Deserialize, Clone)]
pub struct Probe {
    #[serde(deserialize_with = "deser_usize")]
    pub _id: usize,
    #[serde(rename = "Origin", deserialize_with = "deser_vec3")]
    pub origin: Vector3,
    #[serde(rename = "Direction", deserialize_with = "deser_vec3")]
    pub direction: Vector3,
    #[serde(rename = "TMin", default, deserialize_with = "deser_opt_float")]
    pub t_min: Option<Float>,
    #[serde(rename = "TMax", default, deserialize_with = "deser_opt_float")]
    pub t_max: Option<Float>,
}

impl Probe {
    pub fn ray(&self) -> Ray {
        Ray::new(self.origin, self.direction)
    }

    /// [TMin, TMax] if given, [epsilon, inf) otherwise
    pub fn interval(&self, epsilon: Float) -> Interval {
        Interval::new(
            self.t_min.unwrap_or(epsilon),
            self.t_max.unwrap_or(FloatConst::INF),
        )
    }
}


#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProbeReport {
    pub id: usize,
    pub hit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<Float>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal: Option<Vector3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front_face: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,
}

impl ProbeReport {
    pub fn miss(id: usize) -> Self {
        Self {
            id,
            hit: false,
            t: None,
            point: None,
            normal: None,
            front_face: None,
            material_type: None,
        }
    }

    pub fn from_hit(id: usize, rec: &HitRecord) -> Self {
        Self {
            id,
            hit: true,
            t: Some(rec.t),
            point: Some(rec.point),
            normal: Some(rec.normal),
            front_face: Some(rec.front_face),
            material_type: rec.material_type().map(str::to_owned),
        }
    }
}

pub fn cast_probe(scene: &Scene, probe: &Probe) -> ProbeReport {
    let ray = probe.ray();
    let ray_t = probe.interval(scene.intersection_test_epsilon);
    match scene.world.hit(&ray, &ray_t) {
        Some(rec) => {
            if rec.normal == Vector3::ZERO {
                warn!("Probe {} hit at t = {} but no face could be assigned, normal is zero.", probe._id, rec.t);
            }
            ProbeReport::from_hit(probe._id, &rec)
        }
        None => ProbeReport::miss(probe._id),
    }
}

/// Cast every probe of the scene, results are in the same order as scene.probes
pub fn cast_probes(scene: &Scene) -> Vec<ProbeReport> {
    let start = Instant::now();

    // --- Rayon Multithreading ---
    let reports: Vec<ProbeReport> = scene.probes
        .par_iter()
        .map(|probe| cast_probe(scene, probe))
        .collect();
    // -----------------------------

    let num_hits = reports.iter().filter(|r| r.hit).count();
    info!("Cast {} probes ({} hits) in {:?}", reports.len(), num_hits, start.elapsed());
    reports
}
