// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Analysis sensor grid generation.

use serde::Serialize;
use sim3dm_core::{Geometry, Scene};
use sim3dm_geometry::analysis::is_planar_mesh;
use sim3dm_geometry::{
    mesh_face_samples, polygon_grid_samples, GeometryConverter, SamplePoint,
};
use tracing::warn;

use crate::config::GridSettings;
use crate::error::{Error, Result};

/// A sensor grid: ordered sample points with their generation parameters.
#[derive(Debug, Clone, Serialize)]
pub struct SensorGrid {
    pub identifier: String,
    pub display_name: String,
    pub sensors: Vec<SamplePoint>,
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub offset: f64,
}

/// Generate a sensor grid for one scene object.
///
/// Mesh payloads are sampled at their own face density, so users control
/// resolution by hand-meshing the source object. Planar surface payloads
/// are reconstructed and sampled on a regular grid. Closed volumes and
/// non-planar surfaces cannot be uniformly gridded and are skipped with a
/// warning (`Ok(None)`); a payload that yields no samples at all is an
/// error naming the object so the source can be corrected.
pub fn generate(
    scene: &Scene,
    object_index: usize,
    converter: &GeometryConverter,
    settings: &GridSettings,
    identifier: String,
    display_name: String,
) -> Result<Option<SensorGrid>> {
    let obj = &scene.objects[object_index];
    let label = obj.label(object_index);
    let tolerance = converter.tolerance();

    let sensors = match &obj.geometry {
        Geometry::Mesh(mesh) => mesh_face_samples(mesh),

        Geometry::SolidBody(_) => {
            warn!(object = %label, "closed volumes are not supported for grids; skipped");
            return Ok(None);
        }
        Geometry::Extrusion(extrusion) if extrusion.capped => {
            warn!(object = %label, "closed volumes are not supported for grids; skipped");
            return Ok(None);
        }

        Geometry::SurfacePatch(face) => {
            let mesh = face
                .render_mesh
                .as_ref()
                .ok_or(sim3dm_geometry::Error::MeshExtraction)?;
            if !is_planar_mesh(mesh, tolerance) {
                warn!(object = %label, "non-planar surface cannot be uniformly gridded; skipped");
                return Ok(None);
            }
            sample_converted(&obj.geometry, converter, settings)?
        }
        Geometry::MultiPatchBody(faces) => {
            let mut planar = true;
            for face in faces {
                let mesh = face
                    .render_mesh
                    .as_ref()
                    .ok_or(sim3dm_geometry::Error::MeshExtraction)?;
                if !is_planar_mesh(mesh, tolerance) {
                    planar = false;
                    break;
                }
            }
            if !planar {
                warn!(object = %label, "non-planar surface cannot be uniformly gridded; skipped");
                return Ok(None);
            }
            sample_converted(&obj.geometry, converter, settings)?
        }
        Geometry::Extrusion(_) => sample_converted(&obj.geometry, converter, settings)?,

        Geometry::Other { kind } => {
            warn!(object = %label, kind = %kind, "unsupported object type for grids; skipped");
            return Ok(None);
        }
    };

    if sensors.is_empty() {
        return Err(Error::GridNotSupported { object: label });
    }

    Ok(Some(SensorGrid {
        identifier,
        display_name,
        sensors,
        spacing_x: settings.spacing_x,
        spacing_y: settings.spacing_y,
        offset: settings.offset,
    }))
}

/// Reconstruct to polygons and sample each one.
fn sample_converted(
    geometry: &Geometry,
    converter: &GeometryConverter,
    settings: &GridSettings,
) -> Result<Vec<SamplePoint>> {
    let polygons = converter.convert(geometry)?;
    let mut sensors = Vec::new();
    for polygon in &polygons {
        sensors.extend(polygon_grid_samples(
            polygon,
            settings.spacing_x,
            settings.spacing_y,
            settings.offset,
        ));
    }
    Ok(sensors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim3dm_core::{EdgeCurve, Layer, MeshData, MeshFace, PatchFace, SceneObject, SceneSettings};
    use sim3dm_geometry::Point3;

    fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    fn scene_with(geometry: Geometry) -> Scene {
        let mut scene = Scene::new(SceneSettings::default());
        scene.layers.push(Layer::new("analysis"));
        scene.objects.push(SceneObject::new(geometry, 0));
        scene
    }

    fn square_patch(side: f64) -> PatchFace {
        let mesh = MeshData::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(side, 0.0, 0.0),
                p(side, side, 0.0),
                p(0.0, side, 0.0),
            ],
            vec![MeshFace::Quad([0, 1, 2, 3])],
        );
        let edges = vec![
            EdgeCurve::line(p(0.0, 0.0, 0.0), p(side, 0.0, 0.0)),
            EdgeCurve::line(p(side, 0.0, 0.0), p(side, side, 0.0)),
            EdgeCurve::line(p(side, side, 0.0), p(0.0, side, 0.0)),
            EdgeCurve::line(p(0.0, side, 0.0), p(0.0, 0.0, 0.0)),
        ];
        PatchFace::new(mesh, edges)
    }

    fn settings(spacing: f64, offset: f64) -> GridSettings {
        GridSettings {
            spacing_x: spacing,
            spacing_y: spacing,
            offset,
        }
    }

    #[test]
    fn planar_patch_grid_count_and_offset() {
        let scene = scene_with(Geometry::SurfacePatch(square_patch(4.0)));
        let converter = GeometryConverter::new(0.01);

        let grid = generate(
            &scene,
            0,
            &converter,
            &settings(1.0, 0.5),
            "grid_1".to_string(),
            "grid_1".to_string(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(grid.sensors.len(), 16);
        for sensor in &grid.sensors {
            assert!((sensor.position.z.abs() - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn mesh_payload_samples_at_face_density() {
        let mesh = MeshData::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(2.0, 0.0, 0.0),
                p(0.0, 1.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(2.0, 1.0, 0.0),
            ],
            vec![MeshFace::Quad([0, 1, 4, 3]), MeshFace::Quad([1, 2, 5, 4])],
        );
        let scene = scene_with(Geometry::Mesh(mesh));
        let converter = GeometryConverter::new(0.01);

        let grid = generate(
            &scene,
            0,
            &converter,
            &settings(10.0, 0.0),
            "grid_1".to_string(),
            "grid_1".to_string(),
        )
        .unwrap()
        .unwrap();

        // One sensor per mesh face, regardless of spacing settings
        assert_eq!(grid.sensors.len(), 2);
    }

    #[test]
    fn non_planar_patch_is_skipped() {
        let folded = MeshData::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 1.0),
                p(2.0, 0.0, 0.0),
                p(0.0, 1.0, 0.0),
                p(1.0, 1.0, 1.0),
                p(2.0, 1.0, 0.0),
            ],
            vec![MeshFace::Quad([0, 1, 4, 3]), MeshFace::Quad([1, 2, 5, 4])],
        );
        let patch = PatchFace::new(folded, Vec::new());
        let scene = scene_with(Geometry::SurfacePatch(patch));
        let converter = GeometryConverter::new(0.01);

        let grid = generate(
            &scene,
            0,
            &converter,
            &settings(1.0, 0.0),
            "grid_1".to_string(),
            "grid_1".to_string(),
        )
        .unwrap();

        assert!(grid.is_none());
    }

    #[test]
    fn spacing_larger_than_face_names_the_object() {
        let mut scene = scene_with(Geometry::SurfacePatch(square_patch(1.0)));
        scene.objects[0].name = Some("desk".to_string());
        let converter = GeometryConverter::new(0.01);

        let result = generate(
            &scene,
            0,
            &converter,
            &settings(10.0, 0.0),
            "grid_1".to_string(),
            "grid_1".to_string(),
        );

        match result {
            Err(Error::GridNotSupported { object }) => assert_eq!(object, "desk"),
            other => panic!("expected GridNotSupported, got {other:?}"),
        }
    }
}
