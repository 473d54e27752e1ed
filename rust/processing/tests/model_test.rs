// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end scene conversion tests.

use sim3dm_core::{
    EdgeCurve, Geometry, Layer, MeshData, MeshFace, PatchFace, Scene, SceneObject, SceneSettings,
};
use sim3dm_geometry::{Point3, Vector3};
use sim3dm_processing::{
    convert_scene, Config, ConvertOptions, ElementKind, FaceKind, LayerConfig, MaterialTable,
    ObjectKind,
};

fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
    Point3::new(x, y, z)
}

/// A single-quad surface patch with linear boundary edges.
fn quad_patch(corners: [Point3<f64>; 4]) -> PatchFace {
    let mesh = MeshData::new(corners.to_vec(), vec![MeshFace::Quad([0, 1, 2, 3])]);
    let edges = (0..4)
        .map(|i| EdgeCurve::line(corners[i], corners[(i + 1) % 4]))
        .collect();
    PatchFace::new(mesh, edges)
}

fn closed_box_mesh() -> MeshData {
    MeshData::new(
        vec![
            p(0., 0., 0.),
            p(1., 0., 0.),
            p(1., 1., 0.),
            p(0., 1., 0.),
            p(0., 0., 1.),
            p(1., 0., 1.),
            p(1., 1., 1.),
            p(0., 1., 1.),
        ],
        vec![
            MeshFace::Quad([0, 3, 2, 1]),
            MeshFace::Quad([4, 5, 6, 7]),
            MeshFace::Quad([0, 1, 5, 4]),
            MeshFace::Quad([1, 2, 6, 5]),
            MeshFace::Quad([2, 3, 7, 6]),
            MeshFace::Quad([3, 0, 4, 7]),
        ],
    )
}

#[test]
fn south_wall_end_to_end() {
    let corners = [p(0., 0., 0.), p(4., 0., 0.), p(4., 0., 3.), p(0., 0., 3.)];

    let mut scene = Scene::new(SceneSettings::default());
    scene.layers.push(Layer::new("exterior"));
    let mut wall = SceneObject::new(Geometry::SurfacePatch(quad_patch(corners)), 0);
    wall.name = Some("southwall".to_string());
    scene.objects.push(wall);

    let mut config = Config::default();
    config.roles.wall = Some("exterior".to_string());

    let model = convert_scene(
        &scene,
        "test_model",
        &config,
        &MaterialTable::new(),
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(model.faces.len(), 1);
    assert!(model.shades.is_empty());
    assert!(model.apertures.is_empty());

    let element = &model.faces[0];
    assert_eq!(element.kind, ElementKind::Face(FaceKind::Wall));
    assert_eq!(element.display_name, "southwall");

    // 4 vertices matching the CAD corners within tolerance
    let boundary = element.polygon.boundary();
    assert_eq!(boundary.len(), 4);
    for point in boundary {
        assert!(corners
            .iter()
            .any(|c| nalgebra_distance(c, point) < 0.01));
    }

    // Outward normal matching the CAD winding: the quad faces -Y
    let normal = element.polygon.normal();
    assert!((normal - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-6);
}

fn nalgebra_distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

#[test]
fn room_layer_respects_visibility() {
    let mut scene = Scene::new(SceneSettings::default());
    let mut room_layer = Layer::new("rooms");
    room_layer.visible = false;
    scene.layers.push(room_layer);
    scene
        .objects
        .push(SceneObject::new(Geometry::Mesh(closed_box_mesh()), 0));

    let mut config = Config::default();
    config.roles.room = Some("rooms".to_string());

    // Visibility filter on: the off layer contributes nothing
    let filtered = convert_scene(
        &scene,
        "m",
        &config,
        &MaterialTable::new(),
        &ConvertOptions::default(),
    )
    .unwrap();
    assert!(filtered.rooms.is_empty());

    // Filter off: the box comes through as one room
    let unfiltered = convert_scene(
        &scene,
        "m",
        &config,
        &MaterialTable::new(),
        &ConvertOptions {
            visibility_filter: false,
            ..ConvertOptions::default()
        },
    )
    .unwrap();
    assert_eq!(unfiltered.rooms.len(), 1);
    assert_eq!(unfiltered.rooms[0].faces.len(), 6);
}

#[test]
fn conversion_is_idempotent() {
    let mut scene = Scene::new(SceneSettings::default());
    scene.layers.push(Layer::new("walls"));
    scene.layers.push(Layer::new("context"));
    scene.layers.push(Layer::new("rooms"));

    scene.objects.push(SceneObject::new(
        Geometry::SurfacePatch(quad_patch([
            p(0., 0., 0.),
            p(2., 0., 0.),
            p(2., 0., 2.),
            p(0., 0., 2.),
        ])),
        0,
    ));
    // Two unnamed shades exercise generated identifiers
    scene.objects.push(SceneObject::new(
        Geometry::SurfacePatch(quad_patch([
            p(0., 5., 0.),
            p(2., 5., 0.),
            p(2., 5., 2.),
            p(0., 5., 2.),
        ])),
        1,
    ));
    scene.objects.push(SceneObject::new(
        Geometry::SurfacePatch(quad_patch([
            p(3., 5., 0.),
            p(5., 5., 0.),
            p(5., 5., 2.),
            p(3., 5., 2.),
        ])),
        1,
    ));
    scene
        .objects
        .push(SceneObject::new(Geometry::Mesh(closed_box_mesh()), 2));

    let mut config = Config::default();
    config.roles.wall = Some("walls".to_string());
    config.roles.shade = Some("context".to_string());
    config.roles.room = Some("rooms".to_string());

    let materials = MaterialTable::new();
    let options = ConvertOptions::default();

    let first = convert_scene(&scene, "m", &config, &materials, &options).unwrap();
    let second = convert_scene(&scene, "m", &config, &materials, &options).unwrap();

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);

    // Generated identifiers are unique
    assert_eq!(first.shades.len(), 2);
    assert_ne!(first.shades[0].identifier, first.shades[1].identifier);
}

#[test]
fn layer_config_routes_apertures_with_materials() {
    let mut scene = Scene::new(SceneSettings::default());
    scene.layers.push(Layer::new("glazing"));
    scene.objects.push(SceneObject::new(
        Geometry::SurfacePatch(quad_patch([
            p(0., 0., 1.),
            p(1., 0., 1.),
            p(1., 0., 2.),
            p(0., 0., 2.),
        ])),
        0,
    ));

    let mut config = Config::default();
    config.layers.insert(
        "glazing".to_string(),
        LayerConfig {
            object_kind: Some(ObjectKind::Aperture),
            material: Some("clear_glass".to_string()),
            ..LayerConfig::default()
        },
    );

    let materials = MaterialTable::from_materials([sim3dm_processing::Material {
        identifier: "clear_glass".to_string(),
        definition: "void glass clear_glass 0 0 3 .96 .96 .96".to_string(),
    }]);

    let model = convert_scene(
        &scene,
        "m",
        &config,
        &materials,
        &ConvertOptions::default(),
    )
    .unwrap();

    assert_eq!(model.apertures.len(), 1);
    assert_eq!(model.apertures[0].material.as_deref(), Some("clear_glass"));

    // The same config without the material table is a hard error
    let result = convert_scene(
        &scene,
        "m",
        &config,
        &MaterialTable::new(),
        &ConvertOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn child_layer_inherits_parent_entry() {
    let mut scene = Scene::new(SceneSettings::default());
    scene.layers.push(Layer::new("shading"));
    scene.layers.push(Layer::with_path(vec![
        "shading".to_string(),
        "louvers".to_string(),
    ]));
    scene.objects.push(SceneObject::new(
        Geometry::SurfacePatch(quad_patch([
            p(0., 0., 3.),
            p(1., 0., 3.),
            p(1., 1., 3.),
            p(0., 1., 3.),
        ])),
        1,
    ));

    let mut config = Config::default();
    config.layers.insert(
        "shading".to_string(),
        LayerConfig {
            object_kind: Some(ObjectKind::Shade),
            ..LayerConfig::default()
        },
    );

    let model = convert_scene(
        &scene,
        "m",
        &config,
        &MaterialTable::new(),
        &ConvertOptions::default(),
    )
    .unwrap();

    // The louver object sits on the child layer but classifies as a shade
    assert_eq!(model.shades.len(), 1);
    assert!(model.faces.is_empty());
}

#[test]
fn unconfigured_scene_classifies_by_normal() {
    let mut scene = Scene::new(SceneSettings::default());
    scene.layers.push(Layer::new("misc"));

    // An upward horizontal face and a vertical one
    scene.objects.push(SceneObject::new(
        Geometry::SurfacePatch(quad_patch([
            p(0., 0., 3.),
            p(1., 0., 3.),
            p(1., 1., 3.),
            p(0., 1., 3.),
        ])),
        0,
    ));
    scene.objects.push(SceneObject::new(
        Geometry::SurfacePatch(quad_patch([
            p(0., 0., 0.),
            p(1., 0., 0.),
            p(1., 0., 1.),
            p(0., 0., 1.),
        ])),
        0,
    ));

    let model = convert_scene(
        &scene,
        "m",
        &Config::default(),
        &MaterialTable::new(),
        &ConvertOptions::default(),
    )
    .unwrap();

    let kinds: Vec<ElementKind> = model.faces.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ElementKind::Face(FaceKind::Roof),
            ElementKind::Face(FaceKind::Wall)
        ]
    );
}

#[test]
fn grid_layer_generates_sensor_grids() {
    let mut scene = Scene::new(SceneSettings::default());
    scene.layers.push(Layer::new("analysis"));
    scene.objects.push(SceneObject::new(
        Geometry::SurfacePatch(quad_patch([
            p(0., 0., 0.8),
            p(4., 0., 0.8),
            p(4., 4., 0.8),
            p(0., 4., 0.8),
        ])),
        0,
    ));

    let mut config = Config::default();
    config.roles.grid = Some("analysis".to_string());
    config.grid.spacing_x = 1.0;
    config.grid.spacing_y = 1.0;
    config.grid.offset = 0.05;

    let model = convert_scene(
        &scene,
        "m",
        &config,
        &MaterialTable::new(),
        &ConvertOptions::default(),
    )
    .unwrap();

    // Grid layers do not take part in face import
    assert!(model.faces.is_empty());
    assert_eq!(model.grids.len(), 1);
    assert_eq!(model.grids[0].sensors.len(), 16);
    for sensor in &model.grids[0].sensors {
        assert!(((sensor.position.z - 0.8).abs() - 0.05).abs() < 1e-6);
    }
}
