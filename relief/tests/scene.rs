use nalgebra::Point2;
use relief::{Field, Grid, Scene};
use std::sync::Arc;

#[test]
fn constrained_paraboloid_end_to_end() {
    let mut scene = Scene::new(Grid::isotropic(5.0, 41).unwrap());
    scene.set_objective(|x: f64, y: f64| x * x + y * y);
    scene.add_constraint(Arc::new(|x: f64, y: f64| x * x + y * y - 9.0));
    scene.set_path(vec![
        Point2::new(2.0, 2.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 0.0),
    ]);

    let surface = scene.surface();
    assert_eq!(surface.bands.len(), 40);

    // Validity of every vertex matches the constraint at its position
    for band in &surface.bands {
        assert_eq!(band.vertices.len(), 82);
        for v in &band.vertices {
            let inside =
                v.position.x.powi(2) + v.position.y.powi(2) <= 9.0;
            assert_eq!(v.is_valid(), inside, "at {:?}", v.position);
        }
    }

    // The feasible region contains the origin (min) and touches the circle
    // boundary, where the objective reaches 9
    let range = scene.height_range();
    assert_eq!(range.min, 0.0);
    assert!(range.max > 8.0 && range.max <= 9.0);

    // Bands split cleanly at the sentinels
    for band in &surface.bands {
        let in_runs: usize = band.valid_runs().map(<[_]>::len).sum();
        let valid = band.vertices.iter().filter(|v| v.is_valid()).count();
        assert_eq!(in_runs, valid);
        assert!(
            band.valid_runs().all(|run| run.iter().all(|v| v.is_valid()))
        );
    }

    // Boundary segments hug the constraint circle and sit on the surface
    let hz = scene.grid().half_extent().z;
    assert!(!scene.boundaries().is_empty());
    for p in scene
        .boundaries()
        .iter()
        .flat_map(|s| [s.start, s.end])
    {
        let r = (p.x * p.x + p.y * p.y).sqrt();
        assert!((r - 3.0).abs() < 0.3, "boundary point off-circle: {p:?}");
        assert!(p.z.is_finite());
        assert!(p.z.abs() <= hz + 0.5);
    }

    // The descent path is lifted with the same range
    let path = scene.path_vertices();
    assert_eq!(path.len(), 3);
    assert!(path.windows(2).all(|w| w[0].z >= w[1].z));
    assert_eq!(path[2].z, range.normalize(0.0, hz));
}

#[test]
fn reconfiguring_the_scene_rebuilds_everything() {
    let mut scene = Scene::new(Grid::isotropic(5.0, 21).unwrap());
    scene.set_objective(|x: f64, y: f64| x + y);
    let g0 = scene.generation();

    assert!(scene.set_resolution(11).is_ok());
    assert_eq!(scene.surface().bands.len(), 10);
    assert_eq!(scene.generation(), g0 + 1);

    let g: Arc<dyn Field> = Arc::new(|_: f64, _: f64| 1.0);
    scene.add_constraint(g);

    // An infeasible constraint empties the mesh but is not an error
    assert_eq!(scene.height_range(), relief::HeightRange::default());
    assert!(
        scene
            .surface()
            .bands
            .iter()
            .all(|b| b.vertices.iter().all(|v| !v.is_valid()))
    );
    assert!(scene.boundaries().is_empty());

    scene.clear_constraints();
    assert_eq!(scene.height_range().min, -10.0);
    assert_eq!(scene.height_range().max, 10.0);
}
