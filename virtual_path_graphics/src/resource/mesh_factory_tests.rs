use super::*;

#[test]
fn test_canvas_is_two_triangles() {
    let (vertices, indices) = MeshFactory::canvas();
    assert_eq!(vertices.len(), 6);
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_canvas_uvs_follow_positions() {
    let (vertices, _) = MeshFactory::canvas();
    assert_eq!(vertices[0].position(), Vec3::new(-1.0, 1.0, 0.0));
    assert_eq!(vertices[0].tex_coord(), Vec2::new(0.0, 1.0));
    assert_eq!(vertices[2].tex_coord(), Vec2::new(1.0, 0.0));
    assert_eq!(vertices[4].tex_coord(), Vec2::new(1.0, 1.0));
}

#[test]
fn test_cube_has_36_sequential_indices() {
    let (vertices, indices) = MeshFactory::cube(0.5);
    assert_eq!(vertices.len(), 36);
    assert_eq!(indices, (0..36).collect::<Vec<u32>>());
}

#[test]
fn test_cube_respects_size() {
    let (vertices, _) = MeshFactory::cube(2.0);
    assert!(vertices
        .iter()
        .all(|v| v.position.iter().all(|c| c.abs() == 2.0)));
}

#[test]
fn test_cube_normals_point_outward() {
    let (vertices, _) = MeshFactory::cube(0.5);
    for v in &vertices {
        // each vertex lies on the face its normal points at
        assert!(v.position().dot(v.normal()) > 0.0);
        assert_eq!(v.normal().length(), 1.0);
    }
}
