use super::*;

#[test]
fn test_vertex_is_tightly_packed() {
    assert_eq!(size_of::<Vertex>(), 72);
    assert_eq!(Vertex::stride(), 72);
}

#[test]
fn test_field_offsets() {
    assert_eq!(Vertex::field_offset("position"), Some(0));
    assert_eq!(Vertex::field_offset("normal"), Some(12));
    assert_eq!(Vertex::field_offset("tangent"), Some(24));
    assert_eq!(Vertex::field_offset("bitangent"), Some(36));
    assert_eq!(Vertex::field_offset("color"), Some(48));
    assert_eq!(Vertex::field_offset("tex_coord"), Some(64));
}

#[test]
fn test_unknown_field_has_no_offset() {
    assert_eq!(Vertex::field_offset("Position"), None);
    assert_eq!(Vertex::field_offset("uv"), None);
}

#[test]
fn test_vertex_builders() {
    let v = Vertex::new(Vec3::X, Vec3::Z, Vec2::new(0.5, 1.0))
        .with_color(Vec4::ONE)
        .with_tangent_frame(Vec3::Y, Vec3::NEG_X);

    assert_eq!(v.position(), Vec3::X);
    assert_eq!(v.normal(), Vec3::Z);
    assert_eq!(v.tex_coord(), Vec2::new(0.5, 1.0));
    assert_eq!(v.color, [1.0; 4]);
    assert_eq!(v.bitangent, [-1.0, 0.0, 0.0]);
}

#[test]
fn test_vertex_casts_to_bytes() {
    let vertices = [Vertex::default(); 2];
    let bytes: &[u8] = bytemuck::cast_slice(&vertices);
    assert_eq!(bytes.len(), 144);
}
