//! Conversions from game data to three-d CPU meshes and matrices.

use polystrike_game::{MeshData, ModelData};

/// Convert a glam matrix to a three-d (cgmath) matrix.
pub fn to_mat4(m: glam::Mat4) -> three_d::Mat4 {
    let c = m.to_cols_array();
    three_d::Mat4::new(
        c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7], c[8], c[9], c[10], c[11], c[12], c[13],
        c[14], c[15],
    )
}

/// Convert a glam vector to a three-d vector.
pub fn to_vec3(v: glam::Vec3) -> three_d::Vec3 {
    three_d::vec3(v.x, v.y, v.z)
}

/// Opaque sRGB color.
pub fn srgba(color: [u8; 3]) -> three_d::Srgba {
    three_d::Srgba::new(color[0], color[1], color[2], 255)
}

/// Convert a loaded mesh to three-d CpuMesh format.
pub fn mesh_to_cpu_mesh(mesh: &MeshData) -> three_d::CpuMesh {
    let positions: Vec<three_d::Vec3> = mesh.positions.iter().map(|p| to_vec3(*p)).collect();
    let normals: Vec<three_d::Vec3> = mesh.normals.iter().map(|n| to_vec3(*n)).collect();

    three_d::CpuMesh {
        positions: three_d::Positions::F32(positions),
        normals: Some(normals),
        indices: three_d::Indices::U32(mesh.indices.clone()),
        ..Default::default()
    }
}

/// Every mesh of a model with its color.
pub fn model_to_cpu_meshes(model: &ModelData) -> Vec<(three_d::CpuMesh, three_d::Srgba)> {
    model
        .meshes
        .iter()
        .filter(|m| !m.positions.is_empty())
        .map(|m| (mesh_to_cpu_mesh(m), srgba(m.color)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_matrix_layout() {
        let m = glam::Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let converted = to_mat4(m);
        assert_eq!(converted.w.x, 1.0);
        assert_eq!(converted.w.y, 2.0);
        assert_eq!(converted.w.z, 3.0);
        assert_eq!(converted.x.x, 1.0);
    }

    #[test]
    fn test_model_conversion() {
        let model = ModelData {
            meshes: vec![
                MeshData {
                    name: "tri".to_string(),
                    positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
                    normals: vec![Vec3::Z; 3],
                    indices: vec![0, 1, 2],
                    color: [10, 20, 30],
                },
                MeshData::default(),
            ],
        };

        let meshes = model_to_cpu_meshes(&model);
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].0.vertex_count(), 3);
        assert_eq!(meshes[0].1, three_d::Srgba::new(10, 20, 30, 255));
    }
}
