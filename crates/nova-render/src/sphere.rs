//! CPU-generated unit UV sphere for the shockwave shell.

use bytemuck::{Pod, Zeroable};

/// Position-only vertex; the unit-length position doubles as the normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub _padding: f32,
}

#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

/// Build a unit UV sphere with `sectors` longitude and `stacks`
/// latitude divisions. Pole stacks emit one triangle per sector,
/// interior stacks two.
pub fn unit_sphere(sectors: u32, stacks: u32) -> SphereMesh {
    assert!(sectors >= 3 && stacks >= 2);

    let mut vertices = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
    for i in 0..=stacks {
        let phi = std::f32::consts::PI * i as f32 / stacks as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for j in 0..=sectors {
            let theta = std::f32::consts::TAU * j as f32 / sectors as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            vertices.push(SphereVertex {
                position: [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta],
                _padding: 0.0,
            });
        }
    }

    let ring = sectors + 1;
    let mut indices = Vec::with_capacity((6 * sectors * (stacks - 1)) as usize);
    for i in 0..stacks {
        for j in 0..sectors {
            let a = i * ring + j;
            let b = a + ring;
            if i != 0 {
                indices.extend_from_slice(&[a, b, a + 1]);
            }
            if i != stacks - 1 {
                indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }

    SphereMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_unit_length() {
        let mesh = unit_sphere(16, 12);
        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            let length = (x * x + y * y + z * z).sqrt();
            assert!((length - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn index_counts_match_the_grid() {
        let (sectors, stacks) = (16u32, 12u32);
        let mesh = unit_sphere(sectors, stacks);

        assert_eq!(mesh.vertices.len() as u32, (stacks + 1) * (sectors + 1));
        // Interior stacks contribute two triangles per cell, poles one.
        assert_eq!(mesh.indices.len() as u32, 6 * sectors * (stacks - 1));
        let max = *mesh.indices.iter().max().unwrap();
        assert!((max as usize) < mesh.vertices.len());
    }
}
