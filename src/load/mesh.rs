use std::io::Cursor;
use arrayvec::ArrayVec;
use glam::Vec3;
use log::debug;
use tr_reader::{model as tr, read_boxed_slice, Readable};
use crate::{error::resolve, level::{LightMode, Mesh, MeshVertex, Polygon, TexinfoId}, light::intensity, LoadError};
use super::{texture::PALETTE_TEXINFOS, Loader};

/// Textured faces skip the palette texinfos, the top bit is a flag.
pub(super) fn textured_texinfo(details: tr::TextureDetails) -> usize {
	details.texture_index() as usize + PALETTE_TEXINFOS
}

pub(super) fn colored_texinfo(details: tr::TextureDetails) -> usize {
	details.palette_index() as usize
}

pub(super) fn polygon<const N: usize>(
	face: &tr::Face<N>,
	texinfo: usize,
	num_vertices: usize,
	num_texinfos: usize,
) -> Result<Polygon, LoadError> {
	let vertices = face
		.vertex_indices
		.iter()
		.map(|&i| resolve("vertex", i as usize, num_vertices).map(|_| i))
		.collect::<Result<ArrayVec<u16, 4>, _>>()?;
	let texinfo = TexinfoId(resolve("texinfo", texinfo, num_texinfos)?);
	Ok(Polygon { vertices, texinfo })
}

impl<'a> Loader<'a> {
	fn convert_mesh(&self, raw: &tr::Mesh) -> Result<Mesh, LoadError> {
		let num_vertices = raw.vertices.len();
		let (light_mode, lights) = match &raw.lighting {
			tr::MeshLighting::Normals(normals) => (LightMode::External, normals.iter().map(|n| n.as_vec3()).collect::<Vec<_>>()),
			tr::MeshLighting::Intensities(raws) => (LightMode::Internal, raws.iter().map(|&raw| Vec3::splat(intensity(raw))).collect()),
		};
		if lights.len() != num_vertices {
			return Err(LoadError::inconsistent(format!("mesh has {} vertices but {} light values", num_vertices, lights.len())));
		}
		let vertices = raw
			.vertices
			.iter()
			.zip(lights)
			.map(|(position, light)| MeshVertex { position: position.as_vec3(), light })
			.collect();
		let num_texinfos = self.level.texinfos.len();
		let mut polygons = Vec::with_capacity(
			raw.textured_quads.len() + raw.textured_tris.len() + raw.colored_quads.len() + raw.colored_tris.len(),
		);
		for face in raw.textured_quads.iter() {
			polygons.push(polygon(face, textured_texinfo(face.texture), num_vertices, num_texinfos)?);
		}
		for face in raw.textured_tris.iter() {
			polygons.push(polygon(face, textured_texinfo(face.texture), num_vertices, num_texinfos)?);
		}
		for face in raw.colored_quads.iter() {
			polygons.push(polygon(face, colored_texinfo(face.texture), num_vertices, num_texinfos)?);
		}
		for face in raw.colored_tris.iter() {
			polygons.push(polygon(face, colored_texinfo(face.texture), num_vertices, num_texinfos)?);
		}
		Ok(Mesh {
			light_mode,
			vertices,
			polygons,
			center: raw.center.as_vec3(),
			radius: raw.radius as f32,
		})
	}

	/// One mesh per pointer, each pointer a byte offset into mesh data.
	pub(super) fn load_meshes(&mut self) -> Result<(), LoadError> {
		let pointers: Box<[u32]> = read_boxed_slice(&mut self.dir.mesh_pointers.reader(self.data), self.dir.mesh_pointers.count as usize)?;
		let mesh_data = self.dir.mesh_data.bytes(self.data);
		for (index, &pointer) in pointers.iter().enumerate() {
			let start = pointer as usize;
			if start > mesh_data.len() {
				return Err(LoadError::inconsistent(format!("mesh {} starts at byte {} past mesh data of {}", index, start, mesh_data.len())));
			}
			let raw = tr::Mesh::read(&mut Cursor::new(&mesh_data[start..]))?;
			let mesh = self.convert_mesh(&raw)?;
			self.level.meshes.push(mesh);
		}
		debug!("{} meshes", self.level.meshes.len());
		Ok(())
	}
}
