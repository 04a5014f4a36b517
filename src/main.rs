use std::{env::args, path::PathBuf};
use anyhow::{bail, Context, Result};
use log::info;
use tr_level::{anim::TICK_TIME, save_image::save_texpages, Level, Mesh, RoomId, TextureAnimator};

const USAGE: &str = "usage: tr_level <LEVEL> <v1|v2> [--dump-textures DIR]";

struct Args {
	level: PathBuf,
	version: String,
	dump_textures: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
	let mut args = args().skip(1);
	let (Some(level), Some(version)) = (args.next(), args.next()) else {
		bail!(USAGE);
	};
	let dump_textures = match args.next().as_deref() {
		None => None,
		Some("--dump-textures") => Some(args.next().context(USAGE)?.into()),
		Some(other) => bail!("unexpected argument {}\n{}", other, USAGE),
	};
	Ok(Args { level: level.into(), version, dump_textures })
}

fn main() -> Result<()> {
	env_logger::init();
	let args = parse_args()?;
	let mut level = Level::open(&args.level, &args.version).with_context(|| format!("loading {}", args.level.display()))?;
	println!(
		"{} level: {} rooms, {} texture pages, {} meshes, {} models, {} static meshes, {} sprite sequences",
		level.version,
		level.rooms.len(),
		level.texpages.len(),
		level.meshes.len(),
		level.models.len(),
		level.static_meshes.len(),
		level.sprite_sequences.len(),
	);
	println!("{} model objects, {} sprite objects", level.model_objects.len(), level.sprite_objects.len());
	//one second of playback
	let mut animator = TextureAnimator::new();
	let mut changed = 0;
	for _ in 0..30 {
		level.tick(TICK_TIME);
		animator.tick(TICK_TIME, &mut level, &mut |_: RoomId, _: &Mesh| changed += 1);
	}
	info!("{} room geometry updates in one second", changed);
	if let Some(dir) = &args.dump_textures {
		save_texpages(&level, dir)?;
	}
	Ok(())
}
