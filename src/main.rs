use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use parasurf::config::{AppConfig, IndexFormat};
use parasurf::error::ObjError;
use parasurf::obj::write_obj;
use parasurf::{MeshIndex, MeshSource, ObjSurface, Result, VertexFlags};

/// Tessellate parametric surfaces and OBJ meshes into GPU-ready buffers.
///
/// Surfaces come from the configuration directory (`default.toml`,
/// `user.toml`, `PARASURF_*` environment variables). Every mesh is
/// generated, summarized and optionally exported as OBJ.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Configuration directory.
    #[arg(long, env = "PARASURF_CONFIG_DIR", default_value = "config")]
    config: PathBuf,

    /// Additional OBJ meshes to load.
    #[arg(long = "obj")]
    obj_files: Vec<PathBuf>,

    /// Write every mesh as `<name>.obj` into this directory.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Use 32-bit indices regardless of the configuration.
    #[arg(long)]
    wide_indices: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load_from(&args.config)?;
    if let Some(dir) = args.export {
        config.output.directory = Some(dir);
    }
    if args.wide_indices {
        config.output.index_format = IndexFormat::U32;
    }

    if let Some(dir) = &config.output.directory {
        fs::create_dir_all(dir).map_err(ObjError::from)?;
    }

    for (name, surface, flags) in config.build_surfaces()? {
        process(&config, &name, &surface, flags)?;
    }

    for path in &args.obj_files {
        let surface = ObjSurface::open(path)?;
        let name = path
            .file_stem()
            .map_or_else(|| "mesh".to_string(), |s| s.to_string_lossy().into_owned());
        process(&config, &name, &surface, VertexFlags::NORMALS)?;
    }

    Ok(())
}

fn process<S: MeshSource>(
    config: &AppConfig,
    name: &str,
    source: &S,
    flags: VertexFlags,
) -> Result<()> {
    match config.output.index_format {
        IndexFormat::U16 => emit::<S, u16>(config.output.directory.as_deref(), name, source, flags),
        IndexFormat::U32 => emit::<S, u32>(config.output.directory.as_deref(), name, source, flags),
    }
}

fn emit<S: MeshSource, I: MeshIndex>(
    directory: Option<&Path>,
    name: &str,
    source: &S,
    flags: VertexFlags,
) -> Result<()> {
    let mesh = source.generate_mesh::<I>(flags)?;
    info!(
        name,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_indices.len() / 3,
        lines = mesh.line_indices.len() / 2,
        stride = mesh.layout.stride_bytes(),
        "tessellated"
    );

    if let Some(dir) = directory {
        let path = dir.join(format!("{name}.obj"));
        let file = File::create(&path).map_err(ObjError::from)?;
        write_obj(BufWriter::new(file), name, &mesh)?;
        info!(path = %path.display(), "exported");
    }
    Ok(())
}
