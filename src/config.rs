//! Declarative surface configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `<dir>/default.toml`
//! 2. `<dir>/user.toml` (optional local overrides)
//! 3. Environment variables (`PARASURF_SECTION__KEY`)

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::geometry::{
    Cone, KleinBottle, MobiusStrip, ParametricInterval, Quad, Sphere, SurfaceKind, Torus,
    TrefoilKnot,
};
use crate::math::Vector2;
use crate::tessellation::{ParametricSurface, TessellationParams, VertexFlags};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Surfaces to tessellate, in order.
    #[serde(default = "default_surfaces")]
    pub surfaces: Vec<SurfaceConfig>,
    /// Finite-difference settings shared by all surfaces.
    #[serde(default)]
    pub tessellation: TessellationConfig,
    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            surfaces: default_surfaces(),
            tessellation: TessellationConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the `config` directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed.
    pub fn load() -> Result<Self> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory.
    ///
    /// Missing files are skipped; built-in defaults fill the gaps.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }
        // PARASURF_OUTPUT__INDEX_FORMAT=u32 -> output.index_format = "u32"
        figment = figment.merge(Env::prefixed("PARASURF_").split("__"));

        Self::extract(&figment)
    }

    /// Parses configuration from a TOML string on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or has the wrong shape.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let figment =
            Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(toml));
        Self::extract(&figment)
    }

    fn extract(figment: &Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|err| ConfigError::from(err).into())
    }

    /// Builds every configured surface.
    ///
    /// Names default to the kind name. Repeated names get a numeric suffix
    /// (`sphere`, `sphere_2`, ...) so exports never overwrite each other.
    ///
    /// # Errors
    ///
    /// Returns the first tessellation, shape or interval error encountered.
    pub fn build_surfaces(&self) -> Result<Vec<(String, ParametricSurface, VertexFlags)>> {
        let params = self.tessellation.params();
        params.validate()?;

        let mut taken = HashSet::new();
        self.surfaces
            .iter()
            .map(|config| {
                let surface = config.build()?.with_params(params)?;
                let base = config
                    .name
                    .clone()
                    .unwrap_or_else(|| surface.kind().name().to_string());
                let name = unique_name(&mut taken, base);
                Ok((name, surface, config.attributes.flags()))
            })
            .collect()
    }
}

fn unique_name(taken: &mut HashSet<String>, base: String) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let name = (2..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_default();
    debug!(requested = %base, assigned = %name, "renamed duplicate surface");
    taken.insert(name.clone());
    name
}

/// One surface to tessellate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Name used for logging and export files; defaults to the kind name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Shape and its parameters.
    #[serde(flatten)]
    pub shape: ShapeConfig,
    /// Overrides of the kind's default interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<IntervalConfig>,
    /// Vertex attributes to generate.
    #[serde(default)]
    pub attributes: AttributesConfig,
}

impl SurfaceConfig {
    #[must_use]
    pub fn new(shape: ShapeConfig) -> Self {
        Self {
            name: None,
            shape,
            interval: None,
            attributes: AttributesConfig::default(),
        }
    }

    /// Builds the surface with its interval overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape parameters or the interval are invalid.
    pub fn build(&self) -> Result<ParametricSurface> {
        let surface = ParametricSurface::new(self.shape.build()?);
        match &self.interval {
            Some(overrides) => {
                let interval = overrides.apply(surface.interval());
                surface.with_interval(interval)
            }
            None => Ok(surface),
        }
    }
}

/// Shape parameters, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeConfig {
    Quad { width: f64, height: f64 },
    Sphere { radius: f64 },
    Torus { major_radius: f64, minor_radius: f64 },
    Cone { height: f64, radius: f64 },
    TrefoilKnot { scale: f64 },
    KleinBottle { scale: f64 },
    MobiusStrip { scale: f64 },
}

impl ShapeConfig {
    /// Validates the parameters and builds the surface kind.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is out of range.
    pub fn build(&self) -> Result<SurfaceKind> {
        Ok(match *self {
            Self::Quad { width, height } => Quad::new(width, height)?.into(),
            Self::Sphere { radius } => Sphere::new(radius)?.into(),
            Self::Torus {
                major_radius,
                minor_radius,
            } => Torus::new(major_radius, minor_radius)?.into(),
            Self::Cone { height, radius } => Cone::new(height, radius)?.into(),
            Self::TrefoilKnot { scale } => TrefoilKnot::new(scale)?.into(),
            Self::KleinBottle { scale } => KleinBottle::new(scale)?.into(),
            Self::MobiusStrip { scale } => MobiusStrip::new(scale)?.into(),
        })
    }
}

/// Partial interval; unset fields keep the surface's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divisions: Option<[usize; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_count: Option<[f64; 2]>,
}

impl IntervalConfig {
    /// Applies the overrides to `base`.
    #[must_use]
    pub fn apply(&self, base: &ParametricInterval) -> ParametricInterval {
        ParametricInterval::new(
            self.divisions.unwrap_or(base.divisions),
            self.upper_bound.map_or(base.upper_bound, Vector2::from),
            self.texture_count.map_or(base.texture_count, Vector2::from),
        )
    }
}

/// Which optional vertex attributes to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributesConfig {
    pub normals: bool,
    pub tex_coords: bool,
    pub tangents: bool,
}

impl Default for AttributesConfig {
    fn default() -> Self {
        Self {
            normals: true,
            tex_coords: false,
            tangents: false,
        }
    }
}

impl AttributesConfig {
    #[must_use]
    pub fn flags(&self) -> VertexFlags {
        let mut flags = VertexFlags::empty();
        flags.set(VertexFlags::NORMALS, self.normals);
        flags.set(VertexFlags::TEX_COORDS, self.tex_coords);
        flags.set(VertexFlags::TANGENTS, self.tangents);
        flags
    }
}

/// Finite-difference configuration, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    pub difference_step: f64,
    pub boundary_nudge: f64,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        let params = TessellationParams::default();
        Self {
            difference_step: params.difference_step,
            boundary_nudge: params.boundary_nudge,
        }
    }
}

impl TessellationConfig {
    #[must_use]
    pub fn params(&self) -> TessellationParams {
        TessellationParams {
            difference_step: self.difference_step,
            boundary_nudge: self.boundary_nudge,
        }
    }
}

/// Width of generated index buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFormat {
    #[default]
    U16,
    U32,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory OBJ exports are written to; nothing is exported when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    pub index_format: IndexFormat,
}

/// The six surfaces of the classic parametric viewer.
fn default_surfaces() -> Vec<SurfaceConfig> {
    [
        ShapeConfig::Cone {
            height: 3.0,
            radius: 1.0,
        },
        ShapeConfig::Sphere { radius: 1.4 },
        ShapeConfig::Torus {
            major_radius: 1.4,
            minor_radius: 0.3,
        },
        ShapeConfig::TrefoilKnot { scale: 1.8 },
        ShapeConfig::KleinBottle { scale: 0.2 },
        ShapeConfig::MobiusStrip { scale: 1.0 },
    ]
    .into_iter()
    .map(SurfaceConfig::new)
    .collect()
}
