#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Worldgen
//!
//! Deterministic, noise-driven generation of cubic voxel chunks.
//!
//! For every voxel of a chunk the generator computes a density byte and an RGB color
//! from coherent 3-D noise sampled at the voxel's world coordinates, and writes the
//! four bytes `[value, r, g, b]` into a flat chunk buffer.
//!
//! ## Key Modules
//!
//! * `worldgen` - The generation algorithm: noise sampling, density, color, chunk layout,
//!   plus the chunk store and generation tasks
//! * `task_management` - Worker pool running one chunk per task
//! * `config` - Serde-backed settings and presets
//! * `error` - The crate's error type
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_worldgen::{
//!     generate_chunk,
//!     worldgen::{color::ColorScheme, density::GeneratorMode, seed::Seed},
//! };
//!
//! let chunk = generate_chunk(
//!     Seed(42),
//!     GeneratorMode::Default,
//!     ColorScheme::HsvWheel,
//!     Point3::new(0, 0, 0),
//!     2,
//! )
//! .unwrap();
//! assert_eq!(chunk.as_bytes().len(), 32);
//! ```
//!
//! ## Concurrency
//!
//! A `ChunkGenerator` is immutable and builds its noise sampler per call, so it can be
//! shared across threads behind an `Arc` and any number of chunks can be generated in
//! parallel without locking.

#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::wasm_bindgen;

pub mod config;
pub mod error;
pub mod task_management;
pub mod worldgen;

pub use config::{GeneratorSettings, WorldgenConfig};
pub use error::{Result, WorldgenError};
pub use worldgen::chunk::{generate_chunk, ChunkBuffer, ChunkGenerator};
pub use worldgen::voxel::Voxel;

#[cfg(not(target_family = "wasm"))]
use {
    cgmath::Point3,
    log::info,
    std::sync::Arc,
    task_management::TaskManager,
    web_time::Instant,
    worldgen::world::World,
};

/// Initialises the stdout logger, filtered by `RUST_LOG`.
#[cfg(not(target_family = "wasm"))]
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
}

/// Native entry point.
///
/// Loads the JSON config named by the first command-line argument (or uses the
/// defaults), generates every chunk within `radius` of the origin on the worker pool
/// and logs a summary.
#[cfg(not(target_family = "wasm"))]
pub fn run() -> Result<()> {
    init_logger();
    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => WorldgenConfig::load(path)?,
        None => WorldgenConfig::default(),
    };
    let seed = config.resolve_seed();
    info!(
        "Generating with seed {} ({} / {}), chunk size {}",
        seed, config.generator.mode, config.generator.color_scheme, config.chunk_size
    );

    let generator = ChunkGenerator::new(seed, config.chunk_size, config.generator)?;
    let mut world = World::new(Arc::new(generator));
    let mut task_manager = match config.workers {
        Some(workers) => TaskManager::new(workers),
        None => TaskManager::with_available_parallelism(),
    };

    let start = Instant::now();
    let radius = config.radius as i32;
    for z in -radius..=radius {
        for y in -radius..=radius {
            for x in -radius..=radius {
                world.request_chunk(Point3::new(x, y, z), &mut task_manager);
            }
        }
    }
    task_manager.wait_for_all(&mut world);

    let voxels: usize = world.chunks().map(ChunkBuffer::len).sum();
    let density_total: u64 = world
        .chunks()
        .flat_map(|chunk| chunk.voxels().iter())
        .map(|voxel| voxel.value as u64)
        .sum();
    info!(
        "Generated {} chunks ({} voxels) in {:?}, mean density {:.2}",
        world.len(),
        voxels,
        start.elapsed(),
        density_total as f64 / voxels.max(1) as f64
    );
    Ok(())
}

/// Web entry point: installs the panic hook and the console logger.
#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn init_web() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    console_log::init_with_level(log::Level::Info).expect("Couldn't initialize logger");
}

/// Generates one chunk for a web worker and returns its bytes.
///
/// `generator` and `color_scheme` are the numeric selectors of
/// [`worldgen::density::GeneratorMode`] and [`worldgen::color::ColorScheme`]; unknown
/// values are rejected rather than falling back to a default.
#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn generate(
    chunk_size: u8,
    generator: u8,
    color_scheme: u8,
    seed: i32,
    x: i32,
    y: i32,
    z: i32,
) -> std::result::Result<Vec<u8>, wasm_bindgen::JsValue> {
    use worldgen::{color::ColorScheme, density::GeneratorMode, seed::Seed};

    let to_js = |error: WorldgenError| wasm_bindgen::JsValue::from_str(&error.to_string());
    let mode = GeneratorMode::try_from(generator).map_err(to_js)?;
    let scheme = ColorScheme::try_from(color_scheme).map_err(to_js)?;
    generate_chunk(
        Seed(seed),
        mode,
        scheme,
        cgmath::Point3::new(x, y, z),
        chunk_size,
    )
    .map(ChunkBuffer::into_bytes)
    .map_err(to_js)
}
