//! # Voxel Worldgen Entry Point
//!
//! Native driver for the world generator. It simply calls into the library's `run()`.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- worldgen.json
//! ```

fn main() {
    #[cfg(not(target_family = "wasm"))]
    if let Err(error) = voxel_worldgen::run() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}
