//! # Voxel Streaming Demo Entry Point
//!
//! Runs a headless streaming session through the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! VOXEL_STREAMING_CONFIG=streaming.json RUST_LOG=debug cargo run --release
//! ```

fn main() {
    voxel_streaming::run();
}
