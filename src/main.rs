//! # Voxel Viewer Entry Point
//!
//! Calls into the library's `run()` function to open the window and start the viewer.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release
//! ```

fn main() {
    voxel_viewer::run();
}
