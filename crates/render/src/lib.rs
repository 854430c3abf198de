mod mesh_cache;
mod viewport;

pub use mesh_cache::{GpuMeshCache, GpuMeshCacheStats};
pub use viewport::{destroy_viewport_resources, ViewportRenderer, ViewportStats};
