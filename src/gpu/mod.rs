// GPU module - organizes all WebGPU wrapper types
// This module provides thin typed wrappers over host WebGPU objects:
// - Context management (adapter, device, canvas configuration)
// - Device error protocol (error scopes, device loss, uncaptured errors)
// - Buffer mapping, queue submission, pipeline and shader creation

pub mod buffer;
pub mod context;
pub mod device;
pub mod pipeline;
pub mod queue;
pub mod shaders;
