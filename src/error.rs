//! Error types for the backdrop.
//!
//! This module provides error types for GPU initialization, configuration
//! loading, and running the native window host.

use std::fmt;

/// Errors that can occur while acquiring a rendering surface.
///
/// Any of these at start means the host has no usable graphics capability.
/// The lifecycle treats them as final for that start: the background is
/// simply not shown.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The host cannot provide a surface at all.
    Unsupported(String),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::Unsupported(msg) => write!(f, "Rendering surface unavailable: {}", msg),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors produced while loading or validating a [`BackdropConfig`](crate::BackdropConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// The palette has no colors to pick from.
    EmptyPalette,
    /// Point size must be finite and positive.
    InvalidPointSize(f32),
    /// Camera parameters do not describe a usable perspective projection.
    InvalidCamera(&'static str),
    /// Only 1 and 4 samples are guaranteed on every backend.
    InvalidSampleCount(u32),
    /// The JSON document could not be parsed.
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPalette => write!(f, "Palette must contain at least one color"),
            ConfigError::InvalidPointSize(size) => {
                write!(f, "Point size must be finite and positive, got {}", size)
            }
            ConfigError::InvalidCamera(msg) => write!(f, "Invalid camera: {}", msg),
            ConfigError::InvalidSampleCount(n) => {
                write!(f, "Sample count must be 1 or 4, got {}", n)
            }
            ConfigError::Json(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Errors that can occur when running the native window host.
#[derive(Debug)]
pub enum RunError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// The supplied configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            RunError::Window(e) => write!(f, "Failed to create window: {}", e),
            RunError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::EventLoop(e) => Some(e),
            RunError::Window(e) => Some(e),
            RunError::Config(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for RunError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RunError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for RunError {
    fn from(e: winit::error::OsError) -> Self {
        RunError::Window(e)
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}
