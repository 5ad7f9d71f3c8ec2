//! Unit tests for config.rs

use crate::config::Config;
use std::path::PathBuf;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.shader_directory, PathBuf::from("shaders"));
    assert_eq!(config.max_uniform_binding_points, None);
    assert_eq!(config.max_storage_binding_points, None);
    assert_eq!(config.unbounded_array_capacity, 64);
    assert_eq!(config.shadow_map_texture_unit, 0);
}

#[test]
fn test_clamp_without_cap_uses_hardware() {
    assert_eq!(Config::clamp_binding_points(None, 36), 36);
}

#[test]
fn test_clamp_cap_below_hardware() {
    assert_eq!(Config::clamp_binding_points(Some(4), 36), 4);
}

#[test]
fn test_clamp_cap_above_hardware() {
    assert_eq!(Config::clamp_binding_points(Some(128), 16), 16);
}
