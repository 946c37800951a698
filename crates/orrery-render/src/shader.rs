//! Shader modules built from embedded WGSL.

use log::debug;
use thiserror::Error;
use wgpu::{ShaderModuleDescriptor, ShaderSource};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShaderError {
    #[error("shader '{name}' has no entry point '{entry_point}'")]
    MissingEntryPoint { name: String, entry_point: String },
}

/// Compile `source` as `name`.
///
/// Every name in `entry_points` must be declared in the source, otherwise
/// pipeline creation would fail later with a less useful message.
pub fn load_shader(
    device: &wgpu::Device,
    name: &str,
    source: &str,
    entry_points: &[&str],
) -> Result<wgpu::ShaderModule, ShaderError> {
    check_entry_points(name, source, entry_points)?;
    debug!("Compiling shader '{name}'");
    Ok(device.create_shader_module(ShaderModuleDescriptor {
        label: Some(name),
        source: ShaderSource::Wgsl(source.into()),
    }))
}

fn check_entry_points(name: &str, source: &str, entry_points: &[&str]) -> Result<(), ShaderError> {
    for entry_point in entry_points {
        if !source.contains(&format!("fn {entry_point}(")) {
            return Err(ShaderError::MissingEntryPoint {
                name: name.to_string(),
                entry_point: (*entry_point).to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{LINE_SHADER_SOURCE, LIT_SHADER_SOURCE, UNLIT_SHADER_SOURCE};
    use crate::texture::create_test_device_queue;

    #[test]
    fn test_embedded_sources_declare_entry_points() {
        for source in [LIT_SHADER_SOURCE, UNLIT_SHADER_SOURCE, LINE_SHADER_SOURCE] {
            assert_eq!(check_entry_points("s", source, &["vs_main", "fs_main"]), Ok(()));
        }
    }

    #[test]
    fn test_missing_entry_point_rejected() {
        let err = check_entry_points("broken", "@vertex fn vs_main() {}", &["vs_main", "fs_main"])
            .unwrap_err();
        assert_eq!(
            err,
            ShaderError::MissingEntryPoint {
                name: "broken".into(),
                entry_point: "fs_main".into(),
            }
        );
    }

    #[test]
    fn test_load_shader_checks_before_compiling() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        assert!(load_shader(&device, "line", LINE_SHADER_SOURCE, &["vs_main", "fs_main"]).is_ok());
        assert!(matches!(
            load_shader(&device, "line", LINE_SHADER_SOURCE, &["cs_main"]),
            Err(ShaderError::MissingEntryPoint { .. })
        ));
    }
}
