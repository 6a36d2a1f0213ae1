//! Shader module cache keyed by variant name.
//!
//! WGSL that fails validation is fatal: wgpu's default error handler panics
//! with a "Validation Error" when the module is created.

use log::{debug, info};
use std::{collections::HashMap, sync::Arc};
use wgpu::{ShaderModuleDescriptor, ShaderSource};

/// Compiled shader modules, one per name.
#[derive(Default)]
pub struct ShaderLibrary {
    modules: HashMap<String, Arc<wgpu::ShaderModule>>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `source` under `name`, replacing any module of that name.
    pub fn load_from_source(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: &str,
    ) -> Arc<wgpu::ShaderModule> {
        debug!("Compiling shader '{name}' ({} bytes of WGSL)", source.len());
        let module = Arc::new(device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        }));
        if self
            .modules
            .insert(name.to_string(), Arc::clone(&module))
            .is_some()
        {
            info!("Replaced shader '{name}'");
        } else {
            info!("Loaded shader '{name}'");
        }
        module
    }

    /// Return the cached module for `name`, compiling `source()` on first use.
    pub fn get_or_load(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        source: impl FnOnce() -> String,
    ) -> Arc<wgpu::ShaderModule> {
        match self.modules.get(name) {
            Some(module) => Arc::clone(module),
            None => self.load_from_source(device, name, &source()),
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
