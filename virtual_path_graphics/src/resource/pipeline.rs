/// Linked vertex + fragment program with uniform setters
///
/// Attribute and uniform locations are looked up lazily and cached,
/// including misses: a name the program does not have is not an error,
/// setting it is simply a no-op.

use std::cell::RefCell;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::{
    BindingPoint, Capability, ContextRef, Handle, ObjectKind, Uniform, UniformLocation,
};
use crate::resource::{flatten_block, GraphicsResource, OwnedHandle, Shader, Texture, UniformBlock};
use crate::{engine_debug, engine_raise, engine_trace};

pub struct RenderPipeline {
    object: OwnedHandle,
    attributes: RefCell<FxHashMap<String, Option<u32>>>,
    uniforms: RefCell<FxHashMap<String, Option<UniformLocation>>>,
}

impl RenderPipeline {
    /// Link `vertex` and `fragment` into a program
    ///
    /// # Errors
    ///
    /// `PipelineLinkFailed` carrying the linker log. The program object is
    /// deleted before the error is returned.
    pub fn new(context: &ContextRef, vertex: &Shader, fragment: &Shader) -> Result<Self> {
        let mut object = OwnedHandle::create(context, ObjectKind::Program)?;
        let handle = object.require()?;

        let stages = [vertex.handle(), fragment.handle()];
        let shaders: Vec<Handle> = stages.iter().flatten().copied().collect();
        if shaders.len() != stages.len() {
            object.release();
            return Err(engine_raise!("vpgfx::Pipeline", Error::InvalidArgument(
                "cannot link a released shader".to_string()
            )));
        }

        let log = context.borrow_mut().device().link_program(handle, &shaders);
        if !log.is_empty() {
            object.release();
            return Err(engine_raise!("vpgfx::Pipeline", Error::PipelineLinkFailed(log)));
        }

        engine_debug!("vpgfx::Pipeline", "linked program {}", handle);
        Ok(Self {
            object,
            attributes: RefCell::new(FxHashMap::default()),
            uniforms: RefCell::new(FxHashMap::default()),
        })
    }

    // ===== LOCATIONS =====

    /// Vertex input location, `None` if the program has no such input
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        if let Some(cached) = self.attributes.borrow().get(name) {
            return *cached;
        }

        let handle = self.object.get()?;
        let location = self.object.context().borrow_mut().device().attribute_location(handle, name);
        self.attributes.borrow_mut().insert(name.to_string(), location);
        location
    }

    /// Uniform location, `None` if the program has no such uniform
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        if let Some(cached) = self.uniforms.borrow().get(name) {
            return *cached;
        }

        let handle = self.object.get()?;
        let location = self.object.context().borrow_mut().device().uniform_location(handle, name);
        if location.is_none() {
            engine_trace!("vpgfx::Pipeline", "program {} has no uniform '{}'", handle, name);
        }
        self.uniforms.borrow_mut().insert(name.to_string(), location);
        location
    }

    // ===== UNIFORMS =====

    /// Set one uniform (int, float, vec2-4, mat2-4)
    pub fn set_uniform(&self, name: &str, value: impl Into<Uniform>) -> Result<()> {
        self.apply_uniforms(&[(name.to_string(), value.into())])
    }

    /// Bind `texture` to texture `unit` and point the sampler `name` at it
    ///
    /// The texture stays bound on that unit for the draws that follow.
    pub fn set_uniform_texture(&self, name: &str, unit: u32, texture: &Texture) -> Result<()> {
        self.object.require()?;
        self.object
            .context()
            .borrow_mut()
            .set_binding(BindingPoint::Texture2D(unit), texture.handle());
        self.set_uniform(name, unit as i32)
    }

    /// Set every field of `block` as `prefix.field`
    ///
    /// The block is validated completely before anything is written: an
    /// unsupported field fails the call with no uniform changed.
    pub fn set_uniform_block(&self, prefix: &str, block: &dyn UniformBlock) -> Result<()> {
        let values = flatten_block(prefix, block)
            .map_err(|err| engine_raise!("vpgfx::Pipeline", err))?;
        self.apply_uniforms(&values)
    }

    fn apply_uniforms(&self, values: &[(String, Uniform)]) -> Result<()> {
        let handle = self.object.require()?;
        let located: Vec<(UniformLocation, &Uniform)> = values
            .iter()
            .filter_map(|(name, value)| self.uniform_location(name).map(|loc| (loc, value)))
            .collect();

        let mut ctx = self.object.context().borrow_mut();
        let mut bound = ctx.bind(BindingPoint::Program, Some(handle));
        for (location, value) in located {
            bound.device().set_uniform(location, value);
        }
        Ok(())
    }

    // ===== BINDING =====

    /// Make this the current program and enable depth testing
    ///
    /// Depth testing stays enabled after `unbind`.
    pub fn bind(&self) -> Result<()> {
        let handle = self.object.require()?;
        let mut ctx = self.object.context().borrow_mut();
        ctx.set_binding(BindingPoint::Program, Some(handle));
        ctx.device().enable(Capability::DepthTest);
        Ok(())
    }

    pub fn unbind(&self) {
        self.object
            .context()
            .borrow_mut()
            .set_binding(BindingPoint::Program, None);
    }
}

impl GraphicsResource for RenderPipeline {
    fn handle(&self) -> Option<Handle> {
        self.object.get()
    }

    fn release(&mut self) {
        self.object.release();
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
