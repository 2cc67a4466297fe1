/// Typed GPU buffer
///
/// `Buffer<T>` is a fixed-length array of plain-old-data elements living in
/// driver memory. The element count is set at creation and every full
/// upload must match it.

use std::marker::PhantomData;
use std::mem::size_of;
use bytemuck::Pod;

use crate::error::{Error, Result};
use crate::graphics_device::{
    BindingPoint, BufferTarget, BufferUsage, ContextRef, GraphicsDevice, Handle, ObjectKind,
};
use crate::resource::{GraphicsResource, OwnedHandle};
use crate::{engine_raise, engine_trace};

pub struct Buffer<T: Pod> {
    object: OwnedHandle,
    target: BufferTarget,
    usage: BufferUsage,
    len: usize,
    _element: PhantomData<T>,
}

impl<T: Pod> Buffer<T> {
    /// Allocate `len` zero-initialized elements
    pub fn new(context: &ContextRef, target: BufferTarget, usage: BufferUsage, len: usize) -> Result<Self> {
        let buffer = Self {
            object: OwnedHandle::create(context, ObjectKind::Buffer)?,
            target,
            usage,
            len,
            _element: PhantomData,
        };

        let zeroed = vec![T::zeroed(); len];
        buffer.with_bound(|device| {
            device.buffer_data(target, bytemuck::cast_slice(&zeroed), usage);
        })?;

        engine_trace!("vpgfx::Buffer", "allocated {:?} buffer, {} bytes", target, buffer.size_bytes());
        Ok(buffer)
    }

    /// Allocate and fill from `data`
    pub fn from_slice(context: &ContextRef, target: BufferTarget, usage: BufferUsage, data: &[T]) -> Result<Self> {
        let buffer = Self::new(context, target, usage, data.len())?;
        buffer.set_data(data, 0)?;
        Ok(buffer)
    }

    /// Upload `data` starting at element `offset`
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `data.len()` differs from the buffer length or the
    /// write would run past the end.
    pub fn set_data(&self, data: &[T], offset: usize) -> Result<()> {
        if data.len() != self.len {
            return Err(engine_raise!("vpgfx::Buffer", Error::InvalidArgument(format!(
                "data length {} does not match buffer length {}", data.len(), self.len
            ))));
        }
        self.check_range(offset, data.len())?;

        let target = self.target;
        self.with_bound(|device| {
            device.buffer_sub_data(target, offset * size_of::<T>(), bytemuck::cast_slice(data));
        })
    }

    /// Overwrite the single element at `offset`
    pub fn set_element(&self, value: &T, offset: usize) -> Result<()> {
        self.check_range(offset, 1)?;

        let target = self.target;
        self.with_bound(|device| {
            device.buffer_sub_data(target, offset * size_of::<T>(), bytemuck::bytes_of(value));
        })
    }

    /// Read the whole buffer back
    pub fn get_data(&self) -> Result<Vec<T>> {
        let target = self.target;
        let size = self.size_bytes();
        let bytes = self.with_bound(|device| device.read_buffer(target, 0, size))??;
        Ok(bytemuck::pod_collect_to_vec(&bytes))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn size_bytes(&self) -> usize {
        self.len * size_of::<T>()
    }

    fn check_range(&self, offset: usize, count: usize) -> Result<()> {
        if offset.checked_add(count).map_or(true, |end| end > self.len) {
            return Err(engine_raise!("vpgfx::Buffer", Error::InvalidArgument(format!(
                "{} elements at offset {} out of range for buffer length {}", count, offset, self.len
            ))));
        }
        Ok(())
    }

    /// Run `f` with this buffer bound on its target and no vertex array bound
    fn with_bound<R>(&self, f: impl FnOnce(&mut dyn GraphicsDevice) -> R) -> Result<R> {
        let handle = self.object.require()?;
        let mut ctx = self.object.context().borrow_mut();
        // index buffer binds are vertex array state; keep them out of whatever array is bound
        let mut detached = ctx.bind(BindingPoint::VertexArray, None);
        let mut bound = detached.bind(BindingPoint::Buffer(self.target), Some(handle));
        Ok(f(bound.device()))
    }
}

impl<T: Pod> GraphicsResource for Buffer<T> {
    fn handle(&self) -> Option<Handle> {
        self.object.get()
    }

    fn release(&mut self) {
        self.object.release();
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
