//! # Buffer State Module
//!
//! Named registry for every GPU buffer the viewer allocates: the camera uniform, the
//! per-draw instance uniforms and the two static meshes.
//!
//! ## Architecture
//!
//! Buffers are referenced by a static name and created once when the renderer comes
//! up. Writes are bounds checked against the allocated size and recorded in a small
//! analytics table. When the registry is dropped every buffer is destroyed exactly
//! once, which also covers a renderer that failed half way through construction.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};
use wgpu::{util::DeviceExt, Buffer, Device, Queue};

use crate::error::RenderError;

/// Memory and write statistics for one buffer.
#[derive(Debug, Clone, Copy, Default)]
struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    allocated_memory: u64,
    /// Highest byte written so far
    used_memory: u64,
    /// Number of writes issued
    times_written: u64,
}

/// Central manager for GPU buffers.
///
/// Lookups and writes return [`RenderError::MissingResource`] for unknown names and
/// [`RenderError::BufferOverflow`] for out-of-range writes instead of panicking.
pub struct BufferState {
    device: Rc<Device>,
    queue: Rc<Queue>,
    buffers: HashMap<&'static str, Buffer>,
    buffer_analytics: RefCell<HashMap<&'static str, BufferAnalytics>>,
}

impl BufferState {
    /// Creates an empty registry bound to a device and its queue.
    pub fn new(device: Rc<Device>, queue: Rc<Queue>) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            buffer_analytics: RefCell::new(HashMap::new()),
        }
    }

    /// Allocates an uninitialized buffer under `buffer_name`.
    ///
    /// An existing buffer with the same name is destroyed first.
    pub fn create_buffer(&mut self, buffer_name: &'static str, buffer_descriptor: wgpu::BufferDescriptor) {
        let buffer = self.device.create_buffer(&buffer_descriptor);
        self.insert(
            buffer_name,
            buffer,
            BufferAnalytics {
                allocated_memory: buffer_descriptor.size,
                ..Default::default()
            },
        );
    }

    /// Allocates a buffer filled with `init_descriptor.contents`.
    pub fn create_buffer_init(
        &mut self,
        buffer_name: &'static str,
        init_descriptor: wgpu::util::BufferInitDescriptor,
    ) {
        let size = init_descriptor.contents.len() as u64;
        let buffer = self.device.create_buffer_init(&init_descriptor);
        self.insert(
            buffer_name,
            buffer,
            BufferAnalytics {
                allocated_memory: size,
                used_memory: size,
                times_written: 1,
            },
        );
    }

    fn insert(&mut self, buffer_name: &'static str, buffer: Buffer, analytics: BufferAnalytics) {
        debug!(
            "Creating GPU buffer '{}' ({} bytes)",
            buffer_name, analytics.allocated_memory
        );
        if let Some(previous) = self.buffers.insert(buffer_name, buffer) {
            previous.destroy();
        }
        self.buffer_analytics.borrow_mut().insert(buffer_name, analytics);
    }

    /// Queues a write of `data` into the named buffer at `offset`.
    ///
    /// # Errors
    ///
    /// * [`RenderError::MissingResource`] if no buffer has that name
    /// * [`RenderError::BufferOverflow`] if the write would run past the allocation
    pub fn write_buffer(
        &self,
        buffer_name: &'static str,
        offset: wgpu::BufferAddress,
        data: &[u8],
    ) -> Result<(), RenderError> {
        let buffer = self.get_buffer(buffer_name)?;
        let mut analytics_table = self.buffer_analytics.borrow_mut();
        let analytics = analytics_table.entry(buffer_name).or_default();

        let len = data.len() as u64;
        if offset + len > buffer.size() {
            return Err(RenderError::BufferOverflow {
                name: buffer_name,
                offset,
                len,
                capacity: buffer.size(),
            });
        }

        self.queue.write_buffer(buffer, offset, data);
        analytics.used_memory = analytics.used_memory.max(offset + len);
        analytics.times_written += 1;
        Ok(())
    }

    /// Looks up a buffer by name.
    pub fn get_buffer(&self, buffer_name: &'static str) -> Result<&Buffer, RenderError> {
        self.buffers.get(buffer_name).ok_or(RenderError::MissingResource {
            kind: "buffer",
            name: buffer_name,
        })
    }

    /// Total bytes allocated across all buffers.
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .borrow()
            .values()
            .map(|analytics| analytics.allocated_memory)
            .sum()
    }

    /// Total bytes written across all buffers, counted up to each buffer's high-water mark.
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics
            .borrow()
            .values()
            .map(|analytics| analytics.used_memory)
            .sum()
    }
}

impl Drop for BufferState {
    fn drop(&mut self) {
        let count = self.buffers.len();
        let writes: u64 = self
            .buffer_analytics
            .borrow()
            .values()
            .map(|analytics| analytics.times_written)
            .sum();
        let allocated = self.get_total_allocated_memory();

        for (_, buffer) in self.buffers.drain() {
            buffer.destroy();
        }
        info!(
            "Released {} GPU buffers ({} bytes allocated, {} writes)",
            count, allocated, writes
        );
    }
}
