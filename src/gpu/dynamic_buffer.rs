//! Dynamic GPU buffer management with automatic resizing.
//!
//! Per-frame data (entity instance streams, refreshed meshes) varies in
//! length; buffers grow with a 2x strategy to minimize reallocations and
//! never shrink (GPU buffers cannot be resized in place).

use wgpu::util::DeviceExt;

/// A growable GPU buffer of `Pod` items.
///
/// Tracks item count rather than byte length.
pub struct TypedBuffer<T> {
    buffer: wgpu::Buffer,
    capacity: usize, // Capacity in bytes
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: std::marker::PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Empty buffer with capacity for `capacity` items.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        // Minimum 64 bytes so zero-capacity requests still allocate.
        let capacity_bytes = (size_of::<T>() * capacity).max(64);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity_bytes as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            capacity: capacity_bytes,
            count: 0,
            usage,
            label: label.to_owned(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Buffer initialized from existing data.
    pub fn new_with_data(
        device: &wgpu::Device,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let data_bytes: &[u8] = bytemuck::cast_slice(data);

        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data_bytes,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            });

        Self {
            buffer,
            capacity: data_bytes.len().max(64),
            count: data.len(),
            usage,
            label: label.to_owned(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Write data to the buffer, growing if necessary.
    ///
    /// Returns `true` if the buffer was reallocated (bind groups referencing
    /// it need recreation).
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let data_bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = data_bytes.len();

        let reallocated = if needed > self.capacity {
            // 2x growth, minimum 1KB step
            let new_capacity = (needed * 2).max(self.capacity + 1024);

            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&self.label),
                size: new_capacity as u64,
                usage: self.usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, data_bytes);
        }
        self.count = data.len();

        reallocated
    }

    /// The underlying GPU buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of items currently stored.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` if no items are stored.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current capacity in items.
    pub fn capacity(&self) -> usize {
        self.capacity / size_of::<T>()
    }
}
