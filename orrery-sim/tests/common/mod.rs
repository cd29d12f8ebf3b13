#![allow(dead_code)]

use glam::{Mat3, Mat4};
use orrery_types::InstanceSink;

/// Instance sink backed by plain vectors, mirroring a pair of GPU buffers.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub models: Vec<Mat4>,
    pub normals: Vec<Mat3>,
    pub reallocations: usize,
    pub uploads: usize,
    pub last_upload_len: usize,
}

impl RecordingSink {
    pub fn capacity(&self) -> usize {
        self.models.len()
    }

    pub fn model_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.models)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }
}

impl InstanceSink for RecordingSink {
    fn reallocate(&mut self, capacity: usize) {
        self.models = vec![Mat4::ZERO; capacity];
        self.normals = vec![Mat3::ZERO; capacity];
        self.reallocations += 1;
    }

    fn upload(&mut self, models: &[Mat4], normals: &[Mat3]) {
        assert_eq!(models.len(), normals.len());
        assert!(models.len() <= self.capacity(), "upload past capacity");
        self.models[..models.len()].copy_from_slice(models);
        self.normals[..normals.len()].copy_from_slice(normals);
        self.uploads += 1;
        self.last_upload_len = models.len();
    }
}
