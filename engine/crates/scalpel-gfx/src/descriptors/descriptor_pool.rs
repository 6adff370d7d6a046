use std::sync::Arc;

use ash::vk;
use itertools::Itertools;

use crate::descriptors::descriptor_layout::GfxDescriptorBinding;
use crate::error::GfxResult;
use crate::foundation::device::GfxDevice;

/// descriptor pool 的 RAII 封装
///
/// 由 pipeline 合并后的 binding 决定大小：每个 binding 对应一个 pool size。
/// 创建时带有 `FREE_DESCRIPTOR_SET`，分配出的 set 可以单独释放；
/// pool 销毁时，所有从中分配的 set 一同失效。
pub struct GfxDescriptorPool {
    handle: vk::DescriptorPool,
    pool_sizes: Vec<vk::DescriptorPoolSize>,
    max_sets: u32,

    device: Arc<dyn GfxDevice>,
    name: String,
}
// new & init
impl GfxDescriptorPool {
    pub fn new(
        device: Arc<dyn GfxDevice>,
        bindings: &[GfxDescriptorBinding],
        max_sets: u32,
        debug_name: &str,
    ) -> GfxResult<Self> {
        let pool_sizes = bindings
            .iter()
            .map(|binding| {
                vk::DescriptorPoolSize::default().ty(binding.descriptor_type).descriptor_count(binding.descriptor_count)
            })
            .collect_vec();

        let handle = device.create_descriptor_pool(
            vk::DescriptorPoolCreateFlags::FREE_DESCRIPTOR_SET,
            max_sets,
            &pool_sizes,
            debug_name,
        )?;
        log::info!("create descriptor pool {}: {:?}, max sets {}", debug_name, handle, max_sets);

        Ok(Self {
            handle,
            pool_sizes,
            max_sets,
            device,
            name: debug_name.to_string(),
        })
    }
}
// getters
impl GfxDescriptorPool {
    #[inline]
    pub fn handle(&self) -> vk::DescriptorPool {
        self.handle
    }

    #[inline]
    pub fn pool_sizes(&self) -> &[vk::DescriptorPoolSize] {
        &self.pool_sizes
    }

    #[inline]
    pub fn max_sets(&self) -> u32 {
        self.max_sets
    }
}
// tools
impl GfxDescriptorPool {
    /// 使用同一个 layout 分配 `count` 个 descriptor set
    pub fn allocate_sets(&self, layout: vk::DescriptorSetLayout, count: u32) -> GfxResult<Vec<vk::DescriptorSet>> {
        let layouts = vec![layout; count as usize];
        self.device.allocate_descriptor_sets(self.handle, &layouts)
    }

    pub fn free_sets(&self, sets: &[vk::DescriptorSet]) -> GfxResult<()> {
        if sets.is_empty() {
            return Ok(());
        }
        self.device.free_descriptor_sets(self.handle, sets)
    }
}
impl Drop for GfxDescriptorPool {
    fn drop(&mut self) {
        log::info!("destroy descriptor pool {}: {:?}", self.name, self.handle);
        self.device.destroy_descriptor_pool(self.handle);
    }
}

/// 分配结果：pool 与从中分配的 set，二者归调用者所有
///
/// set 通过 pool 释放；drop 时 pool 被销毁，set 随之失效
pub struct GfxDescriptorData {
    pub pool: GfxDescriptorPool,
    pub sets: Vec<vk::DescriptorSet>,
}
impl GfxDescriptorData {
    /// 释放所有的 set，pool 依然可用
    pub fn free_all(&mut self) -> GfxResult<()> {
        self.pool.free_sets(&self.sets)?;
        self.sets.clear();
        Ok(())
    }
}
