use std::collections::BTreeMap;
use std::sync::Arc;

use ash::vk;
use itertools::Itertools;

use crate::error::GfxResult;
use crate::foundation::device::GfxDevice;
use crate::pipelines::reflection::GfxReflectedBinding;

/// 合并之后的 descriptor binding，binding 号在一个 pipeline 内唯一
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GfxDescriptorBinding {
    pub binding: u32,
    pub descriptor_type: vk::DescriptorType,
    /// 目前固定为 1，不支持 descriptor 数组
    pub descriptor_count: u32,
    /// 所有引用了这个 binding 的 stage
    pub stage_flags: vk::ShaderStageFlags,
}

/// 合并多个 stage 反射得到的 descriptor binding
///
/// - stage 按照调用者给出的顺序处理；每个 stage 内部先按 binding 号升序排序
/// - 同一个 binding 出现在多个 stage 时，stage flags 取并集；类型以第一次出现的为准
/// - 结果按 binding 号升序排列
///
/// 只有一个 descriptor set，set 号不为 0 的 binding 也会按 binding 号合并到同一个 set 中
pub fn merge_descriptor_bindings(stages: &[(vk::ShaderStageFlags, &[GfxReflectedBinding])]) -> Vec<GfxDescriptorBinding> {
    let mut merged: BTreeMap<u32, GfxDescriptorBinding> = BTreeMap::new();

    for (stage, bindings) in stages {
        for reflected in bindings.iter().sorted_by_key(|b| b.binding) {
            if reflected.set != 0 {
                log::warn!(
                    "descriptor set {} is not supported, binding {} is merged into set 0",
                    reflected.set,
                    reflected.binding
                );
            }

            merged
                .entry(reflected.binding)
                .and_modify(|existing| {
                    if existing.descriptor_type != reflected.descriptor_type {
                        log::warn!(
                            "binding {} declared as {:?} and {:?} in different stages, keep the first one",
                            reflected.binding,
                            existing.descriptor_type,
                            reflected.descriptor_type
                        );
                    }
                    existing.stage_flags |= *stage;
                })
                .or_insert(GfxDescriptorBinding {
                    binding: reflected.binding,
                    descriptor_type: reflected.descriptor_type,
                    descriptor_count: 1,
                    stage_flags: *stage,
                });
        }
    }

    merged.into_values().collect()
}

/// descriptor set layout 的 RAII 封装
pub struct GfxDescriptorSetLayout {
    handle: vk::DescriptorSetLayout,
    device: Arc<dyn GfxDevice>,
    name: String,
}
// new & init
impl GfxDescriptorSetLayout {
    pub fn new(device: Arc<dyn GfxDevice>, bindings: &[GfxDescriptorBinding], debug_name: &str) -> GfxResult<Self> {
        let handle = device.create_descriptor_set_layout(bindings, debug_name)?;
        log::info!("create descriptor set layout {}: {:?}", debug_name, handle);
        Ok(Self {
            handle,
            device,
            name: debug_name.to_string(),
        })
    }
}
// getters
impl GfxDescriptorSetLayout {
    #[inline]
    pub fn handle(&self) -> vk::DescriptorSetLayout {
        self.handle
    }
}
impl Drop for GfxDescriptorSetLayout {
    fn drop(&mut self) {
        log::info!("destroy descriptor set layout {}: {:?}", self.name, self.handle);
        self.device.destroy_descriptor_set_layout(self.handle);
    }
}
