use ash::vk;
use itertools::Itertools;

use crate::basic::format::format_byte_size;
use crate::error::{GfxError, GfxResult};
use crate::pipelines::reflection::GfxReflectedInput;

/// 由 vertex shader 的输入推导出来的 vertex input 布局
///
/// 只支持一个 vertex buffer，所有 attribute 都位于 [`Self::BINDING`]，紧密排列
#[derive(Debug, Clone)]
pub struct GfxVertexInputLayout {
    bindings: Vec<vk::VertexInputBindingDescription>,
    attributes: Vec<vk::VertexInputAttributeDescription>,
}
// new & init
impl GfxVertexInputLayout {
    pub const BINDING: u32 = 0;

    /// 按照 location 升序排列 attribute，offset 为之前所有 attribute 大小的累加
    ///
    /// 没有输入时返回 `None`，此时 pipeline 不需要任何 vertex buffer
    pub fn from_reflected_inputs(inputs: &[GfxReflectedInput]) -> GfxResult<Option<Self>> {
        if inputs.is_empty() {
            return Ok(None);
        }

        let mut offset = 0;
        let mut attributes = Vec::with_capacity(inputs.len());
        for input in inputs.iter().sorted_by_key(|input| input.location) {
            let size = format_byte_size(input.format).ok_or_else(|| {
                GfxError::reflection(
                    "vertex input",
                    format!("unknown size of format {:?} at location {}", input.format, input.location),
                )
            })?;
            attributes.push(
                vk::VertexInputAttributeDescription::default()
                    .location(input.location)
                    .binding(Self::BINDING)
                    .format(input.format)
                    .offset(offset),
            );
            offset += size;
        }

        let bindings = vec![
            vk::VertexInputBindingDescription::default()
                .binding(Self::BINDING)
                .stride(offset)
                .input_rate(vk::VertexInputRate::VERTEX),
        ];

        log::debug!("vertex input layout: {} attributes, stride {}", attributes.len(), offset);
        Ok(Some(Self { bindings, attributes }))
    }
}
// getters
impl GfxVertexInputLayout {
    #[inline]
    pub fn bindings(&self) -> &[vk::VertexInputBindingDescription] {
        &self.bindings
    }

    #[inline]
    pub fn attributes(&self) -> &[vk::VertexInputAttributeDescription] {
        &self.attributes
    }

    #[inline]
    pub fn stride(&self) -> u32 {
        self.bindings[0].stride
    }
}
