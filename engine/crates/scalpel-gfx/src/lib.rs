//! Vulkan GFX 层
//!
//! 负责两件事：
//! - 基于 SPIR-V 反射自动推导 vertex input 和 descriptor 布局，并与固定管线状态组合成 graphics pipeline
//! - 将 render target 转换为 render pass 与每个 backbuffer 的 framebuffer，并按 pipeline 分批录制命令
//!
//! 所有的 Vulkan 对象都通过注入的 [`GfxDevice`](foundation::device::GfxDevice) 创建和销毁，
//! 每个封装类型独占其 Vulkan 对象，在 `Drop` 时释放。
//!
//! # 使用示例
//! ```ignore
//! let device: Arc<dyn GfxDevice> = Arc::new(GfxAshDevice::new(ash_device, Some(debug_utils)));
//!
//! let mut render_pass_ci = GfxRenderPassCreateInfo::new(extent.width, extent.height, swapchain_image_cnt);
//! render_pass_ci.color_targets(vec![color_target]).depth_target(Some(depth_target));
//! let render_pass = GfxRenderPass::new(device.clone(), &render_pass_ci, "main")?;
//!
//! let mut pipeline_ci = GfxGraphicsPipelineCreateInfo::default();
//! pipeline_ci.vertex_shader_stage(vert_path, c"main").fragment_shader_stage(frag_path, c"main");
//! let pipeline = GfxGraphicsPipeline::new(device.clone(), &render_pass, &pipeline_ci, "opaque")?;
//! ```

pub mod basic;
pub mod commands;
pub mod descriptors;
pub mod error;
pub mod foundation;
pub mod pipelines;
pub mod render_pass;

#[cfg(test)]
pub(crate) mod testing;
