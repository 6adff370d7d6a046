use ash::vk;

use crate::descriptors::descriptor_layout::GfxDescriptorBinding;
use crate::error::GfxResult;
use crate::pipelines::graphics_pipeline::GfxGraphicsPipelineDesc;
use crate::render_pass::pass::GfxRenderPassDesc;

/// 设备能力的抽象
///
/// GFX 层的所有组件都通过构造参数拿到 `Arc<dyn GfxDevice>`，不依赖进程级别的单例。
/// 真实实现是 [`GfxAshDevice`](super::ash_device::GfxAshDevice)，测试中使用 mock device。
///
/// 参数均为自有的描述类型，而不是携带裸指针的 Vulkan create info，
/// 由具体实现负责转换为 Vulkan 结构体。
///
/// # 线程
/// 创建与销毁都是同步的 CPU 侧调用；同一个对象不应被并发地创建或销毁。
pub trait GfxDevice: Send + Sync {
    // region shader module
    fn create_shader_module(&self, code: &[u32], debug_name: &str) -> GfxResult<vk::ShaderModule>;
    fn destroy_shader_module(&self, module: vk::ShaderModule);
    // endregion

    // region layout
    fn create_descriptor_set_layout(
        &self,
        bindings: &[GfxDescriptorBinding],
        debug_name: &str,
    ) -> GfxResult<vk::DescriptorSetLayout>;
    fn destroy_descriptor_set_layout(&self, layout: vk::DescriptorSetLayout);

    /// 不包含 push constant range
    fn create_pipeline_layout(
        &self,
        set_layouts: &[vk::DescriptorSetLayout],
        debug_name: &str,
    ) -> GfxResult<vk::PipelineLayout>;
    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout);
    // endregion

    // region pipeline
    fn create_graphics_pipeline(&self, desc: &GfxGraphicsPipelineDesc, debug_name: &str) -> GfxResult<vk::Pipeline>;
    fn destroy_pipeline(&self, pipeline: vk::Pipeline);
    // endregion

    // region render pass
    fn create_render_pass(&self, desc: &GfxRenderPassDesc, debug_name: &str) -> GfxResult<vk::RenderPass>;
    fn destroy_render_pass(&self, render_pass: vk::RenderPass);

    /// layers 固定为 1
    fn create_framebuffer(
        &self,
        render_pass: vk::RenderPass,
        attachments: &[vk::ImageView],
        extent: vk::Extent2D,
        debug_name: &str,
    ) -> GfxResult<vk::Framebuffer>;
    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer);
    // endregion

    // region descriptor
    fn create_descriptor_pool(
        &self,
        flags: vk::DescriptorPoolCreateFlags,
        max_sets: u32,
        pool_sizes: &[vk::DescriptorPoolSize],
        debug_name: &str,
    ) -> GfxResult<vk::DescriptorPool>;
    /// pool 中分配的 descriptor set 会一起被释放
    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool);

    /// 为 `layouts` 中的每个 layout 分配一个 descriptor set
    fn allocate_descriptor_sets(
        &self,
        pool: vk::DescriptorPool,
        layouts: &[vk::DescriptorSetLayout],
    ) -> GfxResult<Vec<vk::DescriptorSet>>;
    /// pool 需要以 `FREE_DESCRIPTOR_SET` 创建
    fn free_descriptor_sets(&self, pool: vk::DescriptorPool, sets: &[vk::DescriptorSet]) -> GfxResult<()>;
    // endregion
}
