use ash::vk;

use crate::error::GfxResult;
use crate::pipelines::graphics_pipeline::GfxGraphicsPipeline;

/// 录制命令所需的 command buffer 能力
///
/// command buffer 的分配、提交由外部负责，这里只负责录制
pub trait GfxCommandEncoder {
    fn vk_handle(&self) -> vk::CommandBuffer;

    /// 开始录制 primary command buffer
    fn begin(&self, usage: vk::CommandBufferUsageFlags) -> GfxResult<()>;

    /// 开始录制在 `render_pass` 的 `subpass` 中执行的 secondary command buffer
    fn begin_secondary(
        &self,
        usage: vk::CommandBufferUsageFlags,
        render_pass: vk::RenderPass,
        subpass: u32,
    ) -> GfxResult<()>;

    fn end(&self) -> GfxResult<()>;

    // region render pass
    fn cmd_begin_render_pass(&self, begin_info: &vk::RenderPassBeginInfo, contents: vk::SubpassContents);
    fn cmd_execute_commands(&self, secondary_cmds: &[vk::CommandBuffer]);
    fn cmd_end_render_pass(&self);
    // endregion

    // region draw
    fn cmd_bind_pipeline(&self, bind_point: vk::PipelineBindPoint, pipeline: vk::Pipeline);
    fn cmd_bind_descriptor_sets(
        &self,
        bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        sets: &[vk::DescriptorSet],
    );
    fn cmd_bind_vertex_buffers(&self, first_binding: u32, buffers: &[vk::Buffer], offsets: &[vk::DeviceSize]);
    fn cmd_draw(&self, vertex_cnt: u32, instance_cnt: u32, first_vertex: u32, first_instance: u32);
    // endregion
}

/// 可以在已经绑定的 pipeline 上录制自身绘制命令的对象
pub trait GfxRenderItem {
    /// 调用时 `pipeline` 已经绑定到 `cmd` 上
    fn record_commands(&self, cmd: &dyn GfxCommandEncoder, pipeline: &GfxGraphicsPipeline);
}
