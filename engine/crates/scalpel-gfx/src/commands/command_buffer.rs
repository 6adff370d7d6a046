use ash::vk;

use crate::commands::command_encoder::GfxCommandEncoder;
use crate::error::{GfxError, GfxResult};

/// 基于 `ash::Device` 的 command buffer 封装
///
/// command buffer 由外部的 command pool 分配和回收，这里只负责录制。
///
/// # 使用示例
/// ```ignore
/// let cmd = GfxCommandBuffer::new(device.clone(), vk_cmd, "frame-0");
/// cmd.begin(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT)?;
/// render_pass.record_commands(&cmd, frame_index);
/// cmd.end()?;
/// ```
#[derive(Clone)]
pub struct GfxCommandBuffer {
    vk_handle: vk::CommandBuffer,
    device: ash::Device,

    #[cfg(debug_assertions)]
    name: String,
}
// new & init
impl GfxCommandBuffer {
    pub fn new(device: ash::Device, vk_handle: vk::CommandBuffer, debug_name: &str) -> Self {
        #[cfg(not(debug_assertions))]
        let _ = debug_name;

        Self {
            vk_handle,
            device,

            #[cfg(debug_assertions)]
            name: debug_name.to_string(),
        }
    }
}
// getters
impl GfxCommandBuffer {
    #[cfg(debug_assertions)]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}
impl GfxCommandEncoder for GfxCommandBuffer {
    #[inline]
    fn vk_handle(&self) -> vk::CommandBuffer {
        self.vk_handle
    }

    fn begin(&self, usage: vk::CommandBufferUsageFlags) -> GfxResult<()> {
        let begin_info = vk::CommandBufferBeginInfo::default().flags(usage);
        unsafe { self.device.begin_command_buffer(self.vk_handle, &begin_info) }
            .map_err(|e| GfxError::device("command buffer begin", e))
    }

    fn begin_secondary(
        &self,
        usage: vk::CommandBufferUsageFlags,
        render_pass: vk::RenderPass,
        subpass: u32,
    ) -> GfxResult<()> {
        // framebuffer 未知，由执行时的 render pass instance 决定
        let inheritance_info = vk::CommandBufferInheritanceInfo::default().render_pass(render_pass).subpass(subpass);
        let begin_info = vk::CommandBufferBeginInfo::default().flags(usage).inheritance_info(&inheritance_info);
        unsafe { self.device.begin_command_buffer(self.vk_handle, &begin_info) }
            .map_err(|e| GfxError::device("secondary command buffer begin", e))
    }

    fn end(&self) -> GfxResult<()> {
        unsafe { self.device.end_command_buffer(self.vk_handle) }.map_err(|e| GfxError::device("command buffer end", e))
    }

    /// - command type: action, state
    /// - supported queue types: graphics
    #[inline]
    fn cmd_begin_render_pass(&self, begin_info: &vk::RenderPassBeginInfo, contents: vk::SubpassContents) {
        unsafe { self.device.cmd_begin_render_pass(self.vk_handle, begin_info, contents) }
    }

    /// - command type: indirection
    /// - supported queue types: transfer, graphics, compute
    #[inline]
    fn cmd_execute_commands(&self, secondary_cmds: &[vk::CommandBuffer]) {
        unsafe { self.device.cmd_execute_commands(self.vk_handle, secondary_cmds) }
    }

    /// - command type: action, state
    /// - supported queue types: graphics
    #[inline]
    fn cmd_end_render_pass(&self) {
        unsafe { self.device.cmd_end_render_pass(self.vk_handle) }
    }

    /// - command type: state
    /// - supported queue types: graphics, compute
    #[inline]
    fn cmd_bind_pipeline(&self, bind_point: vk::PipelineBindPoint, pipeline: vk::Pipeline) {
        unsafe { self.device.cmd_bind_pipeline(self.vk_handle, bind_point, pipeline) }
    }

    /// - command type: state
    /// - supported queue types: graphics, compute
    #[inline]
    fn cmd_bind_descriptor_sets(
        &self,
        bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        sets: &[vk::DescriptorSet],
    ) {
        unsafe { self.device.cmd_bind_descriptor_sets(self.vk_handle, bind_point, layout, first_set, sets, &[]) }
    }

    /// - command type: state
    /// - supported queue types: graphics
    #[inline]
    fn cmd_bind_vertex_buffers(&self, first_binding: u32, buffers: &[vk::Buffer], offsets: &[vk::DeviceSize]) {
        unsafe { self.device.cmd_bind_vertex_buffers(self.vk_handle, first_binding, buffers, offsets) }
    }

    /// - command type: action
    /// - supported queue types: graphics
    #[inline]
    fn cmd_draw(&self, vertex_cnt: u32, instance_cnt: u32, first_vertex: u32, first_instance: u32) {
        unsafe { self.device.cmd_draw(self.vk_handle, vertex_cnt, instance_cnt, first_vertex, first_instance) }
    }
}
