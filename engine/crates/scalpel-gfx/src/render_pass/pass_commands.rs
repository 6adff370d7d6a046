use ash::vk::{self, Handle};
use itertools::Itertools;

use crate::commands::command_encoder::{GfxCommandEncoder, GfxRenderItem};
use crate::error::GfxResult;
use crate::pipelines::graphics_pipeline::GfxGraphicsPipeline;
use crate::render_pass::pass::GfxRenderPass;

/// 一个绘制项：render item 与它使用的 pipeline，任意一方缺失时跳过
pub type GfxDrawPair<'a> = (Option<&'a dyn GfxRenderItem>, Option<&'a GfxGraphicsPipeline>);

// 命令录制
impl GfxRenderPass {
    /// 将所有绘制项录制到 secondary command buffer 中
    ///
    /// 按照 pipeline 排序以减少 pipeline 的切换；排序是稳定的，使用同一个 pipeline 的绘制项保持输入顺序。
    /// 相邻的绘制项使用同一个 pipeline 时只绑定一次。
    ///
    /// 再次调用会用新的 command buffer 替换之前记录的
    pub fn build_command_buffer(&mut self, cmd: &dyn GfxCommandEncoder, items: &[GfxDrawPair<'_>]) -> GfxResult<()> {
        let sorted_items = items
            .iter()
            .sorted_by_key(|(_, pipeline)| pipeline.map(|p| p.handle().as_raw()))
            .filter_map(|(item, pipeline)| Some(((*item)?, (*pipeline)?)))
            .collect_vec();

        cmd.begin_secondary(
            vk::CommandBufferUsageFlags::RENDER_PASS_CONTINUE | vk::CommandBufferUsageFlags::SIMULTANEOUS_USE,
            self.handle(),
            0,
        )?;

        let mut bound_pipeline = vk::Pipeline::null();
        for (item, pipeline) in sorted_items {
            if pipeline.handle() != bound_pipeline {
                cmd.cmd_bind_pipeline(vk::PipelineBindPoint::GRAPHICS, pipeline.handle());
                bound_pipeline = pipeline.handle();
            }
            item.record_commands(cmd, pipeline);
        }

        cmd.end()?;

        if let Some(old_cmd) = self.secondary_cmd.replace(cmd.vk_handle()) {
            log::warn!("render pass {} rebuilt its secondary command buffer {:?}", self.name(), old_cmd);
        }
        Ok(())
    }

    /// 在 primary command buffer 上执行之前录制的 secondary command buffer
    ///
    /// # panics
    /// - 还没有调用过 [`Self::build_command_buffer`]
    /// - `frame_index` 超出 backbuffer 数量
    pub fn record_commands(&self, cmd: &dyn GfxCommandEncoder, frame_index: usize) {
        let secondary_cmd = self
            .secondary_cmd
            .unwrap_or_else(|| panic!("render pass {} has no secondary command buffer", self.name()));
        let framebuffer = self.framebuffers().get(frame_index).unwrap_or_else(|| {
            panic!(
                "frame index {} out of range, render pass {} has {} framebuffers",
                frame_index,
                self.name(),
                self.framebuffers().len()
            )
        });

        let begin_info = vk::RenderPassBeginInfo::default()
            .render_pass(self.handle())
            .framebuffer(framebuffer.handle())
            .render_area(vk::Rect2D {
                offset: vk::Offset2D { x: 0, y: 0 },
                extent: self.extent(),
            })
            .clear_values(self.clear_values());

        cmd.cmd_begin_render_pass(&begin_info, vk::SubpassContents::SECONDARY_COMMAND_BUFFERS);
        cmd.cmd_execute_commands(std::slice::from_ref(&secondary_cmd));
        cmd.cmd_end_render_pass();
    }
}
