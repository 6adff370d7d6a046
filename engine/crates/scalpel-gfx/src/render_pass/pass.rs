use std::sync::Arc;

use ash::vk;
use itertools::Itertools;

use crate::error::GfxResult;
use crate::foundation::device::GfxDevice;
use crate::render_pass::render_target::GfxRenderTarget;

/// 传递给 [`GfxDevice::create_render_pass`] 的描述，只包含一个 subpass
///
/// attachment 在 `attachments` 中的下标与 reference 中的下标一致，depth attachment 位于所有 color attachment 之后
#[derive(Debug, Clone, Default)]
pub struct GfxRenderPassDesc {
    pub attachments: Vec<vk::AttachmentDescription>,
    pub color_refs: Vec<vk::AttachmentReference>,
    pub depth_ref: Option<vk::AttachmentReference>,
    pub dependencies: Vec<vk::SubpassDependency>,
}

/// 创建 render pass 需要的信息
pub struct GfxRenderPassCreateInfo {
    color_targets: Vec<GfxRenderTarget>,
    depth_target: Option<GfxRenderTarget>,
    extent: vk::Extent2D,
    backbuffer_count: u32,
    external_dependency: bool,
}
// new & init
impl GfxRenderPassCreateInfo {
    pub fn new(width: u32, height: u32, backbuffer_count: u32) -> Self {
        Self {
            color_targets: vec![],
            depth_target: None,
            extent: vk::Extent2D { width, height },
            backbuffer_count,
            external_dependency: false,
        }
    }
}
/// builder
impl GfxRenderPassCreateInfo {
    #[inline]
    pub fn color_targets(&mut self, targets: Vec<GfxRenderTarget>) -> &mut Self {
        self.color_targets = targets;
        self
    }

    #[inline]
    pub fn depth_target(&mut self, target: Option<GfxRenderTarget>) -> &mut Self {
        self.depth_target = target;
        self
    }

    /// 添加一个 EXTERNAL -> subpass 0 的依赖，等待之前对 attachment 的写入完成
    ///
    /// 默认不添加，由外部的 frame loop 负责同步
    #[inline]
    pub fn external_dependency(&mut self, enable: bool) -> &mut Self {
        self.external_dependency = enable;
        self
    }
}

/// framebuffer 的 RAII 封装，由 render pass 持有
pub struct GfxFramebuffer {
    handle: vk::Framebuffer,
    attachment_count: usize,
    device: Arc<dyn GfxDevice>,
}
impl GfxFramebuffer {
    fn new(
        device: Arc<dyn GfxDevice>,
        render_pass: vk::RenderPass,
        views: &[vk::ImageView],
        extent: vk::Extent2D,
        debug_name: &str,
    ) -> GfxResult<Self> {
        let handle = device.create_framebuffer(render_pass, views, extent, debug_name)?;
        Ok(Self {
            handle,
            attachment_count: views.len(),
            device,
        })
    }

    #[inline]
    pub fn handle(&self) -> vk::Framebuffer {
        self.handle
    }

    #[inline]
    pub fn attachment_count(&self) -> usize {
        self.attachment_count
    }
}
impl Drop for GfxFramebuffer {
    fn drop(&mut self) {
        self.device.destroy_framebuffer(self.handle);
    }
}

/// 只有一个 subpass 的 render pass，以及每个 backbuffer 对应的 framebuffer
pub struct GfxRenderPass {
    handle: vk::RenderPass,
    framebuffers: Vec<GfxFramebuffer>,

    attachment_descriptions: Vec<vk::AttachmentDescription>,
    color_attachment_count: usize,
    has_depth: bool,
    clear_values: Vec<vk::ClearValue>,
    extent: vk::Extent2D,

    /// 由 build_command_buffer 录制的 secondary command buffer
    pub(super) secondary_cmd: Option<vk::CommandBuffer>,

    device: Arc<dyn GfxDevice>,
    name: String,
}
// new & init
impl GfxRenderPass {
    /// # panics
    /// - 某个 target 没有 image view
    /// - 某个 target 的 image view 多于 backbuffer 数量
    ///
    /// image view 少于 backbuffer 数量的 target 会循环使用，例如所有 backbuffer 共享同一个 depth image
    pub fn new(device: Arc<dyn GfxDevice>, ci: &GfxRenderPassCreateInfo, debug_name: &str) -> GfxResult<Self> {
        let backbuffer_count = ci.backbuffer_count as usize;
        let color_attachment_count = ci.color_targets.len();
        let has_depth = ci.depth_target.is_some();

        // depth target 放在所有 color target 之后
        let targets = ci.color_targets.iter().chain(ci.depth_target.iter()).collect_vec();
        for (idx, target) in targets.iter().enumerate() {
            assert!(!target.image_views.is_empty(), "render target {idx} of {debug_name} has no image view");
            assert!(
                target.image_views.len() <= backbuffer_count,
                "render target {idx} of {debug_name} has {} image views, but only {backbuffer_count} backbuffers",
                target.image_views.len()
            );
        }

        let mut desc = GfxRenderPassDesc::default();
        let mut clear_values = Vec::with_capacity(targets.len());
        for (idx, target) in targets.iter().enumerate() {
            clear_values.push(target.clear_value);

            let reference = vk::AttachmentReference::default().attachment(idx as u32).layout(target.usage_layout);
            if has_depth && idx == color_attachment_count {
                desc.depth_ref = Some(reference);
            } else {
                desc.color_refs.push(reference);
            }
            desc.attachments.push(target.attachment_description());
        }
        if ci.external_dependency {
            desc.dependencies.push(Self::external_dependency(has_depth));
        }

        // 第 i 个 framebuffer 由每个 target 的第 i 个 image view 组成
        let framebuffer_views = (0..backbuffer_count)
            .map(|frame| targets.iter().map(|target| target.image_views[frame % target.image_views.len()]).collect_vec())
            .collect_vec();

        let handle = device.create_render_pass(&desc, debug_name)?;
        log::info!(
            "create render pass {}: {:?}, {} color attachments, depth: {}",
            debug_name,
            handle,
            color_attachment_count,
            has_depth
        );

        let mut render_pass = Self {
            handle,
            framebuffers: Vec::with_capacity(backbuffer_count),
            attachment_descriptions: desc.attachments,
            color_attachment_count,
            has_depth,
            clear_values,
            extent: ci.extent,
            secondary_cmd: None,
            device: device.clone(),
            name: debug_name.to_string(),
        };

        // 创建失败时，已经创建的 framebuffer 和 render pass 随 render_pass 一起销毁
        for (frame, views) in framebuffer_views.iter().enumerate() {
            let framebuffer = GfxFramebuffer::new(
                device.clone(),
                handle,
                views,
                ci.extent,
                &format!("{debug_name}-{frame}"),
            )?;
            render_pass.framebuffers.push(framebuffer);
        }

        Ok(render_pass)
    }

    fn external_dependency(has_depth: bool) -> vk::SubpassDependency {
        let mut stage_mask = vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT;
        let mut dst_access = vk::AccessFlags::COLOR_ATTACHMENT_WRITE;
        if has_depth {
            stage_mask |= vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS | vk::PipelineStageFlags::LATE_FRAGMENT_TESTS;
            dst_access |= vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE;
        }

        vk::SubpassDependency::default()
            .src_subpass(vk::SUBPASS_EXTERNAL)
            .dst_subpass(0)
            .src_stage_mask(stage_mask)
            .dst_stage_mask(stage_mask)
            .src_access_mask(vk::AccessFlags::empty())
            .dst_access_mask(dst_access)
    }
}
// getters
impl GfxRenderPass {
    #[inline]
    pub fn handle(&self) -> vk::RenderPass {
        self.handle
    }

    #[inline]
    pub fn has_depth_target(&self) -> bool {
        self.has_depth
    }

    #[inline]
    pub fn color_attachment_count(&self) -> usize {
        self.color_attachment_count
    }

    #[inline]
    pub fn clear_values(&self) -> &[vk::ClearValue] {
        &self.clear_values
    }

    #[inline]
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    #[inline]
    pub fn framebuffers(&self) -> &[GfxFramebuffer] {
        &self.framebuffers
    }

    #[inline]
    pub fn attachment_descriptions(&self) -> &[vk::AttachmentDescription] {
        &self.attachment_descriptions
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}
impl Drop for GfxRenderPass {
    fn drop(&mut self) {
        log::info!("destroy render pass {}: {:?}", self.name, self.handle);
        // framebuffer 需要先于 render pass 销毁
        self.framebuffers.clear();
        self.device.destroy_render_pass(self.handle);
    }
}
