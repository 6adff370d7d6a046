use ash::vk;

/// render pass 的一个 attachment，以及它在每个 backbuffer 上对应的 image view
///
/// 由调用者提供，render pass 只读取其中的信息，不持有 image view
#[derive(Clone)]
pub struct GfxRenderTarget {
    pub load_op: vk::AttachmentLoadOp,
    pub store_op: vk::AttachmentStoreOp,

    pub initial_layout: vk::ImageLayout,
    /// subpass 中使用时的 layout
    pub usage_layout: vk::ImageLayout,
    pub final_layout: vk::ImageLayout,

    /// 每个 backbuffer 一个
    pub image_views: Vec<vk::ImageView>,
    pub format: vk::Format,
    pub clear_value: vk::ClearValue,
}
// new & init
impl GfxRenderTarget {
    /// 每帧清空、结束后用于 present 的 color target
    pub fn color(format: vk::Format, image_views: Vec<vk::ImageView>, clear_color: [f32; 4]) -> Self {
        Self {
            load_op: vk::AttachmentLoadOp::CLEAR,
            store_op: vk::AttachmentStoreOp::STORE,
            initial_layout: vk::ImageLayout::UNDEFINED,
            usage_layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
            final_layout: vk::ImageLayout::PRESENT_SRC_KHR,
            image_views,
            format,
            clear_value: vk::ClearValue {
                color: vk::ClearColorValue { float32: clear_color },
            },
        }
    }

    /// 每帧清空为 1.0 的 depth target，内容不需要保留
    pub fn depth(format: vk::Format, image_views: Vec<vk::ImageView>) -> Self {
        Self {
            load_op: vk::AttachmentLoadOp::CLEAR,
            store_op: vk::AttachmentStoreOp::DONT_CARE,
            initial_layout: vk::ImageLayout::UNDEFINED,
            usage_layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
            final_layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
            image_views,
            format,
            clear_value: vk::ClearValue {
                depth_stencil: vk::ClearDepthStencilValue { depth: 1.0, stencil: 0 },
            },
        }
    }
}
// builder
impl GfxRenderTarget {
    /// 保留上一次的内容，而不是清空
    #[inline]
    pub fn load(mut self, initial_layout: vk::ImageLayout) -> Self {
        self.load_op = vk::AttachmentLoadOp::LOAD;
        self.initial_layout = initial_layout;
        self
    }

    #[inline]
    pub fn final_layout(mut self, final_layout: vk::ImageLayout) -> Self {
        self.final_layout = final_layout;
        self
    }
}
// tools
impl GfxRenderTarget {
    pub(crate) fn attachment_description(&self) -> vk::AttachmentDescription {
        vk::AttachmentDescription::default()
            .format(self.format)
            .samples(vk::SampleCountFlags::TYPE_1)
            .load_op(self.load_op)
            .store_op(self.store_op)
            .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
            .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
            .initial_layout(self.initial_layout)
            .final_layout(self.final_layout)
    }
}
