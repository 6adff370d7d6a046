//! 测试用的 mock device、command buffer，以及用于构造 SPIR-V 的工具

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use ash::vk::{self, Handle};

use crate::commands::command_encoder::GfxCommandEncoder;
use crate::descriptors::descriptor_layout::GfxDescriptorBinding;
use crate::error::{GfxError, GfxResult};
use crate::foundation::device::GfxDevice;
use crate::pipelines::graphics_pipeline::{GfxGraphicsPipeline, GfxGraphicsPipelineCreateInfo, GfxGraphicsPipelineDesc};
use crate::render_pass::pass::{GfxRenderPass, GfxRenderPassDesc};

/// 不经过 device 创建的 handle（image view、command buffer），与 device 的 handle 区分开
static EXTERNAL_HANDLE: AtomicU64 = AtomicU64::new(1 << 32);

fn next_external_handle() -> u64 {
    EXTERNAL_HANDLE.fetch_add(1, Ordering::Relaxed)
}

pub(crate) fn fake_views(count: usize) -> Vec<vk::ImageView> {
    (0..count).map(|_| vk::ImageView::from_raw(next_external_handle())).collect()
}

// region mock device

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MockObjectKind {
    ShaderModule,
    DescriptorSetLayout,
    PipelineLayout,
    Pipeline,
    RenderPass,
    Framebuffer,
    DescriptorPool,
    DescriptorSet,
}

#[derive(Clone)]
pub(crate) struct MockFramebufferRecord {
    pub render_pass: vk::RenderPass,
    pub views: Vec<vk::ImageView>,
    pub extent: vk::Extent2D,
}

#[derive(Clone)]
pub(crate) struct MockPoolRecord {
    pub flags: vk::DescriptorPoolCreateFlags,
    pub max_sets: u32,
    pub pool_sizes: Vec<vk::DescriptorPoolSize>,
}

/// pipeline 描述中测试关心的部分
#[derive(Clone)]
pub(crate) struct MockPipelineRecord {
    pub stages: Vec<vk::ShaderStageFlags>,
    pub layout: vk::PipelineLayout,
    pub render_pass: vk::RenderPass,
    pub subpass: u32,
    pub samples: vk::SampleCountFlags,
    pub color_blend_attachment_cnt: usize,
    pub vertex_attribute_cnt: usize,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub scissor_extent: vk::Extent2D,
    pub dynamic_states: Vec<vk::DynamicState>,
    pub cull_mode: vk::CullModeFlags,
    pub front_face: vk::FrontFace,
}

#[derive(Default)]
struct MockState {
    next_handle: u64,
    live: HashMap<u64, MockObjectKind>,
    created: Vec<MockObjectKind>,
    destroyed: Vec<(u64, MockObjectKind)>,
    fail_next: Option<MockObjectKind>,

    set_layouts: Vec<Vec<GfxDescriptorBinding>>,
    render_passes: Vec<GfxRenderPassDesc>,
    framebuffers: Vec<MockFramebufferRecord>,
    pipelines: Vec<MockPipelineRecord>,
    pools: Vec<MockPoolRecord>,

    /// pool -> (max sets, 已分配的 set 数量)
    pool_usage: HashMap<u64, (u32, u32)>,
    /// set -> pool
    sets: HashMap<u64, u64>,
    allocated_set_layouts: Vec<vk::DescriptorSetLayout>,
}

/// 记录所有创建与销毁调用的 device
///
/// handle 从 1 开始递增；销毁一个不存在的对象会 panic
#[derive(Default)]
pub(crate) struct MockDevice {
    state: Mutex<MockState>,
}
impl MockDevice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// 下一次创建该类型的对象时失败
    pub fn fail_next(&self, kind: MockObjectKind) {
        self.state().fail_next = Some(kind);
    }

    pub fn live_count(&self) -> usize {
        self.state().live.len()
    }

    pub fn live_count_of(&self, kind: MockObjectKind) -> usize {
        self.state().live.values().filter(|k| **k == kind).count()
    }

    pub fn created_count(&self, kind: MockObjectKind) -> usize {
        self.state().created.iter().filter(|k| **k == kind).count()
    }

    pub fn destroyed_kinds(&self) -> Vec<MockObjectKind> {
        self.state().destroyed.iter().map(|(_, kind)| *kind).collect()
    }

    pub fn was_destroyed(&self, handle: impl Handle) -> bool {
        let raw = handle.as_raw();
        self.state().destroyed.iter().any(|(h, _)| *h == raw)
    }

    pub fn live_set_count(&self) -> usize {
        self.state().sets.len()
    }

    pub fn recorded_set_layouts(&self) -> Vec<Vec<GfxDescriptorBinding>> {
        self.state().set_layouts.clone()
    }

    pub fn recorded_render_passes(&self) -> Vec<GfxRenderPassDesc> {
        self.state().render_passes.clone()
    }

    pub fn recorded_framebuffers(&self) -> Vec<MockFramebufferRecord> {
        self.state().framebuffers.clone()
    }

    pub fn recorded_pipelines(&self) -> Vec<MockPipelineRecord> {
        self.state().pipelines.clone()
    }

    pub fn recorded_pools(&self) -> Vec<MockPoolRecord> {
        self.state().pools.clone()
    }

    pub fn allocated_set_layouts(&self) -> Vec<vk::DescriptorSetLayout> {
        self.state().allocated_set_layouts.clone()
    }

    fn check_fail(state: &mut MockState, kind: MockObjectKind, what: &'static str) -> GfxResult<()> {
        if state.fail_next == Some(kind) {
            state.fail_next = None;
            return Err(GfxError::device(what, vk::Result::ERROR_INITIALIZATION_FAILED));
        }
        Ok(())
    }

    fn create<T: Handle>(&self, kind: MockObjectKind, what: &'static str) -> GfxResult<T> {
        let mut state = self.state();
        Self::check_fail(&mut state, kind, what)?;

        state.next_handle += 1;
        let raw = state.next_handle;
        state.live.insert(raw, kind);
        state.created.push(kind);
        Ok(T::from_raw(raw))
    }

    fn destroy<T: Handle>(&self, handle: T, kind: MockObjectKind) {
        let raw = handle.as_raw();
        let mut state = self.state();
        assert_eq!(state.live.remove(&raw), Some(kind), "destroy unknown object {raw:#x}");
        state.destroyed.push((raw, kind));
    }
}
impl GfxDevice for MockDevice {
    fn create_shader_module(&self, _code: &[u32], _debug_name: &str) -> GfxResult<vk::ShaderModule> {
        self.create(MockObjectKind::ShaderModule, "shader module")
    }

    fn destroy_shader_module(&self, module: vk::ShaderModule) {
        self.destroy(module, MockObjectKind::ShaderModule)
    }

    fn create_descriptor_set_layout(
        &self,
        bindings: &[GfxDescriptorBinding],
        _debug_name: &str,
    ) -> GfxResult<vk::DescriptorSetLayout> {
        let layout = self.create(MockObjectKind::DescriptorSetLayout, "descriptor set layout")?;
        self.state().set_layouts.push(bindings.to_vec());
        Ok(layout)
    }

    fn destroy_descriptor_set_layout(&self, layout: vk::DescriptorSetLayout) {
        self.destroy(layout, MockObjectKind::DescriptorSetLayout)
    }

    fn create_pipeline_layout(
        &self,
        _set_layouts: &[vk::DescriptorSetLayout],
        _debug_name: &str,
    ) -> GfxResult<vk::PipelineLayout> {
        self.create(MockObjectKind::PipelineLayout, "pipeline layout")
    }

    fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        self.destroy(layout, MockObjectKind::PipelineLayout)
    }

    fn create_graphics_pipeline(&self, desc: &GfxGraphicsPipelineDesc, _debug_name: &str) -> GfxResult<vk::Pipeline> {
        let pipeline = self.create(MockObjectKind::Pipeline, "graphics pipeline")?;
        self.state().pipelines.push(MockPipelineRecord {
            stages: desc.stages.iter().map(|stage| stage.stage).collect(),
            layout: desc.layout,
            render_pass: desc.render_pass,
            subpass: desc.subpass,
            samples: desc.samples,
            color_blend_attachment_cnt: desc.color_blend_attachments.len(),
            vertex_attribute_cnt: desc.vertex_input.as_ref().map_or(0, |layout| layout.attributes().len()),
            viewport_width: desc.viewport.width,
            viewport_height: desc.viewport.height,
            scissor_extent: desc.scissor.extent,
            dynamic_states: desc.dynamic_states.clone(),
            cull_mode: desc.rasterization.cull_mode,
            front_face: desc.rasterization.front_face,
        });
        Ok(pipeline)
    }

    fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        self.destroy(pipeline, MockObjectKind::Pipeline)
    }

    fn create_render_pass(&self, desc: &GfxRenderPassDesc, _debug_name: &str) -> GfxResult<vk::RenderPass> {
        let render_pass = self.create(MockObjectKind::RenderPass, "render pass")?;
        self.state().render_passes.push(desc.clone());
        Ok(render_pass)
    }

    fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        self.destroy(render_pass, MockObjectKind::RenderPass)
    }

    fn create_framebuffer(
        &self,
        render_pass: vk::RenderPass,
        attachments: &[vk::ImageView],
        extent: vk::Extent2D,
        _debug_name: &str,
    ) -> GfxResult<vk::Framebuffer> {
        let framebuffer = self.create(MockObjectKind::Framebuffer, "framebuffer")?;
        self.state().framebuffers.push(MockFramebufferRecord {
            render_pass,
            views: attachments.to_vec(),
            extent,
        });
        Ok(framebuffer)
    }

    fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer) {
        self.destroy(framebuffer, MockObjectKind::Framebuffer)
    }

    fn create_descriptor_pool(
        &self,
        flags: vk::DescriptorPoolCreateFlags,
        max_sets: u32,
        pool_sizes: &[vk::DescriptorPoolSize],
        _debug_name: &str,
    ) -> GfxResult<vk::DescriptorPool> {
        let pool: vk::DescriptorPool = self.create(MockObjectKind::DescriptorPool, "descriptor pool")?;
        let mut state = self.state();
        state.pools.push(MockPoolRecord {
            flags,
            max_sets,
            pool_sizes: pool_sizes.to_vec(),
        });
        state.pool_usage.insert(pool.as_raw(), (max_sets, 0));
        Ok(pool)
    }

    fn destroy_descriptor_pool(&self, pool: vk::DescriptorPool) {
        self.destroy(pool, MockObjectKind::DescriptorPool);
        let mut state = self.state();
        state.pool_usage.remove(&pool.as_raw());
        state.sets.retain(|_, owner| *owner != pool.as_raw());
    }

    fn allocate_descriptor_sets(
        &self,
        pool: vk::DescriptorPool,
        layouts: &[vk::DescriptorSetLayout],
    ) -> GfxResult<Vec<vk::DescriptorSet>> {
        let mut state = self.state();
        Self::check_fail(&mut state, MockObjectKind::DescriptorSet, "descriptor sets")?;

        let (max_sets, used) = state.pool_usage[&pool.as_raw()];
        if used + layouts.len() as u32 > max_sets {
            return Err(GfxError::device("descriptor sets", vk::Result::ERROR_OUT_OF_POOL_MEMORY));
        }
        state.pool_usage.insert(pool.as_raw(), (max_sets, used + layouts.len() as u32));

        let mut sets = Vec::with_capacity(layouts.len());
        for layout in layouts {
            state.next_handle += 1;
            let raw = state.next_handle;
            state.sets.insert(raw, pool.as_raw());
            state.allocated_set_layouts.push(*layout);
            sets.push(vk::DescriptorSet::from_raw(raw));
        }
        Ok(sets)
    }

    fn free_descriptor_sets(&self, pool: vk::DescriptorPool, sets: &[vk::DescriptorSet]) -> GfxResult<()> {
        let mut state = self.state();
        for set in sets {
            assert_eq!(state.sets.remove(&set.as_raw()), Some(pool.as_raw()), "free unknown descriptor set");
        }
        if let Some((_, used)) = state.pool_usage.get_mut(&pool.as_raw()) {
            *used -= sets.len() as u32;
        }
        Ok(())
    }
}

// endregion

// region recording command buffer

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RecordedCommand {
    Begin(vk::CommandBufferUsageFlags),
    BeginSecondary {
        usage: vk::CommandBufferUsageFlags,
        render_pass: vk::RenderPass,
        subpass: u32,
    },
    End,
    BeginRenderPass {
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        render_offset: (i32, i32),
        render_extent: vk::Extent2D,
        clear_value_cnt: u32,
        contents: vk::SubpassContents,
    },
    ExecuteCommands(Vec<vk::CommandBuffer>),
    EndRenderPass,
    BindPipeline(vk::Pipeline),
    BindDescriptorSets {
        layout: vk::PipelineLayout,
        first_set: u32,
        sets: Vec<vk::DescriptorSet>,
    },
    BindVertexBuffers {
        first_binding: u32,
        buffers: Vec<vk::Buffer>,
    },
    Draw {
        vertex_cnt: u32,
        instance_cnt: u32,
        first_vertex: u32,
        first_instance: u32,
    },
}

/// 将所有命令按顺序记录下来的 command buffer
pub(crate) struct RecordingCommandBuffer {
    handle: vk::CommandBuffer,
    commands: RefCell<Vec<RecordedCommand>>,
}
impl RecordingCommandBuffer {
    pub fn new() -> Self {
        Self {
            handle: vk::CommandBuffer::from_raw(next_external_handle()),
            commands: RefCell::new(vec![]),
        }
    }

    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands.borrow().clone()
    }

    fn push(&self, command: RecordedCommand) {
        self.commands.borrow_mut().push(command);
    }
}
impl GfxCommandEncoder for RecordingCommandBuffer {
    fn vk_handle(&self) -> vk::CommandBuffer {
        self.handle
    }

    fn begin(&self, usage: vk::CommandBufferUsageFlags) -> GfxResult<()> {
        self.push(RecordedCommand::Begin(usage));
        Ok(())
    }

    fn begin_secondary(
        &self,
        usage: vk::CommandBufferUsageFlags,
        render_pass: vk::RenderPass,
        subpass: u32,
    ) -> GfxResult<()> {
        self.push(RecordedCommand::BeginSecondary {
            usage,
            render_pass,
            subpass,
        });
        Ok(())
    }

    fn end(&self) -> GfxResult<()> {
        self.push(RecordedCommand::End);
        Ok(())
    }

    fn cmd_begin_render_pass(&self, begin_info: &vk::RenderPassBeginInfo, contents: vk::SubpassContents) {
        self.push(RecordedCommand::BeginRenderPass {
            render_pass: begin_info.render_pass,
            framebuffer: begin_info.framebuffer,
            render_offset: (begin_info.render_area.offset.x, begin_info.render_area.offset.y),
            render_extent: begin_info.render_area.extent,
            clear_value_cnt: begin_info.clear_value_count,
            contents,
        });
    }

    fn cmd_execute_commands(&self, secondary_cmds: &[vk::CommandBuffer]) {
        self.push(RecordedCommand::ExecuteCommands(secondary_cmds.to_vec()));
    }

    fn cmd_end_render_pass(&self) {
        self.push(RecordedCommand::EndRenderPass);
    }

    fn cmd_bind_pipeline(&self, bind_point: vk::PipelineBindPoint, pipeline: vk::Pipeline) {
        assert_eq!(bind_point, vk::PipelineBindPoint::GRAPHICS);
        self.push(RecordedCommand::BindPipeline(pipeline));
    }

    fn cmd_bind_descriptor_sets(
        &self,
        _bind_point: vk::PipelineBindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        sets: &[vk::DescriptorSet],
    ) {
        self.push(RecordedCommand::BindDescriptorSets {
            layout,
            first_set,
            sets: sets.to_vec(),
        });
    }

    fn cmd_bind_vertex_buffers(&self, first_binding: u32, buffers: &[vk::Buffer], _offsets: &[vk::DeviceSize]) {
        self.push(RecordedCommand::BindVertexBuffers {
            first_binding,
            buffers: buffers.to_vec(),
        });
    }

    fn cmd_draw(&self, vertex_cnt: u32, instance_cnt: u32, first_vertex: u32, first_instance: u32) {
        self.push(RecordedCommand::Draw {
            vertex_cnt,
            instance_cnt,
            first_vertex,
            first_instance,
        });
    }
}

// endregion

// region spirv

/// 测试中用到的 SPIR-V 枚举值
pub(crate) mod spv {
    pub const MAGIC: u32 = 0x0723_0203;
    pub const VERSION_1_0: u32 = 0x0001_0000;

    pub const OP_CAPABILITY: u32 = 17;
    pub const OP_MEMORY_MODEL: u32 = 14;
    pub const OP_TYPE_INT: u32 = 21;
    pub const OP_TYPE_FLOAT: u32 = 22;
    pub const OP_TYPE_VECTOR: u32 = 23;
    pub const OP_TYPE_IMAGE: u32 = 25;
    pub const OP_TYPE_SAMPLER: u32 = 26;
    pub const OP_TYPE_SAMPLED_IMAGE: u32 = 27;
    pub const OP_TYPE_RUNTIME_ARRAY: u32 = 29;
    pub const OP_TYPE_STRUCT: u32 = 30;
    pub const OP_TYPE_POINTER: u32 = 32;
    pub const OP_VARIABLE: u32 = 59;
    pub const OP_DECORATE: u32 = 71;
    pub const OP_MEMBER_DECORATE: u32 = 72;

    pub const CAPABILITY_SHADER: u32 = 1;
    pub const ADDRESSING_LOGICAL: u32 = 0;
    pub const MEMORY_MODEL_GLSL450: u32 = 1;

    pub const DECORATION_BLOCK: u32 = 2;
    pub const DECORATION_BUFFER_BLOCK: u32 = 3;
    pub const DECORATION_BUILTIN: u32 = 11;
    pub const DECORATION_LOCATION: u32 = 30;
    pub const DECORATION_BINDING: u32 = 33;
    pub const DECORATION_DESCRIPTOR_SET: u32 = 34;

    pub const BUILTIN_POSITION: u32 = 0;
    pub const BUILTIN_VERTEX_INDEX: u32 = 42;

    pub const STORAGE_CLASS_UNIFORM_CONSTANT: u32 = 0;
    pub const STORAGE_CLASS_INPUT: u32 = 1;
    pub const STORAGE_CLASS_UNIFORM: u32 = 2;
    pub const STORAGE_CLASS_OUTPUT: u32 = 3;

    pub const DIM_2D: u32 = 1;
    pub const DIM_BUFFER: u32 = 5;
}

/// 生成只包含类型、变量与 decoration 的 SPIR-V module，足以用于反射
pub(crate) struct SpirvAssembler {
    bound: u32,
    annotations: Vec<u32>,
    globals: Vec<u32>,
}
impl SpirvAssembler {
    pub fn new() -> Self {
        Self {
            bound: 1,
            annotations: vec![],
            globals: vec![],
        }
    }

    fn id(&mut self) -> u32 {
        let id = self.bound;
        self.bound += 1;
        id
    }

    fn emit(words: &mut Vec<u32>, opcode: u32, operands: &[u32]) {
        words.push(((operands.len() as u32 + 1) << 16) | opcode);
        words.extend_from_slice(operands);
    }

    fn emit_type(&mut self, opcode: u32, operands: &[u32]) -> u32 {
        let id = self.id();
        let mut words = vec![id];
        words.extend_from_slice(operands);
        Self::emit(&mut self.globals, opcode, &words);
        id
    }

    pub fn type_int(&mut self, width: u32, signed: bool) -> u32 {
        self.emit_type(spv::OP_TYPE_INT, &[width, signed as u32])
    }

    pub fn type_float(&mut self, width: u32) -> u32 {
        self.emit_type(spv::OP_TYPE_FLOAT, &[width])
    }

    pub fn type_vector(&mut self, component: u32, count: u32) -> u32 {
        self.emit_type(spv::OP_TYPE_VECTOR, &[component, count])
    }

    pub fn type_struct(&mut self, members: &[u32]) -> u32 {
        self.emit_type(spv::OP_TYPE_STRUCT, members)
    }

    pub fn type_sampler(&mut self) -> u32 {
        self.emit_type(spv::OP_TYPE_SAMPLER, &[])
    }

    /// depth、arrayed、ms 为 0，format 为 Unknown
    pub fn type_image(&mut self, sampled_type: u32, dim: u32, sampled: u32) -> u32 {
        self.emit_type(spv::OP_TYPE_IMAGE, &[sampled_type, dim, 0, 0, 0, sampled, 0])
    }

    pub fn type_sampled_image(&mut self, image: u32) -> u32 {
        self.emit_type(spv::OP_TYPE_SAMPLED_IMAGE, &[image])
    }

    pub fn type_runtime_array(&mut self, element: u32) -> u32 {
        self.emit_type(spv::OP_TYPE_RUNTIME_ARRAY, &[element])
    }

    /// 声明一个指向 `pointee` 的全局变量，返回变量的 id
    pub fn variable(&mut self, storage_class: u32, pointee: u32) -> u32 {
        let pointer = self.emit_type(spv::OP_TYPE_POINTER, &[storage_class, pointee]);
        let id = self.id();
        Self::emit(&mut self.globals, spv::OP_VARIABLE, &[pointer, id, storage_class]);
        id
    }

    pub fn input_variable(&mut self, pointee: u32) -> u32 {
        self.variable(spv::STORAGE_CLASS_INPUT, pointee)
    }

    pub fn decorate(&mut self, target: u32, decoration: u32, literals: &[u32]) {
        let mut words = vec![target, decoration];
        words.extend_from_slice(literals);
        Self::emit(&mut self.annotations, spv::OP_DECORATE, &words);
    }

    pub fn member_decorate(&mut self, target: u32, member: u32, decoration: u32, literals: &[u32]) {
        let mut words = vec![target, member, decoration];
        words.extend_from_slice(literals);
        Self::emit(&mut self.annotations, spv::OP_MEMBER_DECORATE, &words);
    }

    pub fn assemble(&self) -> Vec<u32> {
        let mut words = vec![spv::MAGIC, spv::VERSION_1_0, 0, self.bound, 0];
        Self::emit(&mut words, spv::OP_CAPABILITY, &[spv::CAPABILITY_SHADER]);
        Self::emit(&mut words, spv::OP_MEMORY_MODEL, &[spv::ADDRESSING_LOGICAL, spv::MEMORY_MODEL_GLSL450]);
        words.extend_from_slice(&self.annotations);
        words.extend_from_slice(&self.globals);
        words
    }
}

/// 为 uniform buffer 声明 Block 结构体和变量
fn uniform_buffer(asm: &mut SpirvAssembler, member: u32, binding: u32) {
    let block = asm.type_struct(&[member]);
    asm.decorate(block, spv::DECORATION_BLOCK, &[]);
    let ubo = asm.variable(spv::STORAGE_CLASS_UNIFORM, block);
    asm.decorate(ubo, spv::DECORATION_DESCRIPTOR_SET, &[0]);
    asm.decorate(ubo, spv::DECORATION_BINDING, &[binding]);
}

/// vertex shader：
/// - location 0: vec3，location 1: vec2
/// - gl_VertexIndex 以及输出的 gl_PerVertex
/// - binding 0: uniform buffer
pub(crate) fn vertex_shader_code() -> Vec<u32> {
    let mut asm = SpirvAssembler::new();
    let float = asm.type_float(32);
    let int = asm.type_int(32, true);
    let vec2 = asm.type_vector(float, 2);
    let vec3 = asm.type_vector(float, 3);
    let vec4 = asm.type_vector(float, 4);

    let position = asm.input_variable(vec3);
    asm.decorate(position, spv::DECORATION_LOCATION, &[0]);
    let uv = asm.input_variable(vec2);
    asm.decorate(uv, spv::DECORATION_LOCATION, &[1]);
    let vertex_index = asm.input_variable(int);
    asm.decorate(vertex_index, spv::DECORATION_BUILTIN, &[spv::BUILTIN_VERTEX_INDEX]);

    let per_vertex = asm.type_struct(&[vec4]);
    asm.decorate(per_vertex, spv::DECORATION_BLOCK, &[]);
    asm.member_decorate(per_vertex, 0, spv::DECORATION_BUILTIN, &[spv::BUILTIN_POSITION]);
    asm.variable(spv::STORAGE_CLASS_OUTPUT, per_vertex);

    uniform_buffer(&mut asm, vec4, 0);
    asm.assemble()
}

/// fragment shader：
/// - location 0: vec2 输入，location 0: vec4 输出
/// - binding 0: uniform buffer，binding 1: combined image sampler
pub(crate) fn fragment_shader_code() -> Vec<u32> {
    let mut asm = SpirvAssembler::new();
    let float = asm.type_float(32);
    let vec2 = asm.type_vector(float, 2);
    let vec4 = asm.type_vector(float, 4);

    let uv = asm.input_variable(vec2);
    asm.decorate(uv, spv::DECORATION_LOCATION, &[0]);
    let color = asm.variable(spv::STORAGE_CLASS_OUTPUT, vec4);
    asm.decorate(color, spv::DECORATION_LOCATION, &[0]);

    let image = asm.type_image(float, spv::DIM_2D, 1);
    let sampled_image = asm.type_sampled_image(image);
    let texture = asm.variable(spv::STORAGE_CLASS_UNIFORM_CONSTANT, sampled_image);
    asm.decorate(texture, spv::DECORATION_DESCRIPTOR_SET, &[0]);
    asm.decorate(texture, spv::DECORATION_BINDING, &[1]);

    uniform_buffer(&mut asm, vec4, 0);
    asm.assemble()
}

/// fragment shader：
/// - location 0: `in VertexData { vec2 uv; }` 形式的 interface block 输入
/// - binding 0: uniform buffer
pub(crate) fn fragment_block_input_shader_code() -> Vec<u32> {
    let mut asm = SpirvAssembler::new();
    let float = asm.type_float(32);
    let vec2 = asm.type_vector(float, 2);
    let vec4 = asm.type_vector(float, 4);

    let vertex_data = asm.type_struct(&[vec2]);
    asm.decorate(vertex_data, spv::DECORATION_BLOCK, &[]);
    let input = asm.input_variable(vertex_data);
    asm.decorate(input, spv::DECORATION_LOCATION, &[0]);
    let color = asm.variable(spv::STORAGE_CLASS_OUTPUT, vec4);
    asm.decorate(color, spv::DECORATION_LOCATION, &[0]);

    uniform_buffer(&mut asm, vec4, 0);
    asm.assemble()
}

// endregion

/// 使用上面的两个 shader 创建 pipeline
pub(crate) fn test_pipeline(device: &Arc<MockDevice>, render_pass: &GfxRenderPass) -> GfxGraphicsPipeline {
    GfxGraphicsPipeline::from_spirv(
        device.clone(),
        render_pass,
        &GfxGraphicsPipelineCreateInfo::default(),
        &vertex_shader_code(),
        &fragment_shader_code(),
        "test",
    )
    .unwrap()
}
