use std::collections::{HashMap, HashSet};

use ash::vk;
use rspirv::dr::{Instruction, Operand};
use rspirv::spirv;

use crate::basic::format::{GfxScalarKind, vertex_format};
use crate::error::{GfxError, GfxResult};

/// shader 的一个输入变量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GfxReflectedInput {
    pub location: u32,
    pub format: vk::Format,
}

/// shader 声明的一个 descriptor，还没有 stage 信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GfxReflectedBinding {
    pub set: u32,
    pub binding: u32,
    pub descriptor_type: vk::DescriptorType,
}

/// 单个 shader stage 的反射结果
///
/// 解析得到的 SPIR-V module 只在 [`GfxShaderReflection::reflect`] 内部存在，
/// 函数返回时（包括出错）即被释放，结果中只保留值类型的数据。
#[derive(Debug, Clone, Default)]
pub struct GfxShaderReflection {
    /// 按照 SPIR-V 中声明的顺序；只有 vertex stage 会收集
    pub inputs: Vec<GfxReflectedInput>,
    /// 按照 SPIR-V 中声明的顺序
    pub bindings: Vec<GfxReflectedBinding>,
}

/// 某个 id 上的 decoration
#[derive(Default)]
struct Decorations {
    location: Option<u32>,
    binding: Option<u32>,
    set: Option<u32>,
    builtin: bool,
    buffer_block: bool,
}

/// 从 SPIR-V module 中查询类型和 decoration
struct ModuleIndex<'a> {
    types: HashMap<spirv::Word, &'a Instruction>,
    decorations: HashMap<spirv::Word, Decorations>,
    /// 含有 builtin 成员的 struct，例如 gl_PerVertex
    builtin_structs: HashSet<spirv::Word>,
}

impl GfxShaderReflection {
    /// 反射一个 SPIR-V 二进制
    ///
    /// 输入变量只对 vertex stage 有意义，其他 stage 的输入（interface block、矩阵等）不做解析
    ///
    /// # 参数
    /// - `stage`: shader 所属的 stage
    /// - `shader_name`: 仅用于错误信息
    pub fn reflect(code: &[u32], stage: vk::ShaderStageFlags, shader_name: &str) -> GfxResult<Self> {
        let module = rspirv::dr::load_words(code)
            .map_err(|e| GfxError::reflection(shader_name, format!("invalid SPIR-V: {e:?}")))?;
        let index = ModuleIndex::new(&module.annotations, &module.types_global_values);

        let mut reflection = Self::default();
        for inst in module.types_global_values.iter().filter(|inst| inst.class.opcode == spirv::Op::Variable) {
            let (Some(var_id), Some(ptr_type)) = (inst.result_id, inst.result_type) else {
                continue;
            };
            let Some(Operand::StorageClass(storage_class)) = inst.operands.first() else {
                continue;
            };
            let pointee = index.pointee(ptr_type).map_err(|e| GfxError::reflection(shader_name, e))?;
            let decorations = index.decorations.get(&var_id);

            match storage_class {
                spirv::StorageClass::Input if stage == vk::ShaderStageFlags::VERTEX => {
                    let Some(decorations) = decorations else {
                        continue;
                    };
                    if decorations.builtin || index.builtin_structs.contains(&pointee) {
                        continue;
                    }
                    let Some(location) = decorations.location else {
                        continue;
                    };
                    let format = index.input_format(pointee).map_err(|e| {
                        GfxError::reflection(shader_name, format!("input at location {location}: {e}"))
                    })?;
                    reflection.inputs.push(GfxReflectedInput { location, format });
                }
                spirv::StorageClass::Uniform
                | spirv::StorageClass::UniformConstant
                | spirv::StorageClass::StorageBuffer => {
                    let Some(binding) = decorations.and_then(|d| d.binding) else {
                        continue;
                    };
                    let set = decorations.and_then(|d| d.set).unwrap_or(0);
                    let descriptor_type = index.descriptor_type(*storage_class, pointee).map_err(|e| {
                        GfxError::reflection(shader_name, format!("descriptor at set {set} binding {binding}: {e}"))
                    })?;
                    reflection.bindings.push(GfxReflectedBinding {
                        set,
                        binding,
                        descriptor_type,
                    });
                }
                _ => {}
            }
        }

        log::debug!(
            "reflected shader {}: {} inputs, {} bindings",
            shader_name,
            reflection.inputs.len(),
            reflection.bindings.len()
        );
        Ok(reflection)
    }
}

impl<'a> ModuleIndex<'a> {
    fn new(annotations: &'a [Instruction], types_global_values: &'a [Instruction]) -> Self {
        let types = types_global_values
            .iter()
            .filter(|inst| inst.class.opcode != spirv::Op::Variable)
            .filter_map(|inst| inst.result_id.map(|id| (id, inst)))
            .collect();

        let mut decorations: HashMap<spirv::Word, Decorations> = HashMap::new();
        let mut builtin_structs = HashSet::new();
        for inst in annotations {
            match (inst.class.opcode, inst.operands.as_slice()) {
                (spirv::Op::Decorate, [Operand::IdRef(target), Operand::Decoration(decoration), rest @ ..]) => {
                    let entry = decorations.entry(*target).or_default();
                    let literal = match rest.first() {
                        Some(Operand::LiteralBit32(value)) => Some(*value),
                        _ => None,
                    };
                    match decoration {
                        spirv::Decoration::Location => entry.location = literal,
                        spirv::Decoration::Binding => entry.binding = literal,
                        spirv::Decoration::DescriptorSet => entry.set = literal,
                        spirv::Decoration::BuiltIn => entry.builtin = true,
                        spirv::Decoration::BufferBlock => entry.buffer_block = true,
                        _ => {}
                    }
                }
                (
                    spirv::Op::MemberDecorate,
                    [Operand::IdRef(target), _, Operand::Decoration(spirv::Decoration::BuiltIn), ..],
                ) => {
                    builtin_structs.insert(*target);
                }
                _ => {}
            }
        }

        Self {
            types,
            decorations,
            builtin_structs,
        }
    }

    fn get_type(&self, id: spirv::Word) -> Result<&'a Instruction, String> {
        self.types.get(&id).copied().ok_or_else(|| format!("unknown type id %{id}"))
    }

    /// OpTypePointer 指向的类型
    fn pointee(&self, ptr_type: spirv::Word) -> Result<spirv::Word, String> {
        let inst = self.get_type(ptr_type)?;
        match (inst.class.opcode, inst.operands.as_slice()) {
            (spirv::Op::TypePointer, [Operand::StorageClass(_), Operand::IdRef(pointee)]) => Ok(*pointee),
            _ => Err(format!("%{ptr_type} is not a pointer type")),
        }
    }

    /// 数组类型展开为元素类型；descriptor count 固定为 1，长度被忽略
    fn unwrap_array(&self, mut type_id: spirv::Word) -> Result<spirv::Word, String> {
        loop {
            let inst = self.get_type(type_id)?;
            match (inst.class.opcode, inst.operands.first()) {
                (spirv::Op::TypeArray | spirv::Op::TypeRuntimeArray, Some(Operand::IdRef(element))) => {
                    type_id = *element
                }
                _ => return Ok(type_id),
            }
        }
    }

    fn scalar_kind(&self, type_id: spirv::Word) -> Result<(GfxScalarKind, u32), String> {
        let inst = self.get_type(type_id)?;
        match (inst.class.opcode, inst.operands.as_slice()) {
            (spirv::Op::TypeFloat, [Operand::LiteralBit32(width), ..]) => Ok((GfxScalarKind::Float, *width)),
            (spirv::Op::TypeInt, [Operand::LiteralBit32(width), Operand::LiteralBit32(signedness)]) => {
                let kind = if *signedness == 0 { GfxScalarKind::Uint } else { GfxScalarKind::Sint };
                Ok((kind, *width))
            }
            _ => Err(format!("unsupported component type {:?}", inst.class.opcode)),
        }
    }

    /// 标量或者向量类型对应的 vertex format
    fn input_format(&self, type_id: spirv::Word) -> Result<vk::Format, String> {
        let inst = self.get_type(type_id)?;
        let (component_type, component_cnt) = match (inst.class.opcode, inst.operands.as_slice()) {
            (spirv::Op::TypeVector, [Operand::IdRef(component), Operand::LiteralBit32(cnt)]) => (*component, *cnt),
            (spirv::Op::TypeFloat | spirv::Op::TypeInt, _) => (type_id, 1),
            (op, _) => return Err(format!("unsupported input type {op:?}")),
        };

        let (kind, width) = self.scalar_kind(component_type)?;
        vertex_format(kind, width, component_cnt)
            .ok_or_else(|| format!("no vertex format for {component_cnt} x {width} bit {kind:?}"))
    }

    fn descriptor_type(
        &self,
        storage_class: spirv::StorageClass,
        type_id: spirv::Word,
    ) -> Result<vk::DescriptorType, String> {
        let type_id = self.unwrap_array(type_id)?;
        let inst = self.get_type(type_id)?;

        match (storage_class, inst.class.opcode) {
            (spirv::StorageClass::StorageBuffer, spirv::Op::TypeStruct) => Ok(vk::DescriptorType::STORAGE_BUFFER),
            // 旧式的 storage buffer 写法：Uniform + BufferBlock
            (spirv::StorageClass::Uniform, spirv::Op::TypeStruct) => {
                if self.decorations.get(&type_id).is_some_and(|d| d.buffer_block) {
                    Ok(vk::DescriptorType::STORAGE_BUFFER)
                } else {
                    Ok(vk::DescriptorType::UNIFORM_BUFFER)
                }
            }
            (spirv::StorageClass::UniformConstant, spirv::Op::TypeSampler) => Ok(vk::DescriptorType::SAMPLER),
            (spirv::StorageClass::UniformConstant, spirv::Op::TypeSampledImage) => {
                Ok(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
            }
            (spirv::StorageClass::UniformConstant, spirv::Op::TypeImage) => Self::image_descriptor_type(inst),
            (spirv::StorageClass::UniformConstant, spirv::Op::TypeAccelerationStructureKHR) => {
                Ok(vk::DescriptorType::ACCELERATION_STRUCTURE_KHR)
            }
            (storage_class, op) => Err(format!("unsupported descriptor {op:?} in {storage_class:?}")),
        }
    }

    /// OpTypeImage: sampled type, dim, depth, arrayed, ms, sampled, format
    fn image_descriptor_type(inst: &Instruction) -> Result<vk::DescriptorType, String> {
        let (dim, sampled) = match inst.operands.as_slice() {
            [_, Operand::Dim(dim), _, _, _, Operand::LiteralBit32(sampled), ..] => (*dim, *sampled),
            _ => return Err("malformed OpTypeImage".to_string()),
        };

        // sampled == 2 表示不经过 sampler 访问，即 storage
        let is_storage = sampled == 2;
        let descriptor_type = match dim {
            spirv::Dim::DimBuffer if is_storage => vk::DescriptorType::STORAGE_TEXEL_BUFFER,
            spirv::Dim::DimBuffer => vk::DescriptorType::UNIFORM_TEXEL_BUFFER,
            spirv::Dim::DimSubpassData => vk::DescriptorType::INPUT_ATTACHMENT,
            _ if is_storage => vk::DescriptorType::STORAGE_IMAGE,
            _ => vk::DescriptorType::SAMPLED_IMAGE,
        };
        Ok(descriptor_type)
    }
}
