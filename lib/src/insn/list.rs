use super::*;
use crate::hierarchy::{Hierarchy, MethodId};
use crate::jvm::{InvalidInstruction, RawInstruction};

/// Ordered body of a method
///
/// Instructions are executed in list order. The list knows which method it belongs to, and an
/// instruction's position in the list is its index, so neither needs a pointer back to the other.
#[derive(Clone, Debug)]
pub struct InstructionList<'g> {
    owner: Option<MethodId<'g>>,
    instructions: Vec<Instruction<'g>>,
}

impl<'g> InstructionList<'g> {
    /// Empty list, optionally attached to the method whose body it is
    pub fn new(owner: Option<MethodId<'g>>) -> InstructionList<'g> {
        InstructionList {
            owner,
            instructions: vec![],
        }
    }

    pub fn owner(&self) -> Option<MethodId<'g>> {
        self.owner
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction<'g>> {
        self.instructions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Instruction<'g>> {
        self.instructions.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction<'g>> {
        self.instructions.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Instruction<'g>> {
        self.instructions.iter_mut()
    }

    /// Append an instruction, returning its index
    pub fn push(&mut self, insn: impl Into<Instruction<'g>>) -> usize {
        self.instructions.push(insn.into());
        self.instructions.len() - 1
    }

    /// Insert an instruction before the one currently at `index`
    ///
    /// Inserting at `len()` appends. Returns `false` (and inserts nothing) past the end.
    pub fn insert(&mut self, index: usize, insn: impl Into<Instruction<'g>>) -> bool {
        if index > self.instructions.len() {
            return false;
        }
        self.instructions.insert(index, insn.into());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Instruction<'g>> {
        if index < self.instructions.len() {
            Some(self.instructions.remove(index))
        } else {
            None
        }
    }

    /// Link every call in the body to its target
    pub fn resolve(&mut self, hierarchy: &'g Hierarchy<'g>) {
        for insn in &mut self.instructions {
            insn.resolve(hierarchy);
        }
    }

    pub fn dump(&self) -> Vec<RawInstruction> {
        self.instructions.iter().map(Instruction::dump).collect()
    }

    /// Configure a new instruction through its builder, then append it
    ///
    /// If the configured operands are illegal, the list is left untouched.
    fn visit<B: InstructionBuilder<'g>>(
        &mut self,
        configure: impl FnOnce(B) -> B,
    ) -> Result<&mut Instruction<'g>, InvalidInstruction> {
        let insn = configure(B::default()).build()?;
        let index = self.push(insn);
        Ok(&mut self.instructions[index])
    }

    pub fn visit_arithmetic(
        &mut self,
        configure: impl FnOnce(ArithmeticBuilder) -> ArithmeticBuilder,
    ) -> Result<&mut ArithmeticInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::Arithmetic(insn) => Ok(insn),
            _other => unreachable!("Arithmetic builder produced another instruction"),
        }
    }

    pub fn visit_simple(
        &mut self,
        configure: impl FnOnce(SimpleBuilder) -> SimpleBuilder,
    ) -> Result<&mut SimpleInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::Simple(insn) => Ok(insn),
            _other => unreachable!("Simple builder produced another instruction"),
        }
    }

    pub fn visit_int(
        &mut self,
        configure: impl FnOnce(IntBuilder) -> IntBuilder,
    ) -> Result<&mut IntInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::Int(insn) => Ok(insn),
            _other => unreachable!("Int builder produced another instruction"),
        }
    }

    pub fn visit_var(
        &mut self,
        configure: impl FnOnce(VarBuilder) -> VarBuilder,
    ) -> Result<&mut VarInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::Var(insn) => Ok(insn),
            _other => unreachable!("Var builder produced another instruction"),
        }
    }

    pub fn visit_type(
        &mut self,
        configure: impl FnOnce(TypeBuilder) -> TypeBuilder,
    ) -> Result<&mut TypeInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::Type(insn) => Ok(insn),
            _other => unreachable!("Type builder produced another instruction"),
        }
    }

    pub fn visit_field(
        &mut self,
        configure: impl FnOnce(FieldBuilder) -> FieldBuilder,
    ) -> Result<&mut FieldInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::Field(insn) => Ok(insn),
            _other => unreachable!("Field builder produced another instruction"),
        }
    }

    pub fn visit_invoke(
        &mut self,
        configure: impl FnOnce(InvokeBuilder) -> InvokeBuilder,
    ) -> Result<&mut InvokeInstruction<'g>, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::Invoke(insn) => Ok(insn),
            _other => unreachable!("Invoke builder produced another instruction"),
        }
    }

    pub fn visit_invoke_dynamic(
        &mut self,
        configure: impl FnOnce(InvokeDynamicBuilder<'g>) -> InvokeDynamicBuilder<'g>,
    ) -> Result<&mut InvokeDynamicInstruction<'g>, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::InvokeDynamic(insn) => Ok(insn),
            _other => unreachable!("Invokedynamic builder produced another instruction"),
        }
    }

    pub fn visit_ldc(
        &mut self,
        configure: impl FnOnce(LdcBuilder<'g>) -> LdcBuilder<'g>,
    ) -> Result<&mut LdcInstruction<'g>, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::Ldc(insn) => Ok(insn),
            _other => unreachable!("Ldc builder produced another instruction"),
        }
    }

    pub fn visit_increment(
        &mut self,
        configure: impl FnOnce(IncrementBuilder) -> IncrementBuilder,
    ) -> Result<&mut IncrementInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::Increment(insn) => Ok(insn),
            _other => unreachable!("Increment builder produced another instruction"),
        }
    }

    pub fn visit_multi_new_array(
        &mut self,
        configure: impl FnOnce(MultiNewArrayBuilder) -> MultiNewArrayBuilder,
    ) -> Result<&mut MultiNewArrayInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::MultiNewArray(insn) => Ok(insn),
            _other => unreachable!("Multianewarray builder produced another instruction"),
        }
    }

    pub fn visit_jump(
        &mut self,
        configure: impl FnOnce(JumpBuilder) -> JumpBuilder,
    ) -> Result<&mut JumpInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::Jump(insn) => Ok(insn),
            _other => unreachable!("Jump builder produced another instruction"),
        }
    }

    pub fn visit_label(
        &mut self,
        configure: impl FnOnce(LabelBuilder) -> LabelBuilder,
    ) -> Result<&mut LabelInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::Label(insn) => Ok(insn),
            _other => unreachable!("Label builder produced another instruction"),
        }
    }

    pub fn visit_table_switch(
        &mut self,
        configure: impl FnOnce(TableSwitchBuilder) -> TableSwitchBuilder,
    ) -> Result<&mut TableSwitchInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::TableSwitch(insn) => Ok(insn),
            _other => unreachable!("Tableswitch builder produced another instruction"),
        }
    }

    pub fn visit_lookup_switch(
        &mut self,
        configure: impl FnOnce(LookupSwitchBuilder) -> LookupSwitchBuilder,
    ) -> Result<&mut LookupSwitchInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::LookupSwitch(insn) => Ok(insn),
            _other => unreachable!("Lookupswitch builder produced another instruction"),
        }
    }

    pub fn visit_line_number(
        &mut self,
        configure: impl FnOnce(LineNumberBuilder) -> LineNumberBuilder,
    ) -> Result<&mut LineNumberInstruction, InvalidInstruction> {
        match self.visit(configure)? {
            Instruction::LineNumber(insn) => Ok(insn),
            _other => unreachable!("Line number builder produced another instruction"),
        }
    }

    pub fn visit_frame(&mut self) -> Result<&mut FrameInstruction, InvalidInstruction> {
        match self.visit(|builder: FrameBuilder| builder)? {
            Instruction::Frame(insn) => Ok(insn),
            _other => unreachable!("Frame builder produced another instruction"),
        }
    }
}

impl<'a, 'g> IntoIterator for &'a InstructionList<'g> {
    type Item = &'a Instruction<'g>;
    type IntoIter = std::slice::Iter<'a, Instruction<'g>>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
