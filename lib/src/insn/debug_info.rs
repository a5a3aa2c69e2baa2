use super::{InstructionBuilder, InstructionKind};
use crate::jvm::{InvalidInstruction, RawInstruction};

/// Source line that the code starting at a label was compiled from
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct LineNumberInstruction {
    line: u16,
    start: u32,
}

impl LineNumberInstruction {
    pub fn builder() -> LineNumberBuilder {
        LineNumberBuilder::default()
    }

    pub fn line(&self) -> u16 {
        self.line
    }

    /// Label id of the first instruction on the line
    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn set_line(&mut self, line: u16) {
        self.line = line;
    }

    pub fn set_start(&mut self, start: u32) {
        self.start = start;
    }

    pub fn copy_from(&mut self, other: &LineNumberInstruction) {
        self.line = other.line;
        self.start = other.start;
    }

    pub fn copy_to(&self, other: &mut LineNumberInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::LineNumber {
            line: self.line,
            start: self.start,
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct LineNumberBuilder {
    line: Option<u16>,
    start: Option<u32>,
}

impl LineNumberBuilder {
    pub fn line(mut self, line: u16) -> Self {
        self.line = Some(line);
        self
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = Some(start);
        self
    }
}

impl<'g> InstructionBuilder<'g> for LineNumberBuilder {
    type Output = LineNumberInstruction;

    fn build(self) -> Result<LineNumberInstruction, InvalidInstruction> {
        let missing = |field| InvalidInstruction::MissingField {
            instruction: InstructionKind::LineNumber,
            field,
        };
        let line = self.line.ok_or_else(|| missing("line"))?;
        let start = self.start.ok_or_else(|| missing("start"))?;
        Ok(LineNumberInstruction { line, start })
    }
}

/// Placeholder for a stack map frame
///
/// Frames are recomputed by the class writer, so their contents are not kept. The placeholder
/// only remembers where the front end saw one.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct FrameInstruction;

impl FrameInstruction {
    pub fn builder() -> FrameBuilder {
        FrameBuilder::default()
    }

    pub fn copy_from(&mut self, _other: &FrameInstruction) {}

    pub fn copy_to(&self, other: &mut FrameInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::Frame
    }
}

#[derive(Clone, Default, Debug)]
pub struct FrameBuilder;

impl<'g> InstructionBuilder<'g> for FrameBuilder {
    type Output = FrameInstruction;

    fn build(self) -> Result<FrameInstruction, InvalidInstruction> {
        Ok(FrameInstruction)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_start() {
        assert_eq!(
            LineNumberInstruction::builder().line(12).build(),
            Err(InvalidInstruction::MissingField {
                instruction: InstructionKind::LineNumber,
                field: "start",
            })
        );
    }

    #[test]
    fn copy_to_and_from() {
        let source = LineNumberInstruction::builder()
            .line(40)
            .start(2)
            .build()
            .expect("line 40");
        let mut target = LineNumberInstruction::builder()
            .line(1)
            .start(0)
            .build()
            .expect("line 1");
        target.copy_from(&source);
        assert_eq!(target.line(), 40);
        assert_eq!(target.start(), 2);
        assert_eq!(target, source);

        let mut frame = FrameInstruction::builder().build().expect("frame");
        FrameInstruction.copy_to(&mut frame);
        assert_eq!(frame.dump(), RawInstruction::Frame);
    }
}
