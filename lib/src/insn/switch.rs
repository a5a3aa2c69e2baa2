use super::{InstructionBuilder, InstructionKind};
use crate::jvm::{InvalidInstruction, RawInstruction};

/// Jump through a dense table of labels (`tableswitch`)
///
/// There is one label for every value from `min` to `max` inclusive. Values outside of that range
/// go to the default label.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TableSwitchInstruction {
    min: i32,
    max: i32,
    default: u32,
    labels: Vec<u32>,
}

impl TableSwitchInstruction {
    pub fn builder() -> TableSwitchBuilder {
        TableSwitchBuilder::default()
    }

    fn validate(min: i32, max: i32, labels: &[u32]) -> Result<(), InvalidInstruction> {
        let illegal = |reason| InvalidInstruction::IllegalOperands {
            instruction: InstructionKind::TableSwitch,
            reason,
        };
        if max < min {
            return Err(illegal("`min` is greater than `max`"));
        }
        if labels.len() as i64 != i64::from(max) - i64::from(min) + 1 {
            return Err(illegal("there must be one label per value from `min` to `max`"));
        }
        Ok(())
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn default_label(&self) -> u32 {
        self.default
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Label that `value` jumps to
    pub fn target(&self, value: i32) -> u32 {
        if value < self.min || value > self.max {
            return self.default;
        }
        let offset = i64::from(value) - i64::from(self.min);
        usize::try_from(offset)
            .ok()
            .and_then(|offset| self.labels.get(offset))
            .copied()
            .unwrap_or(self.default)
    }

    pub fn set_default_label(&mut self, default: u32) {
        self.default = default;
    }

    pub fn set_cases(
        &mut self,
        min: i32,
        max: i32,
        labels: Vec<u32>,
    ) -> Result<(), InvalidInstruction> {
        Self::validate(min, max, &labels)?;
        self.min = min;
        self.max = max;
        self.labels = labels;
        Ok(())
    }

    pub fn copy_from(&mut self, other: &TableSwitchInstruction) {
        self.clone_from(other)
    }

    pub fn copy_to(&self, other: &mut TableSwitchInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::TableSwitch {
            min: self.min,
            max: self.max,
            default: self.default,
            labels: self.labels.clone(),
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct TableSwitchBuilder {
    min: Option<i32>,
    max: Option<i32>,
    default: Option<u32>,
    labels: Option<Vec<u32>>,
}

impl TableSwitchBuilder {
    pub fn min(mut self, min: i32) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn default_label(mut self, default: u32) -> Self {
        self.default = Some(default);
        self
    }

    pub fn labels(mut self, labels: Vec<u32>) -> Self {
        self.labels = Some(labels);
        self
    }
}

impl<'g> InstructionBuilder<'g> for TableSwitchBuilder {
    type Output = TableSwitchInstruction;

    fn build(self) -> Result<TableSwitchInstruction, InvalidInstruction> {
        let missing = |field| InvalidInstruction::MissingField {
            instruction: InstructionKind::TableSwitch,
            field,
        };
        let min = self.min.ok_or_else(|| missing("min"))?;
        let max = self.max.ok_or_else(|| missing("max"))?;
        let default = self.default.ok_or_else(|| missing("default"))?;
        let labels = self.labels.ok_or_else(|| missing("labels"))?;
        TableSwitchInstruction::validate(min, max, &labels)?;
        Ok(TableSwitchInstruction {
            min,
            max,
            default,
            labels,
        })
    }
}

/// Jump through a sparse table of keys and labels (`lookupswitch`)
///
/// Keys are kept sorted, which is what lets the JVM binary search them.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct LookupSwitchInstruction {
    default: u32,
    keys: Vec<i32>,
    labels: Vec<u32>,
}

impl LookupSwitchInstruction {
    pub fn builder() -> LookupSwitchBuilder {
        LookupSwitchBuilder::default()
    }

    fn validate(keys: &[i32], labels: &[u32]) -> Result<(), InvalidInstruction> {
        let illegal = |reason| InvalidInstruction::IllegalOperands {
            instruction: InstructionKind::LookupSwitch,
            reason,
        };
        if keys.len() != labels.len() {
            return Err(illegal("there must be one label per key"));
        }
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(illegal("keys must be sorted and distinct"));
        }
        Ok(())
    }

    pub fn default_label(&self) -> u32 {
        self.default
    }

    pub fn keys(&self) -> &[i32] {
        &self.keys
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Label that `key` jumps to
    pub fn target(&self, key: i32) -> u32 {
        self.keys
            .binary_search(&key)
            .ok()
            .and_then(|index| self.labels.get(index))
            .copied()
            .unwrap_or(self.default)
    }

    pub fn set_default_label(&mut self, default: u32) {
        self.default = default;
    }

    pub fn set_cases(
        &mut self,
        keys: Vec<i32>,
        labels: Vec<u32>,
    ) -> Result<(), InvalidInstruction> {
        Self::validate(&keys, &labels)?;
        self.keys = keys;
        self.labels = labels;
        Ok(())
    }

    pub fn copy_from(&mut self, other: &LookupSwitchInstruction) {
        self.clone_from(other)
    }

    pub fn copy_to(&self, other: &mut LookupSwitchInstruction) {
        other.copy_from(self)
    }

    pub fn dump(&self) -> RawInstruction {
        RawInstruction::LookupSwitch {
            default: self.default,
            keys: self.keys.clone(),
            labels: self.labels.clone(),
        }
    }
}

/// Builder for [`LookupSwitchInstruction`]
///
/// Cases can be given all at once with `keys` and `labels`, or one at a time with `case`.
#[derive(Clone, Default, Debug)]
pub struct LookupSwitchBuilder {
    default: Option<u32>,
    keys: Vec<i32>,
    labels: Vec<u32>,
}

impl LookupSwitchBuilder {
    pub fn default_label(mut self, default: u32) -> Self {
        self.default = Some(default);
        self
    }

    pub fn keys(mut self, keys: Vec<i32>) -> Self {
        self.keys = keys;
        self
    }

    pub fn labels(mut self, labels: Vec<u32>) -> Self {
        self.labels = labels;
        self
    }

    pub fn case(mut self, key: i32, label: u32) -> Self {
        self.keys.push(key);
        self.labels.push(label);
        self
    }
}

impl<'g> InstructionBuilder<'g> for LookupSwitchBuilder {
    type Output = LookupSwitchInstruction;

    fn build(self) -> Result<LookupSwitchInstruction, InvalidInstruction> {
        let default = self.default.ok_or(InvalidInstruction::MissingField {
            instruction: InstructionKind::LookupSwitch,
            field: "default",
        })?;
        LookupSwitchInstruction::validate(&self.keys, &self.labels)?;
        Ok(LookupSwitchInstruction {
            default,
            keys: self.keys,
            labels: self.labels,
        })
    }
}
