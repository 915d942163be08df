use crate::{Value, REGISTER_COUNT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegFile([Value; REGISTER_COUNT]);

impl RegFile {
    pub fn new() -> Self {
        Self([0; REGISTER_COUNT])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }

    pub fn as_array(&self) -> &[Value; REGISTER_COUNT] {
        &self.0
    }

    pub fn register(&self, index: usize) -> Option<Value> {
        self.0.get(index).copied()
    }

    pub fn register_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.0.get_mut(index)
    }
}

impl Default for RegFile {
    fn default() -> Self {
        Self::new()
    }
}
