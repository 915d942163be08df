use crate::{Value, MEMORY_SIZE};


/// Data memory. Programs are fetched from their own byte stream and never live here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory([Value; MEMORY_SIZE]);

impl Memory {
    pub fn new() -> Self {
        Self([0; MEMORY_SIZE])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }

    pub fn cell(&self, addr: usize) -> Option<Value> {
        self.0.get(addr).copied()
    }

    pub fn cell_mut(&mut self, addr: usize) -> Option<&mut Value> {
        self.0.get_mut(addr)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
