use super::ids::GroupId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// Chain identifier, e.g. `'A'`.
    pub id: char,
    pub model_index: usize,
    /// Groups in the order they were added.
    pub(crate) groups: Vec<GroupId>,
}

impl Chain {
    pub(crate) fn new(id: char, model_index: usize) -> Self {
        Self {
            id,
            model_index,
            groups: Vec::new(),
        }
    }

    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }
}
