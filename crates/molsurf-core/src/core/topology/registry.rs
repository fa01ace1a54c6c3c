use std::collections::HashMap;

const STANDARD_GROUP_NAMES: [&str; 29] = [
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE", "LEU", "LYS", "MET",
    "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL", "A", "C", "G", "T", "U", "DA", "DC", "DG",
    "HOH",
];

const PROLINE: &str = "PRO";

/// Interned identifier of a group (residue) name within one [`GroupRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupNameId(u32);

impl GroupNameId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interns group names to compact ids.
///
/// Each molecular system owns its registry, so independent systems never
/// share interning state. Names are normalized to trimmed upper case.
#[derive(Debug, Clone)]
pub struct GroupRegistry {
    names: Vec<String>,
    ids: HashMap<String, GroupNameId>,
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::with_standard_groups()
    }
}

impl GroupRegistry {
    /// Creates a registry with no names interned.
    pub fn empty() -> Self {
        Self {
            names: Vec::new(),
            ids: HashMap::new(),
        }
    }

    /// Creates a registry pre-seeded with the standard amino acids,
    /// nucleotides and water, in a fixed order.
    pub fn with_standard_groups() -> Self {
        let mut registry = Self::empty();
        for name in STANDARD_GROUP_NAMES {
            registry.intern(name);
        }
        registry
    }

    /// Returns the id of `name`, interning it on first use.
    pub fn intern(&mut self, name: &str) -> GroupNameId {
        let key = normalize(name);
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = GroupNameId(self.names.len() as u32);
        self.names.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    pub fn lookup(&self, name: &str) -> Option<GroupNameId> {
        self.ids.get(&normalize(name)).copied()
    }

    pub fn name(&self, id: GroupNameId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn is_proline(&self, id: GroupNameId) -> bool {
        self.name(id) == Some(PROLINE)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}
