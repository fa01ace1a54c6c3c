/// Canonical key of an unordered atom pair, lower index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    i: usize,
    j: usize,
}

impl PairKey {
    /// # Panics
    ///
    /// Panics if `a == b`.
    pub fn new(a: usize, b: usize) -> Self {
        assert_ne!(a, b, "a pair key needs two distinct atoms");
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        Self { i, j }
    }

    pub fn i(&self) -> usize {
        self.i
    }

    pub fn j(&self) -> usize {
        self.j
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.i == atom || self.j == atom
    }
}

/// Canonical key of an unordered atom triple, indices ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripleKey {
    i: usize,
    j: usize,
    k: usize,
}

impl TripleKey {
    /// # Panics
    ///
    /// Panics if any two indices are equal.
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        let mut sorted = [a, b, c];
        sorted.sort_unstable();
        let [i, j, k] = sorted;
        assert!(i != j && j != k, "a triple key needs three distinct atoms");
        Self { i, j, k }
    }

    pub fn i(&self) -> usize {
        self.i
    }

    pub fn j(&self) -> usize {
        self.j
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.i, self.j, self.k]
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.indices().contains(&atom)
    }

    /// The pairs `(i, j)` and `(i, k)` whose tori define the cavity.
    pub fn leading_pairs(&self) -> (PairKey, PairKey) {
        (
            PairKey { i: self.i, j: self.j },
            PairKey { i: self.i, j: self.k },
        )
    }
}
