use fxhash::FxHashMap;

/// Mints innovation ids for new connections. Within one generation, every connection over the
/// same `(from, to)` path shares an id, so that independently evolved copies of a structure
/// still line up during crossover. The head only ever grows; [InnoGen::next_generation] forgets
/// the paths seen so far, but never rewinds.
#[derive(Debug, Clone, Default)]
pub struct InnoGen {
    pub head: usize,
    seen: FxHashMap<(usize, usize), usize>,
}

impl InnoGen {
    pub fn new(head: usize) -> Self {
        Self {
            head,
            seen: FxHashMap::default(),
        }
    }

    pub fn path(&mut self, v: (usize, usize)) -> usize {
        match self.seen.get(&v) {
            Some(n) => *n,
            None => {
                let n = self.head;
                self.head += 1;
                self.seen.insert(v, n);
                n
            }
        }
    }

    /// Forget every path minted this generation
    pub fn next_generation(&mut self) {
        self.seen.clear();
    }

    /// number of distinct paths minted this generation
    pub fn minted(&self) -> usize {
        self.seen.len()
    }
}
