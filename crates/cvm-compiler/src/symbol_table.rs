//! Label name to byte offset map used during assembly.
//!
//! Fixed number of buckets, chained on collision. The table never shrinks
//! and never rehashes; it lives only for the duration of one compile.

/// Bucket count. Prime, so the `h * 31 + b` hash spreads short names well.
pub const BUCKETS: usize = 101;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    offset: usize,
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    buckets: Vec<Vec<Entry>>,
    len: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); BUCKETS],
            len: 0,
        }
    }

    /// Bind `name` to `offset`, overwriting any previous binding.
    ///
    /// Returns `true` if the name was already present.
    pub fn insert(&mut self, name: &str, offset: usize) -> bool {
        let chain = &mut self.buckets[bucket(name)];
        if let Some(entry) = chain.iter_mut().find(|e| e.name == name) {
            entry.offset = offset;
            return true;
        }

        chain.push(Entry {
            name: name.to_owned(),
            offset,
        });
        self.len += 1;
        false
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.buckets[bucket(name)]
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.offset)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All bindings, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.buckets
            .iter()
            .flatten()
            .map(|e| (e.name.as_str(), e.offset))
    }
}

/// `h = h * 31 + b` over the name's bytes, reduced to a bucket index.
pub fn hash(name: &str) -> u32 {
    name.bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)))
}

fn bucket(name: &str) -> usize {
    hash(name) as usize % BUCKETS
}
