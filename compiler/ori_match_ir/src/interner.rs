//! String interner for tag and binding names.
//!
//! Shapes and patterns are built up front; the parallel checks afterwards
//! only read names back when rendering witnesses. One table behind a
//! read-write lock covers both.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::Name;

#[derive(Default)]
struct Table {
    ids: FxHashMap<&'static str, Name>,
    strings: Vec<&'static str>,
}

/// Maps tag and binding strings to dense [`Name`]s, in interning order.
pub struct StringInterner {
    table: RwLock<Table>,
}

impl StringInterner {
    /// Create an interner holding only the empty string, as [`Name::EMPTY`].
    pub fn new() -> Self {
        let mut table = Table::default();
        table.ids.insert("", Name::EMPTY);
        table.strings.push("");
        Self {
            table: RwLock::new(table),
        }
    }

    /// Intern a string. The same string always yields the same name.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&name) = self.table.read().ids.get(s) {
            return name;
        }

        let mut table = self.table.write();
        // Another thread may have won the race between the two locks.
        if let Some(&name) = table.ids.get(s) {
            return name;
        }
        let raw = u32::try_from(table.strings.len())
            .unwrap_or_else(|_| panic!("more than u32::MAX interned names"));
        let name = Name::from_raw(raw);

        // Interned strings live for the rest of the process.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        table.strings.push(leaked);
        table.ids.insert(leaked, name);
        name
    }

    /// The string for a name issued by this interner.
    ///
    /// # Panics
    /// Panics if `name` was issued by a different interner.
    pub fn lookup(&self, name: Name) -> &str {
        self.table.read().strings[name.index()]
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves names back to strings, for rendering values.
pub trait StringLookup {
    fn lookup(&self, name: Name) -> &str;
}

impl StringLookup for StringInterner {
    fn lookup(&self, name: Name) -> &str {
        StringInterner::lookup(self, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_twice_yields_the_same_name() {
        let interner = StringInterner::new();
        let a = interner.intern("Move");
        let b = interner.intern("Move");
        assert_eq!(a, b);
        assert_eq!(interner.lookup(a), "Move");
    }

    #[test]
    fn names_are_dense_in_interning_order() {
        let interner = StringInterner::new();
        let quit = interner.intern("Quit");
        let write = interner.intern("Write");
        assert_eq!((quit.raw(), write.raw()), (1, 2));
        assert!(quit < write);
    }

    #[test]
    fn empty_string_is_pre_interned() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn parallel_interning_agrees() {
        use rayon::prelude::*;
        let interner = StringInterner::new();
        let names: Vec<Name> = (0..64)
            .into_par_iter()
            .map(|i| interner.intern(["Nil", "Cons"][i % 2]))
            .collect();
        assert!(names.chunks(2).all(|pair| pair == [names[0], names[1]]));
        assert_eq!(interner.lookup(names[1]), "Cons");
    }
}
