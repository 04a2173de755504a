// src/frontend/intern.rs

use rustc_hash::FxHashMap;

/// Unique identifier for an interned identifier string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub u32);

/// Interns identifier strings to unique `Symbol` ids.
#[derive(Debug, Default)]
pub struct Interner {
    map: FxHashMap<String, Symbol>,
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.to_string());
        self.map.insert(s.to_string(), sym);
        sym
    }

    /// Interns a dotted name, one symbol per component.
    pub fn intern_dotted(&mut self, dotted: &str) -> Vec<Symbol> {
        dotted.split('.').map(|part| self.intern(part)).collect()
    }

    /// Looks up an already-interned identifier without inserting it.
    pub fn lookup(&self, s: &str) -> Option<Symbol> {
        self.map.get(s).copied()
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }

    /// Renders a component sequence back to its dotted form.
    pub fn display_dotted(&self, parts: &[Symbol]) -> String {
        parts
            .iter()
            .map(|&sym| self.resolve(sym))
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_returns_same_symbol() {
        let mut interner = Interner::new();
        let a = interner.intern("Put_Line");
        let b = interner.intern("Put_Line");
        let c = interner.intern("Put");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn dotted_round_trip() {
        let mut interner = Interner::new();
        let name = interner.intern_dotted("Ada.Text_IO");
        assert_eq!(name.len(), 2);
        assert_eq!(interner.display_dotted(&name), "Ada.Text_IO");
    }
}
