//! Lexical scope stack
//!
//! A stack of name→binding frames shared by the validation pass (bindings are
//! type + mutability) and the interpreter (bindings are storage cells).
//! Lookup walks from the innermost frame outward; definition always targets
//! the innermost frame.

use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct ScopeStack<T> {
    frames: Vec<FxHashMap<String, T>>,
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScopeStack<T> {
    /// A stack holding one empty frame (the function-body scope).
    pub fn new() -> Self {
        Self {
            frames: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// Drop the innermost frame. The outermost frame is never removed.
    pub fn pop_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Forget every binding in the innermost frame.
    pub fn clear_top(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.clear();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Bind `name` in the innermost frame.
    ///
    /// Returns `false` and leaves the frame untouched if the innermost frame
    /// already binds `name`. Outer bindings may be shadowed.
    pub fn define(&mut self, name: &str, binding: T) -> bool {
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        if frame.contains_key(name) {
            return false;
        }
        frame.insert(name.to_string(), binding);
        true
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_outward() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.define("x", 1));
        scopes.push_scope();
        assert!(scopes.define("y", 2));
        assert_eq!(scopes.get("x"), Some(&1));
        assert_eq!(scopes.get("y"), Some(&2));
        scopes.pop_scope();
        assert_eq!(scopes.get("y"), None);
    }

    #[test]
    fn test_redefinition_in_same_frame_fails() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.define("x", 1));
        assert!(!scopes.define("x", 2));
        assert_eq!(scopes.get("x"), Some(&1));
    }

    #[test]
    fn test_shadowing_inner_frame() {
        let mut scopes = ScopeStack::new();
        scopes.define("x", 1);
        scopes.push_scope();
        assert!(scopes.define("x", 2));
        assert_eq!(scopes.get("x"), Some(&2));
        scopes.clear_top();
        assert_eq!(scopes.get("x"), Some(&1));
    }

    #[test]
    fn test_outermost_frame_survives_pop() {
        let mut scopes: ScopeStack<i32> = ScopeStack::new();
        scopes.pop_scope();
        assert_eq!(scopes.depth(), 1);
        assert!(scopes.define("x", 1));
    }
}
