//! Per-pass resolution state

use std::path::{Path, PathBuf};

/// Tracks the chain of partial files currently being resolved.
///
/// A fresh context is created for every top-level document; nothing carries
/// over between documents.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    stack: Vec<PathBuf>,
}

impl ResolutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a file is already being resolved further up the chain
    pub fn is_resolving(&self, path: &Path) -> bool {
        self.stack.iter().any(|p| p == path)
    }

    /// Mark a file as being resolved
    pub fn start_resolving(&mut self, path: &Path) {
        self.stack.push(path.to_path_buf());
    }

    /// Mark the innermost file as done
    pub fn done_resolving(&mut self) {
        self.stack.pop();
    }

    /// Current inclusion depth (0 for the top-level document)
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Render the chain ending in `path`, e.g. `a.html -> b.html -> a.html`
    pub fn chain_to(&self, path: &Path) -> String {
        self.stack
            .iter()
            .map(|p| p.display().to_string())
            .chain(std::iter::once(path.display().to_string()))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_tracking() {
        let mut ctx = ResolutionContext::new();
        let a = Path::new("a.html");
        let b = Path::new("b.html");

        ctx.start_resolving(a);
        ctx.start_resolving(b);
        assert!(ctx.is_resolving(a));
        assert_eq!(ctx.depth(), 2);
        assert_eq!(ctx.chain_to(a), "a.html -> b.html -> a.html");

        ctx.done_resolving();
        assert!(!ctx.is_resolving(b));
        assert_eq!(ctx.depth(), 1);
    }
}
