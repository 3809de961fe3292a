use bumpalo::Bump;

use super::ancestor::{Ancestor, AncestorType};
use crate::ast::{AstBuilder, Box};

/// Traverse context.
///
/// Passed to every hook of a [`Traverse`](super::Traverse) implementation.
/// Gives access to:
/// - the parent and further ancestors of the node being visited
/// - sibling fields of those ancestors, through their accessors
/// - node construction in the traversal's arena, via `ctx.ast`
pub struct TraverseCtx<'a> {
    stack: std::vec::Vec<Ancestor<'a>>,
    root: Ancestor<'a>,
    pub ast: AstBuilder<'a>,
    stats: TraverseStats,
    #[cfg(test)]
    pub(crate) ops: std::vec::Vec<StackOp>,
}

/// A stack operation, as logged in tests.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StackOp {
    Push(AncestorType),
    Retag(AncestorType),
    Pop,
}

/// Stack operation counters.
///
/// [`TraverseCtx::stats`] accumulates over the context's whole life; the
/// counters returned by [`traverse_node`](super::traverse_node) cover that
/// call only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraverseStats {
    pub pushes: usize,
    pub pops: usize,
    pub retags: usize,
    /// Deepest stack reached, counted from the depth the walk started at.
    pub max_depth: usize,
}

/// Context state when a walk started, to derive that walk's counters.
pub(crate) struct WalkStart {
    depth: usize,
    stats: TraverseStats,
}

/// Return value of a [`TraverseCtx::find_ancestor`] finder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinderRet<T> {
    /// Stop walking up and return `Some(value)`.
    Found(T),
    /// Stop walking up and return `None`.
    Stop,
    /// Try the next ancestor.
    Continue,
}

impl<'a> TraverseCtx<'a> {
    pub fn new(allocator: &'a Bump) -> Self {
        Self {
            stack: std::vec::Vec::with_capacity(32),
            root: Ancestor::None,
            ast: AstBuilder::new(allocator),
            stats: TraverseStats::default(),
            #[cfg(test)]
            ops: std::vec::Vec::new(),
        }
    }

    /// Allocate a node in the arena.
    #[inline]
    pub fn alloc<T>(&self, node: T) -> Box<'a, T> {
        self.ast.alloc(node)
    }

    /// Parent of the current node. `Ancestor::None` when visiting the root.
    #[inline]
    pub fn parent(&self) -> &Ancestor<'a> {
        self.stack.last().unwrap_or(&self.root)
    }

    /// Parent of the current node, for mutating its other fields.
    #[inline]
    pub fn parent_mut(&mut self) -> &mut Ancestor<'a> {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    /// Ancestor `level` steps up. `ancestor(1)` is the parent; `ancestor(0)`
    /// and levels above the root are `None`.
    #[inline]
    pub fn ancestor(&self, level: usize) -> Option<&Ancestor<'a>> {
        let index = self.stack.len().checked_sub(level)?;
        self.stack.get(index)
    }

    pub fn ancestor_mut(&mut self, level: usize) -> Option<&mut Ancestor<'a>> {
        let index = self.stack.len().checked_sub(level)?;
        self.stack.get_mut(index)
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Ancestor<'a>> + '_ {
        self.stack.iter().rev()
    }

    /// The ancestor stack, root first.
    pub fn stack(&self) -> &[Ancestor<'a>] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn stats(&self) -> TraverseStats {
        self.stats
    }

    /// Walk up the ancestors, nearest first, until `finder` decides.
    pub fn find_ancestor<F, O>(&self, mut finder: F) -> Option<O>
    where
        F: FnMut(&Ancestor<'a>) -> FinderRet<O>,
    {
        for ancestor in self.ancestors() {
            match finder(ancestor) {
                FinderRet::Found(value) => return Some(value),
                FinderRet::Stop => return None,
                FinderRet::Continue => {}
            }
        }
        None
    }

    #[inline]
    pub(crate) fn push_stack(&mut self, ancestor: Ancestor<'a>) {
        #[cfg(test)]
        self.ops.push(StackOp::Push(ancestor.ty()));
        self.stack.push(ancestor);
        self.stats.pushes += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.stack.len());
    }

    /// Pop the entry pushed by the same walk routine.
    #[inline]
    pub(crate) fn pop_stack(&mut self) {
        let popped = self.stack.pop();
        debug_assert!(popped.is_some(), "pop on empty ancestor stack");
        #[cfg(test)]
        self.ops.push(StackOp::Pop);
        self.stats.pops += 1;
    }

    /// Point the top entry at another field of the same node.
    ///
    /// # Safety
    ///
    /// The stack must not be empty, and `ty` must belong to the same struct
    /// as the top entry, so its pointer keeps pointing at the right type.
    #[inline]
    pub(crate) unsafe fn retag_stack(&mut self, ty: AncestorType) {
        debug_assert!(!self.stack.is_empty(), "retag on empty ancestor stack");
        // SAFETY: caller guarantees the stack is non-empty.
        let last = unsafe { self.stack.last_mut().unwrap_unchecked() };
        // SAFETY: the first byte of a `repr(C, u8)` enum is its discriminant,
        // and the payload layout is shared by every tag of one struct.
        unsafe { *(last as *mut Ancestor<'a> as *mut AncestorType) = ty };
        #[cfg(test)]
        self.ops.push(StackOp::Retag(ty));
        self.stats.retags += 1;
    }

    /// Start counting a walk from the current depth.
    pub(crate) fn begin_walk(&mut self) -> WalkStart {
        let start = WalkStart {
            depth: self.stack.len(),
            stats: self.stats,
        };
        self.stats.max_depth = start.depth;
        start
    }

    /// Counters of the walk begun at `start`. The context's own peak depth
    /// is restored if the walk stayed below it.
    pub(crate) fn end_walk(&mut self, start: WalkStart) -> TraverseStats {
        let walk = TraverseStats {
            pushes: self.stats.pushes - start.stats.pushes,
            pops: self.stats.pops - start.stats.pops,
            retags: self.stats.retags - start.stats.retags,
            max_depth: self.stats.max_depth - start.depth,
        };
        self.stats.max_depth = self.stats.max_depth.max(start.stats.max_depth);
        walk
    }

    /// Drop the frames a failed walk left above `depth`, innermost first.
    pub(crate) fn unwind_to(&mut self, depth: usize) {
        while self.stack.len() > depth {
            if let Some(ancestor) = self.stack.pop() {
                tracing::trace!(ancestor = ancestor.ty().name(), "unwinding");
                #[cfg(test)]
                self.ops.push(StackOp::Pop);
                self.stats.pops += 1;
            }
        }
    }
}
