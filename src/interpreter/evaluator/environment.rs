use rustc_hash::FxHashMap;

use crate::interpreter::{semantic::types::Type, value::core::Value};

/// Checked handle to a frame in [`Environments`].
///
/// A handle whose frame has been released no longer resolves, even if the
/// slot has since been reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvId {
    index:      usize,
    generation: u32,
}

/// A variable slot.
#[derive(Debug, Clone)]
pub struct Binding {
    pub value:         Value,
    pub mutable:       bool,
    /// `false` for a declaration without initializer until first assigned.
    pub initialized:   bool,
    /// The annotated type, if any.
    pub declared_type: Option<Type>,
}

impl Binding {
    /// An initialized binding without a declared type.
    #[must_use]
    pub const fn new(value: Value, mutable: bool) -> Self {
        Self { value,
               mutable,
               initialized: true,
               declared_type: None }
    }
}

/// Why [`Environments::set`] refused an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetError {
    Undefined,
    Immutable,
}

#[derive(Debug)]
struct Frame {
    bindings: FxHashMap<String, Binding>,
    parent:   Option<EnvId>,
    captured: bool,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    frame:      Option<Frame>,
}

/// Arena of runtime variable frames linked by parent handles.
///
/// One frame is pushed per block entry and per function call and released
/// when that activation ends. A frame marked as captured by a closure is
/// never released.
///
/// # Example
/// ```
/// use ktinterp::interpreter::{
///     evaluator::environment::{Binding, Environments},
///     value::core::Value,
/// };
///
/// let mut envs = Environments::new();
/// let global = envs.push(None);
/// envs.define(global, "x", Binding::new(Value::Int(1), true));
///
/// let block = envs.push(Some(global));
/// envs.set(block, "x", Value::Int(2)).unwrap();
/// envs.release(block);
///
/// assert_eq!(envs.get(global, "x").map(|b| &b.value), Some(&Value::Int(2)));
/// assert!(envs.get(block, "x").is_none());
/// ```
#[derive(Debug, Default)]
pub struct Environments {
    slots: Vec<Slot>,
    free:  Vec<usize>,
}

impl Environments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an empty frame whose lookups fall through to `parent`.
    pub fn push(&mut self, parent: Option<EnvId>) -> EnvId {
        let frame = Frame { bindings: FxHashMap::default(),
                            parent,
                            captured: false };

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.frame = Some(frame);
            EnvId { index,
                    generation: slot.generation }
        } else {
            self.slots.push(Slot { generation: 0,
                                   frame:      Some(frame), });
            EnvId { index:      self.slots.len() - 1,
                    generation: 0, }
        }
    }

    /// Frees a frame unless a closure captured it. Stale handles are ignored.
    pub fn release(&mut self, id: EnvId) {
        let Some(slot) = self.slots.get_mut(id.index) else {
            return;
        };
        if slot.generation != id.generation || slot.frame.as_ref().is_none_or(|f| f.captured) {
            return;
        }
        slot.frame = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
    }

    /// Keeps the frame alive for the rest of the run.
    pub fn capture(&mut self, id: EnvId) {
        if let Some(frame) = self.frame_mut(id) {
            frame.captured = true;
        }
    }

    /// Number of frames currently alive.
    #[must_use]
    pub fn live_frames(&self) -> usize {
        self.slots.iter().filter(|s| s.frame.is_some()).count()
    }

    /// Binds `name` in frame `id`, replacing any binding of the same name in
    /// that frame.
    pub fn define(&mut self, id: EnvId, name: impl Into<String>, binding: Binding) {
        if let Some(frame) = self.frame_mut(id) {
            frame.bindings.insert(name.into(), binding);
        }
    }

    /// Resolves `name` starting at frame `id` and walking parent links.
    #[must_use]
    pub fn get(&self, id: EnvId, name: &str) -> Option<&Binding> {
        let owner = self.resolve(id, name)?;
        self.frame(owner)?.bindings.get(name)
    }

    /// Replaces the value of the nearest binding of `name`.
    ///
    /// A `val` may be set only while it is still uninitialized.
    ///
    /// # Errors
    /// [`SetError::Undefined`] if no frame in the chain binds `name`;
    /// [`SetError::Immutable`] for an initialized `val`.
    pub fn set(&mut self, id: EnvId, name: &str, value: Value) -> Result<(), SetError> {
        let owner = self.resolve(id, name).ok_or(SetError::Undefined)?;
        let binding = self.frame_mut(owner)
                          .and_then(|f| f.bindings.get_mut(name))
                          .ok_or(SetError::Undefined)?;

        if !binding.mutable && binding.initialized {
            return Err(SetError::Immutable);
        }
        binding.value = value;
        binding.initialized = true;
        Ok(())
    }

    fn resolve(&self, id: EnvId, name: &str) -> Option<EnvId> {
        let mut current = Some(id);
        while let Some(id) = current {
            let frame = self.frame(id)?;
            if frame.bindings.contains_key(name) {
                return Some(id);
            }
            current = frame.parent;
        }
        None
    }

    fn frame(&self, id: EnvId) -> Option<&Frame> {
        self.slots
            .get(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.frame.as_ref())
    }

    fn frame_mut(&mut self, id: EnvId) -> Option<&mut Frame> {
        self.slots
            .get_mut(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.frame.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_frames_shadow_and_do_not_leak() {
        let mut envs = Environments::new();
        let global = envs.push(None);
        envs.define(global, "x", Binding::new(Value::Int(1), false));

        let block = envs.push(Some(global));
        envs.define(block, "x", Binding::new(Value::Int(5), true));
        assert_eq!(envs.get(block, "x").unwrap().value, Value::Int(5));
        envs.release(block);

        assert_eq!(envs.get(global, "x").unwrap().value, Value::Int(1));
    }

    #[test]
    fn released_slots_are_reused_with_a_new_generation() {
        let mut envs = Environments::new();
        let global = envs.push(None);
        let first = envs.push(Some(global));
        envs.define(first, "a", Binding::new(Value::Unit, true));
        envs.release(first);

        let second = envs.push(Some(global));
        assert_ne!(first, second);
        assert!(envs.get(first, "a").is_none());
        assert!(envs.get(second, "a").is_none());
        assert_eq!(envs.live_frames(), 2);
    }

    #[test]
    fn captured_frames_survive_release() {
        let mut envs = Environments::new();
        let frame = envs.push(None);
        envs.define(frame, "n", Binding::new(Value::Int(7), true));
        envs.capture(frame);
        envs.release(frame);
        assert_eq!(envs.get(frame, "n").unwrap().value, Value::Int(7));
    }

    #[test]
    fn set_respects_mutability() {
        let mut envs = Environments::new();
        let global = envs.push(None);
        envs.define(global, "v", Binding::new(Value::Int(1), false));
        envs.define(global,
                    "late",
                    Binding { value:         Value::Unit,
                              mutable:       false,
                              initialized:   false,
                              declared_type: None, });

        assert_eq!(envs.set(global, "v", Value::Int(2)), Err(SetError::Immutable));
        assert_eq!(envs.set(global, "missing", Value::Int(2)), Err(SetError::Undefined));
        assert_eq!(envs.set(global, "late", Value::Int(3)), Ok(()));
        assert_eq!(envs.set(global, "late", Value::Int(4)), Err(SetError::Immutable));
    }
}
