use std::collections::HashMap;

use crate::value::Value;

/// A single scope frame: immutable once pushed. `unpacked` marks frames that
/// spread an object context's fields into scope, which is what the `$`
/// escape peels away.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    bindings: HashMap<String, Value>,
    unpacked: bool,
}

impl Frame {
    pub fn insert(&mut self, name: impl ToString, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }
}

impl From<HashMap<String, Value>> for Frame {
    fn from(bindings: HashMap<String, Value>) -> Self {
        Self {
            bindings,
            unpacked: false,
        }
    }
}

/// The scope stack. The bottom frame holds the builtins (and any extras);
/// every context push appends one frame. Lookups walk from the innermost
/// frame outward.
#[derive(Debug, Clone)]
pub struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    pub fn new(bottom: Frame) -> Self {
        Self {
            frames: vec![bottom],
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(name))
            .cloned()
    }

    /// Pushes a context frame: `@` is the value, and an object's own fields
    /// become bare identifiers in the same frame.
    pub fn push_context(&self, value: &Value) -> Stack {
        let mut bindings = HashMap::new();
        let mut unpacked = false;

        if let Value::Object(entries) = value {
            for (key, entry) in entries {
                bindings.insert(key.clone(), entry.clone());
            }
            unpacked = true;
        }
        bindings.insert("@".to_string(), value.clone());

        let mut frames = self.frames.clone();
        frames.push(Frame { bindings, unpacked });

        Stack { frames }
    }

    /// The `$` escape: for each level, drops frames down to and including
    /// the innermost unpacked frame. Context frames for non-object values
    /// carry no fields and are dropped on the way. The bottom frame always
    /// survives.
    pub fn escape(&self, depth: usize) -> Stack {
        let mut frames = self.frames.clone();

        for _ in 0..depth {
            while frames.len() > 1 {
                let done = frames[frames.len() - 1].unpacked;
                frames.pop();
                if done {
                    break;
                }
            }
        }

        Stack { frames }
    }
}
