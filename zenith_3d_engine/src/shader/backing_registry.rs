/// Backing registry - identifier-keyed lookup of live buffer backings
///
/// Programs that declare a block with the same name share one backing. The
/// registry only holds weak references: the interface blocks own the
/// backing, and once the last program using a block is dropped the backing
/// is dropped with it (releasing its buffer and binding point).

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use rustc_hash::FxHashMap;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::graphics_device::{BufferKind, GraphicsDevice};
use crate::shader::{BindingPointPool, BufferBacking, BufferBackingDesc, ReflectedVariable};

const SOURCE: &str = "zenith3d::BackingRegistry";

pub struct BackingRegistry {
    kind: BufferKind,
    device: Rc<dyn GraphicsDevice>,
    pool: Rc<RefCell<BindingPointPool>>,
    backings: RefCell<FxHashMap<String, Weak<BufferBacking>>>,
}

impl BackingRegistry {
    pub fn new(device: Rc<dyn GraphicsDevice>, pool: BindingPointPool) -> Self {
        Self {
            kind: pool.kind(),
            device,
            pool: Rc::new(RefCell::new(pool)),
            backings: RefCell::new(FxHashMap::default()),
        }
    }

    /// Return the live backing for `desc.identifier`, or create and register one
    ///
    /// A live backing whose layout differs from `desc` is an invariant
    /// violation: two programs disagree about the same block.
    pub fn request(&self, desc: BufferBackingDesc) -> Result<Rc<BufferBacking>> {
        if let Some(existing) = self.get(&desc.identifier) {
            if !Self::same_layout(&existing, &desc) {
                return Err(Engine::log_and_return_error(
                    SOURCE,
                    Error::InvariantViolation(format!(
                        "{:?} block '{}' is declared with different layouts",
                        self.kind, desc.identifier
                    )),
                ));
            }
            crate::engine_trace!(SOURCE, "Reusing {:?} backing '{}'", self.kind, desc.identifier);
            return Ok(existing);
        }

        let identifier = desc.identifier.clone();
        let backing = Rc::new(BufferBacking::new(self.device.clone(), self.pool.clone(), desc)?);

        let mut backings = self.backings.borrow_mut();
        backings.retain(|_, weak| weak.strong_count() > 0);
        backings.insert(identifier, Rc::downgrade(&backing));

        Ok(backing)
    }

    /// Whether `desc` describes the layout `existing` was created with
    ///
    /// Variables are matched by name: resource order is not stable across
    /// programs.
    fn same_layout(existing: &BufferBacking, desc: &BufferBackingDesc) -> bool {
        let known: FxHashMap<&str, &ReflectedVariable> = existing
            .variables()
            .iter()
            .map(|v| (v.name.as_str(), v))
            .collect();

        existing.size() == desc.size
            && known.len() == desc.variables.len()
            && desc
                .variables
                .iter()
                .all(|v| known.get(v.name.as_str()).is_some_and(|k| k.same_layout(v)))
    }

    /// Live backing registered under `identifier`
    pub fn get(&self, identifier: &str) -> Option<Rc<BufferBacking>> {
        self.backings.borrow().get(identifier).and_then(Weak::upgrade)
    }

    /// Number of live backings
    pub fn live_count(&self) -> usize {
        self.backings
            .borrow()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    pub fn pool(&self) -> &Rc<RefCell<BindingPointPool>> {
        &self.pool
    }
}

#[cfg(test)]
#[path = "backing_registry_tests.rs"]
mod tests;
