//! Service identity and instance handles

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Identity of a requested service.
///
/// A `ServiceId` names the type a binding answers for and a request asks for.
/// It pairs the `TypeId` (the actual identity) with the static type name,
/// which is carried only for diagnostics and error messages.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId {
    type_id: TypeId,
    name: &'static str,
}

impl ServiceId {
    /// Identity of the service type `T`.
    ///
    /// `T` may be unsized, so trait-object services (`ServiceId::of::<dyn
    /// Logger>()`) work the same way as concrete ones.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying type identity
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human-readable type name, for diagnostics only
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceId({})", self.name)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A resolved service instance, shared and type-erased.
///
/// Providers produce instances in this form; callers recover the concrete
/// type with [`downcast_instance`] or the kernel's typed accessors.
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// Downcast a shared instance to its concrete type.
///
/// Returns `None` when the instance is not a `T`.
pub fn downcast_instance<T: Any + Send + Sync>(instance: &ServiceInstance) -> Option<Arc<T>> {
    instance.clone().downcast::<T>().ok()
}
