//! Field-reference registry: the mapping between a form's fixed field-name
//! list and the live input widgets currently rendered for those names.
//!
//! A form page constructs one [`FieldRegistry`] from its ordered field-name
//! list, hands every widget a [`RegistrationCallback`] for its name, and
//! later reads the collected values through the accessors here. Widgets
//! attach their handle when they mount and detach it when they unmount;
//! nothing else writes to the mapping.
//!
//! Accessor split:
//! - [`FieldRegistry::value`] and [`FieldRegistry::submission_payload`] are
//!   strict: a missing handle is a usage bug (reading before render) and
//!   surfaces as [`RegistryError::UnregisteredField`].
//! - [`FieldRegistry::values`] is best-effort and never fails; unmounted
//!   fields read as `None`. Use it where partial data is acceptable, e.g.
//!   logging form state before the page has fully mounted.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use derive_deref::Deref;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

/// A live reference to a rendered input-like element.
///
/// Widgets implement this on their shared state; the registry only ever
/// uses these two methods.
pub trait FieldHandle {
    /// Current text value of the input.
    fn value(&self) -> String;

    /// Move keyboard focus to the input.
    fn focus(&mut self);
}

/// Shared handle reference as stored by the registry.
///
/// `Rc<RefCell<_>>` rather than `Arc<Mutex<_>>`: the registry lives on the
/// single UI task and is exclusively owned by the form that created it.
pub type HandleRef = Rc<RefCell<dyn FieldHandle>>;

/// Ordered (name, value) pairs in field-name order, shaped for direct use
/// as a multipart/form submission body.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct SubmissionPayload(pub Vec<(String, String)>);

/// Errors raised by the strict accessors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No handle is currently mounted for the named field.
    #[error("no handle registered for field '{name}'")]
    UnregisteredField { name: String },
}

struct Inner {
    /// Ordered field names, fixed at construction.
    names: Vec<String>,
    /// Invariant: the key set is exactly `names` for the registry's lifetime.
    handles: RefCell<HashMap<String, Option<HandleRef>>>,
}

/// Registry of field handles for a single form instance.
///
/// Created once per form, dropped with it. Not `Clone`: the form that
/// constructed it is the only owner of the backing mapping. The
/// registration callbacks handed to widgets keep an internal reference so
/// mount and unmount events land in the same mapping.
pub struct FieldRegistry {
    inner: Rc<Inner>,
}

impl FieldRegistry {
    /// Build a registry over `names`, every field starting unmounted.
    ///
    /// `names` must not contain duplicates; that is a caller contract, only
    /// checked in debug builds.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        debug_assert!(
            names
                .iter()
                .collect::<std::collections::HashSet<_>>()
                .len()
                == names.len(),
            "duplicate field names passed to FieldRegistry::new"
        );
        let handles = names.iter().map(|n| (n.clone(), None)).collect();
        Self {
            inner: Rc::new(Inner {
                names,
                handles: RefCell::new(handles),
            }),
        }
    }

    /// The ordered field-name list this registry was built from.
    pub fn names(&self) -> &[String] {
        &self.inner.names
    }

    /// Obtain the mount/unmount callback for `name`.
    ///
    /// The callback never fails. Invoked with `Some(handle)` it stores the
    /// handle if `name` is one of the registry's fields and is a no-op
    /// otherwise; invoked with `None` it clears the stored handle.
    pub fn register_handle(&self, name: impl Into<String>) -> RegistrationCallback {
        RegistrationCallback {
            inner: Rc::clone(&self.inner),
            name: name.into(),
        }
    }

    /// Current value of the field mounted at `name`.
    ///
    /// Reads through to the live handle, never a cached copy. Fails when no
    /// handle is mounted; a silent empty string here would bury a
    /// mount-before-read bug.
    pub fn value(&self, name: &str) -> Result<String, RegistryError> {
        let handles = self.inner.handles.borrow();
        match handles.get(name).and_then(|slot| slot.as_ref()) {
            Some(handle) => Ok(handle.borrow().value()),
            None => Err(RegistryError::UnregisteredField { name: name.into() }),
        }
    }

    /// Best-effort snapshot of every field, in field-name order.
    ///
    /// The result always has exactly the registry's key set; unmounted
    /// fields map to `None`. This accessor never fails.
    pub fn values(&self) -> IndexMap<String, Option<String>> {
        let handles = self.inner.handles.borrow();
        self.inner
            .names
            .iter()
            .map(|name| {
                let value = handles
                    .get(name)
                    .and_then(|slot| slot.as_ref())
                    .map(|handle| handle.borrow().value());
                (name.clone(), value)
            })
            .collect()
    }

    /// All (name, value) pairs in field-name order as a [`SubmissionPayload`].
    ///
    /// All-or-nothing: fails naming the first unmounted field, partial
    /// payloads are never returned.
    pub fn submission_payload(&self) -> Result<SubmissionPayload, RegistryError> {
        let handles = self.inner.handles.borrow();
        let mut pairs = Vec::with_capacity(self.inner.names.len());
        for name in &self.inner.names {
            match handles.get(name).and_then(|slot| slot.as_ref()) {
                Some(handle) => pairs.push((name.clone(), handle.borrow().value())),
                None => {
                    return Err(RegistryError::UnregisteredField { name: name.clone() });
                }
            }
        }
        Ok(SubmissionPayload(pairs))
    }

    /// The possibly-absent handle mounted at `name`.
    ///
    /// The `Option` is the presence check: callers that want `focus()` must
    /// go through it rather than assume the field has mounted.
    pub fn handle(&self, name: &str) -> Option<HandleRef> {
        self.inner
            .handles
            .borrow()
            .get(name)
            .and_then(|slot| slot.clone())
    }

    /// Presence predicate with no side effect.
    pub fn is_registered(&self, name: &str) -> bool {
        self.inner
            .handles
            .borrow()
            .get(name)
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }
}

/// Mount/unmount callback bound to one (registry, field-name) pair.
///
/// Cloneable so the rendering layer can wire the same field's mount and
/// unmount sites independently. The explicit attach/detach pair keeps the
/// registry independent of any particular rendering framework's lifecycle
/// hooks.
#[derive(Clone)]
pub struct RegistrationCallback {
    inner: Rc<Inner>,
    name: String,
}

impl RegistrationCallback {
    /// One-argument form: `Some(handle)` on mount, `None` on unmount.
    pub fn call(&self, handle: Option<HandleRef>) {
        let mut handles = self.inner.handles.borrow_mut();
        match handles.get_mut(&self.name) {
            Some(slot) => *slot = handle,
            None => {
                // Unknown name: deliberately a no-op, the mapping stays intact.
                debug!(name = %self.name, "ignoring registration for unknown field");
            }
        }
    }

    /// Store `handle` for this field (mount).
    pub fn attach(&self, handle: HandleRef) {
        self.call(Some(handle));
    }

    /// Clear the stored handle for this field (unmount).
    pub fn detach(&self) {
        self.call(None);
    }

    /// The field name this callback is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct TestHandle {
        value: String,
        focused: bool,
    }

    impl FieldHandle for TestHandle {
        fn value(&self) -> String {
            self.value.clone()
        }

        fn focus(&mut self) {
            self.focused = true;
        }
    }

    fn handle(value: &str) -> Rc<RefCell<TestHandle>> {
        Rc::new(RefCell::new(TestHandle {
            value: value.into(),
            focused: false,
        }))
    }

    #[test]
    fn fresh_registry_snapshots_every_name_as_absent() {
        let registry = FieldRegistry::new(["name", "desc", "select"]);
        let values = registry.values();
        assert_eq!(
            values.keys().collect::<Vec<_>>(),
            vec!["name", "desc", "select"]
        );
        assert!(values.values().all(|v| v.is_none()));
    }

    #[test]
    fn value_reads_through_to_the_live_handle() {
        let registry = FieldRegistry::new(["name"]);
        let h = handle("Fire");
        registry.register_handle("name").attach(h.clone());

        assert_eq!(registry.value("name").unwrap(), "Fire");

        // Not a cached copy: mutating the handle is visible on the next read.
        h.borrow_mut().value = "Water".into();
        assert_eq!(registry.value("name").unwrap(), "Water");
    }

    #[test]
    fn value_fails_before_any_mount() {
        let registry = FieldRegistry::new(["name", "desc"]);
        assert_eq!(
            registry.value("desc"),
            Err(RegistryError::UnregisteredField {
                name: "desc".into()
            })
        );
    }

    #[test]
    fn detach_makes_value_fail_again() {
        let registry = FieldRegistry::new(["name"]);
        let callback = registry.register_handle("name");
        callback.attach(handle("Fire"));
        assert!(registry.value("name").is_ok());

        callback.detach();
        assert_eq!(
            registry.value("name"),
            Err(RegistryError::UnregisteredField {
                name: "name".into()
            })
        );
    }

    #[test]
    fn unknown_name_registration_is_a_no_op() {
        let registry = FieldRegistry::new(["name"]);
        registry.register_handle("bogus").attach(handle("x"));

        let values = registry.values();
        assert_eq!(values.keys().collect::<Vec<_>>(), vec!["name"]);
        assert!(!registry.is_registered("bogus"));
        // The strict accessor treats it like any other unmounted name.
        assert!(registry.value("bogus").is_err());
    }

    #[test]
    fn payload_is_all_or_nothing() {
        let registry = FieldRegistry::new(["name", "desc", "select"]);
        registry.register_handle("name").attach(handle("Fire"));
        registry.register_handle("select").attach(handle("rouge"));

        // "desc" is the first unmounted name in declaration order.
        assert_eq!(
            registry.submission_payload(),
            Err(RegistryError::UnregisteredField {
                name: "desc".into()
            })
        );

        registry.register_handle("desc").attach(handle("A deck"));
        assert_eq!(
            *registry.submission_payload().unwrap(),
            vec![
                ("name".to_string(), "Fire".to_string()),
                ("desc".to_string(), "A deck".to_string()),
                ("select".to_string(), "rouge".to_string()),
            ]
        );
    }

    #[test]
    fn partial_snapshot_never_fails() {
        let registry = FieldRegistry::new(["name", "desc"]);
        registry.register_handle("name").attach(handle("Fire"));

        let values = registry.values();
        assert_eq!(values["name"], Some("Fire".to_string()));
        assert_eq!(values["desc"], None);
    }

    #[test]
    fn handle_accessor_narrows_presence_and_allows_focus() {
        let registry = FieldRegistry::new(["name"]);
        assert!(registry.handle("name").is_none());
        assert!(!registry.is_registered("name"));

        let h = handle("Fire");
        registry.register_handle("name").attach(h.clone());
        assert!(registry.is_registered("name"));

        let stored = registry.handle("name").expect("mounted above");
        stored.borrow_mut().focus();
        assert!(h.borrow().focused);
    }

    #[test]
    fn callbacks_for_the_same_name_share_the_mapping() {
        let registry = FieldRegistry::new(["name"]);
        let mount = registry.register_handle("name");
        let unmount = mount.clone();

        mount.attach(handle("Fire"));
        assert!(registry.is_registered("name"));
        unmount.detach();
        assert!(!registry.is_registered("name"));
    }
}
