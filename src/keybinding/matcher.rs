use anyhow::Result;

use super::{Binding, BindingStore, SHORTCUTS, Shortcut, ShortcutError, ShortcutType};

/// Resolves key chords against the shortcut catalog using the bindings held
/// in a [`BindingStore`].
///
/// Bindings are read once on construction and again on every
/// [`reload`](Self::reload). A stored value that is missing or does not
/// parse is replaced by the shortcut's default, which is written back.
#[derive(Debug)]
pub struct ShortcutMatcher<S: BindingStore> {
    store: S,
    bindings: [Binding; ShortcutType::COUNT],
}

impl<S: BindingStore> ShortcutMatcher<S> {
    pub fn new(store: S) -> Self {
        let mut matcher = Self {
            store,
            bindings: SHORTCUTS.map(|shortcut| shortcut.default_binding),
        };
        matcher.reload();
        matcher
    }

    /// Re-read every binding from the store.
    pub fn reload(&mut self) {
        for shortcut in &SHORTCUTS {
            self.bindings[shortcut.kind.index()] = self.load_binding(shortcut);
        }
    }

    fn load_binding(&mut self, shortcut: &Shortcut) -> Binding {
        let key = shortcut.kind.as_str();
        match self.store.load(key) {
            Some(raw) => match raw.parse::<Binding>() {
                Ok(binding) => return binding,
                Err(err) => {
                    tracing::warn!(shortcut = key, value = %raw, %err, "invalid key binding, reverting to default");
                }
            },
            None => tracing::debug!(shortcut = key, "no stored key binding, writing default"),
        }
        let default = shortcut.default_binding;
        if let Err(err) = self.store.store(key, &default.to_string()) {
            tracing::warn!(shortcut = key, %err, "failed to persist default key binding");
        }
        default
    }

    pub fn get(&self, kind: ShortcutType) -> Binding {
        self.bindings[kind.index()]
    }

    /// Persist `binding` for `kind` and reload.
    ///
    /// # Errors
    /// Fails if the binding has no accelerator name or the store cannot be
    /// written.
    pub fn set(&mut self, kind: ShortcutType, binding: Binding) -> Result<()> {
        let name = binding
            .accelerator_name()
            .ok_or(ShortcutError::Unrepresentable(kind))?;
        self.store.store(kind.as_str(), &name)?;
        self.reload();
        Ok(())
    }

    /// Restore and persist the default binding for `kind`.
    ///
    /// # Errors
    /// Fails if the store cannot be written.
    pub fn reset(&mut self, kind: ShortcutType) -> Result<()> {
        self.set(kind, kind.meta().default_binding)
    }

    /// First shortcut in catalog order triggered by `input`.
    pub fn check(&self, input: Binding) -> Option<ShortcutType> {
        SHORTCUTS
            .iter()
            .find(|shortcut| input.triggers(self.get(shortcut.kind), shortcut.case_sensitive))
            .map(|shortcut| shortcut.kind)
    }

    pub fn is(&self, input: Binding, kind: ShortcutType) -> bool {
        self.check(input) == Some(kind)
    }

    /// Another shortcut whose stored binding is exactly `binding`.
    pub fn find_conflict(&self, binding: Binding, excluding: ShortcutType) -> Option<ShortcutType> {
        SHORTCUTS
            .iter()
            .filter(|shortcut| shortcut.kind != excluding)
            .find(|shortcut| binding.same_as(self.get(shortcut.kind), shortcut.case_sensitive))
            .map(|shortcut| shortcut.kind)
    }

    /// Every shortcut with its current binding, in catalog order.
    pub fn all(&self) -> impl Iterator<Item = (&'static Shortcut, Binding)> + '_ {
        SHORTCUTS
            .iter()
            .map(move |shortcut| (shortcut, self.get(shortcut.kind)))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store. Call [`reload`](Self::reload)
    /// after writing to it directly.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
